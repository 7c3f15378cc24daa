//! CLI runner - executes commands

use crate::auth::{mask_credential, CredentialProvider};
use crate::cli::commands::{Cli, Invocation};
use crate::config::{Settings, DEFAULT_REGION};
use crate::engine::{MessageSink, OperationEngine};
use crate::error::Result;
use crate::http::Ec2Client;
use crate::output::MessageWriter;
use crate::state::StateManager;
use std::collections::HashMap;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
    vars: HashMap<String, String>,
}

impl Runner {
    /// Create a runner over the process environment
    pub fn new(cli: Cli) -> Self {
        Self::with_vars(cli, std::env::vars())
    }

    /// Create a runner over an explicit variable set
    pub fn with_vars(cli: Cli, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            cli,
            vars: vars.into_iter().collect(),
        }
    }

    /// Effective settings: file and environment, then flags
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.cli.settings.as_deref(), &self.vars)?;
        settings.apply_overrides(&self.cli.overrides())?;
        Ok(settings)
    }

    /// Run the CLI command, writing to stdout/stderr
    pub async fn run(&self) -> Result<()> {
        let settings = self.settings()?;
        let mut writer = MessageWriter::stdio(settings.format);
        let result = self.run_with(&settings, &mut writer).await;
        writer.flush()?;
        result
    }

    /// Run the CLI command into any sink
    pub async fn run_with(&self, settings: &Settings, sink: &mut dyn MessageSink) -> Result<()> {
        let invocation = self.cli.command.invocation();
        let mut engine = self.engine(settings)?;

        match invocation {
            Invocation::DescribeInstances(op, paging) => {
                engine.run_paged(&op, &paging, sink).await
            }
            Invocation::DescribeInstanceStatus(op, paging) => {
                engine.run_paged(&op, &paging, sink).await
            }
            Invocation::DescribeCapacityReservations(op, paging) => {
                engine.run_paged(&op, &paging, sink).await
            }
            Invocation::DescribeSpotPriceHistory(op, paging) => {
                engine.run_paged(&op, &paging, sink).await
            }
            Invocation::DescribeVolumes(op, paging) => engine.run_paged(&op, &paging, sink).await,
            Invocation::CreateCapacityReservation(op) => engine.run_single(&op, sink).await,
            Invocation::ModifyInstanceAttribute(op) => engine.run_single(&op, sink).await,
        }
    }

    /// Build the engine: credentials, region, client, token store
    fn engine(&self, settings: &Settings) -> Result<OperationEngine> {
        let provider = CredentialProvider::with_vars(self.vars.clone())
            .with_profile(settings.profile.clone());
        let credentials = provider.credentials()?;
        let region = settings
            .region
            .clone()
            .or_else(|| provider.region())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        debug!(
            "Using access key {} ({:?}) in {}",
            mask_credential(&credentials.access_key_id),
            credentials.source,
            region
        );

        let client = Ec2Client::new(settings.client_config(region), credentials)?;
        info!("Endpoint: {}", client.endpoint());

        let state = match &settings.state_file {
            Some(path) => StateManager::from_file(path)?,
            None => StateManager::in_memory(),
        };

        Ok(OperationEngine::new(client, state))
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("cli", &self.cli)
            .finish_non_exhaustive()
    }
}
