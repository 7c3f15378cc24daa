//! CLI commands and argument parsing

use crate::config::Overrides;
use crate::engine::PagingConfig;
use crate::operations::{
    parse_local_time, parse_utc_time, CreateCapacityReservation, DescribeCapacityReservations,
    DescribeInstanceStatus, DescribeInstances, DescribeSpotPriceHistory, DescribeVolumes, DualTime,
    EndDateType, ModifyInstanceAttribute,
};
use crate::output::OutputFormat;
use crate::types::{Filter, Tag};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// EC2 API command-line client
#[derive(Parser, Debug)]
#[command(name = "ec2kit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Region to call
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Credentials profile
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Custom EC2 endpoint URL
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Settings file (YAML)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Continuation token store file (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flags that override file and environment settings
    pub fn overrides(&self) -> Overrides {
        Overrides {
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
            timeout_secs: self.timeout,
            format: self.format,
            state_file: self.state.clone(),
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe instances (paged)
    DescribeInstances {
        /// Instance ids
        #[arg(long = "instance-ids", num_args = 1..)]
        instance_ids: Vec<String>,

        /// Filters (`Name=x,Values=a,b`), repeatable
        #[arg(long = "filters")]
        filters: Vec<Filter>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Describe instance status (paged)
    DescribeInstanceStatus {
        /// Instance ids
        #[arg(long = "instance-ids", num_args = 1..)]
        instance_ids: Vec<String>,

        /// Filters (`Name=x,Values=a,b`), repeatable
        #[arg(long = "filters")]
        filters: Vec<Filter>,

        /// Include instances that are not running
        #[arg(long)]
        include_all_instances: bool,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Describe capacity reservations (paged)
    DescribeCapacityReservations {
        /// Capacity reservation ids
        #[arg(long = "capacity-reservation-ids", num_args = 1..)]
        capacity_reservation_ids: Vec<String>,

        /// Filters (`Name=x,Values=a,b`), repeatable
        #[arg(long = "filters")]
        filters: Vec<Filter>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Describe spot price history (paged)
    DescribeSpotPriceHistory {
        /// Availability zone
        #[arg(long)]
        availability_zone: Option<String>,

        /// Instance types
        #[arg(long = "instance-types", num_args = 1..)]
        instance_types: Vec<String>,

        /// Product descriptions (e.g. "Linux/UNIX")
        #[arg(long = "product-descriptions", num_args = 1..)]
        product_descriptions: Vec<String>,

        /// Filters (`Name=x,Values=a,b`), repeatable
        #[arg(long = "filters")]
        filters: Vec<Filter>,

        /// Start time in local time (deprecated, use --start-time-utc)
        #[arg(long, value_parser = parse_local_time)]
        start_time: Option<NaiveDateTime>,

        /// Start time (RFC 3339)
        #[arg(long, value_parser = parse_utc_time)]
        start_time_utc: Option<DateTime<Utc>>,

        /// End time in local time (deprecated, use --end-time-utc)
        #[arg(long, value_parser = parse_local_time)]
        end_time: Option<NaiveDateTime>,

        /// End time (RFC 3339)
        #[arg(long, value_parser = parse_utc_time)]
        end_time_utc: Option<DateTime<Utc>>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Describe EBS volumes (paged)
    DescribeVolumes {
        /// Volume ids
        #[arg(long = "volume-ids", num_args = 1..)]
        volume_ids: Vec<String>,

        /// Filters (`Name=x,Values=a,b`), repeatable
        #[arg(long = "filters")]
        filters: Vec<Filter>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Create a capacity reservation
    CreateCapacityReservation {
        /// Instance type (e.g. m5.large)
        #[arg(long)]
        instance_type: String,

        /// Instance platform (e.g. "Linux/UNIX")
        #[arg(long)]
        instance_platform: String,

        /// Number of instances to reserve
        #[arg(long)]
        instance_count: i32,

        /// Availability zone
        #[arg(long)]
        availability_zone: Option<String>,

        /// Availability zone id
        #[arg(long)]
        availability_zone_id: Option<String>,

        /// Tenancy (default or dedicated)
        #[arg(long)]
        tenancy: Option<String>,

        /// EBS-optimized capacity
        #[arg(long)]
        ebs_optimized: Option<bool>,

        /// Instance match criteria (open or targeted)
        #[arg(long)]
        instance_match_criteria: Option<String>,

        /// End date in local time (deprecated, use --end-date-utc)
        #[arg(long, value_parser = parse_local_time)]
        end_date: Option<NaiveDateTime>,

        /// End date (RFC 3339)
        #[arg(long, value_parser = parse_utc_time)]
        end_date_utc: Option<DateTime<Utc>>,

        /// End date type (limited or unlimited)
        #[arg(long)]
        end_date_type: Option<EndDateType>,

        /// Tags (`key=value`), repeatable
        #[arg(long = "tag")]
        tags: Vec<Tag>,

        /// Idempotency token
        #[arg(long)]
        client_token: Option<String>,

        /// Check permissions without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Change one attribute of an instance
    ModifyInstanceAttribute {
        /// Instance id
        #[arg(long)]
        instance_id: String,

        /// New instance type
        #[arg(long)]
        instance_type: Option<String>,

        /// Termination protection
        #[arg(long)]
        disable_api_termination: Option<bool>,

        /// Source/destination checking
        #[arg(long)]
        source_dest_check: Option<bool>,

        /// EBS optimization
        #[arg(long)]
        ebs_optimized: Option<bool>,

        /// User data (plain text, encoded before sending)
        #[arg(long)]
        user_data: Option<String>,

        /// Shutdown behavior (stop or terminate)
        #[arg(long)]
        instance_initiated_shutdown_behavior: Option<String>,

        /// Check permissions without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Paging flags shared by the describe commands
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// Start from this continuation token and fetch a single page
    #[arg(long)]
    pub next_token: Option<String>,

    /// Page size sent to the service
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Stop after emitting at least this many items
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Fetch only one page
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// Continue from the token saved by the previous run
    #[arg(long)]
    pub resume: bool,
}

impl PagingArgs {
    /// Engine paging configuration
    pub fn to_config(&self) -> PagingConfig {
        PagingConfig::new()
            .with_next_token(self.next_token.clone())
            .with_page_size(self.max_results)
            .with_max_items(self.max_items)
            .with_no_auto_iteration(self.no_auto_iteration)
            .with_resume(self.resume)
    }
}

fn dual(local: Option<NaiveDateTime>, utc: Option<DateTime<Utc>>) -> DualTime {
    DualTime { local, utc }
}

/// A parsed subcommand ready to run
#[derive(Debug)]
pub enum Invocation {
    /// `describe-instances`
    DescribeInstances(DescribeInstances, PagingConfig),
    /// `describe-instance-status`
    DescribeInstanceStatus(DescribeInstanceStatus, PagingConfig),
    /// `describe-capacity-reservations`
    DescribeCapacityReservations(DescribeCapacityReservations, PagingConfig),
    /// `describe-spot-price-history`
    DescribeSpotPriceHistory(DescribeSpotPriceHistory, PagingConfig),
    /// `describe-volumes`
    DescribeVolumes(DescribeVolumes, PagingConfig),
    /// `create-capacity-reservation`
    CreateCapacityReservation(CreateCapacityReservation),
    /// `modify-instance-attribute`
    ModifyInstanceAttribute(ModifyInstanceAttribute),
}

impl Commands {
    /// Build the typed operation for this subcommand
    pub fn invocation(&self) -> Invocation {
        match self {
            Self::DescribeInstances {
                instance_ids,
                filters,
                paging,
            } => Invocation::DescribeInstances(
                DescribeInstances {
                    instance_ids: instance_ids.clone(),
                    filters: filters.clone(),
                },
                paging.to_config(),
            ),
            Self::DescribeInstanceStatus {
                instance_ids,
                filters,
                include_all_instances,
                paging,
            } => Invocation::DescribeInstanceStatus(
                DescribeInstanceStatus {
                    instance_ids: instance_ids.clone(),
                    filters: filters.clone(),
                    include_all_instances: *include_all_instances,
                },
                paging.to_config(),
            ),
            Self::DescribeCapacityReservations {
                capacity_reservation_ids,
                filters,
                paging,
            } => Invocation::DescribeCapacityReservations(
                DescribeCapacityReservations {
                    capacity_reservation_ids: capacity_reservation_ids.clone(),
                    filters: filters.clone(),
                },
                paging.to_config(),
            ),
            Self::DescribeSpotPriceHistory {
                availability_zone,
                instance_types,
                product_descriptions,
                filters,
                start_time,
                start_time_utc,
                end_time,
                end_time_utc,
                paging,
            } => Invocation::DescribeSpotPriceHistory(
                DescribeSpotPriceHistory {
                    availability_zone: availability_zone.clone(),
                    instance_types: instance_types.clone(),
                    product_descriptions: product_descriptions.clone(),
                    filters: filters.clone(),
                    start_time: dual(*start_time, *start_time_utc),
                    end_time: dual(*end_time, *end_time_utc),
                },
                paging.to_config(),
            ),
            Self::DescribeVolumes {
                volume_ids,
                filters,
                paging,
            } => Invocation::DescribeVolumes(
                DescribeVolumes {
                    volume_ids: volume_ids.clone(),
                    filters: filters.clone(),
                },
                paging.to_config(),
            ),
            Self::CreateCapacityReservation {
                instance_type,
                instance_platform,
                instance_count,
                availability_zone,
                availability_zone_id,
                tenancy,
                ebs_optimized,
                instance_match_criteria,
                end_date,
                end_date_utc,
                end_date_type,
                tags,
                client_token,
                dry_run,
            } => Invocation::CreateCapacityReservation(CreateCapacityReservation {
                instance_type: instance_type.clone(),
                instance_platform: instance_platform.clone(),
                instance_count: *instance_count,
                availability_zone: availability_zone.clone(),
                availability_zone_id: availability_zone_id.clone(),
                tenancy: tenancy.clone(),
                ebs_optimized: *ebs_optimized,
                instance_match_criteria: instance_match_criteria.clone(),
                end_date: dual(*end_date, *end_date_utc),
                end_date_type: *end_date_type,
                tags: tags.clone(),
                client_token: client_token.clone(),
                dry_run: *dry_run,
            }),
            Self::ModifyInstanceAttribute {
                instance_id,
                instance_type,
                disable_api_termination,
                source_dest_check,
                ebs_optimized,
                user_data,
                instance_initiated_shutdown_behavior,
                dry_run,
            } => Invocation::ModifyInstanceAttribute(ModifyInstanceAttribute {
                instance_id: instance_id.clone(),
                instance_type: instance_type.clone(),
                disable_api_termination: *disable_api_termination,
                source_dest_check: *source_dest_check,
                ebs_optimized: *ebs_optimized,
                user_data: user_data.clone(),
                instance_initiated_shutdown_behavior: instance_initiated_shutdown_behavior.clone(),
                dry_run: *dry_run,
            }),
        }
    }
}
