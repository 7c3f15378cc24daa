//! Operation traits and the page source that drives them

use super::params::QueryParams;
use crate::decode::{QueryDecoder, ResponseDecoder, ResponseShape};
use crate::error::{Error, Result};
use crate::http::Ec2Client;
use crate::pagination::{FetchOptions, PageRequest, PageResult, PageSizeBounds, PageSource};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// A typed EC2 action
pub trait Operation: Send + Sync {
    /// Query API action name (e.g., "DescribeVolumes")
    const ACTION: &'static str;

    /// Where the result lives in the response document
    const SHAPE: ResponseShape;

    /// Check caller input without side effects
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Validate and build the request parameters
    fn query_params(&self) -> Result<QueryParams>;
}

/// A describe action paged by `NextToken` / `MaxResults`
pub trait PagedOperation: Operation {
    /// Accepted `MaxResults` range
    const BOUNDS: PageSizeBounds;

    /// Whether `MaxResults` may be sent with the current parameters
    fn accepts_page_size(&self) -> bool {
        true
    }

    /// Parameter that forbids `MaxResults` when set
    fn page_size_conflict(&self) -> &'static str {
        "MaxResults"
    }

    /// Reject paging options this operation cannot honor
    fn check_paging(&self, options: &FetchOptions) -> Result<()> {
        if options.page_size.is_some() && !self.accepts_page_size() {
            return Err(Error::mutually_exclusive(
                self.page_size_conflict(),
                "MaxResults",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Page source
// ============================================================================

/// Fetches pages of a paged operation through the EC2 client
pub struct OperationPager<'a, O> {
    client: &'a Ec2Client,
    operation: &'a O,
    params: QueryParams,
    decoder: QueryDecoder,
}

impl<'a, O: PagedOperation> OperationPager<'a, O> {
    /// Validate the operation and capture its fixed parameters
    pub fn new(client: &'a Ec2Client, operation: &'a O) -> Result<Self> {
        let params = operation.query_params()?;
        Ok(Self {
            client,
            operation,
            params,
            decoder: QueryDecoder::new(O::SHAPE),
        })
    }

    /// Fixed parameters sent with every page
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Parameters for one page request
    pub fn page_params(&self, request: &PageRequest) -> QueryParams {
        let mut params = self.params.clone();
        params.push_opt("NextToken", request.continuation_token.as_deref());
        if self.operation.accepts_page_size() {
            params.push_opt("MaxResults", request.page_size_hint);
        }
        params
    }
}

#[async_trait]
impl<O: PagedOperation> PageSource for OperationPager<'_, O> {
    type Item = Value;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Value>> {
        let params = self.page_params(request);
        debug!(
            "{} page request: token={:?}, max_results={:?}",
            O::ACTION,
            request.continuation_token,
            params.get("MaxResults")
        );
        let body = self.client.call(O::ACTION, params.as_slice()).await?;
        self.decoder.decode_page(&body)
    }
}

/// Invoke a non-paged operation and return its decoded result
pub async fn invoke<O: Operation>(client: &Ec2Client, operation: &O) -> Result<Value> {
    let params = operation.query_params()?;
    let body = client.call(O::ACTION, params.as_slice()).await?;
    QueryDecoder::new(O::SHAPE).decode_single(&body)
}
