//! Paged describe operations

use super::params::{DualTime, QueryParams};
use super::types::{Operation, PagedOperation};
use crate::decode::ResponseShape;
use crate::error::{Error, Result};
use crate::pagination::PageSizeBounds;
use crate::types::Filter;

// ============================================================================
// DescribeInstances
// ============================================================================

/// `DescribeInstances`: reservations and their instances
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeInstances {
    /// Instance ids to describe
    pub instance_ids: Vec<String>,
    /// Result filters
    pub filters: Vec<Filter>,
}

impl Operation for DescribeInstances {
    const ACTION: &'static str = "DescribeInstances";
    const SHAPE: ResponseShape = ResponseShape::paged(
        "/DescribeInstancesResponse/reservationSet/item",
        "/DescribeInstancesResponse/nextToken",
    );

    fn query_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        params
            .list("InstanceId", &self.instance_ids)
            .filters(&self.filters);
        Ok(params)
    }
}

impl PagedOperation for DescribeInstances {
    const BOUNDS: PageSizeBounds = PageSizeBounds::new(5, 1000);

    // EC2 rejects MaxResults together with explicit ids
    fn accepts_page_size(&self) -> bool {
        self.instance_ids.is_empty()
    }

    fn page_size_conflict(&self) -> &'static str {
        "InstanceId"
    }
}

// ============================================================================
// DescribeInstanceStatus
// ============================================================================

/// `DescribeInstanceStatus`: scheduled events and status checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeInstanceStatus {
    /// Instance ids to describe
    pub instance_ids: Vec<String>,
    /// Result filters
    pub filters: Vec<Filter>,
    /// Include instances that are not running
    pub include_all_instances: bool,
}

impl Operation for DescribeInstanceStatus {
    const ACTION: &'static str = "DescribeInstanceStatus";
    const SHAPE: ResponseShape = ResponseShape::paged(
        "/DescribeInstanceStatusResponse/instanceStatusSet/item",
        "/DescribeInstanceStatusResponse/nextToken",
    );

    fn query_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        params
            .list("InstanceId", &self.instance_ids)
            .filters(&self.filters)
            .flag("IncludeAllInstances", self.include_all_instances);
        Ok(params)
    }
}

impl PagedOperation for DescribeInstanceStatus {
    const BOUNDS: PageSizeBounds = PageSizeBounds::new(5, 1000);

    fn accepts_page_size(&self) -> bool {
        self.instance_ids.is_empty()
    }

    fn page_size_conflict(&self) -> &'static str {
        "InstanceId"
    }
}

// ============================================================================
// DescribeCapacityReservations
// ============================================================================

/// `DescribeCapacityReservations`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeCapacityReservations {
    /// Capacity reservation ids to describe
    pub capacity_reservation_ids: Vec<String>,
    /// Result filters
    pub filters: Vec<Filter>,
}

impl Operation for DescribeCapacityReservations {
    const ACTION: &'static str = "DescribeCapacityReservations";
    const SHAPE: ResponseShape = ResponseShape::paged(
        "/DescribeCapacityReservationsResponse/capacityReservationSet/item",
        "/DescribeCapacityReservationsResponse/nextToken",
    );

    fn query_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        params
            .list("CapacityReservationId", &self.capacity_reservation_ids)
            .filters(&self.filters);
        Ok(params)
    }
}

impl PagedOperation for DescribeCapacityReservations {
    const BOUNDS: PageSizeBounds = PageSizeBounds::new(1, 1000);
}

// ============================================================================
// DescribeSpotPriceHistory
// ============================================================================

/// `DescribeSpotPriceHistory`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeSpotPriceHistory {
    /// Restrict to one availability zone
    pub availability_zone: Option<String>,
    /// Instance types
    pub instance_types: Vec<String>,
    /// Product descriptions (e.g., "Linux/UNIX")
    pub product_descriptions: Vec<String>,
    /// Result filters
    pub filters: Vec<Filter>,
    /// `StartTime` / `StartTimeUtc`
    pub start_time: DualTime,
    /// `EndTime` / `EndTimeUtc`
    pub end_time: DualTime,
}

impl Operation for DescribeSpotPriceHistory {
    const ACTION: &'static str = "DescribeSpotPriceHistory";
    const SHAPE: ResponseShape = ResponseShape::paged(
        "/DescribeSpotPriceHistoryResponse/spotPriceHistorySet/item",
        "/DescribeSpotPriceHistoryResponse/nextToken",
    );

    fn validate(&self) -> Result<()> {
        let start = self.start_time.resolve("StartTime", "StartTimeUtc")?;
        let end = self.end_time.resolve("EndTime", "EndTimeUtc")?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(Error::validation(format!(
                    "start time {start} is after end time {end}"
                )));
            }
        }
        Ok(())
    }

    fn query_params(&self) -> Result<QueryParams> {
        self.validate()?;
        let mut params = QueryParams::new();
        params
            .push_opt("AvailabilityZone", self.availability_zone.as_deref())
            .list("InstanceType", &self.instance_types)
            .list("ProductDescription", &self.product_descriptions)
            .filters(&self.filters);
        params.dual_time("StartTime", "StartTimeUtc", &self.start_time)?;
        params.dual_time("EndTime", "EndTimeUtc", &self.end_time)?;
        Ok(params)
    }
}

impl PagedOperation for DescribeSpotPriceHistory {
    const BOUNDS: PageSizeBounds = PageSizeBounds::new(1, 1000);
}

// ============================================================================
// DescribeVolumes
// ============================================================================

/// `DescribeVolumes`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeVolumes {
    /// Volume ids to describe
    pub volume_ids: Vec<String>,
    /// Result filters
    pub filters: Vec<Filter>,
}

impl Operation for DescribeVolumes {
    const ACTION: &'static str = "DescribeVolumes";
    const SHAPE: ResponseShape = ResponseShape::paged(
        "/DescribeVolumesResponse/volumeSet/item",
        "/DescribeVolumesResponse/nextToken",
    );

    fn query_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        params
            .list("VolumeId", &self.volume_ids)
            .filters(&self.filters);
        Ok(params)
    }
}

impl PagedOperation for DescribeVolumes {
    const BOUNDS: PageSizeBounds = PageSizeBounds::new(5, 500);
}
