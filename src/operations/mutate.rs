//! Single-call operations that change resources

use super::params::{DualTime, QueryParams};
use super::types::Operation;
use crate::decode::ResponseShape;
use crate::error::{Error, Result};
use crate::types::Tag;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CreateCapacityReservation
// ============================================================================

/// How a capacity reservation ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDateType {
    /// Active until cancelled
    Unlimited,
    /// Expires at `EndDate`
    Limited,
}

impl fmt::Display for EndDateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Limited => write!(f, "limited"),
        }
    }
}

impl FromStr for EndDateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "unlimited" => Ok(Self::Unlimited),
            "limited" => Ok(Self::Limited),
            other => Err(Error::validation(format!(
                "EndDateType must be 'limited' or 'unlimited', got '{other}'"
            ))),
        }
    }
}

/// `CreateCapacityReservation`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCapacityReservation {
    /// Instance type (e.g., "m5.large")
    pub instance_type: String,
    /// Instance platform (e.g., "Linux/UNIX")
    pub instance_platform: String,
    /// Number of instances to reserve
    pub instance_count: i32,
    /// Availability zone name
    pub availability_zone: Option<String>,
    /// Availability zone id
    pub availability_zone_id: Option<String>,
    /// "default" or "dedicated"
    pub tenancy: Option<String>,
    /// EBS-optimized capacity
    pub ebs_optimized: Option<bool>,
    /// "open" or "targeted"
    pub instance_match_criteria: Option<String>,
    /// `EndDate` / `EndDateUtc`
    pub end_date: DualTime,
    /// How the reservation ends
    pub end_date_type: Option<EndDateType>,
    /// Tags applied to the new reservation
    pub tags: Vec<Tag>,
    /// Idempotency token
    pub client_token: Option<String>,
    /// Check permissions without creating anything
    pub dry_run: bool,
}

impl Operation for CreateCapacityReservation {
    const ACTION: &'static str = "CreateCapacityReservation";
    const SHAPE: ResponseShape =
        ResponseShape::single("/CreateCapacityReservationResponse/capacityReservation");

    fn validate(&self) -> Result<()> {
        if self.instance_type.trim().is_empty() {
            return Err(Error::validation("InstanceType is required"));
        }
        if self.instance_platform.trim().is_empty() {
            return Err(Error::validation("InstancePlatform is required"));
        }
        if self.instance_count <= 0 {
            return Err(Error::validation(format!(
                "InstanceCount must be positive, got {}",
                self.instance_count
            )));
        }

        match (&self.availability_zone, &self.availability_zone_id) {
            (Some(_), Some(_)) => {
                return Err(Error::mutually_exclusive(
                    "AvailabilityZone",
                    "AvailabilityZoneId",
                ))
            }
            (None, None) => {
                return Err(Error::validation(
                    "one of AvailabilityZone or AvailabilityZoneId is required",
                ))
            }
            _ => {}
        }

        let end_date = self.end_date.resolve("EndDate", "EndDateUtc")?;
        match (self.end_date_type, end_date) {
            (Some(EndDateType::Limited), None) => Err(Error::validation(
                "EndDateType 'limited' requires EndDate or EndDateUtc",
            )),
            (Some(EndDateType::Unlimited), Some(_)) => Err(Error::validation(
                "EndDateType 'unlimited' cannot be combined with an end date",
            )),
            _ => Ok(()),
        }
    }

    fn query_params(&self) -> Result<QueryParams> {
        self.validate()?;
        let mut params = QueryParams::new();
        params
            .push("InstanceType", &self.instance_type)
            .push("InstancePlatform", &self.instance_platform)
            .push("InstanceCount", self.instance_count)
            .push_opt("AvailabilityZone", self.availability_zone.as_deref())
            .push_opt("AvailabilityZoneId", self.availability_zone_id.as_deref())
            .push_opt("Tenancy", self.tenancy.as_deref())
            .push_opt("EbsOptimized", self.ebs_optimized)
            .push_opt(
                "InstanceMatchCriteria",
                self.instance_match_criteria.as_deref(),
            );
        params.dual_time("EndDate", "EndDateUtc", &self.end_date)?;
        params
            .push_opt("EndDateType", self.end_date_type)
            .tag_specification("capacity-reservation", &self.tags)
            .push_opt("ClientToken", self.client_token.as_deref())
            .flag("DryRun", self.dry_run);
        Ok(params)
    }
}

// ============================================================================
// ModifyInstanceAttribute
// ============================================================================

/// `ModifyInstanceAttribute`: changes exactly one attribute per call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyInstanceAttribute {
    /// Target instance
    pub instance_id: String,
    /// New instance type (instance must be stopped)
    pub instance_type: Option<String>,
    /// Enable or disable termination protection
    pub disable_api_termination: Option<bool>,
    /// Source/destination checking for NAT
    pub source_dest_check: Option<bool>,
    /// EBS optimization
    pub ebs_optimized: Option<bool>,
    /// Raw user data; encoded as base64 on the wire
    pub user_data: Option<String>,
    /// "stop" or "terminate"
    pub instance_initiated_shutdown_behavior: Option<String>,
    /// Check permissions without modifying anything
    pub dry_run: bool,
}

impl ModifyInstanceAttribute {
    fn attributes_set(&self) -> Vec<&'static str> {
        [
            ("InstanceType", self.instance_type.is_some()),
            ("DisableApiTermination", self.disable_api_termination.is_some()),
            ("SourceDestCheck", self.source_dest_check.is_some()),
            ("EbsOptimized", self.ebs_optimized.is_some()),
            ("UserData", self.user_data.is_some()),
            (
                "InstanceInitiatedShutdownBehavior",
                self.instance_initiated_shutdown_behavior.is_some(),
            ),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| name)
        .collect()
    }
}

impl Operation for ModifyInstanceAttribute {
    const ACTION: &'static str = "ModifyInstanceAttribute";
    const SHAPE: ResponseShape = ResponseShape::single("/ModifyInstanceAttributeResponse/return");

    fn validate(&self) -> Result<()> {
        if self.instance_id.trim().is_empty() {
            return Err(Error::validation("InstanceId is required"));
        }
        match self.attributes_set().as_slice() {
            [] => Err(Error::validation(
                "one attribute to modify is required",
            )),
            [_] => Ok(()),
            [first, second, ..] => Err(Error::mutually_exclusive(*first, *second)),
        }
    }

    fn query_params(&self) -> Result<QueryParams> {
        self.validate()?;
        let mut params = QueryParams::new();
        params
            .push("InstanceId", &self.instance_id)
            .push_opt("InstanceType.Value", self.instance_type.as_deref())
            .push_opt("DisableApiTermination.Value", self.disable_api_termination)
            .push_opt("SourceDestCheck.Value", self.source_dest_check)
            .push_opt("EbsOptimized.Value", self.ebs_optimized)
            .push_opt(
                "UserData.Value",
                self.user_data.as_ref().map(|data| STANDARD.encode(data)),
            )
            .push_opt(
                "InstanceInitiatedShutdownBehavior.Value",
                self.instance_initiated_shutdown_behavior.as_deref(),
            )
            .flag("DryRun", self.dry_run);
        Ok(params)
    }
}
