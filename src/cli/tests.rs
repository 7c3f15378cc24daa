//! Tests for CLI parsing

use super::*;
use crate::output::OutputFormat;
use crate::types::Filter;
use clap::Parser;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["ec2kit"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

#[test]
fn test_global_flags() {
    let cli = parse(&[
        "--region",
        "eu-west-1",
        "--format",
        "pretty",
        "-v",
        "describe-volumes",
        "--endpoint-url",
        "http://localhost:4566",
    ]);
    assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
    assert_eq!(cli.format, Some(OutputFormat::Pretty));
    assert!(cli.verbose);

    let overrides = cli.overrides();
    assert_eq!(overrides.endpoint_url.as_deref(), Some("http://localhost:4566"));
    assert_eq!(overrides.region.as_deref(), Some("eu-west-1"));
    assert!(overrides.timeout_secs.is_none());
}

#[test]
fn test_paging_flags() {
    let cli = parse(&[
        "describe-volumes",
        "--next-token",
        "T1",
        "--max-results",
        "50",
        "--max-items",
        "120",
    ]);
    let Commands::DescribeVolumes { paging, .. } = &cli.command else {
        panic!("expected describe-volumes");
    };
    let config = paging.to_config();
    assert_eq!(config.next_token.as_deref(), Some("T1"));
    assert_eq!(config.page_size, Some(50));
    assert_eq!(config.max_items, Some(120));
    assert!(!config.no_auto_iteration);
    assert!(!config.resume);
}

#[test]
fn test_describe_instances_invocation() {
    let cli = parse(&[
        "describe-instances",
        "--instance-ids",
        "i-1",
        "i-2",
        "--filters",
        "Name=instance-state-name,Values=running,stopped",
        "--no-auto-iteration",
    ]);
    match cli.command.invocation() {
        Invocation::DescribeInstances(op, paging) => {
            assert_eq!(op.instance_ids, vec!["i-1", "i-2"]);
            assert_eq!(
                op.filters,
                vec![Filter::new("instance-state-name", ["running", "stopped"])]
            );
            assert!(paging.no_auto_iteration);
        }
        other => panic!("unexpected invocation: {other:?}"),
    }
}

#[test]
fn test_spot_price_times() {
    let cli = parse(&[
        "describe-spot-price-history",
        "--start-time",
        "2024-05-01 10:00:00",
        "--end-time-utc",
        "2024-05-02T00:00:00Z",
        "--instance-types",
        "m5.large",
    ]);
    match cli.command.invocation() {
        Invocation::DescribeSpotPriceHistory(op, _) => {
            assert!(op.start_time.local.is_some());
            assert!(op.start_time.utc.is_none());
            assert!(op.end_time.utc.is_some());
            assert_eq!(op.instance_types, vec!["m5.large"]);
        }
        other => panic!("unexpected invocation: {other:?}"),
    }
}

#[test]
fn test_bad_time_rejected_by_parser() {
    let result = Cli::try_parse_from([
        "ec2kit",
        "describe-spot-price-history",
        "--start-time-utc",
        "yesterday",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_create_capacity_reservation_invocation() {
    let cli = parse(&[
        "create-capacity-reservation",
        "--instance-type",
        "m5.large",
        "--instance-platform",
        "Linux/UNIX",
        "--instance-count",
        "2",
        "--availability-zone",
        "us-east-1a",
        "--end-date-type",
        "unlimited",
        "--tag",
        "env=prod",
        "--dry-run",
    ]);
    match cli.command.invocation() {
        Invocation::CreateCapacityReservation(op) => {
            assert_eq!(op.instance_type, "m5.large");
            assert_eq!(op.instance_count, 2);
            assert_eq!(
                op.end_date_type,
                Some(crate::operations::EndDateType::Unlimited)
            );
            assert_eq!(op.tags.len(), 1);
            assert!(op.dry_run);
        }
        other => panic!("unexpected invocation: {other:?}"),
    }
}

#[test]
fn test_modify_instance_attribute_invocation() {
    let cli = parse(&[
        "modify-instance-attribute",
        "--instance-id",
        "i-1",
        "--disable-api-termination",
        "true",
    ]);
    match cli.command.invocation() {
        Invocation::ModifyInstanceAttribute(op) => {
            assert_eq!(op.instance_id, "i-1");
            assert_eq!(op.disable_api_termination, Some(true));
            assert!(op.instance_type.is_none());
        }
        other => panic!("unexpected invocation: {other:?}"),
    }
}

#[test]
fn test_missing_required_flag() {
    let result = Cli::try_parse_from(["ec2kit", "modify-instance-attribute"]);
    assert!(result.is_err());
}
