//! Typed EC2 operations
//!
//! Each supported action is a plain struct. Its fields are bound from the
//! CLI (or set directly by library callers) and turned into Query API
//! parameters by [`Operation::query_params`], which also rejects invalid
//! combinations before anything is sent.
//!
//! Paged describe actions additionally implement [`PagedOperation`] and are
//! driven page by page through [`OperationPager`].

mod describe;
mod mutate;
mod params;
mod types;

pub use describe::{
    DescribeCapacityReservations, DescribeInstanceStatus, DescribeInstances,
    DescribeSpotPriceHistory, DescribeVolumes,
};
pub use mutate::{CreateCapacityReservation, EndDateType, ModifyInstanceAttribute};
pub use params::{parse_local_time, parse_utc_time, DualTime, QueryParams};
pub use types::{invoke, Operation, OperationPager, PagedOperation};
