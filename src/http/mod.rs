//! EC2 Query API transport
//!
//! # Features
//!
//! - **SigV4 signing**: Every request is signed via the auth module
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Error mapping**: EC2 error XML becomes `Error::Service`

mod client;
mod rate_limit;

pub use client::{encode_form, Ec2Client, Ec2ClientConfig, Ec2ClientConfigBuilder, EC2_API_VERSION};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
