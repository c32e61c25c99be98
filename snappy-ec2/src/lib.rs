//! EC2 implementation of the snappy [`Inventory`](snappy_core::Inventory).
//!
//! The AWS SDK is async; [`Ec2Inventory`] owns a current-thread runtime and
//! blocks on each request so callers keep a plain synchronous API.

pub mod convert;
pub mod inventory;

pub use inventory::Ec2Inventory;
