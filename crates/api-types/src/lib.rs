//! Wire types returned by the IntelX jobs API.
//!
//! This crate contains:
//! - Job types (`Job`, `JobSummary`) and the reports nested inside a job
//! - Small shared records (`UserDetails`, `Tag`)
//! - Response envelopes (`JobListPage`)
//!
//! Field names match the JSON emitted by the service exactly. All types are
//! read-only views: they are produced by decoding a response and re-encode to
//! the same field names.

use serde::{Deserialize, Deserializer};

pub mod job;
pub mod report;
pub mod response;
pub mod tag;
pub mod user;

pub use job::*;
pub use report::*;
pub use response::*;
pub use tag::*;
pub use user::*;

/// Decodes a field that the service may send as `null`, falling back to the
/// type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
