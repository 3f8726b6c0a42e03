use serde::{Deserialize, Serialize};

use crate::null_as_default;

/// The user that submitted a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
}
