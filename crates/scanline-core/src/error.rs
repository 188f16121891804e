use serde::{Deserialize, Serialize};

/// Errors produced by the coordinate mapping helpers.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryError {
    #[error("invalid preview resolution (width={width}, height={height})")]
    InvalidInput { width: u32, height: u32 },
}
