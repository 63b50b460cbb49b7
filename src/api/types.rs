//! Request and response types for the API endpoints.

use serde::{Deserialize, Serialize};

/// One schedule object in the `/schedules` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// The object's schedule type.
    pub object_type: String,
    /// The object's name.
    pub name: String,
}

/// Query parameters for `/values`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuesQuery {
    /// Schedule name, matched ignoring case.
    pub name: String,
    /// Evaluation year; defaults to the server's configured year.
    pub year: Option<i32>,
}

/// Response body for `/values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuesResponse {
    /// The resolved schedule's name as stored.
    pub name: String,
    /// The year evaluated.
    pub year: i32,
    /// One value per hour of the year.
    pub values: Vec<f64>,
}

/// Error payload returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}
