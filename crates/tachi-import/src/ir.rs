//! beatoraja IR read endpoint.
//!
//! `GET /ir/beatoraja/chart/:sha256/scores`, minus the HTTP layer: handlers
//! return a status code alongside the JSON envelope.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::{BeatorajaScore, to_beatoraja_many};
use crate::error::FatalImportError;
use crate::store::ScoreStore;

pub const CHART_NOT_FOUND: &str = "Chart does not exist on IR yet.";

/// JSON envelope of every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(description: impl Into<String>, body: T) -> Self {
        Self {
            success: true,
            description: description.into(),
            body: Some(body),
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            success: false,
            description: description.into(),
            body: None,
        }
    }

    /// Failure envelope carrying the import error's message unchanged.
    pub fn from_fatal(err: &FatalImportError) -> (u16, Self) {
        (err.status_code(), Self::failure(err.message.clone()))
    }
}

/// Every personal best on the chart with file hash `sha256`, as beatoraja
/// scores. `viewer_id` is the requesting user.
pub fn chart_scores<S: ScoreStore + ?Sized>(
    store: &S,
    sha256: &str,
    viewer_id: u32,
) -> (u16, ApiResponse<Vec<BeatorajaScore>>) {
    let Some(chart) = store.find_bms_chart(sha256) else {
        debug!(sha256, "IR chart not found");
        return (404, ApiResponse::failure(CHART_NOT_FOUND));
    };

    let pbs = store.pbs_on_chart(&chart.chart_id);
    let scores = to_beatoraja_many(&pbs, &chart, viewer_id);

    (
        200,
        ApiResponse::ok(format!("Successfully returned {}", scores.len()), scores),
    )
}
