//! Health check
//!
//! One lightweight zone listing decides whether the API is reachable with the
//! configured token. Failures become a report, never an error.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::cloudflare::{CloudflareClient, Query};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub app: String,
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Check the API with `GET /zones?per_page=1`.
pub async fn check(cf: &CloudflareClient, app: &str) -> HealthReport {
    let start = Instant::now();
    let query = Query::new().with("per_page", 1);
    let outcome = cf.get("/zones", Some(&query)).await;
    let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(_) => {
            debug!("Health check passed in {}ms", elapsed);
            HealthReport {
                app: app.to_string(),
                status: HealthStatus::Healthy,
                latency_ms: Some(elapsed),
                details: None,
            }
        }
        Err(err) => {
            warn!("Health check failed: {}", err);
            HealthReport {
                app: app.to_string(),
                status: HealthStatus::Unavailable,
                latency_ms: Some(elapsed),
                details: Some(json!({ "error": err.to_string() })),
            }
        }
    }
}
