//! Zone analytics tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, Tool};
use crate::cloudflare::{CloudflareClient, Query};
use crate::error::ToolError;

/// `since`/`until` accept ISO 8601 timestamps or relative minutes (e.g. `-1440`).
#[derive(Debug, Deserialize)]
pub struct ZoneAnalyticsArgs {
    pub zone_id: String,
    pub since: Option<String>,
    pub until: Option<String>,
}

pub struct ZoneAnalytics;

#[async_trait]
impl Tool for ZoneAnalytics {
    fn name(&self) -> &'static str {
        "cf_zone_analytics"
    }

    fn description(&self) -> &'static str {
        "Get analytics for a zone (requests, bandwidth, threats, pageviews)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" },
                "since": { "type": "string" },
                "until": { "type": "string" }
            },
            "required": ["zone_id"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: ZoneAnalyticsArgs = parse_args(self.name(), args)?;

        let mut query = Query::new();
        query
            .push_opt("since", args.since.as_deref())
            .push_opt("until", args.until.as_deref());
        Ok(cf
            .get(&format!("/zones/{}/analytics/dashboard", args.zone_id), Some(&query))
            .await?)
    }
}
