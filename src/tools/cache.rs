//! Cache purge tool

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{parse_args, Tool};
use crate::cloudflare::CloudflareClient;
use crate::error::ToolError;

#[derive(Debug, Deserialize)]
pub struct PurgeCacheArgs {
    pub zone_id: String,
    pub purge_everything: Option<bool>,
    pub files: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub hosts: Option<Vec<String>>,
}

/// Purge request body. `purge_everything` excludes every selector.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PurgeCacheBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge_everything: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}

impl From<PurgeCacheArgs> for PurgeCacheBody {
    fn from(args: PurgeCacheArgs) -> Self {
        if args.purge_everything.unwrap_or(false) {
            return Self {
                purge_everything: Some(true),
                ..Self::default()
            };
        }

        Self {
            purge_everything: None,
            files: args.files,
            tags: args.tags,
            hosts: args.hosts,
        }
    }
}

pub struct PurgeCache;

#[async_trait]
impl Tool for PurgeCache {
    fn name(&self) -> &'static str {
        "cf_purge_cache"
    }

    fn description(&self) -> &'static str {
        "Purge cache for a zone. Purge everything or specific files/tags/hosts."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" },
                "purge_everything": {
                    "type": "boolean",
                    "description": "When true, files/tags/hosts are ignored"
                },
                "files": { "type": "array", "items": { "type": "string" } },
                "tags": { "type": "array", "items": { "type": "string" } },
                "hosts": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["zone_id"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: PurgeCacheArgs = parse_args(self.name(), args)?;
        let path = format!("/zones/{}/purge_cache", args.zone_id);
        let body = PurgeCacheBody::from(args);

        if body.purge_everything.is_some() {
            info!("Purging entire cache: {}", path);
        } else {
            info!("Purging selected cache entries: {}", path);
        }
        Ok(cf.post(&path, Some(&body)).await?)
    }
}
