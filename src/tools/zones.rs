//! Zone tools

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{parse_args, Tool};
use crate::cloudflare::{CloudflareClient, Query};
use crate::error::ToolError;

/// Zone lifecycle status accepted by the `status` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Active,
    Pending,
    Initializing,
    Moved,
    Deleted,
    Deactivated,
}

impl ZoneStatus {
    pub const ALL: [ZoneStatus; 6] = [
        ZoneStatus::Active,
        ZoneStatus::Pending,
        ZoneStatus::Initializing,
        ZoneStatus::Moved,
        ZoneStatus::Deleted,
        ZoneStatus::Deactivated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneStatus::Active => "active",
            ZoneStatus::Pending => "pending",
            ZoneStatus::Initializing => "initializing",
            ZoneStatus::Moved => "moved",
            ZoneStatus::Deleted => "deleted",
            ZoneStatus::Deactivated => "deactivated",
        }
    }
}

impl std::fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListZonesArgs {
    pub name: Option<String>,
    pub status: Option<ZoneStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListZonesArgs {
    pub fn query(&self) -> Query {
        let mut query = Query::new();
        query
            .push_opt("name", self.name.as_deref())
            .push_opt("status", self.status)
            .push_opt("page", self.page)
            .push_opt("per_page", self.per_page);
        query
    }
}

pub struct ListZones;

#[async_trait]
impl Tool for ListZones {
    fn name(&self) -> &'static str {
        "cf_list_zones"
    }

    fn description(&self) -> &'static str {
        "List zones (domains) in the Cloudflare account."
    }

    fn input_schema(&self) -> Value {
        let statuses: Vec<&str> = ZoneStatus::ALL.iter().map(|s| s.as_str()).collect();
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Exact zone name, e.g. example.com" },
                "status": { "type": "string", "enum": statuses },
                "page": { "type": "integer" },
                "per_page": { "type": "integer" }
            }
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: ListZonesArgs = parse_args(self.name(), args)?;
        let query = args.query();
        debug!("Listing zones with {} filters", query.pairs().len());
        Ok(cf.get("/zones", Some(&query)).await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct GetZoneArgs {
    pub zone_id: String,
}

pub struct GetZone;

#[async_trait]
impl Tool for GetZone {
    fn name(&self) -> &'static str {
        "cf_get_zone"
    }

    fn description(&self) -> &'static str {
        "Get details for a specific zone."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" }
            },
            "required": ["zone_id"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: GetZoneArgs = parse_args(self.name(), args)?;
        Ok(cf.get(&format!("/zones/{}", args.zone_id), None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_zones_query_skips_absent_filters() {
        let args: ListZonesArgs =
            parse_args("cf_list_zones", json!({"status": "active", "page": 2})).unwrap();
        assert_eq!(
            args.query().pairs(),
            &[
                ("status".to_string(), "active".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_zones_rejects_unknown_status() {
        let result = parse_args::<ListZonesArgs>("cf_list_zones", json!({"status": "asleep"}));
        assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
    }

    #[test]
    fn test_status_enum_matches_schema() {
        let schema = ListZones.input_schema();
        let listed: Vec<&str> = schema["properties"]["status"]["enum"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            listed,
            ["active", "pending", "initializing", "moved", "deleted", "deactivated"]
        );
    }
}
