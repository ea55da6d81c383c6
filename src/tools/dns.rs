//! DNS record tools
//!
//! Record types are passed through as strings; Cloudflare validates them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{parse_args, Tool};
use crate::cloudflare::{CloudflareClient, Query};
use crate::error::ToolError;

/// TTL value Cloudflare treats as "automatic"
pub const AUTO_TTL: u32 = 1;

#[derive(Debug, Deserialize)]
pub struct ListDnsRecordsArgs {
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListDnsRecordsArgs {
    pub fn query(&self) -> Query {
        let mut query = Query::new();
        query
            .push_opt("type", self.record_type.as_deref())
            .push_opt("name", self.name.as_deref())
            .push_opt("content", self.content.as_deref())
            .push_opt("page", self.page)
            .push_opt("per_page", self.per_page);
        query
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDnsRecordArgs {
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: Option<u32>,
    pub proxied: Option<bool>,
    pub priority: Option<u16>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDnsRecordArgs {
    pub zone_id: String,
    pub record_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: Option<u32>,
    pub proxied: Option<bool>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteDnsRecordArgs {
    pub zone_id: String,
    pub record_id: String,
}

/// Body for create (POST) and full update (PUT)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsRecordBody {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<CreateDnsRecordArgs> for DnsRecordBody {
    fn from(args: CreateDnsRecordArgs) -> Self {
        Self {
            record_type: args.record_type,
            name: args.name,
            content: args.content,
            ttl: Some(args.ttl.unwrap_or(AUTO_TTL)),
            proxied: args.proxied,
            priority: args.priority,
            comment: args.comment,
        }
    }
}

// Absent fields stay absent on update; an explicit value (even 0 or "") is sent.
impl From<UpdateDnsRecordArgs> for DnsRecordBody {
    fn from(args: UpdateDnsRecordArgs) -> Self {
        Self {
            record_type: args.record_type,
            name: args.name,
            content: args.content,
            ttl: args.ttl,
            proxied: args.proxied,
            priority: None,
            comment: args.comment,
        }
    }
}

fn records_path(zone_id: &str) -> String {
    format!("/zones/{}/dns_records", zone_id)
}

fn record_path(zone_id: &str, record_id: &str) -> String {
    format!("/zones/{}/dns_records/{}", zone_id, record_id)
}

pub struct ListDnsRecords;

#[async_trait]
impl Tool for ListDnsRecords {
    fn name(&self) -> &'static str {
        "cf_list_dns_records"
    }

    fn description(&self) -> &'static str {
        "List DNS records for a zone."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" },
                "type": { "type": "string", "description": "Record type filter, e.g. A, AAAA, CNAME" },
                "name": { "type": "string" },
                "content": { "type": "string" },
                "page": { "type": "integer" },
                "per_page": { "type": "integer" }
            },
            "required": ["zone_id"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: ListDnsRecordsArgs = parse_args(self.name(), args)?;
        let query = args.query();
        Ok(cf.get(&records_path(&args.zone_id), Some(&query)).await?)
    }
}

pub struct CreateDnsRecord;

#[async_trait]
impl Tool for CreateDnsRecord {
    fn name(&self) -> &'static str {
        "cf_create_dns_record"
    }

    fn description(&self) -> &'static str {
        "Create a DNS record in a zone."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" },
                "type": { "type": "string" },
                "name": { "type": "string" },
                "content": { "type": "string" },
                "ttl": { "type": "integer", "description": "Seconds; 1 means automatic (default)" },
                "proxied": { "type": "boolean" },
                "priority": { "type": "integer" },
                "comment": { "type": "string" }
            },
            "required": ["zone_id", "type", "name", "content"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: CreateDnsRecordArgs = parse_args(self.name(), args)?;
        let path = records_path(&args.zone_id);
        let body = DnsRecordBody::from(args);

        info!("Creating DNS record: {} {} -> {}", body.record_type, body.name, body.content);
        Ok(cf.post(&path, Some(&body)).await?)
    }
}

pub struct UpdateDnsRecord;

#[async_trait]
impl Tool for UpdateDnsRecord {
    fn name(&self) -> &'static str {
        "cf_update_dns_record"
    }

    fn description(&self) -> &'static str {
        "Update an existing DNS record."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" },
                "record_id": { "type": "string" },
                "type": { "type": "string" },
                "name": { "type": "string" },
                "content": { "type": "string" },
                "ttl": { "type": "integer" },
                "proxied": { "type": "boolean" },
                "comment": { "type": "string" }
            },
            "required": ["zone_id", "record_id", "type", "name", "content"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: UpdateDnsRecordArgs = parse_args(self.name(), args)?;
        let path = record_path(&args.zone_id, &args.record_id);
        let body = DnsRecordBody::from(args);

        info!("Updating DNS record: {} -> {}", path, body.content);
        Ok(cf.put(&path, Some(&body)).await?)
    }
}

pub struct DeleteDnsRecord;

#[async_trait]
impl Tool for DeleteDnsRecord {
    fn name(&self) -> &'static str {
        "cf_delete_dns_record"
    }

    fn description(&self) -> &'static str {
        "Delete a DNS record."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "zone_id": { "type": "string" },
                "record_id": { "type": "string" }
            },
            "required": ["zone_id", "record_id"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: DeleteDnsRecordArgs = parse_args(self.name(), args)?;

        info!("Deleting DNS record: {}", args.record_id);
        Ok(cf.delete(&record_path(&args.zone_id, &args.record_id)).await?)
    }
}
