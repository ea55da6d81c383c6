//! Agent Tools
//!
//! Each tool maps one Cloudflare endpoint to a named, schema-described call.
//! Arguments arrive as JSON and are deserialised into a typed struct per tool
//! before anything is sent.

pub mod analytics;
pub mod cache;
pub mod dns;
pub mod kv;
pub mod zones;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cloudflare::CloudflareClient;
use crate::error::ToolError;

/// Serialisable tool descriptor handed to the agent framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema for the `args` object
    fn input_schema(&self) -> Value;

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// All tools, in catalog order.
pub fn catalog() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(zones::ListZones),
        Box::new(zones::GetZone),
        Box::new(dns::ListDnsRecords),
        Box::new(dns::CreateDnsRecord),
        Box::new(dns::UpdateDnsRecord),
        Box::new(dns::DeleteDnsRecord),
        Box::new(cache::PurgeCache),
        Box::new(kv::ListKvNamespaces),
        Box::new(kv::ListKvKeys),
        Box::new(kv::ReadKvValue),
        Box::new(kv::WriteKvValue),
        Box::new(kv::DeleteKvValue),
        Box::new(analytics::ZoneAnalytics),
    ]
}

/// Deserialise tool arguments. `null` is treated as an empty object.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Account from the arguments, else the client's default.
pub(crate) fn resolve_account<'a>(
    cf: &'a CloudflareClient,
    account_id: Option<&'a str>,
) -> Result<&'a str, ToolError> {
    account_id
        .filter(|id| !id.is_empty())
        .or_else(|| cf.account_id().filter(|id| !id.is_empty()))
        .ok_or(ToolError::MissingAccountId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudflareConfig;
    use serde_json::json;
    use std::collections::HashSet;

    #[derive(Debug, Deserialize)]
    struct Sample {
        zone_id: String,
        page: Option<u32>,
    }

    #[test]
    fn test_catalog_has_thirteen_unique_tools() {
        let tools = catalog();
        assert_eq!(tools.len(), 13);

        let names: HashSet<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), 13);
        assert!(names.iter().all(|n| n.starts_with("cf_")));
    }

    #[test]
    fn test_every_schema_is_an_object_with_known_required_fields() {
        for tool in catalog() {
            let schema = tool.input_schema();
            assert_eq!(schema["type"], "object", "{}", tool.name());

            let properties = schema["properties"].as_object().unwrap();
            if let Some(required) = schema.get("required") {
                for field in required.as_array().unwrap() {
                    let field = field.as_str().unwrap();
                    assert!(properties.contains_key(field), "{}: {}", tool.name(), field);
                }
            }
        }
    }

    #[test]
    fn test_numeric_properties_are_integers() {
        for tool in catalog() {
            let schema = tool.input_schema();
            for (field, property) in schema["properties"].as_object().unwrap() {
                assert_ne!(property["type"], "number", "{}: {}", tool.name(), field);
            }
        }

        let schema = dns::CreateDnsRecord.input_schema();
        assert_eq!(schema["properties"]["ttl"]["type"], "integer");
        assert_eq!(schema["properties"]["priority"]["type"], "integer");
    }

    #[test]
    fn test_definition_serialises_input_schema_in_camel_case() {
        let definition = zones::GetZone.definition();
        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(value["name"], "cf_get_zone");
        assert!(value.get("inputSchema").is_some());
    }

    #[test]
    fn test_parse_args_reports_tool_name() {
        let err = parse_args::<Sample>("cf_get_zone", json!({"page": 1})).unwrap_err();
        match err {
            ToolError::InvalidArguments { tool, .. } => assert_eq!(tool, "cf_get_zone"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_args_accepts_optional_fields() {
        let sample: Sample = parse_args("t", json!({"zone_id": "z1"})).unwrap();
        assert_eq!(sample.zone_id, "z1");
        assert!(sample.page.is_none());
    }

    #[test]
    fn test_resolve_account_prefers_arguments() {
        let cf = CloudflareClient::new(CloudflareConfig::new("tok").with_account_id("default"))
            .unwrap();
        assert_eq!(resolve_account(&cf, Some("explicit")).unwrap(), "explicit");
        assert_eq!(resolve_account(&cf, None).unwrap(), "default");
        assert_eq!(resolve_account(&cf, Some("")).unwrap(), "default");
    }

    #[test]
    fn test_resolve_account_requires_some_account() {
        let cf = CloudflareClient::new(CloudflareConfig::new("tok")).unwrap();
        assert!(matches!(
            resolve_account(&cf, None),
            Err(ToolError::MissingAccountId)
        ));
    }
}
