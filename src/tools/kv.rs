//! Workers KV tools
//!
//! Namespace and key listings are regular enveloped JSON endpoints. Values are
//! read and written through the raw client operations because the value
//! endpoints exchange the stored bytes directly.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{parse_args, resolve_account, Tool};
use crate::cloudflare::{CloudflareClient, Query};
use crate::error::ToolError;

fn namespaces_path(account_id: &str) -> String {
    format!("/accounts/{}/storage/kv/namespaces", account_id)
}

fn keys_path(account_id: &str, namespace_id: &str) -> String {
    format!("{}/{}/keys", namespaces_path(account_id), namespace_id)
}

/// Absolute URL of a single value. The key is encoded as one path segment.
pub fn value_url(cf: &CloudflareClient, account_id: &str, namespace_id: &str, key: &str) -> String {
    cf.url(&format!(
        "{}/{}/values/{}",
        namespaces_path(account_id),
        namespace_id,
        urlencoding::encode(key)
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListKvNamespacesArgs {
    pub account_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListKvKeysArgs {
    pub account_id: Option<String>,
    pub namespace_id: String,
    pub prefix: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Addresses one KV entry; shared by read and delete.
#[derive(Debug, Deserialize)]
pub struct KvEntryArgs {
    pub account_id: Option<String>,
    pub namespace_id: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteKvValueArgs {
    pub account_id: Option<String>,
    pub namespace_id: String,
    pub key: String,
    pub value: String,
    pub expiration_ttl: Option<u64>,
}

fn entry_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "account_id": { "type": "string" },
            "namespace_id": { "type": "string" },
            "key": { "type": "string" }
        },
        "required": ["namespace_id", "key"]
    })
}

pub struct ListKvNamespaces;

#[async_trait]
impl Tool for ListKvNamespaces {
    fn name(&self) -> &'static str {
        "cf_list_kv_namespaces"
    }

    fn description(&self) -> &'static str {
        "List Workers KV namespaces."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "account_id": { "type": "string" },
                "page": { "type": "integer" },
                "per_page": { "type": "integer" }
            }
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: ListKvNamespacesArgs = parse_args(self.name(), args)?;
        let account_id = resolve_account(cf, args.account_id.as_deref())?;

        let mut query = Query::new();
        query
            .push_opt("page", args.page)
            .push_opt("per_page", args.per_page);
        Ok(cf.get(&namespaces_path(account_id), Some(&query)).await?)
    }
}

pub struct ListKvKeys;

#[async_trait]
impl Tool for ListKvKeys {
    fn name(&self) -> &'static str {
        "cf_list_kv_keys"
    }

    fn description(&self) -> &'static str {
        "List keys in a KV namespace."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "account_id": { "type": "string" },
                "namespace_id": { "type": "string" },
                "prefix": { "type": "string" },
                "limit": { "type": "integer" },
                "cursor": { "type": "string", "description": "Cursor from a previous page's result_info" }
            },
            "required": ["namespace_id"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: ListKvKeysArgs = parse_args(self.name(), args)?;
        let account_id = resolve_account(cf, args.account_id.as_deref())?;

        let mut query = Query::new();
        query
            .push_opt("prefix", args.prefix.as_deref())
            .push_opt("limit", args.limit)
            .push_opt("cursor", args.cursor.as_deref());
        Ok(cf
            .get(&keys_path(account_id, &args.namespace_id), Some(&query))
            .await?)
    }
}

pub struct ReadKvValue;

#[async_trait]
impl Tool for ReadKvValue {
    fn name(&self) -> &'static str {
        "cf_read_kv_value"
    }

    fn description(&self) -> &'static str {
        "Read a value from KV storage by key."
    }

    fn input_schema(&self) -> Value {
        entry_schema()
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: KvEntryArgs = parse_args(self.name(), args)?;
        let account_id = resolve_account(cf, args.account_id.as_deref())?;

        let url = value_url(cf, account_id, &args.namespace_id, &args.key);
        let value = cf.get_raw(&url).await?;
        Ok(json!({ "value": value }))
    }
}

pub struct WriteKvValue;

#[async_trait]
impl Tool for WriteKvValue {
    fn name(&self) -> &'static str {
        "cf_write_kv_value"
    }

    fn description(&self) -> &'static str {
        "Write a key-value pair to KV storage."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "account_id": { "type": "string" },
                "namespace_id": { "type": "string" },
                "key": { "type": "string" },
                "value": { "type": "string" },
                "expiration_ttl": { "type": "integer", "description": "Seconds until the key expires" }
            },
            "required": ["namespace_id", "key", "value"]
        })
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: WriteKvValueArgs = parse_args(self.name(), args)?;
        let account_id = resolve_account(cf, args.account_id.as_deref())?;

        let url = value_url(cf, account_id, &args.namespace_id, &args.key);
        let mut query = Query::new();
        query.push_opt("expiration_ttl", args.expiration_ttl);

        info!("Writing KV value: {}/{} ({} bytes)", args.namespace_id, args.key, args.value.len());
        cf.put_raw(&url, &args.value, Some(&query)).await?;
        Ok(json!({ "ok": true }))
    }
}

pub struct DeleteKvValue;

#[async_trait]
impl Tool for DeleteKvValue {
    fn name(&self) -> &'static str {
        "cf_delete_kv_value"
    }

    fn description(&self) -> &'static str {
        "Delete a key from KV storage."
    }

    fn input_schema(&self) -> Value {
        entry_schema()
    }

    async fn execute(&self, cf: &CloudflareClient, args: Value) -> Result<Value, ToolError> {
        let args: KvEntryArgs = parse_args(self.name(), args)?;
        let account_id = resolve_account(cf, args.account_id.as_deref())?;

        info!("Deleting KV value: {}/{}", args.namespace_id, args.key);
        cf.delete_raw(&value_url(cf, account_id, &args.namespace_id, &args.key))
            .await?;
        Ok(json!({ "ok": true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudflareConfig;

    #[test]
    fn test_value_url_encodes_key_as_one_segment() {
        let cf = CloudflareClient::new(CloudflareConfig::new("tok")).unwrap();
        assert_eq!(
            value_url(&cf, "acct", "ns1", "users/42 profile"),
            "https://api.cloudflare.com/client/v4/accounts/acct/storage/kv/namespaces/ns1/values/users%2F42%20profile"
        );
    }

    #[test]
    fn test_keys_path() {
        assert_eq!(
            keys_path("acct", "ns1"),
            "/accounts/acct/storage/kv/namespaces/ns1/keys"
        );
    }

    #[tokio::test]
    async fn test_missing_account_fails_before_any_request() {
        // Unroutable base: reaching the network would surface a Request error instead
        let cf = CloudflareClient::new(CloudflareConfig::new("tok").with_api_base("http://127.0.0.1:1"))
            .unwrap();
        let result = ReadKvValue
            .execute(&cf, json!({"namespace_id": "ns1", "key": "k"}))
            .await;
        assert!(matches!(result, Err(ToolError::MissingAccountId)));
    }
}
