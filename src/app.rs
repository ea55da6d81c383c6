//! Fabric app
//!
//! Bundles the client with the tool catalog so a host can list tools, run
//! them by name and ask for health.

use serde_json::Value;
use tracing::info;

use crate::cloudflare::CloudflareClient;
use crate::config::CloudflareConfig;
use crate::error::{CloudflareError, ToolError};
use crate::health::{self, HealthReport};
use crate::tools::{self, Tool, ToolDefinition};

pub const APP_NAME: &str = "cloudflare-fabric";
pub const APP_DESCRIPTION: &str = "Cloudflare fabric app: DNS, zones, cache, and KV";

pub struct FabricApp {
    client: CloudflareClient,
    tools: Vec<Box<dyn Tool>>,
}

impl FabricApp {
    pub fn new(client: CloudflareClient) -> Self {
        Self {
            client,
            tools: tools::catalog(),
        }
    }

    pub fn from_config(config: CloudflareConfig) -> Result<Self, CloudflareError> {
        Ok(Self::new(CloudflareClient::new(config)?))
    }

    pub fn name(&self) -> &'static str {
        APP_NAME
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn description(&self) -> &'static str {
        APP_DESCRIPTION
    }

    pub fn client(&self) -> &CloudflareClient {
        &self.client
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Run one tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .tool(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        info!("Executing tool: {}", name);
        tool.execute(&self.client, args).await
    }

    pub async fn health(&self) -> HealthReport {
        health::check(&self.client, APP_NAME).await
    }
}

impl std::fmt::Debug for FabricApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabricApp")
            .field("client", &self.client)
            .field("tools", &self.tools.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app() -> FabricApp {
        FabricApp::from_config(CloudflareConfig::new("tok")).unwrap()
    }

    #[test]
    fn test_app_metadata() {
        let app = app();
        assert_eq!(app.name(), "cloudflare-fabric");
        assert_eq!(app.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(app.definitions().len(), app.tools().len());
    }

    #[test]
    fn test_tool_lookup() {
        let app = app();
        assert!(app.tool("cf_purge_cache").is_some());
        assert!(app.tool("cf_reboot_internet").is_none());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let err = app().execute("cf_nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "cf_nope"));
    }

    #[test]
    fn test_from_config_requires_token() {
        assert!(matches!(
            FabricApp::from_config(CloudflareConfig::new("")),
            Err(CloudflareError::MissingToken)
        ));
    }
}
