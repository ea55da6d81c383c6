//! Cloudflare Fabric Library
//!
//! Adapts the Cloudflare v4 API (zones, DNS, cache purge, Workers KV,
//! analytics) into tool descriptors an agent framework can call.

pub mod app;
pub mod cloudflare;
pub mod config;
pub mod error;
pub mod health;
pub mod tools;

pub use app::FabricApp;
pub use cloudflare::{CloudflareClient, Query};
pub use config::CloudflareConfig;
pub use error::{CloudflareError, ToolError};
pub use health::{HealthReport, HealthStatus};
pub use tools::{Tool, ToolDefinition};
