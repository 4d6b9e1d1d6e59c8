//! VPSie provider
//!
//! Resource and data source adapters that let Terraform manage VPSie
//! infrastructure: storage volumes and snapshots, servers, SSH keys, startup
//! scripts, projects, access tokens, DNS domains and records, and reverse DNS.
//!
//! # Overview
//!
//! - **[`VpsieProvider`]**: implements [`ProviderService`], the host-facing
//!   contract, and routes every call to the adapter for its type name
//! - **Resources**: one adapter per managed type in [`resources`], each
//!   mapping create/read/update/delete/import onto REST calls
//! - **Data sources**: list-everything adapters in [`data_sources`]
//! - **API client**: [`client::Client`] over `reqwest`, with one narrow async
//!   trait per entity so adapters can be tested against an in-memory double
//! - **Planning and validation**: schema-driven, in [`plan`] and
//!   [`validation`]
//! - **Logging**: `tracing` with an env-filtered stderr subscriber
//!
//! # Quick Start
//!
//! ```ignore
//! use vpsie_provider::{init_logging, ProviderService, VpsieProvider};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     let provider = VpsieProvider::new();
//!     provider.configure(json!({})).await?; // token from VPSIE_ACCESS_TOKEN
//!
//!     let storage = provider
//!         .create("vpsie_storage", json!({
//!             "name": "data",
//!             "size": 20,
//!             "dc_identifier": "dc-ams",
//!             "storage_type": "ssd",
//!             "disk_format": "ext4"
//!         }))
//!         .await?;
//!     println!("created {}", storage["identifier"]);
//!     Ok(())
//! }
//! ```
//!
//! # Lifecycle
//!
//! Objects whose create call returns no identifier are found again by
//! listing and matching on a natural key (name, hostname, record type and
//! name). If that lookup fails the object may exist remotely without being
//! tracked; the error says so and points at `terraform import`.
//!
//! A read that finds nothing returns `null`, telling the host to drop the
//! object from state. Any other read error is reported, never treated as
//! drift.

#![warn(missing_docs)]
#![warn(clippy::all)]

#[allow(missing_docs)]
pub mod client;
pub mod config;
#[allow(missing_docs)]
pub mod data_sources;
pub mod error;
pub mod import;
pub mod logging;
pub mod lookup;
pub mod plan;
pub mod provider;
#[allow(missing_docs)]
pub mod resources;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::VpsieProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{
    AttributeChange, ChangeAction, ImportedResource, PlanResult, ProviderMetadata,
    PROTOCOL_VERSION, SENSITIVE_PLACEHOLDER,
};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
