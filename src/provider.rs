//! The VPSie provider.
//!
//! [`VpsieProvider`] implements [`ProviderService`] by routing each host call
//! to the resource or data source adapter registered for its type name.
//! Adapters are built once, during configure, around a single shared API
//! client.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::client::{Client, VpsieApi};
use crate::config::{self, ProviderConfig};
use crate::data_sources::{self, DataSource};
use crate::error::ProviderError;
use crate::plan;
use crate::resources::{self, Resource};
use crate::schema::{Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};
use crate::validation;

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Adapters keyed by Terraform type name.
struct Registry {
    resources: HashMap<&'static str, Box<dyn Resource>>,
    data_sources: HashMap<&'static str, Box<dyn DataSource>>,
}

impl Registry {
    fn new<A: VpsieApi>(api: Arc<A>) -> Self {
        let resources = resources::catalog(api.clone())
            .into_iter()
            .map(|r| (r.type_name(), r))
            .collect();
        let data_sources = data_sources::catalog(api)
            .into_iter()
            .map(|d| (d.type_name(), d))
            .collect();
        Self {
            resources,
            data_sources,
        }
    }

    fn resource(&self, resource_type: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .get(resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    fn data_source(&self, data_source_type: &str) -> Result<&dyn DataSource, ProviderError> {
        self.data_sources
            .get(data_source_type)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

/// Terraform provider for VPSie.
///
/// # Example
///
/// ```
/// use vpsie_provider::{ProviderService, VpsieProvider};
///
/// let provider = VpsieProvider::new();
/// let schema = provider.schema();
/// assert!(schema.resources.contains_key("vpsie_storage"));
/// assert!(schema.data_sources.contains_key("vpsie_storages"));
/// ```
pub struct VpsieProvider {
    registry: OnceLock<Registry>,
    env: EnvLookup,
}

impl Default for VpsieProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VpsieProvider {
    /// A provider that builds its API client on configure.
    pub fn new() -> Self {
        Self {
            registry: OnceLock::new(),
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// A provider already wired to `api`. Configure still validates the
    /// provider block but does not build a client.
    pub fn with_api<A: VpsieApi>(api: Arc<A>) -> Self {
        Self {
            registry: OnceLock::from(Registry::new(api)),
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replace the environment lookup used for configuration fallbacks.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Whether the adapters have been built.
    pub fn is_configured(&self) -> bool {
        self.registry.get().is_some()
    }

    fn registry(&self) -> Result<&Registry, ProviderError> {
        self.registry.get().ok_or_else(|| {
            ProviderError::Configuration("provider has not been configured".to_string())
        })
    }

    fn resource_schema(resource_type: &str) -> Result<Schema, ProviderError> {
        resources::schemas()
            .into_iter()
            .find(|(name, _)| *name == resource_type)
            .map(|(_, schema)| schema)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    fn data_source_schema(data_source_type: &str) -> Result<Schema, ProviderError> {
        data_sources::schemas()
            .into_iter()
            .find(|(name, _)| *name == data_source_type)
            .map(|(_, schema)| schema)
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

fn log_failure<T>(result: Result<T, ProviderError>, operation: &str, type_name: &str) -> Result<T, ProviderError> {
    if let Err(ref e) = result {
        error!(operation, type_name, error = %e, "Operation failed");
    }
    result
}

#[async_trait::async_trait]
impl ProviderService for VpsieProvider {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(config::schema());
        for (name, resource) in resources::schemas() {
            schema = schema.with_resource(name, resource);
        }
        for (name, data_source) in data_sources::schemas() {
            schema = schema.with_data_source(name, data_source);
        }
        schema
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    #[instrument(skip(self, config))]
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = validation::validate(&config::schema(), &config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Ok(diagnostics);
        }
        diagnostics.extend(ProviderConfig::from_value(config)?.validate());
        Ok(diagnostics)
    }

    #[instrument(skip(self, config))]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = ProviderConfig::from_value(config)?.with_env_fallbacks(|name| (self.env)(name));
        debug!(config = ?config, "Configuring provider");

        let mut diagnostics = config.validate();
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Ok(diagnostics);
        }
        if self.is_configured() {
            debug!("Provider already has an API client");
            return Ok(diagnostics);
        }

        let client_config = match config.client_config() {
            Ok(client_config) => client_config,
            Err(diagnostic) => {
                warn!("No access token configured");
                diagnostics.push(diagnostic);
                return Ok(diagnostics);
            },
        };
        let client = Client::new(client_config)
            .map_err(|e| ProviderError::Configuration(format!("Error creating VPSie client: {}", e)))?;
        info!(endpoint = %client.endpoint(), "Configured VPSie client");

        if self.registry.set(Registry::new(Arc::new(client))).is_err() {
            debug!("Provider was configured concurrently; discarding the new API client");
        }
        Ok(diagnostics)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        info!("Provider stopping");
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    #[instrument(skip(self, config))]
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = Self::resource_schema(resource_type)?;
        Ok(validation::validate(&schema, &config))
    }

    #[instrument(skip(self, state))]
    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        let schema = Self::resource_schema(resource_type)?;
        if version < 0 || version as u64 > schema.version {
            return Err(ProviderError::Sdk(format!(
                "{} state version {} is newer than schema version {}",
                resource_type, version, schema.version
            )));
        }
        Ok(state)
    }

    #[instrument(skip(self, prior_state, proposed_state, config))]
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let schema = Self::resource_schema(resource_type)?;
        let result = plan::plan(&schema, prior_state.as_ref(), &proposed_state, &config);
        debug!(
            changes = result.changes.len(),
            requires_replace = result.requires_replace,
            "Planned"
        );
        Ok(result)
    }

    #[instrument(skip(self, planned_state))]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let resource = self.registry()?.resource(resource_type)?;
        log_failure(resource.create(planned_state).await, "create", resource_type)
    }

    #[instrument(skip(self, current_state))]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let resource = self.registry()?.resource(resource_type)?;
        match log_failure(resource.read(current_state).await, "read", resource_type)? {
            Some(state) => Ok(state),
            None => {
                warn!("Remote object no longer exists, removing from state");
                Ok(Value::Null)
            },
        }
    }

    #[instrument(skip(self, prior_state, planned_state))]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.registry()?.resource(resource_type)?;
        log_failure(resource.update(prior_state, planned_state).await, "update", resource_type)
    }

    #[instrument(skip(self, current_state))]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.registry()?.resource(resource_type)?;
        log_failure(resource.delete(current_state).await, "delete", resource_type)?;
        info!("Deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn import_resource(&self, resource_type: &str, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.registry()?.resource(resource_type)?;
        let seed = resource.import_state(id)?;
        match log_failure(resource.read(seed).await, "import", resource_type)? {
            Some(state) => {
                info!("Imported");
                Ok(vec![ImportedResource::new(resource_type, state)])
            },
            None => Err(ProviderError::NotFound(format!("{} {:?} does not exist", resource_type, id))),
        }
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    #[instrument(skip(self, config))]
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = Self::data_source_schema(data_source_type)?;
        Ok(validation::validate(&schema, &config))
    }

    #[instrument(skip(self, config))]
    async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value, ProviderError> {
        let data_source = self.registry()?.data_source(data_source_type)?;
        log_failure(data_source.read(config).await, "read_data_source", data_source_type)
    }
}
