//! `vpsie_reverse_dns`: PTR records for server IP addresses.
//!
//! The create request fully determines the record, so there is no
//! post-create lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, refreshed, require, Resource};
use crate::client::{ReverseDnsApi, ReversePtr};
use crate::error::ProviderError;
use crate::import::{join_composite, parse_composite};
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_reverse_dns";

/// Import ID format.
pub const IMPORT_FORMAT: &str = "vm_identifier/ip";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A reverse DNS (PTR) record for one IP address of a server.")
        .with_attribute(
            "vm_identifier",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute("ip", Attribute::required_string().with_min_length(1).with_force_new())
        .with_attribute("hostname", Attribute::required_string().with_min_length(1))
        .with_attribute(
            "id",
            Attribute::computed_string()
                .with_use_state_for_unknown()
                .with_description("`vm_identifier/ip`."),
        )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseDnsModel {
    pub vm_identifier: Option<String>,
    pub ip: Option<String>,
    pub hostname: String,
    pub id: Option<String>,
}

impl ReverseDnsModel {
    fn ptr(&self) -> Result<ReversePtr, ProviderError> {
        Ok(ReversePtr {
            vm_identifier: require(&self.vm_identifier, TYPE_NAME, "vm_identifier")?.to_string(),
            ip: require(&self.ip, TYPE_NAME, "ip")?.to_string(),
            hostname: self.hostname.clone(),
        })
    }
}

pub struct ReverseDnsResource<A> {
    api: Arc<A>,
}

impl<A: ReverseDnsApi> ReverseDnsResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ReverseDnsApi + 'static> Resource for ReverseDnsResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: ReverseDnsModel = decode(planned)?;
        let ptr = model.ptr()?;

        debug!(vm = %ptr.vm_identifier, ip = %ptr.ip, "Creating reverse DNS record");
        self.api
            .create_reverse_ptr(&ptr)
            .await
            .map_err(|e| ProviderError::api("Error creating reverse DNS record", e))?;

        let id = join_composite(&[ptr.vm_identifier.as_str(), ptr.ip.as_str()]);
        info!(id = %id, "Created reverse DNS record");
        model.id = Some(id);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: ReverseDnsModel = decode(state)?;
        let vm = require(&model.vm_identifier, TYPE_NAME, "vm_identifier")?.to_string();
        let ip = require(&model.ip, TYPE_NAME, "ip")?.to_string();

        let fetched = self.api.get_reverse_ptr(&vm, &ip).await;
        let Some(ptr) = refreshed(fetched, "Error reading reverse DNS record")? else {
            return Ok(None);
        };
        model.hostname = ptr.hostname;
        model.id = Some(join_composite(&[vm.as_str(), ip.as_str()]));
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: ReverseDnsModel = decode(prior)?;
        let mut planned: ReverseDnsModel = decode(planned)?;
        let ptr = planned.ptr()?;

        if planned.hostname != prior.hostname {
            self.api
                .update_reverse_ptr(&ptr)
                .await
                .map_err(|e| ProviderError::api("Error updating reverse DNS record", e))?;
        }

        planned.id = Some(join_composite(&[ptr.vm_identifier.as_str(), ptr.ip.as_str()]));
        encode(&planned)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: ReverseDnsModel = decode(state)?;
        let ptr = model.ptr()?;
        self.api
            .delete_reverse_ptr(&ptr.vm_identifier, &ptr.ip)
            .await
            .map_err(|e| ProviderError::api("Error deleting reverse DNS record", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        let [vm, ip] = parse_composite::<2>(id, IMPORT_FORMAT)?;
        Ok(json!({ "vm_identifier": vm, "ip": ip, "id": id }))
    }
}
