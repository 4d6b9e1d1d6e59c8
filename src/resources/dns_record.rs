//! `vpsie_dns_record`: records inside a domain.
//!
//! Records have no server-side identifier. They are addressed by
//! `(domain_identifier, type, name)`, which is also the import ID and the
//! value of `id`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, orphaned, refreshed, require, Resource};
use crate::client::{DnsRecord, DomainApi};
use crate::error::ProviderError;
use crate::import::{join_composite, parse_composite};
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_dns_record";

/// TTL used when the configuration leaves it out.
pub const DEFAULT_TTL: i64 = 3600;

/// Import ID format.
pub const IMPORT_FORMAT: &str = "domain_identifier/type/name";

/// Record types the API accepts.
pub const RECORD_TYPES: [&str; 8] = ["A", "AAAA", "CNAME", "MX", "TXT", "NS", "SRV", "CAA"];

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A DNS record within a domain.")
        .with_attribute(
            "domain_identifier",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute(
            "type",
            Attribute::required_string()
                .with_force_new()
                .with_one_of(RECORD_TYPES),
        )
        .with_attribute("name", Attribute::required_string().with_min_length(1).with_force_new())
        .with_attribute("content", Attribute::required_string())
        .with_attribute(
            "ttl",
            Attribute::optional_computed_int64()
                .with_default(json!(DEFAULT_TTL))
                .with_description("Time to live in seconds. Defaults to 3600."),
        )
        .with_attribute(
            "id",
            Attribute::computed_string()
                .with_use_state_for_unknown()
                .with_description("`domain_identifier/type/name`."),
        )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecordModel {
    pub domain_identifier: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub name: Option<String>,
    pub content: String,
    pub ttl: Option<i64>,
    pub id: Option<String>,
}

/// The key fields of a record, borrowed from a model.
struct RecordKey<'a> {
    domain: &'a str,
    record_type: &'a str,
    name: &'a str,
}

impl<'a> RecordKey<'a> {
    fn of(model: &'a DnsRecordModel) -> Result<Self, ProviderError> {
        Ok(Self {
            domain: require(&model.domain_identifier, TYPE_NAME, "domain_identifier")?,
            record_type: require(&model.record_type, TYPE_NAME, "type")?,
            name: require(&model.name, TYPE_NAME, "name")?,
        })
    }

    fn id(&self) -> String {
        join_composite(&[self.domain, self.record_type, self.name])
    }

    fn matches(&self, record: &DnsRecord) -> bool {
        record.record_type == self.record_type && record.name == self.name
    }
}

impl DnsRecordModel {
    fn to_record(&self) -> Result<DnsRecord, ProviderError> {
        let key = RecordKey::of(self)?;
        Ok(DnsRecord {
            record_type: key.record_type.to_string(),
            name: key.name.to_string(),
            content: self.content.clone(),
            ttl: self.ttl.unwrap_or(DEFAULT_TTL),
        })
    }
}

pub struct DnsRecordResource<A> {
    api: Arc<A>,
}

impl<A: DomainApi> DnsRecordResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    async fn find(&self, key: &RecordKey<'_>) -> Result<DnsRecord, crate::client::ClientError> {
        find_first(
            self.api.list_dns_records(key.domain).await,
            "dns record",
            "type and name",
            &format!("{} {}", key.record_type, key.name),
            |r| key.matches(r),
        )
    }
}

#[async_trait::async_trait]
impl<A: DomainApi + 'static> Resource for DnsRecordResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: DnsRecordModel = decode(planned)?;
        let record = model.to_record()?;
        let key = RecordKey::of(&model)?;

        debug!(domain = key.domain, record_type = key.record_type, name = key.name, "Creating DNS record");
        self.api
            .create_dns_record(key.domain, &record)
            .await
            .map_err(|e| ProviderError::api("Error creating DNS record", e))?;

        let id = key.id();
        let found = self.find(&key).await.map_err(|e| orphaned(TYPE_NAME, &id, e))?;

        info!(id = %id, "Created DNS record");
        model.content = found.content;
        model.ttl = Some(found.ttl);
        model.id = Some(id);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: DnsRecordModel = decode(state)?;
        let key = RecordKey::of(&model)?;
        let id = key.id();

        let Some(found) = refreshed(self.find(&key).await, "Error reading DNS record")? else {
            return Ok(None);
        };
        model.content = found.content;
        model.ttl = Some(found.ttl);
        model.id = Some(id);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: DnsRecordModel = decode(prior)?;
        let mut planned: DnsRecordModel = decode(planned)?;
        planned.ttl = Some(planned.ttl.unwrap_or(DEFAULT_TTL));

        let current = prior.to_record()?;
        let next = planned.to_record()?;
        let key = RecordKey::of(&planned)?;
        let id = key.id();

        if current.content != next.content || current.ttl != next.ttl {
            self.api
                .update_dns_record(key.domain, &current, &next)
                .await
                .map_err(|e| ProviderError::api("Error updating DNS record", e))?;
        }

        planned.id = Some(id);
        encode(&planned)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: DnsRecordModel = decode(state)?;
        let record = model.to_record()?;
        let key = RecordKey::of(&model)?;
        self.api
            .delete_dns_record(key.domain, &record)
            .await
            .map_err(|e| ProviderError::api("Error deleting DNS record", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        let [domain, record_type, name] = parse_composite::<3>(id, IMPORT_FORMAT)?;
        Ok(json!({
            "domain_identifier": domain,
            "type": record_type,
            "name": name,
            "id": id,
        }))
    }
}
