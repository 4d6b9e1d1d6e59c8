//! Read-only data sources.
//!
//! Every data source lists all entities of one type and writes them as a
//! single list attribute. The state has a fixed synthetic `id` equal to the
//! list attribute's name. A listing error aborts the read; there are no
//! partial results. Secret values are never exposed.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::VpsieApi;
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeType, Schema};

pub mod access_tokens;
pub mod domains;
pub mod projects;
pub mod scripts;
pub mod servers;
pub mod ssh_keys;
pub mod storages;

/// A read-only data source type.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// The Terraform type name, e.g. `vpsie_storages`.
    fn type_name(&self) -> &'static str;

    /// The data source schema.
    fn schema(&self) -> Schema;

    /// List every entity and build the state.
    async fn read(&self, config: Value) -> Result<Value, ProviderError>;
}

/// Build every data source around a shared API client.
pub fn catalog<A: VpsieApi>(api: Arc<A>) -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(access_tokens::AccessTokensDataSource::new(api.clone())),
        Box::new(domains::DomainsDataSource::new(api.clone())),
        Box::new(projects::ProjectsDataSource::new(api.clone())),
        Box::new(scripts::ScriptsDataSource::new(api.clone())),
        Box::new(ssh_keys::SshKeysDataSource::new(api.clone())),
        Box::new(storages::StoragesDataSource::new(api.clone())),
        Box::new(storages::SnapshotsDataSource::new(api.clone())),
        Box::new(servers::ServersDataSource::new(api)),
    ]
}

/// Data source schemas by type name.
pub fn schemas() -> Vec<(&'static str, Schema)> {
    vec![
        (access_tokens::TYPE_NAME, access_tokens::schema()),
        (domains::TYPE_NAME, domains::schema()),
        (projects::TYPE_NAME, projects::schema()),
        (scripts::TYPE_NAME, scripts::schema()),
        (ssh_keys::TYPE_NAME, ssh_keys::schema()),
        (storages::STORAGES_TYPE_NAME, storages::storages_schema()),
        (storages::SNAPSHOTS_TYPE_NAME, storages::snapshots_schema()),
        (servers::TYPE_NAME, servers::schema()),
    ]
}

/// Schema with a computed `id` and one computed list of objects named
/// `list_attribute`.
pub(crate) fn list_schema(
    description: &str,
    list_attribute: &str,
    fields: &[(&str, AttributeType)],
) -> Schema {
    Schema::v0()
        .with_description(description)
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            list_attribute,
            Attribute::computed_object_list(fields.iter().map(|(name, ty)| (*name, ty.clone()))),
        )
}

/// Build `{"id": id, id: [items...]}`.
pub(crate) fn list_state<T: Serialize>(id: &'static str, items: Vec<T>) -> Result<Value, ProviderError> {
    let mut state = Map::new();
    state.insert("id".to_string(), Value::String(id.to_string()));
    state.insert(id.to_string(), serde_json::to_value(items)?);
    Ok(Value::Object(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;
    use crate::client::*;
    use std::collections::HashMap;

    fn seeded() -> Arc<MockApi> {
        let api = MockApi::new();
        api.access_tokens.lock().unwrap().push(AccessToken {
            access_token_identifier: "token-1".into(),
            name: "ci".into(),
            ..Default::default()
        });
        api.domains.lock().unwrap().push(Domain {
            identifier: "domain-1".into(),
            domain_name: "example.com".into(),
            ..Default::default()
        });
        api.projects.lock().unwrap().push(Project {
            id: 1,
            identifier: "project-1".into(),
            name: "web".into(),
            ..Default::default()
        });
        api.scripts.lock().unwrap().push(Script {
            identifier: "script-1".into(),
            name: "boot".into(),
            ..Default::default()
        });
        api.ssh_keys.lock().unwrap().push(SshKey {
            id: 2,
            identifier: "key-2".into(),
            name: "laptop".into(),
            ..Default::default()
        });
        api.storages.lock().unwrap().push(Storage {
            id: 3,
            identifier: "storage-3".into(),
            name: "data".into(),
            size: 20,
            ..Default::default()
        });
        api.snapshots.lock().unwrap().push(StorageSnapshot {
            identifier: "snapshot-4".into(),
            name: "nightly".into(),
            storage_identifier: "storage-3".into(),
            ..Default::default()
        });
        api.servers.lock().unwrap().push(Server {
            identifier: "vm-5".into(),
            hostname: "web-1".into(),
            initial_password: Some("s3cret-initial".into()),
            ..Default::default()
        });
        Arc::new(api)
    }

    #[test]
    fn test_catalog_matches_schemas() {
        let mut from_catalog: Vec<_> = catalog(seeded()).iter().map(|d| d.type_name()).collect();
        let mut from_schemas: Vec<_> = schemas().into_iter().map(|(name, _)| name).collect();
        from_catalog.sort();
        from_schemas.sort();
        assert_eq!(from_catalog, from_schemas);
        assert_eq!(from_catalog.len(), 8);
    }

    #[tokio::test]
    async fn test_every_item_field_is_declared() {
        let listed: HashMap<_, _> = schemas().into_iter().collect();
        for source in catalog(seeded()) {
            let state = source.read(Value::Null).await.unwrap();
            let id = state["id"].as_str().unwrap().to_string();
            let items = state[&id].as_array().unwrap();
            assert_eq!(items.len(), 1, "{}", source.type_name());

            let schema = &listed[source.type_name()];
            let Some(AttributeType::List(element)) = schema.attribute(&id).map(|a| &a.attr_type) else {
                panic!("{} has no list attribute {}", source.type_name(), id);
            };
            let AttributeType::Object(fields) = element.as_ref() else {
                panic!("{} list is not a list of objects", source.type_name());
            };
            for key in items[0].as_object().unwrap().keys() {
                assert!(fields.contains_key(key), "{}: undeclared field {}", source.type_name(), key);
            }
        }
    }

    #[tokio::test]
    async fn test_secrets_never_exposed() {
        for source in catalog(seeded()) {
            let rendered = source.read(Value::Null).await.unwrap().to_string();
            assert!(!rendered.contains("s3cret-initial"));
            assert!(!rendered.contains("initial_password"));
            assert!(!rendered.contains("private_key"));
        }
    }

    #[tokio::test]
    async fn test_listing_error_aborts() {
        let api = seeded();
        api.fail(
            "list_storages",
            ClientError::Api {
                status: 503,
                message: "maintenance".to_string(),
            },
        );
        let source = storages::StoragesDataSource::new(api);
        let err = source.read(Value::Null).await.unwrap_err();
        assert_eq!(err.to_diagnostic().summary, "Error listing storages");
    }

    #[test]
    fn test_list_state_shape() {
        let state = list_state("projects", vec![serde_json::json!({"name": "web"})]).unwrap();
        assert_eq!(state["id"], "projects");
        assert_eq!(state["projects"][0]["name"], "web");
    }
}
