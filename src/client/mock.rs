//! In-memory stand-in for the VPSie API used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;

#[derive(Default)]
pub(crate) struct MockApi {
    pub access_tokens: Mutex<Vec<AccessToken>>,
    pub domains: Mutex<Vec<Domain>>,
    pub records: Mutex<HashMap<String, Vec<DnsRecord>>>,
    pub ptrs: Mutex<Vec<ReversePtr>>,
    pub projects: Mutex<Vec<Project>>,
    pub scripts: Mutex<Vec<Script>>,
    pub ssh_keys: Mutex<Vec<SshKey>>,
    pub storages: Mutex<Vec<Storage>>,
    pub snapshots: Mutex<Vec<StorageSnapshot>>,
    pub servers: Mutex<Vec<Server>>,
    /// When set, create calls succeed but nothing shows up in listings.
    pub hide_created: AtomicBool,
    failures: Mutex<HashMap<&'static str, ClientError>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `op` fail with `err`.
    pub fn fail(&self, op: &'static str, err: ClientError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, op: &'static str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(op.to_string());
        match self.failures.lock().unwrap().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn next_identifier(&self, prefix: &str) -> (i64, String) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        (id, format!("{}-{}", prefix, id))
    }

    fn hidden(&self) -> bool {
        self.hide_created.load(Ordering::SeqCst)
    }
}

fn not_found(what: &str, identifier: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("{} {} not found", what, identifier),
    }
}

#[async_trait]
impl AccessTokenApi for MockApi {
    async fn list_access_tokens(&self) -> Result<Vec<AccessToken>, ClientError> {
        self.check("list_access_tokens")?;
        Ok(self.access_tokens.lock().unwrap().clone())
    }

    async fn create_access_token(&self, req: &CreateAccessTokenRequest) -> Result<(), ClientError> {
        self.check("create_access_token")?;
        let (_, identifier) = self.next_identifier("token");
        if !self.hidden() {
            self.access_tokens.lock().unwrap().push(AccessToken {
                access_token_identifier: identifier,
                name: req.name.clone(),
                expiration_date: req.expiration_date.clone(),
                created_on: "2024-01-01 00:00:00".to_string(),
            });
        }
        Ok(())
    }

    async fn update_access_token(
        &self,
        identifier: &str,
        req: &UpdateAccessTokenRequest,
    ) -> Result<(), ClientError> {
        self.check("update_access_token")?;
        let mut tokens = self.access_tokens.lock().unwrap();
        let token = tokens
            .iter_mut()
            .find(|t| t.access_token_identifier == identifier)
            .ok_or_else(|| not_found("access token", identifier))?;
        token.name = req.name.clone();
        token.expiration_date = req.expiration_date.clone();
        Ok(())
    }

    async fn delete_access_token(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_access_token")?;
        self.access_tokens
            .lock()
            .unwrap()
            .retain(|t| t.access_token_identifier != identifier);
        Ok(())
    }
}

#[async_trait]
impl DomainApi for MockApi {
    async fn list_domains(&self) -> Result<Vec<Domain>, ClientError> {
        self.check("list_domains")?;
        Ok(self.domains.lock().unwrap().clone())
    }

    async fn create_domain(&self, req: &CreateDomainRequest) -> Result<(), ClientError> {
        self.check("create_domain")?;
        let (_, identifier) = self.next_identifier("domain");
        if !self.hidden() {
            self.domains.lock().unwrap().push(Domain {
                identifier,
                domain_name: req.domain_name.clone(),
                project_identifier: Some(req.project_identifier.clone()),
                ns_validated: 0,
                created_on: "2024-01-01 00:00:00".to_string(),
                last_check: None,
            });
        }
        Ok(())
    }

    async fn delete_domain(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_domain")?;
        self.domains.lock().unwrap().retain(|d| d.identifier != identifier);
        Ok(())
    }

    async fn list_dns_records(&self, domain_identifier: &str) -> Result<Vec<DnsRecord>, ClientError> {
        self.check("list_dns_records")?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(domain_identifier)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_dns_record(
        &self,
        domain_identifier: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError> {
        self.check("create_dns_record")?;
        if !self.hidden() {
            self.records
                .lock()
                .unwrap()
                .entry(domain_identifier.to_string())
                .or_default()
                .push(record.clone());
        }
        Ok(())
    }

    async fn update_dns_record(
        &self,
        domain_identifier: &str,
        current: &DnsRecord,
        new: &DnsRecord,
    ) -> Result<(), ClientError> {
        self.check("update_dns_record")?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(domain_identifier)
            .and_then(|rs| {
                rs.iter_mut()
                    .find(|r| r.record_type == current.record_type && r.name == current.name)
            })
            .ok_or_else(|| not_found("record", &current.name))?;
        *record = new.clone();
        Ok(())
    }

    async fn delete_dns_record(
        &self,
        domain_identifier: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError> {
        self.check("delete_dns_record")?;
        if let Some(rs) = self.records.lock().unwrap().get_mut(domain_identifier) {
            rs.retain(|r| !(r.record_type == record.record_type && r.name == record.name));
        }
        Ok(())
    }
}

#[async_trait]
impl ReverseDnsApi for MockApi {
    async fn get_reverse_ptr(&self, vm_identifier: &str, ip: &str) -> Result<ReversePtr, ClientError> {
        self.check("get_reverse_ptr")?;
        self.ptrs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.vm_identifier == vm_identifier && p.ip == ip)
            .cloned()
            .ok_or_else(|| not_found("ptr", ip))
    }

    async fn create_reverse_ptr(&self, ptr: &ReversePtr) -> Result<(), ClientError> {
        self.check("create_reverse_ptr")?;
        self.ptrs.lock().unwrap().push(ptr.clone());
        Ok(())
    }

    async fn update_reverse_ptr(&self, ptr: &ReversePtr) -> Result<(), ClientError> {
        self.check("update_reverse_ptr")?;
        let mut ptrs = self.ptrs.lock().unwrap();
        let existing = ptrs
            .iter_mut()
            .find(|p| p.vm_identifier == ptr.vm_identifier && p.ip == ptr.ip)
            .ok_or_else(|| not_found("ptr", &ptr.ip))?;
        existing.hostname = ptr.hostname.clone();
        Ok(())
    }

    async fn delete_reverse_ptr(&self, vm_identifier: &str, ip: &str) -> Result<(), ClientError> {
        self.check("delete_reverse_ptr")?;
        self.ptrs
            .lock()
            .unwrap()
            .retain(|p| !(p.vm_identifier == vm_identifier && p.ip == ip));
        Ok(())
    }
}

#[async_trait]
impl ProjectApi for MockApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.check("list_projects")?;
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn get_project(&self, identifier: &str) -> Result<Project, ClientError> {
        self.check("get_project")?;
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.identifier == identifier)
            .cloned()
            .ok_or_else(|| not_found("project", identifier))
    }

    async fn create_project(&self, req: &CreateProjectRequest) -> Result<(), ClientError> {
        self.check("create_project")?;
        let (id, identifier) = self.next_identifier("project");
        if !self.hidden() {
            self.projects.lock().unwrap().push(Project {
                id,
                identifier,
                name: req.name.clone(),
                description: req.description.clone(),
                created_on: "2024-01-01 00:00:00".to_string(),
                created_by: Some("tester".to_string()),
            });
        }
        Ok(())
    }

    async fn delete_project(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_project")?;
        self.projects.lock().unwrap().retain(|p| p.identifier != identifier);
        Ok(())
    }
}

#[async_trait]
impl ScriptApi for MockApi {
    async fn list_scripts(&self) -> Result<Vec<Script>, ClientError> {
        self.check("list_scripts")?;
        Ok(self.scripts.lock().unwrap().clone())
    }

    async fn get_script(&self, identifier: &str) -> Result<Script, ClientError> {
        self.check("get_script")?;
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.identifier == identifier)
            .cloned()
            .ok_or_else(|| not_found("script", identifier))
    }

    async fn create_script(&self, req: &ScriptRequest) -> Result<(), ClientError> {
        self.check("create_script")?;
        let (_, identifier) = self.next_identifier("script");
        if !self.hidden() {
            self.scripts.lock().unwrap().push(Script {
                identifier,
                name: req.name.clone(),
                script: req.script.clone(),
                script_type: req.script_type.clone(),
                created_on: "2024-01-01 00:00:00".to_string(),
            });
        }
        Ok(())
    }

    async fn update_script(&self, identifier: &str, req: &ScriptRequest) -> Result<(), ClientError> {
        self.check("update_script")?;
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts
            .iter_mut()
            .find(|s| s.identifier == identifier)
            .ok_or_else(|| not_found("script", identifier))?;
        script.name = req.name.clone();
        script.script = req.script.clone();
        script.script_type = req.script_type.clone();
        Ok(())
    }

    async fn delete_script(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_script")?;
        self.scripts.lock().unwrap().retain(|s| s.identifier != identifier);
        Ok(())
    }
}

#[async_trait]
impl SshKeyApi for MockApi {
    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>, ClientError> {
        self.check("list_ssh_keys")?;
        Ok(self.ssh_keys.lock().unwrap().clone())
    }

    async fn create_ssh_key(&self, req: &CreateSshKeyRequest) -> Result<(), ClientError> {
        self.check("create_ssh_key")?;
        let (id, identifier) = self.next_identifier("key");
        if !self.hidden() {
            self.ssh_keys.lock().unwrap().push(SshKey {
                id,
                identifier,
                name: req.name.clone(),
                created_on: "2024-01-01 00:00:00".to_string(),
                created_by: Some("tester".to_string()),
            });
        }
        Ok(())
    }

    async fn delete_ssh_key(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_ssh_key")?;
        self.ssh_keys.lock().unwrap().retain(|k| k.identifier != identifier);
        Ok(())
    }
}

#[async_trait]
impl StorageApi for MockApi {
    async fn list_storages(&self) -> Result<Vec<Storage>, ClientError> {
        self.check("list_storages")?;
        Ok(self.storages.lock().unwrap().clone())
    }

    async fn get_storage(&self, identifier: &str) -> Result<Storage, ClientError> {
        self.check("get_storage")?;
        self.storages
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.identifier == identifier)
            .cloned()
            .ok_or_else(|| not_found("storage", identifier))
    }

    async fn create_storage(&self, req: &CreateStorageRequest) -> Result<(), ClientError> {
        self.check("create_storage")?;
        let (id, identifier) = self.next_identifier("storage");
        if !self.hidden() {
            self.storages.lock().unwrap().push(Storage {
                id,
                identifier,
                name: req.name.clone(),
                description: req.description.clone(),
                size: req.size,
                storage_type: req.storage_type.clone(),
                disk_format: req.disk_format.clone(),
                dc_identifier: req.dc_identifier.clone(),
                created_on: "2024-01-01 00:00:00".to_string(),
            });
        }
        Ok(())
    }

    async fn rename_storage(&self, identifier: &str, name: &str) -> Result<(), ClientError> {
        self.check("rename_storage")?;
        let mut storages = self.storages.lock().unwrap();
        let storage = storages
            .iter_mut()
            .find(|s| s.identifier == identifier)
            .ok_or_else(|| not_found("storage", identifier))?;
        storage.name = name.to_string();
        Ok(())
    }

    async fn resize_storage(&self, identifier: &str, size: i64) -> Result<(), ClientError> {
        self.check("resize_storage")?;
        let mut storages = self.storages.lock().unwrap();
        let storage = storages
            .iter_mut()
            .find(|s| s.identifier == identifier)
            .ok_or_else(|| not_found("storage", identifier))?;
        storage.size = size;
        Ok(())
    }

    async fn delete_storage(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_storage")?;
        self.storages.lock().unwrap().retain(|s| s.identifier != identifier);
        Ok(())
    }
}

#[async_trait]
impl SnapshotApi for MockApi {
    async fn list_snapshots(&self) -> Result<Vec<StorageSnapshot>, ClientError> {
        self.check("list_snapshots")?;
        Ok(self.snapshots.lock().unwrap().clone())
    }

    async fn create_snapshot(&self, req: &CreateSnapshotRequest) -> Result<(), ClientError> {
        self.check("create_snapshot")?;
        let (_, identifier) = self.next_identifier("snapshot");
        if !self.hidden() {
            self.snapshots.lock().unwrap().push(StorageSnapshot {
                identifier,
                name: req.name.clone(),
                storage_identifier: req.storage_identifier.clone(),
                snapshot_size: 10,
                created_on: "2024-01-01 00:00:00".to_string(),
            });
        }
        Ok(())
    }

    async fn rename_snapshot(&self, identifier: &str, name: &str) -> Result<(), ClientError> {
        self.check("rename_snapshot")?;
        let mut snapshots = self.snapshots.lock().unwrap();
        let snapshot = snapshots
            .iter_mut()
            .find(|s| s.identifier == identifier)
            .ok_or_else(|| not_found("snapshot", identifier))?;
        snapshot.name = name.to_string();
        Ok(())
    }

    async fn delete_snapshot(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_snapshot")?;
        self.snapshots.lock().unwrap().retain(|s| s.identifier != identifier);
        Ok(())
    }
}

#[async_trait]
impl ServerApi for MockApi {
    async fn list_servers(&self) -> Result<Vec<Server>, ClientError> {
        self.check("list_servers")?;
        Ok(self.servers.lock().unwrap().clone())
    }

    async fn get_server(&self, identifier: &str) -> Result<Server, ClientError> {
        self.check("get_server")?;
        self.servers
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.identifier == identifier)
            .cloned()
            .ok_or_else(|| not_found("vm", identifier))
    }

    async fn create_server(&self, req: &CreateServerRequest) -> Result<(), ClientError> {
        self.check("create_server")?;
        let (id, identifier) = self.next_identifier("vm");
        if !self.hidden() {
            self.servers.lock().unwrap().push(Server {
                identifier,
                hostname: req.hostname.clone(),
                dc_identifier: req.dc_identifier.clone(),
                os_identifier: req.os_identifier.clone(),
                resource_identifier: req.resource_identifier.clone(),
                project_identifier: req.project_identifier.clone(),
                public_ip: Some(format!("203.0.113.{}", id)),
                private_ip: None,
                status: "running".to_string(),
                initial_password: Some("s3cret-initial".to_string()),
                backup_enabled: req.backup_enabled,
                created_on: "2024-01-01 00:00:00".to_string(),
            });
        }
        Ok(())
    }

    async fn rename_server(&self, identifier: &str, hostname: &str) -> Result<(), ClientError> {
        self.check("rename_server")?;
        let mut servers = self.servers.lock().unwrap();
        let server = servers
            .iter_mut()
            .find(|s| s.identifier == identifier)
            .ok_or_else(|| not_found("vm", identifier))?;
        server.hostname = hostname.to_string();
        Ok(())
    }

    async fn delete_server(&self, identifier: &str) -> Result<(), ClientError> {
        self.check("delete_server")?;
        self.servers.lock().unwrap().retain(|s| s.identifier != identifier);
        Ok(())
    }
}
