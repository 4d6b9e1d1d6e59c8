use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// A DNS zone managed by VPSie.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub identifier: String,
    pub domain_name: String,
    #[serde(default)]
    pub project_identifier: Option<String>,
    #[serde(default)]
    pub ns_validated: i64,
    #[serde(default)]
    pub created_on: String,
    #[serde(default)]
    pub last_check: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainRequest {
    pub domain_name: String,
    pub project_identifier: String,
}

/// A record inside a domain. Records have no identifier of their own; the
/// API addresses them by `(type, name)` within the domain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: i64,
}

/// Domain and DNS record endpoints.
#[async_trait]
pub trait DomainApi: Send + Sync {
    async fn list_domains(&self) -> Result<Vec<Domain>, ClientError>;

    async fn create_domain(&self, req: &CreateDomainRequest) -> Result<(), ClientError>;

    async fn delete_domain(&self, identifier: &str) -> Result<(), ClientError>;

    async fn list_dns_records(&self, domain_identifier: &str) -> Result<Vec<DnsRecord>, ClientError>;

    async fn create_dns_record(
        &self,
        domain_identifier: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError>;

    /// Replace `current` with `new`; the API matches the record by the
    /// `current` type and name.
    async fn update_dns_record(
        &self,
        domain_identifier: &str,
        current: &DnsRecord,
        new: &DnsRecord,
    ) -> Result<(), ClientError>;

    async fn delete_dns_record(
        &self,
        domain_identifier: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct RecordUpdate<'a> {
    current: &'a DnsRecord,
    new: &'a DnsRecord,
}

fn records_path(domain_identifier: &str) -> String {
    format!("/domains/{}/records", segment(domain_identifier))
}

#[async_trait]
impl DomainApi for Client {
    async fn list_domains(&self) -> Result<Vec<Domain>, ClientError> {
        self.list("/domains").await
    }

    async fn create_domain(&self, req: &CreateDomainRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/domains", Some(req)).await
    }

    async fn delete_domain(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/domains/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }

    async fn list_dns_records(&self, domain_identifier: &str) -> Result<Vec<DnsRecord>, ClientError> {
        self.list(&records_path(domain_identifier)).await
    }

    async fn create_dns_record(
        &self,
        domain_identifier: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError> {
        self.execute(Method::POST, &records_path(domain_identifier), Some(record))
            .await
    }

    async fn update_dns_record(
        &self,
        domain_identifier: &str,
        current: &DnsRecord,
        new: &DnsRecord,
    ) -> Result<(), ClientError> {
        let body = RecordUpdate { current, new };
        self.execute(Method::PUT, &records_path(domain_identifier), Some(&body))
            .await
    }

    async fn delete_dns_record(
        &self,
        domain_identifier: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError> {
        self.execute(Method::DELETE, &records_path(domain_identifier), Some(record))
            .await
    }
}
