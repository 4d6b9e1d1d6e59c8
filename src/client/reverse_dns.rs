use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// A PTR record attached to one IP address of a server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversePtr {
    pub vm_identifier: String,
    pub ip: String,
    pub hostname: String,
}

/// Reverse DNS endpoints.
#[async_trait]
pub trait ReverseDnsApi: Send + Sync {
    async fn get_reverse_ptr(&self, vm_identifier: &str, ip: &str) -> Result<ReversePtr, ClientError>;

    async fn create_reverse_ptr(&self, ptr: &ReversePtr) -> Result<(), ClientError>;

    async fn update_reverse_ptr(&self, ptr: &ReversePtr) -> Result<(), ClientError>;

    async fn delete_reverse_ptr(&self, vm_identifier: &str, ip: &str) -> Result<(), ClientError>;
}

fn ptr_path(vm_identifier: &str, ip: &str) -> String {
    format!("/domains/reverse/{}/{}", segment(vm_identifier), segment(ip))
}

#[async_trait]
impl ReverseDnsApi for Client {
    async fn get_reverse_ptr(&self, vm_identifier: &str, ip: &str) -> Result<ReversePtr, ClientError> {
        self.get(&ptr_path(vm_identifier, ip)).await
    }

    async fn create_reverse_ptr(&self, ptr: &ReversePtr) -> Result<(), ClientError> {
        self.execute(Method::POST, "/domains/reverse", Some(ptr)).await
    }

    async fn update_reverse_ptr(&self, ptr: &ReversePtr) -> Result<(), ClientError> {
        self.execute(Method::PUT, "/domains/reverse", Some(ptr)).await
    }

    async fn delete_reverse_ptr(&self, vm_identifier: &str, ip: &str) -> Result<(), ClientError> {
        self.execute::<()>(Method::DELETE, &ptr_path(vm_identifier, ip), None)
            .await
    }
}
