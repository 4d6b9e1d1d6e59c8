//! Error types for the VPSie provider.

use thiserror::Error;

use crate::client::ClientError;
use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal provider error occurred.
    #[error("SDK error: {0}")]
    Sdk(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A call against the VPSie API failed.
    #[error("{context}: {source}")]
    Api {
        /// What the adapter was doing when the call failed.
        context: String,
        /// The raw client error.
        #[source]
        source: ClientError,
    },

    /// An import identifier did not have the expected shape.
    #[error("Invalid import ID {id:?}: expected format {expected}")]
    InvalidImportId {
        /// The identifier supplied by the user.
        id: String,
        /// The expected format, e.g. `domain_identifier/type/name`.
        expected: &'static str,
    },

    /// The create call succeeded but the new object could not be found
    /// afterwards. The object may exist remotely without being tracked.
    #[error("Error reading {resource_type} {key:?} after create: {source}")]
    Orphaned {
        /// Terraform type name of the resource.
        resource_type: String,
        /// Natural key used for the lookup.
        key: String,
        /// The lookup error.
        #[source]
        source: ClientError,
    },

    /// An update failed after some of its calls had already succeeded.
    ///
    /// `state` reflects every change that was applied before the failure.
    #[error("{source}")]
    PartialUpdate {
        /// State after the successful calls.
        state: Box<serde_json::Value>,
        /// The error that stopped the update.
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Wrap a client error with the operation that produced it.
    pub fn api(context: impl Into<String>, source: ClientError) -> Self {
        Self::Api {
            context: context.into(),
            source,
        }
    }

    /// Attach the partially-updated state to an error raised mid-update.
    pub fn partial(state: serde_json::Value, source: ProviderError) -> Self {
        Self::PartialUpdate {
            state: Box::new(state),
            source: Box::new(source),
        }
    }

    /// State that survived a failed update, if any.
    pub fn partial_state(&self) -> Option<&serde_json::Value> {
        match self {
            Self::PartialUpdate { state, .. } => Some(state),
            _ => None,
        }
    }

    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Sdk(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg) => msg.clone(),
            Self::Serialization(err) => err.to_string(),
            Self::Api { source, .. } => source.to_string(),
            Self::InvalidImportId { .. } => self.to_string(),
            Self::Orphaned { source, .. } => source.to_string(),
            Self::PartialUpdate { source, .. } => source.message(),
        }
    }

    /// Render the error as a user-facing diagnostic.
    ///
    /// API failures keep the raw client text in the detail.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Api { context, source } => {
                Diagnostic::error(context.clone()).with_detail(source.to_string())
            },
            Self::PartialUpdate { source, .. } => source.to_diagnostic(),
            Self::Orphaned {
                resource_type,
                key,
                source,
            } => Diagnostic::error(format!("Error reading {} after create", resource_type))
                .with_detail(format!(
                    "{}. The {} {:?} may have been created without being recorded in state. \
                     Adopt it with `terraform import {}.<name> <id>` or delete it manually.",
                    source, resource_type, key, resource_type
                )),
            Self::InvalidImportId { expected, .. } => Diagnostic::error("Unexpected import identifier")
                .with_detail(format!("{}. Expected: {}", self, expected)),
            other => Diagnostic::error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("resource-123".to_string());
        assert_eq!(format!("{}", err), "Resource not found: resource-123");

        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("vpsie_bucket".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: vpsie_bucket");
    }

    #[test]
    fn test_api_error_keeps_raw_text() {
        let err = ProviderError::api(
            "Error creating storage",
            ClientError::Api {
                status: 500,
                message: "disk pool exhausted".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Error creating storage: API error (500): disk pool exhausted"
        );

        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.summary, "Error creating storage");
        assert_eq!(
            diag.detail.as_deref(),
            Some("API error (500): disk pool exhausted")
        );
    }

    #[test]
    fn test_invalid_import_id_names_format() {
        let err = ProviderError::InvalidImportId {
            id: "dom-123/A".to_string(),
            expected: "domain_identifier/type/name",
        };
        let diag = err.to_diagnostic();
        assert!(diag
            .detail
            .unwrap()
            .contains("domain_identifier/type/name"));
    }

    #[test]
    fn test_orphaned_points_to_import() {
        let err = ProviderError::Orphaned {
            resource_type: "vpsie_storage".to_string(),
            key: "data".to_string(),
            source: ClientError::NotFound("storage with name data not found".to_string()),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.summary, "Error reading vpsie_storage after create");
        let detail = diag.detail.unwrap();
        assert!(detail.starts_with("storage with name data not found"));
        assert!(detail.contains("terraform import vpsie_storage."));
    }

    #[test]
    fn test_partial_update_carries_state() {
        let inner = ProviderError::api(
            "Error resizing storage",
            ClientError::Transport("connection reset".to_string()),
        );
        let err = ProviderError::partial(serde_json::json!({"name": "renamed"}), inner);

        assert_eq!(err.partial_state().unwrap()["name"], "renamed");
        assert_eq!(err.to_diagnostic().summary, "Error resizing storage");
        assert_eq!(err.message(), "transport error: connection reset");
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::NotFound("resource-123".to_string());
        assert_eq!(err.message(), "resource-123");

        let err = ProviderError::Configuration("invalid config".to_string());
        assert_eq!(err.message(), "invalid config");
    }
}
