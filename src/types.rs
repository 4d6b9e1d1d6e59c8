//! Convenience types exchanged with the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The plugin protocol major version this provider targets.
pub const PROTOCOL_VERSION: u32 = 6;

/// Placeholder rendered in place of sensitive values.
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive value)";

/// How a single attribute moves during a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// The attribute gains a value it did not have.
    Add,
    /// The attribute's value is replaced.
    Modify,
    /// The attribute is cleared and becomes null.
    Remove,
    /// The whole object is destroyed.
    Destroy,
}

/// A change to a single attribute during a plan.
///
/// For [`ChangeAction::Add`] and [`ChangeAction::Modify`] an `after` of
/// `None` means the value is unknown until apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// The path to the attribute that changed.
    pub path: String,
    /// What happens to the attribute.
    pub action: ChangeAction,
    /// The value before the change (None if creating).
    pub before: Option<serde_json::Value>,
    /// The value after the change (None if cleared, destroyed or unknown).
    pub after: Option<serde_json::Value>,
}

impl AttributeChange {
    fn new(
        path: impl Into<String>,
        action: ChangeAction,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        Self {
            path: path.into(),
            action,
            before,
            after,
        }
    }

    /// Create a change for a new attribute.
    pub fn added(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, ChangeAction::Add, None, Some(value))
    }

    /// Create a change for an attribute that is cleared to null.
    pub fn removed(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, ChangeAction::Remove, Some(value), None)
    }

    /// Create a change for an attribute of an object being destroyed.
    pub fn destroyed(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, ChangeAction::Destroy, Some(value), None)
    }

    /// Create a change for a modified attribute.
    pub fn modified(
        path: impl Into<String>,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        Self::new(path, ChangeAction::Modify, Some(before), Some(after))
    }

    /// Create a change whose new value is only known after apply.
    pub fn unknown(path: impl Into<String>, before: Option<serde_json::Value>) -> Self {
        let action = if before.is_some() {
            ChangeAction::Modify
        } else {
            ChangeAction::Add
        };
        Self::new(path, action, before, None)
    }

    /// Whether the new value is only known after apply.
    pub fn is_unknown(&self) -> bool {
        matches!(self.action, ChangeAction::Add | ChangeAction::Modify) && self.after.is_none()
    }

    /// Replace both sides with [`SENSITIVE_PLACEHOLDER`].
    pub fn masked(mut self) -> Self {
        let mask = |v: Option<serde_json::Value>| {
            v.map(|_| serde_json::Value::String(SENSITIVE_PLACEHOLDER.to_string()))
        };
        self.before = mask(self.before);
        self.after = mask(self.after);
        self
    }
}

impl fmt::Display for AttributeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |v: Option<&serde_json::Value>| match v {
            Some(serde_json::Value::String(s)) if s == SENSITIVE_PLACEHOLDER => s.clone(),
            Some(other) => other.to_string(),
            None => "(known after apply)".to_string(),
        };
        let before = || self.before.as_ref().map_or_else(|| "null".to_string(), |v| render(Some(v)));
        match self.action {
            ChangeAction::Add => write!(f, "+ {} = {}", self.path, render(self.after.as_ref())),
            ChangeAction::Modify => write!(
                f,
                "~ {} = {} -> {}",
                self.path,
                before(),
                render(self.after.as_ref())
            ),
            ChangeAction::Remove => write!(f, "~ {} = {} -> null", self.path, before()),
            ChangeAction::Destroy => write!(f, "- {} = {}", self.path, before()),
        }
    }
}

/// The result of a plan operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// The planned state after the operation.
    pub planned_state: serde_json::Value,
    /// The list of attribute changes.
    pub changes: Vec<AttributeChange>,
    /// Whether the resource requires replacement.
    pub requires_replace: bool,
}

impl PlanResult {
    /// Create a plan result with no changes.
    pub fn no_change(state: serde_json::Value) -> Self {
        Self {
            planned_state: state,
            changes: Vec::new(),
            requires_replace: false,
        }
    }

    /// Create a plan result with changes.
    pub fn with_changes(
        planned_state: serde_json::Value,
        changes: Vec<AttributeChange>,
        requires_replace: bool,
    ) -> Self {
        Self {
            planned_state,
            changes,
            requires_replace,
        }
    }

    /// Render the change list the way it is shown to users, one line per
    /// attribute.
    pub fn render(&self) -> String {
        self.changes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An imported resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// The resource type.
    pub resource_type: String,
    /// The imported state.
    pub state: serde_json::Value,
}

impl ImportedResource {
    /// Create a new imported resource.
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Provider metadata returned by GetMetadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_change_constructors() {
        let added = AttributeChange::added("name", json!("test"));
        assert!(added.before.is_none());
        assert_eq!(added.after, Some(json!("test")));

        let removed = AttributeChange::removed("name", json!("old"));
        assert_eq!(removed.action, ChangeAction::Remove);
        assert_eq!(removed.before, Some(json!("old")));
        assert!(removed.after.is_none());
        assert!(!removed.is_unknown());

        let unknown = AttributeChange::unknown("created_on", Some(json!("2024")));
        assert_eq!(unknown.action, ChangeAction::Modify);
        assert!(unknown.is_unknown());
        assert!(AttributeChange::unknown("id", None).is_unknown());
        assert!(!AttributeChange::destroyed("name", json!("old")).is_unknown());

        let modified = AttributeChange::modified("size", json!(10), json!(20));
        assert_eq!(modified.before, Some(json!(10)));
        assert_eq!(modified.after, Some(json!(20)));
    }

    #[test]
    fn test_masked_change() {
        let change = AttributeChange::modified("private_key", json!("old-key"), json!("new-key")).masked();
        assert_eq!(change.before, Some(json!(SENSITIVE_PLACEHOLDER)));
        assert_eq!(change.after, Some(json!(SENSITIVE_PLACEHOLDER)));

        let rendered = change.to_string();
        assert_eq!(rendered, "~ private_key = (sensitive value) -> (sensitive value)");
    }

    #[test]
    fn test_change_display() {
        assert_eq!(AttributeChange::added("ttl", json!(3600)).to_string(), "+ ttl = 3600");
        assert_eq!(
            AttributeChange::modified("name", json!("a"), json!("b")).to_string(),
            "~ name = \"a\" -> \"b\""
        );
        assert_eq!(
            AttributeChange::unknown("public_ip", Some(json!("1.2.3.4"))).to_string(),
            "~ public_ip = \"1.2.3.4\" -> (known after apply)"
        );
        assert_eq!(AttributeChange::unknown("id", None).to_string(), "+ id = (known after apply)");
        assert_eq!(
            AttributeChange::removed("ssh_key_identifier", json!("k1")).to_string(),
            "~ ssh_key_identifier = \"k1\" -> null"
        );
        assert_eq!(
            AttributeChange::destroyed("name", json!("data")).to_string(),
            "- name = \"data\""
        );
    }

    #[test]
    fn test_plan_result() {
        let no_change = PlanResult::no_change(json!({"identifier": "123"}));
        assert!(no_change.changes.is_empty());
        assert!(!no_change.requires_replace);
        assert_eq!(no_change.render(), "");

        let with_changes = PlanResult::with_changes(
            json!({"identifier": "123", "name": "new"}),
            vec![AttributeChange::modified("name", json!("old"), json!("new"))],
            false,
        );
        assert_eq!(with_changes.changes.len(), 1);
        assert_eq!(with_changes.render(), "~ name = \"old\" -> \"new\"");
    }

    #[test]
    fn test_imported_resource() {
        let imported = ImportedResource::new("vpsie_storage", json!({"identifier": "st-1"}));
        assert_eq!(imported.resource_type, "vpsie_storage");
        assert_eq!(imported.state["identifier"], "st-1");
    }

    #[test]
    fn test_protocol_version() {
        assert_eq!(PROTOCOL_VERSION, 6);
    }
}
