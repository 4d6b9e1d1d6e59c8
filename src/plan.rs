//! Schema-driven planning.
//!
//! Every resource in this provider plans the same way, so the rules live
//! here rather than in each adapter:
//!
//! - attributes absent from config that declare a default get it (DNS record
//!   `ttl` becomes 3600),
//! - computed attributes are unknown (`null`) on create,
//! - on update, computed attributes marked `use_state_for_unknown` keep their
//!   prior value; other computed-only attributes become unknown as soon as a
//!   configurable attribute changes,
//! - a change to a `force_new` attribute requires replacement, and then all
//!   computed-only attributes become unknown,
//! - sensitive attribute values are masked in the change list.

use serde_json::{Map, Value};

use crate::schema::{Attribute, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Plan a resource change.
///
/// `prior` is `None` for a create; a `null` `proposed` state plans a delete.
/// `config` is the raw configuration, used to tell configured values apart
/// from values carried over by the host.
pub fn plan(schema: &Schema, prior: Option<&Value>, proposed: &Value, config: &Value) -> PlanResult {
    if proposed.is_null() {
        return plan_delete(schema, prior);
    }
    match prior {
        None | Some(Value::Null) => plan_create(schema, proposed, config),
        Some(prior) => plan_update(schema, prior, proposed, config),
    }
}

fn plan_create(schema: &Schema, proposed: &Value, config: &Value) -> PlanResult {
    let mut planned = as_object(proposed);

    for (name, attr) in sorted_attributes(schema) {
        if is_set(config, name) {
            continue;
        }
        let value = match (&attr.default, attr.flags.computed) {
            (Some(default), true) => default.clone(),
            (_, true) => Value::Null,
            (_, false) => planned.get(name).cloned().unwrap_or(Value::Null),
        };
        planned.insert(name.to_string(), value);
    }

    let changes = sorted_attributes(schema)
        .into_iter()
        .filter_map(|(name, attr)| {
            let change = match non_null(planned.get(name)) {
                Some(after) => AttributeChange::added(name, after),
                None if attr.flags.computed => AttributeChange::unknown(name, None),
                None => return None,
            };
            Some(mask_if_sensitive(attr, change))
        })
        .collect();

    PlanResult::with_changes(Value::Object(planned), changes, false)
}

fn plan_update(schema: &Schema, prior: &Value, proposed: &Value, config: &Value) -> PlanResult {
    let mut planned = as_object(proposed);

    for (name, attr) in sorted_attributes(schema) {
        if !attr.flags.computed || is_set(config, name) {
            continue;
        }
        let value = match &attr.default {
            Some(default) => default.clone(),
            None => prior.get(name).cloned().unwrap_or(Value::Null),
        };
        planned.insert(name.to_string(), value);
    }

    let differs = |name: &str, planned: &Map<String, Value>| {
        non_null(prior.get(name)) != non_null(planned.get(name))
    };

    let requires_replace = sorted_attributes(schema)
        .into_iter()
        .any(|(name, attr)| attr.force_new && differs(name, &planned));
    let configurable_changed = sorted_attributes(schema)
        .into_iter()
        .any(|(name, attr)| !is_computed_only(attr) && differs(name, &planned));

    if requires_replace || configurable_changed {
        for (name, attr) in sorted_attributes(schema) {
            let keep = attr.use_state_for_unknown && !requires_replace;
            if is_computed_only(attr) && !keep {
                planned.insert(name.to_string(), Value::Null);
            }
        }
    }

    let changes = sorted_attributes(schema)
        .into_iter()
        .filter(|(name, _)| differs(name, &planned))
        .map(|(name, attr)| {
            let before = non_null(prior.get(name));
            let change = match (before, non_null(planned.get(name))) {
                (None, Some(after)) => AttributeChange::added(name, after),
                (Some(before), Some(after)) => AttributeChange::modified(name, before, after),
                (before, None) if attr.flags.computed && !is_set(config, name) => {
                    AttributeChange::unknown(name, before)
                },
                (Some(before), None) => AttributeChange::removed(name, before),
                (None, None) => AttributeChange::unknown(name, None),
            };
            mask_if_sensitive(attr, change)
        })
        .collect();

    PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
}

fn plan_delete(schema: &Schema, prior: Option<&Value>) -> PlanResult {
    let changes = match prior {
        Some(prior) => sorted_attributes(schema)
            .into_iter()
            .filter_map(|(name, attr)| {
                non_null(prior.get(name))
                    .map(|before| mask_if_sensitive(attr, AttributeChange::destroyed(name, before)))
            })
            .collect(),
        None => Vec::new(),
    };
    PlanResult::with_changes(Value::Null, changes, false)
}

fn sorted_attributes(schema: &Schema) -> Vec<(&str, &Attribute)> {
    let mut attrs: Vec<_> = schema
        .block
        .attributes
        .iter()
        .map(|(name, attr)| (name.as_str(), attr))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));
    attrs
}

fn is_computed_only(attr: &Attribute) -> bool {
    attr.flags.computed && !attr.flags.optional && !attr.flags.required
}

fn is_set(config: &Value, name: &str) -> bool {
    config.get(name).is_some_and(|v| !v.is_null())
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn as_object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn mask_if_sensitive(attr: &Attribute, change: AttributeChange) -> AttributeChange {
    if attr.flags.sensitive {
        change.masked()
    } else {
        change
    }
}
