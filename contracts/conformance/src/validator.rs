//! Structural contract checks
//!
//! Each check takes a loaded class (or its instance) and either returns a
//! short observation for the report or the violation that stops the plugin.

use crate::guard;
use crate::violation::Violation;
use nifikit_host_api::properties::{ALLOWABLE_VALUES, DESCRIPTION, NAME, REQUIRED, SENSITIVE};
use nifikit_host_api::relationship::SUCCESS;
use nifikit_host_api::{EntrySignature, PluginClass, ProcessorInstance, PropertyDescriptor};
use serde_json::Value;
use std::collections::BTreeSet;

/// Processor details are present and carry a version and a description
pub fn check_details(class: &PluginClass) -> Result<String, Violation> {
    let name = class.name();
    let details = class
        .details()
        .ok_or_else(|| Violation::metadata(name, "missing ProcessorDetails"))?;

    if details.version.is_empty() {
        return Err(Violation::metadata(name, "version must be non-empty str"));
    }
    if details.description.is_empty() {
        return Err(Violation::metadata(name, "description must be non-empty str"));
    }

    Ok(format!(
        "version={}, desc='{}', tags={:?}, deps={:?}",
        details.version, details.description, details.tags, details.dependencies
    ))
}

/// The declared entry method matches the variant exactly
pub fn check_signature(class: &PluginClass) -> Result<String, Violation> {
    let name = class.name();
    let declared: EntrySignature = class
        .entry_declaration()
        .parse()
        .map_err(|e| Violation::signature(name, format!("{e}")))?;

    let expected = class.variant().expected_signature();
    if declared != expected {
        return Err(Violation::signature(
            name,
            format!(
                "{}.{} must be ({}), declared {}",
                name,
                expected.method,
                expected.params.join(", "),
                declared
            ),
        ));
    }

    Ok(declared.to_string())
}

/// Relationships are non-empty, uniquely named and include `success`.
///
/// Returns the declared names for the smoke check.
pub fn check_relationships(
    plugin: &str,
    instance: &ProcessorInstance,
) -> Result<BTreeSet<String>, Violation> {
    let relationships = guard::contain(|| instance.relationships())
        .map_err(|message| {
            Violation::construction(plugin, format!("relationships() panicked: {message}"))
        })?
        .map_err(|e| Violation::construction(plugin, format!("relationships() failed: {e}")))?;

    if relationships.is_empty() {
        return Err(Violation::relationship(
            plugin,
            "relationships() must return a non-empty list",
        ));
    }

    let mut names = BTreeSet::new();
    for relationship in &relationships {
        let relationship_name = relationship.name();
        if relationship_name.is_empty() {
            return Err(Violation::relationship(
                plugin,
                "relationship.name must be non-empty str",
            ));
        }
        if !names.insert(relationship_name.to_string()) {
            return Err(Violation::relationship(
                plugin,
                format!("relationship names must be unique; '{relationship_name}' repeats"),
            ));
        }
    }

    if !names.contains(SUCCESS) {
        return Err(Violation::relationship(
            plugin,
            format!("must declare '{SUCCESS}' relationship"),
        ));
    }

    Ok(names)
}

/// Every exposed property descriptor is well formed.
///
/// Returns `None` when the plugin exposes no property listing.
pub fn check_properties(
    plugin: &str,
    instance: &ProcessorInstance,
) -> Result<Option<String>, Violation> {
    let listed = guard::contain(|| instance.property_descriptors()).map_err(|message| {
        Violation::construction(plugin, format!("property_descriptors() panicked: {message}"))
    })?;
    let Some(descriptors) = listed else {
        return Ok(None);
    };

    let mut names = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        names.push(check_descriptor(plugin, index, descriptor)?);
    }

    if names.is_empty() {
        Ok(Some("(none)".to_string()))
    } else {
        Ok(Some(names.join(", ")))
    }
}

fn check_descriptor(
    plugin: &str,
    index: usize,
    descriptor: &PropertyDescriptor,
) -> Result<String, Violation> {
    let name = match descriptor.get(NAME) {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => {
            return Err(Violation::property(
                plugin,
                format!("property #{index}: name must be non-empty str"),
            ))
        }
    };

    let invalid = |what: &str| Violation::property(plugin, format!("property '{name}': {what}"));

    if let Some(description) = descriptor.get(DESCRIPTION) {
        if !description.is_string() {
            return Err(invalid("description must be str"));
        }
    }
    for flag in [REQUIRED, SENSITIVE] {
        if let Some(value) = descriptor.get(flag) {
            if !value.is_boolean() {
                return Err(invalid(&format!("{flag} must be bool")));
            }
        }
    }
    if let Some(allowed) = descriptor.get(ALLOWABLE_VALUES) {
        let all_strings = allowed
            .as_array()
            .is_some_and(|values| values.iter().all(Value::is_string));
        if !all_strings {
            return Err(invalid("allowableValues must be list[str]"));
        }
    }

    Ok(name)
}
