// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Link classification, id prefixes and property helpers.

use crate::model::{Link, Property};

/// Prefix written before an artifact uuid in a link href
pub const ID_PREFIX: &str = "#";

/// Fragment selecting every artifact in a remote document
pub const WILDCARD: &str = "*";

/// Namespace for props written by attestor
pub const LULA_NAMESPACE: &str = "https://docs.lula.dev/oscal/ns";

/// Relation segment marking a validation link (`lula`, `lula.validation`, ...)
pub const VALIDATION_LINK_REL: &str = "lula";

/// Link text marking a validation link
pub const VALIDATION_LINK_TEXT: &str = "Lula Validation";

/// Strip the id prefix, if any.
pub fn trim_id_prefix(id: &str) -> &str {
    id.strip_prefix(ID_PREFIX).unwrap_or(id)
}

/// Add the id prefix unless already present.
pub fn add_id_prefix(id: &str) -> String {
    if id.starts_with(ID_PREFIX) {
        id.to_string()
    } else {
        format!("{ID_PREFIX}{id}")
    }
}

/// Whether a link points at validation content.
pub fn is_validation_link(link: &Link) -> bool {
    if link.text.as_deref() == Some(VALIDATION_LINK_TEXT) {
        return true;
    }
    link.rel
        .as_deref()
        .and_then(|rel| rel.split('.').next())
        .is_some_and(|segment| segment == VALIDATION_LINK_REL)
}

/// Look up a property value by name, optionally requiring a namespace.
pub fn get_prop<'a>(props: &'a [Property], name: &str, ns: Option<&str>) -> Option<&'a str> {
    props
        .iter()
        .find(|p| p.name == name && (ns.is_none() || p.ns.as_deref() == ns))
        .map(|p| p.value.as_str())
}

/// Set a property value, replacing an existing one with the same name and namespace.
pub fn update_prop(props: &mut Vec<Property>, name: &str, ns: Option<&str>, value: &str) {
    match props
        .iter_mut()
        .find(|p| p.name == name && p.ns.as_deref() == ns)
    {
        Some(prop) => prop.value = value.to_string(),
        None => props.push(Property {
            name: name.to_string(),
            value: value.to_string(),
            ns: ns.map(str::to_string),
            remarks: None,
        }),
    }
}

#[cfg(test)]
#[path = "links_tests.rs"]
mod tests;
