// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deduplicating artifact store.
//!
//! Artifacts are either *existing* (already in the document's back-matter) or
//! *fetched* (pulled in from a remote validation document while composing).
//! Each remote document is fetched at most once; later links to the same href
//! select from the ids that fetch produced.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use attestor_oscal::{trim_id_prefix, Link, Resource, ID_PREFIX, WILDCARD};
use thiserror::Error;

use crate::lula::read_validations;
use crate::network::{FetchError, Fetcher};

/// Errors that can occur when resolving a link to artifacts
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to fetch '{href}': {source}")]
    Fetch {
        href: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to read validations from '{href}': {source}")]
    Parse {
        href: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Resource '{0}' is not in the document's back-matter")]
    UnresolvedLocal(String),

    #[error("No validation '{fragment}' in '{href}'")]
    NoMatchingArtifact { href: String, fragment: String },
}

pub struct ResourceStore {
    existing: HashMap<String, Resource>,
    fetched: Vec<Resource>,
    fetched_index: HashMap<String, usize>,
    href_ids: HashMap<String, Vec<String>>,
    fetcher: Arc<dyn Fetcher>,
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("existing", &self.existing.len())
            .field("fetched", &self.fetched.len())
            .field("hrefs", &self.href_ids.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ResourceStore {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            existing: HashMap::new(),
            fetched: Vec::new(),
            fetched_index: HashMap::new(),
            href_ids: HashMap::new(),
            fetcher,
        }
    }

    /// Store seeded with a document's back-matter resources.
    pub fn from_back_matter(resources: &[Resource], fetcher: Arc<dyn Fetcher>) -> Self {
        let mut store = Self::new(fetcher);
        for resource in resources {
            store.add_existing(resource.clone());
        }
        store
    }

    pub fn add_existing(&mut self, resource: Resource) {
        if self.fetched_index.contains_key(&resource.uuid) {
            self.fetched.retain(|r| r.uuid != resource.uuid);
            self.reindex_fetched();
        }
        self.existing.insert(resource.uuid.clone(), resource);
    }

    /// Register a fetched artifact. Ids already present as existing are ignored.
    pub fn add_fetched(&mut self, resource: Resource) {
        if self.existing.contains_key(&resource.uuid) {
            return;
        }
        match self.fetched_index.get(&resource.uuid) {
            Some(&index) => self.fetched[index] = resource,
            None => {
                self.fetched_index
                    .insert(resource.uuid.clone(), self.fetched.len());
                self.fetched.push(resource);
            }
        }
    }

    fn reindex_fetched(&mut self) {
        self.fetched_index = self
            .fetched
            .iter()
            .enumerate()
            .map(|(i, r)| (r.uuid.clone(), i))
            .collect();
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.existing.get(id).or_else(|| {
            self.fetched_index
                .get(id)
                .and_then(|&index| self.fetched.get(index))
        })
    }

    pub fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Fetched artifacts, in the order they were first seen.
    pub fn all_fetched(&self) -> &[Resource] {
        &self.fetched
    }

    /// Ids produced by an earlier fetch of `href`.
    pub fn href_ids(&self, href: &str) -> Option<&[String]> {
        self.href_ids.get(href).map(Vec::as_slice)
    }

    /// Resolve a validation link to the ids of the artifacts it selects.
    pub async fn add_from_link(
        &mut self,
        link: &Link,
        base_dir: Option<&Path>,
    ) -> Result<Vec<String>, ResourceError> {
        let href = link.href.trim();
        let fragment = link
            .resource_fragment
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty() && *f != WILDCARD)
            .map(trim_id_prefix);
        let id = fragment.unwrap_or_else(|| trim_id_prefix(href));

        if self.has(id) {
            return Ok(vec![id.to_string()]);
        }
        if href.starts_with(ID_PREFIX) {
            return Err(ResourceError::UnresolvedLocal(id.to_string()));
        }
        if let Some(ids) = self.href_ids.get(href) {
            tracing::debug!(href, "reusing previously fetched document");
            return select_ids(href, ids, fragment);
        }

        let bytes = self
            .fetcher
            .fetch(href, base_dir)
            .await
            .map_err(|source| ResourceError::Fetch {
                href: href.to_string(),
                source,
            })?;
        let parse_err = |source| ResourceError::Parse {
            href: href.to_string(),
            source,
        };
        let mut resources = Vec::new();
        for mut validation in read_validations(&bytes).map_err(parse_err)? {
            resources.push(validation.to_resource().map_err(parse_err)?);
        }

        let ids: Vec<String> = resources.iter().map(|r| r.uuid.clone()).collect();
        tracing::debug!(href, count = ids.len(), "fetched validations");
        for resource in resources {
            self.add_fetched(resource);
        }
        let selected = select_ids(href, &ids, fragment);
        self.href_ids.insert(href.to_string(), ids);
        selected
    }
}

/// Pick ids from one document: all of them without a specific fragment, the
/// only one in a single-artifact document, otherwise the one matching.
fn select_ids(
    href: &str,
    ids: &[String],
    fragment: Option<&str>,
) -> Result<Vec<String>, ResourceError> {
    match fragment {
        None => Ok(ids.to_vec()),
        Some(_) if ids.len() == 1 => Ok(ids.to_vec()),
        Some(wanted) => ids
            .iter()
            .find(|id| id.as_str() == wanted)
            .map(|id| vec![id.clone()])
            .ok_or_else(|| ResourceError::NoMatchingArtifact {
                href: href.to_string(),
                fragment: wanted.to_string(),
            }),
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
