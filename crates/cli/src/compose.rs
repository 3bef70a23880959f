// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Composition of component definitions into self-contained documents.
//!
//! Remote validation links are fetched, stored in the back-matter, and
//! rewritten to local `#<uuid>` references. Imported component definitions
//! are composed relative to their own location and merged into the parent.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use attestor_oscal::{
    add_id_prefix, is_validation_link, BackMatter, ComponentDefinition, DocumentError, Link,
    OscalModels,
};
use chrono::Utc;
use thiserror::Error;

use crate::network::{FetchError, Fetcher, Location};
use crate::store::{ResourceError, ResourceStore};

/// Errors that can occur when composing a document
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Document has no component definition")]
    NoComponentDefinition,

    #[error("Component definition has no components")]
    NoComponents,

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Failed to import '{href}': {source}")]
    Import {
        href: String,
        #[source]
        source: Box<ComposeError>,
    },
}

type ComposeFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ComposeError>> + Send + 'a>>;

pub struct Composer {
    fetcher: Arc<dyn Fetcher>,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer").finish_non_exhaustive()
    }
}

impl Composer {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Load a document and compose its component definition, resolving
    /// relative references against the file's directory.
    pub async fn compose_from_path(&self, path: &Path) -> Result<OscalModels, ComposeError> {
        let mut models = OscalModels::load(path)?;
        let comp_def = models
            .component_definition
            .as_mut()
            .ok_or(ComposeError::NoComponentDefinition)?;
        self.compose_component_definition(comp_def, path.parent())
            .await?;
        Ok(models)
    }

    /// Inline imported definitions, then compose validations.
    pub fn compose_component_definition<'a>(
        &'a self,
        comp_def: &'a mut ComponentDefinition,
        base_dir: Option<&'a Path>,
    ) -> ComposeFuture<'a> {
        Box::pin(async move {
            for import in comp_def.import_component_definitions.take().unwrap_or_default() {
                let imported = self.load_import(&import.href, base_dir).await.map_err(
                    |source| ComposeError::Import {
                        href: import.href.clone(),
                        source: Box::new(source),
                    },
                )?;
                comp_def.merge(imported);
            }
            self.compose_component_validations(comp_def, base_dir).await
        })
    }

    async fn load_import(
        &self,
        href: &str,
        base_dir: Option<&Path>,
    ) -> Result<ComponentDefinition, ComposeError> {
        tracing::debug!(href, "importing component definition");
        let location = Location::parse(href, base_dir)?;
        let bytes = self.fetcher.fetch(href, base_dir).await?;
        let mut imported = OscalModels::from_slice(&bytes)?
            .component_definition
            .ok_or(ComposeError::NoComponentDefinition)?;
        let import_dir = location.base_dir();
        self.compose_component_definition(&mut imported, import_dir.as_deref())
            .await?;
        Ok(imported)
    }

    /// Replace validation links with local references to back-matter
    /// resources, fetching remote validations as needed.
    ///
    /// A local reference missing from the back-matter is left untouched; it
    /// fails when the validation is looked up.
    pub async fn compose_component_validations(
        &self,
        comp_def: &mut ComponentDefinition,
        base_dir: Option<&Path>,
    ) -> Result<(), ComposeError> {
        let mut store =
            ResourceStore::from_back_matter(comp_def.resources(), Arc::clone(&self.fetcher));
        let components = comp_def
            .components
            .as_mut()
            .ok_or(ComposeError::NoComponents)?;

        for component in components.iter_mut() {
            for ci in component.control_implementations.iter_mut().flatten() {
                for ir in ci.implemented_requirements.iter_mut() {
                    let Some(links) = ir.links.as_ref() else {
                        continue;
                    };
                    let mut composed = Vec::with_capacity(links.len());
                    for link in links {
                        if !is_validation_link(link) {
                            composed.push(link.clone());
                            continue;
                        }
                        match store.add_from_link(link, base_dir).await {
                            Ok(ids) => composed.extend(ids.iter().map(|id| Link {
                                href: add_id_prefix(id),
                                rel: link.rel.clone(),
                                text: link.text.clone(),
                                ..Default::default()
                            })),
                            Err(ResourceError::UnresolvedLocal(id)) => {
                                tracing::warn!(
                                    control_id = %ir.control_id,
                                    id = %id,
                                    "validation reference not found in back-matter"
                                );
                                composed.push(link.clone());
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                    ir.links = Some(composed);
                }
            }
        }

        let fetched = store.all_fetched();
        if !fetched.is_empty() {
            tracing::info!(count = fetched.len(), "added validations to back-matter");
            comp_def
                .back_matter
                .get_or_insert_with(BackMatter::default)
                .resources
                .get_or_insert_with(Vec::new)
                .extend(fetched.iter().cloned());
        }
        comp_def.metadata.last_modified = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
