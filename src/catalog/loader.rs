//! Catalog document loading.
//!
//! Reads the JSON document produced by the ingestion side and builds the
//! catalog store together with its classification oracle.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::{CatalogStore, InteractionRecord, Recipe};
use crate::classify::{DietaryOracle, DietaryProfile};
use crate::error::{RecommendError, Result};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    recipes: Vec<Recipe>,
    #[serde(default)]
    profiles: Option<HashMap<String, DietaryProfile>>,
    #[serde(default)]
    interactions: Vec<InteractionRecord>,
}

/// Catalog store and oracle built from one document.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub store: CatalogStore,
    pub oracle: DietaryOracle,
}

/// Parses a catalog document from any reader.
///
/// A missing `profiles` table is not an error: the oracle starts empty and
/// every recipe is classified from its name.
pub fn load_catalog<R: Read>(reader: R) -> Result<LoadedCatalog> {
    let document: CatalogDocument = serde_json::from_reader(reader)?;

    let store = CatalogStore::build(
        document.recipes,
        document
            .interactions
            .into_iter()
            .map(|record| (record.customer_id, record.interaction)),
    )?;

    let oracle = match document.profiles {
        Some(profiles) => {
            let known: HashMap<String, DietaryProfile> = profiles
                .into_iter()
                .filter(|(id, _)| {
                    let exists = store.recipe(id).is_ok();
                    if !exists {
                        warn!("Ignoring dietary profile for unknown recipe '{}'", id);
                    }
                    exists
                })
                .collect();
            DietaryOracle::new(known)
        }
        None => {
            warn!("Catalog has no dietary profiles, classifying by recipe name");
            DietaryOracle::empty()
        }
    };

    info!(
        "Catalog loaded: {} recipes, {} customers, {} interactions, {} profiles",
        store.len(),
        store.customers().len(),
        store.interaction_count(),
        oracle.len()
    );

    Ok(LoadedCatalog { store, oracle })
}

/// Opens and parses a catalog document from disk.
pub fn load_catalog_file(path: &Path) -> Result<LoadedCatalog> {
    let file = File::open(path).map_err(|err| {
        RecommendError::MalformedInput(format!("Cannot open {}: {}", path.display(), err))
    })?;
    load_catalog(BufReader::new(file))
}
