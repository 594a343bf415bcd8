pub mod inspect;
pub mod list;
pub mod search;
pub mod view;

use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::store::EntityStore;
use crate::parser::dataset;

/// Parse the dataset and populate the store, for the one-shot commands.
fn load_store(path: Option<&Path>) -> Result<EntityStore> {
    let dataset = dataset::load(path)?;
    EntityStore::load(&dataset).context("failed to load reaction network")
}
