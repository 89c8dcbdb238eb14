//! JSON file storage for the category forest.
//!
//! The engine keeps the forest in memory only. This module maps it to the
//! [`ForestDocument`] wire format and back, and provides [`JsonFileSink`] so
//! a board can write every applied move to disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use api_types::category::{BucketDocument, ChildDocument, ForestDocument, ParentDocument};
use chrono::Utc;
use engine::{ChildCategory, EngineError, Forest, ForestSink, ParentCategory};

use crate::error::Result;

/// Load the forest at `path`. A missing file gives an empty forest with the
/// default buckets.
pub fn load_forest(path: &Path) -> Result<Forest> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no forest at {}, starting empty", path.display());
            return Ok(Forest::with_default_buckets());
        }
        Err(err) => return Err(err.into()),
    };
    let document: ForestDocument = serde_json::from_str(&content)?;
    forest_from_document(document)
}

pub fn save_forest(path: &Path, forest: &Forest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut document = document_from_forest(forest);
    document.saved_at = Some(Utc::now());
    let payload = serde_json::to_string_pretty(&document)?;
    fs::write(path, payload)?;
    Ok(())
}

/// Build a forest from a stored document. A document that reuses ids or
/// bucket names is rejected; names are kept exactly as written.
pub fn forest_from_document(document: ForestDocument) -> Result<Forest> {
    let mut forest = Forest::new();
    for bucket in document.buckets {
        let key = forest.insert_bucket(&bucket.name)?;
        for parent in bucket.parents {
            forest.restore_parent(&key, map_parent(parent))?;
        }
    }
    Ok(forest)
}

pub fn document_from_forest(forest: &Forest) -> ForestDocument {
    ForestDocument {
        saved_at: None,
        buckets: forest
            .buckets()
            .iter()
            .map(|bucket| BucketDocument {
                name: bucket.name().to_string(),
                parents: bucket.parents().iter().map(map_parent_document).collect(),
            })
            .collect(),
    }
}

fn map_parent(parent: ParentDocument) -> ParentCategory {
    let mut category = ParentCategory::new(parent.id, parent.name, parent.color);
    category.children = parent
        .children
        .into_iter()
        .map(|child| ChildCategory {
            id: child.id,
            name: child.name,
            description: child.description,
        })
        .collect();
    category
}

fn map_parent_document(parent: &ParentCategory) -> ParentDocument {
    ParentDocument {
        id: parent.id,
        name: parent.name.clone(),
        color: parent.color.clone(),
        children: parent
            .children
            .iter()
            .map(|child| ChildDocument {
                id: child.id,
                name: child.name.clone(),
                description: child.description.clone(),
            })
            .collect(),
    }
}

/// Writes the whole forest to a JSON file after each applied move.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ForestSink for JsonFileSink {
    fn forest_changed(
        &mut self,
        forest: &Forest,
        bucket: &str,
    ) -> std::result::Result<(), EngineError> {
        save_forest(&self.path, forest)
            .map_err(|err| EngineError::Sink(format!("{}: {err}", self.path.display())))?;
        tracing::debug!(bucket, path = %self.path.display(), "forest saved");
        Ok(())
    }
}
