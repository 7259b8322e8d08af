//! Collection manifests and loading.
//!
//! A collection directory holds an `input.json` manifest naming its
//! documents and persona, and a `layouts/` directory with one layout JSON
//! file per document (`layouts/<file stem>.json`).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalyzeOptions, CollectionAnalyzer};
use crate::error::{Error, Result};
use crate::link::EmbeddingProvider;
use crate::model::{BatchResult, LayoutDocument};
use crate::persona::PersonaStore;

/// Manifest file name inside a collection directory.
pub const MANIFEST_FILE: &str = "input.json";

/// Directory holding layout files inside a collection directory.
pub const LAYOUT_DIR: &str = "layouts";

/// A document listed in a collection manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDocument {
    /// Original file name (e.g., "South of France - Cities.pdf")
    pub filename: String,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,
}

impl CollectionDocument {
    /// Path of this document's layout file inside collection directory `dir`.
    pub fn layout_path(&self, dir: &Path) -> PathBuf {
        layout_path(dir, &self.filename)
    }

    /// Load this document's layout, named after the manifest file name.
    pub fn load(&self, dir: &Path) -> Result<LayoutDocument> {
        let mut doc = LayoutDocument::open(self.layout_path(dir))?;
        doc.name = self.filename.clone();
        Ok(doc)
    }
}

/// The reader role a collection is analyzed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaRole {
    /// Persona name, resolved through a [`PersonaStore`]
    pub role: String,
}

/// The task the reader wants to accomplish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobToBeDone {
    /// Task description
    pub task: String,
}

/// Collection manifest (`input.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Documents in processing order
    pub documents: Vec<CollectionDocument>,

    /// Reader role
    pub persona: PersonaRole,

    /// Reader task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_to_be_done: Option<JobToBeDone>,
}

impl CollectionConfig {
    /// Parse a manifest from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the manifest of a collection directory.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::CollectionNotFound(dir.to_path_buf()));
        }
        let manifest = dir.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return Err(Error::CollectionNotFound(manifest));
        }
        let file = File::open(&manifest)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Path of the layout file for a document of a collection.
pub fn layout_path(dir: &Path, filename: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    dir.join(LAYOUT_DIR).join(format!("{}.json", stem))
}

/// A loaded collection: manifest plus the layouts that could be read.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Collection directory
    pub root: PathBuf,

    /// Manifest
    pub config: CollectionConfig,

    /// Documents in manifest order; unreadable ones are left out
    pub documents: Vec<LayoutDocument>,
}

impl Collection {
    /// Open a collection directory.
    ///
    /// A document whose layout cannot be read is logged and skipped; the
    /// rest of the collection still loads.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        let config = CollectionConfig::load(&root)?;

        let mut documents = Vec::with_capacity(config.documents.len());
        for entry in &config.documents {
            match entry.load(&root) {
                Ok(doc) => documents.push(doc),
                Err(e) => log::warn!(
                    "Skipping {}: {}: {}",
                    entry.filename,
                    entry.layout_path(&root).display(),
                    e
                ),
            }
        }

        log::debug!(
            "Loaded {} of {} documents from {}",
            documents.len(),
            config.documents.len(),
            root.display()
        );
        Ok(Self {
            root,
            config,
            documents,
        })
    }

    /// Persona named by the manifest.
    pub fn persona(&self) -> &str {
        &self.config.persona.role
    }

    /// Analyze the collection for its manifest persona.
    pub fn analyze(
        &self,
        store: &PersonaStore,
        provider: Option<&dyn EmbeddingProvider>,
        options: &AnalyzeOptions,
    ) -> Result<BatchResult> {
        let mut analyzer = CollectionAnalyzer::new(store, self.persona(), options)?;
        Ok(analyzer.analyze(&self.documents, provider))
    }
}
