//! A diagram together with its curated classifications and dictionaries.

use crate::classifier::{Classifications, Classifier, KeywordConfig};
use crate::compiler::{Compiler, TransitionTable};
use crate::dictionary::Dictionaries;
use crate::error::{ImportError, PersistenceError};
use crate::store::Store;
use tracing::{debug, info};

mod conversion;
mod snapshot;

pub use conversion::*;
pub use snapshot::*;

#[derive(Debug, Clone, Default)]
pub struct Project {
    store: Store,
    keywords: KeywordConfig,
    classifications: Classifications,
    dictionaries: Dictionaries,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an imported diagram and seeds classifications and dictionaries for it.
    pub fn import(source: impl IntoDiagram) -> Result<Self, ImportError> {
        let diagram = source.into_diagram()?;
        let store = Store::from_parts(diagram.steps, diagram.connections)?;
        let keywords = diagram.keywords.unwrap_or_default();
        let classifications = Classifier::new(keywords.clone()).classify_all(&store);
        let dictionaries = Dictionaries::generate_defaults(&store, &classifications);
        info!(
            steps = store.len(),
            connections = store.connections().len(),
            "imported diagram"
        );
        Ok(Self {
            store,
            keywords,
            classifications,
            dictionaries,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn keywords(&self) -> &KeywordConfig {
        &self.keywords
    }

    /// Replaces the keyword configuration. Existing classifications are kept;
    /// call [`Project::reclassify`] to apply the new keywords to every step.
    pub fn set_keywords(&mut self, keywords: KeywordConfig) {
        self.keywords = keywords;
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.keywords.clone())
    }

    pub fn classifications(&self) -> &Classifications {
        &self.classifications
    }

    pub fn classifications_mut(&mut self) -> &mut Classifications {
        &mut self.classifications
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    pub fn dictionaries_mut(&mut self) -> &mut Dictionaries {
        &mut self.dictionaries
    }

    /// Throws away every classification override and classifies all steps again.
    pub fn reclassify(&mut self) {
        self.classifications = self.classifier().classify_all(&self.store);
    }

    /// Replaces both dictionaries with identity mappings.
    pub fn regenerate_dictionaries(&mut self) {
        self.dictionaries = Dictionaries::generate_defaults(&self.store, &self.classifications);
    }

    /// Brings derived state up to date with the store without discarding edits:
    /// classifications of removed steps are dropped, new steps are classified,
    /// and dictionary entries are added for names that have none.
    pub fn sync(&mut self) {
        let classifier = self.classifier();
        self.classifications.retain_existing(&self.store);
        self.classifications.fill_missing(&self.store, &classifier);
        let added = self
            .dictionaries
            .merge_defaults(&self.store, &self.classifications);
        debug!(added, "synced derived state");
    }

    pub fn compile(&self) -> TransitionTable {
        Compiler::builder(&self.store)
            .with_keywords(self.keywords.clone())
            .with_classifications(self.classifications.clone())
            .with_dictionaries(self.dictionaries.clone())
            .build()
            .compile()
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            steps: self.store.steps().to_vec(),
            connections: self.store.connections().to_vec(),
            keywords: self.keywords.clone(),
            classifications: self.classifications.clone(),
            dictionaries: self.dictionaries.clone(),
        }
    }

    /// Replaces the project with `snapshot`. On error the project is unchanged.
    pub fn restore(&mut self, snapshot: ProjectSnapshot) -> Result<(), PersistenceError> {
        let store = Store::from_parts(snapshot.steps, snapshot.connections)?;
        *self = Self {
            store,
            keywords: snapshot.keywords,
            classifications: snapshot.classifications,
            dictionaries: snapshot.dictionaries,
        };
        Ok(())
    }

    /// Restores from `backend`. Returns `false` when the backend has nothing saved.
    pub fn load_from(&mut self, backend: &impl Persistence) -> Result<bool, PersistenceError> {
        match backend.load()? {
            Some(snapshot) => {
                self.restore(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn save_to(&self, backend: &impl Persistence) -> Result<(), PersistenceError> {
        backend.save(&self.snapshot())
    }
}
