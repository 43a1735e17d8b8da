//! Destination for simulated downloads.

use std::cell::RefCell;
use std::rc::Rc;

use retroterm_types::error::Result;

/// A file produced by a completed simulated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

/// Receives completed artifacts.
pub trait ArtifactSink {
    fn save(&mut self, artifact: &Artifact) -> Result<()>;
}

/// Sink that only logs the save.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogArtifactSink;

impl ArtifactSink for LogArtifactSink {
    fn save(&mut self, artifact: &Artifact) -> Result<()> {
        log::info!(
            "Saved artifact {} ({}, {} bytes)",
            artifact.file_name,
            artifact.mime_type,
            artifact.contents.len()
        );
        Ok(())
    }
}

/// Sink that keeps saved artifacts in memory, shared between clones.
#[derive(Debug, Default, Clone)]
pub struct MemoryArtifactSink {
    saved: Rc<RefCell<Vec<Artifact>>>,
}

impl MemoryArtifactSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts saved so far, oldest first.
    pub fn saved(&self) -> Vec<Artifact> {
        self.saved.borrow().clone()
    }

    /// Number of artifacts saved.
    pub fn count(&self) -> usize {
        self.saved.borrow().len()
    }
}

impl ArtifactSink for MemoryArtifactSink {
    fn save(&mut self, artifact: &Artifact) -> Result<()> {
        self.saved.borrow_mut().push(artifact.clone());
        Ok(())
    }
}
