//! Periodic session snapshots.
//!
//! The host owns the timer. It calls [`AutoSaveManager::maybe_save`] with a
//! fresh [`Canvas::snapshot`](crate::canvas::Canvas::snapshot) whenever its
//! clock ticks; the manager decides whether a write is due.

use super::{Storage, StorageResult};
use crate::document::ProjectDocument;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 60;

/// Storage key of the session snapshot.
pub const AUTOSAVE_KEY: &str = "autosave";

/// What a stored session snapshot contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveInfo {
    pub shapes: usize,
    pub groups: usize,
}

/// Manages automatic session persistence.
pub struct AutoSaveManager<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Auto-save interval.
    interval: Duration,
    /// Last save timestamp.
    last_save: Option<Instant>,
    /// Whether the session has unsaved changes.
    dirty: bool,
    enabled: bool,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            enabled: true,
        }
    }

    /// Set the auto-save interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Get the auto-save interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mark the session as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if the session has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if enough time has passed for an auto-save.
    pub fn should_save(&self) -> bool {
        if !self.enabled || !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save the snapshot if needed (enabled, dirty and interval elapsed).
    /// Returns true if a save was performed.
    pub fn maybe_save(&mut self, snapshot: &ProjectDocument) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(snapshot)?;
        Ok(true)
    }

    /// Force save the snapshot immediately.
    pub fn save(&mut self, snapshot: &ProjectDocument) -> StorageResult<()> {
        if let Err(e) = self.storage.save(AUTOSAVE_KEY, snapshot) {
            log::warn!("autosave failed: {e}");
            return Err(e);
        }
        self.last_save = Some(Instant::now());
        self.dirty = false;
        log::info!(
            "session autosaved ({} shapes, {} groups)",
            snapshot.shapes.len(),
            snapshot.groups.len()
        );
        Ok(())
    }

    pub fn has_autosave(&self) -> bool {
        self.storage.exists(AUTOSAVE_KEY).unwrap_or(false)
    }

    /// Load the stored session, if any.
    pub fn load_autosave(&mut self) -> Option<ProjectDocument> {
        match self.storage.load(AUTOSAVE_KEY) {
            Ok(doc) => {
                self.dirty = false;
                self.last_save = Some(Instant::now());
                log::info!("session restored from autosave");
                Some(doc)
            }
            Err(e) => {
                log::debug!("no autosave restored: {e}");
                None
            }
        }
    }

    /// Shape and group counts of the stored session.
    pub fn autosave_info(&self) -> Option<AutoSaveInfo> {
        let doc = self.storage.load(AUTOSAVE_KEY).ok()?;
        Some(AutoSaveInfo {
            shapes: doc.shapes.len(),
            groups: doc.groups.len(),
        })
    }

    /// Remove the stored session.
    pub fn clear_autosave(&self) -> StorageResult<()> {
        self.storage.delete(AUTOSAVE_KEY)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
