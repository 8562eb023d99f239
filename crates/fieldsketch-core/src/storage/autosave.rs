//! Debounced auto-save.
//!
//! Every edit calls [`AutoSave::schedule`], which replaces any pending save
//! with a new one due after the configured delay. The host owns the actual
//! timer: it either polls [`AutoSave::take_due`] each frame or arms a timer and
//! hands the [`SaveTicket`] back through [`AutoSave::fire`], which rejects
//! tickets that a later `schedule` superseded.

use crate::project::Project;
use crate::storage::{Storage, StorageResult};
use web_time::{Duration, Instant};

/// Default debounce delay.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveConfig {
    pub delay: Duration,
    pub enabled: bool,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
            enabled: true,
        }
    }
}

/// Handle to one scheduled save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    generation: u64,
    due: Instant,
}

impl SaveTicket {
    pub fn due(&self) -> Instant {
        self.due
    }
}

/// At most one pending save; rescheduling replaces it.
#[derive(Debug, Clone)]
pub struct AutoSave {
    config: AutoSaveConfig,
    generation: u64,
    pending: Option<SaveTicket>,
    last_saved: Option<Instant>,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(AutoSaveConfig::default())
    }
}

impl AutoSave {
    pub fn new(config: AutoSaveConfig) -> Self {
        Self {
            config,
            generation: 0,
            pending: None,
            last_saved: None,
        }
    }

    pub fn config(&self) -> &AutoSaveConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    /// Schedule a save `delay` after `now`, superseding any pending one.
    /// Returns `None` while auto-save is disabled.
    pub fn schedule(&mut self, now: Instant) -> Option<SaveTicket> {
        if !self.config.enabled {
            return None;
        }
        self.generation += 1;
        let ticket = SaveTicket {
            generation: self.generation,
            due: now + self.config.delay,
        };
        self.pending = Some(ticket);
        Some(ticket)
    }

    pub fn pending(&self) -> Option<SaveTicket> {
        self.pending
    }

    /// Drop the pending save. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.pending.is_some_and(|t| now >= t.due)
    }

    /// Claim the pending save if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<SaveTicket> {
        if self.is_due(now) { self.pending.take() } else { None }
    }

    /// Claim the save for a host timer callback. Stale tickets return `false`.
    pub fn fire(&mut self, ticket: SaveTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            log::debug!("Ignoring superseded autosave {}", ticket.generation);
            false
        }
    }

    pub fn last_saved(&self) -> Option<Instant> {
        self.last_saved
    }

    /// Write the project now.
    ///
    /// A failed write leaves the project untouched; the next edit schedules
    /// another attempt.
    pub async fn save<S: Storage + ?Sized>(&mut self, storage: &S, project: &Project) -> StorageResult<()> {
        let record = project.to_record();
        match storage.save(&record).await {
            Ok(()) => {
                log::debug!("Autosaved project {}", record.id);
                self.last_saved = Some(Instant::now());
                Ok(())
            }
            Err(err) => {
                log::warn!("Autosave of project {} failed: {err}", record.id);
                Err(err)
            }
        }
    }

    /// Save if the pending task is due. Returns whether a save ran.
    pub async fn run_due<S: Storage + ?Sized>(
        &mut self,
        now: Instant,
        storage: &S,
        project: &Project,
    ) -> StorageResult<bool> {
        if self.take_due(now).is_none() {
            return Ok(false);
        }
        self.save(storage, project).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectRecord;
    use crate::storage::{BoxFuture, MemoryStorage, StorageError};
    use pollster::block_on;

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn save(&self, _record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".to_string())) })
        }

        fn load(&self, _id: &str) -> BoxFuture<'_, StorageResult<Option<ProjectRecord>>> {
            Box::pin(async { Ok(None) })
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectRecord>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn delete(&self, _id: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let mut autosave = AutoSave::default();
        let start = Instant::now();
        let first = autosave.schedule(start).unwrap();
        let second = autosave.schedule(start + Duration::from_millis(500)).unwrap();

        assert_ne!(first, second);
        assert!(!autosave.fire(first));
        assert!(autosave.fire(second));
        assert!(autosave.pending().is_none());
    }

    #[test]
    fn test_due_after_delay() {
        let mut autosave = AutoSave::default();
        let start = Instant::now();
        autosave.schedule(start);

        assert!(!autosave.is_due(start + Duration::from_millis(1999)));
        assert!(autosave.take_due(start + Duration::from_millis(1999)).is_none());
        assert!(autosave.take_due(start + Duration::from_millis(2000)).is_some());
        assert!(!autosave.is_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_reschedule_pushes_deadline() {
        let mut autosave = AutoSave::default();
        let start = Instant::now();
        autosave.schedule(start);
        autosave.schedule(start + Duration::from_millis(1500));
        assert!(!autosave.is_due(start + Duration::from_millis(2500)));
        assert!(autosave.is_due(start + Duration::from_millis(3500)));
    }

    #[test]
    fn test_cancel_and_disable() {
        let mut autosave = AutoSave::default();
        autosave.schedule(Instant::now());
        assert!(autosave.cancel());
        assert!(!autosave.cancel());

        autosave.set_enabled(false);
        assert!(autosave.schedule(Instant::now()).is_none());
    }

    #[test]
    fn test_run_due_saves() {
        let storage = MemoryStorage::new();
        let project = Project::new("Autosaved");
        let mut autosave = AutoSave::new(AutoSaveConfig {
            delay: Duration::ZERO,
            enabled: true,
        });
        let now = Instant::now();
        autosave.schedule(now);

        assert!(block_on(autosave.run_due(now, &storage, &project)).unwrap());
        assert!(autosave.last_saved().is_some());
        let saved = block_on(storage.load(&project.id)).unwrap().unwrap();
        assert_eq!(saved.name, "Autosaved");
        assert!(!block_on(autosave.run_due(now, &storage, &project)).unwrap());
    }

    #[test]
    fn test_failed_save_keeps_project() {
        let project = Project::new("Unsaved");
        let before = project.clone();
        let mut autosave = AutoSave::default();
        let result = block_on(autosave.save(&FailingStorage, &project));
        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(project, before);
        assert!(autosave.last_saved().is_none());
        assert!(autosave.schedule(Instant::now()).is_some());
    }
}
