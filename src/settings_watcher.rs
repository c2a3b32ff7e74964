//! Settings hot reload.
//!
//! Watches the settings file's directory (editors often replace the file
//! rather than write it in place) and reports changes to that one file.
//! Events are drained with `poll` from the host's event loop.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use tracing::{debug, warn};

pub use crate::settings::default_settings_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    Created,
    Modified,
    Deleted,
    Error(String),
}

pub struct SettingsWatcher {
    path: PathBuf,
    rx: Receiver<notify::Result<Event>>,
    // Dropping the watcher stops delivery.
    _watcher: RecommendedWatcher,
}

impl SettingsWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create settings directory {}", dir.display()))?;

        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        debug!(path = %path.display(), "Watching settings file");

        Ok(Self { path, rx, _watcher: watcher })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next event for the settings file, if any. Never blocks.
    ///
    /// Bursts of events are collapsed into the last one.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if let Some(mapped) = self.map_event(&event) {
                        latest = Some(mapped);
                    }
                }
                Ok(Err(e)) => {
                    warn!("Settings watch error: {}", e);
                    latest = Some(SettingsEvent::Error(e.to_string()));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    latest = Some(SettingsEvent::Error("watcher disconnected".into()));
                    break;
                }
            }
        }
        latest
    }

    fn map_event(&self, event: &Event) -> Option<SettingsEvent> {
        if !event.paths.iter().any(|p| self.is_settings_file(p)) {
            return None;
        }
        match event.kind {
            EventKind::Create(_) => Some(SettingsEvent::Created),
            EventKind::Modify(_) => Some(SettingsEvent::Modified),
            EventKind::Remove(_) => Some(SettingsEvent::Deleted),
            _ => None,
        }
    }

    fn is_settings_file(&self, candidate: &Path) -> bool {
        candidate == self.path
            || (candidate.file_name() == self.path.file_name() && candidate.parent() == self.path.parent())
    }
}
