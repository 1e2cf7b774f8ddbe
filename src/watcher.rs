//! File system watcher for watch mode

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches an artifact directory and emits changed `.txt` paths
pub struct ArtifactWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl ArtifactWatcher {
    /// Start watching the directory (not its subdirectories)
    pub fn watch(dir: &Path) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Whether a path could be an artifact log
    pub fn is_artifact_file(p: &Path) -> bool {
        p.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
    }

    fn paths_from_event(event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| Self::is_artifact_file(p))
            .cloned()
            .collect()
    }

    /// Wait for the next batch of changes (debounced). Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(Self::paths_from_event(&event)),
            Ok(Err(_)) | Err(_) => return vec![],
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(Self::paths_from_event(&event));
            }
        }

        let mut paths: Vec<PathBuf> = all.into_iter().collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_artifact_file() {
        assert!(ArtifactWatcher::is_artifact_file(Path::new("hadolint.txt")));
        assert!(ArtifactWatcher::is_artifact_file(Path::new("/ci/job/SEMGREP.TXT")));
        assert!(!ArtifactWatcher::is_artifact_file(Path::new("report.html")));
        assert!(!ArtifactWatcher::is_artifact_file(Path::new("txt")));
        assert!(!ArtifactWatcher::is_artifact_file(Path::new("")));
    }

    #[test]
    fn test_is_create_or_modify() {
        use notify::event::{CreateKind, ModifyKind, RemoveKind};
        assert!(is_create_or_modify(&EventKind::Create(CreateKind::File)));
        assert!(is_create_or_modify(&EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Content
        ))));
        assert!(!is_create_or_modify(&EventKind::Remove(RemoveKind::File)));
    }

    #[test]
    fn test_paths_from_event_filters_artifacts() {
        use notify::event::{CreateKind, RemoveKind};

        let event = notify::Event {
            kind: EventKind::Create(CreateKind::File),
            paths: vec![
                PathBuf::from("job/clamav.txt"),
                PathBuf::from("job/notes.md"),
                PathBuf::from("job/web-scan.txt"),
            ],
            attrs: Default::default(),
        };
        let paths = ArtifactWatcher::paths_from_event(&event);
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&PathBuf::from("job/clamav.txt")));
        assert!(paths.contains(&PathBuf::from("job/web-scan.txt")));

        let remove_event = notify::Event {
            kind: EventKind::Remove(RemoveKind::File),
            paths: vec![PathBuf::from("job/clamav.txt")],
            attrs: Default::default(),
        };
        assert!(ArtifactWatcher::paths_from_event(&remove_event).is_empty());
    }

    #[test]
    fn test_watch_creates_watcher() {
        let dir = tempfile::TempDir::new().unwrap();
        let watcher = ArtifactWatcher::watch(dir.path());
        assert!(watcher.is_ok(), "watch should succeed on a temp dir");
    }
}
