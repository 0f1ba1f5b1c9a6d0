//! Best-effort asset loading.
//!
//! Every registered asset counts toward completion whether it loads or not;
//! failures are logged and the slot stays empty.  Loading runs on a worker
//! thread that reports through a channel, so the frame loop never blocks on
//! disk.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::config::AssetConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => f.write_str("image"),
            AssetKind::Audio => f.write_str("audio"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssetRequest {
    pub name: String,
    pub kind: AssetKind,
    pub path: PathBuf,
}

/// Raw bytes of every asset that loaded successfully.
#[derive(Clone, Debug, Default)]
pub struct Assets {
    images: HashMap<String, Vec<u8>>,
    audio: HashMap<String, Vec<u8>>,
}

impl Assets {
    pub fn image(&self, name: &str) -> Option<&[u8]> {
        self.images.get(name).map(Vec::as_slice)
    }

    pub fn audio(&self, name: &str) -> Option<&[u8]> {
        self.audio.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, kind: AssetKind, name: String, bytes: Vec<u8>) {
        match kind {
            AssetKind::Image => self.images.insert(name, bytes),
            AssetKind::Audio => self.audio.insert(name, bytes),
        };
    }
}

#[derive(Debug)]
pub enum LoadEvent {
    /// Whole-number percentage of assets settled so far.
    Progress(u8),
    Complete(Assets),
}

/// Settled/total counter shared by the blocking and threaded paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    loaded: usize,
    total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self { loaded: 0, total }
    }

    /// Mark one asset settled and return the new percentage.
    pub fn record(&mut self) -> u8 {
        self.loaded = (self.loaded + 1).min(self.total);
        self.percent()
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.loaded as f64 / self.total as f64) * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.loaded == self.total
    }
}

#[derive(Clone, Debug)]
pub struct AssetLoader {
    images_path: PathBuf,
    audio_path: PathBuf,
    requests: Vec<AssetRequest>,
}

impl AssetLoader {
    pub fn new(images_path: impl Into<PathBuf>, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            images_path: images_path.into(),
            audio_path: audio_path.into(),
            requests: Vec::new(),
        }
    }

    /// Register every image and audio entry named in the config.
    pub fn from_config(cfg: &AssetConfig) -> Self {
        let mut loader = Self::new(&cfg.images_path, &cfg.audio_path);
        for (name, file) in &cfg.images {
            loader.load_image(name, file);
        }
        for (name, file) in &cfg.audio {
            loader.load_audio(name, file);
        }
        loader
    }

    pub fn load_image(&mut self, name: &str, file: impl AsRef<Path>) {
        let path = self.images_path.join(file);
        self.requests.push(AssetRequest {
            name: name.to_string(),
            kind: AssetKind::Image,
            path,
        });
    }

    pub fn load_audio(&mut self, name: &str, file: impl AsRef<Path>) {
        let path = self.audio_path.join(file);
        self.requests.push(AssetRequest {
            name: name.to_string(),
            kind: AssetKind::Audio,
            path,
        });
    }

    pub fn total(&self) -> usize {
        self.requests.len()
    }

    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }

    /// Load everything on the calling thread, reporting each settled asset.
    pub fn load_blocking(self, mut on_progress: impl FnMut(u8)) -> Assets {
        let mut assets = Assets::default();
        let mut progress = LoadProgress::new(self.requests.len());

        for req in self.requests {
            match fs::read(&req.path) {
                Ok(bytes) => {
                    tracing::debug!(name = %req.name, kind = %req.kind, bytes = bytes.len(), "asset loaded");
                    assets.insert(req.kind, req.name, bytes);
                }
                Err(e) => {
                    tracing::error!("failed to load {}: {} ({e})", req.kind, req.path.display());
                }
            }
            on_progress(progress.record());
        }

        assets
    }

    /// Spawn a loader thread.  The receiver sees zero or more `Progress`
    /// events followed by exactly one `Complete`.
    pub fn start_loading(self) -> mpsc::Receiver<LoadEvent> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let assets = self.load_blocking(|pct| {
                let _ = progress_tx.send(LoadEvent::Progress(pct));
            });
            let _ = tx.send(LoadEvent::Complete(assets));
        });
        rx
    }
}
