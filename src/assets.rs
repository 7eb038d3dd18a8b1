/// Sprite loading.  Runs on its own thread and reports each asset over a
/// channel so the game loop never blocks on the filesystem.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use catch_game::machine::{AssetId, AssetStatus};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no assets directory configured")]
    NoDirectory,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} contains no sprite line")]
    Empty(PathBuf),
}

pub type AssetReport = (AssetId, Result<String, AssetError>);

fn file_name(id: AssetId) -> &'static str {
    match id {
        AssetId::Hero => "hero.txt",
        AssetId::Spacecraft => "spacecraft.txt",
        AssetId::Octopus => "octopus.txt",
    }
}

/// Built-in glyphs used when a sprite is missing or failed to load.
pub fn fallback_sprite(id: AssetId) -> &'static str {
    match id {
        AssetId::Hero => "\\▄▄/",
        AssetId::Spacecraft => "«▼»",
        AssetId::Octopus => "(◎)",
    }
}

fn load_sprite(dir: &Path, id: AssetId) -> Result<String, AssetError> {
    let path = dir.join(file_name(id));
    let text = fs::read_to_string(&path).map_err(|source| AssetError::Io {
        path: path.clone(),
        source,
    })?;
    text.lines()
        .map(str::trim_end)
        .find(|l| !l.trim().is_empty())
        .map(str::to_string)
        .ok_or(AssetError::Empty(path))
}

/// Load every sprite in the background, one report per asset.
pub fn spawn_loader(dir: Option<PathBuf>) -> mpsc::Receiver<AssetReport> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for id in AssetId::ALL {
            let result = match &dir {
                Some(dir) => load_sprite(dir, id),
                None => Err(AssetError::NoDirectory),
            };
            if tx.send((id, result)).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });
    rx
}

/// Sprites resolved so far; anything absent draws with its fallback.
#[derive(Default)]
pub struct Sprites {
    loaded: HashMap<AssetId, String>,
}

impl Sprites {
    /// Store a report's sprite and return the status for the state machine.
    pub fn accept(&mut self, (id, result): AssetReport) -> (AssetId, AssetStatus) {
        match result {
            Ok(sprite) => {
                debug!("loaded sprite {:?}: {:?}", id, sprite);
                self.loaded.insert(id, sprite);
                (id, AssetStatus::Loaded)
            }
            Err(err) => {
                debug!("sprite {:?} unavailable: {}", id, err);
                (id, AssetStatus::Failed)
            }
        }
    }

    pub fn get(&self, id: AssetId, fallback: bool) -> &str {
        match self.loaded.get(&id) {
            Some(sprite) if !fallback => sprite.as_str(),
            _ => fallback_sprite(id),
        }
    }
}
