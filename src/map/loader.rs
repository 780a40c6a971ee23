//! Map-data source and the background loader feeding the planner.

use super::types::MapData;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, warn};

const BUILTIN_MAPS: &[(&str, &str)] = &[(
    "concealed_hill",
    include_str!("data/concealed_hill.json"),
)];

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("no map data found for '{0}'")]
    NotFound(String),
    #[error("failed to read map file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse map data for '{slug}': {source}")]
    Parse {
        slug: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("map '{0}' has invalid dimensions")]
    InvalidDimensions(String),
}

/// Normalizes a display name to the slug used for file lookup.
///
/// "Concealed Hill" -> "concealed_hill"
pub fn map_slug(map_name: &str) -> String {
    map_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Anything able to produce map data for a map name.
pub trait MapSource: Send + Sync {
    fn load(&self, map_name: &str) -> Result<MapData, MapLoadError>;

    /// Display names of the maps this source can serve.
    fn available_maps(&self) -> Vec<String>;
}

pub fn parse_map_data(slug: &str, json: &str) -> Result<MapData, MapLoadError> {
    let data: MapData = serde_json::from_str(json).map_err(|source| MapLoadError::Parse {
        slug: slug.to_string(),
        source,
    })?;
    if data.dimensions.width <= 0.0 || data.dimensions.height <= 0.0 {
        return Err(MapLoadError::InvalidDimensions(slug.to_string()));
    }
    Ok(data)
}

/// Reads `<maps_dir>/<slug>.json`, falling back to the maps compiled into the binary.
pub struct FsMapSource {
    maps_dir: PathBuf,
}

impl FsMapSource {
    pub fn new(maps_dir: impl Into<PathBuf>) -> Self {
        Self {
            maps_dir: maps_dir.into(),
        }
    }

    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    fn builtin(slug: &str) -> Option<&'static str> {
        BUILTIN_MAPS
            .iter()
            .find(|(name, _)| *name == slug)
            .map(|(_, json)| *json)
    }
}

impl MapSource for FsMapSource {
    fn load(&self, map_name: &str) -> Result<MapData, MapLoadError> {
        let slug = map_slug(map_name);
        let path = self.maps_dir.join(format!("{}.json", slug));

        match fs::read_to_string(&path) {
            Ok(json) => parse_map_data(&slug, &json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => match Self::builtin(&slug) {
                Some(json) => {
                    debug!(%slug, "using built-in map data");
                    parse_map_data(&slug, json)
                }
                None => Err(MapLoadError::NotFound(slug)),
            },
            Err(source) => Err(MapLoadError::Read { path, source }),
        }
    }

    fn available_maps(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_MAPS
            .iter()
            .filter_map(|(slug, json)| parse_map_data(slug, json).ok())
            .map(|data| data.map_name)
            .collect();

        if let Ok(entries) = fs::read_dir(&self.maps_dir) {
            for path in entries.flatten().map(|e| e.path()) {
                if path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let name = match fs::read_to_string(&path) {
                    Ok(json) => match parse_map_data(stem, &json) {
                        Ok(data) => data.map_name,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "skipping unreadable map");
                            continue;
                        }
                    },
                    Err(_) => continue,
                };
                if !names.iter().any(|n| map_slug(n) == map_slug(&name)) {
                    names.push(name);
                }
            }
        }

        names.sort();
        names
    }
}

/// Identifies one load request; only the newest ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

pub type LoadResult = (LoadTicket, Result<MapData, MapLoadError>);

/// Runs map loads off the UI thread and hands results back over a channel.
pub struct MapLoader {
    source: Arc<dyn MapSource>,
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
}

impl MapLoader {
    pub fn new(source: Arc<dyn MapSource>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            sender,
            receiver,
        }
    }

    pub fn source(&self) -> &Arc<dyn MapSource> {
        &self.source
    }

    pub fn request(&self, ticket: LoadTicket, map_name: &str) {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let map_name = map_name.to_string();
        thread::spawn(move || {
            let result = source.load(&map_name);
            // Receiver gone means the app is shutting down.
            let _ = sender.send((ticket, result));
        });
    }

    /// Drains every finished load without blocking.
    pub fn poll(&self) -> Vec<LoadResult> {
        self.receiver.try_iter().collect()
    }
}
