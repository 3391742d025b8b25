use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::paths::AppPaths;

pub const DEFAULT_WIDTH: i32 = 1400;
pub const DEFAULT_HEIGHT: i32 = 900;

/// Window geometry restored at startup.
///
/// While `is_maximized` is set, the other fields hold the restored
/// (pre-maximize) bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub width: i32,
    pub height: i32,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub is_maximized: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            x: None,
            y: None,
            is_maximized: false,
        }
    }
}

/// Geometry reported by the host window. Offsets are optional because not
/// every windowing backend exposes a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: i32,
    pub height: i32,
}

impl WindowState {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read window state: {0}")]
    Io(#[from] io::Error),

    #[error("window state is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("window state is not a JSON object")]
    NotAnObject,

    #[error("window state has no `{0}`")]
    MissingDimension(&'static str),

    #[error("window state `{0}` is not a positive number")]
    InvalidDimension(&'static str),
}

impl LoadError {
    fn is_missing_file(&self) -> bool {
        matches!(self, LoadError::Io(err) if err.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("refusing to store {width}x{height} window bounds")]
    InvalidBounds { width: i32, height: i32 },

    #[error("failed to serialize window state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write window state: {0}")]
    Io(#[from] io::Error),
}

/// Host notifications that trigger a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEvent {
    Resized,
    Moved,
    MaximizedChanged,
    Closing,
}

/// Live window queried when a geometry event fires.
pub trait GeometrySource {
    fn bounds(&self) -> Bounds;
    fn is_maximized(&self) -> bool;
}

/// On-disk record. Bounds are left out when there are none to keep.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
    is_maximized: bool,
}

impl StateRecord {
    fn with_bounds(bounds: Bounds, is_maximized: bool) -> Self {
        Self {
            width: Some(bounds.width),
            height: Some(bounds.height),
            x: bounds.x,
            y: bounds.y,
            is_maximized,
        }
    }

    fn maximized_only() -> Self {
        Self {
            width: None,
            height: None,
            x: None,
            y: None,
            is_maximized: true,
        }
    }
}

/// Validates a persisted record and merges it over the defaults.
///
/// `width` and `height` must both be positive numbers or the whole record is
/// rejected. Optional fields with an unexpected type keep their default.
pub fn parse_state(raw: &str) -> Result<WindowState, LoadError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(map) = value else {
        return Err(LoadError::NotAnObject);
    };
    let width = dimension(&map, "width")?;
    let height = dimension(&map, "height")?;

    let defaults = WindowState::default();
    Ok(WindowState {
        width,
        height,
        x: offset(&map, "x").or(defaults.x),
        y: offset(&map, "y").or(defaults.y),
        is_maximized: map
            .get("isMaximized")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.is_maximized),
    })
}

fn dimension(map: &Map<String, Value>, key: &'static str) -> Result<i32, LoadError> {
    let value = map.get(key).ok_or(LoadError::MissingDimension(key))?;
    value
        .as_f64()
        .and_then(to_pixels)
        .filter(|px| *px > 0)
        .ok_or(LoadError::InvalidDimension(key))
}

fn offset(map: &Map<String, Value>, key: &str) -> Option<i32> {
    map.get(key).and_then(Value::as_f64).and_then(to_pixels)
}

fn to_pixels(value: f64) -> Option<i32> {
    let value = value.trunc();
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}

/// Reads and writes `window-state.json`. Holds nothing but the file path, so
/// every load re-derives the state from disk.
#[derive(Debug, Clone)]
pub struct WindowStateStore {
    path: PathBuf,
}

impl WindowStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &AppPaths) -> Self {
        Self::new(&paths.state_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: anything unreadable or invalid yields the default state.
    pub fn load(&self) -> WindowState {
        self.try_load().unwrap_or_else(|err| {
            if err.is_missing_file() {
                log::debug!("No window state at {}, using defaults", self.path.display());
            } else {
                log::warn!("Failed to load window state: {err}");
            }
            WindowState::default()
        })
    }

    pub fn try_load(&self) -> Result<WindowState, LoadError> {
        let raw = fs::read_to_string(&self.path)?;
        parse_state(&raw)
    }

    /// Never fails: write errors are logged and dropped.
    pub fn save(&self, bounds: Bounds, is_maximized: bool) {
        if let Err(err) = self.try_save(bounds, is_maximized) {
            log::warn!("Failed to save window state: {err}");
        }
    }

    /// Overwrites the state file. A maximized window never contributes its
    /// bounds; the restored bounds already on disk are written back instead.
    pub fn try_save(&self, bounds: Bounds, is_maximized: bool) -> Result<(), SaveError> {
        let record = if is_maximized {
            match self.try_load() {
                Ok(previous) => StateRecord::with_bounds(previous.bounds(), true),
                Err(err) => {
                    log::debug!("No restored bounds to keep while maximized: {err}");
                    StateRecord::maximized_only()
                }
            }
        } else {
            if bounds.width <= 0 || bounds.height <= 0 {
                return Err(SaveError::InvalidBounds {
                    width: bounds.width,
                    height: bounds.height,
                });
            }
            StateRecord::with_bounds(bounds, false)
        };

        let data = serde_json::to_string_pretty(&record)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, data)?;
        Ok(())
    }

    pub fn record(&self, event: GeometryEvent, source: &impl GeometrySource) {
        log::trace!("Saving window state after {event:?}");
        self.save(source.bounds(), source.is_maximized());
    }
}
