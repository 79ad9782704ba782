use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use gpui::{px, WindowBounds, Bounds, Point, Size};
use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::fs;
use directories::ProjectDirs;
use tracing::{debug, warn};

/// Persisted app settings (theme, window size, drawing defaults).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppSettings {
    /// Name of the active gpui-component theme.
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,

    /// Border width of new rectangles, in scene units.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

fn default_theme() -> String {
    "Default Light".to_string()
}

fn default_window_width() -> f32 { 1024.0 }
fn default_window_height() -> f32 { 768.0 }
fn default_stroke_width() -> f32 { 2.0 }

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// Get the config directory, creating it if needed.
fn get_config_dir() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "OneSketch", "OneSketch") else {
        warn!("Could not determine config directory for this platform");
        return None;
    };
    let config_dir = proj_dirs.config_dir().to_path_buf();
    if !config_dir.exists() {
        if let Err(e) = fs::create_dir_all(&config_dir) {
            warn!("Failed to create config directory: {}", e);
        }
    }
    Some(config_dir)
}

impl AppSettings {
    fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load from disk, or use defaults if missing.
    pub fn load() -> Self {
        Self::get_config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            match serde_json::from_str(&contents) {
                Ok(settings) => return settings,
                Err(e) => warn!(path = ?path, error = %e, "Ignoring malformed settings"),
            }
        }
        Self::default()
    }

    pub fn window_bounds(&self) -> WindowBounds {
        let width = if self.window_width > 0.0 { self.window_width } else { default_window_width() };
        let height = if self.window_height > 0.0 { self.window_height } else { default_window_height() };
        let size = Size { width: px(width), height: px(height) };
        WindowBounds::Windowed(Bounds::new(Point { x: px(100.0), y: px(100.0) }, size))
    }
}

/// String key/value storage that outlives the process.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Preferences kept in `preferences.json` next to the settings.
///
/// The whole map is rewritten on every `set`; it only ever holds a few keys.
pub struct FilePreferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open the store in the platform config directory.
    pub fn load() -> Self {
        match get_config_dir() {
            Some(dir) => Self::open(dir.join("preferences.json")),
            None => Self { path: None, values: BTreeMap::new() },
        }
    }

    pub fn open(path: PathBuf) -> Self {
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read preferences, starting empty");
                BTreeMap::new()
            }
        };
        Self { path: Some(path), values }
    }

    fn read(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let values = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(values)
    }

    fn write(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        let Some(path) = &self.path else {
            return;
        };
        match self.write(path) {
            Ok(()) => debug!(key, value, "Saved preference"),
            Err(e) => warn!(key, error = %e, "Failed to save preference"),
        }
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default, Clone, Debug)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
