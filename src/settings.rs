//! Game settings and preferences
//!
//! Persisted separately from the leaderboard: a JSON file on native builds,
//! LocalStorage in the browser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::StoreError;
use crate::sim::Difficulty;

/// Frame rates offered in the settings screen
pub const FPS_OPTIONS: [u32; 3] = [30, 60, 120];

/// Graphics quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GraphicsLevel {
    Low,
    Medium,
    #[default]
    High,
}

impl GraphicsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphicsLevel::Low => "Low",
            GraphicsLevel::Medium => "Medium",
            GraphicsLevel::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(GraphicsLevel::Low),
            "medium" | "med" => Some(GraphicsLevel::Medium),
            "high" => Some(GraphicsLevel::High),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GraphicsLevel::Low => "No trails, minimal effects",
            GraphicsLevel::Medium => "Reduced particles",
            GraphicsLevel::High => "Full effects & trails",
        }
    }

    /// Whether snake trails are drawn
    pub fn trails_enabled(&self) -> bool {
        *self == GraphicsLevel::High
    }

    /// Maximum particles for this level
    pub fn max_particles(&self) -> usize {
        match self {
            GraphicsLevel::Low => 0,
            GraphicsLevel::Medium => 100,
            GraphicsLevel::High => 400,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub graphics: GraphicsLevel,
    pub target_fps: u32,
    /// Level preselected on the difficulty screen
    pub difficulty: Difficulty,
    /// Name submitted to the leaderboard
    pub username: String,
    /// Cosmetic snake skin
    pub skin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            graphics: GraphicsLevel::High,
            target_fps: 60,
            difficulty: Difficulty::Easy,
            username: String::new(),
            skin: "classic".to_string(),
        }
    }
}

impl Settings {
    /// Snap volume to 5% steps in range and FPS to an offered value
    pub fn sanitized(mut self) -> Self {
        let volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            Self::default().master_volume
        };
        self.master_volume = (volume * 20.0).round() / 20.0;
        if !FPS_OPTIONS.contains(&self.target_fps) {
            self.target_fps = FPS_OPTIONS
                .into_iter()
                .min_by_key(|fps| fps.abs_diff(self.target_fps))
                .unwrap_or(60);
        }
        self
    }

    /// Frame budget for the target FPS (ms)
    pub fn frame_budget_ms(&self) -> f64 {
        1000.0 / self.target_fps.max(1) as f64
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(StoreError::from)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "snake_duel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
