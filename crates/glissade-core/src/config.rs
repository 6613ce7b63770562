use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollOptions,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Per-scroller options
///
/// Frictions outside `[0, 1]` are clamped by the scroller, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollOptions {
    /// Fraction of the remaining distance covered per standard frame
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Intercept wheel events and animate them
    #[serde(default)]
    pub handle_wheel: bool,
    /// Swap wheel axes (vertical wheel scrolls horizontally)
    #[serde(default)]
    pub flip_wheel: bool,
    /// Friction used for wheel-driven motion
    #[serde(default = "default_wheel_friction")]
    pub wheel_friction: f64,
    /// Pixels per line for line-based wheel deltas
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            handle_wheel: false,
            flip_wheel: false,
            wheel_friction: default_wheel_friction(),
            line_height: default_line_height(),
        }
    }
}

impl ScrollOptions {
    /// Copy with every field brought into its valid range
    pub fn sanitized(self) -> Self {
        Self {
            friction: clamp_friction(self.friction, default_friction()),
            wheel_friction: clamp_friction(self.wheel_friction, default_wheel_friction()),
            line_height: if self.line_height.is_finite() && self.line_height > 0.0 {
                self.line_height
            } else {
                default_line_height()
            },
            ..self
        }
    }
}

/// Clamp a friction into `[0, 1]`, using `fallback` for NaN
pub fn clamp_friction(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Animation frame rate while motion is active
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Event poll interval when idle, in milliseconds
    #[serde(default = "default_idle_tick")]
    pub idle_tick_ms: u64,
    /// Capture mouse wheel events in the terminal
    #[serde(default = "default_true")]
    pub capture_mouse: bool,
    /// Rows moved by a single scroll key press
    #[serde(default = "default_scroll_step")]
    pub scroll_step: u16,
    /// Glide speed in rows per second
    #[serde(default = "default_glide_speed")]
    pub glide_speed: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            idle_tick_ms: default_idle_tick(),
            capture_mouse: default_true(),
            scroll_step: default_scroll_step(),
            glide_speed: default_glide_speed(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-d>" (Ctrl+d), "G" (Shift+g), "<Esc>", "<Space>", "<Home>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_scroll_left")]
    pub scroll_left: String,
    #[serde(default = "default_key_scroll_right")]
    pub scroll_right: String,
    #[serde(default = "default_key_half_page_down")]
    pub half_page_down: String,
    #[serde(default = "default_key_half_page_up")]
    pub half_page_up: String,
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    /// Animated jump to the top ("gg" is a two-key sequence)
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Animated jump to the bottom
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// Start gliding down
    #[serde(default = "default_key_glide_down")]
    pub glide_down: String,
    /// Start gliding up
    #[serde(default = "default_key_glide_up")]
    pub glide_up: String,
    /// Stop all motion
    #[serde(default = "default_key_stop")]
    pub stop: String,
    /// Instant, non-animated jump to the top
    #[serde(default = "default_key_jump_home")]
    pub jump_home: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            scroll_left: default_key_scroll_left(),
            scroll_right: default_key_scroll_right(),
            half_page_down: default_key_half_page_down(),
            half_page_up: default_key_half_page_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            glide_down: default_key_glide_down(),
            glide_up: default_key_glide_up(),
            stop: default_key_stop(),
            jump_home: default_key_jump_home(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_scroll_left() -> String { "h".to_string() }
fn default_key_scroll_right() -> String { "l".to_string() }
fn default_key_half_page_down() -> String { "<C-d>".to_string() }
fn default_key_half_page_up() -> String { "<C-u>".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_glide_down() -> String { "J".to_string() }
fn default_key_glide_up() -> String { "K".to_string() }
fn default_key_stop() -> String { "<Space>".to_string() }
fn default_key_jump_home() -> String { "<Home>".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glissade")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_friction() -> f64 {
    0.2
}

fn default_wheel_friction() -> f64 {
    0.25
}

fn default_line_height() -> f64 {
    16.0
}

fn default_frame_rate() -> u32 {
    60
}

fn default_idle_tick() -> u64 {
    250
}

fn default_scroll_step() -> u16 {
    3
}

fn default_glide_speed() -> f64 {
    30.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, returning defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/glissade/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("glissade")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used by the interactive pager
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("glissade.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scroll_options() {
        let options = ScrollOptions::default();
        assert_eq!(options.friction, 0.2);
        assert!(!options.handle_wheel);
        assert!(!options.flip_wheel);
        assert_eq!(options.wheel_friction, 0.25);
        assert_eq!(options.line_height, 16.0);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml(
            r#"
            [scroll]
            friction = 0.1
            handle_wheel = true

            [keymap]
            quit = "<Esc>"
            "#,
        )
        .unwrap();

        assert_eq!(config.scroll.friction, 0.1);
        assert!(config.scroll.handle_wheel);
        assert_eq!(config.scroll.wheel_friction, 0.25);
        assert_eq!(config.keymap.quit, "<Esc>");
        assert_eq!(config.keymap.scroll_down, "j");
        assert_eq!(config.ui.frame_rate, 60);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_config_is_error() {
        let err = AppConfig::from_toml("[scroll]\nfriction = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_round_trip_keeps_values() {
        let mut config = AppConfig::default();
        config.scroll.flip_wheel = true;
        config.ui.glide_speed = 12.5;
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert!(parsed.scroll.flip_wheel);
        assert_eq!(parsed.ui.glide_speed, 12.5);
    }

    #[test]
    fn test_sanitized_options() {
        let options = ScrollOptions {
            friction: 3.0,
            wheel_friction: f64::NAN,
            line_height: -1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(options.friction, 1.0);
        assert_eq!(options.wheel_friction, 0.25);
        assert_eq!(options.line_height, 16.0);
    }
}
