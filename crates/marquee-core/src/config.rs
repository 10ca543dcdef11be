use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub typewriter: TypewriterConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file written while the TUI owns the terminal
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

/// Hero typewriter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// Text typed into the hero line
    #[serde(default = "default_typewriter_text")]
    pub text: String,
    /// Delay between characters in milliseconds
    #[serde(default = "default_typewriter_speed")]
    pub speed_ms: u64,
    /// Delay before the first character is scheduled
    #[serde(default = "default_typewriter_start_delay")]
    pub start_delay_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            text: default_typewriter_text(),
            speed_ms: default_typewriter_speed(),
            start_delay_ms: default_typewriter_start_delay(),
        }
    }
}

impl TypewriterConfig {
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Scroll position (rows) past which the navbar turns opaque
    #[serde(default = "default_navbar_threshold")]
    pub navbar_threshold: u16,
    /// Rows reserved for the fixed navbar when jumping to an anchor
    #[serde(default = "default_navbar_offset")]
    pub navbar_offset: u16,
    /// How long copy buttons show "Copied!" or "Failed"
    #[serde(default = "default_copy_feedback")]
    pub copy_feedback_ms: u64,
    /// Terminals narrower than this many columns drop scrubbed animations
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u16,
    /// Skip entrance and scroll animations entirely
    #[serde(default)]
    pub reduced_motion: bool,
    /// Smooth scrolling configuration
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            navbar_threshold: default_navbar_threshold(),
            navbar_offset: default_navbar_offset(),
            copy_feedback_ms: default_copy_feedback(),
            mobile_breakpoint: default_mobile_breakpoint(),
            reduced_motion: false,
            scroll: ScrollConfig::default(),
        }
    }
}

impl UiConfig {
    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

/// Easing curve used by scroll animations and tweens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
    Power2Out,
    Power2InOut,
    BackOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate scrolling instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Scroll animation duration in milliseconds
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    /// Easing applied to scroll animations
    #[serde(default)]
    pub easing: EasingType,
    /// Lines moved per keypress when smooth scrolling is off
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
        .join("marquee.log")
}

fn default_typewriter_text() -> String {
    "pip install pyward-cli".to_string()
}

fn default_typewriter_speed() -> u64 {
    80
}

fn default_typewriter_start_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_navbar_threshold() -> u16 {
    2
}

fn default_navbar_offset() -> u16 {
    3 // navbar height plus a blank row
}

fn default_copy_feedback() -> u64 {
    2000
}

fn default_mobile_breakpoint() -> u16 {
    80
}

fn default_scroll_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
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
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/marquee/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("marquee")
            .join("config.toml")
    }

    /// Get the log file path (with tilde expansion)
    pub fn log_file(&self) -> PathBuf {
        expand_tilde(&self.general.log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_landing_page() {
        let config = AppConfig::default();
        assert_eq!(config.typewriter.text, "pip install pyward-cli");
        assert_eq!(config.typewriter.speed(), Duration::from_millis(80));
        assert_eq!(config.typewriter.start_delay(), Duration::from_millis(1000));
        assert_eq!(config.ui.navbar_threshold, 2);
        assert_eq!(config.ui.copy_feedback(), Duration::from_millis(2000));
        assert!(!config.ui.reduced_motion);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[typewriter]
text = "cargo install marquee"

[ui.scroll]
easing = "back_out"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.typewriter.text, "cargo install marquee");
        assert_eq!(config.typewriter.speed_ms, 80);
        assert_eq!(config.ui.scroll.easing, EasingType::BackOut);
        assert_eq!(config.ui.scroll.animation_duration_ms, 150);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[typewriter\nspeed_ms = ").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.ui.mobile_breakpoint = 100;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.ui.mobile_breakpoint, 100);
    }
}
