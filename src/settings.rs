//! Host preferences
//!
//! Kept in memory for the session; the page starts from defaults on reload.

use serde::{Deserialize, Serialize};

/// Player-facing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Debug ===
    /// Draw each chaser's AI mode number instead of its eyes
    pub show_ai_labels: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 0.5,
            music_volume: 0.7,
            muted: false,
            show_ai_labels: false,
        }
    }
}

impl Settings {
    /// Volume actually applied to sound effects
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "on" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_silences_sfx() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_sfx_volume(), 0.5);
        settings.toggle_mute();
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        settings.toggle_mute();
        assert_eq!(settings.effective_sfx_volume(), 0.5);
    }

    #[test]
    fn test_volume_clamped() {
        let settings = Settings {
            sfx_volume: 3.0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"show_ai_labels":true}"#).unwrap();
        assert!(settings.show_ai_labels);
        assert_eq!(settings.music_volume, 0.7);
    }
}
