//! Session preferences
//!
//! Audio levels and effect quality. These live for the page session only;
//! the high score is the one value the game persists.

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 256,
            QualityPreset::Medium => 1024,
            QualityPreset::High => 4096,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone)]
pub struct Settings {
    /// Effect quality preset
    pub quality: QualityPreset,
    /// Explosion particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Settings from a page query string such as `?quality=low&mute=1`
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "quality" => {
                    if let Some(preset) = QualityPreset::parse(value) {
                        settings.quality = preset;
                    }
                }
                "mute" => settings.muted = matches!(value, "" | "1" | "true"),
                "particles" => settings.particles = !matches!(value, "0" | "false" | "off"),
                _ => {}
            }
        }
        settings
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective cue volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }
}
