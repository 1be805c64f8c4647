//! Widget settings and preferences
//!
//! Persisted in LocalStorage, independent of any page state.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
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

    /// Number of orbiting particles (fixed for the widget's lifetime)
    pub fn orbit_count(&self) -> usize {
        match self {
            QualityPreset::Low => 24,
            QualityPreset::Medium => 40,
            QualityPreset::High => 56,
        }
    }

    /// Live burst particle cap
    pub fn max_burst_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 400,
            QualityPreset::High => 800,
        }
    }

    /// Sphere trail length in points
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => 50,
            QualityPreset::High => 80,
        }
    }

    /// Whether orbit particles get connective lines
    pub fn orbit_links(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Widget settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Fading trail behind the sphere
    pub trails: bool,
    /// Particle bursts on click / charged release
    pub bursts: bool,
    /// Expanding ripple rings
    pub ripples: bool,
    /// Custom cursor overlay (desktop only)
    pub custom_cursor: bool,

    // === Accessibility ===
    /// Reduced motion (slower spin, fewer particles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            trails: true,
            bursts: true,
            ripples: true,
            custom_cursor: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the trail for performance
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Orbit particle count
    pub fn orbit_count(&self) -> usize {
        self.quality.orbit_count()
    }

    /// Connective lines between orbit particles (off on Low)
    pub fn orbit_links(&self) -> bool {
        self.quality.orbit_links() && !self.reduced_motion
    }

    /// Effective trail length (0 when trails are off)
    pub fn trail_length(&self) -> usize {
        if !self.trails {
            0
        } else {
            self.quality.trail_length()
        }
    }

    /// Effective burst particle cap
    pub fn max_burst_particles(&self) -> usize {
        if !self.bursts {
            0
        } else if self.reduced_motion {
            self.quality.max_burst_particles() / 2
        } else {
            self.quality.max_burst_particles()
        }
    }

    /// Multiplier applied to burst counts (respects reduced_motion)
    pub fn burst_scale(&self) -> f32 {
        if self.reduced_motion { 0.5 } else { 1.0 }
    }

    /// Multiplier applied to orbit spin (respects reduced_motion)
    pub fn spin_scale(&self) -> f32 {
        if self.reduced_motion { 0.35 } else { 1.0 }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "inertia_debt_sphere_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let storage = window
            .as_ref()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let mut settings = Self::default();
        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(loaded) => {
                        log::info!("Loaded settings from LocalStorage");
                        settings = loaded;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        // The OS-level preference wins over a stored "off"
        let prefers_reduced = window
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map(|mq| mq.matches())
            .unwrap_or(false);
        if prefers_reduced && !settings.reduced_motion {
            log::info!("prefers-reduced-motion set, enabling reduced motion");
            settings.reduced_motion = true;
        }

        settings
    }

    /// Native builds have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
