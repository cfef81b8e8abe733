use std::time::Duration;

use crate::error::ConfigError;

// ============================================
// Cellular Automaton Field
// ============================================

/// Pixel size of one automaton cell (grid resolution vs. pixel density)
pub const CELL_SIZE: f32 = 8.0;

/// Opacity change per rendered frame
pub const FADE_SPEED: f32 = 0.05;

/// Simulation tick period
pub const UPDATE_INTERVAL_MS: u64 = 200;

/// Chance a cell outside the exclusion zone starts alive
pub const INITIAL_DENSITY: f64 = 0.2;

/// Exclusion zone logical size, centered in the viewport
pub const ZONE_WIDTH: f32 = 580.0;
pub const ZONE_HEIGHT: f32 = 350.0;
pub const ZONE_PADDING: f32 = 40.0;

/// Range of the per-cell fuzzy margin around the exclusion zone
pub const MIN_MARGIN: f32 = 0.0;
pub const MAX_MARGIN: f32 = CELL_SIZE * 20.0;

/// Click brush: density sampling radius, stamp radius and per-cell fill chance
pub const SAMPLE_RADIUS: i64 = 5;
pub const PATCH_RADIUS: i64 = 8;
pub const PATCH_FILL_CHANCE: f64 = 0.6;

/// Local density above which a click clears instead of spawning
pub const DENSITY_TOGGLE: f32 = 0.5;

// ============================================
// Topographic Contour Field
// ============================================

/// Pixel spacing between noise samples
pub const CONTOUR_CELL_SIZE: f32 = 7.0;

/// Number of iso-level bands; LEVELS - 1 interior thresholds are drawn
pub const CONTOUR_LEVELS: u32 = 40;

/// Noise coordinate scale per pixel
pub const NOISE_SCALE: f64 = 0.0006;

/// Z-offset advance per millisecond
pub const Z_SPEED: f64 = 0.000_001_5;

/// Contour redraw throttle (~12 fps)
pub const FRAME_INTERVAL_MS: u64 = 80;

/// Tunables for the automaton layer.
#[derive(Clone, Debug, PartialEq)]
pub struct AutomatonConfig {
    pub cell_size: f32,
    pub fade_speed: f32,
    pub update_interval: Duration,
    pub initial_density: f64,
    pub zone_width: f32,
    pub zone_height: f32,
    pub zone_padding: f32,
    pub min_margin: f32,
    pub max_margin: f32,
    pub sample_radius: i64,
    pub patch_radius: i64,
    pub patch_fill_chance: f64,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            fade_speed: FADE_SPEED,
            update_interval: Duration::from_millis(UPDATE_INTERVAL_MS),
            initial_density: INITIAL_DENSITY,
            zone_width: ZONE_WIDTH,
            zone_height: ZONE_HEIGHT,
            zone_padding: ZONE_PADDING,
            min_margin: MIN_MARGIN,
            max_margin: MAX_MARGIN,
            sample_radius: SAMPLE_RADIUS,
            patch_radius: PATCH_RADIUS,
            patch_fill_chance: PATCH_FILL_CHANCE,
        }
    }
}

impl AutomatonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size as f64)?;
        positive("fade_speed", self.fade_speed as f64)?;
        positive("update_interval", self.update_interval.as_secs_f64())?;
        probability("initial_density", self.initial_density)?;
        probability("patch_fill_chance", self.patch_fill_chance)?;
        non_negative("zone_width", self.zone_width as f64)?;
        non_negative("zone_height", self.zone_height as f64)?;
        non_negative("min_margin", self.min_margin as f64)?;
        non_negative("sample_radius", self.sample_radius as f64)?;
        non_negative("patch_radius", self.patch_radius as f64)?;
        if !self.zone_padding.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "zone_padding",
                value: self.zone_padding as f64,
            });
        }
        if !self.max_margin.is_finite() || self.min_margin > self.max_margin {
            return Err(ConfigError::MarginRange {
                min: self.min_margin as f64,
                max: self.max_margin as f64,
            });
        }
        Ok(())
    }
}

/// Tunables for the contour layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourConfig {
    pub cell_size: f32,
    pub levels: u32,
    pub noise_scale: f64,
    /// Z advance per millisecond of elapsed time
    pub z_speed: f64,
    pub frame_interval: Duration,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            cell_size: CONTOUR_CELL_SIZE,
            levels: CONTOUR_LEVELS,
            noise_scale: NOISE_SCALE,
            z_speed: Z_SPEED,
            frame_interval: Duration::from_millis(FRAME_INTERVAL_MS),
        }
    }
}

impl ContourConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size as f64)?;
        positive("noise_scale", self.noise_scale)?;
        positive("frame_interval", self.frame_interval.as_secs_f64())?;
        non_negative("z_speed", self.z_speed)?;
        if self.levels < 2 {
            return Err(ConfigError::TooFewLevels(self.levels));
        }
        Ok(())
    }
}

/// Which backdrop is presented in the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Automaton,
    Contours,
}

impl Layer {
    pub fn toggled(self) -> Self {
        match self {
            Layer::Automaton => Layer::Contours,
            Layer::Contours => Layer::Automaton,
        }
    }
}

/// Process-level settings assembled at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub seed: u64,
    pub layer: Layer,
    pub automaton: AutomatonConfig,
    pub contours: ContourConfig,
}

impl Settings {
    /// Read `BACKDROP_SEED` and `BACKDROP_LAYER`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("BACKDROP_SEED").ok(),
            std::env::var("BACKDROP_LAYER").ok(),
        )
    }

    fn from_vars(seed: Option<String>, layer: Option<String>) -> Result<Self, ConfigError> {
        let seed = match seed {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Env {
                var: "BACKDROP_SEED",
                value: raw,
            })?,
            None => rand::random(),
        };

        let layer = match layer.as_deref().map(str::trim) {
            None | Some("automaton") => Layer::Automaton,
            Some("contours") => Layer::Contours,
            Some(other) => {
                return Err(ConfigError::Env {
                    var: "BACKDROP_LAYER",
                    value: other.to_string(),
                })
            }
        };

        let settings = Self {
            seed,
            layer,
            automaton: AutomatonConfig::default(),
            contours: ContourConfig::default(),
        };
        settings.automaton.validate()?;
        settings.contours.validate()?;
        Ok(settings)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotProbability { name, value })
    }
}
