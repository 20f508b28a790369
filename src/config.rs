use crate::foundation::core::Fps;
use crate::foundation::error::{SceneError, SceneResult};
use crate::scene::model::{DEFAULT_SEED, SceneOpts};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Largest accepted device pixel ratio.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 4.0;

/// JSON-facing configuration for an offline render.
///
/// Every field is optional; missing fields take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Seed for the randomized layout.
    pub seed: u64,
    /// Raster pixels per logical pixel, in `(0, 4]`.
    pub device_pixel_ratio: f64,
    /// Timeline frame rate.
    pub fps: Fps,
    /// Length of a full render in seconds.
    pub duration_secs: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            device_pixel_ratio: 1.0,
            fps: Fps { num: 60, den: 1 },
            duration_secs: 10.0,
        }
    }
}

impl SceneConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        serde_json::from_reader(r).map_err(|e| SceneError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(s: &str) -> SceneResult<Self> {
        serde_json::from_str(s).map_err(|e| SceneError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SceneError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges.
    pub fn validate(&self) -> SceneResult<()> {
        let dpr = self.device_pixel_ratio;
        if !dpr.is_finite() || dpr <= 0.0 || dpr > MAX_DEVICE_PIXEL_RATIO {
            return Err(SceneError::validation(format!(
                "device_pixel_ratio must be in (0, {MAX_DEVICE_PIXEL_RATIO}], got {dpr}"
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(SceneError::validation(format!(
                "duration_secs must be > 0, got {}",
                self.duration_secs
            )));
        }
        Ok(())
    }

    /// Whole frames in `duration_secs`, at least one.
    pub fn duration_frames(&self) -> u64 {
        self.fps.secs_to_frames_floor(self.duration_secs).max(1)
    }

    /// Scene construction options carried by this config.
    pub fn scene_opts(&self) -> SceneOpts {
        SceneOpts {
            seed: self.seed,
            device_pixel_ratio: self.device_pixel_ratio,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
