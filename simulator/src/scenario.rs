use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters for a synthetic telemetry scenario, loadable from YAML.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Frames emitted per second, also the recording cadence.
    pub fps: u32,
    /// Frame count for recordings; the live server runs until stopped.
    pub frames: u64,
    pub seed: u64,
    /// Objects wandering through the camera frame.
    pub object_count: usize,
    /// Confidence jitter amplitude.
    pub noise: f64,
    pub description: Option<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            frames: 100,
            seed: 0,
            object_count: 4,
            noise: 0.05,
            description: None,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(fps: u32, frames: u64, seed: u64) -> Self {
        Self {
            fps,
            frames,
            seed,
            ..Self::default()
        }
    }

    pub fn frame_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_defaults_elsewhere() {
        let cfg = ScenarioConfig::from_args(20, 50, 7);
        assert_eq!(cfg.fps, 20);
        assert_eq!(cfg.object_count, 4);
        assert_eq!(cfg.frame_period(), std::time::Duration::from_millis(50));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"fps: 5\nframes: 12\nobject_count: 2\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = ScenarioConfig::load(&path).unwrap();
        assert_eq!(cfg.fps, 5);
        assert_eq!(cfg.frames, 12);
        assert_eq!(cfg.object_count, 2);
    }
}
