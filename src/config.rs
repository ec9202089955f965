use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CameraError, Result};
use crate::gz_service::{DEFAULT_GZ_BIN, DEFAULT_TIMEOUT, MOVE_TO_POSE_SERVICE};
use crate::pose::{CameraPose, PoseData};

/// Time the simulator GUI gets to come up before the camera request.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(4);

/// Effective settings of the camera positioning script.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub startup_delay: Duration,
    pub timeout: Duration,
    pub gz_bin: String,
    pub service: String,
    pub pose: CameraPose,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            startup_delay: DEFAULT_STARTUP_DELAY,
            timeout: DEFAULT_TIMEOUT,
            gz_bin: DEFAULT_GZ_BIN.to_owned(),
            service: MOVE_TO_POSE_SERVICE.to_owned(),
            pose: CameraPose::default(),
        }
    }
}

/// On-disk form; every field is optional and falls back to the defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    delay_ms: Option<u64>,
    timeout_ms: Option<u64>,
    gz_bin: Option<String>,
    service: Option<String>,
    pose: Option<PoseData>,
}

impl CameraSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SettingsFile =
            toml_edit::de::from_str(text).map_err(|e| CameraError::Config(e.to_string()))?;
        let mut settings = CameraSettings::default();
        if let Some(ms) = file.delay_ms {
            settings.startup_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.timeout_ms {
            settings.timeout = Duration::from_millis(ms);
        }
        if let Some(bin) = file.gz_bin {
            settings.gz_bin = bin;
        }
        if let Some(service) = file.service {
            settings.service = service;
        }
        if let Some(pose) = file.pose {
            settings.pose = pose.apply_to(settings.pose);
        }
        settings.validate()?;
        Ok(settings)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CameraError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gz_bin.trim().is_empty() {
            return Err(CameraError::Config("gz_bin must not be empty".to_owned()));
        }
        if !self.service.starts_with('/') {
            return Err(CameraError::Config(format!(
                "service `{}` must be an absolute name",
                self.service
            )));
        }
        if self.timeout.is_zero() {
            return Err(CameraError::Config("timeout_ms must be positive".to_owned()));
        }
        let p = &self.pose.position;
        let q = &self.pose.orientation;
        let finite = [p.x, p.y, p.z, q.i, q.j, q.k, q.w]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(CameraError::Config("pose values must be finite".to_owned()));
        }
        Ok(())
    }
}
