use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CameraError, Result};
use crate::pose::CameraPose;

pub const MOVE_TO_POSE_SERVICE: &str = "/gui/move_to/pose";
pub const GUI_CAMERA_REQ_TYPE: &str = "gz.msgs.GUICamera";
pub const BOOLEAN_REP_TYPE: &str = "gz.msgs.Boolean";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
pub const DEFAULT_GZ_BIN: &str = "gz";

/// Extra time the child gets on top of its own `--timeout` before it is killed.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// One `gz service` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    pub service: String,
    pub req_type: String,
    pub rep_type: String,
    pub timeout: Duration,
    pub payload: String,
}

impl ServiceRequest {
    pub fn move_camera(service: &str, pose: &CameraPose, timeout: Duration) -> Self {
        ServiceRequest {
            service: service.to_owned(),
            req_type: GUI_CAMERA_REQ_TYPE.to_owned(),
            rep_type: BOOLEAN_REP_TYPE.to_owned(),
            timeout,
            payload: pose.to_request_payload(),
        }
    }

    /// Argument vector passed to the `gz` executable.
    pub fn args(&self) -> Vec<String> {
        vec![
            "service".to_owned(),
            "-s".to_owned(),
            self.service.clone(),
            "--reqtype".to_owned(),
            self.req_type.clone(),
            "--reptype".to_owned(),
            self.rep_type.clone(),
            "--timeout".to_owned(),
            self.timeout.as_millis().to_string(),
            "--req".to_owned(),
            self.payload.clone(),
        ]
    }
}

/// Captured result of a finished service call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOutput {
    /// `None` when the tool was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CallOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero exit into [`CameraError::CallFailed`].
    pub fn into_result(self) -> Result<CallOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(CameraError::CallFailed {
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

#[async_trait]
pub trait ServiceTransport: Send + Sync {
    async fn call(&self, request: &ServiceRequest) -> Result<CallOutput>;
}

/// Runs requests through the `gz` command line tool.
#[derive(Debug, Clone)]
pub struct GzCli {
    program: String,
}

impl GzCli {
    pub fn new(program: impl Into<String>) -> Self {
        GzCli {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for GzCli {
    fn default() -> Self {
        GzCli::new(DEFAULT_GZ_BIN)
    }
}

#[async_trait]
impl ServiceTransport for GzCli {
    async fn call(&self, request: &ServiceRequest) -> Result<CallOutput> {
        debug!(program = %self.program, args = ?request.args(), "spawning service call");

        let child = Command::new(&self.program)
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CameraError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let limit = request.timeout + KILL_GRACE;
        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(output) => output.map_err(|source| CameraError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => {
                debug!(program = %self.program, limit_ms = limit.as_millis() as u64, "service call overran");
                return Err(CameraError::TimedOut {
                    program: self.program.clone(),
                    limit,
                });
            }
        };

        Ok(CallOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
