//! Moves the simulator's GUI camera once the GUI has had time to start.
//!
//! The wait is a fixed delay, not a readiness probe: if the simulator is
//! slower than that, the single request fails and nothing is retried.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::CameraSettings;
use crate::error::Result;
use crate::gz_service::{CallOutput, ServiceRequest, ServiceTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Requesting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

pub struct CameraPositioner<T> {
    transport: T,
    request: ServiceRequest,
    startup_delay: Duration,
    phase: Phase,
}

impl<T: ServiceTransport> CameraPositioner<T> {
    pub fn new(transport: T, settings: &CameraSettings) -> Self {
        CameraPositioner {
            transport,
            request: ServiceRequest::move_camera(
                &settings.service,
                &settings.pose,
                settings.timeout,
            ),
            startup_delay: settings.startup_delay,
            phase: Phase::Waiting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn request(&self) -> &ServiceRequest {
        &self.request
    }

    /// Sleeps for the startup delay, then sends the request exactly once.
    pub async fn run(&mut self) -> Result<CallOutput> {
        println!("Waiting for Gazebo to start...");
        info!(delay_ms = self.startup_delay.as_millis() as u64, "waiting for simulator GUI");
        tokio::time::sleep(self.startup_delay).await;

        println!("Setting camera position...");
        self.phase = Phase::Requesting;
        info!(
            service = %self.request.service,
            timeout_ms = self.request.timeout.as_millis() as u64,
            "requesting camera move"
        );

        let result = self
            .transport
            .call(&self.request)
            .await
            .and_then(CallOutput::into_result);

        match &result {
            Ok(output) => {
                self.phase = Phase::Succeeded;
                info!(exit_code = ?output.code, "camera moved");
            }
            Err(e) => {
                self.phase = Phase::Failed;
                debug!(error = %e, "camera move failed");
            }
        }
        result
    }
}
