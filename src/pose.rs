use std::fmt;

use nalgebra::{Point3, Quaternion};
use serde::Deserialize;

/// Viewpoint the GUI camera is moved to.
///
/// The orientation is kept exactly as given: it is not normalized, so the
/// default `(0, 0.3, 0, 1)` goes over the wire untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub orientation: Quaternion<f64>,
}

impl CameraPose {
    pub fn new(position: Point3<f64>, orientation: Quaternion<f64>) -> Self {
        CameraPose {
            position,
            orientation,
        }
    }

    /// Renders the `gz.msgs.GUICamera` request in protobuf text format.
    pub fn to_request_payload(&self) -> String {
        self.to_string()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        CameraPose {
            position: Point3::new(-0.5, 0.0, 0.5),
            // nalgebra takes w first
            orientation: Quaternion::new(1.0, 0.0, 0.3, 0.0),
        }
    }
}

impl fmt::Display for CameraPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.position;
        let q = &self.orientation;
        write!(
            f,
            "pose: {{position: {{x: {}, y: {}, z: {}}}, orientation: {{x: {}, y: {}, z: {}, w: {}}}}}",
            p.x, p.y, p.z, q.i, q.j, q.k, q.w
        )
    }
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PositionData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OrientationData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub w: Option<f64>,
}

/// Pose overrides as they appear in the config file. Anything left out
/// keeps the value of the pose it is applied to.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PoseData {
    #[serde(default)]
    pub position: PositionData,
    #[serde(default)]
    pub orientation: OrientationData,
}

impl PoseData {
    pub fn apply_to(&self, base: CameraPose) -> CameraPose {
        let p = &self.position;
        let o = &self.orientation;
        let bp = base.position;
        let bq = base.orientation;
        CameraPose::new(
            Point3::new(
                p.x.unwrap_or(bp.x),
                p.y.unwrap_or(bp.y),
                p.z.unwrap_or(bp.z),
            ),
            Quaternion::new(
                o.w.unwrap_or(bq.w),
                o.x.unwrap_or(bq.i),
                o.y.unwrap_or(bq.j),
                o.z.unwrap_or(bq.k),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_PAYLOAD: &str =
        "pose: {position: {x: -0.5, y: 0, z: 0.5}, orientation: {x: 0, y: 0.3, z: 0, w: 1}}";

    #[test]
    fn default_pose_renders_the_fixed_literal() {
        assert_eq!(CameraPose::default().to_request_payload(), DEFAULT_PAYLOAD);
    }

    #[test]
    fn default_orientation_is_not_normalized() {
        let pose = CameraPose::default();
        assert_eq!(pose.orientation.j, 0.3);
        assert_eq!(pose.orientation.w, 1.0);
        assert!((pose.orientation.norm() - 1.0).abs() > 1e-3);
    }

    #[test]
    fn pose_data_overrides_every_component() {
        let data = PoseData {
            position: PositionData {
                x: Some(1.0),
                y: Some(2.0),
                z: Some(3.25),
            },
            orientation: OrientationData {
                x: Some(0.1),
                y: Some(0.2),
                z: Some(0.3),
                w: Some(0.9),
            },
        };
        assert_eq!(
            data.apply_to(CameraPose::default()).to_request_payload(),
            "pose: {position: {x: 1, y: 2, z: 3.25}, orientation: {x: 0.1, y: 0.2, z: 0.3, w: 0.9}}"
        );
    }

    #[test]
    fn missing_components_keep_the_base_pose() {
        let data = PoseData {
            position: PositionData {
                x: Some(2.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            data.apply_to(CameraPose::default()).to_request_payload(),
            "pose: {position: {x: 2, y: 0, z: 0.5}, orientation: {x: 0, y: 0.3, z: 0, w: 1}}"
        );
        assert_eq!(
            PoseData::default().apply_to(CameraPose::default()),
            CameraPose::default()
        );
    }
}
