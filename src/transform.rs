//! Conversion from motion file space into the runtime's camera space.

use cgmath::{Angle, Deg, Rad, Vector3};
use serde::{Deserialize, Serialize};

use crate::CameraKeyframe;

/// Pushes the camera back along its view direction by a distance derived
/// from the keyframe's view angle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ViewAngleDisplacement {
    pub base: f64,
    pub divisor: f64,
}

impl Default for ViewAngleDisplacement {
    fn default() -> Self {
        Self {
            base: 26.,
            divisor: 1.2,
        }
    }
}

impl ViewAngleDisplacement {
    pub fn distance(&self, view_angle: u32) -> f64 {
        (f64::from(view_angle) - self.base) / self.divisor
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Transform {
    /// Motion units per block.
    pub scale: f64,
    /// Disabled unless configured.
    pub displacement: Option<ViewAngleDisplacement>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1. / 6.,
            displacement: None,
        }
    }
}

/// Camera placement in runtime space. Roll is not supported by the runtime
/// and is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vector3<f64>,
    pub pitch: Deg<f64>,
    pub yaw: Deg<f64>,
}

impl Transform {
    pub fn apply(&self, keyframe: &CameraKeyframe) -> CameraPose {
        let location = keyframe.location;
        let mut position = Vector3::new(
            f64::from(location.x),
            f64::from(location.y),
            f64::from(location.z),
        ) * self.scale;
        position.x = -position.x;

        let pitch = Deg::from(Rad(f64::from(keyframe.rotation.x)));
        let yaw = -Deg::from(Rad(f64::from(keyframe.rotation.y)));

        let distance = self
            .displacement
            .map_or(0., |d| d.distance(keyframe.view_angle));
        let (pitch_r, yaw_r) = (Rad::from(pitch), Rad::from(yaw));
        let back = Vector3::new(
            yaw_r.sin() * pitch_r.cos(),
            pitch_r.sin(),
            yaw_r.cos() * pitch_r.cos(),
        );
        position += back * -distance;

        CameraPose {
            position,
            pitch,
            yaw,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    fn key(location: [f32; 3], rotation: [f32; 3], view_angle: u32) -> CameraKeyframe {
        CameraKeyframe {
            location: location.into(),
            rotation: rotation.into(),
            view_angle,
            ..Default::default()
        }
    }

    #[test]
    fn scale_and_flip() {
        let pose = Transform::default().apply(&key([6., 12., -18.], [0.; 3], 30));
        assert!(close(pose.position.x, -1.));
        assert!(close(pose.position.y, 2.));
        assert!(close(pose.position.z, -3.));
    }

    #[test]
    fn degrees_and_yaw_flip() {
        let pose = Transform::default().apply(&key([0.; 3], [FRAC_PI_4, FRAC_PI_2, 1.], 30));
        assert!(close(pose.pitch.0, 45.));
        assert!(close(pose.yaw.0, -90.));
    }

    #[test]
    fn view_angle_is_ignored_by_default() {
        let a = Transform::default().apply(&key([1., 2., 3.], [0.3, 0.2, 0.], 10));
        let b = Transform::default().apply(&key([1., 2., 3.], [0.3, 0.2, 0.], 90));
        assert_eq!(a, b);
    }

    #[test]
    fn displacement_along_view() {
        let transform = Transform {
            scale: 1.,
            displacement: Some(ViewAngleDisplacement::default()),
        };
        assert!(close(ViewAngleDisplacement::default().distance(38), 10.));

        let pose = transform.apply(&key([0.; 3], [0.; 3], 38));
        assert!(close(pose.position.x, 0.));
        assert!(close(pose.position.y, 0.));
        assert!(close(pose.position.z, -10.));

        let pose = transform.apply(&key([0.; 3], [FRAC_PI_2, 0., 0.], 38));
        assert!(close(pose.position.y, -10.));
        assert!(close(pose.position.z, 0.));

        // yaw is flipped before the offset is applied
        let pose = transform.apply(&key([0.; 3], [0., FRAC_PI_2, 0.], 38));
        assert!(close(pose.position.x, 10.));
        assert!(close(pose.position.z, 0.));
    }
}
