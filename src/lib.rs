//! Camera track reader and command compiler for Vocaloid motion (VMD) files.
//!
//! The camera section of a motion file is decoded into [`CameraKeyframe`]s,
//! resampled onto a 20 tick/s timeline, converted into the target world's
//! coordinate space and rendered as a tick-gated command script.

pub mod compile;
pub mod config;
mod error;
pub mod read;
pub mod resample;
pub mod transform;
pub mod write;

pub use compile::{compile, compile_bytes, convert, output_path, Script};
pub use config::Config;
pub use error::{Error, Result};
pub use read::{decode_camera, read_camera, read_sections};
pub use write::write_camera_motion;

use cgmath::Vector3;

pub const SIGNATURE: &[u8; 25] = b"Vocaloid Motion Data 0002";

pub const HEADER_SIZE: usize = 50;
pub const BONE_RECORD_SIZE: usize = 111;
pub const MORPH_RECORD_SIZE: usize = 23;
pub const CAMERA_RECORD_SIZE: usize = 61;
pub const LIGHT_RECORD_SIZE: usize = 28;
pub const SHADOW_RECORD_SIZE: usize = 9;
pub const IK_RECORD_SIZE: usize = 9;
pub const IK_KEY_SIZE: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Bone,
    Morph,
    Camera,
    Light,
    Shadow,
    Ik,
}

impl SectionKind {
    /// Size of one record. IK records grow with their embedded key count,
    /// this is the size of an IK record holding no keys.
    pub fn record_size(self) -> usize {
        match self {
            Self::Header => HEADER_SIZE,
            Self::Bone => BONE_RECORD_SIZE,
            Self::Morph => MORPH_RECORD_SIZE,
            Self::Camera => CAMERA_RECORD_SIZE,
            Self::Light => LIGHT_RECORD_SIZE,
            Self::Shadow => SHADOW_RECORD_SIZE,
            Self::Ik => IK_RECORD_SIZE,
        }
    }
}

/// Location of a run of records inside a motion file.
///
/// `begin` points at the first record, past the 4 byte count field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMeta {
    pub kind: SectionKind,
    pub count: usize,
    pub begin: usize,
    pub record_size: usize,
}

impl SectionMeta {
    pub fn total_bytes(&self) -> usize {
        self.count.saturating_mul(self.record_size)
    }

    pub fn end(&self) -> usize {
        self.begin.saturating_add(self.total_bytes())
    }
}

/// Every section of a motion file, resolved in one forward pass.
///
/// Sections after the camera track are optional, older exporters stop
/// writing after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    pub model_name: Vec<u8>,
    pub header: SectionMeta,
    pub bone: SectionMeta,
    pub morph: SectionMeta,
    pub camera: SectionMeta,
    pub light: Option<SectionMeta>,
    pub shadow: Option<SectionMeta>,
    pub ik: Option<SectionMeta>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BezierCurve {
    pub x1: u8,
    pub x2: u8,
    pub y1: u8,
    pub y2: u8,
}

/// Interpolation curves of a camera keyframe: x, y, z for the location,
/// then rotation, length (distance) and view angle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraBezier {
    pub x: BezierCurve,
    pub y: BezierCurve,
    pub z: BezierCurve,
    pub r: BezierCurve,
    pub l: BezierCurve,
    pub v: BezierCurve,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraKeyframe {
    pub frame: u32,
    /// Distance from the look-at point, already negated from the stored value.
    pub length: f32,
    pub location: Vector3<f32>,
    /// Radians, `x` already negated from the stored value.
    pub rotation: Vector3<f32>,
    pub bezier: CameraBezier,
    pub view_angle: u32,
    pub perspective: bool,
}

impl Default for CameraKeyframe {
    fn default() -> Self {
        Self {
            frame: 0,
            length: 0.,
            location: Vector3::new(0., 0., 0.),
            rotation: Vector3::new(0., 0., 0.),
            bezier: CameraBezier::default(),
            view_angle: 30,
            perspective: true,
        }
    }
}
