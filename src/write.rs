use cookie_factory::bytes::{le_f32, le_u32, le_u8};
use cookie_factory::combinator::slice;
use cookie_factory::multi::all;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen_simple, GenError, SerializeFn};

use cgmath::Vector3;

use super::*;

use std::io;

fn vec3<W: io::Write>(v: Vector3<f32>) -> impl SerializeFn<W> {
    tuple((le_f32(v.x), le_f32(v.y), le_f32(v.z)))
}

impl BezierCurve {
    fn write<W: io::Write>(&self) -> impl SerializeFn<W> {
        tuple((le_u8(self.x1), le_u8(self.x2), le_u8(self.y1), le_u8(self.y2)))
    }
}

impl CameraBezier {
    fn write<W: io::Write>(&self) -> impl SerializeFn<W> {
        tuple((
            self.x.write(),
            self.y.write(),
            self.z.write(),
            self.r.write(),
            self.l.write(),
            self.v.write(),
        ))
    }
}

impl CameraKeyframe {
    /// Serializes one 61 byte camera record, undoing the sign flips applied
    /// when reading.
    pub fn write<W: io::Write>(&self) -> impl SerializeFn<W> {
        let rotation = Vector3::new(-self.rotation.x, self.rotation.y, self.rotation.z);
        let flag = if self.perspective { 0 } else { 1 };
        tuple((
            le_u32(self.frame),
            le_f32(-self.length),
            vec3(self.location),
            vec3(rotation),
            self.bezier.write(),
            le_u32(self.view_angle),
            le_u8(flag),
        ))
    }
}

fn header<W: io::Write>(model_name: &[u8]) -> impl SerializeFn<W> {
    let mut name = [0u8; 20];
    let len = model_name.len().min(name.len());
    name[..len].copy_from_slice(&model_name[..len]);
    tuple((slice(&SIGNATURE[..]), slice([0u8; 5]), slice(name)))
}

/// Writes a motion file holding only a camera track.
///
/// Bone and morph sections are written empty, light and shadow sections are
/// written empty so readers that expect them find a zero count.
pub fn write_camera_motion<W: io::Write>(
    keyframes: &[CameraKeyframe],
    model_name: &[u8],
    writer: W,
) -> io::Result<W> {
    let records = keyframes.iter().map(|k| k.write::<W>());
    let file = tuple((
        header(model_name),
        le_u32(0),
        le_u32(0),
        le_u32(keyframes.len() as u32),
        all(records),
        le_u32(0),
        le_u32(0),
    ));
    gen_simple(file, writer).map_err(|e| match e {
        GenError::IoError(e) => e,
        e => io::Error::new(io::ErrorKind::Other, format!("{:?}", e)),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn record_layout() {
        let key = CameraKeyframe {
            frame: 7,
            length: 45.,
            location: Vector3::new(1., 2., 3.),
            rotation: Vector3::new(0.5, 0.25, 0.),
            perspective: false,
            ..Default::default()
        };
        let out = gen_simple(key.write(), Vec::new()).unwrap();
        assert_eq!(out.len(), CAMERA_RECORD_SIZE);
        assert_eq!(&out[0..4], &7u32.to_le_bytes());
        assert_eq!(&out[4..8], &(-45f32).to_le_bytes());
        assert_eq!(&out[20..24], &(-0.5f32).to_le_bytes());
        assert_eq!(&out[56..60], &30u32.to_le_bytes());
        assert_eq!(out[60], 1);
    }

    #[test]
    fn camera_only_file() {
        let keys = vec![CameraKeyframe::default(); 3];
        let out = write_camera_motion(&keys, "カメラ".as_bytes(), Vec::new()).unwrap();
        assert_eq!(&out[..25], &SIGNATURE[..]);
        assert_eq!(out.len(), HEADER_SIZE + 4 + 4 + 4 + 3 * CAMERA_RECORD_SIZE + 4 + 4);
        assert_eq!(&out[58..62], &3u32.to_le_bytes());
    }

    #[test]
    fn long_model_name_is_cut() {
        let out = write_camera_motion(&[], &[b'a'; 40], Vec::new()).unwrap();
        assert_eq!(&out[30..50], &[b'a'; 20]);
        assert_eq!(&out[50..54], &0u32.to_le_bytes());
    }
}
