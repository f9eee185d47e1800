use nom::bytes::complete::{tag, take};
use nom::combinator::map;
use nom::number::complete::{le_f32, le_u32, le_u8};
use nom::sequence::tuple;
use nom::IResult;

use cgmath::Vector3;
use log::{debug, trace};

use crate::*;

mod utilities;

use utilities::*;

fn signature(i: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&SIGNATURE[..])(i)
}

/// 30 byte signature field followed by a 20 byte model name.
fn header(i: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let (i, _) = take(30usize)(i)?;
    let (i, name) = take(20usize)(i)?;
    Ok((i, until_nul(name).to_vec()))
}

fn vec3(i: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| {
        Vector3::new(x, y, z)
    })(i)
}

impl SectionMeta {
    /// Reads the count field at `offset` and sizes the records behind it.
    fn parse(i0: &[u8], offset: usize, kind: SectionKind) -> IResult<&[u8], Self> {
        let (i, count) = read_at(i0, offset, le_usize)?;
        let record_size = match kind {
            SectionKind::Ik => {
                // frame: u32, show: u8, then the number of IK keys
                let keys = if count > 0 {
                    read_at(i0, offset + 4 + 5, le_usize)?.1
                } else {
                    0
                };
                IK_RECORD_SIZE + IK_KEY_SIZE * keys
            }
            kind => kind.record_size(),
        };
        let meta = SectionMeta {
            kind,
            count,
            begin: offset + 4,
            record_size,
        };
        Ok((i, meta))
    }
}

impl BezierCurve {
    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        map(tuple((le_u8, le_u8, le_u8, le_u8)), |(x1, x2, y1, y2)| {
            BezierCurve { x1, x2, y1, y2 }
        })(i)
    }
}

impl CameraBezier {
    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        let p = BezierCurve::parse;
        map(tuple((p, p, p, p, p, p)), |(x, y, z, r, l, v)| CameraBezier {
            x,
            y,
            z,
            r,
            l,
            v,
        })(i)
    }
}

impl CameraKeyframe {
    pub fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, (frame, length, location, rotation, bezier, view_angle, flag)) = tuple((
            le_u32,
            le_f32,
            vec3,
            vec3,
            CameraBezier::parse,
            le_u32,
            le_u8,
        ))(i)?;
        let keyframe = CameraKeyframe {
            frame,
            length: -length,
            location,
            rotation: Vector3::new(-rotation.x, rotation.y, rotation.z),
            bezier,
            view_angle,
            perspective: flag == 0,
        };
        Ok((i, keyframe))
    }
}

fn truncated<E>(section: SectionKind) -> impl FnOnce(E) -> Error {
    move |_| Error::Truncated { section }
}

fn optional(i0: &[u8], offset: Option<usize>, kind: SectionKind) -> Option<SectionMeta> {
    let offset = offset?;
    let meta = match SectionMeta::parse(i0, offset, kind) {
        Ok((_, meta)) => meta,
        Err(_) => {
            debug!("no {:?} section at {:#x}", kind, offset);
            return None;
        }
    };
    if meta.end() > i0.len() {
        debug!(
            "{:?} section wants {} record(s) but the file ends at {:#x}",
            kind,
            meta.count,
            i0.len()
        );
        return None;
    }
    trace!("{:?}: {} record(s) at {:#x}", kind, meta.count, meta.begin);
    Some(meta)
}

/// Resolves the position of every section in a motion file.
///
/// Light, shadow and IK sections that don't fit in the buffer are `None`,
/// along with every section after them.
pub fn read_sections(i0: &[u8]) -> Result<Sections> {
    if signature(i0).is_err() {
        return Err(Error::InvalidFormat);
    }
    let (_, model_name) = header(i0).map_err(truncated(SectionKind::Header))?;
    let header = SectionMeta {
        kind: SectionKind::Header,
        count: 1,
        begin: 0,
        record_size: HEADER_SIZE,
    };

    let mut begin = header.end();
    let mut mandatory = |kind| -> Result<SectionMeta> {
        let (_, meta) = SectionMeta::parse(i0, begin, kind).map_err(truncated(kind))?;
        trace!("{:?}: {} record(s) at {:#x}", kind, meta.count, meta.begin);
        begin = meta.end();
        Ok(meta)
    };
    let bone = mandatory(SectionKind::Bone)?;
    let morph = mandatory(SectionKind::Morph)?;
    let camera = mandatory(SectionKind::Camera)?;

    let light = optional(i0, Some(camera.end()), SectionKind::Light);
    let shadow = optional(i0, light.map(|s| s.end()), SectionKind::Shadow);
    let ik = optional(i0, shadow.map(|s| s.end()), SectionKind::Ik);

    Ok(Sections {
        model_name,
        header,
        bone,
        morph,
        camera,
        light,
        shadow,
        ik,
    })
}

/// Decodes the camera records described by `meta`, in file order.
pub fn decode_camera(i0: &[u8], meta: &SectionMeta) -> Result<Vec<CameraKeyframe>> {
    let records = i0
        .get(meta.begin..meta.end())
        .ok_or(Error::Truncated {
            section: SectionKind::Camera,
        })?;
    records
        .chunks_exact(meta.record_size)
        .map(|record| {
            CameraKeyframe::parse(record)
                .map(|(_, keyframe)| keyframe)
                .map_err(truncated(SectionKind::Camera))
        })
        .collect()
}

/// Reads every camera keyframe of a motion file.
pub fn read_camera(i0: &[u8]) -> Result<Vec<CameraKeyframe>> {
    let sections = read_sections(i0)?;
    let keyframes = decode_camera(i0, &sections.camera)?;
    debug!("decoded {} camera keyframe(s)", keyframes.len());
    Ok(keyframes)
}
