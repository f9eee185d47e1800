use nom::combinator::map;
use nom::error::ErrorKind;
use nom::number::complete::le_u32;
use nom::{Err, IResult};

pub(crate) fn le_usize(i: &[u8]) -> IResult<&[u8], usize> {
    map(le_u32, |n| n as usize)(i)
}

/// Runs `f` at an absolute `offset` into `i0`.
///
/// An offset past the end of the buffer is reported as `Eof` on `i0`.
pub(crate) fn read_at<'a, O, F>(i0: &'a [u8], offset: usize, f: F) -> IResult<&'a [u8], O>
where
    F: Fn(&'a [u8]) -> IResult<&'a [u8], O>,
{
    match i0.get(offset..) {
        Some(i) => f(i),
        None => Err(Err::Error((i0, ErrorKind::Eof))),
    }
}

/// Fixed width string fields are NUL padded.
pub(crate) fn until_nul(i: &[u8]) -> &[u8] {
    let end = i.iter().position(|&b| b == 0).unwrap_or(i.len());
    &i[..end]
}
