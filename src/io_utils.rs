use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};

use crate::{Section, SnappyError, SnappyResult, HEADER_LEN};

/// Reads from `r` into `buf` until `buf` is full or EOF is reached,
/// returning how many bytes were read.
pub(crate) fn read_until_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut pos: usize = 0;
    while pos < buf.len() {
        match r.read(&mut buf[pos..]) {
            Ok(0) => break,
            Ok(n) => pos += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(pos)
}

/// Reads a big endian length header.
///
/// If `r` was already at EOF, this is not considered an error and `None` is returned.
/// If EOF came part way through the header, the stream was truncated.
pub(crate) fn read_header<R: Read>(r: &mut R, section: Section) -> SnappyResult<Option<u32>> {
    let mut buf = [0u8; HEADER_LEN];
    let filled =
        read_until_full(r, &mut buf).map_err(|source| SnappyError::Io { section, source })?;
    parse_header(&buf, filled, section)
}

/// Interprets the first `filled` bytes of a header buffer, see [`read_header`].
pub(crate) fn parse_header(
    buf: &[u8; HEADER_LEN],
    filled: usize,
    section: Section,
) -> SnappyResult<Option<u32>> {
    match filled {
        0 => Ok(None),
        HEADER_LEN => Ok(Some(BigEndian::read_u32(buf))),
        _ => Err(SnappyError::UnexpectedEof(section)),
    }
}

/// Appends up to `len` bytes from `r` to `buf`.
/// `buf` only grows as data arrives, so a bogus length can't make us allocate it all up front.
pub(crate) fn read_block_body<R: Read>(r: &mut R, len: usize, buf: &mut Vec<u8>) -> SnappyResult<()> {
    r.by_ref()
        .take(len as u64)
        .read_to_end(buf)
        .map_err(|source| SnappyError::Io {
            section: Section::BlockBody,
            source,
        })?;
    Ok(())
}
