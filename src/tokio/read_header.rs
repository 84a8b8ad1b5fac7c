use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{io_utils::parse_header, Section, SnappyError, SnappyResult, HEADER_LEN};

/// read from `r` into `buf` until `buf` is completely full or EOF is reached.
/// Returns how many bytes were read, so callers can tell an untouched EOF
/// (zero bytes) from one that came part way through.
async fn read_until_full<R: AsyncRead + std::marker::Unpin>(
    r: &mut R,
    buf: &mut [u8],
) -> Result<usize, std::io::Error> {
    let mut pos: usize = 0;
    while pos < buf.len() {
        match r.read(&mut buf[pos..]).await {
            Ok(0) => break,
            Ok(readlen) => pos += readlen,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(pos)
}

/// Async counterpart of [`crate::io_utils::read_header`].
pub(crate) async fn read_header<R: AsyncRead + std::marker::Unpin>(
    r: &mut R,
    section: Section,
) -> SnappyResult<Option<u32>> {
    let mut buf = [0u8; HEADER_LEN];
    let filled = read_until_full(r, &mut buf)
        .await
        .map_err(|source| SnappyError::Io { section, source })?;
    parse_header(&buf, filled, section)
}

/// Async counterpart of [`crate::io_utils::read_block_body`].
pub(crate) async fn read_block_body<R: AsyncRead + std::marker::Unpin>(
    r: &mut R,
    len: usize,
    buf: &mut Vec<u8>,
) -> SnappyResult<()> {
    r.take(len as u64)
        .read_to_end(buf)
        .await
        .map_err(|source| SnappyError::Io {
            section: Section::BlockBody,
            source,
        })?;
    Ok(())
}
