use log::*;
use tokio::io::AsyncRead;

use super::read_header::{read_block_body, read_header};
use crate::{
    codec::{BlockCodec, SnapCodec},
    decoder::FrameDecoder,
    ReaderOptions, Section, SnappyError, SnappyResult,
};

/// Decompresses a hadoop-snappy stream read from an [`AsyncRead`].
///
/// Behaves exactly like [`crate::Reader`]: the same frames are accepted and the same errors
/// are returned, it just awaits its source instead of blocking on it.
///
/// ```no_run
/// use tokio::fs::File;
///
/// async fn count() -> Result<usize, Box<dyn std::error::Error>> {
///     let file = File::open("part-00000.snappy").await?;
///     let mut reader = hadoop_snappy::tokio::AsyncReader::new(file);
///     let mut out = Vec::new();
///     Ok(reader.read_to_end_decompressed(&mut out).await?)
/// }
/// ```
pub struct AsyncReader<R, C = SnapCodec> {
    reader: R,
    decoder: FrameDecoder<C>,
}

impl<R> AsyncReader<R>
where
    R: AsyncRead + std::marker::Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::new_with_options(reader, ReaderOptions::default())
    }

    pub fn new_with_options(reader: R, options: ReaderOptions) -> Self {
        Self::with_codec(reader, SnapCodec::new(), options)
    }
}

impl<R, C> AsyncReader<R, C>
where
    R: AsyncRead + std::marker::Unpin,
    C: BlockCodec,
{
    pub fn with_codec(reader: R, codec: C, options: ReaderOptions) -> Self {
        Self {
            reader,
            decoder: FrameDecoder::new(codec, options),
        }
    }

    /// Decompresses into `out`, returning how many bytes were written.
    /// `Ok(0)` means the stream ended cleanly (unless `out` was empty).
    pub async fn read_decompressed(&mut self, out: &mut [u8]) -> SnappyResult<usize> {
        if self.decoder.is_poisoned() {
            return Err(SnappyError::Poisoned);
        }
        if out.is_empty() {
            return Ok(0);
        }
        if !self.fill().await? {
            return Ok(0);
        }
        Ok(self.decoder.copy_to(out))
    }

    /// Decompresses everything left in the stream onto the end of `out`.
    pub async fn read_to_end_decompressed(&mut self, out: &mut Vec<u8>) -> SnappyResult<usize> {
        let start = out.len();
        while self.fill().await? {
            let block = self.decoder.buffered();
            out.extend_from_slice(block);
            let n = block.len();
            self.decoder.consume(n);
        }
        Ok(out.len() - start)
    }

    async fn fill(&mut self) -> SnappyResult<bool> {
        if self.decoder.is_poisoned() {
            return Err(SnappyError::Poisoned);
        }
        while !self.decoder.has_buffered() {
            match self.next_block().await {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(err) => return Err(self.decoder.poison(err)),
            }
        }
        Ok(true)
    }

    async fn next_block(&mut self) -> SnappyResult<bool> {
        if self.decoder.needs_frame() {
            match read_header(&mut self.reader, Section::FrameHeader).await? {
                None => {
                    trace!("end of stream");
                    return Ok(false);
                }
                Some(len) => self.decoder.start_frame(len),
            }
        }

        let len = read_header(&mut self.reader, Section::BlockHeader)
            .await?
            .ok_or(SnappyError::UnexpectedEof(Section::BlockHeader))?;
        let buf = self.decoder.begin_block(len)?;
        read_block_body(&mut self.reader, len as usize, buf).await?;
        self.decoder.finish_block()?;
        Ok(true)
    }

    /// Uncompressed bytes left in the current frame that haven't been decompressed yet.
    pub fn frame_remaining(&self) -> usize {
        self.decoder.frame_remaining()
    }

    /// True once a read has failed.
    pub fn is_poisoned(&self) -> bool {
        self.decoder.is_poisoned()
    }

    pub fn options(&self) -> &ReaderOptions {
        self.decoder.options()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Reading from the underlying reader directly will corrupt the decompressed stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes the reader and returns the underlying reader.
    /// Anything decompressed but not yet read is lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
