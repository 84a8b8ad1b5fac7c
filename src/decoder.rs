//! The I/O-free half of the reader.
//!
//! [`FrameDecoder`] keeps track of where we are in the current frame, checks every declared
//! length against what the blocks actually contain, and owns the buffers blocks are read into
//! and decompressed into. It never touches a byte source itself: [`Reader`](crate::Reader)
//! (and the async reader behind the `tokio` feature) read headers and block bodies and hand
//! them over.
use log::*;

use crate::{codec::BlockCodec, read::ReaderOptions, Section, SnappyError, SnappyResult};

pub struct FrameDecoder<C> {
    codec: C,
    options: ReaderOptions,
    // Raw bytes of the block being read. Reused between blocks.
    compressed: Vec<u8>,
    // Length the current block header declared for `compressed`.
    block_len: usize,
    // The most recently decompressed block. Reused between blocks.
    decompressed: Vec<u8>,
    // How much of `decompressed` has been handed out already.
    pos: usize,
    // Uncompressed bytes the current frame still owes us.
    frame_remaining: usize,
    // Set once any error is returned; the stream can't be trusted after that.
    poisoned: bool,
}

impl<C: BlockCodec> FrameDecoder<C> {
    pub fn new(codec: C, options: ReaderOptions) -> Self {
        Self {
            codec,
            options,
            compressed: Vec::new(),
            block_len: 0,
            decompressed: Vec::new(),
            pos: 0,
            frame_remaining: 0,
            poisoned: false,
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// True if the current frame is finished (or none has started),
    /// so the next header in the stream is a frame header.
    pub fn needs_frame(&self) -> bool {
        self.frame_remaining == 0
    }

    /// Uncompressed bytes left in the current frame that haven't been decompressed yet.
    pub fn frame_remaining(&self) -> usize {
        self.frame_remaining
    }

    pub fn start_frame(&mut self, uncompressed_len: u32) {
        debug!("frame: {uncompressed_len} uncompressed bytes");
        self.frame_remaining = uncompressed_len as usize;
    }

    /// Validates a block header and returns the (emptied) buffer its body should be read into.
    /// Once exactly `compressed_len` bytes have been appended, call [`Self::finish_block`].
    pub fn begin_block(&mut self, compressed_len: u32) -> SnappyResult<&mut Vec<u8>> {
        let len = compressed_len as usize;
        if len == 0 && self.frame_remaining != 0 {
            return Err(SnappyError::EmptyBlock);
        }
        self.check_limit(len)?;
        self.block_len = len;
        self.compressed.clear();
        Ok(&mut self.compressed)
    }

    /// Decompresses the block read since [`Self::begin_block`], making it available through
    /// [`Self::buffered`].
    pub fn finish_block(&mut self) -> SnappyResult<()> {
        if self.compressed.len() < self.block_len {
            return Err(SnappyError::UnexpectedEof(Section::BlockBody));
        }
        self.pos = 0;
        self.decompressed.clear();

        // A zero length block is only allowed once the frame is complete, and holds nothing.
        if self.block_len == 0 {
            trace!("block: empty");
            return Ok(());
        }

        let decoded_len = self
            .codec
            .decoded_len(&self.compressed)
            .map_err(|e| SnappyError::MalformedPreamble(Box::new(e)))?;
        if decoded_len > self.frame_remaining {
            return Err(SnappyError::DecompressedTooLarge {
                decoded: decoded_len,
                remaining: self.frame_remaining,
            });
        }
        self.check_limit(decoded_len)?;
        self.frame_remaining -= decoded_len;

        self.decompressed.resize(decoded_len, 0);
        let wrote = self
            .codec
            .decode(&self.compressed, &mut self.decompressed)
            .map_err(|e| SnappyError::Corrupt(Box::new(e)))?;
        self.decompressed.truncate(wrote);
        trace!(
            "block: {} bytes of {} -> {wrote} bytes, {} left in frame",
            self.block_len,
            self.codec.name(),
            self.frame_remaining
        );
        Ok(())
    }

    fn check_limit(&self, len: usize) -> SnappyResult<()> {
        match self.options.block_length_limit {
            Some(limit) if len > limit => Err(SnappyError::BlockTooLarge { len, limit }),
            _ => Ok(()),
        }
    }

    /// The decompressed bytes that haven't been consumed yet.
    pub fn buffered(&self) -> &[u8] {
        &self.decompressed[self.pos..]
    }

    pub fn has_buffered(&self) -> bool {
        self.pos < self.decompressed.len()
    }

    pub fn consume(&mut self, amt: usize) {
        self.pos = std::cmp::min(self.pos + amt, self.decompressed.len());
    }

    /// Copies as much of the buffered block as fits into `out`.
    pub fn copy_to(&mut self, out: &mut [u8]) -> usize {
        let available = self.buffered();
        let n = std::cmp::min(available.len(), out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        n
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Marks the decoder unusable and passes the error that caused it back.
    /// This is the one place a failed read gets logged.
    pub fn poison(&mut self, err: SnappyError) -> SnappyError {
        match &err {
            SnappyError::Io { .. } => debug!("reader failed: {err}"),
            _ => warn!("Malformed hadoop-snappy stream: {err}"),
        }
        self.poisoned = true;
        err
    }
}
