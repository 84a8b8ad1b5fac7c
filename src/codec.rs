//! The block codec the framing is layered over.
//!
//! Hadoop only ever writes raw snappy blocks, so [`SnapCodec`] is the codec
//! every [`Reader`](crate::Reader) uses unless told otherwise.
//! The trait exists so the framing can be driven without caring how a block unpacks.

/// Reports how long a compressed block will be once unpacked, and unpacks it.
pub trait BlockCodec {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the number of bytes `src` decodes to, read from the block's preamble.
    fn decoded_len(&mut self, src: &[u8]) -> Result<usize, Self::Error>;

    /// Decodes `src` into `dst`, which is at least [`decoded_len`](Self::decoded_len) long.
    /// Returns the number of bytes written.
    fn decode(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Self::Error>;

    fn name(&self) -> &'static str;
}

/// Raw (unframed) snappy, backed by the `snap` crate.
pub struct SnapCodec {
    decoder: snap::raw::Decoder,
}

impl SnapCodec {
    pub fn new() -> Self {
        SnapCodec {
            decoder: snap::raw::Decoder::new(),
        }
    }
}

impl Default for SnapCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnapCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapCodec").finish_non_exhaustive()
    }
}

impl BlockCodec for SnapCodec {
    type Error = snap::Error;

    fn decoded_len(&mut self, src: &[u8]) -> Result<usize, snap::Error> {
        snap::raw::decompress_len(src)
    }

    fn decode(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, snap::Error> {
        self.decoder.decompress(src, dst)
    }

    fn name(&self) -> &'static str {
        "snappy"
    }
}
