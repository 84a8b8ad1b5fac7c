#![allow(dead_code)]

use std::io::{self, Read, Write};

use anyhow::Result;

/// Hadoop writes frames of at most 256KiB of uncompressed data.
pub const HADOOP_FRAME_SIZE: usize = 256 * 1024;

/// "Hello, world!" as one frame holding one 15 byte block.
pub const HELLO_WORLD: &[u8] = &[
    0x00, 0x00, 0x00, 0x0D, 0x00, 0x00, 0x00, 0x0F, 0x0D, 0x30, 0x48, 0x65, 0x6C, 0x6C, 0x6F,
    0x2C, 0x20, 0x77, 0x6F, 0x72, 0x6C, 0x64, 0x21,
];

pub fn compress_block(data: &[u8]) -> Result<Vec<u8>> {
    Ok(snap::raw::Encoder::new().compress_vec(data)?)
}

/// Builds hadoop-snappy streams, remembering where each frame ends.
#[derive(Default)]
pub struct StreamBuilder {
    data: Vec<u8>,
    decoded: Vec<u8>,
    /// (offset in `data`, length of `decoded`) after each frame.
    frame_ends: Vec<(usize, usize)>,
}

pub struct Stream {
    pub data: Vec<u8>,
    pub decoded: Vec<u8>,
    pub frame_ends: Vec<(usize, usize)>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame holding one compressed block per entry of `blocks`.
    pub fn frame(mut self, blocks: &[&[u8]]) -> Result<Self> {
        let total: usize = blocks.iter().map(|b| b.len()).sum();
        self.data.extend_from_slice(&(total as u32).to_be_bytes());
        for block in blocks {
            let compressed = compress_block(block)?;
            self.data
                .extend_from_slice(&(compressed.len() as u32).to_be_bytes());
            self.data.extend_from_slice(&compressed);
            self.decoded.extend_from_slice(block);
        }
        self.frame_ends.push((self.data.len(), self.decoded.len()));
        Ok(self)
    }

    /// Splits `data` into frames of `frame_size` bytes, each cut into blocks of `block_size`,
    /// the way Hadoop's block compressor stream lays things out.
    pub fn chunked(mut self, data: &[u8], frame_size: usize, block_size: usize) -> Result<Self> {
        for frame in data.chunks(frame_size) {
            let blocks: Vec<&[u8]> = frame.chunks(block_size).collect();
            self = self.frame(&blocks)?;
        }
        Ok(self)
    }

    pub fn finish(self) -> Stream {
        Stream {
            data: self.data,
            decoded: self.decoded,
            frame_ends: self.frame_ends,
        }
    }
}

/// A few kilobytes of JSON lines.
pub fn sample_jsonl(lines: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..lines {
        writeln!(
            out,
            r#"{{"id":{i},"name":"record {i}","tags":["hadoop","snappy"],"value":{}}}"#,
            (i * 7919) % 1000
        )
        .unwrap();
    }
    out
}

/// Pseudo-random bytes that snappy can't do much with.
pub fn sample_noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_F491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

#[derive(Debug)]
pub struct TestingError;

impl std::fmt::Display for TestingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("testing error")
    }
}

impl std::error::Error for TestingError {}

/// A source that fails every read.
pub struct ErrorReader;

impl Read for ErrorReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, TestingError))
    }
}

/// An async source that fails every read.
pub struct AsyncErrorReader;

impl tokio::io::AsyncRead for AsyncErrorReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::task::Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, TestingError)))
    }
}

/// Hands out at most `step` bytes per read.
pub struct Dribble<R> {
    pub inner: R,
    pub step: usize,
}

impl<R: Read> Read for Dribble<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.step);
        self.inner.read(&mut buf[..len])
    }
}

pub fn is_testing_error(err: &io::Error) -> bool {
    err.get_ref()
        .map(|inner| inner.is::<TestingError>())
        .unwrap_or(false)
}
