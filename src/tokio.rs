//! Read hadoop-snappy streams asynchronously
pub mod read;
mod read_header;

pub use read::AsyncReader;
