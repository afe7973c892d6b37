//! Chunked file streaming for partial content responses
//!
//! The payload is never buffered whole: a range is read lazily in
//! fixed-size chunks as the HTTP body is polled. The file handle is owned
//! by the stream and released when the stream finishes, fails or is dropped
//! by a disconnecting client.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::{Bytes, BytesMut};
use futures::Stream;
use futures::stream;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tracing::debug;

use crate::range::ByteRange;

/// Errors that occur while opening or streaming an audio file.
#[derive(Debug, thiserror::Error)]
pub enum StreamingError {
    /// File could not be opened
    #[error("Audio file not found")]
    NotFound {
        /// Client-facing file name
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// File opened but its metadata could not be read
    #[error("Could not retrieve file info")]
    Stat(#[source] std::io::Error),

    /// Seek or read failure while serving content
    #[error("Error reading file")]
    Io(#[from] std::io::Error),
}

/// An opened audio file with its size captured at open time.
#[derive(Debug)]
pub struct AudioFile {
    file: File,
    path: PathBuf,
    size: u64,
    modified: Option<SystemTime>,
}

impl AudioFile {
    /// Open `path` and stat it.
    ///
    /// # Errors
    ///
    /// - `StreamingError::NotFound` - File cannot be opened
    /// - `StreamingError::Stat` - File metadata cannot be read
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StreamingError> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|source| StreamingError::NotFound {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                source,
            })?;
        let stat = file.metadata().await.map_err(StreamingError::Stat)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            size: stat.len(),
            modified: stat.modified().ok(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes at the time the file was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Seek to the start of `range` and turn the file into a chunk stream
    /// yielding at most `range.len()` bytes.
    ///
    /// # Errors
    ///
    /// - `StreamingError::Io` - Seek failed
    pub async fn into_range_stream(
        mut self,
        range: ByteRange,
        chunk_size: usize,
    ) -> Result<impl Stream<Item = std::io::Result<Bytes>>, StreamingError> {
        self.file.seek(SeekFrom::Start(range.start)).await?;
        debug!(
            "Streaming {} bytes {range} of {}",
            range.len(),
            self.path.display()
        );
        Ok(chunked_stream(self.file, range.len(), chunk_size))
    }
}

/// Read up to `len` bytes from `reader` in chunks of at most `chunk_size`.
///
/// The stream ends early without error if the reader runs dry, and ends
/// with the error if a read fails.
pub fn chunked_stream<R>(
    reader: R,
    len: u64,
    chunk_size: usize,
) -> impl Stream<Item = std::io::Result<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let chunk_size = chunk_size.max(1) as u64;

    stream::try_unfold((reader, len), move |(mut reader, remaining)| async move {
        if remaining == 0 {
            return Ok(None);
        }

        let mut buffer = BytesMut::zeroed(remaining.min(chunk_size) as usize);
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            return Ok(None);
        }
        buffer.truncate(read);

        Ok::<_, std::io::Error>(Some((buffer.freeze(), (reader, remaining - read as u64))))
    })
}
