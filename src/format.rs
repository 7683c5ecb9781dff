//! Index file codec.
//!
//! # File Structure
//!
//! ```text
//! Offset   Size    Type        Description
//! ─────────────────────────────────────────────────
//! 0x00     4       i32 LE      Index family tag
//! then, repeated until end of file:
//!          8       u64 LE      Segment name length
//!          varies  [u8]        Segment name bytes
//!          8       u64 LE      Segment data length
//!          varies  [u8]        Segment data bytes
//! ```
//!
//! No padding, no alignment, no checksum. The format is a flat
//! self-describing sequence with no offset table: a persisted index is
//! always read back in one pass, never partially, so O(1) segment lookup
//! buys nothing. Segments are written in the insertion order of the
//! [`BinarySet`] and read back in the same order.
//!
//! A missing, unreadable, or zero-length file reads as "no index present"
//! (`Ok(None)`), which callers treat as an expected, recoverable condition.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::factory;
use crate::family::IndexFamily;
use crate::index::{BackendError, VectorIndex};
use crate::segment::{BinarySegment, BinarySet};

/// Size of the family tag at the head of every index file.
pub const FAMILY_TAG_SIZE: u64 = 4;

/// Substring the OS puts in write errors when the device is full.
const NO_SPACE_INDICATOR: &str = "No space left on device";

#[derive(Error, Debug)]
pub enum FormatError {
    /// The file's family tag matches no known [`IndexFamily`].
    #[error("unknown index family tag: {0}")]
    UnknownFamily(i32),

    /// Truncated or malformed persisted data.
    #[error("corrupt index file: {0}")]
    CorruptFile(String),

    /// The storage device rejected the write for lack of capacity.
    #[error("no space left on device")]
    NoSpace,

    /// Obtaining the segment set or writing it failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An internal backend fault distinct from a serialization problem.
    #[error("unexpected backend fault: {0}")]
    Unexpected(String),
}

impl From<BackendError> for FormatError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Serialization(msg) => FormatError::Serialization(msg),
            BackendError::Internal(msg) => FormatError::Unexpected(msg),
        }
    }
}

/// Persist `index` to `path`.
///
/// Obtains the segment set from the handle (read-only borrow) and writes
/// the family tag followed by every segment in insertion order. All
/// failures are categorized at this boundary: storage exhaustion surfaces
/// as [`FormatError::NoSpace`] so callers can trigger cleanup, backend
/// faults as [`FormatError::Unexpected`], and everything else as
/// [`FormatError::Serialization`].
pub fn write_index(index: &VectorIndex, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let path = path.as_ref();
    let segments = index.serialize().map_err(|err| {
        tracing::error!("serializing index for {}: {err}", path.display());
        FormatError::from(err)
    })?;

    let write = || -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&index.family().tag().to_le_bytes())?;
        for segment in &segments {
            let name = segment.name().as_bytes();
            writer.write_all(&(name.len() as u64).to_le_bytes())?;
            writer.write_all(name)?;
            writer.write_all(&(segment.len() as u64).to_le_bytes())?;
            writer.write_all(segment.data())?;
        }
        writer.flush()
    };

    write().map_err(|err| classify_write_error(path, err))
}

/// Reconstruct the index persisted at `path`.
///
/// Returns `Ok(None)` when no index is present (missing, unreadable, or
/// zero-length file). Otherwise reads the family tag, accumulates segments
/// until end of file, and asks the factory to rebuild and load the matching
/// handle.
pub fn read_index(path: impl AsRef<Path>) -> Result<Option<VectorIndex>, FormatError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return Ok(None),
    };
    let file_len = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(_) => return Ok(None),
    };
    if file_len == 0 {
        return Ok(None);
    }

    let mut reader = BufReader::new(file);
    let mut tag_buf = [0u8; FAMILY_TAG_SIZE as usize];
    reader
        .read_exact(&mut tag_buf)
        .map_err(|err| FormatError::CorruptFile(format!("reading family tag: {err}")))?;
    let tag = i32::from_le_bytes(tag_buf);
    let family = IndexFamily::from_tag(tag).ok_or(FormatError::UnknownFamily(tag))?;

    let mut cursor = FAMILY_TAG_SIZE;
    let mut segments = BinarySet::new();
    while cursor < file_len {
        let name_len = read_len(&mut reader, &mut cursor, file_len, "segment name")?;
        let name_bytes = read_chunk(&mut reader, &mut cursor, file_len, name_len, "segment name")?;
        let name = String::from_utf8(name_bytes).map_err(|_| {
            FormatError::CorruptFile("segment name is not valid UTF-8".to_string())
        })?;

        let data_len = read_len(&mut reader, &mut cursor, file_len, &name)?;
        let data = read_chunk(&mut reader, &mut cursor, file_len, data_len, &name)?;
        segments.append(BinarySegment::new(name, data));
    }

    factory::reconstruct(family, segments).map(Some)
}

fn classify_write_error(path: &Path, err: io::Error) -> FormatError {
    let message = err.to_string();
    if message.contains(NO_SPACE_INDICATOR) {
        tracing::error!("writing index to {}: no space left on device", path.display());
        FormatError::NoSpace
    } else {
        tracing::error!("writing index to {}: {message}", path.display());
        FormatError::Serialization(message)
    }
}

/// Read an 8-byte length field, checking it fits in the remaining file.
fn read_len<R: Read>(
    reader: &mut R,
    cursor: &mut u64,
    file_len: u64,
    what: &str,
) -> Result<u64, FormatError> {
    if file_len - *cursor < 8 {
        return Err(FormatError::CorruptFile(format!(
            "truncated length field for {what} at offset {cursor}"
        )));
    }
    let mut buf = [0u8; 8];
    reader
        .read_exact(&mut buf)
        .map_err(|err| FormatError::CorruptFile(format!("reading length for {what}: {err}")))?;
    *cursor += 8;
    Ok(u64::from_le_bytes(buf))
}

/// Read `declared` bytes, refusing lengths that overrun the file.
fn read_chunk<R: Read>(
    reader: &mut R,
    cursor: &mut u64,
    file_len: u64,
    declared: u64,
    what: &str,
) -> Result<Vec<u8>, FormatError> {
    let remaining = file_len - *cursor;
    if declared > remaining {
        return Err(FormatError::CorruptFile(format!(
            "{what}: declared length {declared} overruns file ({remaining} bytes remain)"
        )));
    }
    let mut buf = vec![0u8; declared as usize];
    reader
        .read_exact(&mut buf)
        .map_err(|err| FormatError::CorruptFile(format!("reading {what}: {err}")))?;
    *cursor += declared;
    Ok(buf)
}
