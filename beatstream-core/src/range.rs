//! HTTP Range header parsing for audio streaming
//!
//! Supports a single `bytes=<start>-[end]` range. Suffix ranges and
//! multi-range requests are rejected rather than approximated.

use std::fmt;

/// Inclusive byte interval inside a file of known size.
///
/// Invariant: `start <= end < file_size` for the size it was parsed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false, a parsed range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Reasons a Range header cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Unit is not `bytes`, or the value is not a single range
    #[error("invalid range header")]
    Malformed,

    /// Start offset is not a number or lies outside the file
    #[error("invalid start range")]
    InvalidStart,

    /// End offset is not a number, precedes start, or lies outside the file
    #[error("invalid end range")]
    InvalidEnd,
}

/// Parse an HTTP Range header against a file of `file_size` bytes.
///
/// An omitted end means "to the end of the file".
///
/// # Errors
///
/// - `RangeError::Malformed` - Missing `bytes=` unit or more than one range
/// - `RangeError::InvalidStart` - Start is not a non-negative integer inside the file
/// - `RangeError::InvalidEnd` - End is not an integer with `start <= end < file_size`
///
/// # Examples
/// ```
/// use beatstream_core::range::{ByteRange, parse_range_header};
///
/// let range = parse_range_header("bytes=100-199", 1000).unwrap();
/// assert_eq!(range, ByteRange { start: 100, end: 199 });
/// assert_eq!(range.len(), 100);
/// ```
pub fn parse_range_header(header: &str, file_size: u64) -> Result<ByteRange, RangeError> {
    let mut parts = header.split('=');
    let (Some(unit), Some(spec), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(RangeError::Malformed);
    };
    if unit != "bytes" || spec.contains(',') {
        return Err(RangeError::Malformed);
    }

    let mut bounds = spec.split('-');
    let start_str = bounds.next().unwrap_or_default();
    let end_str = bounds.next();
    if bounds.next().is_some() {
        return Err(RangeError::Malformed);
    }

    let start = start_str
        .parse::<u64>()
        .map_err(|_| RangeError::InvalidStart)?;
    if start >= file_size {
        return Err(RangeError::InvalidStart);
    }

    let end = match end_str {
        Some(end_str) if !end_str.is_empty() => {
            let end = end_str.parse::<u64>().map_err(|_| RangeError::InvalidEnd)?;
            if end >= file_size || end < start {
                return Err(RangeError::InvalidEnd);
            }
            end
        }
        _ => file_size - 1,
    };

    Ok(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_range_header_valid() {
        let range = parse_range_header("bytes=100-199", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 100, end: 199 });
        assert_eq!(range.len(), 100);
        assert_eq!(range.content_range(1000), "bytes 100-199/1000");
    }

    #[test]
    fn test_parse_range_header_open_end() {
        let range = parse_range_header("bytes=500-", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 500, end: 999 });

        let range = parse_range_header("bytes=500", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 500, end: 999 });
    }

    #[test]
    fn test_parse_range_header_single_byte() {
        let range = parse_range_header("bytes=999-999", 1000).unwrap();
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_parse_range_header_malformed() {
        assert_eq!(parse_range_header("invalid", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range_header("items=0-10", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range_header("bytes=0=10", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range_header("bytes=1-2-3", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range_header("0-10", 1000), Err(RangeError::Malformed));
    }

    #[test]
    fn test_parse_range_header_rejects_multi_range() {
        assert_eq!(
            parse_range_header("bytes=0-10,20-30", 1000),
            Err(RangeError::Malformed)
        );
    }

    #[test]
    fn test_parse_range_header_invalid_start() {
        assert_eq!(parse_range_header("bytes=-500", 1000), Err(RangeError::InvalidStart));
        assert_eq!(parse_range_header("bytes=abc-10", 1000), Err(RangeError::InvalidStart));
        assert_eq!(parse_range_header("bytes=1000-", 1000), Err(RangeError::InvalidStart));
        assert_eq!(parse_range_header("bytes=0-", 0), Err(RangeError::InvalidStart));
    }

    #[test]
    fn test_parse_range_header_invalid_end() {
        assert_eq!(parse_range_header("bytes=0-1000", 1000), Err(RangeError::InvalidEnd));
        assert_eq!(parse_range_header("bytes=50-10", 1000), Err(RangeError::InvalidEnd));
        assert_eq!(parse_range_header("bytes=0-xyz", 1000), Err(RangeError::InvalidEnd));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(RangeError::Malformed.to_string(), "invalid range header");
        assert_eq!(RangeError::InvalidStart.to_string(), "invalid start range");
        assert_eq!(RangeError::InvalidEnd.to_string(), "invalid end range");
    }

    proptest! {
        #[test]
        fn prop_closed_range_is_exact(size in 1u64..1_000_000, a in any::<u64>(), b in any::<u64>()) {
            let (start, end) = {
                let x = a % size;
                let y = b % size;
                (x.min(y), x.max(y))
            };
            let range = parse_range_header(&format!("bytes={start}-{end}"), size).unwrap();
            prop_assert_eq!(range, ByteRange { start, end });
            prop_assert_eq!(range.len(), end - start + 1);
        }

        #[test]
        fn prop_open_range_runs_to_last_byte(size in 1u64..1_000_000, a in any::<u64>()) {
            let start = a % size;
            let range = parse_range_header(&format!("bytes={start}-"), size).unwrap();
            prop_assert_eq!(range, ByteRange { start, end: size - 1 });
        }

        #[test]
        fn prop_end_past_file_fails(size in 1u64..1_000_000, overshoot in 0u64..1000) {
            let header = format!("bytes=0-{}", size + overshoot);
            prop_assert_eq!(parse_range_header(&header, size), Err(RangeError::InvalidEnd));
        }

        #[test]
        fn prop_end_before_start_fails(size in 2u64..1_000_000, a in any::<u64>()) {
            let start = 1 + a % (size - 1);
            let header = format!("bytes={start}-{}", start - 1);
            prop_assert_eq!(parse_range_header(&header, size), Err(RangeError::InvalidEnd));
        }
    }
}
