//! Audio library listing with cursor-based pagination
//!
//! Every listing request rescans the audio directory, joins sidecar
//! metadata, sorts newest first and cuts a page bounded by an RFC3339
//! cursor. Nothing is cached between requests.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::LibraryConfig;
use crate::metadata::{Metadata, MetadataStore};

/// One audio file as reported by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioFileEntry {
    pub name: String,
    /// File size in bytes
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub metadata: Metadata,
}

/// A single page of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub files: Vec<AudioFileEntry>,
    /// Cursor for the following page, empty when this is the last one
    pub next_cursor: String,
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Exclusive upper bound on `last_modified`
    pub cursor: Option<DateTime<Utc>>,
    pub limit: usize,
}

/// Errors produced while building a listing page.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Limit is not a positive integer
    #[error("Invalid limit parameter")]
    InvalidLimit {
        /// Raw value supplied by the client
        value: String,
    },

    /// Cursor is not an RFC3339 timestamp
    #[error("Invalid cursor format")]
    InvalidCursor {
        /// Raw value supplied by the client
        value: String,
    },

    /// Audio directory or one of its entries could not be read
    #[error("Unable to read audio files")]
    DirectoryRead {
        /// Directory being scanned
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PageRequest {
    /// Validate raw query values.
    ///
    /// A missing limit falls back to `default_limit`; a missing or empty
    /// cursor means "start from the newest file".
    ///
    /// # Errors
    ///
    /// - `LibraryError::InvalidLimit` - Limit present but not a positive integer
    /// - `LibraryError::InvalidCursor` - Cursor present but not RFC3339
    pub fn parse(
        cursor: Option<&str>,
        limit: Option<&str>,
        default_limit: usize,
    ) -> Result<Self, LibraryError> {
        let limit = match limit {
            None => default_limit,
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) if value > 0 => {
                    usize::try_from(value).map_err(|_| LibraryError::InvalidLimit {
                        value: raw.to_string(),
                    })?
                }
                _ => {
                    return Err(LibraryError::InvalidLimit {
                        value: raw.to_string(),
                    });
                }
            },
        };

        let cursor = match cursor {
            None | Some("") => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| LibraryError::InvalidCursor {
                        value: raw.to_string(),
                    })?
                    .with_timezone(&Utc),
            ),
        };

        Ok(Self { cursor, limit })
    }
}

/// Encode a timestamp the way cursors are handed to clients.
pub fn encode_cursor(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Sort, filter and cut `entries` into one page.
///
/// Entries are ordered newest first with ties broken by name, so page
/// boundaries are deterministic.
pub fn paginate(mut entries: Vec<AudioFileEntry>, request: &PageRequest) -> Page {
    entries.sort_by(|a, b| {
        Reverse(a.last_modified)
            .cmp(&Reverse(b.last_modified))
            .then_with(|| a.name.cmp(&b.name))
    });

    if let Some(cursor) = request.cursor {
        entries.retain(|entry| entry.last_modified < cursor);
    }

    let has_more = entries.len() > request.limit;
    entries.truncate(request.limit);

    let next_cursor = match entries.last() {
        Some(last) if has_more => encode_cursor(last.last_modified),
        _ => String::new(),
    };

    Page {
        files: entries,
        next_cursor,
    }
}

/// Filesystem-backed audio library.
#[derive(Debug, Clone)]
pub struct AudioLibrary {
    audio_dir: PathBuf,
    metadata: MetadataStore,
}

impl AudioLibrary {
    pub fn new(audio_dir: impl Into<PathBuf>, metadata: MetadataStore) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            metadata,
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(
            config.audio_dir.clone(),
            MetadataStore::new(config.metadata_dir.clone()),
        )
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Path a client-supplied name resolves to inside the audio directory.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.audio_dir.join(name)
    }

    /// Enumerate every visible, non-directory file with its metadata.
    ///
    /// # Errors
    ///
    /// - `LibraryError::DirectoryRead` - Directory or entry stat could not be read
    pub async fn scan(&self) -> Result<Vec<AudioFileEntry>, LibraryError> {
        let read_error = |source: std::io::Error| LibraryError::DirectoryRead {
            path: self.audio_dir.clone(),
            source,
        };

        let mut dir = tokio::fs::read_dir(&self.audio_dir)
            .await
            .map_err(read_error)?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await.map_err(read_error)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let stat = entry.metadata().await.map_err(read_error)?;
            if stat.is_dir() {
                continue;
            }
            let modified = stat.modified().map_err(read_error)?;

            let metadata = self.metadata.load(&name).await;
            entries.push(AudioFileEntry {
                name,
                size: stat.len(),
                last_modified: DateTime::<Utc>::from(modified),
                metadata,
            });
        }

        debug!(
            "Scanned {} audio files in {}",
            entries.len(),
            self.audio_dir.display()
        );
        Ok(entries)
    }

    /// Scan the directory and return the requested page.
    ///
    /// # Errors
    ///
    /// - `LibraryError::DirectoryRead` - Directory or entry stat could not be read
    pub async fn page(&self, request: &PageRequest) -> Result<Page, LibraryError> {
        let entries = self.scan().await?;
        Ok(paginate(entries, request))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::test_fixtures::{base_time, create_temp_library_dirs, write_audio_file};

    fn entry(name: &str, secs: i64) -> AudioFileEntry {
        AudioFileEntry {
            name: name.to_string(),
            size: 1,
            last_modified: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            metadata: Metadata::default(),
        }
    }

    fn names(page: &Page) -> Vec<&str> {
        page.files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::parse(None, None, 10).unwrap();
        assert_eq!(request.limit, 10);
        assert!(request.cursor.is_none());

        let request = PageRequest::parse(Some(""), Some("3"), 10).unwrap();
        assert_eq!(request.limit, 3);
        assert!(request.cursor.is_none());
    }

    #[test]
    fn test_page_request_rejects_bad_limit() {
        for raw in ["0", "-1", "abc", "", "1.5"] {
            assert!(
                matches!(
                    PageRequest::parse(None, Some(raw), 10),
                    Err(LibraryError::InvalidLimit { .. })
                ),
                "limit {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_page_request_cursor() {
        let request = PageRequest::parse(Some("2023-11-14T22:13:20Z"), None, 10).unwrap();
        assert_eq!(
            request.cursor,
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );

        let request = PageRequest::parse(Some("2023-11-15T00:13:20+02:00"), None, 10).unwrap();
        assert_eq!(
            request.cursor,
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );

        assert!(matches!(
            PageRequest::parse(Some("yesterday"), None, 10),
            Err(LibraryError::InvalidCursor { .. })
        ));
    }

    #[test]
    fn test_paginate_newest_first_with_cursor() {
        let entries = (0..15).map(|i| entry(&format!("t{i:02}.mp3"), i)).collect::<Vec<_>>();

        let first = paginate(entries.clone(), &PageRequest { cursor: None, limit: 10 });
        assert_eq!(first.files.len(), 10);
        assert_eq!(first.files[0].name, "t14.mp3");
        assert_eq!(first.files[9].name, "t05.mp3");
        assert_eq!(first.next_cursor, "2023-11-14T22:13:25Z");

        let request = PageRequest::parse(Some(&first.next_cursor), Some("10"), 10).unwrap();
        let second = paginate(entries, &request);
        assert_eq!(
            names(&second),
            vec!["t04.mp3", "t03.mp3", "t02.mp3", "t01.mp3", "t00.mp3"]
        );
        assert!(second.next_cursor.is_empty());
    }

    #[test]
    fn test_paginate_exact_fit_has_no_cursor() {
        let entries = (0..10).map(|i| entry(&format!("{i}.wav"), i)).collect();
        let page = paginate(entries, &PageRequest { cursor: None, limit: 10 });
        assert_eq!(page.files.len(), 10);
        assert!(page.next_cursor.is_empty());
    }

    #[test]
    fn test_paginate_ties_break_by_name() {
        let entries = vec![entry("c.mp3", 5), entry("a.mp3", 5), entry("b.mp3", 5)];
        let page = paginate(entries, &PageRequest { cursor: None, limit: 2 });
        assert_eq!(names(&page), vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn test_paginate_cursor_is_exclusive() {
        let entries = vec![entry("old.mp3", 1), entry("edge.mp3", 2), entry("new.mp3", 3)];
        let cursor = Some(Utc.timestamp_opt(1_700_000_002, 0).unwrap());
        let page = paginate(entries, &PageRequest { cursor, limit: 10 });
        assert_eq!(names(&page), vec!["old.mp3"]);
    }

    #[test]
    fn test_cursor_keeps_subsecond_precision() {
        let ts = Utc.timestamp_opt(1_700_000_000, 250_000_000).unwrap();
        let encoded = encode_cursor(ts);
        assert_eq!(encoded, "2023-11-14T22:13:20.250Z");

        let parsed = PageRequest::parse(Some(&encoded), None, 10).unwrap();
        assert_eq!(parsed.cursor, Some(ts));
    }

    #[tokio::test]
    async fn test_scan_skips_hidden_and_directories() {
        let (_temp, audio, meta) = create_temp_library_dirs();
        write_audio_file(&audio, "song.mp3", b"12345", base_time());
        write_audio_file(&audio, ".DS_Store", b"junk", base_time());
        std::fs::create_dir(audio.join("nested")).unwrap();
        write_audio_file(&audio.join("nested"), "inner.mp3", b"x", base_time());
        std::fs::write(meta.join("song.mp3.json"), r#"{"name":"Song"}"#).unwrap();

        let library = AudioLibrary::new(&audio, MetadataStore::new(&meta));
        let entries = library.scan().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "song.mp3");
        assert_eq!(entries[0].size, 5);
        assert_eq!(entries[0].metadata.name, "Song");
        assert_eq!(entries[0].last_modified, DateTime::<Utc>::from(base_time()));
    }

    #[tokio::test]
    async fn test_page_over_directory() {
        let (_temp, audio, meta) = create_temp_library_dirs();
        for i in 0..15u64 {
            write_audio_file(
                &audio,
                &format!("track{i:02}.mp3"),
                b"data",
                base_time() + Duration::from_secs(i * 60),
            );
        }
        let library = AudioLibrary::new(&audio, MetadataStore::new(&meta));

        let first = library
            .page(&PageRequest { cursor: None, limit: 10 })
            .await
            .unwrap();
        assert_eq!(first.files.len(), 10);
        assert_eq!(first.files[0].name, "track14.mp3");
        assert!(!first.next_cursor.is_empty());

        let request = PageRequest::parse(Some(&first.next_cursor), None, 10).unwrap();
        let second = library.page(&request).await.unwrap();
        assert_eq!(second.files.len(), 5);
        assert_eq!(second.files[4].name, "track00.mp3");
        assert!(second.next_cursor.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let (_temp, audio, meta) = create_temp_library_dirs();
        let library = AudioLibrary::new(audio.join("gone"), MetadataStore::new(&meta));

        let err = library.scan().await.unwrap_err();
        assert!(matches!(err, LibraryError::DirectoryRead { .. }));
        assert_eq!(err.to_string(), "Unable to read audio files");
    }

    #[test]
    fn test_entry_serialization() {
        let value = serde_json::to_value(entry("a.mp3", 0)).unwrap();
        assert_eq!(value["name"], "a.mp3");
        assert_eq!(value["size"], 1);
        assert_eq!(value["last_modified"], "2023-11-14T22:13:20Z");
        assert_eq!(value["metadata"]["cover_img"], "");
    }
}
