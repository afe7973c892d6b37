//! Client-supplied audio filename checks

/// Extensions the streaming endpoint is willing to serve.
pub const AUDIO_EXTENSIONS: [&str; 3] = [".mp3", ".wav", ".flac"];

/// Returns true if `name` is a plain audio filename safe to join onto the
/// audio directory.
///
/// Rejects anything containing `..`, `/` or `\`, then requires one of
/// [`AUDIO_EXTENSIONS`] as a case-insensitive suffix.
pub fn is_valid_filename(name: &str) -> bool {
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return false;
    }

    let lowered = name.to_lowercase();
    AUDIO_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_audio_files() {
        assert!(is_valid_filename("track.mp3"));
        assert!(is_valid_filename("TRACK.WAV"));
        assert!(is_valid_filename("Deep Focus 40Hz.flac"));
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(!is_valid_filename("../../etc/passwd"));
        assert!(!is_valid_filename("..track.mp3"));
        assert!(!is_valid_filename("nested/track.mp3"));
        assert!(!is_valid_filename("nested\\track.mp3"));
    }

    #[test]
    fn test_rejects_other_extensions() {
        assert!(!is_valid_filename("track.exe"));
        assert!(!is_valid_filename("track.mp3.json"));
        assert!(!is_valid_filename("mp3"));
        assert!(!is_valid_filename(""));
    }
}
