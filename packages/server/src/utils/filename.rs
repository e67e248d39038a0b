use std::path::Path;

/// Maximum length of a user-supplied filename, in characters.
pub const MAX_FILENAME_LEN: usize = 255;

/// Result of validating a user-supplied filename.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename is longer than [`MAX_FILENAME_LEN`].
    TooLong,
    /// Filename contains null bytes.
    NullByte,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::TooLong => "Filename must be at most 255 characters",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
        }
    }
}

/// Validates a display filename and returns it trimmed.
///
/// Browsers may send a full client path; only the last component is kept.
pub fn sanitize_original_filename(filename: &str) -> Result<String, FilenameError> {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if last.is_empty() {
        return Err(FilenameError::Empty);
    }

    if last.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // Reject ASCII control characters; the name ends up in CSV exports and headers.
    if last.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if last.chars().count() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }

    Ok(last.to_string())
}

/// Splits a filename into stem and extension (with the leading dot).
///
/// A name without an extension, or a dotfile, yields an empty extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(pos) => (&name[..pos], &name[pos..]),
    }
}

/// Display name given to a trimmed copy of `original`.
pub fn trimmed_name(original: &str, start: f64, end: f64) -> String {
    let (stem, ext) = split_extension(original);
    format!("{stem}_trimmed_{start:.1}s-{end:.1}s{ext}")
}
