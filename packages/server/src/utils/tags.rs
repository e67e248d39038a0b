use super::filename::split_extension;

/// Maximum length of a tag name, in characters.
pub const MAX_TAG_LEN: usize = 50;

/// Most tags derived from a single filename.
const MAX_FILENAME_TAGS: usize = 5;

/// Camera and container prefixes that carry no meaning as tags.
const STOP_WORDS: &[&str] = &[
    "img", "dsc", "pic", "photo", "video", "mov", "vid", "image", "file",
];

/// Canonical tag form: trimmed and lower-cased. `None` if empty or too long.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() || name.chars().count() > MAX_TAG_LEN {
        return None;
    }
    Some(name)
}

/// Meaningful words of a filename, in order of appearance, deduplicated.
pub fn tags_from_filename(filename: &str) -> Vec<String> {
    let (stem, _) = split_extension(filename);
    let stem = stem.to_lowercase();

    let mut tags: Vec<String> = Vec::new();
    for word in stem.split(['_', '-', '.']).flat_map(str::split_whitespace) {
        if word.chars().count() <= 2
            || word.chars().all(|c| c.is_ascii_digit())
            || STOP_WORDS.contains(&word)
        {
            continue;
        }
        let Some(tag) = normalize_tag(word) else {
            continue;
        };
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == MAX_FILENAME_TAGS {
            break;
        }
    }
    tags
}
