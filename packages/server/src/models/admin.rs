/// Header row of the likes export.
pub const EXPORT_HEADER: [&str; 7] = [
    "id",
    "original_filename",
    "filename",
    "file_type",
    "like_count",
    "elo_rating",
    "created_at",
];

/// Download name of the likes export.
pub const EXPORT_FILENAME: &str = "media_likes.csv";
