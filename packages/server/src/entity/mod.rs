pub mod file_tag;
pub mod media_file;
pub mod tag;
