pub mod media_kind;
pub mod storage;

pub use media_kind::MediaKind;
