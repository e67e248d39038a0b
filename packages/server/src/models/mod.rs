pub mod admin;
pub mod adventure;
pub mod compare;
pub mod media;
pub mod shared;
pub mod tag;
pub mod trim;
