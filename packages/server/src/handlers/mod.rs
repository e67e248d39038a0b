pub mod admin;
pub mod adventure;
pub mod compare;
pub mod media;
pub mod rating;
pub mod tags;
pub mod trim;
