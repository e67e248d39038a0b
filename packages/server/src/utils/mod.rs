pub mod csv;
pub mod filename;
pub mod tags;
