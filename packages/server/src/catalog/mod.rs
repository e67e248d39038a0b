pub mod query;
pub mod sampling;
mod service;

pub use query::{DEFAULT_PAGE_SIZE, Filter, ListParams, PAGE_SIZES, SortOrder, TypeFilter};
pub use service::{CatalogService, Page};

/// Records shown by the sample endpoint.
pub const SAMPLE_SIZE: usize = 10;
