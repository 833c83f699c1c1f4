pub mod catalog;
pub mod scenario;
pub mod util;

pub use catalog::{FileCatalogLoader, load_catalog};
pub use util::split_csv;
