//! Loading of the static reference data a calculation runs on: the ordered
//! indicator table and the historical share table.

pub mod error;
pub mod loader;

pub use error::DatasetError;
pub use loader::Dataset;
