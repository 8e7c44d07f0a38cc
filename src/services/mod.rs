// Service exports
pub mod catalog;
pub mod classifier;

pub use catalog::{CatalogClient, CatalogError};
pub use classifier::{ClassifierClient, ClassifierError};
