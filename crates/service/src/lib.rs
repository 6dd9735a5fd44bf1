//! Service layer providing the news resource operations on top of models.
//! - Separates business rules (validation, existence, uniqueness) from data access.
//! - Persistence is reached only through the `NewsRepository` trait.

pub mod errors;
pub mod news;
#[cfg(test)]
pub mod test_support;

pub use news::{NewsResourceService, NewsRepository};
