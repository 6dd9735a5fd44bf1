//! News resource: three-layer architecture (domain + validation, repository, service).

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use repository::NewsRepository;
pub use service::NewsResourceService;
