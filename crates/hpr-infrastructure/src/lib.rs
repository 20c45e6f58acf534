pub mod config_service;
pub mod http_repository;
pub mod paths;
pub mod upload;

pub use crate::config_service::ConfigService;
pub use crate::http_repository::HttpContentRepository;
pub use crate::paths::HprPaths;
pub use crate::upload::read_image;
