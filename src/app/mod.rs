pub mod directory_service;
pub mod ports;

pub use directory_service::{DirectoryService, HealthReport};
pub use ports::{Clock, RecordSource};
