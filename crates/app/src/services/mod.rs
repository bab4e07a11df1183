pub mod archive_service;

pub use archive_service::ArchiveService;
