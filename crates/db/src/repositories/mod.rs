//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every update targets one row by
//! primary key; nothing here opens a multi-row transaction.

pub mod catalog_repo;
pub mod content_buffer_repo;
pub mod post_repo;
pub mod post_tag_repo;

pub use catalog_repo::CatalogRepo;
pub use content_buffer_repo::ContentBufferRepo;
pub use post_repo::PostRepo;
pub use post_tag_repo::PostTagRepo;
