pub mod content_buffer;
pub mod post;
