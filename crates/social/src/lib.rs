//! HTTP clients for the services articles are announced on or analysed by.
//!
//! - [`twitter`], [`misskey`], [`bluesky`]: the three cross-posting targets,
//!   unified behind [`SocialPoster`].
//! - [`openai`]: article embeddings.
//! - [`bigquery`]: warehouse queries and table loads.

pub mod bigquery;
pub mod bluesky;
pub mod download;
pub mod error;
mod http;
pub mod misskey;
pub mod oauth1;
pub mod openai;
pub mod poster;
pub mod twitter;

pub use download::download_image;
pub use http::{build_client, REQUEST_TIMEOUT};
pub use error::SocialError;
pub use poster::{PostImage, SocialPost, SocialPoster};
