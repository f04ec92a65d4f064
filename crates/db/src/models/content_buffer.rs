use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pressline_core::types::DbId;

/// A recently published article queued for announcement.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BufferEntry {
    pub post_id: DbId,
    pub post_title: String,
    pub post_url: String,
}
