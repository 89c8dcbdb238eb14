use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod category {
    use super::*;

    /// The whole category forest as stored on disk or sent to a renderer.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ForestDocument {
        /// RFC3339 timestamp of the last write, if the document was saved.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub saved_at: Option<DateTime<Utc>>,
        pub buckets: Vec<BucketDocument>,
    }

    /// A named partition (e.g. `expenses`). Parents are listed in display
    /// order.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BucketDocument {
        pub name: String,
        #[serde(default)]
        pub parents: Vec<ParentDocument>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ParentDocument {
        /// Parent category id (UUID).
        ///
        /// This is serialized as a string in JSON.
        pub id: Uuid,
        pub name: String,
        pub color: String,
        /// Children in display order.
        #[serde(default)]
        pub children: Vec<ChildDocument>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ChildDocument {
        pub id: Uuid,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// One finished drag: `source` released over `target`.
    ///
    /// A missing `target` means the drag was cancelled.
    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct MoveRequest {
        pub source: Uuid,
        #[serde(default)]
        pub target: Option<Uuid>,
    }

    /// A batch of drags replayed in order against one bucket.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoveScript {
        /// Bucket to activate before replaying; the configured one otherwise.
        #[serde(default)]
        pub bucket: Option<String>,
        pub moves: Vec<MoveRequest>,
    }
}
