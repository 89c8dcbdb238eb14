//! Classification of a finished drag gesture.
//!
//! The input layer reduces a drag to one [`MoveEvent`]. [`resolve_move`]
//! turns it into a [`MoveKind`] against the active bucket without touching
//! the forest. Anything that does not resolve inside the active bucket is a
//! [`MoveKind::NoOp`].

use uuid::Uuid;

use crate::forest::Forest;

/// "Drag ended with `source` over `target`".
///
/// `target` is `None` when the drag was cancelled or released outside any
/// row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveEvent {
    pub source: Uuid,
    pub target: Option<Uuid>,
}

impl MoveEvent {
    pub fn new(source: Uuid, target: Option<Uuid>) -> Self {
        Self { source, target }
    }

    /// A drag released over `target`.
    pub fn onto(source: Uuid, target: Uuid) -> Self {
        Self {
            source,
            target: Some(target),
        }
    }

    /// A drag released outside any target.
    pub fn cancelled(source: Uuid) -> Self {
        Self {
            source,
            target: None,
        }
    }
}

/// Why a gesture resolved to nothing.
///
/// Only used for diagnostics: every reason has the same (empty) effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoOpReason {
    /// No target: drag cancelled or released outside.
    Cancelled,
    /// Dropped onto itself.
    Identity,
    /// The active bucket does not exist.
    UnknownBucket,
    /// The dragged id is not a child in the active bucket.
    UnknownSource,
    /// The target is neither a parent nor a child in the active bucket.
    UnknownTarget,
}

impl NoOpReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Identity => "identity",
            Self::UnknownBucket => "unknown_bucket",
            Self::UnknownSource => "unknown_source",
            Self::UnknownTarget => "unknown_target",
        }
    }
}

/// The classified outcome of a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    NoOp(NoOpReason),
    /// Dropped on a parent row: `child` goes to the end of `to`. `from` and
    /// `to` may be the same parent.
    MoveToParentEnd { from: Uuid, to: Uuid, child: Uuid },
    /// Dropped on a child of another parent: `child` lands right before
    /// `before` in `to`.
    MoveBeforeSibling {
        from: Uuid,
        to: Uuid,
        child: Uuid,
        before: Uuid,
    },
    /// Dropped on a sibling: `child` takes the sibling's index.
    ReorderSameParent {
        parent: Uuid,
        child: Uuid,
        target: Uuid,
    },
}

impl MoveKind {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoOp(_) => "noop",
            Self::MoveToParentEnd { .. } => "move_to_parent_end",
            Self::MoveBeforeSibling { .. } => "move_before_sibling",
            Self::ReorderSameParent { .. } => "reorder_same_parent",
        }
    }
}

/// Classify `event` against `bucket` of `forest`.
///
/// First match wins: cancelled, identity, unknown source, drop on a parent
/// row, drop on a child of another parent, drop on a sibling, unknown target.
pub fn resolve_move(forest: &Forest, bucket: &str, event: MoveEvent) -> MoveKind {
    let Some(target) = event.target else {
        return MoveKind::NoOp(NoOpReason::Cancelled);
    };
    if event.source == target {
        return MoveKind::NoOp(NoOpReason::Identity);
    }
    let Some(bucket) = forest.bucket(bucket) else {
        return MoveKind::NoOp(NoOpReason::UnknownBucket);
    };
    let Some(source) = bucket.locate_child(event.source) else {
        return MoveKind::NoOp(NoOpReason::UnknownSource);
    };
    let from = bucket.parents()[source.parent].id;

    if let Some(to) = bucket.parent(target) {
        return MoveKind::MoveToParentEnd {
            from,
            to: to.id,
            child: event.source,
        };
    }

    match bucket.locate_child(target) {
        Some(location) if location.parent != source.parent => MoveKind::MoveBeforeSibling {
            from,
            to: bucket.parents()[location.parent].id,
            child: event.source,
            before: target,
        },
        Some(_) => MoveKind::ReorderSameParent {
            parent: from,
            child: event.source,
            target,
        },
        None => MoveKind::NoOp(NoOpReason::UnknownTarget),
    }
}
