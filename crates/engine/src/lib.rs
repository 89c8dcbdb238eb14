//! Category tree engine.
//!
//! Ledger categories live in a two-level [`Forest`]: buckets (expenses,
//! income, ...) hold ordered parent categories, and each parent holds an
//! ordered list of child categories. The engine turns a finished drag
//! gesture into a new forest:
//!
//! 1. [`resolve_move`] classifies a [`MoveEvent`] into a [`MoveKind`];
//! 2. [`apply`] produces the new forest for that kind;
//! 3. [`apply_move`] does both in one call.
//!
//! Nothing here fails on a bad gesture: ids that do not resolve in the
//! active bucket give [`MoveKind::NoOp`]. [`CategoryBoard`] owns the current
//! forest for callers that want a single place to drive drops from, and
//! hands each applied move to the registered [`ForestSink`]s.
//!
//! ```rust
//! use engine::{ChildCategory, Forest, MoveEvent, ParentCategory, apply_move};
//! use uuid::Uuid;
//!
//! let (home, rent, power) = (Uuid::from_u128(1), Uuid::from_u128(11), Uuid::from_u128(12));
//! let mut forest = Forest::with_default_buckets();
//! forest
//!     .insert_parent(
//!         "expenses",
//!         ParentCategory::new(home, "Home", "#aa0000")
//!             .with_child(ChildCategory::new(rent, "Rent"))
//!             .with_child(ChildCategory::new(power, "Power")),
//!     )
//!     .unwrap();
//!
//! let next = apply_move(&forest, "expenses", MoveEvent::onto(rent, home));
//! assert_eq!(next.bucket("expenses").unwrap().child_ids(), vec![power, rent]);
//! ```

pub use board::{CategoryBoard, ForestSink, MoveOutcome};
pub use error::EngineError;
pub use forest::{Bucket, ChildCategory, ChildLocation, DEFAULT_BUCKETS, Forest, ParentCategory};
pub use moves::{MoveEvent, MoveKind, NoOpReason, resolve_move};
pub use reorder::{apply, apply_move};

mod board;
mod error;
mod forest;
mod moves;
mod reorder;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
