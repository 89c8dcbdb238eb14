//! The owning layer around a [`Forest`].
//!
//! A [`CategoryBoard`] keeps the current forest, the active bucket and a
//! revision counter. Each finished drag goes through
//! [`CategoryBoard::handle_drop`], which swaps in the new forest in one step
//! and then tells every registered [`ForestSink`].

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    EngineError, ResultEngine,
    forest::Forest,
    moves::{MoveEvent, MoveKind, resolve_move},
    reorder::apply,
};

/// Collaborator told about every applied move, e.g. a store that persists
/// the forest.
///
/// Sinks are called after the board swapped in the new forest. An error is
/// reported back to the caller but does not undo the move.
pub trait ForestSink {
    fn forest_changed(&mut self, forest: &Forest, bucket: &str) -> ResultEngine<()>;
}

/// What a drop did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub kind: MoveKind,
    /// Board revision after the drop.
    pub revision: u64,
}

impl MoveOutcome {
    pub fn is_noop(&self) -> bool {
        self.kind.is_noop()
    }
}

/// Holds the current forest and applies drops against the active bucket.
pub struct CategoryBoard {
    forest: Arc<Forest>,
    active_bucket: String,
    revision: u64,
    updated_at: DateTime<Utc>,
    sinks: Vec<Box<dyn ForestSink>>,
}

impl std::fmt::Debug for CategoryBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryBoard")
            .field("active_bucket", &self.active_bucket)
            .field("revision", &self.revision)
            .field("updated_at", &self.updated_at)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl CategoryBoard {
    /// Build a board over `forest` with `active_bucket` selected.
    ///
    /// Fails if the forest reuses an id or the bucket does not exist.
    pub fn new(forest: Forest, active_bucket: &str) -> ResultEngine<Self> {
        forest.validate()?;
        let key = bucket_key(&forest, active_bucket)?;
        Ok(Self {
            forest: Arc::new(forest),
            active_bucket: key,
            revision: 0,
            updated_at: Utc::now(),
            sinks: Vec::new(),
        })
    }

    /// Read-only view of the current forest.
    ///
    /// The returned snapshot never changes, later drops replace the board's
    /// forest instead of editing it.
    pub fn snapshot(&self) -> Arc<Forest> {
        Arc::clone(&self.forest)
    }

    pub fn active_bucket(&self) -> &str {
        &self.active_bucket
    }

    pub fn set_active_bucket(&mut self, name: &str) -> ResultEngine<()> {
        self.active_bucket = bucket_key(&self.forest, name)?;
        tracing::debug!(bucket = %self.active_bucket, "active bucket changed");
        Ok(())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn add_sink(&mut self, sink: Box<dyn ForestSink>) {
        self.sinks.push(sink);
    }

    /// Apply one finished drag to the active bucket.
    ///
    /// A gesture that resolves to [`MoveKind::NoOp`] changes nothing and
    /// reaches no sink. Otherwise the forest is swapped, the revision bumped
    /// and every sink notified in registration order.
    pub fn handle_drop(&mut self, event: MoveEvent) -> ResultEngine<MoveOutcome> {
        let kind = resolve_move(&self.forest, &self.active_bucket, event);
        if let MoveKind::NoOp(reason) = kind {
            tracing::debug!(
                bucket = %self.active_bucket,
                source = %event.source,
                reason = reason.as_str(),
                "drop ignored"
            );
            return Ok(MoveOutcome {
                kind,
                revision: self.revision,
            });
        }

        let next = apply(&self.forest, &self.active_bucket, &kind);
        self.forest = Arc::new(next);
        self.revision += 1;
        self.updated_at = Utc::now();
        tracing::info!(
            bucket = %self.active_bucket,
            source = %event.source,
            kind = kind.as_str(),
            revision = self.revision,
            "category moved"
        );

        self.notify()?;
        Ok(MoveOutcome {
            kind,
            revision: self.revision,
        })
    }

    /// Swap in a forest delivered by an external edit (nodes added, renamed
    /// or removed). Sinks are not notified: the editor owns that change.
    pub fn replace_forest(&mut self, forest: Forest) -> ResultEngine<()> {
        forest.validate()?;
        if forest.bucket(&self.active_bucket).is_none() {
            return Err(EngineError::KeyNotFound(self.active_bucket.clone()));
        }
        self.forest = Arc::new(forest);
        self.revision += 1;
        self.updated_at = Utc::now();
        tracing::info!(revision = self.revision, "forest replaced");
        Ok(())
    }

    fn notify(&mut self) -> ResultEngine<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(err) = sink.forest_changed(&self.forest, &self.active_bucket) {
                tracing::warn!("forest sink failed: {err}");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn bucket_key(forest: &Forest, name: &str) -> ResultEngine<String> {
    forest
        .bucket(name)
        .map(|bucket| bucket.key().to_string())
        .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use uuid::Uuid;

    use super::*;
    use crate::{
        forest::{ChildCategory, ParentCategory},
        moves::NoOpReason,
    };

    fn id(raw: u128) -> Uuid {
        Uuid::from_u128(raw)
    }

    fn forest() -> Forest {
        let mut forest = Forest::with_default_buckets();
        forest
            .insert_parent(
                "expenses",
                ParentCategory::new(id(1), "Home", "#aa0000")
                    .with_child(ChildCategory::new(id(11), "Rent"))
                    .with_child(ChildCategory::new(id(12), "Power")),
            )
            .unwrap();
        forest
            .insert_parent(
                "income",
                ParentCategory::new(id(2), "Work", "#00aa00")
                    .with_child(ChildCategory::new(id(21), "Salary"))
                    .with_child(ChildCategory::new(id(22), "Bonus")),
            )
            .unwrap();
        forest
    }

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<(String, Vec<Uuid>)>>>,
        fail: bool,
    }

    impl ForestSink for Recorder {
        fn forest_changed(&mut self, forest: &Forest, bucket: &str) -> ResultEngine<()> {
            let ids = forest.bucket(bucket).map(|b| b.child_ids()).unwrap_or_default();
            self.calls.borrow_mut().push((bucket.to_string(), ids));
            if self.fail {
                return Err(EngineError::Sink("disk full".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn new_rejects_unknown_bucket_and_bad_forest() {
        assert_eq!(
            CategoryBoard::new(forest(), "savings").unwrap_err(),
            EngineError::KeyNotFound("savings".to_string())
        );

        let mut broken = forest();
        broken.bucket_mut("other").unwrap().parents.push(
            ParentCategory::new(id(3), "Dup", "#000000")
                .with_child(ChildCategory::new(id(11), "Rent")),
        );
        assert!(matches!(
            CategoryBoard::new(broken, "expenses"),
            Err(EngineError::DuplicateId(_))
        ));
    }

    #[test]
    fn drop_swaps_snapshot_and_bumps_revision() {
        let mut board = CategoryBoard::new(forest(), "Expenses").unwrap();
        assert_eq!(board.active_bucket(), "expenses");
        let before = board.snapshot();

        let outcome = board.handle_drop(MoveEvent::onto(id(11), id(12))).unwrap();
        assert_eq!(
            outcome.kind,
            MoveKind::ReorderSameParent {
                parent: id(1),
                child: id(11),
                target: id(12)
            }
        );
        assert_eq!(outcome.revision, 1);
        assert_eq!(board.revision(), 1);

        assert_eq!(before.bucket("expenses").unwrap().child_ids(), vec![id(11), id(12)]);
        assert_eq!(
            board.snapshot().bucket("expenses").unwrap().child_ids(),
            vec![id(12), id(11)]
        );
    }

    #[test]
    fn noop_keeps_snapshot_and_skips_sinks() {
        let mut board = CategoryBoard::new(forest(), "expenses").unwrap();
        let recorder = Recorder::default();
        let calls = Rc::clone(&recorder.calls);
        board.add_sink(Box::new(recorder));
        let before = board.snapshot();
        let stamp = board.updated_at();

        let outcome = board.handle_drop(MoveEvent::cancelled(id(11))).unwrap();
        assert_eq!(outcome.kind, MoveKind::NoOp(NoOpReason::Cancelled));
        assert!(outcome.is_noop());
        assert_eq!(outcome.revision, 0);
        assert!(Arc::ptr_eq(&before, &board.snapshot()));
        assert_eq!(board.updated_at(), stamp);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn moves_follow_the_active_bucket() {
        let mut board = CategoryBoard::new(forest(), "expenses").unwrap();
        let outcome = board.handle_drop(MoveEvent::onto(id(22), id(21))).unwrap();
        assert_eq!(outcome.kind, MoveKind::NoOp(NoOpReason::UnknownSource));

        board.set_active_bucket("income").unwrap();
        board.handle_drop(MoveEvent::onto(id(22), id(21))).unwrap();
        assert_eq!(
            board.snapshot().bucket("income").unwrap().child_ids(),
            vec![id(22), id(21)]
        );
        assert_eq!(
            board.set_active_bucket("savings"),
            Err(EngineError::KeyNotFound("savings".to_string()))
        );
        assert_eq!(board.active_bucket(), "income");
    }

    #[test]
    fn sinks_see_the_new_forest_in_order() {
        let mut board = CategoryBoard::new(forest(), "expenses").unwrap();
        let first = Recorder::default();
        let calls = Rc::clone(&first.calls);
        board.add_sink(Box::new(first));
        board.add_sink(Box::new(Recorder {
            calls: Rc::clone(&calls),
            fail: false,
        }));

        board.handle_drop(MoveEvent::onto(id(11), id(1))).unwrap();
        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("expenses".to_string(), vec![id(12), id(11)]));
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn sink_failure_is_reported_but_move_is_kept() {
        let mut board = CategoryBoard::new(forest(), "expenses").unwrap();
        let failing = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let calls = Rc::clone(&failing.calls);
        board.add_sink(Box::new(failing));
        board.add_sink(Box::new(Recorder {
            calls: Rc::clone(&calls),
            fail: false,
        }));

        let err = board.handle_drop(MoveEvent::onto(id(12), id(11))).unwrap_err();
        assert_eq!(err, EngineError::Sink("disk full".to_string()));
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(board.revision(), 1);
        assert_eq!(
            board.snapshot().bucket("expenses").unwrap().child_ids(),
            vec![id(12), id(11)]
        );
    }

    #[test]
    fn replace_forest_validates() {
        let mut board = CategoryBoard::new(forest(), "income").unwrap();
        let mut smaller = forest();
        smaller.remove_child("income", id(22)).unwrap();
        board.replace_forest(smaller).unwrap();
        assert_eq!(board.revision(), 1);
        assert_eq!(
            board.snapshot().bucket("income").unwrap().child_ids(),
            vec![id(21)]
        );

        assert_eq!(
            board.replace_forest(Forest::new()),
            Err(EngineError::KeyNotFound("income".to_string()))
        );
        assert_eq!(board.revision(), 1);
    }
}
