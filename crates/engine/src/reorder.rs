//! Applying a classified move to a forest.
//!
//! Every function here takes the forest by reference and returns a new
//! value. Removal and insertion are two explicit steps: the insertion index
//! is always read before removal and applied to the list after removal.

use uuid::Uuid;

use crate::{
    forest::{Bucket, Forest},
    moves::{MoveEvent, MoveKind, resolve_move},
};

/// Resolve `event` against `bucket` and apply it.
///
/// This is the single entry point the event layer calls once per finished
/// drag. Unresolvable gestures return a forest equal to the input.
pub fn apply_move(forest: &Forest, bucket: &str, event: MoveEvent) -> Forest {
    let kind = resolve_move(forest, bucket, event);
    tracing::debug!(
        bucket,
        source = %event.source,
        target = ?event.target,
        kind = kind.as_str(),
        "drag resolved"
    );
    apply(forest, bucket, &kind)
}

/// Apply an already classified move.
///
/// A kind that no longer matches `forest` (for instance the child already
/// left its parent) leaves the forest unchanged.
pub fn apply(forest: &Forest, bucket: &str, kind: &MoveKind) -> Forest {
    let mut next = forest.clone();
    let applied = match next.bucket_mut(bucket) {
        Some(target) => apply_kind(target, kind),
        None => false,
    };
    if !applied {
        return next;
    }

    #[cfg(debug_assertions)]
    check_conserved(forest, &next, bucket);

    next
}

fn apply_kind(bucket: &mut Bucket, kind: &MoveKind) -> bool {
    match *kind {
        MoveKind::NoOp(_) => false,
        MoveKind::MoveToParentEnd { from, to, child } => {
            move_to_parent_end(bucket, from, to, child)
        }
        MoveKind::MoveBeforeSibling {
            from,
            to,
            child,
            before,
        } => move_before_sibling(bucket, from, to, child, before),
        MoveKind::ReorderSameParent {
            parent,
            child,
            target,
        } => reorder_same_parent(bucket, parent, child, target),
    }
}

fn move_to_parent_end(bucket: &mut Bucket, from: Uuid, to: Uuid, child: Uuid) -> bool {
    let (Some(src), Some(dst)) = (bucket.parent_position(from), bucket.parent_position(to)) else {
        return false;
    };
    let Some(index) = bucket.parents[src].child_position(child) else {
        return false;
    };
    let moved = bucket.parents[src].children.remove(index);
    bucket.parents[dst].children.push(moved);
    true
}

fn move_before_sibling(
    bucket: &mut Bucket,
    from: Uuid,
    to: Uuid,
    child: Uuid,
    before: Uuid,
) -> bool {
    let (Some(src), Some(dst)) = (bucket.parent_position(from), bucket.parent_position(to)) else {
        return false;
    };
    if src == dst {
        return false;
    }
    let (Some(index), Some(insert_at)) = (
        bucket.parents[src].child_position(child),
        bucket.parents[dst].child_position(before),
    ) else {
        return false;
    };
    let moved = bucket.parents[src].children.remove(index);
    bucket.parents[dst].children.insert(insert_at, moved);
    true
}

fn reorder_same_parent(bucket: &mut Bucket, parent: Uuid, child: Uuid, over: Uuid) -> bool {
    let Some(position) = bucket.parent_position(parent) else {
        return false;
    };
    let children = &mut bucket.parents[position].children;
    let from = children.iter().position(|c| c.id == child);
    let to = children.iter().position(|c| c.id == over);
    let (Some(from), Some(to)) = (from, to) else {
        return false;
    };
    relocate(children, from, to);
    true
}

/// Move the element at `from` so that it ends up at index `to`.
///
/// `to` is an index into the final list, so it is applied after the element
/// has been taken out.
pub(crate) fn relocate<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(debug_assertions)]
fn check_conserved(before: &Forest, after: &Forest, bucket: &str) {
    if let (Some(old), Some(new)) = (before.bucket(bucket), after.bucket(bucket)) {
        let mut old_ids = old.child_ids();
        let mut new_ids = new.child_ids();
        old_ids.sort_unstable();
        new_ids.sort_unstable();
        debug_assert_eq!(old_ids, new_ids, "move changed the set of children");
        debug_assert_eq!(old.parent_ids(), new.parent_ids(), "move changed parents");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ChildCategory, ParentCategory};

    fn id(raw: u128) -> Uuid {
        Uuid::from_u128(raw)
    }

    fn parent(raw: u128, children: &[u128]) -> ParentCategory {
        children.iter().fold(
            ParentCategory::new(id(raw), format!("Parent {raw}"), "#808080"),
            |parent, child| parent.with_child(ChildCategory::new(id(*child), format!("Child {child}"))),
        )
    }

    fn children(forest: &Forest, parent_id: u128) -> Vec<Uuid> {
        forest
            .bucket("expenses")
            .and_then(|bucket| bucket.parent(id(parent_id)))
            .map(ParentCategory::child_ids)
            .unwrap_or_default()
    }

    fn ids(raw: &[u128]) -> Vec<Uuid> {
        raw.iter().copied().map(id).collect()
    }

    fn forest() -> Forest {
        let mut forest = Forest::with_default_buckets();
        forest.insert_parent("expenses", parent(1, &[11, 12, 13, 14])).unwrap();
        forest.insert_parent("expenses", parent(2, &[22, 23, 24, 25])).unwrap();
        forest.insert_parent("expenses", parent(3, &[31])).unwrap();
        forest
    }

    #[test]
    fn relocate_moves_forward_and_backward() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        relocate(&mut items, 1, 3);
        assert_eq!(items, vec!['a', 'c', 'd', 'b']);
        relocate(&mut items, 3, 0);
        assert_eq!(items, vec!['b', 'a', 'c', 'd']);
        relocate(&mut items, 2, 2);
        assert_eq!(items, vec!['b', 'a', 'c', 'd']);
    }

    #[test]
    fn reorder_backward_takes_target_index() {
        let forest = forest();
        let next = apply_move(&forest, "expenses", MoveEvent::onto(id(14), id(12)));
        assert_eq!(children(&next, 1), ids(&[11, 14, 12, 13]));
    }

    #[test]
    fn drop_on_own_parent_sends_to_bottom() {
        let forest = forest();
        let next = apply_move(&forest, "expenses", MoveEvent::onto(id(11), id(1)));
        assert_eq!(children(&next, 1), ids(&[12, 13, 14, 11]));
    }

    #[test]
    fn drop_on_last_sibling_of_other_parent() {
        let forest = forest();
        let next = apply_move(&forest, "expenses", MoveEvent::onto(id(13), id(25)));
        assert_eq!(children(&next, 1), ids(&[11, 12, 14]));
        assert_eq!(children(&next, 2), ids(&[22, 23, 24, 13, 25]));
    }

    #[test]
    fn input_forest_is_left_untouched() {
        let forest = forest();
        let before = forest.clone();
        let next = apply_move(&forest, "expenses", MoveEvent::onto(id(31), id(1)));
        assert_eq!(forest, before);
        assert_ne!(next, before);
    }

    #[test]
    fn stale_kind_is_ignored() {
        let forest = forest();
        let kind = MoveKind::MoveBeforeSibling {
            from: id(1),
            to: id(2),
            child: id(31),
            before: id(22),
        };
        assert_eq!(apply(&forest, "expenses", &kind), forest);

        let kind = MoveKind::MoveToParentEnd {
            from: id(1),
            to: id(9),
            child: id(11),
        };
        assert_eq!(apply(&forest, "expenses", &kind), forest);
        assert_eq!(apply(&forest, "savings", &kind), forest);
    }

    #[test]
    fn other_buckets_are_not_touched() {
        let mut forest = forest();
        forest.insert_parent("income", parent(4, &[41, 42])).unwrap();
        let next = apply_move(&forest, "income", MoveEvent::onto(id(41), id(42)));
        assert_eq!(next.bucket("expenses"), forest.bucket("expenses"));
        assert_eq!(next.bucket("income").unwrap().child_ids(), ids(&[42, 41]));
    }
}
