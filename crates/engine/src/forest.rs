//! The category forest: buckets of parent categories, each owning an ordered
//! list of child categories.
//!
//! A [`Forest`] is a plain value. Moves produce a new value (see
//! [`crate::apply_move`]) and never touch the one they were given, so a
//! snapshot held by a renderer stays valid while the board moves on.
//!
//! Nodes enter and leave the forest only through the lifecycle operations on
//! [`Forest`] (`insert_*` / `remove_*`), which check the id invariants. The
//! move path assumes a valid forest and checks nothing.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{normalize_display, normalize_key, normalize_optional_text},
};

/// Buckets created for a brand new forest.
pub const DEFAULT_BUCKETS: [&str; 3] = ["expenses", "income", "other"];

/// A subcategory. This is the unit that gets dragged around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildCategory {
    /// Stable identifier, unique across the whole forest.
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl ChildCategory {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A top-level category owning an ordered list of subcategories.
///
/// The order of `children` is display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentCategory {
    pub id: Uuid,
    pub name: String,
    /// Display color, kept as the renderer sent it (e.g. `#ff8800`).
    pub color: String,
    pub children: Vec<ChildCategory>,
}

impl ParentCategory {
    pub fn new(id: Uuid, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ChildCategory) -> Self {
        self.children.push(child);
        self
    }

    pub fn child_position(&self, id: Uuid) -> Option<usize> {
        self.children.iter().position(|child| child.id == id)
    }

    pub fn child_ids(&self) -> Vec<Uuid> {
        self.children.iter().map(|child| child.id).collect()
    }
}

/// Where a child sits inside a bucket, as positions into
/// [`Bucket::parents`] and [`ParentCategory::children`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildLocation {
    pub parent: usize,
    pub index: usize,
}

/// A named partition of the forest (e.g. expenses, income).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    key: String,
    name: String,
    pub(crate) parents: Vec<ParentCategory>,
}

impl Bucket {
    /// Normalized bucket name used for lookups.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name as it was given when the bucket was created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parents in their fixed display order.
    pub fn parents(&self) -> &[ParentCategory] {
        &self.parents
    }

    pub fn parent(&self, id: Uuid) -> Option<&ParentCategory> {
        self.parents.iter().find(|parent| parent.id == id)
    }

    pub fn parent_position(&self, id: Uuid) -> Option<usize> {
        self.parents.iter().position(|parent| parent.id == id)
    }

    pub fn locate_child(&self, id: Uuid) -> Option<ChildLocation> {
        self.parents
            .iter()
            .enumerate()
            .find_map(|(parent, category)| {
                category
                    .child_position(id)
                    .map(|index| ChildLocation { parent, index })
            })
    }

    pub fn parent_ids(&self) -> Vec<Uuid> {
        self.parents.iter().map(|parent| parent.id).collect()
    }

    /// Every child id in display order, parent by parent.
    pub fn child_ids(&self) -> Vec<Uuid> {
        self.parents
            .iter()
            .flat_map(|parent| parent.children.iter().map(|child| child.id))
            .collect()
    }

    fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.parents.iter().flat_map(|parent| {
            std::iter::once(parent.id).chain(parent.children.iter().map(|child| child.id))
        })
    }
}

/// All buckets of categories at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Forest {
    buckets: Vec<Bucket>,
}

impl Forest {
    /// An empty forest with no buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty forest with the [`DEFAULT_BUCKETS`].
    pub fn with_default_buckets() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS
                .iter()
                .map(|key| Bucket {
                    key: (*key).to_string(),
                    name: (*key).to_string(),
                    parents: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Look a bucket up by name. The name is normalized first, so
    /// `"Expenses"` finds `"expenses"`.
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        let key = normalize_key(name)?;
        self.buckets.iter().find(|bucket| bucket.key == key)
    }

    pub(crate) fn bucket_mut(&mut self, name: &str) -> Option<&mut Bucket> {
        let key = normalize_key(name)?;
        self.buckets.iter_mut().find(|bucket| bucket.key == key)
    }

    fn bucket_mut_or_err(&mut self, name: &str) -> ResultEngine<&mut Bucket> {
        self.bucket_mut(name)
            .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))
    }

    /// Returns `true` if `id` names a parent or a child in any bucket.
    pub fn contains_id(&self, id: Uuid) -> bool {
        self.buckets.iter().any(|bucket| bucket.ids().any(|v| v == id))
    }

    /// Add an empty bucket at the end and return its key. `name` is kept as
    /// is for display, lookups go through the normalized key.
    pub fn insert_bucket(&mut self, name: &str) -> ResultEngine<String> {
        let key = normalize_key(name).ok_or_else(|| {
            EngineError::InvalidName("bucket name must contain letters or digits".to_string())
        })?;
        if self.buckets.iter().any(|bucket| bucket.key == key) {
            return Err(EngineError::ExistingKey(key));
        }
        self.buckets.push(Bucket {
            key: key.clone(),
            name: name.to_string(),
            parents: Vec::new(),
        });
        Ok(key)
    }

    /// Append a parent (with whatever children it carries) to a bucket.
    pub fn insert_parent(&mut self, bucket: &str, mut parent: ParentCategory) -> ResultEngine<()> {
        parent.name = normalize_display(&parent.name, "parent")?;
        for child in &mut parent.children {
            normalize_child(child)?;
        }
        self.restore_parent(bucket, parent)
    }

    /// Append a parent read back from storage.
    ///
    /// Ids are checked like [`Forest::insert_parent`], but names and
    /// descriptions are kept exactly as stored.
    pub fn restore_parent(&mut self, bucket: &str, parent: ParentCategory) -> ResultEngine<()> {
        let mut incoming = HashSet::new();
        for id in std::iter::once(parent.id).chain(parent.children.iter().map(|c| c.id)) {
            if !incoming.insert(id) || self.contains_id(id) {
                return Err(EngineError::ExistingKey(id.to_string()));
            }
        }

        self.bucket_mut_or_err(bucket)?.parents.push(parent);
        Ok(())
    }

    /// Append a child to the end of a parent's list.
    pub fn insert_child(
        &mut self,
        bucket: &str,
        parent_id: Uuid,
        mut child: ChildCategory,
    ) -> ResultEngine<()> {
        normalize_child(&mut child)?;
        if self.contains_id(child.id) {
            return Err(EngineError::ExistingKey(child.id.to_string()));
        }
        let parent = self
            .bucket_mut_or_err(bucket)?
            .parents
            .iter_mut()
            .find(|parent| parent.id == parent_id)
            .ok_or_else(|| EngineError::KeyNotFound(parent_id.to_string()))?;
        parent.children.push(child);
        Ok(())
    }

    /// Remove a parent together with its children.
    pub fn remove_parent(&mut self, bucket: &str, id: Uuid) -> ResultEngine<ParentCategory> {
        let bucket = self.bucket_mut_or_err(bucket)?;
        let position = bucket
            .parent_position(id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        Ok(bucket.parents.remove(position))
    }

    pub fn remove_child(&mut self, bucket: &str, id: Uuid) -> ResultEngine<ChildCategory> {
        let bucket = self.bucket_mut_or_err(bucket)?;
        let location = bucket
            .locate_child(id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        Ok(bucket.parents[location.parent]
            .children
            .remove(location.index))
    }

    /// Check that no id is used twice anywhere in the forest, whether as a
    /// parent, a child, or one of each.
    pub fn validate(&self) -> ResultEngine<()> {
        let mut seen = HashSet::new();
        for bucket in &self.buckets {
            for id in bucket.ids() {
                if !seen.insert(id) {
                    return Err(EngineError::DuplicateId(format!(
                        "{id} in bucket '{}'",
                        bucket.key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn normalize_child(child: &mut ChildCategory) -> ResultEngine<()> {
    child.name = normalize_display(&child.name, "child")?;
    child.description = normalize_optional_text(child.description.as_deref());
    Ok(())
}
