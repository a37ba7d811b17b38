//! Per-parent ordered sequences of child IDs.
//!
//! The order index knows nothing about records or back-references. Move
//! indices are clamped rather than rejected; `to` indices of a move are
//! interpreted against the sequence with the moved element already removed.

use crate::{
    domain::EntityId,
    error::{Result, TrellisError},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, hash::Hash};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize + Eq + Hash, C: Serialize",
    deserialize = "P: Deserialize<'de> + Eq + Hash, C: Deserialize<'de>"
))]
pub struct OrderIndex<P, C> {
    orders: HashMap<P, Vec<C>>,
}

impl<P, C> Default for OrderIndex<P, C> {
    fn default() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }
}

impl<P: Eq + Hash, C: PartialEq> PartialEq for OrderIndex<P, C> {
    fn eq(&self, other: &Self) -> bool {
        self.orders == other.orders
    }
}

impl<P: EntityId, C: EntityId> OrderIndex<P, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence for `parent`; returns false if one exists
    pub fn register(&mut self, parent: P) -> bool {
        if self.orders.contains_key(&parent) {
            return false;
        }
        self.orders.insert(parent, Vec::new());
        true
    }

    pub fn contains_parent(&self, parent: &P) -> bool {
        self.orders.contains_key(parent)
    }

    pub fn get_order(&self, parent: &P) -> Result<&[C]> {
        self.orders
            .get(parent)
            .map(Vec::as_slice)
            .ok_or_else(|| parent.not_found())
    }

    /// Position of `child` within `parent`, if present
    pub fn position(&self, parent: &P, child: &C) -> Result<Option<usize>> {
        Ok(self.get_order(parent)?.iter().position(|c| c == child))
    }

    /// Inserts `child` at `index`, clamped into `[0, len]`
    ///
    /// Returns the index actually used.
    pub fn insert_at(&mut self, parent: &P, child: C, index: usize) -> Result<usize> {
        let order = self.sequence_mut(parent)?;
        if order.contains(&child) {
            return Err(duplicate(parent, &child));
        }
        let index = index.min(order.len());
        order.insert(index, child);
        Ok(index)
    }

    /// Removes `child` from `parent`, returning the index it occupied
    pub fn remove_from(&mut self, parent: &P, child: &C) -> Result<usize> {
        let order = self.sequence_mut(parent)?;
        let index = order
            .iter()
            .position(|c| c == child)
            .ok_or_else(|| TrellisError::ChildNotInOrder {
                parent: parent.to_string(),
                child: child.to_string(),
            })?;
        order.remove(index);
        Ok(index)
    }

    /// Moves the element at `from` so that it ends up at index `to`
    ///
    /// `[A, B, C, D]` with `from = 0, to = 2` yields `[B, C, A, D]`. Returns
    /// the moved child, or `None` when nothing moved: the sequence is empty or
    /// both indices clamp to the same slot.
    pub fn move_within(&mut self, parent: &P, from: usize, to: usize) -> Result<Option<C>> {
        let order = self.sequence_mut(parent)?;
        let Some(last) = order.len().checked_sub(1) else {
            return Ok(None);
        };
        let (from, to) = (from.min(last), to.min(last));
        if from == to {
            return Ok(None);
        }
        let child = order.remove(from);
        order.insert(to, child);
        Ok(Some(child))
    }

    /// Moves the element at `from` in `from_parent` to `to` in `to_parent`
    ///
    /// Both parents are validated before anything changes. Returns the moved
    /// child, or `None` when nothing moved.
    pub fn move_across(
        &mut self,
        from_parent: &P,
        to_parent: &P,
        from: usize,
        to: usize,
    ) -> Result<Option<C>> {
        if from_parent == to_parent {
            return self.move_within(from_parent, from, to);
        }

        let destination = self.get_order(to_parent)?;
        let source = self.get_order(from_parent)?;
        let Some(last) = source.len().checked_sub(1) else {
            return Ok(None);
        };
        let child = source[from.min(last)];
        if destination.contains(&child) {
            return Err(duplicate(to_parent, &child));
        }

        self.remove_from(from_parent, &child)?;
        self.insert_at(to_parent, child, to)?;
        Ok(Some(child))
    }

    /// Drops the whole sequence of `parent`, returning its children in order
    pub fn remove_parent(&mut self, parent: &P) -> Result<Vec<C>> {
        self.orders.remove(parent).ok_or_else(|| parent.not_found())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&P, &[C])> {
        self.orders.iter().map(|(p, c)| (p, c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn sequence_mut(&mut self, parent: &P) -> Result<&mut Vec<C>> {
        self.orders
            .get_mut(parent)
            .ok_or_else(|| parent.not_found())
    }
}

fn duplicate<P: EntityId, C: EntityId>(parent: &P, child: &C) -> TrellisError {
    TrellisError::DuplicateId {
        parent: parent.to_string(),
        child: child.to_string(),
    }
}
