//! Array-backed binary heap with in-place key updates.
//!
//! The heap is generic over its payload and is parameterised by injected
//! capabilities:
//!
//! - a value function producing the scalar the heap is ordered by,
//! - an identity function used to re-locate a payload after its value changed,
//! - a [`Comparator`] over two payloads (by default [`MinFirst`] on the value).
//!
//! The identity must be stable (a node id, for example) and must never depend
//! on the ordering value. Every payload's array slot is tracked by identity, so
//! locating an element for a key update is a hash lookup rather than a scan.
//!
//! Element `i` has its parent at `(i - 1) / 2` and its children at `2i + 1`
//! and `2i + 2`. For every non-root element the comparator applied to
//! `(parent, element)` is `false`.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::trace;

/// Ordering predicate over two queued payloads.
///
/// `out_of_order(value_of, upper, lower)` is `true` when `upper` must move
/// below `lower`. Any `Fn(&T, &T) -> bool` closure is a comparator and sees
/// the payloads directly; [`MinFirst`] and [`MaxFirst`] order by the heap's
/// value function.
pub trait Comparator<T, V> {
    fn out_of_order(&self, value_of: &V, upper: &T, lower: &T) -> bool;
}

impl<T, V, F> Comparator<T, V> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn out_of_order(&self, _value_of: &V, upper: &T, lower: &T) -> bool {
        self(upper, lower)
    }
}

/// Default comparator: smallest value at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinFirst;

impl<T, V> Comparator<T, V> for MinFirst
where
    V: Fn(&T) -> f64,
{
    fn out_of_order(&self, value_of: &V, upper: &T, lower: &T) -> bool {
        value_of(upper) > value_of(lower)
    }
}

/// Largest value at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFirst;

impl<T, V> Comparator<T, V> for MaxFirst
where
    V: Fn(&T) -> f64,
{
    fn out_of_order(&self, value_of: &V, upper: &T, lower: &T) -> bool {
        value_of(upper) < value_of(lower)
    }
}

/// Direction used by [`Heap::reconstruct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sift {
    /// Move the element towards the root. Use after a change that makes it
    /// due for extraction sooner (a smaller value in a min-heap).
    Up,
    /// Move the element towards the leaves. Use after the opposite change.
    Down,
}

pub struct Heap<T, K, V, I, C = MinFirst> {
    entries: Vec<T>,
    slots: HashMap<K, usize>,
    value_of: V,
    identity_of: I,
    comparator: C,
}

impl<T, K, V, I> Heap<T, K, V, I>
where
    K: Eq + Hash,
    V: Fn(&T) -> f64,
    I: Fn(&T) -> K,
{
    /// Min-heap ordered by `value_of`.
    pub fn new(value_of: V, identity_of: I) -> Self {
        Self::with_comparator(value_of, identity_of, MinFirst)
    }
}

impl<T, K, V, I, C> Heap<T, K, V, I, C>
where
    K: Eq + Hash,
    V: Fn(&T) -> f64,
    I: Fn(&T) -> K,
    C: Comparator<T, V>,
{
    pub fn with_comparator(value_of: V, identity_of: I, comparator: C) -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
            value_of,
            identity_of,
            comparator,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The element that [`pop`](Self::pop) would return next.
    pub fn peek(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: &K) -> Option<&T> {
        self.slots.get(id).map(|&slot| &self.entries[slot])
    }

    /// Elements in array order (root first).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Insert `item` at the tail and sift it towards the root.
    ///
    /// Returns `false` and drops `item` when an element with the same identity
    /// is already queued.
    pub fn push(&mut self, item: T) -> bool {
        let id = (self.identity_of)(&item);
        if self.slots.contains_key(&id) {
            trace!("heap already holds an element with this identity");
            return false;
        }

        let slot = self.entries.len();
        self.slots.insert(id, slot);
        self.entries.push(item);
        self.sift_up(slot);
        true
    }

    /// Remove and return the root element.
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        self.swap(0, last);
        let item = self.entries.pop()?;
        self.slots.remove(&(self.identity_of)(&item));

        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    /// Mutable access to a queued element.
    ///
    /// Changing the element's value breaks heap order until
    /// [`reconstruct`](Self::reconstruct) or [`restore`](Self::restore) is
    /// called for it. The identity must not change.
    pub fn get_mut(&mut self, id: &K) -> Option<&mut T> {
        let slot = *self.slots.get(id)?;
        Some(&mut self.entries[slot])
    }

    /// Re-heapify from the element identified by `id` in the given direction.
    ///
    /// The caller picks the direction. Picking the wrong one leaves the heap
    /// out of order with no detection. Returns `false` when no element with
    /// that identity is queued.
    pub fn reconstruct(&mut self, id: &K, sift: Sift) -> bool {
        let Some(&slot) = self.slots.get(id) else {
            trace!("reconstruct found no element with this identity");
            return false;
        };

        match sift {
            Sift::Up => self.sift_up(slot),
            Sift::Down => self.sift_down(slot),
        }
        true
    }

    /// Re-heapify from the element identified by `id`, choosing the direction
    /// from the comparator.
    pub fn restore(&mut self, id: &K) -> bool {
        let Some(&slot) = self.slots.get(id) else {
            trace!("restore found no element with this identity");
            return false;
        };
        self.restore_at(slot);
        true
    }

    /// Mutate the element identified by `id` through `f` and restore heap
    /// order. This is the decrease-key (and increase-key) operation.
    pub fn update<F>(&mut self, id: &K, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(&slot) = self.slots.get(id) else {
            trace!("update found no element with this identity");
            return false;
        };

        f(&mut self.entries[slot]);
        debug_assert!(
            (self.identity_of)(&self.entries[slot]) == *id,
            "heap element identity changed during update"
        );
        self.restore_at(slot);
        true
    }

    /// `true` when no parent/child pair is out of order.
    pub fn is_valid(&self) -> bool {
        (1..self.entries.len()).all(|slot| !self.is_out_of_order(parent(slot), slot))
    }

    fn restore_at(&mut self, slot: usize) {
        if slot > 0 && self.is_out_of_order(parent(slot), slot) {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
    }

    fn is_out_of_order(&self, upper: usize, lower: usize) -> bool {
        self.comparator
            .out_of_order(&self.value_of, &self.entries[upper], &self.entries[lower])
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = parent(slot);
            if !self.is_out_of_order(parent, slot) {
                break;
            }
            self.swap(parent, slot);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let child = match (left < len, right < len) {
                (false, false) => break,
                (true, false) => left,
                // The right child only loses when it is strictly out of order
                // against the left one.
                (true, true) => {
                    if self.is_out_of_order(right, left) {
                        left
                    } else {
                        right
                    }
                }
                (false, true) => unreachable!(
                    "heap shape violated: right child {right} exists without left child {left}"
                ),
            };

            if !self.is_out_of_order(slot, child) {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        self.slots.insert((self.identity_of)(&self.entries[a]), a);
        self.slots.insert((self.identity_of)(&self.entries[b]), b);
    }
}

fn parent(slot: usize) -> usize {
    (slot - 1) / 2
}

impl<T: fmt::Debug, K, V, I, C> fmt::Debug for Heap<T, K, V, I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
