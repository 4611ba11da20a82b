//! The list contract exercised by the harness.
//!
//! Any container implementing [`ListContract`] can be plugged in as either
//! the trusted reference or the candidate under test. Elements are `i32`.
//!
//! Fallible operations return [`ListFault`]; infallible ones return plain
//! values. Provided methods mirror the defaults a list interface usually
//! ships with, so a minimal implementation only has to supply the storage
//! primitives.

use std::cmp::Ordering;

use crate::fault::ListFault;

/// Element type stored by every container under test.
pub type Element = i32;

/// Natural-order comparator handed to [`ListContract::sort`].
pub type Comparator = fn(&Element, &Element) -> Ordering;

/// Element transform handed to [`ListContract::replace_all`].
pub type Transform = fn(Element) -> Element;

/// Traversal cursor without element-level equality.
///
/// The harness only checks that producing and driving a cursor does not
/// fail; its values are never compared across containers.
pub trait Cursor {
    /// Estimated number of elements left to visit.
    fn estimate_size(&self) -> usize;

    /// Advance by one element.
    fn try_advance(&mut self) -> Option<Element>;

    /// Drain the remaining elements, returning how many were visited.
    fn for_each_remaining(&mut self, mut action: impl FnMut(Element)) -> usize
    where
        Self: Sized,
    {
        let mut visited = 0;
        while let Some(value) = self.try_advance() {
            action(value);
            visited += 1;
        }
        visited
    }
}

/// Cursor over any boxed iterator; used by the provided [`ListContract::cursor`].
pub struct IterCursor<'a> {
    inner: Box<dyn Iterator<Item = Element> + 'a>,
    remaining: usize,
}

impl<'a> IterCursor<'a> {
    #[must_use]
    pub fn new(inner: Box<dyn Iterator<Item = Element> + 'a>, remaining: usize) -> Self {
        Self { inner, remaining }
    }
}

impl Cursor for IterCursor<'_> {
    fn estimate_size(&self) -> usize {
        self.remaining
    }

    fn try_advance(&mut self) -> Option<Element> {
        let next = self.inner.next();
        if next.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        next
    }
}

/// Sequence-container interface compared by the harness.
pub trait ListContract {
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn contains(&self, value: Element) -> bool;

    /// Lazy in-order traversal. Also used for post-call structural checks.
    fn iter(&self) -> Box<dyn Iterator<Item = Element> + '_>;

    fn to_array(&self) -> Vec<Element>;

    /// Copy the contents into `dest` when it is large enough, marking the slot
    /// after the last element as `None`; otherwise return a freshly sized array.
    fn to_array_into(&self, dest: Vec<Option<Element>>) -> Vec<Option<Element>>;

    /// Append; returns whether the list changed.
    fn add(&mut self, value: Element) -> bool;

    /// Remove the first occurrence of `value`; returns whether one was found.
    fn remove_element(&mut self, value: Element) -> bool;

    fn contains_all(&self, other: &[Element]) -> bool {
        other.iter().all(|value| self.contains(*value))
    }

    fn add_all(&mut self, other: &[Element]) -> bool;

    /// Insert all of `other` starting at `index` (`index <= size`).
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index > size`.
    fn add_all_at(&mut self, index: usize, other: &[Element]) -> Result<bool, ListFault>;

    fn remove_all(&mut self, other: &[Element]) -> bool;

    fn retain_all(&mut self, other: &[Element]) -> bool;

    /// Apply `op` to every element in place.
    ///
    /// # Errors
    ///
    /// Propagates faults from `get`/`set`.
    fn replace_all(&mut self, op: Transform) -> Result<(), ListFault> {
        for index in 0..self.size() {
            let current = self.get(index)?;
            self.set(index, op(current))?;
        }
        Ok(())
    }

    /// Stable sort by `cmp`.
    ///
    /// # Errors
    ///
    /// Propagates faults from `set`.
    fn sort(&mut self, cmp: Comparator) -> Result<(), ListFault> {
        let mut sorted = self.to_array();
        sorted.sort_by(cmp);
        for (index, value) in sorted.into_iter().enumerate() {
            self.set(index, value)?;
        }
        Ok(())
    }

    fn clear(&mut self);

    /// Ordered element-wise equality against another sequence.
    fn equals(&self, other: &[Element]) -> bool {
        self.size() == other.len() && self.iter().eq(other.iter().copied())
    }

    /// Order-sensitive hash: `h = 31 * h + e`, starting from `1`, wrapping.
    fn hash_code(&self) -> i32 {
        self.iter()
            .fold(1_i32, |h, e| h.wrapping_mul(31).wrapping_add(e))
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index >= size`.
    fn get(&self, index: usize) -> Result<Element, ListFault>;

    /// Replace the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index >= size`.
    fn set(&mut self, index: usize, value: Element) -> Result<Element, ListFault>;

    /// Insert at `index`, shifting trailing elements right.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index > size`.
    fn insert(&mut self, index: usize, value: Element) -> Result<(), ListFault>;

    /// Remove at `index`, shifting trailing elements left.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index >= size`.
    fn remove_at(&mut self, index: usize) -> Result<Element, ListFault>;

    fn index_of(&self, value: Element) -> Option<usize>;

    fn last_index_of(&self, value: Element) -> Option<usize>;

    fn list_iter(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.iter()
    }

    /// Traversal starting at `index` (`index <= size`).
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index > size`.
    fn list_iter_from(
        &self,
        index: usize,
    ) -> Result<Box<dyn Iterator<Item = Element> + '_>, ListFault> {
        ListFault::check_position(index, self.size())?;
        Ok(Box::new(self.iter().skip(index)))
    }

    /// Copy of the half-open range `[from, to)`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `to > size`, `IllegalArgument` when `from > to`.
    fn sub_list(&self, from: usize, to: usize) -> Result<Vec<Element>, ListFault>;

    fn cursor(&self) -> Box<dyn Cursor + '_> {
        Box::new(IterCursor::new(self.iter(), self.size()))
    }
}
