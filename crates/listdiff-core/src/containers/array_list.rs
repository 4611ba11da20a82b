use std::collections::HashSet;

use crate::fault::ListFault;
use crate::list::{Element, ListContract};

const DEFAULT_CAPACITY: usize = 10;

/// Hand-rolled growable array.
///
/// Manages its own slot buffer and shifting, growing by half its capacity
/// when full. Behaviourally identical to [`VecList`](super::VecList), which
/// makes it the stock "correct candidate" for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct ArrayList {
    slots: Box<[Element]>,
    len: usize,
}

impl ArrayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn live(&self) -> &[Element] {
        &self.slots[..self.len]
    }

    fn ensure_capacity(&mut self, needed: usize) {
        if needed <= self.slots.len() {
            return;
        }
        let grown = self.slots.len() + self.slots.len() / 2;
        let capacity = needed.max(grown).max(DEFAULT_CAPACITY);
        let mut slots = vec![0; capacity].into_boxed_slice();
        slots[..self.len].copy_from_slice(self.live());
        self.slots = slots;
    }

    /// Keep only the elements matching `keep`, compacting in place.
    fn compact(&mut self, keep: impl Fn(Element) -> bool) -> bool {
        let mut write = 0;
        for read in 0..self.len {
            let value = self.slots[read];
            if keep(value) {
                self.slots[write] = value;
                write += 1;
            }
        }
        let changed = write != self.len;
        self.len = write;
        changed
    }
}

impl From<Vec<Element>> for ArrayList {
    fn from(items: Vec<Element>) -> Self {
        let len = items.len();
        Self {
            slots: items.into_boxed_slice(),
            len,
        }
    }
}

impl ListContract for ArrayList {
    fn size(&self) -> usize {
        self.len
    }

    fn contains(&self, value: Element) -> bool {
        self.index_of(value).is_some()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        Box::new(self.live().iter().copied())
    }

    fn to_array(&self) -> Vec<Element> {
        self.live().to_vec()
    }

    fn to_array_into(&self, mut dest: Vec<Option<Element>>) -> Vec<Option<Element>> {
        if dest.len() < self.len {
            return self.live().iter().copied().map(Some).collect();
        }
        for index in 0..self.len {
            dest[index] = Some(self.slots[index]);
        }
        if dest.len() > self.len {
            dest[self.len] = None;
        }
        dest
    }

    fn add(&mut self, value: Element) -> bool {
        self.ensure_capacity(self.len + 1);
        self.slots[self.len] = value;
        self.len += 1;
        true
    }

    fn remove_element(&mut self, value: Element) -> bool {
        self.index_of(value)
            .is_some_and(|index| self.remove_at(index).is_ok())
    }

    fn contains_all(&self, other: &[Element]) -> bool {
        let present: HashSet<Element> = self.live().iter().copied().collect();
        other.iter().all(|value| present.contains(value))
    }

    fn add_all(&mut self, other: &[Element]) -> bool {
        self.ensure_capacity(self.len + other.len());
        self.slots[self.len..self.len + other.len()].copy_from_slice(other);
        self.len += other.len();
        !other.is_empty()
    }

    fn add_all_at(&mut self, index: usize, other: &[Element]) -> Result<bool, ListFault> {
        ListFault::check_position(index, self.len)?;
        let moved = other.len();
        self.ensure_capacity(self.len + moved);
        self.slots.copy_within(index..self.len, index + moved);
        self.slots[index..index + moved].copy_from_slice(other);
        self.len += moved;
        Ok(moved != 0)
    }

    fn remove_all(&mut self, other: &[Element]) -> bool {
        let doomed: HashSet<Element> = other.iter().copied().collect();
        self.compact(|value| !doomed.contains(&value))
    }

    fn retain_all(&mut self, other: &[Element]) -> bool {
        let kept: HashSet<Element> = other.iter().copied().collect();
        self.compact(|value| kept.contains(&value))
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn get(&self, index: usize) -> Result<Element, ListFault> {
        ListFault::check_index(index, self.len)?;
        Ok(self.slots[index])
    }

    fn set(&mut self, index: usize, value: Element) -> Result<Element, ListFault> {
        ListFault::check_index(index, self.len)?;
        Ok(std::mem::replace(&mut self.slots[index], value))
    }

    fn insert(&mut self, index: usize, value: Element) -> Result<(), ListFault> {
        ListFault::check_position(index, self.len)?;
        self.ensure_capacity(self.len + 1);
        self.slots.copy_within(index..self.len, index + 1);
        self.slots[index] = value;
        self.len += 1;
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<Element, ListFault> {
        ListFault::check_index(index, self.len)?;
        let removed = self.slots[index];
        self.slots.copy_within(index + 1..self.len, index);
        self.len -= 1;
        Ok(removed)
    }

    fn index_of(&self, value: Element) -> Option<usize> {
        self.live().iter().position(|item| *item == value)
    }

    fn last_index_of(&self, value: Element) -> Option<usize> {
        self.live().iter().rposition(|item| *item == value)
    }

    fn sub_list(&self, from: usize, to: usize) -> Result<Vec<Element>, ListFault> {
        if to > self.len {
            return Err(ListFault::IndexOutOfBounds {
                index: to,
                len: self.len,
            });
        }
        if from > to {
            return Err(ListFault::IllegalArgument(format!(
                "from index {from} > to index {to}"
            )));
        }
        Ok(self.slots[from..to].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_past_initial_capacity() {
        let mut list = ArrayList::with_capacity(2);
        for value in 0..25 {
            assert!(list.add(value));
        }
        assert_eq!(list.size(), 25);
        assert!(list.capacity() >= 25);
        assert_eq!(list.to_array(), (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn insert_and_remove_shift_tail() {
        let mut list = ArrayList::new();
        list.add_all(&[1, 2, 3, 4]);
        list.insert(2, 9).expect("insert");
        assert_eq!(list.to_array(), vec![1, 2, 9, 3, 4]);
        assert_eq!(list.remove_at(1), Ok(2));
        assert_eq!(list.to_array(), vec![1, 9, 3, 4]);
        assert_eq!(list.add_all_at(4, &[7, 8]), Ok(true));
        assert_eq!(list.to_array(), vec![1, 9, 3, 4, 7, 8]);
        assert_eq!(list.add_all_at(1, &[0]), Ok(true));
        assert_eq!(list.to_array(), vec![1, 0, 9, 3, 4, 7, 8]);
    }

    #[test]
    fn compaction_keeps_order() {
        let mut list = ArrayList::new();
        list.add_all(&[5, 1, 5, 2, 5]);
        assert!(list.remove_all(&[5]));
        assert_eq!(list.to_array(), vec![1, 2]);
        assert!(list.retain_all(&[2, 3]));
        assert_eq!(list.to_array(), vec![2]);
    }

    #[test]
    fn clear_then_reuse() {
        let mut list = ArrayList::new();
        list.add_all(&[1, 2, 3]);
        list.clear();
        assert!(list.is_empty());
        assert!(list.get(0).is_err());
        list.add(4);
        assert_eq!(list.to_array(), vec![4]);
    }

    #[test]
    fn remove_element_first_occurrence() {
        let mut list = ArrayList::new();
        list.add_all(&[3, 4, 3]);
        assert!(list.remove_element(3));
        assert_eq!(list.to_array(), vec![4, 3]);
        assert!(!list.remove_element(10));
    }
}
