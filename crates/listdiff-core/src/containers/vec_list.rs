use std::collections::HashSet;

use crate::fault::ListFault;
use crate::list::{Comparator, Element, ListContract, Transform};

/// Trusted reference container backed by `Vec<i32>`.
///
/// Every session uses this as its reference unless another reference
/// supplier is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecList {
    items: Vec<Element>,
}

impl VecList {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.items
    }
}

impl From<Vec<Element>> for VecList {
    fn from(items: Vec<Element>) -> Self {
        Self { items }
    }
}

impl ListContract for VecList {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn contains(&self, value: Element) -> bool {
        self.items.contains(&value)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        Box::new(self.items.iter().copied())
    }

    fn to_array(&self) -> Vec<Element> {
        self.items.clone()
    }

    fn to_array_into(&self, mut dest: Vec<Option<Element>>) -> Vec<Option<Element>> {
        if dest.len() < self.items.len() {
            return self.items.iter().copied().map(Some).collect();
        }
        for (slot, value) in dest.iter_mut().zip(&self.items) {
            *slot = Some(*value);
        }
        if let Some(terminator) = dest.get_mut(self.items.len()) {
            *terminator = None;
        }
        dest
    }

    fn add(&mut self, value: Element) -> bool {
        self.items.push(value);
        true
    }

    fn remove_element(&mut self, value: Element) -> bool {
        match self.items.iter().position(|item| *item == value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn contains_all(&self, other: &[Element]) -> bool {
        let present: HashSet<Element> = self.items.iter().copied().collect();
        other.iter().all(|value| present.contains(value))
    }

    fn add_all(&mut self, other: &[Element]) -> bool {
        self.items.extend_from_slice(other);
        !other.is_empty()
    }

    fn add_all_at(&mut self, index: usize, other: &[Element]) -> Result<bool, ListFault> {
        ListFault::check_position(index, self.items.len())?;
        self.items.splice(index..index, other.iter().copied());
        Ok(!other.is_empty())
    }

    fn remove_all(&mut self, other: &[Element]) -> bool {
        let doomed: HashSet<Element> = other.iter().copied().collect();
        let before = self.items.len();
        self.items.retain(|item| !doomed.contains(item));
        self.items.len() != before
    }

    fn retain_all(&mut self, other: &[Element]) -> bool {
        let kept: HashSet<Element> = other.iter().copied().collect();
        let before = self.items.len();
        self.items.retain(|item| kept.contains(item));
        self.items.len() != before
    }

    fn replace_all(&mut self, op: Transform) -> Result<(), ListFault> {
        for item in &mut self.items {
            *item = op(*item);
        }
        Ok(())
    }

    fn sort(&mut self, cmp: Comparator) -> Result<(), ListFault> {
        self.items.sort_by(cmp);
        Ok(())
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn get(&self, index: usize) -> Result<Element, ListFault> {
        ListFault::check_index(index, self.items.len())?;
        Ok(self.items[index])
    }

    fn set(&mut self, index: usize, value: Element) -> Result<Element, ListFault> {
        ListFault::check_index(index, self.items.len())?;
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    fn insert(&mut self, index: usize, value: Element) -> Result<(), ListFault> {
        ListFault::check_position(index, self.items.len())?;
        self.items.insert(index, value);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<Element, ListFault> {
        ListFault::check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    fn index_of(&self, value: Element) -> Option<usize> {
        self.items.iter().position(|item| *item == value)
    }

    fn last_index_of(&self, value: Element) -> Option<usize> {
        self.items.iter().rposition(|item| *item == value)
    }

    fn sub_list(&self, from: usize, to: usize) -> Result<Vec<Element>, ListFault> {
        if to > self.items.len() {
            return Err(ListFault::IndexOutOfBounds {
                index: to,
                len: self.items.len(),
            });
        }
        if from > to {
            return Err(ListFault::IllegalArgument(format!(
                "from index {from} > to index {to}"
            )));
        }
        Ok(self.items[from..to].to_vec())
    }
}
