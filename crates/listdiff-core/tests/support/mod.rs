//! Deliberately broken containers for exercising the harness.

#![allow(dead_code)]

use listdiff_core::list::{Comparator, Transform};
use listdiff_core::{Element, ListContract, ListFault, VecList};

/// Which defect a [`Mutant`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bug {
    None,
    /// `size` reports one less than the real length.
    SizeOffByOne,
    /// `remove_at` returns the element but never shifts the tail down.
    RemoveAtWithoutShift,
    /// Out-of-range `get` raises `IllegalArgument` instead of `IndexOutOfBounds`.
    WrongGetFault,
    /// `sort` panics.
    PanickingSort,
    /// `hash_code` is off by one.
    SkewedHash,
    /// `add` silently drops the element.
    LostAdd,
}

/// `VecList` with one injected defect.
#[derive(Debug, Clone)]
pub struct Mutant {
    inner: VecList,
    bug: Bug,
}

impl Mutant {
    pub fn new(bug: Bug) -> Self {
        Self {
            inner: VecList::new(),
            bug,
        }
    }
}

impl ListContract for Mutant {
    fn size(&self) -> usize {
        let len = self.inner.size();
        match self.bug {
            Bug::SizeOffByOne => len.saturating_sub(1),
            _ => len,
        }
    }

    fn contains(&self, value: Element) -> bool {
        self.inner.contains(value)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.inner.iter()
    }

    fn to_array(&self) -> Vec<Element> {
        self.inner.to_array()
    }

    fn to_array_into(&self, dest: Vec<Option<Element>>) -> Vec<Option<Element>> {
        self.inner.to_array_into(dest)
    }

    fn add(&mut self, value: Element) -> bool {
        match self.bug {
            Bug::LostAdd => true,
            _ => self.inner.add(value),
        }
    }

    fn remove_element(&mut self, value: Element) -> bool {
        self.inner.remove_element(value)
    }

    fn add_all(&mut self, other: &[Element]) -> bool {
        self.inner.add_all(other)
    }

    fn add_all_at(&mut self, index: usize, other: &[Element]) -> Result<bool, ListFault> {
        self.inner.add_all_at(index, other)
    }

    fn remove_all(&mut self, other: &[Element]) -> bool {
        self.inner.remove_all(other)
    }

    fn retain_all(&mut self, other: &[Element]) -> bool {
        self.inner.retain_all(other)
    }

    fn replace_all(&mut self, op: Transform) -> Result<(), ListFault> {
        self.inner.replace_all(op)
    }

    fn sort(&mut self, cmp: Comparator) -> Result<(), ListFault> {
        match self.bug {
            Bug::PanickingSort => panic!("sort is not implemented"),
            _ => ListContract::sort(&mut self.inner, cmp),
        }
    }

    fn hash_code(&self) -> i32 {
        let hash = self.inner.hash_code();
        match self.bug {
            Bug::SkewedHash => hash.wrapping_add(1),
            _ => hash,
        }
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn get(&self, index: usize) -> Result<Element, ListFault> {
        match self.bug {
            Bug::WrongGetFault if index >= self.inner.size() => {
                Err(ListFault::IllegalArgument(format!("bad index {index}")))
            }
            _ => self.inner.get(index),
        }
    }

    fn set(&mut self, index: usize, value: Element) -> Result<Element, ListFault> {
        self.inner.set(index, value)
    }

    fn insert(&mut self, index: usize, value: Element) -> Result<(), ListFault> {
        self.inner.insert(index, value)
    }

    fn remove_at(&mut self, index: usize) -> Result<Element, ListFault> {
        match self.bug {
            Bug::RemoveAtWithoutShift => self.inner.get(index),
            _ => self.inner.remove_at(index),
        }
    }

    fn index_of(&self, value: Element) -> Option<usize> {
        self.inner.index_of(value)
    }

    fn last_index_of(&self, value: Element) -> Option<usize> {
        self.inner.last_index_of(value)
    }

    fn sub_list(&self, from: usize, to: usize) -> Result<Vec<Element>, ListFault> {
        self.inner.sub_list(from, to)
    }
}
