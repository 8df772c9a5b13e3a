extern crate alloc;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// Ordering strategy for a [`PQueue`].
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// A lazily sorted queue that hands out its maximum element first.
///
/// Pushes only append. The contents are sorted ascending under the
/// comparator the next time an ordered read (`pop`, `peek`, `sort`) needs
/// them, so the maximum sits at the tail. Sorting is stable; ties keep
/// their relative order but callers should not depend on that.
#[derive(Debug, Clone)]
pub struct PQueue<T> {
    contents: Vec<T>,
    sorted: bool,
    comparator: Comparator<T>,
}

impl<T> PQueue<T> {
    pub fn new(comparator: Comparator<T>) -> Self {
        Self {
            contents: Vec::new(),
            sorted: true,
            comparator,
        }
    }

    pub fn with_capacity(capacity: usize, comparator: Comparator<T>) -> Self {
        Self {
            contents: Vec::with_capacity(capacity),
            sorted: true,
            comparator,
        }
    }

    pub fn push(&mut self, item: T) {
        self.contents.push(item);
        self.sorted = false;
    }

    /// Remove and return the maximum element.
    pub fn pop(&mut self) -> Option<T> {
        self.sort();
        self.contents.pop()
    }

    /// Element at `index` in ascending order.
    pub fn peek(&mut self, index: usize) -> Option<&T> {
        self.sort();
        self.contents.get(index)
    }

    /// The maximum element, without removing it.
    pub fn peek_max(&mut self) -> Option<&T> {
        self.sort();
        self.contents.last()
    }

    /// Sort ascending under the comparator if a push invalidated the order.
    pub fn sort(&mut self) {
        if !self.sorted {
            self.contents.sort_by(self.comparator);
            self.sorted = true;
        }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Elements in their current order, which is ascending only if no
    /// push happened since the last sort.
    pub fn as_slice(&self) -> &[T] {
        &self.contents
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.contents.iter()
    }

    /// Pop every element, maximum first.
    pub fn drain_max_first(&mut self) -> impl Iterator<Item = T> + '_ {
        self.sort();
        self.contents.drain(..).rev()
    }
}
