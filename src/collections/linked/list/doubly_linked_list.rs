use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, Mul};

use log::trace;

use super::{Iter, IterMut, Node, NodePtr};
#[doc(inline)]
pub use crate::util::error::CapacityOverflow;
use crate::util::length::{Length, ONE};
use crate::util::result::ResultExtension;

/// A list with links in both directions, supporting whole-list concatenation (`+`) and
/// intersection by equality (`*`).
///
/// Every combinator that takes its operands by reference allocates brand new nodes holding clones
/// of the operands' elements, so the operands remain valid and independent afterwards. Taking the
/// operands by value instead splices the existing nodes together without cloning.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DoublyLinkedList.
/// - `m`: The number of items in the second DoublyLinkedList.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)` |
/// | `pop_front/back` | `O(1)` |
/// | `append` | `O(1)` |
/// | `clear` | `O(n)` |
/// | `concat` | `O(n+m)` |
/// | `intersect_by_equality` | `O(n*m)` |
/// | `contains` | `O(n)` |
pub struct DoublyLinkedList<T> {
    pub(crate) state: ListState<T>,
    pub(crate) _phantom: PhantomData<T>,
}

#[derive(Default)]
pub(crate) enum ListState<T> {
    #[default]
    Empty,
    Full(ListContents<T>),
}

use ListState::*;

pub(crate) struct ListContents<T> {
    pub len: Length,
    pub head: NodePtr<T>,
    pub tail: NodePtr<T>,
}

impl<T> DoublyLinkedList<T> {
    /// Creates a new DoublyLinkedList with no elements.
    pub const fn new() -> DoublyLinkedList<T> {
        DoublyLinkedList {
            state: Empty,
            _phantom: PhantomData,
        }
    }

    /// Returns the length of the DoublyLinkedList.
    pub const fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if the DoublyLinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, Empty)
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub fn front(&self) -> Option<&T> {
        match &self.state {
            Empty => None,
            Full(ListContents { head, .. }) => Some(head.value()),
        }
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub fn back(&self) -> Option<&T> {
        match &self.state {
            Empty => None,
            Full(ListContents { tail, .. }) => Some(tail.value()),
        }
    }

    /// Add the provided element to the front of the DoublyLinkedList.
    pub fn push_front(&mut self, value: T) {
        match &mut self.state {
            Empty => self.state = ListState::single(value),
            Full(contents) => contents.push_front(value),
        }
    }

    /// Add the provided element to the back of the DoublyLinkedList.
    ///
    /// # Panics
    /// Panics if the length of the list would overflow a [`usize`].
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::linked::DoublyLinkedList;
    /// let mut list = DoublyLinkedList::new();
    /// list.push_back(1);
    /// list.push_back(2);
    /// assert_eq!(list.back(), Some(&2));
    /// assert_eq!(list.len(), 2);
    /// ```
    pub fn push_back(&mut self, value: T) {
        match &mut self.state {
            Empty => self.state = ListState::single(value),
            Full(contents) => contents.push_back(value),
        }
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        match &mut self.state {
            Empty => None,
            Full(ListContents { len, head, .. }) => {
                // SAFETY: The head node is unlinked below, so the pointer isn't used again.
                let node = unsafe { head.take_node() };

                match len.checked_sub(1) {
                    Some(new_len) => {
                        // SAFETY: Previous length is greater than 1, so the first element is
                        // followed by at least one more.
                        let new_head = unsafe { node.next.unwrap_unchecked() };
                        *head = new_head;
                        *new_head.prev_mut() = None;
                        *len = new_len;
                    },
                    None => self.state = Empty,
                }

                Some(node.value)
            },
        }
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        match &mut self.state {
            Empty => None,
            Full(ListContents { len, tail, .. }) => {
                // SAFETY: The tail node is unlinked below, so the pointer isn't used again.
                let node = unsafe { tail.take_node() };

                match len.checked_sub(1) {
                    Some(new_len) => {
                        // SAFETY: Previous length is greater than 1, so the last element is
                        // preceded by at least one more.
                        let new_tail = unsafe { node.prev.unwrap_unchecked() };
                        *tail = new_tail;
                        *new_tail.next_mut() = None;
                        *len = new_len;
                    },
                    None => self.state = Empty,
                }

                Some(node.value)
            },
        }
    }

    /// Drops every element in the list, releasing the nodes in order from front to back.
    pub fn clear(&mut self) {
        trace!("Clearing DoublyLinkedList with {} nodes", self.len());
        if let Full(contents) = mem::take(&mut self.state) {
            contents.release();
        }
    }

    /// Moves every node of `other` onto the back of self, without cloning or reallocating any
    /// elements.
    ///
    /// # Panics
    /// Panics if the combined length would overflow a [`usize`].
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::linked::DoublyLinkedList;
    /// let mut list = DoublyLinkedList::from_iter([1, 2]);
    /// list.append(DoublyLinkedList::from_iter([3, 4]));
    /// assert_eq!(list, DoublyLinkedList::from_iter(1..=4));
    /// ```
    pub fn append(&mut self, mut other: DoublyLinkedList<T>) {
        // Take other's nodes so that dropping it doesn't release them.
        let other_state = mem::take(&mut other.state);

        match &mut self.state {
            Empty => self.state = other_state,
            Full(self_contents) => match other_state {
                Empty => {},
                Full(other_contents) => {
                    self_contents.len = self_contents.len
                        .checked_add(other_contents.len.get())
                        .ok_or(CapacityOverflow).throw();

                    *self_contents.tail.next_mut() = Some(other_contents.head);
                    *other_contents.head.prev_mut() = Some(self_contents.tail);
                    self_contents.tail = other_contents.tail;
                },
            },
        }
    }

    /// Returns an iterator over references to the elements of the list, from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    /// Returns an iterator over mutable references to the elements of the list.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }
}

impl<T: Clone> DoublyLinkedList<T> {
    /// Creates a new list holding clones of every element of self followed by clones of every
    /// element of `other`. Neither list is modified. This is the same operation as `&self +
    /// other`.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::linked::DoublyLinkedList;
    /// let a = DoublyLinkedList::from_iter([1, 2, 2, 3]);
    /// let b = DoublyLinkedList::from_iter([2, 3, 3]);
    /// assert_eq!(a.concat(&b), DoublyLinkedList::from_iter([1, 2, 2, 3, 2, 3, 3]));
    /// assert_eq!(a.len(), 4);
    /// ```
    pub fn concat(&self, other: &DoublyLinkedList<T>) -> DoublyLinkedList<T> {
        self.iter().chain(other.iter()).cloned().collect()
    }
}

impl<T: PartialEq + Clone> DoublyLinkedList<T> {
    /// Creates a new list by pairing every element of self with every element of `other`, adding a
    /// clone of the element from self once for each pair that compares equal. Elements of self are
    /// visited in order, and for each one, all elements of `other` are visited in order. This is
    /// the same operation as `&self * other`.
    ///
    /// This is **not** a set intersection. If a value appears `m` times in self and `n` times in
    /// `other`, it appears `m * n` times in the result, and no duplicates are collapsed.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::linked::DoublyLinkedList;
    /// let a = DoublyLinkedList::from_iter([1, 2, 2, 3]);
    /// let b = DoublyLinkedList::from_iter([2, 3, 3]);
    /// assert_eq!(
    ///     a.intersect_by_equality(&b),
    ///     DoublyLinkedList::from_iter([2, 2, 3, 3])
    /// );
    /// ```
    pub fn intersect_by_equality(&self, other: &DoublyLinkedList<T>) -> DoublyLinkedList<T> {
        let mut result = DoublyLinkedList::new();
        for a in self.iter() {
            for b in other.iter() {
                if a == b {
                    result.push_back(a.clone());
                }
            }
        }
        result
    }
}

impl<T: PartialEq> DoublyLinkedList<T> {
    /// Returns true if any element of the list is equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|i| i == item)
    }
}

impl<T> DoublyLinkedList<T> {
    #[cfg(test)]
    pub(crate) fn verify_double_links(&self) {
        match &self.state {
            Empty => {},
            Full(ListContents { len, head, tail }) => {
                assert!(head.prev().is_none());
                assert!(tail.next().is_none());

                let mut curr = *head;
                let mut count = 1;
                while let Some(next) = curr.next() {
                    assert!(*next.prev() == Some(curr));
                    curr = *next;
                    count += 1;
                }
                assert!(*tail == curr);
                assert_eq!(count, len.get());
            },
        }
    }
}

impl<T> ListContents<T> {
    pub fn push_front(&mut self, value: T) {
        self.len = self.len.checked_add(1).ok_or(CapacityOverflow).throw();

        let node = NodePtr::from_node(Node {
            value,
            prev: None,
            next: Some(self.head),
        });

        *self.head.prev_mut() = Some(node);
        self.head = node;
    }

    pub fn push_back(&mut self, value: T) {
        self.len = self.len.checked_add(1).ok_or(CapacityOverflow).throw();

        let node = NodePtr::from_node(Node {
            value,
            prev: Some(self.tail),
            next: None,
        });

        *self.tail.next_mut() = Some(node);
        self.tail = node;
    }

    pub fn wrap_one(value: T) -> ListContents<T> {
        let node = NodePtr::from_node(Node {
            value,
            prev: None,
            next: None,
        });

        ListContents {
            len: ONE,
            head: node,
            tail: node,
        }
    }

    pub fn release(self) {
        let mut curr = Some(self.head);
        while let Some(ptr) = curr {
            // SAFETY: The contents are consumed and each node is visited once, so no pointer to a
            // released node survives.
            let node = unsafe { ptr.take_node() };
            curr = node.next;
        }
    }
}

impl<T> ListState<T> {
    pub fn single(value: T) -> ListState<T> {
        Full(ListContents::wrap_one(value))
    }

    pub const fn len(&self) -> usize {
        match self {
            Empty => 0,
            Full(ListContents { len, .. }) => len.get(),
        }
    }
}

impl<T: Clone> Add<&DoublyLinkedList<T>> for &DoublyLinkedList<T> {
    type Output = DoublyLinkedList<T>;

    /// See [`DoublyLinkedList::concat`].
    fn add(self, rhs: &DoublyLinkedList<T>) -> Self::Output {
        self.concat(rhs)
    }
}

impl<T> Add for DoublyLinkedList<T> {
    type Output = DoublyLinkedList<T>;

    /// Concatenates two owned lists by splicing their nodes. See [`DoublyLinkedList::append`].
    fn add(mut self, rhs: DoublyLinkedList<T>) -> Self::Output {
        self.append(rhs);
        self
    }
}

impl<T: PartialEq + Clone> Mul<&DoublyLinkedList<T>> for &DoublyLinkedList<T> {
    type Output = DoublyLinkedList<T>;

    /// See [`DoublyLinkedList::intersect_by_equality`].
    fn mul(self, rhs: &DoublyLinkedList<T>) -> Self::Output {
        self.intersect_by_equality(rhs)
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = DoublyLinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DoublyLinkedList<T> {
    fn drop(&mut self) {
        if let Full(contents) = mem::take(&mut self.state) {
            contents.release();
        }
    }
}

impl<T: Clone> Clone for DoublyLinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for DoublyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DoublyLinkedList<T> {}

impl<T: Hash> Hash for DoublyLinkedList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }

        // Terminate variable length hashing sequence.
        0xFF.hash(state);
    }
}

// SAFETY: A DoublyLinkedList uniquely owns its nodes, so sending it to another thread is safe
// whenever T: Send.
unsafe impl<T: Send> Send for DoublyLinkedList<T> {}
// SAFETY: The safe API obeys all rules of the borrow checker and has no interior mutability, so
// DoublyLinkedList<T> can be shared whenever T: Sync.
unsafe impl<T: Sync> Sync for DoublyLinkedList<T> {}

impl<T: Debug> Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoublyLinkedList")
            .field("contents", &self.iter())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug> Display for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, item) in self.iter().enumerate() {
            if index != 0 {
                write!(f, " <-> ")?;
            }
            write!(f, "({item:?})")?;
        }
        Ok(())
    }
}
