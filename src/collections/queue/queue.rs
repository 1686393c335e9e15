use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;

use log::trace;

use super::{Iter, Node, NodePtr};
#[doc(inline)]
pub use crate::util::error::EmptyContainer;
use crate::util::error::CapacityOverflow;
use crate::util::length::{Length, ONE};
use crate::util::result::ResultExtension;

/// A first-in-first-out queue, built on a chain of nodes linked in both directions.
///
/// Elements are added at the tail with [`enqueue`](Queue::enqueue) and removed from the head with
/// [`dequeue`](Queue::dequeue), so they leave the Queue in exactly the order they entered it.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Queue.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `enqueue` | `O(1)` |
/// | `dequeue` | `O(1)` |
/// | `front` | `O(1)` |
/// | `clear` | `O(n)` |
pub struct Queue<T> {
    pub(crate) state: QueueState<T>,
    pub(crate) _phantom: PhantomData<T>,
}

#[derive(Default)]
pub(crate) enum QueueState<T> {
    #[default]
    Empty,
    Full(QueueContents<T>),
}

use QueueState::*;

pub(crate) struct QueueContents<T> {
    pub len: Length,
    pub head: NodePtr<T>,
    pub tail: NodePtr<T>,
}

impl<T> Queue<T> {
    /// Creates a new Queue with no elements.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::queue::Queue;
    /// let queue: Queue<u8> = Queue::new();
    /// assert!(queue.is_empty());
    /// ```
    pub const fn new() -> Queue<T> {
        Queue {
            state: Empty,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of elements in the Queue.
    pub const fn len(&self) -> usize {
        match &self.state {
            Empty => 0,
            Full(QueueContents { len, .. }) => len.get(),
        }
    }

    /// Returns true if the Queue contains no elements.
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, Empty)
    }

    /// Adds the provided value to the tail of the Queue.
    ///
    /// # Panics
    /// Panics if the length of the Queue would overflow a [`usize`].
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::queue::Queue;
    /// let mut queue = Queue::new();
    /// queue.enqueue(1);
    /// queue.enqueue(2);
    /// assert_eq!(queue.len(), 2);
    /// assert_eq!(queue.front(), Ok(&1));
    /// ```
    pub fn enqueue(&mut self, value: T) {
        match &mut self.state {
            Empty => self.state = Full(QueueContents::wrap_one(value)),
            Full(contents) => contents.push_back(value),
        }
    }

    /// Removes the element at the head of the Queue and returns it. Fails with [`EmptyContainer`]
    /// if there is nothing to remove, leaving the Queue untouched.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::queue::{EmptyContainer, Queue};
    /// let mut queue = Queue::from_iter([1, 2, 3]);
    /// assert_eq!(queue.dequeue(), Ok(1));
    /// assert_eq!(queue.front(), Ok(&2));
    /// assert_eq!(queue.len(), 2);
    ///
    /// queue.clear();
    /// assert_eq!(queue.dequeue(), Err(EmptyContainer));
    /// ```
    pub fn dequeue(&mut self) -> Result<T, EmptyContainer> {
        match &mut self.state {
            Empty => Err(EmptyContainer),
            Full(QueueContents { len, head, .. }) => {
                // SAFETY: The head node is owned by this Queue and is unlinked below, so the
                // pointer is never used again.
                let node = unsafe { head.take_node() };

                match len.checked_sub(1) {
                    Some(new_len) => {
                        // SAFETY: The previous length was greater than 1, so the head node was
                        // followed by at least one more.
                        let new_head = unsafe { node.next.unwrap_unchecked() };
                        *new_head.prev_mut() = None;
                        *head = new_head;
                        *len = new_len;
                    },
                    None => self.state = Empty,
                }

                Ok(node.value)
            },
        }
    }

    /// Returns a reference to the element at the head of the Queue, which will be the next one
    /// dequeued. Fails with [`EmptyContainer`] if the Queue has no elements.
    pub fn front(&self) -> Result<&T, EmptyContainer> {
        match &self.state {
            Empty => Err(EmptyContainer),
            Full(QueueContents { head, .. }) => Ok(head.value()),
        }
    }

    /// Returns a mutable reference to the element at the head of the Queue. Fails with
    /// [`EmptyContainer`] if the Queue has no elements.
    pub fn front_mut(&mut self) -> Result<&mut T, EmptyContainer> {
        match &mut self.state {
            Empty => Err(EmptyContainer),
            Full(QueueContents { head, .. }) => Ok(head.value_mut()),
        }
    }

    /// Removes and drops every element in the Queue, releasing all nodes.
    pub fn clear(&mut self) {
        trace!("Clearing Queue with {} nodes", self.len());
        if let Full(contents) = mem::take(&mut self.state) {
            contents.release();
        }
    }

    /// Returns an iterator over the elements of the Queue, from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }
}

impl<T> Queue<T> {
    #[cfg(test)]
    pub(crate) fn verify_double_links(&self) {
        match &self.state {
            Empty => {},
            Full(QueueContents { len, head, tail }) => {
                assert!(head.prev().is_none(), "Head shouldn't have a previous node.");
                assert!(tail.next().is_none(), "Tail shouldn't have a next node.");

                let mut curr = *head;
                let mut count = 1;
                while let Some(next) = curr.next() {
                    assert!(*next.prev() == Some(curr), "Links should mirror each other.");
                    curr = *next;
                    count += 1;
                }
                assert!(curr == *tail, "Following next links from head should reach tail.");
                assert_eq!(count, len.get(), "Number of linked nodes should equal len.");
            },
        }
    }
}

impl<T> QueueContents<T> {
    pub fn wrap_one(value: T) -> QueueContents<T> {
        let node = NodePtr::from_node(Node {
            value,
            prev: None,
            next: None,
        });

        QueueContents {
            len: ONE,
            head: node,
            tail: node,
        }
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

    /// Releases every node in order from head to tail.
    pub fn release(self) {
        let mut curr = Some(self.head);
        while let Some(ptr) = curr {
            // SAFETY: Each node is visited exactly once and the contents are consumed, so no
            // pointer to a released node remains.
            let node = unsafe { ptr.take_node() };
            curr = node.next;
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        if let Full(contents) = mem::take(&mut self.state) {
            contents.release();
        }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T: Hash> Hash for Queue<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

// SAFETY: A Queue uniquely owns all of its nodes, so it can be sent to another thread whenever T
// can.
unsafe impl<T: Send> Send for Queue<T> {}
// SAFETY: Queue's safe API obeys the borrow checker's rules and has no interior mutability, so
// shared references are safe to share whenever T is Sync.
unsafe impl<T: Sync> Sync for Queue<T> {}

impl<T: Debug> Debug for Queue<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("contents", &self.iter())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug> Display for Queue<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
