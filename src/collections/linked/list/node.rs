use std::ptr::NonNull;

pub(crate) type Link<T> = Option<NodePtr<T>>;

/// A pointer to a node owned by a [`DoublyLinkedList`](super::DoublyLinkedList). The accessors
/// hand out references with an unbounded lifetime; callers bound it with a borrow of the list.
#[derive(Debug)]
pub(crate) struct NodePtr<T>(NonNull<Node<T>>);

impl<T> NodePtr<T> {
    pub fn from_node(node: Node<T>) -> NodePtr<T> {
        NodePtr(NonNull::from(Box::leak(Box::new(node))))
    }

    /// # Safety
    /// The pointer must refer to a live node, and no copy of it may be used afterwards.
    pub unsafe fn take_node(self) -> Node<T> {
        // SAFETY: Nodes are only ever created by from_node, and the caller guarantees that the
        // allocation is released once.
        unsafe { *Box::from_raw(self.0.as_ptr()) }
    }

    pub fn value<'a>(&self) -> &'a T {
        // SAFETY: Every NodePtr held by a list points to a live node of that list.
        unsafe { &(*self.0.as_ptr()).value }
    }

    pub fn value_mut<'a>(&mut self) -> &'a mut T {
        // SAFETY: Every NodePtr held by a list points to a live node of that list.
        unsafe { &mut (*self.0.as_ptr()).value }
    }

    pub fn prev<'a>(&self) -> &'a Link<T> {
        // SAFETY: Every NodePtr held by a list points to a live node of that list.
        unsafe { &(*self.0.as_ptr()).prev }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn prev_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: Every NodePtr held by a list points to a live node of that list.
        unsafe { &mut (*self.0.as_ptr()).prev }
    }

    pub fn next<'a>(&self) -> &'a Link<T> {
        // SAFETY: Every NodePtr held by a list points to a live node of that list.
        unsafe { &(*self.0.as_ptr()).next }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn next_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: Every NodePtr held by a list points to a live node of that list.
        unsafe { &mut (*self.0.as_ptr()).next }
    }
}

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodePtr<T> {}

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

pub(crate) struct Node<T> {
    pub value: T,
    pub prev: Link<T>,
    pub next: Link<T>,
}
