use std::ptr::NonNull;

pub(crate) type Link<T> = Option<NodePtr<T>>;

// NOTE: Nodes are allocated through Box<T> rather than alloc directly, because reconstructing the
// Box allows the value to be moved back out of the heap when the node is released.

/// A pointer to a heap allocated [`Node`]. Every NodePtr reachable from a
/// [`Queue`](super::Queue) points to a live node owned by that Queue, and is only dereferenced
/// while the Queue itself is borrowed.
#[derive(Debug)]
pub(crate) struct NodePtr<T>(NonNull<Node<T>>);

impl<T> NodePtr<T> {
    pub fn from_node(node: Node<T>) -> NodePtr<T> {
        NodePtr(NonNull::from(Box::leak(Box::new(node))))
    }

    /// Releases the node's allocation and returns its contents.
    ///
    /// # Safety
    /// The pointer must refer to a live node, and neither it nor any copy of it may be used again.
    pub unsafe fn take_node(self) -> Node<T> {
        // SAFETY: The node was allocated with Box::new and the caller guarantees this is the last
        // use of the pointer.
        unsafe { *Box::from_raw(self.0.as_ptr()) }
    }

    pub fn value<'a>(&self) -> &'a T {
        // SAFETY: The pointer refers to a live node owned by the Queue, and the Queue's borrow
        // bounds 'a at the call site.
        unsafe { &(*self.0.as_ptr()).value }
    }

    pub fn value_mut<'a>(&mut self) -> &'a mut T {
        // SAFETY: As above, and the Queue is mutably borrowed for 'a at the call site.
        unsafe { &mut (*self.0.as_ptr()).value }
    }

    pub fn prev<'a>(&self) -> &'a Link<T> {
        // SAFETY: The pointer refers to a live node owned by the Queue.
        unsafe { &(*self.0.as_ptr()).prev }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn prev_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: The pointer refers to a live node owned by the Queue, which is mutably borrowed
        // while links are rewritten.
        unsafe { &mut (*self.0.as_ptr()).prev }
    }

    pub fn next<'a>(&self) -> &'a Link<T> {
        // SAFETY: The pointer refers to a live node owned by the Queue.
        unsafe { &(*self.0.as_ptr()).next }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn next_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: The pointer refers to a live node owned by the Queue, which is mutably borrowed
        // while links are rewritten.
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
