use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{DoublyLinkedList, Link, ListContents, ListState};

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

/// An owned iterator which pops elements from either end of a [`DoublyLinkedList`].
pub struct IntoIter<T> {
    pub(crate) list: DoublyLinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.list.len()
    }
}

/// The front and back of the nodes still to be yielded by a borrowed iterator, along with how
/// many there are. The nodes themselves are never modified.
pub(crate) struct Span<T> {
    pub front: Link<T>,
    pub back: Link<T>,
    pub len: usize,
}

impl<T> Span<T> {
    fn of(state: &ListState<T>) -> Span<T> {
        match state {
            ListState::Empty => Span {
                front: None,
                back: None,
                len: 0,
            },
            ListState::Full(ListContents { len, head, tail }) => Span {
                front: Some(*head),
                back: Some(*tail),
                len: len.get(),
            },
        }
    }

    fn next(&mut self) -> Link<T> {
        if self.len == 0 { return None; }
        let node = self.front?;
        self.len -= 1;
        self.front = *node.next();
        Some(node)
    }

    fn next_back(&mut self) -> Link<T> {
        if self.len == 0 { return None; }
        let node = self.back?;
        self.len -= 1;
        self.back = *node.prev();
        Some(node)
    }
}

impl<T> Clone for Span<T> {
    fn clone(&self) -> Self {
        Span {
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a mut DoublyLinkedList<T> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            span: Span::of(&self.state),
            _phantom: PhantomData,
        }
    }
}

/// A borrowed iterator over mutable references to the elements of a [`DoublyLinkedList`].
pub struct IterMut<'a, T> {
    pub(crate) span: Span<T>,
    pub(crate) _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.span.next().map(|mut node| node.value_mut())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.span.len, Some(self.span.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.next_back().map(|mut node| node.value_mut())
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.span.len
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            span: Span::of(&self.state),
            _phantom: PhantomData,
        }
    }
}

/// A borrowed iterator over the elements of a [`DoublyLinkedList`], from either end.
pub struct Iter<'a, T> {
    pub(crate) span: Span<T>,
    pub(crate) _phantom: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.span.next().map(|node| node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.span.len, Some(self.span.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.next_back().map(|node| node.value())
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.span.len
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            span: self.span.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
