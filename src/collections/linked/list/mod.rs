//! A module containing [`DoublyLinkedList`] and associated types.
//!
//! [`IntoIter`] provides owned iteration, while [`Iter`] and [`IterMut`] provide borrowed
//! iteration from either end of the list.

mod doubly_linked_list;
mod iter;
mod node;

pub use doubly_linked_list::*;
pub use iter::*;
pub(crate) use node::*;
