//! Linked collection types. Revolves around [`DoublyLinkedList`], which supports concatenation and
//! intersection by equality of whole lists.

pub mod list;

#[doc(inline)]
pub use list::DoublyLinkedList;
