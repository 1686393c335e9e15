//! Generic collection types.
//!
//! # Method
//! Every collection here owns its storage directly through raw allocations, rather than wrapping a
//! collection from [`std`]. [`DynamicArray`] implements [`Deref<Target = [T]>`](std::ops::Deref)
//! (and DerefMut) over its live elements, while the linked collections provide their own
//! iterators.

#[cfg(feature = "contiguous")]
pub mod contiguous;
#[cfg(feature = "linked")]
pub mod linked;
#[cfg(feature = "queue")]
pub mod queue;

#[cfg(feature = "contiguous")]
#[doc(inline)]
pub use contiguous::DynamicArray;
#[cfg(feature = "linked")]
#[doc(inline)]
pub use linked::DoublyLinkedList;
#[cfg(feature = "queue")]
#[doc(inline)]
pub use queue::Queue;
