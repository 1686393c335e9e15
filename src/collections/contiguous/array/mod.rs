//! A module containing [`DynamicArray`] and the buffer it is built on.
//!
//! [`DynamicArray`] is also re-exported under the parent module. Borrowed iteration is provided by
//! [`Iter`](std::slice::Iter) and [`IterMut`](std::slice::IterMut) from [`std::slice`], through
//! the array's [`Deref`](std::ops::Deref) implementation.

mod buffer;
mod dynamic_array;
mod tests;

pub(crate) use buffer::*;
pub use dynamic_array::*;
