//! Contiguous collection types. Namely [`DynamicArray`], a contiguous collection that grows by a
//! caller-controlled increment.
#![warn(missing_docs)]

pub mod array;

#[doc(inline)]
pub use array::DynamicArray;
