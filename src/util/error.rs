use derive_more::{Display, Error};
#[cfg(feature = "contiguous")]
use derive_more::{From, IsVariant, TryInto};

/// The provided index doesn't refer to a valid position in the collection.
#[cfg(feature = "contiguous")]
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Index {index} out of range for collection with {len} elements!")]
pub struct IndexOutOfRange {
    /// The index that was requested.
    pub index: usize,
    /// The length of the collection at the time of the request.
    pub len: usize,
}

/// The collection has no elements to provide.
#[cfg(feature = "queue")]
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Container is empty!")]
pub struct EmptyContainer;

/// The collection is full and has been configured with a growth increment of zero, so it can't
/// make room for another element.
#[cfg(feature = "contiguous")]
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Unable to grow past capacity {cap} with a growth increment of 0!")]
pub struct CapacityExhausted {
    /// The capacity the collection is stuck at.
    pub cap: usize,
}

/// The requested capacity can't be represented by a memory layout.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Capacity overflow!")]
pub struct CapacityOverflow;

/// Either of the ways an insertion at an index can fail.
#[cfg(feature = "contiguous")]
#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrCapExhausted {
    IndexOutOfRange(IndexOutOfRange),
    CapacityExhausted(CapacityExhausted),
}
