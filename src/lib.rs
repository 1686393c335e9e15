//! A small toolkit of generic containers: a FIFO [`Queue`](collections::queue::Queue), a
//! [`DoublyLinkedList`](collections::linked::DoublyLinkedList) that can be concatenated and
//! intersected as a whole, and a [`DynamicArray`](collections::contiguous::DynamicArray) that grows
//! by an increment chosen by the caller.
//!
//! # Error Handling
//! Most fallible operations come in pairs. The `try_` form returns a [`Result`] with a small,
//! strongly typed error (often a ZST) that implements [`Error`](std::error::Error). The plain form
//! panics with that error's message instead, which is more ergonomic when the caller already knows
//! the operation can't fail. Operations where emptiness is an ordinary outcome, like popping from a
//! list, return an [`Option`].
//!
//! Errors are only ever combined using enums, so that dispatch stays static.
//!
//! # Logging
//! Reallocations and clears are reported through the [`log`](https://docs.rs/log) facade at
//! `debug` and `trace` level, and a refusal to grow is reported at `warn` level. Nothing is printed
//! unless the application installs a logger.
//!
//! # Features
//! Each container can be enabled on its own with the `queue`, `linked` and `contiguous` features.
//! All of them are enabled by default, through `collections-all`.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "collections")]
pub mod collections;

pub(crate) mod util;
