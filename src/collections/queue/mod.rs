//! A module containing [`Queue`] and associated types.
//!
//! [`Queue`] is also re-exported under the parent module.

mod iter;
mod node;
mod queue;

pub use iter::*;
pub(crate) use node::*;
pub use queue::*;
