pub mod alloc;
pub mod error;
#[allow(unused)]
pub mod length;
pub mod panic;
pub mod result;
