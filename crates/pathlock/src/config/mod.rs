//! Lock acquisition settings

pub mod consts;
mod model;

pub use model::{LockOptions, RetryPolicy};
