//! Stepwise Runtime - support library for generated pipelines
//!
//! Generated code refers to this crate by absolute path: every step unit
//! implements [`Step`] and the composition helper chains them with
//! [`StepExt::then`]. The crate re-exports `anyhow` and `async_trait` so
//! generated files need no extra dependencies.

pub mod compose;
pub mod error;
pub mod step;

pub use compose::{StepExt, Then};
pub use error::{Result, RuntimeError};
pub use step::{FnStep, Step};

pub use anyhow;
pub use async_trait::async_trait;
