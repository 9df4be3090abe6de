//! The step abstraction
//!
//! A step is one asynchronous transform `Input -> Output`. Generated step
//! units implement [`Step`] for their own `Input` record; hand-written
//! stages can use [`FnStep`].

use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use std::future::Future;

/// One stage of a pipeline
#[async_trait]
pub trait Step<I: Send + 'static>: Send + Sync {
    /// Record handed to the next stage
    type Output: Send + 'static;

    /// Run the stage
    async fn execute(&self, input: I) -> Result<Self::Output>;

    /// Label used in logs and errors
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// A step backed by an async closure
///
/// # Example
///
/// ```rust
/// use stepwise_runtime::{FnStep, Step};
///
/// let double = FnStep::new("double", |n: i32| async move { Ok::<_, stepwise_runtime::anyhow::Error>(n * 2) });
/// assert_eq!(double.describe(), "double");
/// ```
pub struct FnStep<F> {
    name: String,
    f: F,
}

impl<F> FnStep<F> {
    pub fn new<I, O, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = anyhow::Result<O>>,
    {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<I, O, F, Fut> Step<I> for FnStep<F>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<O>> + Send,
{
    type Output = O;

    async fn execute(&self, input: I) -> Result<O> {
        (self.f)(input)
            .await
            .map_err(|source| RuntimeError::step(self.name.clone(), source))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
