//! Sequential composition of steps

use crate::error::Result;
use crate::step::Step;
use async_trait::async_trait;
use tracing::trace;

/// Runs `first`, then feeds its output to `second`.
///
/// A failure in `first` is returned as is and `second` never runs.
pub struct Then<F, G> {
    first: F,
    second: G,
}

impl<F, G> Then<F, G> {
    pub fn new(first: F, second: G) -> Self {
        Self { first, second }
    }
}

#[async_trait]
impl<I, F, G> Step<I> for Then<F, G>
where
    I: Send + 'static,
    F: Step<I>,
    G: Step<F::Output>,
{
    type Output = G::Output;

    async fn execute(&self, input: I) -> Result<G::Output> {
        let middle = self.first.execute(input).await?;
        trace!(step = %self.first.describe(), "step completed");
        self.second.execute(middle).await
    }

    fn describe(&self) -> String {
        format!("{} -> {}", self.first.describe(), self.second.describe())
    }
}

/// Chaining for any step
pub trait StepExt<I: Send + 'static>: Step<I> + Sized {
    /// Run `next` on the output of this step
    fn then<G>(self, next: G) -> Then<Self, G>
    where
        G: Step<Self::Output>,
    {
        Then::new(self, next)
    }
}

impl<I: Send + 'static, S: Step<I>> StepExt<I> for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::FnStep;

    #[tokio::test]
    async fn test_then_feeds_output_forward() {
        let pipeline = FnStep::new("parse", |text: String| async move {
            Ok::<_, anyhow::Error>(text.parse::<i64>()?)
        })
        .then(FnStep::new("double", |n: i64| async move {
            Ok::<_, anyhow::Error>(n * 2)
        }))
        .then(FnStep::new("render", |n: i64| async move {
            Ok::<_, anyhow::Error>(format!("={}", n))
        }));

        assert_eq!(pipeline.execute("21".to_string()).await.unwrap(), "=42");
        assert_eq!(pipeline.describe(), "parse -> double -> render");
    }
}
