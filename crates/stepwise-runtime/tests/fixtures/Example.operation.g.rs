// @generated by stepwise from Example.operation. Do not edit.

#[allow(dead_code, unused_imports, unused_mut, unused_variables, unreachable_code, clippy::all)]
pub mod example {
    use super::*;

    pub mod operation_pipeline {
        use super::*;

        /// Qualified name of the procedure this pipeline was generated from
        pub const PIPELINE_FOR: &str = "Example.operation";

        /// Step `One`
        pub mod one {
            use super::*;

            pub struct Step {
                this: ::std::sync::Arc<Example>,
            }

            pub struct Input {
                pub seed: i32,
            }

            impl Input {
                /// Build an input from the required fields; optional fields take their defaults
                pub fn new(seed: i32) -> Self {
                    Self {
                        seed,
                    }
                }
            }

            pub struct Output {
                pub id: i32,
            }

            impl Step {
                pub fn new(this: ::std::sync::Arc<Example>) -> Self {
                    Self { this }
                }

                async fn run(&self, mut input: Input) -> ::stepwise_runtime::anyhow::Result<Output> {
                    let mut id: i32 = input.seed * 2;
                    self.this.record(id).await?;

                    Ok(Output {
                        id,
                    })
                }
            }

            #[::stepwise_runtime::async_trait]
            impl ::stepwise_runtime::Step<Input> for Step {
                type Output = Output;

                async fn execute(&self, input: Input) -> ::stepwise_runtime::Result<Output> {
                    self.run(input)
                        .await
                        .map_err(|source| ::stepwise_runtime::RuntimeError::step("One", source))
                }

                fn describe(&self) -> String {
                    format!("{}/{}", PIPELINE_FOR, "One")
                }
            }
        }

        /// Step `Two`
        pub mod two {
            use super::*;

            pub struct Step {
                this: ::std::sync::Arc<Example>,
            }

            pub type Input = super::one::Output;

            pub struct Output {}

            impl Step {
                pub fn new(this: ::std::sync::Arc<Example>) -> Self {
                    Self { this }
                }

                async fn run(&self, mut input: Input) -> ::stepwise_runtime::anyhow::Result<Output> {
                    self.this.record(input.id + 1).await?;

                    Ok(Output {})
                }
            }

            #[::stepwise_runtime::async_trait]
            impl ::stepwise_runtime::Step<Input> for Step {
                type Output = Output;

                async fn execute(&self, input: Input) -> ::stepwise_runtime::Result<Output> {
                    self.run(input)
                        .await
                        .map_err(|source| ::stepwise_runtime::RuntimeError::step("Two", source))
                }

                fn describe(&self) -> String {
                    format!("{}/{}", PIPELINE_FOR, "Two")
                }
            }
        }

        /// Chain every step into one pipeline
        pub fn pipeline(this: ::std::sync::Arc<Example>) -> impl ::stepwise_runtime::Step<one::Input, Output = two::Output> {
            use ::stepwise_runtime::StepExt;

            one::Step::new(this.clone())
                .then(two::Step::new(this))
        }
    }
}
