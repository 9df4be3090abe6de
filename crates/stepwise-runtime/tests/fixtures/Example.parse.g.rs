// @generated by stepwise from Example.parse. Do not edit.

#[allow(dead_code, unused_imports, unused_mut, unused_variables, unreachable_code, clippy::all)]
pub mod example {
    use super::*;

    pub mod parse_pipeline {
        use super::*;

        /// Qualified name of the procedure this pipeline was generated from
        pub const PIPELINE_FOR: &str = "Example.parse";

        /// Step `Parse`
        pub mod parse {
            use super::*;

            pub struct Step;

            pub struct Input {
                pub a: String,
            }

            impl Input {
                /// Build an input from the required fields; optional fields take their defaults
                pub fn new(a: String) -> Self {
                    Self {
                        a,
                    }
                }
            }

            pub struct Output {
                pub value: f64,
            }

            impl From<f64> for Output {
                fn from(value: f64) -> Self {
                    Self { value }
                }
            }

            impl Step {
                async fn run(&self, mut input: Input) -> ::stepwise_runtime::anyhow::Result<Output> {
                    return Ok(Output { value: input.a.parse()? });
                }
            }

            #[::stepwise_runtime::async_trait]
            impl ::stepwise_runtime::Step<Input> for Step {
                type Output = Output;

                async fn execute(&self, input: Input) -> ::stepwise_runtime::Result<Output> {
                    self.run(input)
                        .await
                        .map_err(|source| ::stepwise_runtime::RuntimeError::step("Parse", source))
                }

                fn describe(&self) -> String {
                    format!("{}/{}", PIPELINE_FOR, "Parse")
                }
            }
        }

        /// Chain every step into one pipeline
        pub fn pipeline() -> impl ::stepwise_runtime::Step<parse::Input, Output = parse::Output> {
            parse::Step
        }
    }
}
