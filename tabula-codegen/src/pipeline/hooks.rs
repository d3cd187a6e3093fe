//! Hook traits for the two post-generation stages

use async_trait::async_trait;

use crate::codegen::{Output, RenderedOutput};

/// Transforms the declaration-level output before rendering.
///
/// Hooks run in registration order, each receiving the previous hook's
/// result. Any error aborts the run.
#[async_trait]
pub trait PreRenderHook: Send + Sync {
    fn name(&self) -> &str;

    async fn apply(&self, output: Output) -> anyhow::Result<Output>;
}

/// Transforms rendered text after rendering.
///
/// Post-render hooks only ever receive [`RenderedOutput`]: path to text.
///
/// ```
/// use tabula_codegen::codegen::RenderedOutput;
/// use tabula_codegen::pipeline::PostRenderHook;
///
/// struct TrailingNewline;
///
/// impl PostRenderHook for TrailingNewline {
///     fn name(&self) -> &str {
///         "trailing-newline"
///     }
///
///     fn apply(&self, mut rendered: RenderedOutput) -> anyhow::Result<RenderedOutput> {
///         for (_, text) in rendered.iter_mut() {
///             if !text.ends_with('\n') {
///                 text.push('\n');
///             }
///         }
///         Ok(rendered)
///     }
/// }
/// ```
///
/// The declaration model is out of reach at this stage:
///
/// ```compile_fail
/// use tabula_codegen::codegen::{Output, RenderedOutput};
/// use tabula_codegen::pipeline::PostRenderHook;
///
/// struct Peek;
///
/// impl PostRenderHook for Peek {
///     fn name(&self) -> &str {
///         "peek"
///     }
///
///     fn apply(&self, output: Output) -> anyhow::Result<Output> {
///         Ok(output)
///     }
/// }
/// ```
pub trait PostRenderHook: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, rendered: RenderedOutput) -> anyhow::Result<RenderedOutput>;
}

/// A closure used as a pre-render hook
pub struct PreRenderFn<F> {
    name: String,
    f: F,
}

impl<F> PreRenderFn<F>
where
    F: Fn(Output) -> anyhow::Result<Output> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> PreRenderHook for PreRenderFn<F>
where
    F: Fn(Output) -> anyhow::Result<Output> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, output: Output) -> anyhow::Result<Output> {
        (self.f)(output)
    }
}

/// A closure used as a post-render hook
pub struct PostRenderFn<F> {
    name: String,
    f: F,
}

impl<F> PostRenderFn<F>
where
    F: Fn(RenderedOutput) -> anyhow::Result<RenderedOutput> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> PostRenderHook for PostRenderFn<F>
where
    F: Fn(RenderedOutput) -> anyhow::Result<RenderedOutput> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, rendered: RenderedOutput) -> anyhow::Result<RenderedOutput> {
        (self.f)(rendered)
    }
}
