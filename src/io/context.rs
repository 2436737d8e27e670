//! Logging context handed to every pipeline component

use tracing::Span;

/// Per-run context carrying the tracing span that component events attach to
///
/// Components never reach for a global logger; they log with
/// `parent: ctx.span()` so events stay tagged with the project they belong to.
#[derive(Clone, Debug)]
pub struct RunContext {
    project: String,
    span: Span,
}

impl RunContext {
    /// Create a context for a named project
    pub fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            span: tracing::info_span!("project", name = %project),
        }
    }

    /// Context whose events are not attached to any span
    pub fn detached() -> Self {
        Self {
            project: String::new(),
            span: Span::none(),
        }
    }

    /// Span component events are parented to
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Project name this run works on
    pub fn project(&self) -> &str {
        &self.project
    }
}
