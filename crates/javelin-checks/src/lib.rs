//! Method-invocation checks over resolved Java expression trees.
//!
//! A check declares the method signatures it cares about in a [`MethodRegistry`];
//! the [`InvocationVisitor`] walks a [`Body`] once and hands every matching invocation
//! to the check, which decides whether to report an [`Issue`]. The [`Analyzer`] owns
//! the enabled checks and drives them per file.

use std::fmt;

use javelin_hir::{Body, ExprId};
use javelin_types::{Diagnostic, TypeHierarchy};

mod analyzer;
mod matcher;
mod registry;
pub mod rules;
mod visitor;

pub use crate::analyzer::Analyzer;
pub use crate::matcher::{MethodMatcher, TypeCriteria};
pub use crate::registry::{MethodRegistry, RegistryError};
pub use crate::visitor::{invocations, Found, InvocationVisitor, Invocations, Matches};

/// Everything a check may consult while analysing one file.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub body: &'a Body,
    pub types: &'a dyn TypeHierarchy,
    /// Whether the front end produced a semantic model (resolved symbols and methods).
    /// Checks never run without one.
    pub has_semantic: bool,
}

impl<'a> CheckContext<'a> {
    pub fn new(body: &'a Body, types: &'a dyn TypeHierarchy) -> Self {
        Self {
            body,
            types,
            has_semantic: true,
        }
    }

    pub fn without_semantics(body: &'a Body, types: &'a dyn TypeHierarchy) -> Self {
        Self {
            body,
            types,
            has_semantic: false,
        }
    }
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("roots", &self.body.roots().len())
            .field("exprs", &self.body.exprs.len())
            .field("has_semantic", &self.has_semantic)
            .finish_non_exhaustive()
    }
}

/// A diagnostic keyed to the expression it was raised on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub anchor: ExprId,
    pub diagnostic: Diagnostic,
}

impl Issue {
    /// An issue whose span is the anchor's span.
    pub fn at(body: &Body, anchor: ExprId, diagnostic: Diagnostic) -> Self {
        let diagnostic = Diagnostic {
            span: Some(body.expr(anchor).span()),
            ..diagnostic
        };
        Self { anchor, diagnostic }
    }
}

/// Append-only destination for issues.
pub trait DiagnosticSink {
    fn report(&mut self, issue: Issue);
}

impl DiagnosticSink for Vec<Issue> {
    fn report(&mut self, issue: Issue) {
        self.push(issue);
    }
}

/// A rule the [`Analyzer`] runs over every file.
pub trait Check: Send + Sync {
    /// Stable diagnostic code, e.g. `SILLY_STRING_OPERATION`.
    fn code(&self) -> &'static str;

    fn run(&self, ctx: CheckContext<'_>, sink: &mut dyn DiagnosticSink);
}

/// A check that only looks at invocations of the methods in its registry.
///
/// Implementors usually forward [`Check::run`] to [`run_method_invocation_check`].
pub trait MethodInvocationCheck: Send + Sync {
    /// Identity of a registered method, attached to each descriptor.
    type Method: Copy + Eq + fmt::Debug;

    fn registry(&self) -> &MethodRegistry<Self::Method>;

    fn on_invocation(
        &self,
        ctx: CheckContext<'_>,
        found: Found<'_, Self::Method>,
        sink: &mut dyn DiagnosticSink,
    );
}

/// Walk `ctx.body` once and hand every registered invocation to `check`.
pub fn run_method_invocation_check<C>(check: &C, ctx: CheckContext<'_>, sink: &mut dyn DiagnosticSink)
where
    C: MethodInvocationCheck + ?Sized,
{
    if !ctx.has_semantic {
        return;
    }
    for found in InvocationVisitor::new(check.registry()).visit(ctx) {
        tracing::trace!(
            target: "javelin.checks",
            invocation = ?found.invocation,
            method = %found.method.name,
            tag = ?found.tag,
            "matched registered invocation"
        );
        check.on_invocation(ctx, found, sink);
    }
}
