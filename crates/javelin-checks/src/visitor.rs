//! Single-pass walks over a [`Body`] that surface method invocations.

use std::fmt;

use javelin_hir::{Body, Expr, ExprId, MethodSymbol};

use crate::registry::MethodRegistry;
use crate::CheckContext;

/// Every method-invocation node of `body`, in source pre-order.
///
/// Roots are walked in order; within a node the method select (and so the receiver)
/// comes before the arguments. The walk keeps an explicit stack, so deeply nested
/// chains never recurse, and a node reachable from more than one parent is still
/// yielded only once.
///
/// # Panics
///
/// On a body that fails [`Body::validate`]. [`crate::Analyzer`] validates before walking.
#[must_use]
pub fn invocations(body: &Body) -> Invocations<'_> {
    Invocations::new(body)
}

#[derive(Clone)]
pub struct Invocations<'a> {
    body: &'a Body,
    stack: Vec<ExprId>,
    seen: Vec<bool>,
}

impl<'a> Invocations<'a> {
    fn new(body: &'a Body) -> Self {
        let mut stack: Vec<ExprId> = body.roots().to_vec();
        stack.reverse();
        Self {
            body,
            stack,
            seen: vec![false; body.exprs.len()],
        }
    }
}

impl fmt::Debug for Invocations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocations")
            .field("pending", &self.stack.len())
            .finish()
    }
}

impl Iterator for Invocations<'_> {
    type Item = ExprId;

    fn next(&mut self) -> Option<ExprId> {
        while let Some(id) = self.stack.pop() {
            if std::mem::replace(&mut self.seen[id.idx()], true) {
                continue;
            }

            let expr = self.body.expr(id);
            let len = self.stack.len();
            self.stack.extend(expr.children());
            self.stack[len..].reverse();

            if expr.is_method_invocation() {
                return Some(id);
            }
        }
        None
    }
}

/// A registered method found at an invocation node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<'a, M> {
    pub invocation: ExprId,
    pub method: &'a MethodSymbol,
    pub tag: M,
}

/// Walks a body once, yielding the invocations whose resolved method is in `registry`.
#[derive(Debug, Clone, Copy)]
pub struct InvocationVisitor<'r, M> {
    registry: &'r MethodRegistry<M>,
}

impl<'r, M: Copy + Eq + fmt::Debug> InvocationVisitor<'r, M> {
    pub fn new(registry: &'r MethodRegistry<M>) -> Self {
        Self { registry }
    }

    pub fn visit<'a>(&self, ctx: CheckContext<'a>) -> Matches<'a, M>
    where
        'r: 'a,
    {
        Matches {
            invocations: invocations(ctx.body),
            registry: self.registry,
            ctx,
        }
    }
}

/// Iterator returned by [`InvocationVisitor::visit`].
#[derive(Debug, Clone)]
pub struct Matches<'a, M> {
    invocations: Invocations<'a>,
    registry: &'a MethodRegistry<M>,
    ctx: CheckContext<'a>,
}

impl<'a, M: Copy + Eq + fmt::Debug> Iterator for Matches<'a, M> {
    type Item = Found<'a, M>;

    fn next(&mut self) -> Option<Self::Item> {
        let body = self.ctx.body;
        for invocation in self.invocations.by_ref() {
            let Expr::MethodInvocation {
                method: Some(method),
                ..
            } = body.expr(invocation)
            else {
                continue;
            };
            if let Some(tag) = self.registry.find(method, self.ctx.types) {
                return Some(Found {
                    invocation,
                    method,
                    tag,
                });
            }
        }
        None
    }
}
