//! Resolved expression trees for Java sources.
//!
//! A [`Body`] is what an external front end hands to the checks: an arena of
//! expressions with identifiers linked to [`SymbolId`]s and invocations linked to the
//! [`MethodSymbol`] they resolved to. Nothing here parses Java.

mod builder;
pub mod constant;
mod hir;

pub use crate::builder::BodyBuilder;
pub use crate::constant::ConstantValue;
pub use crate::hir::{
    Arena, BinaryOp, Body, BodyError, Children, Expr, ExprId, LiteralKind, MethodSymbol,
    SymbolData, SymbolId, SymbolKind, UnaryOp,
};
