use javelin_types::{Span, TypeName};

use crate::constant::ConstantValue;
use crate::hir::{
    Arena, BinaryOp, Body, Expr, ExprId, LiteralKind, MethodSymbol, SymbolData, SymbolId,
    SymbolKind, UnaryOp,
};

/// Incremental construction of a [`Body`].
///
/// Front ends lower their syntax tree bottom-up through this builder, which guarantees
/// the arena invariants [`Body::validate`] checks. Leaf spans are laid out left to right
/// as nodes are created; composite spans cover their children.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    roots: Vec<ExprId>,
    exprs: Arena<Expr>,
    symbols: Arena<SymbolData>,
    cursor: usize,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // === Symbols ===

    pub fn symbol(
        &mut self,
        name: impl Into<String>,
        kind: SymbolKind,
        ty: Option<TypeName>,
        constant: Option<ConstantValue>,
    ) -> SymbolId {
        SymbolId::from_raw(self.symbols.alloc(SymbolData {
            name: name.into(),
            kind,
            ty,
            constant,
        }))
    }

    pub fn local(&mut self, name: impl Into<String>, ty: &str) -> SymbolId {
        self.symbol(name, SymbolKind::Local, Some(TypeName::from(ty)), None)
    }

    pub fn parameter(&mut self, name: impl Into<String>, ty: &str) -> SymbolId {
        self.symbol(name, SymbolKind::Parameter, Some(TypeName::from(ty)), None)
    }

    /// A `static final` field with a compile-time constant initializer.
    pub fn constant(
        &mut self,
        name: impl Into<String>,
        ty: &str,
        value: ConstantValue,
    ) -> SymbolId {
        self.symbol(name, SymbolKind::Field, Some(TypeName::from(ty)), Some(value))
    }

    // === Leaves ===

    /// A reference to a resolved symbol.
    pub fn ident(&mut self, symbol: SymbolId) -> ExprId {
        let name = self.symbols[symbol].name.clone();
        let span = self.leaf_span(name.len());
        self.alloc(Expr::Identifier {
            name,
            symbol: Some(symbol),
            span,
        })
    }

    /// A name the front end could not resolve.
    pub fn unresolved_ident(&mut self, name: impl Into<String>) -> ExprId {
        let name = name.into();
        let span = self.leaf_span(name.len());
        self.alloc(Expr::Identifier {
            name,
            symbol: None,
            span,
        })
    }

    pub fn literal(&mut self, literal: LiteralKind, value: impl Into<String>) -> ExprId {
        let value = value.into();
        let quoted = matches!(literal, LiteralKind::String | LiteralKind::Char);
        let span = self.leaf_span(value.len() + if quoted { 2 } else { 0 });
        self.alloc(Expr::Literal {
            literal,
            value,
            span,
        })
    }

    pub fn int_lit(&mut self, token: impl Into<String>) -> ExprId {
        self.literal(LiteralKind::Int, token)
    }

    pub fn string_lit(&mut self, contents: impl Into<String>) -> ExprId {
        self.literal(LiteralKind::String, contents)
    }

    pub fn char_lit(&mut self, contents: impl Into<String>) -> ExprId {
        self.literal(LiteralKind::Char, contents)
    }

    // === Composites ===

    pub fn member_select(&mut self, receiver: ExprId, name: impl Into<String>) -> ExprId {
        let name = name.into();
        let name_span = self.leaf_span(name.len());
        let span = self.span_of(receiver).cover(name_span);
        self.alloc(Expr::MemberSelect {
            receiver,
            name,
            span,
        })
    }

    /// `receiver.name(args...)` resolved to `method`.
    pub fn call(
        &mut self,
        receiver: ExprId,
        name: impl Into<String>,
        args: impl IntoIterator<Item = ExprId>,
        method: Option<MethodSymbol>,
    ) -> ExprId {
        let select = self.member_select(receiver, name);
        self.invocation(select, args, method)
    }

    /// An unqualified `name(args...)` call.
    pub fn unqualified_call(
        &mut self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = ExprId>,
        method: Option<MethodSymbol>,
    ) -> ExprId {
        let select = self.unresolved_ident(name);
        self.invocation(select, args, method)
    }

    pub fn invocation(
        &mut self,
        method_select: ExprId,
        args: impl IntoIterator<Item = ExprId>,
        method: Option<MethodSymbol>,
    ) -> ExprId {
        let args: Vec<ExprId> = args.into_iter().collect();
        let span = self.cover(method_select, &args);
        // Account for the closing parenthesis.
        let span = Span::new(span.start, span.end + 1);
        self.cursor = self.cursor.max(span.end + 1);
        self.alloc(Expr::MethodInvocation {
            method_select,
            args,
            method,
            span,
        })
    }

    pub fn parenthesized(&mut self, inner: ExprId) -> ExprId {
        let inner_span = self.span_of(inner);
        let span = Span::new(inner_span.start.saturating_sub(1), inner_span.end + 1);
        self.cursor = self.cursor.max(span.end + 1);
        self.alloc(Expr::Parenthesized { inner, span })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        let operand_span = self.span_of(operand);
        let span = Span::new(operand_span.start.saturating_sub(1), operand_span.end);
        self.alloc(Expr::Unary { op, operand, span })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let span = self.span_of(lhs).cover(self.span_of(rhs));
        self.alloc(Expr::Binary { op, lhs, rhs, span })
    }

    /// A node the checks do not interpret, wrapping `children` in source order.
    pub fn other(&mut self, children: impl IntoIterator<Item = ExprId>) -> ExprId {
        let children: Vec<ExprId> = children.into_iter().collect();
        let span = match children.split_first() {
            Some((first, rest)) => self.cover(*first, rest),
            None => self.leaf_span(0),
        };
        self.alloc(Expr::Other { children, span })
    }

    // === Finishing ===

    /// Append a top-level expression. Roots are analysed in the order they are added.
    pub fn root(&mut self, expr: ExprId) -> &mut Self {
        self.roots.push(expr);
        self
    }

    pub fn finish(self) -> Body {
        Body {
            roots: self.roots,
            exprs: self.exprs,
            symbols: self.symbols,
        }
    }

    fn alloc(&mut self, expr: Expr) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(expr))
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.exprs[id].span()
    }

    fn cover(&self, first: ExprId, rest: &[ExprId]) -> Span {
        rest.iter()
            .fold(self.span_of(first), |acc, id| acc.cover(self.span_of(*id)))
    }

    fn leaf_span(&mut self, len: usize) -> Span {
        let span = Span::new(self.cursor, self.cursor + len);
        self.cursor = span.end + 1;
        span
    }
}
