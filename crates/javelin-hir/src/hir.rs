use std::fmt;

use javelin_types::{Span, TypeName};
use serde::{Deserialize, Serialize};

use crate::constant::ConstantValue;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Identity of a resolved declaration. Equal ids denote the same declaration; two
/// declarations that share a name (shadowing) always get distinct ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        SymbolId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    pub fn alloc(&mut self, value: T) -> u32 {
        let idx = self.data.len() as u32;
        self.data.push(value);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (i as u32, v))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: Vec::new() }
    }
}

impl<T> std::ops::Index<ExprId> for Arena<T> {
    type Output = T;

    fn index(&self, index: ExprId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

impl<T> std::ops::Index<SymbolId> for Arena<T> {
    type Output = T;

    fn index(&self, index: SymbolId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

/// One analysed file: every expression and symbol the front end resolved, plus the
/// top-level expressions in source order.
///
/// Children are always allocated before their parents, so a child id is strictly
/// smaller than its parent's. [`Body::validate`] checks this for trees that did not
/// come from [`crate::BodyBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Body {
    pub roots: Vec<ExprId>,
    pub exprs: Arena<Expr>,
    pub symbols: Arena<SymbolData>,
}

impl Body {
    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id]
    }

    #[must_use]
    pub fn roots(&self) -> &[ExprId] {
        &self.roots
    }

    /// The symbol an expression refers to, if it is a resolved identifier.
    #[must_use]
    pub fn symbol_of(&self, id: ExprId) -> Option<SymbolId> {
        match self.expr(id) {
            Expr::Identifier { symbol, .. } => *symbol,
            _ => None,
        }
    }

    /// Check that every id is in bounds and that children precede their parents.
    pub fn validate(&self) -> Result<(), BodyError> {
        let expr_count = self.exprs.len();
        let symbol_count = self.symbols.len();

        for &root in &self.roots {
            if root.idx() >= expr_count {
                return Err(BodyError::UnknownExpr { id: root });
            }
        }

        for (raw, expr) in self.exprs.iter() {
            let parent = ExprId::from_raw(raw);
            for child in expr.children() {
                if child.idx() >= expr_count {
                    return Err(BodyError::UnknownExpr { id: child });
                }
                if child >= parent {
                    return Err(BodyError::ChildAfterParent { parent, child });
                }
            }
            if let Expr::Identifier {
                symbol: Some(symbol),
                ..
            } = expr
            {
                if symbol.idx() >= symbol_count {
                    return Err(BodyError::UnknownSymbol { id: *symbol });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    #[error("expression {id:?} is not allocated in this body")]
    UnknownExpr { id: ExprId },
    #[error("symbol {id:?} is not allocated in this body")]
    UnknownSymbol { id: SymbolId },
    #[error("child {child:?} is not allocated before its parent {parent:?}")]
    ChildAfterParent { parent: ExprId, child: ExprId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolData {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Option<TypeName>,
    /// Compile-time value of a constant variable (`final` with a constant initializer).
    #[serde(default)]
    pub constant: Option<ConstantValue>,
}

/// The method an invocation resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub owner: TypeName,
    pub name: String,
    pub params: Vec<TypeName>,
    pub return_type: TypeName,
}

impl MethodSymbol {
    pub fn new(
        owner: impl Into<TypeName>,
        name: impl Into<String>,
        params: &[&str],
        return_type: impl Into<TypeName>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            params: params.iter().map(|p| TypeName::from(*p)).collect(),
            return_type: return_type.into(),
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Int,
    Long,
    Char,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Identifier {
        name: String,
        symbol: Option<SymbolId>,
        span: Span,
    },
    /// `value` is the literal's source token for numbers and the unescaped contents for
    /// strings and chars.
    Literal {
        literal: LiteralKind,
        value: String,
        span: Span,
    },
    MemberSelect {
        receiver: ExprId,
        name: String,
        span: Span,
    },
    MethodInvocation {
        method_select: ExprId,
        args: Vec<ExprId>,
        method: Option<MethodSymbol>,
        span: Span,
    },
    Parenthesized {
        inner: ExprId,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    },
    /// Any node the checks do not interpret (statements, blocks, lambdas, ...).
    Other {
        children: Vec<ExprId>,
        span: Span,
    },
}

impl Expr {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier { span, .. }
            | Expr::Literal { span, .. }
            | Expr::MemberSelect { span, .. }
            | Expr::MethodInvocation { span, .. }
            | Expr::Parenthesized { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Other { span, .. } => *span,
        }
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> Children<'_> {
        match self {
            Expr::Identifier { .. } | Expr::Literal { .. } => Children::new(None, None, &[]),
            Expr::MemberSelect { receiver, .. } => Children::new(Some(*receiver), None, &[]),
            Expr::MethodInvocation {
                method_select,
                args,
                ..
            } => Children::new(Some(*method_select), None, args),
            Expr::Parenthesized { inner, .. } => Children::new(Some(*inner), None, &[]),
            Expr::Unary { operand, .. } => Children::new(Some(*operand), None, &[]),
            Expr::Binary { lhs, rhs, .. } => Children::new(Some(*lhs), Some(*rhs), &[]),
            Expr::Other { children, .. } => Children::new(None, None, children),
        }
    }

    #[must_use]
    pub fn is_method_invocation(&self) -> bool {
        matches!(self, Expr::MethodInvocation { .. })
    }
}

/// Iterator over the direct children of an [`Expr`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    first: Option<ExprId>,
    second: Option<ExprId>,
    rest: &'a [ExprId],
}

impl<'a> Children<'a> {
    fn new(first: Option<ExprId>, second: Option<ExprId>, rest: &'a [ExprId]) -> Self {
        Self {
            first,
            second,
            rest,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ExprId;

    fn next(&mut self) -> Option<ExprId> {
        if let Some(first) = self.first.take() {
            return Some(first);
        }
        if let Some(second) = self.second.take() {
            return Some(second);
        }
        let (head, tail) = self.rest.split_first()?;
        self.rest = tail;
        Some(*head)
    }
}
