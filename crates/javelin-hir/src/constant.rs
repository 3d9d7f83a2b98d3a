//! Compile-time constant folding over [`Body`] expressions.
//!
//! Folding is conservative: anything that is not provably constant (method calls,
//! non-constant variables, overflowing literals, division by zero) yields `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hir::{BinaryOp, Body, Expr, ExprId, LiteralKind, UnaryOp};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Int(i32),
    String(String),
}

impl ConstantValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ConstantValue::Int(value) => Some(*value),
            ConstantValue::String(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(value) => Some(value),
            ConstantValue::Int(_) => None,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Int(value) => write!(f, "{value}"),
            ConstantValue::String(value) => f.write_str(value),
        }
    }
}

enum Step {
    Eval(ExprId),
    Unary(UnaryOp),
    Binary(BinaryOp),
}

/// Fold `expr` to a constant, if it has one.
///
/// Operands are evaluated with an explicit work stack, so long `"a" + "a" + ...`
/// chains fold without recursing.
#[must_use]
pub fn fold(body: &Body, expr: ExprId) -> Option<ConstantValue> {
    let mut steps = vec![Step::Eval(expr)];
    let mut values: Vec<ConstantValue> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Eval(id) => match body.expr(id) {
                Expr::Literal { literal, value, .. } => values.push(match literal {
                    LiteralKind::Int => ConstantValue::Int(parse_int_literal(value)?),
                    LiteralKind::String => ConstantValue::String(value.clone()),
                    _ => return None,
                }),
                Expr::Identifier {
                    symbol: Some(symbol),
                    ..
                } => values.push(body.symbol(*symbol).constant.clone()?),
                Expr::Parenthesized { inner, .. } => steps.push(Step::Eval(*inner)),
                Expr::Unary { op, operand, .. } => {
                    steps.push(Step::Unary(*op));
                    steps.push(Step::Eval(*operand));
                }
                Expr::Binary { op, lhs, rhs, .. } => {
                    steps.push(Step::Binary(*op));
                    steps.push(Step::Eval(*rhs));
                    steps.push(Step::Eval(*lhs));
                }
                _ => return None,
            },
            Step::Unary(op) => {
                let value = values.pop()?.as_int()?;
                values.push(match op {
                    UnaryOp::Plus => ConstantValue::Int(value),
                    UnaryOp::Neg => ConstantValue::Int(value.wrapping_neg()),
                    UnaryOp::Not => return None,
                });
            }
            Step::Binary(op) => {
                let rhs = values.pop()?;
                let lhs = values.pop()?;
                values.push(fold_binary(op, lhs, rhs)?);
            }
        }
    }

    values.pop()
}

/// Fold `expr` and keep it only if it is an `int` constant.
#[must_use]
pub fn resolve_as_int(body: &Body, expr: ExprId) -> Option<i32> {
    fold(body, expr)?.as_int()
}

/// Fold `expr` and keep it only if it is a `String` constant.
#[must_use]
pub fn resolve_as_string(body: &Body, expr: ExprId) -> Option<String> {
    match fold(body, expr)? {
        ConstantValue::String(value) => Some(value),
        ConstantValue::Int(_) => None,
    }
}

fn fold_binary(op: BinaryOp, lhs: ConstantValue, rhs: ConstantValue) -> Option<ConstantValue> {
    use ConstantValue::{Int, String};

    match (op, lhs, rhs) {
        (BinaryOp::Add, Int(a), Int(b)) => Some(Int(a.wrapping_add(b))),
        (BinaryOp::Add, String(mut a), b) => {
            // Left-nested chains keep appending to the same buffer.
            match b {
                String(b) => a.push_str(&b),
                Int(b) => a.push_str(&b.to_string()),
            }
            Some(String(a))
        }
        (BinaryOp::Add, a, String(b)) => Some(String(format!("{a}{b}"))),
        (BinaryOp::Sub, Int(a), Int(b)) => Some(Int(a.wrapping_sub(b))),
        (BinaryOp::Mul, Int(a), Int(b)) => Some(Int(a.wrapping_mul(b))),
        (BinaryOp::Div, Int(_), Int(0)) => None,
        (BinaryOp::Div, Int(a), Int(b)) => Some(Int(a.wrapping_div(b))),
        _ => None,
    }
}

/// Parse a Java `int` literal token (`42`, `0x2A`, `052`, `0b101010`, `1_000`).
///
/// `2147483648` is accepted and wraps to `i32::MIN`; it is only legal as the operand of
/// unary minus, and negating `i32::MIN` with wrapping yields the right value.
pub(crate) fn parse_int_literal(token: &str) -> Option<i32> {
    let digits: std::string::String = token.chars().filter(|c| *c != '_').collect();
    if digits.ends_with(['l', 'L']) {
        return None;
    }

    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(bin) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, bin)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };

    if body.is_empty() {
        return None;
    }

    if radix == 10 {
        let value: i64 = body.parse().ok()?;
        return (value <= 1i64 << 31).then_some(value as i32);
    }

    u32::from_str_radix(body, radix).ok().map(|v| v as i32)
}
