use javelin_hir::constant::{fold, resolve_as_int, resolve_as_string};
use javelin_hir::{BinaryOp, BodyBuilder, ConstantValue, MethodSymbol, UnaryOp};
use javelin_types::well_known::{INT, STRING};

use pretty_assertions::assert_eq;

#[test]
fn literals_fold_to_themselves() {
    let mut b = BodyBuilder::new();
    let zero = b.int_lit("0");
    let hex = b.int_lit("0x10");
    let text = b.string_lit("abc");
    let ch = b.char_lit("a");
    let body = b.finish();

    assert_eq!(resolve_as_int(&body, zero), Some(0));
    assert_eq!(resolve_as_int(&body, hex), Some(16));
    assert_eq!(resolve_as_string(&body, text), Some("abc".to_string()));
    assert_eq!(fold(&body, ch), None);
}

#[test]
fn int_and_string_resolution_do_not_cross() {
    let mut b = BodyBuilder::new();
    let zero = b.int_lit("0");
    let text = b.string_lit("0");
    let body = b.finish();

    assert_eq!(resolve_as_string(&body, zero), None);
    assert_eq!(resolve_as_int(&body, text), None);
}

#[test]
fn arithmetic_folds_with_java_wrapping() {
    let mut b = BodyBuilder::new();
    let max = b.int_lit("2147483647");
    let one = b.int_lit("1");
    let sum = b.binary(BinaryOp::Add, max, one);
    let two = b.int_lit("2");
    let three = b.int_lit("3");
    let product = b.binary(BinaryOp::Mul, two, three);
    let six = b.int_lit("6");
    let difference = b.binary(BinaryOp::Sub, product, six);
    let body = b.finish();

    assert_eq!(resolve_as_int(&body, sum), Some(i32::MIN));
    assert_eq!(resolve_as_int(&body, difference), Some(0));
}

#[test]
fn negated_min_literal_is_min() {
    let mut b = BodyBuilder::new();
    let lit = b.int_lit("2147483648");
    let neg = b.unary(UnaryOp::Neg, lit);
    let one = b.int_lit("1");
    let minus_one = b.unary(UnaryOp::Neg, one);
    let body = b.finish();

    assert_eq!(resolve_as_int(&body, neg), Some(i32::MIN));
    assert_eq!(resolve_as_int(&body, minus_one), Some(-1));
}

#[test]
fn division_by_zero_is_not_constant() {
    let mut b = BodyBuilder::new();
    let one = b.int_lit("1");
    let zero = b.int_lit("0");
    let div = b.binary(BinaryOp::Div, one, zero);
    let body = b.finish();

    assert_eq!(fold(&body, div), None);
}

#[test]
fn string_concatenation_folds_mixed_operands() {
    let mut b = BodyBuilder::new();
    let a = b.string_lit("a");
    let one = b.int_lit("1");
    let concat = b.binary(BinaryOp::Add, a, one);
    let paren = b.parenthesized(concat);
    let c = b.string_lit("c");
    let full = b.binary(BinaryOp::Add, paren, c);
    let body = b.finish();

    assert_eq!(resolve_as_string(&body, full), Some("a1c".to_string()));
}

#[test]
fn constant_variables_fold_but_plain_locals_do_not() {
    let mut b = BodyBuilder::new();
    let prefix = b.constant("PREFIX", STRING, ConstantValue::String("id-".into()));
    let start = b.constant("START", INT, ConstantValue::Int(0));
    let local = b.local("s", STRING);
    let prefix_ref = b.ident(prefix);
    let start_ref = b.ident(start);
    let local_ref = b.ident(local);
    let unresolved = b.unresolved_ident("UNKNOWN");
    let body = b.finish();

    assert_eq!(resolve_as_string(&body, prefix_ref), Some("id-".to_string()));
    assert_eq!(resolve_as_int(&body, start_ref), Some(0));
    assert_eq!(fold(&body, local_ref), None);
    assert_eq!(fold(&body, unresolved), None);
}

#[test]
fn method_calls_are_never_constant() {
    let mut b = BodyBuilder::new();
    let text = b.string_lit("abc");
    let call = b.call(
        text,
        "length",
        [],
        Some(MethodSymbol::new(STRING, "length", &[], INT)),
    );
    let body = b.finish();

    assert_eq!(fold(&body, call), None);
}

#[test]
fn long_concatenation_chains_fold_without_recursing() {
    let mut b = BodyBuilder::new();
    let mut expr = b.string_lit("a");
    for _ in 1..100_000 {
        let next = b.string_lit("a");
        expr = b.binary(BinaryOp::Add, expr, next);
    }
    let negated = {
        let mut operand = b.int_lit("7");
        for _ in 0..100_000 {
            operand = b.unary(UnaryOp::Neg, operand);
        }
        operand
    };
    let body = b.finish();

    assert_eq!(resolve_as_string(&body, expr).map(|s| s.len()), Some(100_000));
    assert_eq!(resolve_as_int(&body, negated), Some(7));
}
