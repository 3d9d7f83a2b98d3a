use javelin_hir::{Body, BodyBuilder, Expr, MethodSymbol};
use javelin_types::well_known::{INT, STRING};

use pretty_assertions::assert_eq;

#[test]
fn bodies_survive_a_json_round_trip() {
    let mut b = BodyBuilder::new();
    let s = b.parameter("s", STRING);
    let recv = b.ident(s);
    let len_recv = b.ident(s);
    let len = b.call(
        len_recv,
        "length",
        [],
        Some(MethodSymbol::new(STRING, "length", &[], INT)),
    );
    let zero = b.int_lit("0");
    let call = b.call(
        recv,
        "substring",
        [zero, len],
        Some(MethodSymbol::new(STRING, "substring", &[INT, INT], STRING)),
    );
    b.root(call);
    let body = b.finish();

    let json = serde_json::to_string(&body).expect("serialize body");
    let decoded: Body = serde_json::from_str(&json).expect("deserialize body");
    assert_eq!(decoded, body);
    assert!(decoded.validate().is_ok());
}

#[test]
fn hand_written_front_end_dump_is_accepted() {
    let json = r#"{
        "roots": [2],
        "exprs": [
            { "kind": "identifier", "name": "s", "symbol": 0, "span": { "start": 0, "end": 1 } },
            { "kind": "member_select", "receiver": 0, "name": "isEmpty", "span": { "start": 0, "end": 9 } },
            {
                "kind": "method_invocation",
                "method_select": 1,
                "args": [],
                "method": {
                    "owner": "java.lang.String",
                    "name": "isEmpty",
                    "params": [],
                    "return_type": "boolean"
                },
                "span": { "start": 0, "end": 11 }
            }
        ],
        "symbols": [
            { "name": "s", "kind": "local", "ty": "java.lang.String" }
        ]
    }"#;

    let body: Body = serde_json::from_str(json).expect("deserialize dump");
    assert!(body.validate().is_ok());

    let Expr::MethodInvocation {
        method_select,
        method,
        ..
    } = body.expr(body.roots()[0])
    else {
        panic!("root should be an invocation");
    };
    assert_eq!(method.as_ref().map(|m| m.name.as_str()), Some("isEmpty"));

    let Expr::MemberSelect { receiver, .. } = body.expr(*method_select) else {
        panic!("select should be a member select");
    };
    let symbol = body.symbol_of(*receiver).expect("receiver is resolved");
    assert_eq!(body.symbol(symbol).name, "s");
    assert_eq!(body.symbol(symbol).constant, None);
}
