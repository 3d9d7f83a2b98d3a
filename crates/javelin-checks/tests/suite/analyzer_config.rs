use javelin_checks::{Analyzer, CheckContext};
use javelin_config::{ChecksConfig, JavelinConfig};
use javelin_hir::{Body, BodyBuilder};
use javelin_types::well_known::STRING;
use javelin_types::{Severity, TypeStore};
use pretty_assertions::assert_eq;

use crate::fixture::string_call;

/// `s.endsWith(s)`
fn redundant_body() -> Body {
    let mut b = BodyBuilder::new();
    let s = b.local("s", STRING);
    let recv = b.ident(s);
    let arg = b.ident(s);
    let call = string_call(&mut b, recv, "endsWith", &[STRING], [arg]);
    b.root(call);
    b.finish()
}

fn severities(analyzer: &Analyzer, body: &Body) -> Vec<Severity> {
    let types = TypeStore::with_minimal_jdk();
    analyzer
        .analyze_to_vec(CheckContext::new(body, &types))
        .into_iter()
        .map(|issue| issue.diagnostic.severity)
        .collect()
}

#[test]
fn default_config_enables_every_builtin_check() {
    let analyzer = Analyzer::from_config(&ChecksConfig::default()).unwrap();
    assert_eq!(
        analyzer.codes().collect::<Vec<_>>(),
        vec!["SILLY_STRING_OPERATION"]
    );
    assert_eq!(severities(&analyzer, &redundant_body()), vec![Severity::Warning]);
}

#[test]
fn disabled_check_reports_nothing() {
    let config = JavelinConfig::load_from_str(
        "[checks.silly_string_operations]\nenabled = false\n",
    )
    .unwrap();
    let analyzer = Analyzer::from_config(&config.checks).unwrap();
    assert_eq!(analyzer.codes().count(), 0);
    assert_eq!(severities(&analyzer, &redundant_body()), vec![]);
}

#[test]
fn severity_override_is_applied() {
    let config = JavelinConfig::load_from_str(
        "[checks.silly_string_operations]\nseverity = \"error\"\n",
    )
    .unwrap();
    let analyzer = Analyzer::from_config(&config.checks).unwrap();
    assert_eq!(severities(&analyzer, &redundant_body()), vec![Severity::Error]);
}

#[test]
fn missing_semantics_produce_no_issues() {
    let types = TypeStore::with_minimal_jdk();
    let body = redundant_body();
    let analyzer = Analyzer::new().unwrap();
    assert_eq!(
        analyzer.analyze_to_vec(CheckContext::without_semantics(&body, &types)),
        vec![]
    );
}

#[test]
fn issues_reach_a_custom_sink() {
    struct Codes(Vec<&'static str>);

    impl javelin_checks::DiagnosticSink for Codes {
        fn report(&mut self, issue: javelin_checks::Issue) {
            self.0.push(issue.diagnostic.code);
        }
    }

    let types = TypeStore::with_minimal_jdk();
    let body = redundant_body();
    let mut sink = Codes(Vec::new());
    Analyzer::new()
        .unwrap()
        .analyze(CheckContext::new(&body, &types), &mut sink);
    assert_eq!(sink.0, vec!["SILLY_STRING_OPERATION"]);
}
