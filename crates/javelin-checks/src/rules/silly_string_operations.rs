//! Calls on `java.lang.String` whose result is known without running them:
//! `s.indexOf(s)`, `s.substring(0)`, `"a".replaceAll("a", "a")` and friends.

use javelin_hir::constant;
use javelin_hir::{Body, Expr, ExprId, SymbolId};
use javelin_types::well_known::{CHAR, CHAR_SEQUENCE, INT, STRING};
use javelin_types::{Diagnostic, Severity};

use crate::{
    run_method_invocation_check, Check, CheckContext, DiagnosticSink, Found, Issue,
    MethodInvocationCheck, MethodMatcher, MethodRegistry, RegistryError, TypeCriteria,
};

pub const CODE: &str = "SILLY_STRING_OPERATION";

/// The `String` methods this check recognises. Overloads share a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringMethod {
    Contains,
    CompareTo,
    CompareToIgnoreCase,
    EndsWith,
    IndexOf,
    LastIndexOf,
    Matches,
    Replace,
    ReplaceAll,
    ReplaceFirst,
    Split,
    StartsWith,
    Substring,
}

impl StringMethod {
    pub const ALL: [StringMethod; 13] = [
        StringMethod::Contains,
        StringMethod::CompareTo,
        StringMethod::CompareToIgnoreCase,
        StringMethod::EndsWith,
        StringMethod::IndexOf,
        StringMethod::LastIndexOf,
        StringMethod::Matches,
        StringMethod::Replace,
        StringMethod::ReplaceAll,
        StringMethod::ReplaceFirst,
        StringMethod::Split,
        StringMethod::StartsWith,
        StringMethod::Substring,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StringMethod::Contains => "contains",
            StringMethod::CompareTo => "compareTo",
            StringMethod::CompareToIgnoreCase => "compareToIgnoreCase",
            StringMethod::EndsWith => "endsWith",
            StringMethod::IndexOf => "indexOf",
            StringMethod::LastIndexOf => "lastIndexOf",
            StringMethod::Matches => "matches",
            StringMethod::Replace => "replace",
            StringMethod::ReplaceAll => "replaceAll",
            StringMethod::ReplaceFirst => "replaceFirst",
            StringMethod::Split => "split",
            StringMethod::StartsWith => "startsWith",
            StringMethod::Substring => "substring",
        }
    }

    pub fn decision(self) -> Decision {
        match self {
            StringMethod::Contains
            | StringMethod::CompareTo
            | StringMethod::CompareToIgnoreCase
            | StringMethod::EndsWith
            | StringMethod::IndexOf
            | StringMethod::LastIndexOf
            | StringMethod::Matches
            | StringMethod::Split
            | StringMethod::StartsWith => Decision::SameArgument,
            StringMethod::ReplaceAll | StringMethod::ReplaceFirst => Decision::ReplaceWithSelf,
            StringMethod::Replace => Decision::Never,
            StringMethod::Substring => Decision::Substring,
        }
    }
}

/// How a call is judged redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The receiver and the first argument are the same string.
    SameArgument,
    /// The receiver equals both the target and the replacement.
    ReplaceWithSelf,
    /// `s.substring(0)`, `s.substring(s.length())` or `s.substring(0, s.length())`.
    Substring,
    /// Registered so the overload is recognised, but never reported.
    Never,
}

/// `(method, parameter types)` for every registered overload.
fn descriptors() -> Vec<(StringMethod, MethodMatcher)> {
    use StringMethod::*;

    let string = |method: StringMethod| {
        MethodMatcher::new()
            .type_definition(STRING)
            .name(method.name())
    };
    vec![
        (
            Contains,
            string(Contains).add_parameter_criteria(TypeCriteria::subtype_of(CHAR_SEQUENCE)),
        ),
        (CompareTo, string(CompareTo).add_parameter(STRING)),
        (CompareToIgnoreCase, string(CompareToIgnoreCase).add_parameter(STRING)),
        (EndsWith, string(EndsWith).add_parameter(STRING)),
        (IndexOf, string(IndexOf).add_parameter(STRING)),
        (IndexOf, string(IndexOf).add_parameter(STRING).add_parameter(INT)),
        (LastIndexOf, string(LastIndexOf).add_parameter(STRING)),
        (LastIndexOf, string(LastIndexOf).add_parameter(STRING).add_parameter(INT)),
        (Matches, string(Matches).add_parameter(STRING)),
        (Replace, string(Replace).add_parameter(CHAR).add_parameter(CHAR)),
        (
            Replace,
            string(Replace)
                .add_parameter(CHAR_SEQUENCE)
                .add_parameter(CHAR_SEQUENCE),
        ),
        (ReplaceAll, string(ReplaceAll).add_parameter(STRING).add_parameter(STRING)),
        (ReplaceFirst, string(ReplaceFirst).add_parameter(STRING).add_parameter(STRING)),
        (Split, string(Split).add_parameter(STRING)),
        (Split, string(Split).add_parameter(STRING).add_parameter(INT)),
        (StartsWith, string(StartsWith).add_parameter(STRING)),
        (StartsWith, string(StartsWith).add_parameter(STRING).add_parameter(INT)),
        (Substring, string(Substring).add_parameter(INT)),
        (Substring, string(Substring).add_parameter(INT).add_parameter(INT)),
    ]
}

fn string_length() -> MethodMatcher {
    MethodMatcher::new()
        .type_definition(STRING)
        .name("length")
        .without_parameters()
}

pub struct SillyStringOperations {
    registry: MethodRegistry<StringMethod>,
    string_length: MethodMatcher,
    severity: Severity,
}

impl SillyStringOperations {
    pub const DEFAULT_SEVERITY: Severity = Severity::Warning;

    pub fn new() -> Result<Self, RegistryError> {
        Self::with_severity(Self::DEFAULT_SEVERITY)
    }

    pub fn with_severity(severity: Severity) -> Result<Self, RegistryError> {
        let registry = MethodRegistry::from_entries(
            descriptors()
                .into_iter()
                .map(|(method, matcher)| (matcher, method)),
        )?;
        Ok(Self {
            registry,
            string_length: string_length(),
            severity,
        })
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    fn is_redundant(&self, ctx: CheckContext<'_>, found: &Found<'_, StringMethod>) -> bool {
        let body = ctx.body;
        let Expr::MethodInvocation {
            method_select,
            args,
            ..
        } = body.expr(found.invocation)
        else {
            return false;
        };
        let Expr::MemberSelect { receiver, .. } = body.expr(*method_select) else {
            return false;
        };
        let receiver = *receiver;

        match (found.tag.decision(), args.as_slice()) {
            (Decision::Never, _) => false,
            (Decision::SameArgument, [first, ..]) => is_same_string(body, receiver, *first),
            (Decision::ReplaceWithSelf, [target, replacement, ..]) => {
                is_same_string(body, receiver, *target)
                    && is_same_string(body, receiver, *replacement)
            }
            (Decision::Substring, [begin]) => {
                is_zero(body, *begin)
                    || self.is_string_length(ctx, body.symbol_of(receiver), *begin)
            }
            (Decision::Substring, [begin, end]) => {
                is_zero(body, *begin)
                    && self.is_string_length(ctx, body.symbol_of(receiver), *end)
            }
            // Argument count disagrees with the resolved overload.
            _ => false,
        }
    }

    /// `expr` is `recv.length()` on `String`, where `recv` is an identifier for `string`.
    fn is_string_length(
        &self,
        ctx: CheckContext<'_>,
        string: Option<SymbolId>,
        expr: ExprId,
    ) -> bool {
        let Some(string) = string else {
            return false;
        };
        if !self.string_length.matches(ctx.body, expr, ctx.types) {
            return false;
        }
        let Expr::MethodInvocation { method_select, .. } = ctx.body.expr(expr) else {
            return false;
        };
        match ctx.body.expr(*method_select) {
            Expr::MemberSelect { receiver, .. } => ctx.body.symbol_of(*receiver) == Some(string),
            _ => false,
        }
    }
}

impl MethodInvocationCheck for SillyStringOperations {
    type Method = StringMethod;

    fn registry(&self) -> &MethodRegistry<StringMethod> {
        &self.registry
    }

    fn on_invocation(
        &self,
        ctx: CheckContext<'_>,
        found: Found<'_, StringMethod>,
        sink: &mut dyn DiagnosticSink,
    ) {
        if !self.is_redundant(ctx, &found) {
            return;
        }
        let message = format!(
            "Remove this \"{}\" call; it has predictable results.",
            found.tag.name()
        );
        sink.report(Issue::at(
            ctx.body,
            found.invocation,
            Diagnostic::new(self.severity, CODE, message, None),
        ));
    }
}

impl Check for SillyStringOperations {
    fn code(&self) -> &'static str {
        CODE
    }

    fn run(&self, ctx: CheckContext<'_>, sink: &mut dyn DiagnosticSink) {
        run_method_invocation_check(self, ctx, sink);
    }
}

/// Both expressions are identifiers bound to one symbol, or both fold to the same
/// string constant.
fn is_same_string(body: &Body, expr: ExprId, other: ExprId) -> bool {
    if let (Some(a), Some(b)) = (body.symbol_of(expr), body.symbol_of(other)) {
        if a == b {
            return true;
        }
    }
    match (
        constant::resolve_as_string(body, expr),
        constant::resolve_as_string(body, other),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn is_zero(body: &Body, expr: ExprId) -> bool {
    constant::resolve_as_int(body, expr) == Some(0)
}
