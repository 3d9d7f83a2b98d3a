use javelin_config::ChecksConfig;

use crate::rules::builtin_checks;
use crate::{Check, CheckContext, DiagnosticSink, Issue, RegistryError};

/// Owns the enabled checks and runs them, in registration order, over one file at a time.
///
/// Immutable once built, so a single analyzer can be shared across threads.
#[derive(Default)]
pub struct Analyzer {
    checks: Vec<Box<dyn Check>>,
}

impl Analyzer {
    /// All built-in checks with their default settings.
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_config(&ChecksConfig::default())
    }

    pub fn from_config(config: &ChecksConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            checks: builtin_checks(config)?,
        })
    }

    /// An analyzer with no checks; add them with [`Analyzer::register`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.code())
    }

    /// Runs every check over `ctx.body`. Files without semantics, and trees that fail
    /// [`javelin_hir::Body::validate`], are skipped.
    pub fn analyze(&self, ctx: CheckContext<'_>, sink: &mut dyn DiagnosticSink) {
        if !ctx.has_semantic {
            tracing::debug!(
                target: "javelin.checks",
                "no semantic model for this file; skipping all checks"
            );
            return;
        }
        if let Err(err) = ctx.body.validate() {
            tracing::debug!(
                target: "javelin.checks",
                error = %err,
                "malformed expression tree; skipping all checks"
            );
            return;
        }

        let mut counting = CountingSink { inner: sink, count: 0 };
        for check in &self.checks {
            let _span =
                tracing::debug_span!(target: "javelin.checks", "check", code = check.code())
                    .entered();
            check.run(ctx, &mut counting);
        }

        tracing::debug!(
            target: "javelin.checks",
            checks = self.checks.len(),
            issues = counting.count,
            "analysis finished"
        );
    }

    #[must_use]
    pub fn analyze_to_vec(&self, ctx: CheckContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.analyze(ctx, &mut issues);
        issues
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("checks", &self.codes().collect::<Vec<_>>())
            .finish()
    }
}

struct CountingSink<'s> {
    inner: &'s mut dyn DiagnosticSink,
    count: usize,
}

impl DiagnosticSink for CountingSink<'_> {
    fn report(&mut self, issue: Issue) {
        self.count += 1;
        self.inner.report(issue);
    }
}
