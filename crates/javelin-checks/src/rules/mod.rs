//! Built-in checks.

use javelin_config::ChecksConfig;

use crate::{Check, RegistryError};

pub mod silly_string_operations;

pub use silly_string_operations::SillyStringOperations;

/// Every built-in check that `config` leaves enabled, with its configured severity.
pub fn builtin_checks(config: &ChecksConfig) -> Result<Vec<Box<dyn Check>>, RegistryError> {
    let mut checks: Vec<Box<dyn Check>> = Vec::new();

    let silly = &config.silly_string_operations;
    if silly.enabled {
        let severity = silly.severity_or(SillyStringOperations::DEFAULT_SEVERITY);
        checks.push(Box::new(SillyStringOperations::with_severity(severity)?));
    } else {
        tracing::debug!(
            target: "javelin.checks",
            code = silly_string_operations::CODE,
            "check disabled by configuration"
        );
    }

    Ok(checks)
}
