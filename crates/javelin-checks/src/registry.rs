use std::fmt;

use indexmap::IndexMap;
use javelin_hir::MethodSymbol;
use javelin_types::TypeHierarchy;
use thiserror::Error;

use crate::matcher::MethodMatcher;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("method descriptor {descriptor} does not specify {missing}")]
    Incomplete {
        descriptor: String,
        missing: &'static str,
    },
    #[error(
        "`{name}` with {arity} parameter(s) is registered as {existing} and cannot also be {requested}"
    )]
    Conflict {
        name: String,
        arity: usize,
        existing: String,
        requested: String,
    },
}

/// Set of method descriptors, each tagged with the method identity `M` a check dispatches on.
///
/// Registration order never affects matching: a descriptor is either in the set or not,
/// and two descriptors that could match the same overload (same name and arity) must
/// carry the same tag.
#[derive(Debug, Clone)]
pub struct MethodRegistry<M> {
    entries: IndexMap<MethodMatcher, M>,
}

impl<M> Default for MethodRegistry<M> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<M: Copy + Eq + fmt::Debug> MethodRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (MethodMatcher, M)>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (matcher, method) in entries {
            registry.register(matcher, method)?;
        }
        Ok(registry)
    }

    /// Add `matcher` to the set, tagged with `method`.
    ///
    /// Registering the same descriptor with the same tag again is a no-op.
    pub fn register(&mut self, matcher: MethodMatcher, method: M) -> Result<(), RegistryError> {
        let incomplete = |missing| RegistryError::Incomplete {
            descriptor: format!("{matcher:?}"),
            missing,
        };
        if matcher.owner().is_none() {
            return Err(incomplete("an owner type"));
        }
        let Some(name) = matcher.method_name() else {
            return Err(incomplete("a method name"));
        };
        let Some(arity) = matcher.arity() else {
            return Err(incomplete("a parameter list"));
        };

        let conflicting = self.entries.iter().find(|(other, tag)| {
            **tag != method && other.method_name() == Some(name) && other.arity() == Some(arity)
        });
        if let Some((_, existing)) = conflicting {
            return Err(RegistryError::Conflict {
                name: name.to_owned(),
                arity,
                existing: format!("{existing:?}"),
                requested: format!("{method:?}"),
            });
        }

        self.entries.insert(matcher, method);
        Ok(())
    }

    /// The tag of the descriptor `method` matches, if any.
    #[must_use]
    pub fn find(&self, method: &MethodSymbol, types: &dyn TypeHierarchy) -> Option<M> {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher.matches_method(method, types))
            .map(|(_, tag)| *tag)
    }

    #[must_use]
    pub fn matches(&self, method: &MethodSymbol, types: &dyn TypeHierarchy) -> bool {
        self.find(method, types).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MethodMatcher, M)> {
        self.entries.iter().map(|(matcher, tag)| (matcher, *tag))
    }
}
