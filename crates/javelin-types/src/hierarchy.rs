use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully qualified Java type names used by the minimal JDK model.
pub mod well_known {
    pub const OBJECT: &str = "java.lang.Object";
    pub const STRING: &str = "java.lang.String";
    pub const CHAR_SEQUENCE: &str = "java.lang.CharSequence";
    pub const COMPARABLE: &str = "java.lang.Comparable";
    pub const SERIALIZABLE: &str = "java.io.Serializable";
    pub const APPENDABLE: &str = "java.lang.Appendable";
    pub const ABSTRACT_STRING_BUILDER: &str = "java.lang.AbstractStringBuilder";
    pub const STRING_BUILDER: &str = "java.lang.StringBuilder";
    pub const STRING_BUFFER: &str = "java.lang.StringBuffer";
    pub const NUMBER: &str = "java.lang.Number";
    pub const INTEGER: &str = "java.lang.Integer";
    pub const STRING_ARRAY: &str = "java.lang.String[]";

    pub const INT: &str = "int";
    pub const LONG: &str = "long";
    pub const CHAR: &str = "char";
    pub const BOOLEAN: &str = "boolean";
    pub const VOID: &str = "void";

    pub const PRIMITIVES: &[&str] = &[
        "boolean", "byte", "short", "char", "int", "long", "float", "double", "void",
    ];
}

/// A fully qualified type name (`java.lang.String`, `int`, `java.lang.String[]`).
///
/// Type identity is by name: the front end is responsible for handing out canonical
/// names (no simple names, no generic arguments).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_primitive(&self) -> bool {
        well_known::PRIMITIVES.contains(&self.0.as_str())
    }

    pub fn is_array(&self) -> bool {
        self.0.ends_with("[]")
    }

    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Subtype oracle supplied by the semantic model.
pub trait TypeHierarchy {
    /// Returns `true` if `sub` is `sup` or a (transitive) subtype of it.
    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool;
}

/// In-memory class hierarchy keyed by fully qualified name.
///
/// Only direct supertypes are stored; subtype queries walk the graph breadth first.
/// Unknown reference types are treated as direct subclasses of `java.lang.Object`.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    supertypes: HashMap<TypeName, Vec<TypeName>>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the `java.lang` types the built-in checks talk about.
    pub fn with_minimal_jdk() -> Self {
        use well_known::*;

        let mut store = Self::new();
        store.add_class(OBJECT, &[]);
        store.add_class(SERIALIZABLE, &[]);
        store.add_class(COMPARABLE, &[]);
        store.add_class(APPENDABLE, &[]);
        store.add_class(CHAR_SEQUENCE, &[]);
        store.add_class(STRING, &[OBJECT, CHAR_SEQUENCE, COMPARABLE, SERIALIZABLE]);
        store.add_class(ABSTRACT_STRING_BUILDER, &[OBJECT, APPENDABLE, CHAR_SEQUENCE]);
        store.add_class(
            STRING_BUILDER,
            &[ABSTRACT_STRING_BUILDER, SERIALIZABLE, COMPARABLE],
        );
        store.add_class(
            STRING_BUFFER,
            &[ABSTRACT_STRING_BUILDER, SERIALIZABLE, COMPARABLE],
        );
        store.add_class(NUMBER, &[OBJECT, SERIALIZABLE]);
        store.add_class(INTEGER, &[NUMBER, COMPARABLE]);
        store
    }

    /// Define (or redefine) `name` with the given direct supertypes.
    pub fn add_class(&mut self, name: impl Into<TypeName>, supertypes: &[&str]) {
        self.supertypes.insert(
            name.into(),
            supertypes.iter().map(|s| TypeName::from(*s)).collect(),
        );
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.supertypes.contains_key(name)
    }

    fn direct_supertypes<'a>(&'a self, ty: &TypeName) -> Box<dyn Iterator<Item = TypeName> + 'a> {
        if ty.is_primitive() {
            return Box::new(std::iter::empty());
        }
        if ty.is_array() {
            return Box::new(
                [
                    well_known::OBJECT,
                    "java.lang.Cloneable",
                    well_known::SERIALIZABLE,
                ]
                .into_iter()
                .map(TypeName::from),
            );
        }
        match self.supertypes.get(ty) {
            Some(supers) => Box::new(supers.iter().cloned()),
            None if ty.is(well_known::OBJECT) => Box::new(std::iter::empty()),
            None => Box::new(std::iter::once(TypeName::from(well_known::OBJECT))),
        }
    }
}

impl TypeHierarchy for TypeStore {
    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool {
        if sub == sup {
            return true;
        }
        if sub.is_primitive() || sup.is_primitive() {
            return false;
        }

        let mut seen: HashSet<TypeName> = HashSet::new();
        let mut queue: VecDeque<TypeName> = VecDeque::new();
        seen.insert(sub.clone());
        queue.push_back(sub.clone());

        while let Some(current) = queue.pop_front() {
            for next in self.direct_supertypes(&current) {
                if &next == sup {
                    return true;
                }
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        false
    }
}
