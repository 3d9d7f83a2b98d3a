use javelin_hir::{Body, Expr, ExprId, MethodSymbol};
use javelin_types::{TypeHierarchy, TypeName};

/// Constraint on a single type position (owner or parameter) of a [`MethodMatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeCriteria {
    /// Exactly this type.
    Is(TypeName),
    /// This type or any subtype of it, as answered by the [`TypeHierarchy`].
    SubtypeOf(TypeName),
    Any,
}

impl TypeCriteria {
    pub fn is(name: impl Into<TypeName>) -> Self {
        TypeCriteria::Is(name.into())
    }

    pub fn subtype_of(name: impl Into<TypeName>) -> Self {
        TypeCriteria::SubtypeOf(name.into())
    }

    pub fn any() -> Self {
        TypeCriteria::Any
    }

    #[must_use]
    pub fn matches(&self, ty: &TypeName, types: &dyn TypeHierarchy) -> bool {
        match self {
            TypeCriteria::Is(expected) => ty == expected,
            TypeCriteria::SubtypeOf(sup) => types.is_subtype(ty, sup),
            TypeCriteria::Any => true,
        }
    }
}

/// Declarative description of "method `name` on type `T` with parameters `P1..Pk`".
///
/// ```
/// # use javelin_checks::MethodMatcher;
/// let index_of = MethodMatcher::new()
///     .type_definition("java.lang.String")
///     .name("indexOf")
///     .add_parameter("java.lang.String")
///     .add_parameter("int");
/// assert_eq!(index_of.arity(), Some(2));
/// ```
///
/// Parameters are compared against the declared parameter types of the method the
/// invocation resolved to, position by position; arity must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MethodMatcher {
    owner: Option<TypeCriteria>,
    name: Option<String>,
    params: Option<Vec<TypeCriteria>>,
}

impl MethodMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn type_definition(self, owner: impl Into<TypeName>) -> Self {
        self.type_definition_criteria(TypeCriteria::is(owner))
    }

    #[must_use]
    pub fn type_definition_criteria(mut self, owner: TypeCriteria) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn add_parameter(self, ty: impl Into<TypeName>) -> Self {
        self.add_parameter_criteria(TypeCriteria::is(ty))
    }

    #[must_use]
    pub fn add_parameter_criteria(mut self, criteria: TypeCriteria) -> Self {
        self.params.get_or_insert_with(Vec::new).push(criteria);
        self
    }

    #[must_use]
    pub fn without_parameters(mut self) -> Self {
        self.params = Some(Vec::new());
        self
    }

    pub fn owner(&self) -> Option<&TypeCriteria> {
        self.owner.as_ref()
    }

    pub fn method_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parameters(&self) -> Option<&[TypeCriteria]> {
        self.params.as_deref()
    }

    /// Number of parameters, if the parameter list was specified.
    pub fn arity(&self) -> Option<usize> {
        self.params.as_ref().map(Vec::len)
    }

    /// Unset parts of the descriptor match anything.
    #[must_use]
    pub fn matches_method(&self, method: &MethodSymbol, types: &dyn TypeHierarchy) -> bool {
        if let Some(name) = &self.name {
            if *name != method.name {
                return false;
            }
        }

        if let Some(owner) = &self.owner {
            if !owner.matches(&method.owner, types) {
                return false;
            }
        }

        match &self.params {
            Some(params) => {
                params.len() == method.params.len()
                    && params
                        .iter()
                        .zip(&method.params)
                        .all(|(criteria, ty)| criteria.matches(ty, types))
            }
            None => true,
        }
    }

    /// Whether `expr` is an invocation whose resolved method matches. Unresolved
    /// invocations and other node kinds never match.
    #[must_use]
    pub fn matches(&self, body: &Body, expr: ExprId, types: &dyn TypeHierarchy) -> bool {
        match body.expr(expr) {
            Expr::MethodInvocation {
                method: Some(method),
                ..
            } => self.matches_method(method, types),
            _ => false,
        }
    }
}
