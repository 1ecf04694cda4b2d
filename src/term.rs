use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a logic variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VarId(u64);

impl VarId {
    fn fresh() -> Self {
        Self(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ids read from outside move the counter past them, so variables created
/// afterwards never reuse one.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for VarId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u64::deserialize(deserializer)?;
        NEXT_VAR_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
        Ok(Self(id))
    }
}

/// A logic variable.
///
/// Two variables are the same variable iff their ids match; the name is only
/// used for display and for reporting answer bindings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Var {
    id: VarId,
    name: Arc<str>,
}

impl Var {
    /// Create a brand-new variable
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: VarId::fresh(),
            name: Arc::from(name.into()),
        }
    }

    /// A new variable carrying the same display name
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self {
            id: VarId::fresh(),
            name: Arc::clone(&self.name),
        }
    }

    /// The variable's identity
    #[must_use]
    pub fn id(&self) -> VarId {
        self.id
    }

    /// The display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A ground constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Atom {
    /// An integer (e.g., `0`, `42`)
    Int(i64),
    /// A symbol (e.g., `abraham`, `nil`)
    Symbol(String),
    /// A string literal (e.g., `"hello"`)
    Str(String),
    /// A boolean
    Bool(bool),
}

impl From<i64> for Atom {
    fn from(value: i64) -> Self {
        Atom::Int(value)
    }
}

impl From<bool> for Atom {
    fn from(value: bool) -> Self {
        Atom::Bool(value)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Atom::Symbol(value.to_string())
    }
}

/// A named term of fixed arity (e.g., `father(abraham, isaac)`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compound {
    /// The functor name
    pub functor: String,
    /// The ordered arguments
    pub args: Vec<Term>,
}

impl Compound {
    /// Number of arguments
    #[must_use]
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A term of the logic language.
///
/// Lists and compounds share their children, so cloning a term is O(1)
/// whatever its size.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A unification-capable placeholder
    Var(Var),
    /// Unifies with anything and is never bound
    Wildcard,
    /// A ground constant
    Atom(Atom),
    /// A positional container, unified element-wise
    List(Arc<[Term]>),
    /// A functor applied to arguments
    Compound(Arc<Compound>),
}

/// The shared wildcard term
pub const WILDCARD: Term = Term::Wildcard;

impl Term {
    /// A new variable term with the given display name
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Var::new(name))
    }

    /// The wildcard `_`
    #[must_use]
    pub fn wildcard() -> Self {
        WILDCARD
    }

    /// A symbol constant
    #[must_use]
    pub fn sym(name: impl Into<String>) -> Self {
        Term::Atom(Atom::Symbol(name.into()))
    }

    /// An integer constant
    #[must_use]
    pub fn int(value: i64) -> Self {
        Term::Atom(Atom::Int(value))
    }

    /// A string constant
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Term::Atom(Atom::Str(value.into()))
    }

    /// A boolean constant
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Term::Atom(Atom::Bool(value))
    }

    /// A list of terms
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Term>) -> Self {
        Term::List(items.into_iter().collect())
    }

    /// A compound term `functor(args...)`
    #[must_use]
    pub fn compound(functor: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Compound(Arc::new(Compound {
            functor: functor.into(),
            args: args.into_iter().collect(),
        }))
    }

    /// Returns true for the wildcard
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Term::Wildcard)
    }

    /// Returns the variable if this term is one
    #[must_use]
    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(var) => Some(var),
            _ => None,
        }
    }

    /// Functor name and arity for compounds and symbols (arity 0)
    #[must_use]
    pub fn indicator(&self) -> Option<(&str, usize)> {
        match self {
            Term::Compound(c) => Some((c.functor.as_str(), c.arity())),
            Term::Atom(Atom::Symbol(name)) => Some((name.as_str(), 0)),
            _ => None,
        }
    }

    /// True when the term contains no variables (wildcards count as ground)
    #[must_use]
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::Wildcard | Term::Atom(_) => true,
            Term::List(items) => items.iter().all(Term::is_ground),
            Term::Compound(c) => c.args.iter().all(Term::is_ground),
        }
    }

    /// Distinct variables in order of first occurrence
    #[must_use]
    pub fn variables(&self) -> IndexSet<&Var> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables<'t>(&'t self, vars: &mut IndexSet<&'t Var>) {
        match self {
            Term::Var(var) => {
                vars.insert(var);
            }
            Term::List(items) => items.iter().for_each(|t| t.collect_variables(vars)),
            Term::Compound(c) => c.args.iter().for_each(|t| t.collect_variables(vars)),
            Term::Wildcard | Term::Atom(_) => {}
        }
    }
}

/// Structural equality for direct literal comparison.
///
/// A wildcard compares equal to anything, so this relation is not
/// transitive and `Term` does not implement `Eq`.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Wildcard, _) | (_, Term::Wildcard) => true,
            (Term::Var(a), Term::Var(b)) => a == b,
            (Term::Atom(a), Term::Atom(b)) => a == b,
            (Term::List(a), Term::List(b)) => a == b,
            (Term::Compound(a), Term::Compound(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::int(value)
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::bool(value)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::sym(value)
    }
}

/// One condition of a rule body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Goal {
    /// A term to prove
    Term(Term),
    /// Commit to the choices made so far in the enclosing clause
    Cut,
}

/// The shared cut marker
pub const CUT: Goal = Goal::Cut;

impl Goal {
    /// The goal's term, if it is not a cut
    #[must_use]
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Goal::Term(term) => Some(term),
            Goal::Cut => None,
        }
    }
}

impl From<Term> for Goal {
    fn from(term: Term) -> Self {
        Goal::Term(term)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(n) => write!(f, "{n}"),
            Atom::Symbol(s) => write!(f, "{s}"),
            Atom::Str(s) => write!(f, "{s:?}"),
            Atom::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{term}")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(var) => write!(f, "{var}"),
            Term::Wildcard => f.write_str("_"),
            Term::Atom(atom) => write!(f, "{atom}"),
            Term::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Term::Compound(c) => {
                write!(f, "{}(", c.functor)?;
                write_joined(f, &c.args)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Term(term) => write!(f, "{term}"),
            Goal::Cut => f.write_str("!"),
        }
    }
}
