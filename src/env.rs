use crate::term::{Compound, Term, Var, VarId};
use indexmap::IndexMap;
use std::sync::Arc;

/// Substitution environment: an immutable mapping from variables to terms.
///
/// The map is shared copy-on-write. Cloning an environment is O(1) and
/// extending a clone never affects the original, so choice points can hold
/// on to the environment that was current when they were created.
///
/// Invariants:
/// - no wildcard is ever stored as a binding
/// - bindings are acyclic as long as callers never unify a variable with a
///   term containing it (no occurs-check is performed)
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: Arc<IndexMap<VarId, Term>>,
}

impl Env {
    /// The empty environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new environment with the given `variable -> term` pairs added.
    ///
    /// Pairs whose key is not a variable, pairs with a wildcard on either
    /// side, and trivial `X = X` pairs are dropped.
    #[must_use]
    pub fn extend<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Term, Term)>,
    {
        for (key, value) in pairs {
            if let Term::Var(var) = key {
                self.bind(&var, value);
            }
        }
        self
    }

    pub(crate) fn bind(&mut self, var: &Var, value: Term) {
        match &value {
            Term::Wildcard => {}
            Term::Var(other) if other == var => {}
            _ => {
                Arc::make_mut(&mut self.bindings).insert(var.id(), value);
            }
        }
    }

    /// The direct binding of a variable, if any
    #[must_use]
    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(&var.id())
    }

    /// True when the variable has a binding
    #[must_use]
    pub fn is_bound(&self, var: &Var) -> bool {
        self.bindings.contains_key(&var.id())
    }

    /// Number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Follows a chain of variable bindings until reaching an unbound
    /// variable or a non-variable term. Sub-terms are not touched.
    #[must_use]
    pub fn resolve<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Var(var) = current {
            match self.get(var) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current
    }

    /// Fully instantiates a term: every bound variable, at any depth, is
    /// replaced by its walked binding.
    #[must_use]
    pub fn walk(&self, term: &Term) -> Term {
        match term {
            Term::Var(var) => match self.get(var) {
                Some(bound) => self.walk(bound),
                None => term.clone(),
            },
            Term::List(items) => Term::List(items.iter().map(|t| self.walk(t)).collect()),
            Term::Compound(c) => Term::Compound(Arc::new(Compound {
                functor: c.functor.clone(),
                args: c.args.iter().map(|t| self.walk(t)).collect(),
            })),
            Term::Wildcard | Term::Atom(_) => term.clone(),
        }
    }

    /// Copies a term with every unbound variable replaced by a brand-new
    /// variable of the same name.
    ///
    /// Each `old -> new` pair is recorded in this environment, so renaming
    /// several terms through the same environment maps shared variables to
    /// the same new variable. Variables that are already bound are walked.
    pub fn rename(&mut self, term: &Term) -> Term {
        match term {
            Term::Var(var) => {
                if let Some(bound) = self.get(var) {
                    return self.walk(bound);
                }
                let fresh = var.fresh();
                self.bind(var, Term::Var(fresh.clone()));
                Term::Var(fresh)
            }
            Term::List(items) => Term::List(items.iter().map(|t| self.rename(t)).collect()),
            Term::Compound(c) => Term::Compound(Arc::new(Compound {
                functor: c.functor.clone(),
                args: c.args.iter().map(|t| self.rename(t)).collect(),
            })),
            Term::Wildcard | Term::Atom(_) => term.clone(),
        }
    }
}
