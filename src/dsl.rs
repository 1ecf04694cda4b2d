//! Helpers for writing rules in Rust code.
//!
//! A [`Scope`] hands out one variable per name, so every `x` written while
//! building a rule refers to the same variable:
//!
//! ```rust
//! use sldlog::dsl::declare;
//! use sldlog::Term;
//!
//! let rule = declare(|s| {
//!     Term::compound("grandfather", [s.var("x"), s.var("y")]).when([
//!         Term::compound("father", [s.var("x"), s.var("z")]),
//!         Term::compound("father", [s.var("z"), s.var("y")]),
//!     ])
//! });
//! assert_eq!(rule.body().len(), 2);
//! ```

use crate::engine::Rule;
use crate::term::{Goal, Term, Var, CUT, WILDCARD};
use indexmap::IndexMap;

/// Named-variable scope for one declaration
#[derive(Debug, Default)]
pub struct Scope {
    vars: IndexMap<String, Var>,
}

impl Scope {
    /// An empty scope
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The variable called `name`, created on first use
    pub fn var(&mut self, name: &str) -> Term {
        let var = self
            .vars
            .entry(name.to_string())
            .or_insert_with(|| Var::new(name));
        Term::Var(var.clone())
    }

    /// The wildcard `_`
    #[must_use]
    pub fn wildcard(&self) -> Term {
        WILDCARD
    }

    /// The cut marker `!`
    #[must_use]
    pub fn cut(&self) -> Goal {
        CUT
    }

    /// Variables handed out so far, in creation order
    pub fn variables(&self) -> impl Iterator<Item = &Var> {
        self.vars.values()
    }
}

/// Runs `build` with a fresh [`Scope`]
pub fn declare<T>(build: impl FnOnce(&mut Scope) -> T) -> T {
    build(&mut Scope::new())
}

impl Term {
    /// A rule with this term as head and the given conditions
    #[must_use]
    pub fn when<G: Into<Goal>>(self, body: impl IntoIterator<Item = G>) -> Rule {
        Rule::new(self, body)
    }

    /// A fact (rule without conditions) with this term as head
    #[must_use]
    pub fn fact(self) -> Rule {
        Rule::fact(self)
    }
}
