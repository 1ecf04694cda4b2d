//! # Sldlog
//!
//! A small logic-programming engine: first-order terms, unification and
//! depth-first SLD resolution with backtracking and cut.
//!
//! ## Features
//!
//! - Lazy enumeration of every solution of a query
//! - Cut (`!`) scoped to the clause that contains it
//! - Optional tracing through the `log` facade
//! - Clause syntax parser and command line front end (`parsing` feature)
//!
//! ## Example
//!
//! ```rust
//! use sldlog::{RuleSet, Term};
//!
//! let (x, y, z) = (Term::var("x"), Term::var("y"), Term::var("z"));
//! let rules = RuleSet::new([
//!     Term::compound("father", [Term::sym("abraham"), Term::sym("isaac")]).fact(),
//!     Term::compound("father", [Term::sym("isaac"), Term::sym("jacob")]).fact(),
//!     Term::compound("grandfather", [x.clone(), y.clone()]).when([
//!         Term::compound("father", [x, z.clone()]),
//!         Term::compound("father", [z, y]),
//!     ]),
//! ])?;
//!
//! let goal = Term::compound("grandfather", [Term::sym("abraham"), Term::var("who")]);
//! let answer = rules.query(&goal).next().expect("abraham has a grandchild");
//! assert_eq!(answer.to_string(), "who = jacob");
//! # Ok::<(), sldlog::Error>(())
//! ```

pub mod config;
pub mod dsl;
/// Rules and the resolution engine.
pub mod engine;
/// Variable bindings.
pub mod env;
/// Error types.
pub mod error;
/// Clause syntax parser.
#[cfg(feature = "parsing")]
pub mod parser;
pub mod search;
pub mod stack;
/// Terms.
pub mod term;
pub mod trace;
/// Unification.
pub mod unify;

pub use config::Config;
pub use engine::{Answer, Answers, Rule, RuleSet, Solutions};
pub use env::Env;
pub use error::{Error, Result};
pub use search::{SearchController, SearchExhausted};
pub use term::{Atom, Compound, Goal, Term, Var, VarId, CUT, WILDCARD};
pub use trace::{TraceEvent, TraceLevel};
pub use unify::unify;
