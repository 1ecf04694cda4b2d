use crate::config::Config;
use crate::env::Env;
use crate::error::{Error, Result};
use crate::search::{Resumption, SearchController};
use crate::stack::Stack;
use crate::term::{Atom, Goal, Term, Var};
use crate::trace::{TraceEvent, TraceHook, TraceLevel, Tracer};
use crate::unify::unify;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Horn clause (e.g., `grandfather(x, y) :- father(x, z), father(z, y)`)
///
/// All variables are renamed apart when the rule is built, so two rules
/// written with the same variables never share them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RuleParts"))]
pub struct Rule {
    head: Term,
    body: SmallVec<[Goal; 4]>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RuleParts {
    head: Term,
    #[serde(default)]
    body: Vec<Goal>,
}

#[cfg(feature = "serde")]
impl From<RuleParts> for Rule {
    fn from(parts: RuleParts) -> Self {
        Rule::new(parts.head, parts.body)
    }
}

impl Rule {
    /// Create a rule, renaming its variables through a private environment
    #[must_use]
    pub fn new<G: Into<Goal>>(head: Term, body: impl IntoIterator<Item = G>) -> Self {
        let mut scope = Env::new();
        let head = scope.rename(&head);
        let body = body
            .into_iter()
            .map(|goal| match goal.into() {
                Goal::Term(term) => Goal::Term(scope.rename(&term)),
                Goal::Cut => Goal::Cut,
            })
            .collect();
        Self { head, body }
    }

    /// A rule without conditions
    #[must_use]
    pub fn fact(head: Term) -> Self {
        Self::new(head, std::iter::empty::<Goal>())
    }

    /// The conclusion of the rule
    #[must_use]
    pub fn head(&self) -> &Term {
        &self.head
    }

    /// The conditions, in proof order
    #[must_use]
    pub fn body(&self) -> &[Goal] {
        &self.body
    }

    /// True when the rule has no conditions
    #[must_use]
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if !matches!(
            self.head,
            Term::Compound(_) | Term::Atom(Atom::Symbol(_))
        ) {
            return Err(Error::InvalidRuleShape(format!(
                "head must be a compound term or a symbol, got `{}`",
                self.head
            )));
        }
        for goal in self.body.iter().filter_map(Goal::as_term) {
            if matches!(
                goal,
                Term::Wildcard | Term::List(_) | Term::Atom(Atom::Int(_) | Atom::Str(_) | Atom::Bool(_))
            ) {
                return Err(Error::InvalidRuleShape(format!(
                    "`{goal}` cannot be used as a condition of `{}`",
                    self.head
                )));
            }
        }
        Ok(())
    }
}

impl From<Term> for Rule {
    fn from(head: Term) -> Self {
        Rule::fact(head)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (i, goal) in self.body.iter().enumerate() {
            f.write_str(if i == 0 { " :- " } else { ", " })?;
            write!(f, "{goal}")?;
        }
        f.write_str(".")
    }
}

/// An entry of the resolvent
#[derive(Debug, Clone)]
enum Entry {
    Goal(Term),
    Cut,
    /// End of a clause body; closes the clause's cut barrier
    ScopeEnd,
}

/// State saved with a clause choice point
#[derive(Debug, Clone)]
struct Frame {
    goal: Term,
    rest: Stack<Entry>,
    env: Env,
}

/// An ordered collection of rules; declaration order is trial order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    tracer: Tracer,
}

impl RuleSet {
    /// Create a rule set. Heads given as plain terms become facts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRuleShape`] for the first malformed rule.
    pub fn new<R: Into<Rule>>(rules: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut set = Self::default();
        for rule in rules {
            set.declare(rule.into())?;
        }
        Ok(set)
    }

    /// Append a rule
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRuleShape`] when the head is not a compound
    /// term or symbol, or when a condition is a wildcard, list or
    /// non-symbol constant.
    pub fn declare(&mut self, rule: Rule) -> Result<()> {
        rule.validate()?;
        self.rules.push(rule);
        Ok(())
    }

    /// Append a fact
    ///
    /// # Errors
    ///
    /// Same as [`RuleSet::declare`].
    pub fn declare_fact(&mut self, head: Term) -> Result<()> {
        self.declare(Rule::fact(head))
    }

    /// The rules in declaration order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rule is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply a configuration
    pub fn configure(&mut self, config: Config) {
        self.tracer.set_level(config.trace);
    }

    /// Set the trace verbosity
    pub fn trace(&mut self, level: TraceLevel) {
        self.tracer.set_level(level);
    }

    /// Turn tracing off
    pub fn untrace(&mut self) {
        self.tracer.set_level(TraceLevel::Silent);
    }

    /// Install a callback receiving every trace event the level admits
    pub fn set_trace_hook<F>(&mut self, hook: F)
    where
        F: Fn(&TraceEvent<'_>) + Send + Sync + 'static,
    {
        let hook: TraceHook = Arc::new(hook);
        self.tracer.set_hook(Some(hook));
    }

    /// Remove the trace callback
    pub fn clear_trace_hook(&mut self) {
        self.tracer.set_hook(None);
    }

    /// The first solution of `goal`: the goal fully instantiated by the
    /// bindings that proved it, or `None` if it cannot be proven.
    ///
    /// Resolution is unrestricted; a rule set with unbounded recursion can
    /// make this call run forever.
    #[must_use]
    pub fn solve(&self, goal: &Term) -> Option<Term> {
        self.solve_all(goal).next()
    }

    /// All solutions of `goal`, found lazily one at a time
    #[must_use]
    pub fn solve_all(&self, goal: &Term) -> Solutions<'_> {
        Solutions::new(self, goal)
    }

    /// All solutions of `goal` together with the value of each named
    /// variable of the goal
    #[must_use]
    pub fn query(&self, goal: &Term) -> Answers<'_> {
        let variables = goal.variables().into_iter().cloned().collect();
        Answers {
            solutions: self.solve_all(goal),
            variables,
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

enum Step {
    /// Prove the resolvent under the environment
    Continue(Stack<Entry>, Env),
    /// Try the selected clause against the saved frame
    Select(Resumption<usize, Frame>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    Fresh,
    Suspended,
    Done,
}

/// Lazy sequence of solutions for one query.
///
/// Each call to `next` resumes the depth-first search where the previous
/// solution left it. The sequence only moves forward; start over with
/// [`RuleSet::solve_all`].
#[derive(Debug)]
pub struct Solutions<'r> {
    rules: &'r RuleSet,
    query: Term,
    controller: SearchController<Range<usize>, Frame>,
    state: SearchState,
    answers: usize,
    steps: u64,
}

impl<'r> Solutions<'r> {
    fn new(rules: &'r RuleSet, goal: &Term) -> Self {
        rules.tracer.emit(&TraceEvent::Query { goal });
        Self {
            rules,
            query: goal.clone(),
            controller: SearchController::new(),
            state: SearchState::Fresh,
            answers: 0,
            steps: 0,
        }
    }

    /// Number of goals selected for resolution so far
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of solutions produced so far
    #[must_use]
    pub fn answers(&self) -> usize {
        self.answers
    }

    fn next_env(&mut self) -> Option<Env> {
        let step = match self.state {
            SearchState::Fresh => Step::Continue(
                Stack::new().push(Entry::Goal(self.query.clone())),
                Env::new(),
            ),
            SearchState::Suspended => {
                let resumed = self.controller.request_next();
                self.note_backtrack(&resumed);
                Step::Select(resumed)
            }
            SearchState::Done => return None,
        };

        if let Some(env) = self.run(step) {
            self.state = SearchState::Suspended;
            self.answers += 1;
            Some(env)
        } else {
            self.state = SearchState::Done;
            self.rules.tracer.emit(&TraceEvent::Exhausted {
                answers: self.answers,
            });
            None
        }
    }

    /// Runs until the resolvent is empty (a solution) or the search is
    /// exhausted.
    fn run(&mut self, mut step: Step) -> Option<Env> {
        let rules = self.rules;
        loop {
            step = match step {
                Step::Select(resumption) => {
                    let (index, frame) = resumption.ok()?;
                    match self.resolve_clause(index, frame) {
                        Some((resolvent, env)) => Step::Continue(resolvent, env),
                        None => {
                            let resumed = self.controller.fail();
                            self.note_backtrack(&resumed);
                            Step::Select(resumed)
                        }
                    }
                }
                Step::Continue(resolvent, env) => {
                    let Some((entry, rest)) = resolvent.split_first() else {
                        return Some(env);
                    };
                    match entry {
                        Entry::Cut => {
                            let pruned = self.controller.cut();
                            rules.tracer.emit(&TraceEvent::Cut { pruned });
                            Step::Continue(rest, env)
                        }
                        Entry::ScopeEnd => {
                            self.controller.unmark();
                            rules.tracer.emit(&TraceEvent::ScopeClosed);
                            Step::Continue(rest, env)
                        }
                        Entry::Goal(goal) => {
                            self.steps += 1;
                            if rules.tracer.enabled(TraceLevel::Steps) {
                                let shown = env.walk(goal);
                                rules
                                    .tracer
                                    .emit(&TraceEvent::GoalSelected { goal: &shown });
                            }
                            self.controller.mark();
                            let frame = Frame {
                                goal: goal.clone(),
                                rest,
                                env,
                            };
                            Step::Select(self.controller.choose(0..rules.len(), frame))
                        }
                    }
                }
            };
        }
    }

    /// Unifies the frame's goal with a renamed copy of clause `index`.
    ///
    /// On success the new resolvent is the renamed body, a scope end, then
    /// the rest of the old resolvent.
    fn resolve_clause(&self, index: usize, frame: Frame) -> Option<(Stack<Entry>, Env)> {
        let rule = &self.rules.rules[index];
        let mut renaming = Env::new();
        let head = renaming.rename(rule.head());

        let tracer = &self.rules.tracer;
        if tracer.enabled(TraceLevel::Steps) {
            let goal = frame.env.walk(&frame.goal);
            tracer.emit(&TraceEvent::ClauseTried {
                goal: &goal,
                index,
                head: &head,
            });
        }

        let env = unify(&frame.goal, &head, frame.env)?;
        let resolvent = rule
            .body()
            .iter()
            .rev()
            .fold(frame.rest.push(Entry::ScopeEnd), |resolvent, goal| {
                resolvent.push(match goal {
                    Goal::Term(term) => Entry::Goal(renaming.rename(term)),
                    Goal::Cut => Entry::Cut,
                })
            });
        Some((resolvent, env))
    }

    fn note_backtrack(&self, resumed: &Resumption<usize, Frame>) {
        if resumed.is_ok() {
            self.rules.tracer.emit(&TraceEvent::Backtrack {
                depth: self.controller.depth(),
            });
        }
    }

    fn instantiate(&self, env: &Env) -> Term {
        let answer = env.walk(&self.query);
        self.rules.tracer.emit(&TraceEvent::Answer { answer: &answer });
        answer
    }
}

impl Iterator for Solutions<'_> {
    type Item = Term;

    fn next(&mut self) -> Option<Self::Item> {
        let env = self.next_env()?;
        Some(self.instantiate(&env))
    }
}

impl FusedIterator for Solutions<'_> {}

/// One solution with the values of the query's named variables
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The instantiated query
    pub term: Term,
    /// Named query variables and their values, in order of first occurrence
    pub bindings: IndexMap<String, Term>,
}

impl Answer {
    /// The value of the query variable called `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return f.write_str("yes");
        }
        for (i, (name, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}

/// Lazy sequence of [`Answer`]s for one query
#[derive(Debug)]
pub struct Answers<'r> {
    solutions: Solutions<'r>,
    variables: Vec<Var>,
}

impl Answers<'_> {
    /// Number of goals selected for resolution so far
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.solutions.steps()
    }
}

impl Iterator for Answers<'_> {
    type Item = Answer;

    fn next(&mut self) -> Option<Self::Item> {
        let env = self.solutions.next_env()?;
        let term = self.solutions.instantiate(&env);
        let mut bindings = IndexMap::new();
        for var in &self.variables {
            bindings
                .entry(var.name().to_string())
                .or_insert_with(|| env.walk(&Term::Var(var.clone())));
        }
        Some(Answer { term, bindings })
    }
}

impl FusedIterator for Answers<'_> {}
