//! Observational tracing of resolution.
//!
//! Events never influence the search. They are logged through the `log`
//! facade under the `sldlog::trace` target and handed to an optional hook.

use crate::error::{Error, Result};
use crate::term::Term;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How much of a resolution is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TraceLevel {
    /// Nothing is reported
    #[default]
    Silent = 0,
    /// Queries and their answers
    Answers = 1,
    /// Every goal selection, clause attempt, cut and scope exit
    Steps = 2,
    /// Everything, including backtracking through the choice-point stack
    Search = 3,
}

impl TraceLevel {
    fn log_level(self) -> log::Level {
        match self {
            TraceLevel::Silent | TraceLevel::Answers => log::Level::Info,
            TraceLevel::Steps => log::Level::Debug,
            TraceLevel::Search => log::Level::Trace,
        }
    }
}

impl TryFrom<u8> for TraceLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TraceLevel::Silent),
            1 => Ok(TraceLevel::Answers),
            2 => Ok(TraceLevel::Steps),
            3 => Ok(TraceLevel::Search),
            other => Err(Error::InvalidTraceLevel(other.to_string())),
        }
    }
}

impl FromStr for TraceLevel {
    type Err = Error;

    /// Accepts a number `0..=3` or a level name (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return TraceLevel::try_from(n);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(TraceLevel::Silent),
            "answers" => Ok(TraceLevel::Answers),
            "steps" => Ok(TraceLevel::Steps),
            "search" => Ok(TraceLevel::Search),
            _ => Err(Error::InvalidTraceLevel(s.to_string())),
        }
    }
}

/// A transition of the resolution engine
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// A new search started for this goal
    Query {
        /// The query term
        goal: &'a Term,
    },
    /// The leftmost pending goal was selected
    GoalSelected {
        /// The selected goal as it stands in the resolvent
        goal: &'a Term,
    },
    /// A clause head is being unified with the selected goal
    ClauseTried {
        /// The goal being resolved
        goal: &'a Term,
        /// Declaration index of the clause
        index: usize,
        /// The renamed clause head
        head: &'a Term,
    },
    /// A cut was executed
    Cut {
        /// Number of choice points discarded
        pruned: usize,
    },
    /// A clause body was fully proven
    ScopeClosed,
    /// The search went back to an earlier choice point
    Backtrack {
        /// Live choice points after resuming
        depth: usize,
    },
    /// A solution was found
    Answer {
        /// The instantiated query
        answer: &'a Term,
    },
    /// No further solutions exist
    Exhausted {
        /// Number of solutions produced before exhaustion
        answers: usize,
    },
}

impl TraceEvent<'_> {
    /// The minimum trace level at which this event is reported
    #[must_use]
    pub fn level(&self) -> TraceLevel {
        match self {
            TraceEvent::Query { .. } | TraceEvent::Answer { .. } | TraceEvent::Exhausted { .. } => {
                TraceLevel::Answers
            }
            TraceEvent::GoalSelected { .. }
            | TraceEvent::ClauseTried { .. }
            | TraceEvent::Cut { .. }
            | TraceEvent::ScopeClosed => TraceLevel::Steps,
            TraceEvent::Backtrack { .. } => TraceLevel::Search,
        }
    }
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Query { goal } => write!(f, "goal: {goal}"),
            TraceEvent::GoalSelected { goal } => write!(f, "selected {goal}"),
            TraceEvent::ClauseTried { goal, index, head } => {
                write!(f, "trying clause #{index} {head} for {goal}")
            }
            TraceEvent::Cut { pruned } => write!(f, "cut ({pruned} choice points pruned)"),
            TraceEvent::ScopeClosed => f.write_str("finished clause"),
            TraceEvent::Backtrack { depth } => write!(f, "backtrack (depth {depth})"),
            TraceEvent::Answer { answer } => write!(f, "answer: {answer}"),
            TraceEvent::Exhausted { answers: 0 } => f.write_str("no."),
            TraceEvent::Exhausted { answers } => write!(f, "exhausted after {answers} answers"),
        }
    }
}

/// Callback invoked for every reported event
pub type TraceHook = Arc<dyn Fn(&TraceEvent<'_>) + Send + Sync>;

/// Routes trace events to the log and to an optional hook
#[derive(Clone, Default)]
pub struct Tracer {
    level: TraceLevel,
    hook: Option<TraceHook>,
}

impl Tracer {
    /// A tracer reporting events up to `level`
    #[must_use]
    pub fn new(level: TraceLevel) -> Self {
        Self { level, hook: None }
    }

    /// Current level
    #[must_use]
    pub fn level(&self) -> TraceLevel {
        self.level
    }

    /// Changes the level
    pub fn set_level(&mut self, level: TraceLevel) {
        self.level = level;
    }

    /// Installs (or removes) the hook
    pub fn set_hook(&mut self, hook: Option<TraceHook>) {
        self.hook = hook;
    }

    /// True when events of `level` would be reported
    #[must_use]
    pub fn enabled(&self, level: TraceLevel) -> bool {
        level != TraceLevel::Silent && level <= self.level
    }

    /// Reports an event if the configured level admits it
    pub fn emit(&self, event: &TraceEvent<'_>) {
        let level = event.level();
        if !self.enabled(level) {
            return;
        }
        log::log!(target: "sldlog::trace", level.log_level(), "{event}");
        if let Some(hook) = &self.hook {
            hook(event);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("level", &self.level)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
