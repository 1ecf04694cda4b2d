//! Explicit, externally resumable depth-first search.
//!
//! A [`SearchController`] owns a stack of choice points. Each choice point
//! keeps the untried tail of its candidate sequence, the caller's state at
//! the time the choice was made, and a snapshot of the cut barriers. Failing
//! resumes the most recent choice point that still has an alternative, so a
//! search can be suspended after a solution and continued later with
//! [`SearchController::request_next`].

use crate::stack::Stack;
use std::fmt;
use std::iter::Peekable;
use thiserror::Error;

/// No choice point has an untried alternative left
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("search exhausted: no choice point has an untried alternative")]
pub struct SearchExhausted;

/// The alternative to continue with and the state to continue from
pub type Resumption<A, S> = Result<(A, S), SearchExhausted>;

struct ChoicePoint<I: Iterator, S> {
    alternatives: Peekable<I>,
    state: S,
    barriers: Stack<usize>,
}

/// Choice-point stack with cut barriers.
///
/// `I` is the iterator of alternatives and `S` the state saved with each
/// choice point. Only choice points with at least one untried alternative
/// are kept on the stack.
pub struct SearchController<I: Iterator, S> {
    choices: Vec<ChoicePoint<I, S>>,
    barriers: Stack<usize>,
}

impl<I: Iterator, S: Clone> SearchController<I, S> {
    /// A controller with no choice points
    #[must_use]
    pub fn new() -> Self {
        Self {
            choices: Vec::new(),
            barriers: Stack::new(),
        }
    }

    /// Number of live choice points
    #[must_use]
    pub fn depth(&self) -> usize {
        self.choices.len()
    }

    /// Number of open cut barriers
    #[must_use]
    pub fn barrier_depth(&self) -> usize {
        self.barriers.len()
    }

    /// Pushes a cut barrier at the current choice depth
    pub fn mark(&mut self) {
        self.barriers = self.barriers.push(self.choices.len());
    }

    /// Closes the innermost cut barrier
    pub fn unmark(&mut self) {
        self.barriers = self.barriers.pop();
    }

    /// Selects the first of `candidates`, remembering the rest together
    /// with `state` so that [`fail`](Self::fail) can come back to them.
    ///
    /// # Errors
    ///
    /// With no candidates this behaves as [`fail`](Self::fail) and returns
    /// [`SearchExhausted`] when nothing is left to try.
    pub fn choose<C>(&mut self, candidates: C, state: S) -> Resumption<I::Item, S>
    where
        C: IntoIterator<IntoIter = I>,
    {
        let mut alternatives = candidates.into_iter().peekable();
        let Some(first) = alternatives.next() else {
            return self.fail();
        };
        if alternatives.peek().is_some() {
            self.choices.push(ChoicePoint {
                alternatives,
                state: state.clone(),
                barriers: self.barriers.clone(),
            });
        }
        Ok((first, state))
    }

    /// Backtracks to the most recent choice point with an untried
    /// alternative, restoring the cut barriers it was created under.
    ///
    /// # Errors
    ///
    /// Returns [`SearchExhausted`] once every choice point is depleted.
    pub fn fail(&mut self) -> Resumption<I::Item, S> {
        while let Some(mut choice) = self.choices.pop() {
            let Some(next) = choice.alternatives.next() else {
                continue;
            };
            if choice.alternatives.peek().is_some() {
                self.barriers = choice.barriers.clone();
                let state = choice.state.clone();
                self.choices.push(choice);
                return Ok((next, state));
            }
            self.barriers = choice.barriers;
            return Ok((next, choice.state));
        }
        Err(SearchExhausted)
    }

    /// Discards every choice point created since the innermost barrier.
    ///
    /// The barrier itself stays, so a second cut in the same scope prunes
    /// back to the same point. Without any barrier all choice points go.
    /// Returns the number of pruned choice points.
    pub fn cut(&mut self) -> usize {
        let depth = self.barriers.peek().copied().unwrap_or(0);
        let pruned = self.choices.len().saturating_sub(depth);
        self.choices.truncate(depth);
        pruned
    }

    /// Resumes the search past the last solution found.
    ///
    /// # Errors
    ///
    /// Returns [`SearchExhausted`] when no alternatives remain.
    pub fn request_next(&mut self) -> Resumption<I::Item, S> {
        self.fail()
    }
}

impl<I: Iterator, S: Clone> Default for SearchController<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Iterator, S> fmt::Debug for SearchController<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("choices", &self.choices.len())
            .field("barriers", &self.barriers)
            .finish()
    }
}
