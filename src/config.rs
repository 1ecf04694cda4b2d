//! Engine configuration.

use crate::error::Result;
use crate::trace::TraceLevel;

/// Configuration applied to a [`RuleSet`](crate::RuleSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Trace verbosity (0 = silent, increasing levels add detail)
    pub trace: TraceLevel,
}

impl Config {
    /// Environment variable read by [`Config::from_env`]
    pub const TRACE_ENV: &'static str = "SLDLOG_TRACE";

    /// Reads the configuration from the process environment.
    ///
    /// An unset or empty `SLDLOG_TRACE` leaves tracing silent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTraceLevel`](crate::Error::InvalidTraceLevel)
    /// when the variable holds something other than `0..=3` or a level name.
    pub fn from_env() -> Result<Self> {
        Self::from_trace_var(std::env::var(Self::TRACE_ENV).ok().as_deref())
    }

    fn from_trace_var(value: Option<&str>) -> Result<Self> {
        let trace = match value.map(str::trim) {
            None | Some("") => TraceLevel::Silent,
            Some(level) => level.parse()?,
        };
        Ok(Self { trace })
    }

    /// Same configuration with a different trace level
    #[must_use]
    pub fn with_trace(mut self, trace: TraceLevel) -> Self {
        self.trace = trace;
        self
    }
}
