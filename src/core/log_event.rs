//! The value produced once per log call
//!
//! A [`LogEvent`] carries the message as an unevaluated thunk. The
//! dispatcher turns it into text at most once per dispatch pass, and only
//! when some destination needs it.

use super::{call_site::CallSite, log_context::LogContext, log_level::LogLevel};
use std::fmt;
use std::sync::Arc;

/// One log call, before dispatch
pub struct LogEvent<'a, F> {
    pub level: LogLevel,
    pub message: F,
    pub sensitive: Option<&'a str>,
    pub call_site: CallSite<'a>,
    pub context: Option<LogContext>,
}

impl<'a, F, M> LogEvent<'a, F>
where
    F: FnOnce() -> M,
    M: fmt::Display,
{
    pub fn new(level: LogLevel, message: F, call_site: CallSite<'a>) -> Self {
        Self {
            level,
            message,
            sensitive: None,
            call_site,
            context: None,
        }
    }

    #[must_use]
    pub fn with_sensitive(mut self, sensitive: &'a str) -> Self {
        self.sensitive = Some(sensitive);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl<F> fmt::Debug for LogEvent<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("level", &self.level)
            .field("sensitive", &self.sensitive.map(|_| "<redacted>"))
            .field("call_site", &self.call_site)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

enum State<F> {
    Pending(F),
    Resolved(Arc<str>),
    Poisoned,
}

/// Message text materialized on first use and cached for the pass
pub(crate) struct LazyMessage<'a, F> {
    state: State<F>,
    /// Appended as `"; {sensitive}"`; already gated by the caller
    sensitive: Option<&'a str>,
}

impl<'a, F, M> LazyMessage<'a, F>
where
    F: FnOnce() -> M,
    M: fmt::Display,
{
    pub(crate) fn new(thunk: F, sensitive: Option<&'a str>) -> Self {
        Self {
            state: State::Pending(thunk),
            sensitive,
        }
    }

    /// The text, if it has been materialized already
    pub(crate) fn peek(&self) -> Option<&str> {
        match &self.state {
            State::Resolved(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        matches!(self.state, State::Resolved(_))
    }

    /// Materialize the text, invoking the thunk only on the first call
    pub(crate) fn resolve(&mut self) -> Arc<str> {
        let text = match std::mem::replace(&mut self.state, State::Poisoned) {
            State::Resolved(text) => text,
            State::Pending(thunk) => {
                let mut text = thunk().to_string();
                if let Some(sensitive) = self.sensitive {
                    text.push_str("; ");
                    text.push_str(sensitive);
                }
                Arc::from(text)
            }
            State::Poisoned => Arc::from(""),
        };
        self.state = State::Resolved(Arc::clone(&text));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_thunk_runs_once() {
        let calls = Cell::new(0);
        let mut lazy = LazyMessage::new(
            || {
                calls.set(calls.get() + 1);
                "hello"
            },
            None,
        );

        assert!(lazy.peek().is_none());
        assert_eq!(&*lazy.resolve(), "hello");
        assert_eq!(&*lazy.resolve(), "hello");
        assert_eq!(lazy.peek(), Some("hello"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_sensitive_suffix() {
        let mut lazy = LazyMessage::new(|| 42, Some("secret"));
        assert_eq!(&*lazy.resolve(), "42; secret");
    }

    #[test]
    fn test_never_resolved_never_runs() {
        let calls = Cell::new(0);
        let lazy = LazyMessage::new(
            || {
                calls.set(calls.get() + 1);
                "unused"
            },
            None,
        );
        assert!(!lazy.is_resolved());
        drop(lazy);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_event_debug_redacts_sensitive() {
        let event = LogEvent::new(LogLevel::Info, || "m", CallSite::new("f.rs", "f", 1))
            .with_sensitive("token=abc");
        let rendered = format!("{:?}", event);
        assert!(!rendered.contains("token=abc"));
        assert!(rendered.contains("<redacted>"));
    }
}
