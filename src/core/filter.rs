//! Per-destination filters on path, function and message
//!
//! Filters refine a destination's minimum level. A destination that holds
//! any [`FilterTarget::Message`] filter reports it through
//! [`DestinationConfig::has_message_filters`](crate::DestinationConfig::has_message_filters),
//! which makes the dispatcher materialize the message before asking the
//! destination whether it wants the event.
//!
//! # Evaluation
//!
//! Only filters whose minimum level is at or below the event level take
//! part. Then:
//!
//! - a matching *excluding* filter rejects the event;
//! - every *required* filter must match;
//! - if there are optional filters, at least one of them must match.

use super::log_level::LogLevel;

/// Which part of the call a filter inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterTarget {
    /// Source file path
    Path,
    /// Function name as captured at the call site
    Function,
    /// Materialized message text
    Message,
}

/// How a filter compares its target against its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equals,
    StartsWith,
    EndsWith,
    Contains,
}

impl Comparison {
    fn compare(&self, subject: &str, value: &str) -> bool {
        match self {
            Comparison::Equals => subject == value,
            Comparison::StartsWith => subject.starts_with(value),
            Comparison::EndsWith => subject.ends_with(value),
            Comparison::Contains => subject.contains(value),
        }
    }
}

/// A single filter rule
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::core::{Comparison, Filter};
///
/// // Only network code, and never anything mentioning a password
/// let filters = vec![
///     Filter::path(Comparison::Contains, ["src/net/"]).required(),
///     Filter::message(Comparison::Contains, ["password"]).excluding().case_insensitive(),
/// ];
/// # let _ = filters;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    target: FilterTarget,
    comparison: Comparison,
    values: Vec<String>,
    required: bool,
    excluding: bool,
    case_sensitive: bool,
    min_level: LogLevel,
}

impl Filter {
    pub fn new<I, S>(target: FilterTarget, comparison: Comparison, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target,
            comparison,
            values: values.into_iter().map(Into::into).collect(),
            required: false,
            excluding: false,
            case_sensitive: true,
            min_level: LogLevel::Verbose,
        }
    }

    pub fn path<I, S>(comparison: Comparison, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FilterTarget::Path, comparison, values)
    }

    pub fn function<I, S>(comparison: Comparison, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FilterTarget::Function, comparison, values)
    }

    pub fn message<I, S>(comparison: Comparison, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FilterTarget::Message, comparison, values)
    }

    /// The filter must match for the event to pass
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// A match rejects the event
    #[must_use]
    pub fn excluding(mut self) -> Self {
        self.excluding = true;
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Only take part for events at or above `level`
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn target(&self) -> FilterTarget {
        self.target
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_excluding(&self) -> bool {
        self.excluding
    }

    pub fn applies_to(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Whether any value matches the targeted subject
    ///
    /// An unavailable message never matches.
    pub fn matches(&self, path: &str, function: &str, message: Option<&str>) -> bool {
        let subject = match self.target {
            FilterTarget::Path => path,
            FilterTarget::Function => function,
            FilterTarget::Message => match message {
                Some(message) => message,
                None => return false,
            },
        };

        if self.case_sensitive {
            self.values
                .iter()
                .any(|value| self.comparison.compare(subject, value))
        } else {
            let subject = subject.to_lowercase();
            self.values
                .iter()
                .any(|value| self.comparison.compare(&subject, &value.to_lowercase()))
        }
    }
}

/// Apply a filter set to one event
pub fn filters_accept(
    filters: &[Filter],
    level: LogLevel,
    path: &str,
    function: &str,
    message: Option<&str>,
) -> bool {
    let mut has_optional = false;
    let mut optional_matched = false;

    for filter in filters.iter().filter(|f| f.applies_to(level)) {
        let matched = filter.matches(path, function, message);

        if filter.excluding {
            if matched {
                return false;
            }
        } else if filter.required {
            if !matched {
                return false;
            }
        } else {
            has_optional = true;
            optional_matched |= matched;
        }
    }

    !has_optional || optional_matched
}
