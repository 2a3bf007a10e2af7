//! Options and the filtering applied to them.
//!
//! Filtering is plain case-insensitive substring matching. Matches keep the
//! order they were given in; nothing is ranked.

/// Predicate deciding whether an option matches a (non-empty) query.
pub type MatchFn = fn(&SelectOption, &str) -> bool;

/// A single selectable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Unique identifier for the option.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Secondary text shown after the label.
    pub description: Option<String>,
    /// Disabled options are shown but cannot be committed.
    pub disabled: bool,
    /// Glyph drawn before the label.
    pub icon: Option<String>,
}

impl SelectOption {
    /// Create a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
            disabled: false,
            icon: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an icon glyph.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Mark the option as disabled (or not).
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl From<&str> for SelectOption {
    /// Build an option whose value and label are the same text.
    fn from(text: &str) -> Self {
        Self::new(text, text)
    }
}

/// Default matcher: the label contains the query, ignoring case.
pub fn matches_label(option: &SelectOption, query: &str) -> bool {
    option.label.to_lowercase().contains(&query.to_lowercase())
}

/// Matcher that also looks at the value and the description.
pub fn matches_any_field(option: &SelectOption, query: &str) -> bool {
    let query = query.to_lowercase();
    option.label.to_lowercase().contains(&query)
        || option.value.to_lowercase().contains(&query)
        || option
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&query))
}

/// Indices of the options visible for `query`, in input order.
pub fn filter_indices(options: &[SelectOption], query: &str, matcher: MatchFn) -> Vec<usize> {
    if query.is_empty() {
        return (0..options.len()).collect();
    }
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| matcher(option, query))
        .map(|(i, _)| i)
        .collect()
}

/// The options visible for `query` using the default label matcher.
pub fn filter_options<'a>(options: &'a [SelectOption], query: &str) -> Vec<&'a SelectOption> {
    filter_options_with(options, query, matches_label)
}

/// The options visible for `query` using a custom matcher.
pub fn filter_options_with<'a>(
    options: &'a [SelectOption],
    query: &str,
    matcher: MatchFn,
) -> Vec<&'a SelectOption> {
    filter_indices(options, query, matcher)
        .into_iter()
        .map(|i| &options[i])
        .collect()
}

/// Look an option up by value.
///
/// When several options share a value the first one wins.
pub fn find_option<'a>(options: &'a [SelectOption], value: &str) -> Option<&'a SelectOption> {
    options.iter().find(|option| option.value == value)
}
