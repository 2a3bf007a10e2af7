//! Selection state shared by the selection controls.
//!
//! A [`Selection`] can be uncontrolled, where it keeps the committed value
//! itself, or controlled, where the owner supplies the value on every update
//! and the selection only reports the changes it would like to make. In both
//! cases the effective value is `external ?? internal` and every mutation
//! writes the internal copy.

/// Whether a selection holds one value or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one value.
    #[default]
    Single,
    /// Any number of values, kept in the order they were added.
    Multiple,
}

/// A committed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionValue {
    /// Single-select value (None when nothing is selected).
    Single(Option<String>),
    /// Multi-select values in insertion order.
    Multiple(Vec<String>),
}

impl SelectionValue {
    /// The empty value for a mode.
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => SelectionValue::Single(None),
            SelectionMode::Multiple => SelectionValue::Multiple(Vec::new()),
        }
    }

    /// The mode this value belongs to.
    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionValue::Single(_) => SelectionMode::Single,
            SelectionValue::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// The selected values as a slice.
    pub fn as_slice(&self) -> &[String] {
        match self {
            SelectionValue::Single(Some(value)) => std::slice::from_ref(value),
            SelectionValue::Single(None) => &[],
            SelectionValue::Multiple(values) => values,
        }
    }

    /// Check whether a value is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.as_slice().iter().any(|v| v == value)
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Number of selected values.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Convert to the shape used by `mode`.
    ///
    /// Multiple → Single keeps the first value.
    pub fn coerce(self, mode: SelectionMode) -> Self {
        match (self, mode) {
            (SelectionValue::Multiple(values), SelectionMode::Single) => {
                SelectionValue::Single(values.into_iter().next())
            }
            (SelectionValue::Single(value), SelectionMode::Multiple) => {
                SelectionValue::Multiple(value.into_iter().collect())
            }
            (value, _) => value,
        }
    }
}

impl From<Option<String>> for SelectionValue {
    fn from(value: Option<String>) -> Self {
        SelectionValue::Single(value)
    }
}

impl From<Vec<String>> for SelectionValue {
    fn from(values: Vec<String>) -> Self {
        SelectionValue::Multiple(values)
    }
}

/// Result of [`Selection::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    /// The new value, if the selection changed.
    pub changed: Option<SelectionValue>,
    /// Whether the owning panel should close.
    pub close_panel: bool,
}

/// Selection state with controlled/uncontrolled operation.
#[derive(Debug, Clone)]
pub struct Selection {
    mode: SelectionMode,
    internal: SelectionValue,
    external: Option<SelectionValue>,
}

impl Selection {
    /// Create an empty, uncontrolled selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            internal: SelectionValue::empty(mode),
            external: None,
        }
    }

    /// Get the selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the selection mode, converting the held values.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.internal = std::mem::replace(&mut self.internal, SelectionValue::empty(mode)).coerce(mode);
        self.external = self.external.take().map(|value| value.coerce(mode));
    }

    /// Check whether the owner controls the value.
    pub fn is_controlled(&self) -> bool {
        self.external.is_some()
    }

    /// Set (or drop, with `None`) the owner-supplied value.
    pub fn set_controlled(&mut self, value: Option<SelectionValue>) {
        self.external = value.map(|value| value.coerce(self.mode));
    }

    /// The effective value.
    pub fn value(&self) -> &SelectionValue {
        self.external.as_ref().unwrap_or(&self.internal)
    }

    /// The effective values as a slice.
    pub fn values(&self) -> &[String] {
        self.value().as_slice()
    }

    /// Check whether a value is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.value().contains(value)
    }

    /// Commit a value.
    ///
    /// Single mode replaces the value and always asks to close. Multi mode
    /// toggles the value and keeps the panel open.
    pub fn select(&mut self, value: &str) -> SelectOutcome {
        match self.mode {
            SelectionMode::Single => {
                let changed = if self.contains(value) {
                    None
                } else {
                    self.replace(SelectionValue::Single(Some(value.to_string())))
                };
                SelectOutcome {
                    changed,
                    close_panel: true,
                }
            }
            SelectionMode::Multiple => {
                let mut next = self.values().to_vec();
                if let Some(pos) = next.iter().position(|v| v == value) {
                    next.remove(pos);
                } else {
                    next.push(value.to_string());
                }
                SelectOutcome {
                    changed: self.replace(SelectionValue::Multiple(next)),
                    close_panel: false,
                }
            }
        }
    }

    /// Remove a value from the selection.
    pub fn deselect(&mut self, value: &str) -> Option<SelectionValue> {
        if !self.contains(value) {
            return None;
        }
        let next = match self.mode {
            SelectionMode::Single => SelectionValue::Single(None),
            SelectionMode::Multiple => SelectionValue::Multiple(
                self.values().iter().filter(|v| *v != value).cloned().collect(),
            ),
        };
        self.replace(next)
    }

    /// Empty the selection.
    pub fn clear(&mut self) -> Option<SelectionValue> {
        self.replace(SelectionValue::empty(self.mode))
    }

    /// Remove the most recently added value.
    pub fn remove_last(&mut self) -> Option<SelectionValue> {
        let last = self.values().last()?.clone();
        self.deselect(&last)
    }

    /// Replace the whole selection.
    ///
    /// Returns the new value when it differs from the effective one.
    pub fn replace(&mut self, next: SelectionValue) -> Option<SelectionValue> {
        let next = next.coerce(self.mode);
        if &next == self.value() {
            return None;
        }
        self.internal = next.clone();
        Some(next)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(SelectionMode::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi(values: &[&str]) -> SelectionValue {
        SelectionValue::Multiple(values.iter().map(|v| v.to_string()).collect())
    }

    fn single(value: &str) -> SelectionValue {
        SelectionValue::Single(Some(value.to_string()))
    }

    #[test]
    fn test_new_selection_is_empty_and_uncontrolled() {
        let selection = Selection::new(SelectionMode::Multiple);
        assert!(selection.value().is_empty());
        assert!(!selection.is_controlled());
    }

    #[test]
    fn test_single_select_replaces_and_closes() {
        let mut selection = Selection::new(SelectionMode::Single);
        let outcome = selection.select("a");
        assert_eq!(outcome.changed, Some(single("a")));
        assert!(outcome.close_panel);

        let outcome = selection.select("b");
        assert_eq!(outcome.changed, Some(single("b")));
        assert_eq!(selection.value(), &single("b"));
    }

    #[test]
    fn test_single_reselect_is_noop_but_closes() {
        let mut selection = Selection::new(SelectionMode::Single);
        selection.select("a");
        let outcome = selection.select("a");
        assert_eq!(outcome.changed, None);
        assert!(outcome.close_panel);
        assert_eq!(selection.value(), &single("a"));
    }

    #[test]
    fn test_multi_select_appends_in_order() {
        let mut selection = Selection::new(SelectionMode::Multiple);
        selection.select("c");
        selection.select("a");
        let outcome = selection.select("b");
        assert_eq!(outcome.changed, Some(multi(&["c", "a", "b"])));
        assert!(!outcome.close_panel);
    }

    #[test]
    fn test_multi_reselect_removes() {
        let mut selection = Selection::new(SelectionMode::Multiple);
        selection.select("a");
        selection.select("b");
        let outcome = selection.select("a");
        assert_eq!(outcome.changed, Some(multi(&["b"])));
        assert_eq!(selection.values(), ["b".to_string()]);
    }

    #[test]
    fn test_deselect_and_clear() {
        let mut selection = Selection::new(SelectionMode::Multiple);
        selection.select("a");
        selection.select("b");

        assert_eq!(selection.deselect("a"), Some(multi(&["b"])));
        assert_eq!(selection.deselect("missing"), None);
        assert_eq!(selection.clear(), Some(multi(&[])));
        // Clearing an empty selection is not a change.
        assert_eq!(selection.clear(), None);
    }

    #[test]
    fn test_single_deselect() {
        let mut selection = Selection::new(SelectionMode::Single);
        selection.select("a");
        assert_eq!(selection.deselect("a"), Some(SelectionValue::Single(None)));
    }

    #[test]
    fn test_remove_last() {
        let mut selection = Selection::new(SelectionMode::Multiple);
        assert_eq!(selection.remove_last(), None);
        selection.select("a");
        selection.select("b");
        assert_eq!(selection.remove_last(), Some(multi(&["a"])));
    }

    #[test]
    fn test_controlled_value_is_never_mutated() {
        let mut selection = Selection::new(SelectionMode::Single);
        selection.set_controlled(Some(SelectionValue::Single(None)));

        let outcome = selection.select("a");
        assert_eq!(outcome.changed, Some(single("a")));
        // Nothing visible changes until the owner echoes the value back.
        assert_eq!(selection.value(), &SelectionValue::Single(None));

        selection.set_controlled(Some(single("a")));
        assert_eq!(selection.value(), &single("a"));
    }

    #[test]
    fn test_controlled_multi_toggles_against_owner_value() {
        let mut selection = Selection::new(SelectionMode::Multiple);
        selection.set_controlled(Some(multi(&["x"])));

        assert_eq!(selection.select("y").changed, Some(multi(&["x", "y"])));
        // Owner did not echo, so toggling "x" is computed against ["x"].
        assert_eq!(selection.select("x").changed, Some(multi(&[])));
        assert_eq!(selection.value(), &multi(&["x"]));
    }

    #[test]
    fn test_uncontrolled_round_trip() {
        let mut selection = Selection::new(SelectionMode::Multiple);
        selection.select("a");
        selection.select("b");
        selection.deselect("a");
        assert_eq!(selection.value(), &multi(&["b"]));
        selection.clear();
        assert!(selection.value().is_empty());
    }

    #[test]
    fn test_release_control_falls_back_to_internal() {
        let mut selection = Selection::new(SelectionMode::Single);
        selection.set_controlled(Some(single("owner")));
        selection.select("mine");
        selection.set_controlled(None);
        assert_eq!(selection.value(), &single("mine"));
    }

    #[test]
    fn test_coerce_between_modes() {
        assert_eq!(multi(&["a", "b"]).coerce(SelectionMode::Single), single("a"));
        assert_eq!(single("a").coerce(SelectionMode::Multiple), multi(&["a"]));
        assert_eq!(
            SelectionValue::Single(None).coerce(SelectionMode::Multiple),
            multi(&[])
        );
    }

    #[test]
    fn test_set_mode_converts_values() {
        let mut selection = Selection::new(SelectionMode::Single);
        selection.select("a");
        selection.set_mode(SelectionMode::Multiple);
        assert_eq!(selection.value(), &multi(&["a"]));
    }
}
