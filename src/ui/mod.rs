//! User interface components.
//!
//! This module contains the selection controls, their building blocks and
//! the shared theme.

pub mod components;
pub mod theme;

pub use components::{
    render_context_help, Combobox, ComboboxAction, PointerListeners, SearchableSelect,
    SelectAction, SelectOption, SelectionValue, TagInput, TagInputAction, TreeAction, TreeNode,
    TreeView,
};
pub use theme::{init_theme, load_theme, theme, Theme};
