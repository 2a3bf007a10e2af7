//! Reusable UI components.
//!
//! Leaf modules (`option`, `selection`, `navigator`, `popover`, `pointer`,
//! `chips`) are the building blocks; `picker` ties them together and the
//! controls wrap it.

mod chips;
mod combobox;
mod help_bar;
mod navigator;
mod option;
mod picker;
mod pointer;
mod popover;
mod searchable_select;
mod selection;
mod tag_input;
mod tree_view;

pub use chips::{layout_chips, render_chips, ChipRow, ChipSlot};
pub use combobox::{Combobox, ComboboxAction};
pub use help_bar::render_context_help;
pub use navigator::{NavAction, Navigator, PanelState, Seed};
pub use option::{
    filter_indices, filter_options, filter_options_with, find_option, matches_any_field,
    matches_label, MatchFn, SelectOption,
};
pub use picker::DEFAULT_MAX_VISIBLE;
pub use pointer::{ListenerGuard, ListenerId, PointerListeners};
pub use popover::{panel_area, Align, Placement, Popover, PopoverFocus};
pub use searchable_select::{SearchableSelect, SelectAction};
pub use selection::{SelectOutcome, Selection, SelectionMode, SelectionValue};
pub use tag_input::{TagInput, TagInputAction};
pub use tree_view::{TreeAction, TreeNode, TreeView};
