//! selectkit - searchable selection controls for ratatui.
//!
//! Provides a combobox, a searchable select, a tag input and a tree view
//! that share one filtering, selection and keyboard-navigation core, plus a
//! gallery binary that exercises them.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod ui;
