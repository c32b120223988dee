//! Rendering: turn formatted tables into LaTeX markup.
//!
//! This module handles the last stage, after formatting and combining:
//!
//! - **latex**: the generic `tabular` serializer over a table of strings
//! - **tabular**: `TexTable` entry points for `tabular` and `tabularx`,
//!   including the stretched-column splice and optional file output
//!
//! Cells are written as they are. Nothing is escaped, since cells may
//! already hold markup such as `\multicolumn` wrappers.
//!
//! ## Example
//!
//! ```rust
//! use textableslib::{LabeledTable, TabularOptions, TexTable};
//!
//! let raw = LabeledTable::new(
//!     vec!["alpha".to_string()],
//!     vec!["m1".to_string()],
//!     vec![vec![1.5]],
//! )
//! .unwrap();
//! let markup = TexTable::new(&raw, "{:.2f}")
//!     .unwrap()
//!     .render_tabular(&TabularOptions::default());
//! assert!(markup.starts_with("\\begin{tabular}{ll}"));
//! ```

pub mod latex;
pub mod tabular;

pub use latex::{default_column_format, to_latex, LatexOptions};
