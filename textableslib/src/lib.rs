//! # textableslib
//!
//! Turn tables of already computed statistics into LaTeX `tabular` and
//! `tabularx` markup.
//!
//! ## Overview
//!
//! The input is a labeled 2-D table (or a labeled vector) of numbers and
//! strings. The library formats every cell with one Python-style template,
//! shows missing values as blank cells, and combines formatted tables:
//!
//! - **Formatting**: `{:3.2f}`, `({:.2f})`, `{:,d}` and friends, applied per cell
//! - **Interleaving**: coefficient rows followed by their inference rows
//! - **Decimal alignment**: cells without the decimal delimiter are wrapped in
//!   `\multicolumn{1}{c}{...}` so dcolumn/siunitx columns typeset them
//! - **Diagonal tables**: one estimate per univariate model, plus an
//!   optional joint model
//! - **Concatenation**: label-aligned, blanks where a table has no entry
//! - **Rendering**: booktabs `tabular` or width-constrained `tabularx`
//!
//! Every operation returns a new table. No options are global.
//!
//! ## Example
//!
//! ```rust
//! use textableslib::{LabeledTable, ModelFitOptions, TabularOptions, TexTable};
//!
//! let labels = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
//! let coef = LabeledTable::new(
//!     labels(&["alpha", "beta"]),
//!     labels(&["model_1", "model_2"]),
//!     vec![vec![f64::NAN, 3.0], vec![0.0, 3.0]],
//! )
//! .unwrap();
//! let se = LabeledTable::new(
//!     labels(&["alpha", "beta"]),
//!     labels(&["model_1", "model_2"]),
//!     vec![vec![f64::NAN, 0.5], vec![0.1, 0.2]],
//! )
//! .unwrap();
//!
//! let opts = ModelFitOptions::new().fmt_coef("{:3.2f}").fmt_inference("({:3.2f})");
//! let table = TexTable::from_model_fit(&coef, &se, None, &opts).unwrap();
//! assert_eq!(table.cell(0, 0), Some(" "));
//! assert_eq!(table.cell(3, 1), Some("(0.20)"));
//!
//! let markup = table.render_tabular(&TabularOptions::default());
//! assert!(markup.contains("begin{tabular}"));
//! ```

pub mod cell;
pub mod error;
pub mod format;
pub mod frame;
pub mod join;
pub mod model_fit;
pub mod options;
pub mod render;
pub mod textable;

pub use cell::{is_empty_cell, Cell, BLANK};
pub use error::TexTableError;
pub use format::FormatTemplate;
pub use frame::{Elementwise, LabeledSeries, LabeledTable};
pub use join::concat;
pub use model_fit::ModelFitOptions;
pub use options::{Axis, DcolumnOptions, Orientation, TabularOptions, TabularxOptions};
pub use render::{to_latex, LatexOptions};
pub use textable::{multicolumn, to_diagonal, TexTable};

/// Result type for textableslib operations
pub type Result<T> = std::result::Result<T, TexTableError>;
