//! Per-call options for combining and rendering tables.
//!
//! Nothing here is global: every transformation takes the options it needs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Axis along which tables are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    /// Stack vertically (axis 0)
    #[default]
    Rows,
    /// Place side by side (axis 1)
    Columns,
}

impl Axis {
    /// The other axis
    pub fn opposite(self) -> Self {
        match self {
            Axis::Rows => Axis::Columns,
            Axis::Columns => Axis::Rows,
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "rows" | "index" => Ok(Axis::Rows),
            "1" | "columns" => Ok(Axis::Columns),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}

/// Which axis holds the models in a table of estimates.
///
/// With `Columns` (one model per column) goodness-of-fit rows are appended
/// below the estimates; with `Rows` they are appended to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Columns,
    Rows,
}

impl Orientation {
    /// Axis along which goodness-of-fit statistics are attached
    pub fn stacking_axis(self) -> Axis {
        match self {
            Orientation::Columns => Axis::Rows,
            Orientation::Rows => Axis::Columns,
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "columns" => Ok(Orientation::Columns),
            "rows" => Ok(Orientation::Rows),
            _ => Err(format!("Unknown orientation: {} (expected 'columns' or 'rows')", s)),
        }
    }
}

/// Options for decimal-delimiter column wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcolumnOptions {
    /// Cells without this character get wrapped
    pub delimiter: char,
    /// Also wrap row labels
    pub delimit_index: bool,
}

impl Default for DcolumnOptions {
    fn default() -> Self {
        Self {
            delimiter: '.',
            delimit_index: false,
        }
    }
}

impl DcolumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the delimiter character
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder: wrap row labels too
    pub fn delimit_index(mut self, delimit: bool) -> Self {
        self.delimit_index = delimit;
        self
    }
}

/// Options for `tabular` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularOptions {
    /// Column format such as `lrr`; defaults to one `l` per printed column
    pub column_format: Option<String>,
    /// Print row labels
    pub index: bool,
    /// Print column labels
    pub header: bool,
    /// Use booktabs rules instead of `\hline`
    pub booktabs: bool,
    /// Write the markup here instead of returning it
    pub buf: Option<PathBuf>,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            column_format: None,
            index: true,
            header: true,
            booktabs: true,
            buf: None,
        }
    }
}

impl TabularOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the column format
    pub fn column_format(mut self, format: impl Into<String>) -> Self {
        self.column_format = Some(format.into());
        self
    }

    /// Builder: show or hide row labels
    pub fn index(mut self, show: bool) -> Self {
        self.index = show;
        self
    }

    /// Builder: show or hide column labels
    pub fn header(mut self, show: bool) -> Self {
        self.header = show;
        self
    }

    /// Builder: booktabs rules on or off
    pub fn booktabs(mut self, booktabs: bool) -> Self {
        self.booktabs = booktabs;
        self
    }

    /// Builder: write output to a file
    pub fn buf(mut self, path: impl Into<PathBuf>) -> Self {
        self.buf = Some(path.into());
        self
    }
}

/// Options for `tabularx` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularxOptions {
    /// Fraction of `\textwidth` the table spans
    pub textwidth: f64,
    /// Position in the column format that becomes the stretched `X` column
    pub x_column_loc: usize,
    /// Everything shared with `tabular`
    pub tabular: TabularOptions,
}

impl Default for TabularxOptions {
    fn default() -> Self {
        Self {
            textwidth: 1.0,
            x_column_loc: 0,
            tabular: TabularOptions::default(),
        }
    }
}

impl TabularxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the text width fraction
    pub fn textwidth(mut self, textwidth: f64) -> Self {
        self.textwidth = textwidth;
        self
    }

    /// Builder: set the stretched column position
    pub fn x_column_loc(mut self, loc: usize) -> Self {
        self.x_column_loc = loc;
        self
    }

    /// Builder: set the shared tabular options
    pub fn tabular(mut self, tabular: TabularOptions) -> Self {
        self.tabular = tabular;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_from_str() {
        assert_eq!(Axis::from_str("0").unwrap(), Axis::Rows);
        assert_eq!(Axis::from_str("index").unwrap(), Axis::Rows);
        assert_eq!(Axis::from_str("Columns").unwrap(), Axis::Columns);
        assert_eq!(Axis::from_str("1").unwrap(), Axis::Columns);
        assert!(Axis::from_str("2").is_err());
    }

    #[test]
    fn test_orientation_stacking_axis() {
        assert_eq!(Orientation::Columns.stacking_axis(), Axis::Rows);
        assert_eq!(Orientation::Rows.stacking_axis(), Axis::Columns);
        assert_eq!(Axis::Rows.opposite(), Axis::Columns);
    }

    #[test]
    fn test_orientation_from_str_rejects_others() {
        assert_eq!(Orientation::from_str("rows").unwrap(), Orientation::Rows);
        assert!(Orientation::from_str("index").is_err());
        assert!(Orientation::from_str("diagonal").is_err());
    }

    #[test]
    fn test_dcolumn_defaults() {
        let opts = DcolumnOptions::default();
        assert_eq!(opts.delimiter, '.');
        assert!(!opts.delimit_index);
        let opts = DcolumnOptions::new().delimiter(',').delimit_index(true);
        assert_eq!(opts.delimiter, ',');
        assert!(opts.delimit_index);
    }

    #[test]
    fn test_tabular_builders() {
        let opts = TabularOptions::new()
            .column_format("lrr")
            .booktabs(false)
            .index(false);
        assert_eq!(opts.column_format.as_deref(), Some("lrr"));
        assert!(!opts.booktabs);
        assert!(!opts.index);
        assert!(opts.header);

        let x = TabularxOptions::new().textwidth(0.75).x_column_loc(1);
        assert_eq!(x.textwidth, 0.75);
        assert_eq!(x.x_column_loc, 1);
    }
}
