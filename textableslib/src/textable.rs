//! `TexTable`: a labeled table whose cells have been formatted for markup.
//!
//! Construction applies one format template to every cell of the source
//! table and puts the blank marker wherever the source cell is empty. All
//! transformations return a new `TexTable`; nothing is mutated in place.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::cell::{Cell, BLANK};
use crate::error::TexTableError;
use crate::format::FormatTemplate;
use crate::frame::{Elementwise, LabeledSeries, LabeledTable};
use crate::options::{Axis, DcolumnOptions};
use crate::Result;

/// A table of formatted, markup-ready cells.
///
/// Keeps the source values, the empty-cell mask, and the formatted strings;
/// all three have the same shape and labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TexTable {
    original: LabeledTable<Cell>,
    mask_empty: LabeledTable<bool>,
    table_fmt: LabeledTable<String>,
}

impl TexTable {
    /// Format every cell of `table` with the template `fmt` (e.g. `"{:3.2f}"`).
    ///
    /// Empty cells become a single space. Fails if `fmt` is not a valid
    /// template or cannot be applied to one of the non-empty cells.
    pub fn new<T>(table: &LabeledTable<T>, fmt: &str) -> Result<Self>
    where
        T: Clone + Into<Cell>,
    {
        let template = FormatTemplate::parse(fmt)?;
        Self::with_template(table, &template)
    }

    /// Same as [`TexTable::new`] with an already parsed template.
    pub fn with_template<T>(table: &LabeledTable<T>, template: &FormatTemplate) -> Result<Self>
    where
        T: Clone + Into<Cell>,
    {
        let original: LabeledTable<Cell> = table.map(|v| v.clone().into());
        let mask_empty = original.map(Cell::is_empty);
        let table_fmt = original.try_map(|cell| {
            if cell.is_empty() {
                Ok(BLANK.to_string())
            } else {
                template.apply(cell)
            }
        })?;

        debug!(
            rows = original.nrows(),
            cols = original.ncols(),
            template = %template,
            "formatted table"
        );

        Ok(Self {
            original,
            mask_empty,
            table_fmt,
        })
    }

    /// Wrap already formatted strings, re-applying only the blank marker.
    fn rewrap(table: LabeledTable<String>) -> Self {
        let original = table.map(|s| Cell::Str(s.clone()));
        let mask_empty = original.map(Cell::is_empty);
        let table_fmt = table.map(|s| {
            if s.trim().is_empty() {
                BLANK.to_string()
            } else {
                s.clone()
            }
        });
        Self {
            original,
            mask_empty,
            table_fmt,
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.table_fmt.shape()
    }

    /// Source values as given to the constructor
    pub fn original(&self) -> &LabeledTable<Cell> {
        &self.original
    }

    /// True where the source cell was empty
    pub fn mask_empty(&self) -> &LabeledTable<bool> {
        &self.mask_empty
    }

    /// Formatted strings
    pub fn formatted(&self) -> &LabeledTable<String> {
        &self.table_fmt
    }

    /// Formatted cell at a position
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.table_fmt.get(row, col).map(String::as_str)
    }

    /// Swap rows and columns of the formatted table.
    pub fn transpose(&self) -> TexTable {
        Self::rewrap(self.table_fmt.transpose())
    }

    /// Zip the rows of this table with the rows of `other`.
    ///
    /// Row `2k` of the result is row `k` of `self` and row `2k + 1` is row
    /// `k` of `other` with its columns aligned to `self` (missing columns are
    /// blank). The rows taken from `other` lose their labels: each pair reads
    /// as one entry under the label of `self`. Both tables must have the same
    /// number of rows.
    pub fn intertwine(&self, other: &TexTable) -> Result<TexTable> {
        let up = &self.table_fmt;
        if other.table_fmt.nrows() != up.nrows() {
            return Err(TexTableError::ShapeMismatch(format!(
                "cannot intertwine a table of {} rows with a table of {} rows",
                up.nrows(),
                other.table_fmt.nrows()
            )));
        }
        let down = other
            .table_fmt
            .reindex_columns(up.columns(), BLANK.to_string());

        let mut index = Vec::with_capacity(up.nrows() * 2);
        let mut data = Vec::with_capacity(up.nrows() * 2);
        for ((label, top), bottom) in up.iter_rows().zip(down.rows()) {
            index.push(label.to_string());
            index.push(BLANK.to_string());
            data.push(top.to_vec());
            data.push(bottom.clone());
        }

        debug!(rows = index.len(), "intertwined tables");
        let zipped = LabeledTable::from_parts(index, up.columns().to_vec(), data);
        Ok(Self::rewrap(zipped))
    }

    /// Wrap every cell without the delimiter in `\multicolumn{1}{c}{...}`.
    ///
    /// Decimal-aligned column types (dcolumn, siunitx) cannot typeset cells
    /// without a decimal point, so those are taken out of the alignment.
    /// Column labels are always treated; row labels only with
    /// `delimit_index`. The rule looks only at the characters: a blank cell
    /// is wrapped as well.
    pub fn with_dcolumn(&self, options: &DcolumnOptions) -> Result<TexTable> {
        let delimiter = options.delimiter;
        let mut table = wrap_undelimited(&self.table_fmt, delimiter)?;

        let columns = wrap_undelimited(&table.columns().to_vec(), delimiter)?;
        table = table.with_columns(columns)?;

        if options.delimit_index {
            let index = wrap_undelimited(&table.index().to_vec(), delimiter)?;
            table = table.with_index(index)?;
        }

        trace!(%delimiter, delimit_index = options.delimit_index, "wrapped undelimited cells");
        Ok(Self::rewrap(table))
    }

    /// Square table with `vector` on the diagonal, formatted with `fmt`.
    ///
    /// Off-diagonal cells are empty and render blank.
    pub fn from_diagonal<T>(vector: &LabeledSeries<T>, fmt: &str) -> Result<TexTable>
    where
        T: Clone + Into<Cell>,
    {
        TexTable::new(&to_diagonal(vector), fmt)
    }

    /// Diagonal table of several univariate results next to one joint result.
    ///
    /// `single` holds one estimate per univariate model and goes on the
    /// diagonal; `joint` holds the estimates of the multivariate model and is
    /// attached as a column (`Axis::Columns`) or a row (`Axis::Rows`) named
    /// after the series. The two parts are joined on their labels; cells with
    /// no estimate stay blank.
    pub fn diagonal_single_and_joint<T>(
        single: &LabeledSeries<T>,
        joint: &LabeledSeries<T>,
        orient_joint: Axis,
        fmt: &str,
    ) -> Result<TexTable>
    where
        T: Clone + Into<Cell>,
    {
        let joint: LabeledSeries<Cell> = joint.elementwise_map(|v| v.clone().into());
        let joint = match orient_joint {
            Axis::Columns => joint.to_column(),
            Axis::Rows => joint.to_row(),
        };
        let combined = LabeledTable::concat(&[to_diagonal(single), joint], orient_joint, Cell::Null)?;
        TexTable::new(&combined, fmt)
    }
}

/// The single-column wrapper that exempts a cell from decimal alignment.
pub fn multicolumn(content: &str) -> String {
    format!(r"\multicolumn{{1}}{{c}}{{{}}}", content)
}

/// Apply [`multicolumn`] to every entry that lacks `delimiter`.
fn wrap_undelimited<C>(cells: &C, delimiter: char) -> Result<C>
where
    C: Elementwise<Item = String, Mapped<String> = C>,
{
    let no_delimiter = cells.elementwise_map(|s| !s.contains(delimiter));
    let wrapped = cells.elementwise_map(|s| multicolumn(s));
    cells.elementwise_mask(&no_delimiter, &wrapped)
}

/// Square table with the vector's values on the diagonal and `Null`
/// everywhere else.
///
/// Cells are placed by position, not by value, so a genuine zero estimate
/// stays on the diagonal.
pub fn to_diagonal<T>(vector: &LabeledSeries<T>) -> LabeledTable<Cell>
where
    T: Clone + Into<Cell>,
{
    let labels = vector.index().to_vec();
    let n = labels.len();

    let data = vector
        .values()
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let mut row = vec![Cell::Null; n];
            row[i] = value.clone().into();
            row
        })
        .collect();

    debug!(size = n, "built diagonal table");
    LabeledTable::from_parts(labels.clone(), labels, data)
}

impl fmt::Display for TexTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_fmt)
    }
}

impl Serialize for TexTable {
    /// Serializes the formatted table in split layout.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.table_fmt.serialize(serializer)
    }
}
