//! Two-dimensional labeled grid.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::TexTableError;
use crate::frame::Elementwise;
use crate::options::Axis;
use crate::Result;

/// A 2-D grid of cells with ordered row labels (the index) and column labels.
///
/// Serialized in the "split" layout:
///
/// ```json
/// {"index": ["alpha", "beta"], "columns": ["m1", "m2"], "data": [[1.0, 2.0], [3.0, null]]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawTable<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct LabeledTable<T> {
    index: Vec<String>,
    columns: Vec<String>,
    data: Vec<Vec<T>>,
}

#[derive(Deserialize)]
struct RawTable<T> {
    index: Vec<String>,
    columns: Vec<String>,
    data: Vec<Vec<T>>,
}

impl<T> TryFrom<RawTable<T>> for LabeledTable<T> {
    type Error = TexTableError;

    fn try_from(raw: RawTable<T>) -> Result<Self> {
        LabeledTable::new(raw.index, raw.columns, raw.data)
    }
}

/// Labels keyed by occurrence: the second `" "` is `(" ", 1)`.
fn occurrences(labels: &[String]) -> Vec<(&str, usize)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let n = seen.entry(label.as_str()).or_insert(0);
            *n += 1;
            (label.as_str(), *n - 1)
        })
        .collect()
}

fn positions(labels: &[String]) -> HashMap<(&str, usize), usize> {
    occurrences(labels)
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key, i))
        .collect()
}

/// Union of label sequences in order of first appearance.
///
/// A label repeated within one sequence is kept as often as the sequence
/// that repeats it most.
fn label_union<'a>(sequences: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let set: IndexSet<(&str, usize)> = sequences
        .into_iter()
        .flat_map(occurrences)
        .collect();
    set.into_iter().map(|(label, _)| label.to_string()).collect()
}

impl<T> LabeledTable<T> {
    /// Create a table from row-major data.
    ///
    /// Every row must have one value per column label and there must be one
    /// row per index label.
    pub fn new(index: Vec<String>, columns: Vec<String>, data: Vec<Vec<T>>) -> Result<Self> {
        if data.len() != index.len() {
            return Err(TexTableError::ShapeMismatch(format!(
                "{} rows of data for {} index labels",
                data.len(),
                index.len()
            )));
        }
        if let Some((i, row)) = data
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(TexTableError::ShapeMismatch(format!(
                "row '{}' has {} values for {} columns",
                index[i],
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            index,
            columns,
            data,
        })
    }

    /// Assemble a table whose shape is known to be consistent.
    pub(crate) fn from_parts(index: Vec<String>, columns: Vec<String>, data: Vec<Vec<T>>) -> Self {
        debug_assert_eq!(data.len(), index.len());
        debug_assert!(data.iter().all(|row| row.len() == columns.len()));
        Self {
            index,
            columns,
            data,
        }
    }

    /// Create a table with every cell set to `value`.
    pub fn filled(index: Vec<String>, columns: Vec<String>, value: T) -> Self
    where
        T: Clone,
    {
        let data = vec![vec![value; columns.len()]; index.len()];
        Self {
            index,
            columns,
            data,
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Row labels
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column labels
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell at a row/column position
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    /// Cell at a row/column label
    pub fn get_by_label(&self, row: &str, col: &str) -> Option<&T> {
        let r = self.index.iter().position(|l| l == row)?;
        let c = self.columns.iter().position(|l| l == col)?;
        self.get(r, c)
    }

    /// Row-major view of the data
    pub fn rows(&self) -> &[Vec<T>] {
        &self.data
    }

    /// Row at a position
    pub fn row(&self, i: usize) -> Option<&[T]> {
        self.data.get(i).map(Vec::as_slice)
    }

    /// Iterate over (label, row) pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().map(Vec::as_slice))
    }

    /// Apply `f` to every cell.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> LabeledTable<U> {
        LabeledTable {
            index: self.index.clone(),
            columns: self.columns.clone(),
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }

    /// Apply a fallible `f` to every cell, stopping at the first error.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T) -> std::result::Result<U, E>,
    ) -> std::result::Result<LabeledTable<U>, E> {
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(&mut f).collect())
            .collect::<std::result::Result<Vec<Vec<U>>, E>>()?;
        Ok(LabeledTable {
            index: self.index.clone(),
            columns: self.columns.clone(),
            data,
        })
    }

    /// Replace cells where `mask` is true with the matching cell of `other`.
    pub fn mask(&self, mask: &LabeledTable<bool>, other: &LabeledTable<T>) -> Result<Self>
    where
        T: Clone,
    {
        if mask.shape() != self.shape() || other.shape() != self.shape() {
            return Err(TexTableError::ShapeMismatch(format!(
                "mask {:?} and replacement {:?} for a table of shape {:?}",
                mask.shape(),
                other.shape(),
                self.shape()
            )));
        }
        let data = self
            .data
            .iter()
            .zip(&mask.data)
            .zip(&other.data)
            .map(|((row, hits), replacement)| {
                row.iter()
                    .zip(hits)
                    .zip(replacement)
                    .map(|((value, &hit), other)| if hit { other.clone() } else { value.clone() })
                    .collect()
            })
            .collect();
        Ok(Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            data,
        })
    }

    /// Replace cells where `mask` is true with `fill`.
    pub fn mask_with(&self, mask: &LabeledTable<bool>, fill: T) -> Result<Self>
    where
        T: Clone,
    {
        let other = LabeledTable::filled(self.index.clone(), self.columns.clone(), fill);
        self.mask(mask, &other)
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> Self
    where
        T: Clone,
    {
        let data = (0..self.ncols())
            .map(|j| self.data.iter().map(|row| row[j].clone()).collect())
            .collect();
        Self {
            index: self.columns.clone(),
            columns: self.index.clone(),
            data,
        }
    }

    /// Conform the table to new column labels.
    ///
    /// Columns are matched by label; labels absent from this table get `fill`.
    pub fn reindex_columns(&self, columns: &[String], fill: T) -> Self
    where
        T: Clone,
    {
        let pos = positions(&self.columns);
        let lookup: Vec<Option<usize>> = occurrences(columns)
            .into_iter()
            .map(|key| pos.get(&key).copied())
            .collect();
        let data = self
            .data
            .iter()
            .map(|row| {
                lookup
                    .iter()
                    .map(|j| j.map_or_else(|| fill.clone(), |j| row[j].clone()))
                    .collect()
            })
            .collect();
        Self {
            index: self.index.clone(),
            columns: columns.to_vec(),
            data,
        }
    }

    /// Conform the table to new row labels.
    ///
    /// Rows are matched by label; labels absent from this table become rows
    /// of `fill`.
    pub fn reindex_rows(&self, index: &[String], fill: T) -> Self
    where
        T: Clone,
    {
        let pos = positions(&self.index);
        let data = occurrences(index)
            .into_iter()
            .map(|key| match pos.get(&key) {
                Some(&i) => self.data[i].clone(),
                None => vec![fill.clone(); self.ncols()],
            })
            .collect();
        Self {
            index: index.to_vec(),
            columns: self.columns.clone(),
            data,
        }
    }

    /// Replace the row labels.
    pub fn with_index(mut self, index: Vec<String>) -> Result<Self> {
        if index.len() != self.nrows() {
            return Err(TexTableError::ShapeMismatch(format!(
                "{} index labels for {} rows",
                index.len(),
                self.nrows()
            )));
        }
        self.index = index;
        Ok(self)
    }

    /// Replace the column labels.
    pub fn with_columns(mut self, columns: Vec<String>) -> Result<Self> {
        if columns.len() != self.ncols() {
            return Err(TexTableError::ShapeMismatch(format!(
                "{} column labels for {} columns",
                columns.len(),
                self.ncols()
            )));
        }
        self.columns = columns;
        Ok(self)
    }

    /// Concatenate tables along an axis, aligning the other axis by label.
    ///
    /// Along `Axis::Rows` the tables are stacked vertically and the result
    /// has the union of all column labels; along `Axis::Columns` they are
    /// placed side by side over the union of all row labels. Unions keep the
    /// order in which labels first appear. Cells with no source get `fill`.
    pub fn concat(tables: &[LabeledTable<T>], axis: Axis, fill: T) -> Result<Self>
    where
        T: Clone,
    {
        if tables.is_empty() {
            return Err(TexTableError::EmptyConcat);
        }

        match axis {
            Axis::Rows => {
                let columns = label_union(tables.iter().map(|t| t.columns.as_slice()));
                let mut index = Vec::new();
                let mut data = Vec::new();
                for table in tables {
                    let aligned = table.reindex_columns(&columns, fill.clone());
                    index.extend(aligned.index);
                    data.extend(aligned.data);
                }
                Ok(Self {
                    index,
                    columns,
                    data,
                })
            }
            Axis::Columns => {
                let index = label_union(tables.iter().map(|t| t.index.as_slice()));
                let mut columns = Vec::new();
                let mut data: Vec<Vec<T>> = vec![Vec::new(); index.len()];
                for table in tables {
                    let aligned = table.reindex_rows(&index, fill.clone());
                    columns.extend(aligned.columns);
                    for (row, part) in data.iter_mut().zip(aligned.data) {
                        row.extend(part);
                    }
                }
                Ok(Self {
                    index,
                    columns,
                    data,
                })
            }
        }
    }
}

impl<T> Elementwise for LabeledTable<T> {
    type Item = T;
    type Mapped<U> = LabeledTable<U>;

    fn elementwise_map<U, F>(&self, f: F) -> LabeledTable<U>
    where
        F: FnMut(&T) -> U,
    {
        self.map(f)
    }

    fn elementwise_mask(&self, mask: &LabeledTable<bool>, replacement: &Self) -> Result<Self>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        self.mask(mask, replacement)
    }
}

impl<T: fmt::Display> fmt::Display for LabeledTable<T> {
    /// Plain-text grid: labels left-aligned, cells right-aligned.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let label_width = self
            .index
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, c)| {
                cells
                    .iter()
                    .map(|row| row[j].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<width$}", "", width = label_width)?;
        for (c, w) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", c, width = w)?;
        }
        for (label, row) in self.index.iter().zip(&cells) {
            writeln!(f)?;
            write!(f, "{:<width$}", label, width = label_width)?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell, width = w)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> LabeledTable<i32> {
        LabeledTable::new(
            labels(&["a", "b"]),
            labels(&["x", "y", "z"]),
            vec![vec![1, 2, 3], vec![4, 5, 6]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_checks_shape() {
        let err = LabeledTable::new(labels(&["a"]), labels(&["x"]), vec![vec![1, 2]]).unwrap_err();
        assert!(err.to_string().contains("row 'a' has 2 values for 1 columns"));

        let err = LabeledTable::<i32>::new(labels(&["a", "b"]), labels(&["x"]), vec![vec![1]])
            .unwrap_err();
        assert!(matches!(err, TexTableError::ShapeMismatch(_)));
    }

    #[test]
    fn test_shape_and_access() {
        let table = sample();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.get(1, 2), Some(&6));
        assert_eq!(table.get(2, 0), None);
        assert_eq!(table.get_by_label("a", "y"), Some(&2));
        assert_eq!(table.row(0), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.index(), &labels(&["x", "y", "z"])[..]);
        assert_eq!(t.columns(), &labels(&["a", "b"])[..]);
        assert_eq!(t.get(2, 1), Some(&6));
    }

    #[test]
    fn test_map_and_mask() {
        let table = sample();
        let even = table.map(|v| v % 2 == 0);
        let masked = table.mask_with(&even, 0).unwrap();
        assert_eq!(masked.rows(), &[vec![1, 0, 3], vec![0, 5, 0]]);

        let small = LabeledTable::filled(labels(&["a"]), labels(&["x"]), true);
        assert!(table.mask_with(&small, 0).is_err());
    }

    #[test]
    fn test_try_map_stops_at_error() {
        let table = sample();
        let res: std::result::Result<LabeledTable<i32>, String> =
            table.try_map(|v| if *v < 5 { Ok(v * 10) } else { Err(format!("{v}")) });
        assert_eq!(res.unwrap_err(), "5");
    }

    #[test]
    fn test_reindex_columns_fills_missing() {
        let table = sample();
        let re = table.reindex_columns(&labels(&["z", "w", "x"]), -1);
        assert_eq!(re.columns(), &labels(&["z", "w", "x"])[..]);
        assert_eq!(re.rows(), &[vec![3, -1, 1], vec![6, -1, 4]]);
    }

    #[test]
    fn test_reindex_rows_fills_missing() {
        let table = sample();
        let re = table.reindex_rows(&labels(&["b", "c"]), 0);
        assert_eq!(re.rows(), &[vec![4, 5, 6], vec![0, 0, 0]]);
    }

    #[test]
    fn test_concat_rows_aligns_columns() {
        let top = sample();
        let bottom = LabeledTable::new(labels(&["r2"]), labels(&["y", "w"]), vec![vec![7, 8]])
            .unwrap();
        let res = LabeledTable::concat(&[top, bottom], Axis::Rows, 0).unwrap();
        assert_eq!(res.index(), &labels(&["a", "b", "r2"])[..]);
        assert_eq!(res.columns(), &labels(&["x", "y", "z", "w"])[..]);
        assert_eq!(res.row(2), Some(&[0, 7, 0, 8][..]));
        assert_eq!(res.row(0), Some(&[1, 2, 3, 0][..]));
    }

    #[test]
    fn test_concat_columns_aligns_index() {
        let left = sample();
        let right = LabeledTable::new(labels(&["b", "c"]), labels(&["n"]), vec![vec![9], vec![10]])
            .unwrap();
        let res = LabeledTable::concat(&[left, right], Axis::Columns, 0).unwrap();
        assert_eq!(res.index(), &labels(&["a", "b", "c"])[..]);
        assert_eq!(res.columns(), &labels(&["x", "y", "z", "n"])[..]);
        assert_eq!(res.row(0), Some(&[1, 2, 3, 0][..]));
        assert_eq!(res.row(1), Some(&[4, 5, 6, 9][..]));
        assert_eq!(res.row(2), Some(&[0, 0, 0, 10][..]));
    }

    #[test]
    fn test_concat_columns_repeated_labels() {
        let left = LabeledTable::new(
            labels(&["a", " ", "b", " "]),
            labels(&["x"]),
            vec![vec![1], vec![2], vec![3], vec![4]],
        )
        .unwrap();
        let right = LabeledTable::new(labels(&["a", "b"]), labels(&["n"]), vec![vec![8], vec![9]])
            .unwrap();
        let res = LabeledTable::concat(&[left, right], Axis::Columns, 0).unwrap();
        assert_eq!(res.index(), &labels(&["a", " ", "b", " "])[..]);
        assert_eq!(res.rows(), &[vec![1, 8], vec![2, 0], vec![3, 9], vec![4, 0]]);
    }

    #[test]
    fn test_concat_empty() {
        let err = LabeledTable::<i32>::concat(&[], Axis::Rows, 0).unwrap_err();
        assert!(matches!(err, TexTableError::EmptyConcat));
    }

    #[test]
    fn test_relabel() {
        let table = sample().with_index(labels(&["p", "q"])).unwrap();
        assert_eq!(table.index(), &labels(&["p", "q"])[..]);
        assert!(table.clone().with_columns(labels(&["only"])).is_err());
    }

    #[test]
    fn test_split_layout_serde() {
        let json = r#"{"index":["a"],"columns":["x","y"],"data":[[1,2]]}"#;
        let table: LabeledTable<i32> = serde_json::from_str(json).unwrap();
        assert_eq!(table.shape(), (1, 2));
        assert_eq!(serde_json::to_string(&table).unwrap(), json);

        let bad = r#"{"index":["a","b"],"columns":["x"],"data":[[1]]}"#;
        assert!(serde_json::from_str::<LabeledTable<i32>>(bad).is_err());
    }

    #[test]
    fn test_display_grid() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   x  y  z");
        assert_eq!(lines[1], "a  1  2  3");
    }
}
