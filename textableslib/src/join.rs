//! Concatenation of formatted tables.

use tracing::debug;

use crate::cell::Cell;
use crate::error::TexTableError;
use crate::format::FormatTemplate;
use crate::frame::LabeledTable;
use crate::options::Axis;
use crate::textable::TexTable;
use crate::Result;

/// Concatenate the formatted content of `tables` along `axis`.
///
/// Stacking along [`Axis::Rows`] keeps the union of all column labels in
/// first-appearance order; along [`Axis::Columns`] it keeps the union of the
/// row labels. Positions a table does not cover become blank. The result
/// wraps the already formatted strings and is not re-formatted.
///
/// Only `merge_columns = true` is supported; `false` fails with
/// [`TexTableError::Unsupported`].
pub fn concat(tables: &[TexTable], axis: Axis, merge_columns: bool) -> Result<TexTable> {
    if !merge_columns {
        return Err(TexTableError::Unsupported(
            "concatenating tables without merging columns".to_string(),
        ));
    }

    let parts: Vec<LabeledTable<Cell>> = tables
        .iter()
        .map(|t| t.formatted().map(|s| Cell::Str(s.clone())))
        .collect();
    let combined = LabeledTable::concat(&parts, axis, Cell::Null)?;

    debug!(tables = tables.len(), ?axis, shape = ?combined.shape(), "concatenated tables");
    TexTable::with_template(&combined, &FormatTemplate::passthrough())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table(index: &[&str], columns: &[&str], value: f64) -> TexTable {
        let data = vec![vec![value; columns.len()]; index.len()];
        let raw = LabeledTable::new(labels(index), labels(columns), data).unwrap();
        TexTable::new(&raw, "{:.2f}").unwrap()
    }

    #[test]
    fn test_concat_rows_unions_columns() {
        let a = table(&["a"], &["m1", "m2"], 1.0);
        let b = table(&["b"], &["m2", "m3"], 2.0);
        let res = concat(&[a, b], Axis::Rows, true).unwrap();

        assert_eq!(res.formatted().index(), &labels(&["a", "b"])[..]);
        assert_eq!(res.formatted().columns(), &labels(&["m1", "m2", "m3"])[..]);
        assert_eq!(res.formatted().row(0), Some(&labels(&["1.00", "1.00", " "])[..]));
        assert_eq!(res.formatted().row(1), Some(&labels(&[" ", "2.00", "2.00"])[..]));
        assert!(res.mask_empty().get(0, 2).copied().unwrap());
    }

    #[test]
    fn test_concat_columns_unions_index() {
        let a = table(&["a", "b"], &["m1"], 1.0);
        let b = table(&["b", "c"], &["m2"], 2.0);
        let res = concat(&[a, b], Axis::Columns, true).unwrap();

        assert_eq!(res.formatted().index(), &labels(&["a", "b", "c"])[..]);
        assert_eq!(res.formatted().columns(), &labels(&["m1", "m2"])[..]);
        assert_eq!(res.cell(1, 0), Some("1.00"));
        assert_eq!(res.cell(1, 1), Some("2.00"));
        assert_eq!(res.cell(2, 0), Some(" "));
    }

    #[test]
    fn test_concat_keeps_formatting() {
        let a = table(&["a"], &["m1"], 1.0);
        let res = concat(&[a.clone()], Axis::Rows, true).unwrap();
        assert_eq!(res.formatted(), a.formatted());
    }

    #[test]
    fn test_concat_without_merge_is_unsupported() {
        let a = table(&["a"], &["m1"], 1.0);
        let err = concat(&[a], Axis::Rows, false).unwrap_err();
        assert!(matches!(err, TexTableError::Unsupported(_)));
    }

    #[test]
    fn test_concat_nothing() {
        let err = concat(&[], Axis::Rows, true).unwrap_err();
        assert!(matches!(err, TexTableError::EmptyConcat));
    }
}
