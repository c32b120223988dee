//! Plain `tabular` serializer for labeled string tables.

use crate::frame::LabeledTable;
use crate::options::TabularOptions;

/// Layout switches for [`to_latex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexOptions {
    pub column_format: String,
    pub index: bool,
    pub header: bool,
    pub booktabs: bool,
}

impl LatexOptions {
    /// Resolve tabular options against a table, filling in the default
    /// column format.
    pub fn resolve(table: &LabeledTable<String>, options: &TabularOptions) -> Self {
        let column_format = options
            .column_format
            .clone()
            .unwrap_or_else(|| default_column_format(table, options.index));
        Self {
            column_format,
            index: options.index,
            header: options.header,
            booktabs: options.booktabs,
        }
    }
}

/// One `l` per printed column: the index (when shown) and every data column.
pub fn default_column_format(table: &LabeledTable<String>, index: bool) -> String {
    let count = table.ncols() + usize::from(index);
    "l".repeat(count)
}

/// Serialize `table` as a `tabular` environment.
///
/// ```text
/// \begin{tabular}{lll}
/// \toprule
/// {}    & model_1 & model_2 \\
/// \midrule
/// alpha &         &    3.00 \\
/// \bottomrule
/// \end{tabular}
/// ```
pub fn to_latex(table: &LabeledTable<String>, options: &LatexOptions) -> String {
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(table.nrows() + 1);
    if options.header {
        let mut header = Vec::with_capacity(table.ncols() + 1);
        if options.index {
            header.push("{}".to_string());
        }
        header.extend(table.columns().iter().cloned());
        lines.push(header);
    }
    for (label, row) in table.iter_rows() {
        let mut line = Vec::with_capacity(row.len() + 1);
        if options.index {
            line.push(label.to_string());
        }
        line.extend(row.iter().cloned());
        lines.push(line);
    }

    let width = lines.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..width)
        .map(|j| {
            lines
                .iter()
                .map(|line| line[j].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let (top, mid, bottom) = if options.booktabs {
        (r"\toprule", r"\midrule", r"\bottomrule")
    } else {
        (r"\hline", r"\hline", r"\hline")
    };

    let mut out = String::new();
    out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", options.column_format));
    out.push_str(top);
    out.push('\n');
    for (i, line) in lines.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(j, (cell, &w))| {
                if options.index && j == 0 {
                    format!("{:<w$}", cell, w = w)
                } else {
                    format!("{:>w$}", cell, w = w)
                }
            })
            .collect();
        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
        if options.header && i == 0 {
            out.push_str(mid);
            out.push('\n');
        }
    }
    out.push_str(bottom);
    out.push('\n');
    out.push_str("\\end{tabular}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> LabeledTable<String> {
        LabeledTable::new(
            labels(&["alpha", "beta"]),
            labels(&["model_1", "model_2"]),
            vec![labels(&[" ", "3.00"]), labels(&["0.00", "3.00"])],
        )
        .unwrap()
    }

    fn opts(index: bool, header: bool, booktabs: bool) -> LatexOptions {
        LatexOptions::resolve(
            &sample(),
            &TabularOptions::new().index(index).header(header).booktabs(booktabs),
        )
    }

    #[test]
    fn test_default_column_format() {
        assert_eq!(default_column_format(&sample(), true), "lll");
        assert_eq!(default_column_format(&sample(), false), "ll");
    }

    #[test]
    fn test_booktabs_layout() {
        let out = to_latex(&sample(), &opts(true, true, true));
        let expected = "\\begin{tabular}{lll}\n\
\\toprule\n\
{}    & model_1 & model_2 \\\\\n\
\\midrule\n\
alpha &         &    3.00 \\\\\n\
beta  &    0.00 &    3.00 \\\\\n\
\\bottomrule\n\
\\end{tabular}\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_hline_without_booktabs() {
        let out = to_latex(&sample(), &opts(true, true, false));
        assert!(!out.contains("toprule"));
        assert_eq!(out.matches("\\hline").count(), 3);
    }

    #[test]
    fn test_without_index_or_header() {
        let out = to_latex(&sample(), &opts(false, false, true));
        assert!(out.starts_with("\\begin{tabular}{ll}\n"));
        assert!(!out.contains("alpha"));
        assert!(!out.contains("model_1"));
        assert!(!out.contains("midrule"));
        assert!(out.contains("\n     & 3.00 \\\\\n0.00 & 3.00 \\\\\n"));
    }

    #[test]
    fn test_no_escaping() {
        let table = LabeledTable::new(
            labels(&["a_1"]),
            labels(&["x"]),
            vec![labels(&[r"\multicolumn{1}{c}{5%}"])],
        )
        .unwrap();
        let out = to_latex(&table, &LatexOptions::resolve(&table, &TabularOptions::default()));
        assert!(out.contains(r"a_1 & \multicolumn{1}{c}{5%} \\"));
    }
}
