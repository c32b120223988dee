//! `tabular` and `tabularx` output for `TexTable`.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::TexTableError;
use crate::options::{TabularOptions, TabularxOptions};
use crate::render::latex::{to_latex, LatexOptions};
use crate::textable::TexTable;
use crate::Result;

const TABULAR_BEGIN: &str = r"\begin{tabular}";
const TABULAR_END: &str = r"\end{tabular}";

impl TexTable {
    /// `tabular` markup of the formatted cells.
    pub fn render_tabular(&self, options: &TabularOptions) -> String {
        let latex = LatexOptions::resolve(self.formatted(), options);
        to_latex(self.formatted(), &latex)
    }

    /// Like [`TexTable::render_tabular`], but writes to `options.buf` when
    /// set and returns `None`; otherwise returns the markup.
    pub fn to_tabular(&self, options: &TabularOptions) -> Result<Option<String>> {
        deliver(self.render_tabular(options), options.buf.as_deref())
    }

    /// `tabularx` markup: the column at `x_column_loc` becomes the
    /// stretched `X` column and the table spans `textwidth` of the text.
    ///
    /// Fails with [`TexTableError::ColumnFormat`] when the column format has
    /// no character at `x_column_loc`.
    pub fn render_tabularx(&self, options: &TabularxOptions) -> Result<String> {
        let mut latex = LatexOptions::resolve(self.formatted(), &options.tabular);
        latex.column_format = splice_x_column(&latex.column_format, options.x_column_loc)?;

        let tabular = to_latex(self.formatted(), &latex);
        let markup = as_tabularx(&tabular, options.textwidth);
        debug!(
            column_format = %latex.column_format,
            textwidth = options.textwidth,
            "rendered tabularx"
        );
        Ok(markup)
    }

    /// Like [`TexTable::render_tabularx`] with the same file contract as
    /// [`TexTable::to_tabular`].
    pub fn to_tabularx(&self, options: &TabularxOptions) -> Result<Option<String>> {
        let markup = self.render_tabularx(options)?;
        deliver(markup, options.tabular.buf.as_deref())
    }
}

/// Write `markup` to `buf` if given, otherwise hand it back.
fn deliver(markup: String, buf: Option<&Path>) -> Result<Option<String>> {
    match buf {
        Some(path) => {
            fs::write(path, &markup).map_err(|source| TexTableError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), bytes = markup.len(), "wrote table");
            Ok(None)
        }
        None => Ok(Some(markup)),
    }
}

/// Replace the character at `loc` with `X`.
fn splice_x_column(column_format: &str, loc: usize) -> Result<String> {
    let mut chars: Vec<char> = column_format.chars().collect();
    match chars.get_mut(loc) {
        Some(c) => *c = 'X',
        None => {
            return Err(TexTableError::ColumnFormat {
                column_format: column_format.to_string(),
                position: loc,
            })
        }
    }
    Ok(chars.into_iter().collect())
}

/// Rewrite the outer `tabular` markers as `tabularx` with a width.
fn as_tabularx(tabular: &str, textwidth: f64) -> String {
    let begin = format!(r"\begin{{tabularx}}{{{}\textwidth}}", width_literal(textwidth));
    let mut out = tabular.replacen(TABULAR_BEGIN, &begin, 1);
    if let Some(pos) = out.rfind(TABULAR_END) {
        out.replace_range(pos..pos + TABULAR_END.len(), r"\end{tabularx}");
    }
    out
}

/// `1.0` for whole numbers, shortest round-trip digits otherwise.
fn width_literal(textwidth: f64) -> String {
    if textwidth.is_finite() && textwidth.fract() == 0.0 {
        format!("{:.1}", textwidth)
    } else {
        textwidth.to_string()
    }
}
