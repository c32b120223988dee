//! Tables of model estimates: coefficients paired with their inference
//! statistics, optionally followed by goodness-of-fit measures.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::Cell;
use crate::frame::LabeledTable;
use crate::join;
use crate::options::Orientation;
use crate::textable::TexTable;
use crate::Result;

/// Options for [`TexTable::from_model_fit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFitOptions {
    /// Template for coefficients and goodness-of-fit values
    pub fmt_coef: String,
    /// Template for inference statistics (standard errors, t-values)
    pub fmt_inference: String,
    /// Where the models are laid out
    pub orient: Orientation,
}

impl Default for ModelFitOptions {
    fn default() -> Self {
        Self {
            fmt_coef: "{}".to_string(),
            fmt_inference: "({})".to_string(),
            orient: Orientation::Columns,
        }
    }
}

impl ModelFitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the coefficient template
    pub fn fmt_coef(mut self, fmt: impl Into<String>) -> Self {
        self.fmt_coef = fmt.into();
        self
    }

    /// Builder: set the inference template
    pub fn fmt_inference(mut self, fmt: impl Into<String>) -> Self {
        self.fmt_inference = fmt.into();
        self
    }

    /// Builder: set the model orientation
    pub fn orient(mut self, orient: Orientation) -> Self {
        self.orient = orient;
        self
    }
}

impl TexTable {
    /// Regression-style table.
    ///
    /// Each coefficient row is followed by the matching row of `inference`.
    /// When `good_of_fit` is given it is formatted with the coefficient
    /// template and attached below the estimates (models in columns) or to
    /// their right (models in rows).
    pub fn from_model_fit<T>(
        coef: &LabeledTable<T>,
        inference: &LabeledTable<T>,
        good_of_fit: Option<&LabeledTable<T>>,
        options: &ModelFitOptions,
    ) -> Result<TexTable>
    where
        T: Clone + Into<Cell>,
    {
        let coef = TexTable::new(coef, &options.fmt_coef)?;
        let inference = TexTable::new(inference, &options.fmt_inference)?;
        let estimates = coef.intertwine(&inference)?;

        let Some(good_of_fit) = good_of_fit else {
            return Ok(estimates);
        };

        let good_of_fit = TexTable::new(good_of_fit, &options.fmt_coef)?;
        let axis = options.orient.stacking_axis();
        debug!(?axis, "attaching goodness-of-fit statistics");
        join::concat(&[estimates, good_of_fit], axis, true)
    }
}
