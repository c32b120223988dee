//! Labeled one-dimensional vector.

use serde::{Deserialize, Serialize};

use crate::error::TexTableError;
use crate::frame::{Elementwise, LabeledTable};
use crate::Result;

/// A vector of values with one label per value and an optional name.
///
/// Serialized as `{"name": "joint", "index": ["a", "b"], "values": [1.0, 2.0]}`;
/// `name` may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawSeries<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct LabeledSeries<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    index: Vec<String>,
    values: Vec<T>,
}

#[derive(Deserialize)]
struct RawSeries<T> {
    #[serde(default)]
    name: Option<String>,
    index: Vec<String>,
    values: Vec<T>,
}

impl<T> TryFrom<RawSeries<T>> for LabeledSeries<T> {
    type Error = TexTableError;

    fn try_from(raw: RawSeries<T>) -> Result<Self> {
        Ok(LabeledSeries::new(raw.index, raw.values)?.named_opt(raw.name))
    }
}

impl<T> LabeledSeries<T> {
    /// Create an unnamed series; there must be one label per value.
    pub fn new(index: Vec<String>, values: Vec<T>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(TexTableError::ShapeMismatch(format!(
                "{} values for {} index labels",
                values.len(),
                index.len()
            )));
        }
        Ok(Self {
            name: None,
            index,
            values,
        })
    }

    /// Builder: set the series name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn named_opt(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One-column table labeled by the series name (blank when unnamed).
    pub fn to_column(&self) -> LabeledTable<T>
    where
        T: Clone,
    {
        let data = self.values.iter().map(|v| vec![v.clone()]).collect();
        LabeledTable::from_parts(self.index.clone(), vec![self.label()], data)
    }

    /// One-row table labeled by the series name (blank when unnamed).
    pub fn to_row(&self) -> LabeledTable<T>
    where
        T: Clone,
    {
        LabeledTable::from_parts(
            vec![self.label()],
            self.index.clone(),
            vec![self.values.clone()],
        )
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| " ".to_string())
    }
}

impl<T> Elementwise for LabeledSeries<T> {
    type Item = T;
    type Mapped<U> = LabeledSeries<U>;

    fn elementwise_map<U, F>(&self, f: F) -> LabeledSeries<U>
    where
        F: FnMut(&T) -> U,
    {
        LabeledSeries {
            name: self.name.clone(),
            index: self.index.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    fn elementwise_mask(&self, mask: &LabeledSeries<bool>, replacement: &Self) -> Result<Self>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        let values = self.values.elementwise_mask(&mask.values, &replacement.values)?;
        Ok(LabeledSeries {
            name: self.name.clone(),
            index: self.index.clone(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> LabeledSeries<f64> {
        LabeledSeries::new(vec!["a".to_string(), "b".to_string()], vec![1.0, 2.0]).unwrap()
    }

    #[test]
    fn test_new_checks_length() {
        assert!(LabeledSeries::new(vec!["a".to_string()], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_to_column_and_row() {
        let s = series().named("joint");
        let col = s.to_column();
        assert_eq!(col.shape(), (2, 1));
        assert_eq!(col.columns(), &["joint".to_string()][..]);
        assert_eq!(col.get(1, 0), Some(&2.0));

        let row = series().to_row();
        assert_eq!(row.shape(), (1, 2));
        assert_eq!(row.index(), &[" ".to_string()][..]);
    }

    #[test]
    fn test_map_and_mask() {
        let s = series();
        let big = s.elementwise_map(|v| *v > 1.5);
        let zeros = s.elementwise_map(|_| 0.0);
        let masked = s.elementwise_mask(&big, &zeros).unwrap();
        assert_eq!(masked.values(), &[1.0, 0.0]);
    }

    #[test]
    fn test_serde_optional_name() {
        let s: LabeledSeries<f64> =
            serde_json::from_str(r#"{"index":["a"],"values":[1.5]}"#).unwrap();
        assert_eq!(s.name(), None);
        let s: LabeledSeries<f64> =
            serde_json::from_str(r#"{"name":"j","index":["a"],"values":[1.5]}"#).unwrap();
        assert_eq!(s.name(), Some("j"));
        assert!(serde_json::from_str::<LabeledSeries<f64>>(r#"{"index":[],"values":[1]}"#).is_err());
    }
}
