//! Labeled containers: the tabular engine underneath `TexTable`.
//!
//! This module provides the minimal labeled-data layer the formatting core
//! consumes:
//!
//! - **LabeledTable**: 2-D grid with ordered row and column labels
//! - **LabeledSeries**: labeled 1-D vector
//! - **Elementwise**: the map/mask capability shared by tables, series, and
//!   bare label sequences
//!
//! Labels need not be unique. Label-aligned operations match the n-th
//! occurrence of a label in one sequence with its n-th occurrence in the
//! other, so the blank labels of interleaved rows still line up.

pub mod series;
pub mod table;

pub use series::LabeledSeries;
pub use table::LabeledTable;

use crate::error::TexTableError;
use crate::Result;

/// Cell-by-cell operations over a labeled container.
///
/// Code that only needs to transform values (delimiter wrapping, diagonal
/// construction) is written against this trait so it works the same for
/// tables, series, and label sequences.
pub trait Elementwise {
    /// Cell type
    type Item;
    /// Same container shape holding another cell type
    type Mapped<U>;

    /// Apply `f` to every cell, keeping labels and shape.
    fn elementwise_map<U, F>(&self, f: F) -> Self::Mapped<U>
    where
        F: FnMut(&Self::Item) -> U;

    /// Replace every cell where `mask` is true with the cell at the same
    /// position of `replacement`.
    fn elementwise_mask(&self, mask: &Self::Mapped<bool>, replacement: &Self) -> Result<Self>
    where
        Self: Sized,
        Self::Item: Clone;
}

impl<T> Elementwise for Vec<T> {
    type Item = T;
    type Mapped<U> = Vec<U>;

    fn elementwise_map<U, F>(&self, f: F) -> Vec<U>
    where
        F: FnMut(&T) -> U,
    {
        self.iter().map(f).collect()
    }

    fn elementwise_mask(&self, mask: &Vec<bool>, replacement: &Self) -> Result<Self>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        if mask.len() != self.len() || replacement.len() != self.len() {
            return Err(TexTableError::ShapeMismatch(format!(
                "mask of length {} and replacement of length {} for a sequence of length {}",
                mask.len(),
                replacement.len(),
                self.len()
            )));
        }
        Ok(self
            .iter()
            .zip(mask)
            .zip(replacement)
            .map(|((value, &hit), other)| if hit { other.clone() } else { value.clone() })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_map_and_mask() {
        let labels = vec!["a".to_string(), "b.1".to_string()];
        let mask = labels.elementwise_map(|s| !s.contains('.'));
        assert_eq!(mask, vec![true, false]);

        let upper = labels.elementwise_map(|s| s.to_uppercase());
        let masked = labels.elementwise_mask(&mask, &upper).unwrap();
        assert_eq!(masked, vec!["A".to_string(), "b.1".to_string()]);
    }

    #[test]
    fn test_vec_mask_length_mismatch() {
        let values = vec![1, 2, 3];
        let err = values.elementwise_mask(&vec![true], &values).unwrap_err();
        assert!(matches!(err, TexTableError::ShapeMismatch(_)));
    }
}
