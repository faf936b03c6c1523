//! Supporting-view lists per reference view.
use crate::error::FusionError;
use serde::{Deserialize, Serialize};

/// For each reference view, the ordered supporting views to fuse against.
///
/// A list may contain the reference itself, in which case its own maps are
/// used without reprojection. Order only matters for ties between equally
/// confident samples: the earlier view wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSet {
    supporting: Vec<Vec<usize>>,
}

impl ViewSet {
    pub fn new(supporting: Vec<Vec<usize>>) -> Self {
        Self { supporting }
    }

    /// Every view supports every reference, reference first.
    pub fn all(num_views: usize) -> Self {
        let supporting = (0..num_views)
            .map(|reference| {
                std::iter::once(reference)
                    .chain((0..num_views).filter(move |&v| v != reference))
                    .collect()
            })
            .collect();
        Self { supporting }
    }

    /// Number of reference views described.
    pub fn len(&self) -> usize {
        self.supporting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supporting.is_empty()
    }

    /// Supporting views of `reference`, or `None` if it is not described.
    pub fn supporting(&self, reference: usize) -> Option<&[usize]> {
        self.supporting.get(reference).map(Vec::as_slice)
    }

    /// Check that `reference` has a non-empty list of in-range indices.
    pub fn validate_reference(
        &self,
        reference: usize,
        num_views: usize,
    ) -> Result<&[usize], FusionError> {
        if reference >= num_views {
            return Err(FusionError::ReferenceOutOfRange {
                reference,
                views: num_views,
            });
        }
        let list = self
            .supporting(reference)
            .ok_or(FusionError::ReferenceOutOfRange {
                reference,
                views: self.len(),
            })?;
        if list.is_empty() {
            return Err(FusionError::EmptyViewSet { reference });
        }
        if let Some(&index) = list.iter().find(|&&v| v >= num_views) {
            return Err(FusionError::SupportingViewOutOfRange {
                reference,
                index,
                views: num_views,
            });
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_puts_reference_first() {
        let views = ViewSet::all(3);
        assert_eq!(views.supporting(0), Some(&[0, 1, 2][..]));
        assert_eq!(views.supporting(2), Some(&[2, 0, 1][..]));
    }

    #[test]
    fn validation_reports_bad_indices() {
        let views = ViewSet::new(vec![vec![0, 5], vec![]]);
        assert!(matches!(
            views.validate_reference(0, 3),
            Err(FusionError::SupportingViewOutOfRange { index: 5, .. })
        ));
        assert!(matches!(
            views.validate_reference(1, 3),
            Err(FusionError::EmptyViewSet { reference: 1 })
        ));
        assert!(matches!(
            views.validate_reference(3, 3),
            Err(FusionError::ReferenceOutOfRange { .. })
        ));
    }
}
