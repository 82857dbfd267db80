//! Bijection check for optimiser answers.

use std::collections::HashSet;

use thiserror::Error;

use crate::AttractionId;

/// Why an optimiser answer is not a permutation of its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    /// Input ids absent from the answer.
    #[error("path omits {} attraction(s)", ids.len())]
    Missing {
        /// Ids that were dropped.
        ids: Vec<AttractionId>,
    },
    /// An id appeared more than once.
    #[error("path visits {id} more than once")]
    Duplicate {
        /// The repeated id.
        id: AttractionId,
    },
    /// Ids that were never requested.
    #[error("path contains {} unrequested attraction(s)", ids.len())]
    Foreign {
        /// Unexpected ids.
        ids: Vec<AttractionId>,
    },
}

/// Check that `candidate` lists every id of `input` exactly once.
///
/// Foreign ids are reported first, then duplicates, then omissions.
///
/// # Errors
/// Returns the first [`PermutationError`] found.
pub fn validate_permutation(
    input: &[AttractionId],
    candidate: &[AttractionId],
) -> Result<(), PermutationError> {
    let expected: HashSet<&AttractionId> = input.iter().collect();

    let foreign: Vec<AttractionId> = candidate
        .iter()
        .filter(|id| !expected.contains(id))
        .cloned()
        .collect();
    if !foreign.is_empty() {
        return Err(PermutationError::Foreign { ids: foreign });
    }

    let mut seen = HashSet::with_capacity(candidate.len());
    if let Some(id) = candidate.iter().find(|id| !seen.insert(*id)) {
        return Err(PermutationError::Duplicate { id: id.clone() });
    }

    let missing: Vec<AttractionId> = input
        .iter()
        .filter(|id| !seen.contains(id))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PermutationError::Missing { ids: missing })
    }
}
