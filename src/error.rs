//! Errors reported by the checked solve entry points.

use thiserror::Error;

/// Input or configuration rejected before searching.
///
/// Cancellation is not an error; see [`crate::bnb::SolveOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    #[error("duplicate gem id: {0}")]
    DuplicateGemId(String),

    #[error("duplicate core id: {0}")]
    DuplicateCoreId(String),

    #[error("gem {id} has quantity {quantity}; expand it into singleton gems first")]
    UnexpandedQuantity { id: String, quantity: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SolveError::DuplicateGemId("g1".into()).to_string(),
            "duplicate gem id: g1"
        );
        assert_eq!(
            SolveError::UnexpandedQuantity {
                id: "g2".into(),
                quantity: 3
            }
            .to_string(),
            "gem g2 has quantity 3; expand it into singleton gems first"
        );
    }
}
