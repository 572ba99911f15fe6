//! Sequential-gate decision logic for a female's mating chain.
//!
//! Mating *n* may only be registered once mating *n-1* has a diagnosis and,
//! when that diagnosis is positive, a birth. Both a completed birth and a
//! negative diagnosis are terminal for a link and unblock the next one.
//!
//! Numbering is owned by the `sequence_number` column (highest + 1, taken
//! inside the registration transaction and backed by a partial unique index);
//! the `MONTA-<n>` tag is derived from it and never parsed back.

use serde::{Deserialize, Serialize};

use crate::domains::breeding::error::SequenceBlock;

/// Display tag for a mating's position in its female's chain.
pub fn sequence_tag(sequence: i32) -> String {
    format!("MONTA-{}", sequence)
}

/// Diagnosis state of the latest mating in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisState {
    pub positive: bool,
    pub has_birth: bool,
}

/// The latest (highest-numbered) live mating of a female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestMating {
    pub sequence: i32,
    pub diagnosis: Option<DiagnosisState>,
}

/// Snapshot of a female's mating chain, read inside the registration
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Number of live (non-deleted) matings on record.
    pub mating_count: i64,
    pub latest: Option<LatestMating>,
}

impl ChainSnapshot {
    /// An empty chain: no matings registered yet.
    pub fn empty() -> Self {
        Self {
            mating_count: 0,
            latest: None,
        }
    }
}

/// Apply the sequential gate. Returns the sequence number the next mating
/// takes, or the specific blocking reason.
pub fn check_gate(chain: &ChainSnapshot) -> Result<i32, SequenceBlock> {
    let Some(latest) = chain.latest else {
        return Ok(1);
    };

    // Live count and highest number must agree; a hole in the chain means
    // prior matings are missing and the pipeline cannot be extended.
    if chain.mating_count != i64::from(latest.sequence) {
        return Err(SequenceBlock::MissingPriorMating {
            expected: latest.sequence,
            found: chain.mating_count,
        });
    }

    match latest.diagnosis {
        None => Err(SequenceBlock::MissingDiagnosis {
            sequence: latest.sequence,
        }),
        Some(DiagnosisState {
            positive: true,
            has_birth: false,
        }) => Err(SequenceBlock::PendingBirth {
            sequence: latest.sequence,
        }),
        Some(_) => Ok(latest.sequence + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(sequence: i32, diagnosis: Option<DiagnosisState>) -> ChainSnapshot {
        ChainSnapshot {
            mating_count: i64::from(sequence),
            latest: Some(LatestMating {
                sequence,
                diagnosis,
            }),
        }
    }

    #[test]
    fn test_sequence_tag_format() {
        assert_eq!(sequence_tag(1), "MONTA-1");
        assert_eq!(sequence_tag(12), "MONTA-12");
    }

    #[test]
    fn test_empty_chain_starts_at_one() {
        assert_eq!(check_gate(&ChainSnapshot::empty()), Ok(1));
    }

    #[test]
    fn test_undiagnosed_latest_blocks() {
        let err = check_gate(&chain(1, None)).unwrap_err();
        assert_eq!(err, SequenceBlock::MissingDiagnosis { sequence: 1 });
    }

    #[test]
    fn test_positive_diagnosis_without_birth_blocks() {
        let err = check_gate(&chain(
            2,
            Some(DiagnosisState {
                positive: true,
                has_birth: false,
            }),
        ))
        .unwrap_err();
        assert_eq!(err, SequenceBlock::PendingBirth { sequence: 2 });
    }

    #[test]
    fn test_negative_diagnosis_unblocks() {
        let next = check_gate(&chain(
            3,
            Some(DiagnosisState {
                positive: false,
                has_birth: false,
            }),
        ))
        .unwrap();
        assert_eq!(next, 4);
    }

    #[test]
    fn test_birth_unblocks() {
        let next = check_gate(&chain(
            1,
            Some(DiagnosisState {
                positive: true,
                has_birth: true,
            }),
        ))
        .unwrap();
        assert_eq!(next, 2);
    }

    #[test]
    fn test_hole_in_chain_blocks() {
        let snapshot = ChainSnapshot {
            mating_count: 2,
            latest: Some(LatestMating {
                sequence: 4,
                diagnosis: Some(DiagnosisState {
                    positive: false,
                    has_birth: false,
                }),
            }),
        };
        let err = check_gate(&snapshot).unwrap_err();
        assert_eq!(
            err,
            SequenceBlock::MissingPriorMating {
                expected: 4,
                found: 2
            }
        );
    }
}
