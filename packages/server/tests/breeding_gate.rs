//! Sequential-gate rule scenarios over a full chain lifecycle.

use server_core::domains::breeding::gate::{
    check_gate, sequence_tag, ChainSnapshot, DiagnosisState, LatestMating,
};
use server_core::domains::breeding::SequenceBlock;

fn chain(count: i64, sequence: i32, diagnosis: Option<DiagnosisState>) -> ChainSnapshot {
    ChainSnapshot {
        mating_count: count,
        latest: Some(LatestMating {
            sequence,
            diagnosis,
        }),
    }
}

#[test]
fn first_mating_is_always_allowed() {
    assert_eq!(check_gate(&ChainSnapshot::empty()), Ok(1));
}

#[test]
fn full_lifecycle_unblocks_each_stage_in_order() {
    // MONTA-1 registered, no diagnosis yet: blocked.
    let after_mating = chain(1, 1, None);
    assert_eq!(
        check_gate(&after_mating),
        Err(SequenceBlock::MissingDiagnosis { sequence: 1 })
    );

    // Positive diagnosis recorded: still blocked until the birth.
    let after_diagnosis = chain(
        1,
        1,
        Some(DiagnosisState {
            positive: true,
            has_birth: false,
        }),
    );
    assert_eq!(
        check_gate(&after_diagnosis),
        Err(SequenceBlock::PendingBirth { sequence: 1 })
    );

    // Birth recorded: MONTA-2 may open.
    let after_birth = chain(
        1,
        1,
        Some(DiagnosisState {
            positive: true,
            has_birth: true,
        }),
    );
    assert_eq!(check_gate(&after_birth), Ok(2));
}

#[test]
fn negative_diagnosis_is_terminal_without_a_birth() {
    let snapshot = chain(
        3,
        3,
        Some(DiagnosisState {
            positive: false,
            has_birth: false,
        }),
    );
    assert_eq!(check_gate(&snapshot), Ok(4));
}

#[test]
fn chain_hole_blocks_registration() {
    // Highest number is 3 but only 2 live matings remain on record.
    let snapshot = chain(
        2,
        3,
        Some(DiagnosisState {
            positive: false,
            has_birth: false,
        }),
    );
    assert_eq!(
        check_gate(&snapshot),
        Err(SequenceBlock::MissingPriorMating {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn tags_are_derived_from_the_sequence_number() {
    assert_eq!(sequence_tag(check_gate(&ChainSnapshot::empty()).unwrap()), "MONTA-1");
    assert_eq!(sequence_tag(12), "MONTA-12");
}
