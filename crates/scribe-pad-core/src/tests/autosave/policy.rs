use crate::{AutosavePolicy, EditKind};

use std::time::Duration;

use tokio::time::Instant;

// Test constants matching the production defaults
const DEBOUNCE: Duration = Duration::from_secs(5);
const FLOOR: Duration = Duration::from_secs(180);

fn policy() -> AutosavePolicy {
    AutosavePolicy::new(DEBOUNCE, FLOOR)
}

/// WHAT: A fresh policy is clean with no deadlines
/// WHY: Nothing should be pending before the scheduler arms the floor
#[test]
fn given_fresh_policy_when_inspected_then_clean_and_idle() {
    let policy = policy();

    assert!(!policy.is_dirty());
    assert!(!policy.should_write());
    assert!(policy.next_deadline().is_none());
}

/// WHAT: An edit burst keeps moving the short deadline to the last edit
/// WHY: Standard debounce: each edit supersedes the previous short timer
#[test]
fn given_edit_burst_when_noting_activity_then_short_deadline_tracks_last_edit() {
    // Given: Three edits one second apart
    let mut policy = policy();
    let t0 = Instant::now();
    policy.note_activity(EditKind::Insert, t0);
    policy.note_activity(EditKind::Insert, t0 + Duration::from_secs(1));
    policy.note_activity(EditKind::Insert, t0 + Duration::from_secs(2));

    // Then: Dirty, and the next deadline is debounce after the LAST edit
    assert!(policy.is_dirty());
    assert_eq!(
        policy.next_deadline(),
        Some(t0 + Duration::from_secs(2) + DEBOUNCE)
    );
}

/// WHAT: The floor deadline is never pushed back by later edits
/// WHY: Guarantees an upper bound on staleness while the user keeps typing
#[test]
fn given_late_edit_when_noting_activity_then_floor_deadline_unmoved() {
    // Given: A first edit at t0 arming the floor at t0 + 180s
    let mut policy = policy();
    let t0 = Instant::now();
    policy.note_activity(EditKind::Insert, t0);

    // When: Another edit lands just before the floor would fire
    policy.note_activity(EditKind::Insert, t0 + Duration::from_secs(179));

    // Then: The earliest deadline is the original floor, not the new debounce
    // (short would be t0 + 184s, floor stayed at t0 + 180s)
    assert_eq!(policy.next_deadline(), Some(t0 + FLOOR));
}

/// WHAT: Copy resets the debounce without marking dirty
/// WHY: Copy does not mutate content but still signals active interaction
#[test]
fn given_copy_when_noting_activity_then_debounce_armed_but_clean() {
    let mut policy = policy();
    let t0 = Instant::now();

    policy.note_activity(EditKind::Copy, t0);

    assert!(!policy.is_dirty());
    assert!(!policy.should_write());
    assert_eq!(policy.next_deadline(), Some(t0 + DEBOUNCE));
}

/// WHAT: Cut and paste mark the policy dirty
/// WHY: Both mutate content and must schedule a write
#[test]
fn given_cut_or_paste_when_noting_activity_then_dirty() {
    let t0 = Instant::now();

    for kind in [EditKind::Cut, EditKind::Paste] {
        let mut policy = policy();
        policy.note_activity(kind, t0);
        assert!(policy.is_dirty(), "{kind:?} should set dirty");
    }
}

/// WHAT: A successful flush clears dirty and re-arms only the floor
/// WHY: The short deadline must never be re-armed from within a flush
#[test]
fn given_successful_flush_when_finished_then_clean_with_floor_rearmed() {
    // Given: A dirty policy with both deadlines pending
    let mut policy = policy();
    let t0 = Instant::now();
    policy.note_activity(EditKind::Insert, t0);

    // When: A flush completes successfully at t1
    let t1 = t0 + DEBOUNCE;
    policy.finish_flush(t1, true);

    // Then: Clean, and the only pending deadline is the fresh floor
    assert!(!policy.is_dirty());
    assert_eq!(policy.next_deadline(), Some(t1 + FLOOR));
}

/// WHAT: A failed flush keeps the dirty flag
/// WHY: Unsaved edits must survive so a later flush can retry
#[test]
fn given_failed_flush_when_finished_then_still_dirty() {
    let mut policy = policy();
    let t0 = Instant::now();
    policy.note_activity(EditKind::Insert, t0);

    let t1 = t0 + DEBOUNCE;
    policy.finish_flush(t1, false);

    // Still dirty; the re-armed floor guarantees a retry
    assert!(policy.is_dirty());
    assert_eq!(policy.next_deadline(), Some(t1 + FLOOR));
}

/// WHAT: arm_floor is a no-op when a floor is already pending
/// WHY: The floor must only be armed when currently unset
#[test]
fn given_pending_floor_when_arming_again_then_unchanged() {
    let mut policy = policy();
    let t0 = Instant::now();

    policy.arm_floor(t0);
    policy.arm_floor(t0 + Duration::from_secs(10));

    assert_eq!(policy.next_deadline(), Some(t0 + FLOOR));
}

/// WHAT: is_due flips exactly at the deadline
/// WHY: The driver flushes on reached deadlines, not before
#[test]
fn given_pending_deadline_when_checking_due_then_flips_at_deadline() {
    let mut policy = policy();
    let t0 = Instant::now();
    policy.note_activity(EditKind::Insert, t0);

    assert!(!policy.is_due(t0 + DEBOUNCE - Duration::from_millis(1)));
    assert!(policy.is_due(t0 + DEBOUNCE));
}
