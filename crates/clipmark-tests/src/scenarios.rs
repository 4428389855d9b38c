//! End-to-end editing flows through `EditorSession`.

use clipmark_audio::TransportEvent;
use clipmark_core::{Boundary, EditorConfig, TimeRange};
use clipmark_timeline::{Clip, CommitOutcome, EditMode, SelectionChange};
use clipmark_ui::ClickOutcome;

use crate::harness::Harness;

fn unlocked() -> EditorConfig {
    EditorConfig {
        lock_selected_clip_drag: false,
        ..EditorConfig::default()
    }
}

// ── Creating clips ─────────────────────────────────────────────

#[test]
fn reversed_clicks_create_one_named_clip() {
    let mut h = Harness::new(Vec::new());
    h.session.set_marking(true);

    assert_eq!(h.click_at(10.0), ClickOutcome::DefinitionStarted(10.0));
    assert_eq!(
        h.click_at(5.0),
        ClickOutcome::Committed(CommitOutcome::CreationScheduled)
    );
    assert_eq!(h.session.range(), TimeRange::new(5.0, 10.0));

    assert!(h.advance(99).created.is_none());
    let id = h.advance(1).created.expect("clip after debounce");

    assert_eq!(h.session.clips().len(), 1);
    let clip = &h.session.clips()[0];
    assert_eq!(clip.id, id);
    assert_eq!((clip.start, clip.end), (5.0, 10.0));
    assert_eq!(clip.name, "클립 1");
    assert!(h.session.registry().is_editing(&id));
}

#[test]
fn auto_names_count_up() {
    let mut h = Harness::new(Vec::new());
    let first = h.mark(5.0, 10.0).created.unwrap();
    h.session.commit_edit(&first, "클립 1").unwrap();
    h.session.select_clip(&first);

    let second = h.mark(30.0, 40.0).created.unwrap();
    let names: Vec<_> = h.session.clips().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["클립 1", "클립 2"]);
    assert_ne!(first, second);
}

#[test]
fn clicks_while_creation_pending_are_ignored() {
    let mut h = Harness::new(Vec::new());
    h.session.set_marking(true);
    h.click_at(5.0);
    h.click_at(10.0);

    assert_eq!(h.click_at(50.0), ClickOutcome::Ignored);
    h.advance(100);
    assert_eq!(h.session.clips().len(), 1);
    assert_eq!(h.session.clips()[0].end, 10.0);
}

#[test]
fn marking_range_over_existing_clip_selects_it() {
    let seed = Clip::new("intro", 5.0, 10.0).unwrap();
    let id = seed.id.clone();
    let mut h = Harness::new(vec![seed]);
    h.session.set_marking(true);

    h.click_at(5.05);
    assert_eq!(
        h.click_at(9.95),
        ClickOutcome::Committed(CommitOutcome::SelectedExisting(id.clone()))
    );
    h.advance(500);
    assert_eq!(h.session.clips().len(), 1);
    assert!(h.session.registry().is_selected(&id));
    assert_eq!(h.session.range(), TimeRange::new(5.0, 10.0));
}

// ── Resizing ───────────────────────────────────────────────────

#[test]
fn dragging_selected_clip_resizes_in_place() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let a_id = a.id.clone();
    let mut h = Harness::with_config(vec![a], unlocked());

    assert_eq!(
        h.session.select_clip(&a_id),
        SelectionChange::Selected(a_id.clone())
    );
    assert!(h.drag(Boundary::End, &[14.0, 18.0, 20.0]));
    let outcome = h.advance(50);
    assert_eq!(outcome.commit, Some(CommitOutcome::Updated(a_id.clone())));

    h.advance(1_000);
    let clips = h.session.clips();
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].id, a_id);
    assert_eq!((clips[0].start, clips[0].end), (5.0, 20.0));
}

#[test]
fn selected_clip_is_locked_until_edit() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let a_id = a.id.clone();
    let mut h = Harness::new(vec![a]);

    h.session.select_clip(&a_id);
    assert!(!h.drag(Boundary::End, &[20.0]));
    assert_eq!(h.session.mode(), EditMode::Idle);

    assert!(h.session.begin_edit(&a_id));
    assert!(h.drag(Boundary::End, &[20.0]));
    h.advance(50);
    assert_eq!(h.session.clips()[0].end, 20.0);
    assert_eq!(h.session.clips().len(), 1);
}

#[test]
fn edit_keeps_identity_and_creation_time() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let original = a.clone();
    let mut h = Harness::new(vec![a]);

    h.session.begin_edit(&original.id);
    h.drag(Boundary::Start, &[3.0]);
    h.advance(50);
    h.session.commit_edit(&original.id, "  opening remarks ").unwrap();

    let clip = &h.session.clips()[0];
    assert_eq!(clip.id, original.id);
    assert_eq!(clip.created_at, original.created_at);
    assert_eq!(clip.name, "opening remarks");
    assert_eq!((clip.start, clip.end), (3.0, 10.0));
    assert!(h.session.registry().editing().is_none());
    assert!(h.session.registry().is_selected(&original.id));
}

#[test]
fn rapid_redrags_never_duplicate() {
    let mut h = Harness::new(Vec::new());
    h.session.set_marking(true);
    h.click_at(5.0);
    h.click_at(10.0);

    for end in [12.0, 14.0, 16.0] {
        assert!(h.drag(Boundary::End, &[end]));
        h.advance(50);
    }
    h.advance(100);
    h.advance(1_000);

    assert_eq!(h.session.clips().len(), 1);
    assert_eq!(h.session.clips()[0].end, 16.0);
}

#[test]
fn committing_edit_before_drag_settles_keeps_clip_locked() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let a_id = a.id.clone();
    let mut h = Harness::new(vec![a]);

    h.session.begin_edit(&a_id);
    assert!(h.drag(Boundary::End, &[30.0]));
    h.session.commit_edit(&a_id, "named").unwrap();

    let outcome = h.advance(60);
    assert!(outcome.commit.is_none());
    let clip = &h.session.clips()[0];
    assert_eq!((clip.start, clip.end), (5.0, 10.0));
    assert!(h.session.registry().is_selected(&a_id));
    assert!(!h.session.snapshot().drag_enabled);
}

#[test]
fn drag_past_other_marker_normalizes() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let a_id = a.id.clone();
    let mut h = Harness::new(vec![a]);

    h.session.begin_edit(&a_id);
    h.drag(Boundary::Start, &[8.0, 15.0]);
    assert_eq!(h.session.range(), TimeRange::new(15.0, 10.0));
    h.advance(50);
    assert_eq!(h.session.range(), TimeRange::new(10.0, 15.0));
    let clip = &h.session.clips()[0];
    assert_eq!((clip.start, clip.end), (10.0, 15.0));
}

// ── Gesture hygiene ────────────────────────────────────────────

#[test]
fn click_on_release_does_not_start_definition() {
    let mut h = Harness::new(Vec::new());
    h.session.set_marking(true);
    h.session.apply_external_range(TimeRange::new(5.0, 10.0));

    h.drag(Boundary::End, &[30.0]);
    assert_eq!(h.click_at(30.0), ClickOutcome::Ignored);
    assert_eq!(h.session.mode(), EditMode::DraggingEnd);
    assert_eq!(h.session.range(), TimeRange::new(5.0, 30.0));

    let outcome = h.advance(50);
    assert_eq!(outcome.commit, Some(CommitOutcome::CreationScheduled));
}

#[test]
fn external_range_waits_for_gesture() {
    let mut h = Harness::new(Vec::new());
    h.session.apply_external_range(TimeRange::new(5.0, 10.0));
    let token = h.session.marker_pointer_down(Boundary::Start).unwrap();
    h.session.pointer_move(token, 40.0);

    assert!(!h.session.apply_external_range(TimeRange::new(60.0, 70.0)));
    h.session.pointer_up(token, h.now);
    h.advance(50);
    assert!(h.session.apply_external_range(TimeRange::new(60.0, 70.0)));
}

#[test]
fn selection_toggle_restores_state() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let b = Clip::new("B", 20.0, 30.0).unwrap();
    let a_id = a.id.clone();
    let mut h = Harness::new(vec![a, b]);
    let before = h.session.snapshot();

    h.session.select_clip(&a_id);
    assert_eq!(h.session.range(), TimeRange::new(5.0, 10.0));
    h.session.select_clip(&a_id);
    assert_eq!(h.session.snapshot(), before);
}

// ── Cancellation & failure ─────────────────────────────────────

#[test]
fn cancel_leaves_registry_untouched() {
    let a = Clip::new("A", 5.0, 10.0).unwrap();
    let seeds = vec![a.clone()];
    let mut h = Harness::new(seeds.clone());

    // A pending creation, plus an unfinished edit with a settled resize.
    h.session.set_marking(true);
    h.click_at(40.0);
    h.click_at(50.0);
    h.session.set_marking(false);
    h.session.begin_edit(&a.id);
    h.drag(Boundary::End, &[25.0]);
    h.advance(50);
    h.drag(Boundary::Start, &[2.0]);

    h.session.cancel();
    for _ in 0..5 {
        assert!(h.advance(200).is_empty());
    }
    assert_eq!(h.session.clips(), seeds.as_slice());
    assert!(h.session.registry().selected().is_none());
    assert!(!h.session.registry().has_pending_creation());
}

#[test]
fn media_failure_disables_every_control() {
    let mut h = Harness::failing("decoder unavailable");
    let rx = h.session.subscribe();
    h.advance(0);

    assert!(matches!(rx.try_recv(), Ok(TransportEvent::Error { .. })));
    let snapshot = h.session.snapshot();
    assert!(!snapshot.controls_enabled);
    assert!(!snapshot.drag_enabled);
    assert!(!h.session.play());
    assert!(!h.session.seek(10.0));
    h.session.set_marking(true);
    assert!(!h.session.is_marking());
    assert_eq!(h.click_at(10.0), ClickOutcome::Ignored);
}

#[test]
fn clip_preview_pauses_at_clip_end() {
    let a = Clip::new("A", 30.0, 32.0).unwrap();
    let a_id = a.id.clone();
    let mut h = Harness::new(vec![a]);

    assert!(h.session.play_clip(&a_id));
    h.advance(10);
    assert!(h.session.transport().is_playing());
    h.advance(3_000);
    assert!(!h.session.transport().is_playing());
    assert_eq!(h.session.transport().current_time(), 32.0);
}
