//! Saving a session's clips and seeding a new session from them.

use clipmark_core::{EditorConfig, TimeRange};
use clipmark_timeline::{Clip, ClipFile};

use crate::harness::{Harness, DURATION};

#[test]
fn saved_clips_seed_next_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clips.json");

    let mut h = Harness::new(Vec::new());
    let id = h.mark(5.0, 10.0).created.unwrap();
    h.session.commit_edit(&id, "인사").unwrap();
    h.session.to_clip_file().save_to_file(&path).unwrap();

    let seeds = ClipFile::load_from_file(&path).unwrap().clips;
    let mut next = Harness::new(seeds);
    assert_eq!(next.session.clips().len(), 1);
    let clip = &next.session.clips()[0];
    assert_eq!(clip.id, id);
    assert_eq!(clip.name, "인사");

    // The stored clip dedupes a re-marked range in the new session.
    next.session.set_marking(true);
    next.click_at(5.0);
    next.click_at(10.0);
    next.advance(500);
    assert_eq!(next.session.clips().len(), 1);
    assert_eq!(next.session.range(), TimeRange::new(5.0, 10.0));
}

#[test]
fn save_includes_range_still_in_debounce() {
    let mut h = Harness::new(Vec::new());
    h.session.set_marking(true);
    h.click_at(20.0);
    h.click_at(35.0);

    let file = h.session.to_clip_file();
    assert_eq!(file.clips.len(), 1);
    assert_eq!((file.clips[0].start, file.clips[0].end), (20.0, 35.0));
    assert!(!h.session.registry().has_pending_creation());
}

#[test]
fn legacy_array_file_seeds_session() {
    let raw = r#"[
        { "id": "1712900000000", "start": 12.0, "end": 18.5, "name": "상담 시작",
          "createdAt": "2024-04-12T05:00:00Z" },
        { "id": "1712900000001", "start": 40.0, "end": 30.0, "name": "broken" }
    ]"#;
    let seeds = ClipFile::from_json(raw.as_bytes()).unwrap().clips;
    let h = Harness::new(seeds);

    // The inverted entry is dropped at seeding.
    assert_eq!(h.session.clips().len(), 1);
    assert_eq!(h.session.clips()[0].id.as_str(), "1712900000000");
}

#[test]
fn stored_clip_past_recording_end_is_not_saved_back() {
    let early = Clip::new("early", 12.0, 18.0).unwrap();
    let late = Clip::new("late", 100.0, 130.0).unwrap();
    let mut h = Harness::new(vec![early, late]);

    let saved = h.session.save();
    assert_eq!(saved.len(), 1);
    assert!(saved.iter().all(|clip| clip.end <= DURATION));
}

#[test]
fn config_file_changes_naming_and_debounce() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(
        &path,
        br#"{ "clip_name_prefix": "Segment", "creation_debounce_ms": 300 }"#,
    )
    .unwrap();
    let config = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(config.dedupe_tolerance_secs, 0.1);

    let mut h = Harness::with_config(Vec::new(), config);
    h.session.set_marking(true);
    h.click_at(1.0);
    h.click_at(4.0);
    assert!(h.advance(200).created.is_none());
    assert!(h.advance(100).created.is_some());
    assert_eq!(h.session.clips()[0].name, "Segment 1");
}

#[test]
fn export_trims_names() {
    let mut clip = Clip::new("x", 1.0, 2.0).unwrap();
    clip.name = "  padded  ".into();
    let mut h = Harness::new(vec![clip]);
    assert_eq!(h.session.save()[0].name, "padded");
}
