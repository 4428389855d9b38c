//! Randomized interaction sequences.

use clipmark_core::Boundary;
use clipmark_timeline::EditMode;
use proptest::prelude::*;

use crate::harness::{Harness, DURATION};

#[derive(Debug, Clone)]
enum Step {
    Marking(bool),
    Click(f64),
    Drag(Boundary, Vec<f64>),
    Wait(u64),
    SelectNth(usize),
    EditNth(usize),
    CommitEdit,
    CancelEdit,
}

fn step() -> impl Strategy<Value = Step> {
    let time = 0.0..DURATION;
    prop_oneof![
        any::<bool>().prop_map(Step::Marking),
        time.clone().prop_map(Step::Click),
        (
            prop_oneof![Just(Boundary::Start), Just(Boundary::End)],
            prop::collection::vec(-20.0..DURATION + 20.0, 1..6),
        )
            .prop_map(|(b, path)| Step::Drag(b, path)),
        (0u64..300).prop_map(Step::Wait),
        (0usize..4).prop_map(Step::SelectNth),
        (0usize..4).prop_map(Step::EditNth),
        Just(Step::CommitEdit),
        Just(Step::CancelEdit),
    ]
}

fn run(h: &mut Harness, step: &Step) {
    let nth = |h: &Harness, n: usize| h.session.clips().get(n).map(|c| c.id.clone());
    match step {
        Step::Marking(on) => h.session.set_marking(*on),
        Step::Click(t) => {
            h.click_at(*t);
        }
        Step::Drag(target, path) => {
            h.drag(*target, path);
        }
        Step::Wait(ms) => {
            h.advance(*ms);
        }
        Step::SelectNth(n) => {
            if let Some(id) = nth(h, *n) {
                h.session.select_clip(&id);
            }
        }
        Step::EditNth(n) => {
            if let Some(id) = nth(h, *n) {
                h.session.begin_edit(&id);
            }
        }
        Step::CommitEdit => {
            if let Some(id) = h.session.registry().editing().cloned() {
                let _ = h.session.commit_edit(&id, "renamed");
            }
        }
        Step::CancelEdit => {
            if let Some(id) = h.session.registry().editing().cloned() {
                h.session.cancel_edit(&id);
            }
        }
    }
}

fn assert_consistent(h: &Harness) {
    let tolerance = h.session.config().dedupe_tolerance_secs;
    let clips = h.session.clips();
    for (i, clip) in clips.iter().enumerate() {
        assert!(0.0 <= clip.start && clip.start < clip.end && clip.end <= DURATION);
        for other in &clips[i + 1..] {
            assert_ne!(clip.id, other.id);
            assert!(
                !clip.matches(other.start, other.end, tolerance),
                "{} duplicates {}",
                clip.name,
                other.name
            );
        }
    }

    let range = h.session.range();
    if h.session.mode() == EditMode::Idle {
        if let Some((start, end)) = range.bounds() {
            assert!(start <= end, "idle range {} is inverted", range);
        }
    }
    for t in [range.start, range.end].into_iter().flatten() {
        assert!((0.0..=DURATION).contains(&t));
    }

    let registry = h.session.registry();
    if let Some(editing) = registry.editing() {
        assert!(registry.is_selected(editing));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interaction_keeps_invariants(steps in prop::collection::vec(step(), 1..40)) {
        let mut h = Harness::new(Vec::new());
        for step in &steps {
            run(&mut h, step);
            assert_consistent(&h);
        }
        // Let every delayed commit land.
        h.advance(1_000);
        assert_consistent(&h);
    }

    #[test]
    fn cancel_after_any_sequence_restores_seeds(
        steps in prop::collection::vec(step(), 1..30),
    ) {
        let seeds = vec![
            clipmark_timeline::Clip::new("A", 5.0, 10.0).unwrap(),
            clipmark_timeline::Clip::new("B", 40.0, 55.0).unwrap(),
        ];
        let mut h = Harness::new(seeds.clone());
        // Without waits nothing settles, so every change is still uncommitted.
        for step in steps.iter().filter(|s| !matches!(s, Step::CommitEdit | Step::Wait(_))) {
            run(&mut h, step);
        }
        h.session.cancel();
        h.advance(1_000);

        prop_assert_eq!(h.session.clips(), seeds.as_slice());
        prop_assert!(!h.session.registry().has_pending_creation());
        prop_assert!(h.session.registry().editing().is_none());
    }

    #[test]
    fn double_select_is_identity(n in 0usize..2) {
        let seeds = vec![
            clipmark_timeline::Clip::new("A", 5.0, 10.0).unwrap(),
            clipmark_timeline::Clip::new("B", 40.0, 55.0).unwrap(),
        ];
        let mut h = Harness::new(seeds);
        let before = h.session.snapshot();
        let id = h.session.clips()[n].id.clone();
        h.session.select_clip(&id);
        h.session.select_clip(&id);
        prop_assert_eq!(h.session.snapshot(), before);
    }
}
