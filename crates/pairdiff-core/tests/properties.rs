use pairdiff_core::{
    compare, context_window, paginate, project, DiffEngine, EditScript, Origin, PipelineOptions,
    TaggedLine,
};
use proptest::prelude::*;
use std::num::NonZeroUsize;

fn origin() -> impl Strategy<Value = Origin> {
    prop_oneof![Just(Origin::Kept), Just(Origin::Removed), Just(Origin::Added)]
}

fn script() -> impl Strategy<Value = EditScript> {
    prop::collection::vec(("[a-z ]{0,6}", origin()), 0..80).prop_map(|lines| {
        EditScript::from_lines(
            lines
                .into_iter()
                .map(|(content, origin)| TaggedLine::new(content, origin))
                .collect(),
        )
    })
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec("[abc]{0,2}", 0..30).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn stats_cover_every_line(old in text(), new in text()) {
        let script = DiffEngine::new().diff_strings(&old, &new);
        let stats = script.stats();
        prop_assert_eq!(stats.kept + stats.removed + stats.added, script.len());
        prop_assert_eq!(stats.kept + stats.removed, old.lines().count());
        prop_assert_eq!(stats.kept + stats.added, new.lines().count());
    }

    #[test]
    fn kept_and_removed_lines_replay_old_text(old in text(), new in text()) {
        let script = DiffEngine::new().diff_strings(&old, &new);
        let replay_old: Vec<&str> = script
            .lines()
            .iter()
            .filter(|l| l.origin != Origin::Added)
            .map(|l| l.content.as_str())
            .collect();
        let replay_new: Vec<&str> = script
            .lines()
            .iter()
            .filter(|l| l.origin != Origin::Removed)
            .map(|l| l.content.as_str())
            .collect();
        prop_assert_eq!(replay_old, old.lines().collect::<Vec<_>>());
        prop_assert_eq!(replay_new, new.lines().collect::<Vec<_>>());
    }

    #[test]
    fn window_contains_changes_and_nothing_stray(script in script(), context in 0usize..5) {
        let retained = context_window(&script, context);
        let changed: Vec<usize> = script.changed_indices().collect();

        for idx in &changed {
            prop_assert!(retained.contains(idx));
        }
        for idx in &retained {
            prop_assert!(changed.iter().any(|c| c.abs_diff(*idx) <= context));
        }
        prop_assert!(retained.windows(2).all(|w| w[0] < w[1]));
        if changed.is_empty() {
            prop_assert!(retained.is_empty());
        }
    }

    #[test]
    fn projection_places_content_by_origin(script in script(), context in 0usize..5) {
        let retained = context_window(&script, context);
        let pairs = project(&script, &retained);
        prop_assert_eq!(pairs.len(), retained.len());

        for (pair, idx) in pairs.iter().zip(&retained) {
            let line = script.get(*idx).unwrap();
            prop_assert_eq!(pair.origin, line.origin);
            match line.origin {
                Origin::Removed => {
                    prop_assert_eq!(&pair.old, &line.content);
                    prop_assert!(pair.new.is_empty());
                }
                Origin::Added => {
                    prop_assert!(pair.old.is_empty());
                    prop_assert_eq!(&pair.new, &line.content);
                }
                Origin::Kept => {
                    prop_assert_eq!(&pair.old, &line.content);
                    prop_assert_eq!(&pair.new, &line.content);
                }
            }
        }
    }

    #[test]
    fn pages_partition_rows(script in script(), max_rows in 1usize..12) {
        let all: Vec<usize> = (0..script.len()).collect();
        let rows = project(&script, &all);
        let pages = paginate(rows.clone(), NonZeroUsize::new(max_rows).unwrap());

        prop_assert_eq!(pages.len(), rows.len().div_ceil(max_rows));
        prop_assert!(pages.iter().all(|p| !p.rows.is_empty() && p.rows.len() <= max_rows));
        let flattened: Vec<_> = pages.into_iter().flat_map(|p| p.rows).collect();
        prop_assert_eq!(flattened, rows);
    }

    #[test]
    fn pipeline_is_idempotent(old in text(), new in text(), context in 0usize..4) {
        let options = PipelineOptions { context, ..PipelineOptions::default() };
        prop_assert_eq!(
            compare("f.xml", &old, &new, &options),
            compare("f.xml", &old, &new, &options)
        );
    }
}
