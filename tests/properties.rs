//! Property tests for filtering and resolution

use plot_viewer::app::{
    FilterPipeline, FilterSelection, ManifestField, ManifestRecord, ManifestTable, ResourceBase,
    ResourceResolver,
};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

const DATES: [&str; 3] = ["250923", "250924", "250925"];
const STATUS1: [&str; 3] = ["A", "B", "C"];
const STATUS2: [&str; 2] = ["X", "Y"];
const SHUTTLES: [&str; 3] = ["1", "2", "10"];

fn record() -> impl Strategy<Value = ManifestRecord> {
    (
        select(DATES.to_vec()),
        select(STATUS1.to_vec()),
        select(STATUS2.to_vec()),
        select(SHUTTLES.to_vec()),
        0..50u32,
    )
        .prop_map(|(date, s1, s2, shuttle, n)| {
            ManifestRecord::new(0, date, s1, s2, shuttle, format!("p{}.html", n))
        })
}

fn table() -> impl Strategy<Value = ManifestTable> {
    prop::collection::vec(record(), 0..40).prop_map(ManifestTable::from_records)
}

fn selection() -> impl Strategy<Value = FilterSelection> {
    (
        select(DATES.to_vec()),
        subsequence(STATUS1.to_vec(), 0..=3),
        subsequence(STATUS2.to_vec(), 0..=2),
        subsequence(SHUTTLES.to_vec(), 0..=3),
    )
        .prop_map(|(date, s1, s2, shuttle)| {
            FilterSelection::new(date)
                .with(ManifestField::Status1, s1)
                .with(ManifestField::Status2, s2)
                .with(ManifestField::Shuttle, shuttle)
        })
}

fn filename() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ -]{1,8}(\\.[a-z]{1,4})?(/[A-Za-z0-9_-]{1,6})?"
}

proptest! {
    #[test]
    fn prop_filter_result_is_subset_of_table(table in table(), selection in selection()) {
        let result = FilterPipeline::apply(&table, &selection);

        let ids = result.row_ids();
        prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        for record in &result {
            prop_assert_eq!(&table.rows()[record.row], record);
            prop_assert_eq!(&record.date, &selection.date);
        }
    }

    #[test]
    fn prop_filter_is_idempotent(table in table(), selection in selection()) {
        let once = FilterPipeline::apply(&table, &selection);
        let twice = FilterPipeline::apply(&once, &selection);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_narrowing_never_grows_result(
        table in table(),
        selection in selection(),
        field in select(ManifestField::CATEGORICAL.to_vec()),
        mask in prop::collection::vec(any::<bool>(), 3),
    ) {
        let wide = FilterPipeline::apply(&table, &selection);

        let current: Vec<String> = selection.values(field).into_iter().flatten().cloned().collect();
        let kept: Vec<String> = if current.is_empty() {
            // Unrestricted narrows to any single offered value
            let offered = FilterPipeline::options(&table, &selection.date);
            offered.values(field).unwrap_or(&[]).iter().take(1).cloned().collect()
        } else {
            current
                .iter()
                .zip(mask.iter())
                .filter(|(_, keep)| **keep)
                .map(|(value, _)| value.clone())
                .collect()
        };
        prop_assume!(!kept.is_empty());

        let narrow = FilterPipeline::apply(&table, &selection.clone().with(field, kept));
        prop_assert!(narrow.len() <= wide.len());
    }

    #[test]
    fn prop_options_come_from_selected_date(table in table(), date in select(DATES.to_vec())) {
        let options = FilterPipeline::options(&table, date);
        for value in &options.status1 {
            prop_assert!(table.iter().any(|r| r.date == date && &r.status1 == value));
        }
        for value in &options.shuttle {
            prop_assert!(table.iter().any(|r| r.date == date && &r.shuttle == value));
        }
    }

    #[test]
    fn prop_resolve_is_injective(a in filename(), b in filename()) {
        prop_assume!(a != b);
        let resolver = ResourceResolver::new(ResourceBase::parse("https://host/repo").unwrap(), "plot_outputs");

        let ra = resolver.resolve(&ManifestRecord::new(0, "250925", "A", "X", "1", a.clone()));
        let rb = resolver.resolve(&ManifestRecord::new(1, "250925", "A", "X", "1", b.clone()));
        if let (Ok(ra), Ok(rb)) = (ra, rb) {
            prop_assert_ne!(ra.url, rb.url);
        }
    }

    #[test]
    fn prop_urls_have_single_separators(
        name in "[A-Za-z0-9_-]{1,10}\\.html",
        leading in 0..3usize,
        trailing in 0..3usize,
    ) {
        let base = format!("https://host/{}repo{}", "/".repeat(leading), "/".repeat(trailing));
        let resolver = ResourceResolver::new(ResourceBase::parse(&base).unwrap(), "plot_outputs");

        let resource = resolver
            .resolve(&ManifestRecord::new(0, "250925", "A", "X", "1", name.clone()))
            .unwrap();
        prop_assert_eq!(resource.url.path(), format!("/repo/plot_outputs/{}", name));
    }
}
