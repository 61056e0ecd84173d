//! Property tests for marker merging and plan selection.

use std::collections::BTreeMap;

use proptest::prelude::*;

use refit::domain::entities::{EntryPoint, ProcessedMarker};
use refit::domain::services::Planner;
use refit::domain::value_objects::FormatProperty;

const VERSION: &str = "0.4.1";

/// Arbitrary subset of the recognized properties, canonical order
fn property_subset() -> impl Strategy<Value = Vec<FormatProperty>> {
    proptest::collection::btree_set(0..FormatProperty::ALL.len(), 0..=FormatProperty::ALL.len())
        .prop_map(|indices| indices.into_iter().map(|i| FormatProperty::ALL[i]).collect())
}

fn entry_point_with_all_formats(marker: ProcessedMarker) -> EntryPoint {
    let mut ep = EntryPoint::new("lib", "/nm/lib");
    for property in FormatProperty::ALL {
        ep.set_format(property, format!("{}/index.js", property.as_str()));
    }
    ep.set_marker(marker);
    ep
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: properties merged at the current version drop out of
    /// the pending set; everything else stays, in canonical order.
    #[test]
    fn property_merged_properties_never_replan(committed in property_subset()) {
        let marker = ProcessedMarker::new().merged(&committed, VERSION);
        let ep = entry_point_with_all_formats(marker);

        let pending = Planner::pending_properties(&ep, &[], VERSION);

        let expected: Vec<FormatProperty> = FormatProperty::ALL
            .into_iter()
            .filter(|p| !committed.contains(p))
            .collect();
        prop_assert_eq!(pending, expected);
    }

    /// PROPERTY: a marker recorded at a different version leaves every
    /// declared property pending again.
    #[test]
    fn property_version_change_makes_everything_stale(committed in property_subset()) {
        let marker = ProcessedMarker::new().merged(&committed, "0.3.0");
        let ep = entry_point_with_all_formats(marker);

        let pending = Planner::pending_properties(&ep, &[], VERSION);

        prop_assert_eq!(pending.len(), FormatProperty::ALL.len());
    }

    /// PROPERTY: merging is idempotent and never loses entries written
    /// for other properties.
    #[test]
    fn property_merge_is_idempotent_and_lossless(
        first in property_subset(),
        second in property_subset(),
    ) {
        let base = ProcessedMarker::new().merged(&first, "0.3.0");

        let once = base.merged(&second, VERSION);
        let twice = base.merged(&second, VERSION).merged(&second, VERSION);
        prop_assert_eq!(&once, &twice);

        // Entries outside `second` keep their old version
        let entries: BTreeMap<String, String> = once.into_entries();
        for property in &first {
            let expected = if second.contains(property) { VERSION } else { "0.3.0" };
            prop_assert_eq!(
                entries.get(property.as_str()).map(String::as_str),
                Some(expected)
            );
        }
    }

    /// PROPERTY: requested-property filtering is an intersection; it
    /// never invents work for undeclared or unrequested properties.
    #[test]
    fn property_requested_filter_is_an_intersection(requested in property_subset()) {
        let ep = entry_point_with_all_formats(ProcessedMarker::new());

        let pending = Planner::pending_properties(&ep, &requested, VERSION);

        if requested.is_empty() {
            prop_assert_eq!(pending.len(), FormatProperty::ALL.len());
        } else {
            prop_assert_eq!(pending, requested);
        }
    }
}
