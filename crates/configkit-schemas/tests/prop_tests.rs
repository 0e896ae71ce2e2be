//! Property-based tests for version ordering and filtering

use configkit_schemas::{
    version_sort_key, SchemaDocument, SchemaInfo, Version, VersionKey, VersionSet, VersionSpecifier,
};
use proptest::prelude::*;
use serde_json::json;
use std::rc::Rc;

/// Strategy for dotted release strings like `3`, `0.12`, `1.4.2`
fn release_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(0u64..30, 1..4).prop_map(|segments| {
        segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    })
}

/// Strategy for a version set of distinct versions plus optional unversioned entry
fn version_set_strategy() -> impl Strategy<Value = VersionSet> {
    (
        proptest::collection::btree_set(release_strategy(), 0..8),
        any::<bool>(),
    )
        .prop_map(|(releases, with_unversioned)| {
            let mut versions: Vec<Option<String>> = Vec::new();
            let mut seen: Vec<Version> = Vec::new();
            for release in releases {
                let parsed = Version::parse(&release).unwrap();
                // `1` and `1.0` are the same version; keep keys distinct
                if !seen.contains(&parsed) {
                    seen.push(parsed);
                    versions.push(Some(release));
                }
            }
            if with_unversioned {
                versions.push(None);
            }
            versions
                .into_iter()
                .map(|version| {
                    let id = format!("urn:prop:{}", version.as_deref().unwrap_or("none"));
                    Rc::new(SchemaDocument::detached(
                        json!({ "$id": id }),
                        SchemaInfo {
                            name: "prop".to_string(),
                            version,
                        },
                    ))
                })
                .collect()
        })
}

fn versions(set: &VersionSet) -> Vec<Option<String>> {
    set.iter()
        .map(|schema| schema.version().map(str::to_string))
        .collect()
}

proptest! {
    #[test]
    fn prop_reverse_sort_is_reverse_sequence(set in version_set_strategy()) {
        let ascending = versions(&set.sorted(&version_sort_key, false));
        let mut descending = versions(&set.sorted(&version_sort_key, true));
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    #[test]
    fn prop_sorting_preserves_membership(set in version_set_strategy()) {
        let sorted = set.sorted(&version_sort_key, false);
        prop_assert_eq!(sorted.len(), set.len());

        let mut before = versions(&set);
        let mut after = versions(&sorted);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_sorted_is_ascending(set in version_set_strategy()) {
        let keys: Vec<VersionKey> = set
            .sorted(&version_sort_key, false)
            .iter()
            .map(|schema| version_sort_key(schema))
            .collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn prop_newest_without_unversioned_is_maximum(set in version_set_strategy()) {
        let newest = set.newest(None, false).and_then(|schema| schema.version().map(str::to_string));
        let maximum = set
            .iter()
            .filter_map(|schema| schema.version())
            .map(|v| Version::parse(v).unwrap())
            .max()
            .map(|v| v.to_string());
        prop_assert_eq!(newest.map(|v| Version::parse(&v).unwrap().to_string()), maximum);
    }

    #[test]
    fn prop_filtered_elements_match(set in version_set_strategy(), bound in release_strategy()) {
        let specifier = VersionSpecifier::parse(&format!(">={}", bound)).unwrap();
        let minimum = Version::parse(&bound).unwrap();
        for schema in set.filtered(&specifier, false).iter() {
            let version = Version::parse(schema.version().unwrap()).unwrap();
            prop_assert!(version >= minimum);
        }
    }
}
