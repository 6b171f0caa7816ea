//! Property-based tests for archive discovery and copy planning.
//!
//! These tests use proptest to generate random trees and name lists and
//! verify that the invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::defaults::{is_archive_name, is_skipped_dir};
    use crate::phases::{discover, plan_copies};
    use crate::progress::CancellationToken;
    use proptest::prelude::*;
    use std::collections::{BTreeSet, HashSet};
    use std::fs;
    use std::path::PathBuf;

    // ============================================================================
    // plan_copies property tests
    // ============================================================================

    fn file_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("a.jar".to_string()),
            Just("a_2.jar".to_string()),
            Just("a_3.jar".to_string()),
            Just("b.JAR".to_string()),
            Just("B.jar".to_string()),
            Just("A.jar".to_string()),
            Just(".jar".to_string()),
            "[a-c]{1,3}(_[2-3])?\\.jar",
        ]
    }

    proptest! {
        /// Property: planned names are pairwise distinct ignoring case, one
        /// per source
        #[test]
        fn plan_names_are_distinct(names in prop::collection::vec(file_name(), 0..20)) {
            let files: Vec<PathBuf> = names
                .iter()
                .enumerate()
                .map(|(i, n)| PathBuf::from(format!("/src/{}/{}", i, n)))
                .collect();
            let plan = plan_copies(&files);

            prop_assert_eq!(plan.len(), files.len());
            let unique: HashSet<String> = plan.iter().map(|e| e.file_name.to_lowercase()).collect();
            prop_assert_eq!(unique.len(), plan.len());
            for (entry, source) in plan.iter().zip(&files) {
                prop_assert_eq!(&entry.source, source);
            }
        }

        /// Property: K copies of one name become name, name_2 .. name_K
        #[test]
        fn plan_suffixes_are_sequential(stem in "[a-z]{1,8}", k in 1usize..12) {
            let files: Vec<PathBuf> = (0..k)
                .map(|i| PathBuf::from(format!("/src/{}/{}.jar", i, stem)))
                .collect();
            let plan = plan_copies(&files);

            prop_assert_eq!(&plan[0].file_name, &format!("{}.jar", stem));
            for (i, entry) in plan.iter().enumerate().skip(1) {
                prop_assert_eq!(&entry.file_name, &format!("{}_{}.jar", stem, i + 1));
            }
        }

        /// Property: distinct input names are kept as they are
        #[test]
        fn plan_is_identity_for_unique_names(
            names in prop::collection::btree_set("[a-z]{1,6}\\.jar", 0..15)
        ) {
            let files: Vec<PathBuf> = names.iter().map(|n| PathBuf::from("/src").join(n)).collect();
            let plan = plan_copies(&files);
            for (entry, name) in plan.iter().zip(&names) {
                prop_assert_eq!(&entry.file_name, name);
            }
        }

        /// Property: archive detection is a case-insensitive suffix check
        #[test]
        fn archive_name_matches_lowercase_suffix(name in "[a-zA-Z.]{0,8}") {
            prop_assert_eq!(
                is_archive_name(&name),
                name.to_ascii_lowercase().ends_with(".jar")
            );
        }
    }

    // ============================================================================
    // discover property tests
    // ============================================================================

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("src".to_string()),
            Just("lib".to_string()),
            Just("build".to_string()),
            Just("target".to_string()),
            Just("node_modules".to_string()),
            Just(".git".to_string()),
            Just("builds".to_string()),
        ]
    }

    fn leaf() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("x.jar".to_string()),
            Just("Y.JAR".to_string()),
            Just("notes.txt".to_string()),
            Just(".hidden.jar".to_string()),
        ]
    }

    fn rel_path() -> impl Strategy<Value = Vec<String>> {
        (prop::collection::vec(segment(), 0..4), leaf()).prop_map(|(mut dirs, leaf)| {
            dirs.push(leaf);
            dirs
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Property: discover returns exactly the archives not under a
        /// skipped directory
        #[test]
        fn discover_matches_reference_filter(paths in prop::collection::vec(rel_path(), 0..12)) {
            let temp = tempfile::TempDir::new().unwrap();
            let root = std::path::absolute(temp.path()).unwrap();

            let mut files = BTreeSet::new();
            for parts in &paths {
                let target = root.join(parts.join("/"));
                fs::create_dir_all(target.parent().unwrap()).unwrap();
                fs::write(&target, b"x").unwrap();
                files.insert(parts.clone());
            }

            let expected: BTreeSet<String> = files
                .iter()
                .filter(|parts| {
                    let (leaf, dirs) = parts.split_last().unwrap();
                    is_archive_name(leaf) && !dirs.iter().any(|d| is_skipped_dir(d))
                })
                .map(|parts| parts.join("/"))
                .collect();

            let actual: BTreeSet<String> = discover(&root, &CancellationToken::new())
                .files
                .iter()
                .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
                .collect();

            prop_assert_eq!(actual, expected);
        }
    }
}
