//! Property-based tests for path handling.
//!
//! Note: The normalize module already has property tests for normalization.
//! This module focuses on classification, combination, the component
//! accessors and short name translation.

use super::classify::{classify, root_length, PathForm};
use super::components::{get_directory_name, get_file_name};
use super::normalize::{combine, get_full_path, remove_trailing_separator};
use super::short_name::{to_long_form, to_short_form};
use crate::native::MemoryFileSystem;
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_ -]{0,10}[a-zA-Z0-9_]".prop_filter("reserved device name", |s| {
        let upper = s.to_ascii_uppercase();
        !matches!(upper.as_str(), "CON" | "PRN" | "AUX" | "NUL")
            && !((upper.starts_with("COM") || upper.starts_with("LPT"))
                && upper.len() == 4
                && upper.as_bytes()[3].is_ascii_digit()
                && upper.as_bytes()[3] != b'0')
    })
}

/// Real names ending in a `~N` tail, with or without an extension.
fn tilde_segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_ ]{0,8}~[0-9]{1,2}(\\.[a-z]{1,4})?"
}

fn relative_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..6).prop_map(|parts| parts.join("\\"))
}

fn drive_path_strategy() -> impl Strategy<Value = String> {
    ("[A-Z]", relative_strategy()).prop_map(|(drive, rest)| format!(r"{drive}:\{rest}"))
}

fn unc_path_strategy() -> impl Strategy<Value = String> {
    (segment_strategy(), segment_strategy(), relative_strategy())
        .prop_map(|(server, share, rest)| format!(r"\\{server}\{share}\{rest}"))
}

fn rooted_strategy() -> impl Strategy<Value = String> {
    prop_oneof![drive_path_strategy(), unc_path_strategy()]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 10000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // Every non-empty string classifies, and the root never overruns it
    #[test]
    fn classifier_is_total(path in "\\PC{1,40}") {
        prop_assert!(classify(&path).is_ok());
        prop_assert!(root_length(&path) <= path.len());
    }

    // Separator style never changes the classification
    #[test]
    fn classifier_ignores_separator_style(path in rooted_strategy()) {
        let forward = path.replace('\\', "/");
        prop_assert_eq!(classify(&path).unwrap(), classify(&forward).unwrap());
    }

    // combine(a, "") == a and combine("", b) == b
    #[test]
    fn combine_identity(path in prop_oneof![rooted_strategy(), relative_strategy()]) {
        prop_assert_eq!(combine(&path, "").unwrap(), path.clone());
        prop_assert_eq!(combine("", &path).unwrap(), path);
    }

    // A rooted second operand replaces the first
    #[test]
    fn combine_rooted_second_wins(first in relative_strategy(), second in rooted_strategy()) {
        prop_assert_eq!(combine(&first, &second).unwrap(), second);
    }

    // Combining a rooted path with a relative one stays in the same form
    #[test]
    fn combine_preserves_form(base in rooted_strategy(), rest in relative_strategy()) {
        let combined = combine(&base, &rest).unwrap();
        prop_assert_eq!(classify(&combined).unwrap(), classify(&base).unwrap());
        prop_assert!(combined.ends_with(&rest));
    }

    // Parent plus file name reconstructs a canonical path
    #[test]
    fn directory_and_file_name_split(path in rooted_strategy()) {
        let full = get_full_path(&path, None).unwrap();
        let parent = get_directory_name(full.as_str()).unwrap().unwrap();
        let name = get_file_name(full.as_str());
        prop_assert_eq!(combine(parent, name).unwrap(), full.as_str());
    }

    // Canonical paths carry no trailing separator beyond the root
    #[test]
    fn canonical_paths_have_no_trailing_separator(path in rooted_strategy()) {
        let full = get_full_path(&format!("{path}\\"), None).unwrap();
        prop_assert_eq!(remove_trailing_separator(full.as_str()), full.as_str());
        prop_assert!(matches!(full.form(), PathForm::DriveRooted | PathForm::UncRooted));
    }

    // Short form translates back to the long path, including names that
    // carry a ~N tail of their own
    #[test]
    fn short_long_round_trip(
        parts in prop::collection::vec(
            prop_oneof![segment_strategy(), tilde_segment_strategy()],
            1..5,
        )
    ) {
        let path = format!(r"C:\{}", parts.join("\\"));
        let mut fs = MemoryFileSystem::new();
        fs.add_file(&path, 1).unwrap();

        let short = to_short_form(&fs, &path).unwrap();
        prop_assert_eq!(to_long_form(&fs, &short).unwrap(), path);
        prop_assert_eq!(fs.open_searches(), 0);
    }
}
