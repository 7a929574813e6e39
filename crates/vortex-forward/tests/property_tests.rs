//! Property-based tests for unit naming

use proptest::prelude::*;
use vortex_forward::{ServiceId, sanitize};

proptest! {
    #[test]
    fn sanitize_is_idempotent(name in ".{0,40}") {
        let once = sanitize(&name);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_yields_unit_safe_fragment(name in ".{0,40}") {
        let fragment = sanitize(&name);
        prop_assert!(!fragment.is_empty());
        prop_assert!(fragment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        prop_assert!(!fragment.starts_with('-') && !fragment.ends_with('-'));
        prop_assert!(!fragment.contains("--"));
    }

    #[test]
    fn canonical_never_equals_legacy(name in ".{0,20}", port in 1u16..=u16::MAX) {
        let canonical = ServiceId::canonical(&name, port);
        for other in [port, port.wrapping_add(1).max(1)] {
            prop_assert_ne!(&canonical, &ServiceId::legacy(other));
        }
    }

    #[test]
    fn canonical_splits_back(name in "[A-Za-z0-9 _.-]{0,20}", port in 1u16..=u16::MAX) {
        let id = ServiceId::canonical(&name, port);
        let expected = sanitize(&name);
        prop_assert_eq!(id.split_canonical(), Some((expected.as_str(), port)));
    }

    #[test]
    fn distinct_pairs_get_distinct_ids(
        a in "[a-z0-9_]{1,12}",
        b in "[a-z0-9_]{1,12}",
        pa in 1u16..=u16::MAX,
        pb in 1u16..=u16::MAX,
    ) {
        prop_assume!((a.as_str(), pa) != (b.as_str(), pb));
        prop_assert_ne!(ServiceId::canonical(&a, pa), ServiceId::canonical(&b, pb));
    }
}
