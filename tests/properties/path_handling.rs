//! Property tests for remote path parsing and listing lines.

use proptest::prelude::*;

use ftp_deploy::infrastructure::transport::parse_line;
use ftp_deploy::RemoteTarget;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing arbitrary input never panics.
    #[test]
    fn property_remote_target_never_panics(input in ".*") {
        let _ = RemoteTarget::parse(&input);
    }

    /// PROPERTY: A parsed target's name is a single non-empty segment.
    #[test]
    fn property_target_name_is_one_segment(input in "[a-z/.]{0,24}") {
        if let Ok(target) = RemoteTarget::parse(&input) {
            prop_assert!(!target.name().is_empty());
            prop_assert!(!target.name().contains('/'));
            prop_assert!(target.name() != "." && target.name() != "..");
        }
    }

    /// PROPERTY: `parent/name` joined back is the input without trailing slashes.
    #[test]
    fn property_absolute_target_round_trips(
        segments in proptest::collection::vec("[a-z][a-z0-9_-]{0,8}", 1..5),
        trailing in 0usize..3,
    ) {
        let path = format!("/{}{}", segments.join("/"), "/".repeat(trailing));
        let target = RemoteTarget::parse(&path).unwrap();
        let rebuilt = if target.parent() == "/" {
            format!("/{}", target.name())
        } else {
            format!("{}/{}", target.parent(), target.name())
        };
        prop_assert_eq!(rebuilt, format!("/{}", segments.join("/")));
    }

    /// PROPERTY: Listing lines never panic the parser.
    #[test]
    fn property_listing_line_never_panics(line in ".{0,120}") {
        let _ = parse_line(&line);
    }
}
