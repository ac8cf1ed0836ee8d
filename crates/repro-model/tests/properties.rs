//! Property tests for categorization and identity construction.

use proptest::prelude::*;

use repro_model::{Doi, ErrorCategory, ScriptId, categorize};

proptest! {
    /// The categorizer is total: any string maps to some category
    /// without panicking.
    #[test]
    fn categorize_is_total(message in ".*") {
        let _ = categorize(&message);
    }

    /// Same input, same output.
    #[test]
    fn categorize_is_deterministic(message in ".*") {
        prop_assert_eq!(categorize(&message), categorize(&message));
    }

    /// Only the exact sentinel maps to success.
    #[test]
    fn success_only_from_sentinel(message in ".+") {
        prop_assume!(message != "success");
        prop_assert_ne!(categorize(&message), ErrorCategory::Success);
    }

    /// Re-parsing a canonical identifier is the identity.
    #[test]
    fn doi_parse_is_idempotent(tail in "[A-Z0-9]{1,12}") {
        let doi = Doi::parse(format!("doi:10.7910/DVN/{tail}")).unwrap();
        let reparsed = Doi::parse(doi.as_str()).unwrap();
        prop_assert_eq!(doi, reparsed);
    }

    /// Script identity does not depend on the case of the filename.
    #[test]
    fn script_id_case_insensitive(name in "[a-zA-Z][a-zA-Z0-9_]{0,16}") {
        let doi = Doi::parse("doi:10.7910/DVN/ABC123").unwrap();
        let lower = ScriptId::new(&doi, &format!("{}.r", name.to_lowercase()));
        let upper = ScriptId::new(&doi, &format!("{}.R", name.to_uppercase()));
        prop_assert_eq!(lower, upper);
    }
}
