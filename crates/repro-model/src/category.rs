//! Error categorization.
//!
//! Raw R error messages are mapped to a closed category set by an
//! ordered list of predicates evaluated first-match-wins. Order
//! encodes precedence: a message matching several predicates takes the
//! category of the earliest one. Unmatched messages fall into
//! [`ErrorCategory::Other`]; the function is total and pure.

use std::fmt;

/// Raw message recorded for a script that ran to completion.
pub const SUCCESS: &str = "success";

/// Raw message recorded for a script that hit the per-script time limit.
pub const TIMED_OUT: &str = "timed out";

/// Category assigned to every executed script.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ErrorCategory {
    Success,
    TimedOut,
    WorkingDirectory,
    Library,
    MissingFile,
    Function,
    MissingObject,
    Other,
}

impl ErrorCategory {
    /// Display name as used in the published tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Success => "success",
            ErrorCategory::TimedOut => "timed out",
            ErrorCategory::WorkingDirectory => "working directory",
            ErrorCategory::Library => "library",
            ErrorCategory::MissingFile => "missing file",
            ErrorCategory::Function => "function",
            ErrorCategory::MissingObject => "missing object",
            ErrorCategory::Other => "other",
        }
    }

    /// True for categories that represent a failed execution, i.e.
    /// neither a success nor a timeout.
    pub fn is_error(&self) -> bool {
        !matches!(self, ErrorCategory::Success | ErrorCategory::TimedOut)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One predicate in the categorization chain.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// The whole message equals the phrase.
    Equals(&'static str),
    /// The message contains the phrase.
    Contains(&'static str),
    /// The message contains every phrase.
    ContainsAll(&'static [&'static str]),
    /// The message contains the phrase and none of the exclusions.
    ContainsUnless {
        phrase: &'static str,
        unless: &'static [&'static str],
    },
}

impl Rule {
    fn matches(&self, message: &str) -> bool {
        match self {
            Rule::Equals(phrase) => message == *phrase,
            Rule::Contains(phrase) => message.contains(phrase),
            Rule::ContainsAll(phrases) => phrases.iter().all(|phrase| message.contains(phrase)),
            Rule::ContainsUnless { phrase, unless } => {
                message.contains(phrase)
                    && !unless.iter().any(|exclusion| message.contains(exclusion))
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Equals(phrase) => write!(f, "equals {phrase:?}"),
            Rule::Contains(phrase) => write!(f, "contains {phrase:?}"),
            Rule::ContainsAll(phrases) => {
                let mut first = true;
                for phrase in *phrases {
                    if !first {
                        f.write_str(" and ")?;
                    }
                    write!(f, "contains {phrase:?}")?;
                    first = false;
                }
                Ok(())
            }
            Rule::ContainsUnless { phrase, unless } => {
                write!(f, "contains {phrase:?}")?;
                for exclusion in *unless {
                    write!(f, " without {exclusion:?}")?;
                }
                Ok(())
            }
        }
    }
}

/// The categorization chain, in priority order.
///
/// The phrases are the most distinctive fragments of the common R
/// failure modes observed in the corpus. The `does not exist` rule
/// excludes checkpoint-restore chatter and archive API noise that
/// carry the phrase without a missing file being involved.
pub const RULES: &[(Rule, ErrorCategory)] = &[
    (Rule::Equals(SUCCESS), ErrorCategory::Success),
    (Rule::Equals(TIMED_OUT), ErrorCategory::TimedOut),
    (
        Rule::Contains("Error in setwd"),
        ErrorCategory::WorkingDirectory,
    ),
    (Rule::Contains("Error in library"), ErrorCategory::Library),
    (
        Rule::Contains("unable to find required package"),
        ErrorCategory::Library,
    ),
    (Rule::Contains("Error in file"), ErrorCategory::MissingFile),
    (
        Rule::Contains("such file or directory"),
        ErrorCategory::MissingFile,
    ),
    (Rule::Contains("unable to open"), ErrorCategory::MissingFile),
    (
        Rule::Contains("cannot open file"),
        ErrorCategory::MissingFile,
    ),
    (
        Rule::Contains("does not exist in current working directory"),
        ErrorCategory::MissingFile,
    ),
    (
        Rule::ContainsUnless {
            phrase: "does not exist",
            unless: &[".checkpoint", "Unsupported get request"],
        },
        ErrorCategory::MissingFile,
    ),
    (
        Rule::Contains("Error in readChar"),
        ErrorCategory::MissingFile,
    ),
    (
        Rule::Contains("File to copy does not exist"),
        ErrorCategory::MissingFile,
    ),
    (
        Rule::Contains("could not find function"),
        ErrorCategory::Function,
    ),
    (
        Rule::Contains("there is no package called"),
        ErrorCategory::Library,
    ),
    (
        Rule::Contains("cannot open the connection"),
        ErrorCategory::MissingFile,
    ),
    (
        Rule::ContainsAll(&["object", "not found"]),
        ErrorCategory::MissingObject,
    ),
];

/// Map a raw error message to its category.
pub fn categorize(message: &str) -> ErrorCategory {
    for (rule, category) in RULES {
        if rule.matches(message) {
            return *category;
        }
    }
    ErrorCategory::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_map_to_their_categories() {
        assert_eq!(categorize("success"), ErrorCategory::Success);
        assert_eq!(categorize("timed out"), ErrorCategory::TimedOut);
    }

    #[test]
    fn sentinels_require_exact_equality() {
        assert_eq!(categorize("success!"), ErrorCategory::Other);
        assert_eq!(categorize("script timed out"), ErrorCategory::Other);
    }

    #[test]
    fn setwd_beats_lower_priority_phrases() {
        let message = "Error in setwd(\"x\"): cannot change working directory, \
                       No such file or directory";
        assert_eq!(categorize(message), ErrorCategory::WorkingDirectory);
    }

    #[test]
    fn library_beats_function() {
        let message = "Error in library(dplyr): could not find function \"mutate\"";
        assert_eq!(categorize(message), ErrorCategory::Library);
    }

    #[test]
    fn does_not_exist_checkpoint_is_other() {
        let message = "directory .checkpoint/2020-01-01 does not exist";
        assert_eq!(categorize(message), ErrorCategory::Other);
    }

    #[test]
    fn does_not_exist_get_request_is_other() {
        let message = "Unsupported get request. Object does not exist";
        assert_eq!(categorize(message), ErrorCategory::Other);
    }

    #[test]
    fn does_not_exist_plain_is_missing_file() {
        let message = "Error: 'data/input.csv' does not exist";
        assert_eq!(categorize(message), ErrorCategory::MissingFile);
    }

    #[test]
    fn missing_file_beats_missing_object() {
        // Matches both the guarded `does not exist` rule and the
        // object-not-found rule; the earlier rule wins.
        let message = "object 'df' not found: file does not exist";
        assert_eq!(categorize(message), ErrorCategory::MissingFile);
    }

    #[test]
    fn object_not_found_is_missing_object() {
        let message = "Error in eval(expr): object 'results' not found";
        assert_eq!(categorize(message), ErrorCategory::MissingObject);
    }

    #[test]
    fn no_package_called_is_library() {
        let message = "Error in loadNamespace(name): there is no package called \u{2018}rstan\u{2019}";
        assert_eq!(categorize(message), ErrorCategory::Library);
    }

    #[test]
    fn connection_is_missing_file() {
        let message = "Error in file(file, \"rt\"): cannot open the connection";
        // `Error in file` matches first; both resolve to missing file.
        assert_eq!(categorize(message), ErrorCategory::MissingFile);
    }

    #[test]
    fn empty_message_is_other() {
        assert_eq!(categorize(""), ErrorCategory::Other);
    }
}
