//! The paper's fixed-layout markdown tables.
//!
//! Each table is a template with named placeholder tokens; the
//! rendering functions substitute the computed study metrics. The
//! surrounding prose and the reference columns (earlier studies) are
//! part of the templates.

use repro_model::ErrorCategory;
use repro_stats::{
    DatasetLevel, FailureTally, ScriptLevel, SubjectStats, SuccessRates, TimeoutOverview,
};

use crate::template::{format_percent, render};

/// Reference values from Chen's study: successes over total scripts,
/// plus the number of errors the treatment there fixed.
const CHEN_SUCCESSES: usize = 408;
const CHEN_TOTAL_SCRIPTS: usize = 2839;
const CHEN_TREATMENT_FIXED: usize = 62;

/// Reference values from the large-scale Trisovic et al. study
/// ("best of both" run).
const TRIS_BEST_SUCCESSES: usize = 1581;
const TRIS_BEST_TIMEOUTS: usize = 5790;
const TRIS_BEST_TOTAL: usize = 8609;

/// Subject rows of the published subject-breakdown table, in order.
pub const SUBJECT_TABLE_ORDER: [&str; 12] = [
    "Social Sciences",
    "Computer and Information Science",
    "Medicine, Health and Life Sciences",
    "Physics",
    "Engineering",
    "Other",
    "Business and Management",
    "Mathematical Sciences",
    "Arts and Humanities",
    "Agricultural Sciences",
    "Law",
    "Earth and Environmental Sciences",
];

const CHEN_TOTAL_TEMPLATE: &str = r"
------------------------------------------------
              Chen's              Ours
  --------- -------- --------- ------- ---------
  Result       Count   Percent   Count   Percent

  Success        408     14.4%   OUR_SUCCESS_COUNT     OUR_SUCCESS_PERCENT%

  Error         2431     85.6%   OUR_ERROR_COUNT    OUR_ERROR_PERCENT%

  Total         2839             OUR_TOTAL
------------------------------------------------
";

/// Success/error totals next to Chen's study.
pub fn chen_total_comparison(control: &repro_stats::ConditionScripts) -> String {
    render(
        CHEN_TOTAL_TEMPLATE,
        &[
            ("OUR_SUCCESS_COUNT", control.successes.to_string()),
            (
                "OUR_SUCCESS_PERCENT",
                format_percent(repro_stats::percent(
                    control.successes,
                    control.total_excl_timeouts,
                )),
            ),
            ("OUR_ERROR_COUNT", control.errors.to_string()),
            (
                "OUR_ERROR_PERCENT",
                format_percent(repro_stats::percent(
                    control.errors,
                    control.total_excl_timeouts,
                )),
            ),
            ("OUR_TOTAL", control.total_excl_timeouts.to_string()),
        ],
    )
}

const CHEN_CATEGORY_TEMPLATE: &str = r"
---------------------------------------------------------------
                        Chen (2018)              2022
  ------------------- ------------- --------- ------- ---------
  Error Type                  Count   Percent   Count   Percent

  Library                       363     14.9%    LIBRARY_COUNT    LIBRARY_PERCENT%

  Working directory             696     28.6%    WD_COUNT    WD_PERCENT%

  Missing file                  802     33.0%    FILE_COUNT    FILE_PERCENT%

  Function                       NA        NA     FUNC_COUNT    FUNC_PERCENT%

  Other                         569     23.4%    OTHER_COUNT    OTHER_PERCENT%

  Total                        2431             ERROR_TOTAL

---------------------------------------------------------------
";

/// Error-category counts next to Chen's study.
pub fn chen_category_comparison(control: &repro_stats::ConditionScripts) -> String {
    let mut substitutions: Vec<(&str, String)> = Vec::new();
    for (count_token, percent_token, cat) in [
        ("LIBRARY_COUNT", "LIBRARY_PERCENT", ErrorCategory::Library),
        ("WD_COUNT", "WD_PERCENT", ErrorCategory::WorkingDirectory),
        ("FILE_COUNT", "FILE_PERCENT", ErrorCategory::MissingFile),
        ("FUNC_COUNT", "FUNC_PERCENT", ErrorCategory::Function),
        ("OTHER_COUNT", "OTHER_PERCENT", ErrorCategory::Other),
    ] {
        substitutions.push((count_token, control.category(cat).to_string()));
        substitutions.push((
            percent_token,
            format_percent(control.category_percent_of_errors(cat)),
        ));
    }
    substitutions.push(("ERROR_TOTAL", control.errors.to_string()));
    render(CHEN_CATEGORY_TEMPLATE, &substitutions)
}

const SUBJECT_TEMPLATE: &str = r"
-------------------------------------------------------------------------------------
  Subject                                Total Files   Total Error Files   Error Rate
  ------------------------------------ ------------- ------------------- ------------
  Social Sciences                              Social Sciences_TOTAL               Social Sciences_ERROR       Social Sciences_PERC%

  Computer and Information Science               Computer and Information Science_TOTAL                 Computer and Information Science_ERROR       Computer and Information Science_PERC%

  Medicine, Health and Life Sciences             Medicine, Health and Life Sciences_TOTAL                 Medicine, Health and Life Sciences_ERROR       Medicine, Health and Life Sciences_PERC%

  Physics                                         Physics_TOTAL                  Physics_ERROR       Physics_PERC%

  Engineering                                    Engineering_TOTAL                  Engineering_ERROR       Engineering_PERC%

  Other                                          Other_TOTAL                 Other_ERROR       Other_PERC%

  Business and Management                        Business and Management_TOTAL                 Business and Management_ERROR       Business and Management_PERC%

  Mathematical Sciences                          Mathematical Sciences_TOTAL                 Mathematical Sciences_ERROR       Mathematical Sciences_PERC%

  Arts and Humanities                            Arts and Humanities_TOTAL                 Arts and Humanities_ERROR       Arts and Humanities_PERC%

  Agricultural Sciences                          Agricultural Sciences_TOTAL                 Agricultural Sciences_ERROR       Agricultural Sciences_PERC%

  Law                                            Law_TOTAL                 Law_ERROR       Law_PERC%

  Earth and Environmental Sciences               Earth and Environmental Sciences_TOTAL                 Earth and Environmental Sciences_ERROR       Earth and Environmental Sciences_PERC%

-------------------------------------------------------------------------------------
";

/// Per-subject totals and error rates. Subjects without scripts render
/// as zero rows.
pub fn subject_breakdown_table(subjects: &[SubjectStats]) -> String {
    let mut substitutions: Vec<(String, String)> = Vec::new();
    for subject in SUBJECT_TABLE_ORDER {
        let stats = subjects.iter().find(|stats| stats.subject == subject);
        let (total, errors, percent) = match stats {
            Some(stats) => (stats.total, stats.errors, stats.error_percent()),
            None => (0, 0, 0.0),
        };
        substitutions.push((format!("{subject}_TOTAL"), total.to_string()));
        substitutions.push((format!("{subject}_ERROR"), errors.to_string()));
        substitutions.push((format!("{subject}_PERC"), format_percent(percent)));
    }
    render(SUBJECT_TEMPLATE, &substitutions)
}

const TIMED_OUT_TEMPLATE: &str = r"
-----------------------------------------------------------------------------
    Datasets                                                          Scripts
  ---------- --------------- -------------- ---------------- ----------------
       Total      Control NC   Treatment NC   Both Completed   Both Completed

        TOTAL_DS               DS_TO_WO_RAAS_TOTAL            DS_TO_W_RAAS_TOTAL             DS_BOTH_DONE_TOTAL            SC_BOTH_DONE_TOTAL

        100%            DS_TO_WO_RAAS_PERC%          DS_TO_W_RAAS_PERC%            DS_BOTH_DONE_PERC%          SC_BOTH_DONE_PERC%\*

-----------------------------------------------------------------------------

Table: This table displays the number of datasets that did not complete (NC) during
the evaluations, and the number that completed with and without RaaS.
\*Note that for the number of scripts that completed in both, the
percentage is out of the total number of scripts: TOTAL_SC. The rest of
the percentages are out of the total number of datasets: TOTAL_DS. {#tbl:timeout-results}
";

/// Completion/timeout accounting across the conditions.
pub fn timeout_comparison_table(timeouts: &TimeoutOverview) -> String {
    let dataset_percent =
        |count: usize| format_percent(repro_stats::percent(count, timeouts.total_datasets));
    render(
        TIMED_OUT_TEMPLATE,
        &[
            (
                "DS_TO_WO_RAAS_TOTAL",
                timeouts.control_incomplete.to_string(),
            ),
            (
                "DS_TO_WO_RAAS_PERC",
                dataset_percent(timeouts.control_incomplete),
            ),
            (
                "DS_TO_W_RAAS_TOTAL",
                timeouts.treatment_incomplete.to_string(),
            ),
            (
                "DS_TO_W_RAAS_PERC",
                dataset_percent(timeouts.treatment_incomplete),
            ),
            (
                "DS_BOTH_DONE_TOTAL",
                timeouts.both_completed_datasets.to_string(),
            ),
            (
                "DS_BOTH_DONE_PERC",
                dataset_percent(timeouts.both_completed_datasets),
            ),
            ("SC_BOTH_DONE_TOTAL", timeouts.paired_scripts.to_string()),
            (
                "SC_BOTH_DONE_PERC",
                format_percent(repro_stats::percent(
                    timeouts.paired_scripts,
                    timeouts.total_scripts,
                )),
            ),
            ("TOTAL_DS", timeouts.total_datasets.to_string()),
            ("TOTAL_SC", timeouts.total_scripts.to_string()),
        ],
    )
}

const SUCCESS_RATES_TEMPLATE: &str = r"
----------------------------------------------------------------------------
                              Scripts                   Datasets
  -------------------- -------------- ----------- -------------- -----------
                         Without RaaS   With RaaS   Without RaaS   With RaaS

  Total                          SC_WO_RAAS_TOTAL      SC_W_RAAS_TOTAL           DS_WO_RAAS_TOTAL        DS_W_RAAS_TOTAL

  Successful                     SC_WO_RAAS_GOOD        SC_W_RAAS_GOOD            DS_WO_RAAS_GOOD         DS_W_RAAS_GOOD

  Error                          SC_WO_RAAS_BAD        SC_W_RAAS_BAD           DS_WO_RAAS_BAD        DS_W_RAAS_BAD

  Percent Successful            SC_WO_RAAS_PERC%       SC_W_RAAS_PERC%           DS_WO_RAAS_PERC%       DS_W_RAAS_PERC%

----------------------------------------------------------------------------
";

/// Script- and dataset-level success tallies over the datasets present
/// under both conditions.
pub fn success_rates_table(rates: &SuccessRates) -> String {
    let mut substitutions: Vec<(String, String)> = Vec::new();
    for (prefix, tally) in [
        ("SC_WO_RAAS", rates.scripts_control),
        ("SC_W_RAAS", rates.scripts_treatment),
        ("DS_WO_RAAS", rates.datasets_control),
        ("DS_W_RAAS", rates.datasets_treatment),
    ] {
        substitutions.push((format!("{prefix}_TOTAL"), tally.total.to_string()));
        substitutions.push((format!("{prefix}_GOOD"), tally.good.to_string()));
        substitutions.push((format!("{prefix}_BAD"), tally.bad().to_string()));
        substitutions.push((format!("{prefix}_PERC"), format_percent(tally.percent_good())));
    }
    render(SUCCESS_RATES_TEMPLATE, &substitutions)
}

const TREATMENT_CATEGORIES_TEMPLATE: &str = r"
------------------------------------------------------------
                        containR              RaaS
  ------------------- ---------- --------- ------- ---------
  Error Type               Count   Percent   Count   Percent

  Library                      8      0.3%    LIB_TOTAL    LIB_PERC%

  Working directory           12      0.5%      WD_TOTAL     WD_PERC%

  Missing file              1400     61.8%    MF_TOTAL    MF_PERC%

  Function                    NA        NA     F_TOTAL    F_PERC%

  Other                      847     37.4%    OT_TOTAL    OT_PERC%

  Total Failures            2329              ALL_TOTAL

------------------------------------------------------------
";

/// Treatment-side failure categories next to the containR study.
pub fn treatment_categories_table(failures: &FailureTally) -> String {
    // The bare F_ tokens are substrings of the MF_ ones, so MF must be
    // substituted first.
    let mut substitutions: Vec<(&str, String)> =
        vec![("ALL_TOTAL", failures.total.to_string())];
    for (total_token, percent_token, cat) in [
        ("LIB_TOTAL", "LIB_PERC", ErrorCategory::Library),
        ("WD_TOTAL", "WD_PERC", ErrorCategory::WorkingDirectory),
        ("MF_TOTAL", "MF_PERC", ErrorCategory::MissingFile),
        ("F_TOTAL", "F_PERC", ErrorCategory::Function),
        ("OT_TOTAL", "OT_PERC", ErrorCategory::Other),
    ] {
        substitutions.push((total_token, failures.category(cat).to_string()));
        substitutions.push((percent_token, format_percent(failures.category_percent(cat))));
    }
    render(TREATMENT_CATEGORIES_TEMPLATE, &substitutions)
}

const DATASET_LEVEL_TEMPLATE: &str = r"
---------------------------------------------
                          Control   Treatment
  --------------------- --------- -----------
     Percent Successful      CTRL_SUCCESS       TREAT_SUCCESS

      Percent Timed-out      CTRL_TIMEOUT        TREAT_TIMEOUT

---------------------------------------------

Table: This table displays the percentage of dataset errors and timeouts out of all TOTAL_DS runnable datasets. Our control is running scripts without RaaS, and our treatment is running scripts with RaaS. {#tbl:dataset-level-fraction}
";

/// Dataset-level success/timeout fractions.
pub fn dataset_level_table(level: &DatasetLevel) -> String {
    let fraction = |count: usize| {
        format!(
            "{}%",
            format_percent(repro_stats::percent(count, level.runnable))
        )
    };
    render(
        DATASET_LEVEL_TEMPLATE,
        &[
            ("CTRL_SUCCESS", fraction(level.control_clean)),
            ("TREAT_SUCCESS", fraction(level.treatment_clean)),
            ("CTRL_TIMEOUT", fraction(level.control_timed_out)),
            ("TREAT_TIMEOUT", fraction(level.treatment_timed_out)),
            ("TOTAL_DS", level.runnable.to_string()),
        ],
    )
}

const SCRIPT_LEVEL_TEMPLATE: &str = r"
--------------------------------------------------------------------------------------------------------
                          Control   Treatment   Chen Control   Chen Treatment       Trisovic et al. Best
  --------------------- --------- -----------  ------------- ----------------  -------------------------
     Percent Successful     CTRL_SUCCESS       TREAT_SUCCESS          CHEN_SUCCESS            CHEN_TREAT                      TRIS_BEST

      Percent Timed out      CTRL_TO        TREAT_TO        Unknown          Unknown                      TRIS_TO

--------------------------------------------------------------------------------------------------------

Table: This table displays the percentage of runnable scripts that produced errors with and without RaaS. {#tbl:script-level-fraction}
";

/// Script-level success/timeout fractions next to the prior studies.
pub fn script_level_table(level: &ScriptLevel) -> String {
    let fraction = |count: usize| {
        format!(
            "{}%",
            format_percent(repro_stats::percent(count, level.runnable))
        )
    };
    let reference = |part: usize, whole: usize| {
        format!("{}%", format_percent(repro_stats::percent(part, whole)))
    };
    render(
        SCRIPT_LEVEL_TEMPLATE,
        &[
            ("CTRL_SUCCESS", fraction(level.control_success)),
            ("TREAT_SUCCESS", fraction(level.treatment_success)),
            (
                "CHEN_SUCCESS",
                reference(CHEN_SUCCESSES, CHEN_TOTAL_SCRIPTS),
            ),
            (
                "CHEN_TREAT",
                reference(CHEN_SUCCESSES + CHEN_TREATMENT_FIXED, CHEN_TOTAL_SCRIPTS),
            ),
            ("TRIS_BEST", reference(TRIS_BEST_SUCCESSES, TRIS_BEST_TOTAL)),
            ("CTRL_TO", fraction(level.control_timed_out)),
            ("TREAT_TO", fraction(level.treatment_timed_out)),
            ("TRIS_TO", reference(TRIS_BEST_TIMEOUTS, TRIS_BEST_TOTAL)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use repro_stats::ConditionScripts;
    use std::collections::BTreeMap;

    fn control_stats() -> ConditionScripts {
        let mut categories = BTreeMap::new();
        categories.insert(ErrorCategory::Success, 2usize);
        categories.insert(ErrorCategory::Library, 1usize);
        categories.insert(ErrorCategory::Other, 1usize);
        ConditionScripts {
            total_excl_timeouts: 4,
            successes: 2,
            errors: 2,
            categories,
        }
    }

    #[test]
    fn chen_totals_substituted() {
        let table = chen_total_comparison(&control_stats());
        assert!(table.contains("Success        408     14.4%   2     50.0%"));
        assert!(table.contains("Error         2431     85.6%   2    50.0%"));
        assert!(table.contains("Total         2839             4"));
        assert!(!table.contains("OUR_"));
    }

    #[test]
    fn chen_categories_substituted() {
        let table = chen_category_comparison(&control_stats());
        assert!(table.contains("1    50.0%"));
        assert!(!table.contains("_COUNT"));
        assert!(!table.contains("_PERCENT"));
    }

    #[test]
    fn subject_rows_default_to_zero() {
        let stats = vec![SubjectStats {
            subject: "Law".to_string(),
            total: 4,
            errors: 1,
        }];
        let table = subject_breakdown_table(&stats);
        assert!(table.contains("25.0%"));
        // Subjects with no scripts render zero rows, and no token
        // survives substitution.
        assert!(table.contains("0.0%"));
        assert!(!table.contains("_TOTAL"));
        assert!(!table.contains("_PERC"));
    }

    #[test]
    fn treatment_categories_keep_mf_and_f_distinct() {
        let mut categories = BTreeMap::new();
        categories.insert(ErrorCategory::MissingFile, 5usize);
        categories.insert(ErrorCategory::Function, 2usize);
        let failures = FailureTally {
            total: 7,
            categories,
        };
        let table = treatment_categories_table(&failures);
        assert!(table.contains("Missing file              1400     61.8%    5    71.4%"));
        assert!(table.contains("Function                    NA        NA     2    28.6%"));
        assert!(!table.contains("MF_"));
        assert!(!table.contains("F_TOTAL"));
    }

    #[test]
    fn script_level_reference_values() {
        let level = ScriptLevel {
            runnable: 10,
            control_success: 5,
            treatment_success: 7,
            control_timed_out: 1,
            treatment_timed_out: 0,
        };
        let table = script_level_table(&level);
        assert!(table.contains("14.4%")); // Chen control
        assert!(table.contains("16.6%")); // Chen treatment
        assert!(table.contains("18.4%")); // Trisovic successes
        assert!(table.contains("67.3%")); // Trisovic timeouts
        assert!(table.contains("50.0%"));
        assert!(table.contains("70.0%"));
    }
}
