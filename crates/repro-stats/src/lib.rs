pub mod cleanliness;
pub mod crosstab;
pub mod datasets;
pub mod join;
pub mod metrics;

pub use cleanliness::{clean_by_doi, is_clean};
pub use crosstab::{CrossTab, PAPER_CATEGORIES};
pub use datasets::{TIMEOUT_LIMIT_SECS, build_control_datasets, build_treatment_datasets};
pub use join::{DatasetPair, ScriptPair, pair_datasets, pair_scripts};
pub use metrics::{
    CleanDatasets, ConditionScripts, ControlDatasets, DatasetLevel, FailureTally, InventoryCounts,
    MessageScans, PairedStats, ScriptLevel, SourcedStats, StudyData, StudyMetrics, SubjectStats,
    SuccessRates, SuccessToError, Tally, TimeoutOverview, YearStats, extract_package_name,
    is_missing_object_message, percent, ratio, subject_breakdown, year_breakdown,
};
