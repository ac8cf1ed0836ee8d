use std::path::PathBuf;

use repro_model::Condition;

#[derive(Debug)]
pub struct AnalysisResult {
    pub data_dir: PathBuf,
    pub inserts_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub conditions: Vec<ConditionSummary>,
    /// Scripts executed under both conditions.
    pub paired_scripts: usize,
    pub inserts_written: usize,
    pub figures_written: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct ConditionSummary {
    pub condition: Condition,
    pub scripts: usize,
    pub successful_scripts: usize,
    pub datasets: usize,
    pub clean_datasets: usize,
}
