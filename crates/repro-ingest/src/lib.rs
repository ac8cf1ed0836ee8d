pub mod error;
pub mod inventory;
pub mod metadata;
pub mod reports;
pub mod results_db;
pub mod timeouts;
pub mod timings;

pub use error::{IngestError, Result};
pub use inventory::{read_doi_inventory, read_search_total_count};
pub use metadata::{DatasetMetadata, read_doi_metadata};
pub use reports::{
    ReportScript, RunReport, collect_run_databases, read_all_run_reports, read_run_reports,
    script_records,
};
pub use results_db::read_control_scripts;
pub use timeouts::{collect_timeout_lists, read_timeout_list};
pub use timings::read_dataset_times;
