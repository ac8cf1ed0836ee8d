use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use repro_fetch::{FetchOptions, fetch_all, write_metadata_json};
use repro_ingest::{
    collect_timeout_lists, read_all_run_reports, read_control_scripts, read_doi_inventory,
    read_doi_metadata, read_dataset_times, read_search_total_count, read_timeout_list,
    script_records,
};
use repro_model::{Condition, ErrorCategory, RULES};
use repro_report::{render_figures, write_markdown_outputs};
use repro_stats::{
    InventoryCounts, StudyData, StudyMetrics, build_control_datasets, build_treatment_datasets,
};

use crate::cli::{AnalyzeArgs, FetchArgs};
use crate::summary::apply_table_style;
use crate::types::{AnalysisResult, ConditionSummary};

/// Fixed input names under the data folder.
const RESULTS_DB: &str = "results.db";
const DOI_METADATA: &str = "doi_metadata.json";
const DATASET_TIMES: &str = "dataset_times.csv";
const CONTROL_TIMEOUTS: &str = "no_raas_timeouts.txt";
const RUN_DB_DIR: &str = "raas_dbs";
const TREATMENT_TIMEOUT_DIR: &str = "raas_timeouts";
const TIMEOUT_LIST_SUFFIX: &str = "timeout-dois.txt";
const DOI_INVENTORY: &str = "r_dois.txt";
const LOCKFILE_SEARCH: &str = "lockfiles_on_dataverse_2022_06_16.json";

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisResult> {
    let data_dir = &args.data_dir;
    let inserts_dir = args
        .inserts_dir
        .clone()
        .unwrap_or_else(|| data_dir.join("md_inserts"));
    let figures_dir = args
        .figures_dir
        .clone()
        .unwrap_or_else(|| data_dir.join("figures"));

    let mut errors = Vec::new();

    // =====================================================================
    // Stage 1: Ingest - read every raw input for both conditions
    // =====================================================================
    let ingest_span = info_span!("ingest", data_dir = %data_dir.display());
    let ingest_start = Instant::now();
    let (data, inventory) = ingest_span.in_scope(|| -> Result<_> {
        let control_scripts =
            read_control_scripts(&data_dir.join(RESULTS_DB)).context("read control results")?;
        let metadata =
            read_doi_metadata(&data_dir.join(DOI_METADATA)).context("read dataset metadata")?;
        let times =
            read_dataset_times(&data_dir.join(DATASET_TIMES)).context("read dataset times")?;
        let control_timeouts = read_timeout_list(&data_dir.join(CONTROL_TIMEOUTS))
            .context("read control timeout list")?;
        let reports =
            read_all_run_reports(&data_dir.join(RUN_DB_DIR)).context("read run reports")?;
        let treatment_timeouts =
            collect_timeout_lists(&data_dir.join(TREATMENT_TIMEOUT_DIR), TIMEOUT_LIST_SUFFIX)
                .context("collect treatment timeout lists")?;
        let inventory = InventoryCounts {
            datasets: read_doi_inventory(&data_dir.join(DOI_INVENTORY))
                .context("read dataset inventory")?
                .len(),
            lockfiles: read_search_total_count(&data_dir.join(LOCKFILE_SEARCH))
                .context("read lockfile search count")?,
        };

        let treatment_scripts = script_records(&reports);
        let control_datasets =
            build_control_datasets(&metadata, &times, &control_timeouts, &control_scripts);
        let treatment_datasets = build_treatment_datasets(&reports, &treatment_timeouts);
        Ok((
            StudyData {
                control_scripts,
                control_datasets,
                treatment_scripts,
                treatment_datasets,
                treatment_timeouts,
            },
            inventory,
        ))
    })?;
    info!(
        control_scripts = data.control_scripts.len(),
        treatment_scripts = data.treatment_scripts.len(),
        control_datasets = data.control_datasets.len(),
        treatment_datasets = data.treatment_datasets.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =====================================================================
    // Stage 2: Aggregate - reconcile the conditions, derive the metrics
    // =====================================================================
    let aggregate_span = info_span!("aggregate");
    let aggregate_start = Instant::now();
    let metrics = aggregate_span.in_scope(|| StudyMetrics::compute(&data));
    info!(
        paired_scripts = metrics.timeouts.paired_scripts,
        duration_ms = aggregate_start.elapsed().as_millis(),
        "aggregation complete"
    );

    // =====================================================================
    // Stage 3: Render - markdown tables and inserts
    // =====================================================================
    let render_span = info_span!("render", inserts_dir = %inserts_dir.display());
    let render_start = Instant::now();
    let written = render_span
        .in_scope(|| write_markdown_outputs(&inserts_dir, &metrics, &inventory))
        .context("write markdown outputs")?;
    info!(
        count = written.len(),
        duration_ms = render_start.elapsed().as_millis(),
        "render complete"
    );

    // =====================================================================
    // Stage 4: Figures - optional plot rendering
    // =====================================================================
    let mut figures_written = Vec::new();
    if args.skip_figures {
        info!("figure rendering skipped");
    } else {
        let figures_span = info_span!("figures", figures_dir = %figures_dir.display());
        match figures_span.in_scope(|| render_figures(&figures_dir, &metrics)) {
            Ok(paths) => figures_written = paths,
            Err(error) => {
                warn!(%error, "figure rendering failed");
                errors.push(format!("figures: {error:#}"));
            }
        }
    }

    let conditions = vec![
        ConditionSummary {
            condition: Condition::Control,
            scripts: data.control_scripts.len(),
            successful_scripts: metrics.control.successes,
            datasets: data.control_datasets.len(),
            clean_datasets: metrics.control_datasets.clean,
        },
        ConditionSummary {
            condition: Condition::Treatment,
            scripts: data.treatment_scripts.len(),
            successful_scripts: data
                .treatment_scripts
                .iter()
                .filter(|record| record.category == ErrorCategory::Success)
                .count(),
            datasets: data.treatment_datasets.len(),
            clean_datasets: data
                .treatment_datasets
                .iter()
                .filter(|record| record.clean == Some(true))
                .count(),
        },
    ];

    let has_errors = !errors.is_empty();
    Ok(AnalysisResult {
        data_dir: data_dir.clone(),
        inserts_dir,
        figures_dir,
        conditions,
        paired_scripts: metrics.timeouts.paired_scripts,
        inserts_written: written.len(),
        figures_written,
        errors,
        has_errors,
    })
}

pub fn run_fetch(args: &FetchArgs) -> Result<()> {
    let dois = read_doi_inventory(&args.doi_list).context("read identifier list")?;
    let parent = args
        .doi_list
        .parent()
        .map(std::path::Path::to_path_buf)
        .unwrap_or_default();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| parent.join("doi_metadata.json"));
    let problem_file = args
        .problem_file
        .clone()
        .unwrap_or_else(|| parent.join("metadata_problem.txt"));
    let options = FetchOptions {
        api_url: args.api_url.clone(),
        ..FetchOptions::default()
    };

    let fetch_span = info_span!("fetch", count = dois.len());
    let fetch_start = Instant::now();
    let results = fetch_span
        .in_scope(|| fetch_all(&dois, &options, &problem_file))
        .context("fetch metadata")?;
    write_metadata_json(&output, &results).context("write metadata json")?;
    info!(
        output = %output.display(),
        count = results.len(),
        duration_ms = fetch_start.elapsed().as_millis(),
        "metadata fetch complete"
    );
    Ok(())
}

pub fn run_categories() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Priority", "Rule", "Category"]);
    apply_table_style(&mut table);
    for (index, (rule, category)) in RULES.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            rule.to_string(),
            category.to_string(),
        ]);
    }
    table.add_row(vec![
        "-".to_string(),
        "otherwise".to_string(),
        ErrorCategory::Other.to_string(),
    ]);
    println!("{table}");
    Ok(())
}
