//! End-to-end pipeline test over a synthetic data folder.

use std::path::Path;

use rusqlite::Connection;
use tempfile::TempDir;

use repro_cli::cli::AnalyzeArgs;
use repro_cli::commands::run_analyze;
use repro_model::Condition;

const DOI_A_SLUG: &str = "doi-10.7910-DVN-AAA111";
const DOI_B_SLUG: &str = "doi-10.7910-DVN-BBB222";
const DOI_A: &str = "doi:10.7910/DVN/AAA111";
const DOI_B: &str = "doi:10.7910/DVN/BBB222";

fn write_results_db(data_dir: &Path) {
    let conn = Connection::open(data_dir.join("results.db")).unwrap();
    conn.execute_batch("CREATE TABLE results (filename TEXT, error TEXT);")
        .unwrap();
    let rows = [
        (
            format!("../data/datasets/{DOI_A_SLUG}/a.R"),
            "success".to_string(),
        ),
        (
            format!("../data/datasets/{DOI_A_SLUG}/b.R"),
            "Error in setwd(\"data\"): cannot change working directory".to_string(),
        ),
        (
            format!("../data/datasets/{DOI_B_SLUG}/c.R"),
            "Error in library(tidyverse): there is no package called tidyverse".to_string(),
        ),
    ];
    for (filename, error) in rows {
        conn.execute(
            "INSERT INTO results (filename, error) VALUES (?1, ?2)",
            rusqlite::params![filename, error],
        )
        .unwrap();
    }
}

fn write_run_db(data_dir: &Path) {
    let dir = data_dir.join("raas_dbs");
    std::fs::create_dir_all(&dir).unwrap();
    let conn = Connection::open(dir.join("vm1-app.db")).unwrap();
    conn.execute_batch("CREATE TABLE dataset (report TEXT);")
        .unwrap();
    // The treatment run fixed the working-directory error in dataset A.
    let report = serde_json::json!({
        "Individual Scripts": {
            "a.R": {"Errors": [], "Timed Out": false},
            "b.R": {"Errors": [], "Timed Out": false},
        },
        "Additional Information": {
            "Container Name": "raas--doi-10.7910-dvn-aaa111",
            "Build Time": 50.0,
        },
    })
    .to_string();
    conn.execute(
        "INSERT INTO dataset (report) VALUES (?1)",
        rusqlite::params![report],
    )
    .unwrap();
}

fn write_data_dir(data_dir: &Path) {
    write_results_db(data_dir);
    write_run_db(data_dir);

    std::fs::write(
        data_dir.join("doi_metadata.json"),
        format!(
            r#"{{"{DOI_A}": [["Law"], "2019-01-01"], "{DOI_B}": [["Physics"], "2020-05-05"]}}"#
        ),
    )
    .unwrap();

    std::fs::write(
        data_dir.join("dataset_times.csv"),
        format!(
            "doi,time\n\
             data/datasets/{DOI_A_SLUG},100\n\
             data/datasets/{DOI_B_SLUG},200\n"
        ),
    )
    .unwrap();

    std::fs::write(data_dir.join("no_raas_timeouts.txt"), "").unwrap();

    let timeout_dir = data_dir.join("raas_timeouts");
    std::fs::create_dir_all(&timeout_dir).unwrap();
    // Dataset B never completed under the treatment.
    std::fs::write(
        timeout_dir.join("vm1-timeout-dois.txt"),
        format!("{DOI_B}\n"),
    )
    .unwrap();

    std::fs::write(data_dir.join("r_dois.txt"), format!("{DOI_A}\n{DOI_B}\n")).unwrap();

    std::fs::write(
        data_dir.join("lockfiles_on_dataverse_2022_06_16.json"),
        r#"{"status": "OK", "data": {"total_count": 7}}"#,
    )
    .unwrap();
}

fn read_insert(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn analyze_produces_tables_and_inserts() {
    let tmp = TempDir::new().unwrap();
    write_data_dir(tmp.path());

    let args = AnalyzeArgs {
        data_dir: tmp.path().to_path_buf(),
        inserts_dir: None,
        figures_dir: None,
        skip_figures: true,
    };
    let result = run_analyze(&args).unwrap();
    assert!(!result.has_errors, "errors: {:?}", result.errors);

    let control = result
        .conditions
        .iter()
        .find(|summary| summary.condition == Condition::Control)
        .unwrap();
    assert_eq!(control.scripts, 3);
    assert_eq!(control.successful_scripts, 1);
    assert_eq!(control.datasets, 2);
    assert_eq!(control.clean_datasets, 0);

    let treatment = result
        .conditions
        .iter()
        .find(|summary| summary.condition == Condition::Treatment)
        .unwrap();
    assert_eq!(treatment.scripts, 2);
    assert_eq!(treatment.successful_scripts, 2);
    assert_eq!(treatment.clean_datasets, 1);

    assert_eq!(result.paired_scripts, 2);
    assert!(result.figures_written.is_empty());

    let inserts = tmp.path().join("md_inserts");
    assert_eq!(read_insert(&inserts, "runnable_scripts.md"), "3");
    assert_eq!(read_insert(&inserts, "runnable_datasets.md"), "2");
    assert_eq!(read_insert(&inserts, "num_of_datasets.md"), "2");
    assert_eq!(read_insert(&inserts, "lockfiles.md"), "7");
    // The one working-directory error was fixed by the treatment.
    assert_eq!(read_insert(&inserts, "perc_wd_fixed.md"), "100.0%");
    // One paired control success became two treatment successes.
    assert_eq!(read_insert(&inserts, "success_increase.md"), "2x");
    assert_eq!(read_insert(&inserts, "clean_raas_datasets.md"), "1");

    let chen_table = read_insert(&inserts, "chen_total_comparison.md");
    assert!(!chen_table.contains("OUR_"));

    let change_table = read_insert(&inserts, "error_change_table.md");
    assert!(change_table.contains("working directory"));
    assert!(change_table.contains("**Pre-RaaS**"));

    let timeout_table = read_insert(&inserts, "timed_out_comparisons.md");
    // Two datasets total, one completed under both conditions.
    assert!(timeout_table.contains("out of the total number of datasets: 2."));
}

#[test]
fn analyze_fails_without_inputs() {
    let tmp = TempDir::new().unwrap();
    let args = AnalyzeArgs {
        data_dir: tmp.path().to_path_buf(),
        inserts_dir: None,
        figures_dir: None,
        skip_figures: true,
    };
    assert!(run_analyze(&args).is_err());
}
