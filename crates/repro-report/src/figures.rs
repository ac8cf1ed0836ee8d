//! Static figures.
//!
//! Three PNG plots: script/error counts per publication year, the
//! failing-script fraction per subject, and a control-vs-treatment
//! runtime scatter over datasets clean in both conditions. The
//! bitmap text path needs a system font stack, so the figures carry
//! geometry only; titles and axis descriptions live in the paper's
//! captions.

#![allow(clippy::wildcard_imports)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use tracing::info;

use repro_stats::{StudyMetrics, SubjectStats, YearStats};

pub const YEAR_FIGURE: &str = "error_count_by_year.png";
pub const SUBJECT_FIGURE: &str = "error_rate_by_subject.png";
pub const RUNTIME_FIGURE: &str = "runtime-comparison.png";

const FIGURE_SIZE: (u32, u32) = (1920, 1440);

/// Publication years shown in the year figure.
const PLOT_YEARS: [&str; 7] = ["2015", "2016", "2017", "2018", "2019", "2020", "2021"];

/// Subject order of the subject figure (worst rate last).
const SUBJECT_FIGURE_ORDER: [&str; 12] = [
    "Mathematical Sciences",
    "Medicine, Health and Life Sciences",
    "Law",
    "Earth and Environmental Sciences",
    "Business and Management",
    "Agricultural Sciences",
    "Social Sciences",
    "Computer and Information Science",
    "Other",
    "Engineering",
    "Arts and Humanities",
    "Physics",
];

/// Render all three figures into `dir`, returning the written paths.
pub fn render_figures(dir: &Path, metrics: &StudyMetrics) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create figure directory {}", dir.display()))?;
    let year_path = dir.join(YEAR_FIGURE);
    render_year_figure(&year_path, &metrics.year_table)?;
    let subject_path = dir.join(SUBJECT_FIGURE);
    render_subject_figure(&subject_path, &metrics.subject_rates)?;
    let runtime_path = dir.join(RUNTIME_FIGURE);
    render_runtime_figure(&runtime_path, &metrics.clean_datasets.both_clean_runtimes)?;
    info!(dir = %dir.display(), count = 3, "rendered figures");
    Ok(vec![year_path, subject_path, runtime_path])
}

/// Grouped bars per year: total scripts (left, blue) and scripts with
/// errors (right, red).
pub fn render_year_figure(path: &Path, years: &[YearStats]) -> Result<()> {
    let shown: Vec<&YearStats> = PLOT_YEARS
        .iter()
        .filter_map(|year| years.iter().find(|stats| stats.year == *year))
        .collect();

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("draw {}", path.display()))?;
    if shown.is_empty() {
        root.present()
            .with_context(|| format!("write {}", path.display()))?;
        return Ok(());
    }

    let max_total = shown.iter().map(|stats| stats.total).max().unwrap_or(1) as i32;
    let y_top = max_total + max_total / 10 + 1;
    let mut chart = ChartBuilder::on(&root)
        .margin(48)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d((0..shown.len()).into_segmented(), 0..y_top)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    chart.draw_series(shown.iter().enumerate().map(|(idx, stats)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(idx), 0),
                (SegmentValue::CenterOf(idx), stats.total as i32),
            ],
            BLUE.mix(0.7).filled(),
        )
    }))?;
    chart.draw_series(shown.iter().enumerate().map(|(idx, stats)| {
        Rectangle::new(
            [
                (SegmentValue::CenterOf(idx), 0),
                (SegmentValue::Exact(idx + 1), stats.errors as i32),
            ],
            RED.mix(0.7).filled(),
        )
    }))?;

    root.present()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Horizontal bars of the failing-script fraction per subject.
pub fn render_subject_figure(path: &Path, subjects: &[SubjectStats]) -> Result<()> {
    let shown: Vec<&SubjectStats> = SUBJECT_FIGURE_ORDER
        .iter()
        .filter_map(|subject| subjects.iter().find(|stats| stats.subject == *subject))
        .collect();

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("draw {}", path.display()))?;
    if shown.is_empty() {
        root.present()
            .with_context(|| format!("write {}", path.display()))?;
        return Ok(());
    }

    let mut chart = ChartBuilder::on(&root)
        .margin(48)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(0.0..1.0f64, (0..shown.len()).into_segmented())?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    chart.draw_series(shown.iter().enumerate().map(|(idx, stats)| {
        let fraction = stats.error_percent() / 100.0;
        Rectangle::new(
            [
                (0.0, SegmentValue::Exact(idx)),
                (fraction, SegmentValue::Exact(idx + 1)),
            ],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Control-vs-treatment runtime scatter with a unit diagonal.
pub fn render_runtime_figure(path: &Path, runtimes: &[(f64, f64)]) -> Result<()> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("draw {}", path.display()))?;

    let max_axis = runtimes
        .iter()
        .flat_map(|(control, treatment)| [*control, *treatment])
        .fold(1.0f64, f64::max)
        * 1.05;
    let mut chart = ChartBuilder::on(&root)
        .margin(48)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(0.0..max_axis, 0.0..max_axis)?;
    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    chart.draw_series(
        runtimes
            .iter()
            .map(|(control, treatment)| {
                Cross::new((*control, *treatment), 8, BLACK.stroke_width(2))
            }),
    )?;
    chart.draw_series(LineSeries::new(
        [(0.0, 0.0), (max_axis, max_axis)],
        BLACK.mix(0.5),
    ))?;

    root.present()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
