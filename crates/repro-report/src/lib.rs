pub mod change_table;
pub mod figures;
pub mod inserts;
pub mod output;
pub mod sankey;
pub mod tables;
pub mod template;

pub use change_table::change_table;
pub use figures::{
    RUNTIME_FIGURE, SUBJECT_FIGURE, YEAR_FIGURE, render_figures, render_runtime_figure,
    render_subject_figure, render_year_figure,
};
pub use inserts::scalar_inserts;
pub use output::write_markdown_outputs;
pub use sankey::sankey_input;
pub use template::{format_percent, format_sig, render, write_insert};
