//! Input document for the external Sankey diagram builder.
//!
//! Node lines carry the per-category totals, flow lines every
//! non-zero category movement, and the trailing block the fixed node
//! colors. Pre- and post-condition nodes are distinguished by a
//! doubled space in the post names.

use repro_model::ErrorCategory;
use repro_stats::CrossTab;

const CATEGORIES: [ErrorCategory; 8] = [
    ErrorCategory::Library,
    ErrorCategory::WorkingDirectory,
    ErrorCategory::MissingFile,
    ErrorCategory::Function,
    ErrorCategory::MissingObject,
    ErrorCategory::Other,
    ErrorCategory::TimedOut,
    ErrorCategory::Success,
];

const COLORS: &str = r"
:Success  #00CC00  <<
:Library  Error #0033cc <<
:Library Error #0033cc <<
:Function  Error #cccc00 <<
:Function Error #cccc00 <<
:Missing  File #cc0033 <<
:Missing File #cc0033 <<
:Other  Error #cc6600 <<
:Other Error #cc6600 <<
:Working  Directory #cc00cc <<
:Working Directory #cc00cc <<
";

/// Node name for a category; `wide` marks post-condition nodes.
fn node_name(category: ErrorCategory, wide: bool) -> String {
    let extra = if wide { " " } else { "" };
    match category {
        ErrorCategory::Library | ErrorCategory::Function | ErrorCategory::Other => {
            format!("{}{extra} Error", title_case(category.as_str()))
        }
        ErrorCategory::WorkingDirectory
        | ErrorCategory::MissingFile
        | ErrorCategory::TimedOut
        | ErrorCategory::MissingObject => {
            let titled = title_case(category.as_str());
            let mut words = titled.split(' ');
            let first = words.next().unwrap_or_default();
            let second = words.next().unwrap_or_default();
            format!("{first} {extra}{second}")
        }
        _ => title_case(category.as_str()),
    }
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the Sankey input from the reconciliation cross-tab.
pub fn sankey_input(crosstab: &CrossTab) -> String {
    let mut intro = Vec::new();
    let mut body = Vec::new();
    for from in CATEGORIES {
        let total = crosstab.row_total(from);
        if total > 0 {
            intro.push(format!("R files [{total}] {}", node_name(from, false)));
        }
        for to in CATEGORIES {
            let count = crosstab.count(from, to);
            if count > 0 && from != ErrorCategory::Success {
                body.push(format!(
                    "{} [{count}] {}",
                    node_name(from, false),
                    node_name(to, true)
                ));
            }
        }
        body.push(String::new());
    }
    intro.push("\n".to_string());
    format!("{}{}{COLORS}", intro.join("\n"), body.join("\n"))
}
