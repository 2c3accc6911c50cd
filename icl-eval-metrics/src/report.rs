use icl_eval_core::{Result, TabularRecord};
use serde::{Deserialize, Serialize};

pub const LATEX_EMPTY_PLACEHOLDER: &str = "No data to generate LaTeX.";
pub const MARKDOWN_EMPTY_PLACEHOLDER: &str = "No data to report.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Latex,
    Markdown,
    Json,
}

/// Renders records as a LaTeX `tabular`: one centered column per field, the
/// header row first, and a rule after every row.
pub fn render_latex<T: TabularRecord>(rows: &[T]) -> String {
    if rows.is_empty() {
        return LATEX_EMPTY_PLACEHOLDER.to_string();
    }

    let columns = T::columns();
    let mut latex = format!(
        "\\begin{{tabular}}{{|{}|}}\n\\hline\n",
        vec!["c"; columns.len()].join(" | ")
    );
    latex.push_str(&format!("{} \\\\\n\\hline\n", columns.join(" & ")));

    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| escape_latex(c)).collect();
        latex.push_str(&format!("{} \\\\\n\\hline\n", cells.join(" & ")));
    }

    latex.push_str("\\end{tabular}");
    latex
}

fn escape_latex(cell: &str) -> String {
    let mut escaped = String::with_capacity(cell.len());
    for c in cell.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders records as a Markdown pipe table.
pub fn render_markdown<T: TabularRecord>(rows: &[T]) -> String {
    if rows.is_empty() {
        return MARKDOWN_EMPTY_PLACEHOLDER.to_string();
    }

    let columns = T::columns();
    let mut md = format!("| {} |\n", columns.join(" | "));
    md.push_str(&format!("|{}|\n", vec!["---"; columns.len()].join("|")));

    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| c.replace('|', "\\|")).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

pub fn render<T: TabularRecord + Serialize>(format: ReportFormat, rows: &[T]) -> Result<String> {
    match format {
        ReportFormat::Latex => Ok(render_latex(rows)),
        ReportFormat::Markdown => Ok(render_markdown(rows)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icl_eval_core::{MetricResult, Task};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latex_empty_placeholder() {
        let rows: Vec<MetricResult> = Vec::new();
        assert_eq!(render_latex(&rows), LATEX_EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_latex_single_row() {
        let rows = vec![MetricResult::new("ICL-llama3", "F1", 100.0)];
        assert_eq!(
            render_latex(&rows),
            "\\begin{tabular}{|c | c | c|}\n\
             \\hline\n\
             Method & Metric & Score \\\\\n\
             \\hline\n\
             ICL-llama3 & F1 & 100.00 \\\\\n\
             \\hline\n\
             \\end{tabular}"
        );
    }

    #[test]
    fn test_latex_escapes_special_characters() {
        let rows = vec![MetricResult::new("ICL_model & co", "F1", 1.0)];
        let latex = render_latex(&rows);
        assert!(latex.contains("ICL\\_model \\& co & F1"));
    }

    #[test]
    fn test_latex_task_tagged_rows_get_four_columns() {
        let rows = vec![MetricResult::new("Fine-Tuned BERT", "BLEU", 40.0).with_task(Task::Translation)];
        let latex = render_latex(&rows);
        assert!(latex.starts_with("\\begin{tabular}{|c | c | c | c|}"));
        assert!(latex.contains("Method & Metric & Score & Task \\\\"));
    }

    #[test]
    fn test_markdown() {
        let rows = vec![MetricResult::new("ICL-llama3", "F1", 50.0)];
        assert_eq!(
            render_markdown(&rows),
            "| Method | Metric | Score |\n|---|---|---|\n| ICL-llama3 | F1 | 50.00 |\n"
        );
        assert_eq!(render_markdown::<MetricResult>(&[]), MARKDOWN_EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_render_json() {
        let rows = vec![MetricResult::new("ICL-llama3", "F1", 50.0)];
        let json = render(ReportFormat::Json, &rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["Metric"], "F1");
    }
}
