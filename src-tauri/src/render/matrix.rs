use crate::models::scale::{label_for, MAX_SCORE, MIN_SCORE};
use crate::models::scorecard::Scorecard;
use crate::models::view::{
    CategoryBlock, CellStyle, DashboardView, LegendEntry, MatrixRow, ScoreCell, SummaryEntry,
};
use crate::render::escape_html;
use crate::render::palette::{cell_style, ColorScheme};

const NULL_LABEL: &str = "Not scored";

/// Builds the read-only dashboard from the current totals and cells.
pub fn build_dashboard(scorecard: &Scorecard, scheme: ColorScheme) -> DashboardView {
    let competitor_count = scorecard.competitors.len();

    let categories = scorecard
        .categories
        .iter()
        .enumerate()
        .map(|(category_idx, category)| CategoryBlock {
            name: category.name.clone(),
            rows: category
                .metrics
                .iter()
                .enumerate()
                .map(|(metric_idx, metric)| MatrixRow {
                    category_idx,
                    metric_idx,
                    metric: metric.name.clone(),
                    description: metric.description.clone(),
                    cells: (0..competitor_count)
                        .map(|idx| {
                            let value = metric.scores.get(idx).copied().flatten();
                            ScoreCell {
                                value,
                                label: value.map(label_for).unwrap_or(NULL_LABEL).to_string(),
                                style: cell_style(value, scheme),
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    DashboardView {
        competitors: scorecard
            .competitors
            .iter()
            .map(|c| c.name.clone())
            .collect(),
        legend: legend(scheme),
        summary: scorecard
            .competitors
            .iter()
            .map(|c| SummaryEntry {
                name: c.name.clone(),
                score: c.score,
            })
            .collect(),
        categories,
    }
}

/// Highest level first, then the unscored swatch.
pub fn legend(scheme: ColorScheme) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = (MIN_SCORE..=MAX_SCORE)
        .rev()
        .map(|value| LegendEntry {
            value: Some(value),
            label: label_for(value).to_string(),
            style: cell_style(Some(value), scheme),
        })
        .collect();
    entries.push(LegendEntry {
        value: None,
        label: NULL_LABEL.to_string(),
        style: cell_style(None, scheme),
    });
    entries
}

pub fn render_dashboard_html(view: &DashboardView) -> String {
    let mut html = String::new();
    html.push_str(&render_legend(&view.legend));
    html.push_str(&render_summary(&view.summary));
    html.push_str(&render_matrix(view));
    html
}

fn render_cell(value: Option<u8>, style: &CellStyle, title: &str) -> String {
    let text = value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string());
    format!(
        "<span class=\"{}\" style=\"background:{};color:{}\" title=\"{}\">{}</span>",
        style.class,
        style.background,
        style.foreground,
        escape_html(title),
        text
    )
}

fn render_legend(legend: &[LegendEntry]) -> String {
    let mut html = String::from("<div class=\"legend\">");
    for entry in legend {
        let suffix = entry
            .value
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();
        html.push_str(&format!(
            "<div class=\"legend-item\">{}<span>{}{}</span></div>",
            render_cell(entry.value, &entry.style, &entry.label),
            escape_html(&entry.label),
            suffix
        ));
    }
    html.push_str("</div>");
    html
}

fn render_summary(summary: &[SummaryEntry]) -> String {
    let mut html = String::from("<h2>Competitor Scores</h2><div class=\"summary\">");
    for entry in summary {
        html.push_str(&format!(
            "<div class=\"summary-card\"><div class=\"summary-name\">{}</div><div class=\"summary-score\">{}</div></div>",
            escape_html(&entry.name),
            entry.score
        ));
    }
    html.push_str("</div>");
    html
}

fn render_matrix(view: &DashboardView) -> String {
    let columns = view.competitors.len() + 1;
    let mut html = String::from("<h2>Detailed Matrix View</h2><table class=\"matrix\"><thead><tr><th>Metric</th>");
    for name in &view.competitors {
        html.push_str(&format!("<th>{}</th>", escape_html(name)));
    }
    html.push_str("</tr></thead><tbody>");

    for block in &view.categories {
        html.push_str(&format!(
            "<tr class=\"category-header\"><td colspan=\"{columns}\">{}</td></tr>",
            escape_html(&block.name)
        ));
        for row in &block.rows {
            html.push_str(&format!(
                "<tr><td class=\"metric\"><strong>{}</strong><small>{}</small></td>",
                escape_html(&row.metric),
                escape_html(&row.description)
            ));
            for cell in &row.cells {
                html.push_str(&format!(
                    "<td>{}</td>",
                    render_cell(cell.value, &cell.style, &cell.label)
                ));
            }
            html.push_str("</tr>");
        }
    }

    html.push_str("</tbody></table>");
    html
}
