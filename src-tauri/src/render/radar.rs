use crate::analysis::totals::category_average_of;
use crate::models::scale::MAX_SCORE;
use crate::models::scorecard::Scorecard;
use crate::models::view::{RadarChart, RadarSeries};
use crate::render::escape_html;
use crate::render::palette::series_color;
use std::f64::consts::PI;

const SIZE: f64 = 560.0;
const CENTER: f64 = SIZE / 2.0;
const RADIUS: f64 = 200.0;
const LEGEND_WIDTH: f64 = 220.0;
const LABEL_GAP: f64 = 18.0;

/// One axis per category, one series per competitor, values are category averages.
pub fn build_radar(scorecard: &Scorecard) -> RadarChart {
    RadarChart {
        axes: scorecard.categories.iter().map(|c| c.name.clone()).collect(),
        range_max: MAX_SCORE as f64,
        series: scorecard
            .competitors
            .iter()
            .enumerate()
            .map(|(idx, competitor)| RadarSeries {
                competitor: competitor.name.clone(),
                values: scorecard
                    .categories
                    .iter()
                    .map(|category| category_average_of(category, idx))
                    .collect(),
                color: series_color(idx).to_string(),
            })
            .collect(),
    }
}

fn axis_angle(axis: usize, axis_count: usize) -> f64 {
    -PI / 2.0 + 2.0 * PI * axis as f64 / axis_count as f64
}

fn point(axis: usize, axis_count: usize, value: f64, range_max: f64) -> (f64, f64) {
    let ratio = if range_max > 0.0 {
        (value / range_max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let angle = axis_angle(axis, axis_count);
    (
        CENTER + RADIUS * ratio * angle.cos(),
        CENTER + RADIUS * ratio * angle.sin(),
    )
}

fn polygon_points(values: &[f64], range_max: f64) -> String {
    values
        .iter()
        .enumerate()
        .map(|(axis, value)| {
            let (x, y) = point(axis, values.len(), *value, range_max);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_radar_svg(chart: &RadarChart) -> String {
    let width = SIZE + LEGEND_WIDTH;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"radar\" viewBox=\"0 0 {width} {SIZE}\" width=\"{width}\" height=\"{SIZE}\">"
    );
    svg.push_str("<text x=\"10\" y=\"24\" class=\"radar-title\">Category Performance by Competitor</text>");

    let axis_count = chart.axes.len();
    if axis_count == 0 {
        svg.push_str(&format!(
            "<text x=\"{CENTER}\" y=\"{CENTER}\" text-anchor=\"middle\">No categories to chart</text></svg>"
        ));
        return svg;
    }

    // Rings at every whole score.
    let rings = chart.range_max.floor() as u32;
    for ring in 1..=rings {
        let level = vec![ring as f64; axis_count];
        svg.push_str(&format!(
            "<polygon points=\"{}\" fill=\"none\" stroke=\"#d1d5db\" stroke-width=\"1\"/>",
            polygon_points(&level, chart.range_max)
        ));
        let (x, y) = point(0, axis_count, ring as f64, chart.range_max);
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" class=\"radar-tick\">{ring}</text>",
            x + 4.0,
            y + 4.0
        ));
    }

    for (axis, name) in chart.axes.iter().enumerate() {
        let (x, y) = point(axis, axis_count, chart.range_max, chart.range_max);
        svg.push_str(&format!(
            "<line x1=\"{CENTER}\" y1=\"{CENTER}\" x2=\"{x:.1}\" y2=\"{y:.1}\" stroke=\"#9ca3af\" stroke-width=\"1\"/>"
        ));
        let angle = axis_angle(axis, axis_count);
        let lx = CENTER + (RADIUS + LABEL_GAP) * angle.cos();
        let ly = CENTER + (RADIUS + LABEL_GAP) * angle.sin();
        let anchor = if (lx - CENTER).abs() < 1.0 {
            "middle"
        } else if lx > CENTER {
            "start"
        } else {
            "end"
        };
        svg.push_str(&format!(
            "<text x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"{anchor}\" class=\"radar-axis\">{}</text>",
            escape_html(name)
        ));
    }

    for series in &chart.series {
        svg.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{color}\" fill-opacity=\"0.15\" stroke=\"{color}\" stroke-width=\"2\"><title>{}</title></polygon>",
            polygon_points(&series.values, chart.range_max),
            escape_html(&series.competitor),
            color = series.color
        ));
    }

    for (idx, series) in chart.series.iter().enumerate() {
        let y = 60.0 + idx as f64 * 24.0;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"14\" height=\"14\" fill=\"{}\"/><text x=\"{:.1}\" y=\"{:.1}\" class=\"radar-legend\">{}</text>",
            SIZE,
            y - 11.0,
            series.color,
            SIZE + 20.0,
            y,
            escape_html(&series.competitor)
        ));
    }

    svg.push_str("</svg>");
    svg
}
