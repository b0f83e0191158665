//! SVG charts
//!
//! Two fixed charts, written as plain SVG strings so reports stay
//! self-contained:
//! - AMB–RMB diagnostic map (scatter, zone threshold lines)
//! - Z_MB risk indicator (one bar per row, coloured by risk band)

use crate::classification::zones::{AMB_LOWER_LIMIT, AMB_UPPER_LIMIT, RMB_LOWER_LIMIT, RMB_UPPER_LIMIT};
use crate::metrics::{RiskBand, NOMINAL_MASS_BALANCE, Z_HIGH_RISK_LIMIT, Z_VARIABILITY_LIMIT};
use crate::pipeline::DiagnosticRow;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

/// Linear data → pixel mapping
#[derive(Debug, Clone, Copy)]
struct Axis {
    min: f64,
    max: f64,
    px_start: f64,
    px_end: f64,
}

impl Axis {
    /// Range covering every value, padded by 10% on each side
    fn covering(values: impl Iterator<Item = f64>, px_start: f64, px_end: f64) -> Self {
        let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if (max - min).abs() < f64::EPSILON {
            min -= 1.0;
            max += 1.0;
        }
        let pad = (max - min) * 0.1;
        Self {
            min: min - pad,
            max: max + pad,
            px_start,
            px_end,
        }
    }

    fn map(&self, value: f64) -> f64 {
        self.px_start + (value - self.min) / (self.max - self.min) * (self.px_end - self.px_start)
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=TICKS).map(move |i| self.min + (self.max - self.min) * i as f64 / TICKS as f64)
    }
}

fn open_svg(svg: &mut String, title: &str) {
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\" font-weight=\"bold\">{}</text>\n",
        WIDTH / 2.0,
        title
    ));
}

fn horizontal_line(svg: &mut String, y: f64, x0: f64, x1: f64, stroke: &str, dash: &str) {
    svg.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-dasharray=\"{}\"/>\n",
        x0, y, x1, y, stroke, dash
    ));
}

fn vertical_line(svg: &mut String, x: f64, y0: f64, y1: f64, stroke: &str, dash: &str) {
    svg.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-dasharray=\"{}\"/>\n",
        x, y0, x, y1, stroke, dash
    ));
}

fn y_axis(svg: &mut String, axis: &Axis, label: &str) {
    let x = MARGIN_LEFT;
    vertical_line(svg, x, MARGIN_TOP, HEIGHT - MARGIN_BOTTOM, "black", "none");
    for tick in axis.ticks() {
        let y = axis.map(tick);
        horizontal_line(svg, y, MARGIN_LEFT, WIDTH - MARGIN_RIGHT, "#dddddd", "4 4");
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{:.1}</text>\n",
            x - 6.0,
            y + 4.0,
            tick
        ));
    }
    svg.push_str(&format!(
        "<text x=\"18\" y=\"{:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 18 {:.1})\">{}</text>\n",
        HEIGHT / 2.0,
        HEIGHT / 2.0,
        label
    ));
}

fn x_label(svg: &mut String, label: &str) {
    horizontal_line(svg, HEIGHT - MARGIN_BOTTOM, MARGIN_LEFT, WIDTH - MARGIN_RIGHT, "black", "none");
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
        (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
        HEIGHT - 15.0,
        label
    ));
}

/// AMB (y) against RMB (x); rows without AMB or RMB are not plotted
pub fn amb_rmb_map(rows: &[DiagnosticRow]) -> String {
    let points: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|r| Some((r.metrics.rmb?, r.metrics.amb?)))
        .collect();

    let x_axis = Axis::covering(
        points.iter().map(|p| p.0).chain([RMB_LOWER_LIMIT, RMB_UPPER_LIMIT]),
        MARGIN_LEFT,
        WIDTH - MARGIN_RIGHT,
    );
    let y_axis_range = Axis::covering(
        points.iter().map(|p| p.1).chain([AMB_LOWER_LIMIT, AMB_UPPER_LIMIT]),
        HEIGHT - MARGIN_BOTTOM,
        MARGIN_TOP,
    );

    let mut svg = String::with_capacity(4096);
    open_svg(&mut svg, "Mass Balance Diagnostic Space");
    y_axis(&mut svg, &y_axis_range, "Absolute Mass Balance (AMB %)");
    x_label(&mut svg, "Relative Mass Balance (RMB)");

    for tick in x_axis.ticks() {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{:.2}</text>\n",
            x_axis.map(tick),
            HEIGHT - MARGIN_BOTTOM + 18.0,
            tick
        ));
    }

    // Threshold lines
    let (x0, x1) = (MARGIN_LEFT, WIDTH - MARGIN_RIGHT);
    let (y0, y1) = (MARGIN_TOP, HEIGHT - MARGIN_BOTTOM);
    horizontal_line(&mut svg, y_axis_range.map(NOMINAL_MASS_BALANCE), x0, x1, "#1f77b4", "6 4");
    horizontal_line(&mut svg, y_axis_range.map(AMB_LOWER_LIMIT), x0, x1, "gray", "2 3");
    horizontal_line(&mut svg, y_axis_range.map(AMB_UPPER_LIMIT), x0, x1, "gray", "2 3");
    vertical_line(&mut svg, x_axis.map(RMB_LOWER_LIMIT), y0, y1, "gray", "2 3");
    vertical_line(&mut svg, x_axis.map(RMB_UPPER_LIMIT), y0, y1, "gray", "2 3");

    for (rmb, amb) in &points {
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"6\" fill=\"#1f77b4\" stroke=\"black\"/>\n",
            x_axis.map(*rmb),
            y_axis_range.map(*amb)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Z_MB per row; rows without Z_MB keep their slot but draw no bar
pub fn z_mb_risk(rows: &[DiagnosticRow]) -> String {
    let y_axis_range = Axis::covering(
        rows.iter()
            .filter_map(|r| r.metrics.z_mb)
            .chain([-Z_HIGH_RISK_LIMIT, Z_HIGH_RISK_LIMIT]),
        HEIGHT - MARGIN_BOTTOM,
        MARGIN_TOP,
    );

    let mut svg = String::with_capacity(4096);
    open_svg(&mut svg, "Uncertainty-Normalized Risk");
    y_axis(&mut svg, &y_axis_range, "Z_MB");
    x_label(&mut svg, "Row");

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let slot = plot_width / rows.len().max(1) as f64;
    let bar_width = slot * 0.7;
    let baseline = y_axis_range.map(0.0);

    for (idx, row) in rows.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (idx as f64 + 0.5);
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            center,
            HEIGHT - MARGIN_BOTTOM + 18.0,
            row.row
        ));

        let Some(z) = row.metrics.z_mb else {
            continue;
        };
        let top = y_axis_range.map(z).min(baseline);
        let height = (y_axis_range.map(z) - baseline).abs();
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"black\"/>\n",
            center - bar_width / 2.0,
            top,
            bar_width,
            height,
            RiskBand::from_z_mb(Some(z)).color()
        ));
    }

    let (x0, x1) = (MARGIN_LEFT, WIDTH - MARGIN_RIGHT);
    for limit in [Z_VARIABILITY_LIMIT, -Z_VARIABILITY_LIMIT] {
        horizontal_line(&mut svg, y_axis_range.map(limit), x0, x1, "#1f77b4", "6 4");
    }
    for limit in [Z_HIGH_RISK_LIMIT, -Z_HIGH_RISK_LIMIT] {
        horizontal_line(&mut svg, y_axis_range.map(limit), x0, x1, "red", "2 3");
    }

    svg.push_str("</svg>\n");
    svg
}
