use crate::chart_data::ChartData;
use crate::color::ColorAssigner;
use crate::options::common::{columns, Styling};
use crate::options::RenderSettings;
use crate::stats::format_value;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

// Font sizes
// NOTE: Large on purpose; previews are usually viewed scaled down.
const TITLE_FONT_SIZE: u32 = 36;
const TICK_LABEL_FONT_SIZE: u32 = 18;
const LEGEND_FONT_SIZE: u32 = 18;
const DATA_LABEL_FONT_SIZE: u32 = 14;

const CHART_SIZE: (u32, u32) = (1000, 600);
const DARK_BACKGROUND: RGBColor = RGBColor(17, 24, 39);
const FALLBACK_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Parse `#RRGGBB`; anything else maps to gray.
fn hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return FALLBACK_COLOR;
    }

    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => FALLBACK_COLOR,
    }
}

/// Y range covering every value and zero, with headroom for labels.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max - min <= 0.0 {
        return (0.0, 1.0);
    }
    let pad = (max - min) * 0.15;
    (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
}

/// Draw the bar encoding of `data` to an SVG file
///
/// Bars are grouped per x category and colored from `colors`, so a preview
/// matches the renderer options built from the same session.
pub fn render_chart_svg(
    data: &ChartData,
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
    path: &Path,
) -> Result<()> {
    let styling = Styling::for_theme(settings.is_dark);
    let text_color = hex_color(styling.text_color);
    let background = if settings.is_dark {
        DARK_BACKGROUND
    } else {
        WHITE
    };

    let (x_labels, columns) = columns(data, settings);
    let num_x = x_labels.len().max(1);
    let num_columns = columns.len().max(1);
    let (y_min, y_max) = value_range(columns.iter().flat_map(|c| c.values.iter().copied()));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&background)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            &data.title,
            ("sans-serif", TITLE_FONT_SIZE).into_font().color(&text_color),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..(num_x as f64 - 0.5), y_min..y_max)
        .with_context(|| format!("Failed to lay out chart {}", data.title))?;

    let unit = data.stat_unit.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(num_x)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if (x - idx as f64).abs() < 0.3 {
                x_labels.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y| format_value(*y, &unit))
        .axis_style(hex_color(styling.axis_line_color))
        .light_line_style(hex_color(styling.split_line_color).mix(0.2))
        .label_style(
            ("sans-serif", TICK_LABEL_FONT_SIZE)
                .into_font()
                .color(&text_color),
        )
        .draw()?;

    let group_width = 0.8;
    let bar_width = group_width / num_columns as f64;

    for (column_idx, column) in columns.iter().enumerate() {
        let color = hex_color(colors.color_for(&column.name));
        let x_offset = (column_idx as f64 - (num_columns as f64 - 1.0) / 2.0) * bar_width;

        for (x_idx, &value) in column.values.iter().enumerate() {
            let x_center = x_idx as f64 + x_offset;
            let x_left = x_center - bar_width / 2.0 + 0.01;
            let x_right = x_center + bar_width / 2.0 - 0.01;

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x_left, 0.0), (x_right, value)],
                color.filled(),
            )))?;

            if settings.show_labels {
                chart.draw_series(std::iter::once(Text::new(
                    format_value(value, &data.stat_unit),
                    (x_center, value),
                    ("sans-serif", DATA_LABEL_FONT_SIZE)
                        .into_font()
                        .color(&text_color)
                        .pos(Pos::new(HPos::Center, VPos::Bottom)),
                )))?;
            }
        }

        // Zero-sized anchor so the column gets a legend entry
        chart
            .draw_series(std::iter::once(Circle::new((0.0, 0.0), 0, color.filled())))?
            .label(column.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }

    if columns.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(background.mix(0.8))
            .border_style(text_color)
            .label_font(
                ("sans-serif", LEGEND_FONT_SIZE)
                    .into_font()
                    .color(&text_color),
            )
            .draw()?;
    }

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Render every chart into `output_dir` as `chart_<n>.svg`.
pub fn render_all(
    charts: &[ChartData],
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
    output_dir: &Path,
) -> Result<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let mut written = Vec::with_capacity(charts.len());
    for (i, data) in charts.iter().enumerate() {
        let path = output_dir.join(format!("chart_{}.svg", i));
        render_chart_svg(data, settings, colors, &path)?;
        println!("Generated: {}", path.display());
        written.push(path);
    }
    Ok(written)
}
