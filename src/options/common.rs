use super::schema::{
    Axis, AxisKind, AxisLabel, AxisLine, ChartOptions, ColorStyle, DataPoint, DataZoom, Emphasis,
    Grid, IconStyle, ItemTooltip, Legend, LineStyle, PointLabel, SaveAsImage, Series, SplitLine,
    TextStyle, Toolbox, ToolboxEmphasis, ToolboxFeature, Trigger,
};
use super::tooltip::{
    format_axis_tooltip, item_content, item_tooltip, marker, tooltip_config, TooltipEntry,
};
use super::RenderSettings;
use crate::chart_data::{ChartData, Layout};
use crate::color::ColorAssigner;
use crate::sort::{sort_series, y_axis_order};

// Grid layout
const GRID_BASE_TOP: usize = 15;
const GRID_LEGEND_STEP: usize = 2;
const GRID_MAX_TOP: usize = 35;
const LEGEND_ITEMS_PER_ROW: usize = 15;

// Legend swatch size in pixels
pub const LEGEND_ITEM_WIDTH: u32 = 10;
pub const LEGEND_ITEM_HEIGHT: u32 = 12;

/// Charts with more x-axis categories than this get zoom controls.
pub const DATA_ZOOM_THRESHOLD: usize = 10;
const ROTATE_LABELS_ABOVE: usize = 15;

pub const SPLIT_LINE_OPACITY: f64 = 0.2;
pub const FONT_SIZE: u32 = 12;
const POINT_LABEL_FONT_SIZE: u32 = 10;
const AXIS_LABEL_FONT_SIZE: u32 = 10;

/// Two-tone palette keyed by theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styling {
    pub text_color: &'static str,
    pub axis_line_color: &'static str,
    pub split_line_color: &'static str,
}

impl Styling {
    pub fn for_theme(is_dark: bool) -> Self {
        if is_dark {
            Self {
                text_color: "#e5e7eb",
                axis_line_color: "#4b5563",
                split_line_color: "#4b5563",
            }
        } else {
            Self {
                text_color: "#374151",
                axis_line_color: "#d1d5db",
                split_line_color: "#d1d5db",
            }
        }
    }
}

/// Top margin in percent, growing with the number of legend rows.
pub fn grid_top(series_count: usize) -> usize {
    let rows = series_count.saturating_sub(1) / LEGEND_ITEMS_PER_ROW;
    (GRID_BASE_TOP + rows * GRID_LEGEND_STEP).min(GRID_MAX_TOP)
}

pub fn grid(series_count: usize) -> Grid {
    Grid {
        left: "3%",
        right: "3%",
        bottom: "10%",
        top: format!("{}%", grid_top(series_count)),
        contain_label: true,
    }
}

/// Legend labelled by category key; hidden unless there are several entries.
pub fn legend(names: Vec<String>, styling: &Styling) -> Legend {
    if names.len() <= 1 {
        return Legend::hidden();
    }

    Legend {
        show: true,
        left: Some("center"),
        item_width: Some(LEGEND_ITEM_WIDTH),
        item_height: Some(LEGEND_ITEM_HEIGHT),
        text_style: Some(TextStyle {
            color: styling.text_color,
            font_size: FONT_SIZE,
            font_weight: None,
        }),
        data: names,
    }
}

/// Inside + slider zoom once the x-axis gets dense; nothing otherwise.
pub fn data_zoom(x_count: usize, styling: &Styling) -> Vec<DataZoom> {
    if x_count <= DATA_ZOOM_THRESHOLD {
        return Vec::new();
    }

    vec![
        DataZoom {
            kind: "inside",
            x_axis_index: 0,
            start: 0,
            end: 100,
            height: None,
            bottom: None,
            handle_style: None,
            text_style: None,
        },
        DataZoom {
            kind: "slider",
            x_axis_index: 0,
            start: 0,
            end: 100,
            height: Some(20),
            bottom: Some("2%"),
            handle_style: Some(ColorStyle {
                color: styling.text_color,
            }),
            text_style: Some(ColorStyle {
                color: styling.text_color,
            }),
        },
    ]
}

/// Category x-axis over `x_labels` and a value y-axis.
pub fn axes(styling: &Styling, x_labels: &[String]) -> (Axis, Axis) {
    let axis_line = AxisLine {
        line_style: LineStyle {
            color: styling.axis_line_color,
            opacity: None,
            kind: None,
            width: None,
        },
    };

    let x_axis = Axis {
        kind: AxisKind::Category,
        data: Some(x_labels.to_vec()),
        axis_label: AxisLabel {
            interval: Some(0),
            rotate: Some(if x_labels.len() > ROTATE_LABELS_ABOVE { 30 } else { 0 }),
            font_size: Some(AXIS_LABEL_FONT_SIZE),
            color: styling.text_color,
        },
        axis_line: axis_line.clone(),
        split_line: None,
    };

    let y_axis = Axis {
        kind: AxisKind::Value,
        data: None,
        axis_label: AxisLabel {
            interval: None,
            rotate: None,
            font_size: None,
            color: styling.text_color,
        },
        axis_line,
        split_line: Some(SplitLine {
            show: true,
            line_style: LineStyle {
                color: styling.split_line_color,
                opacity: Some(SPLIT_LINE_OPACITY),
                kind: Some("solid"),
                width: None,
            },
        }),
    };

    (x_axis, y_axis)
}

pub fn point(
    value: f64,
    tooltip: ItemTooltip,
    show_labels: bool,
    styling: &Styling,
) -> DataPoint {
    DataPoint {
        value,
        label: PointLabel {
            show: show_labels,
            position: "top",
            formatter: "{c}",
            font_size: POINT_LABEL_FONT_SIZE,
            color: styling.text_color,
        },
        tooltip,
    }
}

/// Axis tooltip HTML for every x category: one line per column.
fn axis_content(
    x_labels: &[String],
    columns: &[Column],
    column_colors: &[&str],
    unit: &str,
) -> Vec<String> {
    let markers: Vec<String> = column_colors.iter().map(|c| marker(c)).collect();

    x_labels
        .iter()
        .enumerate()
        .map(|(x, label)| {
            let entries: Vec<TooltipEntry<'_>> = columns
                .iter()
                .zip(&markers)
                .map(|(column, marker)| TooltipEntry {
                    marker,
                    name: &column.name,
                    value: column.values.get(x).copied().unwrap_or(0.0),
                })
                .collect();
            format_axis_tooltip(label, &entries, unit)
        })
        .collect()
}

pub fn emphasis() -> Emphasis {
    Emphasis { focus: "series" }
}

fn toolbox(title: &str, styling: &Styling) -> Toolbox {
    Toolbox {
        show: true,
        feature: ToolboxFeature {
            save_as_image: SaveAsImage {
                show: true,
                kind: "jpeg",
                title: "Save",
                pixel_ratio: 2,
                name: title.to_string(),
            },
        },
        icon_style: IconStyle {
            border_color: styling.text_color,
        },
        emphasis: ToolboxEmphasis {
            icon_style: IconStyle {
                border_color: styling.text_color,
            },
        },
    }
}

/// Fully populated options with no series; builders fill in the rest.
pub fn base_options(data: &ChartData, styling: &Styling) -> ChartOptions {
    ChartOptions {
        background_color: "transparent",
        title: Vec::new(),
        tooltip: item_tooltip(),
        toolbox: toolbox(&data.title, styling),
        legend: Legend::hidden(),
        grid: None,
        x_axis: None,
        y_axis: None,
        data_zoom: Vec::new(),
        series: Vec::new(),
    }
}

/// One plotted line/bar group after pivoting
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Pivot sorted chart data into plotted series
///
/// Single-category data yields one column named after the chart with one
/// point per x category. Dual-category data yields one column per y
/// category across the x domain.
pub fn columns(data: &ChartData, settings: &RenderSettings) -> (Vec<String>, Vec<Column>) {
    let ranked = sort_series(data, settings.sort);
    let x_labels: Vec<String> = ranked.iter().map(|r| r.series.x_axis.clone()).collect();

    let columns = match data.layout {
        Layout::SingleCategory => vec![Column {
            name: data.title.clone(),
            values: ranked
                .iter()
                .map(|r| r.series.values.first().copied().unwrap_or(0.0))
                .collect(),
        }],
        Layout::DualCategory => y_axis_order(data, settings.sort)
            .into_iter()
            .map(|y| Column {
                name: data.y_axis[y].clone(),
                values: ranked
                    .iter()
                    .map(|r| r.series.values.get(y).copied().unwrap_or(0.0))
                    .collect(),
            })
            .collect(),
    };

    (x_labels, columns)
}

/// Shared skeleton of the bar and line builders.
pub fn cartesian_options<F>(
    data: &ChartData,
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
    make_series: F,
) -> ChartOptions
where
    F: Fn(String, Vec<DataPoint>, &'static str) -> Series,
{
    let styling = Styling::for_theme(settings.is_dark);
    let (x_labels, columns) = columns(data, settings);
    let mut options = base_options(data, &styling);

    let (x_axis, y_axis) = axes(&styling, &x_labels);
    options.x_axis = Some(x_axis);
    options.y_axis = Some(y_axis);
    options.data_zoom = data_zoom(x_labels.len(), &styling);

    match data.layout {
        Layout::SingleCategory => {
            options.grid = Some(grid(1));
            options.tooltip = item_tooltip();
            options.legend = Legend::hidden();
        }
        Layout::DualCategory => {
            options.grid = Some(grid(columns.len()));
            options.tooltip = tooltip_config(data.has_x_axis(), columns.len());
            options.legend = legend(columns.iter().map(|c| c.name.clone()).collect(), &styling);
        }
    }

    let column_colors: Vec<&'static str> =
        columns.iter().map(|c| colors.color_for(&c.name)).collect();
    if options.tooltip.trigger == Trigger::Axis {
        options.tooltip.axis_content =
            axis_content(&x_labels, &columns, &column_colors, &data.stat_unit);
    }

    // Single-category points are named by x category, dual points by series.
    let single = data.layout == Layout::SingleCategory;
    options.series = columns
        .into_iter()
        .zip(column_colors)
        .map(|(column, color)| {
            let points = column
                .values
                .iter()
                .zip(&x_labels)
                .map(|(&v, x_label)| {
                    let name = if single { x_label } else { &column.name };
                    let tooltip = item_content(color, name, v, &data.stat_unit);
                    point(v, tooltip, settings.show_labels, &styling)
                })
                .collect();
            make_series(column.name, points, color)
        })
        .collect();

    options
}
