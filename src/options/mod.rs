//! Renderer option builders.
//!
//! Every builder is a pure function of the chart data and the render settings,
//! apart from the shared [`ColorAssigner`] which keeps one color per category
//! key across all charts of a group.

pub mod bar;
pub mod common;
pub mod line;
pub mod pie;
pub mod schema;
pub mod tooltip;

use crate::chart_data::ChartData;
use crate::color::ColorAssigner;
use crate::model::{ChartType, SortDirective};
use schema::ChartOptions;

/// The slice of view state the builders depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderSettings {
    pub sort: SortDirective,
    pub show_labels: bool,
    pub is_dark: bool,
}

/// Dispatch to the builder for `chart_type`.
pub fn build_options(
    chart_type: ChartType,
    data: &ChartData,
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
) -> ChartOptions {
    match chart_type {
        ChartType::Bar => bar::bar_options(data, settings, colors),
        ChartType::Line => line::line_options(data, settings, colors),
        ChartType::Pie => pie::pie_options(data, settings, colors),
    }
}
