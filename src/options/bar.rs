use super::common::{cartesian_options, emphasis};
use super::schema::{BarSeries, ChartOptions, ItemStyle, Series};
use super::RenderSettings;
use crate::chart_data::ChartData;
use crate::color::ColorAssigner;

/// Bar chart options
///
/// Single-category data plots one bar per x category; dual-category data
/// becomes a grouped bar chart with one bar series per y category.
pub fn bar_options(
    data: &ChartData,
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
) -> ChartOptions {
    cartesian_options(data, settings, colors, |name, points, color| {
        Series::Bar(BarSeries {
            name,
            data: points,
            item_style: ItemStyle { color },
            emphasis: emphasis(),
        })
    })
}
