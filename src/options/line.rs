use super::common::{cartesian_options, emphasis};
use super::schema::{ChartOptions, ItemStyle, LineSeries, Series, SeriesLineStyle};
use super::RenderSettings;
use crate::chart_data::ChartData;
use crate::color::ColorAssigner;

const SYMBOL: &str = "circle";
const SYMBOL_SIZE: u32 = 7;

/// Line chart options; same pivoting as the bar chart, drawn as marked lines.
pub fn line_options(
    data: &ChartData,
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
) -> ChartOptions {
    cartesian_options(data, settings, colors, |name, points, color| {
        Series::Line(LineSeries {
            name,
            data: points,
            item_style: ItemStyle { color },
            line_style: SeriesLineStyle {
                width: 2,
                kind: "solid",
            },
            smooth: false,
            symbol: SYMBOL,
            symbol_size: SYMBOL_SIZE,
            emphasis: emphasis(),
        })
    })
}
