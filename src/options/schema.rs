//! Typed subset of the renderer's option schema.
//!
//! Field names serialize to exactly what the renderer expects (`xAxis`,
//! `dataZoom`, ...). Collections are always emitted, possibly empty.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub background_color: &'static str,
    pub title: Vec<Title>,
    pub tooltip: Tooltip,
    pub toolbox: Toolbox,
    pub legend: Legend,
    /// Cartesian charts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    pub data_zoom: Vec<DataZoom>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub color: &'static str,
    pub font_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub text: String,
    pub left: &'static str,
    pub top: &'static str,
    pub text_align: &'static str,
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Axis,
    Item,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: Trigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pointer: Option<AxisPointer>,
    /// Pre-rendered HTML per x category, in axis order. Axis trigger only;
    /// item tooltips live on each data point.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub axis_content: Vec<String>,
}

/// Per-item tooltip override carrying already formatted HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTooltip {
    pub formatter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAsImage {
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub pixel_ratio: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolboxFeature {
    pub save_as_image: SaveAsImage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconStyle {
    pub border_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolboxEmphasis {
    pub icon_style: IconStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toolbox {
    pub show: bool,
    pub feature: ToolboxFeature,
    pub icon_style: IconStyle,
    pub emphasis: ToolboxEmphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
    pub data: Vec<String>,
}

impl Legend {
    pub fn hidden() -> Self {
        Self {
            show: false,
            left: None,
            item_width: None,
            item_height: None,
            text_style: None,
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub left: &'static str,
    pub right: &'static str,
    pub bottom: &'static str,
    pub top: String,
    pub contain_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLine {
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    pub show: bool,
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    pub axis_label: AxisLabel,
    pub axis_line: AxisLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_line: Option<SplitLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStyle {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataZoom {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x_axis_index: u32,
    pub start: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_style: Option<ColorStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<ColorStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointLabel {
    pub show: bool,
    pub position: &'static str,
    pub formatter: &'static str,
    pub font_size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub value: f64,
    pub label: PointLabel,
    pub tooltip: ItemTooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStyle {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emphasis {
    pub focus: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub name: String,
    pub data: Vec<DataPoint>,
    pub item_style: ItemStyle,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    pub data: Vec<DataPoint>,
    pub item_style: ItemStyle,
    pub line_style: SeriesLineStyle,
    pub smooth: bool,
    pub symbol: &'static str,
    pub symbol_size: u32,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLineStyle {
    pub width: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub item_style: ItemStyle,
    pub tooltip: ItemTooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieLabel {
    pub show: bool,
    pub formatter: &'static str,
    pub font_size: u32,
    pub color: &'static str,
    pub font_weight: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLine {
    pub show: bool,
    pub length: u32,
    pub length2: u32,
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowStyle {
    pub shadow_blur: u32,
    pub shadow_offset_x: u32,
    pub shadow_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmphasisLabel {
    pub show: bool,
    pub font_size: u32,
    pub font_weight: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieEmphasis {
    pub item_style: ShadowStyle,
    pub label: EmphasisLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSeries {
    pub name: String,
    pub radius: [&'static str; 2],
    pub center: [&'static str; 2],
    pub data: Vec<PieSlice>,
    pub label: PieLabel,
    pub label_line: LabelLine,
    pub emphasis: PieEmphasis,
}

/// Serialized with the renderer's `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Series {
    Bar(BarSeries),
    Line(LineSeries),
    Pie(PieSeries),
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Bar(s) => &s.name,
            Series::Line(s) => &s.name,
            Series::Pie(s) => &s.name,
        }
    }

    /// Data values in display order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Series::Bar(s) => s.data.iter().map(|p| p.value).collect(),
            Series::Line(s) => s.data.iter().map(|p| p.value).collect(),
            Series::Pie(s) => s.data.iter().map(|p| p.value).collect(),
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        match self {
            Series::Bar(s) => Some(s.item_style.color),
            Series::Line(s) => Some(s.item_style.color),
            Series::Pie(_) => None,
        }
    }
}
