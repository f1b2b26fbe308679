use super::schema::{AxisPointer, ItemTooltip, Tooltip, Trigger};
use crate::stats::format_value;

/// Above this many series an axis tooltip gets too crowded to read.
pub const MAX_AXIS_TOOLTIP_SERIES: usize = 10;

/// One line of a tooltip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipEntry<'a> {
    /// Colored marker HTML, see [`marker`].
    pub marker: &'a str,
    pub name: &'a str,
    pub value: f64,
}

/// Axis tooltip when both axes carry categories and there are few enough
/// series; item tooltip otherwise.
pub fn tooltip_config(has_both_axes: bool, series_count: usize) -> Tooltip {
    if has_both_axes && series_count <= MAX_AXIS_TOOLTIP_SERIES {
        Tooltip {
            trigger: Trigger::Axis,
            axis_pointer: Some(AxisPointer { kind: "shadow" }),
            axis_content: Vec::new(),
        }
    } else {
        item_tooltip()
    }
}

pub fn item_tooltip() -> Tooltip {
    Tooltip {
        trigger: Trigger::Item,
        axis_pointer: None,
        axis_content: Vec::new(),
    }
}

/// Round color swatch placed in front of a tooltip line.
pub fn marker(color: &str) -> String {
    format!(
        "<span style=\"display:inline-block;margin-right:4px;border-radius:10px;width:10px;height:10px;background-color:{};\"></span>",
        color
    )
}

/// Render an axis-trigger tooltip: the category header, then one line per series.
pub fn format_axis_tooltip(axis_value: &str, entries: &[TooltipEntry<'_>], unit: &str) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = format!("<strong>{}</strong><br/>", axis_value);
    for entry in entries {
        out.push_str(&format!(
            "{} {}: {}<br/>",
            entry.marker,
            entry.name,
            format_value(entry.value, unit)
        ));
    }
    out
}

pub fn format_item_tooltip(entry: &TooltipEntry<'_>, unit: &str) -> String {
    format!(
        "{} <strong>{}</strong><br/>{}",
        entry.marker,
        entry.name,
        format_value(entry.value, unit)
    )
}

/// Item tooltip for one plotted value, ready to attach to a point or slice.
pub fn item_content(color: &str, name: &str, value: f64, unit: &str) -> ItemTooltip {
    let marker = marker(color);
    ItemTooltip {
        formatter: format_item_tooltip(
            &TooltipEntry {
                marker: &marker,
                name,
                value,
            },
            unit,
        ),
    }
}
