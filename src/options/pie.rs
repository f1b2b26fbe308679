use super::common::{base_options, legend, Styling, FONT_SIZE};
use super::schema::{
    ChartOptions, EmphasisLabel, ItemStyle, LabelLine, LineStyle, PieEmphasis, PieLabel,
    PieSeries, PieSlice, Series, ShadowStyle, TextStyle, Title,
};
use super::tooltip::{item_content, item_tooltip};
use super::RenderSettings;
use crate::chart_data::ChartData;
use crate::color::ColorAssigner;
use crate::sort::{order_by_totals, sort_series, y_axis_totals};
use std::collections::HashSet;

const LABEL_FORMATTER: &str = "{b} ({d}%)";

const SINGLE_RADIUS: [&str; 2] = ["40%", "70%"];
const SINGLE_CENTER: [&str; 2] = ["50%", "50%"];
const TWIN_RADIUS: [&str; 2] = ["30%", "60%"];
const LEFT_CENTER: [&str; 2] = ["25%", "50%"];
const RIGHT_CENTER: [&str; 2] = ["75%", "50%"];

fn pie_series(
    name: &str,
    data: Vec<PieSlice>,
    show_labels: bool,
    styling: &Styling,
    radius: [&'static str; 2],
    center: [&'static str; 2],
) -> Series {
    Series::Pie(PieSeries {
        name: name.to_string(),
        radius,
        center,
        data,
        label: PieLabel {
            show: show_labels,
            formatter: LABEL_FORMATTER,
            font_size: 9,
            color: styling.text_color,
            font_weight: "bold",
        },
        label_line: LabelLine {
            show: show_labels,
            length: 8,
            length2: 4,
            line_style: LineStyle {
                color: styling.text_color,
                opacity: None,
                kind: None,
                width: Some(1),
            },
        },
        emphasis: PieEmphasis {
            item_style: ShadowStyle {
                shadow_blur: 10,
                shadow_offset_x: 0,
                shadow_color: "rgba(0, 0, 0, 0.5)",
            },
            label: EmphasisLabel {
                show: show_labels,
                font_size: 11,
                font_weight: "bold",
            },
        },
    })
}

fn pie_title(text: &str, left: &'static str, styling: &Styling) -> Title {
    Title {
        text: text.to_string(),
        left,
        top: "5%",
        text_align: "center",
        text_style: TextStyle {
            color: styling.text_color,
            font_size: FONT_SIZE,
            font_weight: Some("bold"),
        },
    }
}

/// Legend entries in slice order, without repeats.
fn slice_names<'a>(slices: impl Iterator<Item = &'a PieSlice>) -> Vec<String> {
    let mut seen = HashSet::new();
    slices
        .filter(|s| seen.insert(s.name.clone()))
        .map(|s| s.name.clone())
        .collect()
}

/// Pie chart options
///
/// Each x category becomes one slice holding the sum of its values. When the
/// data has more than one y category a second pie aggregates by y category,
/// placed to the right of the first.
pub fn pie_options(
    data: &ChartData,
    settings: &RenderSettings,
    colors: &mut ColorAssigner,
) -> ChartOptions {
    let styling = Styling::for_theme(settings.is_dark);
    let show_labels = settings.show_labels;
    let mut options = base_options(data, &styling);
    options.tooltip = item_tooltip();

    let x_slices: Vec<PieSlice> = sort_series(data, settings.sort)
        .into_iter()
        .map(|r| {
            let color = colors.color_for(&r.series.x_axis);
            PieSlice {
                name: r.series.x_axis.clone(),
                value: r.total,
                item_style: ItemStyle { color },
                tooltip: item_content(color, &r.series.x_axis, r.total, &data.stat_unit),
            }
        })
        .collect();

    if !(data.is_dual() && data.y_axis.len() > 1) {
        options.legend = legend(slice_names(x_slices.iter()), &styling);
        options.series = vec![pie_series(
            &data.stat_type,
            x_slices,
            show_labels,
            &styling,
            SINGLE_RADIUS,
            SINGLE_CENTER,
        )];
        return options;
    }

    let y_totals = y_axis_totals(data);
    let y_slices: Vec<PieSlice> = order_by_totals(&y_totals, settings.sort)
        .into_iter()
        .map(|y| {
            let color = colors.color_for(&data.y_axis[y]);
            PieSlice {
                name: data.y_axis[y].clone(),
                value: y_totals[y],
                item_style: ItemStyle { color },
                tooltip: item_content(color, &data.y_axis[y], y_totals[y], &data.stat_unit),
            }
        })
        .collect();

    if !data.has_x_axis() {
        options.legend = legend(slice_names(y_slices.iter()), &styling);
        options.series = vec![pie_series(
            &data.stat_type,
            y_slices,
            show_labels,
            &styling,
            SINGLE_RADIUS,
            SINGLE_CENTER,
        )];
        return options;
    }

    options.legend = legend(slice_names(x_slices.iter().chain(y_slices.iter())), &styling);
    options.title = vec![
        pie_title("X-Axis", "25%", &styling),
        pie_title("Y-Axis", "75%", &styling),
    ];
    options.series = vec![
        pie_series(
            "By X-Axis",
            x_slices,
            show_labels,
            &styling,
            TWIN_RADIUS,
            LEFT_CENTER,
        ),
        pie_series(
            "By Y-Axis",
            y_slices,
            show_labels,
            &styling,
            TWIN_RADIUS,
            RIGHT_CENTER,
        ),
    ];

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::{build_chart_data, Layout};
    use crate::model::{BenchmarkRecord, SortDirective, SortOrder, Stat};
    use crate::options::schema::Trigger;

    fn chart(rows: &[(&str, &str, f64)]) -> ChartData {
        let records: Vec<BenchmarkRecord> = rows
            .iter()
            .map(|(x, y, v)| BenchmarkRecord::new("g", x, y, vec![Stat::new("allocs", *v, "", "op")]))
            .collect();
        build_chart_data(&records).remove(0)
    }

    fn names(series: &Series) -> Vec<String> {
        match series {
            Series::Pie(pie) => pie.data.iter().map(|s| s.name.clone()).collect(),
            _ => panic!("expected pie series"),
        }
    }

    #[test]
    fn test_single_pie() {
        let data = chart(&[("A", "", 10.0), ("B", "", 30.0)]);
        let settings = RenderSettings {
            sort: SortDirective::enabled(SortOrder::Desc),
            show_labels: true,
            is_dark: false,
        };
        let options = pie_options(&data, &settings, &mut ColorAssigner::new());

        assert_eq!(options.series.len(), 1);
        assert_eq!(options.series[0].name(), "allocs");
        assert_eq!(names(&options.series[0]), vec!["B", "A"]);
        assert_eq!(options.series[0].values(), vec![30.0, 10.0]);
        assert!(options.title.is_empty());
        assert!(options.grid.is_none());
        assert!(options.x_axis.is_none());
        assert_eq!(options.tooltip.trigger, Trigger::Item);
        assert!(options.legend.show);

        let Series::Pie(pie) = &options.series[0] else {
            panic!("expected pie series");
        };
        assert_eq!(pie.radius, SINGLE_RADIUS);
        assert_eq!(pie.label.formatter, "{b} ({d}%)");
        assert!(pie.label.show);
    }

    #[test]
    fn test_twin_pies_for_dual_category() {
        let data = chart(&[
            ("gin", "GET", 1.0),
            ("gin", "POST", 2.0),
            ("echo", "GET", 3.0),
            ("echo", "POST", 4.0),
        ]);
        let options = pie_options(&data, &RenderSettings::default(), &mut ColorAssigner::new());

        assert_eq!(options.series.len(), 2);
        assert_eq!(options.series[0].name(), "By X-Axis");
        assert_eq!(options.series[0].values(), vec![3.0, 7.0]);
        assert_eq!(options.series[1].name(), "By Y-Axis");
        assert_eq!(names(&options.series[1]), vec!["GET", "POST"]);
        assert_eq!(options.series[1].values(), vec![4.0, 6.0]);

        let lefts: Vec<&str> = options.title.iter().map(|t| t.left).collect();
        assert_eq!(lefts, vec!["25%", "75%"]);
        assert_eq!(options.title[1].text, "Y-Axis");

        let Series::Pie(right) = &options.series[1] else {
            panic!("expected pie series");
        };
        assert_eq!(right.center, RIGHT_CENTER);
        assert_eq!(right.radius, TWIN_RADIUS);
        assert_eq!(options.legend.data, vec!["gin", "echo", "GET", "POST"]);
    }

    #[test]
    fn test_y_pie_sorted_independently() {
        let data = chart(&[
            ("gin", "GET", 1.0),
            ("gin", "POST", 20.0),
            ("echo", "GET", 3.0),
            ("echo", "POST", 4.0),
        ]);
        let settings = RenderSettings {
            sort: SortDirective::enabled(SortOrder::Asc),
            ..Default::default()
        };
        let options = pie_options(&data, &settings, &mut ColorAssigner::new());

        assert_eq!(names(&options.series[0]), vec!["echo", "gin"]);
        assert_eq!(names(&options.series[1]), vec!["GET", "POST"]);
    }

    #[test]
    fn test_blank_x_axis_shows_only_y_pie() {
        let data = chart(&[("", "GET", 1.0), ("", "POST", 2.0)]);
        let options = pie_options(&data, &RenderSettings::default(), &mut ColorAssigner::new());

        assert_eq!(options.series.len(), 1);
        assert_eq!(names(&options.series[0]), vec!["GET", "POST"]);
        assert!(options.title.is_empty());
    }

    #[test]
    fn test_single_y_category_uses_one_pie() {
        let data = chart(&[("gin", "GET", 1.0), ("echo", "GET", 2.0)]);
        assert_eq!(data.layout, Layout::DualCategory);

        let options = pie_options(&data, &RenderSettings::default(), &mut ColorAssigner::new());
        assert_eq!(options.series.len(), 1);
        assert_eq!(names(&options.series[0]), vec!["gin", "echo"]);
    }

    #[test]
    fn test_empty_pie() {
        let data = ChartData {
            title: "t".to_string(),
            stat_type: "t".to_string(),
            stat_unit: String::new(),
            y_axis: Vec::new(),
            series: Vec::new(),
            layout: Layout::SingleCategory,
        };
        let options = pie_options(&data, &RenderSettings::default(), &mut ColorAssigner::new());
        assert_eq!(options.series.len(), 1);
        assert!(options.series[0].values().is_empty());
        assert!(!options.legend.show);
    }
}
