use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::PlotError;
use crate::perf::{Method, Metric, PerfTables};

const FONT: &str = "sans-serif";
// 10x8 inches at 100 dpi
const PLOT_WIDTH: u32 = 1000;
const PLOT_HEIGHT: u32 = 800;
const MARKER_SIZE: u32 = 4;
const RANGE_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Triangle,
}

/// One method's measurements, aligned with the chart's parallelism levels.
#[derive(Debug, Clone, Copy)]
pub struct PlotSeries<'a> {
    pub method: Method,
    pub values: &'a [f64],
}

#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub metric: Metric,
    pub title: &'static str,
    pub y_desc: &'static str,
    pub marker: Marker,
    pub series: Vec<PlotSeries<'a>>,
}

impl<'a> Panel<'a> {
    fn new(metric: Metric, series: Vec<PlotSeries<'a>>) -> Self {
        let (title, y_desc, marker) = match metric {
            Metric::Latency => (
                "99% Latency between different method",
                "Latency (ms)",
                Marker::Circle,
            ),
            Metric::Throughput => (
                "throughput between different method",
                "throughput (MB)",
                Marker::Triangle,
            ),
        };
        Self {
            metric,
            title,
            y_desc,
            marker,
            series,
        }
    }
}

/// Everything needed to draw one payload size's figure: a latency panel
/// stacked above a throughput panel, both over the same parallelism levels.
#[derive(Debug, Clone)]
pub struct ChartPlan<'a> {
    pub payload: &'a str,
    pub parallelisms: &'a [u32],
    pub panels: Vec<Panel<'a>>,
}

pub fn output_file_name(payload: &str) -> String {
    format!("array_latency_vs_parallelism_{}.png", payload)
}

/// Looks up and checks every series for `payload`. Attachment and proto are
/// required for both metrics, streaming is drawn only when present.
pub fn plan<'a>(tables: &'a PerfTables, payload: &'a str) -> Result<ChartPlan<'a>, PlotError> {
    let parallelisms = tables.parallelisms();
    if parallelisms.is_empty() {
        return Err(PlotError::EmptyAxis);
    }

    let mut panels = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let mut series = Vec::with_capacity(Method::ALL.len());
        for method in Method::ALL {
            let values = match tables.series(method, metric, payload) {
                Some(values) => values,
                None if method.is_required() => {
                    return Err(PlotError::MissingSeries {
                        payload: payload.to_string(),
                        method,
                        metric,
                    })
                }
                None => continue,
            };

            if values.len() != parallelisms.len() {
                return Err(PlotError::LengthMismatch {
                    payload: payload.to_string(),
                    method,
                    metric,
                    expected: parallelisms.len(),
                    actual: values.len(),
                });
            }

            series.push(PlotSeries { method, values });
        }
        panels.push(Panel::new(metric, series));
    }

    Ok(ChartPlan {
        payload,
        parallelisms,
        panels,
    })
}

/// Renders `payload` to `out_dir/array_latency_vs_parallelism_{payload}.png`,
/// replacing any existing file. Nothing is written if the data doesn't check out.
pub fn render(tables: &PerfTables, payload: &str, out_dir: &Path) -> Result<PathBuf, PlotError> {
    let plan = plan(tables, payload)?;
    let path = out_dir.join(output_file_name(payload));

    write_plot(&plan, &path)?;

    info!("Wrote {}", path.display());
    Ok(path)
}

fn write_plot(plan: &ChartPlan, path: &Path) -> Result<(), PlotError> {
    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();

    root.fill(&WHITE)?;
    debug!("Drawing {} panels for payload size {}", plan.panels.len(), plan.payload);

    let areas = root.split_evenly((plan.panels.len(), 1));
    for (area, panel) in areas.iter().zip(&plan.panels) {
        draw_panel(area, plan.parallelisms, panel)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    parallelisms: &[u32],
    panel: &Panel,
) -> Result<(), PlotError> {
    let x_range = padded_range(parallelisms.iter().map(|&x| f64::from(x)));
    let y_range = padded_range(panel.series.iter().flat_map(|s| s.values.iter().copied()));

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(panel.title, (FONT, 20))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_labels(parallelisms.len())
        .y_labels(10)
        .x_label_formatter(&tick_label)
        .y_label_formatter(&tick_label)
        .x_desc("Parallelisms")
        .y_desc(panel.y_desc)
        .axis_desc_style((FONT, 15))
        .draw()?;

    for series in &panel.series {
        let color = series.method.color();
        let points: Vec<(f64, f64)> = parallelisms
            .iter()
            .zip(series.values)
            .map(|(&x, &y)| (f64::from(x), y))
            .collect();

        debug!("{} {}: {} points", series.method, panel.metric, points.len());

        let line = color.stroke_width(2);
        let anno = chart
            .draw_series(LineSeries::new(points.iter().copied(), line))?
            .label(series.method.name());

        // Legend swatch is the line with the series marker in its middle.
        match panel.marker {
            Marker::Circle => anno.legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (20, 0)], line)
                    + Circle::new((10, 0), MARKER_SIZE, color.filled())
            }),
            Marker::Triangle => anno.legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (20, 0)], line)
                    + TriangleMarker::new((10, 0), MARKER_SIZE + 1, color.filled())
            }),
        };

        match panel.marker {
            Marker::Circle => chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
            )?,
            Marker::Triangle => chart.draw_series(
                points
                    .iter()
                    .map(|&p| TriangleMarker::new(p, MARKER_SIZE + 1, color.filled())),
            )?,
        };
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 13))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn tick_label(v: &f64) -> String {
    format!("{:.1}", v).trim_end_matches(".0").to_string()
}

/// Extent of `values` widened by 5% on each side. A flat or empty series gets
/// a unit-wide range so the axis is never degenerate.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }

    let span = max - min;
    let padding = if span > 0.0 {
        span * RANGE_PADDING
    } else {
        0.5
    };
    (min - padding)..(max + padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf_transfer_data::{PAYLOAD_SIZES, PERF_DATA_TRANSFER};
    use plotters::style::{BLUE, RED};
    use std::fs;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn small_tables() -> PerfTables {
        let mut tables = PerfTables::new(vec![1, 2, 3]);
        tables.insert(Method::Attachment, "1k", vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]);
        tables.insert(Method::Proto, "1k", vec![1.5, 2.5, 3.5], vec![4.5, 5.5, 6.5]);
        tables
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("10k"), "array_latency_vs_parallelism_10k.png");
        assert_eq!(output_file_name("10m"), "array_latency_vs_parallelism_10m.png");
    }

    #[test]
    fn test_plan_with_streaming() {
        let plan = plan(&PERF_DATA_TRANSFER, "10k").unwrap();

        assert_eq!(plan.payload, "10k");
        assert_eq!(plan.parallelisms.len(), 13);
        assert_eq!(plan.panels.len(), 2);

        let latency = &plan.panels[0];
        assert_eq!(latency.metric, Metric::Latency);
        assert_eq!(latency.title, "99% Latency between different method");
        assert_eq!(latency.y_desc, "Latency (ms)");
        assert_eq!(latency.marker, Marker::Circle);

        let throughput = &plan.panels[1];
        assert_eq!(throughput.metric, Metric::Throughput);
        assert_eq!(throughput.title, "throughput between different method");
        assert_eq!(throughput.y_desc, "throughput (MB)");
        assert_eq!(throughput.marker, Marker::Triangle);

        for panel in &plan.panels {
            let methods: Vec<Method> = panel.series.iter().map(|s| s.method).collect();
            assert_eq!(methods, Method::ALL.to_vec());
            assert!(panel.series.iter().all(|s| s.values.len() == 13));
        }

        let colors: Vec<_> = latency.series.iter().map(|s| s.method.color()).collect();
        assert_eq!(colors, vec![BLUE, RED, RED]);
        assert_eq!(latency.series[0].values[0], 43.152);
        assert_eq!(throughput.series[2].values[12], 24.0637);
    }

    #[test]
    fn test_plan_without_streaming() {
        let plan = plan(&PERF_DATA_TRANSFER, "10m").unwrap();

        for panel in &plan.panels {
            let methods: Vec<Method> = panel.series.iter().map(|s| s.method).collect();
            assert_eq!(methods, vec![Method::Attachment, Method::Proto]);
        }
    }

    #[test]
    fn test_unknown_payload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let err = render(&PERF_DATA_TRANSFER, "2m", dir.path()).unwrap_err();

        assert!(matches!(
            err,
            PlotError::MissingSeries { ref payload, method: Method::Attachment, metric: Metric::Latency }
                if payload == "2m"
        ));
        assert!(!dir.path().join(output_file_name("2m")).exists());
    }

    #[test]
    fn test_missing_proto_throughput() {
        let mut tables = PerfTables::new(vec![1, 2, 3]);
        tables.insert(Method::Attachment, "1k", vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]);
        tables.insert_series(Method::Proto, Metric::Latency, "1k", vec![1.0, 2.0, 3.0]);

        let err = plan(&tables, "1k").unwrap_err();

        assert!(matches!(
            err,
            PlotError::MissingSeries { method: Method::Proto, metric: Metric::Throughput, .. }
        ));
    }

    #[test]
    fn test_length_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut tables = small_tables();
        tables.insert(Method::Streaming, "1k", vec![1.0, 2.0], vec![4.0, 5.0, 6.0]);

        let err = render(&tables, "1k", dir.path()).unwrap_err();

        assert!(matches!(
            err,
            PlotError::LengthMismatch {
                method: Method::Streaming,
                metric: Metric::Latency,
                expected: 3,
                actual: 2,
                ..
            }
        ));
        assert!(!dir.path().join(output_file_name("1k")).exists());
    }

    #[test]
    fn test_empty_axis() {
        let mut tables = PerfTables::new(Vec::new());
        tables.insert(Method::Attachment, "1k", Vec::new(), Vec::new());
        tables.insert(Method::Proto, "1k", Vec::new(), Vec::new());

        assert!(matches!(plan(&tables, "1k"), Err(PlotError::EmptyAxis)));
    }

    #[test]
    fn test_padded_range() {
        let range = padded_range([10.0, 30.0]);
        assert!((range.start - 9.0).abs() < 1e-9);
        assert!((range.end - 31.0).abs() < 1e-9);

        assert_eq!(padded_range([5.0, 5.0]), 4.5..5.5);
        assert_eq!(padded_range(Vec::new()), 0.0..1.0);
        assert_eq!(padded_range([f64::NAN, 2.0, 2.0]), 1.5..2.5);
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(&10.0), "10");
        assert_eq!(tick_label(&100.0), "100");
        assert_eq!(tick_label(&0.5), "0.5");
        assert_eq!(tick_label(&2.34), "2.3");
    }

    #[test]
    fn test_render_builtin_payloads() {
        let dir = tempfile::tempdir().unwrap();

        for payload in PAYLOAD_SIZES {
            let path = render(&PERF_DATA_TRANSFER, payload, dir.path()).unwrap();

            assert_eq!(path, dir.path().join(format!("array_latency_vs_parallelism_{payload}.png")));
            let bytes = fs::read(&path).unwrap();
            assert!(bytes.starts_with(PNG_SIGNATURE));
        }
    }

    #[test]
    fn test_render_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();

        let path = render(&PERF_DATA_TRANSFER, "1m", dir.path()).unwrap();
        let first = fs::read(&path).unwrap();
        let path = render(&PERF_DATA_TRANSFER, "1m", dir.path()).unwrap();
        let second = fs::read(&path).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_render_marker_legends() {
        let dir = tempfile::tempdir().unwrap();
        let mut tables = small_tables();
        tables.insert(Method::Streaming, "1k", vec![0.5, 1.5, 2.5], vec![3.5, 4.0, 7.0]);

        let plan = plan(&tables, "1k").unwrap();
        assert!(plan.panels.iter().all(|p| p.series.len() == 3));

        let path = render(&tables, "1k", dir.path()).unwrap();
        assert!(fs::read(&path).unwrap().starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(output_file_name("1k"));
        fs::write(&target, b"stale").unwrap();

        render(&small_tables(), "1k", dir.path()).unwrap();

        let bytes = fs::read(&target).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }
}
