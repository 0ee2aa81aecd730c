//! ECharts option builder for the stream/mic level chart.
//!
//! The builder returns a plain `serde_json::Value` the web side hands to
//! `chart.setOption`. Gradients go through [`GradientFactory`] so callers can
//! substitute whatever their charting library expects.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::hex_to_rgba;
use crate::levels::LEVEL_SCALE;

const STREAM_COLOR: &str = "#0ea5e9";
const MIC_COLOR: &str = "#36ce9e";

const AXIS_TEXT: &str = "#4a5568";
const AXIS_LINE: &str = "rgba(15,23,42,0.18)";
const SPLIT_LINE: &str = "rgba(15,23,42,0.12)";
const FONT_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// Builds a linear gradient fill from `(x, y)` to `(x2, y2)` in bounding-box
/// coordinates.
pub trait GradientFactory {
    fn linear_gradient(&self, x: f64, y: f64, x2: f64, y2: f64, stops: &[ColorStop]) -> Value;
}

/// Emits the object form of `echarts.graphic.LinearGradient`, which ECharts
/// accepts anywhere a color is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchartsGradient;

impl GradientFactory for EchartsGradient {
    fn linear_gradient(&self, x: f64, y: f64, x2: f64, y2: f64, stops: &[ColorStop]) -> Value {
        json!({
            "type": "linear",
            "x": x,
            "y": y,
            "x2": x2,
            "y2": y2,
            "colorStops": stops,
            "global": false,
        })
    }
}

/// Legend names for the two series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesLabels {
    pub stream: String,
    pub mic: String,
}

/// Base colors for the two series, as `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPalette {
    pub stream: String,
    pub mic: String,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            stream: STREAM_COLOR.to_string(),
            mic: MIC_COLOR.to_string(),
        }
    }
}

/// Line and fill settings that differ between the two series.
struct SeriesStyle<'a> {
    color: &'a str,
    width: f64,
    shadow_opacity: f64,
    fill_top: f64,
    fill_bottom: f64,
}

/// Build the level chart options with the default palette.
pub fn build_chart_options<G: GradientFactory + ?Sized>(
    gradients: &G,
    time_labels: &[String],
    stream_history: &[f64],
    mic_history: &[f64],
    labels: &SeriesLabels,
) -> Value {
    build_chart_options_with_palette(
        gradients,
        time_labels,
        stream_history,
        mic_history,
        labels,
        &ChartPalette::default(),
    )
}

pub fn build_chart_options_with_palette<G: GradientFactory + ?Sized>(
    gradients: &G,
    time_labels: &[String],
    stream_history: &[f64],
    mic_history: &[f64],
    labels: &SeriesLabels,
    palette: &ChartPalette,
) -> Value {
    tracing::debug!(
        "Building chart options: {} labels, {} stream points, {} mic points",
        time_labels.len(),
        stream_history.len(),
        mic_history.len()
    );

    let stream = line_series(
        gradients,
        &labels.stream,
        stream_history,
        &SeriesStyle {
            color: &palette.stream,
            width: 2.5,
            shadow_opacity: 0.4,
            fill_top: 0.28,
            fill_bottom: 0.08,
        },
    );
    let mic = line_series(
        gradients,
        &labels.mic,
        mic_history,
        &SeriesStyle {
            color: &palette.mic,
            width: 2.0,
            shadow_opacity: 0.35,
            fill_top: 0.25,
            fill_bottom: 0.06,
        },
    );

    json!({
        "backgroundColor": "transparent",
        "legend": {
            "top": 6,
            "left": "center",
            "itemWidth": 10,
            "itemHeight": 10,
            "textStyle": { "color": AXIS_TEXT, "fontSize": FONT_SIZE },
        },
        "xAxis": {
            "type": "category",
            "data": time_labels,
            "boundaryGap": false,
            "axisLabel": { "color": AXIS_TEXT, "fontSize": FONT_SIZE },
            "axisLine": { "lineStyle": { "color": AXIS_LINE } },
            "axisTick": { "show": false },
        },
        "yAxis": {
            "type": "value",
            "min": 0,
            "max": LEVEL_SCALE,
            "splitLine": {
                "show": true,
                "lineStyle": { "color": SPLIT_LINE, "type": "dashed" },
            },
            "axisLabel": {
                "color": AXIS_TEXT,
                "fontSize": FONT_SIZE,
                "formatter": "{value} dB",
            },
            "axisLine": { "lineStyle": { "color": AXIS_LINE } },
            "axisTick": { "show": false },
        },
        "tooltip": {
            "trigger": "axis",
            "backgroundColor": "rgba(255,255,255,0.98)",
            "borderWidth": 1,
            "borderColor": "rgba(15,23,42,0.08)",
            "textStyle": { "color": "#0f172a", "fontSize": 12 },
            "extraCssText": "border-radius:12px;box-shadow:0 10px 30px rgba(15,23,42,0.12);",
        },
        "grid": { "left": 10, "right": 10, "top": 34, "bottom": 22 },
        "series": [stream, mic],
    })
}

fn line_series<G: GradientFactory + ?Sized>(
    gradients: &G,
    name: &str,
    data: &[f64],
    style: &SeriesStyle<'_>,
) -> Value {
    // Vertical fill, strongest at the top
    let fill = gradients.linear_gradient(
        0.0,
        0.0,
        0.0,
        1.0,
        &[
            ColorStop::new(0.0, hex_to_rgba(style.color, style.fill_top)),
            ColorStop::new(1.0, hex_to_rgba(style.color, style.fill_bottom)),
        ],
    );

    json!({
        "type": "line",
        "name": name,
        "data": data,
        "smooth": true,
        "symbolSize": 6,
        "showSymbol": false,
        "lineStyle": {
            "color": style.color,
            "width": style.width,
            "shadowBlur": 10,
            "shadowColor": hex_to_rgba(style.color, style.shadow_opacity),
            "shadowOffsetY": 6,
        },
        "areaStyle": { "color": fill },
    })
}

/// `HH:MM:SS` x-axis label for an offset in seconds
pub fn time_label(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}
