//! Presentation helpers for a multi-zone audio monitoring dashboard.
//!
//! Everything here is a pure transformation: analyser bytes to decibels,
//! decibels to a display level, selected zones to a linear gain, and scene
//! values to KPI records or an ECharts option object. Gradient construction
//! and label lookup are passed in as capabilities so none of it needs a
//! charting library or a locale system at hand.

pub mod chart;
pub mod color;
pub mod config;
pub mod error;
pub mod i18n;
pub mod levels;
pub mod zones;

pub use chart::{
    build_chart_options, build_chart_options_with_palette, time_label, ChartPalette, ColorStop,
    EchartsGradient, GradientFactory, SeriesLabels,
};
pub use color::{hex_to_rgba, Rgb};
pub use i18n::{Catalog, LabelKey, Lang, Translate};
pub use levels::{db_from_analyser, db_to_level};
pub use zones::{
    build_kpis, compute_gain_value, compute_selected_zone_stats, Kpi, KpiValue,
    SelectedZoneStats, Zone,
};
