use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zonemeter::config::DashboardConfig;
use zonemeter::levels::{frame_dbs, frame_levels, frame_offset_secs};
use zonemeter::{
    build_chart_options_with_palette, build_kpis, compute_selected_zone_stats, db_to_level,
    time_label, Catalog, EchartsGradient,
};

#[derive(Parser, Debug)]
#[command(name = "zonemeter")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "Level, zone gain and chart JSON for a multi-zone audio dashboard")]
#[command(group(ArgGroup::new("mode").args(["kpis", "gain", "levels", "chart"])))]
struct Args {
    /// Scene config to use instead of the one in the config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output the KPI strip as JSON
    #[arg(short, long)]
    kpis: bool,

    /// Output the selected-zone stats and linear gain as JSON
    #[arg(short, long)]
    gain: bool,

    /// Output per-frame dB and display level for a raw 8-bit capture
    #[arg(short, long, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Output ECharts options built from the --stream/--mic captures
    #[arg(long)]
    chart: bool,

    /// Raw 8-bit capture for the stream series
    #[arg(long, value_name = "FILE", requires = "chart")]
    stream: Option<PathBuf>,

    /// Raw 8-bit capture for the mic series
    #[arg(long, value_name = "FILE", requires = "chart")]
    mic: Option<PathBuf>,

    /// Bytes per analyser frame (overrides the config)
    #[arg(short, long)]
    frame_size: Option<usize>,

    /// Capture sample rate in Hz (overrides the config)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Pretty-print JSON
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load_from(path)?,
        None => DashboardConfig::load()?,
    };
    if let Some(frame_size) = args.frame_size {
        config.frame_size = frame_size;
    }
    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate;
    }
    if config.frame_size == 0 {
        anyhow::bail!("Frame size must be at least 1 byte");
    }
    if config.sample_rate == 0 {
        anyhow::bail!("Sample rate must be at least 1 Hz");
    }
    tracing::info!(
        "Loaded scene: {} zones, lang {}, frame size {} at {} Hz",
        config.zones.len(),
        config.lang,
        config.frame_size,
        config.sample_rate
    );

    let output = if let Some(path) = &args.levels {
        levels_output(&config, path)?
    } else if args.chart {
        chart_output(&config, args.stream.as_deref(), args.mic.as_deref())?
    } else if args.kpis {
        kpis_output(&config)?
    } else if args.gain {
        gain_output(&config)
    } else {
        json!({
            "kpis": kpis_output(&config)?,
            "gain": gain_output(&config),
        })
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);
    Ok(())
}

fn kpis_output(config: &DashboardConfig) -> Result<Value> {
    let (zones, attenuation, volume) = config.zone_inputs();
    let stats = compute_selected_zone_stats(&zones, &attenuation, &volume);
    let kpis = build_kpis(
        &Catalog,
        config.lang,
        stats.active_count,
        stats.applied_att,
        config.playing,
        config.volume,
    );
    Ok(serde_json::to_value(kpis)?)
}

fn gain_output(config: &DashboardConfig) -> Value {
    let (zones, attenuation, volume) = config.zone_inputs();
    let stats = compute_selected_zone_stats(&zones, &attenuation, &volume);
    json!({
        "activeCount": stats.active_count,
        "appliedAtt": stats.applied_att,
        "minZoneVol": stats.min_zone_vol,
        "gain": stats.gain(),
    })
}

fn levels_output(config: &DashboardConfig, path: &Path) -> Result<Value> {
    let capture = read_capture(path)?;
    let frames: Vec<Value> = frame_dbs(&capture, config.frame_size)
        .into_iter()
        .enumerate()
        .map(|(i, db)| {
            json!({
                "frame": i,
                "time": frame_time_label(config, i),
                "db": db,
                "level": db_to_level(db),
            })
        })
        .collect();
    Ok(Value::Array(frames))
}

fn chart_output(config: &DashboardConfig, stream: Option<&Path>, mic: Option<&Path>) -> Result<Value> {
    let stream_history = match stream {
        Some(path) => frame_levels(&read_capture(path)?, config.frame_size),
        None => Vec::new(),
    };
    let mic_history = match mic {
        Some(path) => frame_levels(&read_capture(path)?, config.frame_size),
        None => Vec::new(),
    };

    let points = stream_history.len().max(mic_history.len());
    let time_labels: Vec<String> = (0..points).map(|i| frame_time_label(config, i)).collect();

    let palette = config.palette.clone().unwrap_or_default();
    Ok(build_chart_options_with_palette(
        &EchartsGradient,
        &time_labels,
        &stream_history,
        &mic_history,
        &config.series_labels(&Catalog),
        &palette,
    ))
}

/// Time at which frame `index` starts in the capture
fn frame_time_label(config: &DashboardConfig, index: usize) -> String {
    time_label(frame_offset_secs(index, config.frame_size, config.sample_rate))
}

fn read_capture(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!("Read {} samples from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn scene(frame_size: usize, sample_rate: u32) -> DashboardConfig {
        DashboardConfig {
            frame_size,
            sample_rate,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_mode_flags_conflict() {
        assert!(Args::try_parse_from(["zonemeter", "--kpis", "--gain"]).is_err());
        assert!(Args::try_parse_from(["zonemeter", "--chart", "--levels", "a.raw"]).is_err());
        assert!(Args::try_parse_from(["zonemeter", "--gain"]).is_ok());
    }

    #[test]
    fn test_captures_require_chart() {
        assert!(Args::try_parse_from(["zonemeter", "--stream", "a.raw"]).is_err());
        assert!(Args::try_parse_from(["zonemeter", "--kpis", "--mic", "b.raw"]).is_err());

        let args = Args::try_parse_from(["zonemeter", "--chart", "--stream", "a.raw"]).unwrap();
        assert!(args.chart);
        assert_eq!(args.stream, Some(PathBuf::from("a.raw")));
    }

    #[test]
    fn test_level_times_follow_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.raw");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();

        let output = levels_output(&scene(1024, 44_100), &path).unwrap();
        let frames = output.as_array().unwrap();
        assert_eq!(frames.len(), 4);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame["frame"], json!(i));
            assert_eq!(frame["time"], "00:00:00", "93 ms of audio stays in the first second");
            assert_eq!(frame["db"].as_f64(), Some(-80.0));
        }

        // One frame per second
        let output = levels_output(&scene(1024, 1024), &path).unwrap();
        assert_eq!(output[3]["time"], "00:00:03");
    }

    #[test]
    fn test_levels_keep_partial_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.raw");
        std::fs::write(&path, vec![255u8; 2500]).unwrap();

        let output = levels_output(&scene(1024, 48_000), &path).unwrap();
        let frames = output.as_array().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2]["level"].as_f64(), Some(80.0));
    }

    #[test]
    fn test_chart_without_captures_has_empty_series() {
        let options = chart_output(&scene(1024, 48_000), None, None).unwrap();

        let series = options["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["data"], json!([]));
        assert_eq!(series[1]["data"], json!([]));
        assert_eq!(options["xAxis"]["data"], json!([]));
    }

    #[test]
    fn test_chart_labels_span_longest_capture() {
        let dir = tempfile::tempdir().unwrap();
        let stream = dir.path().join("stream.raw");
        let mic = dir.path().join("mic.raw");
        std::fs::write(&stream, vec![255u8; 300]).unwrap();
        std::fs::write(&mic, vec![0u8; 100]).unwrap();

        let options = chart_output(&scene(100, 100), Some(&stream), Some(&mic)).unwrap();
        assert_eq!(
            options["xAxis"]["data"],
            json!(["00:00:00", "00:00:01", "00:00:02"])
        );
        assert_eq!(options["series"][0]["data"], json!([80.0, 80.0, 80.0]));
        assert_eq!(options["series"][1]["data"], json!([0.0]));
    }

    #[test]
    fn test_missing_capture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.raw");
        assert!(chart_output(&scene(1024, 48_000), Some(&missing), None).is_err());
    }
}
