//! Zone selection, attenuation and volume math, plus the KPI strip.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::i18n::{LabelKey, Lang, Translate};
use crate::levels::round_half_up;

/// Attenuation assumed for a zone missing from the attenuation map
pub const DEFAULT_ATTENUATION_DB: f64 = 0.0;

/// Volume assumed for a zone missing from the volume map
pub const DEFAULT_ZONE_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub selected: bool,
}

impl Zone {
    pub fn new(id: impl Into<String>, selected: bool) -> Self {
        Self {
            id: id.into(),
            selected,
        }
    }
}

/// Summary of the currently selected zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedZoneStats {
    pub active_count: usize,
    /// Most negative attenuation among selected zones, in dB
    pub applied_att: f64,
    /// Lowest linear volume among selected zones
    pub min_zone_vol: f64,
}

impl Default for SelectedZoneStats {
    fn default() -> Self {
        Self {
            active_count: 0,
            applied_att: DEFAULT_ATTENUATION_DB,
            min_zone_vol: DEFAULT_ZONE_VOLUME,
        }
    }
}

impl SelectedZoneStats {
    /// Linear gain for the selection: the attenuation as a multiplier,
    /// scaled by the quietest zone volume.
    pub fn gain(&self) -> f64 {
        10f64.powf(self.applied_att / 20.0) * self.min_zone_vol
    }
}

/// Count the selected zones and pick the weakest attenuation and volume.
///
/// With nothing selected the stats are neutral: 0 zones, 0 dB, volume 1.
pub fn compute_selected_zone_stats(
    zones: &[Zone],
    attenuation_db: &HashMap<String, f64>,
    zone_volume: &HashMap<String, f64>,
) -> SelectedZoneStats {
    let selected: Vec<&Zone> = zones.iter().filter(|z| z.selected).collect();
    if selected.is_empty() {
        return SelectedZoneStats::default();
    }

    let applied_att = selected
        .iter()
        .map(|z| {
            attenuation_db
                .get(&z.id)
                .copied()
                .unwrap_or(DEFAULT_ATTENUATION_DB)
        })
        .fold(f64::INFINITY, f64::min);

    let min_zone_vol = selected
        .iter()
        .map(|z| zone_volume.get(&z.id).copied().unwrap_or(DEFAULT_ZONE_VOLUME))
        .fold(f64::INFINITY, f64::min);

    let stats = SelectedZoneStats {
        active_count: selected.len(),
        applied_att,
        min_zone_vol,
    };
    tracing::debug!(
        "Selected zones: {} (att {} dB, min volume {})",
        stats.active_count,
        stats.applied_att,
        stats.min_zone_vol
    );
    stats
}

/// Linear output gain for the current selection. Unity when nothing is selected.
pub fn compute_gain_value(
    zones: &[Zone],
    attenuation_db: &HashMap<String, f64>,
    zone_volume: &HashMap<String, f64>,
) -> f64 {
    compute_selected_zone_stats(zones, attenuation_db, zone_volume).gain()
}

/// A KPI value is either a plain count or preformatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Count(usize),
    Text(String),
}

impl From<usize> for KpiValue {
    fn from(n: usize) -> Self {
        KpiValue::Count(n)
    }
}

impl From<String> for KpiValue {
    fn from(s: String) -> Self {
        KpiValue::Text(s)
    }
}

impl PartialEq<&str> for KpiValue {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, KpiValue::Text(s) if s == other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub label: String,
    pub value: KpiValue,
    pub status: bool,
    pub show_dot: bool,
}

/// Build the four dashboard KPIs: active zones, attenuation, stream, volume.
pub fn build_kpis<T: Translate + ?Sized>(
    translator: &T,
    lang: Lang,
    active_zones: usize,
    applied_att: f64,
    is_playing: bool,
    volume: f64,
) -> [Kpi; 4] {
    let label = |key: LabelKey| translator.t(lang, key).into_owned();

    let stream_state = if is_playing {
        LabelKey::KpiStreamPlaying
    } else {
        LabelKey::KpiStreamPaused
    };

    [
        Kpi {
            label: label(LabelKey::KpiActiveZones),
            value: active_zones.into(),
            status: active_zones > 0,
            show_dot: true,
        },
        Kpi {
            label: label(LabelKey::KpiAttenuation),
            value: format!("{} dB", format_number(applied_att)).into(),
            status: applied_att < 0.0,
            show_dot: true,
        },
        Kpi {
            label: label(LabelKey::KpiStream),
            value: label(stream_state).into(),
            status: is_playing,
            show_dot: true,
        },
        Kpi {
            label: label(LabelKey::KpiVolume),
            value: format!("{}%", format_number(round_half_up(volume * 100.0))).into(),
            status: true,
            show_dot: false,
        },
    ]
}

/// Number text as the web dashboard prints it: shortest form (`-6`, `-6.5`),
/// `0` for negative zero, `Infinity`/`NaN` spelled out, and exponent form
/// below 1e-6 or from 1e21 up (`-1e-7`, `1e+21`).
fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;

    fn fixture() -> (Vec<Zone>, HashMap<String, f64>, HashMap<String, f64>) {
        let zones = vec![
            Zone::new("salon", true),
            Zone::new("bureau", false),
            Zone::new("cuisine", true),
        ];
        let attenuation_db = HashMap::from([
            ("salon".to_string(), 0.0),
            ("bureau".to_string(), -6.0),
            ("cuisine".to_string(), -12.0),
        ]);
        let zone_volume = HashMap::from([
            ("salon".to_string(), 1.0),
            ("bureau".to_string(), 0.5),
            ("cuisine".to_string(), 0.7),
        ]);
        (zones, attenuation_db, zone_volume)
    }

    #[test]
    fn test_selected_zone_stats() {
        let (zones, att, vol) = fixture();
        let stats = compute_selected_zone_stats(&zones, &att, &vol);
        assert_eq!(stats.active_count, 2);
        assert_eq!(stats.applied_att, -12.0);
        assert_eq!(stats.min_zone_vol, 0.7);
    }

    #[test]
    fn test_gain_from_weakest_zone() {
        let (zones, att, vol) = fixture();
        let gain = compute_gain_value(&zones, &att, &vol);
        // -12 dB is about 0.251, then * 0.7
        assert!((gain - 0.176).abs() < 0.01, "gain was {}", gain);
    }

    #[test]
    fn test_unity_gain_without_selection() {
        let (zones, att, vol) = fixture();
        let none: Vec<Zone> = zones
            .into_iter()
            .map(|z| Zone {
                selected: false,
                ..z
            })
            .collect();

        let stats = compute_selected_zone_stats(&none, &att, &vol);
        assert_eq!(stats, SelectedZoneStats::default());
        assert_eq!(compute_gain_value(&none, &att, &vol), 1.0);
        assert_eq!(compute_gain_value(&[], &att, &vol), 1.0);
    }

    #[test]
    fn test_missing_entries_use_defaults() {
        let zones = vec![Zone::new("terrasse", true)];
        let stats = compute_selected_zone_stats(&zones, &HashMap::new(), &HashMap::new());
        assert_eq!(stats.active_count, 1);
        assert_eq!(stats.applied_att, 0.0);
        assert_eq!(stats.min_zone_vol, 1.0);
        assert_eq!(stats.gain(), 1.0);
    }

    #[test]
    fn test_build_kpis_fr() {
        let kpis = build_kpis(&Catalog, Lang::Fr, 2, -6.0, true, 0.5);

        assert_eq!(kpis[0].label, "Zones actives");
        assert!(kpis[0].status);
        assert_eq!(kpis[0].value, KpiValue::Count(2));

        assert_eq!(kpis[1].label, "Atténuation");
        assert!(kpis[1].status);
        assert_eq!(kpis[1].value, "-6 dB");

        assert_eq!(kpis[2].label, "Flux");
        assert!(kpis[2].status);
        assert_eq!(kpis[2].value, "En lecture");

        assert_eq!(kpis[3].value, "50%");
        assert!(kpis[3].status);
        assert!(!kpis[3].show_dot);
    }

    #[test]
    fn test_build_kpis_idle() {
        let kpis = build_kpis(&Catalog, Lang::En, 0, 0.0, false, 0.335);

        assert!(!kpis[0].status);
        assert_eq!(kpis[1].value, "0 dB");
        assert!(!kpis[1].status);
        assert_eq!(kpis[2].value, "Paused");
        assert!(!kpis[2].status);
        assert_eq!(kpis[3].value, "34%");
        assert!(kpis[..3].iter().all(|k| k.show_dot));
    }

    #[test]
    fn test_attenuation_formatting() {
        assert_eq!(format_number(-6.5), "-6.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_attenuation_formatting_extremes() {
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(-1e-7), "-1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e21), "1e+21");

        let kpis = build_kpis(&Catalog, Lang::En, 1, f64::NEG_INFINITY, true, 1.0);
        assert_eq!(kpis[1].value, "-Infinity dB");
        assert!(kpis[1].status, "muted zone counts as attenuated");
    }

    #[test]
    fn test_kpi_json_shape() {
        let kpis = build_kpis(&Catalog, Lang::En, 3, -3.0, true, 1.0);
        let json = serde_json::to_value(&kpis).unwrap();

        assert_eq!(json[0]["value"], serde_json::json!(3));
        assert_eq!(json[1]["value"], serde_json::json!("-3 dB"));
        assert_eq!(json[3]["showDot"], serde_json::json!(false));
    }
}
