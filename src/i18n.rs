//! Label lookup for the dashboard.
//!
//! Builders take a [`Translate`] value instead of calling a locale system
//! directly. [`Catalog`] carries the French and English strings the
//! dashboard ships with; any `Fn(Lang, LabelKey) -> String` works as well.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LangError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    En,
}

impl Lang {
    pub fn tag(self) -> &'static str {
        match self {
            Lang::Fr => "fr",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Lang {
    type Err = LangError;

    /// Accepts bare or regional tags (`fr`, `fr-FR`, `en_US`), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "fr" => Ok(Lang::Fr),
            "en" => Ok(Lang::En),
            _ => Err(LangError::Unsupported(s.to_string())),
        }
    }
}

/// Every label the builders ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    KpiActiveZones,
    KpiAttenuation,
    KpiStream,
    KpiStreamPlaying,
    KpiStreamPaused,
    KpiVolume,
    SeriesStream,
    SeriesMic,
}

impl LabelKey {
    /// Stable key string, as used by web locale bundles.
    pub fn as_str(self) -> &'static str {
        match self {
            LabelKey::KpiActiveZones => "kpiActiveZones",
            LabelKey::KpiAttenuation => "kpiAttenuation",
            LabelKey::KpiStream => "kpiStream",
            LabelKey::KpiStreamPlaying => "kpiStreamPlaying",
            LabelKey::KpiStreamPaused => "kpiStreamPaused",
            LabelKey::KpiVolume => "kpiVolume",
            LabelKey::SeriesStream => "seriesStream",
            LabelKey::SeriesMic => "seriesMic",
        }
    }
}

/// Resolves a label for a language.
pub trait Translate {
    fn t(&self, lang: Lang, key: LabelKey) -> Cow<'_, str>;
}

impl<F> Translate for F
where
    F: Fn(Lang, LabelKey) -> String,
{
    fn t(&self, lang: Lang, key: LabelKey) -> Cow<'_, str> {
        Cow::Owned(self(lang, key))
    }
}

/// Built-in French/English strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    fn lookup(lang: Lang, key: LabelKey) -> &'static str {
        match (lang, key) {
            (Lang::Fr, LabelKey::KpiActiveZones) => "Zones actives",
            (Lang::Fr, LabelKey::KpiAttenuation) => "Atténuation",
            (Lang::Fr, LabelKey::KpiStream) => "Flux",
            (Lang::Fr, LabelKey::KpiStreamPlaying) => "En lecture",
            (Lang::Fr, LabelKey::KpiStreamPaused) => "En pause",
            (Lang::Fr, LabelKey::KpiVolume) => "Volume",
            (Lang::Fr, LabelKey::SeriesStream) => "Flux",
            (Lang::Fr, LabelKey::SeriesMic) => "Micro",

            (Lang::En, LabelKey::KpiActiveZones) => "Active zones",
            (Lang::En, LabelKey::KpiAttenuation) => "Attenuation",
            (Lang::En, LabelKey::KpiStream) => "Stream",
            (Lang::En, LabelKey::KpiStreamPlaying) => "Playing",
            (Lang::En, LabelKey::KpiStreamPaused) => "Paused",
            (Lang::En, LabelKey::KpiVolume) => "Volume",
            (Lang::En, LabelKey::SeriesStream) => "Stream",
            (Lang::En, LabelKey::SeriesMic) => "Mic",
        }
    }
}

impl Translate for Catalog {
    fn t(&self, lang: Lang, key: LabelKey) -> Cow<'_, str> {
        Cow::Borrowed(Self::lookup(lang, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lang_tags() {
        assert_eq!("fr".parse::<Lang>(), Ok(Lang::Fr));
        assert_eq!("fr-FR".parse::<Lang>(), Ok(Lang::Fr));
        assert_eq!("EN_us".parse::<Lang>(), Ok(Lang::En));
        assert_eq!(
            "de".parse::<Lang>(),
            Err(LangError::Unsupported("de".to_string()))
        );
        assert!("".parse::<Lang>().is_err());
    }

    #[test]
    fn test_lang_serializes_as_tag() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            lang: Lang,
        }

        let text = toml::to_string(&Wrapper { lang: Lang::En }).unwrap();
        assert_eq!(text.trim(), "lang = \"en\"");
        let back: Wrapper = toml::from_str("lang = \"fr\"").unwrap();
        assert_eq!(back.lang, Lang::Fr);
    }

    #[test]
    fn test_catalog_labels() {
        assert_eq!(Catalog.t(Lang::Fr, LabelKey::KpiAttenuation), "Atténuation");
        assert_eq!(Catalog.t(Lang::En, LabelKey::KpiStreamPaused), "Paused");
        assert_eq!(Catalog.t(Lang::Fr, LabelKey::SeriesMic), "Micro");
    }

    #[test]
    fn test_closure_translator() {
        let echo = |lang: Lang, key: LabelKey| format!("{}:{}", lang, key.as_str());
        assert_eq!(echo.t(Lang::En, LabelKey::KpiVolume), "en:kpiVolume");
    }
}
