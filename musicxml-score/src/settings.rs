use std::path::Path;

use chrono::{Local, NaiveDate};
use derivative::Derivative;
use fraction::Fraction;
use serde::{Deserialize, Serialize};

use crate::{error::ScoreResult, primitives::Duration};

/// Everything that tunes the export but is not part of the score itself.
///
/// Can be stored as json next to the project.
///
/// # Example
/// ```
/// # use musicxml_score::ExportSettings;
/// let settings = ExportSettings::from_json(r#"{"indent": 4}"#).unwrap();
/// assert_eq!(settings.indent, 4);
/// assert_eq!(settings.divisions_ceiling, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct ExportSettings {
    #[derivative(Default(value = "true"))]
    pub pretty_print: bool,
    #[derivative(Default(value = "2"))]
    pub indent: usize,
    #[derivative(Default(value = "String::from(\"musicxml-score\")"))]
    pub software: String,
    /// Encoding date written to the header. Today, if not set.
    pub encoding_date: Option<NaiveDate>,
    /// Upper bound of divisions, when directions are placed freely.
    #[derivative(Default(value = "1024"))]
    pub divisions_ceiling: u64,
    /// Direction displacements are approximated by fractions with
    /// denominator not greater than this.
    #[derivative(Default(value = "256"))]
    pub displacement_denominator_limit: u64,
    /// Number of slur numbers available per part.
    #[derivative(Default(value = "6"))]
    pub slur_pool_size: u8,
    /// Dots allowed when resolving lengths, capped at `MAX_DOTS`.
    #[derivative(Default(value = "4"))]
    pub max_dots: u8,
}
impl ExportSettings {
    pub fn from_json(json: &str) -> ScoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn to_json(&self) -> ScoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn load(path: impl AsRef<Path>) -> ScoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
    pub fn save(&self, path: impl AsRef<Path>) -> ScoreResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn encoding_date(&self) -> NaiveDate {
        self.encoding_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Duration of the written length, with at most `max_dots` dots.
    pub fn duration(&self, length: Fraction) -> ScoreResult<Duration> {
        Duration::from_written_length_with_max_dots(length, self.max_dots)
    }

    pub fn with_encoding_date(mut self, date: NaiveDate) -> Self {
        self.encoding_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ExportSettings::default();
        assert!(settings.pretty_print);
        assert_eq!(settings.indent, 2);
        assert_eq!(settings.software, "musicxml-score");
        assert_eq!(settings.displacement_denominator_limit, 256);
        assert_eq!(settings.slur_pool_size, 6);
        assert_eq!(settings.max_dots, 4);
        assert_eq!(settings.encoding_date, None);
    }

    #[test]
    fn json_round_trip_keeps_date() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 17).unwrap();
        let settings = ExportSettings::default().with_encoding_date(date);
        let json = settings.to_json().unwrap();
        assert!(json.contains("2020-05-17"));
        let loaded = ExportSettings::from_json(&json).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.encoding_date(), date);
    }

    #[test]
    fn file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = ExportSettings {
            slur_pool_size: 3,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(ExportSettings::load(&path).unwrap(), settings);
        assert!(ExportSettings::from_json("{\"indent\": \"x\"}").is_err());
    }

    #[test]
    fn dots_limit() {
        let settings = ExportSettings {
            max_dots: 1,
            ..Default::default()
        };
        let dotted = settings.duration(Fraction::new(3u64, 2u64)).unwrap();
        assert_eq!(dotted.dots(), 1);
        assert!(settings.duration(Fraction::new(7u64, 4u64)).is_err());
    }
}
