//! Directions: text, tempo, dynamics, pedal marks and dashed lines.
//!
//! A direction either rides on a leaf (rendered right before its note), or
//! is placed in a measure at a displacement from its start.

use std::collections::BTreeMap;

use fraction::Fraction;
use log::debug;

use super::is_element_name;
use crate::{
    error::{ScoreError, ScoreResult},
    primitives::{
        fraction_tools::{denom, numer},
        Duration, NoteType,
    },
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Placement {
    Above,
    Below,
}
impl Placement {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PedalAction {
    Start,
    Change,
    Stop,
}
impl PedalAction {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Change => "change",
            Self::Stop => "stop",
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DirectionKind {
    Text {
        text: String,
        font_size: Option<f32>,
        italic: bool,
        bold: bool,
        /// Starts a dashed line with this number (e.g. "accel. - - -").
        dashed_line: Option<u32>,
        /// Extra attributes of `words`, e.g. `font-family`.
        attributes: BTreeMap<String, String>,
    },
    Metronome {
        beat_unit: Duration,
        bpm: f64,
        /// Extra attributes of `metronome`, e.g. `parentheses`.
        attributes: BTreeMap<String, String>,
    },
    Dynamic(String),
    EndDashedLine(u32),
    Pedal(PedalAction),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Direction {
    kind: DirectionKind,
    placement: Option<Placement>,
    voice: u8,
    staff: Option<u8>,
}
impl Direction {
    pub fn new(kind: DirectionKind, placement: Option<Placement>) -> Self {
        Self {
            kind,
            placement,
            voice: 1,
            staff: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(
            DirectionKind::Text {
                text: text.into(),
                font_size: None,
                italic: false,
                bold: false,
                dashed_line: None,
                attributes: BTreeMap::new(),
            },
            Some(Placement::Above),
        )
    }

    /// Text that starts a dashed line, later closed by
    /// [Direction::end_dashed_line] with the same number.
    pub fn text_with_dashes(text: impl Into<String>, line: u32) -> Self {
        let mut direction = Self::text(text);
        if let DirectionKind::Text { dashed_line, .. } = &mut direction.kind {
            *dashed_line = Some(line);
        }
        direction
    }

    pub fn end_dashed_line(line: u32) -> Self {
        Self::new(DirectionKind::EndDashedLine(line), None)
    }

    /// Tempo mark. If the beat length is not a single notehead, the mark
    /// is expressed in quarters with the tempo scaled accordingly.
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use musicxml_score::notation::{Direction, DirectionKind};
    /// # use musicxml_score::primitives::{Duration, NoteType};
    /// let tempo = Direction::metronome(Fraction::new(5u64, 2u64), 60.0);
    /// match tempo.kind() {
    ///     DirectionKind::Metronome { beat_unit, bpm, .. } => {
    ///         assert_eq!(*beat_unit, Duration::from(NoteType::Quarter));
    ///         assert_eq!(*bpm, 24.0);
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn metronome(beat_length: Fraction, bpm: f64) -> Self {
        let kind = match Duration::from_written_length(beat_length) {
            Ok(beat_unit) => DirectionKind::Metronome {
                beat_unit,
                bpm,
                attributes: BTreeMap::new(),
            },
            Err(_) => {
                debug!(
                    "beat length {beat_length} is not a single notehead, \
                    falling back to quarter beat"
                );
                let length = numer(&beat_length) as f64
                    / denom(&beat_length) as f64;
                DirectionKind::Metronome {
                    beat_unit: NoteType::Quarter.into(),
                    bpm: bpm / length,
                    attributes: BTreeMap::new(),
                }
            }
        };
        Self::new(kind, Some(Placement::Above))
    }

    pub fn dynamic(text: impl Into<String>) -> Self {
        Self::new(DirectionKind::Dynamic(text.into()), Some(Placement::Below))
    }

    pub fn pedal(action: PedalAction) -> Self {
        Self::new(DirectionKind::Pedal(action), Some(Placement::Below))
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }
    pub fn with_voice(mut self, voice: u8) -> Self {
        self.voice = voice;
        self
    }
    pub fn with_staff(mut self, staff: u8) -> Self {
        self.staff = Some(staff);
        self
    }
    /// Only affects text directions.
    pub fn with_font(
        mut self,
        size: Option<f32>,
        is_italic: bool,
        is_bold: bool,
    ) -> Self {
        if let DirectionKind::Text {
            font_size,
            italic,
            bold,
            ..
        } = &mut self.kind
        {
            *font_size = size;
            *italic = is_italic;
            *bold = is_bold;
        }
        self
    }

    /// Extra attribute of the `words` or `metronome` element.
    /// Underscores in `key` become dashes, so `font_family` gives
    /// `font-family`. Other direction kinds are left unchanged.
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use musicxml_score::notation::Direction;
    /// let tempo = Direction::metronome(Fraction::from(1u64), 60.0)
    ///     .with_attribute("parentheses", "yes")
    ///     .unwrap();
    /// assert!(Direction::text("x").with_attribute("bad key", "1").is_err());
    /// ```
    pub fn with_attribute(
        mut self,
        key: impl AsRef<str>,
        value: impl ToString,
    ) -> ScoreResult<Self> {
        let key = key.as_ref().replace('_', "-");
        if !is_element_name(&key) {
            return Err(ScoreError::InvalidContent(format!(
                "`{key}` is not an attribute name"
            )));
        }
        match &mut self.kind {
            DirectionKind::Text { attributes, .. }
            | DirectionKind::Metronome { attributes, .. } => {
                attributes.insert(key, value.to_string());
            }
            kind => debug!("{kind:?} takes no extra attributes, ignoring `{key}`"),
        }
        Ok(self)
    }

    /// Extra attributes of text and metronome marks.
    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            DirectionKind::Text { attributes, .. }
            | DirectionKind::Metronome { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn kind(&self) -> &DirectionKind {
        &self.kind
    }
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }
    pub fn voice(&self) -> u8 {
        self.voice
    }
    pub fn staff(&self) -> Option<u8> {
        self.staff
    }

    /// Number of the dashed line this direction opens.
    pub fn starts_dashed_line(&self) -> Option<u32> {
        match &self.kind {
            DirectionKind::Text { dashed_line, .. } => *dashed_line,
            _ => None,
        }
    }
    /// Number of the dashed line this direction closes.
    pub fn stops_dashed_line(&self) -> Option<u32> {
        match &self.kind {
            DirectionKind::EndDashedLine(line) => Some(*line),
            _ => None,
        }
    }
}

/// Dynamic marks with their own element in the document,
/// anything else is written as `other-dynamics`.
pub static STANDARD_DYNAMICS: [&str; 23] = [
    "f", "ff", "fff", "ffff", "fffff", "ffffff", "fp", "fz", "mf", "mp", "p",
    "pp", "ppp", "pppp", "ppppp", "pppppp", "rf", "rfz", "sf", "sffz", "sfp",
    "sfpp", "sfz",
];
