//! Notations, articulations and directions attached to leaves.

use std::{fmt::Display, str::FromStr};

use crate::error::{ScoreError, ScoreResult};

pub mod direction;
pub mod notehead;

pub use direction::{Direction, DirectionKind, PedalAction, Placement};
pub use notehead::{Notehead, NoteheadShape};

/// Caller-chosen identifier of a slur.
///
/// Any string or number is allowed: ids are remapped to the
/// numbers the document format accepts at render time.
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub enum LinkId {
    Number(u32),
    Name(String),
}
impl Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
impl From<u32> for LinkId {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}
impl From<&str> for LinkId {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}
impl From<String> for LinkId {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlurAction {
    Start,
    Stop,
}

/// Anything rendered into the `notations` element of a note,
/// except ties, tuplet brackets and articulations.
#[derive(Debug, PartialEq, Clone)]
pub enum Notation {
    StartSlur(LinkId),
    StopSlur(LinkId),
    /// Glissando start with its number.
    StartGliss(u8),
    StopGliss(u8),
    /// Glissando per chord member, `None` for members without one.
    StartMultiGliss(Vec<Option<u8>>),
    StopMultiGliss(Vec<Option<u8>>),
    Fermata,
    Arpeggiate,
    /// Empty element with the given name, e.g. "non-arpeggiate".
    /// Build with [Notation::other] to have the name checked.
    Other(String),
}
impl Notation {
    /// Empty notation element. Fails if `name` is not a valid element name.
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::notation::Notation;
    /// assert!(Notation::other("non-arpeggiate").is_ok());
    /// assert!(Notation::other("non arpeggiate").is_err());
    /// ```
    pub fn other(name: impl Into<String>) -> ScoreResult<Self> {
        let name = name.into();
        match is_element_name(&name) {
            true => Ok(Self::Other(name)),
            false => Err(ScoreError::InvalidContent(format!(
                "`{name}` is not a notation name"
            ))),
        }
    }

    pub fn start_slur(id: impl Into<LinkId>) -> Self {
        Self::StartSlur(id.into())
    }
    pub fn stop_slur(id: impl Into<LinkId>) -> Self {
        Self::StopSlur(id.into())
    }
    pub fn slur(&self) -> Option<(SlurAction, &LinkId)> {
        match self {
            Self::StartSlur(id) => Some((SlurAction::Start, id)),
            Self::StopSlur(id) => Some((SlurAction::Stop, id)),
            _ => None,
        }
    }
    /// Multi-glissandi are spread over chord members, everything
    /// else sits on the first member.
    pub fn is_per_member(&self) -> bool {
        matches!(self, Self::StartMultiGliss(_) | Self::StopMultiGliss(_))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Articulation {
    Accent,
    StrongAccent,
    Staccato,
    Tenuto,
    DetachedLegato,
    Staccatissimo,
    Spiccato,
    Scoop,
    Plop,
    Doit,
    Falloff,
    BreathMark,
    Caesura,
    Stress,
    Unstress,
    SoftAccent,
    Other(String),
}
impl Articulation {
    pub fn xml_name(&self) -> &str {
        match self {
            Self::Accent => "accent",
            Self::StrongAccent => "strong-accent",
            Self::Staccato => "staccato",
            Self::Tenuto => "tenuto",
            Self::DetachedLegato => "detached-legato",
            Self::Staccatissimo => "staccatissimo",
            Self::Spiccato => "spiccato",
            Self::Scoop => "scoop",
            Self::Plop => "plop",
            Self::Doit => "doit",
            Self::Falloff => "falloff",
            Self::BreathMark => "breath-mark",
            Self::Caesura => "caesura",
            Self::Stress => "stress",
            Self::Unstress => "unstress",
            Self::SoftAccent => "soft-accent",
            Self::Other(name) => name,
        }
    }
}
impl FromStr for Articulation {
    type Err = ScoreError;

    /// Known names map to variants, any other valid element name
    /// becomes [Articulation::Other].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "accent" => Self::Accent,
            "strong-accent" => Self::StrongAccent,
            "staccato" => Self::Staccato,
            "tenuto" => Self::Tenuto,
            "detached-legato" => Self::DetachedLegato,
            "staccatissimo" => Self::Staccatissimo,
            "spiccato" => Self::Spiccato,
            "scoop" => Self::Scoop,
            "plop" => Self::Plop,
            "doit" => Self::Doit,
            "falloff" => Self::Falloff,
            "breath-mark" => Self::BreathMark,
            "caesura" => Self::Caesura,
            "stress" => Self::Stress,
            "unstress" => Self::Unstress,
            "soft-accent" => Self::SoftAccent,
            x if is_element_name(x) => Self::Other(x.to_string()),
            x => {
                return Err(ScoreError::InvalidContent(format!(
                    "`{x}` is not an articulation name"
                )))
            }
        })
    }
}

pub(crate) fn is_element_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        }
        _ => false,
    }
}
