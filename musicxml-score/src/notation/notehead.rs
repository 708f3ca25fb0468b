use std::{fmt::Display, str::FromStr};

use crate::error::ScoreError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub enum NoteheadShape {
    #[default]
    Normal,
    Diamond,
    Triangle,
    Slash,
    Cross,
    X,
    CircleX,
    InvertedTriangle,
    Square,
    ArrowDown,
    ArrowUp,
    Circled,
    Slashed,
    BackSlashed,
    Cluster,
    CircleDot,
    LeftTriangle,
    Rectangle,
    Do,
    Re,
    Mi,
    Fa,
    FaUp,
    So,
    La,
    Ti,
    None,
}
impl NoteheadShape {
    const ALL: [NoteheadShape; 27] = [
        Self::Normal,
        Self::Diamond,
        Self::Triangle,
        Self::Slash,
        Self::Cross,
        Self::X,
        Self::CircleX,
        Self::InvertedTriangle,
        Self::Square,
        Self::ArrowDown,
        Self::ArrowUp,
        Self::Circled,
        Self::Slashed,
        Self::BackSlashed,
        Self::Cluster,
        Self::CircleDot,
        Self::LeftTriangle,
        Self::Rectangle,
        Self::Do,
        Self::Re,
        Self::Mi,
        Self::Fa,
        Self::FaUp,
        Self::So,
        Self::La,
        Self::Ti,
        Self::None,
    ];

    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Diamond => "diamond",
            Self::Triangle => "triangle",
            Self::Slash => "slash",
            Self::Cross => "cross",
            Self::X => "x",
            Self::CircleX => "circle-x",
            Self::InvertedTriangle => "inverted triangle",
            Self::Square => "square",
            Self::ArrowDown => "arrow down",
            Self::ArrowUp => "arrow up",
            Self::Circled => "circled",
            Self::Slashed => "slashed",
            Self::BackSlashed => "back slashed",
            Self::Cluster => "cluster",
            Self::CircleDot => "circle dot",
            Self::LeftTriangle => "left triangle",
            Self::Rectangle => "rectangle",
            Self::Do => "do",
            Self::Re => "re",
            Self::Mi => "mi",
            Self::Fa => "fa",
            Self::FaUp => "fa up",
            Self::So => "so",
            Self::La => "la",
            Self::Ti => "ti",
            Self::None => "none",
        }
    }
}
impl Display for NoteheadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.xml_name())
    }
}
impl FromStr for NoteheadShape {
    type Err = ScoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.xml_name() == s)
            .ok_or(ScoreError::UnknownNotehead(s.to_string()))
    }
}

/// Notehead shape with optional explicit filling.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Notehead {
    pub shape: NoteheadShape,
    pub filled: Option<bool>,
}
impl Notehead {
    pub fn new(shape: NoteheadShape, filled: Option<bool>) -> Self {
        Self { shape, filled }
    }
}
impl From<NoteheadShape> for Notehead {
    fn from(shape: NoteheadShape) -> Self {
        Self::new(shape, None)
    }
}
impl FromStr for Notehead {
    type Err = ScoreError;

    /// Shape name, optionally prefixed with "filled" or "open".
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::notation::{Notehead, NoteheadShape};
    /// let head: Notehead = "filled triangle".parse().unwrap();
    /// assert_eq!(head, Notehead::new(NoteheadShape::Triangle, Some(true)));
    /// let head: Notehead = "Open Mi".parse().unwrap();
    /// assert_eq!(head, Notehead::new(NoteheadShape::Mi, Some(false)));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let (filled, shape) = if let Some(shape) = name.strip_prefix("filled ") {
            (Some(true), shape)
        } else if let Some(shape) = name.strip_prefix("open ") {
            (Some(false), shape)
        } else {
            (None, name.as_str())
        };
        let shape = shape
            .parse()
            .map_err(|_| ScoreError::UnknownNotehead(s.to_string()))?;
        Ok(Self::new(shape, filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_noteheads() {
        assert_eq!(
            "inverted triangle".parse::<Notehead>().unwrap(),
            NoteheadShape::InvertedTriangle.into()
        );
        assert_eq!(
            "circle-x".parse::<NoteheadShape>().unwrap(),
            NoteheadShape::CircleX
        );
        assert!("filled blob".parse::<Notehead>().is_err());
        assert!("harmonic".parse::<Notehead>().is_err());
    }
}
