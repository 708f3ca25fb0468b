use std::{fmt::Display, str::FromStr};

use crate::error::{ScoreError, ScoreResult};

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Eq, Hash)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}
impl Step {
    fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'c' => Some(Self::C),
            'd' => Some(Self::D),
            'e' => Some(Self::E),
            'f' => Some(Self::F),
            'g' => Some(Self::G),
            'a' => Some(Self::A),
            'b' => Some(Self::B),
            _ => None,
        }
    }
}
impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Written pitch. `alter` is in semitones, quarter tones allowed.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Pitch {
    step: Step,
    octave: i8,
    alter: f32,
}
impl Pitch {
    pub fn new(step: Step, octave: i8, alter: f32) -> Self {
        Self {
            step,
            octave,
            alter,
        }
    }
    pub fn step(&self) -> Step {
        self.step
    }
    pub fn octave(&self) -> i8 {
        self.octave
    }
    pub fn alter(&self) -> f32 {
        self.alter
    }
    /// Alteration as written in the document: "0", "-1", "0.5".
    pub fn alter_string(&self) -> String {
        if self.alter.fract() == 0.0 {
            format!("{}", self.alter as i32)
        } else {
            format!("{}", self.alter)
        }
    }
}
impl FromStr for Pitch {
    type Err = ScoreError;

    /// Parse either "C#5" / "bb4" style or lilypond style "cs'", "gqf,".
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::primitives::{Pitch, Step};
    /// let pitch: Pitch = "cs'".parse().unwrap();
    /// assert_eq!(pitch, Pitch::new(Step::C, 4, 1.0));
    /// let pitch: Pitch = "Bb3".parse().unwrap();
    /// assert_eq!(pitch, Pitch::new(Step::B, 3, -1.0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pitch(s).ok_or(ScoreError::InvalidPitch(s.to_string()))
    }
}

fn parse_pitch(s: &str) -> Option<Pitch> {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    let step = Step::from_char(chars.next()?)?;
    let rest = chars.as_str();
    let (alter, octave_str) = if let Some(octave) =
        strip_any(rest, &["qb", "qf"])
    {
        (-0.5, octave)
    } else if let Some(octave) = strip_any(rest, &["q#", "qs"]) {
        (0.5, octave)
    } else if let Some(octave) = strip_any(rest, &["b", "f"]) {
        (-1.0, octave)
    } else if let Some(octave) = strip_any(rest, &["#", "s"]) {
        (1.0, octave)
    } else {
        (0.0, rest)
    };
    let octave = parse_octave(octave_str)?;
    Some(Pitch::new(step, octave, alter))
}

fn strip_any<'a>(s: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| s.strip_prefix(prefix))
}

fn parse_octave(s: &str) -> Option<i8> {
    if let Ok(octave) = s.parse::<i8>() {
        return Some(octave);
    }
    if s.chars().all(|ch| ch == '\'') {
        return Some(3 + s.len() as i8);
    }
    if s.chars().all(|ch| ch == ',') {
        return Some(3 - s.len() as i8);
    }
    None
}

/// Parse several space-separated pitches, used for chords.
pub fn parse_pitches(s: &str) -> ScoreResult<Vec<Pitch>> {
    s.split_whitespace().map(|p| p.parse()).collect()
}
