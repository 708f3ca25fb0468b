//! Written and sounding lengths of notated symbols.
//!
//! A [Duration] is always something that can be written as a single
//! notehead: a [NoteType] from the power-of-two ladder, a number of dots and
//! an optional [TupletRatio]. Lengths are exact fractions of a quarter note.
//!
//! Lengths that do not resolve to a single symbol (5/4 of a quarter, for
//! instance) are rejected here. Tying several symbols together is up to the
//! caller.

use std::{fmt::Display, str::FromStr};

use fraction::Fraction;

use super::fraction_tools::{denom, round_half_even, whole};
use crate::error::{ScoreError, ScoreResult};

/// Default maximum of dots used when decomposing lengths.
pub static MAX_DOTS: u8 = 4;

/// Anything that occupies time in a measure.
pub trait Timed {
    /// Written length in quarter notes.
    fn written_length(&self) -> Fraction;
    /// Length in quarter notes after tuplet modification.
    fn true_length(&self) -> Fraction;
    /// Smallest subdivision of a quarter note that represents
    /// the true length exactly.
    ///
    /// A triplet quarter has min_denominator 3, since it is 2/3 of a
    /// quarter.
    fn min_denominator(&self) -> u64 {
        denom(&self.true_length())
    }
    /// Length in ticks of `divisions` per quarter note.
    fn length_in_ticks(&self, divisions: u64) -> u64 {
        round_half_even(self.true_length() * whole(divisions))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum NoteType {
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    N16th,
    N32nd,
    N64th,
    N128th,
    N256th,
    N512th,
    N1024th,
}
impl NoteType {
    /// From the longest to the shortest.
    pub const LADDER: [NoteType; 12] = [
        Self::Breve,
        Self::Whole,
        Self::Half,
        Self::Quarter,
        Self::Eighth,
        Self::N16th,
        Self::N32nd,
        Self::N64th,
        Self::N128th,
        Self::N256th,
        Self::N512th,
        Self::N1024th,
    ];

    fn ladder_index(&self) -> u32 {
        *self as u32
    }

    /// Length in quarter notes.
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use musicxml_score::primitives::NoteType;
    /// assert_eq!(NoteType::Breve.length(), Fraction::new(8u64, 1u64));
    /// assert_eq!(NoteType::N16th.length(), Fraction::new(1u64, 4u64));
    /// ```
    pub fn length(&self) -> Fraction {
        // breve is 8 quarters, every next step halves.
        Fraction::new(8u64, 2u64.pow(self.ladder_index()))
    }

    pub fn from_length(length: Fraction) -> Option<Self> {
        Self::LADDER.into_iter().find(|nt| nt.length() == length)
    }

    /// Number of this note type fitting in a whole note.
    ///
    /// Breve has no integer divisor.
    pub fn divisor(&self) -> Option<u64> {
        match self {
            Self::Breve => None,
            _ => Some(2u64.pow(self.ladder_index() - 1)),
        }
    }

    pub fn from_divisor(divisor: u64) -> Option<Self> {
        Self::LADDER
            .into_iter()
            .find(|nt| nt.divisor() == Some(divisor))
    }

    pub fn num_beams(&self) -> u8 {
        self.ladder_index().saturating_sub(3) as u8
    }

    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Breve => "breve",
            Self::Whole => "whole",
            Self::Half => "half",
            Self::Quarter => "quarter",
            Self::Eighth => "eighth",
            Self::N16th => "16th",
            Self::N32nd => "32nd",
            Self::N64th => "64th",
            Self::N128th => "128th",
            Self::N256th => "256th",
            Self::N512th => "512th",
            Self::N1024th => "1024th",
        }
    }
}
impl Display for NoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.xml_name())
    }
}
impl FromStr for NoteType {
    type Err = ScoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LADDER
            .into_iter()
            .find(|nt| nt.xml_name() == s)
            .ok_or(ScoreError::InvalidDuration(s.to_string()))
    }
}

/// `actual` notes in the time of `normal` notes, optionally of
/// an explicit normal note type.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TupletRatio {
    actual: u32,
    normal: u32,
    normal_type: Option<NoteType>,
}
impl TupletRatio {
    pub fn new(actual: u32, normal: u32) -> ScoreResult<Self> {
        if actual == 0 || normal == 0 {
            return Err(ScoreError::MalformedTuplet(format!(
                "{actual}:{normal}"
            )));
        }
        Ok(Self {
            actual,
            normal,
            normal_type: None,
        })
    }
    /// Ratio with explicit normal note type, given as its length in
    /// quarters (e.g. 4 in the space of 3 eighths is `(4, 3, 1/2)`).
    pub fn with_normal_length(
        actual: u32,
        normal: u32,
        normal_length: Fraction,
    ) -> ScoreResult<Self> {
        let normal_type = NoteType::from_length(normal_length).ok_or(
            ScoreError::MalformedTuplet(format!(
                "normal note type of length {normal_length} is not a \
                standard power of two length"
            )),
        )?;
        Ok(Self {
            normal_type: Some(normal_type),
            ..Self::new(actual, normal)?
        })
    }
    pub fn actual(&self) -> u32 {
        self.actual
    }
    pub fn normal(&self) -> u32 {
        self.normal
    }
    pub fn normal_type(&self) -> Option<NoteType> {
        self.normal_type
    }
    /// Factor applied to written lengths: `normal / actual`.
    pub fn modification(&self) -> Fraction {
        Fraction::new(self.normal as u64, self.actual as u64)
    }
}

/// `(2^(d+1) - 1) / 2^d`: 1 for no dots, 3/2 for one dot, 7/4 for two...
pub fn dot_multiplier(dots: u8) -> Fraction {
    let power = 2u64.pow(dots as u32);
    Fraction::new(power * 2 - 1, power)
}

/// Find note type and number of dots for the given written length.
///
/// # Returns
/// - (note_type, 0) if length is on the ladder.
/// - (note_type, dots) for the fewest dots resolving the length.
/// - Err(UnrepresentableDuration) if more than `max_dots` would be needed.
///
/// `max_dots` above [MAX_DOTS] is clamped to it.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use musicxml_score::primitives::{decompose, NoteType};
/// assert_eq!(
///     decompose(Fraction::new(3u64, 2u64), 4).unwrap(),
///     (NoteType::Quarter, 1)
/// );
/// assert_eq!(
///     decompose(Fraction::new(15u64, 8u64), 4).unwrap(),
///     (NoteType::Quarter, 3)
/// );
/// assert!(decompose(Fraction::new(5u64, 4u64), 4).is_err());
/// ```
pub fn decompose(length: Fraction, max_dots: u8) -> ScoreResult<(NoteType, u8)> {
    let max_dots = max_dots.min(MAX_DOTS);
    (0..=max_dots)
        .find_map(|dots| {
            NoteType::from_length(length / dot_multiplier(dots))
                .map(|note_type| (note_type, dots))
        })
        .ok_or(ScoreError::UnrepresentableDuration { length, max_dots })
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Duration {
    note_type: NoteType,
    dots: u8,
    tuplet: Option<TupletRatio>,
}
impl Duration {
    /// Fails with `UnrepresentableDuration` for more than [MAX_DOTS] dots.
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::primitives::{Duration, NoteType, MAX_DOTS};
    /// assert!(Duration::new(NoteType::Half, MAX_DOTS).is_ok());
    /// assert!(Duration::new(NoteType::Half, MAX_DOTS + 1).is_err());
    /// ```
    pub fn new(note_type: NoteType, dots: u8) -> ScoreResult<Self> {
        check_dots(note_type, dots)?;
        Ok(Self::unchecked(note_type, dots))
    }

    fn unchecked(note_type: NoteType, dots: u8) -> Self {
        Self {
            note_type,
            dots,
            tuplet: None,
        }
    }

    pub fn from_written_length(length: Fraction) -> ScoreResult<Self> {
        Self::from_written_length_with_max_dots(length, MAX_DOTS)
    }

    pub fn from_written_length_with_max_dots(
        length: Fraction,
        max_dots: u8,
    ) -> ScoreResult<Self> {
        let (note_type, dots) = decompose(length, max_dots)?;
        Ok(Self::unchecked(note_type, dots))
    }

    /// Construct from divisor of a whole note: 4 = quarter, 8 = eighth...
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use musicxml_score::primitives::{Duration, Timed};
    /// let dotted_eighth = Duration::from_divisor(8, 1, None).unwrap();
    /// assert_eq!(dotted_eighth.written_length(), Fraction::new(3u64, 4u64));
    /// assert!(Duration::from_divisor(6, 0, None).is_err());
    /// ```
    pub fn from_divisor(
        divisor: u64,
        dots: u8,
        tuplet: Option<TupletRatio>,
    ) -> ScoreResult<Self> {
        let note_type = NoteType::from_divisor(divisor)
            .ok_or(ScoreError::InvalidDivisor(divisor))?;
        Ok(Self::new(note_type, dots)?.with_tuplet(tuplet))
    }

    pub fn with_tuplet(mut self, tuplet: Option<TupletRatio>) -> Self {
        self.tuplet = tuplet;
        self
    }

    pub fn note_type(&self) -> NoteType {
        self.note_type
    }
    pub fn dots(&self) -> u8 {
        self.dots
    }
    pub fn tuplet(&self) -> Option<TupletRatio> {
        self.tuplet
    }
    pub fn set_tuplet(&mut self, tuplet: Option<TupletRatio>) -> &mut Self {
        self.tuplet = tuplet;
        self
    }
    pub fn set_dots(&mut self, dots: u8) -> ScoreResult<&mut Self> {
        check_dots(self.note_type, dots)?;
        self.dots = dots;
        Ok(self)
    }
    pub fn set_note_type(&mut self, note_type: NoteType) -> &mut Self {
        self.note_type = note_type;
        self
    }

    pub fn num_beams(&self) -> u8 {
        self.note_type.num_beams()
    }
}
impl Timed for Duration {
    fn written_length(&self) -> Fraction {
        self.note_type.length() * dot_multiplier(self.dots)
    }
    fn true_length(&self) -> Fraction {
        match &self.tuplet {
            None => self.written_length(),
            Some(ratio) => self.written_length() * ratio.modification(),
        }
    }
}
impl FromStr for Duration {
    type Err = ScoreError;

    /// Parses "quarter", "dotted eighth", "16.", "8..".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ScoreError::InvalidDuration(s.to_string());
        if let Ok(note_type) = s.parse::<NoteType>() {
            return Ok(note_type.into());
        }
        if let Some(rest) = s.strip_prefix("dotted ") {
            let note_type = rest.parse::<NoteType>().map_err(|_| err())?;
            return Ok(Self::unchecked(note_type, 1));
        }
        let trimmed = s.trim_end_matches('.');
        let dots = (s.len() - trimmed.len()) as u8;
        let divisor = trimmed.parse::<u64>().map_err(|_| err())?;
        Self::from_divisor(divisor, dots, None).map_err(|_| err())
    }
}

impl From<NoteType> for Duration {
    fn from(note_type: NoteType) -> Self {
        Self::unchecked(note_type, 0)
    }
}

fn check_dots(note_type: NoteType, dots: u8) -> ScoreResult<()> {
    if dots <= MAX_DOTS {
        return Ok(());
    }
    // past 32 dots the multiplier no longer fits u64 products
    Err(ScoreError::UnrepresentableDuration {
        length: note_type.length() * dot_multiplier(dots.min(32)),
        max_dots: MAX_DOTS,
    })
}

/// Duration of a whole-measure rest, which may have a length no single
/// notehead can express (e.g. 5 quarters).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BarRestDuration {
    length: Fraction,
}
impl BarRestDuration {
    pub fn new(length: Fraction) -> Self {
        Self { length }
    }
    pub fn length(&self) -> Fraction {
        self.length
    }
}
impl Timed for BarRestDuration {
    fn written_length(&self) -> Fraction {
        self.length
    }
    fn true_length(&self) -> Fraction {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::*;

    #[test]
    fn ladder() {
        assert_eq!(NoteType::N1024th.length(), Fraction::new(1u64, 256u64));
        assert_eq!(NoteType::Whole.divisor(), Some(1));
        assert_eq!(NoteType::N1024th.divisor(), Some(1024));
        assert_eq!(NoteType::Breve.divisor(), None);
        assert_eq!(NoteType::Quarter.num_beams(), 0);
        assert_eq!(NoteType::Eighth.num_beams(), 1);
        assert_eq!(NoteType::N1024th.num_beams(), 8);
        assert_eq!(NoteType::Breve.num_beams(), 0);
    }

    #[test]
    fn dots() {
        assert_eq!(dot_multiplier(0), Fraction::new(1u64, 1u64));
        assert_eq!(dot_multiplier(1), Fraction::new(3u64, 2u64));
        assert_eq!(dot_multiplier(2), Fraction::new(7u64, 4u64));
        assert_eq!(dot_multiplier(4), Fraction::new(31u64, 16u64));
    }

    #[test]
    fn lengths() {
        let triplet = Duration::from(NoteType::Quarter)
            .with_tuplet(Some(TupletRatio::new(3, 2).unwrap()));
        assert_eq!(triplet.written_length(), Fraction::new(1u64, 1u64));
        assert_eq!(triplet.true_length(), Fraction::new(2u64, 3u64));
        assert_eq!(triplet.min_denominator(), 3);
        assert_eq!(triplet.length_in_ticks(3), 2);
        let dotted = Duration::new(NoteType::Quarter, 1).unwrap();
        assert_eq!(dotted.min_denominator(), 2);
        assert_eq!(dotted.length_in_ticks(8), 12);
    }

    #[test]
    fn dot_count_is_checked() {
        assert!(matches!(
            Duration::new(NoteType::Quarter, 5),
            Err(ScoreError::UnrepresentableDuration { max_dots: 4, .. })
        ));
        assert!(Duration::new(NoteType::Quarter, u8::MAX).is_err());

        let mut duration = Duration::new(NoteType::Eighth, 4).unwrap();
        assert!(duration.set_dots(5).is_err());
        assert_eq!(duration.dots(), 4);
        duration.set_dots(2).unwrap();
        assert_eq!(duration.written_length(), Fraction::new(7u64, 8u64));
        assert!("4.....".parse::<Duration>().is_err());
    }

    #[test]
    fn decompose_limits() {
        // double dotted half, needs 2 dots
        let length = Fraction::new(7u64, 2u64);
        assert_eq!(decompose(length, 2).unwrap(), (NoteType::Half, 2));
        assert!(decompose(length, 1).is_err());
        assert!(decompose(Fraction::new(16u64, 1u64), 4).is_err());
        // five dots on a whole note, beyond the hard limit
        let five_dots = Fraction::new(63u64, 8u64);
        assert!(decompose(five_dots, 8).is_err());
    }

    #[test]
    fn parse() {
        assert_eq!(
            "quarter".parse::<Duration>().unwrap(),
            Duration::from(NoteType::Quarter)
        );
        assert_eq!(
            "dotted eighth".parse::<Duration>().unwrap(),
            Duration::new(NoteType::Eighth, 1).unwrap()
        );
        assert_eq!(
            "16.".parse::<Duration>().unwrap(),
            Duration::new(NoteType::N16th, 1).unwrap()
        );
        assert!("12".parse::<Duration>().is_err());
        assert!("dotted crotchet".parse::<Duration>().is_err());
    }

    #[test]
    fn malformed_tuplet() {
        assert!(TupletRatio::new(0, 2).is_err());
        assert!(TupletRatio::with_normal_length(
            4,
            3,
            Fraction::new(3u64, 8u64)
        )
        .is_err());
        let ratio = TupletRatio::with_normal_length(
            4,
            3,
            Fraction::new(1u64, 2u64),
        )
        .unwrap();
        assert_eq!(ratio.normal_type(), Some(NoteType::Eighth));
    }
}
