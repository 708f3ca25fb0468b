//! A smallest piece of music: note, chord, rest or bar rest.
use std::slice;

use fraction::Fraction;

use super::{
    duration::{BarRestDuration, Duration, Timed, TupletRatio},
    fraction_tools::zero,
    pitch::{parse_pitches, Pitch},
};
use crate::{
    error::{ScoreError, ScoreResult},
    notation::{Articulation, Direction, Notation, Notehead},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Tie {
    Start,
    /// Both stops the previous tie and starts the next one.
    Continue,
    Stop,
}
impl Tie {
    pub fn starts(&self) -> bool {
        matches!(self, Self::Start | Self::Continue)
    }
    pub fn stops(&self) -> bool {
        matches!(self, Self::Stop | Self::Continue)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Grace {
    pub slashed: bool,
}

/// One pitched member of a note or chord.
#[derive(Debug, PartialEq, Clone)]
pub struct Pitched {
    pub pitch: Pitch,
    pub tie: Option<Tie>,
    pub notehead: Option<Notehead>,
}
impl Pitched {
    pub fn new(pitch: Pitch) -> Self {
        Self {
            pitch,
            tie: None,
            notehead: None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum LeafKind {
    Rest,
    BarRest,
    Note(Pitched),
    /// At least two members, sharing the duration of the leaf.
    Chord(Vec<Pitched>),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LeafDuration {
    Notated(Duration),
    BarRest(BarRestDuration),
}
impl LeafDuration {
    pub fn notated(&self) -> Option<&Duration> {
        match self {
            Self::Notated(duration) => Some(duration),
            Self::BarRest(_) => None,
        }
    }
}
impl Timed for LeafDuration {
    fn written_length(&self) -> Fraction {
        match self {
            Self::Notated(d) => d.written_length(),
            Self::BarRest(d) => d.written_length(),
        }
    }
    fn true_length(&self) -> Fraction {
        match self {
            Self::Notated(d) => d.true_length(),
            Self::BarRest(d) => d.true_length(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Leaf {
    kind: LeafKind,
    duration: LeafDuration,
    notations: Vec<Notation>,
    articulations: Vec<Articulation>,
    directions: Vec<Direction>,
    stemless: bool,
    grace: Option<Grace>,
}
impl Leaf {
    fn new(kind: LeafKind, duration: LeafDuration) -> Self {
        Self {
            kind,
            duration,
            notations: Vec::new(),
            articulations: Vec::new(),
            directions: Vec::new(),
            stemless: false,
            grace: None,
        }
    }

    pub fn note(pitch: Pitch, duration: Duration) -> Self {
        Self::new(
            LeafKind::Note(Pitched::new(pitch)),
            LeafDuration::Notated(duration),
        )
    }

    pub fn rest(duration: Duration) -> Self {
        Self::new(LeafKind::Rest, LeafDuration::Notated(duration))
    }

    /// Rest filling a whole measure of `length` quarters.
    pub fn bar_rest(length: Fraction) -> Self {
        Self::new(
            LeafKind::BarRest,
            LeafDuration::BarRest(BarRestDuration::new(length)),
        )
    }

    /// # Returns
    /// Err(InvalidContent) if less than two pitches given.
    pub fn chord(pitches: Vec<Pitch>, duration: Duration) -> ScoreResult<Self> {
        if pitches.len() < 2 {
            return Err(ScoreError::InvalidContent(format!(
                "chord should have multiple pitches, got {}",
                pitches.len()
            )));
        }
        Ok(Self::new(
            LeafKind::Chord(pitches.into_iter().map(Pitched::new).collect()),
            LeafDuration::Notated(duration),
        ))
    }

    pub fn grace_note(pitch: Pitch, duration: Duration, slashed: bool) -> Self {
        let mut leaf = Self::note(pitch, duration);
        leaf.grace = Some(Grace { slashed });
        leaf
    }

    pub fn grace_chord(
        pitches: Vec<Pitch>,
        duration: Duration,
        slashed: bool,
    ) -> ScoreResult<Self> {
        Self::chord(pitches, duration)?.into_grace(slashed)
    }

    /// Turn a note or chord into a grace note.
    ///
    /// # Returns
    /// Err(InvalidContent) for rests.
    pub fn into_grace(mut self, slashed: bool) -> ScoreResult<Self> {
        if !self.is_pitched() {
            return Err(ScoreError::InvalidContent(
                "grace notes should be pitched".to_string(),
            ));
        }
        self.grace = Some(Grace { slashed });
        Ok(self)
    }

    /// Build note or chord from strings.
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::primitives::{Leaf, Timed};
    /// # use fraction::Fraction;
    /// let chord = Leaf::parse("c4 e4 g4", "dotted quarter").unwrap();
    /// assert_eq!(chord.members().len(), 3);
    /// assert_eq!(chord.true_length(), Fraction::new(3u64, 2u64));
    /// let note = Leaf::parse("bb3", "8").unwrap();
    /// assert_eq!(note.members().len(), 1);
    /// ```
    pub fn parse(pitches: &str, duration: &str) -> ScoreResult<Self> {
        let duration: Duration = duration.parse()?;
        let mut pitches = parse_pitches(pitches)?;
        match pitches.len() {
            0 => Err(ScoreError::InvalidPitch(String::new())),
            1 => Ok(Self::note(pitches.remove(0), duration)),
            _ => Self::chord(pitches, duration),
        }
    }

    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notations.push(notation);
        self
    }
    pub fn with_articulation(mut self, articulation: Articulation) -> Self {
        self.articulations.push(articulation);
        self
    }
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.directions.push(direction);
        self
    }
    pub fn with_tie(mut self, tie: Tie) -> Self {
        self.set_tie(Some(tie));
        self
    }
    pub fn with_notehead(mut self, notehead: Notehead) -> Self {
        self.members_mut()
            .iter_mut()
            .for_each(|member| member.notehead = Some(notehead));
        self
    }
    /// Per-member noteheads, one for each member.
    pub fn with_noteheads(
        mut self,
        noteheads: Vec<Option<Notehead>>,
    ) -> ScoreResult<Self> {
        let members = self.members_mut();
        check_members_count(members.len(), noteheads.len(), "noteheads")?;
        for (member, notehead) in members.iter_mut().zip(noteheads) {
            member.notehead = notehead;
        }
        Ok(self)
    }
    pub fn stemless(mut self) -> Self {
        self.stemless = true;
        self
    }

    /// Tie state for every member. Rests ignore ties.
    pub fn set_tie(&mut self, tie: Option<Tie>) -> &mut Self {
        self.members_mut()
            .iter_mut()
            .for_each(|member| member.tie = tie);
        self
    }
    /// Per-member tie states, one for each member.
    pub fn set_member_ties(
        &mut self,
        ties: Vec<Option<Tie>>,
    ) -> ScoreResult<&mut Self> {
        let members = self.members_mut();
        check_members_count(members.len(), ties.len(), "ties")?;
        for (member, tie) in members.iter_mut().zip(ties) {
            member.tie = tie;
        }
        Ok(self)
    }
    pub fn set_stemless(&mut self, stemless: bool) -> &mut Self {
        self.stemless = stemless;
        self
    }
    pub fn notations_mut(&mut self) -> &mut Vec<Notation> {
        &mut self.notations
    }
    pub fn articulations_mut(&mut self) -> &mut Vec<Articulation> {
        &mut self.articulations
    }
    pub fn directions_mut(&mut self) -> &mut Vec<Direction> {
        &mut self.directions
    }

    pub fn kind(&self) -> &LeafKind {
        &self.kind
    }
    pub fn leaf_duration(&self) -> &LeafDuration {
        &self.duration
    }
    /// Written duration, None for bar rests.
    pub fn duration(&self) -> Option<&Duration> {
        self.duration.notated()
    }
    /// Chord members share this duration.
    pub fn duration_mut(&mut self) -> Option<&mut Duration> {
        match &mut self.duration {
            LeafDuration::Notated(duration) => Some(duration),
            LeafDuration::BarRest(_) => None,
        }
    }
    pub fn notations(&self) -> &[Notation] {
        &self.notations
    }
    pub fn articulations(&self) -> &[Articulation] {
        &self.articulations
    }
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }
    pub fn is_stemless(&self) -> bool {
        self.stemless
    }
    pub fn grace(&self) -> Option<Grace> {
        self.grace
    }
    pub fn is_grace(&self) -> bool {
        self.grace.is_some()
    }
    pub fn is_bar_rest(&self) -> bool {
        self.kind == LeafKind::BarRest
    }
    pub fn is_rest(&self) -> bool {
        matches!(self.kind, LeafKind::Rest | LeafKind::BarRest)
    }
    pub fn is_pitched(&self) -> bool {
        !self.is_rest()
    }

    /// Pitched members: one for a note, several for a chord, none for rests.
    pub fn members(&self) -> &[Pitched] {
        match &self.kind {
            LeafKind::Note(member) => slice::from_ref(member),
            LeafKind::Chord(members) => members,
            LeafKind::Rest | LeafKind::BarRest => &[],
        }
    }
    pub fn members_mut(&mut self) -> &mut [Pitched] {
        match &mut self.kind {
            LeafKind::Note(member) => slice::from_mut(member),
            LeafKind::Chord(members) => members,
            LeafKind::Rest | LeafKind::BarRest => &mut [],
        }
    }

    /// True if any member starts (or continues) a tie.
    pub fn starts_tie(&self) -> bool {
        self.members()
            .iter()
            .any(|m| m.tie.map(|tie| tie.starts()).unwrap_or(false))
    }
    pub fn stops_tie(&self) -> bool {
        self.members()
            .iter()
            .any(|m| m.tie.map(|tie| tie.stops()).unwrap_or(false))
    }

    /// Number of beams the leaf takes part in. Rests are never beamed.
    pub fn num_beams(&self) -> u8 {
        match (&self.kind, &self.duration) {
            (LeafKind::Rest | LeafKind::BarRest, _) => 0,
            (_, LeafDuration::Notated(duration)) => duration.num_beams(),
            (_, LeafDuration::BarRest(_)) => 0,
        }
    }

    /// Leaf measured with its own duration.
    pub fn measured(&self) -> Measured<'_> {
        Measured {
            leaf: self,
            duration: self.duration,
        }
    }

    /// Leaf measured with the given tuplet ratio overlaid on
    /// its written duration.
    pub fn measured_with(&self, tuplet: Option<TupletRatio>) -> Measured<'_> {
        let duration = match (self.duration, tuplet) {
            (LeafDuration::Notated(duration), Some(_)) => {
                LeafDuration::Notated(duration.with_tuplet(tuplet))
            }
            (duration, _) => duration,
        };
        Measured {
            leaf: self,
            duration,
        }
    }
}
impl Timed for Leaf {
    fn written_length(&self) -> Fraction {
        self.measured().written_length()
    }
    fn true_length(&self) -> Fraction {
        self.measured().true_length()
    }
    fn min_denominator(&self) -> u64 {
        self.measured().min_denominator()
    }
}

fn check_members_count(
    members: usize,
    given: usize,
    what: &str,
) -> ScoreResult<()> {
    if members != given {
        return Err(ScoreError::InvalidContent(format!(
            "{given} {what} given for {members} chord members"
        )));
    }
    Ok(())
}

/// A leaf together with the duration it actually takes.
///
/// Grace notes take no time, whatever their written duration is.
#[derive(Debug, Clone, Copy)]
pub struct Measured<'a> {
    leaf: &'a Leaf,
    duration: LeafDuration,
}
impl<'a> Measured<'a> {
    pub fn leaf(&self) -> &'a Leaf {
        self.leaf
    }
    pub fn duration(&self) -> LeafDuration {
        self.duration
    }
}
impl<'a> Timed for Measured<'a> {
    fn written_length(&self) -> Fraction {
        self.duration.written_length()
    }
    fn true_length(&self) -> Fraction {
        match self.leaf.is_grace() {
            true => zero(),
            false => self.duration.true_length(),
        }
    }
    fn min_denominator(&self) -> u64 {
        match self.leaf.is_grace() {
            true => 1,
            false => self.duration.min_denominator(),
        }
    }
}
