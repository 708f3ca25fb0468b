//! Measure: voices of leaves and groups, attributes and freely placed
//! directions.

use std::{fmt::Display, str::FromStr};

use fraction::Fraction;
use log::debug;

use super::{
    duration::Timed,
    fraction_tools::{
        denom, largest_power_of_two_multiplier, lcm, lcm_all,
        limit_denominator, zero,
    },
    group::Group,
    leaf::{Leaf, Measured},
};
use crate::{error::ScoreError, notation::Direction, settings::ExportSettings};

/// Element of a voice: a loose leaf or a group.
#[derive(Debug, PartialEq, Clone)]
pub enum VoiceItem {
    Leaf(Leaf),
    Group(Group),
}
impl VoiceItem {
    /// Leaves of the item, measured the way they sound.
    pub fn measured(&self) -> Vec<Measured<'_>> {
        match self {
            Self::Leaf(leaf) => vec![leaf.measured()],
            Self::Group(group) => group.measured().collect(),
        }
    }
}
impl From<Leaf> for VoiceItem {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}
impl From<Group> for VoiceItem {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}
impl Timed for VoiceItem {
    fn written_length(&self) -> Fraction {
        match self {
            Self::Leaf(leaf) => leaf.written_length(),
            Self::Group(group) => group.written_length(),
        }
    }
    fn true_length(&self) -> Fraction {
        match self {
            Self::Leaf(leaf) => leaf.true_length(),
            Self::Group(group) => group.true_length(),
        }
    }
    fn min_denominator(&self) -> u64 {
        match self {
            Self::Leaf(leaf) => leaf.min_denominator(),
            Self::Group(group) => group.min_denominator(),
        }
    }
    /// Sum of the ticks of every leaf, each rounded on its own.
    fn length_in_ticks(&self, divisions: u64) -> u64 {
        self.measured()
            .iter()
            .map(|m| m.length_in_ticks(divisions))
            .sum()
    }
}

pub type Voice = Vec<VoiceItem>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_type: u32,
}
impl TimeSignature {
    pub fn new(beats: u32, beat_type: u32) -> Self {
        Self { beats, beat_type }
    }
    /// Length in quarters.
    pub fn length(&self) -> Fraction {
        Fraction::new(self.beats as u64 * 4, self.beat_type.max(1) as u64)
    }
}
impl Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ClefSign {
    G,
    F,
    C,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Clef {
    pub sign: ClefSign,
    pub line: u8,
    pub octave_change: i8,
}
impl Clef {
    pub fn new(sign: ClefSign, line: u8) -> Self {
        Self {
            sign,
            line,
            octave_change: 0,
        }
    }
    pub fn with_octave_change(mut self, octaves: i8) -> Self {
        self.octave_change = octaves;
        self
    }
}
impl FromStr for Clef {
    type Err = ScoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, line) = match s.to_lowercase().as_str() {
            "treble" => (ClefSign::G, 2),
            "bass" => (ClefSign::F, 4),
            "alto" => (ClefSign::C, 3),
            "tenor" => (ClefSign::C, 4),
            "soprano" => (ClefSign::C, 1),
            "mezzo-soprano" => (ClefSign::C, 2),
            "baritone" => (ClefSign::F, 3),
            _ => return Err(ScoreError::UnknownClef(s.to_string())),
        };
        Ok(Self::new(sign, line))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Barline {
    Regular,
    Dotted,
    Dashed,
    Heavy,
    LightLight,
    LightHeavy,
    HeavyLight,
    HeavyHeavy,
    Tick,
    Short,
    None,
}
impl Barline {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Dotted => "dotted",
            Self::Dashed => "dashed",
            Self::Heavy => "heavy",
            Self::LightLight => "light-light",
            Self::LightHeavy => "light-heavy",
            Self::HeavyLight => "heavy-light",
            Self::HeavyHeavy => "heavy-heavy",
            Self::Tick => "tick",
            Self::Short => "short",
            Self::None => "none",
        }
    }
}
impl FromStr for Barline {
    type Err = ScoreError;

    /// Accepts document names and the aliases "double" and "end".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "double" | "light-light" => Self::LightLight,
            "end" | "light-heavy" => Self::LightHeavy,
            "regular" => Self::Regular,
            "dotted" => Self::Dotted,
            "dashed" => Self::Dashed,
            "heavy" => Self::Heavy,
            "heavy-light" => Self::HeavyLight,
            "heavy-heavy" => Self::HeavyHeavy,
            "tick" => Self::Tick,
            "short" => Self::Short,
            "none" => Self::None,
            _ => return Err(ScoreError::UnknownBarline(s.to_string())),
        })
    }
}

/// Position of a leaf inside a measure.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct LeafKey {
    /// Voice index, from 0.
    pub voice: usize,
    /// Index of the item in the voice.
    pub item: usize,
    /// Index inside the group, if the item is a group.
    pub member: Option<usize>,
}

/// Leaf visited in time order.
#[derive(Debug, Clone, Copy)]
pub struct LeafRef<'a> {
    pub key: LeafKey,
    pub start: Fraction,
    pub measured: Measured<'a>,
}
impl<'a> LeafRef<'a> {
    pub fn leaf(&self) -> &'a Leaf {
        self.measured.leaf()
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Measure {
    voices: Vec<Option<Voice>>,
    time_signature: Option<TimeSignature>,
    clef: Option<Clef>,
    barline: Option<Barline>,
    staves: Option<u8>,
    directions: Vec<(Direction, Fraction)>,
}
impl Measure {
    /// Measure of a single voice.
    pub fn new(items: Vec<VoiceItem>) -> Self {
        Self::with_voices(vec![Some(items)])
    }

    /// `None` voices are intentionally empty: voice numbers of the
    /// following voices are kept.
    pub fn with_voices(voices: Vec<Option<Voice>>) -> Self {
        Self {
            voices,
            ..Default::default()
        }
    }

    pub fn with_time_signature(mut self, beats: u32, beat_type: u32) -> Self {
        self.time_signature = Some(TimeSignature::new(beats, beat_type));
        self
    }
    pub fn with_clef(mut self, clef: Clef) -> Self {
        self.clef = Some(clef);
        self
    }
    pub fn with_barline(mut self, barline: Barline) -> Self {
        self.barline = Some(barline);
        self
    }
    pub fn with_staves(mut self, staves: u8) -> Self {
        self.staves = Some(staves);
        self
    }
    /// Place direction at `displacement` quarters from the measure start.
    /// Negative displacements are clamped to the measure start.
    pub fn with_direction_at(
        mut self,
        direction: Direction,
        displacement: Fraction,
    ) -> Self {
        let displacement = match displacement < zero() {
            true => {
                debug!("direction displaced by {displacement}, placed at 0");
                zero()
            }
            false => displacement,
        };
        self.directions.push((direction, displacement));
        self
    }

    pub fn voices(&self) -> &[Option<Voice>] {
        &self.voices
    }
    pub fn voices_mut(&mut self) -> &mut Vec<Option<Voice>> {
        &mut self.voices
    }
    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.time_signature
    }
    pub fn clef(&self) -> Option<Clef> {
        self.clef
    }
    pub fn barline(&self) -> Option<Barline> {
        self.barline
    }
    pub fn staves(&self) -> Option<u8> {
        self.staves
    }
    pub fn directions(&self) -> &[(Direction, Fraction)] {
        &self.directions
    }
    pub fn set_time_signature(
        &mut self,
        time_signature: Option<TimeSignature>,
    ) -> &mut Self {
        self.time_signature = time_signature;
        self
    }
    pub fn set_clef(&mut self, clef: Option<Clef>) -> &mut Self {
        self.clef = clef;
        self
    }
    pub fn set_barline(&mut self, barline: Option<Barline>) -> &mut Self {
        self.barline = barline;
        self
    }
    pub fn directions_mut(&mut self) -> &mut Vec<(Direction, Fraction)> {
        &mut self.directions
    }

    /// Populated voices with their indices.
    pub fn populated_voices(&self) -> impl Iterator<Item = (usize, &Voice)> {
        self.voices
            .iter()
            .enumerate()
            .filter_map(|(idx, voice)| voice.as_ref().map(|v| (idx, v)))
    }

    /// Subdivisions of a quarter that represent every leaf exactly.
    pub fn base_divisions(&self) -> u64 {
        lcm_all(
            self.populated_voices()
                .flat_map(|(_, voice)| voice.iter())
                .map(|item| item.min_denominator()),
        )
    }

    /// Divisions per quarter used by the measure.
    ///
    /// Leaves are always represented exactly. Displaced directions are
    /// too, unless that pushes divisions over the ceiling: then the base
    /// is multiplied by the largest power of two fitting under it, and
    /// directions land on the nearest tick.
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use musicxml_score::primitives::{Measure, Leaf};
    /// # use musicxml_score::notation::Direction;
    /// # use musicxml_score::ExportSettings;
    /// let measure = Measure::new(vec![
    ///     Leaf::parse("c4", "dotted quarter").unwrap().into(),
    ///     Leaf::parse("c4", "8").unwrap().into(),
    /// ])
    /// .with_direction_at(Direction::text("rit."), Fraction::new(1u64, 3u64));
    /// assert_eq!(measure.base_divisions(), 2);
    /// assert_eq!(measure.divisions(&ExportSettings::default()), 6);
    /// ```
    pub fn divisions(&self, settings: &ExportSettings) -> u64 {
        let base = self.base_divisions();
        if self.directions.is_empty() {
            return base;
        }
        let directions = lcm_all(self.directions.iter().map(|(_, pos)| {
            denom(&limit_denominator(
                *pos,
                settings.displacement_denominator_limit,
            ))
        }));
        let ideal = lcm(base, directions);
        if ideal <= settings.divisions_ceiling {
            return ideal;
        }
        let clamped = base
            * largest_power_of_two_multiplier(
                base,
                settings.divisions_ceiling,
            );
        debug!(
            "ideal divisions {ideal} exceed {}, using {clamped}: \
            directions are placed on the nearest tick",
            settings.divisions_ceiling
        );
        clamped
    }

    /// All leaves of populated voices, ordered by start time.
    ///
    /// On equal starts the shorter leaf goes first, then the lower voice.
    pub fn leaves_in_time_order(&self) -> Vec<LeafRef<'_>> {
        let queues: Vec<(usize, Vec<(LeafKey, Measured<'_>)>)> = self
            .populated_voices()
            .map(|(idx, voice)| (idx, flatten_voice(idx, voice)))
            .filter(|(_, leaves)| !leaves.is_empty())
            .collect();
        let mut cursors = vec![(0usize, zero()); queues.len()];
        let mut result = Vec::new();
        loop {
            let next = queues
                .iter()
                .enumerate()
                .filter(|(q_idx, (_, leaves))| {
                    cursors[*q_idx].0 < leaves.len()
                })
                .min_by(|(a_idx, (_, a)), (b_idx, (_, b))| {
                    let (a_pos, a_start) = cursors[*a_idx];
                    let (b_pos, b_start) = cursors[*b_idx];
                    (a_start, a[a_pos].1.true_length())
                        .partial_cmp(&(b_start, b[b_pos].1.true_length()))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(q_idx, _)| q_idx);
            let Some(q_idx) = next else {
                break;
            };
            let (pos, start) = cursors[q_idx];
            let (key, measured) = queues[q_idx].1[pos];
            cursors[q_idx] = (pos + 1, start + measured.true_length());
            result.push(LeafRef {
                key,
                start,
                measured,
            });
        }
        result
    }
}

fn flatten_voice(
    voice_idx: usize,
    voice: &Voice,
) -> Vec<(LeafKey, Measured<'_>)> {
    voice
        .iter()
        .enumerate()
        .flat_map(|(item_idx, item)| {
            let grouped = matches!(item, VoiceItem::Group(_));
            item.measured()
                .into_iter()
                .enumerate()
                .map(move |(member, measured)| {
                    (
                        LeafKey {
                            voice: voice_idx,
                            item: item_idx,
                            member: grouped.then_some(member),
                        },
                        measured,
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::*;
    use crate::primitives::{Duration, NoteType, TupletRatio};

    fn note(duration: &str) -> VoiceItem {
        Leaf::parse("c4", duration).unwrap().into()
    }

    #[test]
    fn clefs_and_barlines() {
        assert_eq!("treble".parse::<Clef>().unwrap(), Clef::new(ClefSign::G, 2));
        assert_eq!(
            "Mezzo-Soprano".parse::<Clef>().unwrap(),
            Clef::new(ClefSign::C, 2)
        );
        assert!("violin".parse::<Clef>().is_err());
        assert_eq!("double".parse::<Barline>().unwrap(), Barline::LightLight);
        assert_eq!("end".parse::<Barline>().unwrap(), Barline::LightHeavy);
        assert!("thick".parse::<Barline>().is_err());
    }

    #[test]
    fn divisions_ceiling() {
        let triplet = Group::tuplet(
            vec![
                Leaf::parse("c4", "8").unwrap(),
                Leaf::parse("c4", "8").unwrap(),
                Leaf::parse("c4", "8").unwrap(),
            ],
            TupletRatio::new(3, 2).unwrap(),
        )
        .unwrap();
        let measure = Measure::new(vec![triplet.into(), note("2.")])
            .with_direction_at(Direction::text("a"), Fraction::new(1u64, 125u64))
            .with_direction_at(Direction::text("b"), Fraction::new(1u64, 8u64));
        assert_eq!(measure.base_divisions(), 3);
        // lcm(3, 1000) is over the ceiling
        assert_eq!(measure.divisions(&ExportSettings::default()), 768);
    }

    #[test]
    fn empty_measure_divisions() {
        let measure = Measure::with_voices(vec![None, None]);
        assert_eq!(measure.divisions(&ExportSettings::default()), 1);
        assert!(measure.leaves_in_time_order().is_empty());
    }

    #[test]
    fn time_order() {
        let half = note("half");
        let measure = Measure::with_voices(vec![
            Some(vec![half.clone(), half]),
            None,
            Some(vec![
                note("quarter"),
                Group::beamed(vec![
                    Leaf::parse("d4", "8").unwrap(),
                    Leaf::parse("e4", "8").unwrap(),
                ])
                .unwrap()
                .into(),
                VoiceItem::Leaf(Leaf::rest(Duration::from(NoteType::Half))),
            ]),
        ]);
        let keys = measure
            .leaves_in_time_order()
            .iter()
            .map(|r| (r.key.voice, r.key.item, r.key.member))
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                (2, 0, None),
                (0, 0, None),
                (2, 1, Some(0)),
                (2, 1, Some(1)),
                (0, 1, None),
                (2, 2, None),
            ]
        );
    }
}
