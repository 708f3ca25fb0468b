//! Measure assembly: voices and freely placed directions multiplexed into
//! one linear stream of events.
//!
//! Voices are laid out one after another. Before every voice but the first
//! the cursor is moved back to the measure start with a backup. Displaced
//! directions go last, each reached by a backup or forward from the
//! current cursor.

use crate::{
    notation::Direction,
    primitives::{
        fraction_tools::{round_half_even, whole, zero},
        BeamMap, Leaf, LeafDuration, LeafKey, Measure, Measured, Timed,
        TupletBracket, VoiceItem,
    },
    settings::ExportSettings,
};

/// Note (or rest, or chord) with everything resolved for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent<'a> {
    pub key: LeafKey,
    pub leaf: &'a Leaf,
    /// Duration with the ratio of the enclosing tuplet.
    pub duration: LeafDuration,
    /// Voice number, from 1.
    pub voice: usize,
    pub beams: BeamMap,
    pub tuplet_bracket: Option<TupletBracket>,
    pub ticks: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeasureEvent<'a> {
    Note(NoteEvent<'a>),
    Backup(u64),
    Forward(u64),
    Direction(&'a Direction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureLayout<'a> {
    pub divisions: u64,
    pub events: Vec<MeasureEvent<'a>>,
}
impl<'a> MeasureLayout<'a> {
    pub fn notes(&self) -> impl Iterator<Item = &NoteEvent<'a>> {
        self.events.iter().filter_map(|event| match event {
            MeasureEvent::Note(note) => Some(note),
            _ => None,
        })
    }
}

impl Measure {
    pub fn layout(&self, settings: &ExportSettings) -> MeasureLayout<'_> {
        self.layout_with_divisions(self.divisions(settings))
    }

    /// Lay out with explicit divisions per quarter.
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::primitives::{Leaf, Measure};
    /// # use musicxml_score::layout::MeasureEvent;
    /// let measure = Measure::with_voices(vec![
    ///     Some(vec![Leaf::parse("c5", "1").unwrap().into()]),
    ///     Some(vec![
    ///         Leaf::parse("c4", "2").unwrap().into(),
    ///         Leaf::parse("d4", "2").unwrap().into(),
    ///     ]),
    /// ]);
    /// let layout = measure.layout_with_divisions(480);
    /// assert_eq!(layout.events[1], MeasureEvent::Backup(1920));
    /// assert_eq!(layout.events.len(), 4);
    /// ```
    pub fn layout_with_divisions(&self, divisions: u64) -> MeasureLayout<'_> {
        let mut events = Vec::new();
        let mut cursor = 0;
        for (voice_idx, voice) in self.populated_voices() {
            if cursor > 0 {
                events.push(MeasureEvent::Backup(cursor));
            }
            cursor = 0;
            for (item_idx, item) in voice.iter().enumerate() {
                let notes = item_events(voice_idx, item_idx, item, divisions);
                cursor += notes.iter().map(|note| note.ticks).sum::<u64>();
                events.extend(notes.into_iter().map(MeasureEvent::Note));
            }
        }
        for (direction, displacement) in self.directions() {
            // directions_mut allows anything, negatives count from 0
            let displacement = match *displacement < zero() {
                true => zero(),
                false => *displacement,
            };
            let target = round_half_even(displacement * whole(divisions));
            if target < cursor {
                events.push(MeasureEvent::Backup(cursor - target));
            } else if target > cursor {
                events.push(MeasureEvent::Forward(target - cursor));
            }
            cursor = target;
            events.push(MeasureEvent::Direction(direction));
        }
        MeasureLayout { divisions, events }
    }
}

fn item_events<'a>(
    voice_idx: usize,
    item_idx: usize,
    item: &'a VoiceItem,
    divisions: u64,
) -> Vec<NoteEvent<'a>> {
    let event = |member: Option<usize>,
                 measured: Measured<'a>,
                 beams: BeamMap,
                 tuplet_bracket: Option<TupletBracket>| NoteEvent {
        key: LeafKey {
            voice: voice_idx,
            item: item_idx,
            member,
        },
        leaf: measured.leaf(),
        duration: measured.duration(),
        voice: voice_idx + 1,
        beams,
        tuplet_bracket,
        ticks: measured.length_in_ticks(divisions),
    };
    match item {
        VoiceItem::Leaf(leaf) => {
            vec![event(None, leaf.measured(), BeamMap::new(), None)]
        }
        VoiceItem::Group(group) => group
            .measured()
            .zip(group.beams())
            .enumerate()
            .map(|(idx, (measured, beams))| {
                event(Some(idx), measured, beams, group.tuplet_bracket(idx))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::*;
    use crate::primitives::{BeamState, Group, TupletRatio};

    fn note(duration: &str) -> VoiceItem {
        Leaf::parse("c4", duration).unwrap().into()
    }

    fn markers<'a>(layout: &MeasureLayout<'a>) -> Vec<(char, u64)> {
        layout
            .events
            .iter()
            .map(|event| match event {
                MeasureEvent::Note(note) => ('n', note.ticks),
                MeasureEvent::Backup(ticks) => ('b', *ticks),
                MeasureEvent::Forward(ticks) => ('f', *ticks),
                MeasureEvent::Direction(_) => ('d', 0),
            })
            .collect()
    }

    #[test]
    fn empty_voices_keep_numbers() {
        let measure = Measure::with_voices(vec![
            None,
            Some(vec![note("1")]),
            None,
            Some(vec![note("2"), note("2")]),
        ]);
        let layout = measure.layout(&ExportSettings::default());
        assert_eq!(layout.divisions, 1);
        assert_eq!(markers(&layout), vec![('n', 4), ('b', 4), ('n', 2), ('n', 2)]);
        let voices = layout.notes().map(|n| n.voice).collect::<Vec<_>>();
        assert_eq!(voices, vec![2, 4, 4]);
    }

    #[test]
    fn displaced_directions() {
        let measure = Measure::new(vec![note("2"), note("2")])
            .with_direction_at(Direction::text("a"), Fraction::new(1u64, 1u64))
            .with_direction_at(Direction::text("b"), Fraction::new(5u64, 2u64))
            .with_direction_at(Direction::text("c"), Fraction::new(5u64, 2u64));
        let layout = measure.layout(&ExportSettings::default());
        assert_eq!(layout.divisions, 2);
        assert_eq!(
            markers(&layout),
            vec![
                ('n', 4),
                ('n', 4),
                ('b', 6),
                ('d', 0),
                ('f', 3),
                ('d', 0),
                ('d', 0)
            ]
        );
    }

    #[test]
    fn negative_displacement_lands_on_start() {
        let mut measure = Measure::new(vec![note("1")])
            .with_direction_at(Direction::text("a"), -Fraction::from(1u64));
        assert_eq!(measure.directions()[0].1, Fraction::from(0u64));
        measure
            .directions_mut()
            .push((Direction::text("b"), -Fraction::from(2u64)));
        let layout = measure.layout(&ExportSettings::default());
        assert_eq!(layout.divisions, 1);
        assert_eq!(
            markers(&layout),
            vec![('n', 4), ('b', 4), ('d', 0), ('d', 0)]
        );
    }

    #[test]
    fn directions_on_empty_measure() {
        let measure = Measure::with_voices(vec![None])
            .with_direction_at(Direction::text("a"), Fraction::new(0u64, 1u64));
        let layout = measure.layout(&ExportSettings::default());
        assert_eq!(markers(&layout), vec![('d', 0)]);
    }

    #[test]
    fn group_events() {
        let triplet = Group::tuplet(
            vec![
                Leaf::parse("c4", "8").unwrap(),
                Leaf::parse("d4", "8").unwrap(),
                Leaf::parse("e4", "8").unwrap(),
            ],
            TupletRatio::new(3, 2).unwrap(),
        )
        .unwrap();
        let measure = Measure::new(vec![triplet.into(), note("2.")]);
        let layout = measure.layout(&ExportSettings::default());
        assert_eq!(layout.divisions, 3);
        let notes = layout.notes().collect::<Vec<_>>();
        assert_eq!(notes[0].tuplet_bracket, Some(TupletBracket::Start));
        assert_eq!(notes[1].tuplet_bracket, None);
        assert_eq!(notes[2].tuplet_bracket, Some(TupletBracket::Stop));
        assert_eq!(notes[0].beams.get(&1), Some(&BeamState::Begin));
        assert_eq!(notes[1].key.member, Some(1));
        assert_eq!(notes[3].key.member, None);
        assert!(notes[3].beams.is_empty());
        assert_eq!(
            notes.iter().map(|n| n.ticks).collect::<Vec<_>>(),
            vec![1, 1, 1, 9]
        );
    }

    #[test]
    fn loose_eighths_are_not_beamed() {
        let measure = Measure::new(vec![note("8"), note("8")]);
        let layout = measure.layout(&ExportSettings::default());
        assert!(layout.notes().all(|n| n.beams.is_empty()));
    }

    #[test]
    fn repeated_layout_is_identical() {
        let measure = Measure::with_voices(vec![
            Some(vec![note("4"), note("2.")]),
            Some(vec![note("1")]),
        ]);
        let settings = ExportSettings::default();
        assert_eq!(measure.layout(&settings), measure.layout(&settings));
    }
}
