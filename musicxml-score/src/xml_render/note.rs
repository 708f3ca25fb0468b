//! Notes, rests and chords.
//!
//! A chord renders as one `note` element per member. Everything that
//! belongs to the chord as a whole (directions, beams, leaf notations,
//! tuplet bracket, articulations) goes to the first member only.

use log::warn;

use super::{direction::render_direction, RendersToXml, XmlElement};
use crate::{
    layout::NoteEvent,
    notation::{is_element_name, Articulation, Notation, Notehead, SlurAction},
    primitives::{Duration, LeafKind, Pitch, Pitched, Tie, TupletBracket},
    slurs::{NotationKey, SlurNumbers},
};

impl RendersToXml for Pitch {
    fn render_xml(&self) -> XmlElement {
        let mut pitch = XmlElement::new("pitch");
        pitch.push_text_node("step", self.step());
        if self.alter() != 0.0 {
            pitch.push_text_node("alter", self.alter_string());
        }
        pitch.push_text_node("octave", self.octave());
        pitch
    }
}

impl RendersToXml for Notehead {
    fn render_xml(&self) -> XmlElement {
        let mut notehead = XmlElement::text_node("notehead", self.shape);
        if let Some(filled) = self.filled {
            notehead.set_attr("filled", yes_no(filled));
        }
        notehead
    }
}

impl RendersToXml for Articulation {
    fn render_xml(&self) -> XmlElement {
        XmlElement::new(self.xml_name())
    }
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    match value {
        true => "yes",
        false => "no",
    }
}

/// Where the event lives, for the slur side table.
#[derive(Debug, Clone, Copy)]
pub struct NoteContext<'a> {
    pub measure: usize,
    pub slurs: &'a SlurNumbers,
}

/// Attached directions, then one `note` per chord member.
pub fn render_note_event(
    event: &NoteEvent,
    context: NoteContext,
) -> Vec<XmlElement> {
    let leaf = event.leaf;
    let mut elements: Vec<XmlElement> = leaf
        .directions()
        .iter()
        .map(|direction| render_direction(direction, Some(event.voice)))
        .collect();
    match leaf.kind() {
        LeafKind::BarRest => {
            let mut note = XmlElement::new("note");
            note.push(XmlElement::new("rest").with_attr("measure", "yes"))
                .push_text_node("duration", event.ticks)
                .push_text_node("voice", event.voice);
            elements.push(note);
        }
        LeafKind::Rest => elements.push(render_member(event, context, None, 0)),
        LeafKind::Note(_) | LeafKind::Chord(_) => elements.extend(
            leaf.members()
                .iter()
                .enumerate()
                .map(|(idx, member)| {
                    render_member(event, context, Some(member), idx)
                }),
        ),
    }
    elements
}

fn render_member(
    event: &NoteEvent,
    context: NoteContext,
    member: Option<&Pitched>,
    member_idx: usize,
) -> XmlElement {
    let leaf = event.leaf;
    let first = member_idx == 0;
    let mut note = XmlElement::new("note");
    if let Some(grace) = leaf.grace() {
        let mut el = XmlElement::new("grace");
        if grace.slashed {
            el.set_attr("slash", "yes");
        }
        note.push(el);
    }
    if !first {
        note.push(XmlElement::new("chord"));
    }
    match member {
        Some(pitched) => note.push(pitched.pitch.render_xml()),
        None => note.push(XmlElement::new("rest")),
    };
    if !leaf.is_grace() {
        note.push_text_node("duration", event.ticks);
    }
    let tie = member.and_then(|pitched| pitched.tie);
    if let Some(tie) = tie {
        note.extend(tie_elements("tie", tie));
    }
    note.push_text_node("voice", event.voice);
    if let Some(duration) = event.duration.notated() {
        render_duration(&mut note, duration);
    }
    if leaf.is_stemless() {
        note.push_text_node("stem", "none");
    }
    if let Some(notehead) = member.and_then(|pitched| pitched.notehead) {
        note.push(notehead.render_xml());
    }
    if first && member.is_some() {
        for (number, state) in event.beams.iter() {
            note.push(
                XmlElement::text_node("beam", state.xml_name())
                    .with_attr("number", number),
            );
        }
    }

    let mut notations = Vec::new();
    for (index, notation) in leaf.notations().iter().enumerate() {
        let key = NotationKey {
            measure: context.measure,
            leaf: event.key,
            index,
        };
        if first || notation.is_per_member() {
            notations.extend(render_notation(
                notation,
                member_idx,
                context.slurs.get(&key),
            ));
        }
    }
    if let Some(tie) = tie {
        notations.extend(tie_elements("tied", tie));
    }
    if first {
        if let Some(bracket) = event.tuplet_bracket {
            notations.extend(tuplet_elements(bracket));
        }
        if !leaf.articulations().is_empty() {
            notations.push(XmlElement::new("articulations").with_children(
                leaf.articulations().iter().map(|a| a.render_xml()),
            ));
        }
    }
    if !notations.is_empty() {
        note.push(XmlElement::new("notations").with_children(notations));
    }
    note
}

fn render_duration(note: &mut XmlElement, duration: &Duration) {
    note.push_text_node("type", duration.note_type());
    for _ in 0..duration.dots() {
        note.push(XmlElement::new("dot"));
    }
    if let Some(ratio) = duration.tuplet() {
        let mut modification = XmlElement::new("time-modification");
        modification
            .push_text_node("actual-notes", ratio.actual())
            .push_text_node("normal-notes", ratio.normal());
        if let Some(normal_type) = ratio.normal_type() {
            modification.push_text_node("normal-type", normal_type);
        }
        note.push(modification);
    }
}

fn tie_elements(name: &str, tie: Tie) -> Vec<XmlElement> {
    let mut elements = Vec::new();
    if tie.starts() {
        elements.push(XmlElement::new(name).with_attr("type", "start"));
    }
    if tie.stops() {
        elements.push(XmlElement::new(name).with_attr("type", "stop"));
    }
    elements
}

fn tuplet_elements(bracket: TupletBracket) -> Vec<XmlElement> {
    let mut elements = Vec::new();
    if bracket.starts() {
        elements.push(XmlElement::new("tuplet").with_attr("type", "start"));
    }
    if bracket.stops() {
        elements.push(XmlElement::new("tuplet").with_attr("type", "stop"));
    }
    elements
}

fn slide(kind: &str, number: u8) -> XmlElement {
    XmlElement::new("slide")
        .with_attr("type", kind)
        .with_attr("line-type", "solid")
        .with_attr("number", number)
}

/// Leaf notation as seen from the given chord member.
///
/// Slurs without a remapped number are omitted.
fn render_notation(
    notation: &Notation,
    member_idx: usize,
    slur_number: Option<u8>,
) -> Option<XmlElement> {
    let member_slide = |numbers: &[Option<u8>], kind: &str| {
        numbers
            .get(member_idx)
            .copied()
            .flatten()
            .map(|number| slide(kind, number))
    };
    match notation {
        Notation::StartSlur(_) | Notation::StopSlur(_) => {
            let (action, _) = notation.slur()?;
            let kind = match action {
                SlurAction::Start => "start",
                SlurAction::Stop => "stop",
            };
            slur_number.map(|number| {
                XmlElement::new("slur")
                    .with_attr("type", kind)
                    .with_attr("number", number)
            })
        }
        Notation::StartGliss(number) => Some(slide("start", *number)),
        Notation::StopGliss(number) => Some(slide("stop", *number)),
        Notation::StartMultiGliss(numbers) => member_slide(numbers, "start"),
        Notation::StopMultiGliss(numbers) => member_slide(numbers, "stop"),
        Notation::Fermata => Some(XmlElement::new("fermata")),
        Notation::Arpeggiate => Some(XmlElement::new("arpeggiate")),
        Notation::Other(name) if is_element_name(name) => {
            Some(XmlElement::new(name.as_str()))
        }
        Notation::Other(name) => {
            warn!("skipping notation `{name}`: not an element name");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notation::{Direction, NoteheadShape},
        primitives::{Leaf, Measure},
        settings::ExportSettings,
    };

    fn render(measure: &Measure) -> Vec<XmlElement> {
        let slurs = SlurNumbers::default();
        let context = NoteContext {
            measure: 0,
            slurs: &slurs,
        };
        measure
            .layout(&ExportSettings::default())
            .notes()
            .flat_map(|event| render_note_event(event, context))
            .collect()
    }

    #[test]
    fn note_child_order() {
        let leaf = Leaf::parse("f#4", "8.")
            .unwrap()
            .with_tie(Tie::Continue)
            .with_notehead(Notehead::new(NoteheadShape::Diamond, Some(false)))
            .with_notation(Notation::Fermata)
            .with_articulation(Articulation::Staccato)
            .stemless();
        let measure = Measure::new(vec![leaf.into()]);
        let notes = render(&measure);
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes[0].child_names(),
            vec![
                "pitch", "duration", "tie", "tie", "voice", "type", "dot",
                "stem", "notehead", "notations"
            ]
        );
        let pitch = notes[0].child("pitch").unwrap();
        assert_eq!(pitch.child_names(), vec!["step", "alter", "octave"]);
        assert_eq!(pitch.child("alter").unwrap().text(), Some("1"));
        let notations = notes[0].child("notations").unwrap();
        assert_eq!(
            notations.child_names(),
            vec!["fermata", "tied", "tied", "articulations"]
        );
        assert_eq!(
            notes[0].child("notehead").unwrap().attr("filled"),
            Some("no")
        );
    }

    #[test]
    fn chord_members() {
        let chord = Leaf::parse("c4 e4 g4", "4")
            .unwrap()
            .with_direction(Direction::dynamic("p"))
            .with_notation(Notation::StartMultiGliss(vec![Some(1), None, Some(3)]))
            .with_articulation(Articulation::Accent);
        let measure = Measure::new(vec![chord.into()]).with_time_signature(1, 4);
        let elements = render(&measure);
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].name(), "direction");
        assert!(elements[1].child("chord").is_none());
        assert!(elements[2].child("chord").is_some());
        assert!(elements[1].child("notations").unwrap().child("articulations").is_some());
        assert!(elements[2].child("notations").is_none());
        let slide = &elements[3].descendants_named("slide")[0];
        assert_eq!(slide.attr("number"), Some("3"));
        assert!(elements[3].child("notations").unwrap().child("articulations").is_none());
    }

    #[test]
    fn rests_and_grace() {
        let grace = Leaf::parse("d5", "16").unwrap().into_grace(true).unwrap();
        let measure = Measure::new(vec![
            grace.into(),
            Leaf::rest("2".parse().unwrap()).into(),
            Leaf::parse("c4", "2").unwrap().into(),
        ]);
        let notes = render(&measure);
        assert_eq!(
            notes[0].child_names(),
            vec!["grace", "pitch", "voice", "type"]
        );
        assert_eq!(notes[0].child("grace").unwrap().attr("slash"), Some("yes"));
        assert_eq!(
            notes[1].child_names(),
            vec!["rest", "duration", "voice", "type"]
        );
        let bar_rest = Measure::new(vec![Leaf::bar_rest(fraction::Fraction::from(3u64)).into()]);
        let notes = render(&bar_rest);
        assert_eq!(notes[0].child_names(), vec!["rest", "duration", "voice"]);
        assert_eq!(notes[0].child("duration").unwrap().text(), Some("3"));
    }

    #[test]
    fn other_notations_need_element_names() {
        let leaf = Leaf::parse("c4", "4")
            .unwrap()
            .with_notation(Notation::other("non-arpeggiate").unwrap())
            .with_notation(Notation::Other("two words".into()));
        let notes = render(&Measure::new(vec![leaf.into()]));
        let notations = notes[0].child("notations").unwrap();
        assert_eq!(notations.child_names(), vec!["non-arpeggiate"]);

        let only_bad = Leaf::parse("c4", "4")
            .unwrap()
            .with_notation(Notation::Other("a b".into()));
        let notes = render(&Measure::new(vec![only_bad.into()]));
        assert!(notes[0].child("notations").is_none());
    }
}
