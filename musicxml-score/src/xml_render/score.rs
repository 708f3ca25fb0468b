use log::debug;

use super::{
    direction::render_direction,
    note::{render_note_event, yes_no, NoteContext},
    Rendered, RendersToXml, XmlElement,
};
use crate::{
    diagnostics::Diagnostics,
    layout::MeasureEvent,
    primitives::{
        Barline, Clef, ClefSign, Measure, Part, PartGroup, Score, ScoreEntry,
        TimeSignature,
    },
    settings::ExportSettings,
    slurs::{remap_slurs, validate_dashed_lines, SlurNumbers},
};

impl RendersToXml for TimeSignature {
    fn render_xml(&self) -> XmlElement {
        let mut time = XmlElement::new("time");
        time.push_text_node("beats", self.beats)
            .push_text_node("beat-type", self.beat_type);
        time
    }
}

impl RendersToXml for Clef {
    fn render_xml(&self) -> XmlElement {
        let sign = match self.sign {
            ClefSign::G => "G",
            ClefSign::F => "F",
            ClefSign::C => "C",
        };
        let mut clef = XmlElement::new("clef");
        clef.push_text_node("sign", sign)
            .push_text_node("line", self.line);
        if self.octave_change != 0 {
            clef.push_text_node("clef-octave-change", self.octave_change);
        }
        clef
    }
}

impl RendersToXml for Barline {
    fn render_xml(&self) -> XmlElement {
        XmlElement::new("barline")
            .with_attr("location", "right")
            .with_child(XmlElement::text_node("bar-style", self.xml_name()))
    }
}

/// Measure with the given number (from 1).
pub fn render_measure(
    measure: &Measure,
    number: usize,
    slurs: &SlurNumbers,
    settings: &ExportSettings,
) -> XmlElement {
    let layout = measure.layout(settings);
    let mut element = XmlElement::new("measure").with_attr("number", number);

    let mut attributes = XmlElement::new("attributes");
    attributes.push_text_node("divisions", layout.divisions);
    if let Some(time_signature) = measure.time_signature() {
        attributes.push(time_signature.render_xml());
    }
    if let Some(clef) = measure.clef() {
        attributes.push(clef.render_xml());
    }
    if let Some(staves) = measure.staves() {
        attributes.push_text_node("staves", staves);
    }
    element.push(attributes);

    let context = NoteContext {
        measure: number - 1,
        slurs,
    };
    for event in layout.events.iter() {
        match event {
            MeasureEvent::Note(note) => {
                element.extend(render_note_event(note, context));
            }
            MeasureEvent::Backup(ticks) => {
                element.push(cursor_move("backup", *ticks));
            }
            MeasureEvent::Forward(ticks) => {
                element.push(cursor_move("forward", *ticks));
            }
            MeasureEvent::Direction(direction) => {
                element.push(render_direction(direction, None));
            }
        }
    }
    if let Some(barline) = measure.barline() {
        element.push(barline.render_xml());
    }
    element
}

fn cursor_move(name: &str, ticks: u64) -> XmlElement {
    XmlElement::new(name).with_child(XmlElement::text_node("duration", ticks))
}

/// Part with id `P{number}`, together with its spanner diagnostics.
pub fn render_part(
    part: &Part,
    number: usize,
    settings: &ExportSettings,
) -> (XmlElement, Diagnostics) {
    let (slurs, mut diagnostics) = remap_slurs(part, number, settings);
    diagnostics.extend(validate_dashed_lines(part, number));
    let element = XmlElement::new("part")
        .with_attr("id", part_id(number))
        .with_children(part.measures().iter().enumerate().map(
            |(idx, measure)| render_measure(measure, idx + 1, &slurs, settings),
        ));
    debug!(
        "rendered part {} ({} measures, {} slurs remapped)",
        part_id(number),
        part.measures().len(),
        slurs.len()
    );
    (element, diagnostics)
}

fn part_id(number: usize) -> String {
    format!("P{number}")
}

fn score_part(part: &Part, number: usize) -> XmlElement {
    XmlElement::new("score-part")
        .with_attr("id", part_id(number))
        .with_child(XmlElement::text_node("part-name", part.name()))
}

fn part_group_bounds(group: &PartGroup) -> (XmlElement, XmlElement) {
    let mut start = XmlElement::new("part-group").with_attr("type", "start");
    if group.has_bracket() {
        start.push_text_node("group-symbol", "bracket");
    }
    start.push_text_node("group-barline", yes_no(group.has_group_barline()));
    let stop = XmlElement::new("part-group").with_attr("type", "stop");
    (start, stop)
}

impl Score {
    /// Render into an element tree, collecting diagnostics of all parts.
    ///
    /// The score is only read, so repeated renders give the same tree.
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::primitives::{Leaf, Measure, Part, Score};
    /// # use musicxml_score::ExportSettings;
    /// let measure = Measure::new(vec![Leaf::parse("c5", "1").unwrap().into()])
    ///     .with_time_signature(4, 4);
    /// let score = Score::new(vec![Part::new("Flute", vec![measure]).into()])
    ///     .with_title("Etude");
    /// let rendered = score.render(&ExportSettings::default());
    /// assert!(rendered.diagnostics.is_empty());
    /// let xml = rendered.to_xml_string(false, 0).unwrap();
    /// assert!(xml.contains("<work><work-title>Etude</work-title></work>"));
    /// assert!(xml.contains("<score-part id=\"P1\"><part-name>Flute</part-name>"));
    /// ```
    pub fn render(&self, settings: &ExportSettings) -> Rendered {
        let mut root = XmlElement::new("score-partwise").with_attr("version", "3.0");

        let mut work = XmlElement::new("work");
        if let Some(title) = self.title() {
            work.push_text_node("work-title", title);
        }
        root.push(work);

        let mut identification = XmlElement::new("identification");
        if let Some(composer) = self.composer() {
            identification.push(
                XmlElement::text_node("creator", composer)
                    .with_attr("type", "composer"),
            );
        }
        let mut encoding = XmlElement::new("encoding");
        encoding
            .push_text_node(
                "encoding-date",
                settings.encoding_date().format("%Y-%m-%d"),
            )
            .push_text_node("software", &settings.software);
        identification.push(encoding);
        root.push(identification);

        let mut part_list = XmlElement::new("part-list");
        let mut parts = Vec::new();
        let mut diagnostics = Diagnostics::new();
        let mut number = 0;
        for entry in self.entries() {
            let bounds = match entry {
                ScoreEntry::Group(group) => Some(part_group_bounds(group)),
                ScoreEntry::Part(_) => None,
            };
            if let Some((start, _)) = &bounds {
                part_list.push(start.clone());
            }
            for part in entry.parts() {
                number += 1;
                part_list.push(score_part(part, number));
                let (element, part_diagnostics) =
                    render_part(part, number, settings);
                parts.push(element);
                diagnostics.extend(part_diagnostics);
            }
            if let Some((_, stop)) = bounds {
                part_list.push(stop);
            }
        }
        root.push(part_list);
        root.extend(parts);

        Rendered {
            document: root,
            diagnostics,
            pretty_print: settings.pretty_print,
            indent: settings.indent,
        }
    }
}
