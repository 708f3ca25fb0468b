use super::{format_number, RendersToXml, XmlElement};
use crate::notation::{
    direction::STANDARD_DYNAMICS, Direction, DirectionKind,
};

/// Render direction, optionally forcing the voice of the leaf
/// it is attached to.
pub fn render_direction(
    direction: &Direction,
    voice: Option<usize>,
) -> XmlElement {
    let mut element = XmlElement::new("direction");
    if let Some(placement) = direction.placement() {
        element.set_attr("placement", placement.xml_name());
    }
    match direction.kind() {
        DirectionKind::Text {
            text,
            font_size,
            italic,
            bold,
            dashed_line,
            attributes,
        } => {
            let mut words = XmlElement::text_node("words", text);
            for (key, value) in attributes {
                words.set_attr(key.as_str(), value);
            }
            if let Some(size) = font_size {
                words.set_attr("font-size", format_number(*size as f64));
            }
            if *italic {
                words.set_attr("font-style", "italic");
            }
            if *bold {
                words.set_attr("font-weight", "bold");
            }
            element.push(direction_type(words));
            if let Some(line) = dashed_line {
                element.push(direction_type(dashes("start", *line)));
            }
        }
        DirectionKind::Metronome {
            beat_unit,
            bpm,
            attributes,
        } => {
            let mut metronome = XmlElement::new("metronome");
            for (key, value) in attributes {
                metronome.set_attr(key.as_str(), value);
            }
            metronome.push_text_node("beat-unit", beat_unit.note_type());
            for _ in 0..beat_unit.dots() {
                metronome.push(XmlElement::new("beat-unit-dot"));
            }
            metronome.push_text_node("per-minute", format_number(*bpm));
            element.push(direction_type(metronome));
        }
        DirectionKind::Dynamic(text) => {
            let mark = match STANDARD_DYNAMICS.contains(&text.as_str()) {
                true => XmlElement::new(text.as_str()),
                false => XmlElement::text_node("other-dynamics", text),
            };
            element.push(direction_type(
                XmlElement::new("dynamics").with_child(mark),
            ));
        }
        DirectionKind::EndDashedLine(line) => {
            element.push(direction_type(dashes("stop", *line)));
        }
        DirectionKind::Pedal(action) => {
            element.push(direction_type(
                XmlElement::new("pedal")
                    .with_attr("type", action.xml_name())
                    .with_attr("line", "yes"),
            ));
        }
    }
    element.push_text_node(
        "voice",
        voice.unwrap_or(direction.voice() as usize),
    );
    if let Some(staff) = direction.staff() {
        element.push_text_node("staff", staff);
    }
    element
}

fn direction_type(child: XmlElement) -> XmlElement {
    XmlElement::new("direction-type").with_child(child)
}

fn dashes(kind: &str, line: u32) -> XmlElement {
    XmlElement::new("dashes")
        .with_attr("type", kind)
        .with_attr("number", line)
}

impl RendersToXml for Direction {
    fn render_xml(&self) -> XmlElement {
        render_direction(self, None)
    }
}
