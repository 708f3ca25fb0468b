use fraction::Fraction;
use itertools::Itertools;
use musicxml_score::{
    layout::MeasureEvent,
    notation::Direction,
    primitives::{Leaf, Measure, Part, Score, Timed},
    ExportSettings, XmlElement,
};

fn leaf(pitch: &str, duration: &str) -> Leaf {
    Leaf::parse(pitch, duration).unwrap()
}

fn first_measure(score: &Score) -> XmlElement {
    let rendered = score.render(&ExportSettings::default());
    rendered.document.descendants_named("measure")[0].clone()
}

#[test]
fn two_voices_one_backup() {
    let _ = env_logger::builder().is_test(true).try_init();
    let measure = Measure::with_voices(vec![
        Some(vec![leaf("e5", "2").into(), leaf("f5", "2").into()]),
        Some(vec![leaf("c4", "4").into(), leaf("d4", "4").into()]),
    ])
    .with_time_signature(4, 4);
    let layout = measure.layout_with_divisions(480);
    let backups = layout
        .events
        .iter()
        .positions(|e| matches!(e, MeasureEvent::Backup(_)))
        .collect_vec();
    assert_eq!(backups, vec![2]);
    assert_eq!(layout.events[2], MeasureEvent::Backup(1920));
    let voice_2_ticks: u64 = layout
        .notes()
        .filter(|n| n.voice == 2)
        .map(|n| n.ticks)
        .sum();
    assert_eq!(voice_2_ticks, 960);
}

#[test]
fn backup_in_document() {
    let measure = Measure::with_voices(vec![
        Some(vec![leaf("e5", "1").into()]),
        Some(vec![leaf("c4", "2").into(), leaf("d4", "2").into()]),
    ]);
    let score = Score::new(vec![Part::new("", vec![measure]).into()]);
    let measure = first_measure(&score);
    assert_eq!(
        measure.child_names(),
        vec!["attributes", "note", "backup", "note", "note"]
    );
    let backup = measure.child("backup").unwrap();
    assert_eq!(backup.child("duration").unwrap().text(), Some("4"));
    let voices = measure
        .children_named("note")
        .map(|n| n.child("voice").unwrap().text().unwrap().to_string())
        .collect_vec();
    assert_eq!(voices, vec!["1", "2", "2"]);
}

#[test]
fn divisions_ceiling() {
    let measure = Measure::new(vec![leaf("c4", "32").into()])
        .with_direction_at(Direction::text("x"), Fraction::new(1u64, 375u64));
    assert_eq!(measure.base_divisions(), 8);
    let settings = ExportSettings {
        displacement_denominator_limit: 1000,
        ..Default::default()
    };
    let divisions = measure.divisions(&settings);
    assert_eq!(divisions, 1024);
    assert_eq!(divisions % 8, 0);
    let roomy = ExportSettings {
        divisions_ceiling: 4096,
        ..settings
    };
    assert_eq!(measure.divisions(&roomy), 3000);
}

#[test]
fn grace_notes_take_no_time() {
    let grace = leaf("d5", "16").into_grace(false).unwrap();
    assert_eq!(grace.true_length(), Fraction::from(0u64));
    let measure = Measure::new(vec![grace.into(), leaf("c5", "1").into()]);
    let layout = measure.layout(&ExportSettings::default());
    assert_eq!(layout.divisions, 1);
    let ticks = layout.notes().map(|n| n.ticks).collect_vec();
    assert_eq!(ticks, vec![0, 4]);
    let score = Score::new(vec![Part::new("", vec![measure]).into()]);
    let measure = first_measure(&score);
    let grace = measure.child("note").unwrap();
    assert!(grace.child("grace").is_some());
    assert!(grace.child("duration").is_none());
}

#[test]
fn chord_duration_writes_through() {
    let mut chord = leaf("c4 e4 g4", "4");
    chord.duration_mut().unwrap().set_dots(1).unwrap();
    assert_eq!(chord.true_length(), Fraction::new(3u64, 2u64));
    let measure = Measure::new(vec![chord.into()]).with_time_signature(3, 8);
    let score = Score::new(vec![Part::new("", vec![measure]).into()]);
    let measure = first_measure(&score);
    let notes = measure.children_named("note").collect_vec();
    assert_eq!(notes.len(), 3);
    for note in notes {
        assert_eq!(note.children_named("dot").count(), 1);
        assert_eq!(note.child("duration").unwrap().text(), Some("3"));
    }
}

#[test]
fn displaced_direction_document_order() {
    let measure = Measure::new(vec![leaf("c4", "2").into(), leaf("d4", "2").into()])
        .with_direction_at(
            Direction::text("poco").with_voice(1),
            Fraction::new(3u64, 1u64),
        );
    let score = Score::new(vec![Part::new("", vec![measure]).into()]);
    let measure = first_measure(&score);
    assert_eq!(
        measure.child_names(),
        vec!["attributes", "note", "note", "backup", "direction"]
    );
    assert_eq!(
        measure.child("backup").unwrap().child("duration").unwrap().text(),
        Some("1")
    );
}
