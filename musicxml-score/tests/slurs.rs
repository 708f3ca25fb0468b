use itertools::Itertools;
use musicxml_score::{
    notation::{Direction, Notation},
    primitives::{Leaf, Measure, Part, Score},
    slurs::{remap_slurs, validate_dashed_lines, SlurRemapper, SlurStop},
    DiagnosticKind, ExportSettings,
};

fn quarter(pitch: &str) -> Leaf {
    Leaf::parse(pitch, "4").unwrap()
}

fn slur_numbers(score: &Score) -> Vec<(String, String)> {
    let rendered = score.render(&ExportSettings::default());
    rendered
        .document
        .descendants_named("slur")
        .into_iter()
        .map(|slur| {
            (
                slur.attr("type").unwrap_or_default().to_string(),
                slur.attr("number").unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[test]
fn freed_number_is_reused() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut slurs = SlurRemapper::new(6);
    assert_eq!(slurs.start(&"A".into()), Some(1));
    assert_eq!(slurs.start(&"B".into()), Some(2));
    assert_eq!(slurs.stop(&"A".into()), SlurStop::Number(1));
    assert_eq!(slurs.start(&"C".into()), Some(1));
    assert_eq!(slurs.stop(&"B".into()), SlurStop::Number(2));
    assert_eq!(slurs.stop(&"C".into()), SlurStop::Number(1));
    assert_eq!(slurs.open_count(), 0);
}

#[test]
fn slurs_across_measures_and_voices() {
    let first = Measure::with_voices(vec![
        Some(vec![
            quarter("c5").with_notation(Notation::start_slur("A")).into(),
            quarter("d5").into(),
            quarter("e5").with_notation(Notation::stop_slur("A")).into(),
            quarter("f5").with_notation(Notation::start_slur("C")).into(),
        ]),
        Some(vec![
            quarter("c4").into(),
            quarter("d4").with_notation(Notation::start_slur("B")).into(),
            quarter("e4").into(),
            quarter("f4").into(),
        ]),
    ]);
    let second = Measure::with_voices(vec![
        Some(vec![Leaf::parse("g5", "1")
            .unwrap()
            .with_notation(Notation::stop_slur("C"))
            .into()]),
        Some(vec![Leaf::parse("g4", "1")
            .unwrap()
            .with_notation(Notation::stop_slur("B"))
            .into()]),
    ]);
    let part = Part::new("", vec![first, second]);
    let (numbers, diagnostics) = remap_slurs(&part, 1, &ExportSettings::default());
    assert!(diagnostics.is_empty());
    assert_eq!(numbers.len(), 6);

    let score = Score::new(vec![part.into()]);
    // document order: voice 1 of measure 1, voice 2, then measure 2
    assert_eq!(
        slur_numbers(&score),
        vec![
            ("start".to_string(), "1".to_string()),
            ("stop".to_string(), "1".to_string()),
            ("start".to_string(), "1".to_string()),
            ("start".to_string(), "2".to_string()),
            ("stop".to_string(), "1".to_string()),
            ("stop".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn seventh_slur_is_omitted() {
    let pitches = ["c4", "d4", "e4", "f4", "g4", "a4", "b4"];
    let starts = Measure::new(
        pitches
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                quarter(p)
                    .with_notation(Notation::start_slur(idx as u32))
                    .into()
            })
            .collect(),
    );
    let stops = Measure::new(
        pitches
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                quarter(p)
                    .with_notation(Notation::stop_slur(idx as u32))
                    .into()
            })
            .collect(),
    );
    let score = Score::new(vec![Part::new("", vec![starts, stops]).into()]);
    let rendered = score.render(&ExportSettings::default());
    let overflow = rendered
        .diagnostics
        .of_kind(DiagnosticKind::SlurOverflow)
        .collect_vec();
    assert_eq!(overflow.len(), 1);
    assert_eq!((overflow[0].part, overflow[0].measure), (1, 1));
    // the stop of the omitted slur is dropped with it, not reported again
    assert_eq!(rendered.diagnostics.len(), 1);
    assert_eq!(
        rendered
            .diagnostics
            .of_kind(DiagnosticKind::SlurStopWithoutStart)
            .count(),
        0
    );
    let numbers = slur_numbers(&score);
    assert_eq!(numbers.len(), 12);
    let started = numbers
        .iter()
        .filter(|(kind, _)| kind == "start")
        .map(|(_, number)| number.as_str())
        .collect_vec();
    assert_eq!(started, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn unmatched_stop_is_reported() {
    let _ = env_logger::builder().is_test(true).try_init();
    let measure = Measure::new(vec![
        quarter("c4").with_notation(Notation::stop_slur("ghost")).into(),
        quarter("d4").with_notation(Notation::start_slur("real")).into(),
        quarter("e4").with_notation(Notation::stop_slur("real")).into(),
    ]);
    let part = Part::new("", vec![measure]);
    let (numbers, diagnostics) =
        remap_slurs(&part, 1, &ExportSettings::default());
    assert_eq!(numbers.len(), 2);
    let unmatched = diagnostics
        .of_kind(DiagnosticKind::SlurStopWithoutStart)
        .collect_vec();
    assert_eq!(unmatched.len(), 1);
    assert!(unmatched[0].message.contains("ghost"));
}

#[test]
fn dashed_line_warnings() {
    let measure = Measure::new(vec![
        quarter("c4")
            .with_direction(Direction::text_with_dashes("cresc.", 1))
            .into(),
        quarter("d4")
            .with_direction(Direction::text_with_dashes("cresc.", 1))
            .into(),
        quarter("e4")
            .with_direction(Direction::end_dashed_line(2))
            .into(),
        quarter("f4").into(),
    ]);
    let part = Part::new("", vec![measure]);
    let diagnostics = validate_dashed_lines(&part, 1);
    let kinds = diagnostics.iter().map(|d| d.kind).collect_vec();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::DashedLineRestarted,
            DiagnosticKind::DashedLineStopWithoutStart,
            DiagnosticKind::DashedLineUnclosed,
        ]
    );

    let closed = Measure::new(vec![
        quarter("c4")
            .with_direction(Direction::text_with_dashes("rit.", 3))
            .into(),
        Leaf::parse("d4", "2.").unwrap().into(),
    ])
    .with_direction_at(Direction::end_dashed_line(3), fraction::Fraction::from(3u64));
    assert!(validate_dashed_lines(&Part::new("", vec![closed]), 1).is_empty());
}
