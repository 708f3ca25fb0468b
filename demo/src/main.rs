//! Builds two reference scores and exports them as MusicXML.
//!
//! Usage: `musicxml-score-demo [OUTPUT_DIR] [VIEWER COMMAND...]`

use std::{error::Error, path::PathBuf};

use fraction::Fraction;
use log::{info, warn};
use musicxml_score::{
    notation::{Direction, Notation, PedalAction},
    primitives::{
        Group, Leaf, Measure, Part, PartGroup, Score, TupletRatio, VoiceItem,
    },
    ExportSettings, ScoreResult,
};

fn leaf(pitches: &str, duration: &str) -> ScoreResult<Leaf> {
    Leaf::parse(pitches, duration)
}

fn rest(duration: &str) -> ScoreResult<Leaf> {
    Ok(Leaf::rest(duration.parse()?))
}

fn quintuplet() -> ScoreResult<Group> {
    Group::tuplet(
        vec![
            leaf("c5", "8")?,
            leaf("bb4", "16")?,
            leaf("a4", "16")?,
            leaf("b4", "16")?,
        ],
        TupletRatio::new(5, 4)?,
    )
}

fn sixteenths(pitches: [&str; 2]) -> ScoreResult<Group> {
    Group::beamed(vec![leaf(pitches[0], "16")?, leaf(pitches[1], "16")?])
}

fn direct_score() -> ScoreResult<Score> {
    let oboe = Part::new(
        "Oboe",
        vec![
            Measure::new(vec![
                leaf("G#4 b4 d5", "4.")?
                    .with_notation(Notation::StartMultiGliss(vec![
                        None,
                        Some(1),
                        Some(2),
                    ]))
                    .into(),
                leaf("C5 eb5 G5", "8")?
                    .into_grace(false)?
                    .stemless()
                    .with_notation(Notation::StopMultiGliss(vec![
                        Some(1),
                        None,
                        Some(2),
                    ]))
                    .into(),
                sixteenths(["f#4", "A#4"])?.into(),
                leaf("Cs4 Ab4", "4")?.into(),
                rest("4")?.into(),
            ])
            .with_time_signature(4, 4)
            .with_direction_at(
                Direction::metronome(Fraction::new(3u64, 2u64), 80.0),
                Fraction::from(0u64),
            )
            .with_direction_at(
                Direction::text("rit.").with_font(None, true, false),
                Fraction::from(1u64),
            )
            .with_direction_at(
                Direction::metronome(Fraction::from(1u64), 60.0),
                Fraction::new(7u64, 2u64),
            ),
            Measure::new(vec![
                quintuplet()?.into(),
                leaf("f4", "2")?
                    .with_direction(Direction::text("with gusto!"))
                    .into(),
                rest("4")?.into(),
            ])
            .with_clef("mezzo-soprano".parse()?)
            .with_barline("end".parse()?),
        ],
    );

    let mut clarinet_quintuplet = quintuplet()?;
    clarinet_quintuplet.leaves_mut()[1] =
        leaf("bb4", "16")?.with_notehead("x".parse()?);
    let clarinet = Part::new(
        "Clarinet",
        vec![
            Measure::new(vec![
                clarinet_quintuplet.into(),
                leaf("f4", "2")?.into(),
                rest("4")?.into(),
            ])
            .with_time_signature(4, 4),
            Measure::new(vec![
                leaf("d5", "4.")?
                    .with_direction(Direction::text_with_dashes("roguishly", 1))
                    .into(),
                sixteenths(["f#4", "A#4"])?.into(),
                leaf("Cs4 Ab4", "4")?
                    .with_direction(Direction::end_dashed_line(1))
                    .into(),
                rest("4")?.into(),
            ])
            .with_barline("end".parse()?),
        ],
    );

    let glissandi = Group::beamed(vec![
        rest("8")?,
        leaf("d4", "8")?
            .with_notehead("open mi".parse()?)
            .with_notation(Notation::StartGliss(1))
            .with_notation(Notation::start_slur("bassoon")),
        leaf("Eb4", "8")?
            .with_notation(Notation::StopGliss(1))
            .with_notation(Notation::StartGliss(2)),
        leaf("F4", "8")?
            .with_notation(Notation::StopGliss(2))
            .with_notation(Notation::stop_slur("bassoon")),
    ])?;
    let bassoon = Part::new(
        "Bassoon",
        vec![
            Measure::new(vec![Leaf::bar_rest(Fraction::from(4u64))
                .with_direction(Direction::pedal(PedalAction::Start))
                .into()])
            .with_time_signature(4, 4)
            .with_clef("bass".parse()?),
            Measure::with_voices(vec![
                Some(vec![glissandi.into(), leaf("Eb4", "2")?.into()]),
                None,
                Some(vec![
                    rest("4")?.into(),
                    leaf("c4", "2")?.into(),
                    leaf("Eb3", "8")?
                        .with_direction(Direction::pedal(PedalAction::Stop))
                        .into(),
                    rest("8")?.into(),
                ]),
            ])
            .with_barline("end".parse()?),
        ],
    );

    Ok(Score::new(vec![
        PartGroup::new(vec![oboe, clarinet]).into(),
        bassoon.into(),
    ])
    .with_title("Directly Created MusicXML")
    .with_composer("HTMLvis"))
}

/// Deterministic stand-in for a random choice from the bank.
fn pick<'a>(bank: &[&'a str], seed: usize) -> &'a str {
    bank[(seed * 5 + 3) % bank.len()]
}

fn algorithmic_score(settings: &ExportSettings) -> ScoreResult<Score> {
    let bank = ["f#4", "bb4", "d5", "e5", "ab5", "c6", "f6"];
    let chord = |seed: usize, size: usize| -> String {
        (0..size)
            .map(|idx| pick(&bank, seed * 3 + idx))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let sixteenth = settings.duration(Fraction::new(1u64, 4u64))?;

    let mut part = Part::new("Piano", Vec::new());
    for measure_idx in 0..20 {
        let mut items = Vec::new();
        for beat in 0..3 {
            let seed = measure_idx * 3 + beat;
            let item: VoiceItem = match (measure_idx + beat) % 3 {
                0 => leaf(&chord(seed, 3), "4")?.into(),
                1 => Group::beamed(vec![
                    leaf(&chord(seed, 2), "8")?,
                    leaf(&chord(seed + 1, 2), "8")?,
                ])?
                .into(),
                _ => Group::beamed(
                    (0..4)
                        .map(|idx| -> ScoreResult<Leaf> {
                            let pitch = pick(&bank, seed + idx).parse()?;
                            Ok(Leaf::note(pitch, sixteenth))
                        })
                        .collect::<ScoreResult<Vec<_>>>()?,
                )?
                .into(),
            };
            items.push(item);
        }
        let mut measure = Measure::new(items);
        if measure_idx == 0 {
            measure = measure.with_time_signature(3, 4);
        }
        part.push(measure);
    }
    Ok(Score::new(vec![part.into()])
        .with_title("Algorithmically Generated MusicXML")
        .with_composer("HTMLvis"))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let viewer = args.collect::<Vec<_>>().join(" ");
    let settings = ExportSettings::default();

    let scores = [
        ("DirectExample.musicxml", direct_score()?),
        ("AlgorithmicExample.musicxml", algorithmic_score(&settings)?),
    ];
    for (file_name, score) in scores.iter() {
        let rendered = score.render(&settings);
        for diagnostic in rendered.diagnostics.iter() {
            warn!("{file_name}: {diagnostic}");
        }
        let path = output.join(file_name);
        rendered.export_to_file(&path)?;
        info!("{} written", path.display());
        if !viewer.is_empty() {
            rendered.view_in_software(&viewer)?;
        }
    }
    Ok(())
}
