use fraction::Fraction;
use itertools::zip_eq;
use musicxml_score::{
    primitives::{Group, Leaf, Measure, Part, Score, Timed, TupletRatio},
    ExportSettings,
};

fn triplet(durations: &[&str]) -> Group {
    Group::tuplet(
        durations
            .iter()
            .map(|d| Leaf::parse("c4", d).unwrap())
            .collect(),
        TupletRatio::new(3, 2).unwrap(),
    )
    .unwrap()
}

#[test]
fn ratio_applies_to_every_leaf() {
    let _ = env_logger::builder().is_test(true).try_init();
    let group = triplet(&["4", "8", "8", "4"]);
    for measured in group.measured() {
        assert_eq!(
            measured.true_length(),
            measured.written_length() * Fraction::new(2u64, 3u64)
        );
    }
    let measure = Measure::new(vec![group.into()]);
    assert_eq!(measure.base_divisions() % 3, 0);
}

#[test]
fn stamped_ratio_survives_mutation() {
    let mut group = triplet(&["8", "8"]);
    group.push(Leaf::parse("e4", "8").unwrap()).unwrap();
    for leaf in group.leaves() {
        assert_eq!(leaf.duration().unwrap().tuplet().map(|r| r.actual()), Some(3));
    }
    group.leaves_mut()[0]
        .duration_mut()
        .unwrap()
        .set_tuplet(None);
    // queries overlay the group ratio regardless
    assert_eq!(group.true_length(), Fraction::from(1u64));
}

#[test]
fn time_modification_and_brackets() {
    let quintuplet = Group::tuplet(
        (0..5).map(|_| Leaf::parse("g4", "16").unwrap()).collect(),
        TupletRatio::with_normal_length(5, 4, Fraction::new(1u64, 4u64)).unwrap(),
    )
    .unwrap();
    let measure = Measure::new(vec![
        quintuplet.into(),
        Leaf::parse("a4", "2.").unwrap().into(),
    ]);
    let score = Score::new(vec![Part::new("", vec![measure]).into()]);
    let rendered = score.render(&ExportSettings::default());
    let notes = rendered.document.descendants_named("note");
    assert_eq!(notes.len(), 6);
    let brackets: Vec<Option<String>> = notes
        .iter()
        .map(|n| {
            n.descendants_named("tuplet")
                .first()
                .and_then(|t| t.attr("type"))
                .map(String::from)
        })
        .collect();
    let expected = [Some("start"), None, None, None, Some("stop"), None];
    for (found, expected) in zip_eq(brackets, expected) {
        assert_eq!(found.as_deref(), expected);
    }
    let modification = notes[0].child("time-modification").unwrap();
    assert_eq!(
        modification.child_names(),
        vec!["actual-notes", "normal-notes", "normal-type"]
    );
    assert_eq!(modification.child("normal-type").unwrap().text(), Some("16th"));
    let durations: Vec<_> = notes
        .iter()
        .map(|n| n.child("duration").unwrap().text().unwrap().to_string())
        .collect();
    assert_eq!(durations, vec!["1", "1", "1", "1", "1", "15"]);
}

#[test]
fn malformed_groups() {
    assert!(TupletRatio::new(0, 2).is_err());
    assert!(Group::beamed(vec![]).is_err());
    assert!(Group::beamed(vec![Leaf::bar_rest(Fraction::from(4u64))]).is_err());
}
