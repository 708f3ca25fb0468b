//! Filling measures with rests and wrapping any piece of a score into a
//! complete one, so that it can be exported or previewed on its own.

use fraction::Fraction;
use log::debug;

use crate::{
    error::{ScoreError, ScoreResult},
    notation::{Articulation, Direction, Notation, Notehead},
    primitives::{
        fraction_tools::{denom, describe, is_power_of_two, numer, sum, whole, zero},
        BarRestDuration, Clef, Duration, Group, Leaf, Measure, Part, PartGroup,
        Pitch, Score, Timed, VoiceItem,
    },
    settings::ExportSettings,
    xml_render::Rendered,
};

/// Append rests to `items` until they fill `desired` quarters.
///
/// The odd part of the remaining length goes first, as rests of
/// decreasing size, then whole, half and quarter rests from the shortest
/// to the longest.
///
/// # Example
/// ```
/// # use musicxml_score::primitives::{Leaf, Timed, fraction_tools::whole};
/// # use musicxml_score::wrap::pad_with_rests;
/// # use fraction::Fraction;
/// let items = vec![Leaf::parse("c4", "8").unwrap().into()];
/// let padded = pad_with_rests(items, whole(4)).unwrap();
/// let lengths: Vec<_> = padded.iter().map(|i| i.true_length()).collect();
/// assert_eq!(
///     lengths,
///     vec![
///         Fraction::new(1u64, 2u64),
///         Fraction::new(1u64, 2u64),
///         Fraction::from(1u64),
///         Fraction::from(2u64),
///     ]
/// );
/// ```
pub fn pad_with_rests(
    mut items: Vec<VoiceItem>,
    desired: Fraction,
) -> ScoreResult<Vec<VoiceItem>> {
    let length = sum(items.iter().map(|item| item.true_length()));
    if length > desired {
        return Err(ScoreError::LengthOverflow { length, desired });
    }
    let mut remaining = desired - length;
    if !is_power_of_two(denom(&remaining)) {
        return Err(ScoreError::RemainingLengthNeedsTuplet(remaining));
    }

    let mut longer = Vec::new();
    for rest_length in [4, 2, 1].map(whole) {
        while remaining >= rest_length {
            longer.push(rest_length);
            remaining = remaining - rest_length;
        }
    }
    longer.reverse();

    let mut odd = Vec::new();
    while remaining > zero() {
        let rest_length = Fraction::new(1u64, denom(&remaining));
        odd.push(rest_length);
        remaining = remaining - rest_length;
    }

    let rests: Vec<Fraction> = odd.into_iter().chain(longer).collect();
    debug!("padding with rests: {}", describe(&rests));
    for rest_length in rests {
        let duration = Duration::from_written_length(rest_length)?;
        items.push(Leaf::rest(duration).into());
    }
    Ok(items)
}

/// Anything that can stand alone as a complete score.
pub trait WrapAsScore {
    fn wrap_as_score(&self) -> ScoreResult<Score>;

    /// Wrap and render in one go.
    fn render_wrapped(&self, settings: &ExportSettings) -> ScoreResult<Rendered> {
        Ok(self.wrap_as_score()?.render(settings))
    }
}

/// Single measure of `length` quarters, padded with rests, in `length/4`.
fn padded_measure(item: VoiceItem, length: u64) -> ScoreResult<Score> {
    let items = pad_with_rests(vec![item], whole(length))?;
    Measure::new(items)
        .with_time_signature(length as u32, 4)
        .wrap_as_score()
}

impl WrapAsScore for Leaf {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        let true_length = self.true_length();
        if self.is_bar_rest() {
            let (beats, beat_type) = (numer(&true_length), denom(&true_length));
            if !is_power_of_two(beat_type) {
                return Err(ScoreError::InvalidContent(format!(
                    "bar rest of {true_length} quarters has no time signature"
                )));
            }
            return Measure::new(vec![self.clone().into()])
                .with_time_signature(beats as u32, beat_type as u32 * 4)
                .wrap_as_score();
        }
        let length = match true_length <= whole(4) {
            true => 4,
            false => numer(&true_length) / denom(&true_length) + 1,
        };
        padded_measure(self.clone().into(), length)
    }
}

impl WrapAsScore for Group {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        let true_length = self.true_length();
        let length = match true_length <= whole(4) {
            true => 4,
            false => {
                let (n, d) = (numer(&true_length), denom(&true_length));
                (n + d - 1) / d
            }
        };
        padded_measure(self.clone().into(), length)
    }
}

impl WrapAsScore for Measure {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Part::new("", vec![self.clone()]).wrap_as_score()
    }
}

impl WrapAsScore for Part {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Ok(Score::new(vec![self.clone().into()]))
    }
}

impl WrapAsScore for PartGroup {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Ok(Score::new(vec![self.clone().into()]))
    }
}

impl WrapAsScore for Score {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Ok(self.clone())
    }
}

impl WrapAsScore for Pitch {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Leaf::note(*self, "quarter".parse()?).wrap_as_score()
    }
}

impl WrapAsScore for Duration {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Leaf::note("c4".parse()?, *self).wrap_as_score()
    }
}

impl WrapAsScore for BarRestDuration {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Leaf::bar_rest(self.length()).wrap_as_score()
    }
}

fn c5_quarter() -> ScoreResult<Leaf> {
    Leaf::parse("c5", "quarter")
}

impl WrapAsScore for Notehead {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        c5_quarter()?.with_notehead(*self).wrap_as_score()
    }
}

impl WrapAsScore for Notation {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        c5_quarter()?.with_notation(self.clone()).wrap_as_score()
    }
}

impl WrapAsScore for Articulation {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        c5_quarter()?.with_articulation(self.clone()).wrap_as_score()
    }
}

impl WrapAsScore for Direction {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Leaf::bar_rest(whole(4))
            .with_direction(self.clone())
            .wrap_as_score()
    }
}

impl WrapAsScore for Clef {
    fn wrap_as_score(&self) -> ScoreResult<Score> {
        Measure::new(vec![Leaf::bar_rest(whole(4)).into()])
            .with_time_signature(4, 4)
            .with_clef(*self)
            .wrap_as_score()
    }
}
