//! Spanner bookkeeping of a part: slur number remapping and dashed line
//! validation.
//!
//! Slurs may carry any caller-chosen id. The document format allows only a
//! small pool of numbers per part, so ids are remapped while walking the
//! part in time order: a started slur takes a free number, a stopped one
//! gives it back.

use std::collections::{BTreeMap, HashMap};

use fraction::Fraction;
use log::debug;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    notation::{Direction, LinkId, SlurAction},
    primitives::{LeafKey, Part},
    settings::ExportSettings,
};

/// Location of a leaf-level notation inside a part.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct NotationKey {
    /// Measure index, from 0.
    pub measure: usize,
    pub leaf: LeafKey,
    /// Index in the notations of the leaf.
    pub index: usize,
}

/// Output numbers of slur notations. Omitted slurs have no entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlurNumbers {
    numbers: HashMap<NotationKey, u8>,
}
impl SlurNumbers {
    pub fn get(&self, key: &NotationKey) -> Option<u8> {
        self.numbers.get(key).copied()
    }
    pub fn len(&self) -> usize {
        self.numbers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// What a slur stop resolves to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlurStop {
    Number(u8),
    /// The matching start got no number and was omitted.
    StartOmitted,
    /// No slur of the id is open.
    NotStarted,
}
impl SlurStop {
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }
}

/// Maps slur ids to numbers from `1..=pool_size`.
#[derive(Debug, Clone)]
pub struct SlurRemapper {
    pool_size: u8,
    /// Open starts per id, `None` for omitted ones.
    open: BTreeMap<LinkId, Vec<Option<u8>>>,
}
impl SlurRemapper {
    pub fn new(pool_size: u8) -> Self {
        Self {
            pool_size,
            open: BTreeMap::new(),
        }
    }

    /// Number for a slur start.
    ///
    /// An id with an open slur reuses its number. Otherwise the lowest free
    /// number is taken.
    ///
    /// # Returns
    /// None if every number is taken. The start is still remembered, so
    /// that its stop resolves to [SlurStop::StartOmitted].
    ///
    /// # Example
    /// ```
    /// # use musicxml_score::slurs::{SlurRemapper, SlurStop};
    /// let mut slurs = SlurRemapper::new(6);
    /// assert_eq!(slurs.start(&"a".into()), Some(1));
    /// assert_eq!(slurs.start(&"b".into()), Some(2));
    /// assert_eq!(slurs.stop(&"a".into()), SlurStop::Number(1));
    /// assert_eq!(slurs.start(&"c".into()), Some(1));
    /// ```
    pub fn start(&mut self, id: &LinkId) -> Option<u8> {
        let reused = self
            .open
            .get(id)
            .and_then(|slots| slots.iter().rev().flatten().next().copied());
        let number = reused.or_else(|| self.lowest_free());
        self.open.entry(id.clone()).or_default().push(number);
        number
    }

    /// Resolve a slur stop against the most recent start of the id.
    pub fn stop(&mut self, id: &LinkId) -> SlurStop {
        let Some(slots) = self.open.get_mut(id) else {
            return SlurStop::NotStarted;
        };
        let slot = slots.pop();
        if slots.is_empty() {
            self.open.remove(id);
        }
        match slot {
            Some(Some(number)) => SlurStop::Number(number),
            Some(None) => SlurStop::StartOmitted,
            None => SlurStop::NotStarted,
        }
    }

    /// Number of ids holding a slur number.
    pub fn open_count(&self) -> usize {
        self.open
            .values()
            .filter(|slots| slots.iter().any(Option::is_some))
            .count()
    }

    fn lowest_free(&self) -> Option<u8> {
        (1..=self.pool_size).find(|number| {
            !self
                .open
                .values()
                .any(|slots| slots.contains(&Some(*number)))
        })
    }
}

/// Slur numbers of a part, with problems found on the way.
///
/// `part_number` (from 1) is used only for diagnostics.
pub fn remap_slurs(
    part: &Part,
    part_number: usize,
    settings: &ExportSettings,
) -> (SlurNumbers, Diagnostics) {
    let mut remapper = SlurRemapper::new(settings.slur_pool_size);
    let mut numbers = SlurNumbers::default();
    let mut diagnostics = Diagnostics::new();
    for (measure_idx, measure) in part.measures().iter().enumerate() {
        for leaf_ref in measure.leaves_in_time_order() {
            for (index, notation) in leaf_ref.leaf().notations().iter().enumerate()
            {
                let Some((action, id)) = notation.slur() else {
                    continue;
                };
                let key = NotationKey {
                    measure: measure_idx,
                    leaf: leaf_ref.key,
                    index,
                };
                let diagnostic = |kind, message: String| {
                    Diagnostic::new(part_number, measure_idx + 1, kind, message)
                };
                match action {
                    SlurAction::Start => match remapper.start(id) {
                        Some(number) => {
                            numbers.numbers.insert(key, number);
                        }
                        None => diagnostics.add(diagnostic(
                            DiagnosticKind::SlurOverflow,
                            format!(
                                "no free slur number for slur `{id}`: more \
                                than {} slurs open, start omitted",
                                settings.slur_pool_size
                            ),
                        )),
                    },
                    SlurAction::Stop => match remapper.stop(id) {
                        SlurStop::Number(number) => {
                            numbers.numbers.insert(key, number);
                        }
                        SlurStop::StartOmitted => {
                            debug!("slur `{id}` start was omitted, omitting stop");
                        }
                        SlurStop::NotStarted => diagnostics.add(diagnostic(
                            DiagnosticKind::SlurStopWithoutStart,
                            format!(
                                "slur `{id}` stopped but never started, \
                                stop omitted"
                            ),
                        )),
                    },
                }
            }
        }
    }
    (numbers, diagnostics)
}

/// Check that every dashed line of the part is started once and stopped.
///
/// Lines keep their numbers, problems are reported only.
pub fn validate_dashed_lines(part: &Part, part_number: usize) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    // line number to the measure it was opened in
    let mut open: BTreeMap<u32, usize> = BTreeMap::new();
    for (measure_idx, measure) in part.measures().iter().enumerate() {
        let measure_number = measure_idx + 1;
        let mut directions: Vec<(Fraction, &Direction)> = measure
            .leaves_in_time_order()
            .into_iter()
            .flat_map(|leaf_ref| {
                leaf_ref
                    .leaf()
                    .directions()
                    .iter()
                    .map(move |direction| (leaf_ref.start, direction))
            })
            .chain(measure.directions().iter().map(|(d, pos)| (*pos, d)))
            .collect();
        directions.sort_by(|a, b| {
            a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
        });
        for (_, direction) in directions {
            if let Some(line) = direction.starts_dashed_line() {
                if let Some(opened) = open.insert(line, measure_number) {
                    diagnostics.add(Diagnostic::new(
                        part_number,
                        measure_number,
                        DiagnosticKind::DashedLineRestarted,
                        format!(
                            "dashed line {line} started again, while open \
                            since measure {opened}"
                        ),
                    ));
                }
            }
            if let Some(line) = direction.stops_dashed_line() {
                if open.remove(&line).is_none() {
                    diagnostics.add(Diagnostic::new(
                        part_number,
                        measure_number,
                        DiagnosticKind::DashedLineStopWithoutStart,
                        format!("dashed line {line} stopped but never started"),
                    ));
                }
            }
        }
    }
    for (line, opened) in open {
        diagnostics.add(Diagnostic::new(
            part_number,
            opened,
            DiagnosticKind::DashedLineUnclosed,
            format!("dashed line {line} is never stopped"),
        ));
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_same_id_reuses_number() {
        let mut slurs = SlurRemapper::new(6);
        let a: LinkId = "a".into();
        assert_eq!(slurs.start(&a), Some(1));
        assert_eq!(slurs.start(&a), Some(1));
        assert_eq!(slurs.start(&2.into()), Some(2));
        assert_eq!(slurs.stop(&a), SlurStop::Number(1));
        assert_eq!(slurs.open_count(), 2);
        assert_eq!(slurs.stop(&a), SlurStop::Number(1));
        assert_eq!(slurs.stop(&a), SlurStop::NotStarted);
        assert_eq!(slurs.start(&"b".into()), Some(1));
    }

    #[test]
    fn pool_overflow() {
        let mut slurs = SlurRemapper::new(2);
        assert_eq!(slurs.start(&1.into()), Some(1));
        assert_eq!(slurs.start(&2.into()), Some(2));
        assert_eq!(slurs.start(&3.into()), None);
        assert_eq!(slurs.open_count(), 2);
        assert_eq!(slurs.stop(&3.into()), SlurStop::StartOmitted);
        assert_eq!(slurs.stop(&3.into()), SlurStop::NotStarted);
        assert_eq!(slurs.stop(&1.into()), SlurStop::Number(1));
        assert_eq!(slurs.start(&3.into()), Some(1));
    }

    #[test]
    fn omitted_start_under_a_numbered_one() {
        let mut slurs = SlurRemapper::new(1);
        assert_eq!(slurs.start(&"a".into()), Some(1));
        assert_eq!(slurs.start(&"b".into()), None);
        assert_eq!(slurs.stop(&"a".into()), SlurStop::Number(1));
        // "b" starts again, now with a number, on top of the omitted one
        assert_eq!(slurs.start(&"b".into()), Some(1));
        assert_eq!(slurs.stop(&"b".into()), SlurStop::Number(1));
        assert_eq!(slurs.stop(&"b".into()), SlurStop::StartOmitted);
        assert_eq!(slurs.open_count(), 0);
    }
}
