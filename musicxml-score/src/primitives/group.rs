//! Beamed groups and tuplets: flat ordered runs of leaves in a voice.

use fraction::Fraction;

use super::{
    beam::{resolve_beams, BeamMap},
    duration::{Timed, TupletRatio},
    fraction_tools::{lcm_all, sum},
    leaf::{Leaf, Measured},
};
use crate::error::{ScoreError, ScoreResult};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GroupKind {
    Beamed,
    Tuplet(TupletRatio),
}

/// Where the tuplet bracket of a leaf starts or stops.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TupletBracket {
    Start,
    Stop,
    /// Single-leaf tuplet.
    Both,
}
impl TupletBracket {
    pub fn starts(&self) -> bool {
        matches!(self, Self::Start | Self::Both)
    }
    pub fn stops(&self) -> bool {
        matches!(self, Self::Stop | Self::Both)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Group {
    kind: GroupKind,
    leaves: Vec<Leaf>,
}
impl Group {
    /// Leaves joined under a single beam.
    ///
    /// # Returns
    /// Err(InvalidContent) if empty or holds a bar rest.
    pub fn beamed(leaves: Vec<Leaf>) -> ScoreResult<Self> {
        Self::new(GroupKind::Beamed, leaves)
    }

    /// Leaves under the given ratio. The ratio is stamped on every leaf
    /// duration.
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use musicxml_score::primitives::{Group, Leaf, Timed, TupletRatio};
    /// let triplet = Group::tuplet(
    ///     vec![
    ///         Leaf::parse("c4", "8").unwrap(),
    ///         Leaf::parse("d4", "8").unwrap(),
    ///         Leaf::parse("e4", "8").unwrap(),
    ///     ],
    ///     TupletRatio::new(3, 2).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(triplet.true_length(), Fraction::new(1u64, 1u64));
    /// assert_eq!(triplet.written_length(), Fraction::new(3u64, 2u64));
    /// assert_eq!(triplet.min_denominator(), 3);
    /// ```
    pub fn tuplet(leaves: Vec<Leaf>, ratio: TupletRatio) -> ScoreResult<Self> {
        Self::new(GroupKind::Tuplet(ratio), leaves)
    }

    fn new(kind: GroupKind, leaves: Vec<Leaf>) -> ScoreResult<Self> {
        if leaves.is_empty() {
            return Err(ScoreError::InvalidContent(
                "group should contain at least one leaf".to_string(),
            ));
        }
        leaves.iter().try_for_each(check_leaf)?;
        let mut group = Self { kind, leaves };
        group.stamp_tuplet();
        Ok(group)
    }

    pub fn push(&mut self, leaf: Leaf) -> ScoreResult<&mut Self> {
        self.insert(self.leaves.len(), leaf)
    }

    /// Insert leaf at index (clamped to the group length).
    pub fn insert(
        &mut self,
        index: usize,
        leaf: Leaf,
    ) -> ScoreResult<&mut Self> {
        check_leaf(&leaf)?;
        let index = index.min(self.leaves.len());
        self.leaves.insert(index, leaf);
        self.stamp_tuplet();
        Ok(self)
    }

    /// Write the tuplet ratio into every leaf duration.
    ///
    /// Queries overlay the ratio anyway, so this matters only for callers
    /// reading leaf durations directly.
    pub fn stamp_tuplet(&mut self) -> &mut Self {
        if let GroupKind::Tuplet(ratio) = self.kind {
            for leaf in self.leaves.iter_mut() {
                if let Some(duration) = leaf.duration_mut() {
                    duration.set_tuplet(Some(ratio));
                }
            }
        }
        self
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }
    pub fn ratio(&self) -> Option<TupletRatio> {
        match self.kind {
            GroupKind::Tuplet(ratio) => Some(ratio),
            GroupKind::Beamed => None,
        }
    }
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }
    /// Leaves can be mutated in place, but not added or removed.
    pub fn leaves_mut(&mut self) -> &mut [Leaf] {
        &mut self.leaves
    }
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Leaves with the group ratio overlaid on their durations.
    pub fn measured(&self) -> impl Iterator<Item = Measured<'_>> + '_ {
        let ratio = self.ratio();
        self.leaves.iter().map(move |leaf| leaf.measured_with(ratio))
    }

    pub fn tuplet_bracket(&self, index: usize) -> Option<TupletBracket> {
        if self.ratio().is_none() || index >= self.leaves.len() {
            return None;
        }
        let last = self.leaves.len() - 1;
        match (index == 0, index == last) {
            (true, true) => Some(TupletBracket::Both),
            (true, false) => Some(TupletBracket::Start),
            (false, true) => Some(TupletBracket::Stop),
            (false, false) => None,
        }
    }

    /// Beam maps of every leaf in the group.
    pub fn beams(&self) -> Vec<BeamMap> {
        resolve_beams(&self.measured().collect::<Vec<_>>())
    }
}
impl Timed for Group {
    fn written_length(&self) -> Fraction {
        sum(self.measured().map(|m| m.written_length()))
    }
    fn true_length(&self) -> Fraction {
        sum(self.measured().map(|m| m.true_length()))
    }
    fn min_denominator(&self) -> u64 {
        lcm_all(self.measured().map(|m| m.min_denominator()))
    }
}

fn check_leaf(leaf: &Leaf) -> ScoreResult<()> {
    match leaf.is_bar_rest() {
        true => Err(ScoreError::InvalidContent(
            "bar rest can not be placed in a group".to_string(),
        )),
        false => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::*;
    use crate::primitives::{BeamState, Duration, NoteType};

    fn eighths(count: usize) -> Vec<Leaf> {
        (0..count)
            .map(|_| Leaf::parse("c5", "8").unwrap())
            .collect()
    }

    #[test]
    fn invalid_groups() {
        assert!(Group::beamed(vec![]).is_err());
        let bar_rest = Leaf::bar_rest(Fraction::new(4u64, 1u64));
        assert!(Group::beamed(vec![bar_rest.clone()]).is_err());
        let mut group = Group::beamed(eighths(2)).unwrap();
        assert!(group.push(bar_rest).is_err());
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn stamping() {
        let ratio = TupletRatio::new(3, 2).unwrap();
        let mut tuplet = Group::tuplet(eighths(2), ratio).unwrap();
        tuplet
            .push(Leaf::parse("c4 e4", "8").unwrap())
            .unwrap();
        assert!(tuplet
            .leaves()
            .iter()
            .all(|leaf| leaf.duration().unwrap().tuplet() == Some(ratio)));
        // mutated after insertion, still measured with the ratio
        tuplet.leaves_mut()[0]
            .duration_mut()
            .unwrap()
            .set_tuplet(None)
            .set_note_type(NoteType::Quarter);
        assert_eq!(tuplet.true_length(), Fraction::new(4u64, 3u64));
        assert_eq!(tuplet.min_denominator(), 3);
    }

    #[test]
    fn brackets() {
        let ratio = TupletRatio::new(5, 4).unwrap();
        let tuplet = Group::tuplet(eighths(5), ratio).unwrap();
        assert_eq!(tuplet.tuplet_bracket(0), Some(TupletBracket::Start));
        assert_eq!(tuplet.tuplet_bracket(2), None);
        assert_eq!(tuplet.tuplet_bracket(4), Some(TupletBracket::Stop));
        let single = Group::tuplet(eighths(1), ratio).unwrap();
        assert_eq!(single.tuplet_bracket(0), Some(TupletBracket::Both));
        let beamed = Group::beamed(eighths(2)).unwrap();
        assert_eq!(beamed.tuplet_bracket(0), None);
    }

    #[test]
    fn beams_with_rest() {
        let mut leaves = eighths(2);
        leaves.insert(1, Leaf::rest(Duration::from(NoteType::Eighth)));
        let beams = Group::beamed(leaves).unwrap().beams();
        assert!(beams.iter().all(|map| map.is_empty()));
        let beams = Group::beamed(eighths(3)).unwrap().beams();
        assert_eq!(beams[1].get(&1), Some(&BeamState::Continue));
    }
}
