//! Beam grouping of a flat sequence of leaves.

use std::collections::BTreeMap;

use fraction::Fraction;

use super::{
    duration::Timed,
    fraction_tools::{round_half_even, whole, zero},
    leaf::{Leaf, Measured},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BeamState {
    Begin,
    Continue,
    End,
    ForwardHook,
    BackwardHook,
}
impl BeamState {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Continue => "continue",
            Self::End => "end",
            Self::ForwardHook => "forward hook",
            Self::BackwardHook => "backward hook",
        }
    }
    pub fn is_hook(&self) -> bool {
        matches!(self, Self::ForwardHook | Self::BackwardHook)
    }
}

/// Beam level (from 1) to its state.
pub type BeamMap = BTreeMap<u8, BeamState>;

pub trait Beamable {
    fn num_beams(&self) -> u8;
    fn written_length(&self) -> Fraction;
}
impl Beamable for Leaf {
    fn num_beams(&self) -> u8 {
        Leaf::num_beams(self)
    }
    fn written_length(&self) -> Fraction {
        Timed::written_length(self)
    }
}
impl<'a> Beamable for Measured<'a> {
    fn num_beams(&self) -> u8 {
        self.leaf().num_beams()
    }
    fn written_length(&self) -> Fraction {
        Timed::written_length(self)
    }
}

/// Resolve beams of every leaf in the sequence.
///
/// For every beam level a leaf takes part in it gets `continue` if both
/// neighbours take part too, `end` or `begin` if only one of them, and a
/// hook otherwise. Hook direction depends on the leaf position: forward on
/// even multiples of its own beat, backward on odd.
///
/// Leaves having only hooks are left unbeamed.
///
/// # Example
/// ```
/// # use musicxml_score::primitives::{resolve_beams, BeamState, Leaf};
/// let leaves = vec![
///     Leaf::parse("c4", "8").unwrap(),
///     Leaf::parse("d4", "16").unwrap(),
///     Leaf::parse("e4", "16").unwrap(),
/// ];
/// let beams = resolve_beams(&leaves);
/// assert_eq!(beams[0].get(&1), Some(&BeamState::Begin));
/// assert_eq!(beams[0].get(&2), None);
/// assert_eq!(beams[1].get(&2), Some(&BeamState::Begin));
/// assert_eq!(beams[2].get(&1), Some(&BeamState::End));
/// assert_eq!(beams[2].get(&2), Some(&BeamState::End));
/// ```
pub fn resolve_beams<T: Beamable>(leaves: &[T]) -> Vec<BeamMap> {
    let mut maps = vec![BeamMap::new(); leaves.len()];
    let max_beams = leaves.iter().map(|l| l.num_beams()).max().unwrap_or(0);
    let active = |idx: Option<usize>, depth: u8| match idx {
        Some(idx) if idx < leaves.len() => leaves[idx].num_beams() >= depth,
        _ => false,
    };
    for depth in 1..=max_beams {
        let mut start = zero();
        for (idx, leaf) in leaves.iter().enumerate() {
            if leaf.num_beams() >= depth {
                let previous = active(idx.checked_sub(1), depth);
                let next = active(Some(idx + 1), depth);
                let state = match (previous, next) {
                    (true, true) => BeamState::Continue,
                    (true, false) => BeamState::End,
                    (false, true) => BeamState::Begin,
                    (false, false) => hook(start, leaf.num_beams()),
                };
                maps[idx].insert(depth, state);
            }
            start += leaf.written_length();
        }
    }
    for map in maps.iter_mut() {
        if map.values().all(|state| state.is_hook()) {
            map.clear();
        }
    }
    maps
}

fn hook(start: Fraction, num_beams: u8) -> BeamState {
    let position = start * whole(2u64.pow(num_beams as u32));
    match round_half_even(position) % 2 {
        0 => BeamState::ForwardHook,
        _ => BeamState::BackwardHook,
    }
}
