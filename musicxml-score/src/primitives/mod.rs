//! Elements, from which the score is constructed.
//!
//! Leaves (notes, chords, rests) are held by voices of a measure, either
//! loose or joined into beamed groups and tuplets. Measures are held by
//! parts, parts by the score.

pub mod beam;
pub mod duration;
pub mod fraction_tools;
pub mod group;
pub mod leaf;
pub mod measure;
pub mod pitch;
pub mod score;

pub use beam::{resolve_beams, BeamMap, BeamState, Beamable};
pub use duration::{
    decompose, dot_multiplier, BarRestDuration, Duration, NoteType, Timed,
    TupletRatio, MAX_DOTS,
};
pub use group::{Group, GroupKind, TupletBracket};
pub use leaf::{Grace, Leaf, LeafDuration, LeafKind, Measured, Pitched, Tie};
pub use measure::{
    Barline, Clef, ClefSign, LeafKey, LeafRef, Measure, TimeSignature, Voice,
    VoiceItem,
};
pub use pitch::{Pitch, Step};
pub use score::{Part, PartGroup, Score, ScoreEntry};
