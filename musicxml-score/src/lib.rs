//! Hierarchical score model exported to MusicXML 3.0 partwise documents.
//!
//! A [Score](primitives::Score) holds parts, parts hold measures, measures
//! hold voices of leaves and groups. Rendering resolves everything the
//! document needs but the model leaves implicit: divisions per measure,
//! voice interleaving, beams, tuplet brackets and slur numbers.
//!
//! # Example
//! ```
//! use musicxml_score::{
//!     primitives::{Group, Leaf, Measure, Part, Score, TupletRatio},
//!     ExportSettings,
//! };
//!
//! let triplet = Group::tuplet(
//!     vec![
//!         Leaf::parse("c4", "8").unwrap(),
//!         Leaf::parse("d4", "8").unwrap(),
//!         Leaf::parse("e4", "8").unwrap(),
//!     ],
//!     TupletRatio::new(3, 2).unwrap(),
//! )
//! .unwrap();
//! let measure = Measure::new(vec![
//!     triplet.into(),
//!     Leaf::parse("f4", "2.").unwrap().into(),
//! ])
//! .with_time_signature(4, 4);
//! let score = Score::new(vec![Part::new("Piano", vec![measure]).into()]);
//! let xml = score
//!     .render(&ExportSettings::default())
//!     .to_xml_string(false, 0)
//!     .unwrap();
//! assert!(xml.contains("<divisions>3</divisions>"));
//! assert!(xml.contains("<actual-notes>3</actual-notes>"));
//! ```

pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod notation;
pub mod primitives;
pub mod settings;
pub mod slurs;
pub mod wrap;
pub mod xml_render;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{ScoreError, ScoreResult};
pub use settings::ExportSettings;
pub use wrap::{pad_with_rests, WrapAsScore};
pub use xml_render::{Rendered, RendersToXml, XmlElement};
