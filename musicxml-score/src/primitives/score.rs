use super::measure::Measure;

/// Single staff (or multi-staff instrument) with its measures.
///
/// Measure numbers are given at render time, from 1.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Part {
    name: String,
    measures: Vec<Measure>,
}
impl Part {
    pub fn new(name: impl Into<String>, measures: Vec<Measure>) -> Self {
        Self {
            name: name.into(),
            measures,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }
    pub fn measures_mut(&mut self) -> &mut Vec<Measure> {
        &mut self.measures
    }
    pub fn push(&mut self, measure: Measure) -> &mut Self {
        self.measures.push(measure);
        self
    }
}

/// Parts joined by a bracket and (optionally) by barlines.
#[derive(Debug, PartialEq, Clone)]
pub struct PartGroup {
    parts: Vec<Part>,
    has_bracket: bool,
    has_group_barline: bool,
}
impl PartGroup {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            parts,
            has_bracket: true,
            has_group_barline: true,
        }
    }
    pub fn with_bracket(mut self, has_bracket: bool) -> Self {
        self.has_bracket = has_bracket;
        self
    }
    pub fn with_group_barline(mut self, has_group_barline: bool) -> Self {
        self.has_group_barline = has_group_barline;
        self
    }
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
    pub fn parts_mut(&mut self) -> &mut Vec<Part> {
        &mut self.parts
    }
    pub fn has_bracket(&self) -> bool {
        self.has_bracket
    }
    pub fn has_group_barline(&self) -> bool {
        self.has_group_barline
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ScoreEntry {
    Part(Part),
    Group(PartGroup),
}
impl ScoreEntry {
    pub fn parts(&self) -> &[Part] {
        match self {
            Self::Part(part) => std::slice::from_ref(part),
            Self::Group(group) => group.parts(),
        }
    }
}
impl From<Part> for ScoreEntry {
    fn from(part: Part) -> Self {
        Self::Part(part)
    }
}
impl From<PartGroup> for ScoreEntry {
    fn from(group: PartGroup) -> Self {
        Self::Group(group)
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Score {
    entries: Vec<ScoreEntry>,
    title: Option<String>,
    composer: Option<String>,
}
impl Score {
    pub fn new(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn with_composer(mut self, composer: impl Into<String>) -> Self {
        self.composer = Some(composer.into());
        self
    }
    pub fn push(&mut self, entry: impl Into<ScoreEntry>) -> &mut Self {
        self.entries.push(entry.into());
        self
    }
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }
    pub fn entries_mut(&mut self) -> &mut Vec<ScoreEntry> {
        &mut self.entries
    }
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }
    /// Every part in score order, groups expanded.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.entries.iter().flat_map(|entry| entry.parts())
    }
}
