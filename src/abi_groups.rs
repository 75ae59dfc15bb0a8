use {
    crate::{config::UnionConfig, error::Result},
    indexmap::IndexMap,
    serde_json::Value,
    tracing::{debug, info, instrument},
};

pub mod flatten;
pub mod load;
pub mod write;

/// How a single group contributes to the union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupShape {
    /// The group holds an array; each element becomes one entry.
    Sequence(usize),
    /// Any other value is copied over as a single entry.
    Single,
}

impl GroupShape {
    pub fn entry_count(self) -> usize {
        match self {
            GroupShape::Sequence(len) => len,
            GroupShape::Single => 1,
        }
    }
}

#[extension_traits::extension(pub trait GroupValueExt)]
impl Value {
    fn group_shape(&self) -> GroupShape {
        match self {
            Value::Array(entries) => GroupShape::Sequence(entries.len()),
            _ => GroupShape::Single,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Named ABI groups, kept in the order they appear in the source document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbiMapping(IndexMap<String, Value>);

impl AbiMapping {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, GroupShape)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.group_shape()))
    }

    /// Number of entries the union of this mapping will hold.
    pub fn expected_len(&self) -> usize {
        self.groups().map(|(_, shape)| shape.entry_count()).sum()
    }

    pub fn summary(&self) -> UnionSummary {
        self.groups().fold(
            UnionSummary {
                groups: self.len(),
                ..Default::default()
            },
            |mut summary, (_, shape)| {
                match shape {
                    GroupShape::Sequence(_) => summary.sequences += 1,
                    GroupShape::Single => summary.singles += 1,
                }
                summary.entries += shape.entry_count();
                summary
            },
        )
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }
}

impl FromIterator<(String, Value)> for AbiMapping {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<serde_json::Map<String, Value>> for AbiMapping {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnionSummary {
    pub groups: usize,
    pub sequences: usize,
    pub singles: usize,
    pub entries: usize,
}

/// Loads the grouped ABI document, flattens it and writes the union.
///
/// The input is read completely before the output location is touched, so a
/// missing or malformed input never creates or truncates the output file.
#[instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub fn run(config: &UnionConfig) -> Result<UnionSummary> {
    let mapping = load::load_mapping(&config.input)?;
    mapping
        .groups()
        .for_each(|(name, shape)| debug!(%name, ?shape, "group"));
    let summary = mapping.summary();
    let entries = flatten::union(mapping);
    let written = write::write_union(&config.output, &entries, config.indent)?;
    debug_assert_eq!(written, summary.entries);
    info!(
        groups = summary.groups,
        sequences = summary.sequences,
        singles = summary.singles,
        entries = written,
        "wrote ABI union"
    );
    Ok(summary)
}
