use {crate::abi_groups::write::DEFAULT_INDENT, std::path::PathBuf};

pub const DEFAULT_INPUT: &str = "starknet_combined.json";
pub const DEFAULT_OUTPUT: &str = "starknet_union.json";

/// Where the grouped ABI document is read from and where the union goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Spaces per indentation level in the written document.
    pub indent: usize,
}

impl Default for UnionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            indent: DEFAULT_INDENT,
        }
    }
}

impl UnionConfig {
    pub fn with_input(self, input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..self
        }
    }

    pub fn with_output(self, output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..self
        }
    }

    pub fn with_indent(self, indent: usize) -> Self {
        Self { indent, ..self }
    }
}
