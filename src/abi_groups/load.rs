use {
    super::{AbiMapping, GroupValueExt},
    crate::error::ErrorKind,
    serde::Deserialize,
    serde_json::Value,
    std::{fs::File, io::Read, path::Path},
    tap::{Pipe, TapFallible},
    tracing::instrument,
};

const IN_MEMORY: &str = "<in-memory document>";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Opening {origin}")]
    Opening {
        origin: Box<str>,
        #[source]
        source: std::io::Error,
    },
    #[error("Reading {origin}")]
    Reading {
        origin: Box<str>,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing {origin} as JSON")]
    Parsing {
        origin: Box<str>,
        #[source]
        source: serde_json::Error,
    },
    #[error("{origin} must hold an object of ABI groups at the top level, found {found}")]
    NotAMapping { origin: Box<str>, found: &'static str },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Opening { .. } | Error::Reading { .. } => ErrorKind::Io,
            Error::Parsing { .. } | Error::NotAMapping { .. } => ErrorKind::Parse,
        }
    }
}

type Result<T> = std::result::Result<T, self::Error>;

fn into_mapping(value: Value, origin: impl FnOnce() -> Box<str>) -> Result<AbiMapping> {
    match value {
        Value::Object(map) => map.pipe(AbiMapping::from).pipe(Ok),
        other => Err(self::Error::NotAMapping {
            origin: origin(),
            found: other.kind_name(),
        }),
    }
}

/// Decodes without serde_json's nesting limit; deep entries grow the stack on the heap instead.
fn decode(contents: &[u8]) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_slice(contents);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end().map(|()| value)
}

fn parse_slice(contents: &[u8], origin: impl Fn() -> Box<str>) -> Result<AbiMapping> {
    decode(contents)
        .map_err(|source| self::Error::Parsing {
            origin: origin(),
            source,
        })
        .and_then(|value| into_mapping(value, origin))
}

pub fn mapping_from_value(value: Value) -> Result<AbiMapping> {
    into_mapping(value, || Box::from(IN_MEMORY))
}

pub fn mapping_from_str(contents: &str) -> Result<AbiMapping> {
    parse_slice(contents.as_bytes(), || Box::from(IN_MEMORY))
}

pub fn mapping_from_reader(mut reader: impl Read) -> Result<AbiMapping> {
    Vec::new()
        .pipe(|mut contents| {
            reader
                .read_to_end(&mut contents)
                .map(|_| contents)
                .map_err(|source| self::Error::Reading {
                    origin: Box::from(IN_MEMORY),
                    source,
                })
        })
        .and_then(|contents| parse_slice(&contents, || Box::from(IN_MEMORY)))
}

/// Reads the whole file before decoding; the handle is released before parsing starts.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_mapping(path: impl AsRef<Path>) -> Result<AbiMapping> {
    let path = path.as_ref();
    let origin = || path.display().to_string().pipe(Box::<str>::from);
    File::open(path)
        .map_err(|source| self::Error::Opening {
            origin: origin(),
            source,
        })
        .and_then(|mut file| {
            Vec::new().pipe(|mut contents| {
                file.read_to_end(&mut contents)
                    .map(|_| contents)
                    .map_err(|source| self::Error::Reading {
                        origin: origin(),
                        source,
                    })
            })
        })
        .and_then(|contents| parse_slice(&contents, origin))
        .tap_ok(|mapping| tracing::debug!(groups = mapping.len(), "loaded ABI groups"))
}

#[cfg(test)]
mod tests {
    use {super::*, crate::abi_groups::GroupShape, serde_json::json, std::io::Write};

    #[test]
    fn test_loads_groups_in_document_order() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"second": [{"name": "a"}], "first": {"name": "b"}}"#)?;
        let mapping = load_mapping(file.path())?;
        assert_eq!(
            mapping.groups().collect::<Vec<_>>(),
            vec![("second", GroupShape::Sequence(1)), ("first", GroupShape::Single)]
        );
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_mapping(dir.path().join("starknet_combined.json")).unwrap_err();
        assert!(matches!(err, Error::Opening { .. }), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_truncated_document_is_parse() {
        let err = mapping_from_str(r#"{"a": [1, 2"#).unwrap_err();
        assert!(matches!(err, Error::Parsing { .. }), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_invalid_utf8_is_parse() {
        let err = mapping_from_reader(&b"{\"a\": \"\xff\xfe\"}"[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = mapping_from_str("[1, 2, 3]").unwrap_err();
        assert!(
            matches!(err, Error::NotAMapping { found: "array", .. }),
            "{err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(
            mapping_from_value(json!("abi")),
            Err(Error::NotAMapping { found: "string", .. })
        ));
    }

    #[test]
    fn test_duplicate_key_keeps_first_position_last_value() {
        let mapping = mapping_from_str(r#"{"a": 1, "b": 2, "a": [3, 4]}"#).expect("valid document");
        assert_eq!(
            mapping.groups().collect::<Vec<_>>(),
            vec![("a", GroupShape::Sequence(2)), ("b", GroupShape::Single)]
        );
    }

    fn nested(depth: usize) -> String {
        format!("{}1{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn test_deeply_nested_entries_are_accepted() -> anyhow::Result<()> {
        let mapping = mapping_from_str(&format!(r#"{{"a": [{}]}}"#, nested(1_000)))?;
        assert_eq!(
            mapping.groups().collect::<Vec<_>>(),
            vec![("a", GroupShape::Sequence(1))]
        );
        Ok(())
    }

    #[test]
    fn test_trailing_content_is_parse() {
        let err = mapping_from_str(r#"{"a": 1} {"b": 2}"#).unwrap_err();
        assert!(matches!(err, Error::Parsing { .. }), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_path_is_named_in_errors() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"not json")?;
        let err = load_mapping(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
        Ok(())
    }
}
