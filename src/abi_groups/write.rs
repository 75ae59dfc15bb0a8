use {
    crate::error::ErrorKind,
    serde::Serialize,
    serde_json::{
        Value,
        ser::{Formatter, PrettyFormatter},
    },
    std::{
        fs::File,
        io::{self, BufWriter, Write},
        path::{Path, PathBuf},
    },
    tap::Pipe,
    tracing::instrument,
};

pub const DEFAULT_INDENT: usize = 4;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Creating output file {path:?}")]
    Creating {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Writing {count} entries into {path:?}")]
    Serializing {
        path: PathBuf,
        count: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Flushing output file {path:?}")]
    Flushing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Serializing a `Value` only fails on the underlying writer, so every variant is I/O.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Io
    }
}

type Result<T> = std::result::Result<T, self::Error>;

/// Pretty printing that keeps the output pure ASCII: every character outside
/// `' '..='~'` in a string is written as a lowercase `\uXXXX` escape, using surrogate
/// pairs above the BMP.
pub struct AsciiPrettyFormatter<'a>(PrettyFormatter<'a>);

impl<'a> AsciiPrettyFormatter<'a> {
    pub fn with_indent(indent: &'a [u8]) -> Self {
        Self(PrettyFormatter::with_indent(indent))
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        fragment
            .split_inclusive(|c: char| !matches!(c, ' '..='~'))
            .try_for_each(|chunk| match chunk.chars().next_back() {
                Some(last) if !matches!(last, ' '..='~') => {
                    writer.write_all(chunk[..chunk.len() - last.len_utf8()].as_bytes())?;
                    last.encode_utf16(&mut [0u16; 2])
                        .iter()
                        .try_for_each(|unit| write!(writer, "\\u{unit:04x}"))
                }
                _ => writer.write_all(chunk.as_bytes()),
            })
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.end_object_value(writer)
    }
}

/// Renders `entries` as a top level JSON array indented by `indent` spaces, with no trailing newline.
/// Non-ASCII text is escaped, see [`AsciiPrettyFormatter`].
pub fn to_writer_indented<W: Write>(
    writer: W,
    entries: &[Value],
    indent: usize,
) -> serde_json::Result<()> {
    let indent = " ".repeat(indent);
    let mut serializer = serde_json::Serializer::with_formatter(
        writer,
        AsciiPrettyFormatter::with_indent(indent.as_bytes()),
    );
    entries.serialize(&mut serializer)
}

pub fn to_string_indented(entries: &[Value], indent: usize) -> serde_json::Result<String> {
    Vec::new()
        .pipe(|mut buffer| to_writer_indented(&mut buffer, entries, indent).map(|()| buffer))
        .and_then(|buffer| {
            String::from_utf8(buffer).map_err(<serde_json::Error as serde::ser::Error>::custom)
        })
}

/// Creates or truncates `path` and writes the union into it. Returns the number of entries written.
#[instrument(skip_all, fields(path = %path.as_ref().display(), count = entries.len()))]
pub fn write_union(path: impl AsRef<Path>, entries: &[Value], indent: usize) -> Result<usize> {
    let path = path.as_ref();
    File::create(path)
        .map_err(|source| self::Error::Creating {
            path: path.to_owned(),
            source,
        })
        .map(BufWriter::new)
        .and_then(|mut writer| {
            to_writer_indented(&mut writer, entries, indent)
                .map_err(|source| self::Error::Serializing {
                    path: path.to_owned(),
                    count: entries.len(),
                    source,
                })
                .map(|()| writer)
        })
        .and_then(|mut writer| {
            writer.flush().map_err(|source| self::Error::Flushing {
                path: path.to_owned(),
                source,
            })
        })
        .map(|()| entries.len())
}
