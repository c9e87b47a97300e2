use std::collections::HashMap;
use std::error::Error as _;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::LazyLock;
use std::{fmt, mem};

use regex::Regex;
use tracing::{debug, error, trace};

use crate::error::ParseError;
use crate::section::{Row, RowMut, Section};
use crate::value::Value;
use crate::{DEFAULT_SECTION, decode_data};

/// Everything between the first `[` and the last `]` on the line.
static SECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+)\]").expect("section pattern is valid"));

/// `[;#]* key ([])? =  value`, with blanks allowed at the start and around `=`.
///
/// A `[]` after the key is not the only array marker: one anywhere on the line counts too.
static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?<comment>[;#]*)(?<key>[a-z0-9_+.-]+)(?<array>\[\])?[ ]*=[ ]*(?<value>.*)$")
        .expect("row pattern is valid")
});

/// Where a row lives: a slot in the section arena plus its position in that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowRef {
    section: usize,
    row: usize,
}

/// A parsed INI document.
///
/// Sections live in an append-only arena. A repeated `[name]` header installs a fresh section
/// under that name; the previous one stays in the arena so rows already reachable through the
/// global key index keep resolving.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    arena: Vec<Section>,
    /// Section name to its live arena slot.
    by_name: HashMap<String, usize>,
    /// Section names in the order they were first seen.
    order: Vec<String>,
    /// Key to the row most recently parsed under that key, in any section.
    index: HashMap<String, RowRef>,
    with_sections: bool,
}

/// One physical line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Section(&'a str),
    CommentedSection,
    Row {
        key: &'a str,
        value: &'a str,
        array: bool,
        commented: bool,
    },
    Other,
}

impl<'a> Line<'a> {
    fn classify(text: &'a str) -> Self {
        if text.is_empty() {
            return Self::Blank;
        }

        // A header anywhere on the line beats the row grammar.
        if let Some(caps) = SECTION_PATTERN.captures(text) {
            if text.starts_with(';') {
                return Self::CommentedSection;
            }
            return Self::Section(caps.get(1).map_or("", |m| m.as_str()));
        }

        match ROW_PATTERN.captures(text) {
            Some(caps) => Self::Row {
                key: caps.name("key").map_or("", |m| m.as_str()),
                value: caps.name("value").map_or("", |m| m.as_str()),
                array: caps.name("array").is_some() || text.contains("[]"),
                commented: caps.name("comment").is_some_and(|m| !m.is_empty()),
            },
            None => Self::Other,
        }
    }
}

impl Parser {
    /// Parses the file at `path`.
    ///
    /// If the file can't be read the failure is logged and the result holds no sections. Use
    /// [`Parser::try_open`] to get the error instead.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with(path, true)
    }

    /// Same as [`Parser::open`]. `with_sections` is recorded but does not change parsing.
    #[must_use]
    pub fn open_with(path: impl AsRef<Path>, with_sections: bool) -> Self {
        let mut parser = Self::empty(with_sections);

        if let Err(err) = parser.parse_file(path) {
            error!(error = %err, cause = ?err.source(), "can't open file");
        }

        parser
    }

    /// # Errors
    ///
    /// Returns [`ParseError::Open`] if the file can't be opened or read.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let mut parser = Self::empty(true);
        parser.parse_file(path)?;
        Ok(parser)
    }

    /// # Errors
    ///
    /// Returns [`ParseError::Read`] if reading from `reader` fails.
    pub fn from_reader<R>(reader: &mut R) -> Result<Self, ParseError>
    where
        R: Read,
    {
        let mut buffer = Vec::with_capacity(4096);
        reader
            .read_to_end(&mut buffer)
            .map_err(|source| ParseError::Read { source })?;

        let mut parser = Self::empty(true);
        parser.parse_bytes(&buffer);
        Ok(parser)
    }

    #[must_use]
    pub fn parse_str(text: &str) -> Self {
        let mut parser = Self::empty(true);
        parser.parse_text(text);
        parser
    }

    /// Parses another file into the existing tables. The current section is not carried over.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Open`] if the file can't be opened or read, in which case nothing
    /// is changed.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<(), ParseError> {
        let path = path.as_ref();
        let buffer = fs::read(path).map_err(|source| ParseError::Open {
            path: path.to_owned(),
            source,
        })?;

        debug!(path = %path.display(), bytes = buffer.len(), "parsing file");
        self.parse_bytes(&buffer);
        Ok(())
    }

    fn empty(with_sections: bool) -> Self {
        Self {
            with_sections,
            ..Self::default()
        }
    }

    fn parse_bytes(&mut self, buffer: &[u8]) {
        let text = decode_data(buffer);
        self.parse_text(&text);
    }

    fn parse_text(&mut self, text: &str) {
        let mut current = None::<usize>;

        for (i, line) in text.lines().enumerate() {
            let line_number = i + 1;

            match Line::classify(line) {
                Line::Blank => {}
                Line::CommentedSection => trace!(line = line_number, "skipping commented section"),
                Line::Section(name) => current = Some(self.install_section(name)),
                Line::Row {
                    key,
                    value,
                    array,
                    commented,
                } => {
                    let slot = *current.get_or_insert_with(|| self.install_section(DEFAULT_SECTION));
                    self.add_row(slot, key, value, array, commented, line_number);
                }
                Line::Other => trace!(line = line_number, "ignoring line"),
            }
        }
    }

    /// Puts a new, empty section under `name` and returns its arena slot.
    fn install_section(&mut self, name: &str) -> usize {
        let slot = self.arena.len();
        self.arena.push(Section::new(name));

        if self.by_name.insert(name.to_owned(), slot).is_none() {
            self.order.push(name.to_owned());
        } else {
            debug!(section = name, "section header repeated, starting over");
        }

        debug!(section = name, slot, "section header");
        slot
    }

    fn add_row(
        &mut self,
        slot: usize,
        key: &str,
        value: &str,
        array: bool,
        commented: bool,
        line: usize,
    ) {
        let section = &mut self.arena[slot];

        // Only a line carrying `[]` merges into an existing row. A plain repeat gets a row of
        // its own.
        let position = match section.position(key).filter(|_| array) {
            Some(position) => {
                if let Some(row) = section.row_at_mut(position) {
                    row.add_value(value);
                    row.set_is_commented(commented);
                }
                trace!(section = section.name(), key, line, "array value");
                position
            }
            None => {
                let mut row = Row::with_value(key, value, line);
                row.set_is_commented(commented);
                section.add_row(row);
                trace!(section = section.name(), key, line, "row");
                section.len() - 1
            }
        };

        self.index.insert(
            key.to_owned(),
            RowRef {
                section: slot,
                row: position,
            },
        );
    }

    /// The flag passed to [`Parser::open_with`]; `true` for every other constructor.
    #[must_use]
    pub fn with_sections(&self) -> bool {
        self.with_sections
    }

    /// Sections in the order their names first appeared.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.order.iter().filter_map(|name| self.get_section(name))
    }

    /// Accepts a name or another section.
    #[must_use]
    pub fn has_section(&self, name: impl AsRef<str>) -> bool {
        self.by_name.contains_key(name.as_ref())
    }

    #[must_use]
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.by_name.get(name).map(|&slot| &self.arena[slot])
    }

    /// The first row named `key` in `section`.
    #[must_use]
    pub fn get_row(&self, section: &str, key: &str) -> Option<&Row> {
        self.get_section(section)?.get_row(key)
    }

    /// The first row named `key` in `section`, open for appending values. Rows can't be
    /// replaced or re-keyed, so the global key index stays valid.
    pub fn get_row_mut(&mut self, section: &str, key: &str) -> Option<RowMut<'_>> {
        let slot = *self.by_name.get(section)?;
        self.arena.get_mut(slot)?.get_row_mut(key)
    }

    /// The row most recently parsed under `key`, whatever section it is in.
    #[must_use]
    pub fn get_row_by_key(&self, key: &str) -> Option<&Row> {
        let RowRef { section, row } = *self.index.get(key)?;
        self.arena.get(section)?.row_at(row)
    }

    /// First value of the row, or an empty [`Value`] if either the section or the key is
    /// missing.
    #[must_use]
    pub fn get_value(&self, section: &str, key: &str) -> Value {
        self.get_row(section, key)
            .map(Row::get_value)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get_value_by_key(&self, key: &str) -> Value {
        self.get_row_by_key(key)
            .map(Row::get_value)
            .unwrap_or_default()
    }

    /// Like [`Parser::get_value_by_key`], but a missing key yields `default` as the payload.
    #[must_use]
    pub fn get_value_or(&self, key: &str, default: impl Into<Value>) -> Value {
        match self.get_row_by_key(key) {
            Some(row) => row.get_value(),
            None => default.into(),
        }
    }

    /// Writes every section back out as INI text.
    ///
    /// Array rows are written as one `key[]=value` line per value.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn dump<W>(&self, out: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        write!(out, "{self}")
    }

    /// # Errors
    ///
    /// Returns any error from writing to stdout.
    pub fn dump_stdout(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.dump(&mut lock)?;
        lock.flush()
    }

    /// Consumes the parser, returning its live sections in first-seen order.
    #[must_use]
    pub fn into_sections(mut self) -> Vec<Section> {
        let mut arena = mem::take(&mut self.arena);
        self.order
            .iter()
            .filter_map(|name| self.by_name.get(name))
            .map(|&slot| mem::replace(&mut arena[slot], Section::new("")))
            .collect()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in self.sections() {
            writeln!(f, "[{}]", section.name())?;

            for row in section.rows() {
                let assign = if row.is_array() { "[]=" } else { "=" };
                let marker = if row.is_commented() { ";" } else { "" };

                for value in row.values() {
                    writeln!(f, "{marker}{}{assign}{value}", row.key())?;
                }
            }
        }

        Ok(())
    }
}
