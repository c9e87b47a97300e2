use std::cmp::Ordering;
use std::ops::Deref;

use crate::value::Value;

/// A named group of rows, introduced by a `[name]` header.
///
/// Two sections compare equal when their names do.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    rows: Vec<Row>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::with_capacity(16),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows in the order they were added.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows sorted by the line they first appeared on.
    #[must_use]
    pub fn rows_by_line(&self) -> Vec<&Row> {
        let mut rows = self.rows.iter().collect::<Vec<_>>();
        rows.sort_by(|a, b| a.cmp_by_line(b));
        rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends `row` as-is. Nothing stops a second row with the same key from being added; the
    /// parser checks [`Section::has_row_key`] first when it wants to merge array values instead.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Accepts either a key or another row, in which case that row's key is looked up.
    #[must_use]
    pub fn has_row_key(&self, key: impl AsRef<str>) -> bool {
        self.position(key.as_ref()).is_some()
    }

    #[must_use]
    pub fn has_row(&self, key: impl AsRef<str>) -> bool {
        self.has_row_key(key)
    }

    /// The first row with a matching key.
    #[must_use]
    pub fn get_row(&self, key: impl AsRef<str>) -> Option<&Row> {
        self.position(key.as_ref()).map(|i| &self.rows[i])
    }

    /// The first row with a matching key, open for appending values.
    pub fn get_row_mut(&mut self, key: impl AsRef<str>) -> Option<RowMut<'_>> {
        self.position(key.as_ref()).map(|i| RowMut(&mut self.rows[i]))
    }

    pub(crate) fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn row_at_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.key == key)
    }
}

impl AsRef<str> for Section {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Section {}

impl PartialEq<str> for Section {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for Section {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialEq<String> for Section {
    fn eq(&self, other: &String) -> bool {
        self.name == *other
    }
}

/// One key within a section.
///
/// A row usually holds a single value. Repeating `key[]=...` within the same section appends
/// further values, which turns the row into an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: String,
    values: Vec<Value>,
    line: usize,
    commented: bool,
}

impl Row {
    /// A row without any value yet; `line` is 1-based.
    #[must_use]
    pub fn new(key: impl Into<String>, line: usize) -> Self {
        Self {
            key: key.into(),
            values: Vec::with_capacity(1),
            line,
            commented: false,
        }
    }

    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<Value>, line: usize) -> Self {
        let mut row = Self::new(key, line);
        row.add_value(value);
        row
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Line the key first appeared on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn add_value(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// The first value, or an empty one if nothing was added yet.
    #[must_use]
    pub fn get_value(&self) -> Value {
        self.values.first().cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.values.len() > 1
    }

    /// Whether the source line started with `;` or `#`.
    #[must_use]
    pub fn is_commented(&self) -> bool {
        self.commented
    }

    pub fn set_is_commented(&mut self, commented: bool) {
        self.commented = commented;
    }

    /// Orders rows by the line they first appeared on. Rows from the same line compare
    /// `Equal` even when their contents differ.
    #[must_use]
    pub fn cmp_by_line(&self, other: &Row) -> Ordering {
        self.line.cmp(&other.line)
    }

    /// True if `self` appeared on an earlier line than `other`.
    #[must_use]
    pub fn precedes(&self, other: &Row) -> bool {
        self.cmp_by_line(other).is_lt()
    }
}

/// Mutable access to a stored row that can only grow it.
///
/// Key and line stay fixed, so lookups that already resolved to this row keep matching it.
#[derive(Debug)]
pub struct RowMut<'a>(&'a mut Row);

impl RowMut<'_> {
    pub fn add_value(&mut self, value: impl Into<Value>) {
        self.0.add_value(value);
    }

    pub fn set_is_commented(&mut self, commented: bool) {
        self.0.set_is_commented(commented);
    }
}

impl Deref for RowMut<'_> {
    type Target = Row;

    fn deref(&self) -> &Row {
        self.0
    }
}

impl AsRef<str> for Row {
    fn as_ref(&self) -> &str {
        &self.key
    }
}
