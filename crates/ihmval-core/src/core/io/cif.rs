use crate::core::io::traits::TextFormat;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    /// The `.` marker.
    Inapplicable,
    /// The `?` marker.
    Unknown,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Value>,
}

/// A named mmCIF category, stored column-wise.
///
/// Columns of a well-formed category all have the same length. A loop whose
/// value count is not a multiple of its tag count produces columns of unequal
/// length; this is kept as-is so that consumers can reject it explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "column '{column}' of category '{category}' has {found} rows, expected {expected}"
)]
pub struct ColumnMismatch {
    pub category: String,
    pub column: String,
    pub expected: usize,
    pub found: usize,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            columns: Vec::new(),
        }
    }

    pub fn with_column<S: AsRef<str>>(mut self, name: &str, values: &[S]) -> Self {
        let values = values
            .iter()
            .map(|v| classify_value(v.as_ref().to_string(), false))
            .collect();
        self.columns.push(Column {
            name: normalize_name(name),
            values,
        });
        self
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.values.as_slice())
    }

    /// Returns the common row count of all columns.
    pub fn row_count(&self) -> Result<usize, ColumnMismatch> {
        let Some(first) = self.columns.first() else {
            return Ok(0);
        };
        let expected = first.values.len();
        for column in &self.columns[1..] {
            if column.values.len() != expected {
                return Err(ColumnMismatch {
                    category: self.name.clone(),
                    column: column.name.clone(),
                    expected,
                    found: column.values.len(),
                });
            }
        }
        Ok(expected)
    }

    /// Returns the requested columns aligned row by row.
    ///
    /// Every column of the category is length-checked, not only the requested
    /// ones. A requested column the category does not carry reads as a column
    /// of absent values.
    pub fn rows(&self, names: &[&str]) -> Result<Vec<Vec<Option<&str>>>, ColumnMismatch> {
        let n = self.row_count()?;
        let selected: Vec<Option<&[Value]>> = names.iter().map(|name| self.column(name)).collect();
        Ok((0..n)
            .map(|row| {
                selected
                    .iter()
                    .map(|col| col.and_then(|values| values[row].as_str()))
                    .collect()
            })
            .collect())
    }

    fn push_value(&mut self, column: &str, value: Value) {
        match self
            .columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(column))
        {
            Some(existing) => existing.values.push(value),
            None => self.columns.push(Column {
                name: column.to_string(),
                values: vec![value],
            }),
        }
    }
}

/// The first data block of an mmCIF file, organized by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CifDocument {
    pub block_name: String,
    categories: Vec<Category>,
}

impl CifDocument {
    pub fn from_categories(block_name: &str, categories: Vec<Category>) -> Self {
        Self {
            block_name: block_name.to_string(),
            categories,
        }
    }

    /// Looks up a category by name, with or without the leading underscore.
    pub fn category(&self, name: &str) -> Option<&Category> {
        let name = name.trim_start_matches('_');
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn category_mut(&mut self, name: &str) -> &mut Category {
        let idx = match self
            .categories
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
        {
            Some(idx) => idx,
            None => {
                self.categories.push(Category::new(name));
                self.categories.len() - 1
            }
        };
        &mut self.categories[idx]
    }
}

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unterminated quoted string on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("Unterminated semicolon text field starting on line {line}")]
    UnterminatedTextField { line: usize },
    #[error("Tag '{tag}' on line {line} is not of the form _category.item")]
    InvalidTag { tag: String, line: usize },
    #[error("Tag '{tag}' on line {line} has no value")]
    MissingValue { tag: String, line: usize },
    #[error("No data block found")]
    MissingDataBlock,
}

pub struct CifFile;

impl TextFormat for CifFile {
    type Output = CifDocument;
    type Error = CifError;

    fn read_from(reader: &mut impl BufRead) -> Result<CifDocument, CifError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        parse_str(&input)
    }
}

pub fn parse_str(input: &str) -> Result<CifDocument, CifError> {
    let mut tokens = Tokenizer::new(input);
    let mut document: Option<CifDocument> = None;

    while let Some(token) = tokens.next_token()? {
        match token.kind {
            TokenKind::DataBlock(name) => {
                if document.is_some() {
                    break;
                }
                document = Some(CifDocument {
                    block_name: name,
                    categories: Vec::new(),
                });
            }
            TokenKind::Loop => {
                let Some(doc) = document.as_mut() else {
                    continue;
                };
                read_loop(&mut tokens, doc)?;
            }
            TokenKind::Tag(tag) => {
                let Some(doc) = document.as_mut() else {
                    continue;
                };
                let (category, item) = split_tag(&tag, token.line)?;
                match tokens.next_token()? {
                    Some(Token {
                        kind: TokenKind::Value(value),
                        ..
                    }) => doc.category_mut(&category).push_value(&item, value),
                    _ => {
                        return Err(CifError::MissingValue {
                            tag,
                            line: token.line,
                        });
                    }
                }
            }
            TokenKind::Value(_) => {}
        }
    }

    document.ok_or(CifError::MissingDataBlock)
}

fn read_loop(tokens: &mut Tokenizer<'_>, doc: &mut CifDocument) -> Result<(), CifError> {
    let mut category_name: Option<String> = None;
    let mut items: Vec<String> = Vec::new();

    let mut pending = None;
    while let Some(token) = tokens.next_token()? {
        match token.kind {
            TokenKind::Tag(ref tag) => {
                let (category, item) = split_tag(tag, token.line)?;
                category_name.get_or_insert(category);
                items.push(item);
            }
            _ => {
                pending = Some(token);
                break;
            }
        }
    }

    let Some(category_name) = category_name else {
        if let Some(token) = pending {
            tokens.push_back(token);
        }
        return Ok(());
    };
    let category = doc.category_mut(&category_name);
    for item in &items {
        if category.column(item).is_none() {
            category.columns.push(Column {
                name: item.clone(),
                values: Vec::new(),
            });
        }
    }

    let mut index = 0usize;
    let mut next = pending;
    loop {
        let token = match next.take() {
            Some(token) => token,
            None => match tokens.next_token()? {
                Some(token) => token,
                None => break,
            },
        };
        match token.kind {
            TokenKind::Value(value) => {
                category.push_value(&items[index % items.len()], value);
                index += 1;
            }
            _ => {
                tokens.push_back(token);
                break;
            }
        }
    }
    Ok(())
}

fn split_tag(tag: &str, line: usize) -> Result<(String, String), CifError> {
    let body = tag.trim_start_matches('_');
    match body.split_once('.') {
        Some((category, item)) if !category.is_empty() && !item.is_empty() => {
            Ok((category.to_ascii_lowercase(), item.to_ascii_lowercase()))
        }
        _ => Err(CifError::InvalidTag {
            tag: tag.to_string(),
            line,
        }),
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_start_matches('_').to_ascii_lowercase()
}

fn classify_value(raw: String, quoted: bool) -> Value {
    if !quoted {
        match raw.as_str() {
            "." => return Value::Inapplicable,
            "?" => return Value::Unknown,
            _ => {}
        }
    }
    Value::Str(raw)
}

#[derive(Debug)]
enum TokenKind {
    DataBlock(String),
    Loop,
    Tag(String),
    Value(Value),
}

#[derive(Debug)]
struct Token {
    kind: TokenKind,
    line: usize,
}

struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    at_line_start: bool,
    pending: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            at_line_start: true,
            pending: None,
        }
    }

    fn push_back(&mut self, token: Token) {
        self.pending = Some(token);
    }

    fn next_token(&mut self) -> Result<Option<Token>, CifError> {
        if let Some(token) = self.pending.take() {
            return Ok(Some(token));
        }
        self.skip_blank();
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }

        let line = self.line;
        let b = self.bytes[self.pos];
        if b == b';' && self.at_line_start {
            let text = self.scan_text_field()?;
            return Ok(Some(Token {
                kind: TokenKind::Value(Value::Str(text)),
                line,
            }));
        }
        self.at_line_start = false;

        if b == b'\'' || b == b'"' {
            let text = self.scan_quoted(b)?;
            return Ok(Some(Token {
                kind: TokenKind::Value(classify_value(text, true)),
                line,
            }));
        }

        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let word = &self.input[start..self.pos];
        let lower = word.to_ascii_lowercase();
        let kind = if lower.starts_with("data_") {
            TokenKind::DataBlock(word[5..].to_string())
        } else if lower == "loop_" {
            TokenKind::Loop
        } else if word.starts_with('_') {
            TokenKind::Tag(word.to_string())
        } else {
            TokenKind::Value(classify_value(word.to_string(), false))
        };
        Ok(Some(Token { kind, line }))
    }

    fn skip_blank(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.at_line_start = true;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'#' => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_quoted(&mut self, quote: u8) -> Result<String, CifError> {
        let line = self.line;
        let start = self.pos + 1;
        self.pos = start;
        while self.pos < self.bytes.len() {
            let c = self.bytes[self.pos];
            if c == b'\n' {
                break;
            }
            // A quote only closes the value when followed by whitespace or EOF.
            if c == quote
                && (self.pos + 1 >= self.bytes.len()
                    || self.bytes[self.pos + 1].is_ascii_whitespace())
            {
                let text = self.input[start..self.pos].to_string();
                self.pos += 1;
                return Ok(text);
            }
            self.pos += 1;
        }
        Err(CifError::UnterminatedQuote { line })
    }

    fn scan_text_field(&mut self) -> Result<String, CifError> {
        let line = self.line;
        self.pos += 1;
        let start = self.pos;
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                self.pos += 1;
            }
            if self.pos >= self.bytes.len() {
                return Err(CifError::UnterminatedTextField { line });
            }
            self.pos += 1;
            self.line += 1;
            if self.pos < self.bytes.len() && self.bytes[self.pos] == b';' {
                let text = self.input[start..self.pos - 1].trim_end_matches('\r');
                self.pos += 1;
                self.at_line_start = false;
                return Ok(text.to_string());
            }
        }
    }
}
