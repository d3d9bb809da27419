//! Front-matter parsing
//!
//! A document may open with a block fenced by `---` lines. The block body is
//! tried against each configured format in order (strict JSON first, then
//! YAML) and the first format that parses it wins. The parsed value is then
//! validated against the [`Frontmatter`] schema.

use std::fmt;

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Error, FormatFailure, Result};
use crate::helpers::parse_date;

lazy_static! {
    /// Opening `---` line, optional block body, closing `---` line.
    static ref FRONTMATTER_RE: Regex =
        Regex::new(r"(?s)\A---\r?\n(?:(.*?)\r?\n)?---(?:\r?\n|\z)")
            .expect("frontmatter pattern is valid");
}

/// Accepts any value except an explicit `null` for an optional field
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Rejects NaN and the infinities, which YAML can spell but JSON cannot hold
fn finite<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!(
            "invalid value: {}, expected a finite number",
            value
        )))
    }
}

fn default_position() -> f64 {
    100.0
}

/// Validated front-matter of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub authors: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Date literal as written by the author. Not checked against a calendar.
    pub date: String,

    /// Manual ordering hint
    #[serde(default = "default_position", deserialize_with = "finite")]
    pub position: f64,

    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub draft: bool,
}

impl Frontmatter {
    /// Front-matter with only a date set and every other field defaulted
    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            authors: None,
            title: None,
            description: None,
            date: date.into(),
            position: default_position(),
            languages: Vec::new(),
            draft: false,
        }
    }

    /// Schema defaults applied to an empty object, plus an optional date
    fn from_empty(fallback_date: Option<&str>) -> Result<Self> {
        let mut object = serde_json::Map::new();
        if let Some(date) = fallback_date {
            object.insert("date".to_string(), date.into());
        }
        RawFrontmatter::Json(serde_json::Value::Object(object)).validate()
    }

    /// Parse the date literal, if it is in a recognised format
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }
}

/// Syntax a front-matter block can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// Strict JSON object notation
    Json,
    /// Indentation based YAML, a superset of JSON
    Yaml,
}

impl FrontmatterFormat {
    fn parse(self, text: &str) -> std::result::Result<RawFrontmatter, String> {
        match self {
            Self::Json => serde_json::from_str(text)
                .map(RawFrontmatter::Json)
                .map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text)
                .map(RawFrontmatter::Yaml)
                .map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for FrontmatterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// A block that parsed syntactically but has not been validated yet
#[derive(Debug)]
enum RawFrontmatter {
    Json(serde_json::Value),
    Yaml(serde_yaml::Value),
}

impl RawFrontmatter {
    fn validate(self) -> Result<Frontmatter> {
        match self {
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|e| Error::validation(e.to_string()))
            }
            Self::Yaml(value) => {
                serde_yaml::from_value(value).map_err(|e| Error::validation(e.to_string()))
            }
        }
    }
}

/// Result of splitting a document into front-matter and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarkdown {
    /// Body with the front-matter block removed, trimmed
    pub content: String,
    pub frontmatter: Frontmatter,
}

/// Split a document into `(block body, remainder)`.
///
/// Returns `None` when the document does not open with a fenced block.
pub fn split_frontmatter(markdown: &str) -> Option<(&str, &str)> {
    let caps = FRONTMATTER_RE.captures(markdown)?;
    let whole = caps.get(0)?;
    let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    Some((block, &markdown[whole.end()..]))
}

/// Parses and validates front-matter with an ordered list of formats
#[derive(Debug, Clone)]
pub struct FrontmatterParser {
    formats: Vec<FrontmatterFormat>,
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterParser {
    /// Strict JSON first, YAML as the fallback
    pub fn new() -> Self {
        Self::with_formats([FrontmatterFormat::Json, FrontmatterFormat::Yaml])
    }

    /// Use a custom format order
    pub fn with_formats(formats: impl IntoIterator<Item = FrontmatterFormat>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
        }
    }

    /// Split and validate a document
    pub fn parse(&self, markdown: &str) -> Result<ParsedMarkdown> {
        self.parse_with_fallback_date(markdown, None)
    }

    /// Like [`parse`](Self::parse), but a document without a block (or with a
    /// blank one) gets `fallback_date` as its date. A block that exists and
    /// lacks a date still fails.
    pub fn parse_with_fallback_date(
        &self,
        markdown: &str,
        fallback_date: Option<&str>,
    ) -> Result<ParsedMarkdown> {
        let Some((block, body)) = split_frontmatter(markdown) else {
            return Ok(ParsedMarkdown {
                content: markdown.trim().to_string(),
                frontmatter: Frontmatter::from_empty(fallback_date)?,
            });
        };

        let frontmatter = if block.trim().is_empty() {
            Frontmatter::from_empty(fallback_date)?
        } else {
            self.parse_block(block)?.validate()?
        };

        Ok(ParsedMarkdown {
            content: body.trim().to_string(),
            frontmatter,
        })
    }

    fn parse_block(&self, block: &str) -> Result<RawFrontmatter> {
        let mut failures = Vec::with_capacity(self.formats.len());

        for &format in &self.formats {
            match format.parse(block) {
                Ok(raw) => {
                    tracing::trace!("Front-matter parsed as {}", format);
                    return Ok(raw);
                }
                Err(message) => failures.push(FormatFailure { format, message }),
            }
        }

        Err(Error::FrontmatterParse {
            path: None,
            text: block.to_string(),
            failures,
        })
    }
}
