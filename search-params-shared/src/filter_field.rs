//! Filter field key encoding.
//!
//! A `FilterField` packs a stable filter value and a display label into a
//! single delimited string. The packed form is stored in a keyword field of
//! the search index so that a `terms` aggregation hands both back as one
//! bucket key.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::FilterFieldError;

/// Separator placed between value and text when none is given.
pub const DEFAULT_DELIMITER: &str = "||";

/// Label substituted for blank text, and the text of the empty sentinel.
pub const EMPTY_TEXT: &str = "N/A";

/// A `(value, text)` pair encoded as `value + delimiter + text`.
///
/// Two filter fields are equal when their values are equal; text and
/// delimiter do not take part in equality or hashing.
#[derive(Debug, Clone)]
pub struct FilterField {
    value: String,
    text: String,
    delimiter: String,
}

impl FilterField {
    /// Create a filter field from free text, deriving the value by
    /// slugifying the text.
    ///
    /// Blank text is replaced with [`EMPTY_TEXT`]. Occurrences of the
    /// delimiter in the text are replaced with a space so the key always
    /// parses back.
    ///
    /// ```
    /// use search_params_shared::FilterField;
    ///
    /// let field = FilterField::create("Text Value");
    /// assert_eq!(field.value(), "text-value");
    /// assert_eq!(field.key(), "text-value||Text Value");
    /// ```
    pub fn create(text: &str) -> Self {
        let text = if text.trim().is_empty() {
            EMPTY_TEXT
        } else {
            text
        };

        let value = slugify(text);
        let text = strip_delimiter(text, DEFAULT_DELIMITER, &value);

        Self {
            value,
            text,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Create a filter field with an explicit value and the default delimiter.
    ///
    /// See [`FilterField::with_delimiter`].
    pub fn with_value(text: &str, value: &str) -> Self {
        Self::with_delimiter(text, value, DEFAULT_DELIMITER)
    }

    /// Create a filter field with an explicit value and delimiter.
    ///
    /// A blank value yields the [`FilterField::empty`] sentinel. Blank text
    /// falls back to the value, and a blank delimiter to [`DEFAULT_DELIMITER`].
    /// The delimiter is stripped from the text as in [`FilterField::create`].
    /// The value must not contain the delimiter, or the key will not parse back.
    pub fn with_delimiter(text: &str, value: &str, delimiter: &str) -> Self {
        let delimiter = if delimiter.trim().is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };

        if value.trim().is_empty() {
            let mut empty = Self::empty();
            empty.delimiter = delimiter.to_string();
            return empty;
        }

        let text = if text.trim().is_empty() { value } else { text };

        Self {
            value: value.to_string(),
            text: strip_delimiter(text, delimiter, value),
            delimiter: delimiter.to_string(),
        }
    }

    /// The sentinel used when no value is available.
    pub fn empty() -> Self {
        Self::create(EMPTY_TEXT)
    }

    /// Decode a key produced by [`FilterField::key`] using `delimiter`.
    ///
    /// # Errors
    ///
    /// * `FilterFieldError::InvalidArgument` - if the key or delimiter is blank
    /// * `FilterFieldError::OutOfRange` - if the key does not hold exactly two
    ///   non-empty segments
    pub fn parse(key: &str, delimiter: &str) -> Result<Self, FilterFieldError> {
        if key.trim().is_empty() {
            return Err(FilterFieldError::invalid_argument("key"));
        }
        if delimiter.trim().is_empty() {
            return Err(FilterFieldError::invalid_argument("delimiter"));
        }

        let segments: Vec<&str> = key
            .split(delimiter)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.len() != 2 {
            return Err(FilterFieldError::out_of_range(key, segments.len()));
        }

        Ok(Self {
            value: segments[0].to_string(),
            text: segments[1].to_string(),
            delimiter: delimiter.to_string(),
        })
    }

    /// Decode a key using [`DEFAULT_DELIMITER`].
    pub fn parse_default(key: &str) -> Result<Self, FilterFieldError> {
        Self::parse(key, DEFAULT_DELIMITER)
    }

    /// Non-failing variant of [`FilterField::parse`].
    pub fn try_parse(key: &str, delimiter: &str) -> Option<Self> {
        Self::parse(key, delimiter).ok()
    }

    /// The stable, URL-safe identifier.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The human-readable label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The separator used in [`FilterField::key`].
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The encoded `value + delimiter + text` form.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.value, self.delimiter, self.text)
    }

    /// Whether this is the [`FilterField::empty`] sentinel.
    pub fn is_empty(&self) -> bool {
        self.value == slugify(EMPTY_TEXT)
    }
}

/// Hyphenate whitespace, lower-case, then percent-encode anything unsafe in
/// a key. Percent-encoding also keeps the delimiter characters out of the value.
fn slugify(text: &str) -> String {
    let hyphenated = text.split_whitespace().collect::<Vec<_>>().join("-");
    urlencoding::encode(&hyphenated.to_lowercase()).into_owned()
}

/// Replace `delimiter` in `text` with single spaces, falling back to
/// `value` when nothing else is left.
fn strip_delimiter(text: &str, delimiter: &str, value: &str) -> String {
    if !text.contains(delimiter) {
        return text.to_string();
    }

    let stripped = text.split(delimiter).collect::<Vec<_>>().join(" ");
    let stripped = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if stripped.is_empty() {
        value.to_string()
    } else {
        stripped
    }
}

impl PartialEq for FilterField {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for FilterField {}

impl Hash for FilterField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.value, self.delimiter, self.text)
    }
}

impl FromStr for FilterField {
    type Err = FilterFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_default(s)
    }
}

impl Serialize for FilterField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FilterField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::parse_default(&key).map_err(de::Error::custom)
    }
}
