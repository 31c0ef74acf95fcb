//! Identifiers
//!
//! An [`Identifier`] is an ordered, non-empty sequence of lowercase parts
//! (`[a-z][a-z0-9]*`). Identifiers name struct fields, enum values and
//! namespace parts. They compare part-by-part, which is the order
//! [`SymbolMap`](crate::SymbolMap) iterates in.
//!
//! | Format | Example |
//! |--------|---------|
//! | Hyphenated (external form) | `field-one` |
//! | Underscore | `field_one` |
//! | Lower camel | `fieldOne` |

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering style for an [`Identifier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierFormat {
    /// `field-one`
    Hyphenated,
    /// `field_one`
    Underscore,
    /// `fieldOne`
    LowerCamel,
}

/// Multi-part lowercase name
///
/// # Examples
///
/// ```
/// use tessera_core::{Identifier, IdentifierFormat};
///
/// let id = Identifier::parse("fieldOne").unwrap();
/// assert_eq!(id.to_string(), "field-one");
/// assert_eq!(id.format(IdentifierFormat::Underscore), "field_one");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    parts: Vec<String>,
}

impl Identifier {
    /// Build an identifier from already split parts
    pub fn from_parts<I, S>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(ModelError::InvalidIdentifier {
                input: String::new(),
                reason: "identifier has no parts".to_string(),
            });
        }
        for part in &parts {
            check_part(part).map_err(|reason| ModelError::InvalidIdentifier {
                input: parts.join("-"),
                reason,
            })?;
        }
        Ok(Identifier { parts })
    }

    /// Parse any of the hyphenated, underscore or lower camel forms
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ModelError::InvalidIdentifier {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(invalid("empty identifier"));
        }
        let parts: Vec<String> = if s.contains('-') {
            s.split('-').map(str::to_string).collect()
        } else if s.contains('_') {
            s.split('_').map(str::to_string).collect()
        } else {
            split_camel(s)
        };
        for part in &parts {
            check_part(part).map_err(|reason| invalid(&reason))?;
        }
        Ok(Identifier { parts })
    }

    /// Used for process-wide constants whose parts are known to be valid
    pub(crate) fn from_static(parts: &[&str]) -> Self {
        Identifier {
            parts: parts.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The lowercase parts
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Number of parts
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Render in the requested format
    pub fn format(&self, format: IdentifierFormat) -> String {
        match format {
            IdentifierFormat::Hyphenated => self.parts.join("-"),
            IdentifierFormat::Underscore => self.parts.join("_"),
            IdentifierFormat::LowerCamel => {
                let mut out = String::new();
                for (i, part) in self.parts.iter().enumerate() {
                    if i == 0 {
                        out.push_str(part);
                        continue;
                    }
                    let mut chars = part.chars();
                    if let Some(first) = chars.next() {
                        out.push(first.to_ascii_uppercase());
                        out.push_str(chars.as_str());
                    }
                }
                out
            }
        }
    }

    /// Hyphenated external form
    pub fn external_form(&self) -> String {
        self.format(IdentifierFormat::Hyphenated)
    }
}

fn check_part(part: &str) -> std::result::Result<(), String> {
    let mut chars = part.chars();
    match chars.next() {
        None => return Err("empty identifier part".to_string()),
        Some(c) if !c.is_ascii_lowercase() => {
            return Err(format!("part {:?} must start with a lowercase letter", part))
        }
        Some(_) => {}
    }
    if let Some(c) = chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit())) {
        return Err(format!("illegal character {:?} in part {:?}", c, part));
    }
    Ok(())
}

fn split_camel(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            parts.push(std::mem::take(&mut current));
            current.push(c.to_ascii_lowercase());
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

impl FromStr for Identifier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Identifier::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self> {
        Identifier::parse(&s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.external_form()
    }
}
