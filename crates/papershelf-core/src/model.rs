//! Catalog records as returned by the read endpoints.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a catalog entry.
///
/// The catalog hands out integer keys, but string keys are accepted too so
/// that a schema change on the server side does not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PaperId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => PaperId(n.to_string()),
            Raw::Text(s) => PaperId(s),
        })
    }
}

/// Treat an explicit JSON `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single catalog entry. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub id: Option<PaperId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Free text, as typed by the uploader.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub journal: String,
    /// ISO date (`2020-05-01`) or any year-bearing string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub publication_date: String,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Key used to identify a record inside a rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(PaperId),
    /// No identifier was supplied; the key only names a slot in the current
    /// list and must not be carried across refreshes.
    Position(usize),
}

impl RowKey {
    pub fn is_stable(&self) -> bool {
        matches!(self, RowKey::Id(_))
    }
}

impl PaperRecord {
    pub fn row_key(&self, position: usize) -> RowKey {
        match &self.id {
            Some(id) => RowKey::Id(id.clone()),
            None => RowKey::Position(position),
        }
    }

    /// Year of publication for display, or the raw date string when no year
    /// can be recovered from it.
    pub fn publication_year(&self) -> String {
        let raw = self.publication_date.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.year().to_string();
        }
        let prefix: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        if prefix.len() == 4 {
            prefix
        } else {
            raw.to_string()
        }
    }

    pub fn keywords_list(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .map(|k| {
                k.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
