//! Mapping of user input (free text + filters) onto a catalog read request.
//!
//! [`QueryDescriptor::build`] is pure: the same inputs always produce the
//! same descriptor. Free text is trimmed; filter values are passed through
//! verbatim and interpreted by the server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed cap on the number of records requested from the search endpoint.
pub const RESULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    PublicationDate,
    Title,
    Authors,
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        &[Self::PublicationDate, Self::Title, Self::Authors]
    }

    /// Name used on the wire (`sort_by=`).
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::PublicationDate => "publication_date",
            Self::Title => "title",
            Self::Authors => "authors",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PublicationDate => "Publication Date",
            Self::Title => "Title",
            Self::Authors => "Authors",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::PublicationDate => Self::Title,
            Self::Title => Self::Authors,
            Self::Authors => Self::PublicationDate,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "publication_date" | "date" => Ok(Self::PublicationDate),
            "title" => Ok(Self::Title),
            "authors" => Ok(Self::Authors),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "Ascending",
            Self::Descending => "Descending",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// The three free-form constraint fields of a [`FilterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Department,
    Journal,
    Year,
}

impl FilterField {
    pub fn all() -> &'static [FilterField] {
        &[Self::Department, Self::Journal, Self::Year]
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Journal => "journal",
            Self::Year => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Journal => "Journal",
            Self::Year => "Year",
        }
    }
}

/// Structured search constraints plus sort configuration.
///
/// Empty strings mean "unconstrained". Sort field and order always hold a
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterSet {
    pub department: String,
    pub journal: String,
    pub year: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl FilterSet {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Department => &self.department,
            FilterField::Journal => &self.journal,
            FilterField::Year => &self.year,
        }
    }

    /// Replace a constraint value. Returns `true` if the value changed.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let slot = match field {
            FilterField::Department => &mut self.department,
            FilterField::Journal => &mut self.journal,
            FilterField::Year => &mut self.year,
        };
        let value = value.into();
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// True if any non-sort field carries a value.
    pub fn has_constraints(&self) -> bool {
        FilterField::all().iter().any(|f| !self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Which read endpoint a descriptor targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Unconstrained, default-ordered listing. Takes no parameters.
    Listing,
    /// Constrained and sorted search.
    Search,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Listing => "/papers",
            Self::Search => "/search",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Search => write!(f, "search"),
        }
    }
}

/// Normalized read request derived from the current input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    /// Trimmed free text.
    pub query: String,
    pub filters: FilterSet,
    pub limit: usize,
}

impl QueryDescriptor {
    pub fn build(query: &str, filters: &FilterSet) -> Self {
        Self {
            query: query.trim().to_string(),
            filters: filters.clone(),
            limit: RESULT_LIMIT,
        }
    }

    /// Descriptor for an unconstrained browse.
    pub fn listing() -> Self {
        Self::build("", &FilterSet::default())
    }

    /// Search when any constraint is present, the cheap listing otherwise.
    /// Sort settings alone never count as a constraint.
    pub fn endpoint(&self) -> Endpoint {
        if !self.query.is_empty() || self.filters.has_constraints() {
            Endpoint::Search
        } else {
            Endpoint::Listing
        }
    }

    /// Query parameters in wire order. Empty for the listing endpoint.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        if self.endpoint() == Endpoint::Listing {
            return Vec::new();
        }

        let mut params = Vec::with_capacity(7);
        if !self.query.is_empty() {
            params.push(("q", self.query.clone()));
        }
        for field in FilterField::all() {
            let value = self.filters.get(*field);
            if !value.is_empty() {
                params.push((field.as_param(), value.to_string()));
            }
        }
        params.push(("sort_by", self.filters.sort_field.as_param().to_string()));
        params.push(("sort_order", self.filters.sort_order.as_param().to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }

    /// Percent-encoded query string (without the leading `?`).
    pub fn query_string(&self) -> String {
        self.params()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
