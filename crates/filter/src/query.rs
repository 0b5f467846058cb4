//! Filter state and its URL query form

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Product listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::Name => "name",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            "name" => Ok(SortOrder::Name),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// What the product listing is filtered and ordered by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category slug
    pub category: Option<String>,
    /// Free-text search as typed
    pub search: String,
    pub sort: Option<SortOrder>,
}

impl FilterState {
    /// True when nothing narrows or orders the listing
    pub fn is_default(&self) -> bool {
        self.to_query().is_empty()
    }

    /// URL query carrying only the non-empty parameters
    ///
    /// Parameters appear in a fixed order: `category`, `search`, `sort`.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query.append_pair("category", category);
        }
        let search = self.search.trim();
        if !search.is_empty() {
            query.append_pair("search", search);
        }
        if let Some(sort) = self.sort {
            query.append_pair("sort", sort.as_str());
        }

        query.finish()
    }

    /// Parse a URL query, with or without the leading `?`
    ///
    /// Unknown parameters, empty values and unknown sort orders are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "category" => state.category = Some(value.into_owned()),
                "search" => state.search = value.into_owned(),
                "sort" => state.sort = value.parse().ok(),
                _ => {}
            }
        }

        state
    }
}
