use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Hard cap on page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: u64 = 50;

/// Genre value meaning "no filtering".
pub const GENRE_ALL: &str = "all";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginationInfo {
    pub offset: u64,
    pub limit: u64,
    pub total_items: u64,
    pub has_more: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ChartsQuery {
    pub genre: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ChartsQuery {
    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    /// Genres are stored lowercase; an absent, empty, or "all" filter means
    /// no filtering.
    pub fn genre_filter(&self) -> Option<String> {
        match self.genre.as_deref().map(|g| g.trim().to_lowercase()) {
            None => None,
            Some(g) if g.is_empty() || g == GENRE_ALL => None,
            Some(g) => Some(g),
        }
    }
}
