use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub const DEFAULT_LIMIT: u64 = 25;
pub const MAX_LIMIT: u64 = 100;

/// Raw `offset` / `limit` / `query` query-string parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
}

/// Validated listing window plus optional case-insensitive name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
    pub query: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            query: None,
        }
    }
}

impl PageRequest {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// `limit` must be in `1..=MAX_LIMIT` and `offset` non-negative.
    /// A blank `query` is treated as absent.
    pub fn parse(params: PageParams) -> Result<Self, AppError> {
        let offset = params.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::invalid(
                ErrorCode::InvalidPagination,
                format!("offset must be >= 0, got {offset}"),
            ));
        }

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT as i64);
        if limit < 1 || limit > MAX_LIMIT as i64 {
            return Err(AppError::invalid(
                ErrorCode::InvalidPagination,
                format!("limit must be between 1 and {MAX_LIMIT}, got {limit}"),
            ));
        }

        let query = params
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(Self {
            offset: offset as u64,
            limit: limit as u64,
            query,
        })
    }
}

/// One page of a listing: `{ data, total, offset, limit }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn empty(req: &PageRequest, total: u64) -> Self {
        Self {
            data: Vec::new(),
            total,
            offset: req.offset,
            limit: req.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::parse(PageParams::default()).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!((req.offset, req.limit), (0, 25));
    }

    #[test]
    fn rejects_non_positive_limit() {
        for limit in [0, -1] {
            let err = PageRequest::parse(PageParams {
                limit: Some(limit),
                ..Default::default()
            })
            .unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidPagination);
        }
    }

    #[test]
    fn rejects_limit_over_max_and_negative_offset() {
        assert!(PageRequest::parse(PageParams {
            limit: Some(101),
            ..Default::default()
        })
        .is_err());
        assert!(PageRequest::parse(PageParams {
            offset: Some(-5),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn blank_query_is_absent() {
        let req = PageRequest::parse(PageParams {
            query: Some("   ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(req.query, None);
    }
}
