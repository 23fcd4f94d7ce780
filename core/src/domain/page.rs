// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Pagination window shared by every listing operation.

use serde::{Deserialize, Serialize};

pub const LIMIT_MAX: i64 = 100;
pub const LIMIT_DEFAULT: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("limit must be > 0 and <= {LIMIT_MAX}")]
    Limit,

    #[error("offset must be >= 0")]
    Offset,
}

impl Page {
    /// `limit == 0` selects the default window; out-of-range values are
    /// rejected before any read happens.
    pub fn new(limit: i64, offset: i64) -> Result<Self, PageError> {
        if limit < 0 || limit > LIMIT_MAX {
            return Err(PageError::Limit);
        }
        if offset < 0 {
            return Err(PageError::Offset);
        }
        let limit = if limit == 0 { LIMIT_DEFAULT } else { limit };
        Ok(Self { limit, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_selects_default() {
        let page = Page::new(0, 0).unwrap();
        assert_eq!(page.limit, LIMIT_DEFAULT);
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(Page::new(100, 0).unwrap().limit, 100);
        assert_eq!(Page::new(101, 0), Err(PageError::Limit));
        assert_eq!(Page::new(-1, 0), Err(PageError::Limit));
    }

    #[test]
    fn negative_offset_rejected() {
        assert_eq!(Page::new(5, -1), Err(PageError::Offset));
        assert_eq!(Page::new(5, 0).unwrap().offset, 0);
    }
}
