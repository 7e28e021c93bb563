//! Page/size/sort request passed through to list queries

use std::fmt;
use std::str::FromStr;

use crate::core::error::{CatalogError, Result};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Field a listing is ordered by
///
/// Each listing maps the key onto its own columns; keys a listing has no
/// column for fall back to id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A page request: zero-based page number, page size and sort order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortKey::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    /// Create a page request; a zero size is bumped to one row
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort: SortKey, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Rows skipped before this page; `InvalidInput` past SQLite's i64 range
    pub fn offset(&self) -> Result<i64> {
        u64::from(self.page)
            .checked_mul(u64::from(self.size))
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or_else(|| {
                CatalogError::InvalidInput(format!(
                    "page {} of size {} is out of range",
                    self.page, self.size
                ))
            })
    }

    /// Render `ORDER BY ... LIMIT ... OFFSET ...`
    ///
    /// `column` maps a sort key onto a column expression of the listing;
    /// `tiebreak` keeps the order total so pages never overlap.
    pub(crate) fn sql_suffix(
        &self,
        column: impl Fn(SortKey) -> Option<&'static str>,
        tiebreak: &'static str,
    ) -> Result<String> {
        let offset = self.offset()?;
        let order = column(self.sort).unwrap_or(tiebreak);
        let mut sql = format!(" ORDER BY {} {}", order, self.direction.as_sql());
        if order != tiebreak {
            sql.push_str(&format!(", {} ASC", tiebreak));
        }
        sql.push_str(&format!(" LIMIT {} OFFSET {}", self.size, offset));
        Ok(sql)
    }
}

/// Sort specification in `field[,asc|desc]` form, e.g. `name,desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl FromStr for SortSpec {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (field, dir) = match s.split_once(',') {
            Some((field, dir)) => (field.trim(), Some(dir.trim())),
            None => (s.trim(), None),
        };

        let key = match field.to_lowercase().as_str() {
            "id" => SortKey::Id,
            "name" => SortKey::Name,
            "year" => SortKey::Year,
            _ => {
                return Err(CatalogError::InvalidInput(format!(
                    "unknown sort field '{}' (valid: id, name, year)",
                    field
                )))
            }
        };

        let direction = match dir.map(|d| d.to_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(d) => {
                return Err(CatalogError::InvalidInput(format!(
                    "unknown sort direction '{}' (valid: asc, desc)",
                    d
                )))
            }
        };

        Ok(SortSpec { key, direction })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Year => "year",
        };
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{},{}", key, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(0, 20).offset().unwrap(), 0);
        assert_eq!(PageRequest::new(3, 20).offset().unwrap(), 60);
    }

    #[test]
    fn test_offset_past_i64_is_rejected() {
        let page = PageRequest::new(u32::MAX, 2);
        assert_eq!(page.offset().unwrap(), u32::MAX as i64 * 2);

        let page = PageRequest::new(u32::MAX, u32::MAX);
        assert!(matches!(page.offset(), Err(CatalogError::InvalidInput(_))));
        assert!(page.sql_suffix(|_| None, "id").is_err());
    }

    #[test]
    fn test_zero_size_is_bumped() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
    }

    #[test]
    fn test_sql_suffix_falls_back_to_tiebreak() {
        let page = PageRequest::new(1, 10).sorted(SortKey::Year, SortDirection::Desc);
        let sql = page.sql_suffix(|_| None, "id").unwrap();
        assert_eq!(sql, " ORDER BY id DESC LIMIT 10 OFFSET 10");
    }

    #[test]
    fn test_sql_suffix_with_column() {
        let page = PageRequest::new(0, 5).sorted(SortKey::Name, SortDirection::Asc);
        let sql = page.sql_suffix(
            |key| match key {
                SortKey::Name => Some("name"),
                _ => None,
            },
            "id",
        )
        .unwrap();
        assert_eq!(sql, " ORDER BY name ASC, id ASC LIMIT 5 OFFSET 0");
    }

    #[test]
    fn test_sort_spec_parse() {
        let spec: SortSpec = "name,desc".parse().unwrap();
        assert_eq!(spec.key, SortKey::Name);
        assert_eq!(spec.direction, SortDirection::Desc);

        let spec: SortSpec = "year".parse().unwrap();
        assert_eq!(spec.direction, SortDirection::Asc);

        assert!("color".parse::<SortSpec>().is_err());
        assert!("name,up".parse::<SortSpec>().is_err());
    }
}
