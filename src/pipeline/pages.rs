//! Page-range parsing: `"all"`, `"3"`, `"1-5"`, `"1,3,5-7"`.
//!
//! A specification is accepted as a whole or rejected as a whole. The first
//! malformed or out-of-bounds token aborts parsing with
//! [`DocpixError::InvalidRange`] naming that token; no partial page list is
//! ever returned.

use crate::error::DocpixError;
use std::collections::BTreeSet;

/// Resolve `spec` against a document of `total_pages` pages.
///
/// Returns 1-indexed page numbers, ascending and without duplicates. An empty
/// (or whitespace-only) spec means every page, as does `all` in any case.
///
/// # Example
/// ```rust
/// use docpix::pipeline::pages::parse_page_range;
///
/// assert_eq!(parse_page_range("2-4,1", 10).unwrap(), vec![1, 2, 3, 4]);
/// assert!(parse_page_range("5-3", 10).is_err());
/// ```
pub fn parse_page_range(spec: &str, total_pages: usize) -> Result<Vec<usize>, DocpixError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok((1..=total_pages).collect());
    }

    let mut pages = BTreeSet::new();
    for raw in trimmed.split(',') {
        let token = raw.trim();
        let invalid = || DocpixError::InvalidRange {
            token: token.to_string(),
            total: total_pages,
        };

        if let Some((start, end)) = token.split_once('-') {
            let start = parse_page_number(start).ok_or_else(invalid)?;
            let end = parse_page_number(end).ok_or_else(invalid)?;
            if start < 1 || start > end || end > total_pages {
                return Err(invalid());
            }
            pages.extend(start..=end);
        } else {
            let page = parse_page_number(token).ok_or_else(invalid)?;
            if page < 1 || page > total_pages {
                return Err(invalid());
            }
            pages.insert(page);
        }
    }

    Ok(pages.into_iter().collect())
}

fn parse_page_number(s: &str) -> Option<usize> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
