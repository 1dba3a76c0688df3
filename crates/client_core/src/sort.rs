//! Stable ordering of the visible papers by one column.

use std::{borrow::Borrow, cmp::Ordering, fmt, str::FromStr};

use chrono::Datelike;
use shared::domain::Paper;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortColumn {
    /// Publication date, compared as a calendar date.
    Date,
    Votes,
    Score,
    /// Any other textual attribute, compared as a float.
    Attribute(String),
}

impl FromStr for SortColumn {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches("data-");
        Ok(match name {
            "utcdate" | "date" => SortColumn::Date,
            "nvotes" | "votes" => SortColumn::Votes,
            "score" => SortColumn::Score,
            other => SortColumn::Attribute(other.to_string()),
        })
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::Date => f.write_str("utcdate"),
            SortColumn::Votes => f.write_str("nvotes"),
            SortColumn::Score => f.write_str("score"),
            SortColumn::Attribute(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Error)]
#[error("unknown sort order '{0}', expected asc or desc")]
pub struct SortDirectionParseError(String);

impl FromStr for SortDirection {
    type Err = SortDirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(SortDirectionParseError(other.to_string())),
        }
    }
}

/// Numeric key for `paper` under `column`; `None` when the value does not
/// parse. Dates map to their day number so they order chronologically.
pub fn sort_key(paper: &Paper, column: &SortColumn) -> Option<f64> {
    let key = match column {
        SortColumn::Date => f64::from(paper.published_at?.num_days_from_ce()),
        SortColumn::Votes => f64::from(paper.vote_count),
        SortColumn::Score => paper.custom_score,
        SortColumn::Attribute(name) => paper.attributes.get(name)?.trim().parse::<f64>().ok()?,
    };
    (!key.is_nan()).then_some(key)
}

// Unparsed keys go last in both directions.
fn compare_keys(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let natural = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => natural,
                SortDirection::Descending => natural.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts in place. Ties, including papers whose key does not parse, keep
/// their prior relative order.
pub fn sort_papers<T: Borrow<Paper>>(
    papers: &mut [T],
    column: &SortColumn,
    direction: SortDirection,
) {
    papers.sort_by(|a, b| {
        compare_keys(
            sort_key(a.borrow(), column),
            sort_key(b.borrow(), column),
            direction,
        )
    });
}

pub fn sorted<'a, I>(papers: I, column: &SortColumn, direction: SortDirection) -> Vec<&'a Paper>
where
    I: IntoIterator<Item = &'a Paper>,
{
    let mut ordered: Vec<&Paper> = papers.into_iter().collect();
    sort_papers(&mut ordered, column, direction);
    ordered
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
