use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id_newtype!(PaperId);
string_id_newtype!(CsrfToken);

/// What a gesture asks the server to do with a vote or a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Add,
    Remove,
}

impl Direction {
    pub fn is_add(self) -> bool {
        matches!(self, Direction::Add)
    }
}

/// Listing section a paper is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Local,
    Voted,
    Other,
}

impl SectionKey {
    pub const ALL: [SectionKey; 3] = [SectionKey::Local, SectionKey::Voted, SectionKey::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Local => "local",
            SectionKey::Voted => "voted",
            SectionKey::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    /// Text-size class applied to every abstract paragraph.
    pub fn css_class(self) -> &'static str {
        match self {
            FontSize::Small => "abstract-para-small",
            FontSize::Medium => "abstract-para-medium",
            FontSize::Large => "abstract-para-large",
        }
    }

    /// Id of the radio control selecting this size.
    pub fn control_id(self) -> &'static str {
        match self {
            FontSize::Small => "font-size-small",
            FontSize::Medium => "font-size-medium",
            FontSize::Large => "font-size-large",
        }
    }

    pub fn from_control_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.control_id() == id)
    }
}

/// One discussable paper as loaded from the page payload.
///
/// `vote_count`, `voted_by_user` and `reserved_by_user` change only after a
/// confirmed server response; everything else is fixed for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(rename = "arxivid")]
    pub id: PaperId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default, skip_serializing_if = "String::is_empty")]
    pub abstract_text: String,
    #[serde(rename = "nvotes", default)]
    pub vote_count: u32,
    #[serde(rename = "voted", default)]
    pub voted_by_user: bool,
    #[serde(rename = "reserved", default)]
    pub reserved_by_user: bool,
    #[serde(rename = "local_authors", default)]
    pub is_local_author: bool,
    /// `None` when the payload date does not parse; such papers sort last
    /// by date.
    #[serde(
        rename = "utcdate",
        default,
        deserialize_with = "deserialize_paper_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<NaiveDate>,
    #[serde(rename = "score", default)]
    pub custom_score: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Paper {
    pub fn new(id: impl Into<String>, published_at: NaiveDate) -> Self {
        Self {
            id: PaperId::new(id),
            title: String::new(),
            abstract_text: String::new(),
            vote_count: 0,
            voted_by_user: false,
            reserved_by_user: false,
            is_local_author: false,
            published_at: Some(published_at),
            custom_score: 0.0,
            attributes: BTreeMap::new(),
        }
    }

    pub fn section(&self) -> SectionKey {
        if self.is_local_author {
            SectionKey::Local
        } else if self.vote_count > 0 {
            SectionKey::Voted
        } else {
            SectionKey::Other
        }
    }

    pub fn next_vote_action(&self) -> Direction {
        if self.voted_by_user {
            Direction::Remove
        } else {
            Direction::Add
        }
    }

    pub fn next_reserve_action(&self) -> Direction {
        if self.reserved_by_user {
            Direction::Remove
        } else {
            Direction::Add
        }
    }

    /// Both flags set means the local cache broke mutual exclusion.
    pub fn violates_exclusion(&self) -> bool {
        self.voted_by_user && self.reserved_by_user
    }
}

/// Reads a payload date: `YYYY-MM-DD`, optionally followed by a time of
/// day or a full RFC 3339 timestamp (converted to its UTC date).
pub fn parse_paper_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_utc().date());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
}

fn deserialize_paper_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_paper_date))
}

/// Singular only for exactly one vote.
pub fn vote_postfix(count: u32) -> &'static str {
    if count == 1 {
        "vote"
    } else {
        "votes"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPreferences {
    pub section_visibility: BTreeMap<SectionKey, bool>,
    pub font_size: FontSize,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            section_visibility: SectionKey::ALL.into_iter().map(|key| (key, true)).collect(),
            font_size: FontSize::default(),
        }
    }
}

impl ViewPreferences {
    pub fn is_section_visible(&self, section: SectionKey) -> bool {
        self.section_visibility.get(&section).copied().unwrap_or(true)
    }

    pub fn set_section_visible(&mut self, section: SectionKey, visible: bool) {
        self.section_visibility.insert(section, visible);
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
