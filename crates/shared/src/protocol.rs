use serde::{Deserialize, Serialize};

use crate::domain::{CsrfToken, Direction, PaperId};

pub const STATUS_SUCCESS: &str = "success";

pub type FormFields = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }
}

impl From<Direction> for VoteType {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Add => VoteType::Up,
            Direction::Remove => VoteType::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveType {
    Reserve,
    Release,
}

impl ReserveType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReserveType::Reserve => "reserve",
            ReserveType::Release => "release",
        }
    }
}

impl From<Direction> for ReserveType {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Add => ReserveType::Reserve,
            Direction::Remove => ReserveType::Release,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteForm {
    pub arxivid: PaperId,
    pub votetype: VoteType,
    #[serde(rename = "_xsrf")]
    pub xsrf: CsrfToken,
}

impl VoteForm {
    pub fn fields(&self) -> FormFields {
        vec![
            ("arxivid", self.arxivid.0.clone()),
            ("votetype", self.votetype.as_str().to_string()),
            ("_xsrf", self.xsrf.0.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveForm {
    pub arxivid: PaperId,
    pub reservetype: ReserveType,
    #[serde(rename = "_xsrf")]
    pub xsrf: CsrfToken,
}

impl ReserveForm {
    pub fn fields(&self) -> FormFields {
        vec![
            ("arxivid", self.arxivid.0.clone()),
            ("reservetype", self.reservetype.as_str().to_string()),
            ("_xsrf", self.xsrf.0.clone()),
        ]
    }
}

/// Body returned by both state-changing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerReply {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerReply {
    pub fn success(results: Option<serde_json::Value>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            results,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            results: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResults {
    pub nvotes: u32,
}
