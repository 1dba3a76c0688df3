use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::Paper,
    protocol::{FormFields, ServerReply},
};
use tokio::sync::Mutex;

use crate::transport::{Transport, TransportError};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn paper(id: &str, local: bool, votes: u32) -> Paper {
    let mut paper = Paper::new(id, date(2024, 5, 1));
    paper.is_local_author = local;
    paper.vote_count = votes;
    paper
}

pub(crate) fn ids(papers: &[&Paper]) -> Vec<String> {
    papers.iter().map(|paper| paper.id.0.clone()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub path: String,
    pub fields: FormFields,
}

impl RecordedCall {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) enum ScriptedReply {
    Reply(ServerReply),
    Fail,
}

/// Answers with queued replies in order and records every request.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, reply: ServerReply) {
        self.replies.lock().await.push_back(ScriptedReply::Reply(reply));
    }

    pub async fn push_failure(&self) {
        self.replies.lock().await.push_back(ScriptedReply::Fail);
    }

    pub async fn replies_left(&self) -> usize {
        self.replies.lock().await.len()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_form(
        &self,
        path: &str,
        fields: FormFields,
    ) -> Result<ServerReply, TransportError> {
        self.calls.lock().await.push(RecordedCall {
            path: path.to_string(),
            fields,
        });
        match self.replies.lock().await.pop_front() {
            Some(ScriptedReply::Reply(reply)) => Ok(reply),
            Some(ScriptedReply::Fail) | None => Err(TransportError::Request {
                path: path.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}
