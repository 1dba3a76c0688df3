//! Per-paper vote/reservation state and its confirmed transitions.
//!
//! Cached state changes only after the server confirms a request. Before any
//! request the controller checks mutual exclusion between an active vote and
//! an active reservation against its cache and answers immediately when the
//! request could only fail.

use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::{CsrfToken, Direction, Paper, PaperId},
    error::{ErrorCode, Notice},
    protocol::{ReserveForm, ServerReply, VoteForm, VoteResults},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{config::ClientSettings, transport::Transport};

pub const RESERVED_BLOCKS_VOTE_MESSAGE: &str =
    "You've already reserved this paper for later discussion; release your reservation first and then vote to discuss this paper at next astro-coffee.";
pub const VOTED_BLOCKS_RESERVE_MESSAGE: &str =
    "You've already voted to discuss this paper at next astro-coffee; remove your vote first and then reserve this paper for later discussion.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Confirmed by the server. Votes carry the server's new count.
    Applied { vote_count: Option<u32> },
    RejectedByInvariant(String),
    RejectedByServer(String),
    TransportFailure,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            Outcome::Applied { .. } => None,
            Outcome::RejectedByInvariant(message) => {
                Some(Notice::new(ErrorCode::InvariantViolation, message.clone()))
            }
            Outcome::RejectedByServer(message) => {
                Some(Notice::new(ErrorCode::ServerRejection, message.clone()))
            }
            Outcome::TransportFailure => Some(Notice::transport_failure()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("paper {0} is not part of the loaded listing")]
    UnknownPaper(PaperId),
}

#[derive(Default)]
struct ControllerState {
    papers: Vec<Paper>,
    index: HashMap<PaperId, usize>,
}

impl ControllerState {
    fn new(papers: Vec<Paper>) -> Self {
        let mut state = Self::default();
        for paper in papers {
            if state.index.contains_key(&paper.id) {
                warn!("controller: duplicate paper in payload paper={} kept=first", paper.id);
                continue;
            }
            state.index.insert(paper.id.clone(), state.papers.len());
            state.papers.push(paper);
        }
        state
    }

    fn get(&self, paper_id: &PaperId) -> Result<&Paper, InteractionError> {
        self.index
            .get(paper_id)
            .map(|&i| &self.papers[i])
            .ok_or_else(|| InteractionError::UnknownPaper(paper_id.clone()))
    }

    fn get_mut(&mut self, paper_id: &PaperId) -> Result<&mut Paper, InteractionError> {
        match self.index.get(paper_id) {
            Some(&i) => Ok(&mut self.papers[i]),
            None => Err(InteractionError::UnknownPaper(paper_id.clone())),
        }
    }
}

fn vote_results(reply: &ServerReply) -> Option<VoteResults> {
    serde_json::from_value(reply.results.clone()?).ok()
}

// A failed reply without a message is not well formed.
fn rejection(kind: &str, paper_id: &PaperId, reply: ServerReply) -> Outcome {
    match reply.message {
        Some(message) => {
            info!(
                "{kind}: rejected by server paper={paper_id} status={} message={message}",
                reply.status
            );
            Outcome::RejectedByServer(message)
        }
        None => {
            warn!(
                "{kind}: failure reply without message paper={paper_id} status={}",
                reply.status
            );
            Outcome::TransportFailure
        }
    }
}

pub struct PaperInteractionController {
    transport: Arc<dyn Transport>,
    csrf_token: CsrfToken,
    vote_path: String,
    reserve_path: String,
    state: Mutex<ControllerState>,
}

impl PaperInteractionController {
    pub fn new(transport: Arc<dyn Transport>, csrf_token: CsrfToken, papers: Vec<Paper>) -> Self {
        let defaults = ClientSettings::default();
        Self {
            transport,
            csrf_token,
            vote_path: defaults.vote_path,
            reserve_path: defaults.reserve_path,
            state: Mutex::new(ControllerState::new(papers)),
        }
    }

    pub fn from_settings(
        transport: Arc<dyn Transport>,
        csrf_token: CsrfToken,
        papers: Vec<Paper>,
        settings: &ClientSettings,
    ) -> Self {
        Self::new(transport, csrf_token, papers)
            .with_paths(settings.vote_path.clone(), settings.reserve_path.clone())
    }

    pub fn with_paths(
        mut self,
        vote_path: impl Into<String>,
        reserve_path: impl Into<String>,
    ) -> Self {
        self.vote_path = vote_path.into();
        self.reserve_path = reserve_path.into();
        self
    }

    /// Snapshot of every paper in payload order.
    pub async fn papers(&self) -> Vec<Paper> {
        self.state.lock().await.papers.clone()
    }

    pub async fn paper(&self, paper_id: &PaperId) -> Result<Paper, InteractionError> {
        self.state.lock().await.get(paper_id).cloned()
    }

    pub async fn submit_vote(
        &self,
        paper_id: &PaperId,
        direction: Direction,
    ) -> Result<Outcome, InteractionError> {
        let reserved = self.state.lock().await.get(paper_id)?.reserved_by_user;
        if reserved {
            info!("vote: rejected by invariant paper={paper_id} reason=reserved");
            return Ok(Outcome::RejectedByInvariant(
                RESERVED_BLOCKS_VOTE_MESSAGE.to_string(),
            ));
        }

        let form = VoteForm {
            arxivid: paper_id.clone(),
            votetype: direction.into(),
            xsrf: self.csrf_token.clone(),
        };
        // The state lock is not held here; overlapping requests apply in
        // arrival order.
        let reply = match self.transport.post_form(&self.vote_path, form.fields()).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("vote: transport failure paper={paper_id} err={err}");
                return Ok(Outcome::TransportFailure);
            }
        };

        if !reply.is_success() {
            return Ok(rejection("vote", paper_id, reply));
        }

        let Some(results) = vote_results(&reply) else {
            warn!("vote: success reply without nvotes paper={paper_id}");
            return Ok(Outcome::TransportFailure);
        };

        let mut guard = self.state.lock().await;
        let paper = guard.get_mut(paper_id)?;
        paper.vote_count = results.nvotes;
        paper.voted_by_user = direction.is_add();
        if paper.violates_exclusion() {
            warn!("vote: server confirmed vote on reserved paper paper={paper_id}");
        }
        info!(
            "vote: applied paper={paper_id} votetype={} nvotes={}",
            form.votetype.as_str(),
            results.nvotes
        );

        Ok(Outcome::Applied {
            vote_count: Some(results.nvotes),
        })
    }

    pub async fn submit_reservation(
        &self,
        paper_id: &PaperId,
        direction: Direction,
    ) -> Result<Outcome, InteractionError> {
        let voted = self.state.lock().await.get(paper_id)?.voted_by_user;
        if voted && direction.is_add() {
            info!("reserve: rejected by invariant paper={paper_id} reason=voted");
            return Ok(Outcome::RejectedByInvariant(
                VOTED_BLOCKS_RESERVE_MESSAGE.to_string(),
            ));
        }

        let form = ReserveForm {
            arxivid: paper_id.clone(),
            reservetype: direction.into(),
            xsrf: self.csrf_token.clone(),
        };
        let reply = match self
            .transport
            .post_form(&self.reserve_path, form.fields())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!("reserve: transport failure paper={paper_id} err={err}");
                return Ok(Outcome::TransportFailure);
            }
        };

        if !reply.is_success() {
            return Ok(rejection("reserve", paper_id, reply));
        }

        let mut guard = self.state.lock().await;
        let paper = guard.get_mut(paper_id)?;
        paper.reserved_by_user = direction.is_add();
        if paper.violates_exclusion() {
            warn!("reserve: server confirmed reservation on voted paper paper={paper_id}");
        }
        info!(
            "reserve: applied paper={paper_id} reservetype={}",
            form.reservetype.as_str()
        );

        Ok(Outcome::Applied { vote_count: None })
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
