use chrono::Utc;
use std::collections::HashMap;

use crate::error::PollError;
use crate::store::id::PollIdGenerator;
use crate::store::models::{NewPoll, Poll, PollId, PollOption};

/// Authoritative in-memory mapping of poll id to poll.
///
/// The store itself is not synchronised; callers share it through
/// [`crate::service::PollService`], which serialises every access.
#[derive(Debug, Default)]
pub struct PollStore {
    polls: HashMap<PollId, Poll>,
    // creation order, for stable snapshots
    order: Vec<PollId>,
    ids: PollIdGenerator,
}

impl PollStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_poll(&mut self, new_poll: NewPoll) -> Result<Poll, PollError> {
        let question = new_poll.question.trim();
        if question.is_empty() {
            return Err(PollError::InvalidRequest("question must not be empty".into()));
        }
        if new_poll.options.is_empty() {
            return Err(PollError::InvalidRequest(
                "a poll needs at least one option".into(),
            ));
        }
        if let Some(index) = new_poll.options.iter().position(|o| o.trim().is_empty()) {
            return Err(PollError::InvalidRequest(format!(
                "option {index} must not be empty"
            )));
        }

        let id = self.ids.next_id();
        let poll = Poll {
            id: id.clone(),
            question: question.to_string(),
            options: new_poll
                .options
                .iter()
                .enumerate()
                .map(|(index, text)| PollOption {
                    id: index,
                    text: text.trim().to_string(),
                    votes: 0,
                })
                .collect(),
            created_at: Utc::now(),
        };

        self.polls.insert(id.clone(), poll.clone());
        self.order.push(id);

        Ok(poll)
    }

    pub fn get_poll(&self, poll_id: &str) -> Option<Poll> {
        self.polls.get(poll_id).cloned()
    }

    pub fn list_polls(&self) -> Vec<Poll> {
        self.order
            .iter()
            .filter_map(|id| self.polls.get(id))
            .cloned()
            .collect()
    }

    pub fn cast_vote(&mut self, poll_id: &str, option_id: usize) -> Result<Poll, PollError> {
        let poll = self.polls.get_mut(poll_id).ok_or(PollError::PollNotFound)?;
        let option = poll
            .options
            .get_mut(option_id)
            .ok_or(PollError::InvalidOption(option_id))?;

        option.votes = option.votes.saturating_add(1);

        Ok(poll.clone())
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }
}
