use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PollId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Position of the option within its poll.
    pub id: usize,
    pub text: String,
    pub votes: u64,
}

/// Input for creating a poll, shared by the HTTP body and the socket event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
}

impl Poll {
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes).sum()
    }
}
