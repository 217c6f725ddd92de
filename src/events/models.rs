use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::store::{NewPoll, Poll, PollId};

/// Notifications pushed to observers. Always carries whole polls, never deltas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    CurrentPolls(Vec<Poll>),
    PollCreated(Poll),
    PollUpdated(Poll),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::CurrentPolls(_) => "currentPolls",
            ServerEvent::PollCreated(_) => "pollCreated",
            ServerEvent::PollUpdated(_) => "pollUpdated",
        }
    }

    pub fn to_json(&self) -> String {
        // Only plain data structs and strings, serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Actions an observer pushes over its socket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Vote(VoteEvent),
    CreatePoll(NewPoll),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEvent {
    pub poll_id: PollId,
    pub option_id: usize,
}

pub type EventSender = broadcast::Sender<ServerEvent>;
pub type EventReceiver = broadcast::Receiver<ServerEvent>;
