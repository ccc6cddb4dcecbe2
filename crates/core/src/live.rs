//! Wire protocol for live subscriptions over WebSocket.
//!
//! A client subscribes to a public collection by name, or to `profile` for
//! the owner profile singleton.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::Collection;

/// Subscribe target naming the profile singleton.
pub const PROFILE_TARGET: &str = "profile";

/// Sent by the client. `collection` is a collection name or `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Subscribe { collection: String },
    Unsubscribe { collection: String },
}

/// What a live subscription follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveTarget {
    Collection(Collection),
    Profile,
}

impl LiveTarget {
    pub fn name(self) -> &'static str {
        match self {
            LiveTarget::Collection(c) => c.name(),
            LiveTarget::Profile => PROFILE_TARGET,
        }
    }

    /// Anonymous clients may follow the profile and every public collection.
    pub fn is_public(self) -> bool {
        match self {
            LiveTarget::Collection(c) => c.is_public(),
            LiveTarget::Profile => true,
        }
    }
}

impl fmt::Display for LiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LiveTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PROFILE_TARGET {
            return Ok(LiveTarget::Profile);
        }
        s.parse::<Collection>().map(LiveTarget::Collection)
    }
}

/// Sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Full ordered contents of the collection. `seq` strictly increases per
    /// subscription.
    Snapshot {
        collection: String,
        seq: u64,
        items: Vec<serde_json::Value>,
    },
    /// Current owner profile, all-blank until first saved.
    Profile {
        seq: u64,
        profile: serde_json::Value,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        collection: Option<String>,
        message: String,
    },
}
