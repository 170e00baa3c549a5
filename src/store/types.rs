use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A posted message. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
}

/// User record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password_hash: String, // argon2 PHC string
}

/// Whole persisted state. Integer keys are written as JSON strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub chirps: BTreeMap<u64, Chirp>,
    pub users: BTreeMap<u64, User>,
}

impl Snapshot {
    pub fn next_chirp_id(&self) -> u64 {
        next_id(&self.chirps)
    }

    pub fn next_user_id(&self) -> u64 {
        next_id(&self.users)
    }
}

fn next_id<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}
