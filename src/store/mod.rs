//! File-backed record store.
//!
//! The whole state lives in one JSON document. Every read loads the full
//! snapshot and every write rewrites it, so all access goes through a single
//! reader/writer lock: reads share it, writes hold it exclusively for the
//! whole load-modify-write cycle.

mod types;

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::password::hash_password_blocking;
use crate::error::{Error, Result};

pub use types::{Chirp, Snapshot, User};

pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Store {
    /// Open the store at `path`, creating an empty snapshot if the file is missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        };
        store.ensure().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure(&self) -> Result<()> {
        let _guard = self.lock.write().await;
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "creating empty store");
                self.write(&Snapshot::default()).await
            }
            Err(e) => Err(e.into()),
        }
    }

    // Callers must hold the lock.
    async fn load(&self) -> Result<Snapshot> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    // Callers must hold the write lock.
    async fn write(&self, snapshot: &Snapshot) -> Result<()> {
        let data = serde_json::to_vec(snapshot)?;
        tokio::fs::write(&self.path, data).await?;
        debug!(
            chirps = snapshot.chirps.len(),
            users = snapshot.users.len(),
            "store written"
        );
        Ok(())
    }

    /// Load the whole snapshot under the shared lock.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    pub async fn create_chirp(&self, body: &str) -> Result<Chirp> {
        let _guard = self.lock.write().await;
        let mut snapshot = self.load().await?;
        let chirp = Chirp {
            id: snapshot.next_chirp_id(),
            body: body.to_string(),
        };
        snapshot.chirps.insert(chirp.id, chirp.clone());
        self.write(&snapshot).await?;
        debug!(chirp_id = chirp.id, "chirp created");
        Ok(chirp)
    }

    /// All chirps, ascending by id.
    pub async fn get_chirps(&self) -> Result<Vec<Chirp>> {
        let snapshot = self.snapshot().await?;
        // BTreeMap iterates in key order.
        Ok(snapshot.chirps.into_values().collect())
    }

    /// Look up a chirp by its textual id.
    pub async fn get_chirp(&self, id: &str) -> Result<Chirp> {
        let id = parse_id(id)?;
        let mut snapshot = self.snapshot().await?;
        snapshot.chirps.remove(&id).ok_or(Error::NotFound("chirp"))
    }

    /// Hash `password` and insert a new user. Duplicate emails are accepted.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User> {
        // Hash before taking the lock so slow hashing never blocks other requests.
        let password_hash = hash_password_blocking(password).await?;

        let _guard = self.lock.write().await;
        let mut snapshot = self.load().await?;
        let user = User {
            id: snapshot.next_user_id(),
            email: email.to_string(),
            password_hash,
        };
        snapshot.users.insert(user.id, user.clone());
        self.write(&snapshot).await?;
        debug!(user_id = user.id, "user created");
        Ok(user)
    }

    /// First user (lowest id) with a matching email.
    pub async fn get_user(&self, email: &str) -> Result<User> {
        let snapshot = self.snapshot().await?;
        snapshot
            .users
            .into_values()
            .find(|u| u.email == email)
            .ok_or(Error::NotFound("user"))
    }

    pub async fn get_user_by_id(&self, id: u64) -> Result<User> {
        let mut snapshot = self.snapshot().await?;
        snapshot.users.remove(&id).ok_or(Error::NotFound("user"))
    }

    pub async fn update_user(&self, id: u64, email: &str, password_hash: &str) -> Result<User> {
        let _guard = self.lock.write().await;
        let mut snapshot = self.load().await?;
        let user = snapshot.users.get_mut(&id).ok_or(Error::NotFound("user"))?;
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        let updated = user.clone();
        self.write(&snapshot).await?;
        debug!(user_id = id, "user updated");
        Ok(updated)
    }
}

fn parse_id(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidArgument(format!("{raw:?} is not a positive integer id"))),
    }
}
