//! In-memory league repository.
//!
//! Holds whole snapshots behind one async mutex. Used by tests and by the CLI
//! when it works on a JSON snapshot file instead of a database.

use async_trait::async_trait;
use log::{debug, info};
use std::{collections::HashMap, path::Path, sync::Arc};
use tokio::sync::Mutex;

use super::repository::LeagueRepository;
use crate::league::{
    changeset::Changeset,
    models::{League, LeagueId},
    snapshot::LeagueSnapshot,
};
use crate::manager::{LeagueError, LeagueResult};

/// League repository backed by a map of snapshots
#[derive(Clone, Default)]
pub struct MemoryLeagueRepository {
    leagues: Arc<Mutex<HashMap<LeagueId, LeagueSnapshot>>>,
}

impl MemoryLeagueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing snapshots
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = LeagueSnapshot>) -> Self {
        let leagues = snapshots
            .into_iter()
            .map(|snapshot| (snapshot.league.id, snapshot))
            .collect();
        Self {
            leagues: Arc::new(Mutex::new(leagues)),
        }
    }

    /// Copy of every stored snapshot, ordered by league name
    pub async fn snapshots(&self) -> Vec<LeagueSnapshot> {
        let mut snapshots: Vec<LeagueSnapshot> = self.leagues.lock().await.values().cloned().collect();
        snapshots.sort_by(|a, b| a.league.name.cmp(&b.league.name).then(a.league.id.cmp(&b.league.id)));
        snapshots
    }

    /// Load from a JSON file holding an array of snapshots. A missing file is an empty repository.
    pub async fn load_json(path: impl AsRef<Path>) -> LeagueResult<Self> {
        let path = path.as_ref();
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot file at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let snapshots: Vec<LeagueSnapshot> = serde_json::from_str(&contents)?;
        info!("Loaded {} leagues from {}", snapshots.len(), path.display());
        Ok(Self::with_snapshots(snapshots))
    }

    /// Write every snapshot to a JSON file
    pub async fn save_json(&self, path: impl AsRef<Path>) -> LeagueResult<()> {
        let snapshots = self.snapshots().await;
        let contents = serde_json::to_string_pretty(&snapshots)?;
        tokio::fs::write(path.as_ref(), contents).await?;
        Ok(())
    }
}

#[async_trait]
impl LeagueRepository for MemoryLeagueRepository {
    async fn load(&self, league_id: LeagueId) -> LeagueResult<LeagueSnapshot> {
        self.leagues
            .lock()
            .await
            .get(&league_id)
            .cloned()
            .ok_or(LeagueError::LeagueNotFound(league_id))
    }

    async fn list_leagues(&self) -> LeagueResult<Vec<League>> {
        Ok(self
            .snapshots()
            .await
            .into_iter()
            .map(|snapshot| snapshot.league)
            .collect())
    }

    async fn create_league(&self, league: &League) -> LeagueResult<()> {
        self.leagues
            .lock()
            .await
            .insert(league.id, LeagueSnapshot::new(league.clone()));
        Ok(())
    }

    async fn transact<T, F>(&self, league_id: LeagueId, decide: F) -> LeagueResult<T>
    where
        T: Send,
        F: FnOnce(&LeagueSnapshot) -> LeagueResult<(Changeset, T)> + Send,
    {
        let mut leagues = self.leagues.lock().await;
        let snapshot = leagues
            .get_mut(&league_id)
            .ok_or(LeagueError::LeagueNotFound(league_id))?;

        let (changes, output) = decide(snapshot)?;
        changes.apply(snapshot)?;
        Ok(output)
    }
}
