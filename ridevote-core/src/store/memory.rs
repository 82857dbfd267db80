//! In-process store used by tests and single-user sessions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{AppBranding, AttractionId, AttractionOverride, UserName, UserRanking};

use super::{
    DisplayStore, RankingFeed, RankingListener, RankingStore, ResetReport, StoreError,
    Subscription,
};

#[derive(Debug, Default)]
struct State {
    rankings: BTreeMap<UserName, UserRanking>,
    overrides: BTreeMap<AttractionId, AttractionOverride>,
    branding: Option<AppBranding>,
}

impl State {
    fn snapshot(&self) -> Vec<UserRanking> {
        self.rankings.values().cloned().collect()
    }
}

/// [`RankingStore`] and [`DisplayStore`] backed by in-memory maps.
///
/// Operations never fail.
#[derive(Debug, Default)]
pub struct MemoryRankingStore {
    state: Mutex<State>,
    feed: RankingFeed,
}

impl MemoryRankingStore {
    /// Create a store seeded with `rankings`.
    #[must_use]
    pub fn with_rankings<I>(rankings: I) -> Self
    where
        I: IntoIterator<Item = UserRanking>,
    {
        let store = Self::default();
        store.lock().rankings = rankings
            .into_iter()
            .map(|ranking| (ranking.user_name().clone(), ranking))
            .collect();
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RankingStore for MemoryRankingStore {
    fn all_rankings(&self) -> Result<Vec<UserRanking>, StoreError> {
        Ok(self.lock().snapshot())
    }

    fn get_ranking(&self, user: &UserName) -> Result<Option<UserRanking>, StoreError> {
        Ok(self.lock().rankings.get(user).cloned())
    }

    fn put_ranking(&self, ranking: UserRanking) -> Result<(), StoreError> {
        let publication = self.feed.begin();
        let snapshot = {
            let mut state = self.lock();
            state
                .rankings
                .insert(ranking.user_name().clone(), ranking);
            state.snapshot()
        };
        publication.publish(&snapshot);
        Ok(())
    }

    fn delete_all_rankings(&self) -> Result<ResetReport, StoreError> {
        let publication = self.feed.begin();
        let deleted = {
            let mut state = self.lock();
            let deleted = state.rankings.len();
            state.rankings.clear();
            deleted
        };
        publication.publish(&[]);
        Ok(ResetReport { deleted })
    }

    fn subscribe(&self, listener: RankingListener) -> Result<Subscription, StoreError> {
        let publication = self.feed.begin();
        let snapshot = self.lock().snapshot();
        Ok(publication.register(listener, &snapshot))
    }
}

impl DisplayStore for MemoryRankingStore {
    fn attraction_overrides(&self) -> Result<Vec<AttractionOverride>, StoreError> {
        Ok(self.lock().overrides.values().cloned().collect())
    }

    fn put_attraction_override(&self, entry: AttractionOverride) -> Result<(), StoreError> {
        self.lock()
            .overrides
            .insert(entry.attraction_id.clone(), entry);
        Ok(())
    }

    fn branding(&self) -> Result<AppBranding, StoreError> {
        Ok(self.lock().branding.clone().unwrap_or_default())
    }

    fn put_branding(&self, branding: AppBranding) -> Result<(), StoreError> {
        self.lock().branding = Some(branding);
        Ok(())
    }
}
