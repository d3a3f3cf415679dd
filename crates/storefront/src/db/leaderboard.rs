//! Leaderboard repository.

use ecotrade_core::leaderboard::{self, LeaderboardEntry, RankedEntry};
use ecotrade_core::user::User;
use ecotrade_core::{CarbonKg, UserId};

use super::Datastore;

/// Repository for community standings.
pub struct LeaderboardRepository<'a> {
    store: &'a Datastore,
}

impl<'a> LeaderboardRepository<'a> {
    /// Create a new leaderboard repository.
    #[must_use]
    pub const fn new(store: &'a Datastore) -> Self {
        Self { store }
    }

    /// Standings, highest points first.
    pub async fn entries(&self) -> Vec<RankedEntry> {
        self.store.delay().await;
        leaderboard::rank(&self.store.leaderboard.read().await)
    }

    /// Add to an existing member's score. Returns `false` for unknown members.
    pub async fn update_user_score(
        &self,
        user_id: UserId,
        points: u32,
        carbon_saved: CarbonKg,
    ) -> bool {
        self.store.delay().await;
        let mut entries = self.store.leaderboard.write().await;
        leaderboard::apply_score(&mut entries, user_id, points, carbon_saved)
    }

    /// Add to a shopper's score, creating their entry on first purchase.
    ///
    /// The entry's name and photo are taken from `user` either way.
    pub async fn upsert_user(&self, user: &User, points: u32, carbon_saved: CarbonKg) {
        self.store.delay().await;
        let mut entries = self.store.leaderboard.write().await;
        if leaderboard::apply_score(&mut entries, user.id, points, carbon_saved) {
            sync_profile(&mut entries, user);
        } else {
            entries.push(LeaderboardEntry {
                user_id: user.id,
                display_name: user.display_name.clone(),
                photo_url: user.photo_url.clone(),
                points,
                carbon_saved,
            });
        }
    }

    /// Copy a renamed shopper's name and photo onto their entry, if any.
    pub async fn refresh_profile(&self, user: &User) -> bool {
        self.store.delay().await;
        sync_profile(&mut self.store.leaderboard.write().await, user)
    }
}

fn sync_profile(entries: &mut [LeaderboardEntry], user: &User) -> bool {
    match entries.iter_mut().find(|e| e.user_id == user.id) {
        Some(entry) => {
            entry.display_name.clone_from(&user.display_name);
            entry.photo_url.clone_from(&user.photo_url);
            true
        }
        None => false,
    }
}
