//! Community leaderboard ranking.

use serde::{Deserialize, Serialize};

use crate::types::{CarbonKg, UserId};

/// One community member's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub points: u32,
    pub carbon_saved: CarbonKg,
}

/// An entry with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

impl RankedEntry {
    /// Medal caption for the podium, if this entry is on it.
    #[must_use]
    pub const fn medal(&self) -> Option<&'static str> {
        match self.rank {
            1 => Some("1st Place"),
            2 => Some("2nd Place"),
            3 => Some("3rd Place"),
            _ => None,
        }
    }
}

/// Order by points, highest first. Ties keep their input order.
#[must_use]
pub fn rank(entries: &[LeaderboardEntry]) -> Vec<RankedEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry { rank: i + 1, entry })
        .collect()
}

/// The first three ranked entries.
#[must_use]
pub fn podium(ranked: &[RankedEntry]) -> &[RankedEntry] {
    ranked.get(..3).unwrap_or(ranked)
}

/// Where one member sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub rank: usize,
    /// Points needed to pass the member directly above. `None` at the top.
    pub points_to_next: Option<u32>,
}

/// Find `user_id` in a ranked board.
#[must_use]
pub fn standing(ranked: &[RankedEntry], user_id: UserId) -> Option<Standing> {
    let index = ranked.iter().position(|r| r.entry.user_id == user_id)?;
    let points = ranked.get(index)?.entry.points;
    let points_to_next = index
        .checked_sub(1)
        .and_then(|above| ranked.get(above))
        .map(|above| above.entry.points.saturating_sub(points).saturating_add(1));
    Some(Standing {
        rank: index + 1,
        points_to_next,
    })
}

/// Add points and carbon to an existing member.
///
/// Returns `false` when `user_id` has no entry.
pub fn apply_score(
    entries: &mut [LeaderboardEntry],
    user_id: UserId,
    points: u32,
    carbon_saved: CarbonKg,
) -> bool {
    match entries.iter_mut().find(|e| e.user_id == user_id) {
        Some(entry) => {
            entry.points = entry.points.saturating_add(points);
            entry.carbon_saved = entry.carbon_saved + carbon_saved;
            true
        }
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn entry(name: &str, points: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            user_id: UserId::generate(),
            display_name: name.to_string(),
            photo_url: None,
            points,
            carbon_saved: CarbonKg::from_centi_kg(1000),
        }
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let entries = vec![entry("a", 300), entry("b", 900), entry("c", 300), entry("d", 500)];
        let ranked = rank(&entries);
        let names: Vec<_> = ranked.iter().map(|r| r.entry.display_name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].rank, 4);
    }

    #[test]
    fn test_podium_and_medals() {
        let entries: Vec<_> = (0..5).map(|i| entry("x", i * 100)).collect();
        let ranked = rank(&entries);
        let top = podium(&ranked);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].medal(), Some("1st Place"));
        assert_eq!(top[2].medal(), Some("3rd Place"));
        assert_eq!(ranked[3].medal(), None);
    }

    #[test]
    fn test_podium_short_board() {
        let ranked = rank(&[entry("solo", 10)]);
        assert_eq!(podium(&ranked).len(), 1);
        assert!(podium(&[]).is_empty());
    }

    #[test]
    fn test_standing() {
        let entries = vec![entry("a", 900), entry("b", 500), entry("c", 500)];
        let ranked = rank(&entries);

        let top = standing(&ranked, entries[0].user_id).unwrap();
        assert_eq!(top.rank, 1);
        assert_eq!(top.points_to_next, None);

        let second = standing(&ranked, entries[1].user_id).unwrap();
        assert_eq!(second.points_to_next, Some(401));

        // Tied with the member above; one more point passes them.
        let third = standing(&ranked, entries[2].user_id).unwrap();
        assert_eq!(third.rank, 3);
        assert_eq!(third.points_to_next, Some(1));

        assert!(standing(&ranked, UserId::generate()).is_none());
    }

    #[test]
    fn test_apply_score_existing_only() {
        let mut entries = vec![entry("a", 100)];
        let id = entries[0].user_id;
        assert!(apply_score(&mut entries, id, 25, CarbonKg::from_centi_kg(150)));
        assert_eq!(entries[0].points, 125);
        assert_eq!(entries[0].carbon_saved, CarbonKg::from_centi_kg(1150));

        assert!(!apply_score(&mut entries, UserId::generate(), 25, CarbonKg::ZERO));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_ranked_entry_serializes_flat() {
        let ranked = rank(&[entry("a", 100)]);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["display_name"], "a");
    }
}
