//! High-score ranking

use crate::account::AccountRecord;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub high_score: u32,
}

/// Top `limit` accounts by high score, best first
///
/// The sort is stable, so equal scores keep the order the store returned
/// them in (registration order for the bundled stores).
pub fn rank(records: &[AccountRecord], limit: usize) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&AccountRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.high_score.cmp(&a.high_score));

    ranked
        .into_iter()
        .take(limit)
        .map(|r| LeaderboardEntry {
            username: r.username.clone(),
            high_score: r.high_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, high_score: u32) -> AccountRecord {
        AccountRecord {
            username: username.to_string(),
            password_hash: String::new(),
            high_score,
        }
    }

    #[test]
    fn test_higher_score_first() {
        let records = vec![record("alice", 50), record("bob", 80)];
        let ranked = rank(&records, 5);

        assert_eq!(ranked[0].username, "bob");
        assert_eq!(ranked[0].high_score, 80);
        assert_eq!(ranked[1].username, "alice");
    }

    #[test]
    fn test_limit_and_order() {
        let records: Vec<_> = (0..12).map(|i| record(&format!("user{i}"), i * 7 % 5)).collect();
        let ranked = rank(&records, 5);

        assert_eq!(ranked.len(), 5);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].high_score >= pair[1].high_score));
    }

    #[test]
    fn test_ties_keep_store_order() {
        let records = vec![
            record("carol", 10),
            record("alice", 30),
            record("bob", 10),
            record("dave", 30),
        ];
        let names: Vec<_> = rank(&records, 5).into_iter().map(|e| e.username).collect();

        assert_eq!(names, ["alice", "dave", "carol", "bob"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let records = vec![record("a1x", 5), record("b2y", 9), record("c3z", 5)];
        assert_eq!(rank(&records, 5), rank(&records, 5));
        assert_eq!(records[0].username, "a1x");
    }

    #[test]
    fn test_empty_and_short_inputs() {
        assert!(rank(&[], 5).is_empty());
        assert_eq!(rank(&[record("solo", 1)], 5).len(), 1);
    }
}
