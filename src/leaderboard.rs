//! Local leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs. An empty board is
//! seeded with the classic mock roster so the table is never blank.

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    /// Accuracy percentage at the end of the run
    pub accuracy: u32,
    /// Highest level reached
    pub level: u32,
    /// Constellation of the last level played
    pub constellation: String,
    /// Date achieved, YYYY-MM-DD
    pub date: String,
}

/// Column to sort the table by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Score,
    Accuracy,
    Level,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "score" => Some(SortKey::Score),
            "accuracy" => Some(SortKey::Accuracy),
            "level" => Some(SortKey::Level),
            _ => None,
        }
    }
}

/// The leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shooting_star_leaderboard";

    /// Create an empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The mock roster the original leaderboard shipped with
    pub fn with_mock_data() -> Self {
        let rows: [(&str, u32, u32, u32, &str, &str); 10] = [
            ("StarShooter", 2500, 95, 5, "Orion", "2024-01-15"),
            ("CosmicHunter", 2200, 92, 4, "Ursa Major", "2024-01-14"),
            ("GalaxyGamer", 2100, 88, 4, "Cassiopeia", "2024-01-13"),
            ("SpaceExplorer", 1950, 90, 3, "Leo", "2024-01-12"),
            ("NebulaNinja", 1800, 85, 3, "Scorpius", "2024-01-11"),
            ("AstroAce", 1650, 87, 2, "Orion", "2024-01-10"),
            ("MeteorMaster", 1500, 82, 2, "Ursa Major", "2024-01-09"),
            ("CometChaser", 1350, 80, 1, "Cassiopeia", "2024-01-08"),
            ("PulsarPro", 1200, 78, 1, "Leo", "2024-01-07"),
            ("QuasarQueen", 1050, 75, 1, "Scorpius", "2024-01-06"),
        ];
        Self {
            entries: rows
                .into_iter()
                .map(
                    |(player_name, score, accuracy, level, constellation, date)| {
                        LeaderboardEntry {
                            player_name: player_name.to_string(),
                            score,
                            accuracy,
                            level,
                            constellation: constellation.to_string(),
                            date: date.to_string(),
                        }
                    },
                )
                .collect(),
        }
    }

    /// Check if a score qualifies for the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry if it qualifies.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_entry(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Insertion point, sorted descending by score
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Entries for one constellation, or all of them
    pub fn filtered(&self, constellation: Option<&str>) -> Vec<&LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|e| constellation.is_none_or(|c| e.constellation == c))
            .collect()
    }

    /// Entries sorted descending by the given column
    pub fn sorted_by(&self, key: SortKey) -> Vec<&LeaderboardEntry> {
        let mut rows: Vec<&LeaderboardEntry> = self.entries.iter().collect();
        match key {
            SortKey::Score => rows.sort_by(|a, b| b.score.cmp(&a.score)),
            SortKey::Accuracy => rows.sort_by(|a, b| b.accuracy.cmp(&a.accuracy)),
            SortKey::Level => rows.sort_by(|a, b| b.level.cmp(&a.level)),
        }
        rows
    }

    /// Check if the board is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the board from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<Leaderboard>(&json) {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, seeding mock data");
        Self::with_mock_data()
    }

    /// Save the board to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::with_mock_data()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            score,
            accuracy: 80,
            level: 1,
            constellation: "Orion".to_string(),
            date: "2024-02-01".to_string(),
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
    }

    #[test]
    fn test_add_entry_ranks_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_entry(entry("a", 100)), Some(1));
        assert_eq!(board.add_entry(entry("b", 300)), Some(1));
        assert_eq!(board.add_entry(entry("c", 200)), Some(2));
        let scores: Vec<u32> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn test_board_truncates_to_max() {
        let mut board = Leaderboard::new();
        for i in 1..=12u32 {
            board.add_entry(entry("p", i * 10));
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        // Lowest survivors are 30..=120
        assert_eq!(board.entries.last().unwrap().score, 30);
        // Below the cutoff no longer qualifies
        assert!(!board.qualifies(30));
        assert!(board.qualifies(31));
    }

    #[test]
    fn test_potential_rank_matches_insert() {
        let mut board = Leaderboard::with_mock_data();
        let rank = board.potential_rank(2000);
        assert_eq!(rank, Some(4));
        assert_eq!(board.add_entry(entry("me", 2000)), Some(4));
    }

    #[test]
    fn test_mock_data_shape() {
        let board = Leaderboard::with_mock_data();
        assert_eq!(board.entries.len(), 10);
        assert_eq!(board.top_score(), Some(2500));
        // Mock rows arrive sorted descending by score
        for pair in board.entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_filter_by_constellation() {
        let board = Leaderboard::with_mock_data();
        let orion = board.filtered(Some("Orion"));
        assert_eq!(orion.len(), 2);
        assert!(orion.iter().all(|e| e.constellation == "Orion"));
        assert_eq!(board.filtered(None).len(), 10);
    }

    #[test]
    fn test_sort_keys() {
        let board = Leaderboard::with_mock_data();
        let by_accuracy = board.sorted_by(SortKey::Accuracy);
        assert_eq!(by_accuracy[0].accuracy, 95);
        let by_level = board.sorted_by(SortKey::Level);
        assert_eq!(by_level[0].level, 5);
    }
}
