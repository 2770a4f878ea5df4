//! Round-by-round show order audit of an encoded playlist

use crate::channel::m3u::info_labels;
use crate::channel::Schedule;
use std::fmt;

/// Placeholder for an info line that names no known show
pub const UNKNOWN_SHOW: &str = "<unknown>";

/// A round whose observed show order differs from the intended one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMismatch {
    /// 1-based round number
    pub round: usize,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

impl fmt::Display for OrderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {}: expected {:?}, got {:?}",
            self.round, self.expected, self.actual
        )
    }
}

/// Show title of every entry in an encoded playlist.
///
/// A label belongs to the longest known title it starts with, followed
/// by the ` S` of the season marker.
pub fn observed_show_order(encoded: &str, show_titles: &[&str]) -> Vec<String> {
    info_labels(encoded)
        .map(|label| {
            show_titles
                .iter()
                .filter(|title| {
                    label
                        .strip_prefix(**title)
                        .is_some_and(|rest| rest.starts_with(" S"))
                })
                .max_by_key(|title| title.len())
                .map_or_else(|| UNKNOWN_SHOW.to_string(), |title| title.to_string())
        })
        .collect()
}

/// Compare the observed order of each round with the expected order.
///
/// Rounds are `entries_per_round`-sized slices of the output. The last
/// round may be cut short by the entry cap, so only its observed prefix
/// is compared.
pub fn validate_order(
    encoded: &str,
    expected_rounds: &[Vec<&str>],
    entries_per_round: usize,
) -> Vec<OrderMismatch> {
    let mut titles: Vec<&str> = expected_rounds.iter().flatten().copied().collect();
    titles.sort_unstable();
    titles.dedup();

    let actual = observed_show_order(encoded, &titles);
    if entries_per_round == 0 {
        return if actual.is_empty() {
            Vec::new()
        } else {
            vec![OrderMismatch {
                round: 1,
                expected: Vec::new(),
                actual,
            }]
        };
    }

    let mut mismatches = Vec::new();
    for (round_idx, expected) in expected_rounds.iter().enumerate() {
        let start = (round_idx * entries_per_round).min(actual.len());
        let end = ((round_idx + 1) * entries_per_round).min(actual.len());
        let round_actual = &actual[start..end];
        let round_expected = &expected[..round_actual.len().min(expected.len())];

        if round_actual.len() != round_expected.len()
            || round_actual.iter().zip(round_expected).any(|(a, e)| a != e)
        {
            mismatches.push(OrderMismatch {
                round: round_idx + 1,
                expected: round_expected.iter().map(|s| s.to_string()).collect(),
                actual: round_actual.to_vec(),
            });
        }
    }

    let covered = expected_rounds.len() * entries_per_round;
    if actual.len() > covered {
        mismatches.push(OrderMismatch {
            round: expected_rounds.len() + 1,
            expected: Vec::new(),
            actual: actual[covered..].to_vec(),
        });
    }

    mismatches
}

/// Audit an encoded playlist against its schedule, logging every mismatch
pub fn validate_schedule(schedule: &Schedule<'_>, encoded: &str) -> Vec<OrderMismatch> {
    let mismatches = validate_order(encoded, &schedule.round_orders, schedule.entries_per_round);

    if mismatches.is_empty() {
        log::info!(
            "Playlist order verified across {} rounds",
            schedule.round_orders.len()
        );
    }
    for mismatch in &mismatches {
        log::error!("Playlist order mismatch in {}", mismatch);
    }

    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYLIST: &str = "#EXTM3U\n\
        #EXTINF:1200,Law S01E01 - One\n/tv/law/1.mkv\n\
        #EXTINF:1200,Law & Order S02E01 - Two\n/tv/lo/1.mkv\n\
        #EXTINF:1200,Law S01E02 - Three\n/tv/law/2.mkv";

    #[test]
    fn test_observed_prefers_longest_title() {
        let order = observed_show_order(PLAYLIST, &["Law", "Law & Order"]);
        assert_eq!(order, vec!["Law", "Law & Order", "Law"]);
    }

    #[test]
    fn test_unknown_label() {
        let order = observed_show_order(PLAYLIST, &["Law & Order"]);
        assert_eq!(order, vec![UNKNOWN_SHOW, "Law & Order", UNKNOWN_SHOW]);
    }

    #[test]
    fn test_matching_rounds_with_partial_last_round() {
        let rounds = vec![vec!["Law", "Law & Order"], vec!["Law", "Law & Order"]];
        assert!(validate_order(PLAYLIST, &rounds, 2).is_empty());
    }

    #[test]
    fn test_reports_divergent_round() {
        let rounds = vec![vec!["Law & Order", "Law"], vec!["Law", "Law & Order"]];
        let mismatches = validate_order(PLAYLIST, &rounds, 2);

        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].round, 1);
        assert_eq!(mismatches[0].expected, vec!["Law & Order", "Law"]);
        assert_eq!(mismatches[0].actual, vec!["Law", "Law & Order"]);
    }

    #[test]
    fn test_reports_entries_beyond_expected_rounds() {
        let rounds = vec![vec!["Law", "Law & Order"]];
        let mismatches = validate_order(PLAYLIST, &rounds, 2);

        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].round, 2);
        assert_eq!(mismatches[0].actual, vec!["Law"]);
    }
}
