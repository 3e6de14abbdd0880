//! Ranking of stations against a query.
//!
//! Candidates are placed in tiers (exact, prefix, word prefix, substring,
//! acronym, in-order characters) and sorted best tier first. Within the
//! in-order tier, tighter matches rank higher. Equal ranks keep the order
//! of the input list. Names matching no tier are dropped.

use std::cmp::Ordering;

use crate::domain::Station;

use super::fold::fold;

/// Maximum number of stations returned by a search.
pub const DEFAULT_RESULT_CAP: usize = 20;

/// How a station name matched a query, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Every query character appears in the name, in order.
    Subsequence,
    /// The query is a prefix of the initials of the name's words.
    Acronym,
    /// The name contains the query somewhere.
    Contains,
    /// A word inside the name starts with the query.
    WordPrefix,
    /// The name starts with the query.
    Prefix,
    /// The name equals the query.
    Equal,
}

/// Rank of one candidate. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rank {
    pub tier: MatchTier,
    /// In (0, 1]; only meaningful for [`MatchTier::Subsequence`].
    pub closeness: f64,
}

impl Rank {
    fn tier(tier: MatchTier) -> Self {
        Self {
            tier,
            closeness: 1.0,
        }
    }

    fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .tier
            .cmp(&self.tier)
            .then_with(|| other.closeness.total_cmp(&self.closeness))
    }
}

/// Rank a folded name against a folded, non-empty query.
///
/// Both inputs must already be passed through [`fold`].
pub fn rank(query: &str, name: &str) -> Option<Rank> {
    if query.is_empty() {
        return None;
    }
    if name == query {
        return Some(Rank::tier(MatchTier::Equal));
    }
    if name.starts_with(query) {
        return Some(Rank::tier(MatchTier::Prefix));
    }

    let mut contains = false;
    for (i, _) in name.match_indices(query) {
        contains = true;
        let at_word_start = name[..i]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_alphanumeric());
        if at_word_start {
            return Some(Rank::tier(MatchTier::WordPrefix));
        }
    }
    if contains {
        return Some(Rank::tier(MatchTier::Contains));
    }

    if acronym(name).starts_with(query) {
        return Some(Rank::tier(MatchTier::Acronym));
    }

    subsequence_closeness(query, name).map(|closeness| Rank {
        tier: MatchTier::Subsequence,
        closeness,
    })
}

/// First character of every alphanumeric word.
fn acronym(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Query length over the span of name characters needed to match it in
/// order, or `None` if the query is not a subsequence of the name.
fn subsequence_closeness(query: &str, name: &str) -> Option<f64> {
    let mut wanted = query.chars().peekable();
    let mut first = None;
    let mut last = 0;

    for (i, c) in name.chars().enumerate() {
        let Some(&next) = wanted.peek() else { break };
        if c == next {
            first.get_or_insert(i);
            last = i;
            wanted.next();
        }
    }

    if wanted.peek().is_some() {
        return None;
    }
    let span = last - first? + 1;
    Some(query.chars().count() as f64 / span as f64)
}

/// Rank `candidates` (station, folded name) against a raw query.
fn ranked<'s, 'n>(
    query: &str,
    candidates: impl Iterator<Item = (&'s Station, &'n str)>,
    cap: usize,
) -> Vec<&'s Station> {
    let query = fold(query.trim());

    if query.is_empty() {
        return candidates.map(|(station, _)| station).take(cap).collect();
    }

    let mut matches: Vec<(Rank, &Station)> = candidates
        .filter_map(|(station, name)| rank(&query, name).map(|r| (r, station)))
        .collect();

    // Stable: equal ranks keep input order
    matches.sort_by(|(a, _), (b, _)| a.cmp_desc(b));
    matches.truncate(cap);
    matches.into_iter().map(|(_, station)| station).collect()
}

/// Match a query against a station list, returning at most
/// [`DEFAULT_RESULT_CAP`] stations, best first.
///
/// An empty (or blank) query returns the leading stations in their input
/// order.
///
/// # Examples
///
/// ```
/// use station_board::domain::Station;
/// use station_board::search::match_stations;
///
/// let stations = vec![Station::new("A", "Central"), Station::new("B", "Eastside")];
/// let found = match_stations("cent", &stations);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id.as_str(), "A");
/// ```
pub fn match_stations<'s>(query: &str, stations: &'s [Station]) -> Vec<&'s Station> {
    let folded: Vec<String> = stations.iter().map(|s| fold(&s.name)).collect();
    ranked(
        query,
        stations.iter().zip(folded.iter().map(String::as_str)),
        DEFAULT_RESULT_CAP,
    )
}

/// A station list with names folded once, for repeated searching.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    stations: Vec<Station>,
    folded: Vec<String>,
}

impl StationIndex {
    pub fn new(stations: Vec<Station>) -> Self {
        let folded = stations.iter().map(|s| fold(&s.name)).collect();
        Self { stations, folded }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Search the index, returning at most `cap` stations, best first.
    pub fn search(&self, query: &str, cap: usize) -> Vec<&Station> {
        ranked(
            query,
            self.stations
                .iter()
                .zip(self.folded.iter().map(String::as_str)),
            cap,
        )
    }
}
