//! Consolidate individual rankings into one group order.
//!
//! Aggregation is a positional (Borda-style) sum: the attraction at
//! zero-based position `p` in a member's list earns `p + 1` points, and the
//! catalog is then sorted ascending by total. Lower totals mean the group
//! ranked the attraction earlier on average. The sort is stable, so ties
//! keep catalog declaration order.
//!
//! Attractions missing from a member's list are handled by
//! [`AbsencePolicy`]. The default, [`AbsencePolicy::Neutral`], adds nothing,
//! which means an attraction nobody ranked scores `0` and sorts first.

use std::collections::HashMap;

use crate::{Attraction, AttractionId, Catalog, UserName, UserRanking};

/// Aggregate score; lower is better.
pub type Score = u64;

/// How an attraction absent from a member's ranking is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsencePolicy {
    /// Absent attractions earn nothing from that member.
    #[default]
    Neutral,
    /// Absent attractions earn `catalog.len() + 1`, ranking them below
    /// every listed attraction.
    Penalised,
}

impl std::str::FromStr for AbsencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "penalised" | "penalized" => Ok(Self::Penalised),
            _ => Err(format!("unknown absence policy '{s}'")),
        }
    }
}

/// Members who placed an attraction first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopPick {
    /// Voter names in submission order.
    pub voters: Vec<UserName>,
}

impl TopPick {
    /// Number of members who ranked the attraction first.
    #[must_use]
    pub fn count(&self) -> usize {
        self.voters.len()
    }
}

/// One line of the consolidated ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedAttraction {
    /// The ranked catalog entry.
    pub attraction: Attraction,
    /// Sum of positional points across all rankings.
    pub score: Score,
    /// Members who placed this attraction first.
    pub top_pick: TopPick,
}

/// Group order over every catalog attraction, most preferred first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedRanking {
    entries: Vec<RankedAttraction>,
    ballots: usize,
}

impl ConsolidatedRanking {
    /// Entries in consolidated order.
    #[must_use]
    pub fn entries(&self) -> &[RankedAttraction] {
        &self.entries
    }

    /// Number of rankings that went into the result.
    #[must_use]
    pub const fn ballots(&self) -> usize {
        self.ballots
    }

    /// The best `k` entries, or all entries when fewer exist.
    #[must_use]
    pub fn top(&self, k: usize) -> &[RankedAttraction] {
        self.entries.get(..k).unwrap_or(&self.entries)
    }

    /// The best `k` attractions, cloned for handing to the planner.
    #[must_use]
    pub fn top_attractions(&self, k: usize) -> Vec<Attraction> {
        self.top(k)
            .iter()
            .map(|entry| entry.attraction.clone())
            .collect()
    }

    /// Identifiers in consolidated order.
    #[must_use]
    pub fn ids(&self) -> Vec<AttractionId> {
        self.entries
            .iter()
            .map(|entry| entry.attraction.id.clone())
            .collect()
    }

    /// Zero-based consolidated position of `id`.
    #[must_use]
    pub fn position_of(&self, id: &AttractionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.attraction.id == id)
    }

    /// Top-pick statistics for `id`.
    #[must_use]
    pub fn top_pick(&self, id: &AttractionId) -> Option<&TopPick> {
        self.entries
            .iter()
            .find(|entry| &entry.attraction.id == id)
            .map(|entry| &entry.top_pick)
    }

    /// Number of entries; equals the catalog size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Positional-sum rank aggregator.
///
/// The aggregator is stateless apart from its policy; every call recomputes
/// the full order from the rankings it is given.
///
/// # Examples
/// ```
/// use ridevote_core::{AttractionId, Catalog, RankAggregator, UserName, UserRanking};
///
/// let catalog = Catalog::builtin();
/// let thunder = AttractionId::new("dlp_2")?;
/// let vote = UserRanking::new(UserName::new("Izza")?, vec![thunder.clone()], 0)?;
/// let result = RankAggregator::default().aggregate(&catalog, &[vote]);
///
/// assert_eq!(result.len(), catalog.len());
/// assert_eq!(result.top_pick(&thunder).map(|pick| pick.count()), Some(1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankAggregator {
    policy: AbsencePolicy,
}

impl RankAggregator {
    /// Build an aggregator with an explicit absence policy.
    #[must_use]
    pub const fn new(policy: AbsencePolicy) -> Self {
        Self { policy }
    }

    /// The configured absence policy.
    #[must_use]
    pub const fn policy(&self) -> AbsencePolicy {
        self.policy
    }

    /// Aggregate `rankings` over `catalog`.
    ///
    /// Ids outside the catalog are skipped but still occupy their position
    /// in the member's list. With no rankings the result is the catalog in
    /// declaration order with every score at zero.
    #[must_use]
    pub fn aggregate(&self, catalog: &Catalog, rankings: &[UserRanking]) -> ConsolidatedRanking {
        let mut scores: HashMap<&AttractionId, Score> =
            catalog.iter().map(|attraction| (&attraction.id, 0)).collect();
        let mut top_picks: HashMap<&AttractionId, TopPick> = HashMap::new();
        let penalty = to_score(catalog.len().saturating_add(1));

        for ranking in rankings {
            self.accumulate(catalog, ranking, penalty, &mut scores);
            if let Some(first) = ranking.first_choice().filter(|id| catalog.contains(id)) {
                top_picks
                    .entry(first)
                    .or_default()
                    .voters
                    .push(ranking.user_name().clone());
            }
        }

        let mut entries: Vec<RankedAttraction> = catalog
            .iter()
            .map(|attraction| RankedAttraction {
                score: scores.get(&attraction.id).copied().unwrap_or_default(),
                top_pick: top_picks.remove(&attraction.id).unwrap_or_default(),
                attraction: attraction.clone(),
            })
            .collect();
        entries.sort_by_key(|entry| entry.score);

        ConsolidatedRanking {
            entries,
            ballots: rankings.len(),
        }
    }

    fn accumulate(
        &self,
        catalog: &Catalog,
        ranking: &UserRanking,
        penalty: Score,
        scores: &mut HashMap<&AttractionId, Score>,
    ) {
        for (position, id) in ranking.attraction_ids().iter().enumerate() {
            match scores.get_mut(id) {
                Some(total) => *total = total.saturating_add(to_score(position + 1)),
                None => log::debug!(
                    "skipping attraction {id} ranked by {} but absent from the catalog",
                    ranking.user_name()
                ),
            }
        }

        if self.policy == AbsencePolicy::Penalised {
            for attraction in catalog {
                if ranking.rank_of(&attraction.id).is_none()
                    && let Some(total) = scores.get_mut(&attraction.id)
                {
                    *total = total.saturating_add(penalty);
                }
            }
        }
    }
}

fn to_score(points: usize) -> Score {
    Score::try_from(points).unwrap_or(Score::MAX)
}
