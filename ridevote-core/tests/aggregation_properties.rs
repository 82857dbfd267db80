//! Property tests for rank aggregation.

use proptest::prelude::*;
use proptest::sample::subsequence;
use ridevote_core::test_support::{catalog_of, ids};
use ridevote_core::{AbsencePolicy, RankAggregator, UserName, UserRanking};

const CATALOG: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn rankings() -> impl Strategy<Value = Vec<UserRanking>> {
    prop::collection::vec(
        subsequence(CATALOG.to_vec(), 0..=CATALOG.len()).prop_shuffle(),
        0..6,
    )
    .prop_map(|orders| {
        orders
            .into_iter()
            .enumerate()
            .filter_map(|(index, order)| {
                let user = UserName::new(format!("user{index}")).ok()?;
                UserRanking::new(user, ids(&order), 0).ok()
            })
            .collect()
    })
}

fn policies() -> impl Strategy<Value = AbsencePolicy> {
    prop_oneof![Just(AbsencePolicy::Neutral), Just(AbsencePolicy::Penalised)]
}

proptest! {
    #[test]
    fn aggregation_is_deterministic(votes in rankings(), policy in policies()) {
        let catalog = catalog_of(&CATALOG);
        let aggregator = RankAggregator::new(policy);
        prop_assert_eq!(
            aggregator.aggregate(&catalog, &votes),
            aggregator.aggregate(&catalog, &votes)
        );
    }

    #[test]
    fn output_is_a_sorted_permutation_of_the_catalog(
        votes in rankings(),
        policy in policies(),
    ) {
        let catalog = catalog_of(&CATALOG);
        let result = RankAggregator::new(policy).aggregate(&catalog, &votes);

        let mut seen = result.ids();
        seen.sort();
        let mut expected = catalog.ids();
        expected.sort();
        prop_assert_eq!(seen, expected);

        let scores: Vec<_> = result.entries().iter().map(|entry| entry.score).collect();
        prop_assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn equal_scores_keep_catalog_order(votes in rankings()) {
        let catalog = catalog_of(&CATALOG);
        let result = RankAggregator::default().aggregate(&catalog, &votes);
        for pair in result.entries().windows(2) {
            if pair[0].score == pair[1].score {
                prop_assert!(
                    catalog.position(&pair[0].attraction.id) < catalog.position(&pair[1].attraction.id)
                );
            }
        }
    }

    #[test]
    fn top_pick_counts_match_ballots(votes in rankings()) {
        let catalog = catalog_of(&CATALOG);
        let result = RankAggregator::default().aggregate(&catalog, &votes);
        let picks: usize = result.entries().iter().map(|entry| entry.top_pick.count()).sum();
        let non_empty = votes.iter().filter(|vote| vote.first_choice().is_some()).count();
        prop_assert_eq!(picks, non_empty);
    }
}
