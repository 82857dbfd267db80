//! Editable ranking order, built up before a member submits.

use crate::{AttractionId, Catalog};

use super::{RankingError, UserName, UserRanking};

/// Work-in-progress ordering of attraction ids.
///
/// Edits never introduce duplicates. Moves addressing positions outside
/// the list leave it unchanged.
///
/// # Examples
/// ```
/// use ridevote_core::{AttractionId, Catalog, RankingDraft};
///
/// let catalog = Catalog::builtin();
/// let mut draft = RankingDraft::from_catalog(&catalog);
/// let dumbo = AttractionId::new("dlp_8")?;
/// draft.bubble_to_top(&dumbo);
/// assert_eq!(draft.ids().first(), Some(&dumbo));
/// # Ok::<(), ridevote_core::AttractionError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingDraft {
    order: Vec<AttractionId>,
}

impl RankingDraft {
    /// Start from catalog declaration order.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            order: catalog.ids(),
        }
    }

    /// Resume editing a previously submitted ranking.
    #[must_use]
    pub fn from_ranking(ranking: &UserRanking) -> Self {
        Self {
            order: ranking.attraction_ids().to_vec(),
        }
    }

    /// Current order, most preferred first.
    #[must_use]
    pub fn ids(&self) -> &[AttractionId] {
        &self.order
    }

    /// Swap the item at `index` with its predecessor.
    pub fn move_up(&mut self, index: usize) {
        if index == 0 || index >= self.order.len() {
            return;
        }
        self.order.swap(index - 1, index);
    }

    /// Swap the item at `index` with its successor.
    pub fn move_down(&mut self, index: usize) {
        if index.saturating_add(1) >= self.order.len() {
            return;
        }
        self.order.swap(index, index + 1);
    }

    /// Remove the item at `from` and reinsert it at `to`, as a drag does.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from == to || from >= self.order.len() || to >= self.order.len() {
            return;
        }
        let item = self.order.remove(from);
        self.order.insert(to, item);
    }

    /// Move `id` to the front. Unknown ids are ignored.
    pub fn bubble_to_top(&mut self, id: &AttractionId) {
        if let Some(index) = self.index_of(id) {
            self.move_item(index, 0);
        }
    }

    /// Append `id` when it is not ranked yet. Returns whether it was added.
    pub fn add(&mut self, id: AttractionId) -> bool {
        if self.index_of(&id).is_some() {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Drop `id` from the order. Returns whether it was present.
    pub fn remove(&mut self, id: &AttractionId) -> bool {
        self.index_of(id).is_some_and(|index| {
            self.order.remove(index);
            true
        })
    }

    /// Turn the draft into a submitted ranking.
    ///
    /// # Errors
    /// Returns a [`RankingError`] unless the draft lists every catalog id
    /// exactly once.
    pub fn submit(
        &self,
        user_name: UserName,
        catalog: &Catalog,
        updated_at_ms: u64,
    ) -> Result<UserRanking, RankingError> {
        let ranking = UserRanking::new(user_name, self.order.clone(), updated_at_ms)?;
        ranking.ensure_complete(catalog)?;
        Ok(ranking)
    }

    fn index_of(&self, id: &AttractionId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_of, ids};
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> RankingDraft {
        RankingDraft::from_catalog(&catalog_of(&["a", "b", "c", "d"]))
    }

    fn order(draft: &RankingDraft) -> Vec<String> {
        draft.ids().iter().map(ToString::to_string).collect()
    }

    #[rstest]
    fn starts_in_catalog_order(draft: RankingDraft) {
        assert_eq!(order(&draft), ["a", "b", "c", "d"]);
    }

    #[rstest]
    #[case(2, ["a", "c", "b", "d"])]
    #[case(0, ["a", "b", "c", "d"])]
    #[case(9, ["a", "b", "c", "d"])]
    fn move_up_swaps_with_predecessor(
        mut draft: RankingDraft,
        #[case] index: usize,
        #[case] expected: [&str; 4],
    ) {
        draft.move_up(index);
        assert_eq!(order(&draft), expected);
    }

    #[rstest]
    #[case(1, ["a", "c", "b", "d"])]
    #[case(3, ["a", "b", "c", "d"])]
    #[case(usize::MAX, ["a", "b", "c", "d"])]
    fn move_down_swaps_with_successor(
        mut draft: RankingDraft,
        #[case] index: usize,
        #[case] expected: [&str; 4],
    ) {
        draft.move_down(index);
        assert_eq!(order(&draft), expected);
    }

    #[rstest]
    #[case(0, 3, ["b", "c", "d", "a"])]
    #[case(3, 1, ["a", "d", "b", "c"])]
    #[case(1, 7, ["a", "b", "c", "d"])]
    fn drag_reinserts_item(
        mut draft: RankingDraft,
        #[case] from: usize,
        #[case] to: usize,
        #[case] expected: [&str; 4],
    ) {
        draft.move_item(from, to);
        assert_eq!(order(&draft), expected);
    }

    #[rstest]
    fn bubble_to_top_moves_item_first(mut draft: RankingDraft) {
        draft.bubble_to_top(&ids(&["c"])[0]);
        assert_eq!(order(&draft), ["c", "a", "b", "d"]);
    }

    #[rstest]
    fn add_and_remove_keep_ids_unique(mut draft: RankingDraft) {
        let b = ids(&["b"]).remove(0);
        assert!(draft.remove(&b));
        assert!(!draft.remove(&b));
        assert!(draft.add(b.clone()));
        assert!(!draft.add(b));
        assert_eq!(order(&draft), ["a", "c", "d", "b"]);
    }

    #[rstest]
    fn submit_requires_complete_ranking(mut draft: RankingDraft) {
        let catalog = catalog_of(&["a", "b", "c", "d"]);
        let leo = UserName::new("Leo").expect("valid name");
        draft.remove(&ids(&["d"])[0]);
        let err = draft
            .submit(leo.clone(), &catalog, 1)
            .expect_err("incomplete");
        assert!(matches!(err, RankingError::Incomplete { .. }));

        draft.add(ids(&["d"]).remove(0));
        let ranking = draft.submit(leo, &catalog, 1).expect("complete");
        assert_eq!(ranking.attraction_ids(), draft.ids());
    }
}
