use crate::reducer::ScoreReducer;
use crate::taxonomy::TaxonomyIndex;
use risk_protocol::{FormItem, GroupId, ItemStats, ScoreTriple};
use std::collections::BTreeMap;

/// Computes the stats of one form item against a taxonomy.
pub struct ItemStatsBuilder<'a> {
    index: &'a TaxonomyIndex,
}

impl<'a> ItemStatsBuilder<'a> {
    pub fn new(index: &'a TaxonomyIndex) -> Self {
        Self { index }
    }

    /// Build stats for `item`.
    ///
    /// `by_group` holds one value per leaf group referenced by the entries
    /// and one per top-level group of the taxonomy, referenced or not. The
    /// item global is reduced over both kinds together.
    pub fn build(&self, item: &FormItem) -> ItemStats {
        // Phase 1: leaf values straight from the entries (later entries win)
        let mut leaves: BTreeMap<GroupId, ScoreTriple> = BTreeMap::new();
        for entry in &item.entries {
            leaves.insert(entry.group, ScoreReducer::reduce_one(&entry.score()));
        }

        // Phase 2: top-level roll-up over the children this item references
        let mut by_group = leaves.clone();
        for top in self.index.top_level_ids() {
            let children = self
                .index
                .children_of(top)
                .iter()
                .filter_map(|child| leaves.get(&child.id));
            by_group.insert(top, ScoreReducer::reduce(children));
        }

        let global = ScoreReducer::reduce(by_group.values());

        ItemStats {
            name: item.name.clone(),
            by_group,
            global,
        }
    }
}
