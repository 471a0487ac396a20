use crate::config::AggregatorConfig;
use crate::error::{Result, StatsError};
use crate::item::ItemStatsBuilder;
use crate::reducer::ScoreReducer;
use crate::taxonomy::TaxonomyIndex;
use rayon::prelude::*;
use risk_protocol::{Form, GroupId, ItemStats, ScoreTriple, Snapshot, StatsResult};
use std::collections::BTreeMap;

/// Aggregates item stats of a form into per-group and form-wide figures.
///
/// Stateless: each call only reads its inputs, so one aggregator can serve
/// any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct FormStatsAggregator {
    config: AggregatorConfig,
}

impl FormStatsAggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate().map_err(StatsError::invalid_config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Compute the stats of `form` against `index`
    pub fn aggregate(&self, form: &Form, index: &TaxonomyIndex) -> StatsResult {
        let unknown = index.unknown_groups(form);
        if !unknown.is_empty() {
            let ids: Vec<String> = unknown.iter().map(GroupId::to_string).collect();
            log::warn!(
                "Form {} references {} group(s) missing from the taxonomy: {}",
                form.id,
                ids.len(),
                ids.join(", ")
            );
        }

        let by_item = self.build_items(form, index);

        // Items without an entry for a group are skipped, not counted as zero
        let mut per_group: BTreeMap<GroupId, Vec<&ScoreTriple>> = BTreeMap::new();
        for item in &by_item {
            for (id, score) in &item.by_group {
                per_group.entry(*id).or_default().push(score);
            }
        }

        let by_group: BTreeMap<GroupId, ScoreTriple> = per_group
            .into_iter()
            .map(|(id, scores)| (id, ScoreReducer::reduce(scores)))
            .collect();

        let global = ScoreReducer::reduce(by_group.values());

        log::debug!(
            "Aggregated form {}: {} items, {} groups",
            form.id,
            by_item.len(),
            by_group.len()
        );

        StatsResult {
            by_item,
            by_group,
            global,
        }
    }

    /// Pick a form from `snapshot` and aggregate it against the snapshot's
    /// groups. Without `form_id` the snapshot must hold exactly one form.
    pub fn aggregate_snapshot(
        &self,
        snapshot: &Snapshot,
        form_id: Option<u64>,
    ) -> Result<StatsResult> {
        let form = match form_id {
            Some(id) => snapshot.form(id).ok_or(StatsError::FormNotFound(id))?,
            None => snapshot
                .single_form()
                .ok_or(StatsError::AmbiguousForm(snapshot.forms.len()))?,
        };

        let index = TaxonomyIndex::build(&snapshot.groups);
        Ok(self.aggregate(form, &index))
    }

    fn build_items(&self, form: &Form, index: &TaxonomyIndex) -> Vec<ItemStats> {
        let builder = ItemStatsBuilder::new(index);

        if self.config.runs_parallel(form.items.len()) {
            log::debug!("Building {} item stats in parallel", form.items.len());
            form.items.par_iter().map(|item| builder.build(item)).collect()
        } else {
            form.items.iter().map(|item| builder.build(item)).collect()
        }
    }
}

/// Aggregate with the default (sequential) configuration
pub fn aggregate(form: &Form, index: &TaxonomyIndex) -> StatsResult {
    FormStatsAggregator::default().aggregate(form, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use risk_protocol::{FormEntry, FormItem, LeafGroup};

    fn t(k: i64, v: i64, p: i64) -> ScoreTriple {
        ScoreTriple::new(k, v, p)
    }

    fn index() -> TaxonomyIndex {
        TaxonomyIndex::build(&[
            LeafGroup::new(1, "T1", None),
            LeafGroup::new(11, "L1", Some(GroupId(1))),
            LeafGroup::new(12, "L2", Some(GroupId(1))),
        ])
    }

    #[test]
    fn group_missing_from_an_item_does_not_contribute_zero() {
        let form = Form::new(
            1,
            "Registry",
            vec![
                FormItem::new("A", vec![FormEntry::new(11, (1, 2, 0))]),
                FormItem::new("B", vec![FormEntry::new(12, (3, 3, 3))]),
            ],
        );
        let stats = aggregate(&form, &index());

        assert!(!stats.by_item[1].by_group.contains_key(&GroupId(11)));
        assert_eq!(stats.group(11), Some(t(1, 2, 0)));
        assert_eq!(stats.group(12), Some(t(3, 3, 3)));
        assert_eq!(stats.group(1), Some(t(1, 2, 3)));
        assert_eq!(stats.global, t(1, 2, 3));
    }

    #[test]
    fn form_without_items_is_empty() {
        let stats = aggregate(&Form::new(1, "Empty", Vec::new()), &index());
        assert_eq!(stats, StatsResult::default());
    }

    #[test]
    fn rejects_invalid_config() {
        let err = FormStatsAggregator::new(AggregatorConfig {
            parallel_items: true,
            min_parallel_items: 0,
        })
        .unwrap_err();
        assert!(matches!(err, StatsError::InvalidConfig(_)));
    }

    #[test]
    fn snapshot_form_selection() {
        let snapshot = Snapshot {
            forms: vec![
                Form::new(7, "a", vec![FormItem::new("x", vec![FormEntry::new(11, (2, 0, 0))])]),
                Form::new(8, "b", Vec::new()),
            ],
            groups: vec![
                LeafGroup::new(1, "T1", None),
                LeafGroup::new(11, "L1", Some(GroupId(1))),
            ],
        };
        let aggregator = FormStatsAggregator::default();

        let stats = aggregator.aggregate_snapshot(&snapshot, Some(7)).unwrap();
        assert_eq!(stats.group(1), Some(t(2, 0, 0)));

        assert!(matches!(
            aggregator.aggregate_snapshot(&snapshot, Some(9)),
            Err(StatsError::FormNotFound(9))
        ));
        assert!(matches!(
            aggregator.aggregate_snapshot(&snapshot, None),
            Err(StatsError::AmbiguousForm(2))
        ));
    }
}
