use risk_protocol::{Form, GroupId, LeafGroup, TopLevelGroup};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Leaf groups indexed by their top-level parent.
///
/// Built once per aggregation from the flat group list. Top-level ids are
/// the distinct parents seen on leaf groups; a parentless record that no
/// leaf points at is not treated as a top-level group.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    /// Group id -> record
    groups: HashMap<GroupId, LeafGroup>,

    /// Top-level id -> children sorted by display name, then id
    children: BTreeMap<GroupId, Vec<LeafGroup>>,
}

impl TaxonomyIndex {
    pub fn build(groups: &[LeafGroup]) -> Self {
        let mut by_id: HashMap<GroupId, LeafGroup> = HashMap::with_capacity(groups.len());
        for group in groups {
            if by_id.insert(group.id, group.clone()).is_some() {
                log::warn!("Duplicate taxonomy group {}, keeping the last record", group.id);
            }
        }

        let mut children: BTreeMap<GroupId, Vec<LeafGroup>> = BTreeMap::new();
        for group in by_id.values() {
            if let Some(parent) = group.parent {
                children.entry(parent).or_default().push(group.clone());
            }
        }
        for leaves in children.values_mut() {
            leaves.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }

        for parent in children.keys() {
            if !by_id.contains_key(parent) {
                log::warn!("Taxonomy parent {} has no group record", parent);
            }
        }

        log::debug!(
            "Built taxonomy index: {} groups, {} top-level",
            by_id.len(),
            children.len()
        );

        Self {
            groups: by_id,
            children,
        }
    }

    /// Leaf groups whose parent is `id`, sorted by name
    pub fn children_of(&self, id: GroupId) -> &[LeafGroup] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct parent ids, ascending
    pub fn top_level_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.children.keys().copied()
    }

    /// Top-level groups with display names, falling back to the id when the
    /// parent record is missing from the snapshot
    pub fn top_level_groups(&self) -> Vec<TopLevelGroup> {
        self.top_level_ids()
            .map(|id| TopLevelGroup {
                id,
                name: self
                    .groups
                    .get(&id)
                    .map(|group| group.name.clone())
                    .unwrap_or_else(|| id.to_string()),
            })
            .collect()
    }

    pub fn parent_of(&self, id: GroupId) -> Option<GroupId> {
        self.groups.get(&id).and_then(|group| group.parent)
    }

    pub fn get(&self, id: GroupId) -> Option<&LeafGroup> {
        self.groups.get(&id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Entry group ids of `form` that the taxonomy does not know, ascending
    pub fn unknown_groups(&self, form: &Form) -> Vec<GroupId> {
        form.items
            .iter()
            .flat_map(|item| item.entries.iter())
            .map(|entry| entry.group)
            .filter(|id| !self.contains(*id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
