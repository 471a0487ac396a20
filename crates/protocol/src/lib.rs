use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod snapshot;

pub use snapshot::Snapshot;

/// Identifier of a taxonomy group (leaf or top-level).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GroupId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One value per risk axis (K, V, P).
///
/// Axes are ordinal scores, normally 0..=4. Values that are not strictly
/// positive count as "not scored" when rolled up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ScoreTriple {
    pub k: i64,
    pub v: i64,
    pub p: i64,
}

impl ScoreTriple {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(k: i64, v: i64, p: i64) -> Self {
        Self { k, v, p }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<(i64, i64, i64)> for ScoreTriple {
    fn from((k, v, p): (i64, i64, i64)) -> Self {
        Self::new(k, v, p)
    }
}

/// Taxonomy record as stored by the group catalogue.
///
/// Leaf groups point at their top-level group through `parent`; top-level
/// records leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LeafGroup {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: Option<GroupId>,
}

impl LeafGroup {
    pub fn new(id: u64, name: impl Into<String>, parent: Option<GroupId>) -> Self {
        Self {
            id: GroupId(id),
            name: name.into(),
            parent,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// Top-level taxonomy category aggregating its leaf groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TopLevelGroup {
    pub id: GroupId,
    pub name: String,
}

/// A scored entry tagged with the leaf group it assesses.
///
/// Missing or `null` axes deserialize to `None` and score as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormEntry {
    pub group: GroupId,
    #[serde(default)]
    pub k: Option<i64>,
    #[serde(default)]
    pub v: Option<i64>,
    #[serde(default)]
    pub p: Option<i64>,
}

impl FormEntry {
    pub fn new(group: u64, (k, v, p): (i64, i64, i64)) -> Self {
        Self {
            group: GroupId(group),
            k: Some(k),
            v: Some(v),
            p: Some(p),
        }
    }

    pub fn score(&self) -> ScoreTriple {
        ScoreTriple::new(
            self.k.unwrap_or_default(),
            self.v.unwrap_or_default(),
            self.p.unwrap_or_default(),
        )
    }
}

/// Named collection of scored entries inside a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormItem {
    pub name: String,
    #[serde(rename = "items", default)]
    pub entries: Vec<FormEntry>,
}

impl FormItem {
    pub fn new(name: impl Into<String>, entries: Vec<FormEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Form {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub items: Vec<FormItem>,
}

impl Form {
    pub fn new(id: u64, name: impl Into<String>, items: Vec<FormItem>) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            items,
        }
    }
}

/// Rolled-up scores of one form item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub name: String,
    pub by_group: BTreeMap<GroupId, ScoreTriple>,
    pub global: ScoreTriple,
}

/// Stats of a whole form: per item, per group across items, and form-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    pub by_item: Vec<ItemStats>,
    pub by_group: BTreeMap<GroupId, ScoreTriple>,
    pub global: ScoreTriple,
}

impl StatsResult {
    pub fn group(&self, id: u64) -> Option<ScoreTriple> {
        self.by_group.get(&GroupId(id)).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Input,
    Output,
}

pub fn schema_json(kind: SchemaKind) -> Result<String> {
    let schema = match kind {
        SchemaKind::Input => schemars::schema_for!(Snapshot),
        SchemaKind::Output => schemars::schema_for!(StatsResult),
    };
    serde_json::to_string_pretty(&schema).map_err(Into::into)
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry_reads_stored_payload_shape() {
        let entry: FormEntry =
            serde_json::from_str(r#"{"group": 11, "k": 2, "v": 1, "p": 0}"#).unwrap();
        assert_eq!(entry.group, GroupId(11));
        assert_eq!(entry.score(), ScoreTriple::new(2, 1, 0));
    }

    #[test]
    fn missing_or_null_axes_score_as_zero() {
        let entry: FormEntry = serde_json::from_str(r#"{"group": 3, "k": null, "p": 4}"#).unwrap();
        assert_eq!(entry.score(), ScoreTriple::new(0, 0, 4));
    }

    #[test]
    fn item_entries_live_under_items_key() {
        let item: FormItem = serde_json::from_str(
            r#"{"name": "Entry", "items": [{"group": 1, "k": 1, "v": 1, "p": 1}]}"#,
        )
        .unwrap();
        assert_eq!(item.entries.len(), 1);
        assert_eq!(item.name, "Entry");
    }

    #[test]
    fn stats_result_uses_camel_case_and_sorted_group_keys() {
        let mut by_group = BTreeMap::new();
        by_group.insert(GroupId(12), ScoreTriple::new(1, 0, 0));
        by_group.insert(GroupId(3), ScoreTriple::new(2, 2, 2));
        let stats = StatsResult {
            by_item: vec![ItemStats {
                name: "Entry".to_string(),
                by_group: by_group.clone(),
                global: ScoreTriple::new(1, 2, 2),
            }],
            by_group,
            global: ScoreTriple::new(1, 2, 2),
        };

        let json = serialize_json(&stats).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"byItem":[{"name":"Entry","byGroup":{"3":{"k":2,"v":2,"p":2},"12":{"k":1,"v":0,"p":0}},"global":{"k":1,"v":2,"p":2}}],"#,
                r#""byGroup":{"3":{"k":2,"v":2,"p":2},"12":{"k":1,"v":0,"p":0}},"global":{"k":1,"v":2,"p":2}}"#
            )
        );
    }

    #[test]
    fn schemas_name_their_root_types() {
        let input = schema_json(SchemaKind::Input).unwrap();
        let output = schema_json(SchemaKind::Output).unwrap();
        assert!(input.contains("Snapshot"), "input schema: {input}");
        assert!(output.contains("StatsResult"), "output schema: {output}");
    }
}
