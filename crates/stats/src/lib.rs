//! # Risk Stats
//!
//! Rolls up K/V/P risk scores of a form across a two-level group taxonomy.
//!
//! ## Reduction rule
//!
//! Every roll-up takes, per axis, the **minimum of the strictly positive
//! values**. An axis with no positive value rolls up to zero.
//!
//! ## Architecture
//!
//! ```text
//! Form + LeafGroup[]
//!     │
//!     ├──> TaxonomyIndex (leaf groups indexed by parent, sorted by name)
//!     │
//!     ├──> ItemStatsBuilder (once per item)
//!     │      ├─ Per leaf group referenced by the item's entries
//!     │      ├─ Per top-level group (over referenced children)
//!     │      └─ Item global (over leaf and top-level values)
//!     │
//!     └──> FormStatsAggregator
//!            ├─ Per group across items (items without the group skipped)
//!            └─ Form global
//! ```
//!
//! ## Example
//!
//! ```rust
//! use risk_protocol::{Form, FormEntry, FormItem, GroupId, LeafGroup, ScoreTriple};
//! use risk_stats::{FormStatsAggregator, TaxonomyIndex};
//!
//! let groups = vec![
//!     LeafGroup::new(1, "T1", None),
//!     LeafGroup::new(11, "L1", Some(GroupId(1))),
//!     LeafGroup::new(12, "L2", Some(GroupId(1))),
//! ];
//! let form = Form::new(
//!     7,
//!     "Registry",
//!     vec![FormItem::new(
//!         "Entry",
//!         vec![FormEntry::new(11, (2, 1, 0)), FormEntry::new(12, (4, 0, 3))],
//!     )],
//! );
//!
//! let index = TaxonomyIndex::build(&groups);
//! let stats = FormStatsAggregator::default().aggregate(&form, &index);
//! assert_eq!(stats.by_item[0].by_group[&GroupId(1)], ScoreTriple::new(2, 1, 3));
//! ```

mod aggregator;
mod config;
mod error;
mod item;
mod reducer;
mod taxonomy;

pub use aggregator::{aggregate, FormStatsAggregator};
pub use config::AggregatorConfig;
pub use error::{Result, StatsError};
pub use item::ItemStatsBuilder;
pub use reducer::ScoreReducer;
pub use taxonomy::TaxonomyIndex;
