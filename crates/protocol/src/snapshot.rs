use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Form, LeafGroup};

/// Forms plus the taxonomy they were scored against, as read in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub groups: Vec<LeafGroup>,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid snapshot JSON")
    }

    pub fn form(&self, id: u64) -> Option<&Form> {
        self.forms.iter().find(|form| form.id == id)
    }

    /// The only form of the snapshot, if there is exactly one.
    pub fn single_form(&self) -> Option<&Form> {
        match self.forms.as_slice() {
            [form] => Some(form),
            _ => None,
        }
    }
}
