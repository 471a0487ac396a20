use serde::{Deserialize, Serialize};

/// Execution settings of the aggregator. None of them changes the numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Build item stats on the rayon pool instead of the calling thread
    pub parallel_items: bool,

    /// Forms with fewer items stay sequential even when `parallel_items` is set
    pub min_parallel_items: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            parallel_items: false,
            min_parallel_items: 16,
        }
    }
}

impl AggregatorConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Fan out across items for large forms
    pub fn parallel() -> Self {
        Self {
            parallel_items: true,
            ..Default::default()
        }
    }

    /// Whether a form with `items` items takes the parallel path
    pub fn runs_parallel(&self, items: usize) -> bool {
        self.parallel_items && items >= self.min_parallel_items
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_parallel_items == 0 {
            return Err("min_parallel_items must be > 0".to_string());
        }

        Ok(())
    }
}
