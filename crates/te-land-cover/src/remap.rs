//! GEE-format remap tables: two parallel lists, `from` and `to`, consumed
//! positionally by the raster remapping engine.

use serde::{Deserialize, Serialize};
use te_core::ValidationError;

/// Parallel `(from, to)` code lists. Serialized as `[[from...], [to...]]`.
///
/// Entry order is part of the contract: consumers pair values by position,
/// not by key. Both lists always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(Vec<i32>, Vec<i32>)", into = "(Vec<i32>, Vec<i32>)")]
pub struct RemapTable {
    from: Vec<i32>,
    to: Vec<i32>,
}

impl RemapTable {
    /// An empty table with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            from: Vec::with_capacity(capacity),
            to: Vec::with_capacity(capacity),
        }
    }

    /// Append one pair.
    pub fn push(&mut self, from: i32, to: i32) {
        self.from.push(from);
        self.to.push(to);
    }

    /// Source values.
    pub fn from_values(&self) -> &[i32] {
        &self.from
    }

    /// Target values, positionally paired with [`from_values`](Self::from_values).
    pub fn to_values(&self) -> &[i32] {
        &self.to
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.from.len()
    }

    /// True if the table has no pairs.
    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    /// Pairs in positional order.
    pub fn pairs(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.from.iter().copied().zip(self.to.iter().copied())
    }
}

impl TryFrom<(Vec<i32>, Vec<i32>)> for RemapTable {
    type Error = ValidationError;

    fn try_from((from, to): (Vec<i32>, Vec<i32>)) -> Result<Self, Self::Error> {
        if from.len() != to.len() {
            return Err(ValidationError::RemapLengthMismatch {
                from: from.len(),
                to: to.len(),
            });
        }
        Ok(Self { from, to })
    }
}

impl From<RemapTable> for (Vec<i32>, Vec<i32>) {
    fn from(table: RemapTable) -> Self {
        (table.from, table.to)
    }
}
