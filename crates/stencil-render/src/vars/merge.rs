//! Merging variable sets by priority.

use super::set::VariableSet;

/// Combines `sets` into one, earliest lowest priority.
///
/// For every key the value from the last set that has it wins. The merge is
/// shallow: a nested mapping present in two sets is replaced, never combined.
pub fn merge<I>(sets: I) -> VariableSet
where
    I: IntoIterator<Item = VariableSet>,
{
    let mut merged = VariableSet::new();
    for set in sets {
        merged.extend(set);
    }
    merged
}
