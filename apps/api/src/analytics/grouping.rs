use std::collections::HashMap;

use serde::Serialize;

/// One row of a grouped count. Serialized as `{"_id": key, "count": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: u64,
}

impl GroupCount {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Adds up `(key, count)` rows per key. Rows come pre-counted from the store,
/// and bucketing may map several rows onto one key.
///
/// Result is ordered by count descending, ties broken by key ascending, so the
/// output is deterministic regardless of row order.
pub fn sum_by<I, K>(rows: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = (K, u64)>,
    K: Into<String>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for (key, count) in rows {
        *counts.entry(key.into()).or_insert(0) += count;
    }
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount::new(key, count))
        .collect();
    sort_groups(&mut groups);
    groups
}

fn sort_groups(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

pub fn top_n(mut groups: Vec<GroupCount>, n: usize) -> Vec<GroupCount> {
    groups.truncate(n);
    groups
}

/// Count for `key`, or 0 when the group is absent.
pub fn count_of(groups: &[GroupCount], key: &str) -> u64 {
    groups
        .iter()
        .find(|g| g.key == key)
        .map_or(0, |g| g.count)
}
