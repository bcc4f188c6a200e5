use crate::core::participation::rounded_share;
use crate::domain::model::{DomainHhi, ParticipationRow};
use std::collections::BTreeMap;

pub const MONOPOLY_HHI: i64 = 10_000;

/// HHI of one domain from raw supplier counts.
///
/// Each share is recomputed from the counts and rounded before squaring;
/// `ParticipationRow::share_percent` is never reused. No counts yields 0.
pub fn domain_hhi(counts: &[u64]) -> i64 {
    let total: u64 = counts.iter().sum();
    counts
        .iter()
        .map(|&count| {
            let participation = rounded_share(count, total);
            participation * participation
        })
        .sum()
}

/// One HHI per domain key, sorted by domain key.
pub fn compute_hhi(rows: &[ParticipationRow]) -> Vec<DomainHhi> {
    let mut groups: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.domain_key.as_str()).or_default().push(row.count);
    }

    groups
        .into_iter()
        .map(|(domain_key, counts)| DomainHhi {
            domain_key: domain_key.to_string(),
            hhi: domain_hhi(&counts),
        })
        .collect()
}
