use crate::core::domain_key;
use crate::domain::model::{ParticipationRow, Record};
use std::collections::BTreeMap;

/// Integer percentage of `count` over `total`, rounded half to even.
///
/// Division happens before scaling by 100, so a tie such as 1/8 lands on
/// exactly 12.5 and rounds to 12.
pub fn rounded_share(count: u64, total: u64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round_ties_even() as i64
}

/// Counts records per (domain, supplier) and each supplier's share of its domain.
///
/// Output is sorted by `(domain_key, supplier_id)`.
pub fn aggregate<'a, I>(records: I, digits: usize) -> Vec<ParticipationRow>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for record in records {
        let key = domain_key::extract(&record.product_code, digits);
        *counts.entry((key, record.supplier_id.clone())).or_default() += 1;
    }

    let mut domain_totals: BTreeMap<&str, u64> = BTreeMap::new();
    for ((domain, _), count) in &counts {
        *domain_totals.entry(domain.as_str()).or_default() += count;
    }

    let rows: Vec<ParticipationRow> = counts
        .iter()
        .map(|((domain, supplier), &count)| {
            let total = domain_totals.get(domain.as_str()).copied().unwrap_or_default();
            ParticipationRow {
                domain_key: domain.clone(),
                supplier_id: supplier.clone(),
                count,
                share_percent: rounded_share(count, total),
            }
        })
        .collect();

    tracing::debug!(
        "Aggregated {} supplier/domain pairs across {} domains",
        rows.len(),
        domain_totals.len()
    );
    rows
}
