use crate::domain::model::{ChartSeries, ComparisonRow, CompetitivenessSummary, DomainHhi, ImprovedDomain};
use std::collections::HashMap;

/// Joins two periods on domain key. Domains present on only one side are dropped.
///
/// `delta = before - after`, so a positive delta means concentration fell and
/// competitiveness increased. Rows come back sorted by delta ascending, then
/// domain key.
pub fn compare(before: &[DomainHhi], after: &[DomainHhi]) -> Vec<ComparisonRow> {
    let after_by_domain: HashMap<&str, i64> = after
        .iter()
        .map(|d| (d.domain_key.as_str(), d.hhi))
        .collect();

    let mut rows: Vec<ComparisonRow> = before
        .iter()
        .filter_map(|b| {
            after_by_domain
                .get(b.domain_key.as_str())
                .map(|&hhi_after| ComparisonRow {
                    domain_key: b.domain_key.clone(),
                    hhi_before: b.hhi,
                    hhi_after,
                    delta: b.hhi - hhi_after,
                })
        })
        .collect();

    let unmatched = (before.len() + after.len()).saturating_sub(2 * rows.len());
    if unmatched > 0 {
        tracing::debug!("{} domain(s) exist in only one period and were not compared", unmatched);
    }

    sort_by_delta(&mut rows);
    rows
}

pub fn sort_by_delta(rows: &mut [ComparisonRow]) {
    rows.sort_by(|a, b| a.delta.cmp(&b.delta).then_with(|| a.domain_key.cmp(&b.domain_key)));
}

pub fn summarize(rows: &[ComparisonRow]) -> CompetitivenessSummary {
    let mut summary = CompetitivenessSummary {
        total_domains: rows.len(),
        improved_count: 0,
        positive_delta_count: 0,
        unchanged_count: 0,
        improved_percent: None,
    };

    for row in rows {
        match row.delta {
            d if d < 0 => summary.improved_count += 1,
            d if d > 0 => summary.positive_delta_count += 1,
            _ => summary.unchanged_count += 1,
        }
    }

    if summary.total_domains > 0 {
        summary.improved_percent =
            Some(summary.improved_count as f64 / summary.total_domains as f64 * 100.0);
    }
    summary
}

/// Percentage drop of the HHI relative to the before period; 0 when it started at 0.
pub fn improvement_percent(row: &ComparisonRow) -> f64 {
    if row.hhi_before > 0 {
        (row.delta as f64 / row.hhi_before as f64 * 100.0).abs()
    } else {
        0.0
    }
}

pub fn chart_series(rows: &[ComparisonRow], top_changes: usize, top_improved: usize) -> ChartSeries {
    let mut by_magnitude: Vec<&ComparisonRow> = rows.iter().collect();
    by_magnitude.sort_by(|a, b| {
        b.delta
            .abs()
            .cmp(&a.delta.abs())
            .then_with(|| a.domain_key.cmp(&b.domain_key))
    });
    let mut changes: Vec<ComparisonRow> =
        by_magnitude.into_iter().take(top_changes).cloned().collect();
    sort_by_delta(&mut changes);

    // Most negative delta first.
    let mut improved: Vec<&ComparisonRow> = rows.iter().filter(|r| r.delta < 0).collect();
    improved.sort_by(|a, b| a.delta.cmp(&b.delta).then_with(|| a.domain_key.cmp(&b.domain_key)));
    let most_improved = improved
        .into_iter()
        .take(top_improved)
        .map(|row| ImprovedDomain {
            row: row.clone(),
            improvement_percent: improvement_percent(row),
        })
        .collect();

    ChartSeries {
        top_changes: changes,
        most_improved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Trend;

    fn hhi(domain: &str, value: i64) -> DomainHhi {
        DomainHhi {
            domain_key: domain.to_string(),
            hhi: value,
        }
    }

    fn cmp_row(domain: &str, before: i64, after: i64) -> ComparisonRow {
        ComparisonRow {
            domain_key: domain.to_string(),
            hhi_before: before,
            hhi_after: after,
            delta: before - after,
        }
    }

    #[test]
    fn test_delta_is_before_minus_after() {
        let rows = compare(&[hhi("1234", 5000)], &[hhi("1234", 3000)]);
        assert_eq!(rows, vec![cmp_row("1234", 5000, 3000)]);
        assert_eq!(rows[0].delta, 2000);
        assert_eq!(rows[0].trend(), Trend::CompetitivenessIncreased);
    }

    #[test]
    fn test_rising_concentration_is_negative_delta() {
        let rows = compare(&[hhi("1234", 2500)], &[hhi("1234", 10000)]);
        assert_eq!(rows[0].delta, -7500);
        assert_eq!(rows[0].trend(), Trend::CompetitivenessDecreased);
    }

    #[test]
    fn test_inner_join_drops_one_sided_domains() {
        let before = vec![hhi("1111", 10000), hhi("2222", 5000)];
        let after = vec![hhi("2222", 5000), hhi("3333", 2000)];

        let rows = compare(&before, &after);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].domain_key, "2222");
        assert_eq!(rows[0].trend(), Trend::Unchanged);
    }

    #[test]
    fn test_empty_side_gives_empty_output() {
        assert!(compare(&[hhi("1111", 10000)], &[]).is_empty());
        assert!(compare(&[], &[hhi("1111", 10000)]).is_empty());
    }

    #[test]
    fn test_rows_sorted_by_delta_ascending() {
        let before = vec![hhi("a", 5000), hhi("b", 1000), hhi("c", 9000)];
        let after = vec![hhi("a", 4000), hhi("b", 3000), hhi("c", 1000)];
        let keys: Vec<String> = compare(&before, &after)
            .into_iter()
            .map(|r| r.domain_key)
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_summary_counts() {
        let rows = vec![
            cmp_row("a", 5000, 3000),
            cmp_row("b", 3000, 5000),
            cmp_row("c", 4000, 4000),
            cmp_row("d", 10000, 2500),
        ];

        let summary = summarize(&rows);

        assert_eq!(summary.total_domains, 4);
        assert_eq!(summary.improved_count, 1);
        assert_eq!(summary.positive_delta_count, 2);
        assert_eq!(summary.unchanged_count, 1);
        assert_eq!(summary.improved_percent, Some(25.0));
    }

    #[test]
    fn test_improved_means_negative_delta() {
        let rows = vec![
            cmp_row("1", 3000, 5000),
            cmp_row("2", 5000, 3000),
            cmp_row("3", 9000, 5000),
        ];

        let summary = summarize(&rows);
        let charts = chart_series(&rows, 40, 30);

        assert_eq!(summary.improved_count, 1);
        assert_eq!(summary.positive_delta_count, 2);
        assert_eq!(summary.improved_percent, Some(100.0 / 3.0));
        let improved: Vec<&str> = charts
            .most_improved
            .iter()
            .map(|d| d.row.domain_key.as_str())
            .collect();
        assert_eq!(improved, vec!["1"]);
    }

    #[test]
    fn test_summary_of_nothing_has_no_percent() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_domains, 0);
        assert_eq!(summary.improved_count, 0);
        assert_eq!(summary.improved_percent, None);
    }

    #[test]
    fn test_chart_series() {
        let rows = vec![
            cmp_row("a", 5000, 3000),
            cmp_row("b", 3000, 9000),
            cmp_row("c", 4000, 3900),
            cmp_row("d", 10000, 2500),
            cmp_row("e", 0, 0),
            cmp_row("f", 4000, 5000),
            cmp_row("g", 5000, 5100),
        ];

        let charts = chart_series(&rows, 3, 2);

        let changes: Vec<&str> = charts.top_changes.iter().map(|r| r.domain_key.as_str()).collect();
        assert_eq!(changes, vec!["b", "a", "d"]);

        assert_eq!(charts.most_improved.len(), 2);
        assert_eq!(charts.most_improved[0].row.domain_key, "b");
        assert_eq!(charts.most_improved[0].improvement_percent, 200.0);
        assert_eq!(charts.most_improved[1].row.domain_key, "f");
        assert_eq!(charts.most_improved[1].improvement_percent, 25.0);
    }

    #[test]
    fn test_improvement_percent_guards_zero_before() {
        assert_eq!(improvement_percent(&cmp_row("z", 0, 0)), 0.0);
    }
}
