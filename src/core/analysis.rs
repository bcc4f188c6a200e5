use crate::core::{comparison, concentration, domain_key, participation, period};
use crate::domain::model::{AnalysisReport, PeriodCounts, RecordSet};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

pub const DEFAULT_CUTOFF: &str = "2022-12-01";
pub const DEFAULT_TOP_CHANGES: usize = 40;
pub const DEFAULT_TOP_IMPROVED: usize = 30;

/// Everything one run of the analysis depends on besides the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisParams {
    pub cutoff: NaiveDate,
    pub digits: usize,
    pub top_changes: usize,
    pub top_improved: usize,
}

impl AnalysisParams {
    pub fn new(cutoff: NaiveDate, digits: usize) -> Self {
        Self {
            cutoff,
            digits,
            top_changes: DEFAULT_TOP_CHANGES,
            top_improved: DEFAULT_TOP_IMPROVED,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self {
            cutoff: config.cutoff()?,
            digits: config.digits(),
            top_changes: config.top_changes(),
            top_improved: config.top_improved(),
        })
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        let cutoff = NaiveDate::from_ymd_opt(2022, 12, 1).unwrap_or_default();
        Self::new(cutoff, domain_key::DEFAULT_DIGITS)
    }
}

/// Runs split, aggregation, HHI and comparison over an already loaded record set.
///
/// Fails only when no record carries a usable date. One empty period is a
/// valid run with an empty comparison.
pub fn analyze(data: &RecordSet, params: &AnalysisParams) -> Result<AnalysisReport> {
    let split = period::split_by_cutoff(&data.records, params.cutoff);
    if split.before.is_empty() && split.after.is_empty() {
        return Err(EtlError::EmptyInput {
            message: format!(
                "{} row(s) read, none with a valid registration date",
                data.data_quality.total_rows
            ),
        });
    }

    tracing::info!(
        "Records before {}: {}, from {} on: {}",
        params.cutoff,
        split.before.len(),
        params.cutoff,
        split.after.len()
    );

    let participation_before = participation::aggregate(split.before.iter().copied(), params.digits);
    let participation_after = participation::aggregate(split.after.iter().copied(), params.digits);

    let hhi_before = concentration::compute_hhi(&participation_before);
    let hhi_after = concentration::compute_hhi(&participation_after);
    tracing::debug!(
        "Domains with {} digits: {} before, {} after",
        params.digits,
        hhi_before.len(),
        hhi_after.len()
    );

    let rows = comparison::compare(&hhi_before, &hhi_after);
    if rows.is_empty() {
        tracing::warn!("No domain appears in both periods; comparison is empty");
    }
    let summary = comparison::summarize(&rows);
    let charts = comparison::chart_series(&rows, params.top_changes, params.top_improved);

    Ok(AnalysisReport {
        cutoff: params.cutoff,
        digits: params.digits,
        periods: PeriodCounts {
            records_before: split.before.len(),
            records_after: split.after.len(),
            domains_before: hhi_before.len(),
            domains_after: hhi_after.len(),
        },
        data_quality: data.data_quality.clone(),
        comparison: rows,
        summary,
        charts,
    })
}
