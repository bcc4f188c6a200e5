use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One procurement line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub supplier_id: String,
    pub product_code: String,
    /// `None` when the source value could not be parsed as a date.
    pub registration_date: Option<NaiveDateTime>,
}

impl Record {
    pub fn new(
        supplier_id: impl Into<String>,
        product_code: impl Into<String>,
        registration_date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            product_code: product_code.into(),
            registration_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipationRow {
    pub domain_key: String,
    pub supplier_id: String,
    pub count: u64,
    pub share_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainHhi {
    pub domain_key: String,
    pub hhi: i64,
}

/// `delta = hhi_before - hhi_after`; positive means the domain became less concentrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub domain_key: String,
    pub hhi_before: i64,
    pub hhi_after: i64,
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    CompetitivenessIncreased,
    CompetitivenessDecreased,
    Unchanged,
}

impl ComparisonRow {
    pub fn trend(&self) -> Trend {
        match self.delta {
            d if d > 0 => Trend::CompetitivenessIncreased,
            d if d < 0 => Trend::CompetitivenessDecreased,
            _ => Trend::Unchanged,
        }
    }
}

/// Headline counts over the comparison table.
///
/// `improved_count` is the number of rows with `delta < 0`, the reporting
/// convention of the published competitiveness figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitivenessSummary {
    pub total_domains: usize,
    pub improved_count: usize,
    pub positive_delta_count: usize,
    pub unchanged_count: usize,
    /// `improved_count / total_domains * 100`; `None` when there are no comparable domains.
    pub improved_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovedDomain {
    #[serde(flatten)]
    pub row: ComparisonRow,
    pub improvement_percent: f64,
}

/// Data behind the two bar charts drawn by the reporting side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub top_changes: Vec<ComparisonRow>,
    pub most_improved: Vec<ImprovedDomain>,
}

/// Non-fatal record drops, reported next to a successful result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub total_rows: usize,
    pub unparseable_dates: usize,
    pub missing_supplier: usize,
}

impl DataQualityReport {
    pub fn dropped(&self) -> usize {
        self.unparseable_dates + self.missing_supplier
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCounts {
    pub records_before: usize,
    pub records_after: usize,
    pub domains_before: usize,
    pub domains_after: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub cutoff: NaiveDate,
    pub digits: usize,
    pub periods: PeriodCounts,
    pub data_quality: DataQualityReport,
    /// Sorted by delta ascending, then domain key.
    pub comparison: Vec<ComparisonRow>,
    pub summary: CompetitivenessSummary,
    pub charts: ChartSeries,
}

/// Records decoded from the input plus the warnings collected while decoding.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub data_quality: DataQualityReport,
}

/// Header names of the three required input columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "ColumnMapping::default_supplier")]
    pub supplier: String,
    #[serde(default = "ColumnMapping::default_product")]
    pub product: String,
    #[serde(default = "ColumnMapping::default_date")]
    pub date: String,
}

impl ColumnMapping {
    fn default_supplier() -> String {
        "CEDULA_PROVEEDOR".to_string()
    }

    fn default_product() -> String {
        "CODIGO_PRODUCTO".to_string()
    }

    fn default_date() -> String {
        "FECHA_REGISTRO".to_string()
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            supplier: Self::default_supplier(),
            product: Self::default_product(),
            date: Self::default_date(),
        }
    }
}
