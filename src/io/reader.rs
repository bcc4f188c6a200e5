use crate::domain::model::{ColumnMapping, DataQualityReport, Record, RecordSet};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y",
];

#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub columns: ColumnMapping,
    pub delimiter: u8,
    pub date_formats: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            delimiter: b',',
            date_formats: Vec::new(),
        }
    }
}

/// Parses a date cell; anything unreadable becomes `None`.
///
/// RFC 3339 values are converted to their local wall-clock time so that the
/// cutoff comparison ignores offsets.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    let custom = formats.iter().map(String::as_str);
    let candidates: Vec<&str> = if formats.is_empty() {
        DEFAULT_DATE_FORMATS.to_vec()
    } else {
        custom.collect()
    };

    for format in &candidates {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in &candidates {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

/// Decodes a delimited export into records.
///
/// Every cell is kept as text, so product codes keep their leading zeros.
/// Rows without a parseable date or without a supplier are kept out of the
/// analysis but counted in the returned `DataQualityReport`; rows without a
/// date are retained with `registration_date = None`.
pub fn read_records(data: &[u8], source: &str, options: &ReadOptions) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(data);

    let unavailable = |e: csv::Error| EtlError::InputUnavailable {
        path: source.to_string(),
        reason: e.to_string(),
    };

    let headers = reader.headers().map_err(unavailable)?.clone();
    let wanted = [
        &options.columns.supplier,
        &options.columns.product,
        &options.columns.date,
    ];
    let indexes: Vec<Option<usize>> = wanted.iter().map(|name| column_index(&headers, name)).collect();
    let missing: Vec<String> = wanted
        .iter()
        .zip(&indexes)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    let (supplier_idx, product_idx, date_idx) = match indexes[..] {
        [Some(s), Some(p), Some(d)] => (s, p, d),
        _ => return Err(EtlError::SchemaError { missing }),
    };

    let mut records = Vec::new();
    let mut quality = DataQualityReport::default();

    for row in reader.records() {
        let row = row.map_err(unavailable)?;
        quality.total_rows += 1;

        let supplier = row.get(supplier_idx).unwrap_or_default().trim();
        if supplier.is_empty() {
            quality.missing_supplier += 1;
            continue;
        }

        let registration_date = parse_date(row.get(date_idx).unwrap_or_default(), &options.date_formats);
        if registration_date.is_none() {
            quality.unparseable_dates += 1;
        }

        // Product codes are taken verbatim; the domain key is a plain prefix.
        records.push(Record::new(
            supplier,
            row.get(product_idx).unwrap_or_default(),
            registration_date,
        ));
    }

    tracing::info!("Read {} row(s) from {}", quality.total_rows, source);
    if quality.dropped() > 0 {
        tracing::warn!(
            "{} row(s) excluded: {} with unparseable dates, {} without supplier",
            quality.dropped(),
            quality.unparseable_dates,
            quality.missing_supplier
        );
    }

    Ok(RecordSet {
        records,
        data_quality: quality,
    })
}
