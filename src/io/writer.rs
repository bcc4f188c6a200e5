use crate::core::comparison::sort_by_delta;
use crate::domain::model::{AnalysisReport, ComparisonRow};
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// A rendered artifact, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

/// `domain_key,hhi_before,hhi_after,delta`, most negative delta first.
pub fn comparison_table(rows: &[ComparisonRow], delimiter: u8) -> Result<Vec<u8>> {
    let mut sorted = rows.to_vec();
    sort_by_delta(&mut sorted);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    if sorted.is_empty() {
        writer.write_record(["domain_key", "hhi_before", "hhi_after", "delta"])?;
    }
    for row in &sorted {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn report_json(report: &AnalysisReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

fn swap_extension(name: &str, extension: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{}.{}", stem, extension),
        None => format!("{}.{}", name, extension),
    }
}

/// Renders the requested formats (`csv`, `tsv`, `json`) for one report.
pub fn render(report: &AnalysisReport, formats: &[String], table_name: &str) -> Result<Vec<OutputFile>> {
    let mut files = Vec::new();
    for format in formats {
        let file = match format.as_str() {
            "csv" => OutputFile {
                name: swap_extension(table_name, "csv"),
                contents: comparison_table(&report.comparison, b',')?,
            },
            "tsv" => OutputFile {
                name: swap_extension(table_name, "tsv"),
                contents: comparison_table(&report.comparison, b'\t')?,
            },
            "json" => OutputFile {
                name: "report.json".to_string(),
                contents: report_json(report)?,
            },
            other => {
                return Err(EtlError::ProcessingError {
                    message: format!("Unknown output format: {}", other),
                })
            }
        };
        files.push(file);
    }
    Ok(files)
}

pub fn bundle(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for file in files {
        zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
        zip.write_all(&file.contents)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::{analyze, AnalysisParams};
    use crate::domain::model::{Record, RecordSet};
    use chrono::NaiveDate;
    use std::io::Read;

    fn row(domain: &str, before: i64, after: i64) -> ComparisonRow {
        ComparisonRow {
            domain_key: domain.to_string(),
            hhi_before: before,
            hhi_after: after,
            delta: before - after,
        }
    }

    fn sample_report() -> AnalysisReport {
        let before = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0);
        let after = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0);
        let records = vec![
            Record::new("A", "0101", before),
            Record::new("A", "0101", after),
            Record::new("B", "0101", after),
        ];
        let data = RecordSet {
            records,
            data_quality: Default::default(),
        };
        analyze(&data, &AnalysisParams::default()).unwrap()
    }

    #[test]
    fn test_comparison_table_sorted_by_delta() {
        let rows = vec![row("2000", 10000, 2500), row("1000", 2500, 10000), row("0500", 5000, 5000)];
        let csv = String::from_utf8(comparison_table(&rows, b',').unwrap()).unwrap();
        assert_eq!(
            csv,
            "domain_key,hhi_before,hhi_after,delta\n\
             1000,2500,10000,-7500\n\
             0500,5000,5000,0\n\
             2000,10000,2500,7500\n"
        );
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let csv = String::from_utf8(comparison_table(&[], b',').unwrap()).unwrap();
        assert_eq!(csv, "domain_key,hhi_before,hhi_after,delta\n");
    }

    #[test]
    fn test_render_formats() {
        let report = sample_report();
        let formats = vec!["csv".to_string(), "tsv".to_string(), "json".to_string()];

        let files = render(&report, &formats, "cambio_hhi_dominios_4digitos.csv").unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["cambio_hhi_dominios_4digitos.csv", "cambio_hhi_dominios_4digitos.tsv", "report.json"]
        );
        let tsv = String::from_utf8(files[1].contents.clone()).unwrap();
        assert!(tsv.contains("0101\t10000\t5000\t5000"));

        let json: serde_json::Value = serde_json::from_slice(&files[2].contents).unwrap();
        assert_eq!(json["digits"], 4);
        assert_eq!(json["summary"]["improved_count"], 0);
        assert_eq!(json["summary"]["positive_delta_count"], 1);
        assert_eq!(json["charts"]["top_changes"][0]["delta"], 5000);
        assert_eq!(json["charts"]["most_improved"], serde_json::json!([]));
    }

    #[test]
    fn test_bundle_contains_every_file() {
        let files = vec![
            OutputFile {
                name: "a.csv".to_string(),
                contents: b"x".to_vec(),
            },
            OutputFile {
                name: "report.json".to_string(),
                contents: b"{}".to_vec(),
            },
        ];

        let zip_data = bundle(&files).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive.by_name("report.json").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "{}");
    }
}
