use crate::core::analysis::{analyze, AnalysisParams};
use crate::core::{AnalysisReport, ConfigProvider, Pipeline, RecordSet, Storage};
use crate::io::reader::{read_records, ReadOptions};
use crate::io::writer;
use crate::utils::error::Result;

/// Reads the procurement export, compares HHI across the cutoff and writes the results.
pub struct HhiPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> HhiPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn read_options(&self) -> ReadOptions {
        ReadOptions {
            columns: self.config.columns(),
            delimiter: self.config.delimiter(),
            date_formats: self.config.date_formats().to_vec(),
        }
    }
}

fn log_report(report: &AnalysisReport) {
    tracing::info!(
        "Domains compared: {} ({} before, {} after)",
        report.summary.total_domains,
        report.periods.domains_before,
        report.periods.domains_after
    );
    for row in report.comparison.iter().take(10) {
        tracing::info!(
            "  {} before={} after={} delta={}",
            row.domain_key,
            row.hhi_before,
            row.hhi_after,
            row.delta
        );
    }
    match report.summary.improved_percent {
        Some(percent) => tracing::info!(
            "{}-digit domains: {} of {} ({:.1}%) became more competitive after {}",
            report.digits,
            report.summary.improved_count,
            report.summary.total_domains,
            percent,
            report.cutoff
        ),
        None => tracing::info!("{}-digit domains: none comparable across {}", report.digits, report.cutoff),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for HhiPipeline<S, C> {
    async fn extract(&self) -> Result<RecordSet> {
        let path = self.config.input_path();
        tracing::debug!("Reading input from: {}", path);
        let bytes = self.storage.read_file(path).await?;
        read_records(&bytes, path, &self.read_options())
    }

    async fn transform(&self, data: RecordSet) -> Result<AnalysisReport> {
        let params = AnalysisParams::from_config(&self.config)?;
        let report = analyze(&data, &params)?;
        log_report(&report);
        Ok(report)
    }

    async fn load(&self, report: AnalysisReport) -> Result<String> {
        let files = writer::render(
            &report,
            self.config.output_formats(),
            &self.config.comparison_filename(),
        )?;

        if self.config.compress() {
            let name = self.config.bundle_filename();
            tracing::debug!("Bundling {} file(s) into {}", files.len(), name);
            let zip_data = writer::bundle(&files)?;
            self.storage.write_file(&name, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), name));
        }

        for file in &files {
            tracing::debug!("Writing {} ({} bytes)", file.name, file.contents.len());
            self.storage.write_file(&file.name, &file.contents).await?;
        }
        let primary = files.first().map(|f| f.name.as_str()).unwrap_or_default();
        Ok(format!("{}/{}", self.config.output_path(), primary))
    }
}
