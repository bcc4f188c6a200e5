use crate::config::{resolve_delimiter, validate_delimiter, INPUT_EXTENSIONS, MAX_DIGITS};
use crate::core::analysis::{DEFAULT_CUTOFF, DEFAULT_TOP_CHANGES, DEFAULT_TOP_IMPROVED};
use crate::core::domain_key::DEFAULT_DIGITS;
use crate::core::ConfigProvider;
use crate::domain::model::ColumnMapping;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub analysis: AnalysisConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub charts: Option<ChartsConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,
    pub description: Option<String>,
    /// First day of the after period, `YYYY-MM-DD`.
    pub cutoff: Option<String>,
    pub digits: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub delimiter: Option<char>,
    pub date_formats: Option<Vec<String>>,
    pub columns: Option<ColumnMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub comparison: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    pub top_changes: Option<usize>,
    pub top_improved: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("analysis.name", &self.analysis.name)?;
        if let Some(cutoff) = &self.analysis.cutoff {
            validation::validate_date("analysis.cutoff", cutoff)?;
        }
        validation::validate_range("analysis.digits", self.digits(), 1, MAX_DIGITS)?;

        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_file_extensions(
            "source.path",
            std::slice::from_ref(&self.source.path),
            &INPUT_EXTENSIONS,
        )?;
        validate_delimiter("source.delimiter", self.source.delimiter)?;
        if let Some(columns) = &self.source.columns {
            validation::validate_non_empty_string("source.columns.supplier", &columns.supplier)?;
            validation::validate_non_empty_string("source.columns.product", &columns.product)?;
            validation::validate_non_empty_string("source.columns.date", &columns.date)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;
        if let Some(name) = self.load.filenames.as_ref().and_then(|f| f.comparison.as_ref()) {
            validation::validate_path("load.filenames.comparison", name)?;
        }

        validation::validate_positive_number("charts.top_changes", self.top_changes(), 1)?;
        validation::validate_positive_number("charts.top_improved", self.top_improved(), 1)?;
        if let Some(level) = self.log_level() {
            validation::validate_log_level("monitoring.log_level", level)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Default log level for the `hhi_etl` target; `RUST_LOG` still overrides it.
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn cutoff(&self) -> Result<NaiveDate> {
        validation::validate_date(
            "analysis.cutoff",
            self.analysis.cutoff.as_deref().unwrap_or(DEFAULT_CUTOFF),
        )
    }

    fn digits(&self) -> usize {
        self.analysis.digits.unwrap_or(DEFAULT_DIGITS)
    }

    fn columns(&self) -> ColumnMapping {
        self.source.columns.clone().unwrap_or_default()
    }

    fn delimiter(&self) -> u8 {
        resolve_delimiter(&self.source.path, self.source.delimiter)
    }

    fn date_formats(&self) -> &[String] {
        self.source.date_formats.as_deref().unwrap_or(&[])
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress(&self) -> bool {
        self.load.compression.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    fn top_changes(&self) -> usize {
        self.charts
            .as_ref()
            .and_then(|c| c.top_changes)
            .unwrap_or(DEFAULT_TOP_CHANGES)
    }

    fn top_improved(&self) -> usize {
        self.charts
            .as_ref()
            .and_then(|c| c.top_improved)
            .unwrap_or(DEFAULT_TOP_IMPROVED)
    }

    fn comparison_filename(&self) -> String {
        self.load
            .filenames
            .as_ref()
            .and_then(|f| f.comparison.clone())
            .unwrap_or_else(|| format!("cambio_hhi_dominios_{}digitos.csv", self.digits()))
    }

    fn bundle_filename(&self) -> String {
        self.load
            .compression
            .as_ref()
            .and_then(|c| c.filename.clone())
            .unwrap_or_else(|| "hhi_output.zip".to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
