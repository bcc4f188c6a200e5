pub mod cli;
pub mod toml_config;

use crate::utils::error::{EtlError, Result};
#[cfg(feature = "cli")]
use crate::{
    core::analysis::{DEFAULT_CUTOFF, DEFAULT_TOP_CHANGES, DEFAULT_TOP_IMPROVED},
    core::domain_key::DEFAULT_DIGITS,
    core::ConfigProvider,
    domain::model::ColumnMapping,
    utils::validation::{self, Validate},
};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const MAX_DIGITS: usize = 32;
pub const INPUT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Tab for `.tsv` inputs, comma otherwise, unless set explicitly.
pub fn resolve_delimiter(input_path: &str, explicit: Option<char>) -> u8 {
    match explicit {
        Some(c) if c.is_ascii() => c as u8,
        _ if input_path.to_ascii_lowercase().ends_with(".tsv") => b'\t',
        _ => b',',
    }
}

pub(crate) fn validate_delimiter(field_name: &str, delimiter: Option<char>) -> Result<()> {
    match delimiter {
        Some(c) if !c.is_ascii() || c == '"' || c == '\n' => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: c.to_string(),
            reason: "Delimiter must be a single ASCII character other than a quote or newline".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "hhi-etl")]
#[command(about = "Compares supplier concentration (HHI) per product domain before and after a cutoff date")]
pub struct CliConfig {
    #[arg(short, long, help = "Procurement lines export (csv or tsv)")]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_CUTOFF, help = "First day of the after period (YYYY-MM-DD)")]
    pub cutoff: String,

    #[arg(long, default_value_t = DEFAULT_DIGITS, help = "Product code prefix length used as domain key")]
    pub digits: usize,

    #[arg(long, default_value = "CEDULA_PROVEEDOR")]
    pub supplier_column: String,

    #[arg(long, default_value = "CODIGO_PRODUCTO")]
    pub product_column: String,

    #[arg(long, default_value = "FECHA_REGISTRO")]
    pub date_column: String,

    #[arg(long)]
    pub delimiter: Option<char>,

    #[arg(long = "date-format", help = "chrono format for the date column; repeatable")]
    pub date_formats: Vec<String>,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle every output file into one zip")]
    pub zip: bool,

    #[arg(long, default_value_t = DEFAULT_TOP_CHANGES)]
    pub top_changes: usize,

    #[arg(long, default_value_t = DEFAULT_TOP_IMPROVED)]
    pub top_improved: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn cutoff(&self) -> Result<NaiveDate> {
        validation::validate_date("cutoff", &self.cutoff)
    }

    fn digits(&self) -> usize {
        self.digits
    }

    fn columns(&self) -> ColumnMapping {
        ColumnMapping {
            supplier: self.supplier_column.clone(),
            product: self.product_column.clone(),
            date: self.date_column.clone(),
        }
    }

    fn delimiter(&self) -> u8 {
        resolve_delimiter(&self.input, self.delimiter)
    }

    fn date_formats(&self) -> &[String] {
        &self.date_formats
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress(&self) -> bool {
        self.zip
    }

    fn top_changes(&self) -> usize {
        self.top_changes
    }

    fn top_improved(&self) -> usize {
        self.top_improved
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extensions("input", std::slice::from_ref(&self.input), &INPUT_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_date("cutoff", &self.cutoff)?;
        validation::validate_range("digits", self.digits, 1, MAX_DIGITS)?;
        validation::validate_non_empty_string("supplier_column", &self.supplier_column)?;
        validation::validate_non_empty_string("product_column", &self.product_column)?;
        validation::validate_non_empty_string("date_column", &self.date_column)?;
        validate_delimiter("delimiter", self.delimiter)?;
        validation::validate_output_formats("formats", &self.formats)?;
        validation::validate_positive_number("top_changes", self.top_changes, 1)?;
        validation::validate_positive_number("top_improved", self.top_improved, 1)?;
        Ok(())
    }
}
