use crate::core::preprocess::Preprocessor;
use crate::core::table_io::{read_csv, to_json_records, write_csv};
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const CSV_FILENAME: &str = "processed.csv";
pub const JSON_FILENAME: &str = "processed.json";
pub const REPORT_FILENAME: &str = "report.json";
pub const ZIP_FILENAME: &str = "processed.zip";

/// Reads the raw churn CSV from storage, preprocesses it and writes the
/// model-ready outputs back.
pub struct CsvPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn wants_format(&self, format: &str) -> bool {
        self.config
            .output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CsvPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        tracing::debug!("Reading input from: {}", self.config.input_file());
        let data = self.storage.read_file(self.config.input_file()).await?;
        tracing::debug!("Read {} bytes", data.len());

        read_csv(&data)
    }

    async fn transform(&self, table: Table) -> Result<TransformResult> {
        let result = Preprocessor::new().run(&table);

        let csv_output = if self.wants_format("csv") {
            Some(write_csv(&result.table)?)
        } else {
            None
        };

        let json_output = if self.wants_format("json") {
            Some(serde_json::to_string_pretty(&to_json_records(&result.table))?)
        } else {
            None
        };

        Ok(TransformResult {
            table: result.table,
            report: result.report,
            csv_output,
            json_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut files: Vec<(&str, Vec<u8>)> = Vec::new();
        if let Some(csv) = result.csv_output {
            files.push((CSV_FILENAME, csv.into_bytes()));
        }
        if let Some(json) = result.json_output {
            files.push((JSON_FILENAME, json.into_bytes()));
        }
        files.push((
            REPORT_FILENAME,
            serde_json::to_vec_pretty(&result.report)?,
        ));

        if self.config.zip_output() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            let output_path = self.output_file(ZIP_FILENAME);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), output_path);
            self.storage.write_file(&output_path, &zip_data).await?;
            return Ok(output_path);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in &files {
            let path = self.output_file(name);
            tracing::debug!("Writing {} bytes to {}", data.len(), path);
            self.storage.write_file(&path, data).await?;
            written.push(path);
        }

        // The first file is the primary artifact; the report is always last.
        Ok(written.swap_remove(0))
    }
}
