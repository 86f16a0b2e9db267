use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use shelfcast_core::ProductId;
use shelfcast_inventory::ProductSummary;
use shelfcast_sales::SaleEvent;

pub const SALES_RAW_SHEET: &str = "SalesRaw";
pub const SUMMARY_SHEET: &str = "Summary";

/// One row of the raw sales sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRow {
    pub date: NaiveDate,
    pub product: ProductId,
    pub quantity: u64,
}

impl From<&SaleEvent> for SaleRow {
    fn from(event: &SaleEvent) -> Self {
        Self {
            date: event.date,
            product: event.product.clone(),
            quantity: event.quantity,
        }
    }
}

/// The two sheets handed to the export collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTables {
    #[serde(rename = "SalesRaw")]
    pub sales_raw: Vec<SaleRow>,
    #[serde(rename = "Summary")]
    pub summary: Vec<ProductSummary>,
}

impl ExportTables {
    pub fn new<'a>(events: impl IntoIterator<Item = &'a SaleEvent>, summary: Vec<ProductSummary>) -> Self {
        Self {
            sales_raw: events.into_iter().map(SaleRow::from).collect(),
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
}

/// Something that turns [`ExportTables`] into an artifact.
pub trait ExportSink {
    fn export(&self, tables: &ExportTables) -> ExportOutcome;
}

/// Writes both sheets into one JSON document keyed by sheet name.
#[derive(Debug, Clone)]
pub struct JsonExportSink {
    path: PathBuf,
}

impl JsonExportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, tables: &ExportTables) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, tables)?;
        writer.flush()
    }
}

impl ExportSink for JsonExportSink {
    fn export(&self, tables: &ExportTables) -> ExportOutcome {
        match self.write(tables) {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    sales_rows = tables.sales_raw.len(),
                    summary_rows = tables.summary.len(),
                    "export written"
                );
                ExportOutcome {
                    success: true,
                    message: format!(
                        "wrote {} and {} sheets to {}",
                        SALES_RAW_SHEET,
                        SUMMARY_SHEET,
                        self.path.display()
                    ),
                }
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "export failed");
                ExportOutcome {
                    success: false,
                    message: format!("export to {} failed: {e}", self.path.display()),
                }
            }
        }
    }
}
