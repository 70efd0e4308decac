use crate::domain::ports::Reporter;
use crate::domain::report::PaymentReport;
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the latest transition report as pretty-printed JSON.
///
/// The file is replaced on every report: the new document goes to a sibling
/// temp file first and is renamed over the target, so readers never see a
/// partial write.
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Reporter for JsonReportWriter {
    async fn report(&self, report: &PaymentReport) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(report).map_err(|e| TrackerError::Report(e.to_string()))?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| TrackerError::Report(format!("writing {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            TrackerError::Report(format!("replacing {}: {}", self.path.display(), e))
        })?;
        info!(path = %self.path.display(), "Payment data saved");
        Ok(())
    }
}
