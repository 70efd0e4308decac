use crate::config::GpioConfig;
use crate::domain::action::{LineId, LineState};
use crate::domain::ports::Actuator;
use crate::error::HardwareError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// How long to wait for the kernel to create `gpioN` after an export.
const EXPORT_TIMEOUT: Duration = Duration::from_secs(1);
const EXPORT_POLL: Duration = Duration::from_millis(25);

/// A single exported sysfs GPIO pin.
///
/// The lock holds the path of the pin's `value` file and orders writes to it.
struct SysfsLine {
    value: Mutex<PathBuf>,
}

/// Drives the output lines through the Linux sysfs GPIO interface.
pub struct SysfsActuator {
    line1: SysfsLine,
    line12: SysfsLine,
}

impl SysfsActuator {
    /// Exports both pins if needed and configures them as outputs.
    pub async fn open(config: &GpioConfig) -> Result<Self, HardwareError> {
        let line1 = export_pin(&config.root, config.line1_pin, LineId::Line1).await?;
        let line12 = export_pin(&config.root, config.line12_pin, LineId::Line12).await?;
        info!(
            root = %config.root.display(),
            line1_pin = config.line1_pin,
            line12_pin = config.line12_pin,
            "GPIO lines ready"
        );
        Ok(Self { line1, line12 })
    }

    fn line(&self, line: LineId) -> &SysfsLine {
        match line {
            LineId::Line1 => &self.line1,
            LineId::Line12 => &self.line12,
        }
    }
}

async fn export_pin(root: &Path, pin: u32, line: LineId) -> Result<SysfsLine, HardwareError> {
    let io_err = |source| HardwareError::Io { line, source };

    let pin_dir = root.join(format!("gpio{}", pin));
    if !tokio::fs::try_exists(&pin_dir).await.map_err(io_err)? {
        debug!(pin, "Exporting GPIO pin");
        tokio::fs::write(root.join("export"), pin.to_string())
            .await
            .map_err(io_err)?;
        wait_for_node(&pin_dir, line, pin).await?;
    }
    tokio::fs::write(pin_dir.join("direction"), "out")
        .await
        .map_err(io_err)?;

    Ok(SysfsLine {
        value: Mutex::new(pin_dir.join("value")),
    })
}

/// The `gpioN` node shows up asynchronously once the kernel handles the export.
async fn wait_for_node(pin_dir: &Path, line: LineId, pin: u32) -> Result<(), HardwareError> {
    let poll = async {
        loop {
            match tokio::fs::try_exists(pin_dir).await {
                Ok(true) => return Ok(()),
                Ok(false) => tokio::time::sleep(EXPORT_POLL).await,
                Err(source) => return Err(HardwareError::Io { line, source }),
            }
        }
    };
    tokio::time::timeout(EXPORT_TIMEOUT, poll)
        .await
        .map_err(|_| HardwareError::NotExported { line, pin })?
}

#[async_trait]
impl Actuator for SysfsActuator {
    async fn set_line(&self, line: LineId, state: LineState) -> Result<(), HardwareError> {
        let value = self.line(line).value.lock().await;
        tokio::fs::write(&*value, state.as_sysfs())
            .await
            .map_err(|source| HardwareError::Io { line, source })
    }
}

/// Logs line writes without touching hardware.
#[derive(Debug, Default, Clone)]
pub struct LoggingActuator;

impl LoggingActuator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Actuator for LoggingActuator {
    async fn set_line(&self, line: LineId, state: LineState) -> Result<(), HardwareError> {
        info!(%line, ?state, "Dry run: line write skipped");
        Ok(())
    }
}
