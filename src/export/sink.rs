use std::path::{Path, PathBuf};

use super::{ExportError, ExportFormat, ExportResult, PlanExporter, Surface};
use crate::util::time::timestamp_millis;

#[cfg(target_arch = "wasm32")]
const SHARE_FILE_NAME: &str = "floorplan.png";

/// `floorplan-<millis>.<ext>`
pub fn export_file_name(format: ExportFormat, millis: u64) -> String {
    format!("floorplan-{millis}.{}", format.extension())
}

impl PlanExporter {
    /// Directory exports are written to.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config().output_dir {
            return dir.clone();
        }
        default_output_dir()
    }

    /// Render the surface and write it next to the user's other downloads.
    /// In the browser the file is handed to the download manager instead.
    pub fn save(&self, surface: &Surface, format: ExportFormat) -> ExportResult<PathBuf> {
        let bytes = self.export(surface, format)?;
        let path = write_export(&self.output_dir(), format, &bytes)?;
        log::info!("Exported {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Hand the rendered PNG to the platform share sheet.
    ///
    /// Only browsers with the Web Share API have one; elsewhere this reports
    /// [`ExportError::ShareUnsupported`] without rendering.
    pub fn share(&self, surface: &Surface) -> ExportResult<()> {
        share_export(self, surface)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn share_export(_exporter: &PlanExporter, _surface: &Surface) -> ExportResult<()> {
    log::warn!("Share requested but no share target is available");
    Err(ExportError::ShareUnsupported)
}

#[cfg(target_arch = "wasm32")]
fn share_export(exporter: &PlanExporter, surface: &Surface) -> ExportResult<()> {
    let png = exporter.render_to_png(surface)?;
    super::web::share_png(&png, SHARE_FILE_NAME)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(target_arch = "wasm32")]
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(not(target_arch = "wasm32"))]
fn write_export(dir: &Path, format: ExportFormat, bytes: &[u8]) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(format, timestamp_millis()));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(target_arch = "wasm32")]
fn write_export(_dir: &Path, format: ExportFormat, bytes: &[u8]) -> ExportResult<PathBuf> {
    let file_name = export_file_name(format, timestamp_millis());
    super::web::download(bytes, format, &file_name)?;
    Ok(PathBuf::from(file_name))
}
