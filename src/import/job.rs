use futures::channel::oneshot;

use super::{ImportError, ImportRequest, ImportResult, run_import};
use crate::config::ImportConfig;
use crate::plan::FloorPlan;

/// An import running in the background. Poll once per frame.
pub struct ImportJob {
    receiver: oneshot::Receiver<ImportResult<FloorPlan>>,
}

impl ImportJob {
    pub fn spawn(request: ImportRequest, config: ImportConfig, ctx: egui::Context) -> Self {
        let (sender, receiver) = oneshot::channel();
        spawn_worker(request, config, sender, ctx);
        Self { receiver }
    }

    /// `None` while the import is still running.
    pub fn poll(&mut self) -> Option<ImportResult<FloorPlan>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ImportError::WorkerStopped)),
        }
    }
}

fn deliver(
    sender: oneshot::Sender<ImportResult<FloorPlan>>,
    result: ImportResult<FloorPlan>,
    ctx: &egui::Context,
) {
    if let Err(err) = &result {
        log::error!("Import failed: {err}");
    }
    if sender.send(result).is_err() {
        log::warn!("Import finished after the editor stopped waiting for it");
    }
    ctx.request_repaint();
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_worker(
    request: ImportRequest,
    config: ImportConfig,
    sender: oneshot::Sender<ImportResult<FloorPlan>>,
    ctx: egui::Context,
) {
    let spawned = std::thread::Builder::new()
        .name("floorplan-import".to_owned())
        .spawn(move || {
            let result = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(run_import(request, &config)),
                Err(err) => Err(ImportError::Runtime(err.to_string())),
            };
            deliver(sender, result, &ctx);
        });

    // The sender went down with the closure; poll() reports WorkerStopped.
    if let Err(err) = spawned {
        log::error!("Failed to start import worker: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_worker(
    request: ImportRequest,
    config: ImportConfig,
    sender: oneshot::Sender<ImportResult<FloorPlan>>,
    ctx: egui::Context,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = run_import(request, &config).await;
        deliver(sender, result, &ctx);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Unit;

    fn request(api_key: &str) -> ImportRequest {
        ImportRequest {
            image: Vec::new(),
            file_name: "plan.png".into(),
            real_width: None,
            unit: Unit::Meters,
            api_key: api_key.into(),
        }
    }

    #[test]
    fn test_job_reports_validation_errors() {
        let mut job = ImportJob::spawn(request(""), ImportConfig::default(), egui::Context::default());
        let result = loop {
            if let Some(result) = job.poll() {
                break result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert!(matches!(result, Err(ImportError::MissingApiKey)));
    }

    #[test]
    fn test_dropped_sender_is_reported() {
        let (sender, receiver) = oneshot::channel();
        drop(sender);
        let mut job = ImportJob { receiver };
        assert!(matches!(job.poll(), Some(Err(ImportError::WorkerStopped))));
    }
}
