use egui::DroppedFile;
use futures::channel::oneshot;

/// A photo chosen for import, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Collects photos dropped onto the window or chosen in a file dialog.
#[derive(Debug, Default)]
pub struct FileHandler {
    /// Outcome of the file dialog that is currently open
    pending_pick: Option<oneshot::Receiver<Option<PickedImage>>>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the file dialog. The chosen photo arrives through
    /// [`Self::take_picked_image`].
    pub fn request_image(&mut self, ctx: &egui::Context) {
        if self.is_picking() {
            return;
        }
        let (sender, receiver) = oneshot::channel();
        self.pending_pick = Some(receiver);
        spawn_picker(sender, ctx.clone());
    }

    pub fn is_picking(&self) -> bool {
        self.pending_pick.is_some()
    }

    /// The photo chosen in the file dialog, once it has been read.
    pub fn take_picked_image(&mut self) -> Option<PickedImage> {
        let receiver = self.pending_pick.as_mut()?;
        match receiver.try_recv() {
            Ok(None) => None,
            Ok(Some(picked)) => {
                self.pending_pick = None;
                picked
            }
            Err(oneshot::Canceled) => {
                log::warn!("File dialog closed without a result");
                self.pending_pick = None;
                None
            }
        }
    }

    /// The first readable image among the files dropped this frame.
    pub fn take_dropped_image(&self, ctx: &egui::Context) -> Option<PickedImage> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped.iter().find_map(|file| {
            if !Self::is_image_file(file) {
                log::warn!("Dropped file is not a supported image: {}", Self::display_name(file));
                return None;
            }
            Self::read_dropped_file(file)
        })
    }

    /// Check if a file is an image based on MIME type or extension
    pub fn is_image_file(file: &DroppedFile) -> bool {
        if !file.mime.is_empty() {
            return file.mime.starts_with("image/");
        }
        let name = match &file.path {
            Some(path) => path.to_string_lossy().into_owned(),
            None => file.name.clone(),
        };
        std::path::Path::new(&name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }

    fn display_name(file: &DroppedFile) -> String {
        if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        }
    }

    fn read_dropped_file(file: &DroppedFile) -> Option<PickedImage> {
        let name = file
            .path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| Self::display_name(file));

        if let Some(bytes) = &file.bytes {
            log::info!("Received dropped image {} ({} bytes)", name, bytes.len());
            return Some(PickedImage { name, bytes: bytes.to_vec() });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(path) = &file.path {
                return match std::fs::read(path) {
                    Ok(bytes) => Some(PickedImage { name, bytes }),
                    Err(err) => {
                        log::error!("Failed to read image file: {}: {}", path.display(), err);
                        None
                    }
                };
            }
        }

        log::warn!("Dropped file has no accessible data: {name}");
        None
    }

    /// Overlay shown while files hover over the window.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop a floor plan photo to import it",
            FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}

fn deliver_pick(sender: oneshot::Sender<Option<PickedImage>>, picked: Option<PickedImage>, ctx: &egui::Context) {
    if sender.send(picked).is_err() {
        log::warn!("Picked image arrived after the editor stopped waiting for it");
    }
    ctx.request_repaint();
}

/// Native dialogs block until closed, so the result is ready on the next poll.
#[cfg(not(target_arch = "wasm32"))]
fn spawn_picker(sender: oneshot::Sender<Option<PickedImage>>, ctx: egui::Context) {
    let picked = rfd::FileDialog::new()
        .set_title("Import Floor Plan Photo")
        .add_filter("Image", &IMAGE_EXTENSIONS)
        .pick_file()
        .and_then(|path| match std::fs::read(&path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                Some(PickedImage { name, bytes })
            }
            Err(err) => {
                log::error!("Failed to read image file: {}: {}", path.display(), err);
                None
            }
        });
    deliver_pick(sender, picked, &ctx);
}

#[cfg(target_arch = "wasm32")]
fn spawn_picker(sender: oneshot::Sender<Option<PickedImage>>, ctx: egui::Context) {
    wasm_bindgen_futures::spawn_local(async move {
        let handle = rfd::AsyncFileDialog::new()
            .set_title("Import Floor Plan Photo")
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()
            .await;
        let picked = match handle {
            Some(handle) => {
                let name = handle.file_name();
                let bytes = handle.read().await;
                log::info!("Picked image {} ({} bytes)", name, bytes.len());
                Some(PickedImage { name, bytes })
            }
            None => None,
        };
        deliver_pick(sender, picked, &ctx);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_image_detection() {
        let by_mime = DroppedFile {
            mime: "image/jpeg".into(),
            ..Default::default()
        };
        let by_name = DroppedFile {
            name: "plan.PNG".into(),
            ..Default::default()
        };
        let text = DroppedFile {
            name: "notes.txt".into(),
            ..Default::default()
        };
        assert!(FileHandler::is_image_file(&by_mime));
        assert!(FileHandler::is_image_file(&by_name));
        assert!(!FileHandler::is_image_file(&text));
    }

    #[test]
    fn test_dropped_bytes_are_used() {
        let file = DroppedFile {
            name: "plan.png".into(),
            bytes: Some(Arc::from(vec![1u8, 2, 3])),
            ..Default::default()
        };
        let image = FileHandler::read_dropped_file(&file).unwrap();
        assert_eq!(image.name, "plan.png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }

    fn waiting_handler() -> (FileHandler, oneshot::Sender<Option<PickedImage>>) {
        let (sender, receiver) = oneshot::channel();
        let handler = FileHandler {
            pending_pick: Some(receiver),
        };
        (handler, sender)
    }

    #[test]
    fn test_picked_image_is_taken_once() {
        let (mut handler, sender) = waiting_handler();
        assert!(handler.take_picked_image().is_none());
        assert!(handler.is_picking());

        let image = PickedImage {
            name: "plan.jpg".into(),
            bytes: vec![0xff, 0xd8],
        };
        deliver_pick(sender, Some(image.clone()), &egui::Context::default());

        assert_eq!(handler.take_picked_image(), Some(image));
        assert!(!handler.is_picking());
        assert!(handler.take_picked_image().is_none());
    }

    #[test]
    fn test_cancelled_dialog_stops_picking() {
        let (mut handler, sender) = waiting_handler();
        deliver_pick(sender, None, &egui::Context::default());
        assert!(handler.take_picked_image().is_none());
        assert!(!handler.is_picking());

        let (mut handler, sender) = waiting_handler();
        drop(sender);
        assert!(handler.take_picked_image().is_none());
        assert!(!handler.is_picking());
    }
}
