mod central_panel;
mod import_panel;
mod notice;
mod toolbar;

pub use central_panel::central_panel;
pub use import_panel::import_panel;
pub use notice::notice_modal;
pub use toolbar::toolbar;
