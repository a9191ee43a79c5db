//! Browser delivery of exports: object-URL downloads and the Web Share API.

use eframe::wasm_bindgen::{JsCast, JsValue};
use js_sys::{Array, Function, Object, Reflect, Uint8Array};

use super::{ExportError, ExportFormat, ExportResult};

const SHARE_TITLE: &str = "My Floorplan";
const SHARE_TEXT: &str = "Check out this floorplan I created!";

fn js_error(err: JsValue) -> ExportError {
    ExportError::Browser(format!("{err:?}"))
}

fn byte_parts(bytes: &[u8]) -> Array {
    Array::of1(&Uint8Array::from(bytes))
}

/// Offer `bytes` to the browser as a download named `file_name`.
pub(super) fn download(bytes: &[u8], format: ExportFormat, file_name: &str) -> ExportResult<()> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ExportError::Unsupported)?;

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(format.mime_type());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&byte_parts(bytes), &options)
        .map_err(js_error)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| ExportError::Browser("created element is not an anchor".to_owned()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(js_error)?;
    Ok(())
}

/// Open the system share sheet with the PNG attached.
///
/// `navigator.share` is looked up at runtime; browsers without it, or that
/// refuse to share files, report [`ExportError::ShareUnsupported`].
pub(super) fn share_png(png: &[u8], file_name: &str) -> ExportResult<()> {
    let navigator: JsValue = web_sys::window()
        .ok_or(ExportError::ShareUnsupported)?
        .navigator()
        .into();

    let options = web_sys::FilePropertyBag::new();
    options.set_type(ExportFormat::Png.mime_type());
    let file = web_sys::File::new_with_u8_array_sequence_and_options(&byte_parts(png), file_name, &options)
        .map_err(js_error)?;

    let data = Object::new();
    Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(SHARE_TITLE)).map_err(js_error)?;
    Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(SHARE_TEXT)).map_err(js_error)?;
    Reflect::set(&data, &JsValue::from_str("files"), &Array::of1(&file)).map_err(js_error)?;

    let method = |name: &str| {
        Reflect::get(&navigator, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    };
    let (Some(can_share), Some(share)) = (method("canShare"), method("share")) else {
        return Err(ExportError::ShareUnsupported);
    };
    if !can_share.call1(&navigator, &data).map_err(js_error)?.is_truthy() {
        return Err(ExportError::ShareUnsupported);
    }

    let promise: js_sys::Promise = share
        .call1(&navigator, &data)
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| ExportError::Browser("share did not return a promise".to_owned()))?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
            log::warn!("Share was dismissed or failed: {err:?}");
        }
    });
    Ok(())
}
