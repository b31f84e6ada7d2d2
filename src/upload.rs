use js_sys::Promise;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileReader};

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
pub const IMAGE_MIME_PREFIX: &str = "image/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Photo size must be less than 5MB")]
    TooLarge { size: u64 },
    #[error("Please upload an image file")]
    NotAnImage { mime: String },
    #[error("Error reading file. Please try again.")]
    Read(String),
}

impl UploadError {
    pub fn label(&self) -> &'static str {
        match self {
            UploadError::TooLarge { .. } => "too_large",
            UploadError::NotAnImage { .. } => "not_an_image",
            UploadError::Read(_) => "read_failed",
        }
    }
}

/// Photo accepted for display, kept as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto(Rc<str>);

impl UploadedPhoto {
    pub fn new(data_url: impl Into<Rc<str>>) -> Self {
        Self(data_url.into())
    }

    pub fn data_url(&self) -> &str {
        &self.0
    }
}

/// Size is checked before type, so an oversized non-image reports the size.
pub fn validate_photo(size: u64, mime: &str) -> Result<(), UploadError> {
    if size > MAX_PHOTO_BYTES {
        return Err(UploadError::TooLarge { size });
    }
    if !mime.starts_with(IMAGE_MIME_PREFIX) {
        return Err(UploadError::NotAnImage {
            mime: mime.to_string(),
        });
    }
    Ok(())
}

pub fn validate_file(file: &File) -> Result<(), UploadError> {
    // Blob sizes are whole bytes reported as f64.
    validate_photo(file.size().max(0.0) as u64, &file.type_())
}

fn js_error_text(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub async fn read_as_data_url(file: &File) -> Result<UploadedPhoto, UploadError> {
    let reader = FileReader::new().map_err(|err| UploadError::Read(js_error_text(&err)))?;

    let pending = Promise::new(&mut |resolve, reject| {
        reader.set_onload(Some(&resolve));
        reader.set_onerror(Some(&reject));
    });

    reader
        .read_as_data_url(file)
        .map_err(|err| UploadError::Read(js_error_text(&err)))?;

    let outcome = JsFuture::from(pending).await;
    reader.set_onload(None);
    reader.set_onerror(None);
    outcome.map_err(|err| UploadError::Read(js_error_text(&err)))?;

    let result = reader
        .result()
        .map_err(|err| UploadError::Read(js_error_text(&err)))?;
    let data_url = result
        .dyn_into::<js_sys::JsString>()
        .map_err(|_| UploadError::Read("reader result is not a string".to_string()))?;

    Ok(UploadedPhoto::new(String::from(data_url)))
}
