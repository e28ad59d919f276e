use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};

/// Size of the slices a file part is streamed in; progress is reported per slice.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Callback receiving upload progress as a whole percentage, 0 to 100.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Multipart body kept in owned form so a retried call can rebuild it.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<UploadFile>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, file: UploadFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes.len() as u64).sum()
    }
}

/// `loaded / total` as a percentage rounded to the nearest integer.
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let loaded = loaded.min(total);
    ((loaded * 100 + total / 2) / total) as u8
}

struct ProgressTracker {
    loaded: AtomicU64,
    total: u64,
    on_progress: ProgressFn,
}

impl ProgressTracker {
    fn advance(&self, bytes: usize) {
        let loaded = self.loaded.fetch_add(bytes as u64, Ordering::SeqCst) + bytes as u64;
        (self.on_progress)(percent(loaded, self.total));
    }
}

/// Build the reqwest multipart body, streaming file parts through the
/// progress tracker when a callback is given.
pub(crate) fn build_form(form: &UploadForm, on_progress: Option<ProgressFn>) -> ApiResult<Form> {
    let tracker = on_progress.map(|on_progress| {
        Arc::new(ProgressTracker {
            loaded: AtomicU64::new(0),
            total: form.total_bytes(),
            on_progress,
        })
    });

    let mut multipart = Form::new();
    for (name, value) in &form.fields {
        multipart = multipart.text(name.clone(), value.clone());
    }

    for file in &form.files {
        let length = file.bytes.len() as u64;
        let body = match &tracker {
            Some(tracker) => {
                let tracker = Arc::clone(tracker);
                let chunks: Vec<Vec<u8>> = file
                    .bytes
                    .chunks(UPLOAD_CHUNK_SIZE)
                    .map(<[u8]>::to_vec)
                    .collect();
                let stream = futures::stream::iter(chunks).map(move |chunk| {
                    tracker.advance(chunk.len());
                    Ok::<_, std::io::Error>(chunk)
                });
                Body::wrap_stream(stream)
            }
            None => Body::from(file.bytes.clone()),
        };

        let mut part = Part::stream_with_length(body, length).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ApiError::request_setup(format!("Invalid content type: {}", e)))?;
        }
        multipart = multipart.part(file.field.clone(), part);
    }

    Ok(multipart)
}
