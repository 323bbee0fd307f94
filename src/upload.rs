//! Multipart handling: spool the CSV file part to disk, decode it, extract the
//! `text` column; read plain form fields sent as multipart.

use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use actix_multipart::Multipart;
use actix_web::web;
use futures_util::StreamExt;
use tempfile::{Builder, TempDir};
use uuid::Uuid;

use crate::error::ApiError;

/// Multipart part that carries the CSV.
pub const FILE_FIELD: &str = "file";
/// Column holding the texts to classify.
pub const TEXT_COLUMN: &str = "text";

/// An uploaded file on disk; removed together with its directory on drop.
pub struct SpooledUpload {
    _dir: TempDir,
    path: PathBuf,
}

impl SpooledUpload {
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Write the `file` part of `payload` to a temporary file.
///
/// Other parts are drained and ignored. Returns `MissingFile` when no part is
/// named `file`.
pub async fn spool_file_field(mut payload: Multipart) -> Result<SpooledUpload, ApiError> {
    let upload_dir = Builder::new().prefix("csv_uploads").tempdir()?;
    let mut spooled: Option<PathBuf> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::Upload(e.to_string()))?;
        let is_file = field.content_disposition().get_name() == Some(FILE_FIELD);
        if !is_file || spooled.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
            }
            continue;
        }

        let filepath = upload_dir.path().join(format!("{}.csv", Uuid::new_v4()));
        let filepath_for_closure = filepath.clone();
        let mut f = web::block(move || File::create(&filepath_for_closure)).await??;

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
            f = web::block(move || f.write_all(&data).map(|_| f)).await??;
        }
        tracing::debug!("Spooled upload to {}", filepath.display());
        spooled = Some(filepath);
    }

    match spooled {
        Some(path) => Ok(SpooledUpload {
            _dir: upload_dir,
            path,
        }),
        None => Err(ApiError::MissingFile(FILE_FIELD)),
    }
}

/// Read the value of the multipart part called `name`, draining the rest.
///
/// Returns `None` when no such part was sent.
pub async fn read_form_field(
    mut payload: Multipart,
    name: &str,
) -> Result<Option<String>, ApiError> {
    let mut value: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::Upload(e.to_string()))?;
        let wanted = value.is_none() && field.content_disposition().get_name() == Some(name);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
            if wanted {
                bytes.extend_from_slice(&data);
            }
        }
        if wanted {
            value = Some(bytes);
        }
    }

    Ok(value.map(|bytes| decode_upload(&bytes)))
}

/// Decode upload bytes as UTF-8, falling back to ISO-8859-1 on invalid UTF-8.
///
/// Latin-1 maps every byte to a code point, so the fallback cannot fail.
pub fn decode_upload(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(e) => {
            tracing::warn!("Upload is not valid UTF-8 ({}); decoding as ISO-8859-1", e);
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Values of the `text` column, in file order.
///
/// Rows with more cells than the header are skipped with a warning. Rows that
/// stop before the `text` cell yield an empty text.
pub fn read_text_column(data: &str) -> Result<Vec<String>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());
    let headers = reader.headers()?;
    let width = headers.len();
    let column = headers
        .iter()
        .position(|header| header == TEXT_COLUMN)
        .ok_or(ApiError::MissingColumn(TEXT_COLUMN))?;

    let mut texts = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            tracing::warn!(
                "Skipping CSV line {}: expected {} fields, saw {}",
                record.position().map_or(0, |p| p.line()),
                width,
                record.len()
            );
            continue;
        }
        texts.push(record.get(column).unwrap_or_default().to_string());
    }
    Ok(texts)
}
