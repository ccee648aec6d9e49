use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub filename: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: &'static str,
}

/// Why an upload was refused.
#[derive(Debug)]
pub enum UploadError {
    /// The request was not a readable multipart form.
    InvalidForm(String),
    /// The form had no `file` field with a filename.
    MissingFile,
    /// Reading the body failed part-way.
    Read(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            UploadError::InvalidForm(_) | UploadError::MissingFile => {
                (StatusCode::UNPROCESSABLE_ENTITY, "No file uploaded")
            }
            UploadError::Read(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Upload failed"),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// `POST /upload_pdf/`: read the whole file and echo its name.
pub async fn upload_pdf(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "rejected upload form");
        UploadError::InvalidForm(e.to_string())
    })?;

    let file = read_file_field(multipart).await.inspect_err(|e| {
        if let UploadError::Read(msg) = e {
            tracing::error!(error = %msg, "upload error");
        }
    })?;

    tracing::info!(
        filename = %file.filename,
        bytes = file.data.len(),
        is_pdf = pdfchat_core::is_pdf(&file.filename, &file.data),
        "uploaded PDF"
    );
    Ok(Json(UploadResponse {
        filename: file.filename,
    }))
}

/// Pull the `file` field out of the form, skipping anything else.
async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Read(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(str::to_string);

        match (name.as_str(), filename) {
            (FILE_FIELD, Some(filename)) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Read(format!("Failed to read file data: {}", e)))?
                    .to_vec();
                file = Some(UploadedFile { filename, data });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or(UploadError::MissingFile)
}
