use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ingest::json_import::{export_to_json, import_from_json};
use crate::ingest::linkedin::parse_linkedin_text;
use crate::ingest::merge::merge_partial;
use crate::ingest::{parse_resume_file, FileFormat, IngestError};
use crate::models::resume::{PartialResumeData, ResumeData};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// Heuristic imports yield a partial résumé; JSON snapshots come back whole.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ImportedData {
    Partial(PartialResumeData),
    Full(Box<ResumeData>),
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub format: FileFormat,
    pub data: ImportedData,
}

#[derive(Debug, Deserialize)]
pub struct LinkedInRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub current: ResumeData,
    pub partial: PartialResumeData,
}

// ────────────────────────────────────────────────────────────────────────────
// File import
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/import
/// Multipart upload with a single `file` field; the filename picks the parser.
pub async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let data = match parse_resume_file(
        &filename,
        &bytes,
        state.pdf.as_ref(),
        state.docx.as_ref(),
        &state.ingest_options(),
    )
    .await
    {
        Ok(partial) => ImportedData::Partial(partial),
        Err(IngestError::JsonPassthrough) => {
            ImportedData::Full(Box::new(import_from_json(&String::from_utf8_lossy(&bytes))?))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ImportResponse {
        format: FileFormat::from_filename(&filename)?,
        data,
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("The file field needs a filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// JSON snapshots, LinkedIn text, apply
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/import/json
pub async fn handle_import_json(body: String) -> Result<Json<ResumeData>, AppError> {
    Ok(Json(import_from_json(&body)?))
}

/// POST /api/v1/import/linkedin
pub async fn handle_import_linkedin(
    Json(req): Json<LinkedInRequest>,
) -> Result<Json<PartialResumeData>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Paste some profile text first".to_string()));
    }
    Ok(Json(parse_linkedin_text(&req.text)))
}

/// POST /api/v1/import/apply
/// Merges an import result into the caller's current résumé.
pub async fn handle_apply_import(Json(req): Json<ApplyRequest>) -> Json<ResumeData> {
    Json(merge_partial(req.current, req.partial))
}

/// POST /api/v1/export
pub async fn handle_export(Json(data): Json<ResumeData>) -> Result<impl IntoResponse, AppError> {
    let body = export_to_json(&data).map_err(anyhow::Error::from)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
