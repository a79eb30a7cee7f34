use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use crate::domain::{LanguageHint, RESPONSE_AUDIO_MIME, UploadedAudio};
use crate::presentation::state::AppState;

use super::error::error_response;

const FILE_FIELD: &str = "file";
const LANGUAGE_FIELD: &str = "language";

// RFC 3986 unreserved characters stay literal.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Deserialize)]
pub struct UploadAudioQuery {
    pub language: Option<String>,
}

/// `POST /upload-audio/`: multipart `file` (+ optional `language`), answers
/// with the spoken reply as `audio/mpeg`.
#[tracing::instrument(skip(state, query, multipart))]
pub async fn upload_audio_handler(
    State(state): State<AppState>,
    Query(query): Query<UploadAudioQuery>,
    mut multipart: Multipart,
) -> Response {
    let mut file: Option<(String, Vec<Bytes>)> = None;
    let mut language_field: Option<String> = None;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    tracing::warn!("Upload without filename");
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        "Uploaded file has no filename",
                    );
                };

                let mut chunks = Vec::new();
                loop {
                    match field.chunk().await {
                        Ok(Some(chunk)) => chunks.push(chunk),
                        Ok(None) => break,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to read file bytes");
                            return error_response(
                                StatusCode::BAD_REQUEST,
                                format!("Failed to read file: {}", e),
                            );
                        }
                    }
                }
                file = Some((filename, chunks));
            }
            Some(LANGUAGE_FIELD) => match field.text().await {
                Ok(text) => language_field = Some(text),
                Err(e) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read language field: {}", e),
                    );
                }
            },
            _ => continue,
        }
    }

    let Some((filename, chunks)) = file else {
        tracing::warn!("Upload request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    let language = query
        .language
        .or(language_field)
        .and_then(|raw| LanguageHint::parse(&raw));

    let upload = UploadedAudio::new(filename, chunks, language);
    tracing::debug!(
        filename = %upload.original_filename,
        bytes = upload.size_bytes(),
        language = ?upload.language,
        "Audio upload received"
    );

    let audio = match state.pipeline.process(upload).await {
        Ok(audio) => audio,
        Err(e) => return e.into_response(),
    };

    let body = match tokio::fs::read(&audio.path).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, path = %audio.path.display(), "Failed to read reply audio");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read reply audio: {}", e),
            );
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, RESPONSE_AUDIO_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(audio.file_name()),
            ),
        ],
        body,
    )
        .into_response()
}

/// Names that need escaping go in the RFC 5987 `filename*` form so the
/// header stays ASCII.
pub fn content_disposition(file_name: &str) -> String {
    let encoded = utf8_percent_encode(file_name, FILENAME_ENCODE_SET).to_string();
    if encoded == file_name {
        format!("attachment; filename=\"{}\"", file_name)
    } else {
        format!("attachment; filename*=utf-8''{}", encoded)
    }
}
