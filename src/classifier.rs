use crate::session::{MediaBlob, Mode};
use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification result as returned by the remote service. Absent
/// fields fall back to the display defaults instead of failing the
/// parse; only a structurally broken body counts as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default = "unknown_species")]
    pub species: String,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub distance: Option<f64>,
}

fn unknown_species() -> String {
    "UNKNOWN".to_string()
}

fn unknown_kind() -> String {
    "—".to_string()
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("network error: {0}")]
    Network(String),

    #[error("classifier returned HTTP {0}")]
    BadStatus(u16),

    #[error("malformed classifier response: {0}")]
    MalformedBody(String),

    #[error("request build failed: {0}")]
    Request(String),
}

/// Media attached to one scan. Either part may be absent; a scan with
/// no media at all is still forwarded as-is.
#[derive(Debug, Default, Clone)]
pub struct ScanPayload {
    pub audio: Option<MediaBlob>,
    pub image: Option<MediaBlob>,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn analyze(&self, mode: Mode, payload: &ScanPayload) -> Result<Detection, ClassifyError>;
}

/// The real remote collaborator: `POST {base}/analyze/{mode}` with
/// optional multipart `audio`/`image` parts. No request timeout is set;
/// the transport's own defaults apply.
pub struct HttpClassifier {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn analyze(&self, mode: Mode, payload: &ScanPayload) -> Result<Detection, ClassifyError> {
        let url = format!("{}/analyze/{}", self.base_url, mode.as_str());

        let mut form = multipart::Form::new();
        if let Some(audio) = &payload.audio {
            form = form.part("audio", blob_part(audio)?);
        }
        if let Some(image) = &payload.image {
            form = form.part("image", blob_part(image)?);
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::BadStatus(status.as_u16()));
        }

        response
            .json::<Detection>()
            .await
            .map_err(|e| ClassifyError::MalformedBody(e.to_string()))
    }
}

fn blob_part(blob: &MediaBlob) -> Result<multipart::Part, ClassifyError> {
    multipart::Part::bytes(blob.bytes.clone())
        .file_name(blob.file_name.clone())
        .mime_str(&blob.mime)
        .map_err(|e| ClassifyError::Request(e.to_string()))
}

/// Canned results substituted whenever the classifier is unreachable.
pub fn demo_detection(mode: Mode) -> Detection {
    match mode {
        Mode::Audio => Detection {
            species: "Indian Sparrow".to_string(),
            kind: "BIRD".to_string(),
            confidence: 0.87,
            distance: Some(18.4),
        },
        Mode::Image => Detection {
            species: "Common Myna".to_string(),
            kind: "BIRD".to_string(),
            confidence: 0.91,
            distance: Some(22.0),
        },
        Mode::Fusion => Detection {
            species: "Indian Peacock".to_string(),
            kind: "BIRD".to_string(),
            confidence: 0.95,
            distance: Some(35.6),
        },
    }
}
