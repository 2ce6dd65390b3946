use crate::analysis;
use crate::camera::{CameraError, CameraRig};
use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::feed::{DetectionHistory, HistoryEntry, LogEntry, LogFeed, PanelEvent};
use crate::prefs::{PrefStore, Theme};
use crate::recorder::{self, RECORD_DURATION_MS, RecorderEvent};
use crate::results::ScanView;
use crate::session::{MediaBlob, Mode, SectionVisibility, Session};
use crate::ui;
use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{DefaultBodyLimit, Multipart, State, WebSocketUpgrade};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;
use tokio::sync::{RwLock, broadcast, mpsc};
use tower_http::trace::TraceLayer;

const UPLOAD_LIMIT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: Arc<RwLock<Session>>,
    pub recording: Arc<AtomicBool>,
    pub scanning: Arc<AtomicBool>,
    pub feed: LogFeed,
    pub history: DetectionHistory,
    pub classifier: Arc<dyn Classifier>,
    pub camera: CameraRig,
    pub prefs: PrefStore,
    pub events: broadcast::Sender<PanelEvent>,
    pub recorder_tx: mpsc::UnboundedSender<RecorderEvent>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(status))
        .route("/api/mode", post(set_mode))
        .route("/api/record", post(start_recording))
        .route("/api/audio-file", post(upload_audio))
        .route("/api/image-file", post(upload_image))
        .route("/api/camera/open", post(camera_open))
        .route("/api/camera/capture", post(camera_capture))
        .route("/api/camera/close", post(camera_close))
        .route("/api/camera/frame", get(camera_frame))
        .route("/api/audio/preview", get(audio_preview))
        .route("/api/image/preview", get(image_preview))
        .route("/api/scan", post(scan))
        .route("/api/logs", get(logs))
        .route("/api/logs/clear", post(clear_logs))
        .route("/api/history", get(history))
        .route("/api/theme", get(theme).post(set_theme))
        .route("/ws/events", get(ws_events))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = state.config.http_bind.parse()?;
    let router = router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Control panel listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(graceful_shutdown())
        .await?;

    Ok(())
}

async fn graceful_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down http server");
}

async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_html(state.prefs.theme()))
}

#[derive(Serialize)]
struct StatusResponse {
    mode: Mode,
    mode_label: &'static str,
    sections: SectionVisibility,
    recording: bool,
    scanning: bool,
    camera_live: bool,
    has_audio: bool,
    has_image: bool,
    scan_count: u64,
    theme: Theme,
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let camera_live = state.camera.is_live().await;
    let session = state.session.read().await;
    Json(StatusResponse {
        mode: session.mode,
        mode_label: session.mode.label(),
        sections: session.mode.visibility(),
        recording: state.recording.load(Ordering::SeqCst),
        scanning: state.scanning.load(Ordering::SeqCst),
        camera_live,
        has_audio: session.audio_payload().is_some(),
        has_image: session.image_payload().is_some(),
        scan_count: session.scan_count,
        theme: state.prefs.theme(),
    })
}

#[derive(Deserialize)]
struct ModeRequest {
    mode: Mode,
}

#[derive(Serialize)]
struct ModeResponse {
    mode: Mode,
    mode_label: &'static str,
    sections: SectionVisibility,
}

async fn set_mode(
    State(state): State<AppState>,
    Json(body): Json<ModeRequest>,
) -> impl IntoResponse {
    let sections = state.session.write().await.set_mode(body.mode);
    state
        .feed
        .info(format!("MODE SWITCHED → {}", body.mode.label()));
    Json(ModeResponse {
        mode: body.mode,
        mode_label: body.mode.label(),
        sections,
    })
}

#[derive(Serialize)]
struct RecordResponse {
    started: bool,
    duration_ms: u64,
}

async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    if state.recording.swap(true, Ordering::SeqCst) {
        return Json(RecordResponse {
            started: false,
            duration_ms: RECORD_DURATION_MS,
        });
    }

    state.feed.warn("RECORDING ACOUSTIC SAMPLE...");
    let _recording_thread = recorder::spawn_recording(state.recorder_tx.clone());
    Json(RecordResponse {
        started: true,
        duration_ms: RECORD_DURATION_MS,
    })
}

#[derive(Serialize)]
struct UploadResponse {
    file_name: String,
    bytes: usize,
}

async fn upload_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let blob = read_upload(multipart, "audio", "application/octet-stream").await?;
    let response = UploadResponse {
        file_name: blob.file_name.clone(),
        bytes: blob.bytes.len(),
    };

    state.session.write().await.audio_upload = Some(blob);
    state
        .feed
        .success(format!("AUDIO FILE LOADED: {}", response.file_name));
    Ok(Json(response))
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let blob = read_upload(multipart, "image", "image/jpeg").await?;
    let response = UploadResponse {
        file_name: blob.file_name.clone(),
        bytes: blob.bytes.len(),
    };

    // A file upload supersedes a live camera session.
    if state.camera.close().await {
        state.feed.info("OPTICAL SENSOR RELEASED — FILE INPUT ACTIVE");
    }
    state.session.write().await.image_upload = Some(blob);
    state
        .feed
        .success(format!("IMAGE FILE LOADED: {}", response.file_name));
    Ok(Json(response))
}

async fn read_upload(
    mut multipart: Multipart,
    expected: &str,
    default_mime: &str,
) -> Result<MediaBlob, (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| (StatusCode::BAD_REQUEST, format!("Invalid upload: {err}")))?
    {
        if field.name() != Some(expected) {
            continue;
        }
        let file_name = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let mime = field
            .content_type()
            .unwrap_or(default_mime)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| (StatusCode::BAD_REQUEST, format!("Invalid upload: {err}")))?;
        return Ok(MediaBlob::new(bytes.to_vec(), file_name, mime));
    }

    Err((
        StatusCode::BAD_REQUEST,
        format!("Missing multipart field '{expected}'"),
    ))
}

#[derive(Serialize)]
struct CameraStateResponse {
    live: bool,
}

async fn camera_open(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.camera.open().await {
        Ok(()) => {
            state.feed.success("OPTICAL SENSOR ONLINE");
            Ok(Json(CameraStateResponse { live: true }))
        }
        Err(err) => {
            state.feed.error("CAMERA ACCESS DENIED");
            Err(camera_failure(err))
        }
    }
}

#[derive(Serialize)]
struct CaptureResponse {
    captured: bool,
    camera_live: bool,
}

async fn camera_capture(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.camera.capture().await {
        Ok(jpeg) => {
            state.session.write().await.captured_photo =
                Some(MediaBlob::new(jpeg, "frame.jpg", "image/jpeg"));
            state.feed.success("PHOTO CAPTURED — OPTICAL BUFFER SAVED");
            Ok(Json(CaptureResponse {
                captured: true,
                camera_live: false,
            }))
        }
        Err(CameraError::NoActiveCamera) => {
            state.feed.warn("OPEN CAMERA FIRST");
            Err(camera_failure(CameraError::NoActiveCamera))
        }
        Err(err) => {
            state.feed.error(format!("PHOTO CAPTURE FAILED: {err}"));
            Err(camera_failure(err))
        }
    }
}

async fn camera_close(State(state): State<AppState>) -> impl IntoResponse {
    if state.camera.close().await {
        state.feed.info("OPTICAL SENSOR OFFLINE");
    }
    Json(CameraStateResponse { live: false })
}

async fn camera_frame(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let jpeg = state.camera.frame().await.map_err(camera_failure)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg))
}

fn camera_failure(err: CameraError) -> (StatusCode, String) {
    let status = match err {
        CameraError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        CameraError::NoActiveCamera => StatusCode::CONFLICT,
        CameraError::Frame(_) | CameraError::Offline => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

async fn audio_preview(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = state.session.read().await;
    let blob = session.audio_payload().ok_or(StatusCode::NOT_FOUND)?;
    Ok((
        [(header::CONTENT_TYPE, blob.mime.clone())],
        blob.bytes.clone(),
    ))
}

async fn image_preview(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = state.session.read().await;
    let blob = session.image_payload().ok_or(StatusCode::NOT_FOUND)?;
    Ok((
        [(header::CONTENT_TYPE, blob.mime.clone())],
        blob.bytes.clone(),
    ))
}

#[derive(Serialize)]
struct ScanResponse {
    busy: bool,
    result: Option<ScanView>,
}

async fn scan(State(state): State<AppState>) -> impl IntoResponse {
    match analysis::run_scan(&state).await {
        Some(view) => Json(ScanResponse {
            busy: false,
            result: Some(view),
        }),
        None => Json(ScanResponse {
            busy: true,
            result: None,
        }),
    }
}

#[derive(Serialize)]
struct LogsResponse {
    entries: Vec<LogEntry>,
}

async fn logs(State(state): State<AppState>) -> impl IntoResponse {
    Json(LogsResponse {
        entries: state.feed.snapshot(),
    })
}

#[derive(Serialize)]
struct ClearResponse {
    cleared: bool,
}

async fn clear_logs(State(state): State<AppState>) -> impl IntoResponse {
    state.feed.clear();
    Json(ClearResponse { cleared: true })
}

#[derive(Serialize)]
struct HistoryResponse {
    entries: Vec<HistoryEntry>,
}

async fn history(State(state): State<AppState>) -> impl IntoResponse {
    Json(HistoryResponse {
        entries: state.history.snapshot(),
    })
}

#[derive(Serialize)]
struct ThemeResponse {
    theme: Theme,
}

async fn theme(State(state): State<AppState>) -> impl IntoResponse {
    Json(ThemeResponse {
        theme: state.prefs.theme(),
    })
}

#[derive(Deserialize)]
struct ThemeRequest {
    theme: Theme,
}

async fn set_theme(
    State(state): State<AppState>,
    Json(body): Json<ThemeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.prefs.set_theme(body.theme).map_err(|err| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to persist theme: {err}"),
        )
    })?;
    Ok(Json(ThemeResponse { theme: body.theme }))
}

async fn ws_events(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: AppState) {
    let mut rx = state.events.subscribe();
    while let Ok(event) = rx.recv().await {
        let payload = match serde_json::to_string(&event) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if socket.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::HttpClassifier;

    fn test_state() -> AppState {
        let (events, _) = broadcast::channel(64);
        let (recorder_tx, _recorder_rx) = mpsc::unbounded_channel();
        AppState {
            config: Arc::new(AppConfig::from_env()),
            session: Arc::new(RwLock::new(Session::default())),
            recording: Arc::new(AtomicBool::new(false)),
            scanning: Arc::new(AtomicBool::new(false)),
            feed: LogFeed::new(events.clone()),
            history: DetectionHistory::new(),
            classifier: Arc::new(HttpClassifier::new("http://127.0.0.1:1")),
            camera: CameraRig::spawn(0),
            prefs: PrefStore::load(std::env::temp_dir().join("faunascope-web-prefs.json")),
            events,
            recorder_tx,
        }
    }

    async fn spawn_panel(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let app = router(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn mode_switch_reports_the_visibility_contract() {
        let base = spawn_panel(test_state()).await;
        let client = reqwest::Client::new();

        let body: serde_json::Value = client
            .post(format!("{base}/api/mode"))
            .json(&serde_json::json!({"mode": "fusion"}))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json");

        assert_eq!(body["mode_label"], "FUSION");
        assert_eq!(body["sections"]["audio"], true);
        assert_eq!(body["sections"]["image"], true);
    }

    #[tokio::test]
    async fn status_reflects_initial_defaults() {
        let base = spawn_panel(test_state()).await;

        let body: serde_json::Value = reqwest::get(format!("{base}/api/status"))
            .await
            .expect("request")
            .json()
            .await
            .expect("json");

        assert_eq!(body["mode"], "audio");
        assert_eq!(body["sections"]["image"], false);
        assert_eq!(body["recording"], false);
        assert_eq!(body["scanning"], false);
        assert_eq!(body["scan_count"], 0);
        assert_eq!(body["theme"], "light");
    }

    #[tokio::test]
    async fn audio_upload_lands_in_the_upload_slot() {
        let state = test_state();
        let base = spawn_panel(state.clone()).await;

        let part = reqwest::multipart::Part::bytes(b"chirp".to_vec())
            .file_name("chirp.wav")
            .mime_str("audio/wav")
            .expect("part");
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = reqwest::Client::new()
            .post(format!("{base}/api/audio-file"))
            .multipart(form)
            .send()
            .await
            .expect("request");
        assert!(response.status().is_success());

        let session = state.session.read().await;
        let blob = session.audio_upload.as_ref().expect("slot filled");
        assert_eq!(blob.bytes, b"chirp");
        assert_eq!(blob.file_name, "chirp.wav");
        assert!(session.recorded_audio.is_none());
    }

    #[tokio::test]
    async fn previews_404_until_media_exists() {
        let base = spawn_panel(test_state()).await;

        let audio = reqwest::get(format!("{base}/api/audio/preview"))
            .await
            .expect("request");
        assert_eq!(audio.status(), reqwest::StatusCode::NOT_FOUND);

        let image = reqwest::get(format!("{base}/api/image/preview"))
            .await
            .expect("request");
        assert_eq!(image.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn capture_without_camera_leaves_photo_slot_empty() {
        let state = test_state();
        let base = spawn_panel(state.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/camera/capture"))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

        assert!(state.session.read().await.captured_photo.is_none());
        let warned = state
            .feed
            .snapshot()
            .iter()
            .any(|e| e.message == "OPEN CAMERA FIRST");
        assert!(warned);
    }

    #[tokio::test]
    async fn clearing_logs_is_destructive() {
        let state = test_state();
        state.feed.info("about to vanish");
        let base = spawn_panel(state.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/logs/clear"))
            .send()
            .await
            .expect("request");
        assert!(response.status().is_success());

        let entries = state.feed.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "LOG CLEARED");
    }
}
