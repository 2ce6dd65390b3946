use crate::classifier::{ScanPayload, demo_detection};
use crate::feed::PanelEvent;
use crate::results::{ScanView, present};
use crate::web::AppState;
use std::sync::atomic::Ordering;

/// Drives one scan cycle end-to-end. Returns `None` when a scan is
/// already in flight; the caller treats that as a no-op. Every other
/// path (remote result or demo fallback) produces a view, and the
/// scanning flag is cleared on all of them.
pub async fn run_scan(state: &AppState) -> Option<ScanView> {
    if state.scanning.swap(true, Ordering::SeqCst) {
        return None;
    }
    let _ = state.events.send(PanelEvent::Scanning { active: true });

    let (mode, scan_number, payload) = {
        let mut session = state.session.write().await;
        let number = session.next_scan_number();
        let payload = ScanPayload {
            audio: session.audio_payload().cloned(),
            image: session.image_payload().cloned(),
        };
        (session.mode, number, payload)
    };

    state.feed.warn(format!(
        "SCAN #{scan_number} INITIATED — MODE: {}",
        mode.label()
    ));
    state.feed.info("UPLINK TO CLASSIFIER NODE...");

    let detection = match state.classifier.analyze(mode, &payload).await {
        Ok(detection) => detection,
        Err(err) => {
            tracing::warn!("Classifier call failed, serving demo data: {err}");
            state.feed.warn("DEMO MODE — CLASSIFIER OFFLINE");
            demo_detection(mode)
        }
    };

    let view = present(&detection, mode, scan_number, &state.feed, &state.history);

    state.scanning.store(false, Ordering::SeqCst);
    let _ = state.events.send(PanelEvent::Scanning { active: false });
    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, HttpClassifier};
    use crate::config::AppConfig;
    use crate::feed::{DetectionHistory, HISTORY_CAPACITY, LogFeed, LogLevel};
    use crate::session::{MediaBlob, Mode, Session};
    use crate::{camera::CameraRig, prefs::PrefStore};
    use axum::extract::Multipart;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::{RwLock, broadcast, mpsc};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn state_with(classifier: Arc<dyn Classifier>) -> AppState {
        let (events, _) = broadcast::channel(64);
        let (recorder_tx, _recorder_rx) = mpsc::unbounded_channel();
        AppState {
            config: Arc::new(AppConfig::from_env()),
            session: Arc::new(RwLock::new(Session::default())),
            recording: Arc::new(AtomicBool::new(false)),
            scanning: Arc::new(AtomicBool::new(false)),
            feed: LogFeed::new(events.clone()),
            history: DetectionHistory::new(),
            classifier,
            camera: CameraRig::spawn(0),
            prefs: PrefStore::load(std::env::temp_dir().join("faunascope-test-prefs.json")),
            events,
            recorder_tx,
        }
    }

    fn offline_state() -> AppState {
        // Port 1 is never bound; calls fail fast with a refused connection.
        state_with(Arc::new(HttpClassifier::new("http://127.0.0.1:1")))
    }

    /// Echoes the received multipart parts back through the response
    /// fields so tests can see exactly which bytes went on the wire.
    async fn echo_parts(mut multipart: Multipart) -> Json<serde_json::Value> {
        let mut audio = "absent".to_string();
        let mut image = "absent".to_string();
        while let Some(field) = multipart.next_field().await.expect("read field") {
            let name = field.name().unwrap_or("").to_string();
            let text = field.text().await.expect("field text");
            match name.as_str() {
                "audio" => audio = text,
                "image" => image = text,
                _ => {}
            }
        }
        Json(serde_json::json!({
            "species": audio,
            "type": image,
            "confidence": 0.5,
        }))
    }

    #[tokio::test]
    async fn fusion_scan_against_http_500_serves_the_demo_peacock() {
        let router = Router::new().route(
            "/analyze/fusion",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_stub(router).await;
        let state = state_with(Arc::new(HttpClassifier::new(&base)));
        state.session.write().await.set_mode(Mode::Fusion);

        let view = run_scan(&state).await.expect("scan completes");
        assert_eq!(view.species, "INDIAN PEACOCK");
        assert_eq!(view.threat, "VERIFIED");
        assert!((view.bars.fusion - 95.0).abs() < 1e-9);

        let warned = state
            .feed
            .snapshot()
            .iter()
            .any(|e| e.level == LogLevel::Warn && e.message.contains("DEMO MODE"));
        assert!(warned, "demo-mode warning must be logged");
        assert_eq!(state.history.len(), 1);
        assert!(!state.scanning.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn second_concurrent_scan_is_a_noop() {
        let state = offline_state();
        state.scanning.store(true, Ordering::SeqCst);

        assert!(run_scan(&state).await.is_none());
        assert_eq!(state.session.read().await.scan_count, 0);
        assert!(state.history.is_empty());
        // The guard belongs to the scan already in flight; a rejected
        // call must not clear it.
        assert!(state.scanning.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn uploads_beat_device_captures_on_the_wire() {
        let router = Router::new().route("/analyze/audio", post(echo_parts));
        let base = spawn_stub(router).await;
        let state = state_with(Arc::new(HttpClassifier::new(&base)));

        {
            let mut session = state.session.write().await;
            session.recorded_audio =
                Some(MediaBlob::new(b"device-audio".to_vec(), "sample.wav", "audio/wav"));
            session.audio_upload =
                Some(MediaBlob::new(b"upload-audio".to_vec(), "bird.wav", "audio/wav"));
            session.captured_photo =
                Some(MediaBlob::new(b"device-photo".to_vec(), "frame.jpg", "image/jpeg"));
        }

        let view = run_scan(&state).await.expect("scan completes");
        // species echoes the audio part, class label echoes the image part
        assert_eq!(view.species, "UPLOAD-AUDIO");
        assert_eq!(view.class_label, "CLASS: device-photo");
    }

    #[tokio::test]
    async fn zero_media_scans_are_forwarded_as_is() {
        let router = Router::new().route("/analyze/audio", post(echo_parts));
        let base = spawn_stub(router).await;
        let state = state_with(Arc::new(HttpClassifier::new(&base)));

        let view = run_scan(&state).await.expect("scan completes");
        assert_eq!(view.species, "ABSENT");
        assert_eq!(view.class_label, "CLASS: absent");
    }

    #[tokio::test]
    async fn history_is_bounded_after_eleven_scans() {
        let state = offline_state();
        for _ in 0..=HISTORY_CAPACITY {
            run_scan(&state).await.expect("scan completes");
        }

        assert_eq!(state.history.len(), HISTORY_CAPACITY);
        assert_eq!(
            state.session.read().await.scan_count,
            (HISTORY_CAPACITY + 1) as u64
        );
    }

    #[tokio::test]
    async fn scan_numbers_increment_once_per_initiated_scan() {
        let state = offline_state();
        run_scan(&state).await.expect("first scan");
        let second = run_scan(&state).await.expect("second scan");
        assert_eq!(second.scan_number, 2);
    }
}
