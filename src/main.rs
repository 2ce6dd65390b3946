mod analysis;
mod camera;
mod classifier;
mod config;
mod feed;
mod prefs;
mod recorder;
mod results;
mod session;
mod ui;
mod web;

use crate::camera::CameraRig;
use crate::classifier::{Classifier, HttpClassifier};
use crate::config::AppConfig;
use crate::feed::{DetectionHistory, LogFeed, PanelEvent};
use crate::prefs::PrefStore;
use crate::recorder::{RECORD_DURATION_MS, RecorderEvent};
use crate::session::{MediaBlob, Session};
use crate::web::AppState;
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Arc::new(AppConfig::from_env());

    tracing::info!(
        "Starting faunascope on {} (classifier: {})",
        config.http_bind,
        config.classifier_url
    );

    let (events_tx, _) = broadcast::channel(64);
    let feed = LogFeed::new(events_tx.clone());
    let history = DetectionHistory::new();
    let session = Arc::new(RwLock::new(Session::default()));
    let recording = Arc::new(AtomicBool::new(false));
    let scanning = Arc::new(AtomicBool::new(false));
    let prefs = PrefStore::load(config.prefs_path.clone());
    let classifier: Arc<dyn Classifier> = Arc::new(HttpClassifier::new(&config.classifier_url));
    let camera = CameraRig::spawn(config.camera_index);

    let (recorder_tx, mut recorder_rx) = mpsc::unbounded_channel::<RecorderEvent>();

    let pump_session = Arc::clone(&session);
    let pump_recording = Arc::clone(&recording);
    let pump_feed = feed.clone();
    let pump_events = events_tx.clone();
    let recorder_pump = tokio::spawn(async move {
        while let Some(event) = recorder_rx.recv().await {
            match event {
                RecorderEvent::Progress { elapsed_ms } => {
                    let percent = (elapsed_ms as f64 / RECORD_DURATION_MS as f64) * 100.0;
                    let remaining_secs =
                        RECORD_DURATION_MS.saturating_sub(elapsed_ms) as f64 / 1000.0;
                    let _ = pump_events.send(PanelEvent::RecordingProgress {
                        percent,
                        remaining_secs,
                    });
                }
                RecorderEvent::Finished { wav } => {
                    pump_session.write().await.recorded_audio =
                        Some(MediaBlob::new(wav, "sample.wav", "audio/wav"));
                    pump_recording.store(false, Ordering::SeqCst);
                    pump_feed.success("AUDIO SAMPLE CAPTURED — 5s BUFFER");
                    let _ = pump_events.send(PanelEvent::RecordingDone);
                }
                RecorderEvent::Failed { reason } => {
                    pump_recording.store(false, Ordering::SeqCst);
                    tracing::warn!("Recording aborted: {reason}");
                    pump_feed.error("MICROPHONE ACCESS DENIED");
                    let _ = pump_events.send(PanelEvent::RecordingFailed);
                }
            }
        }
    });

    let state = AppState {
        config,
        session,
        recording,
        scanning,
        feed,
        history,
        classifier,
        camera,
        prefs,
        events: events_tx,
        recorder_tx,
    };

    state.feed.info("FIELD UNIT ONLINE — AWAITING COMMANDS");
    web::serve(state).await?;

    recorder_pump.abort();
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}
