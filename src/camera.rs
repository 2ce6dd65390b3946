use image::codecs::jpeg::JpegEncoder;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera access denied: {0}")]
    PermissionDenied(String),

    #[error("no active camera session")]
    NoActiveCamera,

    #[error("frame capture failed: {0}")]
    Frame(String),

    #[error("camera controller offline")]
    Offline,
}

enum Command {
    Open(oneshot::Sender<Result<(), CameraError>>),
    Frame(oneshot::Sender<Result<Vec<u8>, CameraError>>),
    Capture(oneshot::Sender<Result<Vec<u8>, CameraError>>),
    Close(oneshot::Sender<bool>),
    IsLive(oneshot::Sender<bool>),
}

/// Handle to the camera thread. The device session itself never leaves
/// that thread; handlers talk to it through command/reply channels, so
/// open/capture/close are serialized by construction.
#[derive(Clone)]
pub struct CameraRig {
    tx: mpsc::UnboundedSender<Command>,
}

impl CameraRig {
    pub fn spawn(index: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _camera_thread = std::thread::spawn(move || run(index, rx));
        Self { tx }
    }

    /// Opens a camera session. A second open while one is live is a
    /// no-op success.
    pub async fn open(&self) -> Result<(), CameraError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Open(reply_tx))
            .map_err(|_| CameraError::Offline)?;
        reply_rx.await.map_err(|_| CameraError::Offline)?
    }

    /// One live-preview JPEG frame from the open session.
    pub async fn frame(&self) -> Result<Vec<u8>, CameraError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Frame(reply_tx))
            .map_err(|_| CameraError::Offline)?;
        reply_rx.await.map_err(|_| CameraError::Offline)?
    }

    /// Freezes the current frame and releases the camera session
    /// afterwards (capture-then-release).
    pub async fn capture(&self) -> Result<Vec<u8>, CameraError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Capture(reply_tx))
            .map_err(|_| CameraError::Offline)?;
        reply_rx.await.map_err(|_| CameraError::Offline)?
    }

    /// Releases the session if one is open. Returns whether a session
    /// was actually open; safe to call any time.
    pub async fn close(&self) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(Command::Close(reply_tx)).is_err() {
            return false;
        }
        reply_rx.await.unwrap_or(false)
    }

    pub async fn is_live(&self) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(Command::IsLive(reply_tx)).is_err() {
            return false;
        }
        reply_rx.await.unwrap_or(false)
    }
}

fn run(index: u32, mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut camera: Option<Camera> = None;

    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            Command::Open(reply) => {
                let result = if camera.is_some() {
                    Ok(())
                } else {
                    match open_camera(index) {
                        Ok(cam) => {
                            camera = Some(cam);
                            Ok(())
                        }
                        Err(err) => Err(err),
                    }
                };
                let _ = reply.send(result);
            }
            Command::Frame(reply) => {
                let result = match camera.as_mut() {
                    Some(cam) => grab_jpeg(cam),
                    None => Err(CameraError::NoActiveCamera),
                };
                let _ = reply.send(result);
            }
            Command::Capture(reply) => {
                let result = match camera.as_mut() {
                    Some(cam) => grab_jpeg(cam),
                    None => Err(CameraError::NoActiveCamera),
                };
                if result.is_ok() {
                    release(&mut camera);
                }
                let _ = reply.send(result);
            }
            Command::Close(reply) => {
                let was_open = camera.is_some();
                release(&mut camera);
                let _ = reply.send(was_open);
            }
            Command::IsLive(reply) => {
                let _ = reply.send(camera.is_some());
            }
        }
    }
}

fn open_camera(index: u32) -> Result<Camera, CameraError> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|e| CameraError::PermissionDenied(e.to_string()))?;
    camera
        .open_stream()
        .map_err(|e| CameraError::PermissionDenied(e.to_string()))?;
    Ok(camera)
}

fn release(camera: &mut Option<Camera>) {
    if let Some(mut cam) = camera.take() {
        let _ = cam.stop_stream();
    }
}

fn grab_jpeg(camera: &mut Camera) -> Result<Vec<u8>, CameraError> {
    let frame = camera
        .frame()
        .map_err(|e| CameraError::Frame(e.to_string()))?;
    let decoded = frame
        .decode_image::<RgbFormat>()
        .map_err(|e| CameraError::Frame(e.to_string()))?;
    let (width, height) = decoded.dimensions();

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, 85);
    encoder
        .encode(decoded.as_raw(), width, height, image::ColorType::Rgb8)
        .map_err(|e| CameraError::Frame(e.to_string()))?;
    Ok(jpeg)
}
