use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Audio,
    Image,
    Fusion,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Audio => "audio",
            Mode::Image => "image",
            Mode::Fusion => "fusion",
        }
    }

    /// Display label for the mode chip, e.g. "FUSION".
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Audio => "AUDIO",
            Mode::Image => "IMAGE",
            Mode::Fusion => "FUSION",
        }
    }

    /// Which capture sections the panel shows in this mode.
    pub fn visibility(&self) -> SectionVisibility {
        match self {
            Mode::Audio => SectionVisibility {
                audio: true,
                image: false,
            },
            Mode::Image => SectionVisibility {
                audio: false,
                image: true,
            },
            Mode::Fusion => SectionVisibility {
                audio: true,
                image: true,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SectionVisibility {
    pub audio: bool,
    pub image: bool,
}

/// One captured or uploaded media payload. Slots hold a whole blob;
/// a new capture or upload replaces the slot, never merges into it.
#[derive(Clone)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

impl std::fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaBlob")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime: mime.into(),
        }
    }
}

/// The unit's application state: active mode, the four capture slots,
/// and the scan counter. Lives behind one `RwLock` in `AppState`; the
/// recording/scanning re-entrancy guards are separate atomics.
#[derive(Debug, Default)]
pub struct Session {
    pub mode: Mode,
    pub audio_upload: Option<MediaBlob>,
    pub recorded_audio: Option<MediaBlob>,
    pub image_upload: Option<MediaBlob>,
    pub captured_photo: Option<MediaBlob>,
    pub scan_count: u64,
}

impl Session {
    pub fn set_mode(&mut self, mode: Mode) -> SectionVisibility {
        self.mode = mode;
        mode.visibility()
    }

    /// Audio payload for the next scan. Uploaded files take precedence
    /// over the device-recorded buffer.
    pub fn audio_payload(&self) -> Option<&MediaBlob> {
        self.audio_upload.as_ref().or(self.recorded_audio.as_ref())
    }

    /// Image payload for the next scan. Uploaded files take precedence
    /// over the frozen camera frame.
    pub fn image_payload(&self) -> Option<&MediaBlob> {
        self.image_upload.as_ref().or(self.captured_photo.as_ref())
    }

    pub fn next_scan_number(&mut self) -> u64 {
        self.scan_count += 1;
        self.scan_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(tag: &str) -> MediaBlob {
        MediaBlob::new(tag.as_bytes().to_vec(), format!("{tag}.bin"), "application/octet-stream")
    }

    #[test]
    fn initial_mode_is_audio() {
        assert_eq!(Session::default().mode, Mode::Audio);
    }

    #[test]
    fn visibility_contract_holds_from_every_prior_mode() {
        let mut session = Session::default();
        for prior in [Mode::Audio, Mode::Image, Mode::Fusion] {
            session.set_mode(prior);

            assert_eq!(
                session.set_mode(Mode::Audio),
                SectionVisibility { audio: true, image: false },
            );
            session.set_mode(prior);
            assert_eq!(
                session.set_mode(Mode::Image),
                SectionVisibility { audio: false, image: true },
            );
            session.set_mode(prior);
            assert_eq!(
                session.set_mode(Mode::Fusion),
                SectionVisibility { audio: true, image: true },
            );
        }
    }

    #[test]
    fn upload_beats_recorded_audio() {
        let mut session = Session::default();
        session.recorded_audio = Some(blob("device"));
        session.audio_upload = Some(blob("upload"));
        assert_eq!(session.audio_payload().unwrap().bytes, b"upload");
    }

    #[test]
    fn recorded_audio_used_when_no_upload() {
        let mut session = Session::default();
        session.recorded_audio = Some(blob("device"));
        assert_eq!(session.audio_payload().unwrap().bytes, b"device");
    }

    #[test]
    fn upload_beats_captured_photo() {
        let mut session = Session::default();
        session.captured_photo = Some(blob("frame"));
        session.image_upload = Some(blob("still"));
        assert_eq!(session.image_payload().unwrap().bytes, b"still");
    }

    #[test]
    fn absent_modalities_stay_absent() {
        let session = Session::default();
        assert!(session.audio_payload().is_none());
        assert!(session.image_payload().is_none());
    }

    #[test]
    fn scan_numbers_increase_monotonically() {
        let mut session = Session::default();
        assert_eq!(session.next_scan_number(), 1);
        assert_eq!(session.next_scan_number(), 2);
        assert_eq!(session.scan_count, 2);
    }

    #[test]
    fn mode_wire_form_is_kebab_case() {
        assert_eq!(serde_json::to_string(&Mode::Fusion).unwrap(), "\"fusion\"");
        let parsed: Mode = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, Mode::Image);
    }
}
