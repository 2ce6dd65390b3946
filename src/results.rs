use crate::classifier::Detection;
use crate::feed::{DetectionHistory, LogFeed};
use crate::session::Mode;
use serde::Serialize;

/// Confidence classification for the threat chip. Strict comparisons:
/// 0.9 on the nose is still PROBABLE, 0.7 still UNCERTAIN.
pub fn threat_label(confidence: f64) -> &'static str {
    if confidence > 0.9 {
        "VERIFIED"
    } else if confidence > 0.7 {
        "PROBABLE"
    } else {
        "UNCERTAIN"
    }
}

/// Per-model gauge percentages, already scaled to 0..=100.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ModelBars {
    pub audio: f64,
    pub image: f64,
    pub distance: f64,
    pub fusion: f64,
}

/// Distributes one confidence value across the four model gauges using
/// fixed mode-keyed weights, capping each gauge at 100 %.
pub fn model_bars(mode: Mode, confidence: f64) -> ModelBars {
    let (audio_w, image_w, distance_w, fusion_w) = match mode {
        Mode::Audio => (1.0, 0.0, 0.76, 0.0),
        Mode::Image => (0.0, 1.0, 0.70, 0.0),
        Mode::Fusion => (0.87, 0.91, 0.76, 1.0),
    };
    ModelBars {
        audio: bar_percent(confidence * audio_w),
        image: bar_percent(confidence * image_w),
        distance: bar_percent(confidence * distance_w),
        fusion: bar_percent(confidence * fusion_w),
    }
}

fn bar_percent(value: f64) -> f64 {
    (value * 100.0).min(100.0)
}

/// Everything the panel needs to render one completed scan.
#[derive(Clone, Debug, Serialize)]
pub struct ScanView {
    pub scan_number: u64,
    pub mode: Mode,
    pub species: String,
    pub class_label: String,
    pub confidence: f64,
    pub confidence_label: String,
    pub distance_label: String,
    pub threat: &'static str,
    pub bars: ModelBars,
    pub raw: String,
}

/// Maps a detection onto the display fields, records it in the history
/// list, and emits the two summary log lines.
pub fn present(
    detection: &Detection,
    mode: Mode,
    scan_number: u64,
    feed: &LogFeed,
    history: &DetectionHistory,
) -> ScanView {
    let species = detection.species.to_uppercase();
    let confidence_label = format!("{:.1}%", detection.confidence * 100.0);
    let distance_label = match detection.distance {
        Some(d) => format!("{d:.1} m"),
        None => "— m".to_string(),
    };
    let distance_log = match detection.distance {
        Some(d) => format!("{d:.1}m"),
        None => "N/A".to_string(),
    };

    feed.success(format!("SPECIES IDENTIFIED: {species}"));
    feed.success(format!(
        "CONFIDENCE: {confidence_label}  DISTANCE: {distance_log}"
    ));
    history.record(&detection.species, detection.confidence);

    ScanView {
        scan_number,
        mode,
        species,
        class_label: format!("CLASS: {}", detection.kind),
        confidence: detection.confidence,
        confidence_label,
        distance_label,
        threat: threat_label(detection.confidence),
        bars: model_bars(mode, detection.confidence),
        raw: serde_json::to_string_pretty(detection).unwrap_or_else(|_| "{}".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::demo_detection;
    use tokio::sync::broadcast;

    fn feed() -> LogFeed {
        let (tx, _) = broadcast::channel(16);
        LogFeed::new(tx)
    }

    fn assert_pct(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn threat_boundaries_are_strict() {
        assert_eq!(threat_label(0.90), "PROBABLE");
        assert_eq!(threat_label(0.70), "UNCERTAIN");
        assert_eq!(threat_label(0.9001), "VERIFIED");
        assert_eq!(threat_label(0.7001), "PROBABLE");
        assert_eq!(threat_label(0.0), "UNCERTAIN");
    }

    #[test]
    fn audio_mode_weights() {
        let bars = model_bars(Mode::Audio, 0.5);
        assert_pct(bars.audio, 50.0);
        assert_pct(bars.image, 0.0);
        assert_pct(bars.distance, 38.0);
        assert_pct(bars.fusion, 0.0);
    }

    #[test]
    fn image_mode_weights() {
        let bars = model_bars(Mode::Image, 0.5);
        assert_pct(bars.audio, 0.0);
        assert_pct(bars.image, 50.0);
        assert_pct(bars.distance, 35.0);
        assert_pct(bars.fusion, 0.0);
    }

    #[test]
    fn fusion_mode_weights() {
        let bars = model_bars(Mode::Fusion, 1.0);
        assert_pct(bars.audio, 87.0);
        assert_pct(bars.image, 91.0);
        assert_pct(bars.distance, 76.0);
        assert_pct(bars.fusion, 100.0);
    }

    #[test]
    fn bars_clamp_at_one_hundred_percent() {
        let bars = model_bars(Mode::Audio, 1.3);
        assert_eq!(bars.audio, 100.0);
        assert_pct(bars.distance, 98.8);

        let fusion = model_bars(Mode::Fusion, 1.2);
        assert_eq!(fusion.audio, 100.0);
        assert_eq!(fusion.image, 100.0);
        assert_eq!(fusion.fusion, 100.0);
    }

    #[test]
    fn fusion_demo_renders_verified_at_95_percent() {
        let feed = feed();
        let history = DetectionHistory::new();
        let view = present(&demo_detection(Mode::Fusion), Mode::Fusion, 1, &feed, &history);

        assert_eq!(view.species, "INDIAN PEACOCK");
        assert_eq!(view.threat, "VERIFIED");
        assert_pct(view.bars.fusion, 95.0);
        assert_eq!(view.confidence_label, "95.0%");
        assert_eq!(view.distance_label, "35.6 m");
    }

    #[test]
    fn presenting_records_history_and_two_log_lines() {
        let feed = feed();
        let history = DetectionHistory::new();
        present(&demo_detection(Mode::Audio), Mode::Audio, 3, &feed, &history);

        assert_eq!(history.len(), 1);
        assert_eq!(history.snapshot()[0].species, "INDIAN SPARROW");

        let entries = feed.snapshot();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].message.contains("SPECIES IDENTIFIED"));
        assert!(entries[1].message.contains("DISTANCE: 18.4m"));
    }

    #[test]
    fn absent_distance_renders_placeholders() {
        let feed = feed();
        let history = DetectionHistory::new();
        let detection = Detection {
            species: "Unknown Owl".to_string(),
            kind: "BIRD".to_string(),
            confidence: 0.42,
            distance: None,
        };
        let view = present(&detection, Mode::Image, 1, &feed, &history);

        assert_eq!(view.distance_label, "— m");
        assert_eq!(view.threat, "UNCERTAIN");
        assert!(feed.snapshot()[1].message.ends_with("DISTANCE: N/A"));
    }

    #[test]
    fn raw_output_is_pretty_printed_json() {
        let feed = feed();
        let history = DetectionHistory::new();
        let view = present(&demo_detection(Mode::Image), Mode::Image, 1, &feed, &history);

        let parsed: serde_json::Value = serde_json::from_str(&view.raw).expect("raw is json");
        assert_eq!(parsed["species"], "Common Myna");
        assert_eq!(parsed["type"], "BIRD");
    }
}
