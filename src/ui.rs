use crate::prefs::Theme;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct AppProps {
    pub theme: String,
}

pub fn render_html(theme: Theme) -> String {
    let mut app = VirtualDom::new_with_props(
        App,
        AppProps {
            theme: theme.as_str().to_string(),
        },
    );
    // Build the tree before rendering to avoid SSR panics.
    let mut noop = NoOpMutations {};
    let _ = app.rebuild(&mut noop);
    dioxus_ssr::render(&mut app)
}

#[component]
fn App(props: AppProps) -> Element {
    let styles = r#"
* { box-sizing: border-box; }
body, html { margin: 0; padding: 0; }
.page { min-height: 100vh; display: flex; justify-content: center; padding: 28px 16px; font-family: "JetBrains Mono", "Fira Code", ui-monospace, monospace; }
.page.dark { background: radial-gradient(circle at 30% 10%, #0c1a24, #050b10 45%), #050b10; color: #c8f5dd; --panel: #081219; --panel-edge: #14303f; --accent: #00ff88; --accent-dim: rgba(0,255,136,0.18); --muted: #5d8a78; --warn: #ffb347; --err: #ff5f6b; }
.page.light { background: #eef3f0; color: #17332a; --panel: #ffffff; --panel-edge: #c9d8d0; --accent: #0a9a5c; --accent-dim: rgba(10,154,92,0.14); --muted: #6d8a7e; --warn: #b97708; --err: #c23843; }
.shell { width: min(1080px, 100%); display: flex; flex-direction: column; gap: 12px; }
.header { display: flex; align-items: baseline; gap: 14px; flex-wrap: wrap; }
.title { font-size: 24px; margin: 0; letter-spacing: 2px; }
.subtitle { margin: 0; color: var(--muted); font-size: 13px; letter-spacing: 1px; }
.chips { margin-left: auto; display: flex; gap: 10px; align-items: center; font-size: 13px; }
.chip { padding: 6px 10px; border-radius: 8px; background: var(--panel); border: 1px solid var(--panel-edge); }
.led { display: inline-block; width: 9px; height: 9px; border-radius: 50%; background: var(--err); opacity: 0.2; margin-right: 6px; }
.mode-row { display: flex; gap: 10px; flex-wrap: wrap; }
.mode-btn { padding: 10px 16px; border-radius: 10px; border: 1px solid var(--panel-edge); background: var(--panel); color: inherit; font-weight: 700; letter-spacing: 1px; cursor: pointer; font-family: inherit; }
.mode-btn.active { background: var(--accent); color: #04130b; border-color: var(--accent); }
.capture-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 12px; }
.card { background: var(--panel); border: 1px solid var(--panel-edge); border-radius: 14px; padding: 18px; }
.card-title { margin: 0 0 10px 0; font-size: 15px; letter-spacing: 1.5px; color: var(--muted); }
.btn { padding: 10px 14px; border-radius: 10px; border: 1px solid var(--panel-edge); background: transparent; color: inherit; font-weight: 700; cursor: pointer; font-family: inherit; }
.btn:hover { border-color: var(--accent); }
.btn.recording { border-color: var(--err); color: var(--err); }
.btn-row { display: flex; gap: 8px; flex-wrap: wrap; margin-bottom: 10px; }
.progress { display: none; margin: 10px 0; }
.progress-track { height: 8px; border-radius: 4px; background: var(--accent-dim); overflow: hidden; }
.progress-fill { height: 100%; width: 0%; background: var(--accent); transition: width 100ms linear; }
.progress-label { font-size: 12px; color: var(--muted); margin-top: 4px; }
.file-row { margin: 10px 0; font-size: 13px; }
canvas { display: block; border: 1px solid var(--panel-edge); border-radius: 10px; background: rgba(0,0,0,0.25); }
.page.light canvas { background: #0d1f17; }
audio { width: 100%; margin-top: 8px; }
.viewport { position: relative; width: 100%; aspect-ratio: 4 / 3; border: 1px solid var(--panel-edge); border-radius: 10px; overflow: hidden; background: #000; margin-bottom: 10px; display: flex; align-items: center; justify-content: center; }
.viewport img { width: 100%; height: 100%; object-fit: cover; display: none; }
.viewport-idle { color: var(--muted); letter-spacing: 2px; font-size: 13px; }
.scan-row { display: flex; gap: 14px; align-items: center; }
.analyze { flex: 1; padding: 14px; border-radius: 12px; border: none; background: var(--accent); color: #04130b; font-weight: 800; font-size: 15px; letter-spacing: 2px; cursor: pointer; font-family: inherit; }
.analyze.scanning { opacity: 0.7; }
.results-grid { display: grid; grid-template-columns: 2fr 1fr; gap: 12px; }
.readout { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 10px; margin-bottom: 14px; }
.readout .label { font-size: 11px; color: var(--muted); letter-spacing: 1px; }
.readout .value { font-size: 18px; font-weight: 800; margin-top: 2px; }
.bar-row { display: flex; align-items: center; gap: 10px; margin: 6px 0; font-size: 12px; }
.bar-row .bar-name { width: 64px; color: var(--muted); }
.bar-track { flex: 1; height: 7px; border-radius: 4px; background: var(--accent-dim); overflow: hidden; }
.bar-fill { height: 100%; width: 0%; background: var(--accent); transition: width 300ms ease; }
.bar-pct { width: 42px; text-align: right; }
.json-out { margin-top: 10px; font-size: 11px; white-space: pre-wrap; word-break: break-all; color: var(--muted); max-height: 180px; overflow: auto; }
.bottom-grid { display: grid; grid-template-columns: 2fr 1fr; gap: 12px; }
.log-head { display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px; }
.log-feed { height: 200px; overflow-y: auto; font-size: 12px; display: flex; flex-direction: column; gap: 3px; }
.log-entry { display: flex; gap: 8px; }
.log-time { color: var(--muted); }
.log-entry.warn .log-msg { color: var(--warn); }
.log-entry.error .log-msg { color: var(--err); }
.log-entry.success .log-msg { color: var(--accent); }
.history-list { display: flex; flex-direction: column; gap: 6px; font-size: 12px; }
.history-item { display: flex; justify-content: space-between; gap: 8px; padding: 7px 9px; border: 1px solid var(--panel-edge); border-radius: 8px; }
.history-conf { color: var(--accent); }
.history-time { color: var(--muted); }
.history-empty { color: var(--muted); font-size: 12px; }
.footer { color: var(--muted); font-size: 12px; letter-spacing: 1px; }
@media (max-width: 760px) {
    .results-grid, .bottom-grid { grid-template-columns: 1fr; }
    .chips { margin-left: 0; }
}
"#;

    let script = r#"
(() => {
  const $id = (id) => document.getElementById(id);
  const page = document.querySelector('.page');

  const state = {
    mode: 'audio',
    recording: false,
    scanning: false,
    cameraLive: false,
    hasPhoto: false,
    startTime: Date.now(),
  };

  const modeButtons = document.querySelectorAll('.mode-btn');
  const audioBlock = $id('audio-block');
  const imageBlock = $id('image-block');
  const recordBtn = $id('record-btn');
  const recordProgress = $id('record-progress');
  const recordFill = $id('record-fill');
  const recordLabel = $id('record-label');
  const recLed = $id('rec-led');
  const audioFile = $id('audio-file');
  const imageFile = $id('image-file');
  const audioPreview = $id('audio-preview');
  const viewportIdle = $id('viewport-idle');
  const cameraLiveImg = $id('camera-live');
  const photoView = $id('photo-view');
  const analyzeBtn = $id('analyze-btn');
  const analyzeText = analyzeBtn.querySelector('.analyze-text');
  const scanStatus = $id('scan-status');
  const footerStatus = $id('footer-status');
  const logFeed = $id('log-feed');
  const historyList = $id('history-list');
  const jsonOutput = $id('json-output');
  let ws = null;
  let frameTimer = null;

  // ── clock & uptime ──
  function updateClock() {
    const now = new Date();
    $id('clock').textContent = now.toTimeString().slice(0, 8);
    const elapsed = Math.floor((Date.now() - state.startTime) / 1000);
    const h = String(Math.floor(elapsed / 3600)).padStart(2, '0');
    const m = String(Math.floor((elapsed % 3600) / 60)).padStart(2, '0');
    const s = String(elapsed % 60).padStart(2, '0');
    $id('uptime').textContent = `UP ${h}:${m}:${s}`;
  }
  setInterval(updateClock, 1000);
  updateClock();

  // ── waveform loop ──
  const waveCanvas = $id('waveform');
  const wCtx = waveCanvas.getContext('2d');
  let wavePoints = Array(60).fill(0);
  let waveActive = false;
  let wavePulse = 0;

  function drawWaveform() {
    const w = waveCanvas.width;
    const h = waveCanvas.height;
    const mid = h / 2;
    const active = waveActive || wavePulse > Date.now();

    wCtx.clearRect(0, 0, w, h);
    wCtx.strokeStyle = 'rgba(30,58,90,0.5)';
    wCtx.lineWidth = 0.5;
    for (let y = 0; y <= h; y += h / 4) {
      wCtx.beginPath();
      wCtx.moveTo(0, y);
      wCtx.lineTo(w, y);
      wCtx.stroke();
    }

    wavePoints.shift();
    const amp = active ? (Math.random() * 0.7 + 0.1) * mid * 0.85 : Math.random() * 2;
    wavePoints.push(amp);

    const step = w / (wavePoints.length - 1);
    wCtx.beginPath();
    wCtx.moveTo(0, mid);
    wavePoints.forEach((p, i) => {
      wCtx.lineTo(i * step, mid + (i % 2 === 0 ? p : -p));
    });
    wCtx.strokeStyle = active ? '#00ff88' : '#1a3a55';
    wCtx.lineWidth = 1.5;
    wCtx.stroke();

    requestAnimationFrame(drawWaveform);
  }
  drawWaveform();

  // ── radar loop ──
  const radarCanvas = $id('radar');
  const rCtx = radarCanvas.getContext('2d');
  let radarAngle = 0;
  let radarDots = [];
  let radarScan = false;

  function drawRadar() {
    const size = radarCanvas.width;
    const cx = size / 2, cy = size / 2, r = size / 2 - 8;

    rCtx.clearRect(0, 0, size, size);
    rCtx.fillStyle = '#040a0f';
    rCtx.beginPath();
    rCtx.arc(cx, cy, r, 0, Math.PI * 2);
    rCtx.fill();

    [0.25, 0.5, 0.75, 1].forEach((scale) => {
      rCtx.beginPath();
      rCtx.arc(cx, cy, r * scale, 0, Math.PI * 2);
      rCtx.strokeStyle = 'rgba(26,58,85,0.7)';
      rCtx.lineWidth = 0.5;
      rCtx.stroke();
    });
    rCtx.strokeStyle = 'rgba(26,58,85,0.5)';
    rCtx.beginPath(); rCtx.moveTo(cx, cy - r); rCtx.lineTo(cx, cy + r); rCtx.stroke();
    rCtx.beginPath(); rCtx.moveTo(cx - r, cy); rCtx.lineTo(cx + r, cy); rCtx.stroke();

    const rad = radarAngle * (Math.PI / 180);
    for (let a = 0; a < 60; a++) {
      const angle = (rad - (a * Math.PI / 180) + Math.PI * 2) % (Math.PI * 2);
      const opacity = Math.max(0, (60 - a) / 60) * 0.35;
      rCtx.beginPath();
      rCtx.moveTo(cx, cy);
      rCtx.arc(cx, cy, r - 1, angle, angle + 0.02);
      rCtx.strokeStyle = `rgba(0,255,136,${opacity})`;
      rCtx.lineWidth = 1;
      rCtx.stroke();
    }

    rCtx.beginPath();
    rCtx.moveTo(cx, cy);
    rCtx.lineTo(cx + (r - 1) * Math.cos(rad), cy + (r - 1) * Math.sin(rad));
    rCtx.strokeStyle = '#00ff88';
    rCtx.lineWidth = 1.5;
    rCtx.stroke();

    radarDots = radarDots.filter((d) => d.life > 0);
    radarDots.forEach((d) => {
      rCtx.beginPath();
      rCtx.arc(d.x, d.y, d.size, 0, Math.PI * 2);
      rCtx.fillStyle = `rgba(0,255,136,${d.life / d.maxLife})`;
      rCtx.fill();
      d.life -= radarScan ? 0.5 : 1;
    });

    radarAngle = (radarAngle + (radarScan ? 3 : 1.5)) % 360;
    requestAnimationFrame(drawRadar);
  }
  drawRadar();

  function spawnRadarDot() {
    const size = radarCanvas.width;
    const cx = size / 2, cy = size / 2, r = size / 2 - 20;
    const angle = Math.random() * Math.PI * 2;
    const dist = Math.random() * r * 0.8 + 10;
    radarDots.push({
      x: cx + dist * Math.cos(angle),
      y: cy + dist * Math.sin(angle),
      size: Math.random() * 3 + 2,
      life: 120,
      maxLife: 120,
    });
  }

  // ── log feed & history ──
  function appendLog(entry) {
    const row = document.createElement('div');
    row.className = `log-entry ${entry.level}`;
    const time = document.createElement('span');
    time.className = 'log-time';
    time.textContent = entry.time;
    const msg = document.createElement('span');
    msg.className = 'log-msg';
    msg.textContent = `» ${entry.message}`;
    row.appendChild(time);
    row.appendChild(msg);
    logFeed.appendChild(row);
    logFeed.scrollTop = logFeed.scrollHeight;
  }

  function renderHistory(entries) {
    historyList.innerHTML = '';
    if (!entries.length) {
      const empty = document.createElement('div');
      empty.className = 'history-empty';
      empty.textContent = 'NO DETECTIONS YET';
      historyList.appendChild(empty);
      return;
    }
    entries.forEach((item) => {
      const row = document.createElement('div');
      row.className = 'history-item';
      const species = document.createElement('span');
      species.textContent = item.species;
      const conf = document.createElement('span');
      conf.className = 'history-conf';
      conf.textContent = `${Math.round(item.confidence * 100)}%`;
      const time = document.createElement('span');
      time.className = 'history-time';
      time.textContent = item.time;
      row.appendChild(species);
      row.appendChild(conf);
      row.appendChild(time);
      historyList.appendChild(row);
    });
  }

  async function refreshHistory() {
    try {
      const res = await fetch('/api/history');
      if (!res.ok) return;
      const data = await res.json();
      renderHistory(data.entries || []);
    } catch {}
  }

  // ── mode switching ──
  function applySections(sections) {
    audioBlock.style.display = sections.audio ? 'block' : 'none';
    imageBlock.style.display = sections.image ? 'block' : 'none';
  }

  function markActiveMode(mode) {
    modeButtons.forEach((btn) => {
      btn.classList.toggle('active', btn.dataset.mode === mode);
    });
    $id('mode-display').textContent = mode.toUpperCase();
  }

  modeButtons.forEach((btn) => {
    btn.addEventListener('click', async () => {
      try {
        const res = await fetch('/api/mode', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ mode: btn.dataset.mode }),
        });
        if (!res.ok) return;
        const data = await res.json();
        state.mode = data.mode;
        markActiveMode(data.mode);
        applySections(data.sections);
      } catch {}
    });
  });

  // ── audio recording ──
  recordBtn.addEventListener('click', async () => {
    if (state.recording) return;
    try {
      const res = await fetch('/api/record', { method: 'POST' });
      if (!res.ok) return;
      const data = await res.json();
      if (!data.started) return;
      state.recording = true;
      waveActive = true;
      recordBtn.classList.add('recording');
      recLed.style.opacity = '1';
      recordProgress.style.display = 'block';
    } catch {}
  });

  function resetRecordUi() {
    state.recording = false;
    waveActive = state.scanning;
    recordBtn.classList.remove('recording');
    recLed.style.opacity = '0.2';
    recordProgress.style.display = 'none';
    recordFill.style.width = '0%';
  }

  function refreshAudioPreview() {
    audioPreview.src = `/api/audio/preview?t=${Date.now()}`;
    audioPreview.style.display = 'block';
  }

  // ── file uploads ──
  audioFile.addEventListener('change', async () => {
    const file = audioFile.files[0];
    if (!file) return;
    const form = new FormData();
    form.append('audio', file);
    try {
      const res = await fetch('/api/audio-file', { method: 'POST', body: form });
      if (!res.ok) return;
      wavePulse = Date.now() + 2000;
      refreshAudioPreview();
    } catch {}
  });

  imageFile.addEventListener('change', async () => {
    const file = imageFile.files[0];
    if (!file) return;
    const form = new FormData();
    form.append('image', file);
    try {
      const res = await fetch('/api/image-file', { method: 'POST', body: form });
      if (!res.ok) return;
      stopFramePolling();
      showPhoto();
    } catch {}
  });

  // ── camera ──
  function showViewport(which) {
    viewportIdle.style.display = which === 'idle' ? 'block' : 'none';
    cameraLiveImg.style.display = which === 'live' ? 'block' : 'none';
    photoView.style.display = which === 'photo' ? 'block' : 'none';
  }

  function showPhoto() {
    state.hasPhoto = true;
    photoView.src = `/api/image/preview?t=${Date.now()}`;
    showViewport('photo');
  }

  function startFramePolling() {
    state.cameraLive = true;
    showViewport('live');
    if (frameTimer) clearInterval(frameTimer);
    frameTimer = setInterval(() => {
      cameraLiveImg.src = `/api/camera/frame?t=${Date.now()}`;
    }, 250);
  }

  function stopFramePolling() {
    state.cameraLive = false;
    if (frameTimer) {
      clearInterval(frameTimer);
      frameTimer = null;
    }
  }

  $id('open-camera-btn').addEventListener('click', async () => {
    try {
      const res = await fetch('/api/camera/open', { method: 'POST' });
      if (!res.ok) return;
      startFramePolling();
    } catch {}
  });

  $id('capture-btn').addEventListener('click', async () => {
    try {
      const res = await fetch('/api/camera/capture', { method: 'POST' });
      if (!res.ok) return;
      stopFramePolling();
      showPhoto();
    } catch {}
  });

  $id('close-camera-btn').addEventListener('click', async () => {
    try {
      await fetch('/api/camera/close', { method: 'POST' });
    } catch {}
    stopFramePolling();
    if (state.hasPhoto) showPhoto();
    else showViewport('idle');
  });

  // ── scan ──
  analyzeBtn.addEventListener('click', async () => {
    if (state.scanning) return;
    try {
      const res = await fetch('/api/scan', { method: 'POST' });
      if (!res.ok) return;
      const data = await res.json();
      if (data.busy || !data.result) return;
      applyResult(data.result);
      for (let i = 0; i < 3; i++) setTimeout(spawnRadarDot, i * 200);
    } catch {}
  });

  function setBar(name, pct) {
    $id(`${name}-fill`).style.width = `${pct}%`;
    $id(`${name}-pct`).textContent = `${pct.toFixed(0)}%`;
  }

  function applyResult(view) {
    $id('species').textContent = view.species;
    $id('species-type').textContent = view.class_label;
    $id('confidence').textContent = view.confidence_label;
    $id('conf-fill').style.width = `${Math.min(100, view.confidence * 100)}%`;
    $id('distance').textContent = view.distance_label;
    $id('threat-level').textContent = view.threat;
    $id('mode-display').textContent = view.mode.toUpperCase();
    setBar('audio', view.bars.audio);
    setBar('image', view.bars.image);
    setBar('dist', view.bars.distance);
    setBar('fusion', view.bars.fusion);
    jsonOutput.textContent = view.raw;
    refreshHistory();
  }

  function setScanning(active) {
    state.scanning = active;
    radarScan = active;
    waveActive = active || state.recording;
    analyzeBtn.classList.toggle('scanning', active);
    analyzeText.textContent = active ? '⟳ SCANNING...' : '⟫ INITIATE SCAN';
    scanStatus.textContent = active ? 'SCANNING' : 'COMPLETE';
    footerStatus.textContent = active ? 'STATUS: SCANNING' : 'STATUS: STANDBY';
  }

  // ── logs card ──
  $id('clear-logs').addEventListener('click', async () => {
    try {
      const res = await fetch('/api/logs/clear', { method: 'POST' });
      if (!res.ok) return;
      logFeed.innerHTML = '';
      jsonOutput.textContent = '// Cleared.';
    } catch {}
  });

  // ── theme ──
  $id('theme-toggle').addEventListener('click', async () => {
    const next = page.classList.contains('dark') ? 'light' : 'dark';
    try {
      const res = await fetch('/api/theme', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ theme: next }),
      });
      if (!res.ok) return;
      page.classList.remove('light', 'dark');
      page.classList.add(next);
    } catch {}
  });

  // ── websocket event stream ──
  function ensureWebsocket() {
    if (ws && (ws.readyState === WebSocket.OPEN || ws.readyState === WebSocket.CONNECTING)) {
      return;
    }
    const proto = location.protocol === 'https:' ? 'wss' : 'ws';
    ws = new WebSocket(`${proto}://${location.host}/ws/events`);
    ws.onmessage = (evt) => {
      let data;
      try {
        data = JSON.parse(evt.data);
      } catch {
        return;
      }
      if (data.event === 'log') {
        appendLog(data);
      } else if (data.event === 'recording-progress') {
        recordFill.style.width = `${data.percent}%`;
        recordLabel.textContent = `RECORDING... ${data.remaining_secs.toFixed(1)}s`;
      } else if (data.event === 'recording-done') {
        resetRecordUi();
        refreshAudioPreview();
      } else if (data.event === 'recording-failed') {
        resetRecordUi();
      } else if (data.event === 'scanning') {
        setScanning(data.active);
      }
    };
    ws.onerror = () => ws && ws.close();
    ws.onclose = () => {
      setTimeout(ensureWebsocket, 1500);
    };
  }

  // ── hydrate from server state ──
  async function hydrate() {
    try {
      const res = await fetch('/api/status');
      if (!res.ok) return;
      const data = await res.json();
      state.mode = data.mode;
      markActiveMode(data.mode);
      applySections(data.sections);
      if (data.scanning) setScanning(true);
      if (data.recording) {
        state.recording = true;
        waveActive = true;
        recLed.style.opacity = '1';
        recordProgress.style.display = 'block';
      }
      if (data.camera_live) startFramePolling();
      if (data.has_audio) refreshAudioPreview();
      if (data.has_image) showPhoto();
    } catch {}

    try {
      const res = await fetch('/api/logs');
      if (res.ok) {
        const data = await res.json();
        (data.entries || []).forEach(appendLog);
      }
    } catch {}

    refreshHistory();
  }

  hydrate();
  ensureWebsocket();
})();
"#;

    rsx! {
        div { class: "page {props.theme}",
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            div { class: "shell",
                div { class: "header",
                    h1 { class: "title", "FAUNASCOPE" }
                    p { class: "subtitle", "WILDLIFE DETECTION FIELD UNIT" }
                    div { class: "chips",
                        span { class: "chip", span { id: "rec-led", class: "led" } "REC" }
                        span { id: "mode-display", class: "chip", "AUDIO" }
                        span { id: "clock", class: "chip", "--:--:--" }
                        span { id: "uptime", class: "chip", "UP 00:00:00" }
                        button { id: "theme-toggle", class: "btn", "THEME" }
                    }
                }
                div { class: "mode-row",
                    button { class: "mode-btn active", "data-mode": "audio", "AUDIO" }
                    button { class: "mode-btn", "data-mode": "image", "IMAGE" }
                    button { class: "mode-btn", "data-mode": "fusion", "FUSION" }
                }
                div { class: "capture-grid",
                    div { id: "audio-block", class: "card",
                        h2 { class: "card-title", "ACOUSTIC SAMPLE" }
                        div { class: "btn-row",
                            button { id: "record-btn", class: "btn", "RECORD 5S SAMPLE" }
                        }
                        div { id: "record-progress", class: "progress",
                            div { class: "progress-track",
                                div { id: "record-fill", class: "progress-fill" }
                            }
                            div { id: "record-label", class: "progress-label", "RECORDING..." }
                        }
                        div { class: "file-row",
                            input { id: "audio-file", r#type: "file", accept: "audio/*" }
                        }
                        audio { id: "audio-preview", controls: true, style: "display:none;" }
                        canvas { id: "waveform", width: "560", height: "120" }
                    }
                    div { id: "image-block", class: "card", style: "display:none;",
                        h2 { class: "card-title", "OPTICAL SAMPLE" }
                        div { class: "viewport",
                            div { id: "viewport-idle", class: "viewport-idle", "NO SIGNAL" }
                            img { id: "camera-live", alt: "live preview" }
                            img { id: "photo-view", alt: "captured frame" }
                        }
                        div { class: "btn-row",
                            button { id: "open-camera-btn", class: "btn", "OPEN CAMERA" }
                            button { id: "capture-btn", class: "btn", "CAPTURE" }
                            button { id: "close-camera-btn", class: "btn", "CLOSE" }
                        }
                        div { class: "file-row",
                            input { id: "image-file", r#type: "file", accept: "image/*" }
                        }
                    }
                }
                div { class: "scan-row",
                    button { id: "analyze-btn", class: "analyze",
                        span { class: "analyze-text", "⟫ INITIATE SCAN" }
                    }
                    span { id: "scan-status", class: "chip", "IDLE" }
                }
                div { class: "results-grid",
                    div { class: "card",
                        h2 { class: "card-title", "DETECTION READOUT" }
                        div { class: "readout",
                            div {
                                div { class: "label", "SPECIES" }
                                div { id: "species", class: "value", "—" }
                                div { id: "species-type", class: "label", "CLASS: —" }
                            }
                            div {
                                div { class: "label", "CONFIDENCE" }
                                div { id: "confidence", class: "value", "0.0%" }
                                div { class: "bar-track",
                                    div { id: "conf-fill", class: "bar-fill" }
                                }
                            }
                            div {
                                div { class: "label", "DISTANCE" }
                                div { id: "distance", class: "value", "— m" }
                            }
                            div {
                                div { class: "label", "ASSESSMENT" }
                                div { id: "threat-level", class: "value", "UNCERTAIN" }
                            }
                        }
                        div { class: "bar-row",
                            span { class: "bar-name", "AUDIO" }
                            div { class: "bar-track", div { id: "audio-fill", class: "bar-fill" } }
                            span { id: "audio-pct", class: "bar-pct", "0%" }
                        }
                        div { class: "bar-row",
                            span { class: "bar-name", "IMAGE" }
                            div { class: "bar-track", div { id: "image-fill", class: "bar-fill" } }
                            span { id: "image-pct", class: "bar-pct", "0%" }
                        }
                        div { class: "bar-row",
                            span { class: "bar-name", "RANGE" }
                            div { class: "bar-track", div { id: "dist-fill", class: "bar-fill" } }
                            span { id: "dist-pct", class: "bar-pct", "0%" }
                        }
                        div { class: "bar-row",
                            span { class: "bar-name", "FUSION" }
                            div { class: "bar-track", div { id: "fusion-fill", class: "bar-fill" } }
                            span { id: "fusion-pct", class: "bar-pct", "0%" }
                        }
                    }
                    div { class: "card",
                        h2 { class: "card-title", "SWEEP" }
                        canvas { id: "radar", width: "220", height: "220" }
                        pre { id: "json-output", class: "json-out", "// Awaiting scan." }
                    }
                }
                div { class: "bottom-grid",
                    div { class: "card",
                        div { class: "log-head",
                            h2 { class: "card-title", "SYSTEM LOG" }
                            button { id: "clear-logs", class: "btn", "CLEAR" }
                        }
                        div { id: "log-feed", class: "log-feed" }
                    }
                    div { class: "card",
                        h2 { class: "card-title", "DETECTION HISTORY" }
                        div { id: "history-list", class: "history-list",
                            div { class: "history-empty", "NO DETECTIONS YET" }
                        }
                    }
                }
                div { class: "footer",
                    span { id: "footer-status", "STATUS: STANDBY" }
                }
            }
        }
        style { "{styles}" }
        script { "{script}" }
    }
}
