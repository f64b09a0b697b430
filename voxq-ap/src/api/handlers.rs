//! HTTP request handlers

use crate::api::{ApiResult, AppState};
use crate::audio::wav::concatenate_wav_files;
use crate::audio::CpalSink;
use crate::error::Error;
use crate::playback::PlayOutcome;
use crate::tts::{assign_voices, parse_script, SpeakOptions, TtsVoice, VoicedSegment};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path as FsPath, PathBuf};
use tracing::{info, warn};

/// Longest text accepted by POST /api/generate-audio, in characters
pub const MAX_TEXT_CHARS: usize = 500;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    git_hash: String,
    build_profile: String,
    tts_provider: String,
    tts_available: bool,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    count: usize,
    voices: Vec<TtsVoice>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateAudioRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    /// Voice per `[NAME]` speaker marker in `text`
    #[serde(default)]
    pub speakers: Option<Vec<SpeakerVoice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerVoice {
    pub speaker: String,
    pub voice_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioResponse {
    message: String,
    file: String,
    playback_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatusResponse {
    state: String,
    is_playing: bool,
    current_track: Option<String>,
    queue: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    devices: Vec<String>,
}

// ============================================================================
// Status Endpoints
// ============================================================================

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "TTS API Server is running" }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "voxq-ap".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        tts_provider: state.tts.name().to_string(),
        tts_available: state.tts.is_available(),
    })
}

/// GET /api/voices
pub async fn list_voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    let voices = state.tts.voices();
    Json(VoicesResponse {
        count: voices.len(),
        voices,
    })
}

/// GET /api/audio/devices
pub async fn list_audio_devices() -> ApiResult<Json<DeviceListResponse>> {
    let devices = tokio::task::spawn_blocking(CpalSink::list_devices)
        .await
        .map_err(|e| Error::Internal(format!("Device enumeration task failed: {}", e)))??;

    info!("Found {} audio devices", devices.len());
    Ok(Json(DeviceListResponse { devices }))
}

// ============================================================================
// Audio Generation
// ============================================================================

/// POST /api/generate-audio
///
/// Synthesizes the text, queues the file and starts playback.
pub async fn generate_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateAudioRequest>,
) -> ApiResult<(StatusCode, Json<GenerateAudioResponse>)> {
    validate_request(&state, &request)?;

    let (filename, path) = next_output_path(&state.output_dir)?;
    info!(
        "Generating {} (voice: {}, {} chars)",
        filename,
        request.voice.as_deref().unwrap_or("default"),
        request.text.chars().count()
    );

    let synthesized = match speaker_segments(&request) {
        Some(segments) => synthesize_script(&state, segments, &path).await,
        None => {
            let opts = SpeakOptions {
                voice_name: request.voice.clone(),
            };
            state
                .tts
                .generate_audio_file(&request.text, &path, &opts)
                .await
        }
    };
    if let Err(e) = synthesized {
        // Release the reserved name
        if let Err(remove_err) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove {}: {}", path.display(), remove_err);
        }
        return Err(e.into());
    }

    state.controller.enqueue(&path)?;
    match state.controller.play() {
        // The worker may already have drained the queue, including this track
        Ok(_) | Err(Error::EmptyQueue) => {}
        Err(e) => return Err(e.into()),
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", state.port));

    Ok((
        StatusCode::CREATED,
        Json(GenerateAudioResponse {
            message: "Audio generated and queued".to_string(),
            playback_url: format!("http://{}/api/audio/{}", host, filename),
            file: filename,
        }),
    ))
}

fn validate_request(state: &AppState, request: &GenerateAudioRequest) -> Result<(), Error> {
    if request.text.trim().is_empty() {
        return Err(Error::InvalidInput("Text must not be empty".to_string()));
    }
    if request.text.chars().count() > MAX_TEXT_CHARS {
        return Err(Error::InvalidInput(format!(
            "Text must be at most {} characters",
            MAX_TEXT_CHARS
        )));
    }

    let requested = request
        .voice
        .iter()
        .chain(request.speakers.iter().flatten().map(|s| &s.voice_name));
    for voice in requested {
        if !state.tts.has_voice(voice) {
            return Err(Error::InvalidInput(format!("Unknown voice: {}", voice)));
        }
    }
    Ok(())
}

/// Reserve `audio_<unix-ms>.wav`, bumped past any existing file
///
/// The file is created empty so concurrent requests never share a name.
fn next_output_path(output_dir: &FsPath) -> Result<(String, PathBuf), Error> {
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let filename = format!("audio_{}.wav", stamp);
        let path = output_dir.join(&filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok((filename, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => stamp += 1,
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

/// Speaker turns with voices, when the request is a multi-speaker script
fn speaker_segments(request: &GenerateAudioRequest) -> Option<Vec<VoicedSegment>> {
    let speakers = request.speakers.as_ref().filter(|s| !s.is_empty())?;

    let segments = parse_script(&request.text);
    if segments.iter().all(|s| s.speaker.is_none()) {
        return None;
    }

    let pairs: Vec<(String, String)> = speakers
        .iter()
        .map(|s| (s.speaker.clone(), s.voice_name.clone()))
        .collect();

    let mut voiced = assign_voices(segments, &pairs);
    // Unassigned turns use the request voice before the provider default
    for segment in voiced.iter_mut().filter(|s| s.voice.is_none()) {
        segment.voice = request.voice.clone();
    }
    Some(voiced)
}

/// Synthesize each turn to a part file and join them into `output`
async fn synthesize_script(
    state: &AppState,
    segments: Vec<VoicedSegment>,
    output: &FsPath,
) -> Result<(), Error> {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio")
        .to_string();

    let mut parts = Vec::with_capacity(segments.len());
    let mut result = Ok(());

    for (index, segment) in segments.into_iter().enumerate() {
        let part = output.with_file_name(format!("{}_part{}.wav", stem, index));
        let opts = SpeakOptions {
            voice_name: segment.voice,
        };
        result = state.tts.generate_audio_file(&segment.text, &part, &opts).await;
        parts.push(part);
        if result.is_err() {
            break;
        }
    }

    if result.is_ok() {
        let inputs = parts.clone();
        let target = output.to_path_buf();
        result = tokio::task::spawn_blocking(move || concatenate_wav_files(&inputs, &target))
            .await
            .unwrap_or_else(|e| Err(Error::Internal(format!("Concatenation task failed: {}", e))));
    }

    for part in &parts {
        if let Err(e) = tokio::fs::remove_file(part).await {
            warn!("Failed to remove {}: {}", part.display(), e);
        }
    }

    result
}

// ============================================================================
// Audio Serving
// ============================================================================

/// GET /api/audio/:filename
///
/// Queues the file on the server player, then returns its bytes.
pub async fn serve_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    if !is_plain_file_name(&filename) {
        return Err(Error::InvalidInput(format!("Invalid file name: {}", filename)).into());
    }

    let path = state.output_dir.join(&filename);
    if !path.is_file() {
        return Err(Error::NotFound(PathBuf::from(&filename)).into());
    }

    state.controller.enqueue(&path)?;
    let bytes = tokio::fs::read(&path).await.map_err(Error::Io)?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// A single path component with no separators or dot segments
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && FsPath::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

// ============================================================================
// Player Control
// ============================================================================

/// GET /api/play
pub async fn play(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let message = match state.controller.play()? {
        PlayOutcome::Started => "Playback started",
        PlayOutcome::AlreadyPlaying => "Playback already in progress",
    };
    Ok(Json(json!({ "message": message })))
}

/// GET /api/next
pub async fn next(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.controller.skip()?;
    Ok(Json(json!({ "message": "Skipping to next track" })))
}

/// GET /api/player/status
pub async fn player_status(State(state): State<AppState>) -> Json<PlayerStatusResponse> {
    let snapshot = state.controller.snapshot();
    Json(PlayerStatusResponse {
        state: snapshot.state.to_string(),
        is_playing: snapshot.state.is_playing(),
        current_track: snapshot.current.map(|t| t.to_string()),
        queue: snapshot.pending.iter().map(|t| t.to_string()).collect(),
    })
}
