//! Multi-speaker scripts
//!
//! A script marks speaker turns with `[NAME]`:
//!
//! ```text
//! [NARRATOR] It was a dark night. [ALICE] Who's there?
//! ```
//!
//! Text before the first marker belongs to no speaker. A `[` that is not closed
//! on the same turn is kept as literal text.

use std::collections::HashMap;

/// One speaker turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSegment {
    pub speaker: Option<String>,
    pub text: String,
}

/// A turn with its voice resolved; `None` means the provider default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicedSegment {
    pub voice: Option<String>,
    pub text: String,
}

/// Split a script into speaker turns, dropping empty ones
pub fn parse_script(text: &str) -> Vec<ScriptSegment> {
    let mut segments = Vec::new();
    let mut speaker: Option<String> = None;
    let mut pending = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if is_speaker_name(&after[..close]) => {
                pending.push_str(&rest[..open]);
                push_segment(&mut segments, speaker.take(), &pending);
                pending.clear();
                speaker = Some(after[..close].trim().to_string());
                rest = &after[close + 1..];
            }
            _ => {
                pending.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }

    pending.push_str(rest);
    push_segment(&mut segments, speaker, &pending);
    segments
}

fn is_speaker_name(candidate: &str) -> bool {
    let name = candidate.trim();
    !name.is_empty() && !name.contains('[')
}

fn push_segment(segments: &mut Vec<ScriptSegment>, speaker: Option<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(ScriptSegment {
            speaker,
            text: text.to_string(),
        });
    }
}

/// Map speaker names to voices.
///
/// Speaker names match case-insensitively. Turns by unassigned speakers, or
/// by no speaker, fall back to the provider default.
pub fn assign_voices(
    segments: Vec<ScriptSegment>,
    speakers: &[(String, String)],
) -> Vec<VoicedSegment> {
    let by_speaker: HashMap<String, &str> = speakers
        .iter()
        .map(|(speaker, voice)| (speaker.trim().to_uppercase(), voice.as_str()))
        .collect();

    segments
        .into_iter()
        .map(|segment| VoicedSegment {
            voice: segment
                .speaker
                .as_ref()
                .and_then(|s| by_speaker.get(&s.to_uppercase()))
                .map(|v| v.to_string()),
            text: segment.text,
        })
        .collect()
}
