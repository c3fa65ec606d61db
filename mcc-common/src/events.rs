//! Push-channel wire protocol
//!
//! Every frame on the realtime channel is a JSON text envelope:
//!
//! ```json
//! {"event": "status_update", "data": {"status": "playing", "currentTrack": null}}
//! ```
//!
//! Outbound commands without a payload omit `data` entirely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PlaybackStatus, TrackId};
use crate::{Error, Result};

/// Inbound event name: playback status changed
pub const EVENT_STATUS_UPDATE: &str = "status_update";
/// Inbound event name: result of a previously emitted command
pub const EVENT_COMMAND_RESPONSE: &str = "command_response";

/// Raw frame as sent on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl Envelope {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Protocol(format!("invalid envelope: {}", e)))
    }
}

/// Transport command emitted by the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play { track_id: TrackId },
    Pause,
    Stop,
    Skip,
}

impl Command {
    /// Event name on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::Play { .. } => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Skip => "skip",
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        let data = match self {
            Command::Play { track_id } => serde_json::json!({ "track_id": track_id }),
            Command::Pause | Command::Stop | Command::Skip => Value::Null,
        };
        Envelope {
            event: self.name().to_string(),
            data,
        }
    }

    /// Decode a command frame (used by test servers and tooling)
    pub fn from_envelope(envelope: &Envelope) -> Result<Self> {
        match envelope.event.as_str() {
            "play" => {
                #[derive(Deserialize)]
                struct PlayPayload {
                    track_id: TrackId,
                }
                let payload: PlayPayload = serde_json::from_value(envelope.data.clone())
                    .map_err(|e| Error::Protocol(format!("invalid play payload: {}", e)))?;
                Ok(Command::Play {
                    track_id: payload.track_id,
                })
            }
            "pause" => Ok(Command::Pause),
            "stop" => Ok(Command::Stop),
            "skip" => Ok(Command::Skip),
            other => Err(Error::Protocol(format!("unknown command: {}", other))),
        }
    }
}

/// Payload of `command_response`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }
}

/// Event pushed by the media-control service
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    StatusUpdate(PlaybackStatus),
    CommandResponse(CommandResponse),
    /// Any event name this client does not handle
    Unknown { event: String },
}

impl ServerEvent {
    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        match envelope.event.as_str() {
            EVENT_STATUS_UPDATE => serde_json::from_value(envelope.data)
                .map(ServerEvent::StatusUpdate)
                .map_err(|e| Error::Protocol(format!("invalid status_update payload: {}", e))),
            EVENT_COMMAND_RESPONSE => serde_json::from_value(envelope.data)
                .map(ServerEvent::CommandResponse)
                .map_err(|e| Error::Protocol(format!("invalid command_response payload: {}", e))),
            _ => Ok(ServerEvent::Unknown {
                event: envelope.event,
            }),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_envelope(Envelope::from_json(text)?)
    }

    pub fn to_envelope(&self) -> Result<Envelope> {
        Ok(match self {
            ServerEvent::StatusUpdate(status) => Envelope {
                event: EVENT_STATUS_UPDATE.to_string(),
                data: serde_json::to_value(status)?,
            },
            ServerEvent::CommandResponse(response) => Envelope {
                event: EVENT_COMMAND_RESPONSE.to_string(),
                data: serde_json::to_value(response)?,
            },
            ServerEvent::Unknown { event } => Envelope {
                event: event.clone(),
                data: Value::Null,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaItem, PlayState};
    use serde_json::json;

    #[test]
    fn test_commands_encode_to_wire_shape() {
        let play = Command::Play {
            track_id: TrackId::from(1),
        };
        let wire: Value = serde_json::from_str(&play.to_envelope().to_json().unwrap()).unwrap();
        assert_eq!(wire, json!({"event": "play", "data": {"track_id": 1}}));

        let wire: Value =
            serde_json::from_str(&Command::Skip.to_envelope().to_json().unwrap()).unwrap();
        assert_eq!(wire, json!({"event": "skip"}));
    }

    #[test]
    fn test_status_update_with_null_track() {
        let event = ServerEvent::from_json(
            r#"{"event":"status_update","data":{"status":"stopped","currentTrack":null}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ServerEvent::StatusUpdate(PlaybackStatus {
                status: PlayState::Stopped,
                current_track: None,
            })
        );
    }

    #[test]
    fn test_status_update_wire_uses_camel_case() {
        let event = ServerEvent::StatusUpdate(PlaybackStatus {
            status: PlayState::Playing,
            current_track: Some(MediaItem::new(1, "A", "X", "3:00")),
        });
        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.data["currentTrack"]["title"], json!("A"));
        assert_eq!(ServerEvent::from_envelope(envelope).unwrap(), event);
    }

    #[test]
    fn test_command_response_error_detection() {
        let event = ServerEvent::from_json(
            r#"{"event":"command_response","data":{"status":"error","message":"No track"}}"#,
        )
        .unwrap();
        match event {
            ServerEvent::CommandResponse(response) => {
                assert!(response.is_error());
                assert_eq!(response.message.as_deref(), Some("No track"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_is_not_an_error() {
        let event = ServerEvent::from_json(r#"{"event":"heartbeat"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Unknown {
                event: "heartbeat".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_frames_are_protocol_errors() {
        assert!(matches!(ServerEvent::from_json("not json"), Err(Error::Protocol(_))));
        assert!(matches!(
            ServerEvent::from_json(r#"{"event":"status_update","data":{"status":5}}"#),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_command_decoding() {
        let envelope = Envelope::from_json(r#"{"event":"play","data":{"track_id":"t-9"}}"#).unwrap();
        assert_eq!(
            Command::from_envelope(&envelope).unwrap(),
            Command::Play {
                track_id: TrackId::from("t-9")
            }
        );
        let envelope = Envelope::from_json(r#"{"event":"rewind"}"#).unwrap();
        assert!(Command::from_envelope(&envelope).is_err());
    }
}
