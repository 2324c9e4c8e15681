//! Meeting-transcript webhook payloads and their projection onto the
//! `OSP_DOCUMENTS` field schema.

use crate::client::TrackorClient;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Trackor type every transcript is filed as
pub const DOCUMENT_TRACKOR_TYPE: &str = "OSP_DOCUMENTS";

/// Trackor type of the parent record
pub const PARENT_TRACKOR_TYPE: &str = "Client";

/// `XITOR_KEY` of the client every transcript is filed under
pub const PARENT_XITOR_KEY: &str = "Float Fiber";

fn empty_list() -> Value {
    json!([])
}

fn empty_object() -> Value {
    json!({})
}

/// Inbound transcript summary. Only the shape that the projection walks is
/// typed; scalar values are kept as raw JSON and forwarded unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub session_id: Value,
    #[serde(default)]
    pub trigger: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub start_time: Value,
    #[serde(default)]
    pub end_time: Value,
    #[serde(default = "empty_list")]
    pub participants: Value,
    #[serde(default = "empty_object")]
    pub owner: Value,
    #[serde(default)]
    pub summary: Value,
    #[serde(default)]
    pub action_items: Vec<TextItem>,
    #[serde(default)]
    pub key_questions: Vec<TextItem>,
    #[serde(default)]
    pub topics: Vec<TextItem>,
    #[serde(default)]
    pub report_url: Value,
    #[serde(default)]
    pub chapter_summaries: Vec<ChapterSummary>,
    #[serde(default)]
    pub transcript: Transcript,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextItem {
    #[serde(default)]
    pub text: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterSummary {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub topics: Vec<TextItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub speaker_blocks: Vec<SpeakerBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Speaker {
    #[serde(default)]
    pub name: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakerBlock {
    #[serde(default)]
    pub start_time: Value,
    #[serde(default)]
    pub end_time: Value,
    #[serde(default)]
    pub speaker: Speaker,
    #[serde(default)]
    pub words: Value,
}

/// Fields read from the payload that are not stored on the document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionExtras {
    pub trigger: Value,
    pub end_time: Value,
    pub key_questions: Vec<Value>,
    pub topics: Vec<Value>,
    pub chapter_summaries: Vec<ChapterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterRecord {
    pub title: Value,
    pub description: Value,
    pub topics: Vec<Value>,
}

/// `OSP_DOCUMENTS` record built from one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingRecord {
    #[serde(rename = "OSPD_SESSION_ID")]
    pub session_id: Value,
    #[serde(rename = "OSPD_MEETING_TITLE")]
    pub title: Value,
    #[serde(rename = "OSPD_MEETING_TIME")]
    pub meeting_time: Value,
    #[serde(rename = "OSPD_PARTICIPANTS")]
    pub participants: Value,
    #[serde(rename = "OSPD_MEETING_OWNER")]
    pub owner: Value,
    #[serde(rename = "OSPD_MEETING_SUMMARY")]
    pub summary: Value,
    #[serde(rename = "OSPD_ACTION_ITEMS")]
    pub action_items: Vec<Value>,
    #[serde(rename = "OSPD_REPORT_URL")]
    pub report_url: Value,
    #[serde(rename = "OSPD_MEETING_TRANSCRIPT")]
    pub transcript: TranscriptRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRecord {
    pub speakers: Vec<Value>,
    pub speaker_blocks: Vec<BlockRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecord {
    pub start_time: Value,
    pub end_time: Value,
    pub speaker: Value,
    pub words: Value,
}

fn texts(items: &[TextItem]) -> Vec<Value> {
    items.iter().map(|item| item.text.clone()).collect()
}

impl WebhookPayload {
    /// Parse a raw webhook body. The body must be a JSON object.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("webhook payload must be a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Project the payload onto the document schema
    pub fn to_record(&self) -> MeetingRecord {
        MeetingRecord {
            session_id: self.session_id.clone(),
            title: self.title.clone(),
            meeting_time: self.start_time.clone(),
            participants: self.participants.clone(),
            owner: self.owner.clone(),
            summary: self.summary.clone(),
            action_items: texts(&self.action_items),
            report_url: self.report_url.clone(),
            transcript: TranscriptRecord {
                speakers: self
                    .transcript
                    .speakers
                    .iter()
                    .map(|s| s.name.clone())
                    .collect(),
                speaker_blocks: self
                    .transcript
                    .speaker_blocks
                    .iter()
                    .map(|block| BlockRecord {
                        start_time: block.start_time.clone(),
                        end_time: block.end_time.clone(),
                        speaker: block.speaker.name.clone(),
                        words: block.words.clone(),
                    })
                    .collect(),
            },
        }
    }

    /// Everything read from the payload that `to_record` leaves out
    pub fn extras(&self) -> SessionExtras {
        SessionExtras {
            trigger: self.trigger.clone(),
            end_time: self.end_time.clone(),
            key_questions: texts(&self.key_questions),
            topics: texts(&self.topics),
            chapter_summaries: self
                .chapter_summaries
                .iter()
                .map(|ch| ChapterRecord {
                    title: ch.title.clone(),
                    description: ch.description.clone(),
                    topics: texts(&ch.topics),
                })
                .collect(),
        }
    }
}

/// Turns webhook payloads into `OSP_DOCUMENTS` trackors
#[derive(Clone)]
pub struct WebhookIngestor {
    client: TrackorClient,
}

impl WebhookIngestor {
    pub fn new(client: TrackorClient) -> Self {
        Self { client }
    }

    /// Project `payload` and file it under the fixed parent client.
    ///
    /// A failed create is logged and otherwise ignored; the projected record
    /// is returned either way.
    pub async fn ingest(&self, payload: &WebhookPayload) -> MeetingRecord {
        let record = payload.to_record();
        debug!("Session extras not stored: {:?}", payload.extras());

        let parent_filter = json!({ "XITOR_KEY": PARENT_XITOR_KEY });
        match self
            .client
            .trackors()
            .create_child_trackor(DOCUMENT_TRACKOR_TYPE, &record, PARENT_TRACKOR_TYPE, &parent_filter)
            .await
        {
            Ok(new_trackor) => info!("Successfully created trackor {}", new_trackor),
            Err(e) => error!("Failed to create trackor: {}", e),
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_lists_become_empty() {
        let record = parse(json!({"session_id": "s1"})).to_record();
        let body = serde_json::to_value(&record).unwrap();

        assert_eq!(body["OSPD_ACTION_ITEMS"], json!([]));
        assert_eq!(body["OSPD_PARTICIPANTS"], json!([]));
        assert_eq!(body["OSPD_MEETING_OWNER"], json!({}));
        assert_eq!(body["OSPD_MEETING_TITLE"], Value::Null);
        assert_eq!(
            body["OSPD_MEETING_TRANSCRIPT"],
            json!({"speakers": [], "speaker_blocks": []})
        );
    }

    #[test]
    fn test_full_projection() {
        let payload = parse(json!({
            "session_id": "s1",
            "title": "Weekly Sync",
            "start_time": "2024-05-01T10:00:00Z",
            "participants": ["A", "B"],
            "owner": {"name": "A", "email": "a@example.com"},
            "summary": "Went well",
            "action_items": [{"text": "do X"}, {"text": "do Y"}],
            "report_url": "https://reports/s1",
            "transcript": {
                "speakers": [{"name": "A"}, {"name": "B"}],
                "speaker_blocks": [
                    {"start_time": 0, "end_time": 5, "speaker": {"name": "A"}, "words": "hello"}
                ]
            }
        }));
        let body = serde_json::to_value(payload.to_record()).unwrap();

        assert_eq!(
            body,
            json!({
                "OSPD_SESSION_ID": "s1",
                "OSPD_MEETING_TITLE": "Weekly Sync",
                "OSPD_MEETING_TIME": "2024-05-01T10:00:00Z",
                "OSPD_PARTICIPANTS": ["A", "B"],
                "OSPD_MEETING_OWNER": {"name": "A", "email": "a@example.com"},
                "OSPD_MEETING_SUMMARY": "Went well",
                "OSPD_ACTION_ITEMS": ["do X", "do Y"],
                "OSPD_REPORT_URL": "https://reports/s1",
                "OSPD_MEETING_TRANSCRIPT": {
                    "speakers": ["A", "B"],
                    "speaker_blocks": [
                        {"start_time": 0, "end_time": 5, "speaker": "A", "words": "hello"}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_dropped_fields_do_not_reach_record() {
        let payload = parse(json!({
            "trigger": "meeting_end",
            "end_time": "2024-05-01T11:00:00Z",
            "key_questions": [{"text": "why?"}],
            "topics": [{"text": "budget"}],
            "chapter_summaries": [
                {"title": "Intro", "description": "hi", "topics": [{"text": "greeting"}]}
            ]
        }));
        let body = serde_json::to_value(payload.to_record()).unwrap();
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            [
                "OSPD_SESSION_ID",
                "OSPD_MEETING_TITLE",
                "OSPD_MEETING_TIME",
                "OSPD_PARTICIPANTS",
                "OSPD_MEETING_OWNER",
                "OSPD_MEETING_SUMMARY",
                "OSPD_ACTION_ITEMS",
                "OSPD_REPORT_URL",
                "OSPD_MEETING_TRANSCRIPT",
            ]
        );

        let extras = payload.extras();
        assert_eq!(extras.trigger, json!("meeting_end"));
        assert_eq!(extras.key_questions, vec![json!("why?")]);
        assert_eq!(extras.topics, vec![json!("budget")]);
        assert_eq!(extras.chapter_summaries[0].topics, vec![json!("greeting")]);
    }

    #[test]
    fn test_block_without_speaker() {
        let payload = parse(json!({
            "transcript": {"speaker_blocks": [{"start_time": 1, "words": "..."}]}
        }));
        let record = payload.to_record();
        let block = &record.transcript.speaker_blocks[0];

        assert_eq!(block.speaker, Value::Null);
        assert_eq!(block.end_time, Value::Null);
        assert_eq!(block.words, json!("..."));
    }

    #[test]
    fn test_action_item_without_text() {
        let record = parse(json!({"action_items": [{"owner": "A"}, {"text": "ship"}]})).to_record();
        assert_eq!(record.action_items, vec![Value::Null, json!("ship")]);
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(WebhookPayload::from_slice(br#"["not", "an", "object"]"#).is_err());
        assert!(WebhookPayload::from_slice(b"{not json").is_err());
        assert!(WebhookPayload::from_slice(b"{}").is_ok());
    }
}
