//! Fixed instructions sent to the model

pub const SUMMARY_SCHEMA_NAME: &str = "diary_summary";

pub const SUMMARY_SYSTEM_PROMPT: &str = "\
You turn a day's chat between a user and Tori, their journaling companion, into a short diary entry.

Rules:
- Summarize only what the user said, did or felt. Never copy or paraphrase Tori's (assistant) lines.
- Write each summary line in the language the user wrote in, in the user's first-person voice.
- One event or feeling per line, in the order it came up. At most five lines.
- Pick the single emotion that best matches the user's day: very_happy, happy, neutral, sad, very_sad or angry.
- If the user shared nothing about their day, return an empty summary and neutral.";

/// Strict JSON schema of the diary summary
pub fn summary_json_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "emotion": {
                "type": "string",
                "enum": ["very_happy", "happy", "neutral", "sad", "very_sad", "angry"]
            },
            "summary": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "content": {"type": "string"}
                    },
                    "required": ["content"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["emotion", "summary"],
        "additionalProperties": false
    })
}
