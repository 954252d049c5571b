//! AI meeting-notes summarizer
//!
//! Sends raw notes to a Gemini-style `generateContent` endpoint and
//! expects a JSON object `{"summary": "...", "participants": [...]}`
//! back. Models love to wrap JSON in markdown fences, so the parser
//! strips those first. Returned participant names are matched against
//! the member roster by case-insensitive substring in both directions.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::models::Member;
use std::time::Duration;

use crate::utils::{AppError, AppResult};

/// Parsed analyzer output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesAnalysis {
    pub summary: String,
    /// Participant names as the model reported them
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

const PROMPT_TEMPLATE: &str = "You are an assistant that summarizes business meeting notes. \
Respond with a JSON object only, no prose, with exactly two keys: \
\"summary\" (a concise paragraph) and \"participants\" (an array of the \
full names of people mentioned as attending). Notes:\n\n";

pub struct NotesAnalyzer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl NotesAnalyzer {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Summarize raw notes via the remote model
    pub async fn analyze(&self, notes: &str) -> AppResult<NotesAnalysis> {
        if !self.is_configured() {
            return Err(AppError::AiUnavailable(
                "AI_API_KEY is not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("{PROMPT_TEMPLATE}{notes}") }]
            }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::AiTimeout
                } else {
                    AppError::AiUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::AiUnavailable(format!(
                "Upstream returned {status}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::MalformedAiResponse(e.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| AppError::MalformedAiResponse("No candidates in response".into()))?;

        parse_analysis(text)
    }
}

/// Parse the model's text into [`NotesAnalysis`], tolerating fences
pub fn parse_analysis(text: &str) -> AppResult<NotesAnalysis> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str::<NotesAnalysis>(cleaned)
        .map_err(|e| AppError::MalformedAiResponse(format!("Not the expected JSON shape: {e}")))
}

/// Strip a surrounding markdown code fence (with or without a
/// language tag) if present
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

/// Map reported participant names to roster member ids.
///
/// A name matches a member when either string contains the other,
/// case-insensitively. Unmatched names are dropped; duplicates
/// collapse to one id.
pub fn match_roster(names: &[String], roster: &[Member]) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in names {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for member in roster {
            let candidate = member.name.trim().to_lowercase();
            if candidate.is_empty() {
                continue;
            }
            if (candidate.contains(&needle) || needle.contains(&candidate))
                && !ids.contains(&member.id)
            {
                ids.push(member.id);
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, name: &str) -> Member {
        Member {
            id,
            name: name.into(),
            email: format!("m{id}@example.com"),
            password_hash: None,
            role: "basic".into(),
            company: None,
            position: None,
            phone: None,
            description: None,
            quota_period: None,
            quota_used: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_strip_fences_variants() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_analysis_fenced() {
        let text = "```json\n{\"summary\": \"Quarterly sync.\", \"participants\": [\"Ana Gomez\"]}\n```";
        let analysis = parse_analysis(text).expect("should parse");
        assert_eq!(analysis.summary, "Quarterly sync.");
        assert_eq!(analysis.participants, vec!["Ana Gomez"]);
    }

    #[test]
    fn test_parse_analysis_missing_participants_defaults_empty() {
        let analysis = parse_analysis("{\"summary\": \"Short.\"}").expect("should parse");
        assert!(analysis.participants.is_empty());
    }

    #[test]
    fn test_parse_analysis_garbage_is_error() {
        assert!(parse_analysis("I could not summarize that.").is_err());
    }

    #[test]
    fn test_match_roster_substring_both_directions() {
        let roster = vec![member(1, "Ana Gomez"), member(2, "Benjamin Oduya")];
        // Model reported a shorter form.
        let ids = match_roster(&["Ana".to_string()], &roster);
        assert_eq!(ids, vec![1]);
        // Model reported a longer form.
        let ids = match_roster(&["Mr. Benjamin Oduya Jr".to_string()], &roster);
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_match_roster_case_insensitive_and_deduped() {
        let roster = vec![member(1, "Ana Gomez")];
        let ids = match_roster(&["ANA GOMEZ".to_string(), "ana".to_string()], &roster);
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_match_roster_unmatched_dropped() {
        let roster = vec![member(1, "Ana Gomez")];
        let ids = match_roster(&["Zoe".to_string(), "".to_string()], &roster);
        assert!(ids.is_empty());
    }
}
