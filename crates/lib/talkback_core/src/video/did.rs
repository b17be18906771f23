//! D-ID Clips provider.
//!
//! `POST /clips` creates a presenter clip from text, `GET /clips/{id}`
//! reports its progress. Both calls carry their own timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{JobStatus, SynthesisJob, VideoError, VideoProvider};
use crate::completion::parse_error_body;

/// Presenter, voice and transport settings for clip creation.
#[derive(Debug, Clone)]
pub struct ClipSettings {
    /// API base URL, without trailing slash.
    pub api_url: String,
    pub presenter_id: String,
    /// Text-to-speech vendor, e.g. `microsoft`.
    pub voice_provider: String,
    pub voice_id: String,
    pub result_format: String,
    pub crop: String,
    pub submit_timeout: Duration,
    pub status_timeout: Duration,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.d-id.com".to_string(),
            presenter_id: "lily-ldwi8a_LdG".to_string(),
            voice_provider: "microsoft".to_string(),
            voice_id: "Sara".to_string(),
            result_format: "mp4".to_string(),
            crop: "wide".to_string(),
            submit_timeout: Duration::from_secs(15),
            status_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Serialize)]
struct VoiceProvider<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    voice_id: &'a str,
}

#[derive(Serialize)]
struct Script<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    subtitles: &'a str,
    provider: VoiceProvider<'a>,
    input: &'a str,
    ssml: &'a str,
}

#[derive(Serialize)]
struct ClipConfig<'a> {
    result_format: &'a str,
}

#[derive(Serialize)]
struct Crop<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct PresenterConfig<'a> {
    crop: Crop<'a>,
}

#[derive(Serialize)]
struct CreateClip<'a> {
    presenter_id: &'a str,
    script: Script<'a>,
    config: ClipConfig<'a>,
    presenter_config: PresenterConfig<'a>,
}

#[derive(Deserialize)]
struct CreatedClip {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ClipState {
    id: Option<String>,
    status: Option<String>,
    result_url: Option<String>,
}

/// D-ID Clips API client authenticated with a Basic key.
pub struct DidClips {
    client: Client,
    api_key: String,
    settings: ClipSettings,
}

impl DidClips {
    pub fn new(client: Client, api_key: impl Into<String>, settings: ClipSettings) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            settings,
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("accept", "application/json")
            .header("authorization", format!("Basic {}", self.api_key))
    }

    fn create_body<'a>(&'a self, script: &'a str) -> CreateClip<'a> {
        let s = &self.settings;
        CreateClip {
            presenter_id: &s.presenter_id,
            script: Script {
                kind: "text",
                subtitles: "false",
                provider: VoiceProvider {
                    kind: &s.voice_provider,
                    voice_id: &s.voice_id,
                },
                input: script,
                ssml: "false",
            },
            config: ClipConfig {
                result_format: &s.result_format,
            },
            presenter_config: PresenterConfig {
                crop: Crop { kind: &s.crop },
            },
        }
    }
}

/// Turn a non-2xx response into [`VideoError::Upstream`].
async fn check(resp: Response) -> Result<Response, VideoError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let raw = resp.text().await.unwrap_or_default();
    Err(VideoError::Upstream {
        status: status.as_u16(),
        body: parse_error_body(raw),
    })
}

#[async_trait]
impl VideoProvider for DidClips {
    async fn submit(&self, script: &str) -> Result<String, VideoError> {
        let url = format!("{}/clips", self.settings.api_url);
        let resp = self
            .authorized(self.client.post(&url))
            .timeout(self.settings.submit_timeout)
            .json(&self.create_body(script))
            .send()
            .await
            .map_err(|e| VideoError::Transport(e.to_string()))?;

        let created: CreatedClip = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| VideoError::Malformed(format!("clip create parse error: {e}")))?;

        created
            .id
            .ok_or_else(|| VideoError::Malformed("clip create response has no id".into()))
    }

    async fn status(&self, job_id: &str) -> Result<SynthesisJob, VideoError> {
        let url = format!("{}/clips/{}", self.settings.api_url, job_id);
        let resp = self
            .authorized(self.client.get(&url))
            .timeout(self.settings.status_timeout)
            .send()
            .await
            .map_err(|e| VideoError::Transport(e.to_string()))?;

        let state: ClipState = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| VideoError::Malformed(format!("clip status parse error: {e}")))?;

        Ok(SynthesisJob {
            id: state.id.unwrap_or_else(|| job_id.to_string()),
            status: JobStatus::from_provider(state.status.as_deref().unwrap_or_default()),
            result_url: state.result_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_shape() {
        let clips = DidClips::new(Client::new(), "key", ClipSettings::default());
        let body = serde_json::to_value(clips.create_body("Hello there")).unwrap();
        assert_eq!(body["presenter_id"], "lily-ldwi8a_LdG");
        assert_eq!(body["script"]["type"], "text");
        assert_eq!(body["script"]["input"], "Hello there");
        assert_eq!(body["script"]["subtitles"], "false");
        assert_eq!(body["script"]["ssml"], "false");
        assert_eq!(body["script"]["provider"]["type"], "microsoft");
        assert_eq!(body["script"]["provider"]["voice_id"], "Sara");
        assert_eq!(body["config"]["result_format"], "mp4");
        assert_eq!(body["presenter_config"]["crop"]["type"], "wide");
    }
}
