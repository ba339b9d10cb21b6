// API client module: a small blocking HTTP client for the imgflip API.
// Every call is a single GET against the remote service; nothing is cached,
// so each lookup reflects the catalog as the API reports it right now.

use crate::config::{Config, Credentials};
use crate::error::MemeError;
use reqwest::blocking::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Blocking client for the imgflip API. Holds the reqwest client, the
/// API base URL and the credentials used for captioning.
#[derive(Clone)]
pub struct MemeClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

/// A reusable meme image with a fixed text-box layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MemeTemplate {
    pub id: String,
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub box_count: u32,
}

/// Rendered meme returned by a successful caption request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaptionData {
    pub url: String,
    pub page_url: String,
}

/// Raw result of a caption request. `success: false` is a normal answer
/// from the API (bad credentials, unknown template, ...), not an error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaptionResult {
    pub success: bool,
    #[serde(default)]
    pub data: Option<CaptionData>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// What a caption request amounted to, for callers that only want to
/// show the URL or the reason it was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    Created(CaptionData),
    Rejected(String),
}

impl CaptionResult {
    pub fn outcome(&self) -> CaptionOutcome {
        match (&self.data, &self.error_message) {
            (Some(data), _) if self.success => CaptionOutcome::Created(data.clone()),
            (_, Some(message)) if !message.is_empty() => CaptionOutcome::Rejected(message.clone()),
            _ => CaptionOutcome::Rejected("unknown error".into()),
        }
    }
}

/// The API's uniform JSON wrapper.
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TemplateList {
    memes: Vec<MemeTemplate>,
}

#[derive(Deserialize, Debug)]
struct SingleTemplate {
    meme: MemeTemplate,
}

impl MemeClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: Config) -> Result<Self, MemeError> {
        let client = build_http_client(Client::builder())?;
        Ok(MemeClient {
            client,
            base_url: config.base_url,
            credentials: config.credentials,
        })
    }

    /// Fetch the full template catalog.
    pub fn list_templates(&self) -> Result<Vec<MemeTemplate>, MemeError> {
        let list: TemplateList = self.get_data("get_memes", &[])?;
        if let Some(bad) = list
            .memes
            .iter()
            .find(|m| m.id.is_empty() || m.name.is_empty() || m.url.is_empty())
        {
            return Err(MemeError::Protocol(format!(
                "template with empty id, name or url: {:?}",
                bad
            )));
        }
        debug!(count = list.memes.len(), "fetched templates");
        Ok(list.memes)
    }

    /// Fetch a single template. The id is passed through untouched; the
    /// API decides whether it exists.
    pub fn get_template_by_id(&self, id: &str) -> Result<MemeTemplate, MemeError> {
        let single: SingleTemplate = self.get_data("get_meme", &[("id", id)])?;
        Ok(single.meme)
    }

    /// First template whose name matches exactly (case-sensitive).
    pub fn find_template_by_name(&self, name: &str) -> Result<Option<MemeTemplate>, MemeError> {
        Ok(self.list_templates()?.into_iter().find(|m| m.name == name))
    }

    /// First template whose image URL matches exactly.
    pub fn find_template_by_url(&self, url: &str) -> Result<Option<MemeTemplate>, MemeError> {
        Ok(self.list_templates()?.into_iter().find(|m| m.url == url))
    }

    /// Caption a template with top and bottom text.
    ///
    /// Only transport and parsing problems are returned as errors; an API
    /// refusal comes back as a `CaptionResult` with `success == false`.
    pub fn caption_meme(
        &self,
        template_id: &str,
        top_text: &str,
        bottom_text: &str,
    ) -> Result<CaptionResult, MemeError> {
        let params = [
            ("template_id", template_id),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("text0", top_text),
            ("text1", bottom_text),
        ];
        let result: CaptionResult = self.get_json("caption_image", &params)?;
        if result.success && result.data.is_none() {
            return Err(MemeError::Protocol(
                "caption succeeded but response has no data".into(),
            ));
        }
        if !result.success {
            debug!(
                template_id,
                error = result.error_message.as_deref().unwrap_or(""),
                "caption request rejected"
            );
        }
        Ok(result)
    }

    /// GET an endpoint and unwrap the envelope's `data`.
    fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MemeError> {
        let envelope: Envelope<T> = self.get_json(endpoint, query)?;
        if !envelope.success {
            return Err(MemeError::Api(
                envelope
                    .error_message
                    .unwrap_or_else(|| format!("{} reported failure", endpoint)),
            ));
        }
        envelope
            .data
            .ok_or_else(|| MemeError::Protocol(format!("{} response has no data", endpoint)))
    }

    /// GET an endpoint and parse the body as JSON. The body is read as text
    /// first so a transport failure and a bad payload stay distinguishable.
    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MemeError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "sending request");
        // Transport errors would otherwise echo the query string, password included.
        let res = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| MemeError::Network(e.without_url()))?;
        let status = res.status();
        let body = res
            .text()
            .map_err(|e| MemeError::Network(e.without_url()))?;
        serde_json::from_str(&body).map_err(|e| {
            MemeError::Protocol(format!(
                "unexpected response from {} (HTTP {}): {}",
                endpoint, status, e
            ))
        })
    }
}

fn build_http_client(builder: ClientBuilder) -> Result<Client, MemeError> {
    builder.build().map_err(MemeError::Client)
}
