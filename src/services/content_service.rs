use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::text_helpers::{
        collapse_whitespace, html_title, html_to_text, transcript_text, youtube_video_id,
    },
};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    WebPage,
    YouTube,
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    /// Display title discovered while extracting, if the source has one.
    pub title: Option<String>,
}

impl ExtractedContent {
    fn untitled(text: String) -> Self {
        Self { text, title: None }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, kind: SourceKind, payload: &str) -> AppResult<ExtractedContent>;
}

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
}

pub struct HttpContentExtractor {
    client: Client,
    transcript_language: String,
    timedtext_url: String,
    oembed_url: String,
}

impl HttpContentExtractor {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::InternalError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            transcript_language: config.transcript_language.clone(),
            timedtext_url: config.youtube_timedtext_url.clone(),
            oembed_url: config.youtube_oembed_url.clone(),
        })
    }

    async fn fetch_text(&self, url: Url) -> AppResult<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::ExtractionError(format!("failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExtractionError(format!(
                "{} answered with status {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::ExtractionError(format!("failed to read {}: {}", url, e)))
    }

    async fn extract_web_page(&self, payload: &str) -> AppResult<ExtractedContent> {
        let url = parse_http_url(payload)?;
        let html = self.fetch_text(url).await?;

        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(AppError::ExtractionError(
                "the page contains no readable text".to_string(),
            ));
        }

        Ok(ExtractedContent {
            text,
            title: html_title(&html),
        })
    }

    async fn extract_youtube(&self, payload: &str) -> AppResult<ExtractedContent> {
        let url = parse_http_url(payload)?;
        let video_id = youtube_video_id(url.as_str())
            .ok_or_else(|| AppError::ExtractionError(format!("'{}' is not a YouTube video", url)))?;

        let transcript_url = Url::parse_with_params(
            &self.timedtext_url,
            &[("lang", self.transcript_language.as_str()), ("v", video_id.as_str())],
        )
        .map_err(|e| AppError::InternalError(format!("invalid transcript URL: {}", e)))?;

        let text = transcript_text(&self.fetch_text(transcript_url).await?);
        if text.is_empty() {
            return Err(AppError::ExtractionError(format!(
                "no '{}' transcript is available for video {}",
                self.transcript_language, video_id
            )));
        }

        Ok(ExtractedContent {
            text,
            title: self.video_title(&url).await,
        })
    }

    /// Best effort: a missing title falls back to the default label.
    async fn video_title(&self, video_url: &Url) -> Option<String> {
        let oembed_url = Url::parse_with_params(
            &self.oembed_url,
            &[("url", video_url.as_str()), ("format", "json")],
        )
        .ok()?;

        let response = match self.client.get(oembed_url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                log::debug!("oEmbed lookup answered with status {}", response.status());
                return None;
            }
            Err(e) => {
                log::debug!("oEmbed lookup failed: {}", e);
                return None;
            }
        };

        response
            .json::<OEmbed>()
            .await
            .ok()
            .and_then(|oembed| oembed.title)
            .map(|title| collapse_whitespace(&title))
            .filter(|title| !title.is_empty())
    }
}

#[async_trait]
impl ContentExtractor for HttpContentExtractor {
    async fn extract(&self, kind: SourceKind, payload: &str) -> AppResult<ExtractedContent> {
        match kind {
            SourceKind::Text => extract_plain_text(payload),
            SourceKind::Pdf => extract_pdf(payload).await,
            SourceKind::WebPage => self.extract_web_page(payload).await,
            SourceKind::YouTube => self.extract_youtube(payload).await,
        }
    }
}

fn extract_plain_text(payload: &str) -> AppResult<ExtractedContent> {
    let text = payload.trim();
    if text.is_empty() {
        return Err(AppError::ExtractionError("the pasted text is empty".to_string()));
    }
    Ok(ExtractedContent::untitled(text.to_string()))
}

async fn extract_pdf(payload: &str) -> AppResult<ExtractedContent> {
    let bytes = decode_pdf_payload(payload)?;

    let raw = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::ExtractionError(format!("PDF extraction was interrupted: {}", e)))?
    .map_err(|e| AppError::ExtractionError(format!("could not read the PDF: {}", e)))?;

    let text = collapse_whitespace(&raw);
    if text.is_empty() {
        return Err(AppError::ExtractionError(
            "the PDF contains no extractable text".to_string(),
        ));
    }
    Ok(ExtractedContent::untitled(text))
}

/// Accepts bare base64 or a `data:<mime>;base64,` URL. Whitespace inside the
/// encoded body is ignored.
fn decode_pdf_payload(payload: &str) -> AppResult<Vec<u8>> {
    let trimmed = payload.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(data_url) => data_url
            .split_once(',')
            .map(|(_, body)| body)
            .ok_or_else(|| AppError::ExtractionError("malformed data URL".to_string()))?,
        None => trimmed,
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::ExtractionError(format!("the file is not valid base64: {}", e)))?;

    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::ExtractionError(
            "the uploaded file is not a PDF".to_string(),
        ));
    }
    Ok(bytes)
}

fn parse_http_url(payload: &str) -> AppResult<Url> {
    let trimmed = payload.trim();
    let url = Url::parse(trimmed).map_err(|e| {
        AppError::ExtractionError(format!("'{}' is not a valid URL: {}", trimmed, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::ExtractionError(format!(
            "unsupported URL scheme '{}'",
            scheme
        ))),
    }
}
