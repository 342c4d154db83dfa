//! Retrieval of summary documents from disk or over HTTP.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;
use reqwest::header::{ACCEPT as ACCEPT_HEADER, CONTENT_TYPE};

use crate::error::{Result, SummaryError};

/// Content negotiation preference: Turtle, then N-Triples, then N3.
pub const ACCEPT: &str = "text/turtle;q=1.0,application/n-triples;q=0.7,text/n3;q=0.6";

/// Formats a summary may be written in. Every other format falls back to Turtle.
const NEGOTIATED: [RdfFormat; 3] = [RdfFormat::Turtle, RdfFormat::NTriples, RdfFormat::N3];

/// Where a summary document lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentLocation {
    File(PathBuf),
    Remote(String),
}

impl DocumentLocation {
    /// Classifies `location` as a URL when it carries an http(s) scheme, a path otherwise.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DocumentLocation::Remote(location.to_string())
        } else {
            DocumentLocation::File(PathBuf::from(location))
        }
    }

    /// Canonical graph identifier of the summary: the percent-decoded location.
    ///
    /// Files are identified by a `file://` IRI of their absolute path. When the
    /// decoded form is not a valid IRI the encoded form is used instead.
    pub fn graph_name(&self) -> Result<NamedNode> {
        let raw = match self {
            DocumentLocation::File(path) => file_iri(path)?,
            DocumentLocation::Remote(url) => url.clone(),
        };
        let decoded = urlencoding::decode(&raw).map(|decoded| decoded.into_owned());
        match decoded.ok().and_then(|decoded| NamedNode::new(decoded).ok()) {
            Some(graph) => Ok(graph),
            None => Ok(NamedNode::new(raw)?),
        }
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentLocation::File(path) => write!(f, "{}", path.display()),
            DocumentLocation::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn file_iri(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let path = absolute.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        Ok(format!("file://{}", path))
    } else {
        Ok(format!("file:///{}", path))
    }
}

/// A retrieved summary and the syntax it is written in.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub body: Vec<u8>,
    pub format: RdfFormat,
}

/// Fetches summary documents, negotiating their RDF syntax.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
}

impl DocumentFetcher {
    /// A fetcher whose remote requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, location: &DocumentLocation) -> Result<FetchedDocument> {
        match location {
            DocumentLocation::File(path) => {
                let body = tokio::fs::read(path).await.map_err(|e| {
                    SummaryError::FetchError(format!("cannot read {}: {}", path.display(), e))
                })?;
                let format = path
                    .extension()
                    .and_then(|extension| extension.to_str())
                    .and_then(RdfFormat::from_extension);
                Ok(FetchedDocument { body, format: negotiated(format) })
            }
            DocumentLocation::Remote(url) => {
                let response = self
                    .client
                    .get(url)
                    .header(ACCEPT_HEADER, ACCEPT)
                    .send()
                    .await?
                    .error_for_status()?;
                let format = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| RdfFormat::from_media_type(value));
                let body = response.bytes().await?.to_vec();
                Ok(FetchedDocument { body, format: negotiated(format) })
            }
        }
    }
}

fn negotiated(format: Option<RdfFormat>) -> RdfFormat {
    format.filter(|format| NEGOTIATED.contains(format)).unwrap_or(RdfFormat::Turtle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            DocumentLocation::parse("https://example.org/summary.ttl"),
            DocumentLocation::Remote("https://example.org/summary.ttl".into())
        );
        assert_eq!(
            DocumentLocation::parse("/data/summary.ttl"),
            DocumentLocation::File(PathBuf::from("/data/summary.ttl"))
        );
    }

    #[test]
    fn test_graph_name_is_percent_decoded() {
        let location = DocumentLocation::Remote("http://example.org/sum%C3%A9.ttl".into());
        assert_eq!(location.graph_name().unwrap().as_str(), "http://example.org/sumé.ttl");
    }

    #[test]
    fn test_graph_name_keeps_encoding_when_decoded_is_invalid() {
        let location = DocumentLocation::Remote("http://example.org/my%20summary.ttl".into());
        assert_eq!(location.graph_name().unwrap().as_str(), "http://example.org/my%20summary.ttl");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_graph_name() {
        let location = DocumentLocation::File(PathBuf::from("/data/summaries/dbpedia.ttl"));
        assert_eq!(location.graph_name().unwrap().as_str(), "file:///data/summaries/dbpedia.ttl");
    }

    #[test]
    fn test_negotiated_formats() {
        assert_eq!(negotiated(RdfFormat::from_extension("nt")), RdfFormat::NTriples);
        assert_eq!(negotiated(RdfFormat::from_extension("n3")), RdfFormat::N3);
        assert_eq!(negotiated(RdfFormat::from_extension("ttl")), RdfFormat::Turtle);
        assert_eq!(negotiated(RdfFormat::from_extension("rdf")), RdfFormat::Turtle);
        assert_eq!(negotiated(None), RdfFormat::Turtle);
        assert_eq!(
            negotiated(RdfFormat::from_media_type("application/n-triples; charset=utf-8")),
            RdfFormat::NTriples
        );
    }

    fn fetcher() -> DocumentFetcher {
        DocumentFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.nt");
        std::fs::write(&path, "<http://ex.org/s> <http://ex.org/p> <http://ex.org/o> .\n").unwrap();

        let document = fetcher()
            .fetch(&DocumentLocation::File(path))
            .await
            .unwrap();
        assert_eq!(document.format, RdfFormat::NTriples);
        assert!(!document.body.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let result = fetcher()
            .fetch(&DocumentLocation::File(PathBuf::from("/nonexistent/summary.ttl")))
            .await;
        assert!(matches!(result, Err(SummaryError::FetchError(_))));
    }

    #[tokio::test]
    async fn test_unresponsive_remote_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let fetcher = DocumentFetcher::new(Duration::from_millis(200)).unwrap();
        let location = DocumentLocation::Remote(format!("http://{}/summary.ttl", addr));
        let result = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch(&location))
            .await
            .expect("fetch did not time out");
        assert!(matches!(result, Err(SummaryError::FetchError(_))));
    }
}
