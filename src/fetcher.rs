use anyhow::Result;
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use reqwest::header::USER_AGENT;
use std::time::Duration;
use url::Url;

/// Sent on page fetches only; some servers reject default script-like agents.
pub const PAGE_USER_AGENT: &str = "Mozilla/5.0 (X11; CrOS x86_64 8172.45.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/51.0.2704.64 Safari/537.36";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Seam between the download pipeline and the HTTP client, so the pipeline
/// can be exercised without network access.
pub trait Fetcher {
    /// GET a page URL with the identifying User-Agent header.
    fn fetch_page(&self, url: &Url) -> Result<FetchResponse>;

    /// GET an asset URL with no special headers.
    fn fetch_asset(&self, url: &Url) -> Result<FetchResponse>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = ClientBuilder::new()
            .use_rustls_tls()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }

    fn execute(&self, request: RequestBuilder) -> Result<FetchResponse> {
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(FetchResponse { status, body })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_page(&self, url: &Url) -> Result<FetchResponse> {
        self.execute(self.client.get(url.as_str()).header(USER_AGENT, PAGE_USER_AGENT))
    }

    fn fetch_asset(&self, url: &Url) -> Result<FetchResponse> {
        self.execute(self.client.get(url.as_str()))
    }
}
