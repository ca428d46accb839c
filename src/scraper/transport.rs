// transport.rs
use crate::scraper::api::{ApiRequest, HttpMethod};
use crate::scraper::{ScraperError, Stage};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// `name=value; name2=value2` built from every Set-Cookie header.
    pub cookie: Option<String>,
    pub body: String,
}

/// Synchronous request/response. Only status and cookies carry meaning here.
pub trait HttpTransport {
    fn send(
        &self,
        stage: Stage,
        request: &ApiRequest,
        cookie: Option<&str>,
    ) -> Result<HttpResponse, ScraperError>;
}

/// Blocking pause between upstream calls.
pub trait Pacer {
    fn pause(&self, delay: Duration);
}

pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        stage: Stage,
        request: &ApiRequest,
        cookie: Option<&str>,
    ) -> Result<HttpResponse, ScraperError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().map_err(|e| ScraperError::Network {
            stage,
            message: e.to_string(),
        })?;

        let status = resp.status();
        let cookie = cookie_header(resp.headers());
        let body = resp.text().map_err(|e| ScraperError::Network {
            stage,
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            cookie,
            body,
        })
    }
}

/// Collapses Set-Cookie headers into a single request `Cookie` value.
pub fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
