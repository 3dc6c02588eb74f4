use anyhow::{Context, Error};
use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error as ThisError;
use url::Url;

lazy_static! {
    // Requests are sent once. A failed request fails the run and the next
    // scheduled run tries again.
    static ref CLIENT: ClientWithMiddleware = ClientBuilder::new(reqwest::Client::new())
        .with(TracingMiddleware::default())
        .build();
}

pub struct HttpClient;

#[derive(ThisError, Debug)]
pub enum HttpClientError {
    #[error(transparent)]
    ResponseError(#[from] Error),
    #[error("httpBuilderError {0}")]
    HTTPBuilderError(String),
}

struct HeadersMapGenerator(HeaderMap);

impl HeadersMapGenerator {
    fn into_inner(self) -> HeaderMap {
        self.0
    }
}

impl TryFrom<HashMap<&'static str, String>> for HeadersMapGenerator {
    type Error = HttpClientError;

    fn try_from(value: HashMap<&'static str, String>) -> Result<Self, Self::Error> {
        let mut header_map = HeaderMap::new();

        for (key, value) in value.into_iter() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|err| HttpClientError::HTTPBuilderError(format!("{err} {key}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|err| HttpClientError::HTTPBuilderError(format!("{err} {value}")))?;
            header_map.insert(name, value);
        }
        Ok(Self(header_map))
    }
}

impl HttpClient {
    pub async fn get_with_headers<DTO: DeserializeOwned>(
        url: Url,
        headers: HashMap<&'static str, String>,
    ) -> Result<DTO, HttpClientError> {
        let generator = HeadersMapGenerator::try_from(headers)?;
        let header_map = generator.into_inner();
        CLIENT
            .get(url.clone())
            .headers(header_map)
            .send()
            .await
            .with_context(|| format!("Failed to fetch request from {url}"))
            .map_err(HttpClientError::ResponseError)?
            .error_for_status()
            .with_context(|| format!("Unsuccessful response from {url}"))
            .map_err(HttpClientError::ResponseError)?
            .json::<DTO>()
            .await
            .context("Failed to deserialize response")
            .map_err(HttpClientError::ResponseError)
    }

    pub async fn post_json<DTO: DeserializeOwned>(
        url: Url,
        headers: HashMap<&'static str, String>,
        body: Value,
    ) -> Result<DTO, HttpClientError> {
        let generator = HeadersMapGenerator::try_from(headers)?;
        let header_map = generator.into_inner();
        CLIENT
            .post(url.clone())
            .headers(header_map)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to post request to {url}"))
            .map_err(HttpClientError::ResponseError)?
            .error_for_status()
            .with_context(|| format!("Unsuccessful response from {url}"))
            .map_err(HttpClientError::ResponseError)?
            .json::<DTO>()
            .await
            .context("Failed to deserialize response")
            .map_err(HttpClientError::ResponseError)
    }
}
