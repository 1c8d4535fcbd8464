//! HTTP client for PostgREST row operations
//!
//! ```text
//! select  GET    /rest/v1/<table>?select=..&<col>=<op>.<value>
//! insert  POST   /rest/v1/<table>              Prefer: return=representation
//! update  PATCH  /rest/v1/<table>?id=eq.<id>   Prefer: return=minimal
//! rpc     POST   /rest/v1/rpc/<function>
//! count   HEAD   /rest/v1/<table>?select=*     Prefer: count=exact
//! ```

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::RestConfig;
use crate::error::{RemoteError, RemoteResult};

const PREFER: &str = "Prefer";

/// Thin PostgREST client
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    root: Url,
    api_key: String,
    bearer: String,
}

impl RestClient {
    pub fn new(config: &RestConfig) -> RemoteResult<Self> {
        let client = Client::builder().timeout(config.timeout_duration()).build()?;

        Ok(Self {
            client,
            root: config.rest_root()?,
            api_key: config.api_key.clone(),
            bearer: config.bearer(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RemoteResult<RequestBuilder> {
        let url = self.root.join(path)?;
        debug!(method = %method, url = %url, "REST request");

        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, &self.bearer))
    }

    /// Rows from `table` matching the query pairs.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> RemoteResult<Vec<T>> {
        let response = self.request(Method::GET, table)?.query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Inserts rows and returns them as stored.
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> RemoteResult<Vec<T>> {
        let response = self
            .request(Method::POST, table)?
            .header(PREFER, "return=representation")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Inserts rows without reading them back.
    pub async fn insert_minimal<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> RemoteResult<()> {
        let response = self
            .request(Method::POST, table)?
            .header(PREFER, "return=minimal")
            .json(body)
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    /// Patches the row with the given id.
    pub async fn update_by_id<B: Serialize + ?Sized>(&self, table: &str, id: &str, body: &B) -> RemoteResult<()> {
        let response = self
            .request(Method::PATCH, table)?
            .query(&[("id", format!("eq.{}", id))])
            .header(PREFER, "return=minimal")
            .json(body)
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    /// Calls a database function.
    pub async fn rpc<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        function: &str,
        args: &B,
    ) -> RemoteResult<T> {
        let response = self
            .request(Method::POST, &format!("rpc/{}", function))?
            .json(args)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Exact row count of `table`, read from `Content-Range`.
    pub async fn count(&self, table: &str) -> RemoteResult<i64> {
        let response = self
            .request(Method::HEAD, table)?
            .query(&[("select", "*")])
            .header(PREFER, "count=exact")
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        parse_content_range_total(response.headers().get(CONTENT_RANGE))
    }

    async fn check_status(response: reqwest::Response) -> RemoteResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Err(RemoteError::Unauthorized),
            _ => Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> RemoteResult<T> {
        let response = Self::check_status(response).await?;
        response.json().await.map_err(Into::into)
    }

    async fn handle_empty(response: reqwest::Response) -> RemoteResult<()> {
        Self::check_status(response).await?;
        Ok(())
    }
}

/// Total from `Content-Range: 0-24/42` or `*/0`.
fn parse_content_range_total(header: Option<&HeaderValue>) -> RemoteResult<i64> {
    let value = header
        .ok_or_else(|| RemoteError::decode("missing Content-Range header"))?
        .to_str()
        .map_err(|e| RemoteError::decode(e.to_string()))?;

    value
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse::<i64>().ok())
        .ok_or_else(|| RemoteError::decode(format!("unusable Content-Range: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(v: &str) -> HeaderValue {
        HeaderValue::from_str(v).unwrap()
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total(Some(&header("0-24/42"))).unwrap(), 42);
        assert_eq!(parse_content_range_total(Some(&header("*/0"))).unwrap(), 0);
    }

    #[test]
    fn test_parse_content_range_rejects_unknown_total() {
        assert!(parse_content_range_total(Some(&header("0-24/*"))).is_err());
        assert!(parse_content_range_total(None).is_err());
    }
}
