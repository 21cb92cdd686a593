use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin client over the hosted document store's REST interface.
///
/// Collections map to `/rest/v1/{collection}` and filters use the
/// PostgREST query syntax (`field=eq.value`). Batch inserts go out as a
/// single array POST, which the store applies in one statement - either
/// every record lands or none do.
pub struct StoreClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            anon_key: config.store_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
            );
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Store error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Insert one record, returning the stored representation.
    pub async fn insert_returning(
        &self,
        collection: &str,
        record: Value,
        auth_token: Option<&str>,
    ) -> Result<Value> {
        let result = self.insert_many(collection, vec![record], auth_token).await?;
        result.into_iter().next()
            .ok_or_else(|| anyhow!("Insert into {} returned no representation", collection))
    }

    /// Insert a batch of records as one array POST. The store applies the
    /// whole batch atomically; a rejected batch leaves nothing behind.
    pub async fn insert_many(
        &self,
        collection: &str,
        records: Vec<Value>,
        auth_token: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let path = format!("/rest/v1/{}", collection);
        self.request_with_headers(
            Method::POST,
            &path,
            auth_token,
            Some(Value::Array(records)),
            Some(headers),
        ).await
    }

    /// Merge-patch the records matched by `filter`, returning the updated
    /// representations. An empty result means the filter matched nothing.
    pub async fn patch_returning(
        &self,
        collection: &str,
        filter: &str,
        fields: Value,
        auth_token: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let path = format!("/rest/v1/{}?{}", collection, filter);
        self.request_with_headers(
            Method::PATCH,
            &path,
            auth_token,
            Some(fields),
            Some(headers),
        ).await
    }

    /// Delete the records matched by `filter`. The store answers with
    /// 204 No Content and an empty body, so the response is not parsed.
    pub async fn delete(
        &self,
        collection: &str,
        filter: &str,
        auth_token: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/rest/v1/{}?{}", self.base_url, collection, filter);
        debug!("Making request to {}", url);

        let response = self.client
            .delete(&url)
            .headers(self.get_headers(auth_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Store error ({}): {}", status, error_text),
            });
        }

        Ok(())
    }

    /// Query a collection by an arbitrary PostgREST filter string.
    pub async fn select(
        &self,
        collection: &str,
        filter: &str,
        auth_token: Option<&str>,
    ) -> Result<Vec<Value>> {
        let path = format!("/rest/v1/{}?{}", collection, filter);
        self.request(
            Method::GET,
            &path,
            auth_token,
            None,
        ).await
    }

    /// Query a collection by a single field equality.
    pub async fn select_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        auth_token: Option<&str>,
    ) -> Result<Vec<Value>> {
        self.select(collection, &format!("{}=eq.{}", field, value), auth_token).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
