//! REST implementation of [`ContentRepository`].
//!
//! Talks to the site backend over HTTP with `reqwest`. List and item responses
//! are usually wrapped as `{ "data": ... }`; a few older endpoints answer with
//! the bare payload, so both shapes are accepted.

use async_trait::async_trait;
use hpr_core::config::ApiConfig;
use hpr_core::error::{HprError, Result};
use hpr_core::{
    BinaryImage, CategoryKey, Collection, ContentForm, ContentItem, ContentRepository, ItemId,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use std::time::Duration;

const NEWS_BANNER_PATH: &str = "/news/banner";

/// HTTP client for the content backend.
#[derive(Debug, Clone)]
pub struct HttpContentRepository {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpContentRepository {
    /// Creates a repository for `base_url` (e.g. `http://localhost:5000/api/v1`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    /// Sends a request and turns transport failures and non-2xx statuses into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HprError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HprError::http(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| HprError::network(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentRepository for HttpContentRepository {
    async fn list(
        &self,
        collection: Collection,
        category: &CategoryKey,
    ) -> Result<Vec<ContentItem>> {
        let mut request = self.client.get(self.url(collection.path()));
        if let Some(category) = category.query_value() {
            request = request.query(&[("category", category)]);
        }

        tracing::debug!(collection = %collection, category = %category, "GET list");
        let items = parse_list(self.send_json(request).await?)?;
        tracing::debug!(collection = %collection, count = items.len(), "List fetched");
        Ok(items)
    }

    async fn get(&self, collection: Collection, id: &ItemId) -> Result<ContentItem> {
        let request = self.client.get(self.url(&collection.item_path(id.as_str())));
        match parse_document(self.send_json(request).await?)? {
            Some(item) => Ok(item),
            None => Err(HprError::not_found(collection.slug(), id.as_str())),
        }
    }

    async fn document(&self, collection: Collection) -> Result<Option<ContentItem>> {
        let request = self.client.get(self.url(collection.path()));
        parse_document(self.send_json(request).await?)
    }

    async fn create(&self, collection: Collection, form: &ContentForm) -> Result<()> {
        let request = self
            .client
            .post(self.url(collection.path()))
            .multipart(multipart_form(form)?);
        self.send(request).await?;
        tracing::info!(collection = %collection, "Item created");
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &ItemId,
        form: &ContentForm,
    ) -> Result<()> {
        let request = self
            .client
            .put(self.url(&collection.item_path(id.as_str())))
            .multipart(multipart_form(form)?);
        self.send(request).await?;
        tracing::info!(collection = %collection, id = %id, "Item updated");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &ItemId) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&collection.item_path(id.as_str())));
        self.send(request).await?;
        tracing::info!(collection = %collection, id = %id, "Item deleted");
        Ok(())
    }

    async fn put_document(
        &self,
        collection: Collection,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let request = self.client.put(self.url(collection.path())).json(fields);
        self.send(request).await?;
        tracing::info!(collection = %collection, "Document saved");
        Ok(())
    }

    async fn banner(&self) -> Result<BinaryImage> {
        let response = self.send(self.client.get(self.url(NEWS_BANNER_PATH))).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HprError::network(e.to_string()))?;
        Ok(BinaryImage::new(content_type.as_deref(), bytes.to_vec()))
    }
}

/// Joins the base URL and an endpoint path.
fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Strips the `{ "data": ... }` wrapper if present.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") && !map.contains_key("id") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn parse_list(body: Value) -> Result<Vec<ContentItem>> {
    match unwrap_envelope(body) {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(HprError::from))
            .collect(),
        other => Err(HprError::Serialization {
            format: "JSON".to_string(),
            message: format!("expected a list, got {}", kind_of(&other)),
        }),
    }
}

/// Single-document endpoints may answer with an object, `null`, or a list
/// whose last entry is the current document.
fn parse_document(body: Value) -> Result<Option<ContentItem>> {
    match unwrap_envelope(body) {
        Value::Null => Ok(None),
        Value::Array(mut items) => match items.pop() {
            Some(item) => Ok(Some(serde_json::from_value(item)?)),
            None => Ok(None),
        },
        item @ Value::Object(_) => Ok(Some(serde_json::from_value(item)?)),
        other => Err(HprError::Serialization {
            format: "JSON".to_string(),
            message: format!("expected an object, got {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn multipart_form(form: &ContentForm) -> Result<Form> {
    let mut multipart = Form::new();
    for (name, value) in &form.fields {
        multipart = multipart.text(name.clone(), value.clone());
    }
    if let Some(image) = &form.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| HprError::Serialization {
                format: "multipart".to_string(),
                message: format!("invalid image type '{}': {}", image.mime, e),
            })?;
        multipart = multipart.part("image", part);
    }
    Ok(multipart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpr_core::ImageUpload;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_without_double_slashes() {
        assert_eq!(
            endpoint("http://localhost:5000/api/v1/", "/home/projects"),
            "http://localhost:5000/api/v1/home/projects"
        );
        assert_eq!(endpoint("http://h/api", "news/3"), "http://h/api/news/3");
    }

    #[test]
    fn test_parse_list_accepts_envelope_and_bare_array() {
        let wrapped = json!({ "data": [{ "id": 1, "title": "A" }, { "id": 2, "title": "B" }] });
        let items = parse_list(wrapped).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_ref().unwrap().as_str(), "1");

        let bare = json!([{ "id": "x", "category": "ongoing" }]);
        let items = parse_list(bare).unwrap();
        assert_eq!(items[0].category().as_deref(), Some("ongoing"));

        assert!(parse_list(json!({ "data": null })).unwrap().is_empty());
        assert!(parse_list(json!({ "data": "oops" })).is_err());
    }

    #[test]
    fn test_parse_document_shapes() {
        let doc = parse_document(json!({ "data": { "heading": "Our mission" } }))
            .unwrap()
            .unwrap();
        assert_eq!(doc.text("heading").as_deref(), Some("Our mission"));

        assert!(parse_document(json!({ "data": null })).unwrap().is_none());
        assert!(parse_document(json!([])).unwrap().is_none());

        let latest = parse_document(json!([{ "id": 1 }, { "id": 2 }]))
            .unwrap()
            .unwrap();
        assert_eq!(latest.id.unwrap().as_str(), "2");
    }

    #[test]
    fn test_item_with_data_field_is_not_unwrapped() {
        let item = parse_document(json!({ "id": 5, "data": "payload" }))
            .unwrap()
            .unwrap();
        assert_eq!(item.text("data").as_deref(), Some("payload"));
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let form = ContentForm::new()
            .with_field("title", "A")
            .with_image(ImageUpload::new("a.jpg", "not a mime", vec![1]));
        assert!(multipart_form(&form).is_err());

        let form = ContentForm::new().with_image(ImageUpload::new("a.png", "image/png", vec![1]));
        assert!(multipart_form(&form).is_ok());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let repo = HttpContentRepository::new("http://h/api/v1/", Duration::from_secs(1));
        assert_eq!(repo.base_url(), "http://h/api/v1");
        assert_eq!(repo.url("/gallery"), "http://h/api/v1/gallery");
    }
}
