//! Notion database backend.
//!
//! Property JSON shapes follow the public API: `title` and `rich_text` are
//! arrays of text objects, `select` is `{ "name": .. }` or null, `number` and
//! `url` are scalars. Property types the pipeline does not use are skipped
//! when reading.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use upskill_shared::{Result, StoreConfig, StoreCredentials, UpskillError};

use crate::schema::MAX_TEXT_LEN;
use crate::{Collection, Fields, PropertyValue, Record, RecordFilter, RecordStore};

/// User-Agent string for store requests.
const USER_AGENT: &str = concat!("upskill/", env!("CARGO_PKG_VERSION"));

/// Results requested per query page (API maximum).
const PAGE_SIZE: u32 = 100;

/// Response bodies longer than this are cut in error messages.
const ERROR_BODY_CHARS: usize = 300;

/// [`RecordStore`] over the Notion REST API.
pub struct NotionStore {
    client: Client,
    api_base: String,
    api_version: String,
    credentials: StoreCredentials,
}

impl NotionStore {
    pub fn new(config: &StoreConfig, credentials: StoreCredentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpskillError::Store(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            credentials,
        })
    }

    fn database_id(&self, collection: Collection) -> &str {
        match collection {
            Collection::Tracker => &self.credentials.tracker_db,
            Collection::Inbox => &self.credentials.inbox_db,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.api_base))
            .bearer_auth(&self.credentials.token)
            .header("Notion-Version", &self.api_version)
    }

    /// Send a JSON body and decode the response.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<T> {
        let response = self
            .request(method, path)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpskillError::Store(format!("{path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(ERROR_BODY_CHARS).collect();
            return Err(UpskillError::Store(format!("{path}: HTTP {status}: {snippet}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpskillError::Store(format!("{path}: unreadable response: {e}")))
    }
}

#[async_trait]
impl RecordStore for NotionStore {
    #[instrument(skip(self, filter))]
    async fn query_records(
        &self,
        collection: Collection,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<Record>> {
        let path = format!("/databases/{}/query", self.database_id(collection));
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = Map::new();
            body.insert("page_size".into(), json!(PAGE_SIZE));
            if let Some(filter) = filter {
                body.insert("filter".into(), filter_json(filter));
            }
            if let Some(c) = &cursor {
                body.insert("start_cursor".into(), json!(c));
            }

            let page: QueryPage = self.send(Method::POST, &path, Value::Object(body)).await?;
            records.extend(page.results.into_iter().map(PageObject::into_record));

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = records.len(), "queried records");
        Ok(records)
    }

    #[instrument(skip(self, fields))]
    async fn create_record(&self, collection: Collection, fields: Fields) -> Result<Record> {
        let body = json!({
            "parent": { "database_id": self.database_id(collection) },
            "properties": properties_json(&fields),
        });
        let page: PageObject = self.send(Method::POST, "/pages", body).await?;
        Ok(page.into_record())
    }

    #[instrument(skip(self, fields))]
    async fn update_record(&self, id: &str, fields: Fields) -> Result<Record> {
        let body = json!({ "properties": properties_json(&fields) });
        let page: PageObject = self
            .send(Method::PATCH, &format!("/pages/{id}"), body)
            .await?;
        Ok(page.into_record())
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct QueryPage {
    #[serde(default)]
    results: Vec<PageObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl PageObject {
    fn into_record(self) -> Record {
        let properties = self
            .properties
            .iter()
            .filter_map(|(name, value)| Some((name.clone(), property_from_json(value)?)))
            .collect();
        Record {
            id: self.id,
            properties,
        }
    }
}

fn filter_json(filter: &RecordFilter) -> Value {
    match filter {
        RecordFilter::SelectEquals { property, value } => {
            json!({ "property": property, "select": { "equals": value } })
        }
        RecordFilter::SelectIsEmpty { property } => {
            json!({ "property": property, "select": { "is_empty": true } })
        }
        RecordFilter::Or(filters) => {
            json!({ "or": filters.iter().map(filter_json).collect::<Vec<_>>() })
        }
    }
}

fn properties_json(fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), property_json(value)))
        .collect();
    Value::Object(map)
}

fn property_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(text) => json!({ "title": text_array(text) }),
        PropertyValue::Text(text) => json!({ "rich_text": text_array(text) }),
        PropertyValue::Number(n) => json!({ "number": n }),
        PropertyValue::Select(Some(name)) => json!({ "select": { "name": name } }),
        PropertyValue::Select(None) => json!({ "select": null }),
        PropertyValue::Url(url) => json!({ "url": url }),
    }
}

/// Text objects of at most [`MAX_TEXT_LEN`] characters each; reads join
/// them back in [`plain_text`].
fn text_array(text: &str) -> Value {
    let chars: Vec<char> = text.chars().collect();
    let fragments: Vec<Value> = chars
        .chunks(MAX_TEXT_LEN)
        .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
        .collect();
    Value::Array(fragments)
}

fn property_from_json(value: &Value) -> Option<PropertyValue> {
    let kind = value.get("type")?.as_str()?;
    let parsed = match kind {
        "title" => PropertyValue::Title(plain_text(value.get("title"))),
        "rich_text" => PropertyValue::Text(plain_text(value.get("rich_text"))),
        "number" => PropertyValue::Number(value.get("number").and_then(Value::as_f64)),
        "select" => PropertyValue::Select(
            value
                .get("select")
                .and_then(|s| s.get("name"))
                .and_then(Value::as_str)
                .map(String::from),
        ),
        "url" => PropertyValue::Url(value.get("url").and_then(Value::as_str).map(String::from)),
        _ => return None,
    };
    Some(parsed)
}

/// Concatenate the `plain_text` of every fragment in a text array.
fn plain_text(fragments: Option<&Value>) -> String {
    fragments
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}
