use std::collections::VecDeque;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::database::models::{NewTask, Task, TaskId, TaskPatch};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{message} ({code})")]
    Api { status: u16, code: String, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("live query failed: {0}")]
    Stream(String),
}

impl ClientError {
    fn from_body(status: StatusCode, body: &Value) -> Self {
        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
        ClientError::Api {
            status: status.as_u16(),
            code: field("code").unwrap_or_else(|| status.as_str().to_string()),
            message: field("message")
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Request failed".to_string()),
        }
    }

    /// HTTP status of a rejected call, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// The five task operations as seen from a client
#[async_trait]
pub trait TasksApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ClientError>;
    async fn get(&self, id: &TaskId) -> Result<Task, ClientError>;
    async fn create(&self, task: &NewTask) -> Result<TaskId, ClientError>;
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), ClientError>;
    async fn remove(&self, id: &TaskId) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct Created {
    id: TaskId,
}

/// `TasksApi` over the HTTP endpoints, authenticating with a bearer token
#[derive(Debug, Clone)]
pub struct HttpTasksApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTasksApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn task_endpoint(&self, id: &TaskId) -> Result<Url, ClientError> {
        let mut url = self.endpoint("/api/tasks")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Decode("base URL cannot hold a path".to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET any envelope-returning endpoint, e.g. `/api/auth/whoami`
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.get(self.endpoint(path)?);
        read_envelope(self.authorized(request).send().await?).await
    }

    /// Live `tasks.list`: the current list first, then a fresh one after every change
    pub async fn watch(&self) -> Result<BoxStream<'static, Result<Vec<Task>, ClientError>>, ClientError> {
        let request = self
            .client
            .get(self.endpoint("/api/tasks/subscribe")?)
            .header(ACCEPT, "text/event-stream");
        let response = self.authorized(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(ClientError::from_body(status, &body));
        }

        let state = (response.bytes_stream().boxed(), SseDecoder::default(), VecDeque::new());
        let updates = stream::unfold(state, |(mut bytes, mut decoder, mut pending)| async move {
            loop {
                if let Some(event) = pending.pop_front() {
                    if let Some(item) = decode_event(event) {
                        return Some((item, (bytes, decoder, pending)));
                    }
                    continue;
                }
                match bytes.next().await {
                    Some(Ok(chunk)) => pending.extend(decoder.push(&chunk)),
                    Some(Err(err)) => return Some((Err(ClientError::Http(err)), (bytes, decoder, pending))),
                    None => return None,
                }
            }
        });

        Ok(updates.boxed())
    }
}

#[async_trait]
impl TasksApi for HttpTasksApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.get_json("/api/tasks").await
    }

    async fn get(&self, id: &TaskId) -> Result<Task, ClientError> {
        let request = self.client.get(self.task_endpoint(id)?);
        read_envelope(self.authorized(request).send().await?).await
    }

    async fn create(&self, task: &NewTask) -> Result<TaskId, ClientError> {
        let request = self.client.post(self.endpoint("/api/tasks")?).json(task);
        let created: Created = read_envelope(self.authorized(request).send().await?).await?;
        Ok(created.id)
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), ClientError> {
        let request = self.client.patch(self.task_endpoint(id)?).json(patch);
        read_envelope(self.authorized(request).send().await?).await
    }

    async fn remove(&self, id: &TaskId) -> Result<(), ClientError> {
        let request = self.client.delete(self.task_endpoint(id)?);
        read_envelope(self.authorized(request).send().await?).await
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        return Err(ClientError::from_body(status, &body));
    }

    let mut body: Value = response.json().await?;
    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Error bodies are JSON from our handlers but plain text from axum's own rejections
async fn error_body(response: Response) -> Value {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` parser. Feed it raw chunks, get whole events back.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = find_blank_line(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end.0).collect();
            self.buffer.drain(..end.1 - end.0);
            if let Some(event) = parse_block(&String::from_utf8_lossy(&block)) {
                events.push(event);
            }
        }
        events
    }
}

/// (end of block, start of the next one)
fn find_blank_line(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, i + 2));
    let crlf = buffer.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, i + 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }

    if data.is_empty() {
        return None;
    }
    Some(SseEvent {
        event: event.unwrap_or_else(|| "message".to_string()),
        data: data.join("\n"),
    })
}

fn decode_event(event: SseEvent) -> Option<Result<Vec<Task>, ClientError>> {
    match event.event.as_str() {
        "tasks" => Some(serde_json::from_str(&event.data).map_err(|e| ClientError::Decode(e.to_string()))),
        "error" => {
            let body: Value = serde_json::from_str(&event.data).unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(event.data.as_str())
                .to_string();
            Some(Err(ClientError::Stream(message)))
        }
        _ => None,
    }
}
