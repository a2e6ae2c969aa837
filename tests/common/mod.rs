// tests/common/mod.rs
// Scripted collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use ai_discovery_digest::cache::{self, SharedCache};
use ai_discovery_digest::ingest::types::{SourceDescriptor, SourceFetcher};
use ai_discovery_digest::ingest::SourceAggregator;
use ai_discovery_digest::notify::mail::{MailTransport, NewsletterMail};
use ai_discovery_digest::notify::retry::RetryPolicy;
use ai_discovery_digest::notify::Dispatcher;
use ai_discovery_digest::synth::completion::CompletionClient;
use ai_discovery_digest::synth::ContentSynthesizer;
use ai_discovery_digest::{Pipeline, SourceFetchError};

/// Scripted reply of one source endpoint.
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    NetworkError,
    BadJson,
}

/// Serves replies by endpoint URL and counts calls.
pub struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    pub calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(replies: Vec<(&str, Reply)>) -> Arc<Self> {
        Arc::new(Self {
            replies: replies
                .into_iter()
                .map(|(url, r)| (url.to_string(), r))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    async fn fetch_json(&self, source: &SourceDescriptor) -> Result<Value, SourceFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(&source.endpoint_url) {
            Some(Reply::Json(v)) => Ok(v.clone()),
            Some(Reply::BadJson) => Err(SourceFetchError::Decode {
                source_name: source.source_name.clone(),
                message: "expected value at line 1 column 1".into(),
            }),
            Some(Reply::NetworkError) | None => Err(SourceFetchError::Request {
                source_name: source.source_name.clone(),
                message: "connection refused".into(),
            }),
        }
    }
}

/// Always answers with the same completion text (or nothing).
pub struct CannedCompletion {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub last_user: Mutex<String>,
}

impl CannedCompletion {
    pub fn new(reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(str::to_string),
            calls: AtomicUsize::new(0),
            last_user: Mutex::new(String::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for CannedCompletion {
    async fn complete(&self, _system: &str, user: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user.lock().unwrap() = user.to_string();
        Ok(self.reply.clone())
    }
    fn name(&self) -> &'static str {
        "canned"
    }
}

/// Fails the first `failures` sends, then echoes `{ "sent": <n>, "subject": ... }`.
pub struct ScriptedMail {
    failures: usize,
    pub calls: AtomicUsize,
}

impl ScriptedMail {
    pub fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for ScriptedMail {
    async fn send(&self, mail: &NewsletterMail) -> Result<Map<String, Value>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.failures {
            return Err(anyhow!("Mail server responded with status 502: Bad gateway"));
        }
        match json!({ "sent": 42, "subject": mail.subject }) {
            Value::Object(m) => Ok(m),
            _ => unreachable!(),
        }
    }
    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// A 3-element array of distinct items for `tag`.
pub fn three_items(tag: &str) -> Value {
    json!([
        { "title": format!("{tag}-1"), "description": "first", "url": "https://a.test/1" },
        { "name": format!("{tag}-2"), "content": "second", "link": "https://a.test/2" },
        { "id": format!("{tag}-3"), "repo_url": "https://a.test/3" },
    ])
}

/// The four-source scenario: two healthy, one non-array, one network failure.
pub fn four_sources() -> (Vec<SourceDescriptor>, Arc<ScriptedFetcher>) {
    let sources = vec![
        SourceDescriptor::new("http://src/one", "Source One"),
        SourceDescriptor::new("http://src/two", "Source Two"),
        SourceDescriptor::new("http://src/object", "Object Source"),
        SourceDescriptor::new("http://src/down", "Down Source"),
    ];
    let fetcher = ScriptedFetcher::new(vec![
        ("http://src/one", Reply::Json(three_items("one"))),
        ("http://src/two", Reply::Json(three_items("two"))),
        ("http://src/object", Reply::Json(json!({ "message": "not a list" }))),
        ("http://src/down", Reply::NetworkError),
    ]);
    (sources, fetcher)
}

pub fn test_cache() -> SharedCache {
    cache::shared(Duration::from_secs(600))
}

pub struct Harness {
    pub pipeline: Pipeline,
    pub fetcher: Arc<ScriptedFetcher>,
    pub completion: Arc<CannedCompletion>,
    pub mail: Arc<ScriptedMail>,
}

/// Pipeline over the four-source scenario with zero-delay retries.
pub fn harness(completion: Option<&str>, mail_failures: usize) -> Harness {
    let cache = test_cache();
    let (sources, fetcher) = four_sources();
    let completion = CannedCompletion::new(completion);
    let mail = ScriptedMail::new(mail_failures);

    let pipeline = Pipeline::new(
        SourceAggregator::new(sources, fetcher.clone(), cache.clone()),
        ContentSynthesizer::new(completion.clone(), cache),
        Dispatcher::new(mail.clone(), RetryPolicy::immediate(3)),
    );
    Harness {
        pipeline,
        fetcher,
        completion,
        mail,
    }
}
