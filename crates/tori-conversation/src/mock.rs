//! Scripted collaborators for unit tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tori_llm::{
    AssistantClient, ChatClient, ChatRequest, ChatResponse, Message, Run, RunRequest, RunStatus,
    ThreadMessage,
};
use tori_persist::{ConversationStore, ConversationsByDate, PersistError};

/// Assistant client that replays a fixed status sequence.
/// The last status repeats once the sequence is used up.
pub struct ScriptedAssistant {
    thread_failures: Mutex<u32>,
    append_fails: bool,
    run_creation_fails: bool,
    statuses: Mutex<VecDeque<RunStatus>>,
    run_error: Option<String>,
    poll_failure_after: Option<usize>,
    poll_delay: Option<Duration>,
    list_failures: Mutex<u32>,
    latest: Option<Message>,
    created_threads: Mutex<Vec<Vec<Message>>>,
    appended: Mutex<Vec<Message>>,
    run_requests: Mutex<Vec<RunRequest>>,
    poll_times: Mutex<Vec<Instant>>,
    list_calls: Mutex<u32>,
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self {
            thread_failures: Mutex::new(0),
            append_fails: false,
            run_creation_fails: false,
            statuses: Mutex::new(VecDeque::from([RunStatus::Completed])),
            run_error: None,
            poll_failure_after: None,
            poll_delay: None,
            list_failures: Mutex::new(0),
            latest: None,
            created_threads: Mutex::new(Vec::new()),
            appended: Mutex::new(Vec::new()),
            run_requests: Mutex::new(Vec::new()),
            poll_times: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
        }
    }

    pub fn with_thread_failures(self, failures: u32) -> Self {
        *self.thread_failures.lock().unwrap() = failures;
        self
    }

    pub fn failing_append(mut self) -> Self {
        self.append_fails = true;
        self
    }

    pub fn failing_run_creation(mut self) -> Self {
        self.run_creation_fails = true;
        self
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into_iter().collect();
        self
    }

    pub fn with_run_error(mut self, error: impl Into<String>) -> Self {
        self.run_error = Some(error.into());
        self
    }

    pub fn failing_poll_after(mut self, successful_polls: usize) -> Self {
        self.poll_failure_after = Some(successful_polls);
        self
    }

    /// Every status read takes `delay` before answering
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = Some(delay);
        self
    }

    pub fn with_list_failures(self, failures: u32) -> Self {
        *self.list_failures.lock().unwrap() = failures;
        self
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_latest(Message::ai(text))
    }

    pub fn with_latest(mut self, message: Message) -> Self {
        self.latest = Some(message);
        self
    }

    pub fn created_threads(&self) -> Vec<Vec<Message>> {
        self.created_threads.lock().unwrap().clone()
    }

    pub fn appended(&self) -> Vec<Message> {
        self.appended.lock().unwrap().clone()
    }

    pub fn run_requests(&self) -> Vec<RunRequest> {
        self.run_requests.lock().unwrap().clone()
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.poll_times.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock().unwrap()
    }

    fn run(&self, thread_id: &str, status: RunStatus) -> Run {
        Run {
            id: "run_1".to_string(),
            thread_id: thread_id.to_string(),
            status,
            last_error: self.run_error.clone(),
        }
    }
}

#[async_trait]
impl AssistantClient for ScriptedAssistant {
    async fn create_thread(&self, messages: Vec<Message>) -> Result<String> {
        let mut failures = self.thread_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(anyhow!("OpenAI API error (500): thread"));
        }
        let mut threads = self.created_threads.lock().unwrap();
        threads.push(messages);
        Ok(format!("thread_{}", threads.len()))
    }

    async fn append_message(&self, _thread_id: &str, message: Message) -> Result<String> {
        if self.append_fails {
            return Err(anyhow!("OpenAI API error (404): no such thread"));
        }
        self.appended.lock().unwrap().push(message);
        Ok("msg_user".to_string())
    }

    async fn create_run(&self, thread_id: &str, request: RunRequest) -> Result<Run> {
        if self.run_creation_fails {
            return Err(anyhow!("OpenAI API error (400): thread already has an active run"));
        }
        self.run_requests.lock().unwrap().push(request);
        Ok(self.run(thread_id, RunStatus::Queued))
    }

    async fn get_run(&self, thread_id: &str, _run_id: &str) -> Result<Run> {
        if let Some(delay) = self.poll_delay {
            tokio::time::sleep(delay).await;
        }

        let mut polls = self.poll_times.lock().unwrap();
        if self.poll_failure_after.is_some_and(|limit| polls.len() >= limit) {
            return Err(anyhow!("connection reset"));
        }
        polls.push(Instant::now());

        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().copied()
        }
        .unwrap_or(RunStatus::Completed);

        Ok(self.run(thread_id, status))
    }

    async fn list_messages(&self, _thread_id: &str, limit: u32) -> Result<Vec<ThreadMessage>> {
        *self.list_calls.lock().unwrap() += 1;

        let mut failures = self.list_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(anyhow!("OpenAI API error (502): bad gateway"));
        }

        Ok(self
            .latest
            .iter()
            .take(limit as usize)
            .map(|message| ThreadMessage {
                id: "msg_latest".to_string(),
                message: message.clone(),
            })
            .collect())
    }
}

/// One scripted chat completion outcome
#[derive(Clone)]
pub enum ChatOutcome {
    Content(String),
    Refusal(String),
    Error(String),
}

/// Chat client that replays outcomes in order, repeating the last one
pub struct ScriptedChat {
    outcomes: Mutex<VecDeque<ChatOutcome>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(outcomes: impl IntoIterator<Item = ChatOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);

        let mut outcomes = self.outcomes.lock().unwrap();
        let outcome = if outcomes.len() > 1 {
            outcomes.pop_front()
        } else {
            outcomes.front().cloned()
        }
        .ok_or_else(|| anyhow!("no scripted outcome"))?;

        let (content, refusal) = match outcome {
            ChatOutcome::Content(content) => (Some(content), None),
            ChatOutcome::Refusal(refusal) => (None, Some(refusal)),
            ChatOutcome::Error(error) => return Err(anyhow!(error)),
        };

        Ok(ChatResponse {
            content,
            refusal,
            usage: None,
            finish_reason: Some("stop".to_string()),
            raw: serde_json::Value::Null,
        })
    }
}

/// In-memory conversation store
pub struct MemoryStore {
    threads: BTreeMap<String, ConversationsByDate>,
    fails: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            threads: BTreeMap::new(),
            fails: false,
        }
    }

    pub fn with_day(mut self, thread_id: &str, date: &str, messages: Vec<Message>) -> Self {
        self.threads
            .entry(thread_id.to_string())
            .or_default()
            .insert(date.to_string(), messages);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn conversations_for_thread(
        &self,
        thread_id: &str,
    ) -> tori_persist::Result<ConversationsByDate> {
        if self.fails {
            return Err(PersistError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.threads.get(thread_id).cloned().unwrap_or_default())
    }
}
