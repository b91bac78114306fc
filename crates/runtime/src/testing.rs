//! In-process fakes for engine tests.

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolSpec,
    Usage,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    Tools(Vec<(&'static str, Value)>),
    Fail,
}

/// What the backend was asked.
#[derive(Debug, Clone)]
pub(crate) struct Seen {
    pub system: Option<String>,
    pub prompt: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

/// Backend that plays back a script, then repeats a final reply forever.
pub(crate) struct ScriptedBackend {
    script: Mutex<VecDeque<Reply>>,
    then: Reply,
    delay: Option<Duration>,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Reply>, then: Reply) -> Self {
        Self {
            script: Mutex::new(script.into()),
            then,
            delay: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Vec::new(), Reply::Text(text.into()))
    }

    pub fn failing() -> Self {
        Self::new(Vec::new(), Reply::Fail)
    }

    /// Asks for a nutrition calculation on every turn.
    pub fn always_tools() -> Self {
        Self::new(
            Vec::new(),
            Reply::Tools(vec![("calculate_nutrition", json!({"ingredients": ["chicken"]}))]),
        )
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Reply {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.then.clone())
    }
}

impl Backend for ScriptedBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let turn = {
            let mut seen = self.seen.lock().unwrap();
            seen.push(Seen {
                system: request.system.map(str::to_string),
                prompt: request.messages.first().map(Message::text).unwrap_or_default(),
                messages: request.messages.to_vec(),
                tools: request.tools.to_vec(),
            });
            seen.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let parts = match self.next_reply() {
            Reply::Text(text) => vec![Part::Text(text)],
            Reply::Tools(calls) => calls
                .into_iter()
                .enumerate()
                .map(|(i, (name, input))| {
                    Part::ToolCall(ToolCall {
                        id: format!("call-{turn}-{i}"),
                        name: name.to_string(),
                        input,
                    })
                })
                .collect(),
            Reply::Fail => return Err(ModelError::Network("connection refused".into())),
        };

        Ok(ModelResponse {
            message: Message {
                role: Role::Assistant,
                parts,
            },
            usage: Usage::default(),
        })
    }
}

/// A JSON array of recipes, each using `lead` as its first ingredient.
pub(crate) fn recipes_json(names: &[&str], lead: &str) -> String {
    let recipes: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "ingredients": [lead, "salt"],
                "instructions": ["Prepare", "Cook", "Serve"],
                "cookingTime": "30 minutes",
                "difficulty": "easy",
                "nutrition": {"calories": 400, "protein": "20g", "carbs": "40g"}
            })
        })
        .collect();
    Value::Array(recipes).to_string()
}
