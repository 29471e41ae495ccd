//! Progress events and the stream that carries them.
//!
//! A pipeline run produces an ordered, finite, non-restartable sequence of
//! events over a tokio unbounded channel. Sending never waits; the consumer
//! is expected to keep up. Dropping the `ProgressStream` is how a caller
//! walks away from a run.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Planning,
    Generating,
    Explaining,
    Complete,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planning => "planning",
            Stage::Generating => "generating",
            Stage::Explaining => "explaining",
            Stage::Complete => "complete",
            Stage::Error => "error",
        }
    }

    /// `complete` and `error` end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Error)
    }
}

/// One stage transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn planning_started() -> Self {
        Self::new(Stage::Planning, "Creating UI layout plan...")
    }

    pub fn plan_created(plan: &Value, reasoning: Option<&Value>) -> Self {
        Self::new(Stage::Planning, "Plan created")
            .with_data(json!({ "plan": plan, "reasoning": reasoning }))
    }

    pub fn generating_started() -> Self {
        Self::new(Stage::Generating, "Generating React code...")
    }

    pub fn code_generated(code: &str, reasoning: Option<&Value>) -> Self {
        Self::new(Stage::Generating, "Code generated")
            .with_data(json!({ "code": code, "reasoning": reasoning }))
    }

    pub fn explaining_started() -> Self {
        Self::new(Stage::Explaining, "Creating explanation...")
    }

    pub fn complete(result: &GenerationResult) -> Self {
        Self::new(Stage::Complete, "Complete!").with_data(json!({
            "plan": result.plan,
            "code": result.code,
            "explanation": result.explanation,
        }))
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(Stage::Error, message)
    }
}

/// Reasoning traces from the stages that request them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReasoning {
    pub plan: Option<Value>,
    pub code: Option<Value>,
}

/// Outcome of a successful build run. Failures are `Err(AgentError)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub plan: Value,
    pub code: String,
    pub explanation: String,
    pub reasoning: StageReasoning,
}

/// Producer half, held by the pipeline.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    /// Push an event. Returns false if the stream has been dropped.
    pub fn emit(&self, event: ProgressEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// True once the consumer has dropped its stream.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half: an async stream of events that ends when the run ends.
#[derive(Debug)]
pub struct ProgressStream {
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl ProgressStream {
    /// Next event, or `None` once the run is over.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }
}

impl Stream for ProgressStream {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Create a connected sender/stream pair.
pub fn progress_channel() -> (ProgressSender, ProgressStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, ProgressStream { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn stage_serializes_lowercase() {
        let event = ProgressEvent::planning_started();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stage"], "planning");
        assert!(json.get("data").is_none());

        let json = serde_json::to_value(ProgressEvent::failed("boom")).unwrap();
        assert_eq!(json["stage"], "error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn terminal_stages() {
        assert!(Stage::Complete.is_terminal());
        assert!(Stage::Error.is_terminal());
        assert!(!Stage::Planning.is_terminal());
        assert!(!Stage::Explaining.is_terminal());
    }

    #[test]
    fn complete_event_bundles_result() {
        let result = GenerationResult {
            plan: json!({ "components": [] }),
            code: "export default function GeneratedUI() {}".into(),
            explanation: "A page.".into(),
            reasoning: StageReasoning::default(),
        };
        let event = ProgressEvent::complete(&result);
        let data = event.data.unwrap();
        assert_eq!(data["plan"], result.plan);
        assert_eq!(data["code"], "export default function GeneratedUI() {}");
        assert_eq!(data["explanation"], "A page.");
    }

    #[tokio::test]
    async fn stream_yields_in_order_then_ends() {
        let (tx, stream) = progress_channel();
        assert!(tx.emit(ProgressEvent::planning_started()));
        assert!(tx.emit(ProgressEvent::generating_started()));
        drop(tx);

        let stages: Vec<Stage> = stream.map(|e| e.stage).collect().await;
        assert_eq!(stages, vec![Stage::Planning, Stage::Generating]);
    }

    #[test]
    fn emit_after_drop_reports_closed() {
        let (tx, stream) = progress_channel();
        drop(stream);
        assert!(tx.is_closed());
        assert!(!tx.emit(ProgressEvent::planning_started()));
    }
}
