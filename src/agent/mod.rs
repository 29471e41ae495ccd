//! UI Agent — the plan → generate → explain pipeline.
//!
//! Turns a free-text UI request into component source through three
//! sequential model round-trips sharing one transcript, plus a single-turn
//! modify track on its own transcript.
//!
//! ## Architecture
//!
//! - `prompts`: system and user prompt templates
//! - `plan`: component inventory over untyped layout plans
//! - `progress`: stage events, the event stream, run results
//!
//! Each `UiAgent` owns its transcripts. One run at a time per agent; the
//! `&mut self` receivers enforce that within safe code.

pub mod plan;
pub mod progress;
pub mod prompts;

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};

use crate::conversation::{Transcript, Turn};
use crate::extract;
use crate::llm::client::LlmError;
use crate::llm::ChatTransport;
use progress::{
    progress_channel, GenerationResult, ProgressEvent, ProgressSender, ProgressStream,
    StageReasoning,
};

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Transport(#[from] LlmError),

    /// The planning reply held no structured data. `raw` is the reply text.
    #[error("failed to parse plan")]
    PlanParse { raw: String },

    /// The progress stream was dropped; the run stopped at a stage boundary.
    #[error("generation cancelled")]
    Cancelled,
}

/// Where the build pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Planning,
    Generating,
    Explaining,
    Complete,
    Error,
}

/// A parsed plan and the reasoning that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutput {
    /// The extracted plan, or the extractor's parse-failure sentinel.
    pub plan: Value,
    pub reasoning: Option<Value>,
}

/// Extracted code and the reasoning that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeOutput {
    pub code: String,
    pub reasoning: Option<Value>,
}

/// Conversational session driving one model backend.
pub struct UiAgent {
    transport: Arc<dyn ChatTransport>,
    build: Transcript,
    modify: Transcript,
    session_id: String,
    state: PipelineState,
}

impl UiAgent {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            build: Transcript::new(),
            modify: Transcript::new(),
            session_id: uuid::Uuid::new_v4().to_string(),
            state: PipelineState::Idle,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn build_transcript(&self) -> &Transcript {
        &self.build
    }

    pub fn modify_transcript(&self) -> &Transcript {
        &self.modify
    }

    /// Start a fresh build transcript and ask for a layout plan.
    ///
    /// Never fails on unparseable output: the plan is then the extractor
    /// sentinel, see [`extract::is_parse_sentinel`].
    pub async fn plan(&mut self, request: &str) -> Result<PlanOutput, AgentError> {
        self.build
            .reset(prompts::PLANNER_SYSTEM_PROMPT, prompts::plan_prompt(request));

        let reply = self.transport.send(&self.build.to_messages(), true).await?;
        let plan = extract::extract_structured(&reply.content);
        self.build
            .append(Turn::assistant(reply.content, reply.reasoning.clone()));

        Ok(PlanOutput {
            plan,
            reasoning: reply.reasoning,
        })
    }

    /// Continue the build transcript: turn the plan into component source.
    pub async fn generate_code(&mut self, plan: &Value) -> Result<CodeOutput, AgentError> {
        let plan_json = serde_json::to_string_pretty(plan).unwrap_or_else(|_| plan.to_string());
        self.build.append(Turn::user(prompts::code_prompt(&plan_json)));

        let reply = self.transport.send(&self.build.to_messages(), true).await?;
        let code = extract::extract_code(&reply.content);
        self.build
            .append(Turn::assistant(reply.content, reply.reasoning.clone()));

        Ok(CodeOutput {
            code,
            reasoning: reply.reasoning,
        })
    }

    /// Ask for a short explanation. Reasoning is off and the reply is not
    /// stored; the conversation ends here.
    pub async fn explain(&mut self, plan: &Value, _code: &str) -> Result<String, AgentError> {
        let summary = plan::component_summary(plan);
        self.build.append(Turn::user(prompts::explain_prompt(&summary)));

        let reply = self.transport.send(&self.build.to_messages(), false).await?;
        Ok(reply.content)
    }

    /// Modify existing code on the modify track. The transcript is reset on
    /// every call, so earlier builds and modifications never leak in.
    pub async fn modify_code(
        &mut self,
        current_code: &str,
        modification: &str,
    ) -> Result<CodeOutput, AgentError> {
        let span = info_span!("modify", session = %self.session_id);
        async {
            self.modify.reset(
                prompts::MODIFIER_SYSTEM_PROMPT,
                prompts::modify_prompt(current_code, modification),
            );

            info!("modifying code");
            let reply = self.transport.send(&self.modify.to_messages(), true).await?;
            Ok::<_, AgentError>(CodeOutput {
                code: extract::extract_code(&reply.content),
                reasoning: reply.reasoning,
            })
        }
        .instrument(span)
        .await
    }

    /// Run plan → generate → explain, pushing events to `events` as each
    /// stage starts and finishes.
    ///
    /// Every failure produces exactly one `error` event and the matching
    /// `Err`. If the stream is dropped, the run stops before the next stage
    /// with [`AgentError::Cancelled`] and no further events.
    pub async fn generate_with_progress(
        &mut self,
        request: &str,
        events: &ProgressSender,
    ) -> Result<GenerationResult, AgentError> {
        let span = info_span!("generate", session = %self.session_id);
        async {
            match self.run_stages(request, events).await {
                Ok(result) => {
                    self.state = PipelineState::Complete;
                    info!("generation complete");
                    events.emit(ProgressEvent::complete(&result));
                    Ok(result)
                }
                Err(AgentError::Cancelled) => {
                    self.state = PipelineState::Idle;
                    info!("generation cancelled by consumer");
                    Err(AgentError::Cancelled)
                }
                Err(e) => {
                    self.state = PipelineState::Error;
                    error!(error = %e, "generation failed");
                    let mut event = ProgressEvent::failed(e.to_string());
                    if let AgentError::PlanParse { ref raw } = e {
                        event = event.with_data(json!({ "raw": raw }));
                    }
                    events.emit(event);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Consume the agent and run the build pipeline on a tokio task.
    ///
    /// Returns the event stream and a handle yielding the agent back with
    /// the run's result.
    pub fn spawn_generate(
        self,
        request: impl Into<String>,
    ) -> (
        ProgressStream,
        JoinHandle<(Self, Result<GenerationResult, AgentError>)>,
    ) {
        let (tx, stream) = progress_channel();
        let request = request.into();
        let handle = tokio::spawn(async move {
            let mut agent = self;
            let result = agent.generate_with_progress(&request, &tx).await;
            (agent, result)
        });
        (stream, handle)
    }

    async fn run_stages(
        &mut self,
        request: &str,
        events: &ProgressSender,
    ) -> Result<GenerationResult, AgentError> {
        self.enter(PipelineState::Planning, events)?;
        events.emit(ProgressEvent::planning_started());
        let PlanOutput {
            plan,
            reasoning: plan_reasoning,
        } = self.plan(request).await?;
        if extract::is_parse_sentinel(&plan) {
            let raw = plan["raw"].as_str().unwrap_or_default().to_string();
            return Err(AgentError::PlanParse { raw });
        }
        events.emit(ProgressEvent::plan_created(&plan, plan_reasoning.as_ref()));

        self.enter(PipelineState::Generating, events)?;
        events.emit(ProgressEvent::generating_started());
        let CodeOutput {
            code,
            reasoning: code_reasoning,
        } = self.generate_code(&plan).await?;
        events.emit(ProgressEvent::code_generated(&code, code_reasoning.as_ref()));

        self.enter(PipelineState::Explaining, events)?;
        events.emit(ProgressEvent::explaining_started());
        let explanation = self.explain(&plan, &code).await?;

        Ok(GenerationResult {
            plan,
            code,
            explanation,
            reasoning: StageReasoning {
                plan: plan_reasoning,
                code: code_reasoning,
            },
        })
    }

    fn enter(&mut self, next: PipelineState, events: &ProgressSender) -> Result<(), AgentError> {
        if events.is_closed() {
            return Err(AgentError::Cancelled);
        }
        debug!(from = ?self.state, to = ?next, "stage transition");
        self.state = next;
        Ok(())
    }
}
