//! Run Discussion use case
//!
//! Orchestrates a multi-persona discussion: a human participant exchanges
//! turns with several independently-prompted agent personas on one topic.
//! Fairness selection spreads responses across personas; every generation
//! call goes through the request throttle.
//!
//! Concurrency discipline: each operation locks its session handle for its
//! duration, so operations on one session serialize. Within one user-input
//! turn the selected responders run concurrently, and their results are
//! applied one at a time as they complete, so each turn append and score
//! update is a single unit.

use crate::ports::discussion_logger::{DiscussionEvent, DiscussionLogger, NoDiscussionLogger};
use crate::ports::gateway::TextGateway;
use crate::ports::session_store::{SessionStore, StoreError};
use crate::throttle::{Throttle, ThrottleConfig, ThrottleError};
use chrono::Utc;
use roundtable_domain::{
    ConsensusAnalysis, DiscussionMetrics, DiscussionOpened, DiscussionSession, ExtractError,
    FinalReport, ParticipationScore, Persona, PromptTemplate, ResponderFailure, Topic, Turn,
    TurnOutcome, extract_json_object, select_responders,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Orchestrator tuning. Both knobs are externally settable.
#[derive(Debug, Clone)]
pub struct DiscussionConfig {
    /// Maximum personas selected to respond to one user message
    pub fan_out: usize,
    /// Transcript turns included in every prompt
    pub context_window: usize,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            fan_out: 3,
            context_window: 8,
        }
    }
}

/// Errors from discussion operations
#[derive(Error, Debug)]
pub enum DiscussionError {
    #[error("invalid state: operation requires an {expected} session, but it is {actual}")]
    InvalidStateTransition {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("persona '{0}' is not a participant in this discussion")]
    UnknownParticipant(Persona),

    #[error("a discussion needs at least one participant")]
    NoParticipants,

    #[error("all {} selected responders failed", .failures.len())]
    AllRespondersFailed { failures: Vec<ResponderFailure> },

    #[error("response carried no usable analysis: {0}")]
    MalformedResponse(#[from] ExtractError),

    #[error(transparent)]
    Throttle(#[from] ThrottleError),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DiscussionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => DiscussionError::SessionNotFound(id),
            other => DiscussionError::Store(other),
        }
    }
}

/// Use case for running throttled multi-persona discussions
pub struct DiscussionService<G: TextGateway + 'static, S: SessionStore> {
    gateway: Arc<G>,
    store: Arc<S>,
    throttle: Throttle<String>,
    config: DiscussionConfig,
    logger: Arc<dyn DiscussionLogger>,
}

impl<G: TextGateway + 'static, S: SessionStore + 'static> DiscussionService<G, S> {
    pub fn new(
        gateway: Arc<G>,
        store: Arc<S>,
        throttle_config: ThrottleConfig,
        config: DiscussionConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            throttle: Throttle::new(throttle_config),
            config,
            logger: Arc::new(NoDiscussionLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn DiscussionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Submit one generation call through the throttle. The returned future
    /// does not borrow the service, so responder calls can be spawned.
    fn throttled_generate(
        &self,
        prompt: String,
    ) -> impl Future<Output = Result<String, ThrottleError>> + Send + use<G, S> {
        let gateway = Arc::clone(&self.gateway);
        self.throttle.submit(move || {
            let gateway = Arc::clone(&gateway);
            let prompt = prompt.clone();
            Box::pin(async move { gateway.generate(&prompt).await })
        })
    }

    /// Start a discussion: create the session, zero the scores, and have
    /// the facilitator open the floor.
    pub async fn initialize_discussion(
        &self,
        topic: Topic,
        participants: Vec<Persona>,
        context: Option<String>,
    ) -> Result<DiscussionOpened, DiscussionError> {
        if participants.is_empty() {
            return Err(DiscussionError::NoParticipants);
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        info!(%session_id, topic = %topic, participants = participants.len(), "initializing discussion");

        let prompt = PromptTemplate::opening(&topic, context.as_deref());
        let opening_text = self.throttled_generate(prompt).await?;

        let mut session = DiscussionSession::new(&session_id, topic, participants, context);
        let opening = Turn::opening(opening_text);
        session.append_turn(opening.clone());
        self.store.insert(session).await?;

        self.logger.log(DiscussionEvent::new(
            "discussion_opened",
            serde_json::json!({ "session_id": session_id }),
        ));

        Ok(DiscussionOpened {
            session_id,
            opening,
        })
    }

    /// Process one message from the human participant.
    ///
    /// With a focus persona, only that persona responds; otherwise fairness
    /// selection picks the least-active participants. Responder calls run
    /// concurrently; one responder failing never aborts its siblings, and
    /// the outcome reports exactly who succeeded and who failed.
    pub async fn process_user_input(
        &self,
        session_id: &str,
        message: &str,
        focus: Option<Persona>,
    ) -> Result<TurnOutcome, DiscussionError> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.lock().await;
        ensure_active(&session)?;

        let responders = match focus {
            Some(persona) if !session.is_participant(persona) => {
                return Err(DiscussionError::UnknownParticipant(persona));
            }
            Some(persona) => vec![persona],
            None => select_responders(
                session.participants(),
                session.participation(),
                self.config.fan_out,
            ),
        };

        let user_turn = Turn::user(message);
        session.append_turn(user_turn.clone());
        debug!(%session_id, responders = ?responders, "fan-out selected");

        // All responders see the same transcript snapshot, taken after the
        // user turn landed.
        let topic = session.topic().clone();
        let window = session.recent_turns(self.config.context_window).to_vec();

        let mut join_set = JoinSet::new();
        for persona in responders {
            let prompt = PromptTemplate::agent_response(persona, &topic, &window, message);
            let call = self.throttled_generate(prompt);
            join_set.spawn(async move { (persona, call.await) });
        }

        let mut responses = Vec::new();
        let mut failures = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((persona, Ok(text))) => {
                    let turn = session.record_response(persona, text);
                    self.logger.log(DiscussionEvent::new(
                        "turn_appended",
                        serde_json::json!({
                            "session_id": session_id,
                            "speaker": persona.key(),
                            "bytes": turn.message.len(),
                        }),
                    ));
                    responses.push(turn);
                }
                Ok((persona, Err(e))) => {
                    warn!(%session_id, %persona, error = %e, "responder failed");
                    self.logger.log(DiscussionEvent::new(
                        "responder_failed",
                        serde_json::json!({
                            "session_id": session_id,
                            "speaker": persona.key(),
                            "error": e.to_string(),
                        }),
                    ));
                    failures.push(ResponderFailure {
                        persona,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!("task join error: {}", e);
                }
            }
        }

        if responses.is_empty() {
            return Err(DiscussionError::AllRespondersFailed { failures });
        }

        Ok(TurnOutcome {
            user_turn,
            responses,
            failures,
        })
    }

    /// Put a question to one persona directly.
    ///
    /// The answer lands in the transcript as a direct-question turn and is
    /// kept out of the fairness counters, so being asked directly does not
    /// cost a persona its regular speaking slots.
    pub async fn ask_specific_agent(
        &self,
        session_id: &str,
        persona: Persona,
        question: &str,
    ) -> Result<Turn, DiscussionError> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.lock().await;
        ensure_active(&session)?;

        if !session.is_participant(persona) {
            return Err(DiscussionError::UnknownParticipant(persona));
        }

        let prompt = PromptTemplate::direct_question(
            persona,
            session.topic(),
            session.recent_turns(self.config.context_window),
            question,
        );
        let answer = self.throttled_generate(prompt).await?;
        let turn = session.record_direct_response(persona, answer);

        self.logger.log(DiscussionEvent::new(
            "direct_question_answered",
            serde_json::json!({ "session_id": session_id, "speaker": persona.key() }),
        ));

        Ok(turn)
    }

    /// Analyze where the participants agree and disagree.
    ///
    /// Read-only: valid on active and ended sessions, and never touches the
    /// transcript or the scores.
    pub async fn analyze_consensus(
        &self,
        session_id: &str,
    ) -> Result<ConsensusAnalysis, DiscussionError> {
        let prompt = {
            let handle = self.store.get(session_id).await?;
            let session = handle.lock().await;
            PromptTemplate::consensus(
                session.topic(),
                session.recent_turns(self.config.context_window),
            )
        };

        let text = self.throttled_generate(prompt).await?;
        let value = extract_json_object(&text)?;
        serde_json::from_value(value)
            .map_err(|e| DiscussionError::MalformedResponse(ExtractError::Invalid(e)))
    }

    /// Produce a prose summary of the discussion so far. Read-only.
    pub async fn generate_summary(&self, session_id: &str) -> Result<String, DiscussionError> {
        let prompt = {
            let handle = self.store.get(session_id).await?;
            let session = handle.lock().await;
            PromptTemplate::summary(
                session.topic(),
                session.recent_turns(self.config.context_window),
            )
        };

        Ok(self.throttled_generate(prompt).await?)
    }

    /// Close the discussion and return the final report.
    ///
    /// The session and its transcript are retained for later reads; only
    /// mutating operations are rejected afterwards. An unextractable
    /// consensus degrades to an empty analysis rather than blocking the
    /// report; gateway failure leaves the session active so ending can be
    /// retried.
    pub async fn end_discussion(&self, session_id: &str) -> Result<FinalReport, DiscussionError> {
        {
            let handle = self.store.get(session_id).await?;
            let session = handle.lock().await;
            ensure_active(&session)?;
        }

        let (summary, consensus) = tokio::join!(
            self.generate_summary(session_id),
            self.analyze_consensus(session_id)
        );
        let summary = summary?;
        let consensus = match consensus {
            Ok(analysis) => analysis,
            Err(DiscussionError::MalformedResponse(e)) => {
                warn!(%session_id, error = %e, "consensus analysis unusable, reporting without it");
                ConsensusAnalysis::unavailable()
            }
            Err(e) => return Err(e),
        };

        let handle = self.store.get(session_id).await?;
        let mut session = handle.lock().await;
        // Re-check: a racing end_discussion may have won while we were
        // generating the report.
        ensure_active(&session)?;
        session.end();

        let metrics = DiscussionMetrics {
            total_turns: session.transcript().len(),
            duration_ms: (Utc::now() - session.started_at()).num_milliseconds(),
            participation: session.participation().clone(),
            topic: session.topic().content().to_string(),
        };

        info!(%session_id, turns = metrics.total_turns, "discussion ended");
        self.logger.log(DiscussionEvent::new(
            "discussion_ended",
            serde_json::json!({ "session_id": session_id, "turns": metrics.total_turns }),
        ));

        Ok(FinalReport {
            session_id: session_id.to_string(),
            summary,
            consensus,
            metrics,
        })
    }

    /// Full transcript, in append order. Valid in any state.
    pub async fn transcript(&self, session_id: &str) -> Result<Vec<Turn>, DiscussionError> {
        let handle = self.store.get(session_id).await?;
        let session = handle.lock().await;
        Ok(session.transcript().to_vec())
    }

    /// Current participation snapshot. Valid in any state.
    pub async fn participation(
        &self,
        session_id: &str,
    ) -> Result<HashMap<Persona, ParticipationScore>, DiscussionError> {
        let handle = self.store.get(session_id).await?;
        let session = handle.lock().await;
        Ok(session.participation().clone())
    }
}

fn ensure_active(session: &DiscussionSession) -> Result<(), DiscussionError> {
    if session.is_active() {
        Ok(())
    } else {
        Err(DiscussionError::InvalidStateTransition {
            expected: "active",
            actual: session.status().as_str(),
        })
    }
}
