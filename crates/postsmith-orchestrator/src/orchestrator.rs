//! Generation orchestrator
//!
//! Owns the session state (credential, ideas, selected topic, content store,
//! UI slots) and runs generation jobs against it. Jobs build a prompt, call
//! the client, and fold the parsed result back into the state under a short
//! synchronous lock that is never held across an await.

use crate::job::{AdviceKind, GenerationRequest, Job, JobId};
use crate::parse::{parse_carousel, parse_ideas};
use crate::prompt::build_prompt;
use crate::state_machine::Gates;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use postsmith_client::{ApiKey, GenerationClient, HttpTransport, Transport};
use postsmith_core::{
    Channel, ContentConfig, ContentStore, GenerationResult, Platform, PostsmithConfig,
    PostsmithError, Result, SlideCount,
};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Drafted client reply shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub channel: Channel,
    pub text: String,
}

/// Hashtag or tip output; shown to the operator but never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdviceKind,
    pub platform: Platform,
    pub text: String,
}

/// Everything the wizard shows, plus the live content store
#[derive(Debug, Clone)]
pub struct OrchestratorState {
    /// Epoch of the current store; rotated on every reset
    pub session_id: Uuid,
    pub credential: Option<ApiKey>,
    pub ideas: Vec<String>,
    /// Instruction used for the most recent idea generation
    pub idea_instruction: Option<String>,
    pub selected_topic: Option<String>,
    pub store: ContentStore,
    pub carousel_slides: SlideCount,
    /// Jobs started and not yet finished
    pub in_flight: usize,
    /// Most recently started job still running
    pub active_job: Option<JobId>,
    pub last_error: Option<String>,
    pub reply: Option<Reply>,
    pub advisory: Option<Advisory>,
}

impl OrchestratorState {
    fn new(carousel_slides: SlideCount) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            credential: None,
            ideas: Vec::new(),
            idea_instruction: None,
            selected_topic: None,
            store: ContentStore::new(),
            carousel_slides,
            in_flight: 0,
            active_job: None,
            last_error: None,
            reply: None,
            advisory: None,
        }
    }

    fn reset_content(&mut self) {
        self.store.reset();
        self.reply = None;
        self.advisory = None;
        self.session_id = Uuid::new_v4();
    }

    fn is_current(&self, session: Uuid) -> bool {
        self.session_id == session
    }
}

/// Per-job outcome of a fan-out run
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub job: JobId,
    pub result: GenerationResult,
}

/// Summary of [`Orchestrator::generate_all`]
#[derive(Debug, Clone, Serialize)]
pub struct FanOutReport {
    pub topic: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<JobOutcome>,
}

impl FanOutReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.result.is_success())
    }
}

/// Jobs dispatched by a fan-out run, in dispatch order
pub fn fan_out_jobs(slides: SlideCount) -> Vec<Job> {
    let mut jobs: Vec<Job> = Platform::ALL
        .iter()
        .map(|platform| Job::GeneratePost {
            platform: *platform,
        })
        .collect();
    jobs.push(Job::GenerateArticle);
    jobs.push(Job::GenerateImagePrompt);
    jobs.push(Job::GenerateVideoPrompt);
    jobs.push(Job::GenerateCarousel { slides });
    jobs
}

/// A job ready for the network
struct Prepared {
    request: GenerationRequest,
    prompt: String,
    api_key: ApiKey,
    session: Uuid,
}

/// Runs generation jobs and folds their results into shared state
pub struct Orchestrator<T: Transport> {
    client: GenerationClient<T>,
    content: ContentConfig,
    state: Mutex<OrchestratorState>,
}

impl Orchestrator<HttpTransport> {
    /// Create an orchestrator over real HTTP from configuration
    pub fn from_config(config: &PostsmithConfig) -> Self {
        let orchestrator = Self::new(GenerationClient::from_config(config), config.content.clone());
        orchestrator.set_carousel_slides(config.carousel_slides());
        orchestrator
    }
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(client: GenerationClient<T>, content: ContentConfig) -> Self {
        let slides = SlideCount::new(content.carousel_slides).unwrap_or_default();
        Self {
            client,
            content,
            state: Mutex::new(OrchestratorState::new(slides)),
        }
    }

    pub fn client(&self) -> &GenerationClient<T> {
        &self.client
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> OrchestratorState {
        self.lock().clone()
    }

    /// Wizard gate inputs derived from the current state
    pub fn gates(&self) -> Gates {
        let state = self.lock();
        Gates {
            has_credential: state.credential.is_some(),
            idea_count: state.ideas.len(),
            idea_instruction: state.idea_instruction.clone(),
            topic: state.selected_topic.clone(),
            has_content: state.store.has_content(),
        }
    }

    pub fn store(&self) -> ContentStore {
        self.lock().store.clone()
    }

    pub fn ideas(&self) -> Vec<String> {
        self.lock().ideas.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn set_credential(&self, api_key: ApiKey) {
        self.lock().credential = Some(api_key);
    }

    pub fn clear_credential(&self) {
        self.lock().credential = None;
    }

    pub fn set_carousel_slides(&self, slides: SlideCount) {
        self.lock().carousel_slides = slides;
    }

    pub fn clear_error(&self) {
        self.lock().last_error = None;
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.lock().last_error = Some(message.into());
    }

    /// Select a topic, starting an empty store for it
    pub fn select_topic(&self, topic: &str) -> Result<()> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(PostsmithError::Validation(
                "Please select a content idea first.".to_string(),
            ));
        }

        let mut state = self.lock();
        state.selected_topic = Some(topic.to_string());
        state.reset_content();
        Ok(())
    }

    /// Drop the selected topic and everything generated for it
    pub fn clear_topic(&self) {
        let mut state = self.lock();
        state.selected_topic = None;
        state.reset_content();
    }

    /// Clear ideas, topic and content; the credential is kept
    pub fn start_new_session(&self) {
        let mut state = self.lock();
        state.ideas.clear();
        state.idea_instruction = None;
        state.selected_topic = None;
        state.last_error = None;
        state.reset_content();
        info!("Started new session {}", state.session_id);
    }

    /// Run one job, recording any failure in the error slot
    pub async fn invoke_job(&self, job: Job) -> GenerationResult {
        self.clear_error();
        self.run_job(job).await
    }

    /// Generate every content artifact for `topic` concurrently
    ///
    /// The store is reset before any job is dispatched. Individual job
    /// failures are reported in the result; only a failure to dispatch at
    /// all is returned as an error.
    pub async fn generate_all(&self, topic: &str) -> Result<FanOutReport> {
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return Err(PostsmithError::Validation(
                "Please select a content idea first.".to_string(),
            ));
        }

        let slides = {
            let mut state = self.lock();
            if state.credential.is_none() {
                return Err(missing_credential());
            }
            state.selected_topic = Some(topic.clone());
            state.last_error = None;
            state.reset_content();
            state.carousel_slides
        };

        let jobs = fan_out_jobs(slides);
        info!("Generating {} artifacts for '{}'", jobs.len(), topic);
        let started_at = Utc::now();

        let outcomes = join_all(jobs.into_iter().map(|job| async move {
            let id = job.id();
            JobOutcome {
                job: id,
                result: self.run_job(job).await,
            }
        }))
        .await;

        let report = FanOutReport {
            topic,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            "Fan-out finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    async fn run_job(&self, job: Job) -> GenerationResult {
        let id = job.id();
        let description = job.describe();

        let prepared = match self.prepare(job) {
            Ok(prepared) => prepared,
            Err(err) => return self.record_failure(&description, err, None),
        };
        let session = prepared.session;

        self.begin(id);
        info!("Starting job {}", id);

        let outcome = match self
            .client
            .generate_text(&prepared.api_key, &prepared.prompt)
            .await
        {
            Ok(text) => self.fold(&prepared.request.job, session, text),
            Err(err) => Err(err),
        };

        self.finish(id);

        match outcome {
            Ok(text) => {
                info!("Finished job {}", id);
                GenerationResult::Success { text }
            }
            Err(err) => self.record_failure(&description, err, Some(session)),
        }
    }

    /// Validate, bind the topic and credential, and build the prompt
    fn prepare(&self, job: Job) -> Result<Prepared> {
        job.validate()?;

        let mut state = self.lock();
        let api_key = state.credential.clone().ok_or_else(missing_credential)?;

        if let Job::GenerateIdeas { instruction } = &job {
            state.idea_instruction = instruction.clone();
        }

        let topic = if job.needs_topic() {
            state.selected_topic.clone()
        } else {
            None
        };
        let request = GenerationRequest::new(job, topic);
        let prompt = build_prompt(&request, &self.content)?;

        Ok(Prepared {
            request,
            prompt,
            api_key,
            session: state.session_id,
        })
    }

    fn begin(&self, id: JobId) {
        let mut state = self.lock();
        state.in_flight += 1;
        state.active_job = Some(id);
    }

    fn finish(&self, id: JobId) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.active_job == Some(id) {
            state.active_job = None;
        }
    }

    /// Apply a generated text to the state it belongs to
    ///
    /// Results from a session that has since been reset are dropped.
    fn fold(&self, job: &Job, session: Uuid, text: String) -> Result<String> {
        let mut state = self.lock();
        if !state.is_current(session) {
            debug!("Dropping {} result from stale session {}", job.id(), session);
            return Ok(text);
        }

        if let Some((platform, field)) = job.post_field() {
            state.store.set_post_field(platform, field, text.clone());
            return Ok(text);
        }

        match job {
            Job::GenerateIdeas { .. } => {
                let ideas = parse_ideas(&text);
                if ideas.is_empty() {
                    return Err(PostsmithError::Parse(
                        "no ideas found in response".to_string(),
                    ));
                }
                state.ideas = ideas;
            }
            Job::GenerateArticle => state.store.set_article(text.clone()),
            Job::GenerateImagePrompt => state.store.replace_image_prompts(text.clone()),
            Job::GenerateVideoPrompt => state.store.replace_video_prompts(text.clone()),
            Job::GenerateCarousel { slides } => {
                let parsed = parse_carousel(&text, *slides)?;
                state.store.replace_carousel(parsed);
            }
            Job::Translate { key, .. } => state.store.set_translation(*key, text.clone()),
            Job::Advise { kind, platform, .. } => {
                state.advisory = Some(Advisory {
                    kind: *kind,
                    platform: *platform,
                    text: text.clone(),
                });
            }
            Job::DraftReply { channel, .. } | Job::CustomizeReply { channel, .. } => {
                state.reply = Some(Reply {
                    channel: *channel,
                    text: text.clone(),
                });
            }
            // Post-owning jobs were handled above
            Job::GeneratePost { .. }
            | Job::Rephrase { .. }
            | Job::SeoOptimize { .. }
            | Job::Marketize { .. }
            | Job::Customize { .. } => {}
        }

        Ok(text)
    }

    fn record_failure(
        &self,
        description: &str,
        err: PostsmithError,
        session: Option<Uuid>,
    ) -> GenerationResult {
        let message = format!("Failed to {}: {}", description, err);
        let mut state = self.lock();

        match session {
            Some(session) if !state.is_current(session) => {
                warn!("Ignoring failure from stale session: {}", message);
            }
            _ => {
                error!("{}", message);
                state.last_error = Some(message);
            }
        }

        GenerationResult::failure(&err)
    }

    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn missing_credential() -> PostsmithError {
    PostsmithError::Auth("API key is not set. Please enter your Gemini API key.".to_string())
}
