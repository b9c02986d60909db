//! Wizard session driver
//!
//! Feeds events through [`transition`] and executes the resulting actions
//! against an [`Orchestrator`]. Generation actions produce a follow-up
//! completion event so the wizard advances on its own once results land.

use crate::job::Job;
use crate::orchestrator::Orchestrator;
use crate::state_machine::{transition, Action, Event, Stage};
use postsmith_client::{ApiKey, Transport};
use tracing::{info, warn};

pub struct Session<T: Transport> {
    orchestrator: Orchestrator<T>,
    stage: Stage,
}

impl<T: Transport> Session<T> {
    pub fn new(orchestrator: Orchestrator<T>) -> Self {
        Self {
            orchestrator,
            stage: Stage::Splash,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn orchestrator(&self) -> &Orchestrator<T> {
        &self.orchestrator
    }

    /// Store a credential and advance past credential entry
    pub async fn submit_credential(&mut self, key: &str) -> Stage {
        match ApiKey::new(key) {
            Ok(api_key) => self.orchestrator.set_credential(api_key),
            Err(err) => {
                self.orchestrator.set_error(err.to_string());
                return self.stage;
            }
        }
        self.handle(Event::SubmitCredential).await
    }

    /// Apply an event and every follow-up it triggers
    pub async fn handle(&mut self, event: Event) -> Stage {
        let mut pending = Some(event);

        while let Some(event) = pending.take() {
            let gates = self.orchestrator.gates();
            let (stage, actions) = transition(self.stage, &gates, event);

            if stage != self.stage {
                info!("Wizard: {} -> {}", self.stage, stage);
            }
            self.stage = stage;

            for action in actions {
                if let Some(follow_up) = self.apply(action).await {
                    pending = Some(follow_up);
                }
            }
        }

        self.stage
    }

    async fn apply(&self, action: Action) -> Option<Event> {
        match action {
            Action::GenerateIdeas { instruction } => {
                self.orchestrator
                    .invoke_job(Job::GenerateIdeas { instruction })
                    .await;
                (self.stage == Stage::IdeaGeneration).then_some(Event::IdeasReady)
            }
            Action::GenerateAll { topic } => {
                if let Err(err) = self.orchestrator.generate_all(&topic).await {
                    self.orchestrator
                        .set_error(format!("Failed to generate content: {}", err));
                }
                (self.stage == Stage::ContentGeneration).then_some(Event::ContentReady)
            }
            Action::ClearTopic => {
                self.orchestrator.clear_topic();
                None
            }
            Action::ResetSession => {
                self.orchestrator.start_new_session();
                None
            }
            Action::ClearCredential => {
                self.orchestrator.clear_credential();
                None
            }
            Action::ClearError => {
                self.orchestrator.clear_error();
                None
            }
            Action::Rejected { reason } => {
                warn!("{}", reason);
                self.orchestrator.set_error(reason);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postsmith_client::{Endpoint, GenerationClient, MockTransport, TransportResponse};
    use postsmith_core::ContentConfig;

    const CAROUSEL: &str = "Slide 1: One\nFirst\n\nSlide 2: Two\nSecond\n\nSlide 3: Three\nThird";

    fn session(mock: MockTransport) -> Session<MockTransport> {
        let client = GenerationClient::new(mock, Endpoint::new("https://example.test", "m"));
        Session::new(Orchestrator::new(client, ContentConfig::default()))
    }

    fn content_mock() -> MockTransport {
        MockTransport::new()
            .with_rule("content ideas", TransportResponse::ok_text("- Idea A\n- Idea B"))
            .with_rule("carousel", TransportResponse::ok_text(CAROUSEL))
    }

    fn idea_requests(session: &Session<MockTransport>) -> usize {
        session
            .orchestrator()
            .client()
            .transport()
            .requests()
            .iter()
            .filter(|r| r.prompt.contains("content ideas"))
            .count()
    }

    #[tokio::test]
    async fn test_wizard_walkthrough() {
        let mut session = session(content_mock());

        assert_eq!(session.handle(Event::Next).await, Stage::CredentialEntry);
        assert_eq!(session.submit_credential("key").await, Stage::IdeaSelection);
        assert_eq!(session.orchestrator().ideas(), vec!["Idea A", "Idea B"]);

        let stage = session
            .handle(Event::SelectTopic {
                topic: "Idea B".to_string(),
            })
            .await;
        assert_eq!(stage, Stage::ContentDisplay);

        let store = session.orchestrator().store();
        assert_eq!(store.posts.len(), 6);
        assert_eq!(store.carousel_slides.len(), 3);
        assert!(session.orchestrator().last_error().is_none());

        let stage = session.handle(Event::NewSession).await;
        assert_eq!(stage, Stage::IdeaSelection);
        assert!(session.orchestrator().store().is_empty());
        assert!(session.orchestrator().snapshot().credential.is_some());
        assert_eq!(idea_requests(&session), 2);
    }

    #[tokio::test]
    async fn test_blank_credential_stays_put() {
        let mut session = session(content_mock());
        session.handle(Event::Next).await;

        assert_eq!(session.submit_credential("  ").await, Stage::CredentialEntry);
        assert!(session.orchestrator().last_error().is_some());
        assert_eq!(session.orchestrator().client().transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_ideas_keep_stage_and_error() {
        let mock = MockTransport::new().with_default(TransportResponse::new(500, "down"));
        let mut session = session(mock);
        session.handle(Event::Next).await;

        assert_eq!(session.submit_credential("key").await, Stage::IdeaGeneration);
        let error = session.orchestrator().last_error().unwrap();
        assert!(error.starts_with("Failed to generate ideas"));
    }

    #[tokio::test]
    async fn test_back_to_idea_generation_regenerates() {
        let mut session = session(content_mock());
        session.handle(Event::Next).await;
        session.submit_credential("key").await;

        let stage = session.handle(Event::Back).await;
        assert_eq!(stage, Stage::IdeaSelection);
        assert_eq!(idea_requests(&session), 2);
    }

    #[tokio::test]
    async fn test_return_to_credential_entry_clears_everything() {
        let mut session = session(content_mock());
        session.handle(Event::Next).await;
        session.submit_credential("key").await;
        session
            .handle(Event::SelectTopic {
                topic: "Idea A".to_string(),
            })
            .await;

        let stage = session
            .handle(Event::ReturnTo {
                stage: Stage::CredentialEntry,
            })
            .await;
        assert_eq!(stage, Stage::CredentialEntry);

        let state = session.orchestrator().snapshot();
        assert!(state.credential.is_none());
        assert!(state.ideas.is_empty());
        assert!(state.selected_topic.is_none());
        assert!(state.store.is_empty());
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_rejected_event_lands_in_error_slot() {
        let mut session = session(content_mock());
        session.handle(Event::Next).await;
        session.submit_credential("key").await;

        let stage = session.handle(Event::Next).await;
        assert_eq!(stage, Stage::IdeaSelection);
        assert_eq!(
            session.orchestrator().last_error().as_deref(),
            Some("Please select a content idea first.")
        );
    }
}
