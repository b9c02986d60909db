//! Pure state machine for the content wizard
//!
//! `transition(stage, gates, event) -> (stage, actions)` performs no I/O.
//! The caller supplies gate inputs read from the orchestrator and executes
//! the returned actions.
//!
//! - Forward moves are gated on credential, ideas, topic and content
//! - Back-edges reach every earlier stage and reset what that stage owns
//! - Invalid or gated events keep the current stage and emit `Rejected`

use serde::{Deserialize, Serialize};

/// Wizard stage, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Splash,
    CredentialEntry,
    IdeaGeneration,
    IdeaSelection,
    ContentGeneration,
    ContentDisplay,
}

impl Stage {
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Splash => None,
            Stage::CredentialEntry => Some(Stage::Splash),
            Stage::IdeaGeneration => Some(Stage::CredentialEntry),
            Stage::IdeaSelection => Some(Stage::IdeaGeneration),
            Stage::ContentGeneration => Some(Stage::IdeaSelection),
            Stage::ContentDisplay => Some(Stage::ContentGeneration),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Splash => write!(f, "splash"),
            Self::CredentialEntry => write!(f, "credential_entry"),
            Self::IdeaGeneration => write!(f, "idea_generation"),
            Self::IdeaSelection => write!(f, "idea_selection"),
            Self::ContentGeneration => write!(f, "content_generation"),
            Self::ContentDisplay => write!(f, "content_display"),
        }
    }
}

/// Facts the gated transitions depend on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gates {
    pub has_credential: bool,
    pub idea_count: usize,
    /// Instruction of the last idea generation, reused by refresh
    pub idea_instruction: Option<String>,
    pub topic: Option<String>,
    pub has_content: bool,
}

/// Events that trigger stage transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Advance to the next stage if its gate is open
    Next,
    /// A credential was entered
    SubmitCredential,
    /// Idea generation finished
    IdeasReady,
    /// An idea was chosen as the topic
    SelectTopic { topic: String },
    /// Content fan-out finished
    ContentReady,
    /// Return to the previous stage
    Back,
    /// Return to an earlier stage
    ReturnTo { stage: Stage },
    /// Start over with fresh ideas, keeping the credential
    NewSession,
    /// Regenerate what the current stage shows
    Refresh { instruction: Option<String> },
}

/// Side effects for the caller to execute, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GenerateIdeas { instruction: Option<String> },
    GenerateAll { topic: String },
    /// Drop the selected topic and its content
    ClearTopic,
    /// Drop ideas, topic and content
    ResetSession,
    ClearCredential,
    ClearError,
    /// The event was not accepted; surface the reason
    Rejected { reason: String },
}

fn rejected(stage: Stage, reason: impl Into<String>) -> (Stage, Vec<Action>) {
    (
        stage,
        vec![Action::Rejected {
            reason: reason.into(),
        }],
    )
}

/// Actions for jumping back to `target`
fn return_to(target: Stage) -> (Stage, Vec<Action>) {
    let actions = match target {
        Stage::Splash | Stage::CredentialEntry => vec![
            Action::ClearError,
            Action::ClearCredential,
            Action::ResetSession,
        ],
        Stage::IdeaGeneration => vec![
            Action::ClearError,
            Action::ResetSession,
            Action::GenerateIdeas { instruction: None },
        ],
        Stage::IdeaSelection => vec![Action::ClearError, Action::ClearTopic],
        Stage::ContentGeneration | Stage::ContentDisplay => vec![Action::ClearError],
    };
    (target, actions)
}

fn select_topic(stage: Stage, topic: String) -> (Stage, Vec<Action>) {
    let topic = topic.trim().to_string();
    if topic.is_empty() {
        return rejected(stage, "Please select a content idea first.");
    }
    (
        Stage::ContentGeneration,
        vec![Action::ClearError, Action::GenerateAll { topic }],
    )
}

/// Pure stage transition function
///
/// Never panics; anything the current stage cannot handle is rejected.
pub fn transition(stage: Stage, gates: &Gates, event: Event) -> (Stage, Vec<Action>) {
    match (stage, event) {
        (Stage::Splash, Event::Next) => (Stage::CredentialEntry, vec![Action::ClearError]),

        (Stage::CredentialEntry, Event::Next | Event::SubmitCredential) => {
            if gates.has_credential {
                (
                    Stage::IdeaGeneration,
                    vec![
                        Action::ClearError,
                        Action::GenerateIdeas { instruction: None },
                    ],
                )
            } else {
                rejected(stage, "Please enter your Gemini API key.")
            }
        }

        (Stage::IdeaGeneration, Event::Next) => {
            if gates.idea_count > 0 {
                (Stage::IdeaSelection, vec![Action::ClearError])
            } else {
                rejected(stage, "No ideas yet. Generate ideas before continuing.")
            }
        }

        // Generation failures already sit in the error slot
        (Stage::IdeaGeneration, Event::IdeasReady) => {
            if gates.idea_count > 0 {
                (Stage::IdeaSelection, vec![])
            } else {
                (stage, vec![])
            }
        }

        (Stage::IdeaSelection, Event::SelectTopic { topic }) => select_topic(stage, topic),

        (Stage::IdeaSelection, Event::Next) => match &gates.topic {
            Some(topic) => select_topic(stage, topic.clone()),
            None => rejected(stage, "Please select a content idea first."),
        },

        (Stage::ContentGeneration, Event::Next) => {
            if gates.has_content {
                (Stage::ContentDisplay, vec![Action::ClearError])
            } else {
                rejected(stage, "No content has been generated yet.")
            }
        }

        (Stage::ContentGeneration, Event::ContentReady) => {
            if gates.has_content {
                (Stage::ContentDisplay, vec![])
            } else {
                (stage, vec![])
            }
        }

        (Stage::ContentDisplay, Event::NewSession) => (
            Stage::IdeaGeneration,
            vec![
                Action::ClearError,
                Action::ResetSession,
                Action::GenerateIdeas { instruction: None },
            ],
        ),

        (stage, Event::Back) => match stage.previous() {
            Some(previous) => return_to(previous),
            None => rejected(stage, "Already at the first step."),
        },

        (stage, Event::ReturnTo { stage: target }) => {
            if target < stage {
                return_to(target)
            } else {
                rejected(
                    stage,
                    format!("Cannot return from {} to {}", stage, target),
                )
            }
        }

        (Stage::IdeaGeneration | Stage::IdeaSelection, Event::Refresh { instruction }) => {
            let instruction = instruction.or_else(|| gates.idea_instruction.clone());
            (
                stage,
                vec![Action::ClearError, Action::GenerateIdeas { instruction }],
            )
        }

        (Stage::ContentGeneration | Stage::ContentDisplay, Event::Refresh { .. }) => {
            match &gates.topic {
                Some(topic) => (
                    stage,
                    vec![
                        Action::ClearError,
                        Action::GenerateAll {
                            topic: topic.clone(),
                        },
                    ],
                ),
                None => rejected(stage, "No topic selected to refresh."),
            }
        }

        (stage, event) => rejected(
            stage,
            format!("Invalid wizard transition: {} cannot handle {:?}", stage, event),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_gates() -> Gates {
        Gates {
            has_credential: true,
            idea_count: 3,
            idea_instruction: None,
            topic: Some("Academic writing".to_string()),
            has_content: true,
        }
    }

    #[test]
    fn test_happy_path_full_flow() {
        let gates = open_gates();

        let (stage, actions) = transition(Stage::Splash, &gates, Event::Next);
        assert_eq!(stage, Stage::CredentialEntry);
        assert_eq!(actions, vec![Action::ClearError]);

        let (stage, actions) = transition(stage, &gates, Event::SubmitCredential);
        assert_eq!(stage, Stage::IdeaGeneration);
        assert!(matches!(actions[1], Action::GenerateIdeas { instruction: None }));

        let (stage, actions) = transition(stage, &gates, Event::IdeasReady);
        assert_eq!(stage, Stage::IdeaSelection);
        assert!(actions.is_empty());

        let (stage, actions) = transition(
            stage,
            &gates,
            Event::SelectTopic {
                topic: " Plagiarism ".to_string(),
            },
        );
        assert_eq!(stage, Stage::ContentGeneration);
        assert_eq!(
            actions[1],
            Action::GenerateAll {
                topic: "Plagiarism".to_string()
            }
        );

        let (stage, _) = transition(stage, &gates, Event::ContentReady);
        assert_eq!(stage, Stage::ContentDisplay);

        let (stage, actions) = transition(stage, &gates, Event::NewSession);
        assert_eq!(stage, Stage::IdeaGeneration);
        assert_eq!(
            actions,
            vec![
                Action::ClearError,
                Action::ResetSession,
                Action::GenerateIdeas { instruction: None },
            ]
        );
    }

    #[test]
    fn test_gates_block_forward_moves() {
        let closed = Gates::default();

        let (stage, actions) = transition(Stage::CredentialEntry, &closed, Event::SubmitCredential);
        assert_eq!(stage, Stage::CredentialEntry);
        assert!(matches!(actions[0], Action::Rejected { .. }));

        let (stage, actions) = transition(Stage::IdeaGeneration, &closed, Event::Next);
        assert_eq!(stage, Stage::IdeaGeneration);
        assert!(matches!(actions[0], Action::Rejected { .. }));

        let (stage, actions) = transition(Stage::IdeaSelection, &closed, Event::Next);
        assert_eq!(stage, Stage::IdeaSelection);
        assert!(matches!(actions[0], Action::Rejected { .. }));

        let (stage, _) = transition(Stage::ContentGeneration, &closed, Event::Next);
        assert_eq!(stage, Stage::ContentGeneration);
    }

    #[test]
    fn test_completion_without_results_stays_silently() {
        let closed = Gates::default();

        let (stage, actions) = transition(Stage::IdeaGeneration, &closed, Event::IdeasReady);
        assert_eq!(stage, Stage::IdeaGeneration);
        assert!(actions.is_empty());

        let (stage, actions) = transition(Stage::ContentGeneration, &closed, Event::ContentReady);
        assert_eq!(stage, Stage::ContentGeneration);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_blank_topic_rejected() {
        let (stage, actions) = transition(
            Stage::IdeaSelection,
            &open_gates(),
            Event::SelectTopic {
                topic: "   ".to_string(),
            },
        );
        assert_eq!(stage, Stage::IdeaSelection);
        assert!(matches!(actions[0], Action::Rejected { .. }));
    }

    #[test]
    fn test_back_edges_reset_what_they_leave() {
        let gates = open_gates();

        let (stage, actions) = transition(Stage::ContentDisplay, &gates, Event::Back);
        assert_eq!(stage, Stage::ContentGeneration);
        assert_eq!(actions, vec![Action::ClearError]);

        let (stage, actions) = transition(Stage::ContentGeneration, &gates, Event::Back);
        assert_eq!(stage, Stage::IdeaSelection);
        assert!(actions.contains(&Action::ClearTopic));

        let (stage, actions) = transition(Stage::IdeaSelection, &gates, Event::Back);
        assert_eq!(stage, Stage::IdeaGeneration);
        assert!(actions.contains(&Action::ResetSession));
        assert!(actions.contains(&Action::GenerateIdeas { instruction: None }));

        let (stage, actions) = transition(
            Stage::ContentDisplay,
            &gates,
            Event::ReturnTo {
                stage: Stage::CredentialEntry,
            },
        );
        assert_eq!(stage, Stage::CredentialEntry);
        assert!(actions.contains(&Action::ClearCredential));
        assert!(actions.contains(&Action::ResetSession));
    }

    #[test]
    fn test_invalid_transition_never_panics() {
        let gates = open_gates();

        let (stage, actions) = transition(Stage::Splash, &gates, Event::Back);
        assert_eq!(stage, Stage::Splash);
        assert!(matches!(actions[0], Action::Rejected { .. }));

        let (stage, actions) = transition(
            Stage::IdeaGeneration,
            &gates,
            Event::ReturnTo {
                stage: Stage::ContentDisplay,
            },
        );
        assert_eq!(stage, Stage::IdeaGeneration);
        assert!(matches!(actions[0], Action::Rejected { .. }));

        let (stage, actions) = transition(Stage::IdeaSelection, &gates, Event::NewSession);
        assert_eq!(stage, Stage::IdeaSelection);
        if let Action::Rejected { reason } = &actions[0] {
            assert!(reason.contains("idea_selection"));
        } else {
            panic!("expected rejection");
        }
    }

    #[test]
    fn test_refresh_by_stage() {
        let mut gates = open_gates();
        gates.idea_instruction = Some("for PhD students".to_string());

        let (stage, actions) = transition(
            Stage::IdeaSelection,
            &gates,
            Event::Refresh { instruction: None },
        );
        assert_eq!(stage, Stage::IdeaSelection);
        assert_eq!(
            actions[1],
            Action::GenerateIdeas {
                instruction: Some("for PhD students".to_string())
            }
        );

        let (stage, actions) = transition(
            Stage::ContentDisplay,
            &gates,
            Event::Refresh { instruction: None },
        );
        assert_eq!(stage, Stage::ContentDisplay);
        assert!(matches!(actions[1], Action::GenerateAll { .. }));

        let (_, actions) = transition(
            Stage::CredentialEntry,
            &gates,
            Event::Refresh { instruction: None },
        );
        assert!(matches!(actions[0], Action::Rejected { .. }));
    }
}
