//! Interactive content wizard
//!
//! Renders each wizard stage with dialoguer prompts and feeds the operator's
//! choices into a [`Session`].

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password, Select};
use postsmith_client::{ApiKey, Transport};
use postsmith_core::{Channel, ContentStore, GenerationResult, Platform, TranslationKey};
use postsmith_orchestrator::{AdviceKind, Event, Job, Orchestrator, Session, Stage};

/// Run the wizard until the operator quits
pub async fn run<T: Transport>(orchestrator: Orchestrator<T>, preset: Option<ApiKey>) -> Result<()> {
    let mut session = Session::new(orchestrator);

    println!("Postsmith - content studio for academic services");
    println!("=================================================\n");
    session.handle(Event::Next).await;

    if let Some(api_key) = preset {
        session.submit_credential(api_key.expose()).await;
        show_error(&session);
    }

    loop {
        let keep_going = match session.stage() {
            Stage::Splash => {
                session.handle(Event::Next).await;
                true
            }
            Stage::CredentialEntry => credential_entry(&mut session).await?,
            Stage::IdeaGeneration => idea_generation(&mut session).await?,
            Stage::IdeaSelection => idea_selection(&mut session).await?,
            Stage::ContentGeneration => content_generation(&mut session).await?,
            Stage::ContentDisplay => content_display(&mut session).await?,
        };

        show_error(&session);
        if !keep_going {
            println!("Goodbye.");
            return Ok(());
        }
    }
}

fn show_error<T: Transport>(session: &Session<T>) {
    if let Some(error) = session.orchestrator().last_error() {
        eprintln!("\n! {}\n", error);
    }
}

fn choose(prompt: &str, items: &[&str]) -> Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .context("Failed to get user input")
}

fn ask(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .context("Failed to get user input")
}

fn optional(text: String) -> Option<String> {
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

async fn credential_entry<T: Transport>(session: &mut Session<T>) -> Result<bool> {
    match choose("Gemini API key", &["Enter key", "Quit"])? {
        0 => {
            let key = Password::new()
                .with_prompt("API key")
                .allow_empty_password(true)
                .interact()
                .context("Failed to get user input")?;
            session.submit_credential(&key).await;
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn idea_generation<T: Transport>(session: &mut Session<T>) -> Result<bool> {
    let items = ["Retry", "Retry with instructions", "Back", "Quit"];
    match choose("Idea generation did not finish", &items)? {
        0 => session.handle(Event::Refresh { instruction: None }).await,
        1 => {
            let instruction = optional(ask("Instructions")?);
            session.handle(Event::Refresh { instruction }).await
        }
        2 => session.handle(Event::Back).await,
        _ => return Ok(false),
    };
    Ok(true)
}

async fn idea_selection<T: Transport>(session: &mut Session<T>) -> Result<bool> {
    let ideas = session.orchestrator().ideas();
    let mut items: Vec<&str> = ideas.iter().map(String::as_str).collect();
    let extras = [
        "Write my own topic",
        "Refresh ideas",
        "Refresh ideas with instructions",
        "Back",
        "Quit",
    ];
    items.extend(extras);

    let choice = choose("Pick a topic", &items)?;
    if let Some(idea) = ideas.get(choice) {
        println!("Generating content for '{}'...", idea);
        session
            .handle(Event::SelectTopic {
                topic: idea.clone(),
            })
            .await;
        return Ok(true);
    }

    match choice - ideas.len() {
        0 => {
            let topic = ask("Topic")?;
            println!("Generating content...");
            session.handle(Event::SelectTopic { topic }).await;
        }
        1 => {
            session.handle(Event::Refresh { instruction: None }).await;
        }
        2 => {
            let instruction = optional(ask("Instructions")?);
            session.handle(Event::Refresh { instruction }).await;
        }
        3 => {
            session.handle(Event::Back).await;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

async fn content_generation<T: Transport>(session: &mut Session<T>) -> Result<bool> {
    let items = ["Retry", "Back to ideas", "Quit"];
    match choose("Content generation did not produce anything", &items)? {
        0 => session.handle(Event::Refresh { instruction: None }).await,
        1 => session.handle(Event::Back).await,
        _ => return Ok(false),
    };
    Ok(true)
}

async fn content_display<T: Transport>(session: &mut Session<T>) -> Result<bool> {
    print_summary(&session.orchestrator().store());

    let items = [
        "Show a post",
        "Refine a post",
        "Show article",
        "Show media prompts and carousel",
        "Translate a post",
        "Draft a client reply",
        "Regenerate everything",
        "New session",
        "Back",
        "Change API key",
        "Quit",
    ];

    match choose("What next?", &items)? {
        0 => show_post(session)?,
        1 => refine_post(session).await?,
        2 => show_article(session),
        3 => show_media(session),
        4 => translate_post(session).await?,
        5 => draft_reply(session).await?,
        6 => {
            session.handle(Event::Refresh { instruction: None }).await;
        }
        7 => {
            session.handle(Event::NewSession).await;
        }
        8 => {
            session.handle(Event::Back).await;
        }
        9 => {
            session
                .handle(Event::ReturnTo {
                    stage: Stage::CredentialEntry,
                })
                .await;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn print_summary(store: &ContentStore) {
    println!("\nGenerated content");
    println!("-----------------");
    for platform in Platform::ALL {
        let status = match store.post(platform).and_then(|p| p.original.as_ref()) {
            Some(_) => "ready",
            None => "missing",
        };
        println!("  {:<10} {}", platform.label(), status);
    }
    println!(
        "  {:<10} {}",
        "Article",
        if store.article.is_some() { "ready" } else { "missing" }
    );
    println!("  {:<10} {}", "Image", store.image_prompts.len());
    println!("  {:<10} {}", "Video", store.video_prompts.len());
    println!("  {:<10} {}\n", "Carousel", store.carousel_slides.len());
}

fn pick_platform() -> Result<Platform> {
    let labels: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
    Ok(Platform::ALL[choose("Platform", &labels)?])
}

fn show_post<T: Transport>(session: &Session<T>) -> Result<()> {
    let platform = pick_platform()?;
    match session.orchestrator().store().post(platform) {
        Some(record) => {
            let variants = [
                ("Original", &record.original),
                ("English", &record.translated),
                ("Rephrased", &record.rephrased),
                ("SEO", &record.seo_optimized),
                ("Marketing", &record.marketing),
                ("Customized", &record.customized),
            ];
            for (label, text) in variants {
                if let Some(text) = text {
                    println!("\n[{}]\n{}", label, text);
                }
            }
            println!();
        }
        None => println!("No {} post was generated.", platform.label()),
    }
    Ok(())
}

fn print_result(result: &GenerationResult) {
    if let GenerationResult::Success { text } = result {
        println!("\n{}\n", text);
    }
}

async fn refine_post<T: Transport>(session: &Session<T>) -> Result<()> {
    let platform = pick_platform()?;
    let store = session.orchestrator().store();
    let Some(text) = store.post(platform).and_then(|p| p.original.clone()) else {
        println!("No {} post to refine.", platform.label());
        return Ok(());
    };

    let ops = [
        "Rephrase",
        "Optimize for SEO",
        "Marketing rewrite",
        "Customize",
        "Hashtags and keywords",
        "Performance tips",
    ];
    let job = match choose("Operation", &ops)? {
        0 => Job::Rephrase { platform, text },
        1 => Job::SeoOptimize { platform, text },
        2 => Job::Marketize { platform, text },
        3 => Job::Customize {
            platform,
            text,
            instruction: ask("Instructions")?,
        },
        4 => Job::Advise {
            kind: AdviceKind::Hashtags,
            platform,
            text,
        },
        _ => Job::Advise {
            kind: AdviceKind::PerformanceTips,
            platform,
            text,
        },
    };

    let result = session.orchestrator().invoke_job(job).await;
    print_result(&result);
    Ok(())
}

fn show_article<T: Transport>(session: &Session<T>) {
    match session.orchestrator().store().article {
        Some(html) => println!("\n{}\n", html),
        None => println!("No article was generated."),
    }
}

fn show_media<T: Transport>(session: &Session<T>) {
    let store = session.orchestrator().store();
    for prompt in &store.image_prompts {
        println!("\n[Image prompt]\n{}", prompt);
    }
    for prompt in &store.video_prompts {
        println!("\n[Video prompt]\n{}", prompt);
    }
    for (i, slide) in store.carousel_slides.iter().enumerate() {
        println!("\n[Slide {}] {}\n{}", i + 1, slide.title, slide.description);
    }
    println!();
}

async fn translate_post<T: Transport>(session: &Session<T>) -> Result<()> {
    let platform = pick_platform()?;
    let store = session.orchestrator().store();
    let Some(text) = store.post(platform).and_then(|p| p.original.clone()) else {
        println!("No {} post to translate.", platform.label());
        return Ok(());
    };

    let job = Job::Translate {
        key: TranslationKey::PostOriginal(platform),
        text,
    };
    let result = session.orchestrator().invoke_job(job).await;
    print_result(&result);
    Ok(())
}

async fn draft_reply<T: Transport>(session: &Session<T>) -> Result<()> {
    let channels = [Channel::WhatsApp, Channel::Gmail];
    let channel = channels[choose("Channel", &["WhatsApp", "Gmail"])?];
    let client_message = ask("Client message")?;

    let result = session
        .orchestrator()
        .invoke_job(Job::DraftReply {
            channel,
            client_message,
        })
        .await;
    print_result(&result);

    let mut draft = match result {
        GenerationResult::Success { text } => text,
        GenerationResult::Failure { .. } => return Ok(()),
    };

    while Confirm::new()
        .with_prompt("Customize this reply?")
        .default(false)
        .interact()
        .context("Failed to get user input")?
    {
        let result = session
            .orchestrator()
            .invoke_job(Job::CustomizeReply {
                channel,
                text: draft.clone(),
                instruction: ask("Instructions")?,
            })
            .await;
        print_result(&result);
        show_error(session);

        if let GenerationResult::Success { text } = result {
            draft = text;
        }
    }
    Ok(())
}
