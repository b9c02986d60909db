//! Postsmith CLI - marketing content generation for academic services
//!
//! Usage:
//!   postsmith init                              Write a default config
//!   postsmith ideas [--instruction <text>]      Generate content ideas
//!   postsmith generate <topic>                  Generate every artifact for a topic
//!   postsmith post <topic> <platform>           Generate one platform post
//!   postsmith refine <op> <platform> <text>     Rephrase, optimize or advise on a post
//!   postsmith reply <channel> <message>         Draft a client reply
//!   postsmith wizard                            Interactive session

mod wizard;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use postsmith_client::{resolve_api_key, Transport};
use postsmith_core::{
    Channel, GenerationResult, Platform, PostsmithConfig, SlideCount, TranslationKey,
};
use postsmith_orchestrator::{AdviceKind, Job, Orchestrator};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "postsmith")]
#[command(author, version, about = "Marketing content generation backed by Gemini")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gemini API key (defaults to the env var named in config)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Directory containing .postsmith/config.toml
    #[arg(long, global = true, default_value = ".")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init,

    /// Generate content ideas
    Ideas {
        /// Extra guidance for the idea generator
        #[arg(short, long)]
        instruction: Option<String>,
    },

    /// Generate posts, article, media prompts and carousel for a topic
    Generate {
        topic: String,

        /// Carousel slide count (2-10)
        #[arg(long)]
        slides: Option<u8>,
    },

    /// Generate a single platform post
    Post { topic: String, platform: Platform },

    /// Generate the blog article body (HTML)
    Article { topic: String },

    /// Generate an image-generation prompt
    ImagePrompt { topic: String },

    /// Generate a video-generation prompt
    VideoPrompt { topic: String },

    /// Generate carousel slides
    Carousel {
        topic: String,

        /// Slide count (2-10)
        #[arg(long)]
        slides: Option<u8>,
    },

    /// Rework or advise on an existing post
    Refine {
        op: RefineOp,
        platform: Platform,
        text: String,
    },

    /// Rewrite a post following custom instructions
    Customize {
        platform: Platform,
        text: String,
        instruction: String,
    },

    /// Translate Arabic content to English
    Translate {
        /// Content key, e.g. post:facebook:original, idea:0, article
        key: TranslationKey,
        text: String,
    },

    /// Draft a reply to a client message
    Reply {
        channel: Channel,

        /// Client message to answer
        #[arg(required_unless_present = "refine")]
        message: Option<String>,

        /// Rewrite an existing draft with these instructions
        #[arg(long, requires = "draft")]
        refine: Option<String>,

        /// Draft to rewrite (used with --refine)
        #[arg(long)]
        draft: Option<String>,
    },

    /// Run the interactive content wizard
    Wizard,
}

/// Post operations exposed by `refine`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RefineOp {
    Rephrase,
    Seo,
    Marketing,
    Hashtags,
    Tips,
}

impl RefineOp {
    fn job(self, platform: Platform, text: String) -> Job {
        match self {
            RefineOp::Rephrase => Job::Rephrase { platform, text },
            RefineOp::Seo => Job::SeoOptimize { platform, text },
            RefineOp::Marketing => Job::Marketize { platform, text },
            RefineOp::Hashtags => Job::Advise {
                kind: AdviceKind::Hashtags,
                platform,
                text,
            },
            RefineOp::Tips => Job::Advise {
                kind: AdviceKind::PerformanceTips,
                platform,
                text,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG overrides --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Init = cli.command {
        return cmd_init(&cli.config);
    }

    let config = PostsmithConfig::load_or_default(&cli.config).context("Failed to load config")?;
    let orchestrator = Orchestrator::from_config(&config);

    if let Commands::Wizard = cli.command {
        let preset = resolve_api_key(cli.api_key.as_deref(), &config.api.api_key_env).ok();
        return wizard::run(orchestrator, preset).await;
    }

    let api_key = resolve_api_key(cli.api_key.as_deref(), &config.api.api_key_env)
        .with_context(|| format!("Pass --api-key or set {}", config.api.api_key_env))?;
    orchestrator.set_credential(api_key);

    match cli.command {
        Commands::Ideas { instruction } => cmd_ideas(&orchestrator, instruction).await,
        Commands::Generate { topic, slides } => cmd_generate(&orchestrator, &topic, slides).await,
        Commands::Post { topic, platform } => {
            cmd_topic_job(&orchestrator, &topic, Job::GeneratePost { platform }).await
        }
        Commands::Article { topic } => {
            cmd_topic_job(&orchestrator, &topic, Job::GenerateArticle).await
        }
        Commands::ImagePrompt { topic } => {
            cmd_topic_job(&orchestrator, &topic, Job::GenerateImagePrompt).await
        }
        Commands::VideoPrompt { topic } => {
            cmd_topic_job(&orchestrator, &topic, Job::GenerateVideoPrompt).await
        }
        Commands::Carousel { topic, slides } => cmd_carousel(&orchestrator, &topic, slides).await,
        Commands::Refine { op, platform, text } => {
            cmd_job(&orchestrator, op.job(platform, text)).await
        }
        Commands::Customize {
            platform,
            text,
            instruction,
        } => {
            let job = Job::Customize {
                platform,
                text,
                instruction,
            };
            cmd_job(&orchestrator, job).await
        }
        Commands::Translate { key, text } => {
            cmd_job(&orchestrator, Job::Translate { key, text }).await
        }
        Commands::Reply {
            channel,
            message,
            refine,
            draft,
        } => cmd_job(&orchestrator, reply_job(channel, message, refine, draft)?).await,
        Commands::Init | Commands::Wizard => Ok(()),
    }
}

fn reply_job(
    channel: Channel,
    message: Option<String>,
    refine: Option<String>,
    draft: Option<String>,
) -> Result<Job> {
    match (refine, draft, message) {
        (Some(instruction), Some(text), _) => Ok(Job::CustomizeReply {
            channel,
            text,
            instruction,
        }),
        (None, _, Some(client_message)) => Ok(Job::DraftReply {
            channel,
            client_message,
        }),
        _ => bail!("Pass a client message, or --refine together with --draft"),
    }
}

fn cmd_init(root: &Path) -> Result<()> {
    info!("Initializing Postsmith in {:?}", root);

    let config_path = root.join(".postsmith/config.toml");
    if config_path.exists() {
        println!("Config already exists at {:?}", config_path);
        return Ok(());
    }

    PostsmithConfig::write_default(root).context("Failed to write default config")?;

    println!("Initialized Postsmith in {:?}", root);
    println!("Created:");
    println!("  .postsmith/config.toml");
    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or pass --api-key)");
    println!("  2. Run 'postsmith ideas' to get topic ideas");
    println!("  3. Run 'postsmith generate <topic>' to produce content");
    Ok(())
}

/// Print a job's text or turn its failure into an error
fn finish_job<T: Transport>(
    orchestrator: &Orchestrator<T>,
    result: GenerationResult,
) -> Result<String> {
    match result {
        GenerationResult::Success { text } => Ok(text),
        GenerationResult::Failure { message, .. } => {
            bail!(orchestrator.last_error().unwrap_or(message))
        }
    }
}

async fn cmd_job<T: Transport>(
    orchestrator: &Orchestrator<T>,
    job: Job,
) -> Result<()> {
    let result = orchestrator.invoke_job(job).await;
    println!("{}", finish_job(orchestrator, result)?);
    Ok(())
}

async fn cmd_topic_job<T: Transport>(
    orchestrator: &Orchestrator<T>,
    topic: &str,
    job: Job,
) -> Result<()> {
    orchestrator.select_topic(topic)?;
    cmd_job(orchestrator, job).await
}

async fn cmd_ideas<T: Transport>(
    orchestrator: &Orchestrator<T>,
    instruction: Option<String>,
) -> Result<()> {
    let result = orchestrator
        .invoke_job(Job::GenerateIdeas { instruction })
        .await;
    finish_job(orchestrator, result)?;

    for (i, idea) in orchestrator.ideas().iter().enumerate() {
        println!("{}. {}", i + 1, idea);
    }
    Ok(())
}

async fn cmd_generate<T: Transport>(
    orchestrator: &Orchestrator<T>,
    topic: &str,
    slides: Option<u8>,
) -> Result<()> {
    if let Some(slides) = slides {
        orchestrator.set_carousel_slides(SlideCount::new(slides)?);
    }

    let report = orchestrator.generate_all(topic).await?;
    for outcome in report.failures() {
        if let GenerationResult::Failure { reason, message } = &outcome.result {
            eprintln!("{} failed ({}): {}", outcome.job, reason, message);
        }
    }

    let output = serde_json::json!({
        "topic": report.topic,
        "started_at": report.started_at,
        "finished_at": report.finished_at,
        "succeeded": report.succeeded(),
        "failed": report.failed(),
        "content": orchestrator.store(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn cmd_carousel<T: Transport>(
    orchestrator: &Orchestrator<T>,
    topic: &str,
    slides: Option<u8>,
) -> Result<()> {
    let slides = match slides {
        Some(count) => SlideCount::new(count)?,
        None => orchestrator.snapshot().carousel_slides,
    };

    orchestrator.select_topic(topic)?;
    let result = orchestrator
        .invoke_job(Job::GenerateCarousel { slides })
        .await;
    finish_job(orchestrator, result)?;

    for (i, slide) in orchestrator.store().carousel_slides.iter().enumerate() {
        println!("Slide {}: {}", i + 1, slide.title);
        println!("{}\n", slide.description);
    }
    Ok(())
}
