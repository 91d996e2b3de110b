//! briefcraft CLI — run the content-brief pipeline from the command line.
//!
//! Example: briefcraft -p "Launch our new analytics app on Instagram"

use clap::{Parser, ValueEnum};

use briefcraft_core::{
    Backend, BriefState, CompletionConfig, HttpCompletionClient, Language, LanguageConfig,
    Pipeline, PipelineConfig,
};

/// briefcraft — marketing content-brief generator
#[derive(Parser)]
#[command(name = "briefcraft", version, about = "Generate a structured marketing content brief from one prompt")]
struct Cli {
    /// The marketing prompt to build a brief for
    #[arg(short = 'p', long = "prompt")]
    prompt: String,

    /// Force the pipeline language instead of auto-detecting it
    #[arg(long, value_enum)]
    language: Option<LanguageArg>,

    /// Stop at the first failed step instead of running to completion
    #[arg(long)]
    halt_on_error: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Completion backend protocol (default: BRIEFCRAFT_BACKEND, then anthropic)
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Completion API base URL (default: BRIEFCRAFT_BASE_URL, then the backend's public endpoint)
    #[arg(long)]
    base_url: Option<String>,

    /// Model to use (default: BRIEFCRAFT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// API key (default: BRIEFCRAFT_API_KEY, ANTHROPIC_API_KEY, or OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    En,
    Es,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Anthropic,
    Openai,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "briefcraft_core=info,briefcraft_cli=info".into()),
        )
        .init();

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let language = cli.language.map(|l| {
        LanguageConfig::new(match l {
            LanguageArg::En => Language::En,
            LanguageArg::Es => Language::Es,
        })
    });

    let pipeline = Pipeline::new(PipelineConfig {
        halt_on_error: cli.halt_on_error,
    });
    let state = pipeline.run(&cli.prompt, language, &client).await;

    match cli.format {
        OutputFormat::Text => render_text(&state),
        OutputFormat::Json => render_json(&state),
    }

    if state.is_error || state.final_brief.is_none() {
        std::process::exit(1);
    }
}

fn build_client(cli: &Cli) -> Result<HttpCompletionClient, Box<dyn std::error::Error>> {
    let backend = cli.backend.map(|b| match b {
        BackendArg::Anthropic => Backend::Anthropic,
        BackendArg::Openai => Backend::OpenAi,
    });

    let config = CompletionConfig::resolve(
        backend,
        cli.base_url.clone(),
        cli.model.clone(),
        cli.api_key.clone(),
    )?;
    Ok(HttpCompletionClient::new(config))
}

fn render_text(state: &BriefState) {
    println!("Run {} — {}", state.run_id, state.current_step);
    println!(
        "Language: {}  Steps completed: {}/12",
        state.language().code(),
        state.completed_steps.len()
    );
    if let Some(seconds) = state.processing_time_seconds() {
        println!("Processing time: {:.2}s", seconds);
    }

    if !state.agent_timings.is_empty() {
        println!("\nTimings:");
        let mut timings: Vec<_> = state.agent_timings.iter().collect();
        timings.sort_by(|a, b| a.0.cmp(b.0));
        for (step, seconds) in timings {
            println!("  {:<28} {:>8.2}s", step, seconds);
        }
    }

    if !state.errors.is_empty() {
        println!("\nErrors:");
        for error in &state.errors {
            println!("  {}", error);
        }
    }

    match &state.final_brief {
        Some(brief) => {
            println!("\nPost type: {}", brief.post_type);
            println!("\n{}", brief.core_content);
            println!("\nCaption: {}", brief.engagement_elements.caption);
            println!("CTA: {}", brief.engagement_elements.call_to_action);
            println!("Hashtags: {}", brief.engagement_elements.hashtags.join(" "));
        }
        None => println!("\nNo brief produced."),
    }
}

fn render_json(state: &BriefState) {
    match serde_json::to_string_pretty(state) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing state: {}", e),
    }
}
