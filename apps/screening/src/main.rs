use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screening::client::AnalysisClient;
use screening::config::Config;
use screening::models::{CandidateCv, QuestionnaireAnswers};
use screening::pipeline::{BatchOutcome, ScreeningPipeline};
use screening::scoring::split_ranking;
use screening::store::file::JsonFileStore;
use screening::store::{keys, render_entries, StateStore};

#[derive(Parser)]
#[command(name = "screening", version, about = "AI recruitment screening assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the job description the candidates are screened against.
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
    /// Add candidate CVs (plain text files; extract PDF text upstream).
    CvAdd {
        /// One or more CV text files.
        files: Vec<PathBuf>,
    },
    /// Analyze every stored CV against the stored job description and print
    /// the ranking.
    Analyze,
    /// Generate interview questions for an analyzed candidate.
    Interview {
        /// File name of the candidate, as shown in the ranking.
        #[arg(long)]
        candidate: String,
        /// Send the anonymized CV instead of the original.
        #[arg(long)]
        censored: bool,
        #[arg(long, default_value_t = 5)]
        questions: u32,
    },
    /// Print the whole session state in readable form.
    Export,
    /// Wipe the session state and start over.
    Reset,
}

#[derive(Subcommand)]
enum JobCommand {
    /// Store free job description text from a file.
    Set { file: PathBuf },
    /// Generate a job description from questionnaire answers (JSON file with
    /// companyName, sector, role, responsibilities, qualifications).
    Generate { answers: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::open(&config.state_path)?);
    let client = Arc::new(AnalysisClient::new(config.api_base_url.clone()));
    let pipeline = ScreeningPipeline::new(client, store.clone());

    match cli.command {
        Command::Job { command } => match command {
            JobCommand::Set { file } => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                store.set(keys::JOB_DESCRIPTION_TEXT, json!(text))?;
                println!("Job description stored ({} characters).", text.len());
            }
            JobCommand::Generate { answers } => {
                let text = std::fs::read_to_string(&answers)
                    .with_context(|| format!("failed to read {}", answers.display()))?;
                let answers: QuestionnaireAnswers =
                    serde_json::from_str(&text).context("malformed questionnaire answers")?;
                let description = pipeline.generate_job_description(&answers).await?;
                println!("{}", serde_json::to_string_pretty(&description)?);
            }
        },
        Command::CvAdd { files } => {
            let mut cvs: Vec<CandidateCv> = store
                .get(keys::CANDIDATE_CVS)
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();
            for file in files {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                info!(file = %file_name, "CV added");
                cvs.push(CandidateCv { file_name, text });
            }
            store.set(keys::CANDIDATE_CVS, serde_json::to_value(&cvs)?)?;
            println!("{} CV(s) stored.", cvs.len());
        }
        Command::Analyze => {
            let outcome = pipeline.analyze_all().await?;
            print_ranking(&outcome);
            if let Some(failure) = outcome.failure {
                anyhow::bail!(
                    "batch stopped at {}: {} (results above are partial and were not saved)",
                    failure.file_name,
                    failure.error
                );
            }
        }
        Command::Interview {
            candidate,
            censored,
            questions,
        } => {
            let interview = pipeline
                .generate_interview(&candidate, censored, questions)
                .await?;
            println!(
                "Interview for {} ({} CV):",
                interview.candidate_file_name,
                if interview.used_censored_cv { "censored" } else { "uncensored" }
            );
            for (i, question) in interview.questions.iter().enumerate() {
                println!("{:2}. {question}", i + 1);
            }
        }
        Command::Export => print!("{}", render_entries(store.as_ref())),
        Command::Reset => {
            pipeline.reset()?;
            println!("Session state cleared.");
        }
    }

    Ok(())
}

fn print_ranking(outcome: &BatchOutcome) {
    if let Some(title) = outcome.job_analysis["jobTitle"].as_str() {
        println!("Job: {title}");
    }
    if let Some(overview) = outcome.job_analysis["overview"].as_str() {
        println!("Overview: {overview}\n");
    }

    let (top, rest) = split_ranking(outcome.records.clone());
    if !top.is_empty() {
        println!("Top candidates:");
        for (i, record) in top.iter().enumerate() {
            println!("  #{} {} — {}/10", i + 1, record.file_name, record.total_score);
        }
    }
    if !rest.is_empty() {
        println!("Other candidates:");
        for record in &rest {
            println!("     {} — {}/10", record.file_name, record.total_score);
        }
    }
}
