//! Terminal frontend for voice mock-interview practice
//!
//! Wires the real microphone, speaker and coaching backend into the
//! session engine and drives it from stdin: Enter arms the recorder,
//! Enter again finishes the answer, `end` closes the session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use interview_voice_audio::{CadenceSpeech, CaptureConfig, CpalCapture, RodioPlayer};
use interview_voice_client::{ClientConfig, CoachClient};
use interview_voice_config::{Settings, load_settings};
use interview_voice_core::{SessionPhase, SpeechOutput, SpeechSynthesizer};
use interview_voice_session::{InterviewSession, SessionEvent, SessionOptions};

#[derive(Parser)]
#[command(name = "interview-voice")]
#[command(about = "Voice mock-interview practice from the terminal", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the coaching backend base URL
    #[arg(long)]
    server: Option<String>,

    /// Pick a job application by list position (1-based) instead of prompting
    #[arg(long)]
    job: Option<usize>,

    /// List job applications and exit
    #[arg(long)]
    list_jobs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref()).context("loading configuration")?;
    if let Some(server) = cli.server {
        settings.api.base_url = server;
    }

    let client = Arc::new(build_client(&settings)?);

    let applications = client
        .job_applications()
        .await
        .context("fetching job applications")?;
    if applications.is_empty() {
        bail!("no job applications available on {}", settings.api.base_url);
    }

    if cli.list_jobs {
        for (i, app) in applications.iter().enumerate() {
            println!("{:>3}. {} at {}", i + 1, app.job_title, app.company);
        }
        return Ok(());
    }

    let index = match cli.job {
        Some(n) if n >= 1 && n <= applications.len() => n - 1,
        Some(n) => bail!("--job {n} is out of range (1..={})", applications.len()),
        None => prompt_for_job(&applications).await?,
    };
    let job = applications[index].context();

    let capture = Box::new(CpalCapture::new(CaptureConfig {
        sample_rate: settings.audio.sample_rate,
        channels: settings.audio.channels,
    }));
    let output: Arc<dyn SpeechOutput> = Arc::new(RodioPlayer::new());

    let mut session = InterviewSession::new(
        capture,
        client.clone(),
        client.clone(),
        client.clone(),
        output,
        SessionOptions {
            voice: settings.voice.voice.clone(),
            fallback_transcript: settings.session.fallback_transcript.clone(),
        },
    );
    if settings.voice.fallback_enabled {
        let fallback: Arc<dyn SpeechSynthesizer> = Arc::new(CadenceSpeech::new());
        session = session.with_fallback_speech(fallback);
    }

    spawn_event_printer(session.subscribe());

    session.select_job(job.clone())?;
    println!("Starting a mock interview for {job}. One moment...");
    session.start().await.context("starting the interview")?;

    println!("Press Enter to record an answer, Enter again to finish it, or type 'end' to stop.");
    run_input_loop(&mut session).await?;

    if let Some(feedback) = session.feedback() {
        println!("\n--- Feedback ---\n{feedback}");
    }
    Ok(())
}

fn build_client(settings: &Settings) -> Result<CoachClient> {
    Ok(CoachClient::new(ClientConfig {
        base_url: settings.api.base_url.clone(),
        timeout: Duration::from_secs(settings.api.timeout_seconds),
        max_retries: settings.api.max_retries,
        initial_backoff: Duration::from_millis(settings.api.initial_backoff_ms),
    })?)
}

async fn prompt_for_job(
    applications: &[interview_voice_client::JobApplication],
) -> Result<usize> {
    for (i, app) in applications.iter().enumerate() {
        println!("{:>3}. {} at {}", i + 1, app.job_title, app.company);
    }
    println!("Which position would you like to practice for?");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= applications.len() => return Ok(n - 1),
            _ => println!("Enter a number between 1 and {}.", applications.len()),
        }
    }
    bail!("no selection made")
}

async fn run_input_loop(session: &mut InterviewSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut recording = false;

    while session.phase().is_active() {
        let Some(line) = lines.next_line().await? else {
            session.end();
            break;
        };

        match line.trim() {
            "end" | "quit" => {
                session.end();
                break;
            }
            "" if !recording => match session.press_to_answer() {
                Ok(()) => {
                    recording = true;
                    println!("Recording... press Enter when you're done.");
                }
                Err(e) => tracing::debug!("not ready to record: {e}"),
            },
            "" => {
                recording = false;
                if let Err(e) = session.complete_answer().await {
                    tracing::warn!("turn failed: {e}");
                }
            }
            other => println!("Unrecognized input '{other}' (Enter to record, 'end' to stop)."),
        }
    }
    Ok(())
}

fn spawn_event_printer(mut rx: tokio::sync::broadcast::Receiver<SessionEvent>) {
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                SessionEvent::PhaseChanged { to, .. } => match to {
                    SessionPhase::Thinking => println!("(thinking...)"),
                    SessionPhase::Listening => println!("(your turn)"),
                    _ => {}
                },
                SessionEvent::InterviewerLine(line) => println!("Interviewer: {line}"),
                SessionEvent::AnswerTranscribed(text) => println!("You: {text}"),
                SessionEvent::FeedbackReady(_) => {}
                SessionEvent::Warning(message) => println!("(problem: {message}, try again)"),
                SessionEvent::Ended(reason) => {
                    tracing::debug!("session ended: {reason:?}");
                    break;
                }
            }
        }
    });
}
