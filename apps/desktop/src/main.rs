use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings, session::open_history_store_or_warn, AskClient, ClientSettings,
    FormSession, QuestionForm,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

use render::{format_catalog, format_history, format_response, format_selection};

#[derive(Parser, Debug)]
#[command(name = "curionest", about = "Ask scoped syllabus questions")]
struct Cli {
    /// Base url of the answering service (overrides settings and env).
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Directory holding the persisted history record.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Do not read or write persisted history.
    #[arg(long, global = true)]
    no_history: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List subjects and their chapters.
    Catalog,
    /// Ask a single question.
    Ask {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        chapter: Option<String>,
        question: String,
    },
    /// Read questions from stdin until `:quit`.
    Interactive,
    /// Show recent questions.
    History,
    /// Forget recent questions.
    ClearHistory,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    tracing::debug!(
        api_base_url = %settings.api_base_url,
        persist_history = settings.persist_history,
        "resolved settings"
    );

    let client = AskClient::from_settings(&settings);
    let store = open_history_store_or_warn(&settings);
    let mut session = FormSession::from_settings(&settings, client, store);

    match cli.command {
        Command::Catalog => println!("{}", format_catalog(session.form().catalog())),
        Command::Ask {
            subject,
            chapter,
            question,
        } => {
            apply_selection(&mut session, subject.as_deref(), chapter.as_deref())?;
            session.edit_question(question);
            session.submit_with(draw_thinking).await;
            println!("{}", format_response(session.form().response()));
        }
        Command::Interactive => run_interactive(&mut session).await?,
        Command::History => println!("{}", format_history(session.form().history())),
        Command::ClearHistory => {
            session.clear_history();
            println!("{}", format_response(session.form().response()));
        }
    }

    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = load_settings();
    if let Some(url) = &cli.api_url {
        settings
            .set_api_base_url(url)
            .context("invalid --api-url")?;
    }
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = Some(dir.clone());
    }
    if cli.no_history {
        settings.persist_history = false;
    }
    Ok(settings)
}

fn apply_selection(
    session: &mut FormSession<AskClient>,
    subject: Option<&str>,
    chapter: Option<&str>,
) -> Result<()> {
    if let Some(subject) = subject {
        session.select_subject(subject)?;
    }
    if let Some(chapter) = chapter {
        session.select_chapter(chapter)?;
    }
    Ok(())
}

/// Redraws the thinking line in place on stderr; clears it once idle.
fn draw_thinking(form: &QuestionForm) {
    let mut stderr = std::io::stderr();
    let _ = if form.is_busy() {
        write!(stderr, "\r\x1b[2K{}", form.response().text)
    } else {
        write!(stderr, "\r\x1b[2K")
    };
    let _ = stderr.flush();
}

const INTERACTIVE_HELP: &str = "\
Type a question and press enter to ask it.
  :subject <name>   select a subject (chapter resets to its first)
  :chapter <name>   select a chapter of the current subject
  :catalog          list subjects and chapters
  :history          show recent questions
  :recall <n>       load question n from history into the draft
  :ask              ask the current draft again
  :clear            clear history
  :quit             exit";

async fn run_interactive(session: &mut FormSession<AskClient>) -> Result<()> {
    println!("{INTERACTIVE_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("[{}]> ", format_selection(session.form()));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            ":quit" | ":q" => break,
            ":help" => println!("{INTERACTIVE_HELP}"),
            ":catalog" => println!("{}", format_catalog(session.form().catalog())),
            ":history" => println!("{}", format_history(session.form().history())),
            ":subject" => report(session.select_subject(arg)),
            ":chapter" => report(session.select_chapter(arg)),
            ":recall" => match arg.parse::<usize>() {
                Ok(n) if n > 0 && session.recall(n - 1) => {
                    println!("draft: {}", session.form().question());
                }
                _ => println!("no history entry {arg:?}"),
            },
            ":clear" => {
                session.clear_history();
                println!("{}", format_response(session.form().response()));
            }
            ":ask" => {
                session.submit_with(draw_thinking).await;
                println!("{}", format_response(session.form().response()));
            }
            _ => {
                session.edit_question(line);
                session.submit_with(draw_thinking).await;
                println!("{}", format_response(session.form().response()));
            }
        }
    }

    Ok(())
}

fn report(result: Result<bool, client_core::FormError>) {
    if let Err(err) = result {
        println!("{err}");
    }
}
