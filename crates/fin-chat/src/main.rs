//! The terminal client of the financial advisor.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::{self, Write};
use std::time::Duration;

use chrono::Utc;
use fin_chat::core::{ConversationState, Message, Role, SubmitError};
use fin_chat::render::{
    EXAMPLE_QUESTIONS, SidebarEntry, relative_time, sidebar_entries,
    validate_input,
};
use fin_chat::{Session, SessionBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let rust_log = env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let (idle_tx, idle_rx) = mpsc::unbounded_channel();
    let session = SessionBuilder::from_env()
        .on_idle(move || {
            idle_tx.send(()).ok();
        })
        .build();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    if let Err(err) = run(&session, idle_rx, stdin, &mut stdout).await {
        error!("error writing output: {err}");
    }
}

/// Logs stay silent unless `RUST_LOG` asks for them.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

/// Runs the chat loop until `input` reaches EOF.
///
/// `idle_rx` must receive one item each time the session becomes idle.
async fn run<R, W>(
    session: &Session,
    mut idle_rx: mpsc::UnboundedReceiver<()>,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    print_welcome(out)?;

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut lines = input.lines();
    'outer: loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("error reading input: {}", err);
                break;
            }
        };
        let Some(text) = validate_input(&line) else {
            continue;
        };
        match text {
            "/history" => {
                print_history(out, &session.state())?;
                continue;
            }
            "/links" => {
                print_sidebar(out, session.state().sidebar_text())?;
                continue;
            }
            _ => {}
        }

        match session.send_message(text) {
            Ok(()) => {}
            Err(SubmitError::Busy) => {
                let notice = "Still thinking about your last question.";
                writeln!(out, "{}", notice.dimmed())?;
                continue;
            }
            Err(SubmitError::EmptyInput) => continue,
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("💭 Thinking...");

        loop {
            progress_bar.inc(1);

            let sleep = sleep(Duration::from_millis(100));
            select! {
                idle = idle_rx.recv() => {
                    if idle.is_none() {
                        progress_bar.finish_and_clear();
                        break 'outer;
                    }
                    break;
                },
                _ = sleep => {
                    continue;
                }
            }
        }

        // Finish the progress bar before printing anything else.
        progress_bar.finish_and_clear();

        let state = session.state();
        if let Some(reply) = state.log().last() {
            print_message(out, reply)?;
        }
        print_sidebar(out, state.sidebar_text())?;
    }
    Ok(())
}

fn print_welcome(out: &mut impl Write) -> io::Result<()> {
    let title = "Welcome to your Financial Advisor";
    writeln!(out, "{}", title.bright_white().bold())?;
    let intro = "Ask anything about budgeting, investments, savings or debt.";
    writeln!(out, "{}", intro.dimmed())?;
    for question in EXAMPLE_QUESTIONS {
        writeln!(out, "  {} {}", "•".bright_magenta(), question)?;
    }
    let help = "Type /history to review the conversation, /links for the \
                latest links.";
    writeln!(out, "{}", help.dimmed())?;
    writeln!(out)
}

fn print_message(out: &mut impl Write, msg: &Message) -> io::Result<()> {
    let when = relative_time(msg.created_at(), Utc::now());
    match msg.role() {
        Role::User => writeln!(
            out,
            "{}🙂 {} {}",
            BAR_CHAR.bright_green(),
            msg.content(),
            when.dimmed()
        ),
        Role::Advisor => writeln!(
            out,
            "{}📈 {} {}",
            BAR_CHAR.bright_cyan(),
            msg.content().bright_white(),
            when.dimmed()
        ),
    }
}

fn print_history(
    out: &mut impl Write,
    state: &ConversationState,
) -> io::Result<()> {
    if state.is_empty() {
        return writeln!(out, "{}", "Nothing here yet.".dimmed());
    }
    for msg in state.log() {
        print_message(out, msg)?;
    }
    Ok(())
}

fn print_sidebar(out: &mut impl Write, sidebar_text: &str) -> io::Result<()> {
    let entries = sidebar_entries(sidebar_text);
    if entries.is_empty() {
        return Ok(());
    }

    let bar = BAR_CHAR.bright_yellow();
    writeln!(out, "{bar}🔗 {}", "Related links".bold())?;
    for entry in entries {
        match entry {
            SidebarEntry::Link(link) if link.title == link.url => {
                writeln!(out, "{bar}   {}", link.url.underline())?;
            }
            SidebarEntry::Link(link) => {
                writeln!(
                    out,
                    "{bar}   {} {}",
                    link.title,
                    link.url.underline().dimmed()
                )?;
            }
            SidebarEntry::Text(text) => {
                writeln!(out, "{bar}   {text}")?;
            }
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use fin_chat_test_provider::{PresetOutcome, TestQueryProvider};
    use tokio::time::timeout;

    use super::*;

    async fn run_script(provider: TestQueryProvider, script: &str) -> String {
        let (idle_tx, idle_rx) = mpsc::unbounded_channel();
        let session = SessionBuilder::with_query_provider(provider)
            .on_idle(move || {
                idle_tx.send(()).ok();
            })
            .build();

        let mut out = Vec::new();
        timeout(
            Duration::from_secs(2),
            run(&session, idle_rx, script.as_bytes(), &mut out),
        )
        .await
        .unwrap()
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_reads_every_piped_line() {
        let output = run_script(
            TestQueryProvider::default(),
            "/history\n/history\n/history\n",
        )
        .await;
        assert_eq!(output.matches("Nothing here yet.").count(), 3);
    }

    #[tokio::test]
    async fn test_answers_consecutive_queries() {
        let mut provider = TestQueryProvider::default();
        provider.add_outcome(PresetOutcome::text("Track spending.", None));
        provider.add_outcome(PresetOutcome::text(
            "Start with an index fund.",
            Some("- [Index funds](https://example.com/funds)"),
        ));
        let observer = provider.clone();

        let output = run_script(
            provider,
            "How do I budget?\n   \nWhat should I invest in?\n/history\n",
        )
        .await;

        assert_eq!(
            observer.received_queries(),
            ["How do I budget?", "What should I invest in?"]
        );
        assert!(output.contains("Track spending."));
        assert!(output.contains("Start with an index fund."));
        assert!(output.contains("https://example.com/funds"));
        // Once as the live answer, once more from /history.
        assert_eq!(output.matches("Track spending.").count(), 2);
    }

    #[test]
    fn test_logs_are_silent_by_default() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::OFF));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
