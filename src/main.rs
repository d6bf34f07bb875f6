//! Terminal host for the chat widget
//!
//! Each stdin line is typed into the widget and submitted with Enter.
//! `:click opt-<turn>-<n>` activates an option button. Rendered turns are
//! printed to stdout; logs go to stderr.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wpchatbot::backend::{HttpChatBackend, LoggingBackend};
use wpchatbot::config::WidgetConfig;
use wpchatbot::runtime::{spawn_widget, Command, Key, WidgetHandle, WidgetNotice};
use wpchatbot::state_machine::WidgetContext;
use wpchatbot::transcript::{BoundControl, ControlId};

const TRANSCRIPT_OUT_VAR: &str = "WPCHATBOT_TRANSCRIPT_OUT";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wpchatbot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = WidgetConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint,
        user_id = config.user_id,
        timeout_secs = ?config.request_timeout.map(|t| t.as_secs()),
        "Widget configured"
    );

    let http = HttpChatBackend::new(config.endpoint.clone(), config.request_timeout)?;
    let backend = LoggingBackend::new(Arc::new(http));
    let mut handle = spawn_widget(
        WidgetContext::new(config.user_id),
        backend,
        config.initial_message.clone(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0;
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim() == ":quit" => break,
                Some(line) => {
                    if !forward_line(&handle, &line).await {
                        break;
                    }
                }
                None => break,
            },
            notice = handle.notices.recv() => match notice {
                Ok(notice) => print_notice(&notice, &mut printed),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notice stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    // Turns that resolved after input ended
    let transcript = handle.finish().await?;
    for turn in transcript.turns().iter().skip(printed) {
        print_turn(&turn.to_html(), &turn.controls);
    }

    if let Ok(path) = std::env::var(TRANSCRIPT_OUT_VAR) {
        transcript.write_html(&path)?;
        tracing::info!(path = %path, turns = transcript.len(), "Transcript written");
    }

    Ok(())
}

/// Returns false once the widget stopped accepting commands
async fn forward_line(handle: &WidgetHandle, line: &str) -> bool {
    if let Some(target) = line.trim().strip_prefix(":click ") {
        return match target.trim().parse::<ControlId>() {
            Ok(id) => handle.send(Command::ActivateOption(id)).await,
            Err(e) => {
                println!("! {e}");
                true
            }
        };
    }

    handle.send(Command::SetInput(line.to_string())).await
        && handle
            .send(Command::KeyDown {
                key: Key::Enter,
                shift: false,
            })
            .await
}

fn print_notice(notice: &WidgetNotice, printed: &mut usize) {
    match notice {
        WidgetNotice::TurnAppended {
            index,
            html,
            controls,
        } => {
            print_turn(html, controls);
            *printed = index + 1;
        }
        WidgetNotice::Rejected { reason } => println!("! {reason}"),
        WidgetNotice::ConversationEnded => println!("-- conversation ended --"),
        WidgetNotice::InputChanged { .. } | WidgetNotice::RequestSent { .. } => {}
    }
}

fn print_turn(html: &str, controls: &[BoundControl]) {
    println!("{html}");
    for control in controls {
        println!("  [{}] {}", control.id, control.label);
    }
}
