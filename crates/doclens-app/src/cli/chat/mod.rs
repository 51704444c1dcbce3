//! `doclens chat <id>`: open a chat page and replay its latest reply.
//!
//! The chat page is protected, so it goes through the same session check and
//! route rules as `doclens open`. Once the page renders, the chat history is
//! loaded into a [`ChatView`]; the newest assistant message is revealed
//! character by character (Ctrl+C reveals the rest at once).

pub mod banner;
pub mod renderer;

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use doclens_core::chat::view::ChatView;

use crate::cli::page::{open_page, print_chrome, print_page};
use crate::state::AppState;

/// Page path of a chat.
pub fn chat_path(chat_id: &str) -> String {
    format!("/chat/{chat_id}")
}

pub async fn show_chat(
    state: &AppState,
    chat_id: &str,
    no_stream: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let interactive = !json && !quiet;
    let page = open_page(state.gate.clone(), &chat_path(chat_id), interactive).await?;
    let Some(user) = page.user.as_ref().filter(|_| !page.redirected()) else {
        return print_page(&page, json);
    };

    let mut view = ChatView::new(state.chats.clone(), state.reveal_tick);

    let spinner = interactive.then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Loading chat...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });
    let loaded = view.load(chat_id).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if !loaded {
        // The view stays in its loading state; there is nothing to show.
        if json {
            println!(
                "{}",
                serde_json::json!({"id": chat_id, "loading": true})
            );
        } else if !quiet {
            println!();
            print_chrome(user);
            println!("  {}", style("Chat is still loading. Try again later.").dim());
            println!();
        }
        return Ok(());
    }

    if json || no_stream || quiet {
        view.renderer_mut().skip();
    }

    if json {
        let out = serde_json::json!({
            "id": chat_id,
            "title": view.title(),
            "messages": view.messages(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!();
    print_chrome(user);
    banner::print_chat_banner(
        view.title().unwrap_or_default(),
        chat_id,
        view.messages().len(),
    );

    let streaming = view.streaming_index();
    let mut stdout = std::io::stdout();
    for (index, message) in view.messages().iter().enumerate() {
        if Some(index) == streaming {
            break;
        }
        renderer::write_message(&mut stdout, message)?;
    }

    let skip = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    renderer::stream_reply(&mut view, &mut stdout, skip).await?;

    view.close();
    Ok(())
}
