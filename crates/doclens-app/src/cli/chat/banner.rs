//! Chat header display.

use console::style;

/// Print the chat header: title and message count.
pub fn print_chat_banner(title: &str, chat_id: &str, message_count: usize) {
    println!(
        "  {} {}",
        style("#").dim(),
        style(title).cyan().bold()
    );
    println!(
        "  {}  {}",
        style("Chat:").bold(),
        style(chat_id).dim()
    );
    println!(
        "  {}  {}",
        style("Messages:").bold(),
        style(message_count).dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
