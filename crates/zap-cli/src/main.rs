use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use tracing::info;

use zap_api::{ApiClient, api_url_from_env};
use zap_core::Message;
use zap_sync::{SyncConfig, SyncController, SyncEvent};

fn print_banner() {
    let banner = r#"
  _______ _ _ __
 |_  / _` | '_ \
  / / (_| | |_) |
 /___\__,_| .__/
          |_|
    WhatsApp CRM Terminal
"#;
    println!("{}", banner.bright_green());
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .from_env_lossy()
                .add_directive("zap_cli=info".parse().unwrap())
                .add_directive("zap_sync=info".parse().unwrap())
                .add_directive("zap_api=info".parse().unwrap()),
        )
        .init();

    let api_url = api_url_from_env();
    println!("🔗 Backend: {}", api_url);

    let client = ApiClient::new(&api_url);
    probe_backend(&client).await;

    let mut controller = SyncController::new(
        Arc::new(client.clone()),
        &api_url,
        SyncConfig::default(),
    );

    let mut event_rx = controller
        .take_event_receiver()
        .ok_or_else(|| color_eyre::eyre::eyre!("Failed to get event receiver"))?;

    controller.start();
    info!("contact sync started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            handle_event(event);
        }
    });

    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;

    loop {
        print_menu();
        let choice = read_line("Choice: ")?;

        match choice.trim() {
            "1" => list_contacts(&controller).await,
            "2" => open_conversation(&mut controller).await?,
            "3" => list_all_messages(&client).await,
            "4" => health_check(&client).await,
            "0" => {
                println!("👋 Shutting down...");
                controller.stop();
                break;
            }
            _ => println!("❌ Invalid choice"),
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("╔════════════════════════════════════╗");
    println!("║        ZAP CLI - WhatsApp CRM      ║");
    println!("╠════════════════════════════════════╣");
    println!("║  1. List Contacts                  ║");
    println!("║  2. Open Conversation              ║");
    println!("║  3. List All Messages              ║");
    println!("║  4. Health Check                   ║");
    println!("║  0. Exit                           ║");
    println!("╚════════════════════════════════════╝");
}

fn handle_event(event: SyncEvent) {
    match event {
        SyncEvent::ConnectionFailed { api_url, error } => {
            println!();
            println!(
                "{}",
                format!("❌ Failed to connect to backend at {}", api_url).bright_red()
            );
            println!("{}", "   Make sure the backend server is running.".bright_red());
            println!("{}", format!("   Error: {}", error).bright_red());
        }
        SyncEvent::SendFailed { error } => {
            println!("\n❌ Failed to send message: {}", error);
        }
        // Terminal rendering is on demand; silent refreshes stay silent.
        SyncEvent::ContactsUpdated { .. }
        | SyncEvent::MessagesUpdated { .. }
        | SyncEvent::ScrollToLatest => {}
    }
}

async fn probe_backend(client: &ApiClient) {
    match client.health().await {
        Ok(health) => {
            println!(
                "✅ Backend healthy: {} (database: {})",
                health.status,
                health.database.as_deref().unwrap_or("?")
            );
        }
        Err(e) => {
            println!("⚠️  Backend health probe failed: {}", e);
        }
    }
}

async fn list_contacts(controller: &SyncController) {
    let state = controller.state();
    let state = state.read().await;

    if state.is_loading {
        println!("⏳ Still loading contacts...");
    } else if state.contacts.is_empty() {
        println!("📭 No contacts found");
    } else {
        println!("\n📇 Contacts ({}):", state.contacts.len());
        for contact in state.contacts.iter().take(20) {
            println!("  📱 {} - {}", contact.phone, contact.display_name());
        }
        if state.contacts.len() > 20 {
            println!("  ... and {} more", state.contacts.len() - 20);
        }
    }
}

async fn open_conversation(controller: &mut SyncController) -> Result<()> {
    let phone = read_line("Phone (e.g. +5511999990000): ")?;
    if phone.is_empty() {
        println!("❌ No phone given");
        return Ok(());
    }

    let contact = {
        let state = controller.state();
        let state = state.read().await;
        state.contacts.iter().find(|c| c.phone == phone).cloned()
    };
    let Some(contact) = contact else {
        println!("❌ No contact with phone {}", phone);
        return Ok(());
    };

    println!("💬 Conversation with {}", contact.display_name());
    controller.select_conversation(Some(contact)).await;
    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;

    loop {
        print_conversation(controller).await;
        let input = read_line("Message (empty to go back): ")?;
        if input.is_empty() {
            break;
        }
        controller.set_draft(input).await;
        controller.send_draft().await?;
        // Give the next poll a moment to fold in the gateway's copy.
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    }

    controller.select_conversation(None).await;
    Ok(())
}

async fn print_conversation(controller: &SyncController) {
    let state = controller.state();
    let state = state.read().await;

    if state.messages.is_empty() {
        println!("📭 No messages yet");
        return;
    }
    println!();
    for msg in &state.messages {
        print_message(msg);
    }
}

async fn list_all_messages(client: &ApiClient) {
    match client.messages().await {
        Ok(messages) if messages.is_empty() => println!("📭 No messages found"),
        Ok(messages) => {
            println!("\n💬 Messages ({}):", messages.len());
            for msg in messages.iter().take(20) {
                print_message(msg);
            }
            if messages.len() > 20 {
                println!("  ... and {} more", messages.len() - 20);
            }
        }
        Err(e) => println!("❌ Failed to fetch messages: {}", e),
    }
}

fn print_message(msg: &Message) {
    let direction = if msg.from_me { "→" } else { "←" };
    println!(
        "  {} [{}] {}: {}",
        direction,
        msg.timestamp.format("%H:%M"),
        msg.contact_phone,
        msg.body
    );
}

async fn health_check(client: &ApiClient) {
    probe_backend(client).await;
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
