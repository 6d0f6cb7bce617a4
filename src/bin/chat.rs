//! Chat Binary - terminal client for the generation API

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use vidgen::adapters::client::HttpGenerationApi;
use vidgen::adapters::terminal::{render_history, render_session, TerminalCommand, HELP};
use vidgen::{ClientConfig, ClientController, GenerationOutcome};

#[tokio::main]
async fn main() {
    let config = ClientConfig::from_env();

    vidgen::logging::init();

    let api = HttpGenerationApi::new(&config.api_base_url);
    let controller = ClientController::new(api, config.poll);
    info!(api = %config.api_base_url, "Chat client ready");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        };

        match TerminalCommand::parse(&line) {
            TerminalCommand::Generate => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    match controller.submit_generation().await {
                        Ok(GenerationOutcome::Completed(url)) => println!("video ready: {}", url),
                        Ok(GenerationOutcome::GaveUp) => {
                            println!("video not ready yet, try /status later")
                        }
                        Ok(GenerationOutcome::Superseded) => {}
                        Err(e) => println!("generation failed: {}", e),
                    }
                });
                println!("generating...");
            }
            TerminalCommand::Prompt(prompt) => controller.set_prompt(&prompt).await,
            TerminalCommand::Duration(duration) => controller.set_duration(duration).await,
            TerminalCommand::Aspect(aspect) => controller.set_aspect(aspect).await,
            TerminalCommand::Status => {
                print!("{}", render_session(&controller.snapshot().await))
            }
            TerminalCommand::History => {
                print!("{}", render_history(&controller.snapshot().await.messages))
            }
            TerminalCommand::Help => println!("{}", HELP),
            TerminalCommand::Quit => break,
            TerminalCommand::Chat(text) => match controller.submit_chat(&text).await {
                Ok(Some(reply)) => println!("bot> {}", reply.reply),
                Ok(None) => {}
                Err(e) => println!("chat failed: {}", e),
            },
            TerminalCommand::Invalid(message) => println!("{}", message),
        }
    }
}
