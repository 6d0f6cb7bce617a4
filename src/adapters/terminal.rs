//! Line-oriented terminal front end for the chat binary.

use crate::application::controller::Session;
use crate::domain::chat::{ChatLog, ChatRole};
use crate::domain::video::{AspectRatio, ClipDuration};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Generate,
    Prompt(String),
    Duration(ClipDuration),
    Aspect(AspectRatio),
    Status,
    History,
    Help,
    Quit,
    /// Anything that is not a slash command goes to the command parser.
    Chat(String),
    Invalid(String),
}

impl TerminalCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return TerminalCommand::Chat(line.to_string());
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "generate" => TerminalCommand::Generate,
            "prompt" => TerminalCommand::Prompt(arg.to_string()),
            "duration" => match arg.parse::<u32>().map(ClipDuration::try_from) {
                Ok(Ok(duration)) => TerminalCommand::Duration(duration),
                _ => TerminalCommand::Invalid(format!(
                    "duration must be one of {}",
                    ClipDuration::all()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            },
            "aspect" => match arg.parse::<AspectRatio>() {
                Ok(aspect) => TerminalCommand::Aspect(aspect),
                Err(e) => TerminalCommand::Invalid(e.to_string()),
            },
            "status" => TerminalCommand::Status,
            "history" => TerminalCommand::History,
            "help" => TerminalCommand::Help,
            "quit" | "exit" => TerminalCommand::Quit,
            other => TerminalCommand::Invalid(format!("unknown command /{}", other)),
        }
    }
}

pub const HELP: &str = "\
/generate            start a generation with the current form
/prompt <text>       set the prompt
/duration <seconds>  set the duration (88, 60, 180, 300, 600)
/aspect <16:9|9:16>  set the aspect ratio
/status              show the form, job and video
/history             show the chat log
/quit                exit
anything else is sent as a chat command";

pub fn render_session(session: &Session) -> String {
    let mut out = String::new();
    let request = &session.request;
    let _ = writeln!(out, "prompt:   {}", request.prompt);
    let _ = writeln!(out, "duration: {}", request.duration_seconds.label());
    let _ = writeln!(out, "aspect:   {}", request.aspect_ratio);
    if let Some(id) = &session.job_id {
        let _ = writeln!(out, "job:      {}", id);
    }
    match (&session.video_url, session.loading) {
        (_, true) => {
            let _ = writeln!(out, "video:    generating...");
        }
        (Some(url), false) => {
            let _ = writeln!(out, "video:    {}", url);
        }
        (None, false) => {}
    }
    out
}

pub fn render_history(messages: &ChatLog) -> String {
    let mut out = String::new();
    for message in messages.iter() {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "bot",
        };
        let _ = writeln!(out, "{}> {}", who, message.content);
    }
    out
}
