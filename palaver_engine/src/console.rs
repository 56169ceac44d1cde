//! Interactive terminal player.
//!
//! Prints each frame of a [`Conversation`] and reads one command per step:
//! Enter advances, a number picks a choice, `q` quits.

mod input;

pub use input::{InputEvent, InputManager};

use anyhow::{Context, Result};
use log::info;
use textwrap::{Options, fill, termwidth};

use crate::conversation::{Conversation, Frame};
use crate::error::DialogError;
use crate::source::DialogSource;
use crate::style::DialogStyle;

/// One line of player input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Advance,
    /// 1-based menu position.
    Choose(usize),
    Help,
    Quit,
    Unknown(String),
}

/// Interpret a line typed at the prompt.
pub fn parse_command(line: &str) -> PlayerCommand {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" | "n" | "next" => PlayerCommand::Advance,
        "q" | "quit" | "exit" => PlayerCommand::Quit,
        "?" | "h" | "help" => PlayerCommand::Help,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => PlayerCommand::Choose(n),
            _ => PlayerCommand::Unknown(trimmed.to_string()),
        },
    }
}

/// Format a frame for the terminal, wrapped to `width` columns.
pub fn render_frame<K>(frame: &Frame<K>, width: usize) -> String {
    let options = Options::new(width.max(20));
    match frame {
        Frame::Text {
            speaker: Some(speaker),
            line,
        } => {
            let label = format!("{speaker}:");
            let wrapped = fill(line, options.initial_indent("  ").subsequent_indent("  "));
            format!("{}\n{}", label.speaker_style(), wrapped.line_style())
        },
        Frame::Text { speaker: None, line } => fill(line, options).narration_style().to_string(),
        Frame::Choices { options: choices } => choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let number = (i + 1).to_string();
                format!("  {} {}", number.choice_number_style(), choice.label.choice_style())
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Frame::Ended => "(the conversation has ended)".ended_style().to_string(),
    }
}

fn print_help() {
    println!("{}", "Enter: continue   1, 2, ...: pick a choice   q: quit".prompt_style());
}

/// Drive `convo` from the terminal until it ends or the player quits.
///
/// # Errors
/// - Input failures.
/// - Lookup failures while traversing (missing nodes, redirect loops, broken links).
pub fn run_console<S: DialogSource + ?Sized>(convo: &mut Conversation<'_, S>, first: Frame<S::Key>) -> Result<()> {
    let mut input = InputManager::new();
    let mut frame = first;
    let mut show = true;

    loop {
        if show {
            println!("{}\n", render_frame(&frame, termwidth()));
        }
        if frame.is_ended() {
            return Ok(());
        }
        show = false;

        let prompt = if matches!(frame, Frame::Choices { .. }) { "choose> " } else { "> " };
        let line = match input.read_line(prompt).context("reading player input")? {
            InputEvent::Line(line) => line,
            InputEvent::Eof | InputEvent::Interrupted => {
                info!("input closed, leaving conversation");
                return Ok(());
            },
        };

        let step = match parse_command(&line) {
            PlayerCommand::Quit => return Ok(()),
            PlayerCommand::Help => {
                print_help();
                continue;
            },
            PlayerCommand::Unknown(text) => {
                println!("{}", format!("Unrecognized input '{text}'. Type ? for help.").error_style());
                continue;
            },
            PlayerCommand::Advance => convo.advance(),
            PlayerCommand::Choose(n) => match convo.offered_choices().get(n - 1) {
                Some(choice) => {
                    let id = choice.id.clone();
                    convo.choose(id)
                },
                None if convo.offered_choices().is_empty() => {
                    println!("{}", "There is nothing to choose right now.".error_style());
                    continue;
                },
                None => {
                    println!("{}", format!("There is no choice {n}.").error_style());
                    continue;
                },
            },
        };

        match step {
            Ok(next) => {
                frame = next;
                show = true;
            },
            Err(DialogError::AwaitingChoice) => {
                println!("{}", "Pick one of the numbered choices.".error_style());
            },
            Err(err) => return Err(err).context("conversation step failed"),
        }
    }
}
