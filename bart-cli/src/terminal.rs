//! Line-oriented terminal presentation.
//!
//! Each answer is one line of input: an empty line is RETURN, a line of blanks
//! is SPACE, anything else is matched (trimmed, lowercased) against the key
//! bindings. End of input counts as quitting.
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use bart_task::{BalloonType, BalloonView, Feedback, KeyBindings, Presentation, Scene, Signal};
use colored::{ColoredString, Colorize};
use log::debug;

/// Widest balloon drawn, in characters.
const MAX_BALLOON_WIDTH: usize = 60;
const BALLOON_CHARS_PER_UNIT: f32 = 100.0;

pub struct TerminalPresentation<R, W> {
    input: R,
    output: W,
    keys: KeyBindings,
    skip_pauses: bool,
}

impl<R: BufRead, W: Write> TerminalPresentation<R, W> {
    pub const fn new(input: R, output: W, keys: KeyBindings, skip_pauses: bool) -> Self {
        Self {
            input,
            output,
            keys,
            skip_pauses,
        }
    }

    fn read_token(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let token = if line.is_empty() {
            "return".to_string()
        } else if line.trim().is_empty() {
            "space".to_string()
        } else {
            line.trim().to_ascii_lowercase()
        };
        Ok(Some(token))
    }

    fn draw_balloon(&mut self, view: &BalloonView) -> io::Result<()> {
        writeln!(
            self.output,
            "{}",
            format!("Balloon {}/{}", view.balloon_index, view.balloon_count).bold()
        )?;
        writeln!(self.output, "{}", balloon_art(view))?;
        writeln!(self.output, "Points this balloon: {}", view.points_this_run)?;
        writeln!(self.output, "{}", view.hint.dimmed())
    }
}

impl<R: BufRead, W: Write> Presentation for TerminalPresentation<R, W> {
    type Error = io::Error;

    fn render(&mut self, scene: &Scene) -> Result<(), Self::Error> {
        match scene {
            Scene::Instructions { title, body } => {
                writeln!(self.output, "{}", title.bright_cyan().bold())?;
                writeln!(self.output, "{}", "=".repeat(title.len()).cyan())?;
                writeln!(self.output, "{body}")?;
            }
            Scene::Balloon(view) => self.draw_balloon(view)?,
            Scene::Feedback { feedback } => {
                let banner = match feedback {
                    Feedback::Exploded => feedback.message().bright_red().bold(),
                    Feedback::Collected => feedback.message().bright_green().bold(),
                };
                writeln!(self.output, "{banner}")?;
            }
            Scene::Blank => writeln!(self.output)?,
            Scene::Finished { prompt, .. } => {
                writeln!(self.output, "{}", prompt.bold())?;
            }
        }
        self.output.flush()
    }

    fn wait_for_input(&mut self, allowed: &[Signal]) -> Result<Signal, Self::Error> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(token) = self.read_token()? else {
                debug!("input closed, treating as quit");
                return Ok(Signal::Quit);
            };
            if let Some(signal) = self.keys.resolve(&token, allowed) {
                return Ok(signal);
            }
            debug!("ignored input {token:?}");
            writeln!(self.output, "{}", allowed_keys(&self.keys, allowed).yellow())?;
        }
    }

    fn pause(&mut self, duration: Duration) -> Result<(), Self::Error> {
        if !self.skip_pauses {
            thread::sleep(duration);
        }
        Ok(())
    }
}

fn balloon_art(view: &BalloonView) -> ColoredString {
    let width = ((view.radius * BALLOON_CHARS_PER_UNIT).round().max(1.0) as usize)
        .min(MAX_BALLOON_WIDTH);
    let art = format!("({})", "o".repeat(width));
    match view.cue {
        Some(BalloonType::Safe) => art.green(),
        Some(BalloonType::Risky) => art.red(),
        None => art.white(),
    }
}

fn allowed_keys(keys: &KeyBindings, allowed: &[Signal]) -> String {
    let options: Vec<String> = allowed
        .iter()
        .map(|signal| {
            let names = keys.keys_for(*signal).join("/");
            format!("{names} = {signal:?}").to_lowercase()
        })
        .collect();
    format!("Press {}", options.join(", "))
}
