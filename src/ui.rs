// UI layer: the interactive captioning loop.
// Input goes through the `Prompter` trait (backed by `dialoguer` in the
// binary) and output through any `Write`, so the loop can also be driven
// from a script.

use crate::api::{CaptionOutcome, MemeClient, MemeTemplate};
use crate::config::{ENV_FILE_NAME, PASSWORD_VAR, USERNAME_VAR};
use anyhow::{Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

pub const SIGNUP_URL: &str = "https://imgflip.com/signup?redirect=%2Fsettings";

/// Source of operator answers.
pub trait Prompter {
    /// Ask a question and return the answer. Empty answers are allowed.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from the terminal.
#[derive(Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read answer for '{}'", prompt))?;
        Ok(answer)
    }
}

/// Replays a fixed list of answers; errors once they run out.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .with_context(|| format!("No scripted answer left for '{}'", prompt))
    }
}

enum State {
    Listing,
    Prompting,
    Captioning {
        template_id: String,
        top_text: String,
        bottom_text: String,
    },
    AskContinue,
    Done,
}

/// The list / prompt / caption / ask loop.
pub struct InteractiveShell<P, W> {
    client: MemeClient,
    prompter: P,
    out: W,
    show_spinner: bool,
}

impl<P: Prompter, W: Write> InteractiveShell<P, W> {
    pub fn new(client: MemeClient, prompter: P, out: W) -> Self {
        Self {
            client,
            prompter,
            out,
            show_spinner: false,
        }
    }

    /// Show an `indicatif` spinner on stderr while requests are in flight.
    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the operator answers "y" to the exit question.
    ///
    /// API and transport failures are printed and the loop carries on;
    /// only prompt or output failures end it early.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Listing;
        loop {
            state = match state {
                State::Listing => self.list()?,
                State::Prompting => {
                    let template_id = self.prompter.ask("Enter a meme id")?;
                    let top_text = self.prompter.ask("Enter a top text")?;
                    let bottom_text = self.prompter.ask("Enter a bottom text")?;
                    State::Captioning {
                        template_id,
                        top_text,
                        bottom_text,
                    }
                }
                State::Captioning {
                    template_id,
                    top_text,
                    bottom_text,
                } => self.caption(&template_id, &top_text, &bottom_text)?,
                State::AskContinue => {
                    let choice = self.prompter.ask("Would you like to exit? (y/n)")?;
                    if choice == "y" {
                        State::Done
                    } else {
                        State::Listing
                    }
                }
                State::Done => break,
            };
        }
        writeln!(self.out, "Thank you")?;
        Ok(())
    }

    fn list(&mut self) -> Result<State> {
        let spinner = self.spinner("Fetching templates...");
        let listing = self.client.list_templates();
        spinner.finish_and_clear();

        match listing {
            Ok(templates) => {
                print_templates(&mut self.out, &templates)?;
                Ok(State::Prompting)
            }
            Err(e) => {
                debug!(error = %e, "listing templates failed");
                writeln!(self.out, "Error: {}", e)?;
                Ok(State::AskContinue)
            }
        }
    }

    fn caption(&mut self, template_id: &str, top_text: &str, bottom_text: &str) -> Result<State> {
        let spinner = self.spinner("Captioning...");
        let result = self.client.caption_meme(template_id, top_text, bottom_text);
        spinner.finish_and_clear();

        match result.map(|r| r.outcome()) {
            Ok(CaptionOutcome::Created(data)) => {
                debug!(page_url = %data.page_url, "meme created");
                writeln!(self.out, "Meme URL: {}", data.url)?;
            }
            Ok(CaptionOutcome::Rejected(message)) => writeln!(self.out, "Error: {}", message)?,
            Err(e) => {
                debug!(error = %e, "caption request failed");
                writeln!(self.out, "Error: {}", e)?;
            }
        }
        Ok(State::AskContinue)
    }

    fn spinner(&self, message: &'static str) -> ProgressBar {
        if !self.show_spinner {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Print the catalog under a "Valid memes:" header.
pub fn print_templates<W: Write>(out: &mut W, templates: &[MemeTemplate]) -> Result<()> {
    writeln!(out, "Valid memes:")?;
    for meme in templates {
        writeln!(
            out,
            " Name: {} \n ID: {} \n URL: {}\n",
            meme.name, meme.id, meme.url
        )?;
    }
    Ok(())
}

/// Tell the operator how to provide credentials.
pub fn print_setup_instructions<W: Write>(out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Please create a file called \"{}\" in the same directory you run this program from.",
        ENV_FILE_NAME
    )?;
    writeln!(out, "The file should contain the following variables:")?;
    writeln!(out, "\t{}", USERNAME_VAR)?;
    writeln!(out, "\t{}", PASSWORD_VAR)?;
    writeln!(out, "Signup: {}", SIGNUP_URL)?;
    Ok(())
}
