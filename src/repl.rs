//! Interactive session
//!
//! A readline loop over the transformation session: plain input becomes the
//! session text and is sent through the correction service immediately;
//! slash commands drive everything else.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::format::ClipboardPort;
use crate::session::{GenerateStatus, TransformationSession};

enum SlashResult {
    Continue,
    Quit,
}

/// Interactive wrapper around a [`TransformationSession`]
pub struct ReplSession {
    session: TransformationSession,
    clipboard: Box<dyn ClipboardPort>,
}

impl ReplSession {
    pub fn new(session: TransformationSession, clipboard: Box<dyn ClipboardPort>) -> Self {
        Self { session, clipboard }
    }

    /// Run the interactive loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.session.set_input_text(input);
                        self.generate().await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Redraft".bright_cyan().bold());
        println!(
            "Type text to correct it, {} for help, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
        self.print_directives();
    }

    async fn generate(&mut self) {
        match self.session.handle_generate().await {
            GenerateStatus::Updated => {
                println!();
                println!("{}", self.session.raw_output());
                println!();
            }
            GenerateStatus::NoOutput => {
                println!("{}", "No usable output; previous result kept.".dimmed());
            }
            GenerateStatus::Failed => {
                let message = self.session.last_error().unwrap_or("unknown error");
                println!("{} {}", "✗".bright_red(), message.bright_red());
            }
            GenerateStatus::Skipped => {
                println!("{}", "Nothing to send.".dimmed());
            }
        }
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/go" | "/g" => {
                self.generate().await;
                SlashResult::Continue
            }
            "/paste" | "/p" => {
                self.session.handle_paste(self.clipboard.as_mut());
                if self.session.input_text().is_empty() {
                    println!("{}", "Clipboard empty or unavailable.".dimmed());
                } else {
                    println!("{}", "Input replaced from clipboard:".dimmed());
                    println!("{}", self.session.input_text());
                }
                SlashResult::Continue
            }
            "/copy" => {
                let as_html = parts.get(1).copied() == Some("html");
                let written = if as_html {
                    self.session.copy_as_html(self.clipboard.as_mut())
                } else {
                    self.session.copy_as_text(self.clipboard.as_mut())
                };
                if written {
                    println!("{}", "Copied.".dimmed());
                } else {
                    println!("{}", "Clipboard unavailable.".dimmed());
                }
                SlashResult::Continue
            }
            "/show" => {
                if parts.get(1).copied() == Some("html") {
                    println!("{}", self.session.preview_html());
                } else {
                    println!("{}", self.session.raw_output());
                }
                SlashResult::Continue
            }
            "/toggle" | "/t" => {
                match parts.get(1) {
                    Some(key) => {
                        self.session.toggle_directive(key);
                        self.print_directives();
                    }
                    None => println!("Usage: /toggle <key>"),
                }
                SlashResult::Continue
            }
            "/directives" | "/d" => {
                self.print_directives();
                SlashResult::Continue
            }
            "/custom" => {
                let custom = parts[1..].join(" ");
                self.session.set_custom_instruction(custom);
                if self.session.custom_instruction().is_empty() {
                    println!("{}", "Custom instruction cleared.".dimmed());
                } else {
                    println!("{} {}", "Custom instruction:".dimmed(), self.session.custom_instruction());
                }
                SlashResult::Continue
            }
            "/clear" | "/c" => {
                self.session.handle_clear();
                println!("{}", "Session cleared.".dimmed());
                SlashResult::Continue
            }
            "/swap" => {
                if self.session.raw_output().trim().is_empty() {
                    println!("{}", "No result to move.".dimmed());
                } else {
                    self.session.move_result_to_input();
                    println!("{}", "Result moved to input.".dimmed());
                }
                SlashResult::Continue
            }
            _ => {
                println!("Unknown command: {}. Type /help for help.", cmd);
                SlashResult::Continue
            }
        }
    }

    fn print_directives(&self) {
        println!("{}", "Directives:".bold());
        for option in self.session.directives().list_options() {
            let mark = if option.active {
                "[x]".bright_green().to_string()
            } else {
                "[ ]".dimmed().to_string()
            };
            println!("  {} {:<14} {}", mark, option.key, option.label);
        }
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  {}        send the current input again", "/go".yellow());
        println!("  {}     replace input from the clipboard", "/paste".yellow());
        println!("  {} copy result (plain or rich)", "/copy [html]".yellow());
        println!("  {} print result (raw or sanitized HTML)", "/show [html]".yellow());
        println!("  {} flip a directive", "/toggle <key>".yellow());
        println!("  {} list directives", "/directives".yellow());
        println!("  {} set the free-text instruction", "/custom <text>".yellow());
        println!("  {}     clear input, output, and custom instruction", "/clear".yellow());
        println!("  {}      move the result into the input", "/swap".yellow());
        println!("  {}      quit", "/quit".yellow());
        println!();
        println!("Anything else is taken as input text and corrected immediately.");
    }
}
