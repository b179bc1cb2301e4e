//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Redraft - correct and restyle text through a correction service
#[derive(Parser)]
#[command(
    name = "redraft",
    about = "Correct and restyle text through a correction service",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send text through the correction service
    Correct {
        /// Text to correct; omitted = use the stored session input
        text: Option<String>,

        /// Free-text instruction appended to the active directives
        #[arg(short, long)]
        instruction: Option<String>,
    },

    /// Read the clipboard (rich content preferred) into the session input
    Paste,

    /// Copy the last result to the clipboard
    Copy {
        /// Export format
        #[arg(short, long, default_value = "text")]
        format: CopyFormat,
    },

    /// Print the last result
    Show {
        /// Output format
        #[arg(short, long, default_value = "raw")]
        format: ShowFormat,
    },

    /// Flip a directive on or off
    Toggle {
        /// Directive key (see `redraft directives`)
        key: String,
    },

    /// List directives and their current selection
    Directives,

    /// Clear input, output, and custom instruction
    Clear,

    /// Move the last result into the input field
    Swap,

    /// Interactive session
    Repl,
}

/// Clipboard export format
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CopyFormat {
    /// Literal output string as plain text
    #[default]
    Text,
    /// Sanitized HTML document as a rich clipboard item
    Html,
}

impl std::str::FromStr for CopyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            _ => Err(format!("Unknown format: {}. Use: text or html", s)),
        }
    }
}

impl std::fmt::Display for CopyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Print format for `show`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// Raw Markdown output as returned by the service
    #[default]
    Raw,
    /// Sanitized HTML fragment
    Html,
    /// Standalone sanitized HTML document
    Doc,
}

impl std::str::FromStr for ShowFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "md" | "markdown" => Ok(Self::Raw),
            "html" => Ok(Self::Html),
            "doc" | "document" => Ok(Self::Doc),
            _ => Err(format!("Unknown format: {}. Use: raw, html, or doc", s)),
        }
    }
}

impl std::fmt::Display for ShowFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Html => write!(f, "html"),
            Self::Doc => write!(f, "doc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["redraft"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_correct_with_text() {
        let cli = Cli::parse_from(["redraft", "correct", "ahoj jak sa mas"]);
        if let Some(Command::Correct { text, instruction }) = cli.command {
            assert_eq!(text.as_deref(), Some("ahoj jak sa mas"));
            assert!(instruction.is_none());
        } else {
            panic!("Expected Correct command");
        }
    }

    #[test]
    fn test_cli_parse_correct_with_instruction() {
        let cli = Cli::parse_from(["redraft", "correct", "-i", "skráť to", "text"]);
        if let Some(Command::Correct { text, instruction }) = cli.command {
            assert_eq!(text.as_deref(), Some("text"));
            assert_eq!(instruction.as_deref(), Some("skráť to"));
        } else {
            panic!("Expected Correct command");
        }
    }

    #[test]
    fn test_cli_parse_copy_html() {
        let cli = Cli::parse_from(["redraft", "copy", "--format", "html"]);
        assert!(matches!(
            cli.command,
            Some(Command::Copy {
                format: CopyFormat::Html
            })
        ));
    }

    #[test]
    fn test_cli_parse_toggle() {
        let cli = Cli::parse_from(["redraft", "toggle", "professional"]);
        if let Some(Command::Toggle { key }) = cli.command {
            assert_eq!(key, "professional");
        } else {
            panic!("Expected Toggle command");
        }
    }

    #[test]
    fn test_copy_format_from_str() {
        assert!(matches!("text".parse::<CopyFormat>(), Ok(CopyFormat::Text)));
        assert!(matches!("html".parse::<CopyFormat>(), Ok(CopyFormat::Html)));
        assert!("pdf".parse::<CopyFormat>().is_err());
    }

    #[test]
    fn test_show_format_from_str() {
        assert!(matches!("raw".parse::<ShowFormat>(), Ok(ShowFormat::Raw)));
        assert!(matches!("markdown".parse::<ShowFormat>(), Ok(ShowFormat::Raw)));
        assert!(matches!("doc".parse::<ShowFormat>(), Ok(ShowFormat::Doc)));
        assert!("xml".parse::<ShowFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["redraft", "-c", "/path/to/redraft.yml", "directives"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/redraft.yml")));
    }
}
