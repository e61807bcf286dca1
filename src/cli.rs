//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::NotificationKind;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Notification stream selector on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NotificationKindArg {
    Cadastro,
    Atualizacao,
}

impl From<NotificationKindArg> for NotificationKind {
    fn from(value: NotificationKindArg) -> Self {
        match value {
            NotificationKindArg::Cadastro => NotificationKind::Cadastro,
            NotificationKindArg::Atualizacao => NotificationKind::Atualizacao,
        }
    }
}

#[derive(Parser)]
#[command(name = "incon-tools")]
#[command(version)]
#[command(about = "Tracking map generation and incident email notifications")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an interactive HTML map from a tracking spreadsheet
    Map {
        /// Path to the tracking CSV file
        input: PathBuf,

        /// Output HTML file path (default: <input>.html)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Overlay checkpoints from a KMZ/KML file
        #[arg(long)]
        kmz: Option<PathBuf>,

        /// JSON file mapping category names to hex colors
        #[arg(long)]
        colors: Option<PathBuf>,

        /// Initial zoom level. Uses config value if not specified.
        #[arg(long, short = 'z')]
        zoom: Option<u8>,

        /// Enable click-to-annotate sticky notes
        #[arg(long)]
        annotations: bool,
    },

    /// Incident notification emails
    Incident {
        #[command(subcommand)]
        action: IncidentCommands,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set SMTP server hostname
        #[arg(long)]
        set_smtp_server: Option<String>,

        /// Set SMTP port
        #[arg(long)]
        set_smtp_port: Option<u16>,

        /// Set sender email address
        #[arg(long)]
        set_sender: Option<String>,

        /// Set envelope sender (send on behalf)
        #[arg(long)]
        set_envelope_sender: Option<String>,

        /// Set fallback recipient
        #[arg(long)]
        set_default_recipient: Option<String>,

        /// Set recipients SQLite database path
        #[arg(long)]
        set_recipients_db: Option<PathBuf>,

        /// Set default map zoom
        #[arg(long)]
        set_zoom: Option<u8>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum IncidentCommands {
    /// Send an incident notification email
    Send {
        /// Path to the incident JSON file
        incident: PathBuf,

        /// Incident identifier used in the subject line
        #[arg(long)]
        id: String,

        /// Send as an update instead of an initial notice
        #[arg(long)]
        update: bool,

        /// Extra TO addresses, repeatable
        #[arg(long)]
        to: Vec<String>,

        /// Extra CC addresses, repeatable
        #[arg(long)]
        cc: Vec<String>,

        /// Render and print the message without connecting to SMTP
        #[arg(long)]
        dry_run: bool,
    },

    /// List the recipients a notification would go to
    Recipients {
        /// Notification stream to resolve
        #[arg(long, value_enum, default_value = "cadastro")]
        kind: NotificationKindArg,
    },

    /// Verify SMTP server reachability and credentials
    TestConnection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_command_parses() {
        let cli = Cli::parse_from([
            "incon-tools",
            "map",
            "rastreio.csv",
            "-o",
            "mapa.html",
            "--kmz",
            "rota.kmz",
            "--colors",
            "cores.json",
            "--annotations",
        ]);
        match cli.command {
            Commands::Map { input, output, kmz, colors, annotations, .. } => {
                assert_eq!(input, PathBuf::from("rastreio.csv"));
                assert_eq!(output, Some(PathBuf::from("mapa.html")));
                assert_eq!(kmz, Some(PathBuf::from("rota.kmz")));
                assert_eq!(colors, Some(PathBuf::from("cores.json")));
                assert!(annotations);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_send_defaults() {
        let cli = Cli::parse_from([
            "incon-tools",
            "incident",
            "send",
            "incidente.json",
            "--id",
            "LOG42",
        ]);
        match cli.command {
            Commands::Incident {
                action: IncidentCommands::Send { id, update, dry_run, to, cc, .. },
            } => {
                assert_eq!(id, "LOG42");
                assert!(!update);
                assert!(!dry_run);
                assert!(to.is_empty());
                assert!(cc.is_empty());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_recipients_kind() {
        let cli = Cli::parse_from([
            "incon-tools",
            "incident",
            "recipients",
            "--kind",
            "atualizacao",
        ]);
        match cli.command {
            Commands::Incident { action: IncidentCommands::Recipients { kind } } => {
                assert_eq!(NotificationKind::from(kind), NotificationKind::Atualizacao);
            }
            _ => panic!("wrong command"),
        }
    }
}
