//! Command handlers

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;

use crate::cli::{Cli, Commands, IncidentCommands, NotificationKindArg, OutputFormat};
use crate::config::Config;
use crate::email::{message, Mailer};
use crate::error::{Error, Result};
use crate::infrastructure::kmz_loader::{load_kmz, KmzContent};
use crate::infrastructure::recipients::fetch_recipients;
use crate::infrastructure::sheet_loader::load_track_points;
use crate::output::{output_map_summary, output_recipients, MapSummary};
use crate::track::{center_location, group_points, unique_categories};
use crate::types::{Incident, NotificationKind, Recipients};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Map {
            input,
            output,
            kmz,
            colors,
            zoom,
            annotations,
        } => cmd_map(
            &config,
            input,
            output.clone(),
            kmz.as_deref(),
            colors.as_deref(),
            zoom.unwrap_or(config.zoom_start),
            *annotations,
            output_format,
        ),

        Commands::Incident { action } => match action {
            IncidentCommands::Send {
                incident,
                id,
                update,
                to,
                cc,
                dry_run,
            } => {
                let kind = if *update {
                    NotificationKind::Atualizacao
                } else {
                    NotificationKind::Cadastro
                };
                cmd_send(&config, incident, id, kind, to, cc, *dry_run)
            }

            IncidentCommands::Recipients { kind } => {
                cmd_recipients(&config, *kind, output_format)
            }

            IncidentCommands::TestConnection => cmd_test_connection(config),
        },

        Commands::Config {
            show,
            set_smtp_server,
            set_smtp_port,
            set_sender,
            set_envelope_sender,
            set_default_recipient,
            set_recipients_db,
            set_zoom,
            set_output,
            reset,
        } => cmd_config(
            config,
            *show,
            set_smtp_server.clone(),
            *set_smtp_port,
            set_sender.clone(),
            set_envelope_sender.clone(),
            set_default_recipient.clone(),
            set_recipients_db.clone(),
            *set_zoom,
            *set_output,
            *reset,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_map(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
    kmz: Option<&Path>,
    colors_file: Option<&Path>,
    zoom: u8,
    annotations: bool,
    output_format: OutputFormat,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::FileNotFound(input.display().to_string()));
    }

    let points = load_track_points(input)?;
    if points.is_empty() {
        return Err(Error::EmptySheet(input.display().to_string()));
    }
    info!("loaded {} valid rows from {}", points.len(), input.display());

    let groups = group_points(&points);
    let categories = unique_categories(&groups);
    let center = center_location(&points);

    let mut colors = config.type_colors.clone();
    if let Some(path) = colors_file {
        merge_color_file(&mut colors, path)?;
    }

    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Mapa de Rastreamento".to_string());

    let mut builder = crate::map::MapBuilder::new(&title, center, zoom);
    builder.add_vehicle_data(&groups, &colors);

    let kmz_content = match kmz {
        Some(path) => {
            let content = load_kmz(path)?;
            info!(
                "KMZ overlay: {} checkpoints, {} line points",
                content.checkpoints.len(),
                content.lines.len()
            );
            builder.add_checkpoints(&content);
            content
        }
        None => KmzContent::default(),
    };

    builder.add_filter_system(&categories);
    if annotations {
        builder.enable_annotations();
    }

    let output_path = output.unwrap_or_else(|| input.with_extension("html"));
    builder.finalize().save(&output_path)?;

    output_map_summary(
        output_format,
        &MapSummary {
            output: output_path.display().to_string(),
            rows: points.len(),
            groups: groups.len(),
            categories,
            checkpoints: kmz_content.checkpoints.len(),
        },
    )
}

/// Merge a `{"CATEGORIA": "#RRGGBB", ...}` JSON file over the base palette.
fn merge_color_file(colors: &mut BTreeMap<String, String>, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let overrides: BTreeMap<String, String> = serde_json::from_str(&content)?;
    for (name, hex) in overrides {
        let hex = hex.trim().to_string();
        if hex.len() != 7 || !hex.starts_with('#') {
            return Err(Error::Config(format!(
                "invalid color '{hex}' for '{name}', expected #RRGGBB"
            )));
        }
        colors.insert(name.trim().to_string(), hex);
    }
    Ok(())
}

fn cmd_send(
    config: &Config,
    incident_path: &Path,
    incident_id: &str,
    kind: NotificationKind,
    extra_to: &[String],
    extra_cc: &[String],
    dry_run: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(incident_path)?;
    let incident: Incident = serde_json::from_str(&content)?;

    let mut recipients = fetch_recipients(
        config.recipients_db.as_deref(),
        kind,
        &config.default_recipient,
    );
    recipients.to.extend(extra_to.iter().cloned());
    recipients.cc.extend(extra_cc.iter().cloned());
    recipients = dedup_recipients(recipients);

    let msg = message::build_message(config, &incident, incident_id, kind, &recipients)?;

    if dry_run {
        println!("Subject: {}", message::subject(kind, incident_id));
        println!("To:      {}", recipients.to.join(", "));
        if !recipients.cc.is_empty() {
            println!("Cc:      {}", recipients.cc.join(", "));
        }
        println!("{}", message::render_plain(&incident, incident_id, kind));
        return Ok(());
    }

    Mailer::new(config.clone()).send(&msg, &recipients)?;
    println!(
        "Notification '{}' sent to {} recipient(s)",
        message::subject(kind, incident_id),
        recipients.all_unique().len()
    );
    Ok(())
}

/// Drop duplicate addresses, first occurrence wins; CC loses against TO.
fn dedup_recipients(recipients: Recipients) -> Recipients {
    let mut out = Recipients::default();
    for addr in recipients.to {
        if !out.to.contains(&addr) {
            out.to.push(addr);
        }
    }
    for addr in recipients.cc {
        if !out.to.contains(&addr) && !out.cc.contains(&addr) {
            out.cc.push(addr);
        }
    }
    out
}

fn cmd_recipients(
    config: &Config,
    kind: NotificationKindArg,
    output_format: OutputFormat,
) -> Result<()> {
    let recipients = fetch_recipients(
        config.recipients_db.as_deref(),
        kind.into(),
        &config.default_recipient,
    );
    output_recipients(output_format, &recipients)
}

fn cmd_test_connection(config: Config) -> Result<()> {
    let server = config.smtp_server.clone();
    let port = config.smtp_port;
    let ok = Mailer::new(config).test_connection()?;
    if ok {
        println!("Connection to {}:{} OK", server, port);
    } else {
        println!("Connection to {}:{} failed", server, port);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    mut config: Config,
    show: bool,
    set_smtp_server: Option<String>,
    set_smtp_port: Option<u16>,
    set_sender: Option<String>,
    set_envelope_sender: Option<String>,
    set_default_recipient: Option<String>,
    set_recipients_db: Option<PathBuf>,
    set_zoom: Option<u8>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut changed = false;

    if let Some(server) = set_smtp_server {
        config.smtp_server = server;
        changed = true;
    }
    if let Some(port) = set_smtp_port {
        config.smtp_port = port;
        changed = true;
    }
    if let Some(sender) = set_sender {
        config.sender_email = sender;
        changed = true;
    }
    if let Some(envelope) = set_envelope_sender {
        config.envelope_sender = Some(envelope);
        changed = true;
    }
    if let Some(recipient) = set_default_recipient {
        config.default_recipient = recipient;
        changed = true;
    }
    if let Some(db) = set_recipients_db {
        config.recipients_db = Some(db);
        changed = true;
    }
    if let Some(zoom) = set_zoom {
        config.zoom_start = zoom;
        changed = true;
    }
    if let Some(format) = set_output {
        config.output_format = format;
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !changed {
        println!("{}", config);
    }

    Ok(())
}
