//! Command handlers for Plot Viewer CLI
//!
//! This module implements the command handlers that connect parsed
//! arguments and the loaded configuration to a viewing [`Session`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use csv::{Terminator, WriterBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::app::filter::FilterOptions;
use crate::app::manifest::{ManifestSource, ManifestStats};
use crate::app::models::SelectionRequest;
use crate::app::render::{HtmlPresenter, JsonPresenter, Presenter, TextPresenter, ViewRenderer};
use crate::app::session::{PassReport, Session};
use crate::cli::args::{
    ConfigAction, ConfigArgs, ManifestAction, ManifestArgs, OptionsArgs, OutputFormat, ViewArgs,
};
use crate::cli::browse::run_browse;
use crate::config::AppConfig;
use crate::errors::{ConfigError, RenderError, Result};

/// Create a session from the effective configuration
pub fn build_session(config: &AppConfig) -> Result<Session> {
    let location = config.manifest_location()?;
    let resolver = config.resolver()?;
    debug!("Manifest location: {}, plot base: {}", location, resolver.base());

    let source = ManifestSource::with_client_config(location, config.client.clone());
    Ok(Session::new(source, resolver))
}

/// Load the manifest, with a spinner when stderr is a terminal
async fn preload(session: &mut Session, quiet: bool) {
    if quiet || !atty::is(atty::Stream::Stderr) {
        session.ensure_loaded().await;
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
    }
    spinner.set_message(format!("Loading manifest from {}...", session.source().location()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let load_start = Instant::now();
    let loaded = session.ensure_loaded().await;
    spinner.finish_and_clear();

    if let Some(table) = loaded {
        info!(
            "Loaded {} manifest rows in {:.2}s",
            table.len(),
            load_start.elapsed().as_secs_f64()
        );
    }
}

async fn render_with<P: Presenter>(
    session: &mut Session,
    request: &SelectionRequest,
    mut renderer: ViewRenderer<P>,
) -> Result<PassReport> {
    let report = session.pass(request, &mut renderer).await?;
    renderer.finish()?;
    Ok(report)
}

/// Handle the view command
pub async fn handle_view(config: &AppConfig, args: ViewArgs, quiet: bool) -> Result<()> {
    if let Some(path) = &args.output {
        ensure_writable(path)?;
    }

    let mut session = build_session(config)?;
    preload(&mut session, quiet).await;

    let request = args.selection.to_request();
    let embed = config.display.embed_options();

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let report = match args.format {
        OutputFormat::Text => {
            let renderer = ViewRenderer::new(TextPresenter::new(writer), embed);
            render_with(&mut session, &request, renderer).await?
        }
        OutputFormat::Html => {
            let presenter = HtmlPresenter::new(writer, config.display.page_title.clone());
            render_with(&mut session, &request, ViewRenderer::new(presenter, embed)).await?
        }
        OutputFormat::Json => {
            let renderer = ViewRenderer::new(JsonPresenter::new(writer), embed);
            render_with(&mut session, &request, renderer).await?
        }
    };

    info!(
        "View pass: {} matched, {} rendered, {} skipped",
        report.matched, report.rendered, report.skipped
    );

    if let Some(path) = &args.output {
        if !quiet {
            println!(
                "✅ Wrote {} plot(s) to {}",
                report.rendered,
                path.display()
            );
        }
    }

    Ok(())
}

/// Handle the options command
pub async fn handle_options(config: &AppConfig, args: OptionsArgs, quiet: bool) -> Result<()> {
    let mut session = build_session(config)?;
    preload(&mut session, quiet).await;

    let request = SelectionRequest {
        date: args.date.clone(),
        ..Default::default()
    };

    let Some(options) = session.options(&request).await else {
        print_unavailable(&session);
        return Ok(());
    };

    if args.json {
        let json = serde_json::to_string_pretty(&options).map_err(RenderError::from)?;
        println!("{}", json);
    } else {
        let date = request.date.as_deref().or(options.dates.first().map(String::as_str));
        print!("{}", format_options(&options, date));
    }
    Ok(())
}

/// Handle the browse command
pub async fn handle_browse(config: &AppConfig, quiet: bool) -> Result<()> {
    let mut session = build_session(config)?;
    preload(&mut session, quiet).await;

    let mut renderer = ViewRenderer::new(
        TextPresenter::new(io::stdout()),
        config.display.embed_options(),
    );
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    let passes = run_browse(&mut session, &mut renderer, input).await?;
    info!("Browse session ended after {} pass(es)", passes);
    Ok(())
}

/// Handle manifest commands
pub async fn handle_manifest(config: &AppConfig, args: ManifestArgs, quiet: bool) -> Result<()> {
    match args.action {
        ManifestAction::Info => {
            let mut session = build_session(config)?;
            preload(&mut session, quiet).await;

            match session.source().stats() {
                Some(stats) => print!("{}", format_stats(&stats, &session)),
                None => print_unavailable(&session),
            }
            Ok(())
        }
    }
}

/// Handle configuration commands
pub async fn handle_config(config: &AppConfig, args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { force } => {
            let (path, written) = AppConfig::initialize(force).await?;
            if written {
                println!("📁 Created configuration file:");
                println!("   {}", path.display());
                println!("   You can customize settings by editing this file.");
            } else {
                println!("Configuration file already exists: {}", path.display());
                println!("Use --force to overwrite it.");
            }
            Ok(())
        }
    }
}

/// Check that an output file can be created before doing any work
pub fn ensure_writable(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "--output".to_string(),
                value: path.display().to_string(),
                reason: format!("directory {} does not exist", parent.display()),
            }
            .into());
        }
    }
    Ok(())
}

fn print_unavailable(session: &Session) {
    if let Some(diagnostic) = session.diagnostic() {
        eprintln!("❌ {}", diagnostic);
    }
    eprintln!("⚠️  {}", crate::constants::display::EMPTY_MANIFEST_NOTICE);
}

/// Format the option lists offered for a date
pub fn format_options(options: &FilterOptions, date: Option<&str>) -> String {
    fn line(name: &str, values: &[String]) -> String {
        if values.is_empty() {
            format!("  {:<9} (none)\n", name)
        } else {
            format!("  {:<9} {}\n", name, join_values(values))
        }
    }

    let mut out = String::new();
    out.push_str(&format!("📅 Dates: {}\n", options.dates.join(", ")));
    if let Some(date) = date {
        out.push_str(&format!("Options for {}:\n", date));
    }
    out.push_str(&line("status1", &options.status1));
    out.push_str(&line("status2", &options.status2));
    out.push_str(&line("shuttle", &options.shuttle));
    out
}

/// Join values the way `browse` reads them back
///
/// Values are comma separated and quoted only when they contain a comma or
/// a quote.
pub fn join_values<S: AsRef<str>>(values: &[S]) -> String {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let written = writer
        .write_record(values.iter().map(|value| value.as_ref().as_bytes()))
        .ok()
        .and_then(|_| writer.into_inner().ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    match written {
        Some(line) => line.trim_end_matches('\n').to_string(),
        None => values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(","),
    }
}

fn format_stats(stats: &ManifestStats, session: &Session) -> String {
    let mut out = String::new();
    out.push_str("📋 Manifest Information\n");
    out.push_str("=======================\n");
    out.push_str(&format!("{:<16} {}\n", "Location", session.source().location()));
    out.push_str(&format!("{:<16} {}\n", "Plot base", session.resolver().base()));
    out.push_str(&format!("{:<16} {}\n", "Rows", stats.rows));
    out.push_str(&format!("{:<16} {}\n", "Dates", stats.dates.len()));
    out.push_str(&format!("{:<16} {}\n", "Date range", stats.date_range()));
    out.push_str(&format!("{:<16} {}\n", "status1 values", stats.status1_values));
    out.push_str(&format!("{:<16} {}\n", "status2 values", stats.status2_values));
    out.push_str(&format!("{:<16} {}\n", "shuttle values", stats.shuttle_values));
    if stats.empty_filenames > 0 {
        out.push_str(&format!(
            "{:<16} {} (these rows are skipped)\n",
            "Empty filenames", stats.empty_filenames
        ));
    }
    if let Some(loaded_at) = stats.loaded_at {
        out.push_str(&format!(
            "{:<16} {}\n",
            "Loaded at",
            loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out
}
