//! Interactive browsing
//!
//! Reads one command per line and re-runs a pass after every control
//! change. The manifest stays memoized for the whole loop; only `reload`
//! fetches it again.

use std::io::Write;

use csv::{ReaderBuilder, Trim};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::app::models::{ManifestField, SelectionRequest};
use crate::app::render::{TextPresenter, ViewRenderer};
use crate::app::session::Session;
use crate::cli::commands::{format_options, join_values};
use crate::errors::Result;

const HELP: &str = "Commands:
  date [D]              select a date (no value: most recent)
  status1 [V, ...]      allow these status1 values (no value: any)
  status2 [V, ...]      allow these status2 values (no value: any)
  shuttle [V, ...]      allow these shuttle values (no value: any)

Separate values with commas and quote a value that contains one:
  status1 \"Idle, warm\", B
Changing the date drops selected values the new date does not offer.
  clear                 reset every filter
  show                  show the current selection again
  options               list the options for the current date
  reload                fetch the manifest again
  help                  show this help
  quit                  leave
";

/// One line of browser input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Select a date, or the most recent one
    Date(Option<String>),
    /// Replace the allowed values of a categorical field
    Set(ManifestField, Vec<String>),
    /// Reset every filter
    Clear,
    /// Re-run the current selection
    Show,
    /// List options
    Options,
    /// Start a new session
    Reload,
    /// Print help
    Help,
    /// Leave the loop
    Quit,
}

impl BrowseCommand {
    /// Whether the command changes the selection or the table
    pub fn triggers_pass(&self) -> bool {
        matches!(
            self,
            Self::Date(_) | Self::Set(..) | Self::Clear | Self::Show | Self::Reload
        )
    }

    /// Apply a control change to the request
    pub fn apply(&self, request: &mut SelectionRequest) {
        match self {
            Self::Date(date) => request.date = date.clone(),
            Self::Set(field, values) => {
                if let Some(set) = request.values_mut(*field) {
                    *set = values.iter().cloned().collect();
                }
            }
            Self::Clear => *request = SelectionRequest::default(),
            _ => {}
        }
    }
}

/// Parse one input line
///
/// The keyword is followed by comma-separated values; a value containing a
/// comma is written in double quotes. Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> std::result::Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let values = parse_values(rest)?;

    let command = match keyword.to_ascii_lowercase().as_str() {
        "date" | "d" => match values.as_slice() {
            [] => BrowseCommand::Date(None),
            [date] => BrowseCommand::Date(Some(date.clone())),
            _ => return Err("date takes a single value".to_string()),
        },
        "clear" | "reset" => BrowseCommand::Clear,
        "show" | "s" => BrowseCommand::Show,
        "options" | "o" => BrowseCommand::Options,
        "reload" => BrowseCommand::Reload,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => match ManifestField::from_column(other) {
            Some(field) if ManifestField::CATEGORICAL.contains(&field) => {
                BrowseCommand::Set(field, values)
            }
            _ => return Err(format!("unknown command '{}'; type 'help'", other)),
        },
    };

    Ok(Some(command))
}

fn parse_values(text: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("could not read values: {}", e))?;
        values.extend(
            record
                .iter()
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        );
    }
    Ok(values)
}

/// Run the browser until `quit` or end of input
///
/// Returns the number of passes rendered.
pub async fn run_browse<R, W>(
    session: &mut Session,
    renderer: &mut ViewRenderer<TextPresenter<W>>,
    input: R,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut request = SelectionRequest::default();
    let mut lines = input.lines();
    let mut passes = 0;

    session.pass(&request, renderer).await?;
    renderer.finish()?;
    passes += 1;

    loop {
        {
            let out = renderer.presenter_mut().writer_mut();
            write!(out, "\nplot-viewer> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(renderer.presenter_mut().writer_mut(), "{}", message)?;
                continue;
            }
        };
        debug!("Browse command: {:?}", command);

        match &command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                write!(renderer.presenter_mut().writer_mut(), "{}", HELP)?;
            }
            BrowseCommand::Options => {
                let options = session.options(&request).await;
                let out = renderer.presenter_mut().writer_mut();
                match options {
                    Some(options) => {
                        let date = request
                            .date
                            .as_deref()
                            .or(options.dates.first().map(String::as_str));
                        write!(out, "{}", format_options(&options, date))?;
                    }
                    None => writeln!(out, "Manifest is not loaded; type 'reload' to retry")?,
                }
            }
            BrowseCommand::Set(field, values) => {
                if let Some(options) = session.options(&request).await {
                    let rejected = options.unoffered(*field, values);
                    if !rejected.is_empty() {
                        let offered = options.values(*field).unwrap_or(&[]);
                        writeln!(
                            renderer.presenter_mut().writer_mut(),
                            "{} {} not offered for this date; choose from: {}",
                            field,
                            join_values(&rejected),
                            if offered.is_empty() {
                                "(none)".to_string()
                            } else {
                                join_values(offered)
                            }
                        )?;
                        continue;
                    }
                }
            }
            BrowseCommand::Reload => {
                session.reload();
            }
            _ => {}
        }

        if command.triggers_pass() {
            command.apply(&mut request);
            if matches!(command, BrowseCommand::Date(_) | BrowseCommand::Reload) {
                if let Some(options) = session.options(&request).await {
                    options.prune(&mut request);
                }
            }
            session.pass(&request, renderer).await?;
            renderer.finish()?;
            passes += 1;
        }
    }

    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::manifest::{ManifestLocation, ManifestSource};
    use crate::app::render::EmbedOptions;
    use crate::app::resolve::{ResourceBase, ResourceResolver};
    use tempfile::TempDir;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("date"), Ok(Some(BrowseCommand::Date(None))));
        assert_eq!(
            parse_command("date 250924"),
            Ok(Some(BrowseCommand::Date(Some("250924".to_string()))))
        );
        assert_eq!(
            parse_command("status1 A, B"),
            Ok(Some(BrowseCommand::Set(
                ManifestField::Status1,
                vec!["A".to_string(), "B".to_string()]
            )))
        );
        assert_eq!(
            parse_command("Shuttle"),
            Ok(Some(BrowseCommand::Set(ManifestField::Shuttle, vec![])))
        );
        assert_eq!(parse_command("q"), Ok(Some(BrowseCommand::Quit)));
        assert!(parse_command("filename x").is_err());
        assert!(parse_command("date a, b").is_err());
        assert!(parse_command("bogus").is_err());
    }

    #[test]
    fn test_parse_values_with_separators() {
        assert_eq!(
            parse_command("status1 \"Idle, warm\", B"),
            Ok(Some(BrowseCommand::Set(
                ManifestField::Status1,
                vec!["Idle, warm".to_string(), "B".to_string()]
            )))
        );
        assert_eq!(
            parse_command("status2 B,\"Idle, warm\""),
            Ok(Some(BrowseCommand::Set(
                ManifestField::Status2,
                vec!["B".to_string(), "Idle, warm".to_string()]
            )))
        );
        assert_eq!(
            parse_command("shuttle high speed, 2,"),
            Ok(Some(BrowseCommand::Set(
                ManifestField::Shuttle,
                vec!["high speed".to_string(), "2".to_string()]
            )))
        );
    }

    #[test]
    fn test_apply_changes_request() {
        let mut request = SelectionRequest::default();
        BrowseCommand::Date(Some("250924".to_string())).apply(&mut request);
        BrowseCommand::Set(ManifestField::Status2, vec!["X".to_string()]).apply(&mut request);
        assert_eq!(request.date.as_deref(), Some("250924"));
        assert!(request.status2.contains("X"));

        BrowseCommand::Set(ManifestField::Status2, vec![]).apply(&mut request);
        assert!(request.status2.is_empty());

        BrowseCommand::Clear.apply(&mut request);
        assert_eq!(request, SelectionRequest::default());
    }

    fn browse_session(dir: &TempDir, manifest: &str) -> Session {
        let path = dir.path().join("manifest.csv");
        std::fs::write(&path, manifest).unwrap();
        Session::new(
            ManifestSource::new(ManifestLocation::Local(path)),
            ResourceResolver::new(ResourceBase::parse("https://host/repo").unwrap(), "plot_outputs"),
        )
    }

    async fn browse(session: &mut Session, input: &[u8]) -> (usize, String) {
        let mut renderer = ViewRenderer::new(TextPresenter::new(Vec::new()), EmbedOptions::default());
        let passes = run_browse(session, &mut renderer, input).await.unwrap();
        let output = String::from_utf8(renderer.into_presenter().into_inner()).unwrap();
        (passes, output)
    }

    const MANIFEST: &str = "date,status1,status2,shuttle,filename\n\
                            250925,A,X,1,p1.html\n\
                            250925,B,Y,2,p2.html\n\
                            250924,A,X,1,p3.html\n";

    #[tokio::test]
    async fn test_browse_loop_reuses_manifest() {
        let dir = TempDir::new().unwrap();
        let mut session = browse_session(&dir, MANIFEST);

        let (passes, output) =
            browse(&mut session, b"status1 B\noptions\nbogus\nshow\nquit\nshow\n").await;

        assert_eq!(passes, 3);
        assert_eq!(session.source().fetch_count(), 1);
        assert!(output.contains("Displaying 2 Plot(s) for 250925"));
        assert!(output.contains("Displaying 1 Plot(s) for 250925"));
        assert!(output.contains("unknown command 'bogus'"));
    }

    #[tokio::test]
    async fn test_date_change_drops_values_not_offered() {
        let dir = TempDir::new().unwrap();
        let mut session = browse_session(&dir, MANIFEST);

        // 250924 only has status1 A, so the B selection is dropped
        let (passes, output) = browse(&mut session, b"status1 B\ndate 250924\n").await;

        assert_eq!(passes, 3);
        assert!(output.contains("Displaying 1 Plot(s) for 250924"));
        assert!(output.contains("Plot: A_X on Shuttle 1"));
        assert!(!output.contains(crate::constants::display::NO_MATCH_NOTICE));
    }

    #[tokio::test]
    async fn test_unoffered_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = browse_session(&dir, MANIFEST);

        let (passes, output) = browse(&mut session, b"date 250924\nstatus1 B\n").await;

        assert_eq!(passes, 2);
        assert!(output.contains("status1 B not offered for this date; choose from: A"));
        assert!(!output.contains(crate::constants::display::NO_MATCH_NOTICE));
    }

    #[tokio::test]
    async fn test_select_value_containing_comma() {
        let dir = TempDir::new().unwrap();
        let mut session = browse_session(
            &dir,
            "date,status1,status2,shuttle,filename\n\
             250925,\"Idle, warm\",X,1,p1.html\n\
             250925,B,Y,2,p2.html\n",
        );

        let (passes, output) =
            browse(&mut session, b"options\nstatus1 \"Idle, warm\"\n").await;

        assert_eq!(passes, 2);
        assert!(output.contains("status1   B,\"Idle, warm\""));
        assert!(output.contains("Displaying 1 Plot(s) for 250925"));
        assert!(output.contains("Plot: Idle, warm_X on Shuttle 1"));
    }
}
