//! End-to-end tests for the viewing pipeline
//!
//! These tests drive a session over real manifest files on disk, the way
//! the CLI does, and check what reaches the presenters.

use std::io::Write;

use plot_viewer::app::{
    EmbedOptions, FilterPipeline, FilterSelection, HtmlPresenter, JsonPresenter, ManifestField,
    ManifestLocation, ManifestSource, RenderOutcome, ResourceBase, ResourceResolver,
    SelectionRequest, Session, SessionState, TextPresenter, ViewRenderer,
};
use plot_viewer::config::AppConfig;
use plot_viewer::constants::display;
use tempfile::NamedTempFile;

const MANIFEST: &str = "date,status1,status2,shuttle,filename\n\
                        250925,A,X,1,p1.html\n\
                        250925,B,Y,2,p2.html\n\
                        250924,A,X,1,p3.html\n";

fn create_test_manifest(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn session_for(file: &NamedTempFile, base: &str) -> Session {
    Session::new(
        ManifestSource::new(ManifestLocation::Local(file.path().to_path_buf())),
        ResourceResolver::new(ResourceBase::parse(base).unwrap(), "plot_outputs"),
    )
}

#[tokio::test]
async fn test_reference_selection_walkthrough() {
    let file = create_test_manifest(MANIFEST);
    let mut source = ManifestSource::new(ManifestLocation::Local(file.path().to_path_buf()));
    let table = source.load().await.unwrap();

    // date only
    let by_date = FilterPipeline::apply(&table, &FilterSelection::new("250925"));
    assert_eq!(by_date.row_ids(), vec![0, 1]);

    // date and status1
    let selection = FilterSelection::new("250925").with(ManifestField::Status1, ["A"]);
    let narrowed = FilterPipeline::apply(&table, &selection);
    assert_eq!(narrowed.row_ids(), vec![0]);

    let resolver = ResourceResolver::new(ResourceBase::parse("https://host/repo").unwrap(), "plot_outputs");
    let resolution = resolver.resolve_all(&narrowed);
    assert_eq!(resolution.resources.len(), 1);
    assert_eq!(
        resolution.resources[0].url.as_str(),
        "https://host/repo/plot_outputs/p1.html"
    );
}

#[tokio::test]
async fn test_text_view_of_latest_date() {
    let file = create_test_manifest(MANIFEST);
    let mut session = session_for(&file, "https://host/repo/");
    let mut renderer = ViewRenderer::new(TextPresenter::new(Vec::new()), EmbedOptions::default());

    let report = session
        .pass(&SelectionRequest::default(), &mut renderer)
        .await
        .unwrap();
    renderer.finish().unwrap();

    assert_eq!(report.date.as_deref(), Some("250925"));
    assert_eq!(report.options.status1, vec!["A", "B"]);
    assert_eq!(report.outcome, RenderOutcome::Rendered(2));

    let output = String::from_utf8(renderer.into_presenter().into_inner()).unwrap();
    let first = output.find("Plot: A_X on Shuttle 1").unwrap();
    let second = output.find("Plot: B_Y on Shuttle 2").unwrap();
    assert!(first < second);
    assert!(output.contains("https://host/repo/plot_outputs/p2.html"));
}

#[tokio::test]
async fn test_html_view_with_cascaded_selection() {
    let file = create_test_manifest(MANIFEST);
    let mut session = session_for(&file, "https://host/repo");
    let presenter = HtmlPresenter::new(Vec::new(), display::PAGE_TITLE);
    let mut renderer = ViewRenderer::new(presenter, EmbedOptions::default());

    let mut request = SelectionRequest {
        date: Some("250924".to_string()),
        ..Default::default()
    };
    request.shuttle.insert("1".to_string());

    let report = session.pass(&request, &mut renderer).await.unwrap();
    renderer.finish().unwrap();

    // Only values present on 250924 are offered
    assert_eq!(report.options.status1, vec!["A"]);
    assert_eq!(report.options.status2, vec!["X"]);
    assert_eq!(report.rendered, 1);

    let page = String::from_utf8(renderer.into_presenter().into_inner()).unwrap();
    assert!(page.contains("src=\"https://host/repo/plot_outputs/p3.html\""));
    assert_eq!(page.matches("<iframe").count(), 1);
}

#[tokio::test]
async fn test_missing_column_yields_empty_table_and_diagnostic() {
    let file = create_test_manifest("date,status1,status2,filename\n250925,A,X,p1.html\n");
    let mut session = session_for(&file, "https://host/repo");
    let mut renderer = ViewRenderer::new(JsonPresenter::new(Vec::new()), EmbedOptions::default());

    let report = session
        .pass(&SelectionRequest::default(), &mut renderer)
        .await
        .unwrap();
    renderer.finish().unwrap();

    assert!(!report.loaded);
    assert_eq!(report.outcome, RenderOutcome::Empty);
    assert_eq!(session.state(), SessionState::Uninitialized { failed: true });
    assert!(session.diagnostic().unwrap().contains("shuttle"));

    let value: serde_json::Value =
        serde_json::from_slice(&renderer.into_presenter().into_inner()).unwrap();
    assert_eq!(value["notices"][0]["level"], "error");
    assert_eq!(value["notices"][1]["message"], display::EMPTY_MANIFEST_NOTICE);
    assert!(value["plots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_selection_without_matches_shows_notice() {
    let file = create_test_manifest(MANIFEST);
    let mut session = session_for(&file, "https://host/repo");
    let mut renderer = ViewRenderer::new(TextPresenter::new(Vec::new()), EmbedOptions::default());

    let mut request = SelectionRequest::default();
    request.status2.insert("Z".to_string());

    let report = session.pass(&request, &mut renderer).await.unwrap();
    assert_eq!(report.outcome, RenderOutcome::Empty);
    assert_eq!(session.state(), SessionState::Empty);

    let output = String::from_utf8(renderer.into_presenter().into_inner()).unwrap();
    assert_eq!(output.trim_end().lines().count(), 1);
    assert!(output.contains(display::NO_MATCH_NOTICE));
}

#[tokio::test]
async fn test_config_drives_manifest_and_resolver() {
    let file = create_test_manifest(MANIFEST);
    let manifest = file.path().to_string_lossy().to_string();

    let mut config = AppConfig::default();
    config.source.origin = "https://plots.example.com/".to_string();
    config.source.path_prefix = Some("/exports/".to_string());
    config.apply_cli_overrides(Some(&manifest), None);

    let mut session = Session::new(
        ManifestSource::new(config.manifest_location().unwrap()),
        config.resolver().unwrap(),
    );
    let mut renderer = ViewRenderer::new(
        TextPresenter::new(Vec::new()),
        config.display.embed_options(),
    );

    session
        .pass(&SelectionRequest::default(), &mut renderer)
        .await
        .unwrap();
    let output = String::from_utf8(renderer.into_presenter().into_inner()).unwrap();
    assert!(output.contains(
        "https://plots.example.com/meliaph-monitech/NVH_PowerSource_Plotly_Viz/main/exports/plot_outputs/p1.html"
    ));
}
