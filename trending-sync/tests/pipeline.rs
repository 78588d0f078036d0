use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use trending_sync::{
    BitableConfig, BitableSink, ConfigFile, DestinationError, ListingExtractor, ListingSelectors,
    OutputRecord, PipelineConfig, RecordSink, Runner, RunnerError, SelectorConfig,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

fn listing_block(i: u32) -> String {
    format!(
        r#"<article class="Box-row">
  <h2 class="h3 lh-condensed"><a href="/owner{i}/repo{i}"><span class="text-normal">owner{i} /</span> repo{i}</a></h2>
  <p class="col-9 color-fg-muted my-1">Project number {i}</p>
  <div class="f6 color-fg-muted mt-2">
    <span class="d-inline-block ml-0 mr-3"><span itemprop="programmingLanguage">Rust</span></span>
    <span class="d-inline-block float-sm-right">{i},007 stars today</span>
  </div>
</article>"#
    )
}

fn listing_page(blocks: u32) -> String {
    let body: String = (1..=blocks).map(listing_block).collect();
    format!("<html><body><div data-hpc>{body}</div></body></html>")
}

fn config_for(server: &MockServer) -> PipelineConfig {
    let file = ConfigFile {
        listing_url: Some(format!("{}/trending?since=daily", server.uri())),
        api_base_url: Some(server.uri()),
        ..ConfigFile::default()
    };
    PipelineConfig::from_file(&file).unwrap()
}

async fn mount_listing(server: &MockServer, html: String) {
    Mock::given(method("GET"))
        .and(path("/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

async fn mount_repo(server: &MockServer, i: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner{i}/repo{i}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": i,
            "full_name": format!("owner{i}/repo{i}"),
            "stargazers_count": i * 100,
            "forks_count": i
        })))
        .mount(server)
        .await;
}

/// Sink that remembers every batch it was given.
#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<Vec<OutputRecord>>>,
}

#[async_trait]
impl RecordSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn write(&self, records: &[OutputRecord]) -> Result<usize, DestinationError> {
        self.batches.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }
}

#[test]
fn fixture_listing_is_extracted_in_order() {
    let selectors = ListingSelectors::from_config(&SelectorConfig::default()).unwrap();
    let extractor = ListingExtractor::new(selectors, "https://github.com");

    let entries = extractor.extract(&fixture("trending.html"));

    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].full_name, "ast-grep/ast-grep");
    assert_eq!(
        entries[0].description,
        "⚡A CLI tool for code structural search, lint and rewriting. Written in Rust"
    );
    assert_eq!(entries[0].language, "Rust");
    assert_eq!(entries[0].stars_today, 1234);
    assert_eq!(entries[0].repo_url, "https://github.com/ast-grep/ast-grep");

    assert_eq!(entries[1].rank, 2);
    assert_eq!(entries[1].full_name, "microsoft/markitdown");
    assert_eq!(entries[1].description, "");
    assert_eq!(entries[1].language, "");
    assert_eq!(entries[1].stars_today, 0);

    assert_eq!(entries[2].rank, 3);
    assert_eq!(entries[2].full_name, "tauri-apps/tauri");
    assert_eq!(entries[2].stars_today, 87);

    for entry in &entries {
        assert!(!entry.owner.is_empty());
        assert!(!entry.name.is_empty());
        assert_eq!(entry.total_stars, 0);
        assert_eq!(entry.forks, 0);
    }
}

#[tokio::test]
async fn fifteen_blocks_yield_ten_enriched_records() {
    let server = MockServer::start().await;
    mount_listing(&server, listing_page(15)).await;
    for i in 1..=15 {
        if i != 4 {
            mount_repo(&server, i).await;
        }
    }
    Mock::given(method("GET"))
        .and(path("/repos/owner4/repo4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let runner = Runner::new(config_for(&server)).unwrap();
    let sink = RecordingSink::default();

    let output = runner.run(&sink).await.unwrap();

    assert_eq!(output.summary.listed, 15);
    assert_eq!(output.summary.retained, 10);
    assert_eq!(output.summary.enriched, 9);
    assert_eq!(output.summary.enrichment_failures.len(), 1);
    assert_eq!(output.summary.enrichment_failures[0].repository, "owner4/repo4");
    assert_eq!(output.summary.written, 10);
    assert!(!output.summary.write_skipped);

    let batches = sink.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let records = &batches[0];
    assert_eq!(records.len(), 10);

    for (index, record) in records.iter().enumerate() {
        let i = index as u32 + 1;
        assert_eq!(record.rank, i);
        assert_eq!(record.title, format!("owner{i}/repo{i}"));
        assert_eq!(record.author, format!("owner{i}"));
        assert_eq!(record.stars_today, u64::from(i) * 1000 + 7);

        let (stars, forks) = if i == 4 {
            (0, 0)
        } else {
            (u64::from(i) * 100, u64::from(i))
        };
        assert_eq!(record.total_stars, stars);
        assert_eq!(record.forks, forks);

        assert!(record.reason.contains(&format!("第 {i} 名")));
        assert!(record.reason.contains(&record.stars_today.to_string()));
        assert!(record.reason.contains(&format!("总 Star {stars}")));
        assert!(record.reason.contains(&format!("Fork 数 {forks}")));
    }
}

#[tokio::test]
async fn empty_listing_never_calls_the_sink() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        r#"<html><body><article><h2><a href="/x">no separator</a></h2></article></body></html>"#
            .to_string(),
    )
    .await;

    let runner = Runner::new(config_for(&server)).unwrap();
    let sink = RecordingSink::default();

    let output = runner.run(&sink).await.unwrap();

    assert!(output.records.is_empty());
    assert!(output.summary.write_skipped);
    assert_eq!(output.summary.written, 0);
    assert!(sink.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn listing_failure_stops_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let runner = Runner::new(config_for(&server)).unwrap();
    let sink = RecordingSink::default();

    let result = runner.run(&sink).await;

    assert!(matches!(result, Err(RunnerError::Fetch(_))));
    assert!(sink.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn records_reach_bitable() {
    let server = MockServer::start().await;
    mount_listing(&server, listing_page(2)).await;
    mount_repo(&server, 1).await;
    mount_repo(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/open-apis/auth/v3/tenant_access_token/internal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "ok",
            "tenant_access_token": "t-xyz",
            "expire": 7200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(
            "/open-apis/bitable/v1/apps/bascnApp/tables/tblTrending/records/batch_create",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": { "records": [{ "record_id": "rec1" }, { "record_id": "rec2" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bitable = BitableConfig::new(
        "cli_app".to_string(),
        "secret".to_string(),
        "bascnApp".to_string(),
        "tblTrending".to_string(),
    )
    .unwrap()
    .with_base_url(Url::parse(&server.uri()).unwrap());
    let sink = BitableSink::new(bitable).unwrap();
    let runner = Runner::new(config_for(&server)).unwrap();

    let output = runner.run(&sink).await.unwrap();

    assert_eq!(output.summary.written, 2);

    let requests = server.received_requests().await.unwrap();
    let batch = requests
        .iter()
        .find(|r| r.url.path().ends_with("/batch_create"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&batch.body).unwrap();
    let rows = body["records"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["fields"]["排名"], json!(1));
    assert_eq!(rows[0]["fields"]["项目名称"], json!("owner1/repo1"));
    assert_eq!(rows[1]["fields"]["总星标数"], json!(200));
}
