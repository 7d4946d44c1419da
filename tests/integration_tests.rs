use httpmock::prelude::*;
use senkyo_sim::domain::report::ElectionReport;
use senkyo_sim::{CliConfig, ElectionPipeline, LocalStorage, SimulationEngine};
use std::io::Read;
use tempfile::TempDir;

fn cli_config(output_path: &str) -> CliConfig {
    CliConfig {
        parties: None,
        officeholders: None,
        demographics: None,
        regions: None,
        output_path: output_path.to_string(),
        seed: Some(7),
        runs: 1,
        formats: vec!["json".to_string()],
        compress: false,
        verbose: false,
        monitor: false,
    }
}

fn read_entry(archive: &mut zip::ZipArchive<std::io::Cursor<Vec<u8>>>, name: &str) -> String {
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

#[tokio::test]
async fn test_end_to_end_with_remote_roster() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let regions_path = temp_dir.path().join("regions.toml");
    std::fs::write(
        &regions_path,
        "[[regions]]\nname = \"東京都\"\nseats = 5\n\n[[regions]]\nname = \"北海道\"\nseats = 3\n",
    )
    .unwrap();
    let demographics_path = temp_dir.path().join("prefectures.csv");
    std::fs::write(
        &demographics_path,
        "name,income,primary,secondary,tertiary,elderly\n東京都,580,0.4,15.8,83.8,22.7\n北海道,280,7.4,17.4,75.2,32.5\n",
    )
    .unwrap();

    let server = MockServer::start();
    let roster_mock = server.mock(|when, then| {
        when.method(GET).path("/parties.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"name": "自由党", "ideology": "保守", "popularity": 40,
                 "ideologies": {"保守": 16, "ナショナリズム": 10, "リバタリアニズム": 8}},
                {"name": "民進党", "ideology": "リベラル", "popularity": 32,
                 "ideologies": {"リベラル": 16, "環境主義": 10, "積極財政": 8}},
                {"name": "労働党", "ideology": "社会民主", "popularity": 14,
                 "ideologies": {"リベラル": 12, "積極財政": 16}},
                {"name": "無所属", "ideology": "なし", "popularity": 6}
            ]));
    });

    let mut config = cli_config(&output_path);
    config.parties = Some(server.url("/parties.json"));
    config.demographics = Some(demographics_path.to_str().unwrap().to_string());
    config.regions = Some(regions_path.to_str().unwrap().to_string());
    config.runs = 2;
    config.formats = vec!["json".to_string(), "csv".to_string()];
    config.compress = true;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ElectionPipeline::new(storage, config);
    let engine = SimulationEngine::new_with_monitoring(pipeline, false);

    let result = engine.run().await;

    assert!(result.is_ok());
    roster_mock.assert();

    let output_file_path = result.unwrap();
    assert!(output_file_path.ends_with("election_output.zip"));

    let zip_data = std::fs::read(&output_file_path).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(file_names, vec!["report.json", "standings.csv", "districts.csv"]);

    let report: ElectionReport = serde_json::from_str(&read_entry(&mut archive, "report.json")).unwrap();
    assert_eq!(report.seed, 7);
    assert_eq!(report.runs, 2);
    assert_eq!(report.totals.parties, 4);
    assert_eq!(report.totals.districts, 8);
    assert_eq!(report.totals.seats, 8);
    assert_eq!(report.seat_history.len(), 2);
    for run in &report.seat_history {
        assert_eq!(run.seats.iter().map(|s| s.seats).sum::<u32>(), 8);
    }

    let regions: Vec<&str> = report.regions.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(regions, vec!["北海道", "東京都"]);

    let standings = read_entry(&mut archive, "standings.csv");
    assert!(standings.starts_with("rank,name,ideology,popularity,seats,share_pct,government"));
    assert!(standings.contains("労働党"));
}

#[tokio::test]
async fn test_end_to_end_with_unreachable_sources() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let roster_mock = server.mock(|when, then| {
        when.method(GET).path("/parties.json");
        then.status(503);
    });

    let mut config = cli_config(&output_path);
    config.parties = Some(server.url("/parties.json"));
    config.officeholders = Some(temp_dir.path().join("missing.txt").to_str().unwrap().to_string());
    config.demographics = Some(temp_dir.path().join("missing.csv").to_str().unwrap().to_string());

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ElectionPipeline::new(storage, config);
    let engine = SimulationEngine::new(pipeline);

    let result = engine.run().await;

    // Sources fail open, so the run still succeeds on defaults
    assert!(result.is_ok());
    roster_mock.assert();

    let report_path = std::path::Path::new(&output_path).join("report.json");
    let report: ElectionReport = serde_json::from_slice(&std::fs::read(report_path).unwrap()).unwrap();
    assert_eq!(report.totals.parties, 2);
    assert_eq!(report.totals.districts, 289);
    assert_eq!(report.totals.seats, 289);
    let names: Vec<&str> = report.standings.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"自由党"));
    assert!(names.contains(&"民進党"));
}

#[tokio::test]
async fn test_same_seed_writes_same_results() {
    let mut reports = Vec::new();

    for _ in 0..2 {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().to_str().unwrap().to_string();
        let mut config = cli_config(&output_path);
        config.seed = Some(2026);
        config.runs = 3;

        let storage = LocalStorage::new(output_path.clone());
        let engine = SimulationEngine::new(ElectionPipeline::new(storage, config));
        engine.run().await.unwrap();

        let bytes = std::fs::read(temp_dir.path().join("report.json")).unwrap();
        reports.push(serde_json::from_slice::<ElectionReport>(&bytes).unwrap());
    }

    assert_eq!(reports[0].seat_history, reports[1].seat_history);
    assert_eq!(reports[0].districts, reports[1].districts);
    assert_eq!(reports[0].government, reports[1].government);
}

#[tokio::test]
async fn test_end_to_end_with_monitoring_and_tsv() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(&output_path);
    config.formats = vec!["tsv".to_string()];
    config.monitor = true;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ElectionPipeline::new(storage, config);
    let engine = SimulationEngine::new_with_monitoring(pipeline, true);

    let result = engine.run().await;
    assert_eq!(result.unwrap(), output_path);

    let districts = std::fs::read_to_string(temp_dir.path().join("districts.tsv")).unwrap();
    let header = districts.lines().next().unwrap();
    assert_eq!(
        header,
        "district\tregion\tturnout\tcandidate\tparty\tvotes\tshare_pct\telected"
    );
    assert!(temp_dir.path().join("standings.tsv").exists());
    assert!(!temp_dir.path().join("report.json").exists());
}
