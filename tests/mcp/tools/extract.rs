use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use twrap::{extract::output::OutputFormat, mcp::TwrapMcpServer, mcp::types::ExtractKeysParams};

use crate::{McpTestFixture, extract_tool_result_json};

const WRAPPED: &str = r#"export function Greeting() {
  const { t } = useTranslation();
  return <p>{t("안녕")}{t("취소")}{t("안녕")}</p>;
}
"#;

#[tokio::test]
async fn test_extract_keys_writes_locales() {
    let fixture = McpTestFixture::with_sources(&[("src/Greeting.tsx", WRAPPED)]).unwrap();
    fixture
        .write_file("locales/en.json", r#"{ "안녕": "Hello" }"#)
        .unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(ExtractKeysParams {
        project_root_path: fixture.root(),
        ..Default::default()
    });

    let result = server.extract_keys(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["keyCount"], 2);
    assert_eq!(json_result["keys"][0]["key"], "안녕");
    assert_eq!(json_result["keys"][0]["location"]["line"], 3);
    assert_eq!(json_result["files"].as_array().unwrap().len(), 3);
    assert_eq!(json_result["files"][0]["addedKeys"], 1);

    assert_eq!(
        fixture.read_json("locales/en.json").unwrap(),
        json!({ "안녕": "Hello", "취소": "" })
    );
    assert_eq!(
        fixture.read_json("locales/ko.json").unwrap(),
        json!({ "안녕": "안녕", "취소": "취소" })
    );
    assert!(fixture.root_path().join("locales/index.ts").exists());
}

#[tokio::test]
async fn test_extract_keys_force_and_dry_run() {
    let fixture = McpTestFixture::with_sources(&[("src/Greeting.tsx", WRAPPED)]).unwrap();
    fixture
        .write_file("locales/en.json", r#"{ "안녕": "Hello" }"#)
        .unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(ExtractKeysParams {
        project_root_path: fixture.root(),
        force: Some(true),
        dry_run: Some(true),
        ..Default::default()
    });

    let result = server.extract_keys(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["files"][0]["written"], false);
    assert_eq!(
        fixture.read_json("locales/en.json").unwrap(),
        json!({ "안녕": "Hello" })
    );
}

#[tokio::test]
async fn test_extract_keys_csv() {
    let fixture = McpTestFixture::with_sources(&[("src/Greeting.tsx", WRAPPED)]).unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(ExtractKeysParams {
        project_root_path: fixture.root(),
        format: Some(OutputFormat::Csv),
        ..Default::default()
    });

    let result = server.extract_keys(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["files"].as_array().unwrap().len(), 1);
    assert_eq!(
        fixture
            .read_file("locales/extracted-translations.csv")
            .unwrap(),
        "Key,English,Korean\n안녕,,안녕\n취소,,취소\n"
    );
}
