use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use twrap::{mcp::TwrapMcpServer, mcp::types::CleanLocalesParams};

use crate::{McpTestFixture, extract_tool_result_json};

const WRAPPED: &str = r#"export function Greeting() {
  const { t } = useTranslation();
  return <p>{t("안녕")}{t("취소")}</p>;
}
"#;

fn fixture() -> McpTestFixture {
    let fixture = McpTestFixture::with_sources(&[("src/Greeting.tsx", WRAPPED)]).unwrap();
    fixture
        .write_file("locales/ko.json", r#"{ "안녕": "안녕", "취소": "", "옛날": "옛날" }"#)
        .unwrap();
    fixture
        .write_file("locales/en.json", r#"{ "안녕": "Hi", "취소": "Cancel", "옛날": "Old" }"#)
        .unwrap();
    fixture
}

#[tokio::test]
async fn test_clean_locales_removes_keys() {
    let fixture = fixture();
    let server = TwrapMcpServer::new();

    let params = Parameters(CleanLocalesParams {
        project_root_path: fixture.root(),
        backup: Some(false),
        ..Default::default()
    });

    let result = server.clean_locales(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["usedKeys"], 2);
    assert_eq!(json_result["kept"], json!(["안녕"]));
    assert_eq!(json_result["unused"], json!(["옛날"]));
    assert_eq!(json_result["invalidValue"], json!(["취소"]));
    assert_eq!(json_result["files"][0]["written"], true);
    assert!(json_result["files"][0].get("backup").is_none());

    assert_eq!(
        fixture.read_json("locales/en.json").unwrap(),
        json!({ "안녕": "Hi" })
    );
}

#[tokio::test]
async fn test_clean_locales_dry_run() {
    let fixture = fixture();
    let server = TwrapMcpServer::new();

    let params = Parameters(CleanLocalesParams {
        project_root_path: fixture.root(),
        dry_run: Some(true),
        ..Default::default()
    });

    let result = server.clean_locales(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["files"][0]["written"], false);
    assert_eq!(
        fixture.read_json("locales/en.json").unwrap(),
        json!({ "안녕": "Hi", "취소": "Cancel", "옛날": "Old" })
    );
}

#[tokio::test]
async fn test_clean_locales_rejects_scan_failures() {
    let fixture = fixture();
    fixture
        .write_file("src/Broken.tsx", "export function (")
        .unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(CleanLocalesParams {
        project_root_path: fixture.root(),
        ..Default::default()
    });

    assert!(server.clean_locales(params).await.is_err());
    assert_eq!(
        fixture.read_json("locales/ko.json").unwrap(),
        json!({ "안녕": "안녕", "취소": "", "옛날": "옛날" })
    );
}
