use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use twrap::{config::Mode, mcp::TwrapMcpServer, mcp::types::WrapParams};

use crate::{GREETING, McpTestFixture, extract_tool_result_json, fixture_mixed_project};

#[tokio::test]
async fn test_preview_wrap_does_not_write() {
    let fixture = fixture_mixed_project().unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(WrapParams {
        project_root_path: fixture.root(),
        ..Default::default()
    });

    let result = server.preview_wrap(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["dryRun"], true);
    assert_eq!(json_result["filesScanned"], 3);
    assert_eq!(
        json_result["modifiedFiles"],
        json!(["src/Greeting.tsx", "src/page.tsx"])
    );
    assert_eq!(json_result["changes"].as_array().unwrap().len(), 2);
    assert_eq!(json_result["changes"][0]["location"]["filePath"], "src/Greeting.tsx");

    let issues = json_result["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["rule"], "unwrapped-text");
    assert_eq!(issues[0]["severity"], "warning");
    assert_eq!(issues[0]["filePath"], "src/constants.ts");
    assert_eq!(issues[0]["message"], "상수");

    assert_eq!(fixture.read_file("src/Greeting.tsx").unwrap(), GREETING);
}

#[tokio::test]
async fn test_wrap_files_writes() {
    let fixture = fixture_mixed_project().unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(WrapParams {
        project_root_path: fixture.root(),
        pattern: Some("src/**/*.tsx".to_string()),
        mode: None,
    });

    let result = server.wrap_files(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["dryRun"], false);
    assert_eq!(json_result["filesScanned"], 2);
    let content = fixture.read_file("src/Greeting.tsx").unwrap();
    assert!(content.starts_with("import { useTranslation } from \"i18nexus\";\n"));
    assert!(content.contains("<p>{t(\"안녕\")}</p>"));
}

#[tokio::test]
async fn test_wrap_files_auto_mode_reports_detections() {
    let fixture = fixture_mixed_project().unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(WrapParams {
        project_root_path: fixture.root(),
        pattern: Some("src/page.tsx".to_string()),
        mode: Some(Mode::Auto),
    });

    let result = server.wrap_files(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    let detections = json_result["detections"].as_array().unwrap();
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0]["filePath"], "src/page.tsx");
    assert_eq!(detections[0]["kind"], "server");
    assert!(
        fixture
            .read_file("src/page.tsx")
            .unwrap()
            .contains("await getServerTranslation()")
    );
}

#[tokio::test]
async fn test_wrap_invalid_pattern_is_an_error() {
    let fixture = McpTestFixture::new().unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(WrapParams {
        project_root_path: fixture.root(),
        pattern: Some("src/[invalid".to_string()),
        mode: None,
    });

    assert!(server.preview_wrap(params).await.is_err());
}
