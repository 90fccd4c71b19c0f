use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use twrap::mcp::{TwrapMcpServer, types::GetConfigParams};

use crate::{McpTestFixture, extract_tool_result_json};

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = TwrapMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], false);
    assert_eq!(json_result["config"]["sourcePattern"], "src/**/*.{js,jsx,ts,tsx}");
    assert_eq!(json_result["config"]["translationImportSource"], "i18nexus");
    assert_eq!(json_result["config"]["languages"], json!(["en", "ko"]));
    assert!(json_result["config"].get("mode").is_none());
}

#[tokio::test]
async fn test_get_config_from_file() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({
            "sourcePattern": "app/**/*.tsx",
            "mode": "auto",
            "framework": "nextjs"
        }))
        .unwrap();

    let server = TwrapMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(json_result["config"]["sourcePattern"], "app/**/*.tsx");
    assert_eq!(json_result["config"]["mode"], "auto");
    assert_eq!(json_result["config"]["framework"], "nextjs");
}

#[tokio::test]
async fn test_get_config_invalid_file_is_an_error() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_file("i18nexus.config.json", "{ \"mode\": \"hybrid\" }")
        .unwrap();

    let server = TwrapMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    assert!(server.get_config(params).await.is_err());
}
