use std::path::Path;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;

use crate::{
    config::{Config, load_config},
    extract::{
        KeyExtractor,
        clean::{CleanOptions, clean_locales},
        output::{OutputOptions, write_outputs},
    },
    wrapper::TranslationWrapper,
};

use super::types::{
    CleanLocalesParams, CleanLocalesResult, ConfigDto, ExtractKeysParams, ExtractKeysResult,
    GetConfigParams, IssueItem, WrapParams, WrapResult, WrittenFile,
};

#[derive(Clone)]
pub struct TwrapMcpServer {
    tool_router: ToolRouter<Self>,
}

impl Default for TwrapMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl TwrapMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// Get the resolved twrap configuration
    #[tool(
        description = "Get the resolved twrap configuration for a project, and whether it came from i18nexus.config.json."
    )]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.project_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {:#}", e), None))?;

        json_result(&ConfigDto {
            from_file: result.from_file,
            config: result.config,
        })
    }

    /// Dry-run the wrapper
    #[tool(
        description = "Preview which hardcoded Korean literals would be wrapped in t() without writing any file. Returns the files that would change, every literal with its replacement, and per-file issues."
    )]
    pub async fn preview_wrap(
        &self,
        params: Parameters<WrapParams>,
    ) -> Result<CallToolResult, McpError> {
        run_wrap(params.0, true).await
    }

    /// Run the wrapper and write files
    #[tool(
        description = "Wrap hardcoded Korean literals in t(), inject translation bindings and imports, and write the files back. Run preview_wrap first."
    )]
    pub async fn wrap_files(
        &self,
        params: Parameters<WrapParams>,
    ) -> Result<CallToolResult, McpError> {
        run_wrap(params.0, false).await
    }

    /// Extract translation keys into locale files
    #[tool(
        description = "Collect the keys passed to t() across the project and merge them into the locale files (or a CSV sheet). Existing translations are kept unless force is set."
    )]
    pub async fn extract_keys(
        &self,
        params: Parameters<ExtractKeysParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let root = Path::new(&params.project_root_path);
        let config = project_config(root, None)?;

        let extraction = KeyExtractor::new(&config, root)
            .extract()
            .map_err(|e| McpError::internal_error(format!("Extraction failed: {:#}", e), None))?;
        let options = OutputOptions {
            format: params.format.unwrap_or_default(),
            languages: config.languages.clone(),
            default_language: config.default_language.clone(),
            output_dir: root.join(&config.locales_dir),
            force: params.force.unwrap_or(false),
            dry_run: params.dry_run.unwrap_or(false),
        };
        let files = write_outputs(&extraction.keys, &options).map_err(|e| {
            McpError::internal_error(format!("Failed to write outputs: {:#}", e), None)
        })?;

        json_result(&ExtractKeysResult {
            files_scanned: extraction.files_scanned,
            key_count: extraction.keys.len(),
            issues: extraction.issues.iter().map(IssueItem::from).collect(),
            keys: extraction.keys,
            files: files
                .into_iter()
                .map(|f| WrittenFile {
                    path: f.path.to_string_lossy().to_string(),
                    added_keys: f.added_keys,
                    written: f.written,
                })
                .collect(),
        })
    }

    /// Remove unused and untranslated keys from the locale files
    #[tool(
        description = "Rebuild every locale file from the keys still used in t() calls. Keys used nowhere, or whose default-language value is empty or N/A, are removed. Refuses to write while any source file fails to parse."
    )]
    pub async fn clean_locales(
        &self,
        params: Parameters<CleanLocalesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let root = Path::new(&params.project_root_path);
        let config = project_config(root, None)?;
        let dry_run = params.dry_run.unwrap_or(false);

        let extraction = KeyExtractor::new(&config, root)
            .extract()
            .map_err(|e| McpError::internal_error(format!("Extraction failed: {:#}", e), None))?;
        let failures = extraction.scan_failures();
        if !dry_run && failures > 0 {
            return Err(McpError::invalid_params(
                format!(
                    "{} file(s) could not be scanned; fix them or use dryRun before cleaning",
                    failures
                ),
                None,
            ));
        }

        let options = CleanOptions {
            languages: config.languages.clone(),
            default_language: config.default_language.clone(),
            locales_dir: root.join(&config.locales_dir),
            dry_run,
            backup: params.backup.unwrap_or(true),
        };
        let report = clean_locales(&extraction.keys, &options)
            .map_err(|e| McpError::internal_error(format!("Clean failed: {:#}", e), None))?;

        json_result(&CleanLocalesResult {
            files_scanned: extraction.files_scanned,
            report,
            issues: extraction.issues.iter().map(IssueItem::from).collect(),
        })
    }
}

async fn run_wrap(params: WrapParams, dry_run: bool) -> Result<CallToolResult, McpError> {
    let root = Path::new(&params.project_root_path);
    let mut config = project_config(root, params.pattern)?;
    config.dry_run = dry_run;
    if let Some(mode) = params.mode {
        config.mode = Some(mode);
    }

    let wrapper = TranslationWrapper::new(config.to_transform_config(root))
        .map_err(|e| McpError::invalid_params(format!("Invalid configuration: {:#}", e), None))?;
    let result = wrapper
        .run()
        .await
        .map_err(|e| McpError::internal_error(format!("Wrap failed: {:#}", e), None))?;

    json_result(&WrapResult {
        dry_run: result.dry_run,
        files_scanned: result.files_scanned,
        issues: result.issues.iter().map(IssueItem::from).collect(),
        modified_files: result.processed_files,
        changes: result.changes,
        detections: result.detections,
    })
}

fn project_config(root: &Path, pattern: Option<String>) -> Result<Config, McpError> {
    let mut config = load_config(root)
        .map_err(|e| McpError::internal_error(format!("Failed to load config: {:#}", e), None))?
        .config;
    if let Some(pattern) = pattern {
        config.source_pattern = pattern;
    }
    config
        .validate()
        .map_err(|e| McpError::invalid_params(format!("Invalid configuration: {:#}", e), None))?;
    Ok(config)
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;

    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

#[tool_handler]
impl ServerHandler for TwrapMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "twrap MCP wraps hardcoded Korean UI text in t() calls for i18nexus projects.\n\n\
                 Available tools:\n\
                 1. get_config - Get the resolved project configuration\n\
                 2. preview_wrap - Show what wrapping would change, without writing\n\
                 3. wrap_files - Wrap literals and write the files back\n\
                 4. extract_keys - Merge the keys used in t() calls into the locale files\n\
                 5. clean_locales - Drop unused or untranslated keys from the locale files\n\n\
                 Recommended Workflow:\n\
                 1. preview_wrap and review the changes and unwrapped-text issues\n\
                 2. wrap_files\n\
                 3. extract_keys to add the new keys to every locale file"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = TwrapMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
