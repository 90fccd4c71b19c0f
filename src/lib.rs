//! twrap - wraps hardcoded Korean UI text in `t()` calls for i18nexus projects
//!
//! twrap parses JavaScript/TypeScript sources, wraps translatable string, template and
//! JSX text literals in `t(...)`, injects the translation binding each component needs
//! (`useTranslation()` on the client, `await getServerTranslation()` on the server) and
//! adds the matching imports. It can also extract the resulting keys into locale files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and validation
//! - `core`: Parsing, literal rewriting and binding injection
//! - `wrapper`: File orchestration (enumerate, transform, write back)
//! - `extract`: Translation key extraction and locale output
//! - `issues`: Per-file problems and their report interface
//! - `json_writer`: Locale JSON read-modify-write
//! - `perf`: Performance monitoring
//! - `mcp`: Model Context Protocol server implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod extract;
pub mod issues;
pub mod json_writer;
pub mod mcp;
pub mod perf;
pub mod wrapper;
