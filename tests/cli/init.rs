use anyhow::{Context, Result};
use insta::assert_snapshot;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourcePattern"], "src/**/*.{js,jsx,ts,tsx}");
    assert_eq!(parsed["translationImportSource"], "i18nexus");
    assert_eq!(parsed["clientTranslationHook"], "useTranslation");
    assert_eq!(parsed["serverTranslationFunction"], "getServerTranslation");
    assert_eq!(parsed["localesDir"], "./locales");
    assert!(parsed.get("mode").is_none());

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert_snapshot!(stdout(&output), @"✓ Created i18nexus.config.json");
    assert!(test.root().join("i18nexus.config.json").exists());
    assert_config_content(&test.read_file("i18nexus.config.json")?)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file("i18nexus.config.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(stderr(&output), @"Error: i18nexus.config.json already exists");
    assert_eq!(test.read_file("i18nexus.config.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "src/app.tsx",
        "export function App() { return <div>Test</div>; }",
    )?;

    let output = test.wrap_command().output()?;
    assert!(
        output.status.success(),
        "Wrap command should work with initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}
