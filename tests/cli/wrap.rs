use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, stderr, stdout};

const GREETING: &str = "export function Greeting() {\n  return <p>안녕</p>;\n}\n";

#[test]
fn test_wrap_rewrites_component() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", GREETING)?;

    let output = test.wrap_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_snapshot!(stdout(&output), @r"
    Modified src/Greeting.tsx
    ✓ Wrapped 1 literal in 1 of 1 file
    ");
    assert_eq!(
        test.read_file("src/Greeting.tsx")?,
        "import { useTranslation } from \"i18nexus\";\nexport function Greeting() { const { t } = useTranslation();\n  return <p>{t(\"안녕\")}</p>;\n}\n"
    );

    Ok(())
}

#[test]
fn test_wrap_twice_is_stable() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", GREETING)?;

    test.wrap_command().output()?;
    let first = test.read_file("src/Greeting.tsx")?;
    let output = test.wrap_command().output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("src/Greeting.tsx")?, first);
    assert!(stdout(&output).contains("Wrapped 0 literals in 0 of 1 file"));

    Ok(())
}

#[test]
fn test_wrap_dry_run_leaves_files_untouched() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", GREETING)?;

    let output = test.wrap_command().args(["--dry-run", "-v"]).output()?;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Would modify src/Greeting.tsx"));
    assert!(out.contains("  2:13 "));
    assert!(out.contains("Would wrap 1 literal in 1 of 1 file"));
    assert_eq!(test.read_file("src/Greeting.tsx")?, GREETING);

    Ok(())
}

#[test]
fn test_wrap_server_mode_from_config() -> Result<()> {
    let test = CliTest::with_file("app/page.tsx", "export const Page = () => <h1>제목</h1>;\n")?;
    test.write_file(
        "i18nexus.config.json",
        r#"{
  "sourcePattern": "app/**/*.tsx",
  "mode": "server",
  "serverTranslationImportSource": "i18nexus/server"
}"#,
    )?;

    let output = test.wrap_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("app/page.tsx")?,
        "import { getServerTranslation } from \"i18nexus/server\";\nexport const Page = async () => { const { t } = await getServerTranslation(); return <h1>{t(\"제목\")}</h1>; };\n"
    );

    Ok(())
}

#[test]
fn test_wrap_flags_override_config() -> Result<()> {
    let test = CliTest::with_file("lib/Save.tsx", "export function Save() {\n  return <button>저장</button>;\n}\n")?;
    test.write_file("i18nexus.config.json", r#"{ "mode": "server" }"#)?;

    let output = test
        .wrap_command()
        .args([
            "-p",
            "lib/**/*.tsx",
            "--mode",
            "client",
            "--framework",
            "nextjs",
            "--import-source",
            "@/i18n",
        ])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let content = test.read_file("lib/Save.tsx")?;
    assert!(content.starts_with("\"use client\";\nimport { useTranslation } from \"@/i18n\";\n"));
    assert!(content.contains("const { t } = useTranslation();"));

    Ok(())
}

#[test]
fn test_wrap_reports_parse_errors_and_continues() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", GREETING)?;
    test.write_file("src/broken.tsx", "export function (")?;

    let output = test.wrap_command().output()?;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("parse-error"));
    assert!(out.contains("--> src/broken.tsx"));
    assert!(out.contains("Modified src/Greeting.tsx"));
    assert!(out.contains("1 problem (1 error, 0 warnings)"));

    Ok(())
}

#[test]
fn test_wrap_warns_about_text_outside_components() -> Result<()> {
    let test = CliTest::with_file("src/constants.ts", "export const TITLE = \"제목\";\n")?;

    let output = test.wrap_command().output()?;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("warning: \"제목\"  unwrapped-text"));
    assert!(out.contains("--> src/constants.ts:1:22"));
    assert_eq!(
        test.read_file("src/constants.ts")?,
        "export const TITLE = \"제목\";\n"
    );

    Ok(())
}

#[test]
fn test_wrap_invalid_pattern_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.wrap_command().args(["-p", "src/[invalid"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid glob pattern in 'sourcePattern'"));

    Ok(())
}

#[test]
fn test_wrap_malformed_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file("i18nexus.config.json", "{ not json")?;

    let output = test.wrap_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse config file"));

    Ok(())
}
