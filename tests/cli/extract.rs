use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, stderr, stdout};

const WRAPPED: &str = r#"import { useTranslation } from "i18nexus";
export function Greeting() {
  const { t } = useTranslation();
  return <p>{t("안녕하세요")}{t("welcome", { defaultValue: "환영합니다" })}</p>;
}
"#;

fn read_json(test: &CliTest, path: &str) -> Result<Value> {
    Ok(serde_json::from_str(&test.read_file(path)?)?)
}

#[test]
fn test_extract_writes_locale_files() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", WRAPPED)?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        read_json(&test, "locales/ko.json")?,
        json!({ "welcome": "환영합니다", "안녕하세요": "안녕하세요" })
    );
    assert_eq!(
        read_json(&test, "locales/en.json")?,
        json!({ "welcome": "", "안녕하세요": "" })
    );
    assert!(test.read_file("locales/index.ts")?.contains("import ko from \"./ko.json\";"));

    let out = stdout(&output);
    assert!(out.contains("Wrote "));
    assert!(out.contains("Found 2 unique keys in 1 file"));

    Ok(())
}

#[test]
fn test_extract_keeps_existing_translations() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", WRAPPED)?;
    test.write_file("locales/en.json", r#"{ "안녕하세요": "Hello", "old": "Old" }"#)?;

    test.extract_command().output()?;

    let en = read_json(&test, "locales/en.json")?;
    assert_eq!(en["안녕하세요"], "Hello");
    assert_eq!(en["old"], "Old");
    assert_eq!(en["welcome"], "");

    Ok(())
}

#[test]
fn test_extract_force_rebuilds() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", WRAPPED)?;
    test.write_file("locales/en.json", r#"{ "안녕하세요": "Hello", "old": "Old" }"#)?;

    test.extract_command().arg("--force").output()?;

    assert_eq!(
        read_json(&test, "locales/en.json")?,
        json!({ "welcome": "", "안녕하세요": "" })
    );

    Ok(())
}

#[test]
fn test_extract_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", WRAPPED)?;

    let output = test.extract_command().args(["--dry-run", "-v"]).output()?;

    assert!(output.status.success());
    assert!(!test.root().join("locales").exists());
    let out = stdout(&output);
    assert!(out.contains("Would write"));
    assert!(out.contains("\"안녕하세요\": \"안녕하세요\""));

    Ok(())
}

#[test]
fn test_extract_csv() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", WRAPPED)?;

    let output = test
        .extract_command()
        .args(["--format", "csv", "--output", "sheets"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("sheets/extracted-translations.csv")?,
        "Key,English,Korean\nwelcome,,환영합니다\n안녕하세요,,안녕하세요\n"
    );

    Ok(())
}
