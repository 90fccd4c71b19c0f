use std::fs;

use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, stderr, stdout};

const GREETING: &str = r#"import { useTranslation } from "i18nexus";
export function Greeting() {
  const { t } = useTranslation();
  return <p>{t("안녕하세요")}{t("취소")}</p>;
}
"#;

fn setup() -> Result<CliTest> {
    let test = CliTest::with_file("src/Greeting.tsx", GREETING)?;
    test.write_file(
        "locales/ko.json",
        r#"{ "안녕하세요": "안녕하세요", "취소": "N/A", "옛날": "옛날" }"#,
    )?;
    test.write_file(
        "locales/en.json",
        r#"{ "안녕하세요": "Hello", "취소": "Cancel", "옛날": "Old" }"#,
    )?;
    Ok(test)
}

fn read_json(test: &CliTest, path: &str) -> Result<Value> {
    Ok(serde_json::from_str(&test.read_file(path)?)?)
}

fn backups(test: &CliTest) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(test.root().join("locales"))? {
        let name = entry?.file_name().to_string_lossy().to_string();
        if name.contains(".backup-") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[test]
fn test_clean_removes_unused_and_invalid_keys() -> Result<()> {
    let test = setup()?;

    let output = test.clean_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        read_json(&test, "locales/ko.json")?,
        json!({ "안녕하세요": "안녕하세요" })
    );
    assert_eq!(read_json(&test, "locales/en.json")?, json!({ "안녕하세요": "Hello" }));

    let out = stdout(&output);
    assert!(out.contains("Cleaned "));
    assert!(out.contains("  - 옛날"));
    assert!(out.contains("Removed (invalid value):\n  - 취소"));
    assert!(out.contains("Kept 1 of 2 used keys, removed 2"));

    let names = backups(&test)?;
    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("en.backup-"));
    assert!(names[1].starts_with("ko.backup-"));

    Ok(())
}

#[test]
fn test_clean_dry_run_writes_nothing() -> Result<()> {
    let test = setup()?;
    let before = test.read_file("locales/ko.json")?;

    let output = test.clean_command().arg("--dry-run").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("locales/ko.json")?, before);
    assert!(backups(&test)?.is_empty());
    assert!(stdout(&output).contains("Would clean "));

    Ok(())
}

#[test]
fn test_clean_no_backup() -> Result<()> {
    let test = setup()?;

    let output = test.clean_command().arg("--no-backup").output()?;

    assert!(output.status.success());
    assert!(backups(&test)?.is_empty());
    assert_eq!(read_json(&test, "locales/en.json")?, json!({ "안녕하세요": "Hello" }));

    Ok(())
}

#[test]
fn test_clean_refuses_when_a_file_fails_to_parse() -> Result<()> {
    let test = setup()?;
    test.write_file("src/Broken.tsx", "export function (")?;
    let before = test.read_file("locales/en.json")?;

    let output = test.clean_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file("locales/en.json")?, before);
    assert!(stdout(&output).contains("1 file could not be scanned; no keys were removed"));

    Ok(())
}
