use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"));

    let content = test.read_file(".typedlessrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["nameFormat"], "camel");
    assert_eq!(parsed["exportType"], "named");
    assert_eq!(parsed["lineEnding"], "\\n");
    assert_eq!(parsed["ignores"][0], "**/node_modules/**");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".typedlessrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"));
    assert_eq!(test.read_file(".typedlessrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::with_file("app.less", ".app { color: red; }")?;

    test.command().arg("init").output()?;

    assert_cmd_snapshot!(test.generate_command("app.less"));
    assert!(test.root().join("app.less.d.ts").exists());

    Ok(())
}
