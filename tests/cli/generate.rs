use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{COMPLEX_LESS, CliTest, DASHES_LESS, RESERVED_LESS};

#[test]
fn test_generate_named_definitions() -> Result<()> {
    let test = CliTest::with_file("src/complex.less", COMPLEX_LESS)?;

    assert_cmd_snapshot!(test.generate_command("src/**/*.less"));
    assert_eq!(
        test.read_file("src/complex.less.d.ts")?,
        "export const someStyles: string;\nexport const nestedClass: string;\nexport const nestedAnother: string;\n"
    );

    Ok(())
}

#[test]
fn test_generate_default_export_keeps_names() -> Result<()> {
    let test = CliTest::with_file("dashes.less", DASHES_LESS)?;

    assert_cmd_snapshot!(
        test.generate_command("dashes.less")
            .args(["--export-type", "default", "--name-format", "none"])
    );
    assert_eq!(
        test.read_file("dashes.less.d.ts")?,
        "export interface Styles {\n  'App': string;\n  'Logo': string;\n  'App-Header': string;\n}\n\nexport type ClassNames = keyof Styles;\n\ndeclare const styles: Styles;\n\nexport default styles;\n"
    );

    Ok(())
}

#[test]
fn test_generate_dashes_name_format() -> Result<()> {
    let test = CliTest::with_file("dashes.less", DASHES_LESS)?;

    assert_cmd_snapshot!(test.generate_command("dashes.less").args(["--name-format", "dashes"]));
    assert_eq!(
        test.read_file("dashes.less.d.ts")?,
        "export const App: string;\nexport const Logo: string;\nexport const appHeader: string;\n"
    );

    Ok(())
}

#[test]
fn test_generate_values_export() -> Result<()> {
    let test = CliTest::with_file("styles/theme.less", ".primary-color { color: red; }")?;

    assert_cmd_snapshot!(test.generate_command("styles").args(["--export-type", "values"]));
    assert_eq!(
        test.read_file("styles/theme.const.ts")?,
        "export const primaryColor = \"primary-color\";\n"
    );

    Ok(())
}

#[test]
fn test_generate_values_export_skips_invalid_names() -> Result<()> {
    let test = CliTest::with_file("reserved.less", RESERVED_LESS)?;

    assert_cmd_snapshot!(
        test.generate_command("reserved.less")
            .args(["--export-type", "values", "--name-format", "none"])
    );
    assert_eq!(
        test.read_file("reserved.const.ts")?,
        "export const button = \"button\";\n"
    );

    Ok(())
}

#[test]
fn test_generate_skips_reserved_keywords_with_warning() -> Result<()> {
    let test = CliTest::with_file("reserved.less", RESERVED_LESS)?;

    assert_cmd_snapshot!(test.generate_command("reserved.less"));
    assert_eq!(
        test.read_file("reserved.less.d.ts")?,
        "export const button: string;\nexport const primaryButton: string;\n"
    );

    Ok(())
}

#[test]
fn test_generate_kebab_skips_dashed_names() -> Result<()> {
    let test = CliTest::with_file("reserved.less", RESERVED_LESS)?;

    assert_cmd_snapshot!(test.generate_command("reserved.less").args(["--name-format", "kebab"]));
    assert_eq!(test.read_file("reserved.less.d.ts")?, "export const button: string;\n");

    Ok(())
}

#[test]
fn test_generate_file_without_classes() -> Result<()> {
    let test = CliTest::with_file("base.less", "body { margin: 0; }\nh1 { font-size: 2em; }")?;

    assert_cmd_snapshot!(test.generate_command("base.less"));
    assert!(!test.exists("base.less.d.ts"));

    Ok(())
}

#[test]
fn test_generate_reports_compile_errors() -> Result<()> {
    let test = CliTest::with_file("src/broken.less", ".a { color: red;")?;
    test.write_file("src/fine.less", ".fine { color: red; }")?;

    assert_cmd_snapshot!(test.generate_command("src/*.less"));
    assert!(test.exists("src/fine.less.d.ts"));
    assert!(!test.exists("src/broken.less.d.ts"));

    Ok(())
}

#[test]
fn test_generate_reports_missing_imports() -> Result<()> {
    let test = CliTest::with_file("app.less", "@import 'missing';\n.app { color: red; }")?;

    assert_cmd_snapshot!(test.generate_command("app.less"));
    assert!(!test.exists("app.less.d.ts"));

    Ok(())
}

#[test]
fn test_generate_uses_config_file() -> Result<()> {
    let test = CliTest::with_file("card.less", ".card-title { font-weight: bold; }")?;
    test.write_file(
        ".typedlessrc.json",
        r#"{ "exportType": "values", "nameFormat": "dashes", "lineEnding": "\\r\\n" }"#,
    )?;

    assert_cmd_snapshot!(test.generate_command("card.less"));
    assert_eq!(
        test.read_file("card.const.ts")?,
        "export const cardTitle = \"card-title\";\r\n"
    );

    Ok(())
}

#[test]
fn test_cli_flags_override_config_file() -> Result<()> {
    let test = CliTest::with_file("card.less", ".card-title { font-weight: bold; }")?;
    test.write_file(".typedlessrc.json", r#"{ "exportType": "values" }"#)?;

    assert_cmd_snapshot!(
        test.generate_command("card.less")
            .args(["--export-type", "named", "--line-ending", "\\r\\n"])
    );
    assert_eq!(test.read_file("card.less.d.ts")?, "export const cardTitle: string;\r\n");
    assert!(!test.exists("card.const.ts"));

    Ok(())
}

#[test]
fn test_generate_ignores_node_modules() -> Result<()> {
    let test = CliTest::with_file("node_modules/lib/vendor.less", ".vendor { color: red; }")?;
    test.write_file("app.less", ".app { color: red; }")?;

    assert_cmd_snapshot!(test.generate_command("**/*.less"));
    assert!(!test.exists("node_modules/lib/vendor.less.d.ts"));

    Ok(())
}

#[test]
fn test_generate_verbose_notes_ignored_files() -> Result<()> {
    let test = CliTest::with_file("node_modules/lib/vendor.less", ".vendor { color: red; }")?;
    test.write_file("app.less", ".app { color: red; }")?;
    test.write_file("app.less.d.ts", "export const app: string;\n")?;

    assert_cmd_snapshot!(
        test.generate_command("**/*.less")
            .args(["--list-different", "--verbose"])
    );

    Ok(())
}

#[test]
fn test_generate_without_matching_files() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.generate_command("src/**/*.less"));

    Ok(())
}

#[test]
fn test_generate_rejects_unknown_export_type() -> Result<()> {
    let test = CliTest::with_file("app.less", ".app { color: red; }")?;

    assert_cmd_snapshot!(test.generate_command("app.less").args(["--export-type", "invalid"]));
    assert!(!test.exists("app.less.d.ts"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file("app.less", ".app { color: red; }")?;
    test.write_file(".typedlessrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    assert_cmd_snapshot!(test.generate_command("app.less"));
    assert!(!test.exists("app.less.d.ts"));

    Ok(())
}
