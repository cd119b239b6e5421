use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_list_different_passes_when_up_to_date() -> Result<()> {
    let test = CliTest::with_file("src/app.less", ".app-shell { display: grid; }")?;
    test.generate_command("src/**/*.less").output()?;

    assert_cmd_snapshot!(test.generate_command("src/**/*.less").arg("--list-different"));

    Ok(())
}

#[test]
fn test_list_different_reports_outdated_and_missing() -> Result<()> {
    let test = CliTest::with_file("src/a.less", ".a { color: red; }")?;
    test.write_file("src/b.less", ".b { color: red; }")?;
    test.write_file("src/c.less", ".c { color: red; }")?;
    test.write_file("src/a.less.d.ts", "export const a: string;\n")?;
    test.write_file("src/b.less.d.ts", "export const old: string;\n")?;

    assert_cmd_snapshot!(test.generate_command("src/*.less").arg("--list-different"));
    assert_eq!(test.read_file("src/b.less.d.ts")?, "export const old: string;\n");
    assert!(!test.exists("src/c.less.d.ts"));

    Ok(())
}

#[test]
fn test_list_different_respects_line_ending() -> Result<()> {
    let test = CliTest::with_file("a.less", ".a { color: red; }")?;
    test.write_file("a.less.d.ts", "export const a: string;\n")?;

    assert_cmd_snapshot!(
        test.generate_command("a.less")
            .args(["--list-different", "--line-ending", "\\r\\n"])
    );

    Ok(())
}
