use std::path::Path;

use googletest::prelude::*;

use super::*;
use crate::testutil::page_range;

fn args_of(invocation: &Invocation) -> Vec<String> {
    invocation
        .args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[gtest]
fn test_pdftk_command() {
    let tools = ToolsConfig::default();

    let got = tools.page_slice_command(
        Path::new("manual.pdf"),
        page_range(113, 116),
        Path::new("appendix.pdf"),
    );

    expect_that!(got.program, eq(Path::new("pdftk")));
    expect_that!(
        args_of(&got),
        elements_are![
            eq("manual.pdf"),
            eq("cat"),
            eq("113-116"),
            eq("output"),
            eq("appendix.pdf")
        ]
    );
}

#[gtest]
fn test_qpdf_command_with_program_override() {
    let tools = ToolsConfig {
        page_slicer: PageSlicerConfig {
            kind: PageSlicerKind::Qpdf,
            program: Some(PathBuf::from("/opt/qpdf/bin/qpdf")),
        },
        ..Default::default()
    };

    let got = tools.page_slice_command(
        Path::new("manual.pdf"),
        page_range(2, 3),
        Path::new("out.pdf"),
    );

    expect_that!(got.program, eq(Path::new("/opt/qpdf/bin/qpdf")));
    expect_that!(
        args_of(&got),
        elements_are![
            eq("--empty"),
            eq("--pages"),
            eq("manual.pdf"),
            eq("2-3"),
            eq("--"),
            eq("out.pdf")
        ]
    );
}

#[gtest]
fn test_tabula_command() {
    let tools = ToolsConfig::default();

    let got = tools.tabula_command(
        Path::new("tabula.jar"),
        Path::new("appendix.pdf"),
        3,
        TabulaExtractionMethod::Lattice,
        Path::new("uart.json"),
    );

    expect_that!(
        got.to_string(),
        eq("java -jar tabula.jar --pages 3 --lattice --format JSON --outfile uart.json appendix.pdf")
    );
}

#[gtest]
fn test_display_quotes_whitespace() {
    let got = Invocation::new("pdftk")
        .arg("my manual.pdf")
        .arg("")
        .arg("it's");

    expect_that!(got.to_string(), eq("pdftk 'my manual.pdf' '' it's"));
}

#[gtest]
fn test_tools_config_yaml_defaults() -> anyhow::Result<()> {
    let got: ToolsConfig = serde_yaml_ng::from_str("page_slicer: {kind: qpdf}")?;

    expect_that!(
        got,
        eq(&ToolsConfig {
            java: PathBuf::from("java"),
            page_slicer: PageSlicerConfig {
                kind: PageSlicerKind::Qpdf,
                program: None,
            },
        })
    );
    Ok(())
}

#[test]
fn test_process_runner_program_not_found() {
    let got = ProcessToolRunner.run(&Invocation::new("tabslice-no-such-program-xyzzy"));

    assert!(
        matches!(got, Err(ToolError::NotFound { .. })),
        "got {got:?}"
    );
}
