use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use googletest::prelude::*;
use map_macro::hashbrown::hash_set;
use test_casing::{TestCases, cases, test_casing};

use super::*;
use crate::{Node, spec_types::pdf, testutil::*};

const CASES: TestCases<(&'static str, Node)> = cases! {
    [
        (
            r#"
id: esp8266-technical_reference_en.pdf
type: SourceFile
spec:
  path: esp8266-technical_reference_en.pdf
            "#,
            Node {
                id: node_id("esp8266-technical_reference_en.pdf"),
                tags: Default::default(),
                public: false,
                spec: Spec::SourceFile(SourceFile {
                    path: PathBuf::from("esp8266-technical_reference_en.pdf"),
                }),
            },
        ),
        (
            r#"
id: tabula.jar
type: Fetch
spec:
  url: https://example.com/tabula.jar
  output: tools/tabula.jar
            "#,
            Node {
                id: node_id("tabula.jar"),
                tags: Default::default(),
                public: false,
                spec: Spec::Fetch(Fetch {
                    url: "https://example.com/tabula.jar".into(),
                    output: output_path_buf("tools/tabula.jar"),
                }),
            },
        ),
        (
            r#"
id: appendix.pdf
type: PageSlice
spec:
  source: manual.pdf
  pages:
    first: 113
    last: 116
  output: appendix.pdf
            "#,
            Node {
                id: node_id("appendix.pdf"),
                tags: Default::default(),
                public: false,
                spec: Spec::PageSlice(PageSlice {
                    source: node_id("manual.pdf"),
                    pages: page_range(113, 116),
                    output: output_path_buf("appendix.pdf"),
                }),
            },
        ),
        (
            r#"
id: gpio.json
public: true
tags: [peripheral/gpio]
type: TableExtract
spec:
  pdf: appendix.pdf
  tabula: tabula.jar
  page: 1
  method: stream
  output: gpio.json
            "#,
            Node {
                id: node_id("gpio.json"),
                tags: hash_set! {tag("peripheral/gpio")},
                public: true,
                spec: Spec::TableExtract(TableExtract {
                    pdf: node_id("appendix.pdf"),
                    tabula: node_id("tabula.jar"),
                    page: page_number(1),
                    method: pdf::TabulaExtractionMethod::Stream,
                    output: output_path_buf("gpio.json"),
                }),
            },
        ),
    ]
};

#[test]
fn test_cases_len() {
    assert_eq!(4, CASES.into_iter().count());
}

#[test_casing(4, CASES)]
#[gtest]
fn test_reserialise_case(input: &'static str, expected: Node) -> Result<()> {
    let got_1: Node = serde_yaml_ng::from_str(input).context("parsing input")?;
    expect_that!(got_1, eq(&expected));

    let reserialised = serde_yaml_ng::to_string(&got_1).context("reserialising")?;
    let got_2: Node = serde_yaml_ng::from_str(&reserialised).context("parsing reserialised")?;
    expect_that!(got_2, eq(&expected));

    Ok(())
}

#[gtest]
fn test_table_extract_method_defaults_to_lattice() -> Result<()> {
    let got: Node = serde_yaml_ng::from_str(
        r#"
id: spi.json
type: TableExtract
spec:
  pdf: appendix.pdf
  tabula: tabula.jar
  page: 2
  output: spi.json
"#,
    )?;

    let spec = <&TableExtract>::try_from(&got.spec)?;
    expect_that!(spec.method, eq(pdf::TabulaExtractionMethod::Lattice));
    Ok(())
}

const INVALID_CASES: TestCases<(&'static str, &'static str)> = cases! {
    [
        (
            "id: a\ntype: Fetch\nspec: {url: 'https://example.com/', output: /abs.jar}",
            "must be relative",
        ),
        (
            "id: a\ntype: PageSlice\nspec: {source: b, pages: {first: 3, last: 2}, output: a.pdf}",
            "ends before it starts",
        ),
        (
            "id: a\ntype: TableExtract\nspec: {pdf: b, tabula: c, page: 0, output: a.json}",
            "nonzero",
        ),
        (
            "id: a\ntype: SourceFile\nspec: {path: a.pdf, colour: blue}",
            "unknown field",
        ),
        (
            "id: a\ntype: SourceFile\nspec: {path: ''}",
            "source path is empty",
        ),
        (
            "id: a\ntype: PageSlice\nspec: {source: b, pages: {first: 1, last: 2}, output: ./}",
            "does not name a file",
        ),
        (
            "id: a\ntype: Compile\nspec: {}",
            "unknown variant",
        ),
    ]
};

#[test_casing(7, INVALID_CASES)]
#[gtest]
fn test_rejects_invalid(input: &'static str, message: &'static str) {
    let got: std::result::Result<Node, _> = serde_yaml_ng::from_str(input);
    expect_that!(got, err(displays_as(contains_substring(message))));
}

#[gtest]
fn test_artifact_path_and_prerequisites() {
    let slice = Spec::from(PageSlice {
        source: node_id("manual.pdf"),
        pages: page_range(1, 2),
        output: output_path_buf("out/slice.pdf"),
    });
    expect_that!(slice.artifact_path(), eq(Path::new("out/slice.pdf")));
    expect_that!(slice.prerequisites(), elements_are![eq(&&node_id("manual.pdf"))]);

    let extract = Spec::from(TableExtract {
        pdf: node_id("slice.pdf"),
        tabula: node_id("tabula.jar"),
        page: page_number(2),
        method: Default::default(),
        output: output_path_buf("table.json"),
    });
    expect_that!(
        extract.prerequisites(),
        elements_are![eq(&&node_id("slice.pdf")), eq(&&node_id("tabula.jar"))]
    );

    let source = Spec::from(SourceFile {
        path: PathBuf::from("/data/manual.pdf"),
    });
    expect_that!(source.artifact_path(), eq(Path::new("/data/manual.pdf")));
    expect_that!(source.prerequisites(), is_empty());
}

#[gtest]
fn test_wrong_spec_type() {
    let spec = Spec::from(SourceFile {
        path: PathBuf::from("manual.pdf"),
    });
    expect_that!(
        <&Fetch>::try_from(&spec),
        err(eq(&WrongSpecType {
            expected: SpecDiscriminants::Fetch,
            got: SpecDiscriminants::SourceFile,
        }))
    );
    expect_that!(
        <&Fetch>::try_from(&spec).map(|_| ()).map_err(|err| err.to_string()),
        err(eq("node spec is not of type Fetch, got SourceFile"))
    );
}
