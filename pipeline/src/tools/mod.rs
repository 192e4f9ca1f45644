//! External programs that do the actual work of a build, and how they are invoked.

#[cfg(test)]
mod tests;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use serde::{Deserialize, Serialize};

use crate::spec_types::pdf::{PageRange, TabulaExtractionMethod};

/// A single run of an external program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new<P>(program: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S>(mut self, arg: S) -> Self
    where
        S: Into<OsString>,
    {
        self.args.push(arg.into());
        self
    }
}

/// Formats as a shell-like command line, quoting arguments containing whitespace.
impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_shell_word(f, &self.program.to_string_lossy())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_shell_word(f, &arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn write_shell_word(f: &mut std::fmt::Formatter<'_>, word: &str) -> std::fmt::Result {
    if !word.is_empty() && !word.contains(char::is_whitespace) {
        f.write_str(word)
    } else {
        write!(f, "'{}'", word.replace('\'', r"'\''"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("program {program:?} not found")]
    NotFound {
        program: PathBuf,
        #[source]
        source: which::Error,
    },
    #[error("failed to start {program:?}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{program:?} failed with {status}")]
    Failed { program: PathBuf, status: ExitStatus },
}

/// Runs external programs to completion.
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError>;
}

/// Runs programs as child processes, located through `PATH` where not given as a path. Their
/// standard streams are inherited, so tool output reaches the terminal unchanged.
#[derive(Debug, Default)]
pub struct ProcessToolRunner;

impl ToolRunner for ProcessToolRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        let program =
            which::which(&invocation.program).map_err(|source| ToolError::NotFound {
                program: invocation.program.clone(),
                source,
            })?;

        log::debug!("Running: {invocation}");
        let status = Command::new(&program)
            .args(&invocation.args)
            .status()
            .map_err(|source| ToolError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ToolError::Failed {
                program: invocation.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// External program used to slice pages out of a PDF.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PageSlicerKind {
    #[default]
    Pdftk,
    Qpdf,
}

impl PageSlicerKind {
    fn default_program(self) -> &'static str {
        match self {
            PageSlicerKind::Pdftk => "pdftk",
            PageSlicerKind::Qpdf => "qpdf",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSlicerConfig {
    pub kind: PageSlicerKind,
    /// Program to run instead of the kind's usual program name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<PathBuf>,
}

/// Recipe-level configuration of the external programs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Java runtime used to run Tabula.
    pub java: PathBuf,
    pub page_slicer: PageSlicerConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            java: PathBuf::from("java"),
            page_slicer: PageSlicerConfig::default(),
        }
    }
}

impl ToolsConfig {
    /// Builds the command writing `pages` of `source` to `output`.
    pub fn page_slice_command(&self, source: &Path, pages: PageRange, output: &Path) -> Invocation {
        let kind = self.page_slicer.kind;
        let program = self
            .page_slicer
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from(kind.default_program()));
        let invocation = Invocation::new(program);
        match kind {
            PageSlicerKind::Pdftk => invocation
                .arg(source)
                .arg("cat")
                .arg(pages.to_string())
                .arg("output")
                .arg(output),
            PageSlicerKind::Qpdf => invocation
                .arg("--empty")
                .arg("--pages")
                .arg(source)
                .arg(pages.to_string())
                .arg("--")
                .arg(output),
        }
    }

    /// Builds the command extracting the tables of one page of `pdf` as JSON into `output`.
    pub fn tabula_command(
        &self,
        tabula_jar: &Path,
        pdf: &Path,
        page: u32,
        method: TabulaExtractionMethod,
        output: &Path,
    ) -> Invocation {
        Invocation::new(&self.java)
            .arg("-jar")
            .arg(tabula_jar)
            .arg("--pages")
            .arg(page.to_string())
            .arg(method.flag())
            .arg("--format")
            .arg("JSON")
            .arg("--outfile")
            .arg(output)
            .arg(pdf)
    }
}
