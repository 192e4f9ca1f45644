use std::{
    num::{NonZeroU32, NonZeroUsize},
    path::{Path, PathBuf},
    rc::Rc,
    sync::{Arc, Mutex},
};

use generic_pipeline::node::Tag;

use crate::{
    NodeId,
    fetch::{FetchError, Fetcher},
    spec_types::{OutputPathBuf, pdf::PageRange},
    systems::BuildEnv,
    tools::{Invocation, ToolError, ToolRunner, ToolsConfig},
};

pub fn node_id(s: &str) -> NodeId {
    NodeId::test_node_id(s)
}

pub fn tag(s: &str) -> Tag {
    Tag::test_tag(s)
}

pub fn output_path_buf<P>(s: P) -> OutputPathBuf
where
    P: Into<PathBuf>,
{
    OutputPathBuf::new(s).expect("expected valid OutputPathBuf value")
}

pub fn page_number(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("expected nonzero page number")
}

pub fn page_range(first: u32, last: u32) -> PageRange {
    PageRange::new(page_number(first), page_number(last)).expect("expected valid page range")
}

/// [ToolRunner] that records invocations, and "produces" the file named by the argument
/// following `output`/`--outfile`/`--` instead of running anything.
#[derive(Clone, Default)]
pub struct FakeToolRunner {
    pub invocations: Arc<Mutex<Vec<Invocation>>>,
    /// Programs whose invocations fail without producing output.
    pub failing: Arc<Mutex<Vec<PathBuf>>>,
    /// Programs that succeed without producing output.
    pub silent: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeToolRunner {
    pub fn fail(&self, program: &str) {
        self.failing.lock().unwrap().push(program.into());
    }

    pub fn stay_silent(&self, program: &str) {
        self.silent.lock().unwrap().push(program.into());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.invocations.lock().unwrap())
            .into_iter()
            .map(|invocation| invocation.to_string())
            .collect()
    }

    fn output_of(invocation: &Invocation) -> Option<PathBuf> {
        invocation
            .args
            .windows(2)
            .find(|pair| pair[0] == "output" || pair[0] == "--outfile" || pair[0] == "--")
            .map(|pair| PathBuf::from(&pair[1]))
    }
}

impl ToolRunner for FakeToolRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        if self.failing.lock().unwrap().contains(&invocation.program) {
            return Err(ToolError::NotFound {
                program: invocation.program.clone(),
                source: which::Error::CannotFindBinaryPath,
            });
        }
        if self.silent.lock().unwrap().contains(&invocation.program) {
            return Ok(());
        }
        if let Some(output) = Self::output_of(invocation) {
            std::fs::write(&output, b"[]").expect("writing fake tool output");
        }
        Ok(())
    }
}

/// [Fetcher] that records URLs and writes a placeholder file.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    pub urls: Arc<Mutex<Vec<String>>>,
    /// Whether every fetch answers HTTP 404.
    pub failing: Arc<Mutex<bool>>,
}

impl FakeFetcher {
    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.urls.lock().unwrap())
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.urls.lock().unwrap().push(url.to_owned());
        if *self.failing.lock().unwrap() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: reqwest::StatusCode::NOT_FOUND,
            });
        }
        std::fs::write(dest, b"jar").map_err(|source| FetchError::Write {
            path: dest.to_owned(),
            source,
        })
    }
}

/// Creates a [BuildEnv] in `root` that uses the given fakes.
pub fn fake_env(
    root: &Path,
    dry_run: bool,
    runner: &FakeToolRunner,
    fetcher: &FakeFetcher,
) -> Rc<BuildEnv> {
    Rc::new(BuildEnv {
        root: root.to_owned(),
        dry_run,
        jobs: NonZeroUsize::MIN,
        tools: ToolsConfig::default(),
        runner: Box::new(runner.clone()),
        fetcher: Box::new(fetcher.clone()),
    })
}
