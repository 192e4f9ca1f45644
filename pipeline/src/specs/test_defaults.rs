use testutils::DefaultForTest;

use super::*;

impl DefaultForTest for Spec {
    fn default_for_test() -> Self {
        Spec::SourceFile(SourceFile::default_for_test())
    }
}

impl DefaultForTest for SourceFile {
    fn default_for_test() -> Self {
        Self {
            path: "test-default.pdf".into(),
        }
    }
}
