use testutils::DefaultForTest;

use super::*;

impl<S> DefaultForTest for GenericNode<S>
where
    S: DefaultForTest,
{
    fn default_for_test() -> Self {
        Self {
            id: NodeId::default_for_test(),
            tags: Default::default(),
            public: false,
            spec: S::default_for_test(),
        }
    }
}
