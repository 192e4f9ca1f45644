use super::*;

impl testutils::DefaultForTest for NodeId {
    fn default_for_test() -> Self {
        Self::test_node_id("test-default-node-id")
    }
}
