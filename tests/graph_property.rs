use proptest::prelude::*;

use launchloom::graph::{apply_node_changes, NodeChange};
use launchloom::node::Node;
use launchloom::types::{NodeId, Position};

fn nodes_from(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let mut node = Node::source(format!("acme/repo{i}"), Position::default());
            node.id = NodeId::from(format!("n{i}").as_str());
            node
        })
        .collect()
}

proptest! {
    #[test]
    fn empty_batch_is_identity(count in 0usize..50) {
        let nodes = nodes_from(count);
        let result = apply_node_changes(&[], nodes.clone());
        prop_assert_eq!(result, nodes);
    }

    #[test]
    fn removal_keeps_survivors_in_relative_order(mask in proptest::collection::vec(any::<bool>(), 0..40)) {
        let nodes = nodes_from(mask.len());
        let changes: Vec<NodeChange> = mask
            .iter()
            .enumerate()
            .filter(|(_, remove)| **remove)
            .map(|(i, _)| NodeChange::Remove { id: NodeId::from(format!("n{i}").as_str()) })
            .collect();

        let result = apply_node_changes(&changes, nodes);
        let expected: Vec<String> = mask
            .iter()
            .enumerate()
            .filter(|(_, remove)| !**remove)
            .map(|(i, _)| format!("n{i}"))
            .collect();
        let actual: Vec<String> = result.iter().map(|n| n.id.to_string()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn moves_never_change_membership_or_order(
        count in 1usize..30,
        moves in proptest::collection::vec((0usize..30, -500.0f64..500.0, -500.0f64..500.0), 0..60),
    ) {
        let nodes = nodes_from(count);
        let changes: Vec<NodeChange> = moves
            .iter()
            .map(|(i, x, y)| NodeChange::Move {
                id: NodeId::from(format!("n{}", i % count).as_str()),
                position: Position::new(*x, *y),
            })
            .collect();

        let result = apply_node_changes(&changes, nodes.clone());
        prop_assert_eq!(result.len(), nodes.len());
        for (before, after) in nodes.iter().zip(result.iter()) {
            prop_assert_eq!(&before.id, &after.id);
        }
    }

    #[test]
    fn batches_apply_idempotently(mask in proptest::collection::vec(any::<bool>(), 1..30)) {
        let nodes = nodes_from(mask.len());
        let changes: Vec<NodeChange> = mask
            .iter()
            .enumerate()
            .filter(|(_, remove)| **remove)
            .map(|(i, _)| NodeChange::Remove { id: NodeId::from(format!("n{i}").as_str()) })
            .collect();

        let once = apply_node_changes(&changes, nodes);
        let twice = apply_node_changes(&changes, once.clone());
        prop_assert_eq!(once, twice);
    }
}
