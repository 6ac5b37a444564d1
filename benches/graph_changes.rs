use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

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

fn bench_apply_node_changes(c: &mut Criterion) {
    let nodes = nodes_from(1_000);
    let moves: Vec<NodeChange> = (0..1_000)
        .map(|i| NodeChange::Move {
            id: NodeId::from(format!("n{i}").as_str()),
            position: Position::new(i as f64, i as f64),
        })
        .collect();
    let removes: Vec<NodeChange> = (0..500)
        .map(|i| NodeChange::Remove {
            id: NodeId::from(format!("n{}", i * 2).as_str()),
        })
        .collect();

    c.bench_function("apply_1000_moves_to_1000_nodes", |b| {
        b.iter_batched(
            || nodes.clone(),
            |nodes| apply_node_changes(&moves, nodes),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("remove_500_of_1000_nodes", |b| {
        b.iter_batched(
            || nodes.clone(),
            |nodes| apply_node_changes(&removes, nodes),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_apply_node_changes);
criterion_main!(benches);
