//! Property tests for dependency graph ordering.

use proptest::prelude::*;

use refit::domain::entities::{DependencyGraph, EntryPoint};
use refit::domain::value_objects::FormatProperty;
use refit::error::RefitError;

/// Random DAG as an adjacency list: node `i` may only depend on nodes
/// with smaller indices, which rules out cycles by construction.
fn dag_edges() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..10).prop_flat_map(|n| {
        let nodes: Vec<BoxedStrategy<Vec<usize>>> = (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    proptest::collection::btree_set(0..i, 0..=i.min(3))
                        .prop_map(|set| set.into_iter().collect::<Vec<usize>>())
                        .boxed()
                }
            })
            .collect();
        nodes
    })
}

fn build_graph(edges: &[Vec<usize>]) -> DependencyGraph {
    let entry_points = edges.iter().enumerate().map(|(i, deps)| {
        let mut ep = EntryPoint::new(format!("pkg{i}"), format!("/nm/pkg{i}"))
            .with_format(FormatProperty::Esm5, "esm5/index.js");
        for &dep in deps {
            ep.add_dependency(format!("pkg{dep}"));
        }
        ep
    });
    DependencyGraph::from_entry_points(entry_points)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the compilation order is a permutation of the graph in
    /// which every dependency precedes its dependents.
    #[test]
    fn property_compilation_order_respects_dependencies(edges in dag_edges()) {
        let graph = build_graph(&edges);
        let order = graph.compilation_order().expect("acyclic graph must order");

        prop_assert_eq!(order.len(), edges.len());

        let position = |name: &str| order.iter().position(|ep| ep.name() == name);
        for (i, deps) in edges.iter().enumerate() {
            let dependent = position(&format!("pkg{i}")).expect("every node appears");
            for &dep in deps {
                let dependency = position(&format!("pkg{dep}")).expect("every node appears");
                prop_assert!(
                    dependency < dependent,
                    "pkg{} must come before pkg{}", dep, i
                );
            }
        }
    }

    /// PROPERTY: ordering the same graph twice yields the same order.
    #[test]
    fn property_compilation_order_is_deterministic(edges in dag_edges()) {
        let graph = build_graph(&edges);

        let first: Vec<String> = graph
            .compilation_order()
            .expect("acyclic graph must order")
            .iter()
            .map(|ep| ep.name().to_string())
            .collect();
        let second: Vec<String> = graph
            .compilation_order()
            .expect("acyclic graph must order")
            .iter()
            .map(|ep| ep.name().to_string())
            .collect();

        prop_assert_eq!(first, second);
    }

    /// PROPERTY: forcing a two-node cycle into any DAG makes ordering
    /// fail with a cycle error.
    #[test]
    fn property_cycles_are_always_detected(edges in dag_edges()) {
        let mut graph = build_graph(&edges);

        let mut a = EntryPoint::new("pkg0", "/nm/pkg0")
            .with_format(FormatProperty::Esm5, "esm5/index.js");
        a.add_dependency("pkg1");
        let mut b = EntryPoint::new("pkg1", "/nm/pkg1")
            .with_format(FormatProperty::Esm5, "esm5/index.js");
        b.add_dependency("pkg0");
        graph.insert(a);
        graph.insert(b);

        let err = graph.compilation_order().expect_err("cycle must be detected");
        prop_assert!(
            matches!(err, RefitError::CyclicDependency { .. }),
            "expected CyclicDependency, got {:?}", err
        );
    }
}
