use std::f32::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use mindmap_layout::config::parse_config;
use mindmap_layout::layout::{
    DragSession, DragOutcome, LayoutTree, NodeSizer, Point, apply_sizes, assign_positions,
    build_tree, resolve_collisions,
};
use mindmap_layout::layout_dump::LayoutDump;
use mindmap_layout::{
    HeuristicMetrics, LayoutConfig, LayoutResult, Paradigm, PositionOverrides, SourceNode, Theme,
    compute_layout, parse_tree, route_edges,
};

const PARADIGMS: [Paradigm; 5] = [
    Paradigm::Radial,
    Paradigm::HorizontalRight,
    Paradigm::HorizontalLeft,
    Paradigm::Vertical,
    Paradigm::Balanced,
];

fn fixture(name: &str) -> SourceNode {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_tree(&input).expect("fixture parse failed")
}

fn layout(source: &SourceNode, paradigm: Paradigm) -> LayoutResult<'_> {
    let config = LayoutConfig::default().with_paradigm(paradigm);
    compute_layout(source, &Theme::mermaid_default(), &config, &HeuristicMetrics)
}

fn center_of(result: &LayoutResult<'_>, id: &str) -> Point {
    let idx = result.tree.find(id).expect("node missing");
    result.node_rect(idx, &PositionOverrides::new()).center()
}

#[test]
fn repeated_runs_are_byte_identical() {
    let source = fixture("project.json5");
    let theme = Theme::mermaid_default();
    for paradigm in PARADIGMS {
        let config = LayoutConfig::default().with_paradigm(paradigm);
        let dump = || {
            let result = compute_layout(&source, &theme, &config, &HeuristicMetrics);
            let overrides = PositionOverrides::new();
            let edges = route_edges(&result, &theme, &config, &overrides);
            serde_json::to_string(&LayoutDump::from_layout(&result, &edges, &overrides)).unwrap()
        };
        assert_eq!(dump(), dump(), "{paradigm:?}");
    }
}

#[test]
fn child_depth_is_parent_depth_plus_one() {
    let source = fixture("project.json5");
    for paradigm in PARADIGMS {
        let result = layout(&source, paradigm);
        for node in result.nodes() {
            match node.parent {
                Some(parent) => assert_eq!(node.depth, result.tree.node(parent).depth + 1),
                None => assert_eq!(node.depth, 0),
            }
        }
    }
}

#[test]
fn every_node_lies_inside_the_canvas() {
    for name in ["project.json5", "lopsided.json5"] {
        let source = fixture(name);
        for paradigm in PARADIGMS {
            let result = layout(&source, paradigm);
            let overrides = PositionOverrides::new();
            for idx in result.tree.indices() {
                let rect = result.node_rect(idx, &overrides);
                assert!(rect.x >= -1e-3 && rect.y >= -1e-3, "{name} {paradigm:?}");
                assert!(rect.right() <= result.width + 1e-3, "{name} {paradigm:?}");
                assert!(rect.bottom() <= result.height + 1e-3, "{name} {paradigm:?}");
            }
        }
    }
}

fn packing_order(tree: &LayoutTree<'_>, paradigm: Paradigm) -> Vec<Vec<String>> {
    let root_x = tree.root().center().x;
    let mut groups: Vec<Vec<String>> = Vec::new();
    for level in tree.levels() {
        for right_side in [true, false] {
            let mut group: Vec<_> = level
                .iter()
                .filter(|idx| (tree.node(**idx).center().x >= root_x) == right_side)
                .copied()
                .collect();
            group.sort_by(|a, b| {
                let (na, nb) = (tree.node(*a), tree.node(*b));
                let (ka, kb) = if paradigm == Paradigm::Vertical {
                    (na.x, nb.x)
                } else {
                    (na.y, nb.y)
                };
                ka.total_cmp(&kb).then(a.cmp(b))
            });
            groups.push(group.iter().map(|idx| tree.node(*idx).id.clone()).collect());
        }
    }
    groups
}

#[test]
fn collision_resolution_never_reorders_a_level() {
    let theme = Theme::mermaid_default();
    for name in ["project.json5", "lopsided.json5"] {
        let source = fixture(name);
        for paradigm in PARADIGMS.into_iter().filter(|p| *p != Paradigm::Radial) {
            let config = LayoutConfig::default().with_paradigm(paradigm);
            let sizer = NodeSizer::new(&HeuristicMetrics, &theme, &config);
            let placed = assign_positions(
                paradigm,
                apply_sizes(build_tree(&source, None), &sizer),
                &config,
            );
            let before = packing_order(&placed, paradigm);
            let resolved = resolve_collisions(placed, paradigm, &config);
            assert_eq!(before, packing_order(&resolved, paradigm), "{name} {paradigm:?}");
        }
    }
}

fn generated(branching: usize, depth: usize, prefix: &str) -> SourceNode {
    let children = if depth == 0 {
        Vec::new()
    } else {
        (0..branching)
            .map(|i| generated(branching, depth - 1, &format!("{prefix}.{i}")))
            .collect()
    };
    SourceNode::new(prefix, format!("branch {prefix} with a long label")).with_children(children)
}

/// Child centres around each parent's centre, read cyclically from the
/// first child, must increase in source order.
fn assert_cyclic_child_order(tree: &LayoutTree<'_>, label: &str) {
    for idx in tree.indices() {
        let node = tree.node(idx);
        if node.children.len() < 2 {
            continue;
        }
        let center = node.center();
        let angles: Vec<f32> = node
            .children
            .iter()
            .map(|c| {
                let c = tree.node(*c).center();
                (c.y - center.y).atan2(c.x - center.x)
            })
            .collect();
        let relative: Vec<f32> = angles
            .iter()
            .map(|a| (a - angles[0]).rem_euclid(TAU))
            .collect();
        assert!(
            relative.windows(2).all(|w| w[0] < w[1]),
            "{label}: children of {} out of order: {relative:?}",
            node.id
        );
    }
}

#[test]
fn radial_children_follow_source_order_around_parent() {
    let theme = Theme::mermaid_default();
    let config = LayoutConfig::default().with_paradigm(Paradigm::Radial);
    let sizer = NodeSizer::new(&HeuristicMetrics, &theme, &config);

    let cases = [
        ("project", fixture("project.json5")),
        ("flat", generated(30, 1, "r")),
        ("deep", generated(4, 3, "r")),
    ];
    for (label, source) in &cases {
        let placed = assign_positions(
            Paradigm::Radial,
            apply_sizes(build_tree(source, None), &sizer),
            &config,
        );
        let before: Vec<(f32, f32)> = placed
            .indices()
            .map(|i| (placed.node(i).x, placed.node(i).y))
            .collect();
        let resolved = resolve_collisions(placed, Paradigm::Radial, &config);
        let moved = resolved
            .indices()
            .zip(&before)
            .filter(|(i, (x, y))| {
                let node = resolved.node(*i);
                (node.x - x).abs() > 1e-3 || (node.y - y).abs() > 1e-3
            })
            .count();
        if *label != "project" {
            assert!(moved > 0, "{label}: crowded rings should need pushes");
        }
        assert_cyclic_child_order(&resolved, label);
    }

    // The full pipeline only translates, so the order survives into the result.
    let result = compute_layout(&cases[1].1, &theme, &config, &HeuristicMetrics);
    assert_cyclic_child_order(&result.tree, "flat pipeline");
}

#[test]
fn four_children_split_the_circle_evenly() {
    let source = SourceNode::new("root", "Root")
        .with_children(["n", "e", "s", "w"].map(|id| SourceNode::new(id, id)));
    let result = layout(&source, Paradigm::Radial);
    let angles: Vec<f32> = result
        .tree
        .root()
        .children
        .iter()
        .map(|c| result.tree.node(*c).angle.unwrap())
        .collect();
    for pair in angles.windows(2) {
        assert!((pair[1] - pair[0] - FRAC_PI_2).abs() < 1e-4, "{angles:?}");
    }

    let chain = SourceNode::new("r", "r").with_children([SourceNode::new("a", "a")
        .with_children([SourceNode::new("b", "b")
            .with_children([SourceNode::new("c", "c")])])]);
    let result = layout(&chain, Paradigm::Radial);
    let origin = center_of(&result, "r");
    let radii: Vec<f32> = ["a", "b", "c"]
        .iter()
        .map(|id| {
            let c = center_of(&result, id);
            (c.x - origin.x).hypot(c.y - origin.y)
        })
        .collect();
    assert!(radii[0] > 0.0 && radii[0] < radii[1] && radii[1] < radii[2], "{radii:?}");
}

#[test]
fn horizontal_columns_and_sibling_order() {
    let source = SourceNode::new("root", "Root").with_children([SourceNode::new("a", "A")
        .with_children([SourceNode::new("b", "B"), SourceNode::new("c", "C")])]);
    let config = LayoutConfig::default();
    let result = layout(&source, Paradigm::HorizontalRight);
    let node = |id: &str| result.node_by_id(id).unwrap();
    assert_eq!(node("a").x, node("root").x + config.horizontal_spacing + 80.0);
    assert!(node("b").y < node("c").y);
}

#[test]
fn balanced_split_weighs_subtrees_not_positions() {
    let source = fixture("lopsided.json5");
    let result = layout(&source, Paradigm::Balanced);
    let root_x = center_of(&result, "root").x;
    assert!(center_of(&result, "big").x > root_x);
    assert!(center_of(&result, "leaf").x < root_x);
    for i in 0..10 {
        assert!(center_of(&result, &format!("b{i}")).x > root_x);
    }

    // Alternating would put the second leaf next to the big subtree.
    let source = SourceNode::new("root", "Root").with_children([
        SourceNode::new("big", "Big")
            .with_children((0..10).map(|i| SourceNode::new(format!("b{i}"), "x"))),
        SourceNode::new("l1", "L1"),
        SourceNode::new("l2", "L2"),
    ]);
    let result = layout(&source, Paradigm::Balanced);
    let root_x = center_of(&result, "root").x;
    assert!(center_of(&result, "big").x > root_x);
    assert!(center_of(&result, "l1").x < root_x);
    assert!(center_of(&result, "l2").x < root_x);
}

#[test]
fn dragging_a_leaf_past_its_sibling_is_refused() {
    let source = SourceNode::new("root", "Root")
        .with_children(["a", "b", "c", "d"].map(|id| SourceNode::new(id, id)));
    let result = layout(&source, Paradigm::Radial);
    let (a, b) = (center_of(&result, "a"), center_of(&result, "b"));

    let mut session = DragSession::new(&result);
    assert!(session.pointer_down("a", Point::new(0.0, 0.0)));
    let swap = Point::new(2.0 * (b.x - a.x), 2.0 * (b.y - a.y));
    assert_eq!(session.pointer_move(swap), DragOutcome::Rejected);
    assert!(session.overrides().is_empty());
}

#[test]
fn collapsed_node_hides_descendants_and_their_edges() {
    let source = fixture("project.json5");
    let result = layout(&source, Paradigm::HorizontalRight);
    let ideas = result.node_by_id("ideas").unwrap();
    assert!(ideas.children.is_empty());
    assert!(result.node_by_id("later").is_none());
    assert!(result.edges.iter().all(|e| !e.id.contains("later")));
    assert_eq!(result.edges.len(), result.nodes().len() - 1);
}

#[test]
fn config_file_drives_paradigm_and_edge_styling() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("config.json5");
    let config = parse_config(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(config.layout.paradigm, Paradigm::Balanced);

    let source = fixture("project.json5");
    let result = compute_layout(&source, &config.theme, &config.layout, &HeuristicMetrics);
    assert_eq!(result.paradigm, Paradigm::Balanced);
    let edges = route_edges(&result, &config.theme, &config.layout, &PositionOverrides::new());
    assert_eq!(edges.len(), result.edges.len());
    for edge in &edges {
        assert!(edge.path.starts_with("M ") && edge.path.contains(" C "));
        assert_eq!(edge.dash, Some("8 4"));
        assert_eq!(
            edge.color,
            config.theme.level_colors[(edge.depth - 1) % config.theme.level_colors.len()]
        );
    }
}

#[test]
fn routed_edges_follow_overrides() {
    let source = fixture("project.json5");
    let theme = Theme::mermaid_default();
    let config = LayoutConfig::default().with_paradigm(Paradigm::Vertical);
    let result = compute_layout(&source, &theme, &config, &HeuristicMetrics);
    let mut overrides = PositionOverrides::new();
    let plain = route_edges(&result, &theme, &config, &overrides);
    overrides.insert("launch".to_string(), Point::new(900.0, 700.0));
    let moved = route_edges(&result, &theme, &config, &overrides);

    let index = result.edges.iter().position(|e| e.id == "root->launch").unwrap();
    assert_ne!(plain[index].path, moved[index].path);
    let launch = result.node_by_id("launch").unwrap();
    assert!((moved[index].end.point.x - (900.0 + launch.width / 2.0)).abs() < 1e-3);
    for (i, (a, b)) in plain.iter().zip(&moved).enumerate() {
        if i != index {
            assert_eq!(a.path, b.path);
        }
    }
}
