

use route_mapper::graph_utils::graph::GraphRegistry;
use route_mapper::graph_utils::interaction::{InteractionMode, InteractionOutcome};
use route_mapper::persistence::persist;
use route_mapper::persistence::settings::AppSettings;
use route_mapper::persistence::text_format::{self, ImportError, Section};

const EMPTY_DOC: &str = "0\n0\n0\n\n\n\n\n";

fn new_graph() -> GraphRegistry {
    GraphRegistry::new()
}

// Two nodes centred on (20,20) and (50,50), one edge, one route mark
fn sample_graph() -> GraphRegistry {
    let mut g = new_graph();
    let a = g.create_node(5, 5);
    let b = g.create_node(35, 35);
    assert!(g.connect(a, b));
    g.interact(a, InteractionMode::MarkRoute);
    g.interact(b, InteractionMode::MarkRoute);
    g
}

fn temp_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("route-mapper-tests-{}", std::process::id()))
        .join(name)
}

#[test]
fn graph_ids_are_sequential_from_zero() {
    let mut g = new_graph();
    let ids: Vec<_> = (0..5).map(|i| g.create_node(i * 40, 10)).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    for (pos, node) in g.nodes().iter().enumerate() {
        assert_eq!(node.id, pos);
    }

    // Clearing restarts numbering
    g.clear();
    assert_eq!(g.create_node(1, 1), 0);
}

#[test]
fn graph_connect_is_symmetric_and_weighted() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(30, 40);
    assert!(g.connect(a, b));
    assert_eq!(g.distance(a, b), Some(50.0));
    assert_eq!(g.distance(b, a), Some(50.0));
    assert_eq!(g.edges(), &[(a, b)]);
}

#[test]
fn graph_duplicate_connect_is_rejected() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(10, 0);
    assert!(g.connect(a, b));
    assert!(!g.connect(a, b), "second connect should fail");
    assert!(!g.connect(b, a), "reverse orientation is the same edge");
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn graph_self_and_unknown_connects_fail_without_side_effects() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    assert!(!g.connect(a, a));
    assert!(!g.connect(a, 7));
    assert!(g.node(a).unwrap().connections.is_empty());
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn graph_disconnect_removes_both_sides_and_record() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(10, 0);
    let c = g.create_node(20, 0);
    assert!(g.connect(a, b));
    assert!(g.connect(b, c));

    assert!(g.disconnect(b, a));
    assert_eq!(g.distance(a, b), None);
    assert_eq!(g.distance(b, a), None);
    assert_eq!(g.edges(), &[(b, c)]);

    // Not connected anymore
    assert!(!g.disconnect(a, b));
    // Pair can be connected again afterwards
    assert!(g.connect(a, b));
}

#[test]
fn graph_clear_is_idempotent_and_exports_empty_document() {
    let mut g = sample_graph();
    g.interact(0, InteractionMode::ConfirmAndRelease);
    g.clear();
    g.clear();
    assert!(g.is_empty());
    assert_eq!(g.edge_count(), 0);
    assert!(g.routes().is_empty());
    assert_eq!(g.selected(), None);
    assert_eq!(g.route_start(), None);
    assert_eq!(text_format::export(&g), EMPTY_DOC);
    assert_eq!(text_format::export(&new_graph()), EMPTY_DOC);
}

#[test]
fn graph_node_at_prefers_latest_node() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(20, 20);
    assert_eq!(g.node_at(5, 5), Some(a));
    assert_eq!(g.node_at(25, 25), Some(b));
    assert_eq!(g.node_at(49, 49), Some(b));
    assert_eq!(g.node_at(50, 50), None);
}

#[test]
fn graph_handles_coordinates_at_i32_limits() {
    let mut g = new_graph();
    let lo = g.create_node(i32::MIN, 0);
    let hi = g.create_node(i32::MAX - 10, 0);
    assert!(g.connect(lo, hi));
    let expected = f64::from(i32::MAX - 10) - f64::from(i32::MIN);
    assert!((g.distance(lo, hi).unwrap() - expected).abs() < 1e-6);

    assert_eq!(g.node_at(i32::MAX, 0), Some(hi));
    assert_eq!(g.node_at(i32::MIN, 29), Some(lo));
    assert_eq!(g.node_at(i32::MIN, 30), None);
}

#[test]
fn select_connect_then_new_selection() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(30, 40);

    assert_eq!(g.interact(a, InteractionMode::ConfirmAndRelease), InteractionOutcome::Selected(a));
    assert_eq!(
        g.interact(b, InteractionMode::ConfirmAndRelease),
        InteractionOutcome::Connected { from: a, to: b, distance: 50.0 }
    );
    assert_eq!(g.selected(), None);
    assert_eq!(g.edge_count(), 1);

    // Machine is idle again, so this is a fresh selection and not a cancel
    assert_eq!(g.interact(a, InteractionMode::ConfirmAndRelease), InteractionOutcome::Selected(a));
    assert_eq!(g.selected(), Some(a));
}

#[test]
fn select_continue_chains_connections() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(100, 0);
    let c = g.create_node(100, 100);

    g.interact(a, InteractionMode::ConfirmAndContinue);
    g.interact(b, InteractionMode::ConfirmAndContinue);
    assert_eq!(g.selected(), Some(b));
    g.interact(c, InteractionMode::ConfirmAndContinue);
    assert_eq!(g.selected(), Some(c));
    assert_eq!(g.edges(), &[(a, b), (b, c)]);
}

#[test]
fn select_same_node_twice_deselects() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    g.interact(a, InteractionMode::ConfirmAndRelease);
    assert_eq!(g.interact(a, InteractionMode::ConfirmAndRelease), InteractionOutcome::Deselected(a));
    assert_eq!(g.selected(), None);
}

#[test]
fn select_rejected_connect_keeps_selection() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(10, 10);
    assert!(g.connect(a, b));

    g.interact(a, InteractionMode::ConfirmAndRelease);
    assert_eq!(
        g.interact(b, InteractionMode::ConfirmAndRelease),
        InteractionOutcome::ConnectRejected { from: a, to: b }
    );
    assert_eq!(g.selected(), Some(a));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn route_marking_pairs_nodes_without_connecting() {
    let mut g = new_graph();
    let a = g.create_node(0, 0);
    let b = g.create_node(200, 0);

    assert_eq!(g.interact(a, InteractionMode::MarkRoute), InteractionOutcome::RouteStarted(a));
    // Clicking the pending start again changes nothing
    assert_eq!(g.interact(a, InteractionMode::MarkRoute), InteractionOutcome::Ignored);
    assert_eq!(g.route_start(), Some(a));

    assert_eq!(g.interact(b, InteractionMode::MarkRoute), InteractionOutcome::RouteMarked { from: a, to: b });
    assert_eq!(g.route_start(), None);
    assert_eq!(g.routes().as_slice(), &[(a, b)]);
    assert_eq!(g.edge_count(), 0);

    let ma = g.node(a).unwrap().marker;
    assert!(ma.is_some());
    assert_eq!(ma, g.node(b).unwrap().marker);
}

#[test]
fn cancel_drops_pending_state_only() {
    let mut g = sample_graph();
    let c = g.create_node(100, 100);
    g.interact(0, InteractionMode::ConfirmAndRelease);
    g.interact(c, InteractionMode::MarkRoute);

    assert_eq!(g.interact(c, InteractionMode::Cancel), InteractionOutcome::Cancelled);
    assert_eq!(g.selected(), None);
    assert_eq!(g.route_start(), None);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.routes().len(), 1);

    // Nothing left to cancel
    assert_eq!(g.cancel_pending(), InteractionOutcome::Ignored);
}

#[test]
fn interact_with_unknown_node_is_ignored() {
    let mut g = new_graph();
    assert_eq!(g.interact(3, InteractionMode::ConfirmAndRelease), InteractionOutcome::Ignored);
    assert_eq!(g.interact(3, InteractionMode::MarkRoute), InteractionOutcome::Ignored);
    assert_eq!(g.selected(), None);
}

#[test]
fn export_writes_counts_routes_centres_and_edges() {
    let g = sample_graph();
    assert_eq!(text_format::export(&g), "1\n2\n1\n\n0\t1\n\n20\t20\n50\t50\n\n0\t1\n\n");
}

#[test]
fn export_import_round_trip_is_byte_identical() {
    let mut g = new_graph();
    let coords = [(10, 10), (120, 40), (60, 200), (300, 5)];
    for (x, y) in coords {
        g.create_node(x, y);
    }
    assert!(g.connect(0, 1));
    assert!(g.connect(2, 1));
    assert!(g.connect(3, 0));
    for id in [0, 2, 3, 1] {
        g.interact(id, InteractionMode::MarkRoute);
    }
    let first = text_format::export(&g);

    let mut copy = new_graph();
    text_format::import(&mut copy, &first).expect("round trip import");
    let positions: Vec<_> = copy.nodes().iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(positions, coords.to_vec());
    assert_eq!(copy.edges(), g.edges());
    assert_eq!(copy.routes().as_slice(), g.routes().as_slice());
    assert_eq!(text_format::export(&copy), first);
}

#[test]
fn import_recentres_nodes_and_weights_edges() {
    let mut g = new_graph();
    // Edge section running to end of input, as older files were written
    text_format::import(&mut g, "0\n2\n1\n\n\n20\t20\n50\t50\n\n0\t1\n").expect("import ok");
    assert_eq!(g.node_count(), 2);
    let pos: Vec<_> = g.nodes().iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(pos, vec![(5, 5), (35, 35)]);
    assert_eq!(g.edge_count(), 1);
    let d = g.distance(0, 1).expect("connected");
    assert!((d - 1800f64.sqrt()).abs() < 1e-9);
    assert_eq!(format!("{:.2}", d), "42.43");
}

#[test]
fn import_replaces_existing_graph() {
    let mut g = sample_graph();
    g.create_node(400, 400);
    text_format::import(&mut g, "0\n1\n0\n\n\n15\t15\n\n").expect("import ok");
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 0);
    assert!(g.routes().is_empty());
    assert_eq!((g.nodes()[0].x, g.nodes()[0].y), (0, 0));
}

#[test]
fn import_route_marks_share_a_marker() {
    let mut g = new_graph();
    text_format::import(&mut g, "1\n2\n0\n\n0\t1\n\n20\t20\n50\t50\n\n").expect("import ok");
    assert_eq!(g.routes().as_slice(), &[(0, 1)]);
    let m0 = g.node(0).unwrap().marker;
    assert!(m0.is_some());
    assert_eq!(m0, g.node(1).unwrap().marker);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn import_accepts_crlf_and_mismatched_counts() {
    let mut g = new_graph();
    text_format::import(&mut g, "9\r\n9\r\n9\r\n\r\n\r\n20\t20\r\n 50 \t 50 \r\n\r\n1\t0\r\n").expect("import ok");
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edges(), &[(1, 0)]);
}

#[test]
fn import_truncated_file_leaves_graph_empty() {
    let mut g = sample_graph();
    let err = text_format::import(&mut g, "0\n2\n1\n\n\n20\t20\n").unwrap_err();
    assert_eq!(err, ImportError::Truncated { section: Section::Nodes });
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
    assert!(g.routes().is_empty());

    assert_eq!(
        text_format::import(&mut g, "").unwrap_err(),
        ImportError::Truncated { section: Section::Header }
    );
    assert_eq!(
        text_format::import(&mut g, "0\n0\n0\n\n").unwrap_err(),
        ImportError::Truncated { section: Section::RouteMarks }
    );
}

#[test]
fn import_malformed_lines_fail_with_line_numbers() {
    let mut g = new_graph();
    match text_format::import(&mut g, "0\n1\n0\n\n\nabc\t5\n\n") {
        Err(ImportError::Malformed { line, .. }) => assert_eq!(line, 6),
        other => panic!("unexpected result: {:?}", other),
    }
    match text_format::import(&mut g, "0\n1\n0\n\n\n20 20\n\n") {
        Err(ImportError::Malformed { line, .. }) => assert_eq!(line, 6),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(g.is_empty());
}

#[test]
fn import_ignores_separator_line_content() {
    let mut g = new_graph();
    text_format::import(&mut g, "0\n1\n0\n--------\n\n20\t20\n\n\n").expect("separator is not parsed");
    assert_eq!(g.node_count(), 1);
    assert_eq!(text_format::export(&g), "0\n1\n0\n\n\n20\t20\n\n\n");

    // The separator still has to be present
    assert_eq!(
        text_format::import(&mut g, "0\n0\n0").unwrap_err(),
        ImportError::Truncated { section: Section::Header }
    );
    assert!(g.is_empty());
}

#[test]
fn import_and_export_nodes_at_i32_limits() {
    let mut g = new_graph();
    text_format::import(&mut g, "0\n2\n1\n\n\n-2147483633\t0\n2147483647\t0\n\n0\t1\n\n")
        .expect("extreme coordinates import");
    assert_eq!(g.node(0).unwrap().x, i32::MIN);
    assert_eq!(g.node(1).unwrap().x, 2147483632);
    assert!((g.distance(0, 1).unwrap() - 4294967280.0).abs() < 1e-6);

    let mut g = new_graph();
    g.create_node(i32::MAX, i32::MIN);
    let text = text_format::export(&g);
    assert!(text.contains("2147483662\t-2147483633\n"));
    let mut back = new_graph();
    text_format::import(&mut back, &text).expect("exported text imports");
    assert_eq!(back.node(0).map(|n| (n.x, n.y)), Some((i32::MAX, i32::MIN)));
    assert_eq!(text_format::export(&back), text);

    // One past the largest storable centre
    match text_format::import(&mut back, "0\n1\n0\n\n\n2147483663\t0\n\n\n") {
        Err(ImportError::Malformed { line, .. }) => assert_eq!(line, 6),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(back.is_empty());
    assert!(matches!(
        text_format::import(&mut back, "0\n1\n0\n\n\n-9223372036854775808\t0\n\n\n"),
        Err(ImportError::Malformed { line: 6, .. })
    ));
}

#[test]
fn import_rejects_bad_edges_and_routes() {
    let mut g = new_graph();
    assert_eq!(
        text_format::import(&mut g, "0\n1\n1\n\n\n20\t20\n\n0\t3\n").unwrap_err(),
        ImportError::UnknownNode { line: 8, id: 3 }
    );
    assert_eq!(
        text_format::import(&mut g, "0\n2\n2\n\n\n20\t20\n50\t50\n\n0\t1\n1\t0\n").unwrap_err(),
        ImportError::RejectedEdge { line: 10, first: 1, second: 0 }
    );
    assert_eq!(
        text_format::import(&mut g, "0\n1\n1\n\n\n20\t20\n\n0\t0\n").unwrap_err(),
        ImportError::RejectedEdge { line: 8, first: 0, second: 0 }
    );
    assert_eq!(
        text_format::import(&mut g, "1\n1\n0\n\n0\t0\n\n20\t20\n\n").unwrap_err(),
        ImportError::DegenerateRoute { line: 5, id: 0 }
    );
    assert_eq!(
        text_format::import(&mut g, "1\n1\n0\n\n0\t4\n\n20\t20\n\n").unwrap_err(),
        ImportError::UnknownNode { line: 5, id: 4 }
    );
    assert_eq!(
        text_format::import(&mut g, "0\n1\n0\n\n\n20\t20\n\n\n7\n").unwrap_err(),
        ImportError::TrailingContent { line: 9 }
    );
    assert!(g.is_empty());
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn persist_save_and_load_round_trip() {
    let path = temp_file("saved.txt");
    let g = sample_graph();
    persist::save_to_path(&g, &path).expect("save ok");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text_format::export(&g));

    let mut loaded = new_graph();
    persist::load_from_path(&mut loaded, &path).expect("load ok");
    assert_eq!(text_format::export(&loaded), text_format::export(&g));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn persist_missing_file_clears_graph() {
    let mut g = sample_graph();
    let path = temp_file("does-not-exist.txt");
    assert!(persist::load_from_path(&mut g, &path).is_err());
    assert!(g.is_empty());
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn settings_fill_missing_fields_with_defaults() {
    let s = AppSettings::from_json("{}").expect("empty object parses");
    assert_eq!(s, AppSettings::default());
    assert!(s.show_distances);

    let s = AppSettings::from_json(r#"{"show_distances": false, "last_file": "/tmp/map.txt"}"#).expect("parses");
    assert!(!s.show_distances);
    assert_eq!(s.last_file, Some(std::path::PathBuf::from("/tmp/map.txt")));
    assert!(AppSettings::from_json("not json").is_err());
}

#[test]
fn settings_live_under_the_app_directory() {
    let path = AppSettings::settings_path();
    assert!(path.ends_with(std::path::Path::new("Route-Mapper").join("settings.json")));
    assert!(AppSettings::export_default_dir().ends_with(std::path::Path::new("Route-Mapper").join("exports")));
}
