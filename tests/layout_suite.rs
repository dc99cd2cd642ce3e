use pedigree_renderer::TreeView;
use pedigree_renderer::config::Config;
use pedigree_renderer::ir::PersonId;
use pedigree_renderer::parser::parse_graph;
use std::path::Path;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

// Deterministic metrics so box sizes do not depend on installed fonts.
fn test_config(width: i32, height: i32) -> Config {
    let mut config = Config::default();
    config.layout.use_system_fonts = false;
    config.screen.width = width;
    config.screen.height = height;
    config
}

fn view_on(name: &str, center: &str, width: i32, height: i32) -> TreeView {
    let graph = parse_graph(&fixture(name)).expect("parse failed");
    let center = graph.person_by_xref(center).expect("center missing");
    let mut view = TreeView::new(graph, test_config(width, height));
    assert!(view.set_center_person(center));
    view
}

fn xref(view: &TreeView, person: PersonId) -> String {
    view.graph().record(person).expect("record").xref.clone()
}

fn has_box(view: &TreeView, id: &str) -> bool {
    view.scene()
        .boxes
        .iter()
        .any(|b| xref(view, b.person) == id)
}

#[test]
fn smith_family_fills_the_scene() {
    let view = view_on("smith.json", "I1", 800, 600);
    let scene = view.scene();

    // Everyone except hidden Hugh: the couple block, four descendants,
    // and three ancestors.
    assert_eq!(scene.boxes.len(), 10);
    for id in [
        "I1", "I2", "I3", "I4", "I5", "I6", "I7", "I8", "I9", "I10",
    ] {
        assert!(has_box(&view, id), "missing box for {id}");
    }
    assert!(!has_box(&view, "I11"));

    // One elbow per parent-child pair, one link per spouse pair.
    assert_eq!(scene.connectors.len(), 7);
    assert_eq!(scene.spouse_links.len(), 2);
    assert!(scene.stubs.is_empty());

    // The walk starts at the center, which is also selected.
    assert_eq!(xref(&view, scene.boxes[0].person), "I1");
    assert!(scene.boxes[0].selected);
}

#[test]
fn descendants_go_left_and_ancestors_right() {
    let view = view_on("smith.json", "I1", 800, 600);
    let scene = view.scene();
    let center_x = scene.boxes[0].rect.x;
    for b in &scene.boxes {
        match xref(&view, b.person).as_str() {
            "I3" | "I4" | "I6" | "I10" => assert!(b.rect.x < center_x),
            "I7" | "I8" | "I9" => assert!(b.rect.x > center_x),
            _ => {}
        }
    }
    // Grandchild Dora lies left of her mother Alice.
    let alice = scene
        .boxes
        .iter()
        .find(|b| xref(&view, b.person) == "I3")
        .unwrap();
    let dora = scene
        .boxes
        .iter()
        .find(|b| xref(&view, b.person) == "I10")
        .unwrap();
    assert!(dora.rect.x < alice.rect.x);
}

#[test]
fn connectors_run_right_to_left() {
    let view = view_on("smith.json", "I1", 800, 600);
    for connector in &view.scene().connectors {
        let [source, elbow_top, elbow_bottom, dest] = connector.points;
        assert!(source.0 > dest.0, "connector does not run leftward");
        assert_eq!(elbow_top.0, elbow_bottom.0);
        assert_eq!(elbow_top.1, source.1);
        assert_eq!(elbow_bottom.1, dest.1);
    }
}

#[test]
fn narrow_screen_prunes_the_outermost_generations() {
    let view = view_on("smith.json", "I1", 150, 600);
    let scene = view.scene();

    // Great-grandfather Peter and grandchild Dora fall off the screen
    // edges; each pruned branch leaves a stub.
    assert!(!has_box(&view, "I9"));
    assert!(!has_box(&view, "I10"));
    assert_eq!(scene.boxes.len(), 8);
    assert_eq!(scene.connectors.len(), 5);
    assert_eq!(scene.stubs.len(), 2);
    assert!(scene.stubs.iter().any(|s| s.to_x == 0));
    assert!(scene.stubs.iter().any(|s| s.to_x == 150));
}

#[test]
fn show_hidden_reveals_hugh() {
    let mut view = view_on("smith.json", "I1", 800, 600);
    assert!(!has_box(&view, "I11"));
    view.show_hidden();
    assert!(has_box(&view, "I11"));
    assert_eq!(view.scene().boxes.len(), 11);
    assert_eq!(view.scene().connectors.len(), 8);
}

#[test]
fn single_person_box_is_exactly_placed() {
    let view = view_on("single.json", "I1", 800, 600);
    let scene = view.scene();
    assert_eq!(scene.boxes.len(), 1);
    assert!(scene.connectors.is_empty());
    assert!(scene.spouse_links.is_empty());
    assert!(scene.stubs.is_empty());

    // Fallback char cell at size 9 is 5x12: "Al" measures 10 wide, so
    // the box is 22x22 and its column 42 wide, centered on the screen.
    let rect = scene.boxes[0].rect;
    assert_eq!(rect.width, 22);
    assert_eq!(rect.height, 22);
    assert_eq!(rect.x, 389);
    assert_eq!(rect.y, 289);
}

#[test]
fn recentering_walks_the_tree() {
    let mut view = view_on("smith.json", "I1", 800, 600);
    let alice = view.graph().person_by_xref("I3").unwrap();
    assert!(view.set_center_person(alice));

    let scene = view.scene();
    // Alice's view: Dora to her left, parents John and Mary to the
    // right, grandparents beyond.
    assert!(has_box(&view, "I10"));
    assert!(has_box(&view, "I1"));
    assert!(has_box(&view, "I2"));
    assert!(has_box(&view, "I7"));
    // Bob is Alice's sibling, not her ancestor or descendant.
    assert!(!has_box(&view, "I4"));
    assert_eq!(xref(&view, scene.boxes[0].person), "I3");

    assert!(view.back());
    assert_eq!(view.center_person(), view.graph().person_by_xref("I1"));
}

#[test]
fn hit_test_matches_boxes() {
    let view = view_on("smith.json", "I1", 800, 600);
    for b in view.scene().boxes.clone() {
        let hit = view.hit_test(b.rect.x + 1, b.rect.y + 1);
        assert!(hit.is_some());
    }
    assert!(view.hit_test(-5, -5).is_none());
}
