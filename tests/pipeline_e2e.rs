use dfc_lib::figma::raw_node_from_json;
use dfc_lib::types::{AlignmentEdge, MismatchKind};
use dfc_lib::{
    resolve, CodegenBackend, ComponentType, Config, DesignTree, DfcError, LayoutAnalyzer, Pipeline,
    Stage,
};
use serde_json::json;

fn tree_from(value: serde_json::Value) -> DesignTree {
    let raw = raw_node_from_json(&value.to_string(), None).expect("raw node");
    resolve(raw).expect("resolvable tree")
}

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> serde_json::Value {
    json!({ "id": id, "name": id, "type": "RECTANGLE",
            "boundingBox": { "x": x, "y": y, "width": w, "height": h } })
}

fn toolbar() -> DesignTree {
    tree_from(json!({
        "id": "frame", "name": "Toolbar", "type": "FRAME",
        "boundingBox": { "x": 0, "y": 0, "width": 400, "height": 60 },
        "children": [
            rect("r1", 20.0, 10.0, 100.0, 40.0),
            rect("r2", 140.0, 10.0, 100.0, 40.0),
            rect("r3", 260.0, 10.0, 100.0, 40.0)
        ]
    }))
}

fn checkout_page() -> DesignTree {
    tree_from(json!({
        "id": "page", "name": "Checkout", "type": "FRAME",
        "boundingBox": { "x": 0, "y": 0, "width": 480, "height": 320 },
        "fills": [{ "kind": "SOLID", "color": { "r": 1.0, "g": 1.0, "b": 1.0 } }],
        "children": [{
            "id": "pay", "name": "Primary Button", "type": "FRAME",
            "boundingBox": { "x": 40, "y": 120, "width": 160, "height": 44 },
            "cornerRadius": 8,
            "fills": [{ "kind": "SOLID", "color": { "r": 0.067, "g": 0.094, "b": 0.153 } }],
            "children": [{
                "id": "pay-label", "name": "Label", "type": "TEXT", "characters": "Pay now",
                "boundingBox": { "x": 88, "y": 132, "width": 64, "height": 20 }
            }]
        }]
    }))
}

#[tokio::test]
async fn toolbar_scenario_analyzes_and_corrects_generated_markup() {
    let tree = toolbar();
    let analysis = LayoutAnalyzer::new(Config::default().alignment).analyze_children(tree.root());

    let top = analysis.alignment_groups.by_edge(AlignmentEdge::Top);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].node_ids, vec!["r1", "r2", "r3"]);
    let spacing = analysis.patterns.consistent_spacing.as_ref().expect("spacing");
    assert_eq!(spacing.value, 20);
    assert!(analysis.patterns.flexbox_candidate.is_candidate);

    let generated = concat!(
        "```jsx\n<div className=\"toolbar\" style={{ display: 'flex' }}>\n",
        "  <div style={{ marginLeft: '18px' }} />\n",
        "  <div style={{ left: '150px', top: '12px' }} />\n",
        "  <div />\n</div>\n```"
    );
    let output = Pipeline::default()
        .run(&tree, "frame", &CodegenBackend::Mock(generated.to_string()))
        .await
        .expect("pipeline run");

    assert!(output.is_exact(), "{:?}", output.report.mismatches);
    assert!(output.markup.contains("left: '140px'"));
    assert!(output.markup.contains("top: '10px'"));
    assert_eq!(output.layout, analysis);
}

#[tokio::test]
async fn wrapped_toolbar_children_are_positioned_before_reporting_exact() {
    let tree = toolbar();
    let generated = concat!(
        "```tsx\n<div className=\"toolbar\">\n",
        "  <div className=\"row flex gap-5\"><div/><div/><div/></div>\n",
        "</div>\n```"
    );
    let output = Pipeline::default()
        .run(&tree, "frame", &CodegenBackend::Mock(generated.to_string()))
        .await
        .expect("pipeline run");

    assert!(output.is_exact(), "{:?}", output.report.mismatches);
    assert_eq!(output.markup.matches("position: 'absolute'").count(), 4);
    for left in ["left: '20px'", "left: '140px'", "left: '260px'"] {
        assert!(output.markup.contains(left), "{}", output.markup);
    }
}

#[test]
fn decorative_extra_child_is_never_reported_exact() {
    let tree = toolbar();
    let markup = "<div>\n  <div />\n  <div />\n  <div />\n  <span>extra</span>\n</div>";
    let output = Pipeline::default()
        .run_with_markup(&tree, "frame", markup, None)
        .expect("degrades instead of failing");

    assert!(!output.is_exact());
    let enforce = output
        .stages
        .iter()
        .find(|s| s.stage == Stage::Enforce)
        .expect("enforce status");
    assert!(!enforce.succeeded);
    let missing: Vec<&str> = output
        .report
        .mismatches
        .iter()
        .filter(|m| m.kind == MismatchKind::MissingElement)
        .map(|m| m.element.as_str())
        .collect();
    assert_eq!(missing, vec!["r1", "r2", "r3"]);
}

#[test]
fn group_without_box_takes_union_of_children() {
    let tree = tree_from(json!({
        "id": "group", "name": "Group 1", "type": "GROUP",
        "children": [rect("a", 10.0, 20.0, 30.0, 30.0), rect("b", 50.0, 5.0, 20.0, 80.0)]
    }));
    let bb = tree.root().bounding_box;
    assert_eq!((bb.x, bb.y, bb.width, bb.height), (10.0, 5.0, 60.0, 80.0));
}

#[test]
fn two_by_two_gallery_is_a_grid() {
    let tree = tree_from(json!({
        "id": "grid", "name": "Gallery", "type": "FRAME",
        "boundingBox": { "x": 0, "y": 0, "width": 200, "height": 200 },
        "children": [
            rect("g1", 10.0, 10.0, 80.0, 80.0),
            rect("g2", 110.0, 10.0, 80.0, 80.0),
            rect("g3", 10.0, 110.0, 80.0, 80.0),
            rect("g4", 110.0, 110.0, 80.0, 80.0)
        ]
    }));
    let analysis = LayoutAnalyzer::new(Config::default().alignment).analyze_children(tree.root());
    let grid = analysis.patterns.grid_pattern.expect("grid");
    assert_eq!((grid.rows, grid.columns), (2, 2));
}

#[test]
fn button_markup_becomes_semantic_and_passes_contrast() {
    let tree = checkout_page();
    let output = Pipeline::default()
        .run_with_markup(&tree, "pay", "<div onClick={pay}>Pay now</div>", None)
        .expect("correct");

    assert_eq!(output.classification.component_type, ComponentType::Button);
    assert!(output.classification.confidence >= 50);
    assert!(output.markup.starts_with("<button"), "{}", output.markup);
    let contrast = output.accessibility.contrast.as_ref().expect("contrast");
    assert!(contrast.meets_aa);
    assert!(output
        .stages
        .iter()
        .any(|s| s.stage == Stage::ContrastCheck && s.succeeded));
}

#[test]
fn concurrent_invocations_share_one_pipeline() {
    let tree = checkout_page();
    let pipeline = Pipeline::default();
    let markup = "<div onClick={pay}>Pay now</div>";
    let expected = pipeline
        .run_with_markup(&tree, "pay", markup, None)
        .expect("baseline");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pipeline.run_with_markup(&tree, "pay", markup, None)))
            .collect();
        for handle in handles {
            let output = handle.join().expect("thread").expect("correct");
            assert_eq!(output, expected);
        }
    });
    assert!(pipeline.cache().correction.hits() >= 4);
}

#[tokio::test]
async fn generation_failure_is_propagated_unchanged() {
    let tree = toolbar();
    let err = Pipeline::default()
        .run(&tree, "frame", &CodegenBackend::Mock("I could not generate that.".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, DfcError::Generation(_)));
}
