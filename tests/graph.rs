//! Tests for path parsing, title resolution and nested writes.
mod common;
use common::*;
use promptbatch::graph::coerce_value;
use promptbatch::prelude::*;
use serde_json::{Value, json};

fn path(expr: &str) -> PathExpression {
    PathExpression::parse(expr).unwrap()
}

#[test]
fn test_path_expression_parsing() {
    let p = path("  Save Image / filename_prefix ");
    assert_eq!(p.title, "Save Image");
    assert_eq!(p.keys, vec!["filename_prefix".to_string()]);
    assert_eq!(p.to_string(), "Save Image/filename_prefix");

    let nested: PathExpression = "Nested/options/tiling".parse().unwrap();
    assert_eq!(nested.keys, vec!["options", "tiling"]);

    let bare = path("CLIP Text Encode (Prompt)");
    assert!(!bare.has_keys());
}

#[test]
fn test_path_expression_rejects_empty_segments() {
    assert_eq!(PathExpression::parse("   "), Err(ResolveError::EmptyPath));
    assert!(matches!(
        PathExpression::parse("Save Image//x"),
        Err(ResolveError::EmptySegment(_))
    ));
    assert!(matches!(
        PathExpression::parse("/steps"),
        Err(ResolveError::EmptySegment(_))
    ));
}

#[test]
fn test_resolve_and_write_save_image_prefix() {
    let mut graph = sample_graph();
    let location = graph
        .resolve(&path("Save Image/filename_prefix"), TitleMatch::Exact)
        .unwrap();
    assert_eq!(location.node_id, "9");
    assert_eq!(location.keys, vec!["inputs", "filename_prefix"]);

    assert!(graph.set_nested_value(&location, json!("batch-001")));
    assert_eq!(input(&graph.to_value(), "9", "filename_prefix"), json!("batch-001"));
    assert_eq!(graph.get(&location), Some(&json!("batch-001")));
}

#[test]
fn test_resolution_is_exact_and_trimmed() {
    let graph = sample_graph();
    assert!(
        graph
            .resolve(&path("save image/filename_prefix"), TitleMatch::Exact)
            .is_err()
    );
    assert!(
        graph
            .resolve(&path("save image/filename_prefix"), TitleMatch::IgnoreCase)
            .is_ok()
    );
}

#[test]
fn test_missing_node_fails() {
    let graph = sample_graph();
    let err = graph
        .resolve(&path("No Such Node/value"), TitleMatch::Exact)
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::NodeNotFound {
            title: "No Such Node".to_string()
        }
    );
}

#[test]
fn test_missing_intermediate_key_fails_without_creating_structure() {
    let graph = sample_graph();
    let before = graph.clone();
    let err = graph
        .resolve(&path("Nested/absent/tiling"), TitleMatch::Exact)
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::MissingKey {
            title: "Nested".to_string(),
            key: "absent".to_string()
        }
    );
    assert_eq!(graph, before);
}

#[test]
fn test_scalar_intermediate_key_fails() {
    let graph = sample_graph();
    let err = graph
        .resolve(&path("BasicScheduler/steps/value"), TitleMatch::Exact)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotAMapping { ref key, .. } if key == "steps"));
}

#[test]
fn test_terminal_key_may_be_absent_and_is_created_on_write() {
    let mut graph = sample_graph();
    let location = graph
        .resolve(&path("Save Image/caption"), TitleMatch::Exact)
        .unwrap();
    assert_eq!(graph.get(&location), None);

    assert!(graph.set_nested_value(&location, json!("hello")));
    assert_eq!(input(&graph.to_value(), "9", "caption"), json!("hello"));
}

#[test]
fn test_nested_key_chain() {
    let mut graph = sample_graph();
    let location = graph
        .resolve(&path("Nested/options/tiling"), TitleMatch::Exact)
        .unwrap();
    assert_eq!(location.keys, vec!["inputs", "options", "tiling"]);
    graph.set_nested_value(&location, json!(true));
    assert_eq!(graph.to_value()["30"]["inputs"]["options"]["tiling"], json!(true));
}

#[test]
fn test_bare_title_only_allowed_for_prompt() {
    let graph = sample_graph();
    let bare = path("Save Image");
    assert!(matches!(
        graph.resolve(&bare, TitleMatch::Exact),
        Err(ResolveError::EmptyKeyChain(_))
    ));

    let location = graph
        .resolve_prompt(&path("clip text encode (prompt)"), TitleMatch::IgnoreCase)
        .unwrap();
    assert_eq!(location.node_id, "6");
    assert_eq!(location.keys, vec!["inputs", "text"]);
}

#[test]
fn test_duplicate_titles_resolve_to_first_in_document_order() {
    let graph = WorkflowGraph::from_json(
        r#"{
            "b": { "inputs": { "v": 1 }, "_meta": { "title": "Dup" } },
            "a": { "inputs": { "v": 2 }, "_meta": { "title": "Dup" } }
        }"#,
    )
    .unwrap();
    assert_eq!(graph.find_nodes_by_title("Dup", TitleMatch::Exact), vec!["b", "a"]);
    let location = graph.resolve(&path("Dup/v"), TitleMatch::Exact).unwrap();
    assert_eq!(location.node_id, "b");
}

#[test]
fn test_nodes_without_meta_are_skipped() {
    let graph = WorkflowGraph::from_json(
        r#"{ "1": { "inputs": { "v": 1 } }, "2": { "inputs": { "v": 2 }, "_meta": { "title": "T" } } }"#,
    )
    .unwrap();
    let location = graph.resolve(&path("T/v"), TitleMatch::Exact).unwrap();
    assert_eq!(location.node_id, "2");
}

#[test]
fn test_workflow_loading_errors() {
    assert!(matches!(
        WorkflowGraph::from_json("{ not json"),
        Err(ConfigError::WorkflowParse(_))
    ));
    assert!(matches!(
        WorkflowGraph::from_json("[1, 2, 3]"),
        Err(ConfigError::WorkflowNotAnObject)
    ));
    assert!(matches!(
        WorkflowGraph::from_file("/definitely/not/here.json"),
        Err(ConfigError::Io { kind: "workflow", .. })
    ));
}

#[test]
fn test_serialization_preserves_key_order() {
    let graph = sample_graph();
    let original: Value = serde_json::from_str(SAMPLE_WORKFLOW).unwrap();
    assert_eq!(
        serde_json::to_string(&graph).unwrap(),
        serde_json::to_string(&original).unwrap()
    );
}

#[test]
fn test_value_coercion_follows_template_type() {
    assert_eq!(coerce_value("30", Some(&json!(20))), json!(30));
    assert_eq!(coerce_value("4.5", Some(&json!(3.5))), json!(4.5));
    assert_eq!(coerce_value("30", Some(&json!("20"))), json!("30"));
    assert_eq!(coerce_value("TRUE", Some(&json!(false))), json!(true));
    assert_eq!(coerce_value("abc", Some(&json!(1))), json!("abc"));
    assert_eq!(coerce_value("999999999999999", Some(&json!(1))), json!(999999999999999u64));
}

#[test]
fn test_value_coercion_infers_without_template() {
    assert_eq!(coerce_value("12", None), json!(12));
    assert_eq!(coerce_value("1.25", Some(&Value::Null)), json!(1.25));
    assert_eq!(coerce_value("false", None), json!(false));
    assert_eq!(coerce_value("euler", None), json!("euler"));
}
