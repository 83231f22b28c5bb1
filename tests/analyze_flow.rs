//! End-to-end analysis flow against the stub model.

use std::sync::Arc;

use documntr::{CodeAnalyzer, StubModel};

#[tokio::test]
async fn echoed_code_comes_back_as_documented_code() {
    let code = "def greet(name): return f'Hello, {name}!'";
    let analyzer = CodeAnalyzer::new(StubModel::new(vec![code.to_string()]));

    let report = analyzer.analyze_code(code).await.unwrap();

    assert_eq!(report.documented_code, code);
    assert!(report.generation_time >= 0.0);
    assert_eq!(analyzer.metrics().num_generations, 1);
}

#[tokio::test]
async fn empty_input_yields_the_fixed_validation_message() {
    let analyzer = CodeAnalyzer::new(StubModel::new(Vec::new()));

    let err = analyzer.analyze_code("").await.unwrap_err();

    assert_eq!(err.client_message(), "Please enter some code to analyze.");
    assert_eq!(analyzer.metrics().num_generations, 0);
}

#[tokio::test]
async fn upstream_failure_is_stringified_with_its_cause() {
    let analyzer = CodeAnalyzer::new(StubModel::failing("API Error"));

    let err = analyzer.analyze_code("fn main() {}").await.unwrap_err();

    assert_eq!(err.client_message(), "An error occurred: API Error");
    assert_eq!(analyzer.metrics().num_generations, 0);
}

#[tokio::test]
async fn metrics_accumulate_over_successive_calls() {
    let analyzer = CodeAnalyzer::new(StubModel::new(vec![
        "one".into(),
        "two".into(),
        "three".into(),
    ]));

    analyzer.analyze_code("a b c").await.unwrap();
    analyzer.analyze_code("d e").await.unwrap();
    analyzer.analyze_code("f").await.unwrap();

    let snapshot = analyzer.metrics();
    assert_eq!(snapshot.num_generations, 3);
    assert_eq!(snapshot.total_tokens, 6);
    // average_time is total over count, and both totals only move on success.
    assert!(snapshot.total_time >= snapshot.average_time);
}

#[tokio::test]
async fn analyzer_is_shareable_across_tasks() {
    let analyzer = Arc::new(CodeAnalyzer::new(StubModel::new(vec![
        "x".into(),
        "y".into(),
    ])));

    let a = {
        let analyzer = Arc::clone(&analyzer);
        tokio::spawn(async move { analyzer.analyze_code("let a = 1;").await })
    };
    let b = {
        let analyzer = Arc::clone(&analyzer);
        tokio::spawn(async move { analyzer.analyze_code("let b = 2;").await })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert_eq!(analyzer.metrics().num_generations, 2);
}
