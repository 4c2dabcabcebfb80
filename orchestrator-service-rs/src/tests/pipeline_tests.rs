use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map};
use shared_types::{StructuredAnalysis, UserRequest};
use tokio_util::sync::CancellationToken;
use tool_sdk::llm::{ChatMessage, ToolSpec};

use crate::backends::{CompletionBackend, MockCompletionBackend, MockPassageSearch, MockToolInvoker};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::scope::RequestScope;

fn analysis_json() -> String {
    json!({
        "summary": "Strong in math, needs physics practice.",
        "analysis": {"strengths": ["algebra"], "weaknesses": ["optics"], "trend": "stable"},
        "recommendations": [{"action": "Review optics", "example": "Redo chapter 4 exercises"}],
        "data_snapshot": {"math": 95, "english": 82, "physics": 58}
    })
    .to_string()
}

fn request(mode: &str, student_id: Option<i64>) -> UserRequest {
    UserRequest {
        request_id: "r1".to_string(),
        trace_id: "t1".to_string(),
        mode: mode.to_string(),
        message: "How is the student doing?".to_string(),
        student_id,
        term: Some("fall".to_string()),
    }
}

fn scope() -> RequestScope {
    RequestScope::new("r1", "t1", CancellationToken::new())
}

#[tokio::test]
async fn test_student_analysis_runs_every_stage() {
    let mut llm = MockCompletionBackend::new();
    llm.expect_embed().times(1).returning(|_| Ok(vec![0.1, 0.2, 0.3]));
    llm.expect_complete()
        .withf(|messages, _| messages[1].content.contains("\"score\":95"))
        .times(1)
        .returning(|_, _| Ok(analysis_json()));

    let mut search = MockPassageSearch::new();
    search
        .expect_search()
        .times(1)
        .returning(|_, _| Ok(vec!["Physics grades dipped in week 6.".to_string()]));

    let mut tools = MockToolInvoker::new();
    tools.expect_dispatch().times(1).returning(|_, _| {
        let mut payload = Map::new();
        payload.insert("scores".to_string(), json!([{"subject": "math", "score": 95}]));
        Ok(payload)
    });

    let pipeline = Pipeline::from_backends(Arc::new(llm), Arc::new(search), Arc::new(tools), Vec::new(), 5);
    let analysis = pipeline.execute(request("student_analysis", Some(42)), &scope()).await.unwrap();

    assert_eq!(analysis, serde_json::from_str::<StructuredAnalysis>(&analysis_json()).unwrap());
}

#[tokio::test]
async fn test_validation_failure_contacts_no_backend() {
    let mut llm = MockCompletionBackend::new();
    llm.expect_embed().never();
    llm.expect_complete().never();
    let mut search = MockPassageSearch::new();
    search.expect_search().never();
    let mut tools = MockToolInvoker::new();
    tools.expect_dispatch().never();

    let pipeline = Pipeline::from_backends(Arc::new(llm), Arc::new(search), Arc::new(tools), Vec::new(), 5);
    let mut bad = request("student_analysis", Some(42));
    bad.message = "   ".to_string();

    let err = pipeline.execute(bad, &scope()).await.unwrap_err();
    assert_eq!(err, PipelineError::Validation("message is required".to_string()));
}

#[tokio::test]
async fn test_zero_student_id_stops_before_tool_and_completion() {
    let mut llm = MockCompletionBackend::new();
    llm.expect_embed().returning(|_| Ok(vec![1.0]));
    llm.expect_complete().never();
    let mut search = MockPassageSearch::new();
    search.expect_search().returning(|_, _| Ok(Vec::new()));
    let mut tools = MockToolInvoker::new();
    tools.expect_dispatch().never();

    let pipeline = Pipeline::from_backends(Arc::new(llm), Arc::new(search), Arc::new(tools), Vec::new(), 5);
    let err = pipeline.execute(request("student_analysis", Some(0)), &scope()).await.unwrap_err();

    assert_eq!(err.category(), "validation");
}

#[tokio::test]
async fn test_customer_support_never_dispatches() {
    let mut llm = MockCompletionBackend::new();
    llm.expect_embed().returning(|_| Ok(vec![1.0]));
    llm.expect_complete()
        .withf(|messages, _| messages[1].content.ends_with("Tool data: {}"))
        .times(1)
        .returning(|_, _| Ok(analysis_json()));
    let mut search = MockPassageSearch::new();
    search.expect_search().returning(|_, _| Ok(Vec::new()));
    let mut tools = MockToolInvoker::new();
    tools.expect_dispatch().never();

    let pipeline = Pipeline::from_backends(Arc::new(llm), Arc::new(search), Arc::new(tools), Vec::new(), 5);
    assert!(pipeline.execute(request("Customer_Support", Some(42)), &scope()).await.is_ok());
}

#[tokio::test]
async fn test_cancelled_request_does_not_start() {
    let mut llm = MockCompletionBackend::new();
    llm.expect_embed().never();
    let mut search = MockPassageSearch::new();
    search.expect_search().never();

    let pipeline = Pipeline::from_backends(
        Arc::new(llm),
        Arc::new(search),
        Arc::new(MockToolInvoker::new()),
        Vec::new(),
        5,
    );

    let token = CancellationToken::new();
    token.cancel();
    let err = pipeline
        .execute(request("customer_support", None), &RequestScope::new("r1", "t1", token))
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::Cancelled);
}

/// Completion backend that never answers in time
struct StalledBackend;

#[async_trait]
impl CompletionBackend for StalledBackend {
    async fn embed(&self, _text: &str) -> tool_sdk::Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![1.0])
    }

    async fn complete(&self, _messages: Vec<ChatMessage>, _tools: Vec<ToolSpec>) -> tool_sdk::Result<String> {
        Ok(String::new())
    }
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_stage() {
    let pipeline = Pipeline::from_backends(
        Arc::new(StalledBackend),
        Arc::new(MockPassageSearch::new()),
        Arc::new(MockToolInvoker::new()),
        Vec::new(),
        5,
    );

    let token = CancellationToken::new();
    let deadline = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        deadline.cancel();
    });

    let started = std::time::Instant::now();
    let err = pipeline
        .execute(request("customer_support", None), &RequestScope::new("r1", "t1", token))
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}
