//! Tests of the backend client, against a mocked backend

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use study_planner::client::Client;
use study_planner::task::{NewTask, TaskEdit, TaskType};
use study_planner::traits::TaskSource;
use study_planner::TaskId;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn backend() -> (MockServer, Client) {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    let client = Client::new(server.uri()).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_get_tasks() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Calculus", "type": "Subject", "start_date": "2026-10-14", "deadline": "2026-10-20",
             "estimated_hours": 12.0, "difficulty": 3, "completed": false},
            {"id": 2, "name": "Mock exam", "type": "Practice", "start_date": "", "deadline": "2026-10-18",
             "estimated_hours": 3, "difficulty": 2, "completed": true},
            {"id": 3, "name": "Broken", "type": "Subject", "deadline": "not a date",
             "estimated_hours": 1, "difficulty": 1},
            {"id": 4, "name": "Portfolio", "type": "Something new", "deadline": "2026-11-01",
             "estimated_hours": 5.5, "difficulty": 4},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client.get_tasks().await.unwrap();
    assert_eq!(tasks.len(), 3);

    assert_eq!(tasks[0].id(), &TaskId::Remote(1));
    assert_eq!(tasks[0].name(), "Calculus");
    assert_eq!(tasks[0].task_type(), TaskType::Subject);
    assert_eq!(tasks[0].start_date(), Some(date("2026-10-14")));
    assert_eq!(tasks[0].estimated_hours(), 12.0);

    assert_eq!(tasks[1].start_date(), None);
    assert_eq!(tasks[1].estimated_hours(), 3.0);
    assert!(tasks[1].completed());

    assert_eq!(tasks[2].id(), &TaskId::Remote(4));
    assert_eq!(tasks[2].task_type(), TaskType::Custom);
    assert_eq!(tasks[2].completed(), false);
}

#[tokio::test]
async fn test_http_errors() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/5/complete"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_tasks().await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(client.toggle_completion(&TaskId::Remote(5)).await.is_err());
}

#[tokio::test]
async fn test_create_task() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_partial_json(json!({
            "name": "Chemistry",
            "type": "Custom",
            "start_date": "",
            "deadline": "2026-10-20",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "id": 17})))
        .expect(1)
        .mount(&server)
        .await;

    let body = NewTask::custom("Chemistry".to_string(), date("2026-10-20"), 3.0);
    let id = client.create_task(&body).await.unwrap();
    assert_eq!(id, TaskId::Remote(17));
}

#[tokio::test]
async fn test_create_task_refused() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error", "message": "Missing name"})))
        .mount(&server)
        .await;

    let body = NewTask::custom("Chemistry".to_string(), date("2026-10-20"), 3.0);
    let err = client.create_task(&body).await.unwrap_err();
    assert!(err.to_string().contains("Missing name"));
}

#[tokio::test]
async fn test_task_mutations() {
    let (server, client) = backend().await;

    Mock::given(method("DELETE"))
        .and(path("/api/tasks"))
        .and(body_json(json!({"id": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/2/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "completed": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/2"))
        .and(body_json(json!({"estimated_hours": 20.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.toggle_completion(&TaskId::Remote(2)).await.unwrap(), true);

    let edit = TaskEdit { estimated_hours: Some(20.0), ..TaskEdit::default() };
    client.update_task(&TaskId::Remote(2), &edit).await.unwrap();

    client.delete_task(&TaskId::Remote(2)).await.unwrap();
}

#[tokio::test]
async fn test_local_tasks_never_reach_the_backend() {
    let (server, client) = backend().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&server)
        .await;

    assert!(client.delete_task(&TaskId::random()).await.is_err());
}

#[tokio::test]
async fn test_keypoints() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/keypoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "content": "Integrals are areas"},
            {"id": 3, "content": "Review chapter 4"},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/keypoints"))
        .and(body_json(json!({"content": "Sleep well"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "id": 4})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/keypoints"))
        .and(body_json(json!({"id": 9})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error", "message": "Key point not found"})))
        .mount(&server)
        .await;

    let keypoints = client.get_keypoints().await.unwrap();
    assert_eq!(keypoints.len(), 2);
    assert_eq!(keypoints[1].content(), "Review chapter 4");

    let added = client.add_keypoint("Sleep well").await.unwrap();
    assert_eq!(added.id(), 4);

    assert!(client.add_keypoint("   ").await.is_err());

    let err = client.delete_keypoint(9).await.unwrap_err();
    assert!(err.to_string().contains("Key point not found"));
}

#[tokio::test]
async fn test_export_csv() {
    let (server, client) = backend().await;

    let csv = "id,name,type\n1,Calculus,Subject\n";
    Mock::given(method("GET"))
        .and(path("/export/csv"))
        .respond_with(ResponseTemplate::new(200)
            .insert_header("Content-Type", "text/csv")
            .set_body_string(csv))
        .mount(&server)
        .await;

    let exported = client.export_csv().await.unwrap();
    assert_eq!(exported, csv.as_bytes());
}

#[tokio::test]
async fn test_login() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(303).insert_header("Location", "/"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=mallory"))
        .respond_with(ResponseTemplate::new(303).insert_header("Location", "/login"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>planner</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    client.login("alice", "correct horse").await.unwrap();
    assert!(client.login("mallory", "guess").await.is_err());
}
