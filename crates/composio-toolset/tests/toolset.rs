//! End-to-end toolset tests against mock API and tooling servers.

use composio_toolset::{ActionFilters, ComposioToolSet, EntityId, ExecEnv, ToolFilters};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn names(actions: &[composio_toolset::ActionSchema]) -> Vec<&str> {
    actions.iter().map(|a| a.name.as_str()).collect()
}

async fn tooling_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"name": "FILETOOL_LIST_FILES", "appName": "filetool"},
                {"name": "FILETOOL_OPEN_FILE", "appName": "filetool"},
                {"name": "SHELLTOOL_EXEC_COMMAND", "appName": "shelltool"}
            ],
            "error": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_host_execute_uses_entity() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/actions/GITHUB_STAR_A_REPOSITORY/execute"))
        .and(header("x-api-key", "test-key"))
        .and(body_json(json!({
            "entityId": "alice",
            "input": {"owner": "composiohq"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"successful": true})))
        .expect(1)
        .mount(&api)
        .await;

    let toolset = ComposioToolSet::builder()
        .api_key("test-key")
        .base_url(api.uri())
        .build()
        .unwrap();

    let params = json!({"owner": "composiohq"}).as_object().cloned().unwrap();
    let output = toolset
        .execute_action("GITHUB_STAR_A_REPOSITORY", params, Some(&EntityId::new("alice")))
        .await
        .unwrap();

    assert_eq!(output, json!({"successful": true}));
}

#[tokio::test]
async fn test_docker_actions_schema_and_execution() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/actions"))
        .and(query_param("actions", "GITHUB_STAR_A_REPOSITORY,FILETOOL_OPEN_FILE"))
        .and(query_param("showAll", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "GITHUB_STAR_A_REPOSITORY", "appName": "github"}]
        })))
        .mount(&api)
        .await;

    let tooling = tooling_server().await;
    Mock::given(method("POST"))
        .and(path("/api/actions/execute/FILETOOL_OPEN_FILE"))
        .and(header("x-api-key", "ws-token"))
        .and(body_json(json!({"params": {}, "entity_id": "alice", "metadata": {}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"opened": true}, "error": null})),
        )
        .expect(1)
        .mount(&tooling)
        .await;

    let toolset = ComposioToolSet::builder()
        .api_key("test-key")
        .base_url(api.uri())
        .workspace_env(ExecEnv::Docker)
        .workspace_url(tooling.uri())
        .workspace_access_token("ws-token")
        .entity_id(EntityId::new("alice"))
        .build()
        .unwrap();

    let filters = ActionFilters::actions(["GITHUB_STAR_A_REPOSITORY", "FILETOOL_OPEN_FILE"]);
    let schemas = toolset.get_actions_schema(&filters, None).await.unwrap();
    assert_eq!(
        names(&schemas),
        vec!["GITHUB_STAR_A_REPOSITORY", "FILETOOL_OPEN_FILE"]
    );

    let output = toolset
        .execute_action(
            "FILETOOL_OPEN_FILE",
            serde_json::Map::new(),
            Some(&EntityId::new("bob")),
        )
        .await
        .unwrap();
    assert_eq!(output, json!({"opened": true}));

    toolset.teardown().await.unwrap();
}

#[tokio::test]
async fn test_docker_tools_schema() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/actions"))
        .and(query_param("apps", "filetool"))
        .and(query_param("tags", "files"))
        .and(query_param("filterImportantActions", "false"))
        .and(query_param_is_missing("useCase"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&api)
        .await;

    let tooling = tooling_server().await;

    let toolset = ComposioToolSet::builder()
        .api_key("test-key")
        .base_url(api.uri())
        .workspace_env(ExecEnv::Docker)
        .workspace_url(tooling.uri())
        .build()
        .unwrap();

    let schemas = toolset
        .get_tools_schema(&ToolFilters::apps(["filetool"]).with_tags(["files"]), None)
        .await
        .unwrap();

    assert_eq!(
        names(&schemas),
        vec!["FILETOOL_LIST_FILES", "FILETOOL_OPEN_FILE"]
    );
}

#[tokio::test]
async fn test_api_key_from_user_data_file() {
    let temp = tempdir().unwrap();
    let user_data = temp.path().join("userData.json");
    std::fs::write(&user_data, r#"{"apiKey": "file-key"}"#).unwrap();

    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-api-key", "file-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&api)
        .await;

    let toolset = ComposioToolSet::builder()
        .env_lookup(|_| None)
        .user_data_path(Some(user_data))
        .base_url(api.uri())
        .build()
        .unwrap();

    let schemas = toolset
        .get_actions_schema(&ActionFilters::default(), None)
        .await
        .unwrap();
    assert!(schemas.is_empty());
}

#[tokio::test]
async fn test_api_error_propagates() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&api)
        .await;

    let toolset = ComposioToolSet::builder()
        .api_key("test-key")
        .base_url(api.uri())
        .build()
        .unwrap();

    let err = toolset
        .get_tools_schema(&ToolFilters::apps(["github"]), None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API error: 500 - internal");
}
