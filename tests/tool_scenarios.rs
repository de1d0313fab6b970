//! Tool behavior through the dispatcher with a stubbed container runtime.

mod common;

use common::{fixture, Call, StubGateway};
use serde_json::{json, Map, Value};
use web_deployer::runtime::CommandOutput;
use web_deployer::tools::status::STATUS_FORMAT;
use web_deployer::Error;

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_create_then_list_single_artifact() {
    let fx = fixture(StubGateway::succeeding()).await;

    let created = fx
        .dispatcher
        .dispatch("create_html", &args(json!({"filename": "test", "content": "<p>hi</p>"})))
        .await
        .unwrap();
    assert!(created.is_success());
    assert!(created.text_content().contains("File: test.html"));
    assert!(created.text_content().contains("Size: 9 bytes"));

    let listed = fx
        .dispatcher
        .dispatch("list_html_files", &Map::new())
        .await
        .unwrap();
    let text = listed.text_content();
    assert!(text.contains("(1 found)"), "{text}");
    assert!(text.contains("test.html\n   Size: 9 bytes"), "{text}");

    let on_disk = std::fs::read_to_string(fx.dir.path().join("www/test.html")).unwrap();
    assert_eq!(on_disk, "<p>hi</p>");
}

#[tokio::test]
async fn test_create_html_last_write_wins() {
    let fx = fixture(StubGateway::succeeding()).await;
    for content in ["version 1", "v2"] {
        fx.dispatcher
            .dispatch("create_html", &args(json!({"filename": "over.html", "content": content})))
            .await
            .unwrap();
    }
    let on_disk = std::fs::read_to_string(fx.dir.path().join("www/over.html")).unwrap();
    assert_eq!(on_disk, "v2");
}

#[tokio::test]
async fn test_list_empty_and_ignores_other_files() {
    let fx = fixture(StubGateway::succeeding()).await;
    std::fs::write(fx.dir.path().join("www/readme.txt"), "not html").unwrap();

    let listed = fx
        .dispatcher
        .dispatch("list_html_files", &Map::new())
        .await
        .unwrap();
    assert!(listed.is_success());
    assert!(listed.text_content().contains("is empty"));

    for name in ["a", "b", "c"] {
        fx.dispatcher
            .dispatch("create_html", &args(json!({"filename": name, "content": name})))
            .await
            .unwrap();
    }
    let text = fx
        .dispatcher
        .dispatch("list_html_files", &Map::new())
        .await
        .unwrap()
        .text_content();
    assert!(text.contains("(3 found)"));
    assert!(!text.contains("readme.txt"));
}

#[tokio::test]
async fn test_create_html_validation_failure_is_result() {
    let fx = fixture(StubGateway::succeeding()).await;
    let result = fx
        .dispatcher
        .dispatch("create_html", &args(json!({"filename": "bad name"})))
        .await
        .unwrap();
    assert!(!result.is_success());
    let text = result.text_content();
    assert!(text.contains("Missing required parameter: content"));
    assert!(text.contains("does not match pattern"));
    assert!(!fx.dir.path().join("www/bad name.html").exists());
}

#[tokio::test]
async fn test_deploy_surfaces_url_and_mounts_content_dir() {
    let fx = fixture(StubGateway::succeeding()).await;
    let result = fx
        .dispatcher
        .dispatch("deploy_server", &args(json!({"port": 9090})))
        .await
        .unwrap();
    assert!(result.is_success());
    assert!(result.text_content().contains("http://localhost:9090"));

    let calls = fx.gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::StopAndRemove("mcp-web-server".to_string()));
    let Call::Run(spec) = &calls[1] else {
        panic!("expected run, got {:?}", calls[1]);
    };
    assert_eq!(spec.host_port, 9090);
    assert_eq!(spec.image, "nginx:alpine");
    assert_eq!(spec.container_dir, "/usr/share/nginx/html");
    assert_eq!(
        spec.host_dir,
        std::fs::canonicalize(fx.dir.path().join("www")).unwrap()
    );
}

#[tokio::test]
async fn test_second_deploy_supersedes_first() {
    let fx = fixture(StubGateway::succeeding()).await;
    for port in [8081, 8082] {
        fx.dispatcher
            .dispatch("deploy_server", &args(json!({"port": port})))
            .await
            .unwrap();
    }
    let kinds: Vec<&str> = fx
        .gateway
        .calls()
        .iter()
        .map(|c| match c {
            Call::Run(_) => "run",
            Call::StopAndRemove(_) => "stop",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["stop", "run", "stop", "run"]);
}

#[tokio::test]
async fn test_deploy_failure_reports_stderr() {
    let gateway = StubGateway {
        run_output: CommandOutput {
            exit_code: 125,
            stdout: String::new(),
            stderr: "Cannot connect to the Docker daemon".to_string(),
        },
        ..StubGateway::default()
    };
    let fx = fixture(gateway).await;
    let result = fx
        .dispatcher
        .dispatch("deploy_server", &Map::new())
        .await
        .unwrap();
    assert!(!result.is_success());
    assert!(result.text_content().contains("Cannot connect to the Docker daemon"));
}

#[tokio::test]
async fn test_stop_without_server_reports_none_found() {
    let gateway = StubGateway {
        stop_output: CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "Error response from daemon: No such container".to_string(),
        },
        ..StubGateway::succeeding()
    };
    let fx = fixture(gateway).await;
    let result = fx
        .dispatcher
        .dispatch("stop_server", &Map::new())
        .await
        .unwrap();
    assert!(!result.is_success());
    assert!(result.text_content().contains("No active web server found"));
}

#[tokio::test]
async fn test_stop_success() {
    let fx = fixture(StubGateway::succeeding()).await;
    let result = fx
        .dispatcher
        .dispatch("stop_server", &Map::new())
        .await
        .unwrap();
    assert!(result.is_success());
    assert!(result.text_content().contains("'mcp-web-server' removed"));
}

#[tokio::test]
async fn test_status_active_and_inactive() {
    let active = StubGateway {
        inspect_output: CommandOutput {
            exit_code: 0,
            stdout: "1234567890abcdef|Up 3 minutes|0.0.0.0:8080->80/tcp\n".to_string(),
            stderr: String::new(),
        },
        ..StubGateway::default()
    };
    let fx = fixture(active).await;
    let text = fx
        .dispatcher
        .dispatch("server_status", &Map::new())
        .await
        .unwrap()
        .text_content();
    assert!(text.contains("ACTIVE"));
    assert!(text.contains("Container: 1234567890ab"));
    assert!(text.contains("Status: Up 3 minutes"));
    assert!(text.contains("Ports: 0.0.0.0:8080->80/tcp"));
    assert_eq!(
        fx.gateway.calls(),
        vec![Call::Inspect(
            "mcp-web-server".to_string(),
            STATUS_FORMAT.to_string()
        )]
    );

    let fx = fixture(StubGateway::default()).await;
    let result = fx
        .dispatcher
        .dispatch("server_status", &Map::new())
        .await
        .unwrap();
    assert!(result.is_success());
    assert!(result.text_content().contains("INACTIVE"));
}

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let fx = fixture(StubGateway::succeeding()).await;
    let err = fx
        .dispatcher
        .dispatch("format_disk", &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownTool(_)));
    assert!(fx.gateway.calls().is_empty());
}
