use std::time::Duration;

use anyhow::Result;
use http::StatusCode;
#[cfg(feature = "blocking")]
use jenkins_users::BlockingClient;
#[cfg(feature = "async")]
use jenkins_users::Client;
#[cfg(feature = "async")]
use jenkins_users::transport::Payload;
use jenkins_users::{Error, ErrorKind, NewUser, TransportErrorKind, UserOperation};
use serde::Deserialize;
use serde_json::json;
#[cfg(feature = "blocking")]
use tokio::task;
use wiremock::{
    Match, Mock, MockServer, Request, ResponseTemplate,
    matchers::{body_string, body_string_contains, header, method, path, query_param},
};

const CREATE_PATH: &str = "/securityRealm/createAccountByAdmin";

#[derive(Clone, Copy)]
struct CrumbHeader(&'static str);

impl Match for CrumbHeader {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get("Jenkins-Crumb")
            .and_then(|value| value.to_str().ok())
            .map(|value| value == self.0)
            .unwrap_or(false)
    }
}

fn alice() -> NewUser {
    NewUser::new("alice", "s3cret", "Alice A", "alice@example.com")
}

async fn mock_crumb(server: &MockServer, endpoint: &str, crumb: &'static str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "crumbRequestField": "Jenkins-Crumb",
            "crumb": crumb
        })))
        .expect(expected)
        .up_to_n_times(expected)
        .mount(server)
        .await;
}

async fn mock_post(
    server: &MockServer,
    endpoint: &str,
    body_snippet: Option<&'static str>,
    response: ResponseTemplate,
    expected: u64,
) {
    let mut mock = Mock::given(method("POST")).and(path(endpoint));

    if let Some(snippet) = body_snippet {
        mock = mock.and(body_string_contains(snippet));
    }

    mock.respond_with(response)
        .expect(expected)
        .up_to_n_times(expected)
        .mount(server)
        .await;
}

async fn mock_get(server: &MockServer, endpoint: &str, response: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(response)
        .expect(expected)
        .up_to_n_times(expected)
        .mount(server)
        .await;
}

/// Base URL of a local port nothing listens on.
fn closed_port_uri() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_create_user_posts_form_and_echoes_input() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "username=alice&password1=s3cret&password2=s3cret&fullname=Alice+A&email=alice%40example.com",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = Client::builder(server.uri())?.build()?;
    let user = client.users().create(&alice()).await?;

    assert_eq!(user.username().as_str(), "alice");
    assert_eq!(user.full_name(), "Alice A");
    assert_eq!(user.email(), "alice@example.com");
    assert!(user.raw().is_none());
    assert!(user.client().same_client(&client));

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_create_user_reports_status_and_redacts_password() -> Result<()> {
    let server = MockServer::start().await;

    mock_post(
        &server,
        CREATE_PATH,
        None,
        ResponseTemplate::new(403).set_body_string("password1=s3cret rejected"),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let new = alice();
    let err = client
        .users()
        .create(&new)
        .await
        .expect_err("expected create to fail");

    assert!(err.to_string().contains("403"), "{err}");
    assert_eq!(err.operation(), Some(UserOperation::Create));
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(err.is_auth_error());

    match &err {
        Error::User {
            username, error, ..
        } => {
            assert_eq!(username.as_str(), "alice");
            let snippet = error.body_snippet.as_deref().unwrap_or_default();
            assert!(!snippet.contains("s3cret"), "{snippet}");
            assert!(snippet.contains("<redacted>"), "{snippet}");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }

    let account = err.account().expect("refused create keeps the submitted account");
    assert_eq!(account.username, new.username);
    assert_eq!(account.full_name, "Alice A");
    assert_eq!(account.email, "alice@example.com");

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_delete_user_posts_submit_yes() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/securityRealm/user/bob/doDelete"))
        .and(body_string("Submit=Yes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = Client::builder(server.uri())?.build()?;
    client.users().delete("bob").await?;

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_delete_user_reports_server_error() -> Result<()> {
    let server = MockServer::start().await;

    mock_post(
        &server,
        "/securityRealm/user/bob/doDelete",
        Some("Submit=Yes"),
        ResponseTemplate::new(500),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let err = client
        .users()
        .delete("bob")
        .await
        .expect_err("expected delete to fail");

    assert!(err.to_string().contains("500"), "{err}");
    assert_eq!(err.operation(), Some(UserOperation::Delete));
    assert_eq!(err.kind(), ErrorKind::User);

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_second_delete_surfaces_not_found() -> Result<()> {
    let server = MockServer::start().await;

    mock_post(
        &server,
        "/securityRealm/user/bob/doDelete",
        None,
        ResponseTemplate::new(200),
        1,
    )
    .await;
    mock_post(
        &server,
        "/securityRealm/user/bob/doDelete",
        None,
        ResponseTemplate::new(404),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    client.users().delete("bob").await?;

    let err = client
        .users()
        .delete("bob")
        .await
        .expect_err("second delete should fail");
    assert!(err.to_string().contains("404"), "{err}");
    assert!(err.is_not_found());

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_get_user_decodes_profile() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "alice",
            "fullName": "Alice A"
        })),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let user = client.users().get("alice").await?;

    assert_eq!(user.username().as_str(), "alice");
    assert_eq!(user.full_name(), "Alice A");
    assert_eq!(user.email(), "");
    assert_eq!(
        user.raw().map(|raw| raw.full_name.as_str()),
        Some("Alice A")
    );

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_get_user_reports_not_found() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/securityRealm/user/ghost/api/json",
        ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let err = client
        .users()
        .get("ghost")
        .await
        .expect_err("expected HTTP error");

    assert!(err.to_string().contains("404"), "{err}");
    assert_eq!(err.operation(), Some(UserOperation::Get));
    match err {
        Error::User { error, .. } => {
            assert_eq!(error.status, StatusCode::NOT_FOUND);
            assert_eq!(error.path(), "/securityRealm/user/ghost/api/json");
            assert!(
                error
                    .body_snippet
                    .as_deref()
                    .unwrap_or_default()
                    .contains("Not Found")
            );
        }
        other => panic!("unexpected error variant: {other:?}"),
    }

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_get_user_propagates_decode_error() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(200).set_body_string("<html>login</html>"),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let err = client
        .users()
        .get("alice")
        .await
        .expect_err("expected decode error");

    match err {
        Error::Decode {
            status,
            path,
            body_snippet,
            ..
        } => {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(&*path, "/securityRealm/user/alice/api/json");
            assert_eq!(body_snippet.as_deref(), Some("<html>login</html>"));
        }
        other => panic!("unexpected error variant: {other:?}"),
    }

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_concurrent_gets_keep_their_own_records() -> Result<()> {
    let server = MockServer::start().await;

    for (id, name) in [("alice", "Alice A"), ("bob", "Bob B")] {
        mock_get(
            &server,
            &format!("/securityRealm/user/{id}/api/json"),
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(20))
                .set_body_json(json!({ "id": id, "fullName": name })),
            1,
        )
        .await;
    }

    let client = Client::builder(server.uri())?.build()?;
    let users = client.users();
    let (alice, bob) = tokio::join!(users.get("alice"), users.get("bob"));
    let (alice, bob) = (alice?, bob?);

    assert_eq!(alice.full_name(), "Alice A");
    assert_eq!(bob.full_name(), "Bob B");

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_user_refreshes_and_deletes_itself() -> Result<()> {
    let server = MockServer::start().await;

    mock_post(&server, CREATE_PATH, None, ResponseTemplate::new(200), 1).await;
    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "_class": "hudson.model.User",
            "absoluteUrl": "http://jenkins/user/alice",
            "description": null,
            "id": "alice",
            "fullName": "Alice (server)"
        })),
        1,
    )
    .await;
    mock_post(
        &server,
        "/securityRealm/user/alice/doDelete",
        Some("Submit=Yes"),
        ResponseTemplate::new(200),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let mut user = client.users().create(&alice()).await?;

    user.refresh().await?;
    assert_eq!(user.full_name(), "Alice (server)");
    assert_eq!(user.email(), "alice@example.com");
    assert_eq!(
        user.raw().and_then(|raw| raw.class.as_deref()),
        Some("hudson.model.User")
    );

    user.delete().await?;

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_poll_returns_raw_status() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(503).set_body_string("<html>starting</html>"),
        1,
    )
    .await;
    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "alice",
            "fullName": "Alice A"
        })),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let mut resource = client
        .users()
        .resource::<jenkins_users::UserRecord>("/securityRealm/user/alice/api/json");

    resource.email = "alice@example.com".to_owned();

    let status = resource.poll().await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(resource.raw().is_none());
    assert!(resource.username.is_empty());

    let status = resource.poll().await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resource.raw().map(|raw| raw.id.as_str()), Some("alice"));
    assert_eq!(resource.username.as_str(), "alice");
    assert_eq!(resource.id, "alice");
    assert_eq!(resource.full_name, "Alice A");
    assert_eq!(resource.email, "alice@example.com");

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_poll_decodes_caller_shape_with_query() -> Result<()> {
    #[derive(Deserialize)]
    struct People {
        users: Vec<serde_json::Value>,
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jenkins/asynchPeople/api/json"))
        .and(query_param("depth", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "user": { "id": "alice" } }, { "user": { "id": "bob" } }]
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = Client::builder(format!("{}/jenkins", server.uri()))?.build()?;
    let mut resource =
        jenkins_users::UserResource::<People>::new(client, "asynchPeople/api/json?depth=1");

    assert_eq!(resource.poll().await?, StatusCode::OK);
    assert_eq!(resource.raw().map(|people| people.users.len()), Some(2));

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_poll_sends_escaped_path_unchanged() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/user/j%20doe/api/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "j doe",
            "fullName": "J Doe"
        })),
        1,
    )
    .await;

    let client = Client::builder(server.uri())?.build()?;
    let mut resource = client
        .users()
        .resource::<jenkins_users::UserRecord>("user/j%20doe/api/json");

    assert_eq!(resource.poll().await?, StatusCode::OK);
    assert_eq!(resource.id, "j doe");
    assert_eq!(resource.full_name, "J Doe");

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_poll_fails_without_a_server() -> Result<()> {
    let client = Client::builder(closed_port_uri()?)?
        .no_system_proxy()
        .build()?;
    let mut resource = client
        .users()
        .resource::<jenkins_users::UserRecord>("securityRealm/user/alice/api/json");

    let err = resource.poll().await.expect_err("expected transport error");
    assert_eq!(err.status(), None);
    match err {
        Error::Transport { kind, .. } => assert_eq!(kind, TransportErrorKind::Connect),
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert!(resource.raw().is_none());
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_create_user_attaches_crumb_and_basic_auth() -> Result<()> {
    let server = MockServer::start().await;

    mock_crumb(&server, "/jenkins/crumbIssuer/api/json", "token", 1).await;

    Mock::given(method("POST"))
        .and(path("/jenkins/securityRealm/createAccountByAdmin"))
        .and(header("Authorization", "Basic dXNlcjp0b2tlbg=="))
        .and(CrumbHeader("token"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jenkins/securityRealm/user/alice/doDelete"))
        .and(header("Authorization", "Basic dXNlcjp0b2tlbg=="))
        .and(CrumbHeader("token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = Client::builder(format!("{}/jenkins", server.uri()))?
        .auth_basic("user", "token")
        .with_crumb(Duration::from_secs(300))
        .build()?;

    let user = client.users().create(&alice()).await?;
    user.delete().await?;

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_crumb_issuer_failure_is_reported() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/crumbIssuer/api/json",
        ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid credentials" })),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::builder(server.uri())?
        .auth_basic("user", "token")
        .with_crumb(Duration::from_secs(300))
        .build()?;

    let err = client
        .users()
        .create(&alice())
        .await
        .expect_err("expected crumb failure");
    match err {
        Error::Api(http) => {
            assert_eq!(http.status, StatusCode::UNAUTHORIZED);
            assert_eq!(http.message.as_deref(), Some("invalid credentials"));
        }
        other => panic!("unexpected error variant: {other:?}"),
    }

    server.verify().await;
    Ok(())
}

#[cfg(feature = "async")]
struct RecordingTransport {
    status: StatusCode,
    seen: std::sync::Mutex<Vec<jenkins_users::transport::TransportRequest>>,
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl jenkins_users::transport::async_transport::AsyncTransport for RecordingTransport {
    async fn send(
        &self,
        req: jenkins_users::transport::TransportRequest,
    ) -> Result<jenkins_users::transport::TransportResponse, Error> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(req);
        Ok(jenkins_users::transport::TransportResponse {
            status: self.status,
            headers: http::HeaderMap::new(),
            body: Vec::new(),
        })
    }
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_custom_transport_sees_one_request_and_redirect_fails() -> Result<()> {
    let transport = std::sync::Arc::new(RecordingTransport {
        status: StatusCode::FOUND,
        seen: std::sync::Mutex::new(Vec::new()),
    });

    let client = Client::builder("https://ci.example.com/jenkins")?
        .auth_basic("admin", "api-token")
        .transport(transport.clone())
        .build()?;

    let err = client
        .users()
        .delete("j doe")
        .await
        .expect_err("302 is not a successful delete");
    assert_eq!(err.status(), Some(StatusCode::FOUND));

    let seen = transport
        .seen
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, http::Method::POST);
    assert_eq!(
        seen[0].url.as_str(),
        "https://ci.example.com/jenkins/securityRealm/user/j%20doe/doDelete"
    );
    match &seen[0].payload {
        Payload::Form(pairs) => assert_eq!(pairs, &[("Submit".to_owned(), "Yes".to_owned())]),
        other => panic!("unexpected payload: {other:?}"),
    }
    assert!(seen[0].headers.contains_key(http::header::AUTHORIZATION));
    Ok(())
}

#[cfg(feature = "blocking")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_client_creates_fetches_and_deletes() -> Result<()> {
    let server = MockServer::start().await;

    mock_post(
        &server,
        CREATE_PATH,
        Some("password2=s3cret"),
        ResponseTemplate::new(200),
        1,
    )
    .await;
    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "alice",
            "fullName": "Alice A"
        })),
        1,
    )
    .await;
    mock_post(
        &server,
        "/securityRealm/user/alice/doDelete",
        Some("Submit=Yes"),
        ResponseTemplate::new(200),
        1,
    )
    .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = BlockingClient::builder(base_url)?.build()?;

        let created = client.users().create(&alice())?;
        assert_eq!(created.email(), "alice@example.com");
        assert!(created.client().same_client(&client));

        let fetched = client.users().get("alice")?;
        assert_eq!(fetched.full_name(), "Alice A");
        assert_eq!(fetched.email(), "");

        fetched.delete()?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[cfg(feature = "blocking")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_refusals_report_status() -> Result<()> {
    let server = MockServer::start().await;

    mock_post(&server, CREATE_PATH, None, ResponseTemplate::new(409), 1).await;

    mock_post(
        &server,
        "/securityRealm/user/bob/doDelete",
        None,
        ResponseTemplate::new(500),
        1,
    )
    .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = BlockingClient::builder(base_url)?.build()?;
        let err = client
            .users()
            .delete("bob")
            .expect_err("expected delete to fail");
        assert!(err.to_string().contains("500"), "{err}");
        assert_eq!(err.operation(), Some(UserOperation::Delete));
        assert!(err.account().is_none());

        let err = client
            .users()
            .create(&alice())
            .expect_err("expected create to fail");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(
            err.account().map(|account| account.email.as_str()),
            Some("alice@example.com")
        );
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[cfg(feature = "blocking")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_poll_returns_raw_status() -> Result<()> {
    let server = MockServer::start().await;

    mock_get(
        &server,
        "/securityRealm/user/alice/api/json",
        ResponseTemplate::new(503),
        1,
    )
    .await;

    let base_url = server.uri();
    let closed = closed_port_uri()?;
    task::spawn_blocking(move || -> Result<()> {
        let client = BlockingClient::builder(base_url)?.build()?;
        let mut resource = client
            .users()
            .resource::<jenkins_users::UserRecord>("securityRealm/user/alice/api/json");
        assert_eq!(resource.poll()?, StatusCode::SERVICE_UNAVAILABLE);
        assert!(resource.raw().is_none());

        let offline = BlockingClient::builder(closed)?.no_system_proxy().build()?;
        let mut resource = offline
            .users()
            .resource::<jenkins_users::UserRecord>("securityRealm/user/alice/api/json");
        let err = resource.poll().expect_err("expected transport error");
        assert_eq!(err.kind(), ErrorKind::Transport);
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[cfg(feature = "blocking")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_client_supports_base_path_with_crumb() -> Result<()> {
    let server = MockServer::start().await;

    mock_crumb(&server, "/jenkins/crumbIssuer/api/json", "token", 1).await;

    Mock::given(method("POST"))
        .and(path("/jenkins/securityRealm/user/alice/doDelete"))
        .and(header("Authorization", "Basic dXNlcjp0b2tlbg=="))
        .and(CrumbHeader("token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .up_to_n_times(2)
        .mount(&server)
        .await;

    let base_url = format!("{}/jenkins", server.uri());
    task::spawn_blocking(move || -> Result<()> {
        let client = BlockingClient::builder(base_url)?
            .auth_basic("user", "token")
            .with_crumb(Duration::from_secs(300))
            .build()?;

        client.users().delete("alice")?;
        client.users().delete("alice")?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}
