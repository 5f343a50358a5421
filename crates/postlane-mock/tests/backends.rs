//! Code written against the traits runs on every backend.

use postlane::{
    Context, Error, FolderRequest, FoldersApi, HttpClient, MessageQuery, MessagesApi, ProviderApi,
    SendMessageRequest,
};
use postlane_mock::{DemoClient, Fixtures, MockClient};
use std::sync::Arc;

async fn inbox_subjects(api: &dyn ProviderApi, grant: &str) -> postlane::Result<Vec<String>> {
    let page = api
        .list_messages(&Context::background(), grant, &MessageQuery::default())
        .await?;
    Ok(page.into_iter().map(|m| m.subject).collect())
}

async fn send_then_file(api: &dyn ProviderApi, grant: &str) -> postlane::Result<String> {
    let ctx = Context::background();
    let sent = api
        .send_message(&ctx, grant, &SendMessageRequest::new("ada@example.com", "Hello", "Hi Ada"))
        .await?;
    api.create_folder(&ctx, grant, &FolderRequest::named("Followups")).await?;
    Ok(sent.subject)
}

#[tokio::test]
async fn test_backends_are_interchangeable() {
    let backends: Vec<Arc<dyn ProviderApi>> = vec![
        Arc::new(MockClient::new(Fixtures::new())),
        Arc::new(DemoClient::new()),
    ];
    for api in backends {
        assert_eq!(send_then_file(api.as_ref(), "grant-1").await.unwrap(), "Hello");
        assert!(inbox_subjects(api.as_ref(), "grant-1").await.is_ok());
    }
}

#[tokio::test]
async fn test_mock_records_what_the_code_did() {
    let mock = MockClient::new(Fixtures::new());
    send_then_file(&mock, "grant-1").await.unwrap();

    let operations: Vec<&str> = mock.calls().iter().map(|c| c.operation).collect();
    assert_eq!(operations, ["send_message", "create_folder"]);
    assert_eq!(inbox_subjects(&mock, "grant-1").await.unwrap(), ["Hello"]);
}

#[tokio::test]
async fn test_mock_failure_surfaces_through_trait() {
    let mock = MockClient::new(Fixtures::new());
    mock.fail_on("create_folder", Error::Config("scripted".into()));

    let err = send_then_file(&mock, "grant-1").await.unwrap_err();
    assert!(matches!(err, Error::Config(ref m) if m == "scripted"));
}

#[tokio::test]
async fn test_demo_listing_is_stable() {
    let demo = DemoClient::new();
    let subjects = inbox_subjects(&demo, "grant-1").await.unwrap();
    assert_eq!(subjects[0], "Q1 engine report");
    assert_eq!(subjects, inbox_subjects(&demo, "grant-2").await.unwrap());
}

#[test]
fn test_http_client_is_a_provider() {
    fn assert_provider<T: ProviderApi>() {}
    assert_provider::<HttpClient>();
    assert_provider::<MockClient>();
    assert_provider::<DemoClient>();
}

#[tokio::test]
async fn test_empty_grant_rejected_everywhere() {
    let backends: Vec<Box<dyn FoldersApi>> = vec![
        Box::new(MockClient::default()),
        Box::new(DemoClient::new()),
        Box::new(HttpClient::with_api_key("key").unwrap()),
    ];
    for api in backends {
        let err = api.list_folders(&Context::background(), "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{err:?}");
    }
}
