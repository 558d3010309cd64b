#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{MockTransport, client, header, response, response_with_header};
use futures_util::StreamExt;
use http::Method;
use nimbus_core::{AdditionalSuccess, NimbusError, OperationDescriptor, PathParams};
use serde_json::json;

const LIST_NETWORKS: OperationDescriptor = OperationDescriptor::new(
    "ListNetworks",
    Method::GET,
    "/v1/projects/{project}/networks",
    200,
)
.with_additional_success(&[AdditionalSuccess::new(206, true)])
.paginated("Range", "Content-Range");

fn project() -> PathParams {
    PathParams::from([("project", "p1")])
}

#[tokio::test]
async fn yields_two_pages_and_forwards_the_cursor() {
    let transport = MockTransport::new();
    transport.push(response_with_header(
        200,
        json!({"items": ["net-a", "net-b"]}),
        "Content-Range",
        "page-two",
    ));
    transport.push(response(206, json!({"items": ["net-c"]})));

    let client = client(&transport);
    let paginator = client.paginator(&LIST_NETWORKS, project());
    let pages = paginator.try_collect_pages().await.unwrap();

    assert_eq!(
        pages,
        vec![
            json!({"items": ["net-a", "net-b"]}),
            json!({"items": ["net-c"]})
        ]
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(header(&requests[0], "range").is_none());
    assert_eq!(header(&requests[1], "range"), Some("page-two"));
    assert!(requests.iter().all(|r| r.path == "/v1/projects/p1/networks"));
}

#[tokio::test]
async fn fetches_lazily() {
    let transport = MockTransport::new();
    transport.push(response_with_header(200, json!([1]), "Content-Range", "c2"));
    transport.push(response(206, json!([2])));

    let client = client(&transport);
    let paginator = client.paginator(&LIST_NETWORKS, project());
    let mut pages = std::pin::pin!(paginator.pages());
    assert_eq!(transport.request_count(), 0);

    assert_eq!(pages.next().await.unwrap().unwrap(), json!([1]));
    assert_eq!(transport.request_count(), 1);

    assert_eq!(pages.next().await.unwrap().unwrap(), json!([2]));
    assert!(pages.next().await.is_none());
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn each_walk_starts_from_the_first_page() {
    let transport = MockTransport::new();
    transport.push(response(200, json!(["first"])));
    transport.push(response(200, json!(["again"])));

    let client = client(&transport);
    let paginator = client.paginator(&LIST_NETWORKS, project());
    assert_eq!(paginator.try_collect_pages().await.unwrap(), vec![json!(["first"])]);
    assert_eq!(paginator.try_collect_pages().await.unwrap(), vec![json!(["again"])]);

    assert!(
        transport
            .requests()
            .iter()
            .all(|r| header(r, "range").is_none())
    );
}

#[tokio::test]
async fn error_ends_the_walk() {
    let transport = MockTransport::new();
    transport.push(response_with_header(200, json!([1]), "Content-Range", "c2"));
    transport.push(response(
        503,
        json!({"type": "about:blank", "title": "Unavailable", "status": 503}),
    ));

    let client = client(&transport);
    let paginator = client.paginator(&LIST_NETWORKS, project());
    let items: Vec<Result<serde_json::Value, NimbusError>> = paginator.pages().collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), &json!([1]));
    assert_eq!(items[1].as_ref().unwrap_err().status(), Some(503));

    let err = {
        let transport = MockTransport::new();
        transport.push(response_with_header(200, json!([1]), "Content-Range", "c2"));
        transport.push(response(500, json!(null)));
        let client = common::client(&transport);
        client
            .paginator(&LIST_NETWORKS, project())
            .try_collect_pages()
            .await
            .unwrap_err()
    };
    assert!(matches!(err, NimbusError::UnexpectedStatus { status: 500, .. }));
}
