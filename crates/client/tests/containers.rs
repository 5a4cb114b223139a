//! Top container lookups and merging.

mod support;

use aspace_domain::AspaceError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use support::{connected_client, mock_backend};

#[tokio::test]
async fn barcode_lookup_hits_the_find_by_barcode_endpoint() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/find_by_barcode/container"))
        .and(query_param("barcode", "39015012345678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "/repositories/2/top_containers/3",
            "indicator": "1",
            "barcode": "39015012345678"
        })))
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    let container = client.find_top_container_by_barcode("39015012345678").await.expect("lookup");
    assert_eq!(container["uri"], "/repositories/2/top_containers/3");
}

#[tokio::test]
async fn merge_rewrites_instances_and_deletes_the_source() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/metadata_for_container/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "archival_objects": [
                {"archival_object_uri": "/repositories/2/archival_objects/10"},
                {"archival_object_uri": "/repositories/2/archival_objects/11"}
            ]
        })))
        .mount(&server)
        .await;
    // Object 10 references the source container and gets rewritten.
    Mock::given(method("GET"))
        .and(path("/repositories/2/archival_objects/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "/repositories/2/archival_objects/10",
            "instances": [{"sub_container": {"top_container": {
                "ref": "/repositories/2/top_containers/1"
            }}}]
        })))
        .mount(&server)
        .await;
    // Object 11 points elsewhere already; no update should be posted for it.
    Mock::given(method("GET"))
        .and(path("/repositories/2/archival_objects/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "/repositories/2/archival_objects/11",
            "instances": [{"sub_container": {"top_container": {
                "ref": "/repositories/2/top_containers/9"
            }}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repositories/2/archival_objects/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Updated"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repositories/2/top_containers/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    let updated = client.merge_top_containers(1, 2).await.expect("merge");
    assert_eq!(updated, 1);
}

#[tokio::test]
async fn failed_update_aborts_the_merge_before_source_deletion() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/metadata_for_container/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "archival_objects": [
                {"archival_object_uri": "/repositories/2/archival_objects/10"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/archival_objects/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "/repositories/2/archival_objects/10",
            "instances": [{"sub_container": {"top_container": {
                "ref": "/repositories/2/top_containers/1"
            }}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repositories/2/archival_objects/10"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "lock_version mismatch"})),
        )
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    let err = client.merge_top_containers(1, 2).await.unwrap_err();
    match err {
        AspaceError::Communication { status, .. } => assert_eq!(status, 400),
        other => panic!("expected communication error, got {other:?}"),
    }

    // The source container must survive a failed merge.
    let requests = server.received_requests().await.expect("request log");
    assert!(requests.iter().all(|r| r.method.to_string() != "DELETE"));
}
