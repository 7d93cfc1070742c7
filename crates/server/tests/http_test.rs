#![cfg(feature = "http")]

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use ephemq_server::transport::http::{router, run_server};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn call(request: Request<Body>) -> anyhow::Result<Value> {
    let response = router(common::handler()).oneshot(request).await?;
    // Failures are reported in the envelope, never in the HTTP status.
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

fn post(uri: &str, body: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn test_get_query_string() -> anyhow::Result<()> {
    let value = call(get(
        "/getTargetOrientations?toFrame=-85000&refFrame=1&ets=690201375.8323615&ets=690201389.2866975&ckQualities=smithed",
    )?)
    .await?;

    assert_eq!(value["statusCode"], 200);
    let result = &value["body"]["return"];
    assert_eq!(result["function"], "getTargetOrientations");
    assert_eq!(result["toFrame"], -85000);
    assert_eq!(result["ets"], json!([690201375.8323615, 690201389.2866975]));
    assert_eq!(result["ckQualities"], json!(["smithed"]));
    assert_eq!(result["options"]["limitCk"], -1);

    Ok(())
}

#[tokio::test]
async fn test_post_body() -> anyhow::Result<()> {
    let value = call(post(
        "/extractExactCkTimes",
        r#"{"observStart": 302228504.36, "observEnd": 302228600.0, "targetFrame": -85600, "kernelList": "[a.bc, b.bc]"}"#,
    )?)
    .await?;

    assert_eq!(value["statusCode"], 200);
    let result = &value["body"]["return"];
    assert_eq!(result["targetFrame"], -85600);
    assert_eq!(result["options"]["limitCk"], 1);
    assert_eq!(result["options"]["kernelList"], json!(["a.bc", "b.bc"]));

    Ok(())
}

#[tokio::test]
async fn test_post_unbracketed_times() -> anyhow::Result<()> {
    let value = call(post(
        "/getTargetOrientations",
        r#"{"toFrame": -85000, "refFrame": 1, "startEts": "0, 100", "stopEts": "5, 110", "exposureDuration": "1, 2"}"#,
    )?)
    .await?;

    assert_eq!(value["statusCode"], 200);
    assert_eq!(
        value["body"]["return"]["ets"],
        json!([0.0, 1.0, 2.0, 3.0, 4.0, 100.0, 102.0, 104.0, 106.0, 108.0])
    );

    let value = call(post("/getTargetOrientations", r#"{"toFrame": -85000, "refFrame": 1, "ets": "1.0, 2.0"}"#)?).await?;
    assert_eq!(value["body"]["return"]["ets"], json!([1.0, 2.0]));

    Ok(())
}

#[tokio::test]
async fn test_get_and_post_agree() -> anyhow::Result<()> {
    let from_get = call(get("/frameTrace?et=302228504.36&initialFrame=-85600&mission=lroc")?).await?;
    let from_post = call(post(
        "/frameTrace",
        r#"{"et": 302228504.36, "initialFrame": -85600, "mission": "lroc"}"#,
    )?)
    .await?;

    assert_eq!(from_get, from_post);
    Ok(())
}

#[tokio::test]
async fn test_validation_error_envelope() -> anyhow::Result<()> {
    let value = call(get("/doubleSclkToEt?frameCode=-85&sclk=%5B1,2%5D")?).await?;

    assert_eq!(value["statusCode"], 500);
    let error = value["body"]["error"].as_str().unwrap();
    assert!(error.starts_with("Type mismatch"), "{}", error);
    assert!(value["body"].get("return").is_none());

    Ok(())
}

#[tokio::test]
async fn test_engine_error_envelope() -> anyhow::Result<()> {
    let value = call(get("/translateNameToCode?frame=NOWHERE")?).await?;
    assert_eq!(
        value,
        json!({
            "statusCode": 500,
            "body": { "error": "SPICE(NOTRANSLATION): no code for NOWHERE" }
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_body() -> anyhow::Result<()> {
    let value = call(post("/utcToEt", "{not json")?).await?;

    assert_eq!(value["statusCode"], 500);
    let error = value["body"]["error"].as_str().unwrap();
    assert!(error.starts_with("Parse error: malformed request body"), "{}", error);

    Ok(())
}

#[tokio::test]
async fn test_every_operation_routed() -> anyhow::Result<()> {
    for operation in ephemq::Operation::ALL {
        let value = call(get(&operation.path())?).await?;
        // No parameters: each route reaches validation and reports what is missing.
        assert_eq!(value["statusCode"], 500, "{}", operation);
    }

    let listing = call(get("/")?).await?;
    assert_eq!(listing.as_array().map(Vec::len), Some(ephemq::Operation::ALL.len()));

    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> anyhow::Result<()> {
    let response = router(common::handler()).oneshot(get("/getEverything")?).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_http_graceful_shutdown() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(run_server(listener, common::handler(), async move {
        let _ = rx.await;
    }));

    tx.send(()).ok();
    server.await??;

    Ok(())
}
