mod common;

use ephemq::{Operation, RawParams};
use ephemq_server::{EphemqServiceClient, Handler, run_server};
use serde_json::json;
use std::net::SocketAddr;
use tarpc::tokio_serde::formats::Json;
use tarpc::{client, context};

async fn serve(handler: Handler) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let bound_addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = run_server(listener, handler, futures::future::pending()).await;
    });

    Ok(bound_addr)
}

async fn connect(addr: SocketAddr) -> anyhow::Result<EphemqServiceClient> {
    let transport = tarpc::serde_transport::tcp::connect(addr, Json::default).await?;
    Ok(EphemqServiceClient::new(client::Config::default(), transport).spawn())
}

#[tokio::test]
async fn test_rpc_lifecycle() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let client = connect(serve(common::handler()).await?).await?;

    let operations = client.operations(context::current()).await?;
    assert_eq!(operations.len(), Operation::ALL.len());

    let params = RawParams::from_query_pairs([
        ("target", "MOON"),
        ("observer", "EARTH"),
        ("frame", "J2000"),
        ("abcorr", "NONE"),
        ("startEts", "[0, 100]"),
        ("stopEts", "[5, 110]"),
        ("exposureDuration", "[1, 2]"),
    ])?;
    let envelope = client
        .query(context::current(), Operation::GetTargetStates, params)
        .await?;

    assert!(envelope.is_success());
    let value = serde_json::to_value(&envelope)?;
    assert_eq!(
        value["body"]["return"]["ets"],
        json!([0.0, 1.0, 2.0, 3.0, 4.0, 100.0, 102.0, 104.0, 106.0, 108.0])
    );
    assert_eq!(value["body"]["kernels"]["lsk"], json!(["naif0012.tls"]));

    Ok(())
}

#[tokio::test]
async fn test_rpc_errors_in_envelope() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let client = connect(serve(common::handler()).await?).await?;

    // Validation failure
    let params = RawParams::from_json(json!({ "toFrame": -85000, "refFrame": 1 }))?;
    let envelope = client
        .query(context::current(), Operation::GetTargetOrientations, params)
        .await?;
    assert_eq!(envelope.status_code, 500);
    assert!(envelope.error_message().unwrap().starts_with("Missing parameter"));

    // Engine failure, message forwarded verbatim
    let params = RawParams::from_json(json!({ "frame": "NOWHERE" }))?;
    let envelope = client
        .query(context::current(), Operation::TranslateNameToCode, params)
        .await?;
    assert_eq!(envelope.status_code, 500);
    assert_eq!(
        envelope.error_message(),
        Some("SPICE(NOTRANSLATION): no code for NOWHERE")
    );

    Ok(())
}

#[tokio::test]
async fn test_rpc_concurrent_clients() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let addr = serve(common::handler()).await?;

    let mut tasks = Vec::new();
    for i in 0..8 {
        tasks.push(tokio::spawn(async move {
            let client = connect(addr).await?;
            let params = RawParams::from_json(json!({ "et": i, "format": "ISOC", "precision": 3 }))?;
            let envelope = client
                .query(context::current(), Operation::EtToUtc, params)
                .await?;
            anyhow::Ok(serde_json::to_value(&envelope)?)
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let value = task.await??;
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["body"]["return"]["et"], json!(i as f64));
    }

    Ok(())
}

#[tokio::test]
async fn test_rpc_graceful_shutdown() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(run_server(
        listener,
        common::handler(),
        Box::pin(async move {
            let _ = rx.await;
        }),
    ));

    tx.send(()).ok();
    server.await??;

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_rpc_with_command_engine() -> anyhow::Result<()> {
    use ephemq::{CommandEngine, NormalizeConfig};
    use std::sync::Arc;

    tracing_subscriber::fmt::try_init().ok();
    let engine = CommandEngine::new("sh").with_args([
        "-c",
        r#"cat > /dev/null; echo '{"return": 533389101.0, "kernels": {"lsk": ["naif0012.tls"]}}'"#,
    ]);
    let handler = Handler::new(Arc::new(engine), NormalizeConfig::default());
    let client = connect(serve(handler).await?).await?;

    let params = RawParams::from_query_pairs([("utc", "2016-11-26T22:32:14.582000")])?;
    let envelope = client
        .query(context::current(), Operation::UtcToEt, params)
        .await?;
    assert_eq!(
        serde_json::to_value(&envelope)?,
        json!({
            "statusCode": 200,
            "body": { "return": 533389101.0, "kernels": { "lsk": ["naif0012.tls"] } }
        })
    );

    Ok(())
}
