//! Shared-state atomicity and registry-creation races.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use remit_client::{AccountProxy, lookup};
use remit_harness::{ephemeral_registry_config, free_port, registry_config, spawn_server};
use remit_server::Server;

const CALL_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_set_balance_leaves_exactly_one_written_value() {
    let server = spawn_server(ephemeral_registry_config()).await.unwrap();
    let registry = server.addr.to_string();

    let target = lookup(&registry, "Account", CALL_TIMEOUT).await.unwrap();

    // One connection per writer so the invocations actually race on the
    // server, not in a single client channel.
    let written: Vec<f64> = (0..8).map(|i| f64::from(i) * 1_000.0 + 17.0).collect();
    let writers: Vec<_> = written
        .iter()
        .map(|value| {
            let target = target.clone();
            let value = *value;
            tokio::spawn(async move {
                let mut proxy = AccountProxy::connect(&target, CALL_TIMEOUT).await.unwrap();
                proxy.set_balance(value).await.unwrap();
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }

    let mut proxy = AccountProxy::connect(&target, CALL_TIMEOUT).await.unwrap();
    let balance = proxy.balance().await.unwrap();

    assert!(
        written.iter().any(|v| (balance - v).abs() < f64::EPSILON),
        "balance {balance} is not one of the written values"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_create_or_attach_both_succeed() {
    let port = free_port().unwrap();
    let registry = format!("127.0.0.1:{port}");

    let (first, second) = tokio::join!(
        Server::bind(registry_config(&registry)),
        Server::bind(registry_config(&registry)),
    );

    // One created the registry, the other attached; neither failed.
    let first = first.unwrap();
    let second = second.unwrap();

    let ids = [first.published_ref().object_id, second.published_ref().object_id];
    tokio::spawn(first.run());
    tokio::spawn(second.run());

    // Whichever published last owns the name; both publications must
    // have gone through without error.
    let mut resolved = None;
    for _ in 0..50 {
        if let Ok(target) = lookup(&registry, "Account", CALL_TIMEOUT).await {
            resolved = Some(target);
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let target = resolved.expect("no binding appeared after the race");
    assert!(ids.contains(&target.object_id));
}
