use crate::utils::{GatedSender, Harness, PanickingSender};
use alloy_primitives::TxHash;
use serde_json::json;
use std::{collections::BTreeSet, time::Duration};
use widget_bridge::{BridgeConfig, WalletApi, rpc::error::ErrorCode};

#[tokio::test(flavor = "multi_thread")]
async fn fast_requests_overtake_slow_ones() {
    let sender = GatedSender::new();
    let mut harness = Harness::with_sender(sender.clone());

    harness.request("slow", "eth_sendTransaction", json!([{}]));
    harness.request("fast", "eth_chainId", json!([]));
    assert_eq!(harness.recv().await["id"], "fast");
    harness.assert_silent().await;

    sender.release(1);
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "slow");
    assert_eq!(resp["success"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_transaction_keeps_dispatch_session() {
    let sender = GatedSender::new();
    let mut harness = Harness::with_sender(sender.clone());

    harness.request("tx", "eth_sendTransaction", json!([{ "value": "0x0" }]));
    // messages are decoded in receive order, so the transaction is in flight by now
    assert_eq!(harness.chain_id("read").await, "0x1");

    harness.request("switch", "wallet_switchEthereumChain", json!([{ "chainId": "0x5" }]));
    assert_eq!(harness.recv().await["id"], "switch");

    sender.release(1);
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "tx");
    assert_eq!(resp["data"], serde_json::to_value(TxHash::with_last_byte(1)).unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn answers_every_request_exactly_once() {
    let mut harness = Harness::new();
    let methods = ["eth_chainId", "eth_accounts", "eth_estimateGas", "eth_sign"];

    let mut expected = BTreeSet::new();
    for i in 0..64 {
        let id = format!("req-{i}");
        let params = if i % 4 == 2 { json!([{}]) } else { json!([]) };
        harness.request(&id, methods[i % 4], params);
        expected.insert(id);
    }

    let mut seen = BTreeSet::new();
    for _ in 0..expected.len() {
        let resp = harness.recv().await;
        let id = resp["id"].as_str().unwrap().to_string();
        assert!(seen.insert(id.clone()), "duplicate response for {id}");
    }
    assert_eq!(seen, expected);
    harness.assert_silent().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn in_flight_requests_are_dropped_on_dispose() {
    let sender = GatedSender::new();
    let mut harness = Harness::with_sender(sender.clone());

    harness.request("tx", "eth_sendTransaction", json!([{}]));
    assert_eq!(harness.chain_id("read").await, "0x1");

    harness.bridge.dispose();
    sender.release(1);
    harness.assert_silent().await;
    assert_eq!(harness.bus.listener_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn handler_panic_leaves_bridge_running() {
    let mut harness = Harness::with_sender(std::sync::Arc::new(PanickingSender));

    harness.request("boom", "eth_sendTransaction", json!([{}]));
    assert_eq!(harness.chain_id("after").await, "0x1");
    harness.assert_silent().await;

    assert_eq!(harness.chain_id("again").await, "0x1");
}

#[tokio::test(start_paused = true)]
async fn stalled_requests_time_out() {
    let sender = GatedSender::new();
    let api = WalletApi::from_config(&BridgeConfig::default()).with_sender(sender);
    let mut harness = Harness::with_handler(api, Some(Duration::from_secs(1)));

    harness.request("stuck", "eth_sendTransaction", json!([{}]));
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "stuck");
    assert_eq!(resp["success"], false);
    assert_eq!(resp["error"]["code"], json!(ErrorCode::LimitExceeded.code()));

    assert_eq!(harness.chain_id("fine").await, "0x1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn back_to_back_switch_and_read_stay_ordered() {
    let mut harness = Harness::new();
    for round in 0..300 {
        let chain = format!("{:#x}", round % 2 + 5);
        harness.request("switch", "wallet_switchEthereumChain", json!([{ "chainId": chain }]));
        harness.request("read", "eth_chainId", json!([]));

        let switched = harness.recv().await;
        assert_eq!(switched["id"], "switch");
        assert_eq!(switched["success"], true);
        let read = harness.recv().await;
        assert_eq!(read["id"], "read");
        assert_eq!(read["data"], chain, "stale chain id in round {round}");
    }
}
