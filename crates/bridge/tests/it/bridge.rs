use crate::utils::Harness;
use alloy_primitives::Address;
use serde_json::json;
use widget_bridge::{BridgeConfig, config::DEFAULT_ACCOUNT, rpc::error::ErrorCode};

#[tokio::test(flavor = "multi_thread")]
async fn can_get_chain_id() {
    let mut harness = Harness::new();
    harness.request("1", "eth_chainId", json!([]));
    assert_eq!(harness.recv().await, json!({ "id": "1", "success": true, "data": "0x1" }));
    harness.assert_silent().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn can_get_accounts() {
    let mut harness = Harness::new();
    harness.request("acc", "eth_accounts", json!([]));
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "acc");
    assert_eq!(resp["success"], true);
    let accounts: Vec<Address> = serde_json::from_value(resp["data"].clone()).unwrap();
    assert_eq!(accounts, vec![DEFAULT_ACCOUNT]);
}

#[tokio::test(flavor = "multi_thread")]
async fn can_switch_chain() {
    let mut harness = Harness::new();
    harness.request("switch", "wallet_switchEthereumChain", json!([{ "chainId": "0x5" }]));
    assert_eq!(harness.recv().await, json!({ "id": "switch", "success": true, "data": null }));

    assert_eq!(harness.chain_id("after").await, "0x5");
    assert!(!harness.bridge.is_disposed());
}

#[tokio::test(flavor = "multi_thread")]
async fn rejects_invalid_chain_id() {
    let mut harness = Harness::new();
    harness.request("bad", "wallet_switchEthereumChain", json!([{ "chainId": "not-hex" }]));
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "bad");
    assert_eq!(resp["success"], false);
    assert_eq!(resp["error"]["code"], json!(ErrorCode::InvalidParams.code()));
    assert!(resp.get("data").is_none());

    assert_eq!(harness.chain_id("check").await, "0x1");
}

#[tokio::test(flavor = "multi_thread")]
async fn accounts_survive_chain_switch() {
    let mut harness = Harness::new();
    harness.request("a", "eth_accounts", json!([]));
    let before = harness.recv().await["data"].clone();

    harness.request("s", "wallet_switchEthereumChain", json!([{ "chainId": "0xaa36a7" }]));
    assert_eq!(harness.recv().await["success"], true);

    harness.request("b", "eth_accounts", json!([]));
    assert_eq!(harness.recv().await["data"], before);
}

#[tokio::test(flavor = "multi_thread")]
async fn send_transaction_is_not_implemented() {
    let mut harness = Harness::new();
    harness.request(
        "tx",
        "eth_sendTransaction",
        json!([{ "to": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8", "value": "0x1" }]),
    );
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "tx");
    assert_eq!(resp["success"], false);
    let message = resp["error"]["message"].as_str().unwrap().to_lowercase();
    assert!(message.contains("not implemented"), "{message}");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_method_fails() {
    let mut harness = Harness::new();
    harness.request("u", "eth_sign", json!(["0x00", "0x00"]));
    similar_asserts::assert_eq!(
        harness.recv().await,
        json!({
            "id": "u",
            "success": false,
            "error": {
                "code": ErrorCode::MethodNotFound.code(),
                "message": "Method: eth_sign is not supported by this host."
            }
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_params_of_known_method_are_invalid() {
    let mut harness = Harness::new();
    harness.request("p", "wallet_switchEthereumChain", json!(["unknown variant"]));
    let resp = harness.recv().await;
    assert_eq!(resp["id"], "p");
    assert_eq!(resp["error"]["code"], json!(ErrorCode::InvalidParams.code()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn switch_is_visible_to_next_request() {
    let mut harness = Harness::new();
    harness.request("switch", "wallet_switchEthereumChain", json!([{ "chainId": "0x5" }]));
    harness.request("read", "eth_chainId", json!([]));
    harness.request("accounts", "eth_accounts", json!([]));

    assert_eq!(harness.recv().await["id"], "switch");
    assert_eq!(harness.recv().await, json!({ "id": "read", "success": true, "data": "0x5" }));
    assert_eq!(harness.recv().await["id"], "accounts");
}

#[tokio::test(flavor = "multi_thread")]
async fn ignores_spoofed_requests() {
    let mut harness = Harness::new();
    let (attacker, mut attacker_inbox) = harness.bus.open_window();

    harness.bus.dispatch(
        attacker,
        json!({ "id": "evil", "method": "wallet_switchEthereumChain", "params": [{ "chainId": "0x5" }] }),
    );
    assert_eq!(harness.chain_id("check").await, "0x1");
    harness.assert_silent().await;
    assert!(attacker_inbox.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn ignores_non_rpc_traffic() {
    let mut harness = Harness::new();
    for data in [
        json!({ "type": "webpackHotUpdate" }),
        json!({ "id": 1, "method": "eth_chainId" }),
        json!({ "id": "no-method" }),
        json!({ "method": "eth_chainId" }),
        json!({ "id": "x", "method": "wallet_switchEthereumChain", "params": { "chainId": "0x5" } }),
        json!("eth_chainId"),
        json!(null),
    ] {
        harness.bus.dispatch(harness.widget, data);
    }

    assert_eq!(harness.chain_id("check").await, "0x1");
    harness.assert_silent().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn seeds_session_from_config() {
    let config = BridgeConfig::default().with_chain_id(137u64);
    let mut harness =
        Harness::with_handler(widget_bridge::WalletApi::from_config(&config), None);
    assert_eq!(harness.chain_id("1").await, "0x89");
}

#[tokio::test(flavor = "multi_thread")]
async fn nothing_is_posted_after_dispose() {
    let mut harness = Harness::new();
    assert_eq!(harness.bus.listener_count(), 1);

    harness.bridge.dispose();
    assert!(harness.bridge.is_disposed());
    assert_eq!(harness.bus.listener_count(), 0);

    assert_eq!(harness.bus.dispatch(harness.widget, json!({ "id": "1", "method": "eth_chainId" })), 0);
    harness.assert_silent().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_flushes_pending_responses() {
    let Harness { bus, widget, mut inbox, bridge } = Harness::new();
    for id in ["1", "2", "3"] {
        bus.dispatch(widget, json!({ "id": id, "method": "eth_chainId" }));
    }
    bridge.shutdown().await;
    assert_eq!(bus.listener_count(), 0);

    let mut ids = Vec::new();
    while let Ok(resp) = inbox.try_recv() {
        ids.push(resp["id"].as_str().unwrap().to_string());
    }
    ids.sort();
    assert_eq!(ids, ["1", "2", "3"]);
}
