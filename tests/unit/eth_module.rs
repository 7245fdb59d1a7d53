use alloy_primitives::U256;
use serde_json::{json, Value};
use web3_utils::errors::RpcError;
use web3_utils::eth::{calculate_max_tx_fees, AsyncEth, BlockId, Eth, RpcMethod};
use web3_utils::retry::StopCondition;

use crate::common::{block_json, fast_policy, FakeRpcTransport};

/// Tests for the eth modules' typed surface and dispatch modes
///
/// The transport is scripted per test; `methods()` shows exactly which
/// JSON-RPC calls reached it and in which order.

#[test]
fn test_typed_methods_decode_quantities() {
    let transport = FakeRpcTransport::scripted(vec![
        Ok(json!("0x1")),
        Ok(json!("0x1b4")),
        Ok(json!("0xde0b6b3a7640000")),
        Ok(json!("0x2a")),
    ]);
    let eth = Eth::new(transport.clone());

    assert_eq!(eth.chain_id().unwrap(), 1);
    assert_eq!(eth.block_number().unwrap(), 436);
    assert_eq!(
        eth.get_balance("0xC00f6cf15Ab248989838AA01D25177ec2510A81D", &BlockId::Latest)
            .unwrap(),
        U256::from(1_000_000_000_000_000_000u64)
    );
    assert_eq!(
        eth.get_transaction_count("0xC00f6cf15Ab248989838AA01D25177ec2510A81D", &BlockId::Pending)
            .unwrap(),
        42
    );

    assert_eq!(
        transport.methods(),
        vec![
            "eth_chainId",
            "eth_blockNumber",
            "eth_getBalance",
            "eth_getTransactionCount"
        ]
    );
}

#[test]
fn test_retrying_module_recovers_missing_block() {
    let transport = FakeRpcTransport::scripted(vec![
        Ok(Value::Null),
        Ok(Value::Null),
        Ok(block_json(100, 7)),
    ]);
    let eth = Eth::retryable(transport.clone(), fast_policy(StopCondition::Never));

    let block = eth.get_block(&BlockId::Number(100), false).unwrap();

    assert_eq!(block.number().unwrap(), Some(100));
    assert_eq!(transport.methods().len(), 3);
    assert!(transport
        .methods()
        .iter()
        .all(|m| m == RpcMethod::GetBlockByNumber.name()));
}

#[test]
fn test_block_by_hash_uses_hash_method() {
    let transport = FakeRpcTransport::scripted(vec![Ok(block_json(5, 1))]);
    let eth = Eth::new(transport.clone());

    eth.get_block(&BlockId::Hash(format!("0x{:064x}", 5)), true)
        .unwrap();

    assert_eq!(transport.methods(), vec!["eth_getBlockByHash"]);
}

#[tokio::test]
async fn test_malformed_block_hash_never_reaches_the_node() {
    let transport = FakeRpcTransport::scripted(vec![Ok(block_json(5, 1))]);
    let eth = Eth::retryable(transport.clone(), fast_policy(StopCondition::Never));

    let err = eth
        .get_block(&BlockId::Hash("0x1234".to_string()), false)
        .unwrap_err();
    assert!(matches!(err, RpcError::InvalidArgument(_)));

    let async_eth = AsyncEth::retryable(transport.clone(), fast_policy(StopCondition::Never));
    let err = async_eth
        .get_balance(
            "0xC00f6cf15Ab248989838AA01D25177ec2510A81D",
            &BlockId::Hash("latest".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::InvalidArgument(_)));

    assert!(transport.methods().is_empty());
}

#[test]
fn test_retrying_module_gives_up_with_not_found() {
    let transport = FakeRpcTransport::scripted(vec![
        Ok(Value::Null),
        Ok(Value::Null),
        Ok(Value::Null),
    ]);
    let eth = Eth::retryable(transport.clone(), fast_policy(StopCondition::AfterAttempt(3)));

    let err = eth
        .get_transaction_receipt("0xdeadbeef")
        .unwrap_err();

    assert!(matches!(err, RpcError::TransactionNotFound(ref hash) if hash == "0xdeadbeef"));
    assert_eq!(transport.methods().len(), 3);
}

#[test]
fn test_retrying_module_does_not_retry_rpc_errors() {
    let transport = FakeRpcTransport::scripted(vec![
        Err(RpcError::Rpc {
            code: -32000,
            message: "execution reverted".to_string(),
        }),
        Ok(json!("0x")),
    ]);
    let eth = Eth::retryable(transport.clone(), fast_policy(StopCondition::Never));

    let err = eth
        .call(json!({ "to": "0x0000000000000000000000000000000000000000" }), &BlockId::Latest)
        .unwrap_err();

    assert!(matches!(err, RpcError::Rpc { code: -32000, .. }));
    assert_eq!(transport.methods(), vec!["eth_call"]);
}

#[test]
fn test_direct_module_surfaces_first_failure() {
    let transport = FakeRpcTransport::scripted(vec![
        Err(RpcError::Connection("refused".to_string())),
        Ok(json!("0x1")),
    ]);
    let eth = Eth::new(transport.clone());

    assert!(matches!(eth.gas_price(), Err(RpcError::Connection(_))));
    assert!(!eth.dispatch().is_retrying());
    assert_eq!(transport.methods().len(), 1);
}

#[tokio::test]
async fn test_async_module_retries_connector_errors() {
    let transport = FakeRpcTransport::scripted(vec![
        Err(RpcError::ConnectorConnection("connection reset".to_string())),
        Err(RpcError::Http {
            status: 503,
            message: "unavailable".to_string(),
        }),
        Ok(json!("0x10")),
    ]);
    let eth = AsyncEth::retryable(transport.clone(), fast_policy(StopCondition::Never));

    assert_eq!(eth.block_number().await.unwrap(), 16);
    assert!(eth.dispatch().is_retrying());
    assert_eq!(transport.methods().len(), 3);
}

#[tokio::test]
async fn test_max_fees_through_retrying_module() {
    let transport = FakeRpcTransport::scripted(vec![
        Ok(block_json(200, 10_000_000_000)),
        Err(RpcError::Timeout("operation timed out".to_string())),
        Ok(json!("0x77359400")),
    ]);
    let eth = AsyncEth::retryable(transport.clone(), fast_policy(StopCondition::Never));

    let (max_fee, priority_fee) = calculate_max_tx_fees(&eth).await.unwrap();

    assert_eq!(priority_fee, U256::from(2_000_000_000u64));
    assert_eq!(max_fee, U256::from(22_000_000_000u64));
}
