//! Eth modules with an interceptable dispatch entry point
//!
//! Every typed method funnels through `request`, which resolves the caller
//! function for a method (send, then map `null` lookups to not-found errors).
//! With [`Dispatch::Retrying`] that resolved caller is wrapped in the retry
//! policy before it runs; nothing else about the module changes.

use crate::errors::RpcResult;
use crate::eth::method::{
    block_params, block_result, data_result, quantity_result, u64_result, Block, BlockId,
    RpcMethod,
};
use crate::eth::transport::{AsyncJsonRpcTransport, JsonRpcTransport};
use crate::retry::{is_retryable_rpc_error, CallSite, RetryPolicy};
use alloy_primitives::U256;
use serde_json::{json, Value};

/// How the module's dispatch entry point is executed
#[derive(Debug, Clone, Default)]
pub enum Dispatch {
    /// Call the transport once
    #[default]
    Direct,
    /// Wrap the resolved caller in a retry policy
    Retrying(RetryPolicy),
}

impl Dispatch {
    pub fn is_retrying(&self) -> bool {
        matches!(self, Dispatch::Retrying(_))
    }
}

/// Map a `null` result to the method's not-found error, if it has one
fn check_result(method: RpcMethod, params: &Value, result: Value) -> RpcResult<Value> {
    if result.is_null() {
        if let Some(err) = method.not_found(params) {
            return Err(err);
        }
    }
    Ok(result)
}

/// Blocking eth module
pub struct Eth<T> {
    transport: T,
    dispatch: Dispatch,
}

impl<T: JsonRpcTransport> Eth<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            dispatch: Dispatch::Direct,
        }
    }

    /// Module whose every network call is retried per `policy`
    pub fn retryable(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            dispatch: Dispatch::Retrying(policy),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Resolve the function performing the network call for `method`
    fn retrieve_caller_fn<'a>(
        &'a self,
        method: RpcMethod,
        params: &'a Value,
    ) -> impl Fn() -> RpcResult<Value> + 'a {
        move || {
            let result = self.transport.send(method.name(), params)?;
            check_result(method, params, result)
        }
    }

    /// Dispatch entry point shared by every typed method
    pub fn request(&self, method: RpcMethod, params: Value) -> RpcResult<Value> {
        let caller = self.retrieve_caller_fn(method, &params);
        match &self.dispatch {
            Dispatch::Direct => caller(),
            Dispatch::Retrying(policy) => {
                let site = CallSite {
                    name: method.name(),
                    args: params.to_string(),
                };
                policy.execute_blocking(&site, is_retryable_rpc_error, caller)
            }
        }
    }

    pub fn block_number(&self) -> RpcResult<u64> {
        u64_result(self.request(RpcMethod::BlockNumber, json!([]))?)
    }

    pub fn chain_id(&self) -> RpcResult<u64> {
        u64_result(self.request(RpcMethod::ChainId, json!([]))?)
    }

    pub fn gas_price(&self) -> RpcResult<U256> {
        quantity_result(self.request(RpcMethod::GasPrice, json!([]))?)
    }

    pub fn max_priority_fee(&self) -> RpcResult<U256> {
        quantity_result(self.request(RpcMethod::MaxPriorityFeePerGas, json!([]))?)
    }

    pub fn get_balance(&self, address: &str, block: &BlockId) -> RpcResult<U256> {
        quantity_result(self.request(RpcMethod::GetBalance, json!([address, block.to_param()?]))?)
    }

    pub fn get_transaction_count(&self, address: &str, block: &BlockId) -> RpcResult<u64> {
        u64_result(self.request(
            RpcMethod::GetTransactionCount,
            json!([address, block.to_param()?]),
        )?)
    }

    pub fn get_block(&self, block: &BlockId, full_transactions: bool) -> RpcResult<Block> {
        let (method, params) = block_params(block, full_transactions)?;
        block_result(self.request(method, params)?)
    }

    pub fn get_transaction(&self, hash: &str) -> RpcResult<Value> {
        self.request(RpcMethod::GetTransactionByHash, json!([hash]))
    }

    pub fn get_transaction_receipt(&self, hash: &str) -> RpcResult<Value> {
        self.request(RpcMethod::GetTransactionReceipt, json!([hash]))
    }

    /// `eth_call`; returns the hex-encoded return data
    pub fn call(&self, transaction: Value, block: &BlockId) -> RpcResult<String> {
        data_result(self.request(RpcMethod::Call, json!([transaction, block.to_param()?]))?)
    }
}

/// Async eth module, same surface as [`Eth`]
pub struct AsyncEth<T> {
    transport: T,
    dispatch: Dispatch,
}

impl<T: AsyncJsonRpcTransport> AsyncEth<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            dispatch: Dispatch::Direct,
        }
    }

    /// Module whose every network call is retried per `policy`
    pub fn retryable(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            dispatch: Dispatch::Retrying(policy),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Dispatch entry point shared by every typed method
    pub async fn request(&self, method: RpcMethod, params: Value) -> RpcResult<Value> {
        let transport = &self.transport;
        let params = &params;
        let caller = move || async move {
            let result = transport.send(method.name(), params).await?;
            check_result(method, params, result)
        };

        match &self.dispatch {
            Dispatch::Direct => caller().await,
            Dispatch::Retrying(policy) => {
                let site = CallSite {
                    name: method.name(),
                    args: params.to_string(),
                };
                policy.execute(&site, is_retryable_rpc_error, caller).await
            }
        }
    }

    pub async fn block_number(&self) -> RpcResult<u64> {
        u64_result(self.request(RpcMethod::BlockNumber, json!([])).await?)
    }

    pub async fn chain_id(&self) -> RpcResult<u64> {
        u64_result(self.request(RpcMethod::ChainId, json!([])).await?)
    }

    pub async fn gas_price(&self) -> RpcResult<U256> {
        quantity_result(self.request(RpcMethod::GasPrice, json!([])).await?)
    }

    pub async fn max_priority_fee(&self) -> RpcResult<U256> {
        quantity_result(self.request(RpcMethod::MaxPriorityFeePerGas, json!([])).await?)
    }

    pub async fn get_balance(&self, address: &str, block: &BlockId) -> RpcResult<U256> {
        quantity_result(
            self.request(RpcMethod::GetBalance, json!([address, block.to_param()?]))
                .await?,
        )
    }

    pub async fn get_transaction_count(&self, address: &str, block: &BlockId) -> RpcResult<u64> {
        u64_result(
            self.request(
                RpcMethod::GetTransactionCount,
                json!([address, block.to_param()?]),
            )
            .await?,
        )
    }

    pub async fn get_block(&self, block: &BlockId, full_transactions: bool) -> RpcResult<Block> {
        let (method, params) = block_params(block, full_transactions)?;
        block_result(self.request(method, params).await?)
    }

    pub async fn get_transaction(&self, hash: &str) -> RpcResult<Value> {
        self.request(RpcMethod::GetTransactionByHash, json!([hash]))
            .await
    }

    pub async fn get_transaction_receipt(&self, hash: &str) -> RpcResult<Value> {
        self.request(RpcMethod::GetTransactionReceipt, json!([hash]))
            .await
    }

    /// `eth_call`; returns the hex-encoded return data
    pub async fn call(&self, transaction: Value, block: &BlockId) -> RpcResult<String> {
        data_result(
            self.request(RpcMethod::Call, json!([transaction, block.to_param()?]))
                .await?,
        )
    }
}
