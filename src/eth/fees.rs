use crate::errors::{RpcError, RpcResult};
use crate::eth::method::BlockId;
use crate::eth::module::AsyncEth;
use crate::eth::transport::AsyncJsonRpcTransport;
use alloy_primitives::U256;

/// EIP-1559 fee caps for a new transaction
///
/// Returns `(max_fee_per_gas, max_priority_fee_per_gas)` where the max fee
/// leaves room for the base fee to double.
pub async fn calculate_max_tx_fees<T: AsyncJsonRpcTransport>(
    eth: &AsyncEth<T>,
) -> RpcResult<(U256, U256)> {
    let (latest_block, max_priority_fee_per_gas) = futures::try_join!(
        eth.get_block(&BlockId::Latest, false),
        eth.max_priority_fee()
    )?;

    let base_fee_per_gas = latest_block.base_fee_per_gas()?.ok_or_else(|| {
        RpcError::Deserialisation("latest block has no baseFeePerGas".to_string())
    })?;

    let max_fee_per_gas = max_priority_fee_per_gas + U256::from(2u64) * base_fee_per_gas;
    Ok((max_fee_per_gas, max_priority_fee_per_gas))
}
