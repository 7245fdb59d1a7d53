use crate::errors::AppResult;
use crate::utils::address::{is_null_address, normalize_address};
use crate::utils::units::{convert_to_standard_notation, gwei_to_wei};
use clap::Args;

/// Print the EIP-55 checksum form of an address
#[derive(Args)]
pub struct ChecksumCommand {
    /// Address, with or without the 0x prefix
    pub address: String,
}

impl ChecksumCommand {
    pub fn run(&self) -> AppResult<()> {
        let checksummed = normalize_address(&self.address)?;
        if is_null_address(&checksummed) {
            println!("{} (null address)", checksummed);
        } else {
            println!("{}", checksummed);
        }
        Ok(())
    }
}

/// Convert a gwei amount to wei
#[derive(Args)]
pub struct GweiToWeiCommand {
    /// Amount in gwei, decimals allowed
    pub amount: String,
}

impl GweiToWeiCommand {
    pub fn run(&self) -> AppResult<()> {
        let wei = gwei_to_wei(&self.amount)?;
        println!("{}", convert_to_standard_notation(&wei));
        Ok(())
    }
}
