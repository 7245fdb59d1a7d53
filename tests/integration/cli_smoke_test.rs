//! CLI Smoke Test
//!
//! Parses real argument vectors and runs the offline commands end to end.

use clap::Parser;
use web3_utils::cli::{Cli, Commands};
use web3_utils::errors::AppError;

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["web3-utils"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn test_offline_commands_succeed() {
    for args in [
        vec!["checksum", "0xc00f6cf15ab248989838aa01d25177ec2510a81d"],
        vec!["checksum", "0x0000000000000000000000000000000000000000"],
        vec!["gwei-to-wei", "32000130042"],
        vec!["gwei-to-wei", "0.5"],
    ] {
        let result = match parse(&args) {
            Commands::Checksum(command) => command.run(),
            Commands::GweiToWei(command) => command.run(),
            _ => unreachable!(),
        };
        assert!(result.is_ok(), "{:?} failed: {:?}", args, result.err());
    }
}

#[test]
fn test_invalid_address_is_reported() {
    match parse(&["checksum", "0x1234"]) {
        Commands::Checksum(command) => {
            assert!(matches!(command.run(), Err(AppError::Address(_))));
        }
        _ => panic!("expected checksum command"),
    }
}

#[test]
fn test_invalid_amount_is_reported() {
    match parse(&["gwei-to-wei", "twelve"]) {
        Commands::GweiToWei(command) => {
            assert!(matches!(command.run(), Err(AppError::Units(_))));
        }
        _ => panic!("expected gwei-to-wei command"),
    }
}

#[test]
fn test_network_commands_parse_overrides() {
    assert!(matches!(
        parse(&["genesis", "--beacon-url", "http://127.0.0.1:5052", "--slot", "10"]),
        Commands::Genesis(_)
    ));
    assert!(matches!(
        parse(&["block-number", "--rpc-url", "http://127.0.0.1:8545", "--wait-seconds", "1"]),
        Commands::BlockNumber(_)
    ));
    assert!(matches!(parse(&["syncing"]), Commands::Syncing(_)));
    assert!(matches!(parse(&["max-fees"]), Commands::MaxFees(_)));
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["web3-utils", "stage1"]).is_err());
}
