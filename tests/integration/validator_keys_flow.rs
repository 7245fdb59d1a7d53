use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use web3_utils::beacon::{AsyncBeacon, Beacon, MAX_VALIDATOR_IDS};
use web3_utils::cache::{cache_result, Cache};
use web3_utils::errors::GitLabResult;
use web3_utils::gitlab::{Blob, GitLab, RepositoryApi, TreeItem};
use web3_utils::retry::StopCondition;
use web3_utils::utils::{
    compute_time_at_slot, convert_to_standard_notation, divide_chunks, gwei_to_wei,
    load_public_keys_from_files, split_validator_pubkey_bytes, PUBKEY_LENGTH,
};

use crate::common::{
    envelope, fast_policy, genesis_json, http_error, validator_json, FakeBeaconTransport,
};

/// End-to-end flow: download key files, load them, query the beacon node in
/// batches, and aggregate balances

fn pubkey(n: usize) -> String {
    format!("0x{:0>width$x}", n, width = PUBKEY_LENGTH)
}

/// A repository holding one key file per operator
struct KeyRepository {
    files: Vec<(String, String)>,
}

#[async_trait]
impl RepositoryApi for KeyRepository {
    async fn auth(&self) -> GitLabResult<()> {
        Ok(())
    }

    async fn repository_tree(
        &self,
        _project_id: u64,
        path: &str,
        _reference: &str,
    ) -> GitLabResult<Vec<TreeItem>> {
        Ok(self
            .files
            .iter()
            .enumerate()
            .map(|(i, (name, _))| TreeItem {
                id: format!("sha{}", i),
                name: name.clone(),
                kind: "blob".to_string(),
                path: format!("{}/{}", path, name),
            })
            .collect())
    }

    async fn repository_blob(&self, _project_id: u64, id: &str) -> GitLabResult<Blob> {
        let index: usize = id.trim_start_matches("sha").parse().unwrap();
        Ok(Blob {
            content: STANDARD.encode(&self.files[index].1),
        })
    }
}

fn validators_response(ids: &[String]) -> Value {
    envelope(Value::Array(
        ids.iter()
            .enumerate()
            .map(|(i, id)| validator_json(i as u64, id))
            .collect(),
    ))
}

#[tokio::test]
async fn test_downloaded_keys_are_queried_in_batches() {
    let keys: Vec<String> = (1..=120).map(pubkey).collect();
    let repository = KeyRepository {
        files: vec![
            ("hoodi-operator0-pubkeys.txt".to_string(), keys[..70].join("\n")),
            ("hoodi-operator1-pubkeys.txt".to_string(), keys[70..].join("\n")),
            ("mainnet-operator0-pubkeys.txt".to_string(), pubkey(999)),
        ],
    };
    let scratch = TempDir::new().unwrap();
    let gitlab = GitLab::new(repository, scratch.path().join("public_keys"));

    let patterns = vec!["hoodi".to_string()];
    let downloaded = gitlab
        .download_files_from_project(7, "keys", "main", Some(patterns.as_slice()))
        .await
        .unwrap();
    assert_eq!(downloaded.len(), 2);

    let loaded = load_public_keys_from_files("hoodi", gitlab.tmp_dir()).unwrap();
    assert_eq!(loaded, keys);

    let batches = divide_chunks(&loaded, MAX_VALIDATOR_IDS);
    assert_eq!(
        batches.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![50, 50, 20]
    );

    let transport = FakeBeaconTransport::scripted(vec![
        Ok(validators_response(&batches[0])),
        Err(http_error(502)),
        Ok(validators_response(&batches[1])),
        Ok(validators_response(&batches[2])),
    ]);
    let beacon = AsyncBeacon::new(
        Beacon::new(transport.clone()),
        fast_policy(StopCondition::AfterAttempt(3)),
    );

    let mut total_balance_gwei = 0u64;
    let mut found = 0;
    for batch in batches {
        let validators = beacon
            .get_validators("head", Some(batch), None)
            .await
            .unwrap();
        found += validators.len();
        total_balance_gwei += validators.iter().map(|v| v.balance).sum::<u64>();
    }

    assert_eq!(found, 120);
    assert_eq!(transport.call_count(), 4);
    assert_eq!(
        convert_to_standard_notation(&gwei_to_wei(&total_balance_gwei.to_string()).unwrap()),
        "3840015605040000000000"
    );
}

#[tokio::test]
async fn test_deposit_payload_keys_resolve_to_validators() {
    let keys: Vec<String> = (1..=3).map(pubkey).collect();
    let payload = format!(
        "0x{}",
        keys.iter()
            .map(|k| k.trim_start_matches("0x"))
            .collect::<String>()
    );

    let split = split_validator_pubkey_bytes(&payload);
    assert_eq!(split, keys);

    let transport = FakeBeaconTransport::scripted(vec![
        Ok(envelope(validator_json(10, &split[0]))),
        Err(http_error(404)),
        Ok(envelope(validator_json(12, &split[2]))),
    ]);
    let beacon = AsyncBeacon::new(
        Beacon::new(transport.clone()),
        fast_policy(StopCondition::Never),
    );

    let mut indexes = Vec::new();
    for key in &split {
        indexes.push(beacon.get_validator(key, "head").await.unwrap().map(|v| v.index));
    }

    assert_eq!(indexes, vec![Some(10), None, Some(12)]);
}

#[tokio::test]
async fn test_slot_times_from_memoised_genesis() {
    let transport = FakeBeaconTransport::always(genesis_json(1_742_213_400));
    let beacon = AsyncBeacon::new(
        Beacon::new(transport.clone()),
        fast_policy(StopCondition::Never),
    );

    let mut times = Vec::new();
    for slot in [0u64, 1, 100] {
        let genesis = beacon.get_genesis().await.unwrap();
        times.push(compute_time_at_slot(genesis, slot).unwrap());
    }

    assert_eq!(times, vec![1_742_213_400, 1_742_213_412, 1_742_214_600]);
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_cached_conversions_share_one_cache() {
    let cache = Arc::new(Cache::new());
    let to_wei = cache_result(
        cache.clone(),
        |amount: &String| format!("wei_{}", amount),
        |amount: String| {
            gwei_to_wei(&amount)
                .map(|wei| convert_to_standard_notation(&wei))
                .unwrap_or_default()
        },
    );

    assert_eq!(to_wei("32000130042".to_string()), "32000130042000000000");
    assert_eq!(to_wei("1.5".to_string()), "1500000000");
    assert_eq!(cache.len(), 2);

    cache.invalidate(None);
    assert!(cache.is_empty());
    assert_eq!(to_wei("1.5".to_string()), "1500000000");
    assert!(cache.contains("wei_1.5"));
}
