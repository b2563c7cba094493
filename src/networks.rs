use alloy::primitives::{Address, B256, aliases::B32};
use log::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::{
    domain,
    error::{DepositError, Result},
    macros::{fork_version, parse_address},
};

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub genesis_fork_version: B32,
    pub deposit_contract: Address,
}

impl NetworkConfig {
    /// Deposits are signed over the genesis fork version with an empty
    /// genesis validators root so they stay valid across forks
    pub fn deposit_domain(&self) -> B256 {
        domain::compute_deposit_domain(self.genesis_fork_version)
    }
}

/// Case insensitive network lookup
pub fn get_network(name: &str) -> Result<&'static NetworkConfig> {
    let network = NETWORKS
        .get(name.trim().to_lowercase().as_str())
        .ok_or_else(|| DepositError::UnsupportedNetwork(name.to_string()))?;
    trace!("{:#?}", network);
    Ok(network)
}

pub fn supported_networks() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = NETWORKS.keys().copied().collect();
    names.sort();
    names
}

static NETWORKS: Lazy<HashMap<&'static str, NetworkConfig>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for network in [
        NETWORK_MAINNET.clone(),
        NETWORK_SEPOLIA.clone(),
        NETWORK_HOLESKY.clone(),
        NETWORK_HOODI.clone(),
    ] {
        m.insert(network.name, network);
    }
    m
});

static NETWORK_MAINNET: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    name: "mainnet",
    chain_id: 1,
    genesis_fork_version: fork_version!(0x00000000),
    deposit_contract: parse_address!("0x00000000219ab540356cBB839Cbe05303d7705Fa"),
});

static NETWORK_SEPOLIA: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    name: "sepolia",
    chain_id: 11155111,
    genesis_fork_version: fork_version!(0x90000069),
    deposit_contract: parse_address!("0x7f02C3E3c98b133055B8B348B2Ac625669Ed295D"),
});

static NETWORK_HOLESKY: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    name: "holesky",
    chain_id: 17000,
    genesis_fork_version: fork_version!(0x01017000),
    deposit_contract: parse_address!("0x4242424242424242424242424242424242424242"),
});

static NETWORK_HOODI: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    name: "hoodi",
    chain_id: 560048,
    genesis_fork_version: fork_version!(0x10000910),
    deposit_contract: parse_address!("0x00000000219ab540356cBB839Cbe05303d7705Fa"),
});
