//! Shared utilities for integration testing.
//!
//! Scripted in-memory collaborators stand in for the wallet, the registry
//! portal and the RPC node.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, TxHash, B256};
use async_trait::async_trait;
use tokio::sync::Notify;

use proof_of_audit::attestation::{
    AttestOutcome, AttestationClient, AttestationError, AttestationRequest, AttestationResult,
    AttestationSettings, ConfirmedReceipt, ReceiptWaiter,
};
use proof_of_audit::blockchain::{BlockchainError, BlockchainResult};
use proof_of_audit::config::{NetworkConfig, NetworksConfig};
use proof_of_audit::form::{Field, FormStore};
use proof_of_audit::session::{ClientFactory, Clients, Session};

pub const REPO_URL: &str = "https://github.com/foo/bar";
pub const COMMIT_HASH: &str = "37f8ecd53a64ba2395b7de0a8d7ecb0dbfdced64";
pub const CONTRACT_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

pub const TESTNET_CHAIN_ID: u64 = 59141;
pub const VALIDITY_SECS: u64 = 2_592_000;

/// The `0xabc...` transaction reference used across scenarios.
pub fn tx_ref() -> TxHash {
    "0xabc0000000000000000000000000000000000000000000000000000000000001"
        .parse()
        .unwrap()
}

/// The `0xdef...` attestation id used across scenarios.
pub fn attestation_id() -> B256 {
    "0xdef0000000000000000000000000000000000000000000000000000000000002"
        .parse()
        .unwrap()
}

/// Receipt whose first log carries `id` as its second topic.
pub fn receipt_with_id(id: B256) -> ConfirmedReceipt {
    ConfirmedReceipt {
        logs: vec![vec![B256::repeat_byte(0x01), id]],
    }
}

pub fn account() -> Address {
    Address::repeat_byte(0x11)
}

pub fn settings() -> AttestationSettings {
    AttestationSettings {
        portal_id: "0xbb92965c718852a8dc1b6e930239de4e08d93e60".parse().unwrap(),
        schema_id: "0x59ffe1d5bdbd99d418fc1dba03b136176ca52da322cab38fed6f29c2ca29bd71"
            .parse()
            .unwrap(),
        validity_secs: VALIDITY_SECS,
    }
}

/// Registry client that replays scripted outcomes and records requests.
///
/// When gated, each call waits for [`ScriptedClient::release`].
#[derive(Default)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<AttestationResult<AttestOutcome>>>,
    requests: Mutex<Vec<(AttestationRequest, Vec<Bytes>)>>,
    gate: Option<Notify>,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<AttestationResult<AttestOutcome>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        }
    }

    pub fn gated(outcomes: Vec<AttestationResult<AttestOutcome>>) -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new(outcomes)
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<(AttestationRequest, Vec<Bytes>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttestationClient for ScriptedClient {
    async fn attest(
        &self,
        request: &AttestationRequest,
        validation_payloads: &[Bytes],
    ) -> AttestationResult<AttestOutcome> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), validation_payloads.to_vec()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AttestationError::Unrecognized))
    }
}

/// Confirmation client that replays scripted receipts.
#[derive(Default)]
pub struct ScriptedReceipts {
    receipts: Mutex<VecDeque<AttestationResult<ConfirmedReceipt>>>,
    waited: Mutex<Vec<TxHash>>,
    gate: Option<Notify>,
}

impl ScriptedReceipts {
    pub fn new(receipts: Vec<AttestationResult<ConfirmedReceipt>>) -> Self {
        Self {
            receipts: Mutex::new(receipts.into()),
            ..Default::default()
        }
    }

    pub fn gated(receipts: Vec<AttestationResult<ConfirmedReceipt>>) -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new(receipts)
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn waited(&self) -> Vec<TxHash> {
        self.waited.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReceiptWaiter for ScriptedReceipts {
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> AttestationResult<ConfirmedReceipt> {
        self.waited.lock().unwrap().push(tx_hash);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AttestationError::Unrecognized))
    }
}

/// Factory handing out the same scripted clients for every network.
pub struct ScriptedFactory {
    pub client: Arc<ScriptedClient>,
    pub receipts: Arc<ScriptedReceipts>,
    pub fail: bool,
}

impl ClientFactory for ScriptedFactory {
    fn connect(&self, _network: &NetworkConfig, _account: Address) -> BlockchainResult<Clients> {
        if self.fail {
            return Err(BlockchainError::Wallet("client unavailable".to_string()));
        }
        Ok(Clients {
            attestation: self.client.clone(),
            receipts: self.receipts.clone(),
        })
    }
}

/// Session connected on the test network with the given collaborators.
pub fn connected_session(client: Arc<ScriptedClient>, receipts: Arc<ScriptedReceipts>) -> Session {
    let factory = Arc::new(ScriptedFactory {
        client,
        receipts,
        fail: false,
    });
    let mut session = Session::new(NetworksConfig::default(), settings(), factory);
    session.update_wallet(Some(account()), Some(TESTNET_CHAIN_ID));
    session
}

/// Form with all three fields valid.
pub fn filled_store() -> FormStore {
    let mut store = FormStore::new();
    store.field_changed(Field::RepoUrl, REPO_URL);
    store.field_changed(Field::CommitHash, COMMIT_HASH);
    store.field_changed(Field::ContractAddress, CONTRACT_ADDRESS);
    store
}
