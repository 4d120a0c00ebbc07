//! Simulated Chain
//!
//! In-memory [`ChainBackend`] with automine semantics: every submitted
//! transaction is executed and mined into its own block immediately, and
//! `wait_for_receipt` resolves it (after the configured block time).
//!
//! ## Execution Model
//!
//! ```text
//! deploy / submit_call
//!        │  nonce n, CREATE address = deployer.create(n)
//!        ▼
//! ┌──────────────────┐
//! │ execute + mine   │  gas checked against the block gas limit
//! └────────┬─────────┘
//!          ▼
//!   receipts[tx_hash] = Ok(Receipt) | Err(revert reason)
//!          │
//!          ▼
//! wait_for_receipt ──► Receipt or ChainError::Reverted
//! ```
//!
//! Read calls (`measure_gas`, `call_view`) route through the dispatcher's
//! selector table to the serving facet and execute against the dispatcher's
//! storage, as a delegatecall would.

use crate::backend::ChainBackend;
use crate::call::{Call, CallOutput, PendingDeployment, Receipt, TxHash};
use crate::diamond::DiamondStorage;
use crate::error::ChainError;
use crate::gas::{DEFAULT_BLOCK_GAS_LIMIT, GasSchedule, saturating_total};
use crate::interface::ContractKind;
use alloy_primitives::{Address, keccak256};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// Simulated chain configuration
#[derive(Debug, Clone)]
pub struct SimulatedChainConfig {
    /// Account that sends every transaction
    pub deployer: Address,
    /// Per-transaction gas ceiling
    pub block_gas_limit: u64,
    /// Delay applied before a receipt is returned
    pub block_time: Duration,
    /// Cost model
    pub gas: GasSchedule,
}

impl Default for SimulatedChainConfig {
    fn default() -> Self {
        Self {
            // first default account of a local development node
            deployer: Address::new([
                0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72,
                0x79, 0xcf, 0xff, 0xb9, 0x22, 0x66,
            ]),
            block_gas_limit: DEFAULT_BLOCK_GAS_LIMIT,
            block_time: Duration::ZERO,
            gas: GasSchedule::default(),
        }
    }
}

#[derive(Debug)]
struct Contract {
    kind: ContractKind,
    /// Present only on dispatchers
    storage: Option<DiamondStorage>,
}

#[derive(Debug, Default)]
struct ChainState {
    nonce: u64,
    block_number: u64,
    contracts: HashMap<Address, Contract>,
    receipts: HashMap<TxHash, Result<Receipt, ChainError>>,
}

/// Deterministic in-memory chain
#[derive(Debug)]
pub struct SimulatedChain {
    config: SimulatedChainConfig,
    state: Mutex<ChainState>,
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new(SimulatedChainConfig::default())
    }
}

impl SimulatedChain {
    /// Create an empty chain
    pub fn new(config: SimulatedChainConfig) -> Self {
        Self {
            config,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Chain configuration
    pub fn config(&self) -> &SimulatedChainConfig {
        &self.config
    }

    /// Deployer nonce (number of transactions sent so far)
    pub fn nonce(&self) -> u64 {
        self.state.lock().nonce
    }

    /// Kind of the contract at `address`, if any
    pub fn contract_kind(&self, address: &Address) -> Option<ContractKind> {
        self.state.lock().contracts.get(address).map(|c| c.kind)
    }

    /// Snapshot of a dispatcher's routing table
    pub fn dispatcher_storage(&self, dispatcher: &Address) -> Option<DiamondStorage> {
        self.state
            .lock()
            .contracts
            .get(dispatcher)
            .and_then(|c| c.storage.clone())
    }

    fn tx_hash(&self, nonce: u64) -> TxHash {
        let mut preimage = [0u8; 28];
        preimage[..20].copy_from_slice(self.config.deployer.as_slice());
        preimage[20..].copy_from_slice(&nonce.to_be_bytes());
        keccak256(preimage)
    }

    fn check_gas_limit(&self, required: u64) -> Result<(), ChainError> {
        if required > self.config.block_gas_limit {
            return Err(ChainError::OutOfGas {
                required,
                limit: self.config.block_gas_limit,
            });
        }
        Ok(())
    }

    /// Resolve the facet serving `call` on `dispatcher`.
    fn route<'a>(
        state: &'a ChainState,
        dispatcher: Address,
        call: &Call,
    ) -> Result<(&'a DiamondStorage, ContractKind), ChainError> {
        let contract = state
            .contracts
            .get(&dispatcher)
            .ok_or(ChainError::UnknownAddress(dispatcher))?;
        let storage = contract.storage.as_ref().ok_or_else(|| {
            ChainError::Unroutable(format!(
                "{} at {} is not a dispatcher",
                contract.kind, dispatcher
            ))
        })?;

        let selector = call.selector();
        let facet = storage
            .facet_of(&selector)
            .ok_or(ChainError::FunctionNotFound {
                dispatcher,
                selector,
            })?;
        let kind = state
            .contracts
            .get(&facet)
            .map(|c| c.kind)
            .ok_or(ChainError::UnknownAddress(facet))?;
        Ok((storage, kind))
    }

    /// Execute a read call; returns (execution gas, output).
    fn execute_view(
        &self,
        state: &ChainState,
        dispatcher: Address,
        call: &Call,
    ) -> Result<(u64, CallOutput), ChainError> {
        let (storage, kind) = Self::route(state, dispatcher, call)?;
        let gas = &self.config.gas;

        match (kind, call) {
            (ContractKind::Loupe(variant), _) => {
                let output = match call {
                    Call::Facets => CallOutput::Facets(storage.facets()),
                    Call::FacetAddresses => CallOutput::Addresses(storage.facet_addresses()),
                    Call::FacetFunctionSelectors(facet) => {
                        CallOutput::Selectors(storage.facet_function_selectors(facet))
                    }
                    Call::FacetAddress(selector) => {
                        CallOutput::Address(storage.facet_of(selector).unwrap_or(Address::ZERO))
                    }
                    Call::SupportsInterface(_) => CallOutput::Bool(true),
                    Call::DiamondCut { .. } | Call::Invoke(_) => {
                        return Err(ChainError::Reverted {
                            reason: format!("{} has no such function", kind),
                        });
                    }
                };
                Ok((gas.loupe_execution(variant, storage, call), output))
            }
            (ContractKind::ContentFacet, Call::Invoke(_)) => {
                Ok((gas.sload_warm, CallOutput::Empty))
            }
            (ContractKind::Registrar, Call::DiamondCut { .. }) => Err(ChainError::Reverted {
                reason: "diamondCut is not a view function".to_string(),
            }),
            (kind, call) => Err(ChainError::Reverted {
                reason: format!("{} cannot serve {:?}", kind, call.signature()),
            }),
        }
    }

    /// Execute and mine a state-changing call.
    fn execute_call(
        &self,
        state: &mut ChainState,
        to: Address,
        call: &Call,
    ) -> Result<u64, ChainError> {
        let gas = &self.config.gas;
        let intrinsic = gas.intrinsic(call);

        match call {
            Call::DiamondCut { cut, .. } => {
                let (storage, kind) = Self::route(state, to, call)?;
                if kind != ContractKind::Registrar {
                    return Err(ChainError::Reverted {
                        reason: format!("diamondCut routed to {}", kind),
                    });
                }
                let total = saturating_total(&[
                    intrinsic,
                    gas.dispatch(),
                    gas.cut_execution(storage, call),
                ]);
                self.check_gas_limit(total)?;

                let mut next = storage.clone();
                next.apply_cut(cut, |addr| state.contracts.contains_key(addr))
                    .map_err(|reason| ChainError::Reverted { reason })?;

                if let Some(contract) = state.contracts.get_mut(&to) {
                    contract.storage = Some(next);
                }
                Ok(total)
            }
            _ => {
                let (execution, _) = self.execute_view(state, to, call)?;
                let total = saturating_total(&[intrinsic, gas.dispatch(), execution]);
                self.check_gas_limit(total)?;
                Ok(total)
            }
        }
    }

    fn mine(&self, state: &mut ChainState, tx_hash: TxHash, outcome: Result<Receipt, ChainError>) {
        state.block_number += 1;
        let outcome = outcome.map(|mut receipt| {
            receipt.block_number = state.block_number;
            receipt
        });
        state.receipts.insert(tx_hash, outcome);
    }
}

#[async_trait]
impl ChainBackend for SimulatedChain {
    async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<PendingDeployment, ChainError> {
        let mut state = self.state.lock();
        let nonce = state.nonce;
        state.nonce += 1;

        let address = self.config.deployer.create(nonce);
        let tx_hash = self.tx_hash(nonce);
        let gas_used = self.config.gas.deployment(kind);

        let storage = match kind {
            ContractKind::Dispatcher => {
                let registrar = constructor_args.first().copied().unwrap_or(Address::ZERO);
                let is_registrar = state
                    .contracts
                    .get(&registrar)
                    .is_some_and(|c| c.kind == ContractKind::Registrar);
                if !is_registrar {
                    self.mine(
                        &mut state,
                        tx_hash,
                        Err(ChainError::Reverted {
                            reason: format!("Diamond: {} is not a DiamondCutFacet", registrar),
                        }),
                    );
                    return Ok(PendingDeployment { address, tx_hash });
                }

                let mut storage = DiamondStorage::default();
                let cut = [loupebench_core::FacetCut::add(
                    registrar,
                    ContractKind::Registrar.function_selectors(),
                )];
                storage
                    .apply_cut(&cut, |_| true)
                    .map_err(|reason| ChainError::Reverted { reason })?;
                Some(storage)
            }
            _ => None,
        };

        let outcome = self.check_gas_limit(gas_used).map(|()| {
            state.contracts.insert(address, Contract { kind, storage });
            Receipt {
                tx_hash,
                block_number: 0,
                gas_used,
                contract_address: Some(address),
            }
        });
        self.mine(&mut state, tx_hash, outcome);

        tracing::debug!(%address, contract = %kind, nonce, "deployed");
        Ok(PendingDeployment { address, tx_hash })
    }

    async fn submit_call(&self, to: Address, call: Call) -> Result<TxHash, ChainError> {
        let mut state = self.state.lock();
        if !state.contracts.contains_key(&to) {
            return Err(ChainError::UnknownAddress(to));
        }

        let nonce = state.nonce;
        state.nonce += 1;
        let tx_hash = self.tx_hash(nonce);

        let outcome = self
            .execute_call(&mut state, to, &call)
            .map(|gas_used| Receipt {
                tx_hash,
                block_number: 0,
                gas_used,
                contract_address: None,
            });
        self.mine(&mut state, tx_hash, outcome);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, ChainError> {
        if self.config.block_time.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.config.block_time).await;
        }

        self.state
            .lock()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or(ChainError::UnknownTransaction(tx_hash))?
    }

    async fn measure_gas(&self, to: Address, call: &Call) -> Result<u64, ChainError> {
        let state = self.state.lock();
        let (execution, _) = self.execute_view(&state, to, call)?;
        let gas = &self.config.gas;
        let total = saturating_total(&[gas.intrinsic(call), gas.dispatch(), execution]);
        self.check_gas_limit(total)?;
        Ok(total)
    }

    async fn call_view(&self, to: Address, call: &Call) -> Result<CallOutput, ChainError> {
        let state = self.state.lock();
        self.execute_view(&state, to, call).map(|(_, output)| output)
    }
}
