//! Contract Deployment
//!
//! Deploys the contracts a scenario needs, awaiting each confirmation before
//! issuing the next deployment.

use crate::error::BenchError;
use alloy_primitives::Address;
use loupebench_chain::{ChainBackend, ContractKind, LoupeVariant};

/// Upper bound on eager allocation for caller-supplied counts
const PRESIZE_LIMIT: usize = 1024;

/// Freshly deployed dispatcher with its registrar facet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiamondDeployment {
    /// Facet serving `diamondCut`
    pub registrar: Address,
    /// Dispatcher routing calls by selector
    pub dispatcher: Address,
}

/// Deployed candidate loupe facets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateDeployment {
    /// Baseline implementation
    pub old: Address,
    /// Implementation under evaluation
    pub new: Address,
}

impl CandidateDeployment {
    /// Address of `variant`
    pub fn address(&self, variant: LoupeVariant) -> Address {
        match variant {
            LoupeVariant::Old => self.old,
            LoupeVariant::New => self.new,
        }
    }
}

/// Drives contract deployments through a [`ChainBackend`]
pub struct DeploymentDriver<'a, B: ChainBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: ChainBackend + ?Sized> DeploymentDriver<'a, B> {
    /// Driver over `backend`
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Deploy one contract and wait for its confirmation
    pub async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<Address, BenchError> {
        let failed = |source| BenchError::DeploymentFailed {
            contract: kind,
            source,
        };

        let pending = self
            .backend
            .deploy(kind, constructor_args)
            .await
            .map_err(failed)?;
        let receipt = self
            .backend
            .wait_for_receipt(pending.tx_hash)
            .await
            .map_err(failed)?;

        let address = receipt.contract_address.unwrap_or(pending.address);
        tracing::debug!(contract = %kind, %address, gas = receipt.gas_used, "deployed");
        Ok(address)
    }

    /// Deploy a registrar, then a dispatcher bound to it
    pub async fn deploy_diamond(&self) -> Result<DiamondDeployment, BenchError> {
        let registrar = self.deploy(ContractKind::Registrar, &[]).await?;
        let dispatcher = self.deploy(ContractKind::Dispatcher, &[registrar]).await?;
        Ok(DiamondDeployment {
            registrar,
            dispatcher,
        })
    }

    /// Deploy `count` content facets sequentially
    pub async fn deploy_content_facets(&self, count: u32) -> Result<Vec<Address>, BenchError> {
        let mut facets = Vec::with_capacity((count as usize).min(PRESIZE_LIMIT));
        for _ in 0..count {
            facets.push(self.deploy(ContractKind::ContentFacet, &[]).await?);
        }
        Ok(facets)
    }

    /// Deploy both candidate loupe facets, baseline first
    pub async fn deploy_candidates(&self) -> Result<CandidateDeployment, BenchError> {
        let old = self
            .deploy(ContractKind::Loupe(LoupeVariant::Old), &[])
            .await?;
        let new = self
            .deploy(ContractKind::Loupe(LoupeVariant::New), &[])
            .await?;
        Ok(CandidateDeployment { old, new })
    }
}
