//! Contract handles and call descriptors.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::blockchain::types::ChainId;
use crate::contracts::abi::{deployProxyByImplementationCall, installModuleCall};

/// State mutability of a contract function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    NonPayable,
    Payable,
}

/// Which workflow call a descriptor represents. Used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    DeployProxy,
    InstallModule,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::DeployProxy => "deploy_proxy",
            CallKind::InstallModule => "install_module",
        }
    }
}

/// A contract address bound to a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractHandle {
    pub address: Address,
    pub chain: ChainId,
}

impl ContractHandle {
    pub fn new(address: Address, chain: ChainId) -> Self {
        Self { address, chain }
    }

    /// Same chain, different address.
    pub fn at(&self, address: Address) -> Self {
        Self::new(address, self.chain)
    }

    /// `deployProxyByImplementation(implementation, data, salt)`.
    pub fn prepare_deploy_proxy(
        &self,
        implementation: Address,
        data: Bytes,
        salt: B256,
    ) -> ContractCall {
        let call = deployProxyByImplementationCall {
            implementation,
            data,
            salt,
        };
        ContractCall {
            kind: CallKind::DeployProxy,
            target: self.address,
            chain: self.chain,
            signature: deployProxyByImplementationCall::SIGNATURE,
            mutability: Mutability::NonPayable,
            calldata: call.abi_encode().into(),
            value: U256::ZERO,
        }
    }

    /// `installModule(module, data)` with no value attached.
    pub fn prepare_install_module(&self, module: Address, data: Bytes) -> ContractCall {
        let call = installModuleCall {
            _module: module,
            _data: data,
        };
        ContractCall {
            kind: CallKind::InstallModule,
            target: self.address,
            chain: self.chain,
            signature: installModuleCall::SIGNATURE,
            mutability: Mutability::Payable,
            calldata: call.abi_encode().into(),
            value: U256::ZERO,
        }
    }
}

/// A fully prepared, unsigned contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCall {
    pub kind: CallKind,
    pub target: Address,
    pub chain: ChainId,
    pub signature: &'static str,
    pub mutability: Mutability,
    pub calldata: Bytes,
    pub value: U256,
}

impl ContractCall {
    /// Transaction request sent from `from`. Gas and nonce are left to the
    /// provider's fillers.
    pub fn to_transaction_request(&self, from: Address) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.target)
            .with_input(self.calldata.clone())
            .with_value(self.value)
            .with_chain_id(self.chain.0)
    }
}
