//! Solidity bindings for the proxy factory.

use alloy::sol;

sol! {
    /// Deploys a proxy delegating to `implementation`, addressed by `salt`.
    function deployProxyByImplementation(address implementation, bytes data, bytes32 salt)
        external
        returns (address deployedProxy);

    /// Attaches `_module` to the receiving contract.
    function installModule(address _module, bytes _data) external payable;

    /// Emitted by the factory for every proxy it deploys.
    #[derive(Debug, PartialEq, Eq)]
    event ProxyDeployed(
        address indexed implementation,
        address proxy,
        address indexed deployer,
        bytes data
    );
}
