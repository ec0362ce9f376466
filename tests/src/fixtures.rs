//! # Test Fixtures
//!
//! A storage-setter contract and a fully linked router, shared by the
//! integration flows and the benchmarks.

use fr_01_execution_host::prelude::*;
use fr_02_selector_registry::prelude::*;
use fr_03_deployment_factory::prelude::*;
use serde::{Deserialize, Serialize};

/// Router owner in every fixture.
pub const OWNER: Address = Address([0x0a; 20]);

/// An account without any rights.
pub const OTHER: Address = Address([0x0b; 20]);

/// Balance given to both accounts.
pub const INITIAL_BALANCE: u64 = 1_000_000;

// =============================================================================
// TEST CONTRACT
// =============================================================================

/// Emitted when the contract is called without payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receive {
    /// Value sent along.
    pub value: U256,
    /// Always empty.
    pub data: Bytes,
}

impl Event for Receive {
    const SIGNATURE: &'static str = "Receive(uint256,bytes)";
}

/// Emitted for any payload that is not one of the contract's functions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    /// Value sent along.
    pub value: U256,
    /// The unmatched payload.
    pub data: Bytes,
}

impl Event for Fallback {
    const SIGNATURE: &'static str = "Fallback(uint256,bytes)";
}

/// Keeps one byte string: `set(bytes)` / `get()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestContract;

impl TestContract {
    /// Catalog name.
    pub const NAME: &'static str = "TestContract";

    fn slot() -> StorageKey {
        StorageKey::namespaced("test-contract.value")
    }
}

impl NativeModule for TestContract {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn functions(&self) -> Vec<FunctionDescriptor> {
        vec![
            FunctionDescriptor::new("get", vec![]),
            FunctionDescriptor::new("set", vec![ParamType::elementary("bytes")]),
        ]
    }

    fn execute(&self, frame: &mut Frame<'_>) -> Result<Bytes, Revert> {
        let value = frame.value();
        let data = frame.calldata().clone();
        if data.is_empty() {
            frame.emit(&Receive { value, data })?;
            return Ok(Bytes::new());
        }

        let selector = frame.selector();
        if selector == selector_of("set(bytes)") {
            let (stored,): (Bytes,) = decode_args(data.as_slice())?;
            frame.sstore(Self::slot(), &stored)?;
            Ok(Bytes::new())
        } else if selector == selector_of("get()") {
            let stored: Bytes = frame.sload(Self::slot())?;
            Ok(encode_return(&stored)?)
        } else {
            frame.emit(&Fallback { value, data })?;
            Ok(Bytes::new())
        }
    }
}

/// Catalog with the router modules, the factory and [`TestContract`].
#[must_use]
pub fn test_catalog() -> ModuleCatalog {
    router_catalog().with(GenericFactory).with(TestContract)
}

/// Init code of [`TestContract`].
#[must_use]
pub fn test_contract_code() -> Bytes {
    TestContract.init_code(Bytes::new())
}

/// Calldata of `set(bytes)`.
#[must_use]
pub fn set_call(value: &Bytes) -> Bytes {
    encode_call("set(bytes)", &(value,)).expect("set(bytes) encodes")
}

/// A build artifact of the query delegate, as an ABI tool would emit it.
#[must_use]
pub fn query_delegate_artifact() -> String {
    let abi: Vec<serde_json::Value> = QueryDelegate
        .functions()
        .iter()
        .map(|function| {
            serde_json::json!({
                "type": "function",
                "name": function.name,
                "inputs": function
                    .inputs
                    .iter()
                    .map(|input| serde_json::json!({ "name": "", "type": input.canonical() }))
                    .collect::<Vec<_>>(),
                "outputs": [],
            })
        })
        .chain(std::iter::once(serde_json::json!({
            "type": "event",
            "name": "OwnershipTransferred",
            "inputs": [{ "type": "address" }, { "type": "address" }],
        })))
        .collect();
    serde_json::json!({ "contractName": QueryDelegate::NAME, "abi": abi }).to_string()
}

// =============================================================================
// ROUTER FIXTURE
// =============================================================================

/// A host with a linked router and a deployed but unrouted [`TestContract`].
pub struct RouterFixture {
    /// The host.
    pub host: Host,
    /// Router addresses.
    pub router: RouterDeployment,
    /// A deployed [`TestContract`], not yet routed.
    pub test_contract: Address,
}

impl RouterFixture {
    /// Deploys update delegate, query delegate and proxy as [`OWNER`], links
    /// the query ABI, then deploys a [`TestContract`].
    #[must_use]
    pub fn new() -> Self {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        host.fund(OWNER, U256::from(INITIAL_BALANCE));
        host.fund(OTHER, U256::from(INITIAL_BALANCE));

        let router = deploy_router(&mut host, OWNER).expect("router deploys");
        let test_contract = host
            .deploy(OWNER, test_contract_code(), U256::zero())
            .contract_address
            .expect("test contract deploys");

        Self {
            host,
            router,
            test_contract,
        }
    }

    /// Client of the router sending as `sender`.
    pub fn client(&mut self, sender: Address) -> RouterClient<'_> {
        RouterClient::new(&mut self.host, self.router.proxy, sender)
    }

    /// Every route after deployment, in ordinal order.
    #[must_use]
    pub fn expected_routes(&self) -> Vec<(String, Address)> {
        std::iter::once((UPDATE_SIGNATURE.to_string(), self.router.update_delegate))
            .chain(
                QueryDelegate
                    .functions()
                    .iter()
                    .map(|function| (function.signature(), self.router.query_delegate)),
            )
            .collect()
    }
}

impl Default for RouterFixture {
    fn default() -> Self {
        Self::new()
    }
}
