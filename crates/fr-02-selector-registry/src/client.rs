//! # Router Client
//!
//! Typed access to a deployed router from outside the host: every method
//! encodes one call, sends it to the proxy and decodes the result.

use crate::domain::registry::FunctionEntry;
use crate::modules::update::UPDATE_SIGNATURE;
use crate::modules::{DispatchProxy, QueryDelegate, UpdateDelegate};
use fr_01_execution_host::codec::Revert;
use fr_01_execution_host::domain::abi::signature_list;
use fr_01_execution_host::domain::entities::Receipt;
use fr_01_execution_host::domain::value_objects::{Address, Bytes, Selector, U256};
use fr_01_execution_host::errors::ClientError;
use fr_01_execution_host::host::Host;
use fr_01_execution_host::module::NativeModule;
use tracing::info;

/// Addresses of a freshly deployed router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterDeployment {
    /// The dispatch proxy, i.e. the router's public address.
    pub proxy: Address,
    /// The update delegate.
    pub update_delegate: Address,
    /// The query delegate.
    pub query_delegate: Address,
}

/// Deploys an update delegate, a query delegate and a proxy, then routes the
/// full query ABI through the proxy. `deployer` owns the proxy.
///
/// The host's catalog must contain the three router modules.
pub fn deploy_router(host: &mut Host, deployer: Address) -> Result<RouterDeployment, ClientError> {
    let update_delegate = deploy(host, deployer, UpdateDelegate.init_code(Bytes::new()))?;
    let query_delegate = deploy(host, deployer, QueryDelegate.init_code(Bytes::new()))?;
    let proxy = deploy(host, deployer, DispatchProxy::deployment(update_delegate)?)?;

    let queries = signature_list(&QueryDelegate.functions());
    RouterClient::new(host, proxy, deployer).update_contract(
        query_delegate,
        &queries,
        "Add ERC1538 query functions",
    )?;

    info!(proxy = ?proxy, owner = ?deployer, "Router deployed");
    Ok(RouterDeployment {
        proxy,
        update_delegate,
        query_delegate,
    })
}

fn deploy(host: &mut Host, from: Address, init_code: Bytes) -> Result<Address, ClientError> {
    host.deploy(from, init_code, U256::zero())
        .into_result()?
        .contract_address
        .ok_or_else(|| Revert::with_reason("creation returned no address").into())
}

/// Client of one router, sending as one account.
pub struct RouterClient<'h> {
    host: &'h mut Host,
    proxy: Address,
    sender: Address,
}

impl<'h> RouterClient<'h> {
    /// Creates a client of the router at `proxy`.
    pub fn new(host: &'h mut Host, proxy: Address, sender: Address) -> Self {
        Self {
            host,
            proxy,
            sender,
        }
    }

    /// Router address.
    #[must_use]
    pub fn proxy(&self) -> Address {
        self.proxy
    }

    /// Account the client sends as.
    #[must_use]
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Switches the sending account.
    pub fn set_sender(&mut self, sender: Address) {
        self.sender = sender;
    }

    // =========================================================================
    // UPDATES
    // =========================================================================

    /// Routes every signature of `signatures` to `delegate`. The zero
    /// delegate removes them.
    pub fn update_contract(
        &mut self,
        delegate: Address,
        signatures: &str,
        message: &str,
    ) -> Result<Receipt, ClientError> {
        self.send(UPDATE_SIGNATURE, &(delegate, signatures, message))
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Number of live routes.
    pub fn total_functions(&mut self) -> Result<U256, ClientError> {
        self.query("totalFunctions()", &())
    }

    /// Route at an ordinal.
    pub fn function_by_index(&mut self, index: U256) -> Result<FunctionEntry, ClientError> {
        self.query("functionByIndex(uint256)", &(index,))
    }

    /// Route of an identifier, with empty signature and zero delegate when
    /// absent.
    pub fn function_by_id(&mut self, id: Selector) -> Result<FunctionEntry, ClientError> {
        self.query("functionById(bytes4)", &(id,))
    }

    /// Whether a signature is routed.
    pub fn function_exists(&mut self, signature: &str) -> Result<bool, ClientError> {
        self.query("functionExists(string)", &(signature,))
    }

    /// All routed signatures, each followed by `;`.
    pub fn function_signatures(&mut self) -> Result<String, ClientError> {
        self.query("functionSignatures()", &())
    }

    /// Signatures routed to one delegate, each followed by `;`.
    pub fn delegate_function_signatures(
        &mut self,
        delegate: Address,
    ) -> Result<String, ClientError> {
        self.query("delegateFunctionSignatures(address)", &(delegate,))
    }

    /// Delegate of a signature, zero when unrouted.
    pub fn delegate_address(&mut self, signature: &str) -> Result<Address, ClientError> {
        self.query("delegateAddress(string)", &(signature,))
    }

    /// Distinct delegates in order of first appearance.
    pub fn delegate_addresses(&mut self) -> Result<Vec<Address>, ClientError> {
        self.query("delegateAddresses()", &())
    }

    // =========================================================================
    // OWNERSHIP
    // =========================================================================

    /// Current owner of the router.
    pub fn owner(&mut self) -> Result<Address, ClientError> {
        self.query("owner()", &())
    }

    /// Hands the router to `new_owner`.
    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<Receipt, ClientError> {
        self.send("transferOwnership(address)", &(new_owner,))
    }

    /// Leaves the router without owner.
    pub fn renounce_ownership(&mut self) -> Result<Receipt, ClientError> {
        self.send("renounceOwnership()", &())
    }

    fn send<A: serde::Serialize + ?Sized>(
        &mut self,
        signature: &str,
        args: &A,
    ) -> Result<Receipt, ClientError> {
        let ((), receipt) = self
            .host
            .send_function(self.sender, self.proxy, signature, args)?;
        Ok(receipt)
    }

    fn query<A, R>(&mut self, signature: &str, args: &A) -> Result<R, ClientError>
    where
        A: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        self.host
            .call_function(self.sender, self.proxy, signature, args)
    }
}
