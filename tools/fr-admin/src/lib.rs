//! FR-Admin: operator commands for the facet router.
//!
//! Every subcommand of the binary is a function here returning the text to
//! print, so the binary stays a thin argument parser.

use anyhow::{anyhow, Context, Result};
use fr_01_execution_host::prelude::*;
use fr_02_selector_registry::prelude::*;
use fr_03_deployment_factory::prelude::*;
use std::fmt::Write as _;
use tracing::info;
use uuid::Uuid;

/// Commit message of the demo router's query update.
pub const QUERY_COMMIT_MESSAGE: &str = "Add ERC1538 query functions";

/// Canonical form and identifier of one signature.
pub fn selector(signature: &str) -> Result<String> {
    let function = FunctionDescriptor::parse(signature)?;
    let canonical = function.signature();
    if canonical != signature {
        return Err(anyhow!("`{signature}` is not canonical, expected `{canonical}`"));
    }
    Ok(format!("{}  {canonical}", function.selector()))
}

/// Update blob for every function of an ABI document.
pub fn signatures(abi_json: &str) -> Result<String> {
    Ok(signatures_from_abi_json(abi_json)?)
}

/// Checksummed address `deployer` would deploy `code` to.
#[must_use]
pub fn predict(deployer: Address, code: &Bytes, salt: Hash, call: Option<&Bytes>) -> String {
    let address = match call {
        Some(call) => AddressPredictor::predict_code_with_call(
            deployer,
            code.as_slice(),
            salt,
            call.as_slice(),
        ),
        None => AddressPredictor::predict_code(deployer, code.as_slice(), salt),
    };
    address.to_checksum()
}

/// A router built by [`demo_router`].
#[derive(Debug, Clone)]
pub struct DemoRouter {
    /// Router addresses.
    pub deployment: RouterDeployment,
    /// Routing table in ordinal order.
    pub table: Vec<FunctionEntry>,
}

impl DemoRouter {
    /// Renders the routing table, one route per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "proxy           {}", self.deployment.proxy);
        let _ = writeln!(out, "update delegate {}", self.deployment.update_delegate);
        let _ = writeln!(out, "query delegate  {}", self.deployment.query_delegate);
        let _ = writeln!(out);
        for (index, entry) in self.table.iter().enumerate() {
            let _ = writeln!(
                out,
                "{index:>3}  {}  {}  {}",
                entry.id, entry.delegate, entry.signature
            );
        }
        out
    }
}

/// Service over a host knowing the router and factory modules.
#[must_use]
pub fn demo_service() -> ExecutionService {
    ExecutionService::with_modules(VmConfig::from_env(), router_catalog().with(GenericFactory))
}

/// Deploys a router through `service`, links the query delegate and reads
/// back the routing table.
pub async fn demo_router(service: &ExecutionService, owner: Address) -> Result<DemoRouter> {
    let update_delegate = deploy(service, owner, UpdateDelegate.init_code(Bytes::new())).await?;
    let query_delegate = deploy(service, owner, QueryDelegate.init_code(Bytes::new())).await?;
    let proxy = deploy(service, owner, DispatchProxy::deployment(update_delegate)?).await?;

    let blob = signature_list(&QueryDelegate.functions());
    let data = encode_call(UPDATE_SIGNATURE, &(query_delegate, blob, QUERY_COMMIT_MESSAGE))?;
    service
        .submit(Uuid::new_v4(), Transaction::call(owner, proxy, U256::zero(), data))
        .await
        .into_result()
        .context("linking query delegate")?;

    let total: U256 = query(service, owner, proxy, "totalFunctions()", &()).await?;
    let mut table = Vec::new();
    for index in 0..total.low_u64() {
        let entry: FunctionEntry =
            query(service, owner, proxy, "functionByIndex(uint256)", &(U256::from(index),)).await?;
        table.push(entry);
    }

    info!(proxy = ?proxy, routes = table.len(), "Demo router ready");
    Ok(DemoRouter {
        deployment: RouterDeployment {
            proxy,
            update_delegate,
            query_delegate,
        },
        table,
    })
}

async fn deploy(service: &ExecutionService, from: Address, init_code: Bytes) -> Result<Address> {
    service
        .submit(Uuid::new_v4(), Transaction::create(from, U256::zero(), init_code))
        .await
        .into_result()?
        .contract_address
        .context("creation returned no address")
}

async fn query<A, R>(
    service: &ExecutionService,
    from: Address,
    to: Address,
    signature: &str,
    args: &A,
) -> Result<R>
where
    A: serde::Serialize + ?Sized,
    R: serde::de::DeserializeOwned,
{
    let output = service
        .query(Uuid::new_v4(), from, to, encode_call(signature, args)?)
        .await
        .with_context(|| format!("calling {signature}"))?;
    Ok(decode_return(output.as_slice())?)
}
