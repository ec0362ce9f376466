//! FR-Admin: operator CLI for the facet router.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fr_01_execution_host::domain::value_objects::{Address, Bytes, Hash};
use fr_telemetry::{init_telemetry, TelemetryConfig};

/// FR-Admin: selectors, signature lists, address prediction and a demo router
#[derive(Parser, Debug)]
#[command(name = "fr-admin")]
#[command(about = "Operator tooling for ERC-1538 routers and the CREATE2 factory")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the 4-byte identifier of a canonical signature
    Selector {
        /// Signature such as `transfer(address,uint256)`
        signature: String,
    },

    /// Print the update blob for every function of an ABI file
    Signatures {
        /// ABI array or build artifact with an `abi` field
        abi: PathBuf,
    },

    /// Predict a factory deployment address
    Predict {
        /// Factory (deployer) address
        #[arg(long)]
        deployer: Address,

        /// Init code, hex
        #[arg(long)]
        code: Bytes,

        /// 32-byte salt, hex
        #[arg(long)]
        salt: Hash,

        /// Post-deployment call, hex
        #[arg(long)]
        call: Option<Bytes>,
    },

    /// Build an in-memory router and print its routing table
    Demo {
        /// Router owner
        #[arg(long, default_value = "0x000000000000000000000000000000000000a11c")]
        owner: Address,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _telemetry = init_telemetry(TelemetryConfig::for_service("fr-admin"))?;

    match args.command {
        Command::Selector { signature } => println!("{}", fr_admin::selector(&signature)?),
        Command::Signatures { abi } => {
            let json = std::fs::read_to_string(&abi)
                .with_context(|| format!("reading {}", abi.display()))?;
            println!("{}", fr_admin::signatures(&json)?);
        }
        Command::Predict {
            deployer,
            code,
            salt,
            call,
        } => println!("{}", fr_admin::predict(deployer, &code, salt, call.as_ref())),
        Command::Demo { owner } => {
            let _span = fr_telemetry::subsystem_span!("demo", subsystem = "selector-registry").entered();
            let service = fr_admin::demo_service();
            let router = fr_admin::demo_router(&service, owner).await?;
            print!("{}", router.render());
        }
    }
    Ok(())
}
