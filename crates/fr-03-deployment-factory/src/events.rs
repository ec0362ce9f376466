//! # Event Schema

use fr_01_execution_host::domain::value_objects::Address;
use fr_01_execution_host::events::Event;
use serde::{Deserialize, Serialize};

/// A factory deployment succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContract {
    /// Address of the new instance.
    pub addr: Address,
}

impl Event for NewContract {
    const SIGNATURE: &'static str = "NewContract(address)";
}
