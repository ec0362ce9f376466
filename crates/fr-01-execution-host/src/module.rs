//! # Native Modules
//!
//! Contract code in the host is a native module: a Rust type implementing
//! [`NativeModule`]. Accounts store a small code image naming the module.
//!
//! | Image | Layout |
//! |-------|--------|
//! | runtime code | `0xfe 0x00 ++ utf8(module name)` |
//! | init code | `0xfe 0x01 ++ bincode({module, constructor_args})` |
//!
//! The leading `0xfe` is the INVALID opcode, so an image can never be
//! mistaken for executable bytecode. The keccak hash of the init code is the
//! CREATE2 code hash.

use crate::codec::Revert;
use crate::domain::abi::FunctionDescriptor;
use crate::domain::services::keccak256;
use crate::domain::value_objects::{Bytes, Hash};
use crate::errors::VmError;
use crate::host::Frame;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const IMAGE_MARKER: u8 = 0xfe;
const RUNTIME_TAG: u8 = 0x00;
const INIT_TAG: u8 = 0x01;

// =============================================================================
// NATIVE MODULE
// =============================================================================

/// Code executed by the host.
///
/// A module is stateless: everything it remembers lives in the storage of the
/// frame's account, reached through [`Frame::sload`] and [`Frame::sstore`].
pub trait NativeModule: Send + Sync {
    /// Unique name in the catalog.
    fn name(&self) -> &'static str;

    /// Callable functions, in ABI order.
    fn functions(&self) -> Vec<FunctionDescriptor>;

    /// Runs once at deployment. `frame.calldata()` holds the constructor
    /// arguments.
    fn construct(&self, frame: &mut Frame<'_>) -> Result<(), Revert> {
        let _ = frame;
        Ok(())
    }

    /// Handles a call to the deployed module.
    fn execute(&self, frame: &mut Frame<'_>) -> Result<Bytes, Revert>;

    /// Init code deploying this module with encoded constructor arguments.
    fn init_code(&self, constructor_args: Bytes) -> Bytes {
        init_code(self.name(), constructor_args)
    }
}

// =============================================================================
// CODE IMAGES
// =============================================================================

#[derive(Serialize, Deserialize)]
struct InitImage {
    module: String,
    constructor_args: Bytes,
}

/// A decoded code image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeImage {
    /// Deployed code of a module.
    Runtime {
        /// Module name.
        module: String,
    },
    /// Deployment payload of a module.
    Init {
        /// Module name.
        module: String,
        /// Encoded constructor arguments.
        constructor_args: Bytes,
    },
}

impl CodeImage {
    /// Decodes a code image.
    pub fn parse(code: &[u8]) -> Result<Self, VmError> {
        match code {
            [IMAGE_MARKER, RUNTIME_TAG, name @ ..] => {
                let module = std::str::from_utf8(name)
                    .map_err(|_| VmError::InvalidCode("module name is not utf-8".into()))?;
                Ok(Self::Runtime {
                    module: module.to_string(),
                })
            }
            [IMAGE_MARKER, INIT_TAG, payload @ ..] => {
                let image: InitImage = bincode::deserialize(payload)
                    .map_err(|e| VmError::InvalidCode(format!("init image: {e}")))?;
                Ok(Self::Init {
                    module: image.module,
                    constructor_args: image.constructor_args,
                })
            }
            _ => Err(VmError::InvalidCode(format!(
                "not a module image ({} bytes)",
                code.len()
            ))),
        }
    }
}

/// Runtime code image of a module.
#[must_use]
pub fn runtime_code(module: &str) -> Bytes {
    let mut code = Vec::with_capacity(2 + module.len());
    code.push(IMAGE_MARKER);
    code.push(RUNTIME_TAG);
    code.extend_from_slice(module.as_bytes());
    Bytes::from_vec(code)
}

/// Init code image of a module with encoded constructor arguments.
#[must_use]
pub fn init_code(module: &str, constructor_args: Bytes) -> Bytes {
    let image = InitImage {
        module: module.to_string(),
        constructor_args,
    };
    let mut code = vec![IMAGE_MARKER, INIT_TAG];
    // A struct of a String and a Vec always serializes.
    code.extend(bincode::serialize(&image).unwrap_or_default());
    Bytes::from_vec(code)
}

/// CREATE2 code hash of an init code image.
#[must_use]
pub fn code_hash(init_code: &Bytes) -> Hash {
    keccak256(init_code.as_slice())
}

// =============================================================================
// MODULE CATALOG
// =============================================================================

/// Registry of modules known to a host.
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: HashMap<&'static str, Arc<dyn NativeModule>>,
}

impl ModuleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module, replacing any module of the same name.
    pub fn register<M: NativeModule + 'static>(&mut self, module: M) -> &mut Self {
        self.modules.insert(module.name(), Arc::new(module));
        self
    }

    /// Builder-style [`ModuleCatalog::register`].
    #[must_use]
    pub fn with<M: NativeModule + 'static>(mut self, module: M) -> Self {
        self.register(module);
        self
    }

    /// Looks up a module by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn NativeModule>, VmError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| VmError::UnknownModule(name.to_string()))
    }

    /// Returns true if a module of this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Resolves deployed code to its module.
    pub fn resolve_runtime(&self, code: &[u8]) -> Result<Arc<dyn NativeModule>, VmError> {
        match CodeImage::parse(code)? {
            CodeImage::Runtime { module } => self.get(&module),
            CodeImage::Init { .. } => Err(VmError::InvalidCode("init code is not runnable".into())),
        }
    }

    /// Resolves init code to its module and constructor arguments.
    pub fn resolve_init(&self, code: &[u8]) -> Result<(Arc<dyn NativeModule>, Bytes), VmError> {
        match CodeImage::parse(code)? {
            CodeImage::Init {
                module,
                constructor_args,
            } => Ok((self.get(&module)?, constructor_args)),
            CodeImage::Runtime { .. } => {
                Err(VmError::InvalidCode("runtime code is not deployable".into()))
            }
        }
    }
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.modules.keys().collect();
        names.sort();
        f.debug_struct("ModuleCatalog").field("modules", &names).finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
