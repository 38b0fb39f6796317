//! Bundle of foreign process capabilities
//!
//! An [`Engine`] is built once by whoever attaches to the client and handed to
//! every component that needs foreign access. There is no global instance.

use std::fmt;
use std::sync::Arc;

use crate::functions::{ForeignFunctions, ScriptHost};
use crate::memory::AddressSpace;

/// Shared handle to the foreign process
#[derive(Clone)]
pub struct Engine {
    memory: Arc<dyn AddressSpace>,
    functions: Arc<dyn ForeignFunctions>,
    scripts: Arc<dyn ScriptHost>,
}

impl Engine {
    /// Create a new engine from its three capabilities
    pub fn new(
        memory: Arc<dyn AddressSpace>,
        functions: Arc<dyn ForeignFunctions>,
        scripts: Arc<dyn ScriptHost>,
    ) -> Self {
        tracing::debug!("Engine capabilities attached");
        Self {
            memory,
            functions,
            scripts,
        }
    }

    /// Address space reader
    pub fn memory(&self) -> &dyn AddressSpace {
        self.memory.as_ref()
    }

    /// Native client functions
    pub fn functions(&self) -> &dyn ForeignFunctions {
        self.functions.as_ref()
    }

    /// Scripting layer
    pub fn scripts(&self) -> &dyn ScriptHost {
        self.scripts.as_ref()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}
