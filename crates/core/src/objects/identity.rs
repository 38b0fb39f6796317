//! Identity resolution
//!
//! Maps a guid to the address currently backing it. Results are never cached:
//! the client may move or recycle an object between two cycles.

use zzrust_engine::ForeignFunctions;
use zzrust_sdk::{Address, Guid};

/// Resolves identities through the client's guid lookup
#[derive(Clone, Copy)]
pub struct IdentityResolver<'a> {
    functions: &'a dyn ForeignFunctions,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(functions: &'a dyn ForeignFunctions) -> Self {
        Self { functions }
    }

    /// Current address of `guid`, `None` if it no longer exists
    pub fn resolve(&self, guid: Guid) -> Option<Address> {
        if guid == 0 {
            return None;
        }
        self.functions.object_address(guid).non_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProcess;

    #[test]
    fn test_resolve_queries_every_time() {
        let process = FakeProcess::new();
        process.set_address(5, 0x4000);

        let resolver = IdentityResolver::new(&*process);
        assert_eq!(resolver.resolve(5), Some(Address::new(0x4000)));

        process.set_address(5, 0x8000);
        assert_eq!(resolver.resolve(5), Some(Address::new(0x8000)));

        process.remove_address(5);
        assert_eq!(resolver.resolve(5), None);
    }

    #[test]
    fn test_zero_guid() {
        let process = FakeProcess::new();
        assert_eq!(IdentityResolver::new(&*process).resolve(0), None);
    }
}
