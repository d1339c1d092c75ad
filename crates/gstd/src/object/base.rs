//! Lock and bookkeeping shared by every resource.

use std::sync::{Mutex, MutexGuard};

use gstd_types::ReturnCode;
use tracing::debug;

use super::OBJECT_TARGET;
use super::error::ResourceError;

/// Name, lock and last return code of a resource.
///
/// `S` is the kind-specific mutable state. It is only reachable through
/// [`ObjectBase::call`], which holds the lock for the whole operation and
/// records its outcome.
#[derive(Debug)]
pub struct ObjectBase<S> {
    name: String,
    slot: Mutex<Slot<S>>,
}

#[derive(Debug)]
struct Slot<S> {
    state: S,
    last_code: ReturnCode,
    detached: bool,
}

impl<S> ObjectBase<S> {
    /// Wraps `state` under a fresh lock.
    pub fn new(name: impl Into<String>, state: S) -> Self {
        Self {
            name: name.into(),
            slot: Mutex::new(Slot {
                state,
                last_code: ReturnCode::Ok,
                detached: false,
            }),
        }
    }

    /// Name of the resource.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return code recorded by the most recent operation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Poisoned`] when the lock is poisoned.
    pub fn last_code(&self) -> Result<ReturnCode, ResourceError> {
        Ok(self.lock()?.last_code)
    }

    /// Runs a CRUD operation under the lock and records its return code.
    ///
    /// Destroyed objects answer every call with [`ResourceError::Detached`].
    pub(crate) fn call<T>(
        &self,
        operation: impl FnOnce(&mut S) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let mut slot = self.lock()?;
        let result = if slot.detached {
            Err(ResourceError::Detached {
                name: self.name.clone(),
            })
        } else {
            operation(&mut slot.state)
        };
        slot.last_code = match &result {
            Ok(_) => ReturnCode::Ok,
            Err(error) => error.code(),
        };
        result
    }

    /// Inspects the state under the lock without touching the return code.
    pub(crate) fn peek<T>(
        &self,
        inspect: impl FnOnce(&S) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let slot = self.lock()?;
        if slot.detached {
            return Err(ResourceError::Detached {
                name: self.name.clone(),
            });
        }
        inspect(&slot.state)
    }

    /// Marks the object destroyed after running `teardown` on its state.
    ///
    /// Runs at most once; later calls are no-ops.
    pub(crate) fn destroy(&self, teardown: impl FnOnce(&mut S)) {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.detached {
            return;
        }
        teardown(&mut slot.state);
        slot.detached = true;
        debug!(target: OBJECT_TARGET, name = %self.name, "object destroyed");
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot<S>>, ResourceError> {
        self.slot.lock().map_err(|_| ResourceError::Poisoned {
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_records_outcome() {
        let base = ObjectBase::new("p0", 0_u32);
        let missing: Result<(), _> = base.call(|_| Err(ResourceError::MissingArgument { what: "x" }));
        assert!(missing.is_err());
        assert_eq!(base.last_code().ok(), Some(ReturnCode::NullArgument));

        let counted = base.call(|count| {
            *count += 1;
            Ok(*count)
        });
        assert_eq!(counted.ok(), Some(1));
        assert_eq!(base.last_code().ok(), Some(ReturnCode::Ok));
    }

    #[test]
    fn destroyed_objects_report_not_found() {
        let base = ObjectBase::new("p0", Vec::<u8>::new());
        base.destroy(Vec::clear);
        let result = base.call(|_| Ok(()));
        assert!(matches!(result, Err(ResourceError::Detached { .. })));
        assert_eq!(base.last_code().ok(), Some(ReturnCode::NotFound));
    }

    #[test]
    fn peek_leaves_return_code_untouched() {
        let base = ObjectBase::new("p0", 7_u8);
        let _ = base.call(|_| -> Result<(), _> { Err(ResourceError::internal("boom")) });
        assert_eq!(base.peek(|value| Ok(*value)).ok(), Some(7));
        assert_eq!(base.last_code().ok(), Some(ReturnCode::InternalError));
    }
}
