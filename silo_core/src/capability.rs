//! Admin capabilities for silos.
//!
//! An [`AdminCapability`] is an unforgeable token of authority over exactly
//! one silo. It is minted together with its silo and cannot be cloned,
//! deserialized, or constructed outside this crate, so holding one is proof
//! that it was handed over by whoever created the silo (or a later holder).

use crate::id::{CapabilityId, SiloId};
use std::fmt;

/// Token authorizing mutation of a single silo.
///
/// Deliberately neither `Clone` nor `Copy`: authority moves with the value.
pub struct AdminCapability {
    id: CapabilityId,
    silo_id: SiloId,
}

impl AdminCapability {
    pub(crate) fn mint(id: CapabilityId, silo_id: SiloId) -> Self {
        Self { id, silo_id }
    }

    /// Identity of this capability.
    pub fn id(&self) -> CapabilityId {
        self.id
    }

    /// Identity of the silo this capability is bound to.
    pub fn silo_id(&self) -> SiloId {
        self.silo_id
    }

    /// Whether this capability authorizes the silo with the given identity.
    pub fn authorizes(&self, silo_id: &SiloId) -> bool {
        self.silo_id == *silo_id
    }

    /// Give up this capability. The silo it was bound to is unaffected.
    pub fn destroy(self) {
        tracing::debug!(
            capability_id = %self.id,
            silo_id = %self.silo_id,
            "admin capability destroyed"
        );
    }
}

impl fmt::Debug for AdminCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCapability")
            .field("id", &self.id)
            .field("silo_id", &self.silo_id)
            .finish()
    }
}

/// What a caller presents to a mutating silo operation.
///
/// Built from a capability reference, or [`Credential::none`] for silos
/// running without authorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct Credential<'a> {
    capability: Option<&'a AdminCapability>,
}

impl<'a> Credential<'a> {
    /// Present no capability at all.
    pub fn none() -> Self {
        Self { capability: None }
    }

    pub fn capability(&self) -> Option<&'a AdminCapability> {
        self.capability
    }

    /// Silo the presented capability is bound to, if one was presented.
    pub fn bound_silo(&self) -> Option<SiloId> {
        self.capability.map(AdminCapability::silo_id)
    }

    pub fn authorizes(&self, silo_id: &SiloId) -> bool {
        self.capability
            .map(|cap| cap.authorizes(silo_id))
            .unwrap_or(false)
    }
}

impl<'a> From<&'a AdminCapability> for Credential<'a> {
    fn from(capability: &'a AdminCapability) -> Self {
        Self {
            capability: Some(capability),
        }
    }
}

impl<'a> From<Option<&'a AdminCapability>> for Credential<'a> {
    fn from(capability: Option<&'a AdminCapability>) -> Self {
        Self { capability }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_authorizes_only_its_silo() {
        let silo = SiloId::new();
        let other = SiloId::new();
        let cap = AdminCapability::mint(CapabilityId::new(), silo);

        assert!(cap.authorizes(&silo));
        assert!(!cap.authorizes(&other));
        assert_eq!(cap.silo_id(), silo);
    }

    #[test]
    fn test_credential_from_capability() {
        let silo = SiloId::new();
        let cap = AdminCapability::mint(CapabilityId::new(), silo);

        let cred = Credential::from(&cap);
        assert!(cred.authorizes(&silo));
        assert_eq!(cred.bound_silo(), Some(silo));
        assert_eq!(cred.capability().map(AdminCapability::id), Some(cap.id()));
    }

    #[test]
    fn test_empty_credential_authorizes_nothing() {
        let cred = Credential::none();
        assert!(!cred.authorizes(&SiloId::new()));
        assert_eq!(cred.bound_silo(), None);
    }
}
