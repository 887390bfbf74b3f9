//! URN-style managed object reference parsing.
//!
//! The management console hands inventory objects around as references of the
//! form `urn:vmomi:<Type>:<id>:<instance-uuid>`. Only the embedded id segment
//! is meaningful to the provisioning backend.

use uuid::Uuid;

use crate::error::{VchAdminError, VchResult};

const URN_PREFIX: &str = "urn";
const URN_NAMESPACE: &str = "vmomi";

/// A parsed `urn:vmomi:<Type>:<id>:<instance-uuid>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedObjectRef {
    pub kind: String,
    pub id: String,
    pub instance: Uuid,
}

impl ManagedObjectRef {
    /// Parse a URN-style reference, rejecting anything that does not match
    /// the expected five-segment shape.
    pub fn parse(reference: &str) -> VchResult<Self> {
        let malformed = || VchAdminError::MalformedReference {
            reference: reference.to_string(),
        };

        let mut segments = reference.split(':');
        let prefix = segments.next().ok_or_else(malformed)?;
        let namespace = segments.next().ok_or_else(malformed)?;
        let kind = segments.next().ok_or_else(malformed)?;
        let id = segments.next().ok_or_else(malformed)?;
        let instance = segments.next().ok_or_else(malformed)?;

        if segments.next().is_some()
            || prefix != URN_PREFIX
            || namespace != URN_NAMESPACE
            || kind.is_empty()
            || id.is_empty()
        {
            return Err(malformed());
        }

        let instance = Uuid::parse_str(instance).map_err(|_| malformed())?;

        Ok(Self {
            kind: kind.to_string(),
            id: id.to_string(),
            instance,
        })
    }

    /// True when `reference` looks like a URN the parser would accept.
    pub fn is_urn(reference: &str) -> bool {
        reference.starts_with("urn:")
    }
}

/// Extract the datacenter moid from a datacenter object reference.
///
/// `urn:vmomi:Datacenter:dc-test:<uuid>` yields `dc-test`.
pub fn datacenter_id_from_ref(reference: &str) -> VchResult<String> {
    let parsed = ManagedObjectRef::parse(reference)?;
    if parsed.kind != "Datacenter" {
        return Err(VchAdminError::MalformedReference {
            reference: reference.to_string(),
        });
    }
    Ok(parsed.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DC_REF: &str = "urn:vmomi:Datacenter:dc-test:00000000-0000-0000-0000-000000000000";

    #[test]
    fn extracts_datacenter_moid() {
        assert_eq!(datacenter_id_from_ref(DC_REF).unwrap(), "dc-test");
    }

    #[test]
    fn parses_cluster_reference() {
        let r = ManagedObjectRef::parse(
            "urn:vmomi:ClusterComputeResource:domain-c7:00000000-0000-0000-0000-000000000000",
        )
        .unwrap();
        assert_eq!(r.kind, "ClusterComputeResource");
        assert_eq!(r.id, "domain-c7");
    }

    #[test]
    fn rejects_malformed_shapes() {
        let cases = [
            "",
            "dc-test",
            "urn:vmomi:Datacenter:dc-test",
            "urn:vmomi:Datacenter::00000000-0000-0000-0000-000000000000",
            "urn:vmomi::dc-test:00000000-0000-0000-0000-000000000000",
            "urn:other:Datacenter:dc-test:00000000-0000-0000-0000-000000000000",
            "xrn:vmomi:Datacenter:dc-test:00000000-0000-0000-0000-000000000000",
            "urn:vmomi:Datacenter:dc-test:not-a-uuid",
            "urn:vmomi:Datacenter:dc-test:00000000-0000-0000-0000-000000000000:extra",
        ];
        for case in cases {
            let err = ManagedObjectRef::parse(case).unwrap_err();
            assert!(
                matches!(err, VchAdminError::MalformedReference { .. }),
                "expected malformed reference for {case:?}"
            );
        }
    }

    #[test]
    fn datacenter_extraction_rejects_other_kinds() {
        let err = datacenter_id_from_ref(
            "urn:vmomi:ClusterComputeResource:domain-c7:00000000-0000-0000-0000-000000000000",
        )
        .unwrap_err();
        assert!(matches!(err, VchAdminError::MalformedReference { .. }));
    }
}
