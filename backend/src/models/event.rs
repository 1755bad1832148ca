use serde::{Deserialize, Serialize};

/// Identity lifecycle event as delivered by the provider's webhook.
///
/// The payload is trusted as-is: authenticity and shape are the delivery
/// boundary's responsibility, and missing name parts are treated as empty
/// strings rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum IdentityEvent {
    #[serde(rename = "user.upserted")]
    UserUpserted {
        external_id: String,
        #[serde(default)]
        given_name: String,
        #[serde(default)]
        family_name: String,
    },
    #[serde(rename = "user.deleted")]
    UserDeleted { external_id: String },
}

impl IdentityEvent {
    pub fn external_id(&self) -> &str {
        match self {
            IdentityEvent::UserUpserted { external_id, .. } => external_id,
            IdentityEvent::UserDeleted { external_id } => external_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_deserialize_upserted() {
        let json = r#"{
            "type": "user.upserted",
            "data": {"external_id": "ext_1", "given_name": "Ada", "family_name": "Lovelace"}
        }"#;
        let event: IdentityEvent = serde_json::from_str(json).unwrap();
        match event {
            IdentityEvent::UserUpserted {
                external_id,
                given_name,
                family_name,
            } => {
                assert_eq!(external_id, "ext_1");
                assert_eq!(given_name, "Ada");
                assert_eq!(family_name, "Lovelace");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_deleted() {
        let json = r#"{"type": "user.deleted", "data": {"external_id": "ext_1"}}"#;
        let event: IdentityEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, IdentityEvent::UserDeleted { .. }));
        assert_eq!(event.external_id(), "ext_1");
    }

    #[rstest]
    #[case(r#"{"external_id": "ext_1"}"#, "", "")]
    #[case(r#"{"external_id": "ext_1", "given_name": "Ada"}"#, "Ada", "")]
    #[case(r#"{"external_id": "ext_1", "family_name": "Lovelace"}"#, "", "Lovelace")]
    fn test_missing_name_parts_default_to_empty(
        #[case] data: &str,
        #[case] expected_given: &str,
        #[case] expected_family: &str,
    ) {
        let json = format!(r#"{{"type": "user.upserted", "data": {}}}"#, data);
        let event: IdentityEvent = serde_json::from_str(&json).unwrap();
        match event {
            IdentityEvent::UserUpserted {
                given_name,
                family_name,
                ..
            } => {
                assert_eq!(given_name, expected_given);
                assert_eq!(family_name, expected_family);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let json = r#"{"type": "user.banned", "data": {"external_id": "ext_1"}}"#;
        assert!(serde_json::from_str::<IdentityEvent>(json).is_err());
    }
}
