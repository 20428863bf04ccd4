//! Session identifier generation

use uuid::Uuid;

/// Fresh session identifier.
///
/// UUIDv4 draws its 122 random bits from the operating system CSPRNG, so ids
/// are neither sequential nor guessable.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_session_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_session_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_session_id_is_uuid_v4() {
        let id = generate_session_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
