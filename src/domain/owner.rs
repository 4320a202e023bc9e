record_id!(
    /// Reference to the user that owns a record
    OwnerId,
    "owner"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_owner_id_parsing() {
        let id = OwnerId::from_str("  user-1 ").unwrap();
        assert_eq!(id.as_str(), "user-1");

        assert!(OwnerId::from_str("").is_err());
        assert!(OwnerId::from_str("   ").is_err());
        assert!(OwnerId::from_str("users/1").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(OwnerId::generate(), OwnerId::generate());
    }

    #[test]
    fn test_owner_id_serializes_as_plain_string() {
        let id = OwnerId::from_str("user-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"user-1\"");
    }
}
