//! Tests for configuration defaults, loading and validation

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use traitforge::ForgeError;
    use traitforge::catalog::TraitAlgorithm;
    use traitforge::io::configuration::{
        DEFAULT_CONFIG_FILE, DEFAULT_IMAGE_FORMAT, DEFAULT_PROJECT, DEFAULT_WORKING_DIR,
        PLACEHOLDER_ADDRESS, load_config, project_from_document, validate_config,
    };

    fn document(address: &str) -> Value {
        json!({
            "example": {
                "settings": {
                    "num_tokens": 4,
                    "address": address,
                    "name_prefix": "Forge",
                    "description": "desc",
                    "symbol": "FRG",
                    "collection": "Forge",
                    "seller_fee_basis_points": 250
                },
                "traits": {
                    "trait_types": ["background"],
                    "trait_values": {"background": {"blue": 1.0}}
                },
                "validation": {"min_rarity_basis": 25}
            }
        })
    }

    // Tests default values
    // Verified by changing constant values
    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_PROJECT, "example");
        assert_eq!(DEFAULT_CONFIG_FILE, "config.json");
        assert_eq!(DEFAULT_WORKING_DIR, "projects");
        assert_eq!(DEFAULT_IMAGE_FORMAT, "png");
        assert_eq!(PLACEHOLDER_ADDRESS, "REPLACEME");
    }

    // Tests missing projects are configuration errors
    // Verified by defaulting to the first project
    #[test]
    fn test_missing_project() {
        assert!(matches!(
            validate_config(&document("Addr"), "other"),
            Err(ForgeError::Config { .. })
        ));
    }

    // Tests the placeholder address is refused
    // Verified by accepting any address
    #[test]
    fn test_placeholder_address() {
        assert!(matches!(
            validate_config(&document(PLACEHOLDER_ADDRESS), "example"),
            Err(ForgeError::Config { .. })
        ));
        assert!(validate_config(&document("Addr"), "example").is_ok());
    }

    // Tests the project entry parses with defaults filled in
    // Verified by requiring image_format
    #[test]
    fn test_project_parsing() {
        let config =
            project_from_document(&document("Addr"), "example", Path::new("config.json")).unwrap();

        assert_eq!(config.settings.num_tokens, 4);
        assert_eq!(config.settings.image_format, "png");
        assert_eq!(config.settings.working_dir, PathBuf::from("projects"));
        assert_eq!(config.validation.min_rarity_basis, Some(25));

        let constants = config.settings.constants();
        assert_eq!(constants.creator_address, "Addr");
        assert_eq!(constants.seller_fee_basis_points, 250);
        assert_eq!(config.catalog().unwrap().algorithm(), TraitAlgorithm::Basic);
    }

    // Tests malformed entries surface as document errors
    // Verified by panicking on missing fields
    #[test]
    fn test_malformed_project() {
        let mut broken = document("Addr");
        broken["example"]["settings"]
            .as_object_mut()
            .unwrap()
            .remove("num_tokens");

        assert!(matches!(
            project_from_document(&broken, "example", Path::new("config.json")),
            Err(ForgeError::Metadata { .. })
        ));
    }

    // Tests loading from disk
    // Verified by ignoring the project argument
    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, document("Addr").to_string()).unwrap();

        assert!(load_config(&path, "example").is_ok());
        assert!(load_config(&path, "missing").is_err());
        assert!(matches!(
            load_config(&temp_dir.path().join("absent.json"), "example"),
            Err(ForgeError::FileSystem { .. })
        ));
    }
}
