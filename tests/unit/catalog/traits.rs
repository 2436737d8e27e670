//! Tests for catalog conversion, algorithm inference and structural validation

#[cfg(test)]
mod tests {
    use crate::fixtures;
    use serde_json::json;
    use traitforge::ForgeError;
    use traitforge::catalog::{TraitAlgorithm, TraitCatalog};

    fn load(document: serde_json::Value) -> traitforge::Result<TraitCatalog> {
        TraitCatalog::from_document(&fixtures::document(document))
    }

    // Tests algorithm inference from table shapes
    // Verified by defaulting every catalog to basic
    #[test]
    fn test_algorithm_inference() {
        assert_eq!(fixtures::basic_catalog().algorithm(), TraitAlgorithm::Basic);
        assert_eq!(
            fixtures::class_body_catalog().algorithm(),
            TraitAlgorithm::Restricted
        );
        assert_eq!(fixtures::combo_catalog().algorithm(), TraitAlgorithm::Combo);
    }

    // Tests explicit algorithm is honoured
    // Verified by always inferring
    #[test]
    fn test_explicit_csv_algorithm() {
        let catalog = load(json!({
            "trait_algorithm": "csv",
            "trait_types": ["background", "body"]
        }))
        .expect("csv catalogs need no tables");

        assert_eq!(catalog.algorithm(), TraitAlgorithm::Csv);
        assert!(catalog.table("body").is_none());
    }

    // Tests explicit basic with restrictions samples as restricted
    // Verified by rejecting restrictions on basic catalogs
    #[test]
    fn test_explicit_basic_with_restrictions() {
        let catalog = load(json!({
            "trait_algorithm": "basic",
            "trait_types": ["class", "body"],
            "trait_restrictions": ["class"],
            "trait_values": {
                "class": {"warrior": 0.5, "mage": 0.5},
                "body": {
                    "warrior": {"white": 1.0},
                    "mage": {"blue": 1.0}
                }
            }
        }))
        .expect("restrictions upgrade basic catalogs");

        assert_eq!(catalog.algorithm(), TraitAlgorithm::Restricted);
        assert_eq!(catalog.restriction(), Some("class"));
    }

    // Tests trait_values keys must be declared trait types
    // Verified by skipping the membership check
    #[test]
    fn test_undeclared_trait_rejected() {
        let result = load(json!({
            "trait_types": ["background"],
            "trait_values": {
                "background": {"blue": 1.0},
                "hat": {"cap": 1.0}
            }
        }));
        match result {
            Err(ForgeError::Catalog { trait_type, .. }) => assert_eq!(trait_type, "hat"),
            other => unreachable!("Expected Catalog error, got {other:?}"),
        }
    }

    // Tests every trait type needs a table outside csv catalogs
    // Verified by allowing missing tables
    #[test]
    fn test_missing_table_rejected() {
        let result = load(json!({
            "trait_types": ["background", "body"],
            "trait_values": {"background": {"blue": 1.0}}
        }));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests hidden traits must be declared
    // Verified by ignoring trait_hidden
    #[test]
    fn test_unknown_hidden_trait_rejected() {
        let result = load(json!({
            "trait_types": ["background"],
            "trait_hidden": ["ghost"],
            "trait_values": {"background": {"blue": 1.0}}
        }));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests more than one restriction trait is rejected
    // Verified by using the last restriction
    #[test]
    fn test_multiple_restrictions_rejected() {
        let result = load(json!({
            "trait_types": ["class", "race", "body"],
            "trait_restrictions": ["class", "race"],
            "trait_values": {
                "class": {"warrior": 1.0},
                "race": {"elf": 1.0},
                "body": {"warrior": {"white": 1.0}}
            }
        }));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests restriction traits need flat tables
    // Verified by accepting hierarchical restrictions
    #[test]
    fn test_hierarchical_restriction_rejected() {
        let result = load(json!({
            "trait_types": ["class", "body"],
            "trait_restrictions": ["class"],
            "trait_values": {
                "class": {"x": {"warrior": 1.0}},
                "body": {"warrior": {"white": 1.0}}
            }
        }));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests dependent branches must be restriction values
    // Verified by skipping the branch key check
    #[test]
    fn test_unknown_branch_rejected() {
        let result = load(json!({
            "trait_types": ["class", "body"],
            "trait_restrictions": ["class"],
            "trait_values": {
                "class": {"warrior": 1.0},
                "body": {"rogue": {"white": 1.0}}
            }
        }));
        match result {
            Err(ForgeError::Catalog { trait_type, reason }) => {
                assert_eq!(trait_type, "body");
                assert!(reason.contains("rogue"));
            }
            other => unreachable!("Expected Catalog error, got {other:?}"),
        }
    }

    // Tests dependents of a restriction need branch tables
    // Verified by accepting flat dependents
    #[test]
    fn test_flat_dependent_rejected() {
        let result = load(json!({
            "trait_types": ["class", "body"],
            "trait_restrictions": ["class"],
            "trait_values": {
                "class": {"warrior": 1.0},
                "body": {"white": 1.0}
            }
        }));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests combo catalogs need branch tables everywhere
    // Verified by accepting flat combo tables
    #[test]
    fn test_combo_flat_table_rejected() {
        let result = load(json!({
            "trait_algorithm": "combo",
            "trait_types": ["background", "hat"],
            "trait_values": {
                "background": {"any": {"night": 1.0}},
                "hat": {"cap": 1.0}
            }
        }));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests empty trait type lists are rejected
    // Verified by allowing empty catalogs
    #[test]
    fn test_empty_trait_types_rejected() {
        let result = load(json!({"trait_types": []}));
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests catalog accessors
    // Verified by swapping hidden and restriction lists
    #[test]
    fn test_catalog_accessors() {
        let restricted = fixtures::class_body_catalog();
        assert_eq!(restricted.restriction(), Some("class"));
        assert!(restricted.is_restriction("class"));
        assert!(!restricted.is_restriction("body"));
        assert_eq!(restricted.trait_types(), ["class", "body"]);

        let combo = fixtures::combo_catalog();
        assert!(combo.is_hidden("body"));
        assert!(!combo.is_hidden("hat"));
        assert!(combo.restriction().is_none());
    }

    // Tests value listing is deduplicated and follows trait order
    // Verified by listing values per branch with duplicates
    #[test]
    fn test_all_values() {
        let combo = fixtures::combo_catalog();
        assert_eq!(
            combo.all_values(),
            vec!["night", "robot", "alien", "antenna", "halo"]
        );
    }
}
