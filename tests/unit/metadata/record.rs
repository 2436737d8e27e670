//! Tests for record serialization, flattening and identity checks

#[cfg(test)]
mod tests {
    use crate::fixtures;
    use traitforge::ForgeError;
    use traitforge::algorithm::sampler::AttributeSet;
    use traitforge::metadata::record::{Attribute, flatten_attributes};
    use traitforge::metadata::{TokenMetadata, assemble};

    fn record(token: u64) -> TokenMetadata {
        let attributes = AttributeSet::from_pairs(vec![
            ("background".to_string(), "blue".to_string()),
            ("body".to_string(), "robot".to_string()),
        ]);
        assemble(&fixtures::constants(10), token, &attributes).expect("assembled")
    }

    // Tests attribute lists flatten into a lookup
    // Verified by keying on trait_value
    #[test]
    fn test_flatten_attributes() {
        let attributes = vec![
            Attribute {
                trait_type: "class".to_string(),
                trait_value: "warrior".to_string(),
            },
            Attribute {
                trait_type: "body".to_string(),
                trait_value: "white".to_string(),
            },
        ];
        let flat = flatten_attributes(&attributes);

        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get("class").map(String::as_str), Some("warrior"));
        assert_eq!(flat.get("body").map(String::as_str), Some("white"));
    }

    // Tests consistent records report their token
    // Verified by parsing the prefix instead of the suffix
    #[test]
    fn test_identity_consistent() {
        assert_eq!(record(7).check_identity().ok(), Some(7));
    }

    // Tests an image mismatch is detected
    // Verified by skipping the image comparison
    #[test]
    fn test_identity_image_mismatch() {
        let mut broken = record(3);
        broken.image = "4.png".to_string();

        match broken.check_identity() {
            Err(ForgeError::Consistency { name, reason }) => {
                assert_eq!(name, "Forge #3");
                assert!(reason.contains("4.png"));
            }
            other => unreachable!("Expected Consistency error, got {other:?}"),
        }
    }

    // Tests a file uri mismatch is detected
    // Verified by skipping the uri comparison
    #[test]
    fn test_identity_uri_mismatch() {
        let mut broken = record(3);
        broken.properties.files[0].uri = "30.png".to_string();
        assert!(matches!(
            broken.check_identity(),
            Err(ForgeError::Consistency { .. })
        ));
    }

    // Tests names without a numeric suffix are rejected
    // Verified by defaulting the token to zero
    #[test]
    fn test_identity_unparseable_name() {
        let mut broken = record(3);
        broken.name = "Forge".to_string();
        assert!(broken.check_identity().is_err());
    }

    // Tests the Metaplex field layout on disk
    // Verified by renaming the file type field
    #[test]
    fn test_serialized_layout() {
        let value = serde_json::to_value(record(2)).expect("serializable");

        assert_eq!(value["image"], "2.png");
        assert_eq!(value["name"], "Forge #2");
        assert_eq!(value["properties"]["files"][0]["type"], "image/png");
        assert_eq!(value["properties"]["category"], "image");
        assert_eq!(value["properties"]["creators"][0]["share"], 100);
        assert_eq!(value["attributes"][1]["trait_value"], "robot");
        assert_eq!(value["seller_fee_basis_points"], 500);
    }
}
