//! Tests for layer path resolution per catalog shape

#[cfg(test)]
mod tests {
    use crate::fixtures;
    use std::path::PathBuf;
    use traitforge::ForgeError;
    use traitforge::algorithm::sampler::AttributeSet;
    use traitforge::io::context::RunContext;
    use traitforge::metadata::{TokenMetadata, assemble};
    use traitforge::render::ImagePlanResolver;

    fn record(token: u64, pairs: &[(&str, &str)]) -> TokenMetadata {
        let attributes = AttributeSet::from_pairs(
            pairs
                .iter()
                .map(|(t, v)| ((*t).to_string(), (*v).to_string()))
                .collect(),
        );
        assemble(&fixtures::constants(10), token, &attributes).unwrap()
    }

    fn resolver() -> ImagePlanResolver {
        ImagePlanResolver::new("traits", "png")
    }

    // Tests flat catalogs map straight to value files
    // Verified by nesting under a branch folder
    #[test]
    fn test_basic_paths() {
        let plan = resolver()
            .resolve(
                &fixtures::basic_catalog(),
                &record(2, &[("background", "blue"), ("body", "robot")]),
                &RunContext::detached(),
            )
            .unwrap();

        assert_eq!(plan.token, 2);
        assert_eq!(
            plan.layers,
            vec![
                PathBuf::from("traits/background/blue.png"),
                PathBuf::from("traits/body/robot.png"),
            ]
        );
    }

    // Tests dependents live under their restriction value
    // Verified by using the trait's own value as folder
    #[test]
    fn test_restricted_paths() {
        let plan = resolver()
            .resolve(
                &fixtures::class_body_catalog(),
                &record(0, &[("class", "mage"), ("body", "blue")]),
                &RunContext::detached(),
            )
            .unwrap();

        assert_eq!(
            plan.layers,
            vec![
                PathBuf::from("traits/class/mage.png"),
                PathBuf::from("traits/body/mage/blue.png"),
            ]
        );
    }

    // Tests combo paths use the sublevel and skip hidden traits
    // Verified by including hidden layers
    #[test]
    fn test_combo_paths() {
        let plan = resolver()
            .resolve(
                &fixtures::combo_catalog(),
                &record(
                    1,
                    &[("background", "night"), ("body", "robot"), ("hat", "antenna")],
                ),
                &RunContext::detached(),
            )
            .unwrap();

        assert_eq!(
            plan.layers,
            vec![
                PathBuf::from("traits/background/any/background-any-night.png"),
                PathBuf::from("traits/hat/robot/hat-robot-antenna.png"),
            ]
        );
    }

    // Tests absent traits contribute no layer
    // Verified by failing on absent traits
    #[test]
    fn test_absent_trait_skipped() {
        let plan = resolver()
            .resolve(
                &fixtures::class_body_catalog(),
                &record(0, &[("class", "warrior")]),
                &RunContext::detached(),
            )
            .unwrap();

        assert_eq!(plan.layers, vec![PathBuf::from("traits/class/warrior.png")]);
    }

    // Tests unknown combo values are catalog errors
    // Verified by falling back to the value file
    #[test]
    fn test_combo_unknown_value() {
        let result = resolver().resolve(
            &fixtures::combo_catalog(),
            &record(0, &[("hat", "crown")]),
            &RunContext::detached(),
        );
        assert!(matches!(result, Err(ForgeError::Catalog { .. })));
    }

    // Tests identity mismatches are refused before resolving
    // Verified by resolving with the image number
    #[test]
    fn test_identity_mismatch_refused() {
        let mut broken = record(3, &[("background", "blue"), ("body", "robot")]);
        broken.image = "4.png".to_string();

        let result = resolver().resolve(&fixtures::basic_catalog(), &broken, &RunContext::detached());
        assert!(matches!(result, Err(ForgeError::Consistency { .. })));
    }
}
