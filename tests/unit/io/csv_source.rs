//! Tests for reading attribute rows from CSV

#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::TempDir;
    use traitforge::ForgeError;
    use traitforge::io::csv_source::{attribute_table_path, load_attribute_rows, parse_attribute_rows};

    // Tests the header names traits and rows map to tokens
    // Verified by treating the header as token zero
    #[test]
    fn test_parse_rows() {
        let rows = parse_attribute_rows("background, body\nblue, robot\n\nred,alien\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("background"), Some("blue"));
        assert_eq!(rows[0].get("body"), Some("robot"));
        assert_eq!(rows[1].get("body"), Some("alien"));
        let order: Vec<&str> = rows[1].iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["background", "body"]);
    }

    // Tests ragged rows and empty tables are rejected
    // Verified by truncating long rows
    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_attribute_rows("a,b\n1,2,3\n"),
            Err(ForgeError::InvalidParameter { .. })
        ));
        assert!(parse_attribute_rows("").is_err());
        assert!(parse_attribute_rows("a,b\n").unwrap().is_empty());
    }

    // Tests quoted cells keep their commas
    // Verified by splitting rows on every comma
    #[test]
    fn test_parse_quoted_cells() {
        let rows = parse_attribute_rows("body,hat\n\"blue, dark\",cap\n\"say \"\"hi\"\"\", crown\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("body"), Some("blue, dark"));
        assert_eq!(rows[0].get("hat"), Some("cap"));
        assert_eq!(rows[1].get("body"), Some("say \"hi\""));
        assert_eq!(rows[1].get("hat"), Some("crown"));
    }

    // Tests the table is read from csv/metadata.csv
    // Verified by reading a different file name
    #[test]
    fn test_load_rows() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            load_attribute_rows(temp_dir.path()),
            Err(ForgeError::FileSystem { .. })
        ));

        fs::write(attribute_table_path(temp_dir.path()), "body\nrobot\n").unwrap();
        let rows = load_attribute_rows(temp_dir.path()).unwrap();
        assert_eq!(rows[0].get("body"), Some("robot"));
    }
}
