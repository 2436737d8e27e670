//! Layout guards: every src module has a unit test file at the mirrored path
//! under tests/unit, and every file in tests/ actually declares tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_ROOT: &str = "src";
    const UNIT_ROOT: &str = "tests/unit";
    const TESTS_ROOT: &str = "tests";

    /// Crate roots and module indexes carry no logic of their own
    fn is_wiring_file(relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        matches!(file_name, "main.rs" | "lib.rs" | "mod.rs")
    }

    /// Relative `.rs` files and directories below `root`, `/`-separated
    fn walk(root: &Path) -> io::Result<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                let Ok(relative) = path.strip_prefix(root) else {
                    return Err(io::Error::other("entry outside walked root"));
                };
                let relative = relative.to_string_lossy().replace('\\', "/");

                if path.is_dir() {
                    found.insert(relative);
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    found.insert(relative);
                }
            }
        }
        Ok(found)
    }

    fn src_and_unit_trees() -> (BTreeSet<String>, BTreeSet<String>) {
        let src = walk(Path::new(SRC_ROOT)).expect("src tree is readable");
        let unit = if Path::new(UNIT_ROOT).exists() {
            walk(Path::new(UNIT_ROOT)).expect("unit test tree is readable")
        } else {
            BTreeSet::new()
        };
        (src, unit)
    }

    // Tests each src module has a mirrored unit test file
    // Verified by deleting a unit test file
    #[test]
    fn test_src_modules_are_mirrored() {
        let (src, unit) = src_and_unit_trees();

        let unmirrored: Vec<String> = src
            .iter()
            .filter(|path| !is_wiring_file(path) && !unit.contains(*path))
            .map(|path| format!("  - src/{path} has no tests/unit/{path}"))
            .collect();

        assert!(
            unmirrored.is_empty(),
            "Modules without unit tests:\n{}",
            unmirrored.join("\n")
        );
    }

    // Tests no unit test file outlives its src module
    // Verified by adding a unit test for a removed module
    #[test]
    fn test_unit_tests_have_modules() {
        let (src, unit) = src_and_unit_trees();

        let stale: Vec<String> = unit
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src.contains(*path))
            .map(|path| format!("  - tests/unit/{path} has no src/{path}"))
            .collect();

        assert!(
            stale.is_empty(),
            "Unit tests without modules:\n{}",
            stale.join("\n")
        );
    }

    // Tests every test source declares at least one test
    // Verified by adding a file of helpers only
    #[test]
    fn test_test_files_declare_tests() {
        let files = walk(Path::new(TESTS_ROOT)).expect("tests tree is readable");

        let mut empty = Vec::new();
        for relative in files.iter().filter(|path| path.ends_with(".rs")) {
            if is_wiring_file(relative) {
                continue;
            }
            let path = Path::new(TESTS_ROOT).join(relative);
            let content = fs::read_to_string(&path).expect("test file is readable");
            if !content.contains("#[test]") {
                empty.push(format!("  - {}", path.display()));
            }
        }

        assert!(
            empty.is_empty(),
            "Test files without #[test] functions:\n{}",
            empty.join("\n")
        );
    }
}
