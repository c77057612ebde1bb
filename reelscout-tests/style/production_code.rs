//! Production Code Enforcement
//!
//! Production code must not carry `#[allow(dead_code)]` and must propagate
//! errors instead of calling `.unwrap()` or `.expect(`. Everything after the
//! first `#[cfg(test)]` in a file, and files that only exist for tests, are
//! exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern found in production code
#[derive(Debug)]
struct Violation {
    file_path: String,
    line_number: usize,
    rule: &'static str,
    context: String,
}

/// Patterns rejected in production code, with the rule they break
const RULES: &[(&str, &str)] = &[
    ("#[allow(dead_code)]", "dead code allowance"),
    (".unwrap()", "panicking unwrap"),
    (".expect(", "panicking expect"),
];

struct ProductionCodeChecker {
    violations: Vec<Violation>,
    files_checked: usize,
}

impl ProductionCodeChecker {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
            files_checked: 0,
        }
    }

    /// Source directories of every workspace crate except this one
    fn source_roots() -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let workspace = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .ok_or("test crate has no parent directory")?;

        let mut roots = Vec::new();
        for entry in fs::read_dir(workspace)? {
            let path = entry?.path();
            let is_member = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("reelscout-"));
            if is_member && !path.ends_with("reelscout-tests") && path.join("src").is_dir() {
                roots.push(path.join("src"));
            }
        }
        roots.sort();
        Ok(roots)
    }

    fn find_rust_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::find_rust_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
        Ok(())
    }

    /// Files compiled only for tests
    fn is_test_file(path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        name.starts_with("test_") || name.ends_with("_test.rs") || name == "mock.rs"
    }

    fn check_source(&mut self, file_path: &str, content: &str) {
        self.files_checked += 1;

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("#[cfg(test)]") {
                break;
            }
            // Doc examples may unwrap.
            if trimmed.starts_with("//") {
                continue;
            }

            for &(pattern, rule) in RULES {
                if trimmed.contains(pattern) {
                    self.violations.push(Violation {
                        file_path: file_path.to_string(),
                        line_number: index + 1,
                        rule,
                        context: trimmed.to_string(),
                    });
                }
            }
        }
    }

    fn check_workspace(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut files = Vec::new();
        for root in Self::source_roots()? {
            Self::find_rust_files(&root, &mut files)?;
        }

        for file in files.iter().filter(|file| !Self::is_test_file(file)) {
            let content = fs::read_to_string(file)?;
            self.check_source(&file.to_string_lossy(), &content);
        }
        Ok(())
    }

    fn report(&self) -> bool {
        if self.violations.is_empty() {
            println!(
                "Production code enforcement: {} files checked, no violations found",
                self.files_checked
            );
            return true;
        }

        println!("Production code violations found:");
        for violation in &self.violations {
            println!(
                "{}:{} ({})\n  {}",
                violation.file_path, violation.line_number, violation.rule, violation.context
            );
        }
        println!(
            "Found {} violation(s) in {} file(s) checked",
            self.violations.len(),
            self.files_checked
        );
        println!("Propagate errors with `?` and remove unused code instead of allowing it.");
        false
    }
}

#[test]
fn test_is_test_file() {
    assert!(ProductionCodeChecker::is_test_file(Path::new("src/test_server.rs")));
    assert!(ProductionCodeChecker::is_test_file(Path::new("src/providers/mock.rs")));
    assert!(!ProductionCodeChecker::is_test_file(Path::new("src/cycle.rs")));
    assert!(!ProductionCodeChecker::is_test_file(Path::new("src/tracking/memory.rs")));
}

#[test]
fn test_test_modules_are_exempt() {
    let mut checker = ProductionCodeChecker::new();
    checker.check_source(
        "src/example.rs",
        "fn run() -> Option<u8> {\n    Some(1)\n}\n\n#[cfg(test)]\nmod tests {\n    fn t() { run().unwrap(); }\n}\n",
    );

    assert!(checker.violations.is_empty());
}

#[test]
fn test_violations_are_reported_with_line_numbers() {
    let mut checker = ProductionCodeChecker::new();
    checker.check_source(
        "src/example.rs",
        "/// let x = parse().unwrap();\n#[allow(dead_code)]\nfn parse() -> u8 {\n    \"1\".parse().expect(\"number\")\n}\n",
    );

    let found: Vec<(usize, &str)> = checker
        .violations
        .iter()
        .map(|violation| (violation.line_number, violation.rule))
        .collect();
    assert_eq!(
        found,
        vec![(2, "dead code allowance"), (4, "panicking expect")]
    );
}

#[test]
fn test_workspace_production_code() {
    let mut checker = ProductionCodeChecker::new();
    checker
        .check_workspace()
        .expect("workspace sources should be readable");

    assert!(checker.files_checked > 0, "no workspace sources found");
    assert!(
        checker.report(),
        "production code must propagate errors and carry no dead code allowances"
    );
}
