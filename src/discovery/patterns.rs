//! Which files count as sources and which directories are never entered

use std::path::Path;

/// Languages whose analysis needs compiled output (`sonar.java.binaries`).
/// Files in these languages are only collected when the user supplied the
/// binaries and libraries themselves.
pub const BINARY_LANGUAGE_EXTENSIONS: &[&str] = &["java", "jav", "kt", "kts"];

/// Extensions collected regardless of the binaries flag
pub const SOURCE_EXTENSIONS: &[&str] = &[
    // JavaScript/TypeScript
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "vue",
    // Web
    "html", "htm", "xhtml", "css", "scss", "less", "jsp", "jspf",
    // Python
    "py",
    // Ruby
    "rb",
    // PHP
    "php",
    // Go
    "go",
    // JVM (interpreted or script-compiled)
    "scala", "groovy",
    // .NET
    "cs", "vb",
    // C/C++/Objective-C
    "c", "h", "cc", "cpp", "cxx", "hpp", "hxx", "m",
    // Swift/Dart/Rust
    "swift", "dart", "rs",
    // Shell and infrastructure
    "sh", "bash", "ps1", "tf", "bicep",
    // Data and config
    "xml", "json", "yaml", "yml", "properties", "sql",
];

/// Hidden directories that still hold sources worth analyzing
const ALLOWED_HIDDEN_DIRS: &[&str] = &[".github"];

/// Checks the extension allow-list. Matching is case-insensitive.
pub fn is_interesting_file(path: &Path, include_binary_languages: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    if SOURCE_EXTENSIONS.contains(&ext.as_str()) {
        return true;
    }
    include_binary_languages && BINARY_LANGUAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Hidden directories (`.git`, `.idea`, ...) are never entered
pub fn is_excluded_dir(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => {
            name.starts_with('.') && name.len() > 1 && !ALLOWED_HIDDEN_DIRS.contains(&name)
        }
        None => false,
    }
}
