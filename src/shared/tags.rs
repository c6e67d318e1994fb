//! File type tags used by `types`, `types_or` and `exclude_types`
//!
//! Tags come from the file mode (`file`, `symlink`, `directory`,
//! `executable`), the name or extension, a shebang line for extensionless
//! executables, and finally a content sniff for `text` / `binary`.

use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

pub type Tags = BTreeSet<&'static str>;

lazy_static! {
    static ref EXTENSIONS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("py", &["text", "python"]);
        m.insert("pyi", &["text", "pyi"]);
        m.insert("pyx", &["text", "cython"]);
        m.insert("pxd", &["text", "cython"]);
        m.insert("pxi", &["text", "cython"]);
        m.insert("ipynb", &["text", "json", "jupyter"]);
        m.insert("yaml", &["text", "yaml"]);
        m.insert("yml", &["text", "yaml"]);
        m.insert("toml", &["text", "toml"]);
        m.insert("json", &["text", "json"]);
        m.insert("cfg", &["text"]);
        m.insert("ini", &["text", "ini"]);
        m.insert("md", &["text", "markdown"]);
        m.insert("rst", &["text", "rst"]);
        m.insert("txt", &["text", "plain-text"]);
        m.insert("sh", &["text", "shell", "sh"]);
        m.insert("bash", &["text", "shell", "bash"]);
        m.insert("zsh", &["text", "shell", "zsh"]);
        m.insert("rs", &["text", "rust"]);
        m.insert("go", &["text", "go"]);
        m.insert("c", &["text", "c"]);
        m.insert("h", &["text", "header", "c", "c++"]);
        m.insert("cc", &["text", "c++"]);
        m.insert("cpp", &["text", "c++"]);
        m.insert("cxx", &["text", "c++"]);
        m.insert("hpp", &["text", "header", "c++"]);
        m.insert("cu", &["text", "cuda"]);
        m.insert("cuh", &["text", "header", "cuda"]);
        m.insert("js", &["text", "javascript"]);
        m.insert("ts", &["text", "ts"]);
        m.insert("html", &["text", "html"]);
        m.insert("css", &["text", "css"]);
        m.insert("xml", &["text", "xml"]);
        m.insert("png", &["binary", "image", "png"]);
        m.insert("jpg", &["binary", "image", "jpeg"]);
        m.insert("jpeg", &["binary", "image", "jpeg"]);
        m.insert("gif", &["binary", "image", "gif"]);
        m.insert("svg", &["text", "image", "svg", "xml"]);
        m.insert("pdf", &["binary", "pdf"]);
        m.insert("zip", &["binary", "zip"]);
        m.insert("gz", &["binary", "gzip"]);
        m.insert("so", &["binary"]);
        m.insert("npy", &["binary"]);
        m
    };

    static ref NAMES: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("Makefile", &["text", "makefile"]);
        m.insert("Dockerfile", &["text", "dockerfile"]);
        m.insert("setup.cfg", &["text", "ini"]);
        m.insert(".gitignore", &["text", "gitignore"]);
        m.insert(".gitmodules", &["text", "gitmodules"]);
        m.insert(".pre-commit-config.yaml", &["text", "yaml"]);
        m.insert("LICENSE", &["text", "plain-text"]);
        m
    };

    static ref INTERPRETERS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("python", &["python"]);
        m.insert("python3", &["python", "python3"]);
        m.insert("sh", &["shell", "sh"]);
        m.insert("bash", &["shell", "bash"]);
        m.insert("zsh", &["shell", "zsh"]);
        m.insert("node", &["javascript"]);
        m.insert("ruby", &["ruby"]);
        m.insert("perl", &["perl"]);
        m
    };
}

/// Bytes inspected when sniffing text vs binary
const SNIFF_LEN: usize = 1024;

/// Tags derived from the file name alone
pub fn tags_from_filename(name: &str) -> Tags {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut tags = Tags::new();

    if let Some(found) = NAMES.get(base) {
        tags.extend(found.iter());
    }
    if let Some((_, ext)) = base.rsplit_once('.') {
        if let Some(found) = EXTENSIONS.get(ext.to_ascii_lowercase().as_str()) {
            tags.extend(found.iter());
        }
    }
    tags
}

/// Tags for an interpreter named in a `#!` line
pub fn tags_from_shebang(line: &str) -> Tags {
    let mut tags = Tags::new();
    let Some(command) = line.strip_prefix("#!") else {
        return tags;
    };

    let mut words = command.split_whitespace();
    let Some(first) = words.next() else {
        return tags;
    };
    let mut interpreter = first.rsplit('/').next().unwrap_or(first);
    if interpreter == "env" {
        interpreter = match words.find(|w| !w.starts_with('-')) {
            Some(word) => word,
            None => return tags,
        };
    }
    if let Some(found) = INTERPRETERS.get(interpreter) {
        tags.extend(found.iter());
    }
    tags
}

/// Classify a path on disk. Missing paths have no tags.
pub fn tags_from_path(path: &Path) -> Tags {
    let mut tags = Tags::new();
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return tags;
    };

    if metadata.file_type().is_symlink() {
        tags.insert("symlink");
        return tags;
    }
    if metadata.is_dir() {
        tags.insert("directory");
        return tags;
    }

    tags.insert("file");
    let executable = is_executable(&metadata);
    tags.insert(if executable { "executable" } else { "non-executable" });

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tags.extend(tags_from_filename(&name));

    let head = read_head(path);
    if executable && !tags.contains("text") && !tags.contains("binary") {
        if let Some(first_line) = head.split(|b| *b == b'\n').next() {
            tags.extend(tags_from_shebang(&String::from_utf8_lossy(first_line)));
        }
    }

    if !tags.contains("text") && !tags.contains("binary") {
        if content_inspector::inspect(&head).is_binary() {
            tags.insert("binary");
        } else {
            tags.insert("text");
        }
    }
    tags
}

fn read_head(path: &Path) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    if let Ok(file) = std::fs::File::open(path) {
        let _ = file.take(SNIFF_LEN as u64).read_to_end(&mut buffer);
    }
    buffer
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extension_tags() {
        assert!(tags_from_filename("cupy/_core/core.pyx").contains("cython"));
        assert!(tags_from_filename("setup.py").contains("python"));
        assert!(tags_from_filename("kernel.CU").contains("cuda"));
        assert!(tags_from_filename("docs/logo.png").contains("binary"));
        assert!(tags_from_filename("no_extension").is_empty());
    }

    #[test]
    fn test_name_tags() {
        let tags = tags_from_filename("docker/Dockerfile");
        assert!(tags.contains("dockerfile"));
        assert!(tags.contains("text"));
        assert!(tags_from_filename("setup.cfg").contains("ini"));
    }

    #[test]
    fn test_shebang_tags() {
        assert!(tags_from_shebang("#!/usr/bin/env python3").contains("python3"));
        assert!(tags_from_shebang("#!/usr/bin/env -S python3 -u").contains("python"));
        assert!(tags_from_shebang("#!/bin/bash -e").contains("shell"));
        assert!(tags_from_shebang("print('no shebang')").is_empty());
    }

    #[test]
    fn test_path_tags_for_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("module.py");
        fs::write(&path, "import cupy\n").unwrap();

        let tags = tags_from_path(&path);
        assert!(tags.contains("file"));
        assert!(tags.contains("text"));
        assert!(tags.contains("python"));
        assert!(!tags.contains("executable"));
    }

    #[test]
    fn test_path_tags_sniff_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob");
        fs::write(&path, [0u8, 159, 146, 150, 0, 1]).unwrap();

        let tags = tags_from_path(&path);
        assert!(tags.contains("binary"));
        assert!(!tags.contains("text"));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_tags_for_executable_script() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("generate");
        fs::write(&path, "#!/usr/bin/env python3\nprint('hi')\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let tags = tags_from_path(&path);
        assert!(tags.contains("executable"));
        assert!(tags.contains("python"));
        assert!(tags.contains("text"));
    }

    #[test]
    fn test_missing_and_directory_paths() {
        let temp_dir = TempDir::new().unwrap();
        assert!(tags_from_path(&temp_dir.path().join("gone.py")).is_empty());
        assert_eq!(
            tags_from_path(temp_dir.path()),
            ["directory"].into_iter().collect()
        );
    }
}
