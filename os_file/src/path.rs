// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

// Both separators are accepted whatever the host, so paths coming from
// another platform still split correctly.
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Native path separator.
pub fn separator() -> char {
    std::path::MAIN_SEPARATOR
}

pub fn join(dir: &str, other: &str) -> String {
    format!("{dir}{}{other}", separator())
}

/// Last component of `path`, extension included.
pub fn get_filename(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Last component of `path` without its extension. Only the part after the
/// last dot is removed, and a dot inside a directory name is ignored.
pub fn get_stem(path: &str) -> &str {
    let start = path.rfind(is_separator).map_or(0, |idx| idx + 1);
    let end = match path.rfind('.') {
        Some(dot) if dot >= start => dot,
        _ => path.len(),
    };
    &path[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_stem() {
        for path in [
            "test",
            "test.txt",
            "/test",
            "/test.txt",
            "\\test",
            "\\test.txt",
            "./test",
            "./test.txt",
            ".\\test",
            ".\\test.txt",
            "/some/dir/test",
            "/some/dir/test.txt",
            "\\some\\dir\\test",
            "\\some\\dir\\test.txt",
            "./some/dir/test",
            "./some/dir/test.txt",
            ".\\some\\dir\\test",
            ".\\some\\dir\\test.txt",
            "/some\\dir/test",
            ".\\some/dir\\test.txt",
            "./some.dir/test",
        ] {
            assert_eq!(get_stem(path), "test", "path {path:?}");
        }

        assert_eq!(get_stem("./Ðåß.txt"), "Ðåß");
        assert_eq!(get_stem("./Ðåß/fileÇ.txt"), "fileÇ");
        assert_eq!(get_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(get_stem("/home/.bashrc"), "");
        assert_eq!(get_stem(""), "");
    }

    #[test]
    fn test_get_filename() {
        for path in [
            "test.txt",
            "/test.txt",
            "\\test.txt",
            "./test.txt",
            ".\\test.txt",
            "/some/dir/test.txt",
            "\\some\\dir\\test.txt",
            "./some/dir/test.txt",
            ".\\some\\dir\\test.txt",
            ".\\some/dir\\test.txt",
        ] {
            assert_eq!(get_filename(path), "test.txt", "path {path:?}");
        }

        assert_eq!(get_filename("/some\\dir/test"), "test");
        assert_eq!(get_filename("./Ðåß.txt"), "Ðåß.txt");
        assert_eq!(get_filename("./Ðåß/fileÇ.txt"), "fileÇ.txt");
        assert_eq!(get_filename("/some/dir/"), "");
        assert_eq!(get_filename(""), "");
    }

    #[test]
    fn test_join() {
        let joined = join("some", "file.txt");
        assert_eq!(joined, format!("some{}file.txt", separator()));
        assert_eq!(get_filename(&joined), "file.txt");
    }
}
