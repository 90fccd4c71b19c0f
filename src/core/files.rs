use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};

/// Expand `{a,b}` alternations, which `glob` does not understand.
///
/// `src/**/*.{ts,tsx}` becomes `src/**/*.ts` and `src/**/*.tsx`. Groups are expanded
/// left to right, so several groups produce their cartesian product, and braces are
/// matched by depth so `*.{ts,{tsx,jsx}}` nests. A pattern without a closed brace
/// group is returned unchanged.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(open + i),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let alt = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{}{}{}", prefix, alt, suffix))
        })
        .collect()
}

/// Convert a path under `root` into a forward-slash relative path.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Enumerate the files matched by `pattern` under `root`, minus anything matching `ignores`.
///
/// Returned paths are absolute, deduplicated and sorted, so runs are deterministic.
pub fn find_source_files(root: &Path, pattern: &str, ignores: &[String]) -> Result<Vec<PathBuf>> {
    let ignore_patterns = ignores
        .iter()
        .map(|p| {
            Pattern::new(p).with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", p))
        })
        .collect::<Result<Vec<_>>>()?;

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let mut files = BTreeSet::new();

    for expanded in expand_braces(pattern) {
        let relative = expanded.trim_start_matches("./");
        let full_pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), relative);

        let entries = glob_with(&full_pattern, options)
            .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("cannot access path: {}", e);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            let rel = relative_path(root, &path);
            if ignore_patterns
                .iter()
                .any(|p| p.matches_with(&rel, options) || p.matches(&rel))
            {
                log::debug!("ignored {}", rel);
                continue;
            }
            files.insert(path);
        }
    }

    Ok(files.into_iter().collect())
}
