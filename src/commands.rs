//! Maintenance commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clean` | Remove stale scratch files below the project directory |
//! | `urls`  | Print the route table, or resolve one URL against it |

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::routes::{RouteInfo, ROUTES};

const SCRATCH_EXTENSIONS: &[&str] = &["tmp", "bak", "orig", "rej"];
const SKIPPED_DIRS: &[&str] = &[".git", "target"];

// --- clean ---

pub fn is_scratch_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with('~') {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCRATCH_EXTENSIONS.contains(&ext))
}

/// Recursively delete scratch files under `root`, never descending into
/// `keep` (the file store) or VCS/build directories. Returns what was removed.
pub fn clean(root: &Path, keep: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                let skipped = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIPPED_DIRS.contains(&n));
                if !skipped && !keep.iter().any(|k| same_path(k, &path)) {
                    pending.push(path);
                }
            } else if file_type.is_file() && is_scratch_file(&path) {
                fs::remove_file(&path)?;
                removed.push(path);
            }
        }
    }

    removed.sort();
    Ok(removed)
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// --- urls ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RouteOrder {
    Rule,
    Endpoint,
    Method,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch {
    Found {
        route: RouteInfo,
        arguments: Vec<(String, String)>,
    },
    MethodNotAllowed,
    NotFound,
}

/// Match `url` against one rule, capturing `{param}` segments
fn match_rule(rule: &str, url: &str) -> Option<Vec<(String, String)>> {
    let rule_segments: Vec<&str> = rule.trim_matches('/').split('/').collect();
    let url_segments: Vec<&str> = url.trim_matches('/').split('/').collect();
    if rule_segments.len() != url_segments.len() {
        return None;
    }

    let mut arguments = Vec::new();
    for (expected, actual) in rule_segments.iter().zip(&url_segments) {
        match expected.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) if !actual.is_empty() => arguments.push((name.to_string(), actual.to_string())),
            Some(_) => return None,
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(arguments)
}

/// Resolve `url` for `method` the way the router would. Static rules win over
/// parameterised ones.
pub fn match_route(url: &str, method: &str) -> RouteMatch {
    let path = url.split(['?', '#']).next().unwrap_or(url);

    let mut candidates: Vec<(RouteInfo, Vec<(String, String)>)> = ROUTES
        .iter()
        .filter_map(|route| match_rule(route.rule, path).map(|args| (*route, args)))
        .collect();
    if candidates.is_empty() {
        return RouteMatch::NotFound;
    }
    candidates.sort_by_key(|(_, args)| args.len());

    match candidates
        .into_iter()
        .find(|(route, _)| route.method.eq_ignore_ascii_case(method))
    {
        Some((route, arguments)) => RouteMatch::Found { route, arguments },
        None => RouteMatch::MethodNotAllowed,
    }
}

fn render_table(header: &[&str], rows: &[Vec<String>], min_widths: &[usize]) -> String {
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain([title.len(), min_widths[i]])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let table_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let mut out = vec![String::new(), format_row(header, &widths), "-".repeat(table_width)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(format_row(&cells, &widths));
    }
    out.push(String::new());
    out.join("\n")
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Route table sorted by `order`
pub fn render_routes(order: RouteOrder) -> String {
    let mut routes: Vec<&RouteInfo> = ROUTES.iter().collect();
    routes.sort_by_key(|r| match order {
        RouteOrder::Rule => (r.rule, r.method),
        RouteOrder::Endpoint => (r.endpoint, r.method),
        RouteOrder::Method => (r.method, r.rule),
    });

    let rows: Vec<Vec<String>> = routes
        .iter()
        .map(|r| vec![r.rule.to_string(), r.endpoint.to_string(), r.method.to_string()])
        .collect();
    render_table(&["Rule", "Endpoint", "Method"], &rows, &[4, 8, 6])
}

/// Outcome of resolving one URL, as a table
pub fn render_match(url: &str, method: &str) -> String {
    match match_route(url, method) {
        RouteMatch::Found { route, arguments } => {
            let arguments = arguments
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            render_table(
                &["Rule", "Endpoint", "Arguments"],
                &[vec![route.rule.to_string(), route.endpoint.to_string(), arguments]],
                &[4, 8, 9],
            )
        }
        RouteMatch::MethodNotAllowed => {
            render_table(&["Rule"], &[vec![format!("<405 Method Not Allowed: {url}>")]], &[4])
        }
        RouteMatch::NotFound => render_table(&["Rule"], &[vec![format!("<404 Not Found: {url}>")]], &[4]),
    }
}
