//! Git-style unified diff of a tidy change

use std::fmt::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

/// Above this many old x new line pairs the diff is not minimized
const MAX_LCS_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

struct DiffLine<'a> {
    op: Op,
    text: &'a str,
    old_line: Option<usize>,
    new_line: Option<usize>,
}

/// Render the change from `original` to `tidied` as a single-hunk diff
///
/// Returns an empty string when the two are identical.
pub fn render_unified_diff(path: &str, original: &str, tidied: &str, color: bool) -> String {
    if original == tidied {
        return String::new();
    }

    let old_lines = split_lines(original);
    let new_lines = split_lines(tidied);
    let lines = number_lines(line_diff(&old_lines, &new_lines));

    let old_count = lines.iter().filter(|l| l.op != Op::Insert).count();
    let new_count = lines.iter().filter(|l| l.op != Op::Delete).count();
    let old_start = usize::from(old_count > 0);
    let new_start = usize::from(new_count > 0);
    let width = old_lines.len().max(new_lines.len()).max(1).to_string().len();

    let mut out = String::new();
    push_colored(&mut out, &format!("diff --git a/{} b/{}", path, path), BOLD, color);
    push_colored(&mut out, &format!("--- a/{}", path), RED, color);
    push_colored(&mut out, &format!("+++ b/{}", path), GREEN, color);
    push_colored(
        &mut out,
        &format!("@@ -{},{} +{},{} @@", old_start, old_count, new_start, new_count),
        CYAN,
        color,
    );

    for line in &lines {
        let (prefix, line_color) = match line.op {
            Op::Equal => (' ', None),
            Op::Delete => ('-', Some(RED)),
            Op::Insert => ('+', Some(GREEN)),
        };
        let old = line.old_line.map(|n| n.to_string()).unwrap_or_default();
        let new = line.new_line.map(|n| n.to_string()).unwrap_or_default();
        let text = line.text.trim_end_matches('\n').trim_end_matches('\r');

        let body = format!("{:>w$} {:>w$} | {}{}", old, new, prefix, text, w = width);
        match line_color {
            Some(code) if color => {
                let _ = writeln!(out, "{}{}{}", code, body, RESET);
            }
            _ => {
                let _ = writeln!(out, "{}", body);
            }
        }
    }

    out
}

fn push_colored(out: &mut String, line: &str, code: &str, color: bool) {
    if color {
        let _ = writeln!(out, "{}{}{}", code, line, RESET);
    } else {
        let _ = writeln!(out, "{}", line);
    }
}

/// Lines with their terminators kept; no trailing empty entry
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn line_diff<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<(Op, &'a str)> {
    let (n, m) = (old.len(), new.len());
    if n.saturating_mul(m) > MAX_LCS_CELLS {
        return old
            .iter()
            .map(|&l| (Op::Delete, l))
            .chain(new.iter().map(|&l| (Op::Insert, l)))
            .collect();
    }

    // lcs[i][j] is the LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push((Op::Equal, old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push((Op::Delete, old[i]));
            i += 1;
        } else {
            ops.push((Op::Insert, new[j]));
            j += 1;
        }
    }
    ops.extend(old[i..].iter().map(|&l| (Op::Delete, l)));
    ops.extend(new[j..].iter().map(|&l| (Op::Insert, l)));
    ops
}

fn number_lines(ops: Vec<(Op, &str)>) -> Vec<DiffLine<'_>> {
    let (mut old_next, mut new_next) = (1, 1);
    ops.into_iter()
        .map(|(op, text)| {
            let old_line = (op != Op::Insert).then(|| {
                old_next += 1;
                old_next - 1
            });
            let new_line = (op != Op::Delete).then(|| {
                new_next += 1;
                new_next - 1
            });
            DiffLine {
                op,
                text,
                old_line,
                new_line,
            }
        })
        .collect()
}
