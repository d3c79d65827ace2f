//! Turns raw `git status --porcelain` and unified diff text into the
//! structured model in [`super::types`]. Everything here is pure: no I/O, no
//! state, and malformed input degrades to less output rather than an error.

use std::path::Path;

use super::types::{ChangeEntry, DiffLine, FileDiff, FileStatus, Hunk, LineKind};

/// Extension allow-list applied to status entries. Empty accepts everything.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    extensions: Vec<String>,
}

impl PathFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn accepts(&self, path: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

/// Parse porcelain v1 status output (`XY PATH`, X = index, Y = worktree).
pub fn parse_status(raw: &str, filter: &PathFilter, include_untracked: bool) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();

    for line in raw.lines() {
        let bytes = line.as_bytes();
        if bytes.len() < 4 {
            continue;
        }
        let (x, y) = (bytes[0] as char, bytes[1] as char);
        let Some(rest) = line.get(3..) else {
            continue;
        };

        let is_rename = matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C');
        let path = status_path(rest, is_rename);
        if path.is_empty() || !filter.accepts(&path) {
            continue;
        }

        if x == '?' && y == '?' {
            if include_untracked {
                entries.push(ChangeEntry {
                    path,
                    status: FileStatus::Untracked,
                    staged: false,
                    unversioned: true,
                });
            }
            continue;
        }

        if let Some(status) = FileStatus::from_code(x) {
            entries.push(ChangeEntry {
                path: path.clone(),
                status,
                staged: true,
                unversioned: false,
            });
        }
        if let Some(status) = FileStatus::from_code(y) {
            entries.push(ChangeEntry {
                path,
                status,
                staged: false,
                unversioned: false,
            });
        }
    }

    entries
}

/// Extract the path from the remainder of a status line. Renames and copies
/// (`old -> new`) resolve to the destination.
fn status_path(rest: &str, is_rename: bool) -> String {
    let rest = rest.trim_end();
    let target = if is_rename {
        rest.rsplit_once(" -> ").map_or(rest, |(_, new)| new)
    } else {
        rest
    };
    unquote_path(target)
}

/// Undo git's C-style quoting of paths containing unusual characters.
fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let esc = bytes[i + 1];
        match esc {
            b'0'..=b'7' => {
                let digits = bytes[i + 1..]
                    .iter()
                    .take(3)
                    .take_while(|b| (b'0'..=b'7').contains(*b))
                    .count();
                let value = bytes[i + 1..i + 1 + digits]
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                out.push(value as u8);
                i += 1 + digits;
                continue;
            }
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            other => out.push(other),
        }
        i += 2;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Ranges from a hunk header: (old_start, old_count, new_start, new_count).
type HunkRange = (u32, u32, u32, u32);

/// Parse `@@ -old_start[,old_count] +new_start[,new_count] @@ [section]`.
pub fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let rest = line.strip_prefix("@@ -")?;
    let end = rest.find(" @@")?;
    let (old, new) = rest[..end].split_once(" +")?;
    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some((old_start, old_count, new_start, new_count))
}

/// `start,count` or bare `start` (count 1). A range whose end does not fit
/// in a `u32` is rejected.
fn parse_range(s: &str) -> Option<(u32, u32)> {
    let (start, count): (u32, u32) = match s.split_once(',') {
        Some((start, count)) => (start.parse().ok()?, count.parse().ok()?),
        None => (s.parse().ok()?, 1),
    };
    start.checked_add(count)?;
    Some((start, count))
}

/// Accumulates one hunk body while tracking how much of the declared range
/// is still unconsumed.
struct HunkBuilder {
    hunk: Hunk,
    old_next: u32,
    new_next: u32,
    old_remaining: u32,
    new_remaining: u32,
}

impl HunkBuilder {
    fn new(header: &str, (old_start, old_count, new_start, new_count): HunkRange) -> Self {
        Self {
            hunk: Hunk {
                header: header.to_string(),
                old_start,
                old_count,
                new_start,
                new_count,
                lines: Vec::new(),
            },
            old_next: old_start,
            new_next: new_start,
            old_remaining: old_count,
            new_remaining: new_count,
        }
    }

    fn is_open(&self) -> bool {
        self.old_remaining > 0 || self.new_remaining > 0
    }

    fn push(&mut self, line: &str) {
        let (kind, content) = match line.as_bytes().first() {
            Some(b'+') => (LineKind::Added, &line[1..]),
            Some(b'-') => (LineKind::Removed, &line[1..]),
            Some(b' ') => (LineKind::Context, &line[1..]),
            None => (LineKind::Context, ""),
            // "\ No newline at end of file"
            Some(b'\\') => return,
            Some(_) => (LineKind::Context, line),
        };

        let (old_lineno, new_lineno) = match kind {
            LineKind::Added => (None, Some(self.take_new())),
            LineKind::Removed => (Some(self.take_old()), None),
            LineKind::Context => (Some(self.take_old()), Some(self.take_new())),
        };

        self.hunk.lines.push(DiffLine {
            kind,
            old_lineno,
            new_lineno,
            content: content.to_string(),
        });
    }

    fn take_old(&mut self) -> u32 {
        let n = self.old_next;
        self.old_next = n.saturating_add(1);
        self.old_remaining = self.old_remaining.saturating_sub(1);
        n
    }

    fn take_new(&mut self) -> u32 {
        let n = self.new_next;
        self.new_next = n.saturating_add(1);
        self.new_remaining = self.new_remaining.saturating_sub(1);
        n
    }

    fn finish(self) -> Hunk {
        self.hunk
    }
}

/// Parse the unified diff of a single file.
///
/// Header lines outside a hunk body are dropped. A hunk body lasts until the
/// counts declared in its header are consumed, so body content that happens
/// to look like a header (`--- x` removed, `+++ y` added) is kept. A header
/// that fails to parse drops the lines up to the next valid header.
pub fn parse_unified_diff(raw: &str, path: &str, staged: bool) -> FileDiff {
    let mut diff = FileDiff::empty(path, staged);
    let mut current: Option<HunkBuilder> = None;

    for line in raw.lines() {
        if let Some(builder) = current.as_mut() {
            let restarts = line.starts_with("diff --git")
                || (line.starts_with("@@") && parse_hunk_header(line).is_some());
            if builder.is_open() && !restarts {
                builder.push(line);
                continue;
            }
        }

        if !line.starts_with("@@") {
            continue;
        }

        if let Some(done) = current.take() {
            diff.hunks.push(done.finish());
        }
        match parse_hunk_header(line) {
            Some(range) => current = Some(HunkBuilder::new(line, range)),
            None => tracing::debug!(path, header = line, "skipping malformed hunk header"),
        }
    }

    if let Some(done) = current {
        diff.hunks.push(done.finish());
    }

    diff
}

/// Build a one-hunk, all-added diff for a file with no prior revision.
/// `None` content (unreadable or not text) yields a diff with no hunks.
pub fn synthesize_new_file(path: &str, staged: bool, content: Option<&str>) -> FileDiff {
    let Some(content) = content else {
        return FileDiff::empty(path, staged);
    };

    let lines: Vec<DiffLine> = content
        .lines()
        .zip(1u32..)
        .map(|(text, n)| DiffLine {
            kind: LineKind::Added,
            old_lineno: None,
            new_lineno: Some(n),
            content: text.to_string(),
        })
        .collect();

    let count = lines.len() as u32;
    let new_start = u32::from(count > 0);

    FileDiff {
        path: path.to_string(),
        staged,
        hunks: vec![Hunk {
            header: format!("@@ -0,0 +{new_start},{count} @@ (new file)"),
            old_start: 0,
            old_count: 0,
            new_start,
            new_count: count,
            lines,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn all() -> PathFilter {
        PathFilter::default()
    }

    #[test]
    fn test_status_both_sides_produce_two_entries() {
        let entries = parse_status("MM src/lib.rs\n", &all(), true);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].staged);
        assert!(!entries[1].staged);
        assert!(entries.iter().all(|e| e.path == "src/lib.rs"));
        assert!(entries.iter().all(|e| e.status == FileStatus::Modified));
    }

    #[test]
    fn test_status_single_side() {
        let entries = parse_status("A  new.rs\n M old.rs\n", &all(), true);
        assert_eq!(
            entries,
            vec![
                ChangeEntry {
                    path: "new.rs".into(),
                    status: FileStatus::Added,
                    staged: true,
                    unversioned: false,
                },
                ChangeEntry {
                    path: "old.rs".into(),
                    status: FileStatus::Modified,
                    staged: false,
                    unversioned: false,
                },
            ]
        );
    }

    #[test]
    fn test_status_rename_keeps_destination_only() {
        let entries = parse_status("R  src/old.rs -> src/new.rs\n", &all(), true);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "src/new.rs");
        assert_eq!(entries[0].status, FileStatus::Renamed);
        assert!(entries[0].staged);
    }

    #[test]
    fn test_status_rename_with_worktree_edit() {
        let entries = parse_status("RM a.rs -> b.rs\n", &all(), true);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.path == "b.rs"));
    }

    #[test]
    fn test_status_untracked_policy() {
        let raw = "?? scratch.rs\n!! target/\n";
        let with = parse_status(raw, &all(), true);
        assert_eq!(with.len(), 1);
        assert!(with[0].unversioned);
        assert!(!with[0].staged);
        assert_eq!(with[0].status, FileStatus::Untracked);

        let without = parse_status(raw, &all(), false);
        assert!(without.is_empty());
    }

    #[test]
    fn test_status_extension_filter() {
        let filter = PathFilter::new([".rs", "GO"]);
        let raw = " M main.go\n M README.md\nM  lib.rs\n M Makefile\n";
        let paths: Vec<_> = parse_status(raw, &filter, true)
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(paths, vec!["main.go", "lib.rs"]);
    }

    #[test]
    fn test_status_quoted_path() {
        let entries = parse_status(" M \"dir/with space.rs\"\n?? \"caf\\303\\251.rs\"\n", &all(), true);
        assert_eq!(entries[0].path, "dir/with space.rs");
        assert_eq!(entries[1].path, "café.rs");
    }

    #[test]
    fn test_status_skips_short_and_blank_lines() {
        let entries = parse_status("\nM\n M\n", &all(), true);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_hunk_header() {
        assert_eq!(parse_hunk_header("@@ -10,4 +10,15 @@ impl Foo"), Some((10, 4, 10, 15)));
        assert_eq!(parse_hunk_header("@@ -3 +3 @@"), Some((3, 1, 3, 1)));
        assert_eq!(parse_hunk_header("@@ -0,0 +1,2 @@"), Some((0, 0, 1, 2)));
        assert_eq!(parse_hunk_header("@@ garbage @@"), None);
        assert_eq!(parse_hunk_header("@@ -x,1 +1,1 @@"), None);
        assert_eq!(parse_hunk_header("@@ -4294967295,2 +1,2 @@"), None);
        assert_eq!(parse_hunk_header("@@ -1,1 +4294967295 @@"), None);
    }

    #[test]
    fn test_out_of_range_header_degrades_locally() {
        let raw = "@@ -4294967295,2 +1,2 @@\n a\n b\n@@ -7,1 +7,1 @@\n-x\n+y\n";
        let diff = parse_unified_diff(raw, "f", false);
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.hunks[0].old_start, 7);
    }

    #[test]
    fn test_overlong_body_near_u32_max_does_not_overflow() {
        // Context lines keep consuming the old side after its count runs out.
        let raw = "@@ -4294967294,1 +1,3 @@\n a\n b\n c\n";
        let diff = parse_unified_diff(raw, "f", false);
        let old: Vec<_> = diff.hunks[0].lines.iter().map(|l| l.old_lineno).collect();
        assert_eq!(old, vec![Some(4294967294), Some(4294967295), Some(4294967295)]);
    }

    #[test]
    fn test_parse_simple_diff() {
        let raw = "diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main()
 fn main() {
+    println!(\"hello\");
     let x = 1;
 }
";
        let diff = parse_unified_diff(raw, "src/main.rs", false);
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.header, "@@ -1,3 +1,4 @@ fn main()");
        assert_eq!(hunk.lines.len(), 4);
        assert_eq!(
            hunk.lines[1],
            DiffLine {
                kind: LineKind::Added,
                old_lineno: None,
                new_lineno: Some(2),
                content: "    println!(\"hello\");".into(),
            }
        );
        assert_eq!(hunk.lines[2].old_lineno, Some(2));
        assert_eq!(hunk.lines[2].new_lineno, Some(3));
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn test_parse_multiple_hunks_reset_counters() {
        let raw = "@@ -1,2 +1,2 @@
-a
+b
 c
@@ -20,1 +20,2 @@
 x
+y
";
        let diff = parse_unified_diff(raw, "f.rs", true);
        assert!(diff.staged);
        assert_eq!(diff.hunks.len(), 2);
        let second = &diff.hunks[1];
        assert_eq!(second.lines[0].old_lineno, Some(20));
        assert_eq!(second.lines[0].new_lineno, Some(20));
        assert_eq!(second.lines[1].new_lineno, Some(21));
    }

    #[test]
    fn test_body_lines_that_look_like_headers_are_kept() {
        let raw = "--- a/sql.sql
+++ b/sql.sql
@@ -1,2 +1,2 @@
--- old comment
+++ new comment
 select 1;
";
        let diff = parse_unified_diff(raw, "sql.sql", false);
        let lines = &diff.hunks[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::Removed);
        assert_eq!(lines[0].content, "-- old comment");
        assert_eq!(lines[1].kind, LineKind::Added);
        assert_eq!(lines[1].content, "++ new comment");
    }

    #[test]
    fn test_blank_body_line_is_context() {
        let raw = "@@ -1,3 +1,3 @@\n a\n\n-b\n+c\n";
        let diff = parse_unified_diff(raw, "f", false);
        let blank = &diff.hunks[0].lines[1];
        assert_eq!(blank.kind, LineKind::Context);
        assert_eq!(blank.content, "");
        assert_eq!(blank.old_lineno, Some(2));
        assert_eq!(blank.new_lineno, Some(2));
    }

    #[test]
    fn test_no_newline_marker_is_skipped() {
        let raw = "@@ -1 +1 @@\n-old\n\\ No newline at end of file\n+new\n\\ No newline at end of file\n";
        let diff = parse_unified_diff(raw, "f", false);
        let kinds: Vec<_> = diff.hunks[0].lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Removed, LineKind::Added]);
    }

    #[test]
    fn test_malformed_header_skips_its_body() {
        let raw = "@@ -a,b +c,d @@\n+lost\n@@ -5,1 +5,1 @@\n-x\n+y\n";
        let diff = parse_unified_diff(raw, "f", false);
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.hunks[0].old_start, 5);
    }

    #[test]
    fn test_mode_only_change_has_no_hunks() {
        let raw = "diff --git a/run.sh b/run.sh\nold mode 100644\nnew mode 100755\n";
        let diff = parse_unified_diff(raw, "run.sh", false);
        assert!(diff.hunks.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = "@@ -1,2 +1,3 @@\n a\n+b\n c\n";
        assert_eq!(parse_unified_diff(raw, "f", false), parse_unified_diff(raw, "f", false));
    }

    #[test]
    fn test_synthesize_two_lines() {
        let diff = synthesize_new_file("new.rs", true, Some("a\nb\n"));
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.header, "@@ -0,0 +1,2 @@ (new file)");
        assert_eq!(hunk.lines.len(), 2);
        assert!(hunk.lines.iter().all(|l| l.kind == LineKind::Added));
        assert_eq!(hunk.lines[0].new_lineno, Some(1));
        assert_eq!(hunk.lines[1].new_lineno, Some(2));
        assert!(hunk.lines.iter().all(|l| l.old_lineno.is_none()));
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn test_synthesize_empty_and_unreadable() {
        let empty = synthesize_new_file("e", false, Some(""));
        assert_eq!(empty.hunks.len(), 1);
        assert_eq!(empty.hunks[0].header, "@@ -0,0 +0,0 @@ (new file)");
        assert!(empty.hunks[0].lines.is_empty());

        let unreadable = synthesize_new_file("bin", false, None);
        assert!(unreadable.hunks.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Keep(String),
        Add(String),
        Del(String),
    }

    fn op() -> impl Strategy<Value = Op> {
        let text = "[-a-z+ ]{0,12}";
        prop_oneof![
            text.prop_map(Op::Keep),
            text.prop_map(Op::Add),
            text.prop_map(Op::Del),
        ]
    }

    fn render_hunk(old_start: u32, new_start: u32, ops: &[Op]) -> String {
        let old = ops.iter().filter(|o| !matches!(o, Op::Add(_))).count();
        let new = ops.iter().filter(|o| !matches!(o, Op::Del(_))).count();
        let mut out = format!("@@ -{old_start},{old} +{new_start},{new} @@\n");
        for o in ops {
            match o {
                Op::Keep(t) => out.push_str(&format!(" {t}\n")),
                Op::Add(t) => out.push_str(&format!("+{t}\n")),
                Op::Del(t) => out.push_str(&format!("-{t}\n")),
            }
        }
        out
    }

    proptest! {
        #[test]
        fn hunk_counts_match_header(
            hunks in prop::collection::vec((1u32..500, 1u32..500, prop::collection::vec(op(), 1..30)), 1..4)
        ) {
            let mut raw = String::from("diff --git a/f b/f\n--- a/f\n+++ b/f\n");
            for (o, n, ops) in &hunks {
                raw.push_str(&render_hunk(*o, *n, ops));
            }
            let diff = parse_unified_diff(&raw, "f", false);
            prop_assert_eq!(diff.hunks.len(), hunks.len());
            for hunk in &diff.hunks {
                let old = hunk.lines.iter().filter(|l| l.kind != LineKind::Added).count() as u32;
                let new = hunk.lines.iter().filter(|l| l.kind != LineKind::Removed).count() as u32;
                prop_assert_eq!(old, hunk.old_count);
                prop_assert_eq!(new, hunk.new_count);
            }
        }

        #[test]
        fn line_numbers_increase_by_one(
            old_start in 1u32..1000,
            new_start in 1u32..1000,
            ops in prop::collection::vec(op(), 1..40)
        ) {
            let diff = parse_unified_diff(&render_hunk(old_start, new_start, &ops), "f", true);
            let hunk = &diff.hunks[0];
            let olds: Vec<u32> = hunk.lines.iter().filter_map(|l| l.old_lineno).collect();
            let news: Vec<u32> = hunk.lines.iter().filter_map(|l| l.new_lineno).collect();
            for (i, n) in olds.iter().enumerate() {
                prop_assert_eq!(*n, old_start + i as u32);
            }
            for (i, n) in news.iter().enumerate() {
                prop_assert_eq!(*n, new_start + i as u32);
            }
            for line in &hunk.lines {
                match line.kind {
                    LineKind::Added => prop_assert!(line.old_lineno.is_none() && line.new_lineno.is_some()),
                    LineKind::Removed => prop_assert!(line.old_lineno.is_some() && line.new_lineno.is_none()),
                    LineKind::Context => prop_assert!(line.old_lineno.is_some() && line.new_lineno.is_some()),
                }
            }
        }

        #[test]
        fn synthesized_lines_are_numbered_from_one(lines in prop::collection::vec("[a-z ]{0,10}", 0..50)) {
            let content: String = lines.iter().map(|l| format!("{l}\n")).collect();
            let diff = synthesize_new_file("n", false, Some(&content));
            let hunk = &diff.hunks[0];
            prop_assert_eq!(hunk.lines.len(), lines.len());
            prop_assert_eq!(hunk.new_count as usize, lines.len());
            for (i, line) in hunk.lines.iter().enumerate() {
                prop_assert_eq!(line.kind, LineKind::Added);
                prop_assert_eq!(line.new_lineno, Some(i as u32 + 1));
            }
        }
    }
}
