//! Item-selection patterns.
//!
//! A pattern is one or more newline-separated globs. Lines starting with `!`
//! exclude matching items; blank lines and lines starting with `#` are ignored.
//! `**` matches across path separators, `*` within one segment and `?` a
//! single character.

use regex_lite::Regex;

use super::error::TransferError;

/// Compiled item-selection pattern.
#[derive(Debug, Clone)]
pub struct ItemPattern {
    raw: String,
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl ItemPattern {
    /// Compiles `pattern`. An empty pattern, or one with only exclusions,
    /// includes every item.
    pub fn parse(pattern: &str) -> Result<Self, TransferError> {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();

        for line in pattern.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (target, glob) = match line.strip_prefix('!') {
                Some(rest) => (&mut excludes, rest.trim()),
                None => (&mut includes, line),
            };
            let regex = Regex::new(&glob_to_regex(glob)).map_err(|e| {
                TransferError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            })?;
            target.push(regex);
        }

        if includes.is_empty() {
            includes.push(Regex::new(&glob_to_regex("**")).map_err(|e| {
                TransferError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            })?);
        }

        Ok(Self {
            raw: pattern.to_string(),
            includes,
            excludes,
        })
    }

    /// The pattern as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether an item path is selected.
    pub fn matches(&self, item_path: &str) -> bool {
        let normalized = item_path.replace('\\', "/");
        let normalized = normalized.trim_start_matches('/');
        self.includes.iter().any(|r| r.is_match(normalized))
            && !self.excludes.iter().any(|r| r.is_match(normalized))
    }
}

fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.trim_start_matches('/').chars().collect();
    let mut regex = String::with_capacity(chars.len() * 2 + 2);
    regex.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                if chars.get(i) == Some(&'/') {
                    // `**/` also matches zero directories
                    regex.push_str("(?:.*/)?");
                    i += 1;
                } else {
                    regex.push_str(".*");
                }
                continue;
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            c => regex.push_str(&regex_lite::escape(&c.to_string())),
        }
        i += 1;
    }

    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_everything() {
        let pattern = ItemPattern::parse("**").unwrap();
        assert!(pattern.matches("drop/a.txt"));
        assert!(pattern.matches("drop/deep/nested/b.bin"));
        assert!(pattern.matches("top.txt"));
    }

    #[test]
    fn test_name_scoped_pattern() {
        let pattern = ItemPattern::parse("drop/**").unwrap();
        assert!(pattern.matches("drop/a.txt"));
        assert!(pattern.matches("drop/sub/b.txt"));
        assert!(!pattern.matches("drop2/a.txt"));
        assert!(!pattern.matches("other/drop/a.txt"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let pattern = ItemPattern::parse("drop/*.dll").unwrap();
        assert!(pattern.matches("drop/app.dll"));
        assert!(!pattern.matches("drop/bin/app.dll"));
        assert!(!pattern.matches("drop/app.pdb"));
    }

    #[test]
    fn test_double_star_slash_matches_zero_dirs() {
        let pattern = ItemPattern::parse("**/*.txt").unwrap();
        assert!(pattern.matches("readme.txt"));
        assert!(pattern.matches("drop/docs/readme.txt"));
        assert!(!pattern.matches("drop/docs/readme.md"));
    }

    #[test]
    fn test_question_mark() {
        let pattern = ItemPattern::parse("drop/v?.zip").unwrap();
        assert!(pattern.matches("drop/v1.zip"));
        assert!(!pattern.matches("drop/v10.zip"));
    }

    #[test]
    fn test_exclusions() {
        let pattern = ItemPattern::parse("**\n!**/*.pdb\n# comment\n").unwrap();
        assert!(pattern.matches("drop/app.dll"));
        assert!(!pattern.matches("drop/app.pdb"));
    }

    #[test]
    fn test_only_exclusions_includes_rest() {
        let pattern = ItemPattern::parse("!logs/**").unwrap();
        assert!(pattern.matches("drop/a.txt"));
        assert!(!pattern.matches("logs/run.log"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = ItemPattern::parse("drop/file(1)+[x].txt").unwrap();
        assert!(pattern.matches("drop/file(1)+[x].txt"));
        assert!(!pattern.matches("drop/file1x.txt"));
    }

    #[test]
    fn test_backslash_item_paths_are_normalized() {
        let pattern = ItemPattern::parse("drop/**").unwrap();
        assert!(pattern.matches("drop\\bin\\app.exe"));
        assert_eq!(pattern.as_str(), "drop/**");
    }
}
