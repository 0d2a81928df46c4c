//! Language detection hints and the registration surface a host runtime
//! uses to pick a lexer.
//! 语言检测提示，以及宿主运行时选择词法分析器所用的注册信息。

use regex::RegexBuilder;
use std::path::Path;

/// Returns true if the first line of `text` is a shebang whose interpreter
/// matches `name`, a regular expression.
///
/// The interpreter is the last word of the shebang line that is not an
/// option, so `#!/usr/bin/env kore -q` names `kore`. A trailing `.exe`,
/// `.cmd`, `.bat` or `.bin` is ignored. Matching is case-insensitive.
pub fn shebang_matches(text: &str, name: &str) -> bool {
    let first_line = text.split('\n').next().unwrap_or_default().to_lowercase();
    let Some(command) = first_line.strip_prefix("#!") else {
        return false;
    };

    let Some(interpreter) = command
        .trim()
        .split(['/', '\\', ' '])
        .filter(|part| !part.is_empty() && !part.starts_with('-'))
        .next_back()
    else {
        return false;
    };

    RegexBuilder::new(&format!(r"^(?:{name})(\.(exe|cmd|bat|bin))?$"))
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(interpreter))
}

/// Registration data for one lexer.
#[derive(Debug, Clone, Copy)]
pub struct LexerInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Filename globs; `*` matches any run of characters, `?` exactly one.
    pub filenames: &'static [&'static str],
    /// Content hint used when the filename is inconclusive.
    pub detect: fn(&str) -> bool,
}

impl LexerInfo {
    /// Returns true for the lexer name or one of its aliases.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Returns true if the file name of `path` matches one of the globs.
    pub fn matches_filename(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.filenames.iter().any(|glob| glob_match(glob, file_name))
    }

    /// Claim a buffer by filename first, then by content.
    pub fn claims(&self, path: Option<&Path>, text: &str) -> bool {
        path.is_some_and(|p| self.matches_filename(p)) || (self.detect)(text)
    }

    /// Likelihood in `0.0..=1.0` that this lexer fits `text`.
    pub fn analyse_text(&self, text: &str) -> f32 {
        if (self.detect)(text) { 1.0 } else { 0.0 }
    }
}

fn glob_match(glob: &str, name: &str) -> bool {
    let glob: Vec<char> = glob.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut g, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match glob.get(g) {
            Some('*') => {
                backtrack = Some((g, n));
                g += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                g += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    g = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    glob[g..].iter().all(|&c| c == '*')
}
