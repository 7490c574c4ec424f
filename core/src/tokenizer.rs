/// Tokens this long (in characters) or longer are never indexed.
pub const MAX_TOKEN_LEN: usize = 1024;

pub fn is_indexable_token(token: &str) -> bool {
    token.chars().count() < MAX_TOKEN_LEN
}

/// Split a line on the space character, yielding only indexable tokens.
///
/// Empty fields between spaces, at the start of a line, and a blank line
/// itself are tokens (`""`). Trailing empty fields are dropped, so a line
/// made only of spaces yields nothing. Case and punctuation are kept as-is.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    let trimmed = line.trim_end_matches(' ');
    let fields = if trimmed.is_empty() && !line.is_empty() { None } else { Some(trimmed.split(' ')) };
    fields.into_iter().flatten().filter(|t| is_indexable_token(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t: Vec<&str> = tokenize("Running, runner's  run!").collect();
        assert_eq!(t, vec!["Running,", "runner's", "", "run!"]);
    }

    #[test]
    fn blank_and_space_only_lines() {
        assert_eq!(tokenize("").collect::<Vec<_>>(), vec![""]);
        assert_eq!(tokenize("   ").count(), 0);
    }

    #[test]
    fn leading_fields_kept_trailing_dropped() {
        let t: Vec<&str> = tokenize(" a b  ").collect();
        assert_eq!(t, vec!["", "a", "b"]);
    }
}
