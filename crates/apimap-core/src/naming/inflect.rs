use pluralizer::pluralize;

use super::words::split_words;

/// Singular form of the last word of `word`, keeping its casing.
pub fn singular(word: &str) -> String {
    inflect_last_word(word, false)
}

/// Plural form of the last word of `word`, keeping its casing.
pub fn plural(word: &str) -> String {
    inflect_last_word(word, true)
}

pub fn is_plural(word: &str) -> bool {
    plural(word) == word
}

fn inflect_last_word(word: &str, to_plural: bool) -> String {
    let Some(last) = split_words(word).pop() else {
        return word.to_string();
    };
    if !word.ends_with(&last) || !last.chars().any(|c| c.is_ascii_alphabetic()) {
        return word.to_string();
    }
    let stem = &word[..word.len() - last.len()];
    let count = if to_plural { 2 } else { 1 };
    let inflected = pluralize(&last.to_lowercase(), count, false);
    format!("{stem}{}", restore_case(&last, &inflected))
}

fn restore_case(original: &str, inflected: &str) -> String {
    let mut chars = original.chars();
    let first_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    if first_upper && original.len() > 1 && chars.all(|c| !c.is_ascii_lowercase()) {
        return inflected.to_uppercase();
    }
    if first_upper {
        let mut out = inflected.chars();
        return match out.next() {
            Some(c) => c.to_uppercase().chain(out).collect(),
            None => String::new(),
        };
    }
    inflected.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular() {
        assert_eq!(singular("users"), "user");
        assert_eq!(singular("categories"), "category");
        assert_eq!(singular("user"), "user");
        assert_eq!(singular("userPosts"), "userPost");
        assert_eq!(singular("ssh-keys"), "ssh-key");
        assert_eq!(singular("123"), "123");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural("user"), "users");
        assert_eq!(plural("Post"), "Posts");
        assert_eq!(plural("fooBar"), "fooBars");
    }

    #[test]
    fn test_is_plural() {
        assert!(is_plural("users"));
        assert!(is_plural("posts"));
        assert!(!is_plural("user"));
        assert!(!is_plural("profile"));
    }
}
