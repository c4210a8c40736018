use std::sync::LazyLock;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use regex::Regex;

use super::inflect::{plural, singular};
use crate::config::Lexicon;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_\-/]+").expect("Invalid regex"));

static VERSION_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+").expect("Invalid regex"));

/// Split an identifier into words.
///
/// Separators (`-`, `_`, `/`, whitespace) always break. Within a run, words
/// break on lower→upper, on the last capital of an acronym run followed by a
/// lowercase letter, after a letter followed by a non-letter, and on every
/// digit/non-digit boundary.
///
/// `FooXYZBar` → `["Foo", "XYZ", "Bar"]`, `foo-bar_baz/123` → `["foo", "bar", "baz", "123"]`.
pub fn split_words(input: &str) -> Vec<String> {
    let cleaned: Vec<char> = SEPARATORS.replace_all(input, " ").chars().collect();

    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in cleaned.iter().enumerate() {
        current.push(c);
        let Some(&next) = cleaned.get(i + 1) else {
            continue;
        };
        let acronym_end = c.is_ascii_uppercase()
            && next.is_ascii_uppercase()
            && cleaned.get(i + 2).is_some_and(char::is_ascii_lowercase);
        let boundary = (c.is_ascii_lowercase() && next.is_ascii_uppercase())
            || acronym_end
            || (c.is_ascii_alphabetic() && !next.is_ascii_alphabetic())
            || (c.is_ascii_digit() != next.is_ascii_digit());
        if boundary {
            words.push(current.trim().to_string());
            current.clear();
        }
    }
    words.push(current.trim().to_string());

    words.retain(|w| !w.is_empty());
    words
}

/// Join words in camelCase, upper-casing known acronyms.
///
/// `ssh_keys` → `SSHKeys`, `user post` → `userPost`.
pub fn to_camel_case(s: &str, lexicon: &Lexicon) -> String {
    let mut words: Vec<(String, bool)> = Vec::new();
    for token in s
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if lexicon.is_acronym(token) {
            words.push((token.to_string(), true));
            continue;
        }
        for word in split_words(token) {
            let acronym = lexicon.is_acronym(&word);
            words.push((word, acronym));
        }
    }

    words
        .iter()
        .enumerate()
        .map(|(i, (word, acronym))| {
            if *acronym {
                word.to_uppercase()
            } else if i == 0 {
                word.to_lowercase()
            } else {
                capitalize(&word.to_lowercase())
            }
        })
        .collect()
}

/// Derive a resource name from a URL path.
///
/// `/v1/users/{id}/posts.json` → `userPost`. Version segments and
/// placeholders are dropped; every other segment is singularized unless it
/// is an acronym or an invariant word.
pub fn to_resource_name(path: &str, lexicon: &Lexicon) -> String {
    let path = strip_extension(path).replace('.', "");
    let parts: Vec<String> = path
        .split('/')
        .filter(|segment| {
            !segment.is_empty() && !VERSION_SEGMENT.is_match(segment) && !segment.starts_with('{')
        })
        .map(|segment| {
            if lexicon.is_acronym(segment) {
                segment.to_uppercase()
            } else if lexicon.is_invariant(segment) {
                segment.to_string()
            } else {
                singular(segment)
            }
        })
        .collect();
    to_camel_case(&parts.join("_"), lexicon)
}

/// Every case and plurality rendering of `name`, sorted and deduplicated.
pub fn name_variants(name: &str) -> Vec<String> {
    let words = split_words(name);
    let Some(last) = words.last() else {
        return Vec::new();
    };

    let mut forms = vec![words.clone()];
    for inflected in [singular(last), plural(last)] {
        if &inflected != last {
            let mut form = words.clone();
            if let Some(slot) = form.last_mut() {
                *slot = inflected;
            }
            forms.push(form);
        }
    }

    let mut variants: Vec<String> = forms.iter().flat_map(|form| renderings(form)).collect();
    variants.sort();
    variants.dedup();
    variants
}

fn renderings(words: &[String]) -> [String; 6] {
    let spaced = words.join(" ").to_lowercase();
    let pascal: String = words.iter().map(|w| capitalize(w)).collect();
    let camel: String = words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect();
    [
        spaced.to_snake_case(),
        spaced.to_kebab_case(),
        pascal,
        spaced.to_pascal_case(),
        camel,
        spaced.to_lower_camel_case(),
    ]
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) => &path[..file_start + dot],
        None => path,
    }
}
