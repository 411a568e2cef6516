//! Name transforms used to map entity types to storage locations and
//! association names to entity types.
//!
//! The singular of a name is the name without a trailing `s`; the plural
//! appends one.

/// `"pet_owner"` -> `"PetOwner"`.
pub fn classify(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `"PetOwner"` -> `"pet_owner"`, `"HTTPRequest"` -> `"http_request"`.
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        if ch == ':' {
            continue;
        }
        out.extend(ch.to_lowercase());
    }

    out
}

/// Drop one trailing `s`.
pub fn singularize(name: &str) -> String {
    name.strip_suffix('s').unwrap_or(name).to_string()
}

/// Append `s` unless the name already ends in one.
pub fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        name.to_string()
    } else {
        format!("{}s", name)
    }
}
