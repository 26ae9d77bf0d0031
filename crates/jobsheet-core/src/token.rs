//! Field-name sanitization for on-disk suggestion files

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Derive a field's on-disk token from its display name.
///
/// Every character that is not an ASCII letter or digit is replaced with a
/// single `_`, one replacement per character (runs are not collapsed), so
/// `S.O.#` becomes `S_O__`. The mapping is stable but not injective:
/// distinct display names can produce the same token. [`check_collisions`]
/// surfaces that case before two fields would share one suggestion list.
pub fn field_token(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Verify that no two field names in `fields` sanitize to the same token.
pub fn check_collisions<'a, I>(fields: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashMap<String, &str> = HashMap::new();
    for field in fields {
        let token = field_token(field);
        match seen.get(token.as_str()) {
            Some(first) if *first != field => {
                return Err(Error::TokenCollision {
                    token,
                    first: (*first).to_string(),
                    second: field.to_string(),
                });
            }
            _ => {
                seen.insert(token, field);
            }
        }
    }
    Ok(())
}
