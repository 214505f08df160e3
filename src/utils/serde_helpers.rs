//! Helpers de serde para los PATCH
//!
//! En un PATCH hay que distinguir "campo ausente" (no tocar) de
//! "campo en null" (borrar el valor). Con `Option<Option<T>>`:
//! - ausente → `None`
//! - `null` → `Some(None)`
//! - valor → `Some(Some(v))`

use serde::{Deserialize, Deserializer};

/// Usar junto con `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserializa un string opcional tratando `""` como null.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
        #[serde(default, deserialize_with = "empty_string_as_none")]
        phone: Option<String>,
    }

    #[test]
    fn distinguishes_missing_from_null() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.notes, None);

        let null: Patch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(null.notes, Some(None));

        let set: Patch = serde_json::from_str(r#"{"notes":"rim scratch"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("rim scratch".to_string())));
    }

    #[test]
    fn blank_strings_become_none() {
        let patch: Patch = serde_json::from_str(r#"{"phone":"  "}"#).unwrap();
        assert_eq!(patch.phone, None);
    }
}
