/// Distinguishes a missing field from an explicit `null` in partial updates.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an `Option<Option<T>>` field. A missing field
/// stays `None`, `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        remarks: Option<Option<String>>,
    }

    #[test]
    fn missing_null_and_value() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.remarks, None);
        let p: Patch = serde_json::from_str(r#"{"remarks": null}"#).unwrap();
        assert_eq!(p.remarks, Some(None));
        let p: Patch = serde_json::from_str(r#"{"remarks": "rush"}"#).unwrap();
        assert_eq!(p.remarks, Some(Some("rush".to_string())));
    }
}
