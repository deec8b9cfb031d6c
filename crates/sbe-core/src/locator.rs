//! Fixed-path access to the substrate record.
//!
//! The record always lives at
//! `config.recipes[0].trays[0].positions[0].substrate1`. Only the first
//! element of each array is ever addressed.

use serde_json::{Map, Value};

use crate::error::{PathStage, Result, SbeError};

/// Key of the record inside a position object.
pub const SUBSTRATE_KEY: &str = "substrate1";

/// First non-null element of `parent[key]`, if `parent[key]` is an array.
fn first_entry<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    parent?
        .get(key)?
        .as_array()?
        .first()
        .filter(|v| !v.is_null())
}

fn first_entry_mut<'a>(parent: Option<&'a mut Value>, key: &str) -> Option<&'a mut Value> {
    parent?
        .get_mut(key)?
        .as_array_mut()?
        .first_mut()
        .filter(|v| !v.is_null())
}

fn position(document: &Value) -> Result<&Value> {
    let recipe = first_entry(document.get("config"), "recipes")
        .ok_or(SbeError::NotFound(PathStage::Recipe))?;
    let tray = first_entry(Some(recipe), "trays").ok_or(SbeError::NotFound(PathStage::Tray))?;
    first_entry(Some(tray), "positions").ok_or(SbeError::NotFound(PathStage::Position))
}

fn position_mut(document: &mut Value) -> Result<&mut Map<String, Value>> {
    let recipe = first_entry_mut(document.get_mut("config"), "recipes")
        .ok_or(SbeError::NotFound(PathStage::Recipe))?;
    let tray =
        first_entry_mut(Some(recipe), "trays").ok_or(SbeError::NotFound(PathStage::Tray))?;
    first_entry_mut(Some(tray), "positions")
        .and_then(Value::as_object_mut)
        .ok_or(SbeError::NotFound(PathStage::Position))
}

/// Borrow the substrate record of `document`.
///
/// # Errors
///
/// Returns [`SbeError::NotFound`] naming the first missing step.
pub fn extract_substrate(document: &Value) -> Result<&Value> {
    position(document)?
        .get(SUBSTRATE_KEY)
        .ok_or(SbeError::NotFound(PathStage::Substrate))
}

/// Overwrite the substrate record of `document` with `record`.
///
/// The position object must exist; the record key itself need not.
///
/// # Errors
///
/// Returns [`SbeError::NotFound`] if the recipe, tray or position is missing.
pub fn replace_substrate(document: &mut Value, record: Value) -> Result<()> {
    position_mut(document)?.insert(SUBSTRATE_KEY.to_string(), record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "config": {
                "name": "run-7",
                "recipes": [{
                    "trays": [{
                        "positions": [
                            {"substrate1": {"thickness": "1mm", "material": "GaAs", "lot": "A"}},
                            {"substrate1": {"thickness": "9mm", "material": "Ge"}}
                        ]
                    }]
                }]
            }
        })
    }

    #[test]
    fn extracts_first_position_record() {
        let doc = sample();
        let record = extract_substrate(&doc).unwrap();
        assert_eq!(
            record,
            &json!({"thickness": "1mm", "material": "GaAs", "lot": "A"})
        );
    }

    #[test]
    fn missing_config_is_reported_as_recipe() {
        let err = extract_substrate(&json!({"other": 1})).unwrap_err();
        assert_eq!(err.missing_stage(), Some(PathStage::Recipe));
    }

    #[test]
    fn empty_recipes_is_reported_as_recipe() {
        let err = extract_substrate(&json!({"config": {"recipes": []}})).unwrap_err();
        assert_eq!(err.missing_stage(), Some(PathStage::Recipe));
    }

    #[test]
    fn null_recipe_is_reported_as_recipe() {
        let err = extract_substrate(&json!({"config": {"recipes": [null]}})).unwrap_err();
        assert_eq!(err.missing_stage(), Some(PathStage::Recipe));
    }

    #[test]
    fn missing_tray_and_position_are_distinct() {
        let no_tray = json!({"config": {"recipes": [{"trays": []}]}});
        assert_eq!(
            extract_substrate(&no_tray).unwrap_err().missing_stage(),
            Some(PathStage::Tray)
        );

        let no_position = json!({"config": {"recipes": [{"trays": [{"positions": []}]}]}});
        assert_eq!(
            extract_substrate(&no_position).unwrap_err().missing_stage(),
            Some(PathStage::Position)
        );
    }

    #[test]
    fn missing_record_key_is_reported_as_substrate() {
        let doc = json!({"config": {"recipes": [{"trays": [{"positions": [{}]}]}]}});
        assert_eq!(
            extract_substrate(&doc).unwrap_err().missing_stage(),
            Some(PathStage::Substrate)
        );
    }

    #[test]
    fn replace_touches_only_first_position() {
        let mut doc = sample();
        replace_substrate(&mut doc, json!({"thickness": "2mm", "material": "Si"})).unwrap();

        let positions = &doc["config"]["recipes"][0]["trays"][0]["positions"];
        assert_eq!(
            positions[0]["substrate1"],
            json!({"thickness": "2mm", "material": "Si"})
        );
        assert_eq!(
            positions[1]["substrate1"],
            json!({"thickness": "9mm", "material": "Ge"})
        );
        assert_eq!(doc["config"]["name"], "run-7");
    }

    #[test]
    fn replace_creates_record_when_absent() {
        let mut doc = json!({"config": {"recipes": [{"trays": [{"positions": [{"slot": 3}]}]}]}});
        replace_substrate(&mut doc, json!({"material": "Si"})).unwrap();
        assert_eq!(
            doc["config"]["recipes"][0]["trays"][0]["positions"][0],
            json!({"slot": 3, "substrate1": {"material": "Si"}})
        );
    }

    #[test]
    fn replace_rejects_non_object_position() {
        let mut doc = json!({"config": {"recipes": [{"trays": [{"positions": [7]}]}]}});
        let err = replace_substrate(&mut doc, json!({})).unwrap_err();
        assert_eq!(err.missing_stage(), Some(PathStage::Position));
    }
}
