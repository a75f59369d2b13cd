use crate::model::enemy::EnemyBlueprint;
use serde_json::Value;

/// Decode raw LLM output into an enemy stat block.
/// Accepts a bare object, an object wrapped in a ```json fence, or prose around one object.
pub fn decode_enemy_blueprint(raw: &str) -> Result<EnemyBlueprint, String> {
    let body = extract_json_object(raw).ok_or_else(|| "No JSON object in LLM output".to_string())?;

    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("Invalid LLM output: {}", e))?;

    let Value::Object(_) = value else {
        return Err("Enemy must be a JSON object".to_string());
    };

    serde_json::from_value::<EnemyBlueprint>(value)
        .map_err(|e| format!("Enemy fields malformed: {}", e))
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fenced_object() {
        let raw = "```json\n{\"name\":\"Hua Xiong\",\"title\":\"Tiger of Xiliang\",\"strength\":18.0,\"maxHp\":90,\"difficulty\":\"Hard\"}\n```";
        let blueprint = decode_enemy_blueprint(raw).unwrap();
        assert_eq!(blueprint.name, "Hua Xiong");
        assert_eq!(blueprint.strength, Some(18.0));
        assert_eq!(blueprint.max_hp, Some(90.0));
        assert_eq!(blueprint.difficulty, "Hard");
    }

    #[test]
    fn missing_numbers_are_optional() {
        let blueprint = decode_enemy_blueprint(r#"{"name":"Yellow Turban Chief"}"#).unwrap();
        assert_eq!(blueprint.strength, None);
        assert_eq!(blueprint.title, "");
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_enemy_blueprint("the enemy is very scary").is_err());
        assert!(decode_enemy_blueprint("} nope {").is_err());
        assert!(decode_enemy_blueprint(r#"{"title":"nameless"}"#).is_err());
        assert!(decode_enemy_blueprint(r#"{"name":"x","strength":"lots"}"#).is_err());
    }
}
