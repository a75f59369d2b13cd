use crate::engine::encounter::StatRanges;
use crate::model::game_state::Character;
use crate::model::narrative::CommentaryRequest;

/// Builds the prompts sent to the narrative LLM.
/// Only formats text: no parsing, no networking, no engine logic.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system() -> &'static str {
        "You are the narrator of a Romance of the Three Kingdoms role-playing game.\n\
You only describe what already happened. You never decide outcomes, damage, rewards or deaths.\n\
Never add explanations, markdown, or extra sections."
    }

    pub fn event(character: &Character, action: &str) -> String {
        let mut prompt = String::new();
        push_character_section(&mut prompt, character);
        prompt.push_str(&format!("The player has chosen to: {}.\n\n", action));
        prompt.push_str(
            "Write a short, immersive paragraph (2-3 sentences) describing what happens.\n\
Use a slightly archaic, chronicle-like style. Keep it flavorful but concise.\n",
        );
        prompt
    }

    pub fn enemy(player_level: u32, ranges: &StatRanges) -> String {
        let mut prompt = String::new();
        prompt.push_str("Generate a random enemy for a Three Kingdoms battle.\n");
        prompt.push_str(&format!("Player Level: {}.\n", player_level));
        prompt.push_str("Return JSON only, a single object with these fields:\n");
        prompt.push_str(
            "- name (string): the enemy general or unit (e.g. \"Yellow Turban Chief\", \"Hua Xiong\").\n",
        );
        prompt.push_str("- title (string): an epithet (e.g. \"Tiger of Xiliang\", \"Nameless Footman\").\n");
        prompt.push_str(&format!(
            "- strength (number): between {} and {}.\n",
            ranges.strength.0,
            ranges.strength.1 - 1
        ));
        prompt.push_str(&format!(
            "- maxHp (number): between {} and {}.\n",
            ranges.max_hp.0,
            ranges.max_hp.1 - 1
        ));
        prompt.push_str("- difficulty (string): one of \"Easy\", \"Medium\", \"Hard\", \"Boss\".\n");
        prompt
    }

    pub fn commentary(request: &CommentaryRequest) -> String {
        let mut prompt = String::new();
        prompt.push_str("Write ONE sentence of action description for a Three Kingdoms battle.\n");
        prompt.push_str(&format!("Attacker: {}.\n", request.attacker));
        prompt.push_str(&format!("Defender: {}.\n", request.defender));
        prompt.push_str(&format!("Damage dealt: {}.\n", request.damage));
        prompt.push_str(&format!("Critical hit: {}.\n", request.critical));
        if request.attacker_is_player {
            prompt.push_str("The attacker is the player's general.\n");
        }
        prompt.push_str(&format!(
            "Example: \"{} roars and brings the blade down like a tiger from the hills, wounding {}!\"\n",
            request.attacker, request.defender
        ));
        prompt
    }
}

fn push_character_section(prompt: &mut String, character: &Character) {
    prompt.push_str("PLAYER CHARACTER:\n");
    prompt.push_str(&format!("Name: {}\n", character.name));
    prompt.push_str(&format!(
        "Standing: level {} {} of {}\n",
        character.level,
        character.role.label(),
        character.faction.label()
    ));
    if let Some(leader) = character.faction.leader() {
        prompt.push_str(&format!("Lord: {}\n", leader));
    }
    prompt.push_str(&format!(
        "Current Status: Troops: {}, Gold: {}.\n\n",
        character.troops, character.gold
    ));
}
