use crate::models::{Area, MatchIdentity};

/// Build the classifier system prompt embedding the full area vocabulary.
///
/// The vocabulary is rebuilt from the catalog snapshot on every call because
/// the catalog can change between requests.
pub fn build_system_prompt(catalog: &[Area]) -> String {
    let vocabulary = catalog
        .iter()
        .map(|area| area.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a helpful assistant which guides users through an innovation process. \
         Your users are managing directors of companies who look into how to innovate \
         their business. In a first stage, we try to find the best innovation focus area \
         for the company based on the sector they work in and the problems they face. \
         Based on the following focus areas, output an 'areas' object that is a mapping \
         from the area name to a percentage (0-100) representing how well it fits the \
         current situation. The focus areas are: {}. \
         Return only this json object, no additional text.",
        vocabulary
    )
}

/// Build the classifier user prompt embedding the caller's identity and problem.
pub fn build_user_prompt(identity: &MatchIdentity) -> String {
    format!(
        "Calculate the fit of the areas for the following person. {} works at {} \
         and has the problem: \"{}\".",
        identity.username, identity.company, identity.problem
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Area> {
        vec![
            Area { id: 1, name: "Robotics".to_string() },
            Area { id: 2, name: "Supply Chain".to_string() },
            Area { id: 3, name: "Sustainability".to_string() },
        ]
    }

    #[test]
    fn test_system_prompt_embeds_comma_joined_vocabulary() {
        let prompt = build_system_prompt(&catalog());
        assert!(prompt.contains("Robotics, Supply Chain, Sustainability"));
    }

    #[test]
    fn test_system_prompt_empty_catalog() {
        let prompt = build_system_prompt(&[]);
        assert!(prompt.contains("The focus areas are: ."));
    }

    #[test]
    fn test_user_prompt_embeds_identity() {
        let identity = MatchIdentity {
            username: "alice".to_string(),
            company: "Acme GmbH".to_string(),
            problem: "our logistics costs exploded".to_string(),
        };

        let prompt = build_user_prompt(&identity);
        assert!(prompt.contains("alice works at Acme GmbH"));
        assert!(prompt.contains("\"our logistics costs exploded\""));
    }
}
