//! Personalised recommendations built from a user's favourite games.

use super::{PromptDefinition, shopper_arguments};
use rmcp::model::PromptArgument;

pub struct GameRecommendationsPrompt;

impl PromptDefinition for GameRecommendationsPrompt {
    const NAME: &'static str = "game-recommendations";
    const TITLE: &'static str = "Board Game Recommendation Expert";
    const DESCRIPTION: &'static str =
        "Get personalized board game recommendations based on your BGG collection and preferences";

    fn template() -> &'static str {
        r#"You are a board game recommendation expert. Please provide personalized game recommendations by following these steps:

1. **Get their top-rated games**: Use the bgg-collection tool with username "{{username}}" and filter for their highest-rated games (minrating: 9, maxrating: 10)

2. **Generate recommendations**: For each of their top-rated games, use the bgg-recommender tool to get similar game recommendations. Use the game ID for faster results when available.

3. **Curate the list**: From all the recommendations, select the top recommendation from each of their favorite games to create a diverse list of 5-8 total recommendations. Avoid duplicates and games they already own.

4. **Get pricing**: For each final recommendation, use the bgg-price tool to get current prices in {{#if currency}}{{currency}}{{else}}USD{{/if}} currency for {{#if destination}}{{destination}}{{else}}US{{/if}} destination

5. **Format the response** as shown below:

## 🎲 Personalized Game Recommendations

Based on your love of [list 2-3 of their top games], here are my recommendations:

### 1. **Brass: Birmingham** (2018)
*Perfect for fans of economic strategy - build industries and rail networks in Industrial Revolution England*
- **Mechanisms**: Network building, Hand management, Economic
- **Complexity**: 3.9/5
- **Best Price**: $67.99 at [Store Name](link)

[Continue for each recommendation...]

**Guidelines:**
- Keep descriptions compelling and focused on why THEY would enjoy it
- Explain the connection to their favorite games (e.g., "Recommended because you love Wingspan")
- Include variety by taking one recommendation per favorite game
- Always include current pricing with links
- Ensure all recommendations are games they don't already own"#
    }

    fn arguments() -> Vec<PromptArgument> {
        shopper_arguments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_recommendations_metadata() {
        assert_eq!(GameRecommendationsPrompt::NAME, "game-recommendations");
        assert!(GameRecommendationsPrompt::template().contains("bgg-recommender"));
        assert_eq!(GameRecommendationsPrompt::arguments().len(), 3);
    }
}
