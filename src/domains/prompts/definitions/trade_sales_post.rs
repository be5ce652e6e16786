//! Sales post for a user's for-trade games.

use super::{PromptDefinition, shopper_arguments};
use rmcp::model::PromptArgument;

pub struct TradeSalesPostPrompt;

impl PromptDefinition for TradeSalesPostPrompt {
    const NAME: &'static str = "trade-sales-post";
    const TITLE: &'static str = "Generate BGG trade collection sales post";
    const DESCRIPTION: &'static str =
        "Generate a sales post for your BGG 'for trade' collection with discounted prices";

    fn template() -> &'static str {
        r#"Please help me create a sales post for my BoardGameGeek for-trade collection. Here's what I need:

1. First, use the bgg-collection tool to fetch my collection with username "{{username}}" and filter for games marked "fortrade"
2. For each game in the collection, use the bgg-price tool to get current prices in {{#if currency}}{{currency}}{{else}}USD{{/if}} currency for {{#if destination}}{{destination}}{{else}}US{{/if}} destination
3. Create a formatted sales post with:
   - A header saying "🎲 BOARD GAMES FOR SALE 🎲"
   - List each game with its name and price (reduce prices by 20% for a quick sale)
   - Use emoji status indicators: 🟢 = Available, 🟡 = Pending, 🔴 = Sold (default all to 🟢)
   - If price is not available, show "Price TBD"
   - End with "DM for more info or bundle deals!"

Format it nicely for posting in a Facebook hobby group."#
    }

    fn arguments() -> Vec<PromptArgument> {
        shopper_arguments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_sales_post_metadata() {
        assert_eq!(TradeSalesPostPrompt::NAME, "trade-sales-post");
        assert!(TradeSalesPostPrompt::template().contains("bgg-collection"));

        let args = TradeSalesPostPrompt::arguments();
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].name, "username");
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].required, Some(false));
    }
}
