//! Prompt definitions module.
//!
//! Each prompt is defined in its own file with:
//! - Metadata (name, title, description, arguments)
//! - Template string
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file (e.g., `my_prompt.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod game_recommendations;
mod trade_sales_post;

pub use game_recommendations::GameRecommendationsPrompt;
pub use trade_sales_post::TradeSalesPostPrompt;

use rmcp::model::PromptArgument;

/// Trait for prompt definitions.
///
/// Each prompt must implement this trait to provide its metadata and template.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// Short title, also used as the description of a rendered prompt.
    const TITLE: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;
}

/// The `username`, `currency` and `destination` arguments shared by the
/// shopping-related prompts.
pub(crate) fn shopper_arguments() -> Vec<PromptArgument> {
    vec![
        PromptArgument {
            name: "username".to_string(),
            title: None,
            description: Some("BoardGameGeek username".to_string()),
            required: Some(true),
        },
        PromptArgument {
            name: "currency".to_string(),
            title: None,
            description: Some("Currency for prices (USD, GBP, EUR) - default: USD".to_string()),
            required: Some(false),
        },
        PromptArgument {
            name: "destination".to_string(),
            title: None,
            description: Some("Destination country (US, GB, DE) - default: US".to_string()),
            required: Some(false),
        },
    ]
}
