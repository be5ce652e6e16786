//! Prompt service implementation.
//!
//! The PromptService keeps the registered templates and renders them on
//! request. Prompts are defined in `definitions/` and registered via
//! `registry.rs`.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;
use crate::core::config::PromptsConfig;

/// Service for listing and rendering prompts.
pub struct PromptService {
    /// Configuration for the prompts domain.
    #[allow(dead_code)]
    config: PromptsConfig,

    /// Key: prompt name.
    prompts: HashMap<String, PromptTemplate>,
}

impl PromptService {
    /// Create a new PromptService with every registered prompt.
    pub fn new(config: PromptsConfig) -> Self {
        let prompts: HashMap<String, PromptTemplate> = get_all_prompts()
            .into_iter()
            .map(|template| (template.name.clone(), template))
            .collect();

        info!("Initialized PromptService with {} prompts", prompts.len());
        Self { config, prompts }
    }

    /// List all available prompts, sorted by name.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        let mut prompts: Vec<Prompt> = self
            .prompts
            .values()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: template.title.clone(),
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect();
        prompts.sort_by(|a, b| a.name.cmp(&b.name));
        prompts
    }

    /// Render a prompt with the given arguments.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();

        if let Some(missing) = template.missing_arguments(&arguments).first() {
            return Err(PromptError::missing_argument(*missing));
        }

        debug!("Rendering prompt {}", name);
        let content = template.render(&arguments)?;

        Ok(GetPromptResult {
            description: template.title.clone().or_else(|| template.description.clone()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &GetPromptResult) -> String {
        let content = serde_json::to_value(&result.messages[0].content).unwrap();
        content["text"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_list_prompts() {
        let service = PromptService::new(PromptsConfig::default());
        let prompts = service.list_prompts().await;
        let names: Vec<_> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["game-recommendations", "trade-sales-post"]);
    }

    #[tokio::test]
    async fn test_trade_sales_post_defaults() {
        let service = PromptService::new(PromptsConfig::default());

        let mut args = HashMap::new();
        args.insert("username".to_string(), "meeple_fan".to_string());

        let result = service.get_prompt("trade-sales-post", Some(args)).await.unwrap();
        assert_eq!(
            result.description.as_deref(),
            Some("Generate BGG trade collection sales post")
        );
        let text = text_of(&result);
        assert!(text.contains("username \"meeple_fan\""));
        assert!(text.contains("prices in USD currency for US destination"));
        assert!(text.contains("reduce prices by 20% for a quick sale"));
    }

    #[tokio::test]
    async fn test_game_recommendations_with_currency() {
        let service = PromptService::new(PromptsConfig::default());

        let mut args = HashMap::new();
        args.insert("username".to_string(), "meeple_fan".to_string());
        args.insert("currency".to_string(), "GBP".to_string());
        args.insert("destination".to_string(), "GB".to_string());

        let result = service
            .get_prompt("game-recommendations", Some(args))
            .await
            .unwrap();
        assert!(text_of(&result).contains("prices in GBP currency for GB destination"));
    }

    #[tokio::test]
    async fn test_get_prompt_missing_required_argument() {
        let service = PromptService::new(PromptsConfig::default());
        let result = service.get_prompt("trade-sales-post", None).await;
        assert!(matches!(result, Err(PromptError::MissingArgument(ref a)) if a == "username"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let service = PromptService::new(PromptsConfig::default());
        let result = service.get_prompt("nonexistent", None).await;
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }
}
