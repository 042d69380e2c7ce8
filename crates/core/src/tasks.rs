//! Derived artifacts generated from extracted article text.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::completion::{CompletionClient, CompletionRequest};
use crate::image::{ImageClient, Illustration};
use crate::Result;

/// A kind of text the completion backend derives from an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// What the article is about, in Russian
    Summary,
    /// Thesis statements and key points as bullets, in Russian
    Thesis,
    /// A Telegram post with hashtags, in Russian
    Telegram,
    /// Full translation to Russian
    Translate,
    /// An English text-to-image prompt describing the article
    ImagePrompt,
}

impl Task {
    pub const ALL: [Task; 5] = [Task::Summary, Task::Thesis, Task::Telegram, Task::Translate, Task::ImagePrompt];

    pub fn name(self) -> &'static str {
        match self {
            Task::Summary => "summary",
            Task::Thesis => "thesis",
            Task::Telegram => "telegram",
            Task::Translate => "translate",
            Task::ImagePrompt => "image-prompt",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Task::Summary => {
                "You are a professional content analyst. Analyze the following article and provide a concise summary \
                 in Russian explaining what the article is about. Focus on the main topic, key points, and purpose. \
                 Return only the summary without additional comments."
            }
            Task::Thesis => {
                "You are a professional content analyst. Analyze the following article and extract the main thesis \
                 statements and key points in Russian. Present them as a structured list of concise bullet points. \
                 Return only the thesis points without additional comments."
            }
            Task::Telegram => {
                "You are a social media content creator. Create an engaging Telegram post in Russian based on the \
                 following article. The post should be concise, informative, and suitable for Telegram format. \
                 Include relevant hashtags if appropriate. Return only the post content without additional comments."
            }
            Task::Translate => {
                "You are a professional translator. Translate the following article to Russian. Preserve the original \
                 formatting, structure, and meaning. Return only the translated text without any additional comments \
                 or explanations."
            }
            Task::ImagePrompt => {
                "You are a professional image prompt generator. Based on the following article, create a detailed, \
                 vivid image generation prompt in English. The prompt should describe a scene, concept, or visual \
                 representation that captures the essence of the article. Focus on visual elements, style, mood, and \
                 composition. Return only the prompt text without additional comments or explanations."
            }
        }
    }

    pub fn user_prompt(self) -> &'static str {
        match self {
            Task::Summary => "What is this article about? Provide a summary in Russian:",
            Task::Thesis => "Extract the main thesis and key points from this article in Russian:",
            Task::Telegram => "Create a Telegram post in Russian based on this article:",
            Task::Translate => "Translate this article to Russian:",
            Task::ImagePrompt => "Create a detailed image generation prompt in English based on this article:",
        }
    }

    /// Completion budget; `None` uses the client default.
    pub fn max_tokens(self) -> Option<u32> {
        match self {
            Task::ImagePrompt => Some(500),
            _ => None,
        }
    }

    /// Builds the completion request for an article.
    pub fn request(self, content: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt().to_string(),
            user_prompt: self.user_prompt().to_string(),
            content: content.to_string(),
            max_tokens: self.max_tokens(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" | "about" => Ok(Task::Summary),
            "thesis" => Ok(Task::Thesis),
            "telegram" => Ok(Task::Telegram),
            "translate" | "translation" => Ok(Task::Translate),
            "image-prompt" | "image_prompt" => Ok(Task::ImagePrompt),
            _ => Err(format!(
                "Invalid task: {}. Valid options: summary, thesis, telegram, translate, image-prompt",
                s
            )),
        }
    }
}

/// Generates a derived artifact for an article.
///
/// Telegram posts get a link back to the source appended when one is known.
pub async fn run_task(
    client: &dyn CompletionClient, task: Task, content: &str, source_url: Option<&str>,
) -> Result<String> {
    let output = client.complete(&task.request(content)).await?;
    info!(task = task.name(), length = output.chars().count(), "generated artifact");

    match (task, source_url) {
        (Task::Telegram, Some(url)) => Ok(format!("{}\n\n🔗 {}", output, url)),
        _ => Ok(output),
    }
}

/// Generates an image prompt for an article and renders it.
pub async fn illustrate(
    completion: &dyn CompletionClient, images: &dyn ImageClient, content: &str,
) -> Result<(String, Illustration)> {
    let prompt = run_task(completion, Task::ImagePrompt, content, None).await?;
    let illustration = images.generate(prompt.trim()).await?;
    Ok((prompt, illustration))
}
