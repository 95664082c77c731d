//! Prompt templates for the agents and the four analysis tools.
//!
//! Each tool prompt instructs the model to emit exactly one JSON object in a
//! documented shape; `json_extract` enforces the parse-or-error contract.

use insight_core::FeedbackRequest;

pub const MASTER_SYSTEM: &str = "\
You are a master agent responsible for general user interactions, greetings, \
and generic inquiries. When the user input contains instructions or \
product-related details, you must not respond directly: invoke the \
delegate_feedback_analysis tool exactly once, which forwards the exact \
feedback text and instructions to a specialized sub-agent. For greetings and \
small talk, respond directly with clear, structured text. Never call the \
delegation tool more than once.";

pub const SUBAGENT_SYSTEM: &str = "\
You are a specialized sub-agent equipped with four analysis tools:
1. sentiment_analysis - sentiment scores (positive, negative, neutral).
2. topic_categorization - assigns one of the predefined topics with a confidence score.
3. keyword_contextualization - context-aware keywords with relevance scores.
4. summarization - concise summary plus actionable recommendations.

If an instruction is provided, select only the tools relevant to it.
If no instruction is provided, use all four tools for comprehensive insights.
You may request multiple tools at once; pass the feedback text as each tool's query.";

pub const TOOL_SYSTEM: &str = "\
You are an analysis tool. Reply with exactly one JSON object and nothing else.";

fn instructions_or_na(request: &FeedbackRequest) -> &str {
    if request.instructions.trim().is_empty() {
        "N/A"
    } else {
        &request.instructions
    }
}

pub fn master_prompt(request: &FeedbackRequest) -> String {
    format!(
        "USER_INPUTS:\n  Feedback_text: {}\n  Instructions: {}",
        request.feedback_text,
        instructions_or_na(request)
    )
}

pub fn subagent_prompt(request: &FeedbackRequest) -> String {
    format!(
        "Answer the user based on the feedback and instruction given.\n  \
         Feedback_text: {}\n  Instruction: {}",
        request.feedback_text,
        instructions_or_na(request)
    )
}

pub fn sentiment_prompt(query: &str) -> String {
    format!(
        "Analyze the sentiment of the following user feedback and provide a JSON \
         response with sentiment scores for positive, negative, and neutral categories.\n\n\
         NOTE: Ensure the sum of all values equals 1. Do not provide any explanation.\n\n\
         Output format:\n\
         {{\"positive\": <score>, \"negative\": <score>, \"neutral\": <score>}}\n\n\
         Feedback: {query}"
    )
}

pub fn topic_prompt(query: &str) -> String {
    format!(
        "Categorize the following user feedback into one of the predefined topics: \
         `Product Quality`, `Delivery`, `Support`.\n\n\
         NOTE: Select only one category and assign it a confidence score between 0 and 1. \
         Do not provide any explanation.\n\n\
         Output format:\n\
         {{\"category\": <selected category>, \"score\": <confidence score>}}\n\n\
         Feedback: {query}"
    )
}

pub fn keyword_prompt(query: &str) -> String {
    format!(
        "Extract context-aware keywords from the following user feedback along with \
         their relevance scores.\n\n\
         NOTE: Provide a JSON response where each keyword is mapped to a relevance \
         score between 0 and 1. Do not provide any explanation.\n\n\
         Output format:\n\
         {{\"keywords\": {{\"<keyword1>\": <score>, \"<keyword2>\": <score>}}}}\n\n\
         Feedback: {query}"
    )
}

pub fn summary_prompt(query: &str) -> String {
    format!(
        "Summarize the following user feedback concisely and provide actionable \
         recommendations.\n\n\
         NOTE: Ensure the summary captures the core message and the recommendations \
         are practical and relevant. Do not provide any explanation.\n\n\
         Output format:\n\
         {{\"summary\": \"<short concise summary>\", \
         \"recommendations\": [\"<recommendation 1>\", \"<recommendation 2>\"]}}\n\n\
         Feedback: {query}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(instructions: &str) -> FeedbackRequest {
        FeedbackRequest {
            feedback_id: "fb-1".into(),
            customer_name: "Ada".into(),
            feedback_text: "Delivery was late".into(),
            timestamp: "2026-08-27T00:00:00Z".into(),
            instructions: instructions.into(),
        }
    }

    #[test]
    fn empty_instructions_render_as_na() {
        let prompt = master_prompt(&request("  "));
        assert!(prompt.contains("Instructions: N/A"));
    }

    #[test]
    fn instructions_are_forwarded_verbatim() {
        let prompt = subagent_prompt(&request("analyze sentiment and summarize"));
        assert!(prompt.contains("Instruction: analyze sentiment and summarize"));
        assert!(prompt.contains("Feedback_text: Delivery was late"));
    }
}
