// src/synth/prompt.rs

/// Fixed system instruction: a complete, styled HTML email and no markdown.
pub const SYSTEM_PROMPT: &str = "You are an AI newsletter expert. Create a professional, visually appealing HTML email newsletter about AI trends and discoveries. Format your response as COMPLETE, VALID HTML. Include all necessary HTML structure (<html>, <head>, <body>) and style with inline CSS. Use semantic HTML elements such as <header>, <section>, <article>, <h1> through <h6>, <p>, <ul>, <li>, <a>, <strong> and <em>. NO MARKDOWN allowed, pure HTML only. The newsletter should have a clean, modern layout with proper spacing and visual hierarchy.";

/// User message embedding the issue date and the numbered feed text.
pub fn user_prompt(date_label: &str, feed_text: &str) -> String {
    format!(
        r#"Create an AI newsletter for {date_label} "AI Discovery Digest".

Your response must be FULLY FORMATTED HTML, not markdown. Follow this structure:
1. A styled header with the newsletter title and date
2. An introduction paragraph
3. Structured sections for different types of AI news (using appropriate HTML sectioning elements)
4. Proper links with <a href="..."> tags
5. A styled footer with copyright and unsubscribe link

Use the following data to create the content.
Summarize what's trending in the latest AI space, organised in sections (top 3/5/10):
{feed_text}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_date_and_feed() {
        let p = user_prompt("Monday, October 19, 2026", "(1) [GitHub] repo: desc");
        assert!(p.contains("Monday, October 19, 2026"));
        assert!(p.ends_with("(1) [GitHub] repo: desc"));
    }
}
