// src/synth/template.rs
//! Presentation shell wrapped around every generated newsletter body.

pub const NEWSLETTER_TITLE: &str = "AI Discovery Digest";

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{title}}</title>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background-color: #4F46E5; color: #fff; padding: 20px; text-align: center; border-radius: 5px 5px 0 0; }
    .header h1 { color: #fff; margin: 0; font-size: 24px; }
    .date { font-style: italic; color: #fff; margin-top: 5px; }
    .content { padding: 20px; background-color: #f9f9f9; border-left: 1px solid #ddd; border-right: 1px solid #ddd; }
    .intro { font-size: 16px; margin-bottom: 20px; }
    .summary { background-color: #fff; padding: 15px; border-radius: 5px; border-left: 4px solid #4F46E5; margin-top: 15px; }
    .footer { text-align: center; padding: 15px; font-size: 12px; color: #666; background-color: #eee; border-radius: 0 0 5px 5px; }
    h2 { color: #4F46E5; margin-top: 25px; font-size: 20px; border-bottom: 1px solid #eee; padding-bottom: 10px; }
  </style>
</head>
<body>
  <div class="header">
    <h1>{{title}}</h1>
    <p class="date">{{date}}</p>
  </div>

  <div class="content">
    <p class="intro">Dear Reader,</p>
    <p>AI moves fast and the important releases are easy to miss. Here is your curated digest of what matters right now.</p>

    <div class="summary">
      {{summary}}
    </div>
  </div>

  <div class="footer">
    <p>&copy; {{year}} {{title}} &bull; <a href="#">Unsubscribe</a></p>
  </div>
</body>
</html>
"##;

/// Wrap a markup fragment in the newsletter shell.
pub fn render_newsletter(summary: &str, date_label: &str, year: i32) -> String {
    // Summary goes in last so placeholders inside generated text stay literal.
    TEMPLATE
        .replace("{{title}}", NEWSLETTER_TITLE)
        .replace("{{date}}", date_label)
        .replace("{{year}}", &year.to_string())
        .replace("{{summary}}", summary)
}
