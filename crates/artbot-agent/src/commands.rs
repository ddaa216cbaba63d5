//! Channel commands addressed to the bot.
//!
//! Commands look like `<nick>, help`, `<nick>, list-tags`,
//! `<nick>, paint` and `<nick>, paint <tag>`. Matching ignores case and
//! IRC formatting; the tag keeps the case it was typed in.

use artbot_channels::format::{bold, strip_formatting};
use regex::Regex;

/// A recognised command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Help,
    ListTags,
    PaintRandom,
    PaintByTag(String),
    None,
}

/// Recognises commands for one nick.
#[derive(Debug, Clone)]
pub struct IntentParser {
    help: Regex,
    list_tags: Regex,
    paint: Regex,
}

impl IntentParser {
    pub fn new(nick: &str) -> Self {
        let nick = regex::escape(nick);
        let build = |command: &str| {
            Regex::new(&format!(r"(?i)^{nick},\s+{command}"))
                .expect("escaped nick always forms a valid pattern")
        };
        Self {
            help: build(r"help$"),
            list_tags: build(r"list-tags$"),
            paint: build(r"paint"),
        }
    }

    pub fn parse(&self, raw: &str) -> Intent {
        let message = strip_formatting(raw);

        if self.help.is_match(&message) {
            Intent::Help
        } else if self.list_tags.is_match(&message) {
            Intent::ListTags
        } else if self.paint.is_match(&message) {
            match message.split_whitespace().nth(2) {
                Some(tag) => Intent::PaintByTag(tag.to_string()),
                None => Intent::PaintRandom,
            }
        } else {
            Intent::None
        }
    }
}

/// The four-line help text.
pub fn help_lines(nick: &str) -> Vec<String> {
    vec![
        "List of commands:".to_string(),
        format!("{} Ask me for help", bold(&format!("{nick}, help:"))),
        format!(
            "{} Paint ASCII message by tag (random by default)",
            bold(&format!("{nick}, paint <tag>:"))
        ),
        format!(
            "{} Lists all message tags for painting",
            bold(&format!("{nick}, list-tags:"))
        ),
    ]
}

/// Header sent before the tag list.
pub fn tags_header(nick: &str) -> String {
    format!("Here is a list of available tags ({nick}, paint <tag>):")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> IntentParser {
        IntentParser::new("artBot")
    }

    #[test]
    fn test_help_and_list_tags() {
        let p = parser();
        assert_eq!(p.parse("artBot, help"), Intent::Help);
        assert_eq!(p.parse("ARTBOT,   HELP"), Intent::Help);
        assert_eq!(p.parse("artbot, list-tags"), Intent::ListTags);
        assert_eq!(p.parse("artbot, help me"), Intent::None);
        assert_eq!(p.parse("artbot, list-tags please"), Intent::None);
    }

    #[test]
    fn test_paint() {
        let p = parser();
        assert_eq!(p.parse("artbot, paint"), Intent::PaintRandom);
        assert_eq!(p.parse("artbot, paint   "), Intent::PaintRandom);
        assert_eq!(p.parse("artbot, paint Tree"), Intent::PaintByTag("Tree".into()));
        assert_eq!(p.parse("artbot, paint tree and more"), Intent::PaintByTag("tree".into()));
        // The second word only has to start with "paint".
        assert_eq!(p.parse("artbot, painting"), Intent::PaintRandom);
    }

    #[test]
    fn test_requires_prefix() {
        let p = parser();
        assert_eq!(p.parse("hey artbot, help"), Intent::None);
        assert_eq!(p.parse("artbot,help"), Intent::None);
        assert_eq!(p.parse("artbot help"), Intent::None);
        assert_eq!(p.parse("otherbot, paint"), Intent::None);
        assert_eq!(p.parse(""), Intent::None);
    }

    #[test]
    fn test_formatting_ignored() {
        let p = parser();
        assert_eq!(p.parse("\x02artbot\x02, \x0304help"), Intent::Help);
    }

    #[test]
    fn test_nick_is_escaped() {
        let p = IntentParser::new("art.bot");
        assert_eq!(p.parse("art.bot, help"), Intent::Help);
        assert_eq!(p.parse("artxbot, help"), Intent::None);
    }

    #[test]
    fn test_help_lines() {
        let lines = help_lines("artbot");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "\x02artbot, help:\x02 Ask me for help");
        assert!(lines[3].contains("list-tags"));
    }
}
