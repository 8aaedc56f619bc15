//! Layout templates for the rendered pages.
//!
//! A template mixes literal text with `{key}` or `{key:style,style}` slots.
//! Slots resolve against the active [`LocaleTable`] first, then against the
//! extra variables passed by the caller. Unresolved slots are printed back
//! as `{key}` so a typo in a config template stays visible.

use colored::{ColoredString, Colorize};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::i18n::LocaleTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Slot { key: String, styles: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != '{' {
                literal.push(c);
                continue;
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }

            let slot: String = chars.by_ref().take_while(|&n| n != '}').collect();
            let (key, styles) = match slot.split_once(':') {
                Some((key, styles)) => (key, styles),
                None => (slot.as_str(), ""),
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            segments.push(Segment::Slot {
                key: key.to_string(),
                styles: styles
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            });
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn render(&self, table: &LocaleTable, vars: &HashMap<&str, Cow<'_, str>>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot { key, styles } => {
                    let value = table
                        .get(key)
                        .map(Cow::Borrowed)
                        .or_else(|| vars.get(key.as_str()).cloned());
                    match value {
                        Some(value) => out.push_str(&style(&value, styles).to_string()),
                        None => {
                            out.push('{');
                            out.push_str(key);
                            out.push('}');
                        }
                    }
                }
            }
        }
        out
    }
}

fn style(value: &str, styles: &[String]) -> ColoredString {
    styles
        .iter()
        .fold(value.normal(), |styled, s| match s.as_str() {
            "red" => styled.red(),
            "green" => styled.green(),
            "yellow" => styled.yellow(),
            "blue" => styled.blue(),
            "magenta" => styled.magenta(),
            "cyan" => styled.cyan(),
            "white" => styled.white(),
            "bold" => styled.bold(),
            "dim" | "dimmed" => styled.dimmed(),
            "underline" => styled.underline(),
            "italic" => styled.italic(),
            "reversed" => styled.reversed(),
            _ => styled,
        })
}
