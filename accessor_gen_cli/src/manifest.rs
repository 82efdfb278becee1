//! Field manifest: the CLI's stand-in for a compiler's annotated elements.
//!
//! ```text
//! # comment
//! field com.example.Person age int
//! class com.example.Account balance:double owner:com.example.Person
//! ```
use accessor_gen::discovery::{AnnotatedElement, DeclaredField};
use accessor_gen::field_descriptor::FieldDescriptor;
use accessor_gen::semantic_type::SemanticType;
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;

pub fn load(path: &Path) -> Result<Vec<AnnotatedElement>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read manifest {}", path.display()))?;
    parse(&text).with_context(|| format!("in manifest {}", path.display()))
}

pub fn parse(text: &str) -> Result<Vec<AnnotatedElement>> {
    let mut elements = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(content, _)| content).trim();
        if line.is_empty() {
            continue;
        }
        let element =
            parse_line(line).with_context(|| format!("line {}: `{}`", index + 1, raw.trim()))?;
        elements.push(element);
    }
    Ok(elements)
}

fn parse_line(line: &str) -> Result<AnnotatedElement> {
    let (keyword, rest) = next_token(line)?;
    match keyword {
        "field" => {
            let (owner, rest) = next_token(rest)?;
            let (name, type_text) = next_token(rest)?;
            if type_text.is_empty() {
                bail!("missing field type");
            }
            Ok(AnnotatedElement::Field(FieldDescriptor::new(
                owner,
                name,
                parse_type(type_text)?,
            )))
        }
        "class" => {
            let (owner, rest) = next_token(rest)?;
            let fields = rest
                .split_whitespace()
                .map(|pair| {
                    let (name, type_text) = pair
                        .split_once(':')
                        .ok_or_else(|| anyhow!("expected <name>:<type>, got `{pair}`"))?;
                    Ok(DeclaredField::new(name, parse_type(type_text)?))
                })
                .collect::<Result<Vec<_>>>()?;
            if fields.is_empty() {
                bail!("class `{owner}` declares no fields");
            }
            Ok(AnnotatedElement::Class {
                qualified_name: owner.to_string(),
                fields,
            })
        }
        other => bail!("unknown entry kind `{other}`, expected `field` or `class`"),
    }
}

/// Splits off the first whitespace-delimited token; the remainder is trimmed.
fn next_token(text: &str) -> Result<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        bail!("unexpected end of line");
    }
    Ok(match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (text, ""),
    })
}

fn parse_type(text: &str) -> Result<SemanticType> {
    text.parse::<SemanticType>().map_err(|e| anyhow!(e))
}
