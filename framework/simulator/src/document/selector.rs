use crate::error::DocumentError;

/// A parsed selector: compound selectors joined by descendant combinators, stored left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    pub(crate) compounds: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: Vec<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeMatcher {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

impl Selector {
    pub(crate) fn parse(input: &str) -> Result<Self, DocumentError> {
        let invalid = |reason: &str| DocumentError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let mut compounds = Vec::new();
        let mut chars = input.trim().chars().peekable();

        while chars.peek().is_some() {
            let mut compound = Compound::default();
            let mut empty = true;

            while let Some(&c) = chars.peek() {
                match c {
                    c if c.is_whitespace() => break,
                    '*' if empty => {
                        chars.next();
                    }
                    '.' => {
                        chars.next();
                        let class = take_ident(&mut chars);
                        if class.is_empty() {
                            return Err(invalid("expected a class name after `.`"));
                        }
                        compound.classes.push(class);
                    }
                    '[' => {
                        chars.next();
                        compound
                            .attributes
                            .push(parse_attribute(&mut chars).map_err(invalid)?);
                    }
                    c if is_ident_char(c) && empty => {
                        compound.tag = Some(take_ident(&mut chars).to_ascii_lowercase());
                    }
                    c => {
                        return Err(invalid(&format!("unsupported character `{c}`")));
                    }
                }
                empty = false;
            }

            if empty {
                return Err(invalid("empty compound selector"));
            }
            compounds.push(compound);

            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
        }

        if compounds.is_empty() {
            return Err(invalid("empty selector"));
        }

        Ok(Self { compounds })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn parse_attribute(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<AttributeMatcher, &'static str> {
    let name = take_ident(chars);
    if name.is_empty() {
        return Err("expected an attribute name after `[`");
    }

    match chars.next() {
        Some(']') => Ok(AttributeMatcher { name, value: None }),
        Some('=') => {
            let value = match chars.peek() {
                Some(&quote) if quote == '"' || quote == '\'' => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some(c) if c == quote => break,
                            Some(c) => value.push(c),
                            None => return Err("unterminated attribute value"),
                        }
                    }
                    value
                }
                _ => take_ident(chars),
            };

            match chars.next() {
                Some(']') => Ok(AttributeMatcher {
                    name,
                    value: Some(value),
                }),
                _ => Err("expected `]` after attribute value"),
            }
        }
        _ => Err("only `[attr]` and `[attr=value]` are supported"),
    }
}
