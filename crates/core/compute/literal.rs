//! Parsing of numeric literals supplied as text.
//!
//! Accepts a single number, a bracketed list `[a, b]`, a parenthesized
//! tuple `(a, b)` or a bare tuple `a, b`, each with an optional trailing
//! comma. `(a)` is a plain number; `a,` is a one-element sequence.

use crate::error::ValidationError;

/// A parsed numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Scalar(f64),
    Sequence(Vec<f64>),
}

/// Parses `input` as a numeric literal. `field` names the parameter in errors.
pub fn parse_literal(field: &str, input: &str) -> Result<Literal, ValidationError> {
    let mut parser = Parser {
        field,
        input,
        pos: 0,
    };
    let mut literal = parser.value()?;
    parser.skip_ws();
    if let Literal::Scalar(first) = literal
        && parser.peek() == Some(',')
    {
        literal = Literal::Sequence(parser.bare_tuple(first)?);
    }
    if parser.pos < input.len() {
        return Err(parser.error(&format!(
            "unexpected trailing input '{}'",
            &input[parser.pos..]
        )));
    }
    Ok(literal)
}

/// Parses `input` as a single number.
pub fn parse_number(field: &str, input: &str) -> Result<f64, ValidationError> {
    match parse_literal(field, input)? {
        Literal::Scalar(v) => Ok(v),
        Literal::Sequence(_) => Err(ValidationError::TypeMismatch(format!(
            "{} must be a single number, got a list: {}",
            field, input
        ))),
    }
}

struct Parser<'a> {
    field: &'a str,
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, detail: &str) -> ValidationError {
        ValidationError::Parse(format!(
            "could not parse {} from '{}': {}",
            self.field, self.input, detail
        ))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn value(&mut self) -> Result<Literal, ValidationError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => {
                self.pos += 1;
                self.sequence(']').map(|(values, _)| Literal::Sequence(values))
            }
            Some('(') => {
                self.pos += 1;
                let (values, saw_comma) = self.sequence(')')?;
                if values.len() == 1 && !saw_comma {
                    Ok(Literal::Scalar(values[0]))
                } else {
                    Ok(Literal::Sequence(values))
                }
            }
            Some(_) => self.number().map(Literal::Scalar),
            None => Err(self.error("empty input")),
        }
    }

    /// Continues an unbracketed tuple after its first element, up to end of input.
    fn bare_tuple(&mut self, first: f64) -> Result<Vec<f64>, ValidationError> {
        let mut values = vec![first];
        while self.peek() == Some(',') {
            self.pos += 1;
            self.skip_ws();
            match self.peek() {
                None => break,
                Some('[') | Some('(') => {
                    return Err(self.error("nested sequences are not supported"));
                }
                Some(_) => values.push(self.number()?),
            }
            self.skip_ws();
        }
        Ok(values)
    }

    /// Parses comma separated numbers up to `close`. Returns whether any comma was seen.
    fn sequence(&mut self, close: char) -> Result<(Vec<f64>, bool), ValidationError> {
        let mut values = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok((values, saw_comma));
                }
                Some('[') | Some('(') => {
                    return Err(self.error("nested sequences are not supported"));
                }
                Some(_) => values.push(self.number()?),
                None => return Err(self.error(&format!("missing closing '{}'", close))),
            }

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    saw_comma = true;
                }
                Some(c) if c == close => {}
                Some(c) => return Err(self.error(&format!("expected ',' or '{}', found '{}'", close, c))),
                None => return Err(self.error(&format!("missing closing '{}'", close))),
            }
        }
    }

    fn number(&mut self) -> Result<f64, ValidationError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }

        let token = &self.input[start..self.pos];
        if token.is_empty() {
            let found = self.peek().map(String::from).unwrap_or_default();
            return Err(self.error(&format!("expected a number, found '{}'", found)));
        }
        if token.starts_with('_') || token.ends_with('_') || token.contains("__") {
            return Err(self.error(&format!("'{}' is not a number", token)));
        }

        token
            .replace('_', "")
            .parse::<f64>()
            .map_err(|_| self.error(&format!("'{}' is not a number", token)))
    }
}
