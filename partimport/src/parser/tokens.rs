use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::ObjectRef;

/// One element of the host's flattened command vocabulary.
///
/// Requests and responses are flat sequences; nesting is expressed with
/// explicit `ListBegin`/`ListEnd` markers instead of a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Token {
    ListBegin,
    ListEnd,
    Nil,
    Text(String),
    Real(f64),
    Int(i32),
    Object(ObjectRef),
}

impl Token {
    pub fn text(s: impl Into<String>) -> Self {
        Token::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Token::Real(v) => Some(*v),
            Token::Int(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Token::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Token::Object(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::ListBegin => write!(f, "("),
            Token::ListEnd => write!(f, ")"),
            Token::Nil => write!(f, "nil"),
            Token::Text(s) => {
                // Quote strings that would otherwise read as something else
                if s.is_empty() || s.contains([' ', '(', ')', '"']) || s == "nil" {
                    write!(f, "\"{}\"", s.replace('"', "\\\""))
                } else {
                    write!(f, "{}", s)
                }
            }
            Token::Real(v) => write!(f, "{:?}", v),
            Token::Int(v) => write!(f, "{}", v),
            Token::Object(r) => write!(f, "<{}>", r),
        }
    }
}

/// Render a token sequence the way it would read as a list expression,
/// e.g. `(c:wd_insym2 HPB11 (1.5 2.0) nil 2)`.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::from("(");
    let mut need_space = false;
    for token in tokens {
        if matches!(token, Token::ListEnd) {
            out.push(')');
            need_space = true;
            continue;
        }
        if need_space {
            out.push(' ');
        }
        out.push_str(&token.to_string());
        need_space = !matches!(token, Token::ListBegin);
    }
    out.push(')');
    out
}
