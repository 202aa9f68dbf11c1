//! Parser for the canonical textual form of `Ty`.
//!
//! Grammar:
//!
//! ```text
//! ty   := "ref" ws ty | base "[]"*
//! base := ident ( "<" ty ( "," ty )* ">" )?
//! ```
//!
//! Identifiers may contain `.` and `::` so that qualified names survive a
//! round trip through configuration files.

use std::str::FromStr;

use thiserror::Error;

use super::{ContainerKind, Ty};

/// A malformed type string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid type `{input}` at offset {offset}: {message}")]
pub struct TyParseError {
    pub input: String,
    pub offset: usize,
    pub message: &'static str,
}

impl FromStr for Ty {
    type Err = TyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input, pos: 0 };
        let ty = parser.ty()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn ty(&mut self) -> Result<Ty, TyParseError> {
        self.skip_ws();
        if self.eat_keyword("ref") {
            let inner = self.ty()?;
            if inner.is_by_ref() {
                return Err(self.error("nested by-reference type"));
            }
            return Ok(inner.by_ref());
        }

        let mut ty = self.base()?;
        loop {
            self.skip_ws();
            if self.rest().starts_with("[]") {
                self.pos += 2;
                ty = Ty::array(ty);
            } else {
                return Ok(ty);
            }
        }
    }

    fn base(&mut self) -> Result<Ty, TyParseError> {
        let name = self.ident()?;
        self.skip_ws();

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.ty()?);
                self.skip_ws();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        Ok(match (name, args.len()) {
            ("void", 0) => Ty::Void,
            ("Task", 0) => Ty::Task,
            ("ValueTask", 0) => Ty::ValueTask,
            ("Task", 1) => Ty::task_of(single(args)),
            ("ValueTask", 1) => Ty::value_task_of(single(args)),
            ("List", 1) => ContainerKind::List.wrap(single(args)),
            ("Enumerable", 1) => ContainerKind::Enumerable.wrap(single(args)),
            ("Collection", 1) => ContainerKind::Collection.wrap(single(args)),
            (name, 0) => Ty::named(name),
            (name, _) => Ty::applied(name, args),
        })
    }

    fn ident(&mut self) -> Result<&'a str, TyParseError> {
        let input = self.input;
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == ':'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&input[start..self.pos])
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let matched = self
            .rest()
            .strip_prefix(keyword)
            .is_some_and(|after| after.starts_with(char::is_whitespace));
        if matched {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, message: &'static str) -> TyParseError {
        TyParseError {
            input: self.input.to_owned(),
            offset: self.pos,
            message,
        }
    }
}

/// Take the only element of a one-element argument list.
fn single(mut args: Vec<Ty>) -> Ty {
    args.pop().unwrap_or(Ty::Void)
}
