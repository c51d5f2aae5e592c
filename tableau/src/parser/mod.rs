/*!
Recursive-descent parser for the surface grammar (see the crate docs for the
full grammar) plus the call into the BoxNNF rewrite.

Grounded in `KFormula::parseEQU`/`parseIMP`/`parseOR`/`parseAND`/`parseRest`:
a chain of five precedence levels, from weakest (`<=>`) to strongest (atoms
and parenthesized/prefixed subformulas), each implemented the same
right-recursive way as the source (`parseEQU` calls `parseIMP` for its left
operand, then itself again for its right operand, etc.). `parseRest` is
where modal prefixes, negation, and atoms live.

As in the source, parsing first builds a plain [crate::formula::nnf::Expr]
tree; [parse_line] then hands that tree to
[crate::formula::nnf::to_box_nnf] in one pass, exactly mirroring
`parseKFormula` calling `toBoxNNF` on its result.
*/

use lasso::Rodeo;

use crate::formula::nnf::{self, Expr};
use crate::formula::{Arena, FormulaId};
use crate::roles::RoleInterner;
use crate::types::err::ParseError;

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    roles: &'a mut RoleInterner,
}

/// Parses one line of surface syntax and rewrites it to BoxNNF.
///
/// An all-whitespace (or empty) `line` is a [ParseError::Empty]; callers
/// that want to treat blank input as "trivially provable" should check for
/// that before calling this (see `context::Context::decide`).
pub fn parse_line(
    line: &str,
    arena: &mut Arena,
    names: &mut Rodeo,
    roles: &mut RoleInterner,
) -> Result<FormulaId, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser {
        bytes: line.as_bytes(),
        pos: 0,
        roles,
    };
    let expr = parser.parse_equ()?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(ParseError::UnexpectedToken { offset: parser.pos });
    }
    Ok(nnf::to_box_nnf(&expr, true, arena, names))
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while let Some(b) = self.bytes.get(self.pos) {
            if (*b as char).is_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn is_ident_start(b: u8) -> bool {
        (b as char).is_ascii_alphabetic() || b == b'_'
    }

    fn is_ident_cont(b: u8) -> bool {
        (b as char).is_ascii_alphanumeric() || b == b'_'
    }

    /// `equ := imp ("<=>" equ)?`
    fn parse_equ(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_imp()?;
        self.skip_ws();
        if self.starts_with("<=>") {
            self.pos += 3;
            let right = self.parse_equ()?;
            Ok(Expr::Equ(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    /// `imp := or ("=>" imp)?`
    fn parse_imp(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_or()?;
        self.skip_ws();
        if self.starts_with("=>") {
            self.pos += 2;
            let right = self.parse_imp()?;
            Ok(Expr::Imp(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    /// `or := and ("|" or)?`
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_and()?;
        self.skip_ws();
        if self.peek() == Some(b'|') {
            self.pos += 1;
            let right = self.parse_or()?;
            Ok(Expr::Or(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    /// `and := rest ("&" and)?`
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_rest()?;
        self.skip_ws();
        if self.peek() == Some(b'&') {
            self.pos += 1;
            let right = self.parse_and()?;
            Ok(Expr::And(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    /// `rest := "(" equ ")" | "<" name ">" rest | "[" name "]" rest
    ///        | "<>" rest | "[]" rest | "~" rest | "True" | "False" | ident`
    fn parse_rest(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd { offset: self.pos }),
            Some(b'(') => {
                self.pos += 1;
                let inner = self.parse_equ()?;
                self.skip_ws();
                if self.peek() != Some(b')') {
                    return Err(ParseError::MissingDelimiter { offset: self.pos });
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(b'<') => {
                if self.starts_with("<>") {
                    self.pos += 2;
                    let body = self.parse_rest()?;
                    Ok(Expr::Dia {
                        role: self.roles.intern(""),
                        inverse: false,
                        body: Box::new(body),
                    })
                } else {
                    let (role, inverse) = self.parse_role_name('>')?;
                    let body = self.parse_rest()?;
                    Ok(Expr::Dia {
                        role,
                        inverse,
                        body: Box::new(body),
                    })
                }
            }
            Some(b'[') => {
                if self.starts_with("[]") {
                    self.pos += 2;
                    let body = self.parse_rest()?;
                    Ok(Expr::Box_ {
                        role: self.roles.intern(""),
                        inverse: false,
                        body: Box::new(body),
                    })
                } else {
                    let (role, inverse) = self.parse_role_name(']')?;
                    let body = self.parse_rest()?;
                    Ok(Expr::Box_ {
                        role,
                        inverse,
                        body: Box::new(body),
                    })
                }
            }
            Some(b'~') => {
                self.pos += 1;
                let body = self.parse_rest()?;
                Ok(Expr::Not(Box::new(body)))
            }
            Some(_) if self.starts_with("True") => {
                self.pos += 4;
                Ok(Expr::True)
            }
            Some(_) if self.starts_with("False") => {
                self.pos += 5;
                Ok(Expr::False)
            }
            Some(b) if Self::is_ident_start(b) => {
                let start = self.pos;
                self.pos += 1;
                while let Some(b) = self.peek() {
                    if Self::is_ident_cont(b) {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                let ident = std::str::from_utf8(&self.bytes[start..self.pos])
                    .expect("grammar restricts identifiers to ASCII")
                    .to_owned();
                Ok(Expr::Ap(ident))
            }
            Some(_) => Err(ParseError::UnexpectedToken { offset: self.pos }),
        }
    }

    /// Parses `["-"] alnum+` followed by `closing`, starting just after the
    /// opening `<`/`[` (still pointing at the role name, not past it).
    fn parse_role_name(&mut self, closing: char) -> Result<(crate::roles::RoleId, bool), ParseError> {
        self.pos += 1; // the opening '<' or '['
        let inverse = self.peek() == Some(b'-');
        if inverse {
            self.pos += 1;
        }
        let start = self.pos;
        while let Some(b) = self.peek() {
            if (b as char).is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(ParseError::EmptyRoleName { offset: start });
        }
        let name = std::str::from_utf8(&self.bytes[start..self.pos])
            .expect("grammar restricts role names to ASCII");
        let role = self.roles.intern(name);
        if self.peek() != Some(closing as u8) {
            return Err(ParseError::MissingDelimiter { offset: self.pos });
        }
        self.pos += 1;
        Ok((role, inverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaOp;

    fn parse(line: &str) -> (FormulaId, Arena) {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let id = parse_line(line, &mut arena, &mut names, &mut roles).expect("parses");
        (id, arena)
    }

    #[test]
    fn true_and_false_are_terminals() {
        let (id, arena) = parse("True");
        assert_eq!(arena.get(id), FormulaOp::True);
        let (id, arena) = parse("False");
        assert_eq!(arena.get(id), FormulaOp::False);
    }

    #[test]
    fn implication_self_entails() {
        // p => p must be a tautology: BoxNNF(p => p) should equal
        // BoxNNF(~p | p), which our arena interns identically either way,
        // given the same atom interner for both lines.
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let lhs = parse_line("p => p", &mut arena, &mut names, &mut roles).expect("parses");
        let rhs = parse_line("~p | p", &mut arena, &mut names, &mut roles).expect("parses");
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn box_and_diamond_share_a_role() {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let _ = parse_line("[r]p", &mut arena, &mut names, &mut roles).unwrap();
        let _ = parse_line("<r>p", &mut arena, &mut names, &mut roles).unwrap();
        assert_eq!(roles.num_roles(), 1);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let err = parse_line("p )", &mut arena, &mut names, &mut roles).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn unclosed_paren_is_rejected() {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let err = parse_line("(p & q", &mut arena, &mut names, &mut roles).unwrap_err();
        assert!(matches!(err, ParseError::MissingDelimiter { .. }));
    }

    #[test]
    fn empty_line_is_an_error() {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let err = parse_line("   ", &mut arena, &mut names, &mut roles).unwrap_err();
        assert_eq!(err, ParseError::Empty);
    }
}
