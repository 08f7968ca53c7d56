//! Recursive-descent parser, single-token lookahead, first-error-wins.
//!
//! ```text
//! program  := stmt*
//! stmt     := IDENT '=' expr ';'
//!           | 'while' '(' cond ')' block
//!           | 'if' '(' cond ')' block ('else' block)?
//! block    := '{' stmt* '}'
//! cond     := expr ('==' | '!=') expr
//! expr     := primary (('+' | '-') primary)*      ; left-associative
//! primary  := INT | IDENT | '(' expr ')'
//! ```

use super::ast::{BinOp, Cond, CmpOp, Expr, Program, Stmt};
use super::lexer::{Lexer, Spanned, Token};
use crate::error::CompileError;

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Parser {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Spanned {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Spanned {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<Spanned, CompileError> {
        if &self.peek().token == expected {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(CompileError::Parse {
                message: format!("expected {}, found {:?}", what, found.token),
                row: found.row,
                col: found.col,
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, CompileError> {
        match &self.peek().token {
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(CompileError::Parse {
                message: format!("expected identifier, found {:?}", other),
                row: self.peek().row,
                col: self.peek().col,
            }),
        }
    }

    fn parse_program(&mut self) -> Result<Program, CompileError> {
        let mut stmts = Vec::new();
        while self.peek().token != Token::Eof {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Program { stmts })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, CompileError> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut stmts = Vec::new();
        while self.peek().token != Token::RBrace {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace, "'}'")?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, CompileError> {
        match &self.peek().token {
            Token::While => {
                self.advance();
                self.expect(&Token::LParen, "'('")?;
                let cond = self.parse_cond()?;
                self.expect(&Token::RParen, "')'")?;
                let body = self.parse_block()?;
                Ok(Stmt::While(cond, body))
            }
            Token::If => {
                self.advance();
                self.expect(&Token::LParen, "'('")?;
                let cond = self.parse_cond()?;
                self.expect(&Token::RParen, "')'")?;
                let then_body = self.parse_block()?;
                let else_body = if self.peek().token == Token::Else {
                    self.advance();
                    Some(self.parse_block()?)
                } else {
                    None
                };
                Ok(Stmt::If(cond, then_body, else_body))
            }
            Token::Ident(_) => {
                let name = self.expect_ident()?;
                self.expect(&Token::Eq, "'='")?;
                let expr = self.parse_expr()?;
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Stmt::Assign(name, expr))
            }
            other => Err(CompileError::Parse {
                message: format!("expected a statement, found {:?}", other),
                row: self.peek().row,
                col: self.peek().col,
            }),
        }
    }

    fn parse_cond(&mut self) -> Result<Cond, CompileError> {
        let left = self.parse_expr()?;
        let op = match &self.peek().token {
            Token::EqEq => CmpOp::Eq,
            Token::Neq => CmpOp::Ne,
            other => {
                return Err(CompileError::Parse {
                    message: format!("expected '==' or '!=', found {:?}", other),
                    row: self.peek().row,
                    col: self.peek().col,
                })
            }
        };
        self.advance();
        let right = self.parse_expr()?;
        // Condition normalization: a literal-zero right-hand side collapses
        // to the one-sided CmpZero form.
        if right == Expr::Const(0) {
            Ok(Cond::CmpZero(left, op))
        } else {
            Ok(Cond::Cmp(left, op, right))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_primary()?;
        loop {
            let op = match &self.peek().token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::BinOp(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        match &self.peek().token {
            Token::Int(v) => {
                let v = *v;
                self.advance();
                Ok(Expr::Const(v))
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::Var(name))
            }
            Token::LParen => {
                self.advance();
                let e = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(e)
            }
            other => Err(CompileError::Parse {
                message: format!("expected an expression, found {:?}", other),
                row: self.peek().row,
                col: self.peek().col,
            }),
        }
    }
}

/// Lex and parse `source` into a [`Program`]. First error wins; there is
/// no recovery.
pub fn parse_program(source: &str) -> Result<Program, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}
