//! Sandboxed arithmetic compiler for derived series.
//!
//! Grammar: `+ - * /`, unary minus, parentheses, numeric literals, and
//! identifiers bound by position to the declared series titles plus the
//! x-axis title. No statements, no calls, no access to anything outside the
//! argument slice, so a compiled formula is pure and safe to invoke once per
//! sample on untrusted input.

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    // Index into the argument slice, resolved at compile time.
    Var(usize),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

/// A formula compiled once and invoked once per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFormula {
    expr: Expr,
    arity: usize,
}

impl CompiledFormula {
    /// Compiles `text` against `bindings` (series titles plus the x-axis
    /// title, in declared order). Any syntax error or unknown identifier
    /// fails here, before any evaluation work happens.
    pub fn compile(text: &str, bindings: &[&str]) -> ChartResult<Self> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ChartError::FormulaCompile("empty formula".to_owned()));
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            bindings,
        };
        let expr = parser.expression()?;
        if parser.pos != parser.tokens.len() {
            return Err(ChartError::FormulaCompile(format!(
                "unexpected trailing input after position {}",
                parser.pos
            )));
        }

        Ok(Self {
            expr,
            arity: bindings.len(),
        })
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Evaluates the formula for one sample. Pure: reads nothing but `args`.
    ///
    /// `args` must hold one value per binding, in the order declared at
    /// compile time.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        debug_assert_eq!(args.len(), self.arity);
        eval_expr(&self.expr, args)
    }

    /// Applies the formula at every sample index; any non-finite result
    /// fails the whole materialization. No partial output ever escapes.
    pub fn materialize(&self, columns: &[&[f64]], len: usize) -> ChartResult<Vec<f64>> {
        debug_assert_eq!(columns.len(), self.arity);

        let eval_at = |index: usize| -> ChartResult<f64> {
            let mut args = Vec::with_capacity(columns.len());
            for column in columns {
                args.push(column[index]);
            }
            let value = self.eval(&args);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ChartError::FormulaEval {
                    index,
                    detail: format!("result is {value}"),
                })
            }
        };

        #[cfg(feature = "parallel-eval")]
        {
            use rayon::prelude::*;
            return (0..len).into_par_iter().map(eval_at).collect();
        }

        #[cfg(not(feature = "parallel-eval"))]
        {
            (0..len).map(eval_at).collect()
        }
    }
}

fn eval_expr(expr: &Expr, args: &[f64]) -> f64 {
    match expr {
        Expr::Number(value) => *value,
        Expr::Var(slot) => args[*slot],
        Expr::Neg(inner) => -eval_expr(inner, args),
        Expr::Add(lhs, rhs) => eval_expr(lhs, args) + eval_expr(rhs, args),
        Expr::Sub(lhs, rhs) => eval_expr(lhs, args) - eval_expr(rhs, args),
        Expr::Mul(lhs, rhs) => eval_expr(lhs, args) * eval_expr(rhs, args),
        Expr::Div(lhs, rhs) => eval_expr(lhs, args) / eval_expr(rhs, args),
    }
}

fn tokenize(text: &str) -> ChartResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => push_single(&mut chars, &mut tokens, Token::Plus),
            '-' => push_single(&mut chars, &mut tokens, Token::Minus),
            '*' => push_single(&mut chars, &mut tokens, Token::Star),
            '/' => push_single(&mut chars, &mut tokens, Token::Slash),
            '(' => push_single(&mut chars, &mut tokens, Token::LeftParen),
            ')' => push_single(&mut chars, &mut tokens, Token::RightParen),
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &text[start..end];
                let value = literal.parse::<f64>().map_err(|_| {
                    ChartError::FormulaCompile(format!("malformed number `{literal}`"))
                })?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(text[start..end].to_owned()));
            }
            other => {
                return Err(ChartError::FormulaCompile(format!(
                    "unexpected character `{other}`"
                )));
            }
        }
    }

    Ok(tokens)
}

fn push_single(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    tokens: &mut Vec<Token>,
    token: Token,
) {
    chars.next();
    tokens.push(token);
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    bindings: &'a [&'a str],
}

impl Parser<'_> {
    // expr := term (('+' | '-') term)*
    fn expression(&mut self) -> ChartResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> ChartResult<Expr> {
        let mut lhs = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.factor()?));
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.factor()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    // factor := NUMBER | IDENT | '-' factor | '(' expr ')'
    fn factor(&mut self) -> ChartResult<Expr> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ChartError::FormulaCompile("unexpected end of formula".to_owned()))?;
        self.pos += 1;

        match token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::Ident(name) => {
                let slot = self
                    .bindings
                    .iter()
                    .position(|binding| *binding == name)
                    .ok_or_else(|| {
                        ChartError::FormulaCompile(format!("unknown variable `{name}`"))
                    })?;
                Ok(Expr::Var(slot))
            }
            Token::Minus => Ok(Expr::Neg(Box::new(self.factor()?))),
            Token::LeftParen => {
                let inner = self.expression()?;
                match self.peek() {
                    Some(Token::RightParen) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(ChartError::FormulaCompile(
                        "missing closing parenthesis".to_owned(),
                    )),
                }
            }
            other => Err(ChartError::FormulaCompile(format!(
                "unexpected token {other:?}"
            ))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }
}
