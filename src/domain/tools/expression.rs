//! Sandboxed arithmetic evaluator used by the calculator tool.
//!
//! Only numbers, the operators `+ - * / % ** ^`, parentheses, the constants
//! `pi` and `e` and a fixed set of functions are accepted. There are no
//! variables and nothing else is resolvable, so model-supplied input can be
//! evaluated directly.
//!
//! Nesting of parentheses, call arguments and exponents is capped at
//! [`MAX_NESTING`] levels.
//!
//! Precedence from lowest to highest: `+ -`, `* / %`, unary signs, power.
//! Power is right associative and binds tighter than a leading minus, so
//! `-2 ** 2` is `-4`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("{name}() takes {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error in {0}()")]
    Domain(&'static str),

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression is nested too deeply")]
    TooDeep,
}

/// Deepest nesting of parentheses, call arguments and exponents accepted.
pub const MAX_NESTING: usize = 64;

/// Largest number of decimal places `round` distinguishes.
const MAX_ROUND_DIGITS: f64 = 15.0;

/// Evaluates `input` and returns the numeric result.
pub fn evaluate(input: &str) -> Result<f64, ExpressionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(ExpressionError::UnexpectedToken(token.to_string()));
    }
    if !value.is_finite() {
        return Err(ExpressionError::NotFinite);
    }
    Ok(value)
}

/// Formats a result the way the calculator reports it: integral values
/// without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Power,
    LParen,
    RParen,
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Power => write!(f, "**"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation: 1e3, 2.5E-4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let number = text
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::UnexpectedToken(text.clone()))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Power);
                i += 2;
            }
            _ => {
                let token = match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Power,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    _ => return Err(ExpressionError::UnexpectedChar { ch, position: i }),
                };
                tokens.push(token);
                i += 1;
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ExpressionError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(ExpressionError::UnexpectedToken(token.to_string())),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ExpressionError>,
    ) -> Result<T, ExpressionError> {
        if self.depth >= MAX_NESTING {
            return Err(ExpressionError::TooDeep);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expression(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                value += self.term()?;
            } else if self.eat(&Token::Minus) {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                value *= self.unary()?;
            } else if self.eat(&Token::Slash) {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                value /= divisor;
            } else if self.eat(&Token::Percent) {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                // result takes the sign of the divisor
                value -= divisor * (value / divisor).floor();
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> Result<f64, ExpressionError> {
        let mut negate = false;
        loop {
            if self.eat(&Token::Minus) {
                negate = !negate;
            } else if !self.eat(&Token::Plus) {
                break;
            }
        }
        let value = self.power()?;
        Ok(if negate { -value } else { value })
    }

    fn power(&mut self) -> Result<f64, ExpressionError> {
        let base = self.primary()?;
        if self.eat(&Token::Power) {
            let exponent = self.nested(Self::unary)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, ExpressionError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => self.nested(|p| {
                let value = p.expression()?;
                p.expect(Token::RParen)?;
                Ok(value)
            }),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let args = self.nested(Self::arguments)?;
                    call(&name, &args)
                } else {
                    constant(&name)
                }
            }
            Some(token) => Err(ExpressionError::UnexpectedToken(token.to_string())),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn arguments(&mut self) -> Result<Vec<f64>, ExpressionError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(args);
        }
    }
}

fn constant(name: &str) -> Result<f64, ExpressionError> {
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => Err(ExpressionError::UnknownName(name.to_string())),
    }
}

fn arity(name: &str, expected: &'static str, got: usize) -> ExpressionError {
    ExpressionError::Arity {
        name: name.to_string(),
        expected,
        got,
    }
}

fn one(name: &str, args: &[f64]) -> Result<f64, ExpressionError> {
    match args {
        [x] => Ok(*x),
        _ => Err(arity(name, "1", args.len())),
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, ExpressionError> {
    match name {
        "abs" => Ok(one(name, args)?.abs()),
        "sqrt" => {
            let x = one(name, args)?;
            if x < 0.0 {
                return Err(ExpressionError::Domain("sqrt"));
            }
            Ok(x.sqrt())
        }
        "sin" => Ok(one(name, args)?.sin()),
        "cos" => Ok(one(name, args)?.cos()),
        "tan" => Ok(one(name, args)?.tan()),
        "exp" => Ok(one(name, args)?.exp()),
        "round" => match args {
            [x] => Ok(x.round()),
            [x, digits] => {
                let digits = digits.trunc();
                if digits > MAX_ROUND_DIGITS {
                    return Ok(*x);
                }
                let factor = 10f64.powi(digits.max(-f64::from(f64::MAX_10_EXP)) as i32);
                let scaled = x * factor;
                if !scaled.is_finite() {
                    return Ok(*x);
                }
                if factor == 0.0 {
                    return Ok(0.0);
                }
                Ok(scaled.round() / factor)
            }
            _ => Err(arity(name, "1 or 2", args.len())),
        },
        "log" => match args {
            [x] if *x > 0.0 => Ok(x.ln()),
            [x, base] if *x > 0.0 && *base > 0.0 && *base != 1.0 => Ok(x.ln() / base.ln()),
            [_] | [_, _] => Err(ExpressionError::Domain("log")),
            _ => Err(arity(name, "1 or 2", args.len())),
        },
        "pow" => match args {
            [base, exponent] => Ok(base.powf(*exponent)),
            _ => Err(arity(name, "2", args.len())),
        },
        "min" | "max" if args.is_empty() => Err(arity(name, "at least 1", 0)),
        "min" => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
        "max" => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        "sum" => Ok(args.iter().sum()),
        _ => Err(ExpressionError::UnknownName(name.to_string())),
    }
}
