//! Built-in Tools
//!
//! Demo tools registered by the server. Each one reads what it needs out of
//! the raw user message.

use agentshell_core::Tool;
use async_trait::async_trait;

/// DateTime tool - returns current time
///
/// Mentions of "iso" or "unix" in the message pick the output format.
pub struct DateTimeTool;

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        "datetime"
    }

    fn description(&self) -> &str {
        "Get the current date and time (say 'iso' or 'unix' for machine formats)"
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let input = input.to_lowercase();
        let now = chrono::Utc::now();

        let output = if input.contains("iso") {
            now.to_rfc3339()
        } else if input.contains("unix") {
            now.timestamp().to_string()
        } else {
            now.format("%A, %B %d, %Y at %H:%M:%S UTC").to_string()
        };

        Ok(output)
    }
}

/// Calculator tool - evaluates the arithmetic found in the message
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression, e.g. 'calculate (2 + 3) * 4'"
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let expr = extract_expression(input)
            .ok_or_else(|| anyhow::anyhow!("no arithmetic expression found"))?;

        let result = evaluate_expression(&expr).map_err(anyhow::Error::msg)?;
        Ok(format!("{expr} = {result}"))
    }
}

/// Longest run of arithmetic characters that contains a digit
fn extract_expression(input: &str) -> Option<String> {
    let is_arith = |c: char| c.is_ascii_digit() || " .+-*/^()".contains(c);

    input
        .split(|c: char| !is_arith(c))
        .map(str::trim)
        .filter(|run| run.chars().any(|c| c.is_ascii_digit()))
        .max_by_key(|run| run.len())
        .map(str::to_string)
}

/// Longest expression the calculator accepts
const MAX_EXPRESSION_LEN: usize = 256;

/// Evaluate `+ - * / ^` with parentheses and unary signs
fn evaluate_expression(expr: &str) -> std::result::Result<f64, String> {
    let expr: Vec<u8> = expr.bytes().filter(|b| !b.is_ascii_whitespace()).collect();

    if expr.is_empty() {
        return Err("Empty expression".into());
    }
    if expr.len() > MAX_EXPRESSION_LEN {
        return Err(format!("Expression longer than {MAX_EXPRESSION_LEN} characters"));
    }

    let mut parser = Parser { input: &expr, pos: 0 };
    let value = parser.sum()?;
    match parser.peek() {
        None => Ok(value),
        Some(b')') => Err("Unbalanced parentheses".into()),
        Some(other) => Err(format!("Unexpected '{}'", other as char)),
    }
}

/// Recursive-descent parser; depth is bounded by the input length
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn sum(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.product()?;
        loop {
            if self.eat(b'+') {
                value += self.product()?;
            } else if self.eat(b'-') {
                value -= self.product()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn product(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.power()?;
        loop {
            if self.eat(b'*') {
                value *= self.power()?;
            } else if self.eat(b'/') {
                let divisor = self.power()?;
                if divisor == 0.0 {
                    return Err("Division by zero".into());
                }
                value /= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    // Right-associative: 2^3^2 == 2^9
    fn power(&mut self) -> std::result::Result<f64, String> {
        let base = self.unary()?;
        if self.eat(b'^') {
            Ok(base.powf(self.power()?))
        } else {
            Ok(base)
        }
    }

    fn unary(&mut self) -> std::result::Result<f64, String> {
        if self.eat(b'-') {
            Ok(-self.unary()?)
        } else if self.eat(b'+') {
            self.unary()
        } else {
            self.atom()
        }
    }

    fn atom(&mut self) -> std::result::Result<f64, String> {
        if self.eat(b'(') {
            let value = self.sum()?;
            if !self.eat(b')') {
                return Err("Unbalanced parentheses".into());
            }
            return Ok(value);
        }

        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9' | b'.')) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(other) => format!("Unexpected '{}'", other as char),
                None => "Unexpected end of expression".into(),
            });
        }

        let literal = String::from_utf8_lossy(&self.input[start..self.pos]);
        literal.parse::<f64>().map_err(|e| format!("Parse error: {e}"))
    }
}
