//! Line-oriented parser for Quil source.

use logos::Logos;
use std::f64::consts::PI;

use crate::error::{QuilError, QuilResult};
use crate::lexer::Token;
use crate::program::{MemoryRef, Program, QuilInstruction};

/// Parse Quil source text into a [`Program`].
pub fn parse(source: &str) -> QuilResult<Program> {
    let mut tokens = Vec::new();
    let mut line = 1;
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(Token::Newline) => {
                tokens.push((Token::Newline, line));
                line += 1;
            }
            Ok(token) => tokens.push((token, line)),
            Err(()) => {
                let line = source[..span.start].matches('\n').count() + 1;
                return Err(QuilError::Lexer { line });
            }
        }
    }
    Parser { tokens, pos: 0 }.parse_program()
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn parse_program(&mut self) -> QuilResult<Program> {
        let mut program = Program::new();
        loop {
            while self.consume(&Token::Newline) {}
            if self.peek().is_none() {
                break;
            }
            program.push(self.parse_instruction()?);
            if self.peek().is_some() && !self.consume(&Token::Newline) {
                return Err(self.unexpected("end of line"));
            }
        }
        Ok(program)
    }

    fn parse_instruction(&mut self) -> QuilResult<QuilInstruction> {
        let (token, line) = self
            .peek_entry()
            .cloned()
            .ok_or_else(|| QuilError::UnexpectedEof("instruction".into()))?;

        match token {
            Token::Declare => self.parse_declare(),
            Token::Pragma => self.parse_pragma(),
            Token::Reset => self.parse_reset(),
            Token::Measure => self.parse_measure(line),
            Token::Identifier(name) => {
                self.advance();
                self.parse_gate(name, line)
            }
            _ => Err(self.unexpected("instruction")),
        }
    }

    /// `DECLARE name BIT` or `DECLARE name BIT[size]`.
    fn parse_declare(&mut self) -> QuilResult<QuilInstruction> {
        self.advance(); // DECLARE
        let name = self.expect_identifier("memory region name")?;
        self.expect(&Token::Bit, "BIT")?;
        let size = if self.consume(&Token::LBracket) {
            let size = self.expect_u32("region size")?;
            self.expect(&Token::RBracket, "']'")?;
            size
        } else {
            1
        };
        Ok(QuilInstruction::Declare { name, size })
    }

    /// `PRAGMA name arg... ["data"]`.
    fn parse_pragma(&mut self) -> QuilResult<QuilInstruction> {
        self.advance(); // PRAGMA
        let name = self.expect_identifier("pragma name")?;
        let mut args = Vec::new();
        let mut data = None;
        loop {
            match self.peek() {
                Some(Token::Identifier(arg)) => {
                    args.push(arg.clone());
                    self.advance();
                }
                Some(Token::IntLiteral(v)) => {
                    args.push(v.to_string());
                    self.advance();
                }
                Some(Token::StringLiteral(s)) => {
                    data = Some(s.clone());
                    self.advance();
                    break;
                }
                _ => break,
            }
        }
        Ok(QuilInstruction::Pragma { name, args, data })
    }

    /// `RESET` or `RESET q`.
    fn parse_reset(&mut self) -> QuilResult<QuilInstruction> {
        self.advance(); // RESET
        if matches!(self.peek(), Some(Token::IntLiteral(_))) {
            let qubit = self.expect_u32("qubit index")?;
            Ok(QuilInstruction::ResetQubit { qubit })
        } else {
            Ok(QuilInstruction::Reset)
        }
    }

    /// `MEASURE q name[index]`.
    fn parse_measure(&mut self, line: usize) -> QuilResult<QuilInstruction> {
        self.advance(); // MEASURE
        let qubit = self.expect_u32("qubit index")?;
        let name = match self.peek() {
            Some(Token::Identifier(_)) => self.expect_identifier("memory reference")?,
            _ => return Err(QuilError::MeasureWithoutTarget { line }),
        };
        self.expect(&Token::LBracket, "'['")?;
        let index = self.expect_u32("memory index")?;
        self.expect(&Token::RBracket, "']'")?;
        Ok(QuilInstruction::Measure {
            qubit,
            target: MemoryRef::new(name, index),
        })
    }

    /// `NAME 0 1` or `NAME(expr, expr) 0 1`.
    fn parse_gate(&mut self, name: String, line: usize) -> QuilResult<QuilInstruction> {
        let mut params = Vec::new();
        if self.consume(&Token::LParen) {
            loop {
                params.push(self.parse_expr()?);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::RParen, "')'")?;
        }

        let mut qubits = Vec::new();
        while matches!(self.peek(), Some(Token::IntLiteral(_))) {
            qubits.push(self.expect_u32("qubit index")?);
        }
        if qubits.is_empty() {
            return Err(QuilError::MissingQubits { gate: name, line });
        }

        Ok(QuilInstruction::Gate {
            name,
            params,
            qubits,
        })
    }

    // =========================================================================
    // Parameter expressions
    // =========================================================================

    /// Additive expression: `term (('+' | '-') term)*`.
    fn parse_expr(&mut self) -> QuilResult<f64> {
        let mut value = self.parse_term()?;
        loop {
            if self.consume(&Token::Plus) {
                value += self.parse_term()?;
            } else if self.consume(&Token::Minus) {
                value -= self.parse_term()?;
            } else {
                return Ok(value);
            }
        }
    }

    /// Multiplicative expression: `factor (('*' | '/') factor)*`.
    fn parse_term(&mut self) -> QuilResult<f64> {
        let mut value = self.parse_factor()?;
        loop {
            if self.consume(&Token::Star) {
                value *= self.parse_factor()?;
            } else if self.consume(&Token::Slash) {
                value /= self.parse_factor()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn parse_factor(&mut self) -> QuilResult<f64> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_factor()?);
        }
        match self.peek().cloned() {
            Some(Token::FloatLiteral(v)) => {
                self.advance();
                Ok(v)
            }
            Some(Token::IntLiteral(v)) => {
                self.advance();
                Ok(v as f64)
            }
            Some(Token::Pi) => {
                self.advance();
                Ok(PI)
            }
            Some(Token::LParen) => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(value)
            }
            Some(_) => Err(self.unexpected("parameter expression")),
            None => Err(QuilError::UnexpectedEof("parameter expression".into())),
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn peek_entry(&self) -> Option<&(Token, usize)> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_entry().map(|(t, _)| t)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> QuilResult<()> {
        if self.consume(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> QuilResult<String> {
        match self.peek().cloned() {
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(name)
            }
            Some(_) => Err(self.unexpected(expected)),
            None => Err(QuilError::UnexpectedEof(expected.into())),
        }
    }

    fn expect_u32(&mut self, expected: &str) -> QuilResult<u32> {
        match self.peek().cloned() {
            Some(Token::IntLiteral(v)) => {
                if let Ok(v) = u32::try_from(v) {
                    self.advance();
                    Ok(v)
                } else {
                    Err(self.unexpected(expected))
                }
            }
            Some(_) => Err(self.unexpected(expected)),
            None => Err(QuilError::UnexpectedEof(expected.into())),
        }
    }

    fn unexpected(&self, expected: &str) -> QuilError {
        match self.peek_entry() {
            Some((token, line)) => QuilError::UnexpectedToken {
                line: *line,
                expected: expected.into(),
                found: token.describe(),
            },
            None => QuilError::UnexpectedEof(expected.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_program() {
        let source = "DECLARE ro BIT[2]\nH 0\nCNOT 0 1\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]\n";
        let program = parse(source).unwrap();
        assert_eq!(program.len(), 5);
        assert_eq!(program.declared_size("ro"), Some(2));
        assert_eq!(program.max_qubit(), Some(1));
    }

    #[test]
    fn test_parse_gate_params() {
        let program = parse("RX(pi/2) 0\nCAN(0.1,0.2,0.3) 0 1\n").unwrap();
        match &program.instructions()[0] {
            QuilInstruction::Gate { name, params, .. } => {
                assert_eq!(name, "RX");
                assert_eq!(params, &[PI / 2.0]);
            }
            other => panic!("expected gate, got {other:?}"),
        }
        match &program.instructions()[1] {
            QuilInstruction::Gate { params, qubits, .. } => {
                assert_eq!(params.len(), 3);
                assert_eq!(qubits, &[0, 1]);
            }
            other => panic!("expected gate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_and_compound_angles() {
        let program = parse("RX(-pi/2) 0\nRZ(2*pi) 0\nRZ(pi/2+pi/4) 0\n").unwrap();
        let angles: Vec<f64> = program
            .instructions()
            .iter()
            .map(|inst| match inst {
                QuilInstruction::Gate { params, .. } => params[0],
                other => panic!("expected gate, got {other:?}"),
            })
            .collect();
        assert_eq!(angles[0], -PI / 2.0);
        assert_eq!(angles[1], 2.0 * PI);
        assert!((angles[2] - 3.0 * PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_pragma_and_reset() {
        let program = parse("PRAGMA INITIAL_REWIRING \"PARTIAL\"\nRESET\nRESET 2\n").unwrap();
        assert!(matches!(
            &program.instructions()[0],
            QuilInstruction::Pragma { name, data: Some(d), .. }
                if name == "INITIAL_REWIRING" && d == "PARTIAL"
        ));
        assert!(matches!(program.instructions()[1], QuilInstruction::Reset));
        assert!(matches!(
            program.instructions()[2],
            QuilInstruction::ResetQubit { qubit: 2 }
        ));
    }

    #[test]
    fn test_parse_declare_without_size() {
        let program = parse("DECLARE flag BIT\n").unwrap();
        assert_eq!(program.declared_size("flag"), Some(1));
    }

    #[test]
    fn test_measure_without_target_rejected() {
        let err = parse("MEASURE 0\n").unwrap_err();
        assert!(matches!(err, QuilError::MeasureWithoutTarget { line: 1 }));
    }

    #[test]
    fn test_gate_without_qubits_rejected() {
        let err = parse("H\n").unwrap_err();
        assert!(matches!(err, QuilError::MissingQubits { .. }));
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse("H 0\nMEASURE 0\n").unwrap_err();
        assert!(matches!(err, QuilError::MeasureWithoutTarget { line: 2 }));
    }

    #[test]
    fn test_roundtrip_through_display() {
        let source = "PRAGMA INITIAL_REWIRING \"NAIVE\"\nDECLARE ro BIT[2]\nRZ(pi) 0\nRX(pi/2) 0\nXY(pi) 0 1\nMEASURE 0 ro[0]\n";
        let program = parse(source).unwrap();
        assert_eq!(parse(&program.to_string()).unwrap(), program);
        assert_eq!(program.to_string(), source);
    }
}
