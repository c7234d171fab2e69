use super::{ast::*, token::*, Error, LineNumber};
use crate::mach::{Kind, Symbols};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Builds a [`Program`] from lexed tokens, installing names and literals
/// into `symbols` as it goes. Definitions change the kind of their name
/// immediately so later calls resolve. Statements and subexpressions
/// may nest at most `depth` levels.
pub fn parse(tokens: &[(usize, Token)], symbols: &mut Symbols, depth: usize) -> Result<Program> {
    Parser::parse(tokens, symbols, depth)
}

const UNARY_PRECEDENCE: usize = 7;

struct Parser<'a> {
    tokens: &'a [(usize, Token)],
    pos: usize,
    symbols: &'a mut Symbols,
    indef: Option<Kind>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn parse(
        tokens: &'a [(usize, Token)],
        symbols: &'a mut Symbols,
        max_depth: usize,
    ) -> Result<Program> {
        let mut parse = Parser {
            tokens,
            pos: 0,
            symbols,
            indef: None,
            depth: 0,
            max_depth,
        };
        let mut program = Program::default();
        while let Some(token) = parse.peek(0) {
            match token {
                Token::Semicolon => {
                    parse.next();
                }
                Token::Word(Word::Func) | Token::Word(Word::Proc) => {
                    let definition = parse.definition()?;
                    program.statements.push(definition);
                }
                _ => program.statements.append(&mut parse.statement()?),
            }
        }
        Ok(program)
    }

    fn peek(&self, ahead: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + ahead).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos).map(|(_, t)| t);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn line(&self) -> LineNumber {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(line, _)| *line)
    }

    fn syntax_error(&self, message: &str) -> Error {
        error!(SyntaxError, self.line(); message)
    }

    fn unexpected(&self) -> Error {
        match self.peek(0) {
            Some(Token::Unknown(s)) => error!(IllegalCharacter, self.line(); s),
            Some(t) => self.syntax_error(&format!("unexpected '{}'", t)),
            None => self.syntax_error("unexpected end of input"),
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if self.peek(0) == Some(&token) {
            self.next();
            return Ok(());
        }
        if let Some(Token::Unknown(_)) = self.peek(0) {
            return Err(self.unexpected());
        }
        Err(self.syntax_error(&format!("expected '{}'", token)))
    }

    fn ident(&mut self) -> Result<Rc<str>> {
        match self.peek(0) {
            Some(Token::Ident(name)) => {
                self.next();
                Ok(name.clone())
            }
            _ => Err(self.syntax_error("expected identifier")),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Parser<'a>) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(error!(NestedTooDeeply, self.line()));
        }
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    fn terminator(&mut self) {
        if self.peek(0) == Some(&Token::Semicolon) {
            self.next();
        }
    }

    fn definition(&mut self) -> Result<Statement> {
        let kind = match self.next() {
            Some(Token::Word(Word::Func)) => Kind::Function,
            _ => Kind::Procedure,
        };
        let name = self.ident()?;
        let id = self.symbols.resolve(&name);
        if self.symbols.get(id).kind() == Kind::Builtin {
            return Err(self.syntax_error(&format!("cannot redefine {}", name)));
        }
        self.symbols.get_mut(id).kind = kind;
        self.expect(Token::LParen)?;
        self.expect(Token::RParen)?;
        self.indef = Some(kind);
        let body = self.statement();
        self.indef = None;
        let body = body?;
        Ok(match kind {
            Kind::Function => Statement::Function(id, body),
            _ => Statement::Procedure(id, body),
        })
    }

    /// One syntactic statement; a block yields all of its statements.
    fn statement(&mut self) -> Result<Vec<Statement>> {
        self.nested(Parser::any_statement)
    }

    fn any_statement(&mut self) -> Result<Vec<Statement>> {
        let statement = match self.peek(0) {
            Some(Token::LBrace) => return self.block(),
            Some(Token::Word(Word::Print)) => {
                self.next();
                Statement::Print(self.print_list()?)
            }
            Some(Token::Word(Word::While)) => {
                self.next();
                let cond = self.condition()?;
                Statement::While(cond, self.statement()?)
            }
            Some(Token::Word(Word::For)) => return self.r#for(),
            Some(Token::Word(Word::If)) => return self.r#if(),
            Some(Token::Word(Word::Return)) => self.r#return()?,
            Some(Token::Word(Word::Read)) => self.simple()?,
            Some(Token::Word(_)) => return Err(self.unexpected()),
            Some(Token::Ident(name)) if self.peek(1) == Some(&Token::LParen) => {
                match self.symbols.lookup(name) {
                    Some(id) if self.symbols.get(id).kind() == Kind::Procedure => {
                        self.next();
                        Statement::Call(id, self.argument_list()?)
                    }
                    _ => self.simple()?,
                }
            }
            _ => self.simple()?,
        };
        self.terminator();
        Ok(vec![statement])
    }

    fn block(&mut self) -> Result<Vec<Statement>> {
        self.expect(Token::LBrace)?;
        let mut v = vec![];
        loop {
            match self.peek(0) {
                Some(Token::RBrace) => {
                    self.next();
                    return Ok(v);
                }
                Some(Token::Semicolon) => {
                    self.next();
                }
                None => return Err(self.syntax_error("expected '}'")),
                Some(_) => v.append(&mut self.statement()?),
            }
        }
    }

    /// Assignment or expression, as allowed in for-loop clauses.
    fn simple(&mut self) -> Result<Statement> {
        match (self.peek(0), self.peek(1)) {
            (Some(Token::Ident(name)), Some(Token::Operator(op))) if op.is_assignment() => {
                let (name, op) = (name.clone(), *op);
                self.next();
                self.next();
                let target = self.symbols.resolve(&name);
                Ok(Statement::Assignment(op, target, self.expression()?))
            }
            (Some(Token::Arg(n)), Some(Token::Operator(Operator::Assign))) => {
                let n = *n;
                self.argument(n)?;
                self.next();
                self.next();
                Ok(Statement::ArgAssignment(n, self.expression()?))
            }
            _ => Ok(Statement::Expression(self.expression()?)),
        }
    }

    fn condition(&mut self) -> Result<Expression> {
        self.expect(Token::LParen)?;
        let cond = self.expression()?;
        self.expect(Token::RParen)?;
        Ok(cond)
    }

    fn r#for(&mut self) -> Result<Vec<Statement>> {
        self.next();
        self.expect(Token::LParen)?;
        let init = self.simple()?;
        self.expect(Token::Semicolon)?;
        let cond = self.expression()?;
        self.expect(Token::Semicolon)?;
        let post = self.simple()?;
        self.expect(Token::RParen)?;
        let body = self.statement()?;
        Ok(vec![Statement::For(
            Box::new(init),
            cond,
            Box::new(post),
            body,
        )])
    }

    fn r#if(&mut self) -> Result<Vec<Statement>> {
        self.next();
        let cond = self.condition()?;
        let then = self.statement()?;
        let otherwise = match self.peek(0) {
            Some(Token::Word(Word::Else)) => {
                self.next();
                Some(self.statement()?)
            }
            _ => None,
        };
        Ok(vec![Statement::If(cond, then, otherwise)])
    }

    fn r#return(&mut self) -> Result<Statement> {
        if self.indef.is_none() {
            return Err(error!(DefinitionOnly, self.line(); "return"));
        }
        self.next();
        match self.peek(0) {
            None | Some(Token::Semicolon) | Some(Token::RBrace) => Ok(Statement::Return(None)),
            Some(Token::Word(w)) if *w != Word::Read => Ok(Statement::Return(None)),
            _ => Ok(Statement::Return(Some(self.expression()?))),
        }
    }

    fn print_list(&mut self) -> Result<Vec<Expression>> {
        let mut v = vec![];
        loop {
            match self.peek(0) {
                Some(Token::String(s)) => {
                    self.next();
                    v.push(Expression::String(self.symbols.install_string(s.clone())));
                }
                _ => v.push(self.expression()?),
            }
            match self.peek(0) {
                Some(Token::Comma) => {
                    self.next();
                }
                _ => return Ok(v),
            }
        }
    }

    fn argument_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v = vec![];
        if self.peek(0) == Some(&Token::RParen) {
            self.next();
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.peek(0) {
                Some(Token::RParen) => {
                    self.next();
                    return Ok(v);
                }
                Some(Token::Comma) => {
                    self.next();
                }
                _ => return Err(self.syntax_error("expected ',' or ')'")),
            }
        }
    }

    fn argument(&self, n: usize) -> Result<()> {
        if self.indef.is_none() {
            return Err(error!(DefinitionOnly, self.line(); &format!("${}", n)));
        }
        if n == 0 {
            return Err(self.syntax_error("$0"));
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Expression> {
        self.binary(1)
    }

    fn binary(&mut self, precedence: usize) -> Result<Expression> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek(0) {
                Some(Token::Operator(op)) => *op,
                _ => break,
            };
            let op_precedence = match Parser::op_precedence(op) {
                Some(p) if p >= precedence => p,
                _ => break,
            };
            self.next();
            let rhs_precedence = if op == Operator::Caret {
                op_precedence
            } else {
                op_precedence + 1
            };
            let rhs = self.nested(|parse| parse.binary(rhs_precedence))?;
            lhs = Expression::Binop(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expression> {
        self.nested(Parser::prefix)
    }

    fn prefix(&mut self) -> Result<Expression> {
        match self.peek(0) {
            Some(Token::Operator(op)) if *op == Operator::Minus || *op == Operator::Not => {
                let op = *op;
                self.next();
                let operand = self.binary(UNARY_PRECEDENCE)?;
                Ok(Expression::Unaryop(op, Box::new(operand)))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expression> {
        match self.peek(0) {
            Some(Token::Number(n)) => {
                self.next();
                Ok(Expression::Literal(self.symbols.install_number(*n)))
            }
            Some(Token::LParen) => {
                self.next();
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => {
                self.next();
                self.named(name)
            }
            Some(Token::Arg(n)) => {
                self.argument(*n)?;
                self.next();
                Ok(Expression::Arg(*n))
            }
            Some(Token::Word(Word::Read)) => {
                self.next();
                self.expect(Token::LParen)?;
                let name = self.ident()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Read(self.symbols.resolve(&name)))
            }
            Some(Token::Operator(Operator::Increment)) => {
                self.next();
                let name = self.ident()?;
                Ok(Expression::Preinc(self.symbols.resolve(&name)))
            }
            Some(Token::Operator(Operator::Decrement)) => {
                self.next();
                let name = self.ident()?;
                Ok(Expression::Predec(self.symbols.resolve(&name)))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// An identifier already consumed in expression position.
    fn named(&mut self, name: &Rc<str>) -> Result<Expression> {
        let id = self.symbols.lookup(name);
        let kind = id.map(|id| self.symbols.get(id).kind());
        match (id, kind) {
            (Some(id), Some(Kind::Builtin)) => {
                self.expect(Token::LParen)?;
                let arg = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Bltin(id, Box::new(arg)))
            }
            (Some(id), Some(Kind::Function)) => {
                Ok(Expression::Call(id, self.argument_list()?))
            }
            (_, Some(Kind::Procedure)) => {
                Err(self.syntax_error(&format!("procedure {} used in expression", name)))
            }
            _ if self.peek(0) == Some(&Token::LParen) => {
                Err(self.syntax_error(&format!("undefined function {}", name)))
            }
            _ => {
                let id = self.symbols.resolve(name);
                match self.peek(0) {
                    Some(Token::Operator(Operator::Increment)) => {
                        self.next();
                        Ok(Expression::Postinc(id))
                    }
                    Some(Token::Operator(Operator::Decrement)) => {
                        self.next();
                        Ok(Expression::Postdec(id))
                    }
                    _ => Ok(Expression::Variable(id)),
                }
            }
        }
    }

    fn op_precedence(op: Operator) -> Option<usize> {
        use Operator::*;
        match op {
            Or => Some(1),
            And => Some(2),
            Equal | NotEqual => Some(3),
            Less | LessEqual | Greater | GreaterEqual => Some(4),
            Plus | Minus => Some(5),
            Multiply | Divide | Modulo => Some(6),
            Caret => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use super::*;

    fn parse_str(s: &str) -> Result<(Program, Symbols)> {
        let mut symbols = Symbols::default();
        let program = parse(&lex(s), &mut symbols, 200)?;
        Ok((program, symbols))
    }

    #[test]
    fn test_nesting_limit() {
        let mut symbols = Symbols::default();
        assert!(parse(&lex("if (1) if (1) x = 1"), &mut symbols, 4).is_ok());
        let e = parse(&lex("if (1) if (1) x = -1"), &mut symbols, 4).unwrap_err();
        assert_eq!(e.to_string(), "nested too deeply in line 1");
        let e = parse(&lex("if (1) if (1) if (1) if (1) x = 1"), &mut symbols, 4).unwrap_err();
        assert_eq!(e.code(), crate::lang::ErrorCode::NestedTooDeeply);
        let e = parse(&lex("\n\nprint 2^2^2^2^2"), &mut symbols, 4).unwrap_err();
        assert_eq!(e.to_string(), "nested too deeply in line 3");
    }

    #[test]
    fn test_caret_is_right_associative() {
        let (program, _) = parse_str("2^3^2").unwrap();
        match &program.statements[0] {
            Statement::Expression(Expression::Binop(Operator::Caret, _, rhs)) => {
                assert!(matches!(**rhs, Expression::Binop(Operator::Caret, _, _)));
            }
            s => panic!("{:?}", s),
        }
    }

    #[test]
    fn test_unary_minus_binds_looser_than_caret() {
        let (program, _) = parse_str("-2^2").unwrap();
        match &program.statements[0] {
            Statement::Expression(Expression::Unaryop(Operator::Minus, operand)) => {
                assert!(matches!(**operand, Expression::Binop(Operator::Caret, _, _)));
            }
            s => panic!("{:?}", s),
        }
    }

    #[test]
    fn test_block_is_flattened() {
        let (program, _) = parse_str("{ x = 1; { y = 2 } ; print x }").unwrap();
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_definition_sets_kind() {
        let (program, symbols) = parse_str("proc p() print $1\np(3)").unwrap();
        let p = symbols.lookup("p").unwrap();
        assert_eq!(symbols.get(p).kind(), Kind::Procedure);
        assert!(program.statements[0].is_definition());
        assert!(matches!(program.statements[1], Statement::Call(id, _) if id == p));
    }

    #[test]
    fn test_definition_only() {
        let e = parse_str("x = $1").unwrap_err();
        assert_eq!(e.code(), crate::lang::ErrorCode::DefinitionOnly);
        let e = parse_str("\nreturn 1").unwrap_err();
        assert_eq!(e.to_string(), "used outside definition in line 2; return");
    }

    #[test]
    fn test_illegal_character() {
        let e = parse_str("x = 1 @ 2").unwrap_err();
        assert_eq!(e.to_string(), "illegal character in line 1; @");
    }
}
