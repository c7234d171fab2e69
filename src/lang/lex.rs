use super::token::*;

/// Splits source text into tokens, each tagged with its 1-based line.
pub fn lex(s: &str) -> Vec<(usize, Token)> {
    MinicLexer::lex(s)
}

fn is_minic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

fn is_minic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_minic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

struct MinicLexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl MinicLexer {
    fn lex(s: &str) -> Vec<(usize, Token)> {
        let mut lexer = MinicLexer {
            chars: s.chars().collect(),
            pos: 0,
            line: 1,
        };
        let mut tokens: Vec<(usize, Token)> = vec![];
        while let Some(ch) = lexer.peek(0) {
            if is_minic_whitespace(ch) {
                lexer.whitespace();
                continue;
            }
            if lexer.comment() {
                continue;
            }
            let line = lexer.line;
            let token = if is_minic_digit(ch) || (ch == '.' && lexer.peek_is(1, is_minic_digit)) {
                lexer.number()
            } else if is_minic_alphabetic(ch) {
                lexer.alphabetic()
            } else if ch == '"' {
                lexer.string()
            } else if ch == '$' {
                lexer.argument()
            } else {
                lexer.minutia()
            };
            tokens.push((line, token));
        }
        tokens
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn peek_is(&self, ahead: usize, f: fn(char) -> bool) -> bool {
        self.peek(ahead).map_or(false, f)
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek(0)?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn whitespace(&mut self) {
        while self.peek_is(0, is_minic_whitespace) {
            self.next();
        }
    }

    fn comment(&mut self) -> bool {
        match (self.peek(0), self.peek(1)) {
            (Some('/'), Some('*')) => {
                self.next();
                self.next();
                loop {
                    match self.next() {
                        Some('*') if self.peek(0) == Some('/') => {
                            self.next();
                            break;
                        }
                        Some(_) => continue,
                        None => break,
                    }
                }
                true
            }
            (Some('/'), Some('/')) | (Some('#'), _) => {
                while let Some(ch) = self.next() {
                    if ch == '\n' {
                        break;
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn digits(&mut self, s: &mut String) {
        while let Some(ch) = self.peek(0) {
            if !is_minic_digit(ch) {
                break;
            }
            s.push(ch);
            self.next();
        }
    }

    fn number(&mut self) -> Token {
        let mut s = String::new();
        self.digits(&mut s);
        if self.peek(0) == Some('.') {
            s.push('.');
            self.next();
            self.digits(&mut s);
        }
        if let Some('e') | Some('E') = self.peek(0) {
            let sign = matches!(self.peek(1), Some('+') | Some('-'));
            let first_digit = if sign { 2 } else { 1 };
            if self.peek_is(first_digit, is_minic_digit) {
                s.push('e');
                self.next();
                if sign {
                    if let Some(ch) = self.next() {
                        s.push(ch);
                    }
                }
                self.digits(&mut s);
            }
        }
        match s.parse::<f64>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Unknown(s),
        }
    }

    fn string(&mut self) -> Token {
        let mut s = String::new();
        self.next();
        loop {
            match self.peek(0) {
                Some('"') => {
                    self.next();
                    return Token::String(s.into());
                }
                Some('\\') if self.peek(1).map_or(false, |c| c != '\n') => {
                    s.push('\\');
                    self.next();
                    if let Some(ch) = self.next() {
                        s.push(ch);
                    }
                }
                Some('\n') | None => {
                    return Token::Unknown(format!("\"{}", s));
                }
                Some(ch) => {
                    s.push(ch);
                    self.next();
                }
            }
        }
    }

    fn alphabetic(&mut self) -> Token {
        let mut s = String::new();
        while let Some(ch) = self.peek(0) {
            if !is_minic_alphabetic(ch) && !is_minic_digit(ch) {
                break;
            }
            s.push(ch);
            self.next();
        }
        if let Some(word) = Word::from_string(&s) {
            return Token::Word(word);
        }
        Token::Ident(s.into())
    }

    fn argument(&mut self) -> Token {
        self.next();
        let mut s = String::new();
        self.digits(&mut s);
        match s.parse::<usize>() {
            Ok(n) => Token::Arg(n),
            Err(_) => Token::Unknown(format!("${}", s)),
        }
    }

    fn minutia(&mut self) -> Token {
        if let (Some(a), Some(b)) = (self.peek(0), self.peek(1)) {
            let pair: String = [a, b].iter().collect();
            if let Some(token) = Token::from_string(&pair) {
                self.next();
                self.next();
                return token;
            }
        }
        let mut s = String::new();
        if let Some(ch) = self.next() {
            s.push(ch);
        }
        match Token::from_string(&s) {
            Some(token) => token,
            None => Token::Unknown(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<Token> {
        lex(s).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 2.5 .5 3. 1e3 2E-2"),
            vec![
                Token::Number(1.0),
                Token::Number(2.5),
                Token::Number(0.5),
                Token::Number(3.0),
                Token::Number(1000.0),
                Token::Number(0.02),
            ]
        );
    }

    #[test]
    fn test_exponent_needs_digits() {
        assert_eq!(
            tokens("2e"),
            vec![Token::Number(2.0), Token::Ident("e".into())]
        );
    }

    #[test]
    fn test_line_numbers() {
        let v = lex("a\n/* one\ntwo */ b // c\n# d\ne");
        let lines: Vec<usize> = v.iter().map(|(l, _)| *l).collect();
        assert_eq!(lines, vec![1, 3, 5]);
    }
}
