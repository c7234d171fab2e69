use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Number(f64),
    String(Rc<str>),
    Word(Word),
    Operator(Operator),
    Ident(Rc<str>),
    Arg(usize),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
}

impl Token {
    pub fn from_string(s: &str) -> Option<Token> {
        if let Some(word) = Word::from_string(s) {
            return Some(Token::Word(word));
        }
        if let Some(op) = Operator::from_string(s) {
            return Some(Token::Operator(op));
        }
        match s {
            "(" => Some(Token::LParen),
            ")" => Some(Token::RParen),
            "{" => Some(Token::LBrace),
            "}" => Some(Token::RBrace),
            "," => Some(Token::Comma),
            ";" => Some(Token::Semicolon),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Number(n) => write!(f, "{}", n),
            String(s) => write!(f, "\"{}\"", s),
            Word(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            Arg(n) => write!(f, "${}", n),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            LBrace => write!(f, "{{"),
            RBrace => write!(f, "}}"),
            Comma => write!(f, ","),
            Semicolon => write!(f, ";"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Word {
    Else,
    For,
    Func,
    If,
    Print,
    Proc,
    Read,
    Return,
    While,
}

impl Word {
    pub const ALL: [Word; 9] = [
        Word::Else,
        Word::For,
        Word::Func,
        Word::If,
        Word::Print,
        Word::Proc,
        Word::Read,
        Word::Return,
        Word::While,
    ];

    pub fn from_string(s: &str) -> Option<Word> {
        Word::ALL.iter().find(|w| w.to_string() == s).copied()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            Else => write!(f, "else"),
            For => write!(f, "for"),
            Func => write!(f, "func"),
            If => write!(f, "if"),
            Print => write!(f, "print"),
            Proc => write!(f, "proc"),
            Read => write!(f, "read"),
            Return => write!(f, "return"),
            While => write!(f, "while"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    Modulo,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
    Increment,
    Decrement,
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
}

impl Operator {
    const ALL: [Operator; 23] = [
        Operator::Caret,
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulo,
        Operator::Plus,
        Operator::Minus,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Not,
        Operator::And,
        Operator::Or,
        Operator::Increment,
        Operator::Decrement,
        Operator::Assign,
        Operator::AddAssign,
        Operator::SubtractAssign,
        Operator::MultiplyAssign,
        Operator::DivideAssign,
        Operator::ModuloAssign,
    ];

    pub fn from_string(s: &str) -> Option<Operator> {
        Operator::ALL.iter().find(|op| op.to_string() == s).copied()
    }

    pub fn is_assignment(&self) -> bool {
        use Operator::*;
        matches!(
            self,
            Assign | AddAssign | SubtractAssign | MultiplyAssign | DivideAssign | ModuloAssign
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Caret => write!(f, "^"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulo => write!(f, "%"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "=="),
            NotEqual => write!(f, "!="),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "!"),
            And => write!(f, "&&"),
            Or => write!(f, "||"),
            Increment => write!(f, "++"),
            Decrement => write!(f, "--"),
            Assign => write!(f, "="),
            AddAssign => write!(f, "+="),
            SubtractAssign => write!(f, "-="),
            MultiplyAssign => write!(f, "*="),
            DivideAssign => write!(f, "/="),
            ModuloAssign => write!(f, "%="),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let t = Token::from_string("while");
        assert_eq!(t, Some(Token::Word(Word::While)));
        let t = Token::from_string("%=");
        assert_eq!(t, Some(Token::Operator(Operator::ModuloAssign)));
        let t = Token::from_string("pickles");
        assert_eq!(t, None);
    }
}
