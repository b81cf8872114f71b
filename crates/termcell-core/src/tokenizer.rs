//! Escape-sequence tokenizer
//!
//! Splits raw terminal output into discrete tokens: literal characters,
//! single-byte control functions, and fully-matched escape sequences. The
//! grammar is the single regular expression below, tried alternative by
//! alternative at each position; input nothing matches is reported once per
//! span and skipped. Tokenization is stateless per call — a sequence split
//! across two writes does not reassemble.

use std::sync::OnceLock;

use regex::{CaptureMatches, Captures, Regex};

/// Single-byte control functions with dedicated handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlByte {
    Bell,
    CarriageReturn,
    LineFeed,
    Tab,
    Backspace,
}

/// How an escape sequence was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// Control sequence introducer: `ESC [` or the C1 byte 0x9B.
    Csi,
    /// CSI carrying the private-mode marker `?`.
    CsiPrivate,
    /// G0 charset designation (`ESC (`).
    CharsetG0,
    /// G1 charset designation (`ESC )`).
    CharsetG1,
    /// DEC line-attribute forms (`ESC #`).
    Dec,
    /// Bare escape followed directly by its final byte.
    Bare,
    /// Function-key form (`ESC O` plus a lowercase letter).
    FunctionKey,
    /// Private full-reset form (`ESC ] R`).
    Reset,
}

/// A fully-matched escape sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeSeq {
    pub kind: EscapeKind,
    /// Semicolon-delimited numeric parameters; an empty parameter reads
    /// as 0.
    pub params: Vec<u16>,
    /// Terminating byte selecting the operation.
    pub final_byte: char,
}

/// Unit of work produced by the tokenizer and consumed by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A character written at the cursor.
    Literal(char),
    /// A single-byte control function.
    Control(ControlByte),
    /// A matched escape sequence.
    Escape(EscapeSeq),
    /// A title-set sequence carrying the captured text.
    Title(String),
    /// Input that matched no grammar rule; diagnostic only, never applied
    /// to state.
    Unrecognized(String),
}

// Alternatives, in priority order: escape sequence (selector run, optional
// 1-4 digit parameters with 0-4 digit continuations, then either `O` plus a
// lowercase letter or a single final byte), title set, private reset, any
// single character. Only the Unicode line/paragraph separators match
// nothing. Greedy parameter digits are surrendered when they would leave no
// final byte.
const GRAMMAR: &str = concat!(
    r"[\x1b\u{9b}]([\[()#;?]*)((?:[0-9]{1,4}(?:;[0-9]{0,4})*)?)(O[a-z]|[0-9A-Za-z=><@])",
    r"|\x1b\]0;([^\x07]*)\x07",
    r"|\x1b\]R",
    r"|[^\u{2028}\u{2029}]",
);

fn grammar() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(GRAMMAR).expect("token grammar compiles"))
}

/// Lazy token stream over one chunk of input.
pub struct Tokenizer<'a> {
    input: &'a str,
    matches: CaptureMatches<'static, 'a>,
    /// Start of input not yet covered by a match.
    scan: usize,
    /// Token held back while an unrecognized gap is reported first.
    pending: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            matches: grammar().captures_iter(input),
            scan: 0,
            pending: None,
        }
    }

    fn skipped(&mut self, upto: usize) -> Token {
        let span = &self.input[self.scan..upto];
        self.scan = upto;
        log::warn!("ignored data: {span:?}");
        Token::Unrecognized(span.to_string())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        match self.matches.next() {
            Some(caps) => {
                let m = caps.get(0).expect("whole match");
                let start = m.start();
                let end = m.end();
                let token = token_from(&caps);
                if start > self.scan {
                    let gap = self.skipped(start);
                    self.scan = end;
                    self.pending = Some(token);
                    return Some(gap);
                }
                self.scan = end;
                Some(token)
            }
            None if self.scan < self.input.len() => Some(self.skipped(self.input.len())),
            None => None,
        }
    }
}

fn token_from(caps: &Captures<'_>) -> Token {
    if let Some(fin) = caps.get(3) {
        return Token::Escape(escape_from(caps, fin.as_str()));
    }
    if let Some(title) = caps.get(4) {
        return Token::Title(title.as_str().to_string());
    }
    let text = &caps[0];
    if text == "\x1b]R" {
        return Token::Escape(EscapeSeq {
            kind: EscapeKind::Reset,
            params: Vec::new(),
            final_byte: 'R',
        });
    }
    match text {
        "\x07" => Token::Control(ControlByte::Bell),
        "\x08" => Token::Control(ControlByte::Backspace),
        "\r" => Token::Control(ControlByte::CarriageReturn),
        "\n" => Token::Control(ControlByte::LineFeed),
        "\t" => Token::Control(ControlByte::Tab),
        other => match other.chars().next() {
            Some(c) => Token::Literal(c),
            None => Token::Unrecognized(String::new()),
        },
    }
}

fn escape_from(caps: &Captures<'_>, fin: &str) -> EscapeSeq {
    let selector = caps.get(1).map_or("", |m| m.as_str());
    let raw_params = caps.get(2).map_or("", |m| m.as_str());

    let mut params: Vec<u16> = Vec::new();
    // Semicolons swallowed by the selector run read as leading empty
    // parameters.
    for _ in selector.chars().filter(|&c| c == ';') {
        params.push(0);
    }
    if !raw_params.is_empty() {
        params.extend(raw_params.split(';').map(|p| p.parse().unwrap_or(0)));
    }

    let kind = if fin.len() == 2 {
        EscapeKind::FunctionKey
    } else if selector.contains('[') || caps[0].starts_with('\u{9b}') {
        if selector.contains('?') {
            EscapeKind::CsiPrivate
        } else {
            EscapeKind::Csi
        }
    } else if selector.starts_with('(') {
        EscapeKind::CharsetG0
    } else if selector.starts_with(')') {
        EscapeKind::CharsetG1
    } else if selector.starts_with('#') {
        EscapeKind::Dec
    } else {
        EscapeKind::Bare
    };

    EscapeSeq {
        kind,
        params,
        final_byte: fin.chars().last().unwrap_or(' '),
    }
}
