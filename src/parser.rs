//! Regex parser: converts pattern text into an arena AST.
//!
//! Accepts the host's (Python `re`) grammar and rejects malformed text with the same
//! complaints, so a pattern that fails here would fail in the host as well.

use indexmap::IndexMap;

use crate::ast::*;
use crate::error::{Error, Result};
use crate::flags::Flags;

/// A parsed pattern.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub ast: Ast,
    pub root: SeqId,
    /// Caller flags combined with global inline flags such as `(?a)`.
    pub flags: Flags,
    pub group_count: usize,
    pub names: IndexMap<String, usize>,
}

/// One element of a character set before it becomes a node.
enum ClassAtom {
    Char(char),
    Category(Category),
}

pub struct Parser {
    chars: Vec<char>,
    pos: usize,
    flags: Flags,
    ast: Ast,
    group_count: usize,
    names: IndexMap<String, usize>,
    /// Whether each group has been closed; index 0 is the whole match.
    closed: Vec<bool>,
}

impl Parser {
    pub fn new(pattern: &str, flags: Flags) -> Self {
        Parser {
            chars: pattern.chars().collect(),
            pos: 0,
            flags,
            ast: Ast::new(),
            group_count: 0,
            names: IndexMap::new(),
            closed: vec![true],
        }
    }

    /// Parse the full pattern.
    pub fn parse(mut self) -> Result<Parsed> {
        let root = self.parse_alternation(true)?;
        if self.pos < self.chars.len() {
            // the top level only stops early on a ')'
            return self.error("unbalanced parenthesis");
        }
        if self.flags.contains(Flags::ASCII | Flags::UNICODE) {
            return self.error_at("ASCII and UNICODE flags are incompatible", 0);
        }
        if self.flags.contains(Flags::LOCALE) {
            return self.error_at("cannot use LOCALE flag with a str pattern", 0);
        }
        Ok(Parsed {
            ast: self.ast,
            root,
            flags: self.flags,
            group_count: self.group_count,
            names: self.names,
        })
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        self.error_at(message, self.pos)
    }

    fn error_at<T>(&self, message: impl Into<String>, position: usize) -> Result<T> {
        Err(Error::Parse {
            message: message.into(),
            position,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// In verbose mode, skip whitespace and `#` comments.
    fn skip_verbose(&mut self) {
        if !self.flags.contains(Flags::VERBOSE) {
            return;
        }
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') => self.pos += 1,
                Some('#') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Parse alternation: `a|b|c`
    fn parse_alternation(&mut self, top: bool) -> Result<SeqId> {
        let mut branches = vec![self.parse_sequence(top)?];
        while self.eat('|') {
            branches.push(self.parse_sequence(false)?);
        }
        if branches.len() == 1 {
            return Ok(branches[0]);
        }
        let alternation = self.ast.push(Node::Alternation(branches));
        Ok(self.ast.push_seq(vec![alternation]))
    }

    /// Parse a sequence of quantified atoms, up to `|`, `)` or the end.
    ///
    /// `leading` is true for the first branch of the whole pattern, the only place global
    /// inline flags may appear.
    fn parse_sequence(&mut self, leading: bool) -> Result<SeqId> {
        let mut items: Vec<NodeId> = Vec::new();
        loop {
            self.skip_verbose();
            let at = self.pos;
            match self.peek() {
                None | Some('|') | Some(')') => break,
                Some('*') => {
                    self.pos += 1;
                    self.apply_repeat(&mut items, 0, None, at)?;
                }
                Some('+') => {
                    self.pos += 1;
                    self.apply_repeat(&mut items, 1, None, at)?;
                }
                Some('?') => {
                    self.pos += 1;
                    self.apply_repeat(&mut items, 0, Some(1), at)?;
                }
                Some('{') => match self.parse_brace_quantifier()? {
                    Some((min, max)) => self.apply_repeat(&mut items, min, max, at)?,
                    None => {
                        self.pos += 1;
                        items.push(self.ast.push(Node::Literal('{')));
                    }
                },
                Some(_) => {
                    if let Some(node) = self.parse_atom(leading && items.is_empty())? {
                        items.push(node);
                    }
                }
            }
        }
        Ok(self.ast.push_seq(items))
    }

    /// Wraps the last item in a repeat, reading a lazy `?` or possessive `+` suffix.
    fn apply_repeat(
        &mut self,
        items: &mut [NodeId],
        min: usize,
        max: Option<usize>,
        at: usize,
    ) -> Result<()> {
        let Some(last) = items.last_mut() else {
            return self.error_at("nothing to repeat", at);
        };
        match self.ast[*last] {
            Node::Anchor(_) => return self.error_at("nothing to repeat", at),
            Node::Repeat { .. } => return self.error_at("multiple repeat", at),
            _ => {}
        }
        let kind = if self.eat('?') {
            RepeatKind::Lazy
        } else if self.eat('+') {
            RepeatKind::Possessive
        } else {
            RepeatKind::Greedy
        };
        let body = self.ast.push_seq(vec![*last]);
        *last = self.ast.push(Node::Repeat {
            min,
            max,
            kind,
            body,
        });
        Ok(())
    }

    /// Parse `{n}`, `{n,}`, `{,m}`, `{n,m}` at the current `{`.
    ///
    /// Returns `None`, without consuming anything, when the brace does not start a
    /// quantifier and is a literal.
    fn parse_brace_quantifier(&mut self) -> Result<Option<(usize, Option<usize>)>> {
        let save_pos = self.pos;
        self.pos += 1; // consume '{'
        if self.peek() == Some('}') {
            self.pos = save_pos;
            return Ok(None);
        }
        let lo = self.parse_number()?;
        let hi = if self.eat(',') {
            self.parse_number()?
        } else {
            lo
        };
        if !self.eat('}') {
            self.pos = save_pos;
            return Ok(None);
        }
        let min = lo.unwrap_or(0);
        if let Some(max) = hi {
            if max < min {
                return self.error_at("min repeat greater than max repeat", save_pos + 1);
            }
        }
        Ok(Some((min, hi)))
    }

    fn parse_number(&mut self) -> Result<Option<usize>> {
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(None);
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        match digits.parse::<u32>() {
            Ok(n) if n < u32::MAX => Ok(Some(n as usize)),
            _ => self.error_at("the repetition number is too large", start),
        }
    }

    /// Parse a single atom. Comments and global flag groups produce no node.
    fn parse_atom(&mut self, leading: bool) -> Result<Option<NodeId>> {
        let at = self.pos;
        let node = match self.advance() {
            None => return self.error("unexpected end of pattern"),
            Some('[') => return self.parse_class(at).map(Some),
            Some('(') => return self.parse_group(at, leading),
            Some('\\') => return self.parse_escape(at).map(Some),
            Some('.') => Node::Any,
            Some('^') => Node::Anchor(AnchorKind::Start),
            Some('$') => Node::Anchor(AnchorKind::End),
            Some(ch) => Node::Literal(ch),
        };
        Ok(Some(self.ast.push(node)))
    }

    /// Parse an escape sequence outside a character set; the `\` is already consumed.
    fn parse_escape(&mut self, at: usize) -> Result<NodeId> {
        let Some(ch) = self.advance() else {
            return self.error_at("bad escape (end of pattern)", at);
        };
        let node = match ch {
            'A' => Node::Anchor(AnchorKind::StartOfString),
            'Z' => Node::Anchor(AnchorKind::EndOfString),
            'b' => Node::Anchor(AnchorKind::WordBoundary),
            'B' => Node::Anchor(AnchorKind::NonWordBoundary),
            '0' => Node::Literal(self.octal_tail(0, 2, at)?),
            '1'..='9' => self.numeric_escape(ch, at)?,
            _ => match category(ch) {
                Some(category) => Node::Category(category),
                None => Node::Literal(self.char_escape(ch, at)?),
            },
        };
        Ok(self.ast.push(node))
    }

    /// `\1`..`\99` is a group reference, unless three octal digits make it a character.
    fn numeric_escape(&mut self, first: char, at: usize) -> Result<Node> {
        let mut number = first.to_digit(10).unwrap_or_default() as usize;
        if let Some(second) = self.peek().filter(char::is_ascii_digit) {
            let octal = |ch: char| ch.is_digit(8);
            if octal(first) && octal(second) && self.peek_at(1).is_some_and(octal) {
                let value = self.octal_tail(first.to_digit(8).unwrap_or_default(), 2, at)?;
                return Ok(Node::Literal(value));
            }
            self.pos += 1;
            number = number * 10 + second.to_digit(10).unwrap_or_default() as usize;
        }
        if number > self.group_count {
            return self.error_at(format!("invalid group reference {}", number), at + 1);
        }
        if !self.closed[number] {
            return self.error_at("cannot refer to an open group", at);
        }
        Ok(Node::Backreference(number))
    }

    /// Reads up to `max_more` further octal digits after `value`.
    fn octal_tail(&mut self, mut value: u32, max_more: usize, at: usize) -> Result<char> {
        for _ in 0..max_more {
            match self.peek().and_then(|ch| ch.to_digit(8)) {
                Some(digit) => {
                    value = value * 8 + digit;
                    self.pos += 1;
                }
                None => break,
            }
        }
        if value > 0o377 {
            let text: String = self.chars[at..self.pos].iter().collect();
            return self.error_at(
                format!("octal escape value {} outside of range 0-0o377", text),
                at,
            );
        }
        Ok(char::from_u32(value).unwrap_or_default())
    }

    /// Escapes that stand for one character, valid both inside and outside sets.
    fn char_escape(&mut self, ch: char, at: usize) -> Result<char> {
        let literal = match ch {
            'a' => '\x07',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            'x' => self.hex_escape(2, at)?,
            'u' => self.hex_escape(4, at)?,
            'U' => self.hex_escape(8, at)?,
            ch if ch.is_ascii_alphanumeric() => {
                return self.error_at(format!("bad escape \\{}", ch), at);
            }
            ch => ch,
        };
        Ok(literal)
    }

    fn hex_escape(&mut self, len: usize, at: usize) -> Result<char> {
        let start = self.pos;
        while self.pos - start < len && self.peek().is_some_and(|ch| ch.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        let text: String = self.chars[at..self.pos].iter().collect();
        if self.pos - start < len {
            return self.error_at(format!("incomplete escape {}", text), at);
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| self.error_at(format!("bad escape {}", text), at), Ok)
    }

    /// Parse a character set: `[abc]`, `[a-z]`, `[^abc]`. The `[` is already consumed.
    fn parse_class(&mut self, at: usize) -> Result<NodeId> {
        let negated = self.eat('^');
        let first = self.pos;
        let mut items = Vec::new();

        loop {
            let Some(ch) = self.advance() else {
                return self.error_at("unterminated character set", at);
            };
            if ch == ']' && self.pos - 1 != first {
                break;
            }
            let lo = if ch == '\\' {
                self.class_escape(self.pos - 1)?
            } else {
                ClassAtom::Char(ch)
            };
            if !self.eat('-') {
                items.push(self.class_node(lo));
                continue;
            }
            let range_at = self.pos - 1;
            let hi = match self.advance() {
                None => return self.error_at("unterminated character set", at),
                Some(']') => {
                    // trailing '-' is a literal and the ']' closes the set
                    items.push(self.class_node(lo));
                    items.push(self.ast.push(Node::Literal('-')));
                    break;
                }
                Some('\\') => self.class_escape(self.pos - 1)?,
                Some(ch) => ClassAtom::Char(ch),
            };
            match (lo, hi) {
                (ClassAtom::Char(lo), ClassAtom::Char(hi)) if lo <= hi => {
                    items.push(self.ast.push(Node::Range(lo, hi)));
                }
                _ => return self.error_at("bad character range", range_at - 1),
            }
        }

        Ok(self.ast.push(Node::Set { negated, items }))
    }

    fn class_node(&mut self, atom: ClassAtom) -> NodeId {
        match atom {
            ClassAtom::Char(ch) => self.ast.push(Node::Literal(ch)),
            ClassAtom::Category(category) => self.ast.push(Node::Category(category)),
        }
    }

    /// Escape inside a set; the `\` at `at` is already consumed.
    fn class_escape(&mut self, at: usize) -> Result<ClassAtom> {
        let Some(ch) = self.advance() else {
            return self.error_at("unterminated character set", at);
        };
        if let Some(category) = category(ch) {
            return Ok(ClassAtom::Category(category));
        }
        let literal = match ch {
            'b' => '\x08',
            '0'..='7' => self.octal_tail(ch.to_digit(8).unwrap_or_default(), 2, at)?,
            _ => self.char_escape(ch, at)?,
        };
        Ok(ClassAtom::Char(literal))
    }

    /// Parse a group or extension; the `(` at `at` is already consumed.
    fn parse_group(&mut self, at: usize, leading: bool) -> Result<Option<NodeId>> {
        if !self.eat('?') {
            let index = self.open_group(None, at)?;
            let body = self.parse_group_body(at)?;
            self.closed[index] = true;
            return Ok(Some(self.ast.push(Node::Group {
                index: Some(index),
                body,
            })));
        }

        let node = match self.advance() {
            None => return self.error("unexpected end of pattern"),
            Some('P') => {
                if self.eat('<') {
                    let name = self.parse_group_name('>')?;
                    let index = self.open_group(Some(name), at)?;
                    let body = self.parse_group_body(at)?;
                    self.closed[index] = true;
                    Node::Group {
                        index: Some(index),
                        body,
                    }
                } else if self.eat('=') {
                    let name_at = self.pos;
                    let name = self.parse_group_name(')')?;
                    let Some(&index) = self.names.get(&name) else {
                        return self.error_at(format!("unknown group name '{}'", name), name_at);
                    };
                    if !self.closed[index] {
                        return self.error_at("cannot refer to an open group", name_at);
                    }
                    Node::Backreference(index)
                } else {
                    let shown: String = self.peek().into_iter().collect();
                    return self.error(format!("unknown extension ?P{}", shown));
                }
            }
            Some(':') => Node::Group {
                index: None,
                body: self.parse_group_body(at)?,
            },
            Some('#') => {
                loop {
                    match self.advance() {
                        None => return self.error_at("missing ), unterminated comment", at),
                        Some(')') => return Ok(None),
                        Some(_) => {}
                    }
                }
            }
            Some(ch @ ('=' | '!')) => Node::Lookaround {
                behind: false,
                negated: ch == '!',
                body: self.parse_group_body(at)?,
            },
            Some('<') => match self.advance() {
                Some(ch @ ('=' | '!')) => Node::Lookaround {
                    behind: true,
                    negated: ch == '!',
                    body: self.parse_group_body(at)?,
                },
                Some(ch) => return self.error(format!("unknown extension ?<{}", ch)),
                None => return self.error("unexpected end of pattern"),
            },
            Some('>') => Node::Atomic(self.parse_group_body(at)?),
            Some('(') => self.parse_conditional(at)?,
            Some(ch) if ch == '-' || Flags::from_letter(ch).is_some() => {
                return self.parse_flags(ch, at, leading);
            }
            Some(ch) => return self.error(format!("unknown extension ?{}", ch)),
        };
        Ok(Some(self.ast.push(node)))
    }

    fn parse_group_body(&mut self, at: usize) -> Result<SeqId> {
        let body = self.parse_alternation(false)?;
        if !self.eat(')') {
            return self.error_at("missing ), unterminated subpattern", at);
        }
        Ok(body)
    }

    fn open_group(&mut self, name: Option<String>, at: usize) -> Result<usize> {
        self.group_count += 1;
        let index = self.group_count;
        self.closed.push(false);
        if let Some(name) = name {
            if let Some(&previous) = self.names.get(&name) {
                return self.error_at(
                    format!(
                        "redefinition of group name '{}' as group {}; was group {}",
                        name, index, previous
                    ),
                    at,
                );
            }
            self.names.insert(name, index);
        }
        Ok(index)
    }

    fn parse_group_name(&mut self, terminator: char) -> Result<String> {
        let start = self.pos;
        let mut name = String::new();
        loop {
            match self.advance() {
                None => {
                    return self.error_at(
                        format!("missing {}, unterminated name", terminator),
                        start,
                    );
                }
                Some(ch) if ch == terminator => break,
                Some(ch) => name.push(ch),
            }
        }
        if name.is_empty() {
            return self.error_at("missing group name", start);
        }
        if !is_identifier(&name) {
            return self.error_at(format!("bad character in group name '{}'", name), start);
        }
        Ok(name)
    }

    /// `(?(group)yes|no)`; the `(?(` is already consumed.
    fn parse_conditional(&mut self, at: usize) -> Result<Node> {
        let name_at = self.pos;
        let name = self.parse_cond_name()?;
        let group = if is_identifier(&name) {
            match self.names.get(&name) {
                Some(&index) => index,
                None => return self.error_at(format!("unknown group name '{}'", name), name_at),
            }
        } else {
            match name.parse::<usize>() {
                Ok(0) => return self.error_at("bad group number", name_at),
                Ok(index) if index <= self.group_count => index,
                Ok(_) => return self.error_at("invalid group reference", name_at),
                Err(_) => {
                    return self.error_at(
                        format!("bad character in group name '{}'", name),
                        name_at,
                    );
                }
            }
        };
        let yes = self.parse_sequence(false)?;
        let no = if self.eat('|') {
            let no = self.parse_sequence(false)?;
            if self.peek() == Some('|') {
                return self.error("conditional backref with more than two branches");
            }
            Some(no)
        } else {
            None
        };
        if !self.eat(')') {
            return self.error_at("missing ), unterminated subpattern", at);
        }
        Ok(Node::Conditional { group, yes, no })
    }

    fn parse_cond_name(&mut self) -> Result<String> {
        let start = self.pos;
        let mut name = String::new();
        loop {
            match self.advance() {
                None => return self.error_at("missing ), unterminated name", start),
                Some(')') => break,
                Some(ch) => name.push(ch),
            }
        }
        if name.is_empty() {
            return self.error_at("missing group name", start);
        }
        Ok(name)
    }

    /// `(?aimsx)`, `(?i:...)` or `(?i-s:...)`; `first` is the character after `(?`.
    fn parse_flags(&mut self, first: char, at: usize, leading: bool) -> Result<Option<NodeId>> {
        let mut add = Flags::empty();
        let mut current = Some(first);
        while let Some(ch) = current {
            if matches!(ch, '-' | ':' | ')') {
                break;
            }
            match Flags::from_letter(ch) {
                Some(flag) => add |= flag,
                None => return self.error("unknown flag"),
            }
            current = self.advance();
        }

        let remove = match current {
            None => return self.error("missing -, : or )"),
            Some(')') => {
                if !leading {
                    return self.error_at("global flags not at the start of the expression", at);
                }
                self.flags |= add;
                return Ok(None);
            }
            Some(':') => Flags::empty(),
            Some(_) => {
                let mut remove = Flags::empty();
                loop {
                    match self.advance() {
                        None => return self.error("missing :"),
                        Some(':') => break,
                        Some(ch) => match Flags::from_letter(ch) {
                            Some(flag) => remove |= flag,
                            None => return self.error("unknown flag"),
                        },
                    }
                }
                if remove.is_empty() {
                    return self.error("missing flag");
                }
                remove
            }
        };

        let saved = self.flags;
        self.flags = (saved | add) - remove;
        let body = self.parse_group_body(at);
        self.flags = saved;
        Ok(Some(self.ast.push(Node::ScopedFlags {
            add,
            remove,
            body: body?,
        })))
    }
}

fn category(ch: char) -> Option<Category> {
    match ch {
        'd' => Some(Category::Digit),
        'D' => Some(Category::NotDigit),
        's' => Some(Category::Space),
        'S' => Some(Category::NotSpace),
        'w' => Some(Category::Word),
        'W' => Some(Category::NotWord),
        _ => None,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|ch| ch == '_' || ch.is_alphabetic())
        && chars.all(|ch| ch == '_' || ch.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str) -> Parsed {
        Parser::new(pattern, Flags::empty())
            .parse()
            .unwrap_or_else(|e| panic!("{:?} should parse: {}", pattern, e))
    }

    fn parse_error(pattern: &str) -> String {
        match Parser::new(pattern, Flags::empty()).parse() {
            Err(Error::Parse { message, .. }) => message,
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("{:?} should not parse", pattern),
        }
    }

    fn root_nodes(parsed: &Parsed) -> Vec<Node> {
        parsed.ast[parsed.root]
            .iter()
            .map(|&id| parsed.ast[id].clone())
            .collect()
    }

    #[test]
    fn literals_and_wildcard() {
        let parsed = parse("a.b");
        assert_eq!(
            root_nodes(&parsed),
            vec![Node::Literal('a'), Node::Any, Node::Literal('b')]
        );
    }

    #[test]
    fn quantifiers() {
        let parsed = parse("a+b{2,3}c{,4}d{5}e*?f?+");
        let repeats: Vec<(usize, Option<usize>, RepeatKind)> = root_nodes(&parsed)
            .into_iter()
            .filter_map(|node| match node {
                Node::Repeat { min, max, kind, .. } => Some((min, max, kind)),
                _ => None,
            })
            .collect();
        assert_eq!(
            repeats,
            vec![
                (1, None, RepeatKind::Greedy),
                (2, Some(3), RepeatKind::Greedy),
                (0, Some(4), RepeatKind::Greedy),
                (5, Some(5), RepeatKind::Greedy),
                (0, None, RepeatKind::Lazy),
                (0, Some(1), RepeatKind::Possessive),
            ]
        );
    }

    #[test]
    fn brace_without_quantifier_is_literal() {
        let parsed = parse("a{x}{}");
        assert_eq!(
            root_nodes(&parsed),
            vec![
                Node::Literal('a'),
                Node::Literal('{'),
                Node::Literal('x'),
                Node::Literal('}'),
                Node::Literal('{'),
                Node::Literal('}'),
            ]
        );
    }

    #[test]
    fn alternation_is_a_single_node() {
        let parsed = parse("a|bc");
        let nodes = root_nodes(&parsed);
        assert_eq!(nodes.len(), 1);
        let Node::Alternation(branches) = &nodes[0] else {
            panic!("expected alternation, got {:?}", nodes[0]);
        };
        assert_eq!(branches.len(), 2);
        assert_eq!(parsed.ast[branches[1]].len(), 2);
    }

    #[test]
    fn groups_are_numbered_in_order() {
        let parsed = parse("(?P<outer>a(b))(?:c)(d)");
        assert_eq!(parsed.group_count, 3);
        assert_eq!(parsed.names.get("outer"), Some(&1));
        let nodes = root_nodes(&parsed);
        assert!(matches!(nodes[0], Node::Group { index: Some(1), .. }));
        assert!(matches!(nodes[1], Node::Group { index: None, .. }));
        assert!(matches!(nodes[2], Node::Group { index: Some(3), .. }));
    }

    #[test]
    fn character_sets() {
        let parsed = parse(r"[a-c\d-]");
        let nodes = root_nodes(&parsed);
        let Node::Set { negated, items } = &nodes[0] else {
            panic!("expected a set");
        };
        assert!(!negated);
        let members: Vec<Node> = items.iter().map(|&id| parsed.ast[id].clone()).collect();
        assert_eq!(
            members,
            vec![
                Node::Range('a', 'c'),
                Node::Category(Category::Digit),
                Node::Literal('-'),
            ]
        );

        let parsed = parse("[]a][^x]");
        let nodes = root_nodes(&parsed);
        assert!(matches!(&nodes[0], Node::Set { negated: false, items } if items.len() == 2));
        assert!(matches!(&nodes[1], Node::Set { negated: true, .. }));
    }

    #[test]
    fn escapes() {
        let parsed = parse(r"\x41é\101\0\n\.");
        assert_eq!(
            root_nodes(&parsed),
            vec![
                Node::Literal('A'),
                Node::Literal('é'),
                Node::Literal('A'),
                Node::Literal('\0'),
                Node::Literal('\n'),
                Node::Literal('.'),
            ]
        );
        let parsed = parse(r"\A\Z\b");
        assert_eq!(
            root_nodes(&parsed),
            vec![
                Node::Anchor(AnchorKind::StartOfString),
                Node::Anchor(AnchorKind::EndOfString),
                Node::Anchor(AnchorKind::WordBoundary),
            ]
        );
    }

    #[test]
    fn backreferences() {
        let parsed = parse(r"(a)\1(?P<x>b)(?P=x)");
        let nodes = root_nodes(&parsed);
        assert_eq!(nodes[1], Node::Backreference(1));
        assert_eq!(nodes[3], Node::Backreference(2));
    }

    #[test]
    fn global_inline_flags() {
        let parsed = parse("(?as)a");
        assert_eq!(parsed.flags, Flags::ASCII | Flags::DOTALL);
        assert_eq!(root_nodes(&parsed), vec![Node::Literal('a')]);
    }

    #[test]
    fn verbose_mode_skips_whitespace_and_comments() {
        let parsed = Parser::new("a b # comment\n c+", Flags::VERBOSE)
            .parse()
            .unwrap();
        let nodes = root_nodes(&parsed);
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[2], Node::Repeat { min: 1, .. }));
    }

    #[test]
    fn unsupported_constructs_still_parse() {
        for pattern in [r"(?=a)", r"(?<!a)", r"(?>a)", r"(?i:a)", r"(a)(?(1)b|c)", r"(?#x)a"] {
            parse(pattern);
        }
    }

    #[test]
    fn host_errors() {
        assert_eq!(parse_error("*a"), "nothing to repeat");
        assert_eq!(parse_error("^*"), "nothing to repeat");
        assert_eq!(parse_error("a**"), "multiple repeat");
        assert_eq!(parse_error("a{3,2}"), "min repeat greater than max repeat");
        assert_eq!(parse_error("(a"), "missing ), unterminated subpattern");
        assert_eq!(parse_error("a)"), "unbalanced parenthesis");
        assert_eq!(parse_error("[a"), "unterminated character set");
        assert_eq!(parse_error("[z-a]"), "bad character range");
        assert_eq!(parse_error(r"\q"), "bad escape \\q");
        assert_eq!(parse_error(r"\1"), "invalid group reference 1");
        assert_eq!(parse_error(r"(a\1)"), "cannot refer to an open group");
        assert_eq!(parse_error("(?P<1>a)"), "bad character in group name '1'");
        assert_eq!(
            parse_error("(?P<n>a)(?P<n>b)"),
            "redefinition of group name 'n' as group 2; was group 1"
        );
        assert_eq!(parse_error("(?P=n)"), "unknown group name 'n'");
        assert_eq!(parse_error("a(?i)"), "global flags not at the start of the expression");
        assert_eq!(parse_error(r"\x4"), "incomplete escape \\x4");
        assert_eq!(parse_error("(?q)"), "unknown extension ?q");
    }

    #[test]
    fn incompatible_flags() {
        let err = Parser::new("a", Flags::ASCII | Flags::UNICODE).parse().unwrap_err();
        assert!(matches!(err, Error::Parse { ref message, .. } if message.contains("incompatible")));
    }
}
