//! Reduced-grammar Go frontend.
//!
//! Parses exactly the declaration shapes the extractor consumes: the
//! `package` clause, leading `//` comments, standalone `type Name Ref`
//! aliases, and `const` groups with iota, implicit repetition, and
//! integer constant expressions. It is deliberately not a general Go
//! parser; declarations it cannot shape are skipped, and constant
//! expressions it cannot evaluate leave the entry unresolved rather than
//! failing the whole unit.

pub mod decl;

pub use decl::{
    ConstEntry, ConstGroup, ConstKind, Declaration, ResolvedConst, SourceUnit, TypeAlias, TypeRef,
};

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{EnumerError, Result};
use decl::is_ident;

pub struct UnitParser;

impl UnitParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path) -> Result<SourceUnit> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EnumerError::io(path, e))?;
        self.parse_source(path, &content)
    }

    pub fn parse_source(&self, path: &Path, source: &str) -> Result<SourceUnit> {
        let lines: Vec<&str> = source.lines().collect();
        let mut unit = SourceUnit::new(path);

        // Aliases first, so const groups appearing before their type
        // declaration still resolve signedness and marker checks.
        collect_aliases(&lines, &mut unit.aliases);

        let mut declared: HashSet<String> = HashSet::new();
        let mut pending_doc: Vec<String> = Vec::new();
        let mut depth: i64 = 0;
        let mut in_block_comment = false;
        let mut i = 0;

        while i < lines.len() {
            let lineno = i + 1;
            let line = lines[i].trim();
            i += 1;

            if in_block_comment {
                if line.contains("*/") {
                    in_block_comment = false;
                }
                continue;
            }
            if line.starts_with("/*") {
                if !line.contains("*/") {
                    in_block_comment = true;
                }
                pending_doc.clear();
                continue;
            }

            if line.is_empty() {
                pending_doc.clear();
                continue;
            }
            if line.starts_with("//") {
                if depth == 0 {
                    pending_doc.push(line.to_string());
                }
                continue;
            }

            if depth == 0 {
                if let Some(rest) = line.strip_prefix("package ") {
                    unit.package = rest.trim().to_string();
                    pending_doc.clear();
                    continue;
                }

                if let Some(rest) = line
                    .strip_prefix("const")
                    .filter(|r| r.starts_with([' ', '\t', '(']))
                {
                    let rest = rest.trim_start();
                    pending_doc.clear();
                    if rest.starts_with('(') {
                        let group =
                            parse_const_block(path, &lines, &mut i, &mut unit, &mut declared)?;
                        if !group.entries.is_empty() {
                            unit.decls.push(Declaration::ConstGroup(group));
                        }
                    } else if !rest.is_empty() {
                        let mut group = ConstGroup::default();
                        let mut state = GroupState::default();
                        scan_const_line(path, rest, lineno, &mut group, &mut state, &mut unit,
                            &mut declared)?;
                        if !group.entries.is_empty() {
                            unit.decls.push(Declaration::ConstGroup(group));
                        }
                    }
                    continue;
                }

                if let Some(rest) = line.strip_prefix("type ") {
                    let doc = std::mem::take(&mut pending_doc);
                    let rest = rest.trim_start();
                    if rest.starts_with('(') {
                        // grouped type blocks are never marker aliases
                        skip_paren_block(&lines, &mut i);
                    } else if let Some(alias) = parse_type_alias(rest, lineno, doc) {
                        unit.decls.push(Declaration::TypeAlias(alias));
                    } else {
                        // struct/interface declarations open a body
                        depth += brace_delta(line);
                    }
                    continue;
                }

                if let Some(rest) = line
                    .strip_prefix("import")
                    .filter(|r| r.starts_with([' ', '\t', '(']))
                {
                    pending_doc.clear();
                    if rest.trim_start().starts_with('(') {
                        skip_paren_block(&lines, &mut i);
                    }
                    continue;
                }

                pending_doc.clear();
            }

            depth += brace_delta(line);
            if depth < 0 {
                depth = 0;
            }
        }

        Ok(unit)
    }
}

impl Default for UnitParser {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_aliases(lines: &[&str], aliases: &mut HashMap<String, TypeRef>) {
    let mut depth: i64 = 0;
    for raw in lines {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if depth == 0 {
            if let Some(rest) = line.strip_prefix("type ") {
                if let Some(alias) = parse_type_alias(rest.trim_start(), 0, Vec::new()) {
                    aliases.insert(alias.name, alias.underlying);
                }
            }
        }
        depth += brace_delta(line);
        if depth < 0 {
            depth = 0;
        }
    }
}

fn parse_type_alias(rest: &str, line: usize, doc: Vec<String>) -> Option<TypeAlias> {
    let toks = lex(rest).ok()?;
    match toks.as_slice() {
        [Tok::Ident(name), Tok::Ident(underlying)]
            if is_ident(name) =>
        {
            let underlying = TypeRef::parse(underlying)?;
            Some(TypeAlias {
                name: name.clone(),
                underlying,
                doc,
                line,
            })
        }
        _ => None,
    }
}

fn skip_paren_block(lines: &[&str], i: &mut usize) {
    while *i < lines.len() {
        let line = lines[*i].trim();
        *i += 1;
        if line.starts_with(')') {
            return;
        }
    }
}

/// Per-group evaluation state: the running iota index and the type/exprs
/// carried into implicit-repetition lines.
#[derive(Default)]
struct GroupState {
    iota: i128,
    carried_type: Option<String>,
    carried_exprs: Option<Vec<Vec<Tok>>>,
    /// Set once a structurally unparseable line is hit; the rest of the
    /// group is consumed without extracting entries.
    abandoned: bool,
}

fn parse_const_block(
    path: &Path,
    lines: &[&str],
    i: &mut usize,
    unit: &mut SourceUnit,
    declared: &mut HashSet<String>,
) -> Result<ConstGroup> {
    let mut group = ConstGroup::default();
    let mut state = GroupState::default();

    while *i < lines.len() {
        let lineno = *i + 1;
        let line = lines[*i].trim();
        *i += 1;

        if line.starts_with(')') {
            break;
        }
        if line.is_empty() || line.starts_with("//") || state.abandoned {
            continue;
        }
        scan_const_line(path, line, lineno, &mut group, &mut state, unit, declared)?;
    }

    Ok(group)
}

/// Parses one constant spec line and resolves the values it declares.
fn scan_const_line(
    path: &Path,
    line: &str,
    lineno: usize,
    group: &mut ConstGroup,
    state: &mut GroupState,
    unit: &mut SourceUnit,
    declared: &mut HashSet<String>,
) -> Result<()> {
    let toks = match lex(line) {
        Ok(toks) if !toks.is_empty() => toks,
        Ok(_) => return Ok(()),
        Err(_) => {
            state.abandoned = true;
            return Ok(());
        }
    };
    let parsed = match parse_const_line(&toks) {
        Some(parsed) => parsed,
        None => {
            state.abandoned = true;
            return Ok(());
        }
    };

    let iota = state.iota;
    state.iota += 1;

    let (line_type, exprs) = match parsed.exprs {
        Some(exprs) => {
            state.carried_type = parsed.explicit_type.clone();
            state.carried_exprs = Some(exprs.clone());
            (parsed.explicit_type.clone(), exprs)
        }
        None => {
            // a type annotation without an initializer is not valid Go
            if parsed.explicit_type.is_some() {
                state.abandoned = true;
                return Ok(());
            }
            match &state.carried_exprs {
                Some(exprs) => (state.carried_type.clone(), exprs.clone()),
                None => {
                    state.abandoned = true;
                    return Ok(());
                }
            }
        }
    };

    if parsed.names.len() != exprs.len() {
        state.abandoned = true;
        return Ok(());
    }

    let signed = signed_for(line_type.as_deref(), &unit.aliases);

    for (name, expr) in parsed.names.iter().zip(exprs.iter()) {
        group.entries.push(ConstEntry {
            name: name.clone(),
            explicit_type: parsed.explicit_type.clone(),
            line: lineno,
        });

        if name == "_" {
            continue;
        }
        if !declared.insert(name.clone()) {
            return Err(EnumerError::parse(
                path,
                lineno,
                format!("constant {} redeclared in this unit", name),
            ));
        }
        if let Some(resolved) = resolve_expr(expr, iota, signed, &unit.values) {
            unit.values.insert(name.clone(), resolved);
        }
    }

    Ok(())
}

struct ConstLine {
    names: Vec<String>,
    explicit_type: Option<String>,
    /// `None` means implicit repetition of the previous expression list.
    exprs: Option<Vec<Vec<Tok>>>,
}

fn parse_const_line(toks: &[Tok]) -> Option<ConstLine> {
    let mut pos = 0;
    let mut names = Vec::new();

    loop {
        match toks.get(pos) {
            Some(Tok::Ident(name)) if is_ident(name) => {
                names.push(name.clone());
                pos += 1;
            }
            _ => return None,
        }
        match toks.get(pos) {
            Some(Tok::Comma) => pos += 1,
            _ => break,
        }
    }

    let explicit_type = match toks.get(pos) {
        Some(Tok::Ident(t)) => {
            pos += 1;
            Some(t.clone())
        }
        _ => None,
    };

    let exprs = match toks.get(pos) {
        Some(Tok::Assign) => {
            pos += 1;
            let rest = &toks[pos..];
            if rest.is_empty() {
                return None;
            }
            Some(split_top_level_commas(rest))
        }
        None => None,
        Some(_) => return None,
    };

    Some(ConstLine {
        names,
        explicit_type,
        exprs,
    })
}

fn split_top_level_commas(toks: &[Tok]) -> Vec<Vec<Tok>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for tok in toks {
        match tok {
            Tok::LParen => {
                depth += 1;
                current.push(tok.clone());
            }
            Tok::RParen => {
                depth = depth.saturating_sub(1);
                current.push(tok.clone());
            }
            Tok::Comma if depth == 0 => out.push(std::mem::take(&mut current)),
            _ => current.push(tok.clone()),
        }
    }
    out.push(current);
    out
}

fn signed_for(declared: Option<&str>, aliases: &HashMap<String, TypeRef>) -> bool {
    let Some(first) = declared else { return true };
    let mut name: &str = first;
    for _ in 0..8 {
        if name.contains('.') {
            // external underlying types (the marker included) are
            // int32-backed
            return true;
        }
        match name {
            "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "uintptr" | "byte" => {
                return false
            }
            "int" | "int8" | "int16" | "int32" | "int64" | "rune" => return true,
            _ => {}
        }
        match aliases.get(name) {
            Some(underlying) if underlying.is_qualified() => return true,
            Some(underlying) => name = &underlying.name,
            None => return true,
        }
    }
    true
}

/// Resolves one initializer expression. Single literals keep their
/// original text; anything evaluable reduces to an integer; anything
/// else leaves the entry unresolved.
fn resolve_expr(
    toks: &[Tok],
    iota: i128,
    signed: bool,
    values: &HashMap<String, ResolvedConst>,
) -> Option<ResolvedConst> {
    match toks {
        [Tok::Int { value, text }] => {
            return Some(ResolvedConst {
                kind: ConstKind::Int,
                signed,
                value: *value,
                literal: Some(text.clone()),
            })
        }
        [Tok::Char { value, text }] => {
            return Some(ResolvedConst {
                kind: ConstKind::Int,
                signed,
                value: *value,
                literal: Some(text.clone()),
            })
        }
        [Tok::Float(text)] => {
            return Some(ResolvedConst {
                kind: ConstKind::Float,
                signed: true,
                value: 0,
                literal: Some(text.clone()),
            })
        }
        [Tok::Str(text)] => {
            return Some(ResolvedConst {
                kind: ConstKind::Str,
                signed: true,
                value: 0,
                literal: Some(text.clone()),
            })
        }
        [Tok::Ident(word)] if word == "true" || word == "false" => {
            return Some(ResolvedConst {
                kind: ConstKind::Bool,
                signed: true,
                value: (word == "true") as i128,
                literal: Some(word.clone()),
            })
        }
        [Tok::Ident(name)] if name != "iota" => {
            let referenced = values.get(name.as_str())?;
            return Some(ResolvedConst {
                kind: referenced.kind,
                signed,
                value: referenced.value,
                literal: None,
            });
        }
        _ => {}
    }

    let mut eval = Eval {
        toks,
        pos: 0,
        iota,
        values,
    };
    let value = eval.expr(0).ok()?;
    if eval.pos != toks.len() {
        return None;
    }
    Some(ResolvedConst {
        kind: ConstKind::Int,
        signed,
        value,
        literal: None,
    })
}

struct Eval<'a> {
    toks: &'a [Tok],
    pos: usize,
    iota: i128,
    values: &'a HashMap<String, ResolvedConst>,
}

impl Eval<'_> {
    fn expr(&mut self, min_prec: u8) -> std::result::Result<i128, ()> {
        let mut lhs = self.unary()?;
        while let Some(Tok::Op(op)) = self.toks.get(self.pos) {
            let prec = binop_prec(op).ok_or(())?;
            if prec < min_prec {
                break;
            }
            let op = *op;
            self.pos += 1;
            let rhs = self.expr(prec + 1)?;
            lhs = apply_binop(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> std::result::Result<i128, ()> {
        match self.toks.get(self.pos) {
            Some(Tok::Op("+")) => {
                self.pos += 1;
                self.unary()
            }
            Some(Tok::Op("-")) => {
                self.pos += 1;
                self.unary()?.checked_neg().ok_or(())
            }
            Some(Tok::Op("^")) => {
                self.pos += 1;
                Ok(!self.unary()?)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> std::result::Result<i128, ()> {
        match self.toks.get(self.pos) {
            Some(Tok::Int { value, .. }) => {
                self.pos += 1;
                Ok(*value)
            }
            Some(Tok::Char { value, .. }) => {
                self.pos += 1;
                Ok(*value)
            }
            Some(Tok::Ident(name)) => {
                self.pos += 1;
                if name == "iota" {
                    return Ok(self.iota);
                }
                match self.values.get(name.as_str()) {
                    Some(c) if c.kind == ConstKind::Int => Ok(c.value),
                    _ => Err(()),
                }
            }
            Some(Tok::LParen) => {
                self.pos += 1;
                let value = self.expr(0)?;
                match self.toks.get(self.pos) {
                    Some(Tok::RParen) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(()),
                }
            }
            _ => Err(()),
        }
    }
}

fn binop_prec(op: &str) -> Option<u8> {
    match op {
        "*" | "/" | "%" | "<<" | ">>" | "&" | "&^" => Some(5),
        "+" | "-" | "|" | "^" => Some(4),
        _ => None,
    }
}

fn apply_binop(op: &str, lhs: i128, rhs: i128) -> std::result::Result<i128, ()> {
    let shift = || u32::try_from(rhs).ok().filter(|s| *s < 127).ok_or(());
    match op {
        "*" => lhs.checked_mul(rhs).ok_or(()),
        "/" => lhs.checked_div(rhs).ok_or(()),
        "%" => lhs.checked_rem(rhs).ok_or(()),
        "<<" => lhs.checked_shl(shift()?).ok_or(()),
        ">>" => lhs.checked_shr(shift()?).ok_or(()),
        "&" => Ok(lhs & rhs),
        "&^" => Ok(lhs & !rhs),
        "+" => lhs.checked_add(rhs).ok_or(()),
        "-" => lhs.checked_sub(rhs).ok_or(()),
        "|" => Ok(lhs | rhs),
        "^" => Ok(lhs ^ rhs),
        _ => Err(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Int { value: i128, text: String },
    Float(String),
    Str(String),
    Char { value: i128, text: String },
    Op(&'static str),
    LParen,
    RParen,
    Comma,
    Assign,
}

fn lex(line: &str) -> std::result::Result<Vec<Tok>, String> {
    let chars: Vec<char> = line.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == ' ' || c == '\t' {
            i += 1;
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            break;
        }
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            match find_close(&chars, i + 2) {
                Some(end) => {
                    i = end;
                    continue;
                }
                None => return Err("unterminated block comment".to_string()),
            }
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            // fold a single qualifier into the identifier: pkg.Sel
            if chars.get(i) == Some(&'.')
                && chars
                    .get(i + 1)
                    .is_some_and(|c| c.is_ascii_alphabetic() || *c == '_')
            {
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
            }
            toks.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            toks.push(parse_number(&text)?);
            continue;
        }

        if c == '"' || c == '`' {
            let (text, end) = lex_quoted(&chars, i, c)?;
            toks.push(Tok::Str(text));
            i = end;
            continue;
        }

        if c == '\'' {
            let (tok, end) = lex_char(&chars, i)?;
            toks.push(tok);
            i = end;
            continue;
        }

        let two: Option<&'static str> = match (c, chars.get(i + 1)) {
            ('<', Some('<')) => Some("<<"),
            ('>', Some('>')) => Some(">>"),
            ('&', Some('^')) => Some("&^"),
            _ => None,
        };
        if let Some(op) = two {
            toks.push(Tok::Op(op));
            i += 2;
            continue;
        }

        let tok = match c {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            ',' => Tok::Comma,
            '=' => Tok::Assign,
            '+' => Tok::Op("+"),
            '-' => Tok::Op("-"),
            '*' => Tok::Op("*"),
            '/' => Tok::Op("/"),
            '%' => Tok::Op("%"),
            '&' => Tok::Op("&"),
            '|' => Tok::Op("|"),
            '^' => Tok::Op("^"),
            _ => return Err(format!("unexpected character {:?}", c)),
        };
        toks.push(tok);
        i += 1;
    }

    Ok(toks)
}

fn find_close(chars: &[char], mut i: usize) -> Option<usize> {
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

fn lex_quoted(
    chars: &[char],
    start: usize,
    quote: char,
) -> std::result::Result<(String, usize), String> {
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == '\\' && quote == '"' {
            i += 2;
            continue;
        }
        if chars[i] == quote {
            let text: String = chars[start..=i].iter().collect();
            return Ok((text, i + 1));
        }
        i += 1;
    }
    Err("unterminated string literal".to_string())
}

fn lex_char(chars: &[char], start: usize) -> std::result::Result<(Tok, usize), String> {
    let mut i = start + 1;
    let value: i128;
    match chars.get(i) {
        Some('\\') => {
            let (escaped, end) = decode_escape(chars, i + 1)?;
            value = escaped;
            i = end;
        }
        Some(&c) if c != '\'' => {
            value = c as i128;
            i += 1;
        }
        _ => return Err("empty rune literal".to_string()),
    }
    match chars.get(i) {
        Some('\'') => {
            let text: String = chars[start..=i].iter().collect();
            Ok((Tok::Char { value, text }, i + 1))
        }
        _ => Err("unterminated rune literal".to_string()),
    }
}

fn decode_escape(chars: &[char], i: usize) -> std::result::Result<(i128, usize), String> {
    let c = chars.get(i).ok_or("truncated escape")?;
    let simple = |v: char| Ok((v as i128, i + 1));
    match c {
        'n' => simple('\n'),
        't' => simple('\t'),
        'r' => simple('\r'),
        '\\' => simple('\\'),
        '\'' => simple('\''),
        '"' => simple('"'),
        '0' => Ok((0, i + 1)),
        'x' | 'u' | 'U' => {
            let width = match c {
                'x' => 2,
                'u' => 4,
                _ => 8,
            };
            let mut value: i128 = 0;
            for offset in 0..width {
                let digit = chars
                    .get(i + 1 + offset)
                    .and_then(|d| d.to_digit(16))
                    .ok_or("malformed hex escape")?;
                value = value * 16 + digit as i128;
            }
            Ok((value, i + 1 + width))
        }
        _ => Err(format!("unsupported escape {:?}", c)),
    }
}

fn parse_number(text: &str) -> std::result::Result<Tok, String> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let parsed = if let Some(digits) = lower.strip_prefix("0x") {
        i128::from_str_radix(digits, 16)
    } else if let Some(digits) = lower.strip_prefix("0b") {
        i128::from_str_radix(digits, 2)
    } else if let Some(digits) = lower.strip_prefix("0o") {
        i128::from_str_radix(digits, 8)
    } else if lower.contains('.') || lower.contains('e') {
        return Ok(Tok::Float(text.to_string()));
    } else if lower.len() > 1 && lower.starts_with('0') {
        i128::from_str_radix(&lower[1..], 8)
    } else {
        lower.parse::<i128>()
    };

    match parsed {
        Ok(value) => Ok(Tok::Int {
            value,
            text: text.to_string(),
        }),
        Err(_) => Err(format!("malformed number literal {:?}", text)),
    }
}

/// Brace balance of one line, ignoring braces inside strings, runes,
/// and comments. Used to keep function bodies out of declaration scans.
fn brace_delta(line: &str) -> i64 {
    let chars: Vec<char> = line.chars().collect();
    let mut delta = 0i64;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'/') => break,
            '"' | '`' => {
                let quote = chars[i];
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\\' && quote == '"' {
                        i += 2;
                        continue;
                    }
                    if chars[i] == quote {
                        break;
                    }
                    i += 1;
                }
            }
            '\'' => {
                i += 1;
                while i < chars.len() && chars[i] != '\'' {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
        i += 1;
    }
    delta
}
