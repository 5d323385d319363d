//! A tolerant stylesheet scanner.
//!
//! Splits source into blocks and declarations without building a full
//! syntax tree. Comments are skipped, strings are kept verbatim, and
//! unbalanced braces never fail the scan.

/// A 1-based line/column location in the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLoc {
    /// Line (1-based).
    pub line: u32,
    /// Column (1-based, in chars).
    pub column: u32,
}

impl SourceLoc {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A `prelude { ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Selector or at-rule prelude, trimmed.
    pub prelude: String,
    /// Location of the opening brace.
    pub open: SourceLoc,
    /// Location of the closing brace; `None` if the source ended first.
    pub close: Option<SourceLoc>,
    /// Declarations directly inside this block.
    pub declarations: Vec<Declaration>,
    /// Number of nested blocks.
    pub children: usize,
}

/// A `property: value` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub property_loc: SourceLoc,
    /// Value text, trimmed.
    pub value: String,
    /// Location of each char of `value`.
    pub value_locs: Vec<SourceLoc>,
}

impl Declaration {
    /// Location of the `idx`-th char of the value, or of the property when out of range.
    pub fn loc_in_value(&self, idx: usize) -> SourceLoc {
        self.value_locs
            .get(idx)
            .copied()
            .unwrap_or(self.property_loc)
    }
}

/// The scanned blocks, in closing order (innermost first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub blocks: Vec<Block>,
}

impl Stylesheet {
    /// Scans `source`.
    pub fn scan(source: &str) -> Self {
        Scanner::new(source).run()
    }
}

struct Scanner {
    chars: Vec<char>,
    idx: usize,
    loc: SourceLoc,
    segment: Vec<(char, SourceLoc)>,
    stack: Vec<Block>,
    done: Vec<Block>,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            idx: 0,
            loc: SourceLoc::new(1, 1),
            segment: Vec::new(),
            stack: Vec::new(),
            done: Vec::new(),
        }
    }

    fn run(mut self) -> Stylesheet {
        while let Some(c) = self.peek(0) {
            let here = self.loc;
            match c {
                '/' if self.peek(1) == Some('*') => self.skip_comment(),
                '"' | '\'' => self.take_string(c),
                '{' => {
                    self.bump();
                    let prelude = segment_text(&self.segment).trim().to_string();
                    self.segment.clear();
                    if let Some(parent) = self.stack.last_mut() {
                        parent.children += 1;
                    }
                    self.stack.push(Block {
                        prelude,
                        open: here,
                        close: None,
                        declarations: Vec::new(),
                        children: 0,
                    });
                }
                '}' => {
                    self.bump();
                    self.flush_declaration();
                    if let Some(mut block) = self.stack.pop() {
                        block.close = Some(here);
                        self.done.push(block);
                    }
                }
                ';' => {
                    self.bump();
                    self.flush_declaration();
                }
                _ => {
                    self.bump();
                    self.segment.push((c, here));
                }
            }
        }

        self.flush_declaration();
        while let Some(block) = self.stack.pop() {
            self.done.push(block);
        }
        Stylesheet { blocks: self.done }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.idx + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.idx += 1;
        if c == '\n' {
            self.loc = SourceLoc::new(self.loc.line + 1, 1);
        } else {
            self.loc.column += 1;
        }
        Some(c)
    }

    fn skip_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(c) = self.bump() {
            if c == '*' && self.peek(0) == Some('/') {
                self.bump();
                return;
            }
        }
    }

    fn take_string(&mut self, quote: char) {
        let start = self.loc;
        self.bump();
        self.segment.push((quote, start));
        while let Some(c) = self.peek(0) {
            let here = self.loc;
            self.bump();
            self.segment.push((c, here));
            if c == '\\' {
                if let Some(escaped) = self.peek(0) {
                    let here = self.loc;
                    self.bump();
                    self.segment.push((escaped, here));
                }
            } else if c == quote || c == '\n' {
                return;
            }
        }
    }

    fn flush_declaration(&mut self) {
        let segment = std::mem::take(&mut self.segment);
        let Some(block) = self.stack.last_mut() else {
            return;
        };
        let Some(colon) = segment.iter().position(|(c, _)| *c == ':') else {
            return;
        };

        let property: Vec<_> = trim(&segment[..colon]).to_vec();
        let value = trim(&segment[colon + 1..]);
        let Some(&(_, property_loc)) = property.first() else {
            return;
        };

        block.declarations.push(Declaration {
            property: segment_text(&property),
            property_loc,
            value: segment_text(value),
            value_locs: value.iter().map(|(_, loc)| *loc).collect(),
        });
    }
}

fn trim(chars: &[(char, SourceLoc)]) -> &[(char, SourceLoc)] {
    let start = chars
        .iter()
        .position(|(c, _)| !c.is_whitespace())
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|(c, _)| !c.is_whitespace())
        .map_or(start, |i| i + 1);
    &chars[start..end]
}

fn segment_text(chars: &[(char, SourceLoc)]) -> String {
    chars.iter().map(|(c, _)| c).collect()
}
