use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{CashflowError, Result};
use crate::models::{Category, ParsedCategory};

// ---------------------------------------------------------------------------
// Category-line parser
// ---------------------------------------------------------------------------

// Character-level states for one category-definition line.
enum CatState {
    Start,
    Level1,
    SegmentFirst,
    SegmentMore,
    DescrSearch,
    DescrBody,
    CommentBody,
}

/// Parse one line of the category file, newline terminator included when the
/// source has one. Returns `Ok(None)` for blank and comment lines, the parsed
/// fields for a category definition, or a message naming what was wrong. The
/// caller attaches file name and line number.
///
/// Grammar: `<code> <description> [# comment]` where the code has 1-4 dotted
/// segments, segment one a single digit 1-9, deeper segments 1-99 with no
/// leading zero.
pub fn parse_category_line(line: &str) -> std::result::Result<Option<ParsedCategory>, String> {
    // Windows-authored files terminate lines with "\r\n"; fold that to "\n"
    // so the state machine only ever sees one terminator.
    let normalized: Cow<'_, str> = match line.strip_suffix("\r\n") {
        Some(body) => Cow::Owned(format!("{body}\n")),
        None => Cow::Borrowed(line),
    };
    let line = normalized.as_ref();
    let mut state = CatState::Start;
    let mut level: u8 = 1;
    let mut digit_count = 0;
    let mut code_start = 0;
    let mut code = "";
    let mut descr_start = 0;
    let mut descr = "";

    for (idx, ch) in line.char_indices() {
        match state {
            CatState::Start => match ch {
                ' ' => {}
                '#' | '\n' => return Ok(None),
                '1'..='9' => {
                    code_start = idx;
                    state = CatState::Level1;
                }
                _ => return Err("invalid category line".into()),
            },

            // A level-1 code is exactly one digit; the only valid followers
            // are '.' (deepen) and ' ' (close).
            CatState::Level1 => match ch {
                '.' => {
                    level = 2;
                    state = CatState::SegmentFirst;
                }
                ' ' => {
                    code = &line[code_start..idx];
                    state = CatState::DescrSearch;
                }
                _ => return Err("invalid category line".into()),
            },

            CatState::SegmentFirst => match ch {
                '1'..='9' => {
                    digit_count = 1;
                    state = CatState::SegmentMore;
                }
                _ => return Err("invalid category line".into()),
            },

            CatState::SegmentMore => match ch {
                '0'..='9' => {
                    digit_count += 1;
                    if digit_count > 2 {
                        return Err("too many digits in category code segment".into());
                    }
                }
                '.' => {
                    level += 1;
                    if level > 4 {
                        return Err("category code nested too deeply".into());
                    }
                    state = CatState::SegmentFirst;
                }
                ' ' => {
                    code = &line[code_start..idx];
                    state = CatState::DescrSearch;
                }
                _ => return Err("invalid category line".into()),
            },

            CatState::DescrSearch => match ch {
                ' ' => {}
                '#' | '\n' => return Err("missing category description".into()),
                _ => {
                    descr_start = idx;
                    state = CatState::DescrBody;
                }
            },

            CatState::DescrBody => match ch {
                '#' | '\n' => {
                    descr = line[descr_start..idx].trim_end();
                    if ch == '\n' {
                        return Ok(Some(ParsedCategory {
                            code: code.to_string(),
                            description: descr.to_string(),
                            comment: String::new(),
                            level,
                        }));
                    }
                    descr_start = idx; // reuse as comment start, past the '#'
                    state = CatState::CommentBody;
                }
                _ => {}
            },

            CatState::CommentBody => {
                if ch == '\n' {
                    let comment = line[descr_start + 1..idx].trim().to_string();
                    return Ok(Some(ParsedCategory {
                        code: code.to_string(),
                        description: descr.to_string(),
                        comment,
                        level,
                    }));
                }
            }
        }
    }

    // Ran out of characters without a newline. A final line of nothing but
    // spaces is fine; anything else ended mid-field.
    match state {
        CatState::Start => Ok(None),
        _ => Err("invalid category line".into()),
    }
}

// ---------------------------------------------------------------------------
// Registry and hierarchy
// ---------------------------------------------------------------------------

/// Arena of category nodes in file order, plus a code-to-index map. Nodes are
/// addressed by index everywhere; none is ever removed or reparented.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    nodes: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Parse an entire category file and resolve the hierarchy. The file must
    /// define every parent before any of its children.
    pub fn from_text(text: &str, file_name: &str) -> Result<Self> {
        let mut registry = Self::default();
        for (idx, line) in text.split_inclusive('\n').enumerate() {
            let line_nbr = idx + 1;
            let parsed =
                parse_category_line(line).map_err(|message| CashflowError::Format {
                    file: file_name.to_string(),
                    line: line_nbr,
                    message,
                })?;
            let Some(parsed) = parsed else { continue };
            if registry.index.contains_key(&parsed.code) {
                return Err(CashflowError::DuplicateCategory {
                    code: parsed.code,
                    file: file_name.to_string(),
                    line: line_nbr,
                });
            }
            registry.index.insert(parsed.code.clone(), registry.nodes.len());
            registry.nodes.push(Category::new(parsed, line_nbr));
        }
        if registry.nodes.is_empty() {
            return Err(CashflowError::Empty {
                file: file_name.to_string(),
            });
        }
        registry.build_hierarchy()?;
        Ok(registry)
    }

    /// Resolve parent and children indices for every node. Runs once, after
    /// all nodes exist; each resolution is independent of the others.
    fn build_hierarchy(&mut self) -> Result<()> {
        for idx in 0..self.nodes.len() {
            if self.nodes[idx].level <= 1 {
                continue;
            }
            let code = self.nodes[idx].code.clone();
            let parent_code = match code.rfind('.') {
                Some(dot) => &code[..dot],
                None => continue, // unreachable: level > 1 implies a dot
            };
            // The arena holds nodes in file order, so a parent index at or
            // past the child's means it was defined too late.
            let parent_idx = match self.index.get(parent_code) {
                Some(&p) if p < idx => p,
                _ => {
                    return Err(CashflowError::MissingParent {
                        parent: parent_code.to_string(),
                        child: code,
                    })
                }
            };
            self.nodes[parent_idx].children.push(idx);
            self.nodes[idx].parent = Some(parent_idx);
        }
        Ok(())
    }

    pub fn lookup(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub fn node(&self, idx: usize) -> &Category {
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Category {
        &mut self.nodes[idx]
    }

    pub fn nodes(&self) -> &[Category] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
