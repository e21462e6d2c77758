use rust_decimal::Decimal;

/// One node of the 4-level category tree. Parent and children are arena
/// indices into the owning `CategoryRegistry`; transactions are indices into
/// the journal arena.
#[derive(Debug, Clone)]
pub struct Category {
    pub code: String,
    pub description: String,
    pub comment: String,
    pub level: u8,
    pub source_line: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub direct_total: Decimal,
    pub nested_total: Decimal,
    pub direct_monthly: [Decimal; 12],
    pub nested_monthly: [Decimal; 12],
    pub transactions: Vec<usize>,
    /// Longest transaction description posted to this category, used to size
    /// the dot leaders in the detail section of the report.
    pub max_description_width: usize,
}

impl Category {
    pub fn new(parsed: ParsedCategory, source_line: usize) -> Self {
        Self {
            code: parsed.code,
            description: parsed.description,
            comment: parsed.comment,
            level: parsed.level,
            source_line,
            parent: None,
            children: Vec::new(),
            direct_total: Decimal::ZERO,
            nested_total: Decimal::ZERO,
            direct_monthly: [Decimal::ZERO; 12],
            nested_monthly: [Decimal::ZERO; 12],
            transactions: Vec::new(),
            max_description_width: 0,
        }
    }

    /// Direct plus nested year-to-date total.
    pub fn combined_total(&self) -> Decimal {
        self.direct_total + self.nested_total
    }

    /// Direct plus nested total for one month (0 = January).
    pub fn combined_monthly(&self, month: usize) -> Decimal {
        self.direct_monthly[month] + self.nested_monthly[month]
    }
}

/// One journal transaction. Created once while reading the journal file and
/// immutable afterwards; categories reference it by arena index.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Canonical `MM/DD/YYYY` within the processing year.
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    /// Free-text token ("chk", "dep", ...), not interpreted.
    pub type_tag: String,
    pub category_code: String,
    /// Arena index of the owning category.
    pub category: usize,
    pub source_line: usize,
}

/// Intermediate representation from the category-line parser before the
/// registry takes ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCategory {
    pub code: String,
    pub description: String,
    pub comment: String,
    pub level: u8,
}

/// Intermediate representation from the journal-line parser before the loader
/// resolves the category code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub date: String,
    /// Month 1-12, kept so the loader can bucket without re-parsing the date.
    pub month: u32,
    pub description: String,
    pub amount: Decimal,
    pub type_tag: String,
    pub category_code: String,
}
