use std::borrow::Cow;

use rust_decimal::Decimal;

use crate::category::CategoryRegistry;
use crate::error::{CashflowError, Result};
use crate::models::{ParsedTransaction, Transaction};

// ---------------------------------------------------------------------------
// Journal-line parser
// ---------------------------------------------------------------------------

// Character-level states for one journal line:
// `<m/d>, <description>, <amount>, <type>, <category code>`
enum TxnState {
    Start,
    Month,
    Day,
    DescrSearch,
    DescrBody,
    AmountStart,
    Dollars,
    Cents,
    TypeSearch,
    TypeBody,
    CatSearch,
    CatBody,
}

// Last valid day per month, 1-indexed. February says 29; the leap-year rule
// is applied separately when the day actually is the 29th.
const MAX_DAY: [u32; 13] = [0, 31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Parse one journal line against the processing year. Returns `Ok(None)` for
/// blank and comment lines, the parsed fields for a transaction, or a message
/// naming the defective field. The category code is checked for syntax only;
/// the loader resolves it against the registry.
pub fn parse_journal_line(
    line: &str,
    year: i32,
) -> std::result::Result<Option<ParsedTransaction>, String> {
    // Windows-authored files terminate lines with "\r\n"; fold that to "\n"
    // so the state machine only ever sees one terminator.
    let normalized: Cow<'_, str> = match line.strip_suffix("\r\n") {
        Some(body) => Cow::Owned(format!("{body}\n")),
        None => Cow::Borrowed(line),
    };
    let line = normalized.as_ref();
    let mut state = TxnState::Start;
    let mut month: u32 = 0;
    let mut day: u32 = 0;
    let mut digit_count = 0;
    let mut dollars: i128 = 0;
    let mut cents: i128 = 0;
    let mut negative = false;
    let mut field_start = 0;
    let mut date = String::new();
    let mut descr = "";
    let mut type_tag = "";
    let mut amount = Decimal::ZERO;

    for (idx, ch) in line.char_indices() {
        match state {
            TxnState::Start => match ch {
                ' ' => {}
                '#' | '\n' => return Ok(None),
                '0'..='9' => {
                    month = ch as u32 - '0' as u32;
                    digit_count = 1;
                    state = TxnState::Month;
                }
                _ => return Err("invalid journal line".into()),
            },

            TxnState::Month => match ch {
                '0'..='9' => {
                    month = month * 10 + (ch as u32 - '0' as u32);
                    digit_count += 1;
                    if digit_count > 2 {
                        return Err("invalid month in journal line".into());
                    }
                }
                '/' if (1..=12).contains(&month) => {
                    day = 0;
                    digit_count = 0;
                    state = TxnState::Day;
                }
                _ => return Err("invalid month in journal line".into()),
            },

            TxnState::Day => match ch {
                '0'..='9' => {
                    day = day * 10 + (ch as u32 - '0' as u32);
                    digit_count += 1;
                    if digit_count > 2 {
                        return Err("invalid day in journal line".into());
                    }
                }
                ',' if day >= 1 && day <= MAX_DAY[month as usize] => {
                    if month == 2 && day == 29 && !is_leap_year(year) {
                        return Err("invalid leap year date in journal line".into());
                    }
                    date = format!("{month:02}/{day:02}/{year:04}");
                    state = TxnState::DescrSearch;
                }
                _ => return Err("invalid day in journal line".into()),
            },

            TxnState::DescrSearch => match ch {
                ' ' => {}
                ',' | '\n' => return Err("invalid description in journal line".into()),
                _ => {
                    field_start = idx;
                    state = TxnState::DescrBody;
                }
            },

            TxnState::DescrBody => {
                if ch == ',' {
                    descr = line[field_start..idx].trim_end();
                    negative = false;
                    state = TxnState::AmountStart;
                }
            }

            TxnState::AmountStart => match ch {
                ' ' => {}
                '-' => {
                    negative = true;
                    dollars = 0;
                    digit_count = 0;
                    state = TxnState::Dollars;
                }
                '0'..='9' => {
                    dollars = (ch as u32 - '0' as u32) as i128;
                    digit_count = 1;
                    state = TxnState::Dollars;
                }
                _ => return Err("invalid amount in journal line".into()),
            },

            TxnState::Dollars => match ch {
                // The digit cap keeps the accumulator well inside i128 range;
                // anything that long is not a real dollar amount anyway.
                '0'..='9' => {
                    dollars = dollars * 10 + (ch as u32 - '0' as u32) as i128;
                    digit_count += 1;
                    if digit_count > 27 {
                        return Err("invalid amount in journal line".into());
                    }
                }
                // A bare sign or a bare '.' has no dollar digit yet.
                '.' if digit_count > 0 => {
                    cents = 0;
                    digit_count = 0;
                    state = TxnState::Cents;
                }
                _ => return Err("invalid amount in journal line".into()),
            },

            TxnState::Cents => match ch {
                '0'..='9' => {
                    cents = cents * 10 + (ch as u32 - '0' as u32) as i128;
                    digit_count += 1;
                }
                ',' if digit_count == 2 => {
                    let mut total = dollars * 100 + cents;
                    if negative {
                        total = -total;
                    }
                    amount = Decimal::try_from_i128_with_scale(total, 2)
                        .map_err(|_| "invalid amount in journal line".to_string())?;
                    state = TxnState::TypeSearch;
                }
                _ => return Err("invalid amount in journal line".into()),
            },

            TxnState::TypeSearch => match ch {
                ' ' => {}
                ',' | '\n' => return Err("invalid transaction type in journal line".into()),
                _ => {
                    field_start = idx;
                    state = TxnState::TypeBody;
                }
            },

            TxnState::TypeBody => {
                if ch == ',' {
                    type_tag = line[field_start..idx].trim_end();
                    state = TxnState::CatSearch;
                }
            }

            TxnState::CatSearch => match ch {
                ' ' => {}
                '0'..='9' => {
                    field_start = idx;
                    state = TxnState::CatBody;
                }
                _ => return Err("invalid category code in journal line".into()),
            },

            // Liberal on syntax: any run of digits and dots. The loader is the
            // one that validates the code against the registry.
            TxnState::CatBody => match ch {
                '0'..='9' | '.' => {}
                ' ' | '\n' => {
                    return Ok(Some(ParsedTransaction {
                        date,
                        month,
                        description: descr.to_string(),
                        amount,
                        type_tag: type_tag.to_string(),
                        category_code: line[field_start..idx].to_string(),
                    }));
                }
                _ => return Err("invalid category code in journal line".into()),
            },
        }
    }

    match state {
        TxnState::Start => Ok(None),
        _ => Err("invalid journal line".into()),
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Parse the whole journal and post every transaction to its category:
/// transaction handle, direct total, monthly bucket, and the description
/// width used later by the report. The registry must already have its
/// hierarchy resolved.
pub fn load_journal(
    text: &str,
    file_name: &str,
    year: i32,
    registry: &mut CategoryRegistry,
) -> Result<Vec<Transaction>> {
    let mut journal: Vec<Transaction> = Vec::new();
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let line_nbr = idx + 1;
        let parsed = parse_journal_line(line, year).map_err(|message| CashflowError::Format {
            file: file_name.to_string(),
            line: line_nbr,
            message,
        })?;
        let Some(parsed) = parsed else { continue };

        let Some(cat_idx) = registry.lookup(&parsed.category_code) else {
            return Err(CashflowError::UndefinedCategory {
                code: parsed.category_code,
                file: file_name.to_string(),
                line: line_nbr,
            });
        };

        let width = parsed.description.chars().count();
        let node = registry.node_mut(cat_idx);
        node.transactions.push(journal.len());
        node.direct_total += parsed.amount;
        node.direct_monthly[(parsed.month - 1) as usize] += parsed.amount;
        if width > node.max_description_width {
            node.max_description_width = width;
        }

        journal.push(Transaction {
            date: parsed.date,
            description: parsed.description,
            amount: parsed.amount,
            type_tag: parsed.type_tag,
            category_code: parsed.category_code,
            category: cat_idx,
            source_line: line_nbr,
        });
    }
    if journal.is_empty() {
        return Err(CashflowError::Empty {
            file: file_name.to_string(),
        });
    }
    Ok(journal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn parse_ok(line: &str) -> ParsedTransaction {
        parse_journal_line(line, 2015).unwrap().unwrap()
    }

    #[test]
    fn test_parse_basic_line() {
        let txn = parse_ok("3/9, Rappahannock Electric (Union chk), 292.03, xfr, 2.2.1\n");
        assert_eq!(txn.date, "03/09/2015");
        assert_eq!(txn.month, 3);
        assert_eq!(txn.description, "Rappahannock Electric (Union chk)");
        assert_eq!(txn.amount, Decimal::from_str("292.03").unwrap());
        assert_eq!(txn.type_tag, "xfr");
        assert_eq!(txn.category_code, "2.2.1");
    }

    #[test]
    fn test_amount_round_trips_two_decimals() {
        let txn = parse_ok("3/9, Electric, 292.03, xfr, 2.2.1\n");
        assert_eq!(format!("{:.2}", txn.amount), "292.03");
        let txn = parse_ok("3/13, Interest, 0.25, xfr, 1.2.1\n");
        assert_eq!(format!("{:.2}", txn.amount), "0.25");
    }

    #[test]
    fn test_parse_negative_amount() {
        let txn = parse_ok("4/1, Refund reversal, -12.38, chk, 2.1\n");
        assert_eq!(txn.amount, Decimal::from_str("-12.38").unwrap());
    }

    #[test]
    fn test_date_expansion() {
        assert_eq!(parse_ok("3/9, A, 1.00, t, 1\n").date, "03/09/2015");
        assert_eq!(parse_ok("12/31, A, 1.00, t, 1\n").date, "12/31/2015");
        assert_eq!(parse_ok("03/09, A, 1.00, t, 1\n").date, "03/09/2015");
    }

    #[test]
    fn test_feb_29_leap_rules() {
        let line = "2/29, Leap day, 5.00, chk, 1\n";
        assert!(parse_journal_line(line, 2016).unwrap().is_some());
        assert_eq!(parse_journal_line(line, 2016).unwrap().unwrap().date, "02/29/2016");
        assert!(parse_journal_line(line, 2015).is_err());
        // Century rule: 2000 was a leap year, 1900 was not.
        assert!(parse_journal_line(line, 2000).unwrap().is_some());
        assert!(parse_journal_line(line, 1900).is_err());
    }

    #[test]
    fn test_calendar_limits() {
        assert!(parse_journal_line("4/31, A, 1.00, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("2/30, A, 1.00, t, 1\n", 2016).is_err());
        assert!(parse_journal_line("13/1, A, 1.00, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("0/1, A, 1.00, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("1/0, A, 1.00, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("123/1, A, 1.00, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("1/123, A, 1.00, t, 1\n", 2015).is_err());
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let txn = parse_journal_line("3/9, Paycheck, 1000.00, dep, 1.1\r\n", 2015)
            .unwrap()
            .unwrap();
        assert_eq!(txn.description, "Paycheck");
        assert_eq!(txn.category_code, "1.1");
        assert_eq!(parse_journal_line("\r\n", 2015).unwrap(), None);
        assert_eq!(parse_journal_line("# March\r\n", 2015).unwrap(), None);
    }

    #[test]
    fn test_amount_overflow_is_error_not_panic() {
        let line = format!("3/9, A, {}.00, t, 1\n", "9".repeat(30));
        assert!(parse_journal_line(&line, 2015).is_err());
        // Fits the digit cap but overflows the decimal range once scaled.
        let line = format!("3/9, A, {}.99, t, 1\n", "9".repeat(27));
        assert!(parse_journal_line(&line, 2015).is_err());
    }

    #[test]
    fn test_amount_field_errors() {
        assert!(parse_journal_line("3/9, A, , t, 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, -, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, .50, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, 5, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, 5.1, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, 5.123, t, 1\n", 2015).is_err());
    }

    #[test]
    fn test_missing_fields() {
        assert!(parse_journal_line("3/9, , 1.00, t, 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, 1.00, , 1\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, 1.00, t, x\n", 2015).is_err());
        assert!(parse_journal_line("3/9, A, 1.00, t,\n", 2015).is_err());
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(parse_journal_line("\n", 2015).unwrap(), None);
        assert_eq!(parse_journal_line("  \n", 2015).unwrap(), None);
        assert_eq!(parse_journal_line("# Union Checking Account\n", 2015).unwrap(), None);
        assert_eq!(parse_journal_line("   ", 2015).unwrap(), None);
    }

    #[test]
    fn test_unterminated_line_is_error() {
        assert!(parse_journal_line("3/9, A, 1.00, t, 1.2", 2015).is_err());
    }

    #[test]
    fn test_category_code_syntax_is_liberal() {
        // The parser accepts any digits-and-dots run; semantics are the
        // loader's problem.
        let txn = parse_ok("3/9, A, 1.00, t, 99.0.0.7.1\n");
        assert_eq!(txn.category_code, "99.0.0.7.1");
    }

    fn test_registry() -> CategoryRegistry {
        CategoryRegistry::from_text(
            "1 Income\n1.1 Salary\n2 Expenses\n2.1 Housing\n",
            "cats.txt",
        )
        .unwrap()
    }

    #[test]
    fn test_load_journal_posts_to_categories() {
        let mut reg = test_registry();
        let text = "\
# March
3/9, Paycheck, 1000.00, dep, 1.1
3/10, Rent, 800.00, chk, 2.1
3/20, Utilities deposit refund, 25.50, chk, 2.1
";
        let journal = load_journal(text, "journal.txt", 2015, &mut reg).unwrap();
        assert_eq!(journal.len(), 3);

        let housing = reg.lookup("2.1").unwrap();
        let node = reg.node(housing);
        assert_eq!(node.direct_total, Decimal::from_str("825.50").unwrap());
        assert_eq!(node.direct_monthly[2], Decimal::from_str("825.50").unwrap());
        assert_eq!(node.direct_monthly[0], Decimal::ZERO);
        assert_eq!(node.transactions, vec![1, 2]);
        assert_eq!(node.max_description_width, "Utilities deposit refund".len());

        assert_eq!(journal[0].category, reg.lookup("1.1").unwrap());
        assert_eq!(journal[0].source_line, 2);
    }

    #[test]
    fn test_load_journal_accepts_crlf_file() {
        let mut reg = test_registry();
        let text = "# March\r\n3/9, Paycheck, 1000.00, dep, 1.1\r\n3/10, Rent, 800.00, chk, 2.1\r\n";
        let journal = load_journal(text, "journal.txt", 2015, &mut reg).unwrap();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[1].category_code, "2.1");
    }

    #[test]
    fn test_load_journal_rejects_undefined_category() {
        let mut reg = test_registry();
        let text = "3/9, Paycheck, 1000.00, dep, 9.9.9\n";
        let err = load_journal(text, "journal.txt", 2015, &mut reg).unwrap_err();
        match err {
            CashflowError::UndefinedCategory { code, line, .. } => {
                assert_eq!(code, "9.9.9");
                assert_eq!(line, 1);
            }
            other => panic!("expected UndefinedCategory, got {other}"),
        }
    }

    #[test]
    fn test_load_journal_rejects_empty_file() {
        let mut reg = test_registry();
        let err = load_journal("# no records\n", "journal.txt", 2015, &mut reg).unwrap_err();
        assert!(matches!(err, CashflowError::Empty { .. }));
    }
}
