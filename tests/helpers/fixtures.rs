//! Source fixtures and cursor helpers.

/// Line and byte column of the `nth` whole-word occurrence of `word`.
///
/// Panics when the word does not occur often enough.
pub fn position_of(source: &str, word: &str, nth: usize) -> (u32, u32) {
    let is_word = |c: char| c == '_' || c.is_alphanumeric();
    let mut seen = 0;
    for (line_no, line) in source.lines().enumerate() {
        let mut from = 0;
        while let Some(found) = line[from..].find(word) {
            let start = from + found;
            let end = start + word.len();
            let before = line[..start].chars().next_back();
            let after = line[end..].chars().next();
            if !before.is_some_and(is_word) && !after.is_some_and(is_word) {
                if seen == nth {
                    return (line_no as u32, start as u32);
                }
                seen += 1;
            }
            from = end;
        }
    }
    panic!("occurrence {nth} of '{word}' not found");
}

/// A module file returning a table with one function and one constant.
pub const UTIL_MODULE: &str = r#"local M = {}

--- Greets someone.
function M.greet(name)
  return "hello " .. name
end

M.VERSION = "1.0"

return M
"#;

/// A class-style module using colon methods.
pub const ACCOUNT_CLASS: &str = r#"local Account = {}
Account.__index = Account

function Account.new(balance)
  return setmetatable({ balance = balance }, Account)
end

function Account:deposit(amount)
  self.balance = self.balance + amount
end

function Account:report()
  self.deposit(0)
end

return Account
"#;
