/// Name of the play-money unit shown next to every balance.
pub const CURRENCY_NAME: &str = "Gator Bucks";

/// Alternate name used on the scorecard screens.
pub const CURRENCY_ALT_NAME: &str = "Alligator Teeth";

/// Shown with every settlement or balance output, unconditionally.
pub const DISCLAIMER: &str =
    "Gator Bucks are play money for entertainment only and have no cash value.";

/// Currency-style signed rendering: `+5`, `-10`, `0`.
pub fn format_net_amount(amount: i64) -> String {
    if amount > 0 {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}

/// `+5 Gator Bucks` style label.
pub fn format_balance(amount: i64) -> String {
    format!("{} {CURRENCY_NAME}", format_net_amount(amount))
}
